use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::{parse_remote_credentials, process_env, AwsCredentials, EnvLookup, ProvideCredentials};
use crate::client::{ParameterError, ParameterResult};
use crate::logging;

const DEFAULT_ENDPOINT: &str = "http://169.254.169.254";
const TOKEN_PATH: &str = "/latest/api/token";
const ROLE_PATH: &str = "/latest/meta-data/iam/security-credentials/";
const TOKEN_TTL_HEADER: &str = "x-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "x-aws-ec2-metadata-token";
const TOKEN_TTL_SECONDS: &str = "21600";
const TIMEOUT: Duration = Duration::from_secs(1);

/// Instance-role credentials from the EC2 metadata service (IMDSv2)
///
/// An unreachable metadata service, a refused session token, or an instance
/// without a role all mean "not configured". `AWS_EC2_METADATA_DISABLED=true`
/// skips the lookup and `AWS_EC2_METADATA_SERVICE_ENDPOINT` overrides the
/// address.
pub struct ImdsProvider {
    http: Client,
    endpoint: String,
    disabled: bool,
}

impl ImdsProvider {
    pub fn new() -> ParameterResult<Self> {
        Self::from_lookup(&process_env())
    }

    pub fn from_lookup(lookup: &EnvLookup) -> ParameterResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let endpoint = get("AWS_EC2_METADATA_SERVICE_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let disabled = get("AWS_EC2_METADATA_DISABLED")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            http: Client::builder().timeout(TIMEOUT).no_proxy().build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            disabled,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn session_token(&self) -> Option<String> {
        let response = self
            .http
            .put(format!("{}{}", self.endpoint, TOKEN_PATH))
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .send();

        match response {
            Ok(response) if response.status().is_success() => response.text().ok(),
            Ok(response) => {
                logging::debug(
                    "ssm::credentials",
                    &format!("IMDS token request returned {}", response.status().as_u16()),
                );
                None
            }
            Err(e) => {
                logging::debug("ssm::credentials", &format!("IMDS unreachable: {}", e));
                None
            }
        }
    }

    fn get(&self, path: &str, token: &str) -> ParameterResult<Option<Vec<u8>>> {
        let response = self
            .http
            .get(format!("{}{}", self.endpoint, path))
            .header(TOKEN_HEADER, token)
            .send()?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes()?.to_vec())),
            status => Err(ParameterError::Credentials(format!(
                "imds: {} returned {}",
                path,
                status.as_u16()
            ))),
        }
    }
}

impl ProvideCredentials for ImdsProvider {
    fn name(&self) -> &str {
        "imds"
    }

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>> {
        if self.disabled {
            return Ok(None);
        }
        let Some(token) = self.session_token() else {
            return Ok(None);
        };

        let Some(roles) = self.get(ROLE_PATH, &token)? else {
            return Ok(None);
        };
        let roles = String::from_utf8_lossy(&roles);
        let Some(role) = roles.lines().map(str::trim).find(|line| !line.is_empty()) else {
            return Ok(None);
        };

        let path = format!("{}{}", ROLE_PATH, role);
        match self.get(&path, &token)? {
            Some(body) => parse_remote_credentials("imds", &body).map(Some),
            None => Err(ParameterError::Credentials(format!(
                "imds: no credentials for role {}",
                role
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ssm::credentials::test_support::lookup;
    use crate::client::ssm::test_server::TestServer;

    const CREDENTIALS_BODY: &str = r#"{"Code":"Success","Type":"AWS-HMAC","AccessKeyId":"ASIAINSTANCE","SecretAccessKey":"instance-secret","Token":"instance-token","Expiration":"2026-10-16T12:00:00Z"}"#;

    fn provider_for(server: &TestServer) -> ImdsProvider {
        let url = server.url();
        ImdsProvider::from_lookup(&lookup(&[("AWS_EC2_METADATA_SERVICE_ENDPOINT", url.as_str())])).unwrap()
    }

    #[test]
    fn test_role_credentials() {
        let server = TestServer::start(vec![
            (200, "session-token"),
            (200, "app-role\n"),
            (200, CREDENTIALS_BODY),
        ]);

        let creds = provider_for(&server).provide().unwrap();
        assert_eq!(
            creds,
            Some(AwsCredentials::new("ASIAINSTANCE", "instance-secret").with_session_token("instance-token"))
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, TOKEN_PATH);
        assert_eq!(requests[0].header(TOKEN_TTL_HEADER), Some(TOKEN_TTL_SECONDS));
        assert_eq!(requests[1].path, ROLE_PATH);
        assert_eq!(requests[1].header(TOKEN_HEADER), Some("session-token"));
        assert_eq!(requests[2].path, "/latest/meta-data/iam/security-credentials/app-role");
        assert_eq!(requests[2].header(TOKEN_HEADER), Some("session-token"));
    }

    #[test]
    fn test_no_role_attached() {
        let server = TestServer::start(vec![(200, "session-token"), (404, "")]);
        assert!(provider_for(&server).provide().unwrap().is_none());
        assert_eq!(server.requests().len(), 2);
    }

    #[test]
    fn test_token_refused() {
        let server = TestServer::start(vec![(403, "")]);
        assert!(provider_for(&server).provide().unwrap().is_none());
    }

    #[test]
    fn test_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider =
            ImdsProvider::from_lookup(&lookup(&[("AWS_EC2_METADATA_SERVICE_ENDPOINT", url.as_str())])).unwrap();
        assert!(provider.provide().unwrap().is_none());
    }

    #[test]
    fn test_disabled() {
        let provider = ImdsProvider::from_lookup(&lookup(&[("AWS_EC2_METADATA_DISABLED", "TRUE")])).unwrap();
        assert!(provider.is_disabled());
        assert!(provider.provide().unwrap().is_none());
    }

    #[test]
    fn test_default_endpoint() {
        let provider = ImdsProvider::from_lookup(&lookup(&[])).unwrap();
        assert_eq!(provider.endpoint(), DEFAULT_ENDPOINT);
        assert!(!provider.is_disabled());
    }
}
