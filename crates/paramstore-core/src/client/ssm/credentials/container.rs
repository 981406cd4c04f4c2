use std::fs;
use std::net::IpAddr;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::Url;

use super::{parse_remote_credentials, process_env, AwsCredentials, EnvLookup, ProvideCredentials};
use crate::client::{ParameterError, ParameterResult};
use crate::logging;

const ECS_HOST: &str = "http://169.254.170.2";
const TIMEOUT: Duration = Duration::from_secs(2);

/// Credentials served to ECS tasks and other container runtimes
///
/// `AWS_CONTAINER_CREDENTIALS_RELATIVE_URI` is resolved against the ECS agent
/// address. `AWS_CONTAINER_CREDENTIALS_FULL_URI` must be HTTPS or point at a
/// loopback or link-local address. The authorization token comes from
/// `AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE` or
/// `AWS_CONTAINER_AUTHORIZATION_TOKEN`.
pub struct ContainerProvider {
    http: Client,
    lookup: EnvLookup,
}

impl ContainerProvider {
    pub fn new() -> ParameterResult<Self> {
        Self::from_lookup(process_env())
    }

    pub fn from_lookup(lookup: EnvLookup) -> ParameterResult<Self> {
        let http = Client::builder().timeout(TIMEOUT).no_proxy().build()?;
        Ok(Self { http, lookup })
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    /// The endpoint to query, or `None` when no container variables are set
    fn endpoint(&self) -> ParameterResult<Option<Url>> {
        let raw = if let Some(relative) = self.get("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI") {
            format!("{}{}", ECS_HOST, relative)
        } else if let Some(full) = self.get("AWS_CONTAINER_CREDENTIALS_FULL_URI") {
            full
        } else {
            return Ok(None);
        };

        let url = Url::parse(&raw)
            .map_err(|e| ParameterError::Credentials(format!("container: invalid URI {}: {}", raw, e)))?;
        if url.scheme() != "https" && !is_allowed_http_host(&url) {
            return Err(ParameterError::Credentials(format!(
                "container: {} must use HTTPS or a loopback address",
                raw
            )));
        }
        Ok(Some(url))
    }

    fn authorization(&self) -> ParameterResult<Option<String>> {
        if let Some(path) = self.get("AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE") {
            let token = fs::read_to_string(&path).map_err(|e| {
                ParameterError::Credentials(format!("container: failed to read {}: {}", path, e))
            })?;
            return Ok(Some(token.trim().to_string()));
        }
        Ok(self.get("AWS_CONTAINER_AUTHORIZATION_TOKEN"))
    }
}

impl ProvideCredentials for ContainerProvider {
    fn name(&self) -> &str {
        "container"
    }

    fn provide(&self) -> ParameterResult<Option<AwsCredentials>> {
        let Some(url) = self.endpoint()? else {
            return Ok(None);
        };

        let mut request = self.http.get(url);
        if let Some(token) = self.authorization()? {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().map_err(|e| {
            logging::error("ssm::credentials", &format!("Container credentials request failed: {}", e));
            ParameterError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ParameterError::Credentials(format!(
                "container: endpoint returned {}",
                status.as_u16()
            )));
        }

        parse_remote_credentials("container", &response.bytes()?).map(Some)
    }
}

fn is_allowed_http_host(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map(|ip| match ip {
                IpAddr::V4(v4) => v4.is_loopback() || v4.is_link_local(),
                IpAddr::V6(v6) => v6.is_loopback(),
            })
            .unwrap_or(false),
        None => false,
    }
}
