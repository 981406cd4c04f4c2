//! Transport for SSM `GetParameters`
//!
//! Speaks the AWS JSON 1.1 protocol over HTTPS:
//! - `POST /` with `Content-Type: application/x-amz-json-1.1`
//! - `X-Amz-Target: AmazonSSM.GetParameters`
//! - SigV4 `Authorization` header

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use super::credentials::ProvideCredentials;
use super::sigv4::{self, SignableRequest};
use super::types::{ErrorBody, GetParametersRequest, GetParametersResponse};
use crate::client::{ParameterError, ParameterResult};
use crate::config::ConfigError;
use crate::logging;

const CONTENT_TYPE_JSON: &str = "application/x-amz-json-1.1";
const TARGET_GET_PARAMETERS: &str = "AmazonSSM.GetParameters";
const SERVICE: &str = "ssm";

/// Sends one `GetParameters` request
///
/// `SsmParameterClient` only depends on this trait, so tests can stand in a
/// fake without any network.
pub trait SsmTransport: Send + Sync {
    fn get_parameters(&self, request: &GetParametersRequest) -> ParameterResult<GetParametersResponse>;
}

/// Blocking HTTPS transport with SigV4 signing
///
/// Credentials are asked for on every request so rotated role credentials
/// are picked up. No retries and no client-side timeout beyond reqwest's
/// defaults; any failure goes straight back to the caller.
pub struct HttpSsmTransport {
    http: Client,
    endpoint: Url,
    host: String,
    region: String,
    credentials: Box<dyn ProvideCredentials>,
}

impl HttpSsmTransport {
    /// Create a transport for `region`
    ///
    /// `endpoint_url` overrides the regional endpoint
    /// `https://ssm.<region>.amazonaws.com/` (LocalStack, VPC endpoints).
    pub fn new(
        region: impl Into<String>,
        endpoint_url: Option<&str>,
        credentials: impl ProvideCredentials + 'static,
    ) -> ParameterResult<Self> {
        let region = region.into();
        let raw = match endpoint_url {
            Some(url) => url.to_string(),
            None => Self::regional_endpoint(&region),
        };
        let endpoint = Url::parse(&raw).map_err(|e| ConfigError::InvalidEndpoint {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ConfigError::InvalidEndpoint {
                    url: raw,
                    reason: "missing host".to_string(),
                }
                .into())
            }
        };

        Ok(Self {
            http: Client::new(),
            endpoint,
            host,
            region,
            credentials: Box::new(credentials),
        })
    }

    pub fn regional_endpoint(region: &str) -> String {
        format!("https://ssm.{}.amazonaws.com/", region)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl SsmTransport for HttpSsmTransport {
    fn get_parameters(&self, request: &GetParametersRequest) -> ParameterResult<GetParametersResponse> {
        let credentials = self.credentials.provide()?.ok_or_else(|| {
            ParameterError::Credentials(
                "no AWS credentials found in the environment, shared profile files, container or instance metadata"
                    .to_string(),
            )
        })?;
        let body = serde_json::to_vec(request)?;

        let signed = sigv4::sign_request(
            &SignableRequest {
                method: "POST",
                path: self.endpoint.path(),
                headers: &[
                    ("content-type", CONTENT_TYPE_JSON),
                    ("host", self.host.as_str()),
                    ("x-amz-target", TARGET_GET_PARAMETERS),
                ],
                body: &body,
            },
            &credentials,
            &self.region,
            SERVICE,
            chrono::Utc::now(),
        );

        logging::debug(
            "ssm::transport",
            &format!("GetParameters {} name(s) via {}", request.names.len(), self.host),
        );

        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header("x-amz-target", TARGET_GET_PARAMETERS);
        for (name, value) in &signed {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(body).send().map_err(|e| {
            logging::error("ssm::transport", &format!("Request failed: {}", e));
            ParameterError::Http(e)
        })?;

        let status = response.status();
        let bytes = response.bytes()?;

        if !status.is_success() {
            let error: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
            logging::error(
                "ssm::transport",
                &format!("GetParameters returned {} {}", status.as_u16(), error.code()),
            );
            return Err(ParameterError::api(
                status.as_u16(),
                error.code(),
                error.message.clone().unwrap_or_default(),
            ));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for HttpSsmTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSsmTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .field("credentials", &self.credentials.name())
            .finish()
    }
}
