//! SSM-backed parameter client

use std::sync::Arc;

use super::credentials::DefaultCredentialsChain;
use super::transport::{HttpSsmTransport, SsmTransport};
use super::types::GetParametersRequest;
use crate::client::{ParameterClient, ParameterError, ParameterMap, ParameterResult};
use crate::config::StoreSettings;

/// Parameter client for AWS Systems Manager Parameter Store
///
/// Every non-empty fetch is one `GetParameters` call with
/// `WithDecryption: true`, so SecureString values come back in plaintext.
///
/// The SSM API caps `GetParameters` at 10 names; larger batches are sent
/// as-is and the API's validation error is returned to the caller.
pub struct SsmParameterClient {
    transport: Arc<dyn SsmTransport>,
}

impl SsmParameterClient {
    pub fn new(transport: Arc<dyn SsmTransport>) -> Self {
        Self { transport }
    }

    /// Build an HTTPS client from settings
    ///
    /// Credentials come from the default chain and are resolved when a fetch
    /// is made, not here.
    pub fn from_settings(settings: &StoreSettings) -> ParameterResult<Self> {
        let transport = HttpSsmTransport::new(
            settings.region.clone(),
            settings.endpoint_url.as_deref(),
            DefaultCredentialsChain::new()?,
        )?;
        Ok(Self::new(Arc::new(transport)))
    }
}

impl ParameterClient for SsmParameterClient {
    fn name(&self) -> &str {
        "ssm"
    }

    fn fetch(&self, names: &[String]) -> ParameterResult<ParameterMap> {
        if names.is_empty() {
            return Ok(ParameterMap::new());
        }

        let request = GetParametersRequest::new(names.to_vec());
        let response = self.transport.get_parameters(&request)?;

        if !response.invalid_parameters.is_empty() {
            return Err(ParameterError::InvalidParameters(response.invalid_parameters));
        }

        Ok(response
            .parameters
            .into_iter()
            .map(|param| (param.name, param.value))
            .collect())
    }
}

impl std::fmt::Debug for SsmParameterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ssm::types::{GetParametersResponse, Parameter};
    use std::sync::Mutex;

    /// Answers every name with the name itself and records each request
    #[derive(Default)]
    struct EchoTransport {
        requests: Mutex<Vec<GetParametersRequest>>,
        invalid: Vec<String>,
    }

    impl EchoTransport {
        fn requests(&self) -> Vec<GetParametersRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl SsmTransport for EchoTransport {
        fn get_parameters(&self, request: &GetParametersRequest) -> ParameterResult<GetParametersResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(GetParametersResponse {
                parameters: request
                    .names
                    .iter()
                    .filter(|name| !self.invalid.contains(name))
                    .map(|name| Parameter {
                        name: name.clone(),
                        value: name.clone(),
                        kind: Some("SecureString".to_string()),
                        version: Some(1),
                        arn: None,
                        data_type: Some("text".to_string()),
                    })
                    .collect(),
                invalid_parameters: self.invalid.clone(),
            })
        }
    }

    struct DeniedTransport;

    impl SsmTransport for DeniedTransport {
        fn get_parameters(&self, _request: &GetParametersRequest) -> ParameterResult<GetParametersResponse> {
            Err(ParameterError::api(400, "AccessDeniedException", "not authorized"))
        }
    }

    #[test]
    fn test_fetch_single() {
        let client = SsmParameterClient::new(Arc::new(EchoTransport::default()));
        let values = client.fetch(&["/test/value".to_string()]).unwrap();
        assert_eq!(values["/test/value"], "/test/value");
    }

    #[test]
    fn test_fetch_batches_with_decryption() {
        let transport = Arc::new(EchoTransport::default());
        let client = SsmParameterClient::new(transport.clone());

        let values = client
            .fetch(&["/test/value".to_string(), "/test/value2".to_string()])
            .unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["/test/value2"], "/test/value2");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].with_decryption);
        assert_eq!(requests[0].names, vec!["/test/value", "/test/value2"]);
    }

    #[test]
    fn test_fetch_empty_makes_no_request() {
        let transport = Arc::new(EchoTransport::default());
        let client = SsmParameterClient::new(transport.clone());

        assert!(client.fetch(&[]).unwrap().is_empty());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_invalid_parameters_fail_the_batch() {
        let transport = Arc::new(EchoTransport {
            invalid: vec!["/nope".to_string()],
            ..Default::default()
        });
        let client = SsmParameterClient::new(transport);

        let err = client
            .fetch(&["/ok".to_string(), "/nope".to_string()])
            .unwrap_err();

        assert!(err.is_missing());
        assert!(matches!(err, ParameterError::InvalidParameters(ref names) if names == &["/nope"]));
    }

    #[test]
    fn test_api_errors_pass_through() {
        let client = SsmParameterClient::new(Arc::new(DeniedTransport));
        let err = client.fetch(&["/a".to_string()]).unwrap_err();
        assert!(matches!(err, ParameterError::Api { status: 400, ref code, .. } if code == "AccessDeniedException"));
    }

    #[test]
    fn test_name() {
        assert_eq!(SsmParameterClient::new(Arc::new(DeniedTransport)).name(), "ssm");
    }

    #[test]
    fn test_fetch_over_http() {
        use crate::client::ssm::credentials::AwsCredentials;
        use crate::client::ssm::test_server::TestServer;

        let server = TestServer::start(vec![(
            200,
            r#"{"Parameters":[{"Name":"/svc/token","Value":"abc"},{"Name":"/svc/url","Value":"https://svc"}],"InvalidParameters":[]}"#,
        )]);
        let transport = HttpSsmTransport::new(
            "ap-northeast-1",
            Some(&server.url()),
            AwsCredentials::new("AKIDEXAMPLE", "secret"),
        )
        .unwrap();
        let client = SsmParameterClient::new(Arc::new(transport));

        let values = client
            .fetch(&["/svc/token".to_string(), "/svc/url".to_string()])
            .unwrap();

        assert_eq!(values["/svc/token"], "abc");
        assert_eq!(values["/svc/url"], "https://svc");
        assert_eq!(server.requests().len(), 1);
    }
}
