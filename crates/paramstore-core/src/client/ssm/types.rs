//! SSM `GetParameters` wire types (AWS JSON 1.1 protocol)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParametersRequest {
    pub names: Vec<String>,
    pub with_decryption: bool,
}

impl GetParametersRequest {
    /// Request for `names` with SecureString decryption enabled
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            with_decryption: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParametersResponse {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Requested names the store does not hold
    #[serde(default)]
    pub invalid_parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    pub value: String,
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default, rename = "ARN")]
    pub arn: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, rename = "__type")]
    pub kind: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Error code without the `namespace#` prefix some services add
    pub fn code(&self) -> &str {
        match self.kind.as_deref() {
            Some(kind) => kind.rsplit('#').next().unwrap_or(kind),
            None => "UnknownError",
        }
    }
}
