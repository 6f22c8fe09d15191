use lombok::AllArgsConstructor;
use serde::{Deserialize, Serialize};

/// One entry of an error response body.
#[derive(Serialize, Deserialize, AllArgsConstructor, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ErrorDto {
    pub fn for_field(field: &str, message: &str) -> Self {
        Self::new(Some(field.to_owned()), message.to_owned())
    }

    pub fn general(message: &str) -> Self {
        Self::new(None, message.to_owned())
    }
}
