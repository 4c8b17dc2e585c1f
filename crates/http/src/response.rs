//! Success envelope shared by every module endpoint

use serde::Serialize;

/// Status marker carried by every success body.
pub const SUCCESS_STATUS: &str = "success";

/// `{"status": "success", "message"?: ..., "data"?: ...}`
#[derive(Debug, Serialize)]
pub struct Success<T = ()> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Success<T> {
    /// Envelope carrying only a payload
    pub fn data(data: T) -> Self {
        Self {
            status: SUCCESS_STATUS,
            message: None,
            data: Some(data),
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Success<()> {
    /// Envelope carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS_STATUS,
            message: Some(message.into()),
            data: None,
        }
    }
}
