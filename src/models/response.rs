use serde::{Deserialize, Serialize};

pub const SEND_SUCCESS_MESSAGE: &str = "notification sent successfully";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl MessageResponse {
    pub fn sent() -> Self {
        Self {
            message: SEND_SUCCESS_MESSAGE.to_string(),
        }
    }
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}
