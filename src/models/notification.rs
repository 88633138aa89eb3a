use serde::{Deserialize, Serialize};

use crate::{error::DispatchResult, models::user::User};

/// Record published to the notifications topic.
///
/// Field declaration order fixes the encoded order: `from`, `to`, `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub message: String,
}

impl Notification {
    pub fn build(from_user: &User, to_user: &User, message: impl Into<String>) -> Self {
        Self {
            from: from_user.name.clone(),
            to: to_user.name.clone(),
            message: message.into(),
        }
    }

    pub fn to_bytes(&self) -> DispatchResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
