use std::{error::Error as StdError, num::ParseIntError};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::response::ErrorResponse;

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Every way a single dispatch can fail.
///
/// Each variant maps to exactly one HTTP status at the handler boundary, see
/// [`DispatchError::status_code`].
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to parse {field} from form value '{value}': {source}")]
    Validation {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("user not found: {id}")]
    UserNotFound { id: i64 },

    #[error("failed to serialize notification: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to publish notification: {source}")]
    Publish {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl DispatchError {
    pub fn publish(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        DispatchError::Publish {
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Validation { .. }
            | DispatchError::UserNotFound { .. }
            | DispatchError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            DispatchError::Serialization(_) | DispatchError::Publish { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        let source = "abc".parse::<i64>().unwrap_err();
        let validation = DispatchError::Validation {
            field: "fromID",
            value: "abc".to_string(),
            source,
        };
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert!(validation.is_client_error());

        let not_found = DispatchError::UserNotFound { id: 9 };
        assert_eq!(not_found.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(not_found.to_string(), "user not found: 9");
    }

    #[test]
    fn broker_failures_map_to_server_error() {
        let err = DispatchError::publish("Broker: Unknown topic or partition");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());
        assert_eq!(
            err.to_string(),
            "failed to publish notification: Broker: Unknown topic or partition"
        );
    }

    #[test]
    fn broker_cause_is_kept_as_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DispatchError::publish(cause);

        let source = err.source().expect("publish error keeps its cause");
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn serialization_failures_map_to_server_error() {
        let source = serde_json::from_str::<i64>("not json").unwrap_err();
        let err = DispatchError::from(source);

        assert!(matches!(err, DispatchError::Serialization(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = DispatchError::MalformedBody("Error parsing `multipart/form-data` request".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_message_names_field_and_value() {
        let source = "1.5".parse::<i64>().unwrap_err();
        let err = DispatchError::Validation {
            field: "toID",
            value: "1.5".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "failed to parse toID from form value '1.5': invalid digit found in string"
        );
    }
}
