use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response, Json},
};
use reward_core::{ErrorKind, RewardError};
use serde::Serialize;
use std::any::Any;
use tracing::{error, warn};

/// Error body returned by every endpoint.
/// The watch-time fields are only present on watch-time rejections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub r#type: String,
    #[serde(skip)]
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_required: Option<u32>,
}

impl ErrorResponse {
    pub fn new(message: String, kind: ErrorKind) -> Self {
        Self {
            error: message,
            r#type: kind.as_str().to_string(),
            kind,
            watch_time: None,
            elapsed_time: None,
            minimum_required: None,
        }
    }

    pub fn invalid_request(message: String) -> Self {
        Self::new(message, ErrorKind::InvalidArgument)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(message, ErrorKind::Internal)
    }

    fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Gone => StatusCode::GONE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RewardError> for ErrorResponse {
    fn from(err: RewardError) -> Self {
        let mut response = ErrorResponse::new(err.to_string(), err.kind());
        match err {
            RewardError::InsufficientWatchTime {
                watch_time,
                minimum_required,
            } => {
                response.watch_time = Some(watch_time);
                response.minimum_required = Some(minimum_required);
            }
            RewardError::TooFast {
                elapsed_secs,
                minimum_required,
            } => {
                response.elapsed_time = Some(elapsed_secs);
                response.minimum_required = Some(minimum_required);
            }
            RewardError::Internal(ref message) => {
                error!("Internal error: {}", message);
            }
            _ => {}
        }
        response
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Custom JSON extractor that returns our ErrorResponse on deserialization failures
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorResponse))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        warn!("JSON deserialization error: {}", message);
        ErrorResponse::invalid_request(message)
    }
}

/// Router fallback for unknown paths
pub async fn handle_not_found(uri: Uri) -> ErrorResponse {
    warn!("No route for {}", uri);
    ErrorResponse::new(format!("no route for {}", uri.path()), ErrorKind::NotFound)
}

/// Used by `CatchPanicLayer` so a panicking handler still answers with JSON
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);
    ErrorResponse::internal_error("Internal server error".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (RewardError::MissingField("pageKey".into()), StatusCode::BAD_REQUEST),
            (RewardError::NotFound("s".into()), StatusCode::NOT_FOUND),
            (RewardError::PageKeyMismatch("s".into()), StatusCode::FORBIDDEN),
            (RewardError::AlreadyConfirmed("s".into()), StatusCode::CONFLICT),
            (RewardError::Expired("s".into()), StatusCode::GONE),
            (RewardError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn watch_time_rejection_carries_diagnostics() {
        let err = RewardError::InsufficientWatchTime {
            watch_time: 29.0,
            minimum_required: 30,
        };
        let body = serde_json::to_value(ErrorResponse::from(err)).unwrap();

        assert_eq!(body["watchTime"], 29.0);
        assert_eq!(body["minimumRequired"], 30);
        assert!(body.get("elapsedTime").is_none());
        assert!(body.get("kind").is_none());
    }

    #[test]
    fn type_names_and_statuses_agree() {
        let kinds = [
            (ErrorKind::InvalidArgument, StatusCode::BAD_REQUEST),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::Forbidden, StatusCode::FORBIDDEN),
            (ErrorKind::Conflict, StatusCode::CONFLICT),
            (ErrorKind::Gone, StatusCode::GONE),
            (ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in kinds {
            let response = ErrorResponse::new("x".to_string(), kind);
            assert_eq!(response.r#type, kind.as_str());
            assert_eq!(response.into_response().status(), status);
        }
    }

    #[test]
    fn panic_response_is_500() {
        let response = panic_response(Box::new("handler blew up"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
