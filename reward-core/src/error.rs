use thiserror::Error;

/// Coarse error categories, one per transport status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Forbidden,
    Conflict,
    Gone,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Gone => "gone",
            ErrorKind::Internal => "internal_error",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewardError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("insufficient watch time ({watch_time}s/{minimum_required}s minimum required)")]
    InsufficientWatchTime { watch_time: f64, minimum_required: u32 },

    #[error("confirmation too fast ({elapsed_secs}s/{minimum_required}s minimum required)")]
    TooFast { elapsed_secs: i64, minimum_required: u32 },

    #[error("session not found or expired: {0}")]
    NotFound(String),

    #[error("pageKey does not match session {0}")]
    PageKeyMismatch(String),

    #[error("session {0} has already been confirmed")]
    AlreadyConfirmed(String),

    #[error("session {0} has expired")]
    Expired(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RewardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RewardError::MissingField(_)
            | RewardError::InsufficientWatchTime { .. }
            | RewardError::TooFast { .. } => ErrorKind::InvalidArgument,
            RewardError::NotFound(_) => ErrorKind::NotFound,
            RewardError::PageKeyMismatch(_) => ErrorKind::Forbidden,
            RewardError::AlreadyConfirmed(_) => ErrorKind::Conflict,
            RewardError::Expired(_) => ErrorKind::Gone,
            RewardError::Internal(_) => ErrorKind::Internal,
        }
    }
}
