use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

/// Failure of a single data-access call.
///
/// An empty result set is never a `FetchError`; callers get `Ok(vec![])`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `NotFound` for a 404, `Internal` for 5xx, `Unknown` otherwise; `None`
    /// for failures that never got a response.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(ErrorCode::NotFound)
    }

    pub(crate) fn from_api(status: u16, exception: ApiException) -> Self {
        Self::Status {
            status,
            code: exception.code,
            message: exception.message,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::Decode(value.to_string());
        }
        if let Some(status) = value.status() {
            return Self::Status {
                status: status.as_u16(),
                code: ErrorCode::from_status(status.as_u16()),
                message: value.to_string(),
            };
        }
        Self::Transport(value.to_string())
    }
}
