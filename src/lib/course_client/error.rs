use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of a remote call, as far as the client cares about them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("invalid data: {0}")]
    Validation(String),
    #[error("request failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Maps an unsuccessful response to an error. `login` tells whether the request
    /// went to the login endpoint, where a rejected body means bad credentials.
    pub fn from_status(status: StatusCode, body: String, login: bool) -> Self {
        match status {
            StatusCode::BAD_REQUEST if login => ApiError::Auth(body),
            StatusCode::BAD_REQUEST => ApiError::Validation(body),
            StatusCode::UNAUTHORIZED => ApiError::Auth(body),
            StatusCode::FORBIDDEN => ApiError::Permission(body),
            StatusCode::NOT_FOUND => ApiError::NotFound(body),
            other => ApiError::Transport(format!("{}: {}", other, body)),
        }
    }

    /// Missing and inaccessible resources are shown the same way.
    pub fn is_denied(&self) -> bool {
        matches!(self, ApiError::NotFound(_) | ApiError::Permission(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::Auth(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Permission(_) => 403,
            ApiError::Validation(_) => 400,
            ApiError::Transport(_) => 0,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Content of the `errors` slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: u16,
    pub msg: String,
}

impl From<&ApiError> for ErrorPayload {
    fn from(err: &ApiError) -> Self {
        ErrorPayload {
            status: err.status(),
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/error.rs"]
mod tests;
