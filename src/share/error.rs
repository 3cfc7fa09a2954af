//! Error types for share creation.

use thiserror::Error;

/// Errors that can occur while building or submitting a share.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// The expiration token does not match `never` or `[+]<n><H|d|w|M>`.
    #[error("invalid duration token: {token:?}")]
    InvalidDurationToken { token: String },

    /// A required request field is empty.
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// The share service answered with a failure.
    #[error("share service error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The share service could not be reached.
    #[error("failed to reach share service: {message}")]
    Transport { message: String },

    /// The share service answered with something that is not a share.
    #[error("invalid response from share service: {message}")]
    InvalidResponse { message: String },

    /// A submission is already in flight for this builder.
    #[error("a share submission is already pending")]
    AlreadyPending,

    /// This builder already created its share; initialize it again for another.
    #[error("the share has already been created")]
    AlreadyCreated,
}

impl ShareError {
    /// Create an invalid duration token error.
    pub fn invalid_duration_token(token: impl Into<String>) -> Self {
        Self::InvalidDurationToken {
            token: token.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a remote error.
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Validation errors block submission and are shown inline.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDurationToken { .. } | Self::MissingField { .. }
        )
    }

    /// Remote errors come back from the create call; the user may retry.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. } | Self::Transport { .. } | Self::InvalidResponse { .. }
        )
    }
}

/// Result type for share operations.
pub type ShareResult<T> = Result<T, ShareError>;
