use thiserror::Error;

/// Errors returned by peer service clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The peer answered that the requested resource does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// The peer could not be reached, timed out, or answered with a failure.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },
}

impl ClientError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ClientError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unavailable(service: &'static str, reason: impl Into<String>) -> Self {
        ClientError::Unavailable {
            service,
            reason: reason.into(),
        }
    }

    /// Returns true if the peer reported a definite absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

/// Result type for client calls.
pub type Result<T> = std::result::Result<T, ClientError>;
