//! Backend errors

use thiserror::Error;

/// Errors returned by backend calls
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with an error status
    #[error("backend rejected the request with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// The `error` field of the response body, when there is one
        message: Option<String>,
    },

    /// The request never got a response
    #[error(transparent)]
    Transport(anyhow::Error),

    /// The response body could not be decoded
    #[error("could not decode backend response: {0}")]
    Decode(anyhow::Error),
}

impl BackendError {
    /// Create a rejection error
    pub fn rejected(status: u16, message: Option<&str>) -> Self {
        BackendError::Rejected {
            status,
            message: message.map(str::to_string),
        }
    }

    /// The message the server sent back, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { message, .. } => message.as_deref(),
            BackendError::Transport(_) | BackendError::Decode(_) => None,
        }
    }
}

impl From<anyhow::Error> for BackendError {
    fn from(err: anyhow::Error) -> Self {
        BackendError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_server_message() {
        let err = BackendError::rejected(400, Some("recipient is missing"));
        assert_eq!(err.server_message(), Some("recipient is missing"));

        let err = BackendError::rejected(500, None);
        assert_eq!(err.server_message(), None);

        let err = BackendError::from(anyhow!("connection refused"));
        assert_eq!(err.server_message(), None);
    }
}
