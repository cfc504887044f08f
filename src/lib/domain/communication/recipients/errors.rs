//! Recipient errors

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::email_addresses::EmailAddressError;

/// Errors raised while editing recipients
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipientError {
    /// Typed text is neither an address nor the start of a known contact
    #[error("invalid email format: \"{0}\"")]
    InvalidEmailFormat(String),
}

impl RecipientError {
    pub(crate) fn from_address_error(input: &str, err: EmailAddressError) -> Self {
        debug!("EmailAddressError -> RecipientError: {err}");

        RecipientError::InvalidEmailFormat(input.trim().to_string())
    }
}
