//! Compose errors

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::backend::BackendError;

/// Errors that abort a send attempt
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The subject is blank
    #[error("please enter a subject")]
    MissingSubject,

    /// The body is empty
    #[error("please write some content for your email")]
    MissingContent,

    /// No To recipient
    #[error("please add at least one recipient")]
    MissingRecipient,

    /// No mailbox selected to send from
    #[error("please select the email account to send from")]
    MissingSourceAccount,

    /// Scheduled send without a date and time
    #[error("please select a time and date")]
    MissingScheduleTime,

    /// Scheduled send from a provider that cannot schedule
    #[error("scheduled sending is not supported by this provider")]
    ProviderNotSupported,

    /// A send is already pending
    #[error("an email is already being sent")]
    SendInProgress,

    /// The backend refused the message or could not be reached
    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for ComposeError {
    fn from(err: BackendError) -> Self {
        debug!("BackendError -> ComposeError");

        ComposeError::Backend(err)
    }
}
