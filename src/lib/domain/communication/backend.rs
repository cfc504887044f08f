//! The product backend, as seen from the compose flow

mod errors;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    accounts::{EmailLinked, SubscriptionPlan},
    compose::Attachment,
    recipients::Recipient,
};

pub use errors::BackendError;

/// An outgoing message, ready for submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendEmailRequest {
    /// Subject line
    pub subject: String,

    /// Normalized HTML body
    pub message: String,

    /// Attached files
    pub attachments: Vec<Attachment>,

    /// Primary recipient addresses
    pub to: Vec<String>,

    /// Carbon copy addresses, omitted when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,

    /// Blind carbon copy addresses, omitted when there are none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<String>>,

    /// The linked mailbox sending the message
    pub email: String,
}

/// An outgoing message held back until `datetime`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduledEmailRequest {
    /// The message itself
    #[serde(flatten)]
    pub message: SendEmailRequest,

    /// When the message should go out
    #[serde(serialize_with = "as_iso8601")]
    pub datetime: DateTime<Utc>,
}

fn as_iso8601<S: Serializer>(datetime: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Backend endpoints used while composing
#[async_trait]
pub trait ComposeBackend: Clone + Send + Sync + 'static {
    /// Send a message now
    async fn send_email(&self, request: &SendEmailRequest) -> Result<(), BackendError>;

    /// Have the provider send a message later
    async fn send_scheduled_email(
        &self,
        request: &ScheduledEmailRequest,
    ) -> Result<(), BackendError>;

    /// The description the user wrote for one of their mailboxes
    async fn get_user_description(&self, email: &str) -> Result<String, BackendError>;

    /// The caller's subscription plan
    async fn get_plan(&self) -> Result<SubscriptionPlan, BackendError>;

    /// The caller's contact book
    async fn get_contacts(&self) -> Result<Vec<Recipient>, BackendError>;

    /// The mailboxes linked to the caller's account
    async fn get_emails_linked(&self) -> Result<Vec<EmailLinked>, BackendError>;
}

#[cfg(test)]
mock! {
    pub ComposeBackend {}

    impl Clone for ComposeBackend {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ComposeBackend for ComposeBackend {
        async fn send_email(&self, request: &SendEmailRequest) -> Result<(), BackendError>;
        async fn send_scheduled_email(&self, request: &ScheduledEmailRequest) -> Result<(), BackendError>;
        async fn get_user_description(&self, email: &str) -> Result<String, BackendError>;
        async fn get_plan(&self) -> Result<SubscriptionPlan, BackendError>;
        async fn get_contacts(&self) -> Result<Vec<Recipient>, BackendError>;
        async fn get_emails_linked(&self) -> Result<Vec<EmailLinked>, BackendError>;
    }
}
