//! Linked mailboxes and subscription plans

use std::fmt;

use serde::{Deserialize, Serialize};

/// The provider behind a linked mailbox
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Gmail
    Google,

    /// Outlook / Microsoft Graph
    Microsoft,

    /// A server-configured IMAP mailbox
    Imap,

    /// Any provider this client does not know about
    #[serde(other)]
    Other,
}

impl Provider {
    /// Whether the provider can hold a message back until a given time
    pub fn supports_scheduled_send(&self) -> bool {
        matches!(self, Provider::Microsoft)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Google => "google",
            Provider::Microsoft => "microsoft",
            Provider::Imap => "imap",
            Provider::Other => "other",
        };

        write!(f, "{name}")
    }
}

/// A mailbox linked to the user's account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLinked {
    /// The mailbox address
    pub email: String,

    /// The provider hosting the mailbox
    pub type_api: Provider,

    /// Whether the mailbox was configured by hand (IMAP/SMTP) rather than OAuth
    #[serde(default)]
    pub is_server_config: bool,
}

impl EmailLinked {
    /// Create a linked mailbox entry
    pub fn new(email: &str, type_api: Provider) -> Self {
        Self {
            email: email.to_string(),
            type_api,
            is_server_config: false,
        }
    }
}

/// The caller's subscription plan
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    /// Plan name
    pub plan: String,

    /// Whether the plan is a free trial
    #[serde(default)]
    pub is_trial: bool,

    /// Whether the plan is currently active
    #[serde(default)]
    pub is_active: bool,
}
