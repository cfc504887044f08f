//! Compose draft

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Serialize, Serializer};
use tracing::debug;
use uuid::Uuid;

use crate::domain::communication::{
    accounts::EmailLinked,
    recipients::{RecipientKind, RecipientList},
};

/// Progress of the compose wizard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WizardStep {
    /// No recipient chosen yet
    #[default]
    NoRecipient,

    /// A recipient was chosen and content was requested
    RecipientChosen,
}

impl WizardStep {
    /// Numeric step shown by step indicators
    pub fn index(&self) -> u8 {
        match self {
            WizardStep::NoRecipient => 0,
            WizardStep::RecipientChosen => 1,
        }
    }
}

/// A file attached to a draft
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// File name
    pub name: String,

    /// MIME type, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// File contents
    #[serde(serialize_with = "as_base64")]
    pub content: Vec<u8>,
}

impl Attachment {
    /// Create an attachment from in-memory contents
    pub fn new(name: &str, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_type: None,
            content,
        }
    }

    /// Set the MIME type
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Read an attachment from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read attachment {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Ok(Self::new(&name, content))
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.content.len())
            .finish()
    }
}

fn as_base64<S: Serializer>(content: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(content))
}

/// The message being written in one compose session
#[derive(Clone, Debug)]
pub struct ComposeDraft {
    id: Uuid,

    /// Subject line
    pub subject: String,

    /// HTML body as produced by the editor
    pub body: String,

    /// Attached files, in order
    pub attachments: Vec<Attachment>,

    to: RecipientList,
    cc: RecipientList,
    bcc: RecipientList,
    account: Option<EmailLinked>,
    step: WizardStep,
}

impl ComposeDraft {
    /// Create an empty draft sending from `account`
    pub fn new(account: Option<EmailLinked>) -> Self {
        Self {
            id: Uuid::now_v7(),
            subject: String::new(),
            body: String::new(),
            attachments: Vec::new(),
            to: RecipientList::new(),
            cc: RecipientList::new(),
            bcc: RecipientList::new(),
            account,
            step: WizardStep::default(),
        }
    }

    /// Draft id, used to correlate log lines
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// One of the three recipient lists
    pub fn recipients(&self, kind: RecipientKind) -> &RecipientList {
        match kind {
            RecipientKind::To => &self.to,
            RecipientKind::Cc => &self.cc,
            RecipientKind::Bcc => &self.bcc,
        }
    }

    pub(crate) fn recipients_mut(&mut self, kind: RecipientKind) -> &mut RecipientList {
        match kind {
            RecipientKind::To => &mut self.to,
            RecipientKind::Cc => &mut self.cc,
            RecipientKind::Bcc => &mut self.bcc,
        }
    }

    /// The mailbox the message is sent from
    pub fn account(&self) -> Option<&EmailLinked> {
        self.account.as_ref()
    }

    /// Change the mailbox the message is sent from
    pub fn set_account(&mut self, account: Option<EmailLinked>) {
        self.account = account;
    }

    /// Current wizard step
    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub(crate) fn set_step(&mut self, step: WizardStep) {
        self.step = step;
    }

    /// Empty every field except the sending account
    pub fn reset(&mut self) {
        debug!(draft = %self.id, "resetting draft");

        self.subject.clear();
        self.body.clear();
        self.attachments.clear();
        self.to.clear();
        self.cc.clear();
        self.bcc.clear();
        self.step = WizardStep::NoRecipient;
    }
}
