//! A compose session: contacts, draft, resolver and orchestrator together

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::communication::{
    accounts::{EmailLinked, SubscriptionPlan},
    backend::{BackendError, ComposeBackend},
    compose::{ComposeDraft, ComposeError, ComposeHooks, SendOrchestrator},
    notifications::{NotificationKind, Notifier},
    recipients::{BlurOutcome, Recipient, RecipientError, RecipientKind, RecipientResolver},
};

/// Everything needed to write and send one message
#[derive(Debug)]
pub struct ComposeSession<B, H>
where
    B: ComposeBackend,
    H: ComposeHooks,
{
    backend: Arc<B>,
    notifier: Notifier,
    accounts: Vec<EmailLinked>,
    resolver: RecipientResolver<H>,
    orchestrator: SendOrchestrator<B, H>,

    /// The message being written
    pub draft: ComposeDraft,
}

impl<B, H> ComposeSession<B, H>
where
    B: ComposeBackend,
    H: ComposeHooks,
{
    /// Start a session, fetching contacts and linked mailboxes.
    ///
    /// The draft sends from `preferred_account` when it is linked, otherwise
    /// from the first linked mailbox, otherwise from nothing.
    pub async fn load(
        backend: Arc<B>,
        hooks: Arc<H>,
        notifier: Notifier,
        preferred_account: Option<&str>,
    ) -> Result<Self, BackendError> {
        let contacts = backend.get_contacts().await?;
        let accounts = backend.get_emails_linked().await?;

        debug!(
            contacts = contacts.len(),
            accounts = accounts.len(),
            "loaded compose session"
        );

        let account = preferred_account
            .and_then(|email| accounts.iter().find(|a| a.email == email))
            .or_else(|| accounts.first())
            .cloned();

        if let Some(account) = &account {
            info!(account = %account.email, provider = %account.type_api, "composing");
        }

        Ok(Self {
            resolver: RecipientResolver::new(contacts, Arc::clone(&hooks)),
            orchestrator: SendOrchestrator::new(Arc::clone(&backend), hooks, notifier.clone()),
            draft: ComposeDraft::new(account),
            accounts,
            backend,
            notifier,
        })
    }

    /// Mailboxes the user can send from
    pub fn accounts(&self) -> &[EmailLinked] {
        &self.accounts
    }

    /// Switch the sending mailbox. Returns false if `email` is not linked.
    pub fn use_account(&mut self, email: &str) -> bool {
        match self.accounts.iter().find(|a| a.email == email) {
            Some(account) => {
                self.draft.set_account(Some(account.clone()));
                true
            }
            None => false,
        }
    }

    /// Change the list new recipients go to
    pub fn set_target(&mut self, target: RecipientKind) {
        self.resolver.set_target(target);
    }

    /// Contacts matching `query`
    pub fn suggestions(&self, query: &str) -> Vec<Recipient> {
        self.resolver.suggestions(query)
    }

    /// Add a suggestion to the active list
    pub fn select(&mut self, recipient: &Recipient) -> bool {
        self.resolver.select(&mut self.draft, recipient)
    }

    /// Commit typed text as a recipient, notifying on a malformed address
    pub fn blur(&mut self, input: &str) -> Result<BlurOutcome, RecipientError> {
        let result = self.resolver.blur(&mut self.draft, input);

        if let Err(err) = &result {
            self.notifier.show(NotificationKind::Error, &err.to_string());
        }

        result
    }

    /// Whether the draft's mailbox can schedule messages
    pub fn can_schedule(&self) -> bool {
        SendOrchestrator::<B, H>::can_schedule(self.draft.account())
    }

    /// Send the draft now
    pub async fn send(&mut self) -> Result<(), ComposeError> {
        self.orchestrator.send(&mut self.draft).await
    }

    /// Send the draft at `at`
    pub async fn send_scheduled(&mut self, at: Option<DateTime<Utc>>) -> Result<(), ComposeError> {
        self.orchestrator.send_scheduled(&mut self.draft, at).await
    }

    /// The user description attached to the sending mailbox
    pub async fn user_description(&self) -> Result<Option<String>, BackendError> {
        match self.draft.account() {
            Some(account) => Ok(Some(self.backend.get_user_description(&account.email).await?)),
            None => Ok(None),
        }
    }

    /// The caller's subscription plan
    pub async fn plan(&self) -> Result<SubscriptionPlan, BackendError> {
        self.backend.get_plan().await
    }

    /// The notifier publishing this session's outcomes
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
