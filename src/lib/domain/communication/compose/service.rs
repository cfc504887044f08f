//! Send orchestration

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::communication::{
    accounts::EmailLinked,
    backend::{ComposeBackend, ScheduledEmailRequest, SendEmailRequest},
    compose::{is_empty_body, normalize_body, ComposeDraft, ComposeError, ComposeHooks},
    notifications::{NotificationKind, Notifier},
    recipients::RecipientKind,
};

/// Shown when the backend gives no reason for a failed send
pub const GENERIC_SEND_FAILURE: &str = "Failed to send email";

/// Validates drafts and hands them to the backend
#[derive(Debug)]
pub struct SendOrchestrator<B, H>
where
    B: ComposeBackend,
    H: ComposeHooks,
{
    backend: Arc<B>,
    hooks: Arc<H>,
    notifier: Notifier,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B, H> SendOrchestrator<B, H>
where
    B: ComposeBackend,
    H: ComposeHooks,
{
    /// Create a new orchestrator
    pub fn new(backend: Arc<B>, hooks: Arc<H>, notifier: Notifier) -> Self {
        Self {
            backend,
            hooks,
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether messages from `account` can be scheduled
    pub fn can_schedule(account: Option<&EmailLinked>) -> bool {
        account.is_some_and(|a| a.type_api.supports_scheduled_send())
    }

    /// Whether a send is pending
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Check a draft is ready to go, returning the sending mailbox.
    ///
    /// Checks run in order: subject, content, recipients, sending account.
    pub fn validate(draft: &ComposeDraft) -> Result<&EmailLinked, ComposeError> {
        if draft.subject.trim().is_empty() {
            return Err(ComposeError::MissingSubject);
        }

        if is_empty_body(&draft.body) {
            return Err(ComposeError::MissingContent);
        }

        if draft.recipients(RecipientKind::To).is_empty() {
            return Err(ComposeError::MissingRecipient);
        }

        draft.account().ok_or(ComposeError::MissingSourceAccount)
    }

    /// Build the submission for a valid draft
    pub fn build_request(draft: &ComposeDraft) -> Result<SendEmailRequest, ComposeError> {
        let account = Self::validate(draft)?;

        let optional = |kind| {
            let list = draft.recipients(kind);
            (!list.is_empty()).then(|| list.emails())
        };

        Ok(SendEmailRequest {
            subject: draft.subject.trim().to_string(),
            message: normalize_body(&draft.body),
            attachments: draft.attachments.clone(),
            to: draft.recipients(RecipientKind::To).emails(),
            cc: optional(RecipientKind::Cc),
            bcc: optional(RecipientKind::Bcc),
            email: account.email.clone(),
        })
    }

    /// Send the draft now.
    ///
    /// On success the draft is reset; on failure it is left untouched. Either
    /// way the outcome is published as a notification.
    pub async fn send(&self, draft: &mut ComposeDraft) -> Result<(), ComposeError> {
        let result = self.try_send(draft).await;

        self.report(&result, "Email sent successfully");

        result
    }

    /// Have the provider send the draft at `at`.
    ///
    /// Only mailboxes whose provider supports it can schedule; that is checked
    /// before anything else.
    pub async fn send_scheduled(
        &self,
        draft: &mut ComposeDraft,
        at: Option<DateTime<Utc>>,
    ) -> Result<(), ComposeError> {
        let result = self.try_send_scheduled(draft, at).await;

        self.report(&result, "Email scheduled successfully");

        result
    }

    async fn try_send(&self, draft: &mut ComposeDraft) -> Result<(), ComposeError> {
        let _guard = self.begin()?;

        let request = Self::build_request(draft)?;

        debug!(draft = %draft.id(), to = ?request.to, "sending email");

        self.backend.send_email(&request).await?;

        info!(draft = %draft.id(), from = %request.email, "email sent");

        self.finish(draft);

        Ok(())
    }

    async fn try_send_scheduled(
        &self,
        draft: &mut ComposeDraft,
        at: Option<DateTime<Utc>>,
    ) -> Result<(), ComposeError> {
        if !Self::can_schedule(draft.account()) {
            return Err(ComposeError::ProviderNotSupported);
        }

        let _guard = self.begin()?;

        let message = Self::build_request(draft)?;
        let datetime = at.ok_or(ComposeError::MissingScheduleTime)?;

        debug!(draft = %draft.id(), %datetime, "scheduling email");

        self.backend
            .send_scheduled_email(&ScheduledEmailRequest { message, datetime })
            .await?;

        info!(draft = %draft.id(), %datetime, "email scheduled");

        self.finish(draft);

        Ok(())
    }

    fn begin(&self) -> Result<InFlight<'_>, ComposeError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ComposeError::SendInProgress)?;

        Ok(InFlight(&self.in_flight))
    }

    fn finish(&self, draft: &mut ComposeDraft) {
        draft.reset();
        self.hooks.clear_draft_attachments();
    }

    fn report(&self, result: &Result<(), ComposeError>, success: &str) {
        match result {
            Ok(()) => self.notifier.show(NotificationKind::Success, success),
            Err(ComposeError::Backend(err)) => {
                warn!("send failed: {err}");

                self.notifier.show(
                    NotificationKind::Error,
                    err.server_message().unwrap_or(GENERIC_SEND_FAILURE),
                );
            }
            Err(err) => self.notifier.show(NotificationKind::Error, &err.to_string()),
        }
    }
}
