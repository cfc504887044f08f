//! Callbacks into the surrounding application

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::recipients::Recipient;

/// Behaviour owned by the host application that compose steps trigger
pub trait ComposeHooks: Send + Sync + 'static {
    /// Called once when the first To recipient of a draft is chosen.
    ///
    /// Hosts use it to advance their step indicator and to request
    /// generated content for the message.
    fn first_recipient_chosen(&self, recipient: &Recipient);

    /// Called after a successful send to drop attachments persisted for the draft
    fn clear_draft_attachments(&self);
}

/// Hooks that do nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl ComposeHooks for NoopHooks {
    fn first_recipient_chosen(&self, _recipient: &Recipient) {}

    fn clear_draft_attachments(&self) {}
}

#[cfg(test)]
mock! {
    pub ComposeHooks {}

    impl ComposeHooks for ComposeHooks {
        fn first_recipient_chosen(&self, recipient: &Recipient);
        fn clear_draft_attachments(&self);
    }
}
