//! Compose draft and send orchestration

mod body;
mod draft;
mod errors;
mod hooks;
mod service;

pub use body::{body_from_text, is_empty_body, normalize_body, EMPTY_EDITOR};
pub use draft::{Attachment, ComposeDraft, WizardStep};
pub use errors::ComposeError;
pub use hooks::{ComposeHooks, NoopHooks};
pub use service::{SendOrchestrator, GENERIC_SEND_FAILURE};

#[cfg(test)]
pub mod tests {
    //! Compose test doubles

    pub use super::hooks::MockComposeHooks;
}
