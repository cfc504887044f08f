//! Recipient resolution for one compose session

use std::sync::Arc;

use tracing::debug;

use crate::domain::communication::{
    compose::{ComposeDraft, ComposeHooks, WizardStep},
    email_addresses::EmailAddress,
    recipients::{filter_people, Recipient, RecipientError, RecipientKind},
};

/// What happened when the recipient input lost focus
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlurOutcome {
    /// A new ad-hoc contact was created and added to the active list
    Added(Recipient),

    /// The typed address belonged to a known contact, which was selected
    Selected(Recipient),

    /// Nothing to do
    Ignored,
}

/// Keeps the contact book and routes chosen recipients into a draft
#[derive(Debug)]
pub struct RecipientResolver<H: ComposeHooks> {
    contacts: Vec<Recipient>,
    target: RecipientKind,
    hooks: Arc<H>,
}

impl<H: ComposeHooks> RecipientResolver<H> {
    /// Create a resolver over `contacts`, targeting the To list
    pub fn new(contacts: Vec<Recipient>, hooks: Arc<H>) -> Self {
        Self {
            contacts,
            target: RecipientKind::To,
            hooks,
        }
    }

    /// The contact book, including ad-hoc entries added this session
    pub fn contacts(&self) -> &[Recipient] {
        &self.contacts
    }

    /// Change the list new recipients go to
    pub fn set_target(&mut self, target: RecipientKind) {
        self.target = target;
    }

    /// Contacts matching `query`
    pub fn suggestions(&self, query: &str) -> Vec<Recipient> {
        filter_people(query, &self.contacts)
    }

    /// Add a suggestion to the active list.
    ///
    /// Returns whether it was added; an entry with the same email already in
    /// the list is left as is.
    pub fn select(&self, draft: &mut ComposeDraft, recipient: &Recipient) -> bool {
        self.add(draft, self.target, recipient.clone())
    }

    /// Handle the recipient input losing focus with `input` typed in.
    ///
    /// An unknown well-formed address becomes an ad-hoc contact in both the
    /// contact book and the active list. Text that is neither an address nor
    /// a prefix of any contact is reported as
    /// [`RecipientError::InvalidEmailFormat`] without touching anything.
    pub fn blur(
        &mut self,
        draft: &mut ComposeDraft,
        input: &str,
    ) -> Result<BlurOutcome, RecipientError> {
        let input = input.trim();

        if input.is_empty() {
            return Ok(BlurOutcome::Ignored);
        }

        let email = match EmailAddress::new(input) {
            Ok(email) => email,
            Err(err) => {
                if self.suggestions(input).is_empty() {
                    return Err(RecipientError::from_address_error(input, err));
                }

                return Ok(BlurOutcome::Ignored);
            }
        };

        if let Some(contact) = self
            .contacts
            .iter()
            .find(|c| c.email == email.as_str())
            .cloned()
        {
            self.add(draft, self.target, contact.clone());
            return Ok(BlurOutcome::Selected(contact));
        }

        let recipient = Recipient::ad_hoc(email.as_str());

        debug!(email = %email, target = %self.target, "adding ad-hoc recipient");

        self.contacts.push(recipient.clone());
        self.add(draft, self.target, recipient.clone());

        Ok(BlurOutcome::Added(recipient))
    }

    /// Remove an address from one of the lists
    pub fn remove(
        &self,
        draft: &mut ComposeDraft,
        kind: RecipientKind,
        email: &str,
    ) -> Option<Recipient> {
        draft.recipients_mut(kind).remove(email)
    }

    fn add(&self, draft: &mut ComposeDraft, kind: RecipientKind, recipient: Recipient) -> bool {
        if !draft.recipients_mut(kind).push(recipient.clone()) {
            debug!(email = %recipient.email, %kind, "recipient already present");
            return false;
        }

        if kind == RecipientKind::To && draft.step() == WizardStep::NoRecipient {
            draft.set_step(WizardStep::RecipientChosen);
            self.hooks.first_recipient_chosen(&recipient);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::function;
    use testresult::TestResult;

    use crate::domain::communication::compose::{tests::MockComposeHooks, NoopHooks};

    use super::*;

    fn contacts() -> Vec<Recipient> {
        vec![
            Recipient::new(1, "alice@example.com", "Alice Martin"),
            Recipient::new(2, "bob@example.com", "Bob"),
        ]
    }

    fn resolver() -> RecipientResolver<NoopHooks> {
        RecipientResolver::new(contacts(), Arc::new(NoopHooks))
    }

    #[test]
    fn test_blur_invalid_address_without_suggestions() {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        let result = resolver.blur(&mut draft, "not-an-email");

        assert_eq!(
            result,
            Err(RecipientError::InvalidEmailFormat("not-an-email".to_string()))
        );
        assert_eq!(resolver.contacts().len(), 2);
        assert!(draft.recipients(RecipientKind::To).is_empty());
        assert!(draft.recipients(RecipientKind::Cc).is_empty());
        assert!(draft.recipients(RecipientKind::Bcc).is_empty());
    }

    #[test]
    fn test_blur_partial_search_is_ignored() -> TestResult {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        let outcome = resolver.blur(&mut draft, "ali")?;

        assert_eq!(outcome, BlurOutcome::Ignored);
        assert!(draft.recipients(RecipientKind::To).is_empty());

        Ok(())
    }

    #[test]
    fn test_blur_empty_input_is_ignored() -> TestResult {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        assert_eq!(resolver.blur(&mut draft, "  ")?, BlurOutcome::Ignored);

        Ok(())
    }

    #[test]
    fn test_blur_new_address_adds_ad_hoc_contact() -> TestResult {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        let outcome = resolver.blur(&mut draft, " new@person.com ")?;

        let expected = Recipient::new(0, "new@person.com", "");
        assert_eq!(outcome, BlurOutcome::Added(expected.clone()));

        let added: Vec<_> = resolver
            .contacts()
            .iter()
            .filter(|c| c.email == "new@person.com")
            .collect();
        assert_eq!(added, vec![&expected]);

        let to: Vec<_> = draft.recipients(RecipientKind::To).iter().collect();
        assert_eq!(to, vec![&expected]);

        Ok(())
    }

    #[test]
    fn test_blur_known_address_selects_contact() -> TestResult {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        let outcome = resolver.blur(&mut draft, "bob@example.com")?;

        assert_eq!(outcome, BlurOutcome::Selected(contacts()[1].clone()));
        assert_eq!(resolver.contacts().len(), 2);
        assert_eq!(draft.recipients(RecipientKind::To).len(), 1);

        resolver.blur(&mut draft, "bob@example.com")?;
        assert_eq!(draft.recipients(RecipientKind::To).len(), 1);

        Ok(())
    }

    #[test]
    fn test_blur_uses_active_target() -> TestResult {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        resolver.set_target(RecipientKind::Bcc);
        resolver.blur(&mut draft, "new@person.com")?;

        assert!(draft.recipients(RecipientKind::To).is_empty());
        assert!(draft.recipients(RecipientKind::Bcc).contains("new@person.com"));
        assert_eq!(draft.step(), WizardStep::NoRecipient);

        Ok(())
    }

    #[test]
    fn test_select_dedups_by_email() {
        let resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        let alice = contacts()[0].clone();
        let same_address = Recipient::new(42, "alice@example.com", "Alice (work)");

        assert!(resolver.select(&mut draft, &alice));
        assert!(!resolver.select(&mut draft, &same_address));
        assert_eq!(draft.recipients(RecipientKind::To).len(), 1);
    }

    #[test]
    fn test_same_address_allowed_across_lists() {
        let mut resolver = resolver();
        let mut draft = ComposeDraft::new(None);
        let alice = contacts()[0].clone();

        assert!(resolver.select(&mut draft, &alice));
        resolver.set_target(RecipientKind::Cc);
        assert!(resolver.select(&mut draft, &alice));

        assert!(draft.recipients(RecipientKind::To).contains("alice@example.com"));
        assert!(draft.recipients(RecipientKind::Cc).contains("alice@example.com"));
    }

    #[test]
    fn test_first_to_recipient_fires_hook_once() {
        let mut hooks = MockComposeHooks::new();

        hooks
            .expect_first_recipient_chosen()
            .times(1)
            .with(function(|r: &Recipient| r.email == "alice@example.com"))
            .return_const(());

        let mut resolver = RecipientResolver::new(contacts(), Arc::new(hooks));
        let mut draft = ComposeDraft::new(None);

        resolver.set_target(RecipientKind::Cc);
        resolver.select(&mut draft, &contacts()[1]);
        assert_eq!(draft.step(), WizardStep::NoRecipient);

        resolver.set_target(RecipientKind::To);
        resolver.select(&mut draft, &contacts()[0]);
        resolver.select(&mut draft, &contacts()[1]);

        assert_eq!(draft.step(), WizardStep::RecipientChosen);
    }

    #[test]
    fn test_remove() {
        let resolver = resolver();
        let mut draft = ComposeDraft::new(None);

        resolver.select(&mut draft, &contacts()[0]);

        let removed = resolver.remove(&mut draft, RecipientKind::To, "alice@example.com");

        assert_eq!(removed, Some(contacts()[0].clone()));
        assert!(draft.recipients(RecipientKind::To).is_empty());
    }

    #[test]
    fn test_suggestions() {
        let resolver = resolver();

        assert_eq!(resolver.suggestions("bob"), vec![contacts()[1].clone()]);
        assert_eq!(resolver.suggestions("").len(), 2);
    }
}
