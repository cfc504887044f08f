//! Recipients of an outgoing message

mod errors;
mod resolver;

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Deserializer, Serialize};

pub use errors::RecipientError;
pub use resolver::{BlurOutcome, RecipientResolver};

/// A message recipient, usually backed by a stored contact
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Email address, the key within a recipient list
    pub email: String,

    /// Display name, empty when the contact has none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,

    /// Contact id, 0 for addresses typed in by hand
    #[serde(default)]
    pub id: u64,
}

impl Recipient {
    /// Create a recipient for a stored contact
    pub fn new(id: u64, email: &str, username: &str) -> Self {
        Self {
            email: email.to_string(),
            username: username.to_string(),
            id,
        }
    }

    /// Create a recipient for an address typed in by hand
    pub fn ad_hoc(email: &str) -> Self {
        Self::new(0, email, "")
    }

    /// The username, or one derived from the email when there is none
    pub fn display_name(&self) -> String {
        if self.username.trim().is_empty() {
            synthesize_username(&self.email)
        } else {
            self.username.clone()
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.display_name(), self.email)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Which recipient list an address goes to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecipientKind {
    /// Primary recipients
    #[default]
    To,

    /// Carbon copy
    Cc,

    /// Blind carbon copy
    Bcc,
}

impl fmt::Display for RecipientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecipientKind::To => "to",
            RecipientKind::Cc => "cc",
            RecipientKind::Bcc => "bcc",
        };

        write!(f, "{name}")
    }
}

/// An ordered list of recipients with no two entries sharing an email
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientList(Vec<Recipient>);

impl RecipientList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `recipient` unless its email is already present.
    ///
    /// Returns whether the list changed.
    pub fn push(&mut self, recipient: Recipient) -> bool {
        if self.contains(&recipient.email) {
            return false;
        }

        self.0.push(recipient);
        true
    }

    /// Remove the entry with this email, if any
    pub fn remove(&mut self, email: &str) -> Option<Recipient> {
        let index = self.0.iter().position(|r| r.email == email)?;
        Some(self.0.remove(index))
    }

    /// Whether an entry with this email is present
    pub fn contains(&self, email: &str) -> bool {
        self.0.iter().any(|r| r.email == email)
    }

    /// The email addresses, in order
    pub fn emails(&self) -> Vec<String> {
        self.0.iter().map(|r| r.email.clone()).collect()
    }

    /// Iterate over the recipients
    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.0.iter()
    }

    /// Number of recipients
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every recipient
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Derive a display name from the local part of an email address.
///
/// `jean-pierre.dupont@x.com` becomes `Jean Pierre Dupont`.
pub fn synthesize_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();

    local
        .split(['.', '-'])
        .filter(|fragment| !fragment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(fragment: &str) -> String {
    let mut chars = fragment.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Search `contacts` for `query`.
///
/// Every whitespace-separated term must appear in the lowercased username or
/// the lowercased email. An empty query matches everything. The result never
/// holds two entries with the same email; the first one wins.
pub fn filter_people(query: &str, contacts: &[Recipient]) -> Vec<Recipient> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();

    let matches = contacts.iter().filter(|contact| {
        let username = contact.username.to_lowercase();
        let email = contact.email.to_lowercase();

        terms
            .iter()
            .all(|term| username.contains(term) || email.contains(term))
    });

    dedup_by_email(matches)
}

fn dedup_by_email<'a>(recipients: impl Iterator<Item = &'a Recipient>) -> Vec<Recipient> {
    let mut seen = HashSet::new();

    recipients
        .filter(|r| seen.insert(r.email.clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn contacts() -> Vec<Recipient> {
        vec![
            Recipient::new(1, "jean-pierre.dupont@x.com", "Jean-Pierre Dupont"),
            Recipient::new(2, "alice@example.com", "Alice Martin"),
            Recipient::new(3, "alice@example.com", "Alice (work)"),
            Recipient::new(4, "bob@example.com", ""),
        ]
    }

    #[test]
    fn test_synthesize_username() {
        assert_eq!(synthesize_username("a.b-c@x.com"), "A B C");
        assert_eq!(synthesize_username("plain@x.com"), "Plain");
        assert_eq!(
            synthesize_username("jean-pierre.dupont@x.com"),
            "Jean Pierre Dupont"
        );
    }

    #[test]
    fn test_synthesize_username_skips_empty_fragments() {
        assert_eq!(synthesize_username("john..doe-@x.com"), "John Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(Recipient::ad_hoc("mary.jane@x.com").display_name(), "Mary Jane");
        assert_eq!(
            Recipient::new(9, "mj@x.com", "Mary-Jane").display_name(),
            "Mary-Jane"
        );
    }

    #[test]
    fn test_empty_query_returns_every_contact_once() {
        let result = filter_people("   ", &contacts());

        let emails: Vec<_> = result.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["jean-pierre.dupont@x.com", "alice@example.com", "bob@example.com"]
        );
        assert_eq!(result[1].username, "Alice Martin");
    }

    #[test]
    fn test_every_term_must_match() {
        let result = filter_people("alice MARTIN", &contacts());

        assert_eq!(result, vec![contacts()[1].clone()]);
    }

    #[test]
    fn test_terms_can_match_username_or_email() {
        let result = filter_people("dupont x.com", &contacts());
        assert_eq!(result.len(), 1);

        let result = filter_people("example", &contacts());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_filter_never_returns_duplicate_emails() {
        let result = filter_people("alice", &contacts());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_people("zed", &contacts()).is_empty());
    }

    #[test]
    fn test_recipient_list_dedups_by_email() {
        let mut list = RecipientList::new();

        assert!(list.push(Recipient::new(2, "alice@example.com", "Alice")));
        assert!(!list.push(Recipient::ad_hoc("alice@example.com")));
        assert!(list.push(Recipient::ad_hoc("bob@example.com")));

        assert_eq!(list.len(), 2);
        assert_eq!(list.emails(), vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_recipient_list_remove() {
        let mut list = RecipientList::new();
        list.push(Recipient::ad_hoc("alice@example.com"));

        assert!(list.remove("bob@example.com").is_none());
        assert_eq!(
            list.remove("alice@example.com"),
            Some(Recipient::ad_hoc("alice@example.com"))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn test_deserialize_contact_with_null_username() -> TestResult {
        let recipient: Recipient = serde_json::from_value(json!({
            "id": 7,
            "username": null,
            "email": "bob@example.com",
        }))?;

        assert_eq!(recipient, Recipient::new(7, "bob@example.com", ""));

        Ok(())
    }
}
