//! Composing and sending email

pub mod accounts;
pub mod backend;
pub mod compose;
pub mod email_addresses;
pub mod notifications;
pub mod recipients;
pub mod session;
