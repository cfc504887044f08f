//! Infrastructure layer

pub mod api;
