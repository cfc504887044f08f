//! REST backend access

mod client;

use clap::Parser;

pub use client::ApiClient;

/// Backend API configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct ApiConfig {
    /// Base URL of the backend API
    #[clap(long, env = "API_BASE_URL", default_value = "http://localhost:8000/MailAssistant")]
    pub base_url: String,

    /// Bearer token of the signed-in user
    #[clap(long, env = "API_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Request timeout in seconds
    #[clap(long, env = "API_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}
