#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Command-line email composer

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use mail_compose::{
    domain::communication::{
        compose::{body_from_text, Attachment, ComposeHooks},
        notifications::Notifier,
        recipients::{BlurOutcome, Recipient, RecipientKind},
        session::ComposeSession,
    },
    infrastructure::api::{ApiClient, ApiConfig},
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The backend API configuration
    #[clap(flatten)]
    pub api: ApiConfig,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send an email, now or at a given time
    Send(SendArgs),

    /// Search the contact book
    Contacts {
        /// Search terms, all of which must match
        query: Vec<String>,
    },

    /// List the mailboxes linked to the account
    Accounts,

    /// Show the subscription plan
    Plan,
}

/// Arguments of `send`
#[derive(Debug, clap::Args)]
pub struct SendArgs {
    /// Linked mailbox to send from, defaults to the first one
    #[arg(long)]
    pub from: Option<String>,

    /// Primary recipients
    #[arg(long, value_delimiter = ',', required = true)]
    pub to: Vec<String>,

    /// Carbon copy recipients
    #[arg(long, value_delimiter = ',')]
    pub cc: Vec<String>,

    /// Blind carbon copy recipients
    #[arg(long, value_delimiter = ',')]
    pub bcc: Vec<String>,

    /// Subject line
    #[arg(long, short)]
    pub subject: String,

    /// Message text, one paragraph per line
    #[arg(long, short)]
    pub body: String,

    /// Files to attach
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,

    /// Send at this time (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct LogHooks;

impl ComposeHooks for LogHooks {
    fn first_recipient_chosen(&self, recipient: &Recipient) {
        info!(recipient = %recipient, "first recipient chosen");
    }

    fn clear_draft_attachments(&self) {}
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let backend = Arc::new(ApiClient::new(&args.api)?);

    match args.command {
        Command::Send(send) => run_send(backend, send).await,
        Command::Contacts { query } => {
            let session = load(backend, None).await?;

            for contact in session.suggestions(&query.join(" ")) {
                println!("{contact}");
            }

            Ok(())
        }
        Command::Accounts => {
            let session = load(backend, None).await?;

            for account in session.accounts() {
                println!("{}\t{}", account.email, account.type_api);
            }

            Ok(())
        }
        Command::Plan => {
            let session = load(backend, None).await?;
            let plan = session.plan().await?;

            println!(
                "{}{}",
                plan.plan,
                if plan.is_trial { " (trial)" } else { "" }
            );

            Ok(())
        }
    }
}

async fn load(
    backend: Arc<ApiClient>,
    from: Option<&str>,
) -> Result<ComposeSession<ApiClient, LogHooks>> {
    Ok(ComposeSession::load(backend, Arc::new(LogHooks), Notifier::new(), from).await?)
}

#[mutants::skip]
async fn run_send(backend: Arc<ApiClient>, args: SendArgs) -> Result<()> {
    let mut session = load(backend, args.from.as_deref()).await?;

    if let Some(from) = &args.from {
        if !session.use_account(from) {
            bail!("{from} is not linked to this account");
        }
    }

    let lists = [
        (RecipientKind::To, &args.to),
        (RecipientKind::Cc, &args.cc),
        (RecipientKind::Bcc, &args.bcc),
    ];

    for (kind, addresses) in lists {
        session.set_target(kind);

        for address in addresses.iter().filter(|a| !a.trim().is_empty()) {
            if session.blur(address)? != BlurOutcome::Ignored {
                continue;
            }

            match session.suggestions(address).as_slice() {
                [contact] => {
                    session.select(contact);
                }
                _ => bail!("\"{address}\" matches several contacts"),
            }
        }
    }

    session.draft.subject = args.subject;
    session.draft.body = body_from_text(&args.body);

    for path in &args.attachments {
        session.draft.attachments.push(Attachment::from_path(path).await?);
    }

    let result = match args.at {
        Some(at) => session.send_scheduled(Some(at)).await,
        None => session.send().await,
    };

    if let Some(notification) = session.notifier().current() {
        println!("{}: {}", notification.kind, notification.message);
    }

    Ok(result?)
}
