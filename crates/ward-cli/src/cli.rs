//! CLI argument definitions.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::commands::{csrf::CsrfArgs, request::RequestArgs, session::SessionCommand};
use crate::commands::Connection;

/// CLI tool for exploring CSRF-protected HTTP APIs.
#[derive(Parser, Debug)]
#[command(name = "ward")]
#[command(
    author,
    version = env!("WARD_VERSION"),
    long_version = concat!(env!("WARD_VERSION"), " (", env!("WARD_GIT_COMMIT"), ")"),
    about,
    long_about = None
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL (defaults to $WARD_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Connection settings shared by the network commands.
    pub fn connection(&self) -> Connection {
        let timeout = (self.timeout > 0).then(|| Duration::from_secs(self.timeout));
        Connection {
            api_url: self.api_url.clone(),
            timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a request through the authentication pipeline
    Request(RequestArgs),

    /// Fetch a fresh anti-forgery token
    Csrf(CsrfArgs),

    /// Manage the stored session state
    Session(SessionCommand),
}
