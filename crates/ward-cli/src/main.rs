//! ward - CLI tool for exploring CSRF-protected HTTP APIs.
//!
//! Every request goes through the `ward` authentication pipeline: the stored
//! session token is sent as a bearer token, mutating requests fetch a fresh
//! anti-forgery token, and a `403 Forbidden` is retried once.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{csrf, request, session as session_cmd};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let conn = cli.connection();
    match cli.command {
        Commands::Request(args) => request::run(args, &conn).await,
        Commands::Csrf(args) => csrf::run(args, &conn).await,
        Commands::Session(cmd) => session_cmd::handle(cmd),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so response bodies on stdout stay pipeable
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
