//! Anti-forgery token command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ward_core::AntiforgeryTokenSupplier;

use crate::output;
use crate::session::storage;

use super::Connection;

#[derive(Args, Debug)]
pub struct CsrfArgs {
    /// Print the token value to stdout
    #[arg(long)]
    pub print: bool,
}

pub async fn run(args: CsrfArgs, conn: &Connection) -> Result<()> {
    let loaded = storage::load().context("Failed to load credentials")?;
    let client = conn.client(&loaded.store)?;

    let endpoint = client
        .config()
        .csrf_token_url()
        .context("Invalid token endpoint")?;
    let supplier = AntiforgeryTokenSupplier::new(
        client.transport().clone(),
        Arc::new(loaded.store.clone()),
        endpoint,
    );

    eprintln!("{}", "Fetching anti-forgery token...".dimmed());

    let token = supplier
        .refresh()
        .await
        .context("Failed to fetch anti-forgery token")?;

    storage::save(&loaded.store).context("Failed to save credentials")?;

    if args.print {
        println!("{}", token.as_str());
    }
    output::success("Anti-forgery token refreshed");

    Ok(())
}
