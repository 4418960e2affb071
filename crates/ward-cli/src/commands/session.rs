//! Session state subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use ward_core::{CredentialKey, CredentialStore};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct SessionCommand {
    #[command(subcommand)]
    pub command: SessionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionSubcommand {
    /// Store the bearer session token
    SetToken(SetTokenArgs),

    /// Display the stored session state
    Show,

    /// Remove all stored credentials
    Clear,
}

#[derive(Args, Debug)]
pub struct SetTokenArgs {
    /// Session token issued by the login flow
    pub token: String,
}

pub fn handle(cmd: SessionCommand) -> Result<()> {
    match cmd.command {
        SessionSubcommand::SetToken(args) => set_token(args),
        SessionSubcommand::Show => show(),
        SessionSubcommand::Clear => clear(),
    }
}

fn set_token(args: SetTokenArgs) -> Result<()> {
    let token = args.token.trim();
    anyhow::ensure!(!token.is_empty(), "Session token must not be empty");

    let loaded = storage::load().context("Failed to load credentials")?;
    loaded
        .store
        .set(CredentialKey::SessionToken, token.to_string());
    storage::save(&loaded.store).context("Failed to save credentials")?;

    output::success("Session token stored");
    Ok(())
}

fn show() -> Result<()> {
    let loaded = storage::load().context("Failed to load credentials")?;
    let path = storage::credentials_path()?;

    let presence = |key: CredentialKey| match loaded.store.get(key) {
        Some(_) => "stored",
        None => "absent",
    };

    output::field("File", &path.display().to_string());
    output::field(
        "Session token",
        presence(CredentialKey::SessionToken),
    );
    output::field(
        "Anti-forgery token",
        presence(CredentialKey::AntiforgeryToken),
    );
    if let Some(updated_at) = loaded.updated_at {
        output::field("Updated", &updated_at.to_rfc3339());
    }

    Ok(())
}

fn clear() -> Result<()> {
    if storage::clear()? {
        output::success("Stored credentials removed");
    } else {
        output::success("No stored credentials");
    }
    Ok(())
}
