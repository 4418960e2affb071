//! Credential storage for persisting session state between runs.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use ward_core::{CredentialKey, CredentialStore, MemoryStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored credential data, keyed by the store's key names.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(rename = "SESSION_TOKEN", default, skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
    #[serde(rename = "CSRF_TOKEN", default, skip_serializing_if = "Option::is_none")]
    csrf_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Credentials loaded from disk.
#[derive(Debug)]
pub struct LoadedCredentials {
    /// In-memory store seeded from the file.
    pub store: MemoryStore,
    /// When the file was last written.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Get the credentials file path.
pub fn credentials_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "ward").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}

/// Load stored credentials; a missing file yields an empty store.
pub fn load() -> Result<LoadedCredentials> {
    let path = credentials_path()?;
    let store = MemoryStore::new();

    if !path.exists() {
        return Ok(LoadedCredentials {
            store,
            updated_at: None,
        });
    }

    let json = fs::read_to_string(&path).context("Failed to read credentials file")?;
    let stored: StoredCredentials =
        serde_json::from_str(&json).context("Invalid credentials file")?;

    if let Some(token) = stored.session_token {
        store.set(CredentialKey::SessionToken, token);
    }
    if let Some(token) = stored.csrf_token {
        store.set(CredentialKey::AntiforgeryToken, token);
    }

    Ok(LoadedCredentials {
        store,
        updated_at: stored.updated_at,
    })
}

/// Save the store's contents to disk.
pub fn save(store: &MemoryStore) -> Result<()> {
    let stored = StoredCredentials {
        session_token: store.get(CredentialKey::SessionToken),
        csrf_token: store.get(CredentialKey::AntiforgeryToken),
        updated_at: Some(Utc::now()),
    };

    let path = credentials_path()?;
    let json = serde_json::to_string_pretty(&stored)?;

    fs::write(&path, &json).context("Failed to write credentials file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Remove the stored credentials. Returns false if there were none.
pub fn clear() -> Result<bool> {
    let path = credentials_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove credentials file")?;
    Ok(true)
}
