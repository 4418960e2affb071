//! Embeds the release version and commit in the `ward` binary.
//!
//! Sets `WARD_VERSION` (tag-based `git describe`, or the crate version) and
//! `WARD_GIT_COMMIT` (short hash, or `unknown`).

use std::path::PathBuf;
use std::process::Command;

fn main() {
    // The repository root sits above this crate, so ask git where it lives
    if let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]).map(PathBuf::from) {
        for watched in ["HEAD", "index", "refs/tags"] {
            println!("cargo:rerun-if-changed={}", git_dir.join(watched).display());
        }
    }

    let version = git(&["describe", "--tags", "--always", "--dirty"])
        .map(|described| described.trim_start_matches('v').to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    let commit = git(&["rev-parse", "--short=10", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=WARD_VERSION={}", version);
    println!("cargo:rustc-env=WARD_GIT_COMMIT={}", commit);
}

/// Run git and return its trimmed stdout, or `None` outside a checkout.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8(output.stdout).ok()?;
    let stdout = stdout.trim();
    (!stdout.is_empty()).then(|| stdout.to_string())
}
