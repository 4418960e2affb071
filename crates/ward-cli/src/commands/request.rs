//! Request command implementation.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::debug;

use ward_core::request::parse_method;

use crate::output;
use crate::session::storage;

use super::Connection;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, ...)
    pub method: String,

    /// Path under the API prefix (e.g., /items/1)
    pub path: String,

    /// JSON file with the request body (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,

    /// Extra header as NAME:VALUE (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Print the response status and headers to stderr
    #[arg(long, short = 'i')]
    pub include: bool,
}

pub async fn run(args: RequestArgs, conn: &Connection) -> Result<()> {
    let loaded = storage::load().context("Failed to load credentials")?;
    let client = conn.client(&loaded.store)?;

    let method = parse_method(&args.method).context("Invalid HTTP method")?;
    debug!(method = %method, path = %args.path, "Sending request");
    let mut request = client
        .request(method, &args.path)
        .context("Invalid request path")?;

    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("Header '{}' must be NAME:VALUE", header))?;
        request = request
            .try_header(name, value)
            .context("Invalid header")?;
    }

    if let Some(ref path) = args.json {
        let body = read_json(path)?;
        request = request.json(&body).context("Invalid request body")?;
    }

    let result = client.execute(request).await;

    // Persist any token refreshed along the way, even if the request failed
    storage::save(&loaded.store).context("Failed to save credentials")?;

    match result {
        Ok(response) => {
            if args.include {
                eprintln!("HTTP {}", response.status());
                for (name, value) in response.headers() {
                    eprintln!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
                }
            }
            output::body(response.body())
        }
        Err(err) => {
            if let Some(response) = err.response() {
                output::error(&format!("HTTP {}", response.status()));
                output::body(response.body())?;
            }
            Err(err).context("Request failed")
        }
    }
}

fn read_json(path: &str) -> Result<Value> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        serde_json::from_str(&buf).context("Invalid JSON from stdin")
    } else {
        let content = std::fs::read_to_string(path).context("Failed to read JSON file")?;
        serde_json::from_str(&content).context("Invalid JSON in file")
    }
}
