//! Loading schedule bytes from a file, stdin, or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use std::io::Read;
use tracing::debug;

/// Source argument meaning "read from standard input".
pub const STDIN: &str = "-";

pub fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::blocking::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Reads a schedule from a local path, an `http(s)` URL, or stdin (`-`).
#[tracing::instrument(skip(client))]
pub fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source == STDIN {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read schedule from stdin")?;
        buf
    } else if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(client, source).with_context(|| format!("failed to fetch {source}"))?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Schedule loaded");
    Ok(bytes)
}
