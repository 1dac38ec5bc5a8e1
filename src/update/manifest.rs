use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::error::UpdateError;

use super::USER_AGENT;

/// Base URL the update token is appended to.
pub const DEFAULT_MANIFEST_BASE: &str = "https://pastebin.com/raw";

/// The `[version]` section of the published manifest. Fetched on every
/// run, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteManifest {
    /// Latest published version, compared as an opaque string.
    pub current_version: String,

    /// URL of the zip archive holding that version.
    pub source: String,
}

#[derive(Debug, Deserialize)]
struct ManifestDoc {
    version: RemoteManifest,
}

pub fn manifest_url(base: &str, token: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), token)
}

/// Fetch the manifest and parse it.
pub fn fetch_manifest(url: &str) -> Result<RemoteManifest, UpdateError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("failed to create HTTP client")?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| UpdateError::network(anyhow!(e).context(format!("GET {url} failed"))))?;

    if !response.status().is_success() {
        return Err(UpdateError::network(anyhow!(
            "GET {url} answered {}",
            response.status()
        )));
    }

    let text = response
        .text()
        .map_err(|e| UpdateError::network(anyhow!(e).context("failed to read manifest body")))?;

    parse_manifest(&text)
}

/// Parse manifest text of the shape:
///
/// ```toml
/// [version]
/// current_version = "2.0"
/// source = "https://example.com/downloads/app.zip"
/// ```
pub fn parse_manifest(text: &str) -> Result<RemoteManifest, UpdateError> {
    let doc: ManifestDoc = toml::from_str(text.trim())
        .map_err(|e| UpdateError::config(anyhow!(e).context("malformed update manifest")))?;
    Ok(doc.version)
}
