use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed name of the state file, resolved against the working directory.
pub const STATE_FILE: &str = ".autoupdate";

/// Persisted state of the installation: the whole `.autoupdate` document.
///
/// Sections and keys this tool does not interpret are carried through the
/// flattened tables so a rewrite never drops them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalState {
    pub local_version: VersionEntry,

    #[serde(flatten)]
    rest: toml::Table,
}

/// The `[local_version]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionEntry {
    /// Version of the currently installed copy, compared as an opaque string.
    pub current_version: String,

    /// Identifier appended to the manifest base URL.
    pub update_token: String,

    #[serde(flatten)]
    extra: toml::Table,
}

impl LocalState {
    /// Load the state file from `dir`. Absence is an error, not a
    /// first-run default.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::state_path(dir);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let state: LocalState = toml::from_str(&content)
            .with_context(|| format!("{} is not a valid state file", path.display()))?;
        Ok(state)
    }

    /// Rewrite the state file in `dir`, overwriting the previous one.
    pub fn store(&self, dir: &Path) -> Result<()> {
        let path = Self::state_path(dir);
        let content = toml::to_string(self).context("failed to serialize state")?;
        fs::write(&path, content).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    pub fn state_path(dir: &Path) -> PathBuf {
        dir.join(STATE_FILE)
    }
}
