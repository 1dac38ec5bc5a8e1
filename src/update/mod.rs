pub mod installer;
pub mod manifest;

use colored::Colorize;
use std::path::PathBuf;

use crate::config::LocalState;
use crate::error::UpdateError;

pub use manifest::{RemoteManifest, DEFAULT_MANIFEST_BASE};

pub(crate) const USER_AGENT: &str = concat!("autoupdate/", env!("CARGO_PKG_VERSION"));

/// How a single run behaves.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Re-download and re-apply even when the published version matches.
    pub forced: bool,

    /// Directory holding the state file and receiving the extracted archive.
    pub root: PathBuf,

    /// Base URL the update token is appended to.
    pub manifest_base: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            forced: false,
            root: PathBuf::from("."),
            manifest_base: DEFAULT_MANIFEST_BASE.to_string(),
        }
    }
}

/// Successful outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Remote version matched the local one; nothing was touched.
    UpToDate,

    /// The archive was downloaded, extracted, and the new version recorded.
    Updated { version: String },
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UpToDate => -1,
            Self::Updated { .. } => 0,
        }
    }
}

/// Run one update check: load local state, fetch the published manifest,
/// compare versions, and apply the update when needed or forced.
pub fn check_for_updates(opts: &UpdateOptions) -> Result<Outcome, UpdateError> {
    let state = LocalState::load(&opts.root).map_err(UpdateError::config)?;

    println!("{}", "Checking for updates...".cyan());
    let url = manifest::manifest_url(&opts.manifest_base, &state.local_version.update_token);
    let remote = manifest::fetch_manifest(&url)?;

    let local = &state.local_version.current_version;
    if !opts.forced && remote.current_version == *local {
        println!(
            "{} Already on the latest version ({})",
            "✓".green(),
            local
        );
        return Ok(Outcome::UpToDate);
    }

    println!(
        "{} New version available: {} → {}",
        "↑".yellow(),
        local.dimmed(),
        remote.current_version.green()
    );

    let version = remote.current_version.clone();
    installer::download_and_apply(&remote, state, &opts.root)?;

    println!("{} Updated to version {}", "✓".green(), version.green());
    Ok(Outcome::Updated { version })
}
