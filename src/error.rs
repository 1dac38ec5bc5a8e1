use thiserror::Error;

/// Failure classes of a single update run, one per documented exit code.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The manifest or archive endpoint could not be reached, answered
    /// with a non-success status, or dropped the connection mid-body.
    #[error("cannot connect to the internet: {0:#}")]
    Network(anyhow::Error),

    /// The local state file is missing, unreadable, or malformed, or the
    /// fetched manifest is malformed or lacks a required key.
    #[error("bad configuration: {0:#}")]
    Config(anyhow::Error),

    /// The downloaded file is not a valid zip archive.
    #[error("error while unzipping the downloaded file: {0:#}")]
    Archive(anyhow::Error),

    /// Anything else that fails along the way (file creation, extraction
    /// I/O, state rewrite).
    #[error("error while updating: {0:#}")]
    Other(anyhow::Error),
}

impl UpdateError {
    pub fn network(err: impl Into<anyhow::Error>) -> Self {
        Self::Network(err.into())
    }

    pub fn config(err: impl Into<anyhow::Error>) -> Self {
        Self::Config(err.into())
    }

    pub fn archive(err: impl Into<anyhow::Error>) -> Self {
        Self::Archive(err.into())
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Network(_) => 1,
            Self::Config(_) => 2,
            Self::Archive(_) => 3,
            Self::Other(_) => 4,
        }
    }
}

impl From<anyhow::Error> for UpdateError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err)
    }
}
