//! Error taxonomy for a comparison run.
//!
//! Every stage either completes or returns one of these. A listing that
//! contains no workflows or no result file is not an error.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CompareError>;

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// Creating a staging directory failed
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The SSO cookie could not be acquired
    #[error("authentication failed for {url}: {message}")]
    Authentication { url: String, message: String },

    /// Fetching a listing or downloading a file failed
    #[error("transfer failed for {url}: {message}")]
    Transfer { url: String, message: String },

    /// An external program could not be started or exited non-zero
    #[error("{program} failed: {message}")]
    Process { program: String, message: String },

    /// The config file could not be read or parsed
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl CompareError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
