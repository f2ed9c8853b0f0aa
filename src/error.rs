use std::path::PathBuf;

use thiserror::Error;

/// Failures on the way from a source location to a post collection.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch {location}: HTTP {status}")]
    Status {
        location: String,
        status: reqwest::StatusCode,
    },

    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse table: {0}")]
    Parse(#[from] csv::Error),

    #[error("parsing capability unavailable: {0}")]
    Capability(String),
}
