use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or persisting grow data.
#[derive(Debug, Error)]
pub enum GrowError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to walk data root: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("filesystem watcher failed: {0}")]
    Watch(#[from] notify::Error),
    #[error("unknown location `{0}`")]
    UnknownLocation(String),
}

impl GrowError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GrowError>;
