use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaptionerError>;

/// Fatal errors. Anything that can go wrong for a single image is reported
/// through [`crate::CaptionOutcome`] instead and never reaches this type.
#[derive(Debug, Error)]
pub enum CaptionerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read archive {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    #[error("cannot load allow-list {path}: {reason}")]
    AllowList { path: PathBuf, reason: String },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error on {path}: {reason}")]
    Csv { path: PathBuf, reason: String },

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

impl CaptionerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Csv {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
