use std::path::PathBuf;
use thiserror::Error;

use crate::sections::Section;

/// Boxed error returned by injected collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("corrupt data in {path}: {source}")]
    CorruptData {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("failed to get platform details: {0}. Markdown links would be invalid")]
    Remote(String),

    #[error("failed to generate the {section} section: {source}")]
    Section {
        section: Section,
        source: BoxError,
    },
}

impl SummaryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SummaryError::Io {
            source,
            path: path.into(),
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        SummaryError::CorruptData {
            source,
            path: path.into(),
        }
    }

    pub fn section(section: Section, source: impl Into<BoxError>) -> Self {
        SummaryError::Section {
            section,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
