//! Error types for the classification engine.
//!
//! Startup failures ([`CorpusError`], [`IndexError`]) are fatal. A
//! [`QueryError`] is first absorbed by the matcher's escaped retry and only
//! escapes when the retry fails too.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("embedded license corpus is empty")]
    Empty,

    #[error("failed to parse license record {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("license record {file} has an empty `{field}`")]
    MissingField { file: String, field: &'static str },
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("failed to build index at {}: {reason}", path.display())]
    Build { path: PathBuf, reason: String },

    #[error("duplicate license id `{0}` in corpus")]
    DuplicateId(String),

    #[error("failed to open index at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
}

impl IndexError {
    pub(crate) fn build(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        IndexError::Build {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        IndexError::Open {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("unknown field `{0}` in query")]
    UnknownField(String),

    #[error("index connection unavailable: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("index query failed: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Failure to read a dependency's source tree or its license file.
#[derive(Debug, Error)]
#[error("failed to read {}: {source}", path.display())]
pub struct ProbeError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The source directory could not be scanned for a license file.
    #[error("{dependency}: {source}")]
    Probe {
        dependency: String,
        #[source]
        source: ProbeError,
    },

    /// A license file was located but could not be read.
    #[error("{dependency}: {source}")]
    Read {
        dependency: String,
        #[source]
        source: ProbeError,
    },

    #[error("{dependency}: {source}")]
    Query {
        dependency: String,
        #[source]
        source: QueryError,
    },

    #[error("classification task for {dependency} failed: {source}")]
    Task {
        dependency: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ClassifyError {
    /// Whether a license file had been located before the failure.
    pub fn license_found(&self) -> bool {
        matches!(self, ClassifyError::Read { .. } | ClassifyError::Query { .. })
    }
}
