use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One canonical license from the bundled corpus.
///
/// Deserialized from SPDX-style detail records; keys other than the three
/// below (`isOsiApproved`, `isDeprecatedLicenseId`, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseRecord {
    #[serde(rename = "licenseId")]
    pub id: String,
    pub name: String,
    #[serde(rename = "licenseText")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub path: String,
    pub version: String,
    pub ecosystem: Ecosystem,
    /// Root of the dependency's source tree; empty when the tool did not
    /// report one (e.g. a module that was never downloaded).
    pub source_dir: PathBuf,
    pub classification: Classification,
}

impl Dependency {
    pub fn new(
        path: impl Into<String>,
        version: impl Into<String>,
        ecosystem: Ecosystem,
        source_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            ecosystem,
            source_dir: source_dir.into(),
            classification: Classification::default(),
        }
    }
}

/// Outcome of classifying one dependency.
///
/// `id` and `hint` are never both non-empty: a match carries the canonical
/// id, a miss carries the fallback hint, and a dependency without a license
/// file carries neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// A candidate license file was located.
    pub found: bool,
    pub matched: bool,
    pub id: String,
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    pub fn matched(id: impl Into<String>) -> Self {
        Self {
            found: true,
            matched: true,
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn unmatched(hint: impl Into<String>) -> Self {
        Self {
            found: true,
            hint: hint.into(),
            ..Self::default()
        }
    }

    pub fn failed(found: bool, error: impl Into<String>) -> Self {
        Self {
            found,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ecosystem {
    Go,
    Rust,
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::Go => write!(f, "Go"),
            Ecosystem::Rust => write!(f, "Rust"),
        }
    }
}
