use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{Dependency, Ecosystem};

#[derive(Debug, Deserialize)]
struct CargoMetadata {
    #[serde(default)]
    packages: Vec<CargoPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
    version: String,
    /// Packages without a `source` field are local workspace members.
    source: Option<String>,
    manifest_path: PathBuf,
}

pub struct CargoLister;

impl CargoLister {
    pub fn new() -> Self {
        Self
    }
}

impl super::DependencyLister for CargoLister {
    fn list(&self, root: &Path) -> Result<Vec<Dependency>> {
        let stdout = super::run_tool("cargo", &["metadata", "--format-version", "1"], root)?;
        parse_metadata(&stdout)
    }
}

fn parse_metadata(stdout: &[u8]) -> Result<Vec<Dependency>> {
    let metadata: CargoMetadata =
        serde_json::from_slice(stdout).context("failed to decode `cargo metadata` output")?;

    let deps = metadata
        .packages
        .into_iter()
        // Skip local workspace members (they have no `source`)
        .filter(|p| p.source.is_some())
        .map(|p| {
            let dir = p
                .manifest_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            Dependency::new(p.name, p.version, Ecosystem::Rust, dir)
        })
        .collect();

    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cargo_metadata() {
        let stdout = br#"{
  "packages": [
    {
      "name": "my-app",
      "version": "0.1.0",
      "source": null,
      "manifest_path": "/work/my-app/Cargo.toml"
    },
    {
      "name": "serde",
      "version": "1.0.150",
      "source": "registry+https://github.com/rust-lang/crates.io-index",
      "manifest_path": "/home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.150/Cargo.toml",
      "license": "MIT OR Apache-2.0"
    }
  ],
  "workspace_members": ["my-app 0.1.0 (path+file:///work/my-app)"],
  "version": 1
}"#;

        let deps = parse_metadata(stdout).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].path, "serde");
        assert_eq!(deps[0].version, "1.0.150");
        assert_eq!(
            deps[0].source_dir,
            PathBuf::from("/home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/serde-1.0.150")
        );
    }
}
