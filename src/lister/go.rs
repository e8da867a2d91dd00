use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::models::{Dependency, Ecosystem};

/// One object from `go list -m -json all`. The tool prints a stream of
/// concatenated JSON objects, not an array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModule {
    path: String,
    #[serde(default)]
    version: String,
    /// Absent for modules missing from the module cache.
    #[serde(default)]
    dir: String,
    #[serde(default)]
    main: bool,
}

pub struct GoLister;

impl GoLister {
    pub fn new() -> Self {
        Self
    }
}

impl super::DependencyLister for GoLister {
    fn list(&self, root: &Path) -> Result<Vec<Dependency>> {
        let stdout = super::run_tool("go", &["list", "-m", "-json", "all"], root)?;
        parse_module_stream(&stdout)
    }
}

fn parse_module_stream(stdout: &[u8]) -> Result<Vec<Dependency>> {
    let mut deps = Vec::new();

    for module in serde_json::Deserializer::from_slice(stdout).into_iter::<GoModule>() {
        let module = module.context("failed to decode `go list` output")?;
        // The main module is the project itself
        if module.main {
            debug!(module = %module.path, "skipping main module");
            continue;
        }
        deps.push(Dependency::new(
            module.path,
            module.version,
            Ecosystem::Go,
            module.dir,
        ));
    }

    Ok(deps)
}
