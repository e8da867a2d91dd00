//! Dependency discovery via each ecosystem's own resolution tool.
//!
//! - [`go`]: `go list -m -json all`
//! - [`rust`]: `cargo metadata`

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::models::Dependency;

pub mod go;
pub mod rust;

pub trait DependencyLister {
    fn list(&self, root: &Path) -> Result<Vec<Dependency>>;
}

/// Run `program args...` in `dir` and return its stdout, failing with the
/// tool's stderr when it exits non-zero.
fn run_tool(program: &str, args: &[&str], dir: &Path) -> Result<Vec<u8>> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("failed to run `{}`", program))?;

    if !output.status.success() {
        bail!(
            "`{} {}` failed ({}): {}",
            program,
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(output.stdout)
}
