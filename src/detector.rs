use std::path::Path;

use crate::models::Ecosystem;

/// Auto-detect supported ecosystems by scanning for known manifest files.
pub fn detect_ecosystems(path: &Path) -> Vec<Ecosystem> {
    let mut ecosystems = Vec::new();

    if path.join("go.mod").exists() {
        ecosystems.push(Ecosystem::Go);
    }

    if path.join("Cargo.toml").exists() || path.join("Cargo.lock").exists() {
        ecosystems.push(Ecosystem::Rust);
    }

    ecosystems
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detects_go_and_rust() {
        let tmp = TempDir::new().unwrap();
        assert!(detect_ecosystems(tmp.path()).is_empty());

        fs::write(tmp.path().join("go.mod"), "module example.com/x\n").unwrap();
        assert_eq!(detect_ecosystems(tmp.path()), vec![Ecosystem::Go]);

        fs::write(tmp.path().join("Cargo.lock"), "version = 3\n").unwrap();
        assert_eq!(
            detect_ecosystems(tmp.path()),
            vec![Ecosystem::Go, Ecosystem::Rust]
        );
    }
}
