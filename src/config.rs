use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default index location, relative to the user's home directory.
pub const DEFAULT_INDEX_DIR: &str = ".license-matchr";

/// Default cap on concurrent classifications.
pub const DEFAULT_JOBS: usize = 16;

/// Root configuration structure, deserialized from `.license-matchr/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub classify: ClassifyConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the search index. Overridden by `--index` /
    /// `LICENSE_MATCHR_INDEX_DIR`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Maximum number of dependencies classified at once.
    pub jobs: usize,
    /// What to do when a single dependency cannot be classified.
    pub on_error: FailurePolicy,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            jobs: DEFAULT_JOBS,
            on_error: FailurePolicy::default(),
        }
    }
}

/// Handling of per-dependency read and query failures.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failure.
    #[default]
    Abort,
    /// Record the failure on the dependency and keep going.
    Continue,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.license-matchr/config.toml`
/// 3. `~/.config/license-matchr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-matchr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-matchr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

/// Resolve where the index lives: explicit flag or env var, then config,
/// then `~/.license-matchr`.
pub fn resolve_index_dir(flag: Option<&Path>, config: &Config) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = &config.index.dir {
        return Ok(dir.clone());
    }
    let home = dirs::home_dir().context("failed to determine the user home directory")?;
    Ok(home.join(DEFAULT_INDEX_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.classify.jobs, DEFAULT_JOBS);
        assert_eq!(cfg.classify.on_error, FailurePolicy::Abort);
        assert!(cfg.index.dir.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str("[classify]\non_error = \"continue\"\n").unwrap();
        assert_eq!(cfg.classify.on_error, FailurePolicy::Continue);
        assert_eq!(cfg.classify.jobs, DEFAULT_JOBS);
    }

    #[test]
    fn test_full_config() {
        let cfg: Config = toml::from_str(
            r#"
[index]
dir = "/var/cache/licenses"

[classify]
jobs = 4
on_error = "abort"
"#,
        )
        .unwrap();
        assert_eq!(cfg.index.dir, Some(PathBuf::from("/var/cache/licenses")));
        assert_eq!(cfg.classify.jobs, 4);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(toml::from_str::<Config>("[classify]\non_error = \"ignore\"\n").is_err());
    }

    #[test]
    fn test_project_config_is_found() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".license-matchr");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[classify]\njobs = 3\n").unwrap();

        let cfg = load_config(tmp.path(), None).unwrap();
        assert_eq!(cfg.classify.jobs, 3);
    }

    #[test]
    fn test_override_wins_over_project_config() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".license-matchr");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[classify]\njobs = 3\n").unwrap();
        let other = tmp.path().join("other.toml");
        fs::write(&other, "[classify]\njobs = 9\n").unwrap();

        let cfg = load_config(tmp.path(), Some(&other)).unwrap();
        assert_eq!(cfg.classify.jobs, 9);
    }

    #[test]
    fn test_index_dir_precedence() {
        let mut cfg = Config::default();
        cfg.index.dir = Some(PathBuf::from("/from/config"));

        assert_eq!(
            resolve_index_dir(Some(Path::new("/from/flag")), &cfg).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_index_dir(None, &cfg).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
