use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ProbeError;

/// Base names (extension stripped, case-insensitive) treated as license files.
const LICENSE_NAMES: &[&str] = &["licence", "license"];

/// Locate the license file at the top level of `source_dir`.
///
/// Entries are checked in file-name order and subdirectories are ignored;
/// the first match wins. An empty `source_dir` means the dependency has no
/// source tree on disk and yields `None`.
pub fn find_license_file(source_dir: &Path) -> Result<Option<PathBuf>, ProbeError> {
    if source_dir.as_os_str().is_empty() {
        return Ok(None);
    }

    let read_err = |source| ProbeError {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(source_dir)
        .map_err(read_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let file_type = entry.file_type().map_err(read_err)?;
        if file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        if is_license_name(&path) {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

fn is_license_name(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| {
            LICENSE_NAMES
                .iter()
                .any(|name| stem.eq_ignore_ascii_case(name))
        })
        .unwrap_or(false)
}

/// Read a license file as text. Invalid UTF-8 is replaced, not rejected.
pub fn read_license_text(path: &Path) -> Result<String, ProbeError> {
    let bytes = fs::read(path).map_err(|source| ProbeError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_license_names() {
        for name in ["LICENSE", "license.txt", "LICENCE.md", "License.rst", "licence"] {
            assert!(is_license_name(Path::new(name)), "{}", name);
        }
        for name in ["COPYING", "LICENSE-MIT", "license.tar.gz", ".license", "licenses"] {
            assert!(!is_license_name(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_finds_first_match_by_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "readme").unwrap();
        fs::write(tmp.path().join("license.txt"), "lower").unwrap();
        fs::write(tmp.path().join("LICENSE"), "upper").unwrap();

        let found = find_license_file(tmp.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "LICENSE");
    }

    #[test]
    fn test_skips_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("LICENSE")).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("LICENSE"), "nested").unwrap();

        assert_eq!(find_license_file(tmp.path()).unwrap(), None);
    }

    #[test]
    fn test_empty_source_dir_is_not_found() {
        assert_eq!(find_license_file(Path::new("")).unwrap(), None);
    }

    #[test]
    fn test_missing_source_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let err = find_license_file(&missing).unwrap_err();
        assert_eq!(err.path, missing);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_license_found_but_unreadable() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("LICENSE")).unwrap();

        let path = find_license_file(tmp.path()).unwrap().unwrap();
        assert_eq!(path, tmp.path().join("LICENSE"));

        let err = read_license_text(&path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_read_non_utf8_license() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("LICENSE");
        fs::write(&path, b"Copyright \xff holder").unwrap();

        let text = read_license_text(&path).unwrap();
        assert!(text.starts_with("Copyright "));
        assert!(text.ends_with(" holder"));
    }
}
