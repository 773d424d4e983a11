//! Input file discovery.
//!
//! Every regular file under every input directory is visited; there is
//! no extension filtering, since directives can live in any text file.

use std::fs;
use std::path::{Path, PathBuf};

/// A file or directory that could not be read. Non-fatal: the walk and
/// the run continue, but the process exits nonzero at the end.
#[derive(Debug)]
pub struct IoFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Outcome of walking the input directories.
#[derive(Debug, Default)]
pub struct WalkResult {
    /// Discovered regular files, sorted by path.
    pub files: Vec<PathBuf>,
    pub failures: Vec<IoFailure>,
}

/// Recursively discover every regular file under `roots`.
///
/// Files are sorted by path so scanning order (and therefore diagnostic
/// order) is deterministic regardless of directory-entry order.
pub fn discover_files(roots: &[PathBuf]) -> WalkResult {
    let mut result = WalkResult::default();
    for root in roots {
        walk_recursive(root, &mut result);
    }
    result.files.sort();
    result
}

fn walk_recursive(dir: &Path, result: &mut WalkResult) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            result.failures.push(IoFailure {
                path: dir.to_path_buf(),
                error,
            });
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                result.failures.push(IoFailure {
                    path: dir.to_path_buf(),
                    error,
                });
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk_recursive(&path, result);
        } else if path.is_file() {
            result.files.push(path);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "test assertions use unwrap for clarity"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_nested_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/two.h"), "").unwrap();
        fs::write(dir.path().join("a.cpp"), "").unwrap();
        fs::write(dir.path().join("b/one.txt"), "").unwrap();

        let result = discover_files(&[dir.path().to_path_buf()]);
        assert!(result.failures.is_empty());
        assert_eq!(
            result.files,
            vec![
                dir.path().join("a.cpp"),
                dir.path().join("b/nested/two.h"),
                dir.path().join("b/one.txt"),
            ]
        );
    }

    #[test]
    fn missing_root_is_a_recorded_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = discover_files(&[missing.clone()]);
        assert!(result.files.is_empty());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, missing);
    }

    #[test]
    fn multiple_roots_accumulate() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        fs::write(a.path().join("x"), "").unwrap();
        fs::write(b.path().join("y"), "").unwrap();
        let result = discover_files(&[a.path().to_path_buf(), b.path().to_path_buf()]);
        assert_eq!(result.files.len(), 2);
    }
}
