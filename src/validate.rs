//! Input path validation.

use crate::errors::{Error, Result};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// An input path resolved to absolute form and classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    /// Absolute, lexically cleaned path.
    pub path: PathBuf,
    /// Whether the path is a directory.
    pub is_dir: bool,
}

/// Resolves, deduplicates, and classifies the input paths.
///
/// Order is preserved (first occurrence wins for duplicates). Paths that
/// are missing or cannot be stat'ed are reported in the returned warning
/// list and skipped.
///
/// # Errors
/// Returns [`Error::NoValidPaths`] when nothing survives.
pub fn resolve_paths(inputs: &[String]) -> Result<(Vec<ValidatedPath>, Vec<String>)> {
    let cwd = std::env::current_dir().map_err(Error::Write)?;
    let mut seen = HashSet::new();
    let mut validated = Vec::new();
    let mut warnings = Vec::new();

    for input in inputs {
        let absolute = clean_path(&cwd.join(input));
        if !seen.insert(absolute.clone()) {
            continue;
        }
        match std::fs::metadata(&absolute) {
            Ok(metadata) => validated.push(ValidatedPath {
                path: absolute,
                is_dir: metadata.is_dir(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warnings.push(Error::PathMissing(absolute).to_string());
            }
            Err(e) => {
                warnings.push(
                    Error::PathStat {
                        path: absolute.display().to_string(),
                        source: e,
                    }
                    .to_string(),
                );
            }
        }
    }

    if validated.is_empty() {
        return Err(Error::NoValidPaths);
    }
    Ok((validated, warnings))
}

/// Lexically normalizes a path: drops `.` components and resolves `..`
/// against the accumulated prefix. No filesystem access.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(Component::ParentDir);
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
