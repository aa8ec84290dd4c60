//! Compilation of a single ignore pattern into a matcher.

use crate::errors::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};

/// One compiled ignore pattern.
///
/// `**` crosses path segments, `*` stays within one. A pattern starting
/// with `/` is anchored to the directory its source file lives in; one
/// ending with `/` matches directories only; one starting with `!` reverses
/// the most recent match.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The pattern text as written.
    pub raw: String,
    /// Whether a match un-ignores the path.
    pub negated: bool,
    /// Whether the rule applies to directories only.
    pub dir_only: bool,
    /// Whether the rule is anchored to its source directory.
    pub anchored: bool,
    matcher: GlobMatcher,
}

impl CompiledRule {
    /// Evaluates the rule against a `/`-separated relative path.
    ///
    /// Returns `None` when the rule does not apply (directory-only rule on
    /// a file, or no match), `Some(verdict)` otherwise, where the verdict
    /// is `false` for a negation.
    pub fn evaluate(&self, relative: &str, is_dir: bool) -> Option<bool> {
        if self.dir_only && !is_dir {
            return None;
        }
        if self.matcher.is_match(relative) {
            Some(!self.negated)
        } else {
            None
        }
    }
}

/// Compiles one raw pattern line.
///
/// Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
/// Returns [`Error::PatternMalformed`] when the glob does not compile;
/// callers report a warning and drop the pattern.
pub fn compile_pattern(raw: &str) -> Result<Option<CompiledRule>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (negated, rest) = match trimmed.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (dir_only, rest) = match rest.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let (anchored, rest) = match rest.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    if rest.is_empty() {
        return Ok(None);
    }

    // Unanchored patterns match their name at any depth.
    let glob_text = if anchored {
        rest.to_string()
    } else {
        format!("**/{}", rest)
    };

    let glob = GlobBuilder::new(&glob_text)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::PatternMalformed {
            pattern: raw.to_string(),
            reason: e.to_string(),
        })?;

    Ok(Some(CompiledRule {
        raw: raw.to_string(),
        negated,
        dir_only,
        anchored,
        matcher: glob.compile_matcher(),
    }))
}
