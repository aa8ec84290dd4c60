//! Composition and evaluation of layered ignore sets.

use super::pattern::{compile_pattern, CompiledRule};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The ignore files read at every directory level, in evaluation order.
const GITIGNORE_FILE: &str = ".gitignore";
const IGNORE_FILE: &str = ".ignore";

/// One source of rules, relative to a directory inside the walk.
#[derive(Debug)]
struct Layer {
    /// Path of the directory the rules are relative to, itself relative to
    /// the walk root; empty for the root.
    base: PathBuf,
    rules: Vec<CompiledRule>,
}

/// The full set of ignore rules active at one directory level.
///
/// Cloning is cheap: layers are shared `Arc`s, and descending into a child
/// directory appends at most one layer for that directory's own files.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    layers: Vec<Arc<Layer>>,
    git_rule: Option<Arc<CompiledRule>>,
    use_gitignore: bool,
    use_ignore: bool,
}

impl IgnoreSet {
    /// Builds the root set from explicit exclusion patterns.
    ///
    /// Malformed patterns are dropped; their messages are returned so the
    /// walker can surface them as warnings.
    pub fn root(exclude_patterns: &[String], use_gitignore: bool, use_ignore: bool, include_git: bool) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut rules = Vec::new();
        for raw in exclude_patterns {
            match compile_pattern(raw) {
                Ok(Some(rule)) => rules.push(rule),
                Ok(None) => {}
                Err(e) => warnings.push(e.to_string()),
            }
        }

        let git_rule = if include_git {
            None
        } else {
            // `.git/` is well-formed; compile_pattern cannot reject it.
            compile_pattern(".git/")
                .ok()
                .flatten()
                .map(Arc::new)
        };

        let mut layers = Vec::new();
        if !rules.is_empty() {
            layers.push(Arc::new(Layer {
                base: PathBuf::new(),
                rules,
            }));
        }
        (
            Self {
                layers,
                git_rule,
                use_gitignore,
                use_ignore,
            },
            warnings,
        )
    }

    /// Composes the set for a directory being entered.
    ///
    /// Reads the directory's `.gitignore` and `.ignore` (when enabled) and
    /// layers them over the enclosing set. `dir_rel` is the directory's
    /// path relative to the walk root (empty for the root itself).
    pub fn descend(&self, dir_abs: &Path, dir_rel: &Path) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut rules = Vec::new();
        if self.use_gitignore {
            read_rules(&dir_abs.join(GITIGNORE_FILE), &mut rules, &mut warnings);
        }
        if self.use_ignore {
            read_rules(&dir_abs.join(IGNORE_FILE), &mut rules, &mut warnings);
        }

        let mut child = self.clone();
        if !rules.is_empty() {
            child.layers.push(Arc::new(Layer {
                base: dir_rel.to_path_buf(),
                rules,
            }));
        }
        (child, warnings)
    }

    /// Decides whether a path relative to the walk root is ignored.
    ///
    /// Pure: patterns were compiled when the set was composed, so no I/O
    /// happens here. The last matching rule wins; the `.git/` rule, when
    /// present, is evaluated last.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        let mut verdict = None;
        for layer in &self.layers {
            let candidate = if layer.base.as_os_str().is_empty() {
                relative
            } else {
                match relative.strip_prefix(&layer.base) {
                    Ok(stripped) => stripped,
                    Err(_) => continue,
                }
            };
            let candidate = unix_path(candidate);
            for rule in &layer.rules {
                if let Some(matched) = rule.evaluate(&candidate, is_dir) {
                    verdict = Some(matched);
                }
            }
        }
        if let Some(rule) = &self.git_rule {
            if let Some(matched) = rule.evaluate(&unix_path(relative), is_dir) {
                verdict = Some(matched);
            }
        }
        verdict.unwrap_or(false)
    }
}

fn unix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn read_rules(file: &Path, rules: &mut Vec<CompiledRule>, warnings: &mut Vec<String>) {
    let Ok(text) = fs::read_to_string(file) else {
        return;
    };
    for line in text.lines() {
        match compile_pattern(line) {
            Ok(Some(rule)) => rules.push(rule),
            Ok(None) => {}
            Err(e) => warnings.push(format!("{}: {}", file.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn root_set(patterns: &[&str]) -> IgnoreSet {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        let (set, warnings) = IgnoreSet::root(&patterns, true, true, false);
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
        set
    }

    #[test]
    fn test_unmatched_path_is_not_ignored() {
        let set = root_set(&[]);
        assert!(!set.is_ignored(Path::new("src/main.rs"), false));
    }

    #[test]
    fn test_cli_exclusions_apply_anywhere() {
        let set = root_set(&["*.log"]);
        assert!(set.is_ignored(Path::new("app.log"), false));
        assert!(set.is_ignored(Path::new("deep/nested/app.log"), false));
        assert!(!set.is_ignored(Path::new("app.rs"), false));
    }

    #[test]
    fn test_last_match_wins_with_negation() {
        let set = root_set(&["*.log", "!keep.log"]);
        assert!(set.is_ignored(Path::new("other.log"), false));
        assert!(!set.is_ignored(Path::new("keep.log"), false));
    }

    #[test]
    fn test_git_rule_is_applied_when_git_excluded() {
        let (set, _) = IgnoreSet::root(&[], true, true, false);
        assert!(set.is_ignored(Path::new(".git"), true));
        assert!(set.is_ignored(Path::new("sub/.git"), true));
        // Only the directory itself; files named .git are untouched.
        assert!(!set.is_ignored(Path::new(".git"), false));

        let (set, _) = IgnoreSet::root(&[], true, true, true);
        assert!(!set.is_ignored(Path::new(".git"), true));
    }

    #[test]
    fn test_descend_layers_gitignore() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(".gitignore"), "*.tmp\n").expect("write");

        let (root, _) = IgnoreSet::root(&[], true, true, false);
        let (set, warnings) = root.descend(temp.path(), Path::new(""));
        assert!(warnings.is_empty());
        assert!(set.is_ignored(Path::new("junk.tmp"), false));
        assert!(!root.is_ignored(Path::new("junk.tmp"), false));
    }

    #[test]
    fn test_descend_nested_layer_is_relative_to_its_directory() {
        let temp = tempdir().expect("tempdir");
        let sub = temp.path().join("sub");
        fs::create_dir(&sub).expect("mkdir");
        fs::write(sub.join(".gitignore"), "/local.txt\n").expect("write");

        let (root, _) = IgnoreSet::root(&[], true, true, false);
        let (set, _) = root.descend(&sub, Path::new("sub"));
        // Anchored to sub/, so it only matches directly inside it.
        assert!(set.is_ignored(Path::new("sub/local.txt"), false));
        assert!(!set.is_ignored(Path::new("local.txt"), false));
        assert!(!set.is_ignored(Path::new("sub/deep/local.txt"), false));
    }

    #[test]
    fn test_child_negation_overrides_parent_rule() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(".gitignore"), "*.gen\n").expect("write");
        let sub = temp.path().join("sub");
        fs::create_dir(&sub).expect("mkdir");
        fs::write(sub.join(".gitignore"), "!special.gen\n").expect("write");

        let (root, _) = IgnoreSet::root(&[], true, true, false);
        let (at_root, _) = root.descend(temp.path(), Path::new(""));
        let (at_sub, _) = at_root.descend(&sub, Path::new("sub"));

        assert!(at_root.is_ignored(Path::new("a.gen"), false));
        assert!(at_sub.is_ignored(Path::new("sub/a.gen"), false));
        assert!(!at_sub.is_ignored(Path::new("sub/special.gen"), false));
    }

    #[test]
    fn test_gitignore_toggle_off_skips_file() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(".gitignore"), "*.tmp\n").expect("write");

        let (root, _) = IgnoreSet::root(&[], false, true, false);
        let (set, _) = root.descend(temp.path(), Path::new(""));
        assert!(!set.is_ignored(Path::new("junk.tmp"), false));
    }

    #[test]
    fn test_malformed_line_warns_and_continues() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(".gitignore"), "a[\n*.tmp\n").expect("write");

        let (root, _) = IgnoreSet::root(&[], true, true, false);
        let (set, warnings) = root.descend(temp.path(), Path::new(""));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("malformed ignore pattern"));
        assert!(set.is_ignored(Path::new("junk.tmp"), false));
    }
}
