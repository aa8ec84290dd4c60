//! Import and selector parsing for Go sources.
//!
//! Parsing only; resolving import paths to documentation happens in the
//! collector through the injected provider.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

static IMPORT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?:([A-Za-z_]\w*|\.|_)\s+)?"([^"]+)"\s*$"#).expect("import line regex")
});
static SINGLE_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*import\s+(?:([A-Za-z_]\w*|\.|_)\s+)?"([^"]+)"\s*$"#)
        .expect("single import regex")
});
static SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_]\w*)\.([A-Z]\w*)").expect("selector regex"));

/// One import spec: the alias it is referenced by, and its import path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The package alias; defaults to the last path segment.
    pub alias: String,
    /// The quoted import path.
    pub path: String,
}

/// Enumerates the file's import specs.
///
/// Dot and blank imports are skipped: neither can appear in a qualified
/// selector.
pub fn parse_imports(text: &str) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut in_block = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if in_block {
            if trimmed.starts_with(')') {
                in_block = false;
                continue;
            }
            push_import(&mut imports, IMPORT_LINE_RE.captures(line));
        } else if trimmed == "import (" || trimmed.starts_with("import (") {
            in_block = true;
        } else if trimmed.starts_with("import ") {
            push_import(&mut imports, SINGLE_IMPORT_RE.captures(line));
        }
    }
    imports
}

fn push_import(imports: &mut Vec<Import>, captures: Option<regex::Captures<'_>>) {
    let Some(captures) = captures else { return };
    let path = captures[2].to_string();
    let alias = match captures.get(1) {
        Some(alias) if alias.as_str() == "." || alias.as_str() == "_" => return,
        Some(alias) => alias.as_str().to_string(),
        None => path.rsplit('/').next().unwrap_or(&path).to_string(),
    };
    imports.push(Import { alias, path });
}

/// Enumerates qualified `alias.Symbol` selectors whose alias is an import.
///
/// Returns `(import path, symbol)` pairs in first-appearance order,
/// deduplicated.
pub fn parse_selectors(text: &str, imports: &[Import]) -> Vec<(String, String)> {
    let aliases: HashMap<&str, &str> = imports
        .iter()
        .map(|import| (import.alias.as_str(), import.path.as_str()))
        .collect();

    let mut seen = std::collections::HashSet::new();
    let mut selectors = Vec::new();
    for captures in SELECTOR_RE.captures_iter(text) {
        let alias = &captures[1];
        let symbol = &captures[2];
        if let Some(path) = aliases.get(alias) {
            let pair = (path.to_string(), symbol.to_string());
            if seen.insert(pair.clone()) {
                selectors.push(pair);
            }
        }
    }
    selectors
}

/// Reads the `module` line of the nearest `go.mod` at or above `dir`.
pub fn find_module_path(dir: &Path) -> Option<String> {
    let mut current = Some(dir);
    while let Some(candidate) = current {
        let go_mod = candidate.join("go.mod");
        if let Ok(text) = fs::read_to_string(&go_mod) {
            for line in text.lines() {
                if let Some(module) = line.trim().strip_prefix("module ") {
                    return Some(module.trim().to_string());
                }
            }
            return None;
        }
        current = candidate.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_import() {
        let source = "package main\n\nimport \"fmt\"\n";
        let imports = parse_imports(source);
        assert_eq!(
            imports,
            vec![Import {
                alias: "fmt".to_string(),
                path: "fmt".to_string()
            }]
        );
    }

    #[test]
    fn test_import_block_with_aliases() {
        let source = r#"package main

import (
    "fmt"
    log "github.com/sirupsen/logrus"
    _ "embed"
    . "math"
)
"#;
        let imports = parse_imports(source);
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].alias, "fmt");
        assert_eq!(imports[1].alias, "log");
        assert_eq!(imports[1].path, "github.com/sirupsen/logrus");
    }

    #[test]
    fn test_default_alias_is_last_segment() {
        let source = "import \"github.com/pkg/errors\"\n";
        let imports = parse_imports(source);
        assert_eq!(imports[0].alias, "errors");
    }

    #[test]
    fn test_selectors_only_for_known_aliases() {
        let source = "import \"fmt\"\n\nfunc main() {\n    fmt.Println(x)\n    other.Thing()\n    fmt.Println(y)\n}\n";
        let imports = parse_imports(source);
        let selectors = parse_selectors(source, &imports);
        assert_eq!(selectors, vec![("fmt".to_string(), "Println".to_string())]);
    }

    #[test]
    fn test_lowercase_selectors_are_skipped() {
        let source = "import \"strings\"\n\nvar x = strings.builder\n";
        let imports = parse_imports(source);
        assert!(parse_selectors(source, &imports).is_empty());
    }

    #[test]
    fn test_find_module_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join("go.mod"),
            "module github.com/acme/widget\n\ngo 1.22\n",
        )
        .expect("write");
        let nested = temp.path().join("internal/app");
        std::fs::create_dir_all(&nested).expect("mkdir");

        assert_eq!(
            find_module_path(&nested).as_deref(),
            Some("github.com/acme/widget")
        );
    }
}
