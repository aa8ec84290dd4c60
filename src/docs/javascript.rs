//! JSDoc-style block comment extraction for JavaScript and TypeScript.

use super::{DocEntry, DocKind};
use once_cell::sync::Lazy;
use regex::Regex;

// A `/** ... */` block immediately preceding a function, class, or
// const-arrow declaration, with optional export/default/async keywords.
static DOC_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)/\*\*(.*?)\*/\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(?:async\s+)?(?:(?:function\s*\*?\s*(?P<func>[A-Za-z_$][\w$]*))|(?:class\s+(?P<class>[A-Za-z_$][\w$]*))|(?:(?:const|let|var)\s+(?P<binding>[A-Za-z_$][\w$]*)\s*=))",
    )
    .expect("doc block regex")
});

/// Extracts documented declarations, qualifying names as `module.name`.
pub fn extract(module: &str, text: &str) -> Vec<DocEntry> {
    let mut entries = Vec::new();
    for captures in DOC_BLOCK_RE.captures_iter(text) {
        let body = clean_block(&captures[1]);
        if body.is_empty() {
            continue;
        }
        let (kind, name) = if let Some(name) = captures.name("class") {
            (DocKind::Class, name.as_str())
        } else if let Some(name) = captures.name("func") {
            (DocKind::Function, name.as_str())
        } else if let Some(name) = captures.name("binding") {
            (DocKind::Function, name.as_str())
        } else {
            continue;
        };
        entries.push(DocEntry::new(kind, format!("{}.{}", module, name), &body));
    }
    entries
}

/// Strips the leading `*` gutter from a block comment body.
fn clean_block(body: &str) -> String {
    body.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed.strip_prefix("* ").or_else(|| trimmed.strip_prefix('*')).unwrap_or(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_function() {
        let source = r#"/**
 * Adds two numbers.
 */
export function add(a, b) {
  return a + b;
}
"#;
        let entries = extract("math", source);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DocKind::Function);
        assert_eq!(entries[0].name, "math.add");
        assert_eq!(entries[0].body, "Adds two numbers.");
    }

    #[test]
    fn test_class_declaration() {
        let source = "/** A counter. */\nclass Counter {}\n";
        let entries = extract("state", source);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DocKind::Class);
        assert_eq!(entries[0].name, "state.Counter");
        assert_eq!(entries[0].body, "A counter.");
    }

    #[test]
    fn test_const_arrow_binding() {
        let source = "/** Doubles x. */\nexport const double = (x) => x * 2;\n";
        let entries = extract("ops", source);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ops.double");
    }

    #[test]
    fn test_plain_comment_is_ignored() {
        let source = "/* not jsdoc */\nfunction hidden() {}\n";
        assert!(extract("m", source).is_empty());
    }

    #[test]
    fn test_detached_block_is_ignored() {
        let source = "/** Floating comment. */\nconst x = 1 + 1;\nlet y;\n/** File footer */\n";
        let entries = extract("m", source);
        // The first block binds to `const x =`; the footer binds nothing.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "m.x");
    }

    #[test]
    fn test_async_and_default_export() {
        let source = "/** Loads data. */\nexport default async function load() {}\n";
        let entries = extract("api", source);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "api.load");
        assert_eq!(entries[0].body, "Loads data.");
    }
}
