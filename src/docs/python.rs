//! Indentation-scoped docstring extraction for Python sources.

use super::{DocEntry, DocKind};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)class\s+([A-Za-z_]\w*)\s*[(:]").expect("class regex"));
static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").expect("def regex"));

/// Extracts the module docstring plus class/function/method docstrings.
///
/// Names are qualified as `module`, `module.Class`, `module.Class.method`,
/// or `module.function`.
pub fn extract(module: &str, text: &str) -> Vec<DocEntry> {
    let lines: Vec<&str> = text.lines().collect();
    let mut entries = Vec::new();

    if let Some(body) = module_docstring(&lines) {
        entries.push(DocEntry::new(DocKind::Module, module.to_string(), &body));
    }

    // Stack of (indent, class name) for qualification.
    let mut class_stack: Vec<(usize, String)> = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        if let Some(captures) = CLASS_RE.captures(line) {
            let indent = captures[1].len();
            class_stack.retain(|(depth, _)| *depth < indent);
            let class_name = captures[2].to_string();
            let qualified = qualify(module, &class_stack, &class_name);
            if let Some(body) = block_docstring(&lines, index) {
                entries.push(DocEntry::new(DocKind::Class, qualified, &body));
            }
            class_stack.push((indent, class_name));
        } else if let Some(captures) = DEF_RE.captures(line) {
            let indent = captures[1].len();
            class_stack.retain(|(depth, _)| *depth < indent);
            let kind = if class_stack.is_empty() {
                DocKind::Function
            } else {
                DocKind::Method
            };
            let qualified = qualify(module, &class_stack, &captures[2]);
            if let Some(body) = block_docstring(&lines, index) {
                entries.push(DocEntry::new(kind, qualified, &body));
            }
        }
        index += 1;
    }
    entries
}

fn qualify(module: &str, class_stack: &[(usize, String)], name: &str) -> String {
    let mut parts = vec![module.to_string()];
    parts.extend(class_stack.iter().map(|(_, class)| class.clone()));
    parts.push(name.to_string());
    parts.join(".")
}

/// The docstring of the whole file: the first statement, when it is a
/// triple-quoted string.
fn module_docstring(lines: &[&str]) -> Option<String> {
    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return docstring_at(lines, index);
    }
    None
}

/// The docstring of the block whose header starts at `header_index`.
///
/// Headers may span lines; the docstring is the first statement after the
/// line ending the header with `:`.
fn block_docstring(lines: &[&str], header_index: usize) -> Option<String> {
    let mut end = header_index;
    loop {
        let trimmed = lines.get(end)?.trim_end();
        if trimmed.ends_with(':') {
            break;
        }
        end += 1;
        if end > header_index + 20 {
            return None;
        }
    }
    for index in end + 1..lines.len() {
        let trimmed = lines[index].trim();
        if trimmed.is_empty() {
            continue;
        }
        return docstring_at(lines, index);
    }
    None
}

/// Parses a triple-quoted string starting on `lines[start]`, if present.
fn docstring_at(lines: &[&str], start: usize) -> Option<String> {
    let trimmed = lines[start].trim_start();
    let rest = trimmed
        .strip_prefix("r\"\"\"")
        .or_else(|| trimmed.strip_prefix("\"\"\""))
        .map(|r| ("\"\"\"", r))
        .or_else(|| {
            trimmed
                .strip_prefix("r'''")
                .or_else(|| trimmed.strip_prefix("'''"))
                .map(|r| ("'''", r))
        });
    let (delimiter, first) = rest?;

    if let Some(body) = first.find(delimiter).map(|at| &first[..at]) {
        return Some(body.to_string());
    }

    let mut body = vec![first.to_string()];
    for line in lines.iter().skip(start + 1) {
        if let Some(at) = line.find(delimiter) {
            body.push(line[..at].to_string());
            return Some(body.join("\n"));
        }
        body.push((*line).to_string());
    }
    None // unterminated
}
