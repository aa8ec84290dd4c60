//! The compact indented ("toon") renderer.
//!
//! Tree snapshots render as nested, key-named fields with two-space
//! indentation; arrays declare their length (`children[2]:`) and list
//! their items with `- `. Strings are quoted only when they contain
//! characters outside `[A-Za-z0-9_.\-/\\@~+]`.

use super::{route_diagnostic, RenderOptions, Renderer};
use crate::errors::Result;
use crate::events::{Event, NodeType, Payload, TreeNode, WalkSummary};
use std::io::Write;

pub struct ToonRenderer {
    options: RenderOptions,
    header_written: bool,
    totals: Option<WalkSummary>,
}

impl ToonRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            header_written: false,
            totals: None,
        }
    }

    fn write_header(&mut self, out: &mut dyn Write, count: usize) -> Result<()> {
        if !self.header_written {
            writeln!(out, "roots[{}]:", count)?;
            self.header_written = true;
        }
        Ok(())
    }

    fn write_node(&self, out: &mut dyn Write, node: &TreeNode, indent: usize) -> Result<()> {
        let item_pad = "  ".repeat(indent);
        let field_pad = "  ".repeat(indent + 1);

        writeln!(out, "{}- path: {}", item_pad, scalar(&node.path))?;
        writeln!(out, "{}type: {}", field_pad, node.node_type.label())?;

        match node.node_type {
            NodeType::Directory => {
                if !node.last_modified.is_empty() {
                    writeln!(out, "{}lastModified: {}", field_pad, scalar(&node.last_modified))?;
                }
                writeln!(out, "{}totalFiles: {}", field_pad, node.total_files)?;
                if !node.total_size.is_empty() {
                    writeln!(out, "{}totalSize: {}", field_pad, scalar(&node.total_size))?;
                }
                if node.total_tokens > 0 {
                    writeln!(out, "{}totalTokens: {}", field_pad, node.total_tokens)?;
                }
                writeln!(out, "{}children[{}]:", field_pad, node.children.len())?;
                for child in &node.children {
                    self.write_node(out, child, indent + 2)?;
                }
            }
            NodeType::File | NodeType::Binary => {
                writeln!(out, "{}size: {}", field_pad, scalar(&node.size))?;
                writeln!(out, "{}sizeBytes: {}", field_pad, node.size_bytes)?;
                if !node.last_modified.is_empty() {
                    writeln!(out, "{}lastModified: {}", field_pad, scalar(&node.last_modified))?;
                }
                if !node.mime_type.is_empty() {
                    writeln!(out, "{}mimeType: {}", field_pad, scalar(&node.mime_type))?;
                }
                if node.tokens > 0 || !node.model.is_empty() {
                    writeln!(out, "{}tokens: {}", field_pad, node.tokens)?;
                    writeln!(out, "{}model: {}", field_pad, scalar(&node.model))?;
                }
                if !node.content.is_empty() {
                    writeln!(out, "{}content: {}", field_pad, scalar(&node.content))?;
                }
                if !node.documentation.is_empty() {
                    writeln!(
                        out,
                        "{}documentation[{}]:",
                        field_pad,
                        node.documentation.len()
                    )?;
                    let entry_pad = "  ".repeat(indent + 2);
                    let entry_field_pad = "  ".repeat(indent + 3);
                    for entry in &node.documentation {
                        writeln!(
                            out,
                            "{}- kind: {}",
                            entry_pad,
                            scalar(doc_kind_label(entry.kind))
                        )?;
                        writeln!(out, "{}name: {}", entry_field_pad, scalar(&entry.name))?;
                        writeln!(out, "{}body: {}", entry_field_pad, scalar(&entry.body))?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Renderer for ToonRenderer {
    fn handle(&mut self, event: &Event, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        if route_diagnostic(event, err)? {
            return Ok(());
        }
        match &event.payload {
            Payload::Tree(node) => {
                let count = self.options.root_count;
                self.write_header(out, count)?;
                self.write_node(out, node, 1)?;
            }
            Payload::Summary(totals) => {
                self.totals = Some(totals.clone());
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write, _err: &mut dyn Write) -> Result<()> {
        if self.options.summary {
            if !self.header_written {
                // Nothing was rendered; declare the empty root list.
                writeln!(out, "roots[0]:")?;
                self.header_written = true;
            }
            let totals = self.totals.clone().unwrap_or_default();
            writeln!(out, "summary:")?;
            writeln!(out, "  totalFiles: {}", totals.total_files)?;
            writeln!(
                out,
                "  totalSize: {}",
                scalar(&crate::events::format_size(totals.total_size_bytes))
            )?;
            if self.options.tokens {
                writeln!(out, "  totalTokens: {}", totals.total_tokens)?;
                if !totals.model.is_empty() {
                    writeln!(out, "  model: {}", scalar(&totals.model))?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn doc_kind_label(kind: crate::docs::DocKind) -> &'static str {
    use crate::docs::DocKind;
    match kind {
        DocKind::Module => "module",
        DocKind::Package => "package",
        DocKind::Class => "class",
        DocKind::Function => "function",
        DocKind::Method => "method",
    }
}

/// Quotes a string when it contains characters outside the safe set.
fn scalar(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_safe_char) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn is_safe_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-' | '/' | '\\' | '@' | '~' | '+')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandKind;
    use std::path::PathBuf;

    fn options(summary: bool) -> RenderOptions {
        RenderOptions {
            command: CommandKind::Tree,
            summary,
            tokens: false,
            root_count: 1,
        }
    }

    fn render(events: Vec<Event>, options: RenderOptions) -> String {
        let mut renderer = ToonRenderer::new(options);
        let mut out = Vec::new();
        let mut err = Vec::new();
        for event in &events {
            renderer.handle(event, &mut out, &mut err).expect("handle");
        }
        renderer.finish(&mut out, &mut err).expect("finish");
        String::from_utf8(out).unwrap()
    }

    fn single_file_tree() -> TreeNode {
        let mut root =
            TreeNode::new("/tmp/root".to_string(), "root".to_string(), NodeType::Directory);
        let mut file = TreeNode::new(
            "/tmp/root/a.txt".to_string(),
            "a.txt".to_string(),
            NodeType::File,
        );
        file.size = "4b".to_string();
        file.size_bytes = 4;
        file.mime_type = "text/plain".to_string();
        root.total_files = 1;
        root.total_size = "4b".to_string();
        root.children.push(file);
        root
    }

    #[test]
    fn test_single_root_layout() {
        let tree = single_file_tree();
        let events = vec![
            Event::new(
                Some(PathBuf::from("/tmp/root")),
                Payload::Tree(Box::new(tree)),
            ),
            Event::new(
                None,
                Payload::Summary(WalkSummary {
                    total_files: 1,
                    total_size_bytes: 4,
                    total_tokens: 0,
                    model: String::new(),
                }),
            ),
            Event::new(None, Payload::Done),
        ];
        let out = render(events, options(true));

        assert!(out.starts_with("roots[1]:\n  - path: /tmp/root\n    type: directory\n"));
        assert!(out.contains("    children[1]:\n      - path: /tmp/root/a.txt\n        type: file\n        size: 4b\n"));
        assert!(out.ends_with("summary:\n  totalFiles: 1\n  totalSize: 4b\n"));
    }

    #[test]
    fn test_empty_stream_with_summary() {
        let events = vec![
            Event::new(None, Payload::Summary(WalkSummary::default())),
            Event::new(None, Payload::Done),
        ];
        let out = render(events, options(true));
        assert_eq!(out, "roots[0]:\nsummary:\n  totalFiles: 0\n  totalSize: 0b\n");
    }

    #[test]
    fn test_empty_stream_without_summary() {
        let events = vec![Event::new(None, Payload::Done)];
        let out = render(events, options(false));
        assert_eq!(out, "");
    }

    #[test]
    fn test_scalar_quoting_rule() {
        assert_eq!(scalar("/tmp/root/a.txt"), "/tmp/root/a.txt");
        assert_eq!(scalar("name with space"), "\"name with space\"");
        assert_eq!(scalar("2026-08-01T10:00:00+00:00"), "\"2026-08-01T10:00:00+00:00\"");
        assert_eq!(scalar("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(scalar("he said \"hi\""), "\"he said \\\"hi\\\"\"");
        assert_eq!(scalar(""), "\"\"");
    }

    #[test]
    fn test_tokens_render_in_summary_when_active() {
        let mut options = options(true);
        options.tokens = true;
        let events = vec![Event::new(
            None,
            Payload::Summary(WalkSummary {
                total_files: 2,
                total_size_bytes: 2048,
                total_tokens: 17,
                model: "gpt-4o".to_string(),
            }),
        )];
        let out = render(events, options);
        assert!(out.ends_with(
            "summary:\n  totalFiles: 2\n  totalSize: 2kb\n  totalTokens: 17\n  model: gpt-4o\n"
        ));
    }

    #[test]
    fn test_documentation_entries_render_as_list() {
        use crate::docs::{DocEntry, DocKind};
        let mut root = single_file_tree();
        root.children[0]
            .documentation
            .push(DocEntry::new(DocKind::Module, "app", "App module."));
        let events = vec![Event::new(
            Some(PathBuf::from("/tmp/root")),
            Payload::Tree(Box::new(root)),
        )];
        let out = render(events, options(false));
        assert!(out.contains("        documentation[1]:\n          - kind: module\n            name: app\n            body: \"App module.\"\n"));
    }
}
