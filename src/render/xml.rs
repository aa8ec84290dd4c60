//! The XML renderer.
//!
//! Mirrors the JSON data model as `<node>` element trees. The declaration
//! is written once; multiple roots are wrapped in `<results>` elements
//! written incrementally. Text content is escaped with `quick-xml`.

use super::{route_diagnostic, RenderOptions, Renderer};
use crate::errors::Result;
use crate::events::{Event, NodeType, Payload, TreeNode};
use quick_xml::escape::escape;
use std::io::Write;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

pub struct XmlRenderer {
    options: RenderOptions,
    declaration_written: bool,
    roots_emitted: usize,
}

impl XmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            declaration_written: false,
            roots_emitted: 0,
        }
    }

    fn multi_root(&self) -> bool {
        self.options.root_count > 1
    }
}

impl Renderer for XmlRenderer {
    fn handle(&mut self, event: &Event, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        if route_diagnostic(event, err)? {
            return Ok(());
        }
        if let Payload::Tree(node) = &event.payload {
            if !self.declaration_written {
                writeln!(out, "{}", XML_DECLARATION)?;
                if self.multi_root() {
                    writeln!(out, "<results>")?;
                }
                self.declaration_written = true;
            }
            let depth = usize::from(self.multi_root());
            write_node(out, node, depth)?;
            self.roots_emitted += 1;
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write, _err: &mut dyn Write) -> Result<()> {
        if self.declaration_written && self.multi_root() {
            writeln!(out, "</results>")?;
        }
        out.flush()?;
        Ok(())
    }
}

fn write_node(out: &mut dyn Write, node: &TreeNode, depth: usize) -> Result<()> {
    let pad = "  ".repeat(depth);
    writeln!(out, "{}<node>", pad)?;

    element(out, depth + 1, "path", &node.path)?;
    element(out, depth + 1, "name", &node.name)?;
    element(out, depth + 1, "type", node.node_type.label())?;
    if !node.size.is_empty() {
        element(out, depth + 1, "size", &node.size)?;
    }
    if node.size_bytes > 0 {
        element(out, depth + 1, "sizeBytes", &node.size_bytes.to_string())?;
    }
    if !node.last_modified.is_empty() {
        element(out, depth + 1, "lastModified", &node.last_modified)?;
    }
    if !node.mime_type.is_empty() {
        element(out, depth + 1, "mimeType", &node.mime_type)?;
    }
    if node.tokens > 0 {
        element(out, depth + 1, "tokens", &node.tokens.to_string())?;
    }
    if !node.model.is_empty() {
        element(out, depth + 1, "model", &node.model)?;
    }
    if !node.content.is_empty() {
        element(out, depth + 1, "content", &node.content)?;
    }
    if !node.documentation.is_empty() {
        let entry_pad = "  ".repeat(depth + 1);
        writeln!(out, "{}<documentation>", entry_pad)?;
        for entry in &node.documentation {
            let inner = "  ".repeat(depth + 2);
            writeln!(out, "{}<entry>", inner)?;
            element(out, depth + 3, "kind", doc_kind_label(entry.kind))?;
            element(out, depth + 3, "name", &entry.name)?;
            element(out, depth + 3, "body", &entry.body)?;
            writeln!(out, "{}</entry>", inner)?;
        }
        writeln!(out, "{}</documentation>", entry_pad)?;
    }
    if node.node_type == NodeType::Directory {
        element(out, depth + 1, "totalFiles", &node.total_files.to_string())?;
        if !node.total_size.is_empty() {
            element(out, depth + 1, "totalSize", &node.total_size)?;
        }
        if node.total_tokens > 0 {
            element(out, depth + 1, "totalTokens", &node.total_tokens.to_string())?;
        }
    }
    if !node.children.is_empty() {
        let child_pad = "  ".repeat(depth + 1);
        writeln!(out, "{}<children>", child_pad)?;
        for child in &node.children {
            write_node(out, child, depth + 2)?;
        }
        writeln!(out, "{}</children>", child_pad)?;
    }

    writeln!(out, "{}</node>", pad)?;
    Ok(())
}

fn element(out: &mut dyn Write, depth: usize, tag: &str, text: &str) -> Result<()> {
    writeln!(out, "{}<{}>{}</{}>", "  ".repeat(depth), tag, escape(text), tag)?;
    Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandKind;
    use std::path::PathBuf;

    fn options(root_count: usize) -> RenderOptions {
        RenderOptions {
            command: CommandKind::Tree,
            summary: true,
            tokens: false,
            root_count,
        }
    }

    fn tree(path: &str) -> TreeNode {
        let mut root =
            TreeNode::new(path.to_string(), "root".to_string(), NodeType::Directory);
        let mut file = TreeNode::new(
            format!("{}/a.txt", path),
            "a.txt".to_string(),
            NodeType::File,
        );
        file.size = "4b".to_string();
        file.size_bytes = 4;
        root.total_files = 1;
        root.total_size = "4b".to_string();
        root.children.push(file);
        root
    }

    fn render(trees: Vec<TreeNode>, root_count: usize) -> String {
        let mut renderer = XmlRenderer::new(options(root_count));
        let mut out = Vec::new();
        let mut err = Vec::new();
        for node in trees {
            let event = Event::new(
                Some(PathBuf::from(node.path.clone())),
                Payload::Tree(Box::new(node)),
            );
            renderer.handle(&event, &mut out, &mut err).expect("handle");
        }
        renderer.finish(&mut out, &mut err).expect("finish");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_root_layout() {
        let out = render(vec![tree("/r")], 1);
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<node>\n"));
        assert!(out.contains("  <path>/r</path>\n"));
        assert!(out.contains("  <totalFiles>1</totalFiles>\n"));
        assert!(out.contains("  <children>\n    <node>\n      <path>/r/a.txt</path>\n"));
        assert!(out.ends_with("</node>\n"));
        assert!(!out.contains("<results>"));
    }

    #[test]
    fn test_multi_root_wrapped_in_results() {
        let out = render(vec![tree("/a"), tree("/b")], 2);
        assert_eq!(out.matches("<?xml").count(), 1);
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<results>\n"));
        assert!(out.ends_with("</results>\n"));
        assert_eq!(out.matches("<path>/a</path>").count(), 1);
        assert_eq!(out.matches("<path>/b</path>").count(), 1);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut node = tree("/r");
        node.children[0].content = "if a < b && c > d {}".to_string();
        let out = render(vec![node], 1);
        assert!(out.contains("<content>if a &lt; b &amp;&amp; c &gt; d {}</content>"));
    }

    #[test]
    fn test_no_roots_is_empty_output() {
        assert_eq!(render(Vec::new(), 2), "");
    }
}
