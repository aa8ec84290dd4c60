//! The raw text renderer.
//!
//! Tree commands print an indented outline with per-directory summaries;
//! content commands print `File:` sections with the accumulated chunk
//! data, a final summary, and each root's snapshot as an appended tree.

use super::{format_file_count, route_diagnostic, RenderOptions, Renderer};
use crate::config::CommandKind;
use crate::errors::Result;
use crate::events::{DirSummary, Event, FileMeta, NodeType, Payload, TreeNode, WalkSummary};
use std::io::Write;
use std::path::Path;

const SECTION_SEPARATOR: &str = "----------------------------------------"; // 40 dashes

pub struct RawRenderer {
    options: RenderOptions,
    /// Snapshots held back until after the final summary (content mode).
    pending_trees: Vec<TreeNode>,
    totals: Option<WalkSummary>,
    /// Whether the current file's chunk data ended with a newline.
    chunk_ended_with_newline: bool,
}

impl RawRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            pending_trees: Vec::new(),
            totals: None,
            chunk_ended_with_newline: true,
        }
    }

    fn handle_tree_mode(&mut self, event: &Event, out: &mut dyn Write) -> Result<()> {
        match &event.payload {
            Payload::DirEnter { depth } => {
                let path = event.path.as_deref().unwrap_or_else(|| Path::new(""));
                let label = if *depth == 0 {
                    path.display().to_string()
                } else {
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string())
                };
                writeln!(out, "{}{}", indent(*depth), label)?;
            }
            Payload::File(meta) => {
                writeln!(out, "{}{}", indent(meta.depth), file_label(meta))?;
            }
            Payload::DirLeave { depth, summary } => {
                if self.options.summary {
                    writeln!(out, "{}{}", indent(*depth), summary_line(summary, self.options.tokens))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_content_mode(&mut self, event: &Event, out: &mut dyn Write) -> Result<()> {
        match &event.payload {
            Payload::File(_) => {
                let path = event.path.as_deref().unwrap_or_else(|| Path::new(""));
                writeln!(out, "File: {}", path.display())?;
                self.chunk_ended_with_newline = true;
            }
            Payload::Chunk(chunk) => {
                if !chunk.data.is_empty() {
                    out.write_all(chunk.data.as_bytes())?;
                    self.chunk_ended_with_newline = chunk.data.ends_with('\n');
                }
                if chunk.is_final {
                    if !self.chunk_ended_with_newline {
                        writeln!(out)?;
                    }
                    let path = event.path.as_deref().unwrap_or_else(|| Path::new(""));
                    writeln!(out, "End of file: {}", path.display())?;
                    writeln!(out, "{}", SECTION_SEPARATOR)?;
                }
            }
            Payload::Tree(node) => {
                self.pending_trees.push(node.as_ref().clone());
            }
            Payload::Summary(totals) => {
                self.totals = Some(totals.clone());
            }
            _ => {}
        }
        Ok(())
    }
}

impl Renderer for RawRenderer {
    fn handle(&mut self, event: &Event, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        if route_diagnostic(event, err)? {
            return Ok(());
        }
        match self.options.command {
            CommandKind::Tree => self.handle_tree_mode(event, out),
            CommandKind::Content => self.handle_content_mode(event, out),
        }
    }

    fn finish(&mut self, out: &mut dyn Write, _err: &mut dyn Write) -> Result<()> {
        if self.options.command == CommandKind::Content {
            if self.options.summary {
                if let Some(totals) = &self.totals {
                    let mut line = format!(
                        "Summary: {}, {}",
                        format_file_count(totals.total_files),
                        crate::events::format_size(totals.total_size_bytes)
                    );
                    if self.options.tokens {
                        line.push_str(&format!(", {} tokens", totals.total_tokens));
                    }
                    writeln!(out, "{}", line)?;
                }
            }
            for tree in std::mem::take(&mut self.pending_trees) {
                writeln!(out, "--- Directory Tree: {} ---", tree.path)?;
                write_tree(out, &tree, 0)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * 2)
}

fn file_label(meta: &FileMeta) -> String {
    if meta.is_binary {
        format!("[Binary] {} (Mime Type: {})", meta.name, meta.mime_type)
    } else if let Some(count) = meta.tokens.as_ref().filter(|count| count.counted) {
        format!("[File] {} ({} tokens)", meta.name, count.tokens)
    } else {
        format!("[File] {}", meta.name)
    }
}

fn summary_line(summary: &DirSummary, with_tokens: bool) -> String {
    let mut line = format!(
        "Summary: {}, {}",
        format_file_count(summary.files),
        crate::events::format_size(summary.bytes)
    );
    if with_tokens {
        line.push_str(&format!(", {} tokens", summary.tokens));
    }
    line
}

/// Renders a snapshot as the same outline the tree command streams.
fn write_tree(out: &mut dyn Write, node: &TreeNode, depth: usize) -> Result<()> {
    let label = match node.node_type {
        NodeType::Directory => {
            if depth == 0 {
                node.path.clone()
            } else {
                node.name.clone()
            }
        }
        NodeType::Binary => format!("[Binary] {} (Mime Type: {})", node.name, node.mime_type),
        NodeType::File => {
            if node.tokens > 0 {
                format!("[File] {} ({} tokens)", node.name, node.tokens)
            } else {
                format!("[File] {}", node.name)
            }
        }
    };
    writeln!(out, "{}{}", indent(depth), label)?;
    for child in &node.children {
        write_tree(out, child, depth + 1)?;
    }
    Ok(())
}
