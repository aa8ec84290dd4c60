//! The producer: depth-first traversal emitting typed events.
//!
//! Traversal is strict pre-order: a directory's enter event precedes every
//! event for its entries, and its leave event (carrying the subtree
//! summary) follows them. Sibling order is deterministic: lexicographic by
//! name, directories and files interleaved. One walker streams all roots
//! of an invocation, finishing with a single `Summary` and `Done`.

use crate::classify::{classify, Classification};
use crate::config::Settings;
use crate::dispatch::EventSender;
use crate::docs::DocCollector;
use crate::errors::Result;
use crate::events::{
    format_size, ContentChunk, DirSummary, Event, FileMeta, NodeType, Payload, TokenCount,
    TreeNode, WalkSummary,
};
use crate::filtering::{compile_pattern, CompiledRule, IgnoreSet};
use crate::tokens::TokenCounter;
use crate::validate::ValidatedPath;
use base64::Engine;
use log::{debug, trace};
use std::fs;
use std::path::{Path, PathBuf};

/// Traversal options, derived once from the merged settings.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Emit content chunks and populate snapshot content.
    pub include_content: bool,
    /// Explicit exclusion patterns.
    pub exclude_patterns: Vec<String>,
    /// Honor `.gitignore` files at every level.
    pub use_gitignore: bool,
    /// Honor `.ignore` files at every level.
    pub use_ignore: bool,
    /// Traverse `.git` directories.
    pub include_git: bool,
    /// Binary files matching these patterns get base64 content.
    pub binary_content_patterns: Vec<String>,
}

impl WalkOptions {
    /// Extracts the traversal-relevant subset of the settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            include_content: settings.include_content,
            exclude_patterns: settings.exclude_patterns.clone(),
            use_gitignore: settings.use_gitignore,
            use_ignore: settings.use_ignore,
            include_git: settings.include_git,
            binary_content_patterns: settings.binary_content_patterns.clone(),
        }
    }
}

/// What one file contributed to its enclosing directory.
struct FileResult {
    bytes: u64,
    tokens: u64,
    node: TreeNode,
}

/// The streaming producer.
pub struct Walker {
    options: WalkOptions,
    counter: Option<TokenCounter>,
    docs: Option<DocCollector>,
    binary_rules: Vec<CompiledRule>,
}

impl Walker {
    /// Builds a walker; `counter` is present only when counting was
    /// requested and resolved, `docs` only when the mode is not disabled.
    pub fn new(
        options: WalkOptions,
        counter: Option<TokenCounter>,
        docs: Option<DocCollector>,
    ) -> Self {
        let binary_rules = options
            .binary_content_patterns
            .iter()
            .filter_map(|raw| compile_pattern(raw).ok().flatten())
            .collect();
        Self {
            options,
            counter,
            docs,
            binary_rules,
        }
    }

    /// Streams every root, then the invocation summary, then `done`.
    ///
    /// `pre_warnings` are messages produced before the walk (path
    /// validation), surfaced as warning events so they reach the error
    /// sink through the same stream as everything else.
    ///
    /// # Errors
    /// [`crate::errors::Error::Cancelled`] when the token trips; I/O
    /// problems below a root are warnings, not errors.
    pub fn stream(
        &mut self,
        roots: &[ValidatedPath],
        pre_warnings: &[String],
        out: &EventSender,
    ) -> Result<()> {
        for message in pre_warnings {
            out.send(Event::new(
                None,
                Payload::Warning {
                    level: crate::events::WarnLevel::Warning,
                    message: message.clone(),
                },
            ))?;
        }

        let mut totals = WalkSummary::default();
        if let Some(counter) = &self.counter {
            totals.model = counter.model_name().to_string();
        }

        for root in roots {
            out.send(Event::start(root.path.clone()))?;
            debug!("Walking root {}", root.path.display());

            let node = if root.is_dir {
                let (set, warnings) = IgnoreSet::root(
                    &self.options.exclude_patterns,
                    self.options.use_gitignore,
                    self.options.use_ignore,
                    self.options.include_git,
                );
                for message in warnings {
                    out.send(Event::skip_warning(&root.path, message))?;
                }
                match self.visit_dir(&root.path, Path::new(""), 0, &set, out)? {
                    Some((summary, node)) => {
                        totals.total_files += summary.files;
                        totals.total_size_bytes += summary.bytes;
                        totals.total_tokens += summary.tokens;
                        Some(node)
                    }
                    None => None,
                }
            } else {
                let metadata = match fs::symlink_metadata(&root.path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        out.send(Event::skip_warning(&root.path, e))?;
                        continue;
                    }
                };
                let rel = PathBuf::from(root.path.file_name().unwrap_or_default());
                match self.emit_file(&root.path, &rel, 0, &metadata, out)? {
                    Some(result) => {
                        totals.total_files += 1;
                        totals.total_size_bytes += result.bytes;
                        totals.total_tokens += result.tokens;
                        Some(result.node)
                    }
                    None => None,
                }
            };

            if let Some(node) = node {
                out.send(Event::new(
                    Some(root.path.clone()),
                    Payload::Tree(Box::new(node)),
                ))?;
            }
        }

        out.send(Event::new(None, Payload::Summary(totals)))?;
        out.send(Event::new(None, Payload::Done))
    }

    /// Visits one directory: enter event, sorted children, leave event.
    ///
    /// Returns `None` when the directory could not be listed (reported as
    /// a warning).
    fn visit_dir(
        &mut self,
        abs: &Path,
        rel: &Path,
        depth: usize,
        enclosing: &IgnoreSet,
        out: &EventSender,
    ) -> Result<Option<(DirSummary, TreeNode)>> {
        let entries = match fs::read_dir(abs) {
            Ok(entries) => entries,
            Err(e) => {
                out.send(Event::skip_warning(abs, e))?;
                return Ok(None);
            }
        };

        let (set, warnings) = enclosing.descend(abs, rel);
        out.send(Event::new(
            Some(abs.to_path_buf()),
            Payload::DirEnter { depth },
        ))?;
        for message in warnings {
            out.send(Event::skip_warning(abs, message))?;
        }

        let mut children: Vec<fs::DirEntry> = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => children.push(entry),
                Err(e) => out.send(Event::skip_warning(abs, e))?,
            }
        }
        children.sort_by_key(|entry| entry.file_name());

        let mut node = dir_node(abs);
        let mut summary = DirSummary::default();

        for child in children {
            out.token().guard()?;
            let child_abs = child.path();
            let child_rel = rel.join(child.file_name());
            let file_type = match child.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    out.send(Event::skip_warning(&child_abs, e))?;
                    continue;
                }
            };
            if file_type.is_symlink() {
                trace!("Not following symlink {}", child_abs.display());
                continue;
            }
            if set.is_ignored(&child_rel, file_type.is_dir()) {
                trace!("Ignoring {}", child_rel.display());
                continue;
            }

            if file_type.is_dir() {
                if let Some((child_summary, child_node)) =
                    self.visit_dir(&child_abs, &child_rel, depth + 1, &set, out)?
                {
                    summary.absorb(&child_summary);
                    node.children.push(child_node);
                }
            } else if file_type.is_file() {
                let metadata = match child.metadata() {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        out.send(Event::skip_warning(&child_abs, e))?;
                        continue;
                    }
                };
                if let Some(result) =
                    self.emit_file(&child_abs, &child_rel, depth + 1, &metadata, out)?
                {
                    summary.files += 1;
                    summary.bytes += result.bytes;
                    summary.tokens += result.tokens;
                    node.children.push(result.node);
                }
            }
            // Sockets, fifos, and devices are silently skipped.
        }

        out.send(Event::new(
            Some(abs.to_path_buf()),
            Payload::DirLeave {
                depth,
                summary: summary.clone(),
            },
        ))?;

        node.total_files = summary.files;
        node.total_size = format_size(summary.bytes);
        node.total_tokens = summary.tokens;
        Ok(Some((summary, node)))
    }

    /// Classifies one file, emits its `file` event and optional chunk, and
    /// returns its snapshot node. `None` means the file was skipped.
    fn emit_file(
        &mut self,
        abs: &Path,
        rel: &Path,
        depth: usize,
        metadata: &fs::Metadata,
        out: &EventSender,
    ) -> Result<Option<FileResult>> {
        let classification = match classify(abs, metadata) {
            Ok(classification) => classification,
            Err(e) => {
                out.send(Event::skip_warning(abs, &e))?;
                Classification::degraded(metadata)
            }
        };

        let wants_text = !classification.is_binary
            && (self.options.include_content
                || self.counter.is_some()
                || self.docs.is_some());
        let wants_binary_bytes = classification.is_binary
            && self.options.include_content
            && self.binary_content_matches(rel);

        let mut text: Option<String> = None;
        let mut raw_bytes: Option<Vec<u8>> = None;
        if wants_text || wants_binary_bytes {
            match fs::read(abs) {
                Ok(bytes) => {
                    if wants_text {
                        match String::from_utf8(bytes) {
                            Ok(decoded) => text = Some(decoded),
                            Err(undecoded) => {
                                out.send(Event::skip_warning(
                                    abs,
                                    "content is not valid UTF-8, treating as opaque",
                                ))?;
                                raw_bytes = Some(undecoded.into_bytes());
                            }
                        }
                    } else {
                        raw_bytes = Some(bytes);
                    }
                }
                Err(e) => {
                    out.send(Event::skip_warning(abs, e))?;
                    return Ok(None);
                }
            }
        }

        let tokens = match (&self.counter, &text) {
            (Some(counter), Some(text)) => Some(TokenCount {
                counted: true,
                tokens: counter.count_str(text),
                model: counter.model_name().to_string(),
            }),
            _ => None,
        };

        let mut documentation = Vec::new();
        if let (Some(docs), Some(text)) = (self.docs.as_mut(), &text) {
            let outcome = docs.collect_from_file(abs, text);
            for message in outcome.warnings {
                out.send(Event::new(
                    Some(abs.to_path_buf()),
                    Payload::Warning {
                        level: crate::events::WarnLevel::Info,
                        message,
                    },
                ))?;
            }
            documentation = outcome.entries;
        }

        let name = abs
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = FileMeta {
            path: abs.to_path_buf(),
            name: name.clone(),
            depth,
            size_bytes: classification.size_bytes,
            mime_type: classification.mime_type.clone(),
            is_binary: classification.is_binary,
            last_modified: classification.last_modified.clone(),
            tokens: tokens.clone(),
            documentation: documentation.clone(),
        };
        out.send(Event::new(Some(abs.to_path_buf()), Payload::File(meta)))?;

        let mut content_for_node = String::new();
        if self.options.include_content {
            let chunk = if let Some(text) = &text {
                content_for_node = text.clone();
                ContentChunk {
                    data: text.clone(),
                    encoding: "utf-8".to_string(),
                    index: 0,
                    is_final: true,
                }
            } else if let Some(bytes) = &raw_bytes {
                ContentChunk {
                    data: base64::engine::general_purpose::STANDARD.encode(bytes),
                    encoding: "base64".to_string(),
                    index: 0,
                    is_final: true,
                }
            } else {
                // Binary content not enabled for this file: an empty,
                // final chunk keeps the per-file chunk contract intact.
                ContentChunk {
                    data: String::new(),
                    encoding: String::new(),
                    index: 0,
                    is_final: true,
                }
            };
            out.send(Event::new(Some(abs.to_path_buf()), Payload::Chunk(chunk)))?;
        }

        let node_type = if classification.is_binary {
            NodeType::Binary
        } else {
            NodeType::File
        };
        let mut node = TreeNode::new(abs.display().to_string(), name, node_type);
        node.size = format_size(classification.size_bytes);
        node.size_bytes = classification.size_bytes;
        node.last_modified = classification.last_modified;
        node.mime_type = classification.mime_type;
        node.content = content_for_node;
        node.documentation = documentation;
        let mut counted_tokens = 0;
        if let Some(count) = tokens {
            node.tokens = count.tokens;
            node.model = count.model;
            counted_tokens = count.tokens;
        }

        Ok(Some(FileResult {
            bytes: classification.size_bytes,
            tokens: counted_tokens,
            node,
        }))
    }

    fn binary_content_matches(&self, rel: &Path) -> bool {
        self.binary_rules
            .iter()
            .any(|rule| rule.evaluate(&rel.to_string_lossy().replace('\\', "/"), false) == Some(true))
    }
}

fn dir_node(abs: &Path) -> TreeNode {
    let name = abs
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| abs.display().to_string());
    let mut node = TreeNode::new(abs.display().to_string(), name, NodeType::Directory);
    if let Ok(metadata) = fs::symlink_metadata(abs) {
        if let Ok(mtime) = metadata.modified() {
            node.last_modified = chrono::DateTime::<chrono::Local>::from(mtime)
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        }
    }
    node
}
