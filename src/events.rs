//! The versioned event vocabulary shared by the walker and the renderers.
//!
//! Every event carries the schema version, an optional subject path, and
//! exactly one payload variant. The walker emits events in strict pre-order
//! (enter before children, leave with the subtree summary after them) and
//! finishes every invocation with `Summary` followed by `Done`.

use crate::docs::DocEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stable schema version stamped on every event.
///
/// Consumers that observe a higher version must degrade to best-effort
/// rendering rather than fail.
pub const SCHEMA_VERSION: u32 = 1;

/// Bounded channel capacity between producer and consumer.
pub const CHANNEL_CAPACITY: usize = 64;

/// Node classification used in tree snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A text file.
    File,
    /// A directory.
    Directory,
    /// A file detected as binary.
    Binary,
}

impl NodeType {
    /// Lowercase label used by the textual renderers.
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::File => "file",
            NodeType::Directory => "directory",
            NodeType::Binary => "binary",
        }
    }
}

/// Result of counting tokens for a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    /// Whether a count was actually produced.
    pub counted: bool,
    /// Number of tokens; zero when `counted` is false.
    pub tokens: u64,
    /// The resolved model the count was made against.
    pub model: String,
}

/// Aggregates for the subtree rooted at a directory, built bottom-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirSummary {
    /// Number of (non-ignored) files in the subtree.
    pub files: u64,
    /// Sum of their sizes in bytes.
    pub bytes: u64,
    /// Sum of their token counts, when counting is active.
    pub tokens: u64,
}

impl DirSummary {
    /// Folds a child subtree's totals into this summary.
    pub fn absorb(&mut self, child: &DirSummary) {
        self.files += child.files;
        self.bytes += child.bytes;
        self.tokens += child.tokens;
    }
}

/// Whole-invocation totals, summed over every root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Files across all roots.
    pub total_files: u64,
    /// Bytes across all roots.
    pub total_size_bytes: u64,
    /// Tokens across all roots, when counting is active.
    pub total_tokens: u64,
    /// The model tokens were counted against; empty when counting is off.
    pub model: String,
}

/// Metadata for a single file, emitted before any of its content chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMeta {
    /// Absolute path.
    pub path: PathBuf,
    /// Base name.
    pub name: String,
    /// Segments below the invocation root (root itself is depth 0).
    pub depth: usize,
    /// Size in bytes from lstat.
    pub size_bytes: u64,
    /// Detected MIME type.
    pub mime_type: String,
    /// Whether the head bytes classified as binary.
    pub is_binary: bool,
    /// Last-modified timestamp, RFC 3339.
    pub last_modified: String,
    /// Token count when counting is active and the file is text.
    pub tokens: Option<TokenCount>,
    /// Documentation entries extracted from the file.
    pub documentation: Vec<DocEntry>,
}

/// A single emission of file bytes.
///
/// Today the walker emits exactly one chunk per file; the `index`/`is_final`
/// pair permits multi-chunk streaming without a schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChunk {
    /// Chunk payload: UTF-8 text, base64, or empty.
    pub data: String,
    /// `"utf-8"`, `"base64"`, or `""` when binary content is not included.
    pub encoding: String,
    /// 0-based, monotonically increasing per file path.
    pub index: u32,
    /// Set on the last chunk for the file.
    pub is_final: bool,
}

/// Severity attached to warning events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnLevel {
    /// Informational; traversal is unaffected.
    Info,
    /// Something was skipped.
    Warning,
}

/// The exclusive payload carried by an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Traversal of a root is starting.
    Start,
    /// Entering a directory; all events for its entries follow.
    DirEnter {
        /// Segments below the invocation root.
        depth: usize,
    },
    /// Leaving a directory, with its subtree aggregated.
    DirLeave {
        /// Segments below the invocation root.
        depth: usize,
        /// Totals for the subtree just finished.
        summary: DirSummary,
    },
    /// A file's metadata (content, if any, follows in chunks).
    File(FileMeta),
    /// A piece of file content.
    Chunk(ContentChunk),
    /// A fully-assembled snapshot of one root's subtree.
    Tree(Box<TreeNode>),
    /// Whole-invocation totals; always the penultimate event.
    Summary(WalkSummary),
    /// A non-fatal problem; traversal continued.
    Warning {
        /// Severity of the report.
        level: WarnLevel,
        /// Human-readable description, e.g. `skipping PATH: reason`.
        message: String,
    },
    /// A fatal problem described mid-stream.
    Error {
        /// Human-readable description.
        message: String,
    },
    /// End of stream; always the final event.
    Done,
}

/// A single typed event flowing from walker to renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Always [`SCHEMA_VERSION`] for events produced by this crate.
    pub version: u32,
    /// The path the payload concerns, when there is one.
    pub path: Option<PathBuf>,
    /// Exactly one payload variant.
    pub payload: Payload,
}

impl Event {
    /// Builds an event stamped with the current schema version.
    pub fn new(path: Option<PathBuf>, payload: Payload) -> Self {
        Self {
            version: SCHEMA_VERSION,
            path,
            payload,
        }
    }

    /// A `Start` event for a root.
    pub fn start(root: PathBuf) -> Self {
        Self::new(Some(root), Payload::Start)
    }

    /// A `Warning` event with the conventional `skipping` message shape.
    pub fn skip_warning(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::new(
            Some(path.to_path_buf()),
            Payload::Warning {
                level: WarnLevel::Warning,
                message: format!("skipping {}: {}", path.display(), reason),
            },
        )
    }
}

/// A fully-assembled node in a root's tree snapshot.
///
/// Serialized by the JSON and XML renderers; field names follow the wire
/// schema (camelCase), and empty or zero optionals are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Absolute path.
    pub path: String,
    /// Base name.
    pub name: String,
    /// Node classification.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Human-formatted size, files only (`4b`, `1.5kb`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size: String,
    /// Exact size in bytes, files only.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size_bytes: u64,
    /// Last-modified timestamp, RFC 3339.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_modified: String,
    /// Detected MIME type, files only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    /// Token count, when counted.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tokens: u64,
    /// Model the tokens were counted against.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// File content when content inclusion is active (text files only).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    /// Documentation entries extracted from the file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documentation: Vec<DocEntry>,
    /// Files in the subtree, directories only.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_files: u64,
    /// Human-formatted byte sum of the subtree, directories only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub total_size: String,
    /// Token sum of the subtree, directories only.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_tokens: u64,
    /// Child nodes in traversal order; empty for non-directories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl TreeNode {
    /// A bare node with just identity fields set.
    pub fn new(path: String, name: String, node_type: NodeType) -> Self {
        Self {
            path,
            name,
            node_type,
            size: String::new(),
            size_bytes: 0,
            last_modified: String::new(),
            mime_type: String::new(),
            tokens: 0,
            model: String::new(),
            content: String::new(),
            documentation: Vec::new(),
            total_files: 0,
            total_size: String::new(),
            total_tokens: 0,
            children: Vec::new(),
        }
    }
}

/// Formats a byte count the way the renderers display sizes.
///
/// Values under 1 KiB print as plain bytes (`512b`); larger values use
/// binary units with at most one decimal place (`1.5kb`, `2mb`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["kb", "mb", "gb", "tb"];
    if bytes < 1024 {
        return format!("{}b", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "b";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("{}{}", rounded.trunc() as u64, unit)
    } else {
        format!("{:.1}{}", rounded, unit)
    }
}
