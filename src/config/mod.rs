//! Effective invocation settings and how they are resolved.
//!
//! Every option resolves as: CLI flag if given, else config-file value if
//! present, else built-in default. Provenance is captured at parse time
//! (CLI values arrive as `Option`s), never reverse-engineered from flag
//! library internals.

mod file;
mod merge;

pub use file::{load_file_config, CommandSection, FileConfig};
pub use merge::{merge, Overrides};

use crate::errors::{Error, Result};

/// Which subcommand is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Layout only; content inclusion defaults off.
    Tree,
    /// Layout plus file contents; content inclusion defaults on.
    Content,
}

/// Output representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Plain text lines.
    Raw,
    /// Compact indented key/value format.
    #[default]
    Toon,
    /// Pretty-printed JSON.
    Json,
    /// XML element tree.
    Xml,
}

impl Format {
    /// Parses a format name.
    ///
    /// # Errors
    /// Returns [`Error::FormatUnsupported`] for anything but
    /// `raw`/`toon`/`json`/`xml`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "raw" => Ok(Format::Raw),
            "toon" => Ok(Format::Toon),
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            _ => Err(Error::FormatUnsupported(value.to_string())),
        }
    }
}

/// Documentation collection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocMode {
    /// No extraction.
    #[default]
    Disabled,
    /// Local extraction only.
    Relevant,
    /// Local extraction plus the remote provider.
    Full,
}

impl DocMode {
    /// Parses a documentation mode, accepting the legacy boolean aliases
    /// (`true` meant `relevant`, `false` meant `disabled`).
    ///
    /// # Errors
    /// Returns [`Error::DocModeInvalid`] for unrecognized values.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "disabled" => Ok(DocMode::Disabled),
            "relevant" => Ok(DocMode::Relevant),
            "full" => Ok(DocMode::Full),
            other => match parse_boolish(other) {
                Some(true) => Ok(DocMode::Relevant),
                Some(false) => Ok(DocMode::Disabled),
                None => Err(Error::DocModeInvalid(value.to_string())),
            },
        }
    }
}

/// How output is split between the primary writer and the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Primary writer only.
    #[default]
    Disabled,
    /// Primary writer plus clipboard.
    Also,
    /// Clipboard only; nothing reaches the primary writer.
    Only,
}

/// Interprets the boolean spellings the CLI accepts.
///
/// Case-insensitive; recognizes
/// `true/false`, `yes/no`, `on/off`, `1/0`, `y/n`, `t/f`.
pub fn parse_boolish(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "y" | "t" => Some(true),
        "false" | "no" | "off" | "0" | "n" | "f" => Some(false),
        _ => None,
    }
}

/// The fully-resolved settings for one invocation.
///
/// Immutable after [`merge`] builds it; the orchestrator and walker only
/// read from it.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Subcommand being run.
    pub command: CommandKind,
    /// Input paths as given (validation resolves them).
    pub paths: Vec<String>,
    /// Output representation.
    pub format: Format,
    /// Whether summary sections are rendered (raw and toon).
    pub summary: bool,
    /// Whether token counting is active.
    pub tokens: bool,
    /// Model to count against; meaningful only with `tokens`.
    pub model: String,
    /// Whether file contents are included in the stream.
    pub include_content: bool,
    /// Explicit exclusion patterns (`-e`).
    pub exclude_patterns: Vec<String>,
    /// Whether `.gitignore` files are honored.
    pub use_gitignore: bool,
    /// Whether `.ignore` files are honored.
    pub use_ignore: bool,
    /// Whether `.git` directories are traversed.
    pub include_git: bool,
    /// Documentation collection mode.
    pub doc_mode: DocMode,
    /// Output splitting mode.
    pub copy_mode: CopyMode,
    /// Glob patterns of binary files whose content is included as base64.
    pub binary_content_patterns: Vec<String>,
}

impl Settings {
    /// A baseline `tree .` invocation, used by unit tests.
    #[doc(hidden)]
    pub fn new_for_test() -> Self {
        Self {
            command: CommandKind::Tree,
            paths: vec![".".to_string()],
            format: Format::Toon,
            summary: true,
            tokens: false,
            model: String::new(),
            include_content: false,
            exclude_patterns: Vec::new(),
            use_gitignore: true,
            use_ignore: true,
            include_git: false,
            doc_mode: DocMode::Disabled,
            copy_mode: CopyMode::Disabled,
            binary_content_patterns: Vec::new(),
        }
    }
}
