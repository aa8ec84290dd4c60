//! Optional `.ctx.toml` configuration file.
//!
//! The file supplies per-command defaults; CLI flags always win. Loading
//! problems are logged and otherwise ignored: a broken config file must
//! never take the tool down.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// File name looked up in the working directory, then in `$HOME`.
pub const CONFIG_FILE_NAME: &str = ".ctx.toml";

/// The whole configuration file: one optional section per subcommand.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Defaults for `ctx tree`.
    pub tree: Option<CommandSection>,
    /// Defaults for `ctx content`.
    pub content: Option<CommandSection>,
}

/// Defaults for one subcommand. Every field is optional; absent fields
/// fall through to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandSection {
    /// Output format name.
    pub format: Option<String>,
    /// Render summary sections.
    pub summary: Option<bool>,
    /// Count tokens.
    pub tokens: Option<bool>,
    /// Model to count against.
    pub model: Option<String>,
    /// Include file contents.
    pub content: Option<bool>,
    /// Exclusion patterns.
    pub exclude: Option<Vec<String>>,
    /// Honor `.gitignore` files.
    pub gitignore: Option<bool>,
    /// Honor `.ignore` files.
    pub ignore: Option<bool>,
    /// Traverse `.git` directories.
    pub git: Option<bool>,
    /// Documentation mode (`disabled`/`relevant`/`full` or legacy bool).
    pub doc: Option<String>,
    /// Copy output to the clipboard as well.
    pub copy: Option<bool>,
    /// Copy output to the clipboard only.
    pub copy_only: Option<bool>,
    /// Binary files whose content is included as base64.
    pub binary_content: Option<Vec<String>>,
}

/// Loads the first config file found, if any.
pub fn load_file_config() -> Option<FileConfig> {
    for candidate in candidate_paths() {
        match fs::read_to_string(&candidate) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => {
                    log::debug!("Loaded configuration from {}", candidate.display());
                    return Some(config);
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {}", candidate.display(), e);
                    return None;
                }
            },
            Err(_) => continue,
        }
    }
    None
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(CONFIG_FILE_NAME));
    }
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
    }
    candidates
}
