// src/cli.rs

use crate::config::{parse_boolish, CommandKind, Overrides};
use clap::{ArgAction, Args, Parser, Subcommand};

/// Streams a structured, LLM-ready description of project trees.
///
/// ctx walks one or more paths, applies layered ignore rules, and renders
/// the result as raw text, compact indented "toon", JSON, or XML, with
/// optional token counts, documentation snippets, and clipboard copies.
#[derive(Parser, Debug)]
#[command(name = "ctx", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Describe directory layout without file contents.
    Tree(CommandArgs),
    /// Describe directory layout including file contents.
    Content(CommandArgs),
}

impl Commands {
    /// The subcommand's kind and shared arguments.
    pub fn split(&self) -> (CommandKind, &CommandArgs) {
        match self {
            Commands::Tree(args) => (CommandKind::Tree, args),
            Commands::Content(args) => (CommandKind::Content, args),
        }
    }
}

/// Arguments shared by the `tree` and `content` subcommands.
///
/// Boolean flags accept an implicit true (`--summary`), `--summary=false`,
/// and `--summary false`; recognized spellings are
/// true/false, yes/no, on/off, 1/0, y/n, t/f (case-insensitive).
#[derive(Args, Debug, Clone)]
pub struct CommandArgs {
    /// Paths to inspect. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Output format: raw, toon, json, or xml.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Append summary sections to raw and toon output.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub summary: Option<bool>,

    /// Count tokens per text file and in summaries.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub tokens: Option<bool>,

    /// Model to count tokens against.
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// Include file contents in the output.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub content: Option<bool>,

    /// Exclude entries matching this glob pattern (repeatable).
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Do not honor .gitignore files.
    #[arg(long = "no-gitignore", value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub no_gitignore: Option<bool>,

    /// Do not honor .ignore files.
    #[arg(long = "no-ignore", value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub no_ignore: Option<bool>,

    /// Traverse .git directories.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub git: Option<bool>,

    /// Documentation mode: disabled, relevant, or full.
    #[arg(long, value_name = "MODE")]
    pub doc: Option<String>,

    /// Copy the output to the clipboard as well as printing it.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub copy: Option<bool>,

    /// Copy the output to the clipboard instead of printing it.
    #[arg(long = "copy-only", value_name = "BOOL", num_args = 0..=1, default_missing_value = "true", value_parser = parse_bool_flag)]
    pub copy_only: Option<bool>,
}

impl CommandArgs {
    /// The CLI-provided values, with absence preserved for the merger.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            format: self.format.clone(),
            summary: self.summary,
            tokens: self.tokens,
            model: self.model.clone(),
            content: self.content,
            exclude: self.exclude.clone(),
            no_gitignore: self.no_gitignore,
            no_ignore: self.no_ignore,
            git: self.git,
            doc: self.doc.clone(),
            copy: self.copy,
            copy_only: self.copy_only,
        }
    }
}

fn parse_bool_flag(value: &str) -> Result<bool, String> {
    parse_boolish(value).ok_or_else(|| {
        format!(
            "expected a boolean (true/false, yes/no, on/off, 1/0, y/n, t/f), got '{}'",
            value
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("args should parse")
    }

    #[test]
    fn test_tree_defaults() {
        let cli = parse(&["ctx", "tree"]);
        let (kind, args) = cli.command.split();
        assert_eq!(kind, CommandKind::Tree);
        assert!(args.paths.is_empty());
        assert!(args.summary.is_none());
        assert!(args.format.is_none());
    }

    #[test]
    fn test_bool_flag_spellings() {
        let cli = parse(&["ctx", "tree", "--summary"]);
        assert_eq!(cli.command.split().1.summary, Some(true));

        let cli = parse(&["ctx", "tree", "--summary=false"]);
        assert_eq!(cli.command.split().1.summary, Some(false));

        let cli = parse(&["ctx", "tree", ".", "--summary", "no"]);
        assert_eq!(cli.command.split().1.summary, Some(false));

        let cli = parse(&["ctx", "tree", ".", "--tokens", "ON"]);
        assert_eq!(cli.command.split().1.tokens, Some(true));

        assert!(Cli::try_parse_from(["ctx", "tree", "--summary=maybe"]).is_err());
    }

    #[test]
    fn test_repeatable_exclude() {
        let cli = parse(&["ctx", "content", ".", "-e", "*.log", "-e", "target"]);
        let (kind, args) = cli.command.split();
        assert_eq!(kind, CommandKind::Content);
        assert_eq!(args.exclude, vec!["*.log".to_string(), "target".to_string()]);
    }

    #[test]
    fn test_multiple_paths() {
        let cli = parse(&["ctx", "tree", "a", "b", "--format", "json"]);
        let args = cli.command.split().1;
        assert_eq!(args.paths, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(args.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_overrides_preserve_absence() {
        let cli = parse(&["ctx", "tree", "--copy-only"]);
        let overrides = cli.command.split().1.overrides();
        assert_eq!(overrides.copy_only, Some(true));
        assert!(overrides.copy.is_none());
        assert!(overrides.summary.is_none());
        assert!(overrides.doc.is_none());
    }
}
