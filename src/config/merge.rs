//! Resolution of effective settings from CLI, config file, and defaults.

use super::file::CommandSection;
use super::{CommandKind, CopyMode, DocMode, Format, Settings};
use crate::errors::Result;
use crate::tokens::DEFAULT_MODEL;

/// Values as they arrived from the command line.
///
/// `None` means the flag was not given, which is exactly the provenance
/// the merger needs.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--format NAME`.
    pub format: Option<String>,
    /// `--summary[=BOOL]`.
    pub summary: Option<bool>,
    /// `--tokens[=BOOL]`.
    pub tokens: Option<bool>,
    /// `--model NAME`.
    pub model: Option<String>,
    /// `--content[=BOOL]`.
    pub content: Option<bool>,
    /// `-e PATTERN`, repeatable.
    pub exclude: Vec<String>,
    /// `--no-gitignore[=BOOL]`.
    pub no_gitignore: Option<bool>,
    /// `--no-ignore[=BOOL]`.
    pub no_ignore: Option<bool>,
    /// `--git[=BOOL]`.
    pub git: Option<bool>,
    /// `--doc MODE`.
    pub doc: Option<String>,
    /// `--copy[=BOOL]`.
    pub copy: Option<bool>,
    /// `--copy-only[=BOOL]`.
    pub copy_only: Option<bool>,
}

/// Builds the effective [`Settings`] for an invocation.
///
/// Each option resolves CLI ⇒ config file ⇒ default. Pattern lists replace
/// rather than concatenate: an explicit `-e` discards the config file's
/// exclusions.
///
/// # Errors
/// Fails on an unsupported format name or documentation mode.
pub fn merge(
    command: CommandKind,
    paths: Vec<String>,
    cli: Overrides,
    section: Option<&CommandSection>,
) -> Result<Settings> {
    let empty = CommandSection::default();
    let file = section.unwrap_or(&empty);

    let format_name = cli
        .format
        .or_else(|| file.format.clone())
        .unwrap_or_else(|| "toon".to_string());
    let doc_name = cli
        .doc
        .or_else(|| file.doc.clone())
        .unwrap_or_else(|| "disabled".to_string());

    let copy_only = cli.copy_only.or(file.copy_only).unwrap_or(false);
    let copy = cli.copy.or(file.copy).unwrap_or(false);
    let copy_mode = if copy_only {
        CopyMode::Only
    } else if copy {
        CopyMode::Also
    } else {
        CopyMode::Disabled
    };

    let paths = if paths.is_empty() {
        vec![".".to_string()]
    } else {
        paths
    };

    Ok(Settings {
        command,
        paths,
        format: Format::parse(&format_name)?,
        summary: cli.summary.or(file.summary).unwrap_or(true),
        tokens: cli.tokens.or(file.tokens).unwrap_or(false),
        model: cli
            .model
            .or_else(|| file.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        include_content: cli
            .content
            .or(file.content)
            .unwrap_or(command == CommandKind::Content),
        exclude_patterns: if cli.exclude.is_empty() {
            file.exclude.clone().unwrap_or_default()
        } else {
            cli.exclude
        },
        use_gitignore: !cli
            .no_gitignore
            .unwrap_or_else(|| !file.gitignore.unwrap_or(true)),
        use_ignore: !cli.no_ignore.unwrap_or_else(|| !file.ignore.unwrap_or(true)),
        include_git: cli.git.or(file.git).unwrap_or(false),
        doc_mode: DocMode::parse(&doc_name)?,
        copy_mode,
        binary_content_patterns: file.binary_content.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn section() -> CommandSection {
        CommandSection {
            format: Some("json".to_string()),
            summary: Some(false),
            tokens: Some(true),
            model: Some("gpt-4".to_string()),
            exclude: Some(vec!["*.bak".to_string()]),
            ..CommandSection::default()
        }
    }

    #[test]
    fn test_defaults_without_cli_or_file() -> Result<()> {
        let settings = merge(CommandKind::Tree, Vec::new(), Overrides::default(), None)?;
        assert_eq!(settings.format, Format::Toon);
        assert!(settings.summary);
        assert!(!settings.tokens);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert!(!settings.include_content);
        assert!(settings.use_gitignore);
        assert!(settings.use_ignore);
        assert!(!settings.include_git);
        assert_eq!(settings.doc_mode, DocMode::Disabled);
        assert_eq!(settings.copy_mode, CopyMode::Disabled);
        assert_eq!(settings.paths, vec![".".to_string()]);
        Ok(())
    }

    #[test]
    fn test_content_command_defaults_content_on() -> Result<()> {
        let settings = merge(CommandKind::Content, Vec::new(), Overrides::default(), None)?;
        assert!(settings.include_content);
        Ok(())
    }

    #[test]
    fn test_file_values_beat_defaults() -> Result<()> {
        let section = section();
        let settings = merge(
            CommandKind::Tree,
            Vec::new(),
            Overrides::default(),
            Some(&section),
        )?;
        assert_eq!(settings.format, Format::Json);
        assert!(!settings.summary);
        assert!(settings.tokens);
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.exclude_patterns, vec!["*.bak".to_string()]);
        Ok(())
    }

    #[test]
    fn test_cli_beats_file() -> Result<()> {
        let section = section();
        let cli = Overrides {
            format: Some("xml".to_string()),
            summary: Some(true),
            exclude: vec!["*.log".to_string()],
            ..Overrides::default()
        };
        let settings = merge(CommandKind::Tree, Vec::new(), cli, Some(&section))?;
        assert_eq!(settings.format, Format::Xml);
        assert!(settings.summary);
        // CLI exclusions replace the file's.
        assert_eq!(settings.exclude_patterns, vec!["*.log".to_string()]);
        Ok(())
    }

    #[test]
    fn test_copy_only_wins_over_copy() -> Result<()> {
        let cli = Overrides {
            copy: Some(true),
            copy_only: Some(true),
            ..Overrides::default()
        };
        let settings = merge(CommandKind::Tree, Vec::new(), cli, None)?;
        assert_eq!(settings.copy_mode, CopyMode::Only);
        Ok(())
    }

    #[test]
    fn test_unsupported_format_is_fatal() {
        let cli = Overrides {
            format: Some("yaml".to_string()),
            ..Overrides::default()
        };
        match merge(CommandKind::Tree, Vec::new(), cli, None) {
            Err(Error::FormatUnsupported(name)) => assert_eq!(name, "yaml"),
            other => panic!("expected FormatUnsupported, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_doc_mode_alias_from_file() -> Result<()> {
        let section = CommandSection {
            doc: Some("true".to_string()),
            ..CommandSection::default()
        };
        let settings = merge(
            CommandKind::Tree,
            Vec::new(),
            Overrides::default(),
            Some(&section),
        )?;
        assert_eq!(settings.doc_mode, DocMode::Relevant);
        Ok(())
    }

    #[test]
    fn test_gitignore_toggles() -> Result<()> {
        let cli = Overrides {
            no_gitignore: Some(true),
            ..Overrides::default()
        };
        let settings = merge(CommandKind::Tree, Vec::new(), cli, None)?;
        assert!(!settings.use_gitignore);

        let section = CommandSection {
            gitignore: Some(false),
            ..CommandSection::default()
        };
        let settings = merge(
            CommandKind::Tree,
            Vec::new(),
            Overrides::default(),
            Some(&section),
        )?;
        assert!(!settings.use_gitignore);
        Ok(())
    }
}
