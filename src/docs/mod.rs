//! Documentation extraction, dispatched per file extension.
//!
//! Each extractor produces [`DocEntry`] values; the collector deduplicates
//! them by `(kind, name)` within one file and, in `full` mode, augments
//! import-based entries through an injected [`DocProvider`]. Provider
//! failures are never fatal.

mod gosrc;
mod javascript;
mod provider;
mod python;

pub use provider::DocProvider;

use crate::config::DocMode;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// The category of a documentation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// A module- or file-level docstring.
    Module,
    /// Documentation of an imported package.
    Package,
    /// A class docstring.
    Class,
    /// A free function or imported symbol.
    Function,
    /// A method on a class.
    Method,
}

/// One extracted documentation snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocEntry {
    /// What the entry documents.
    pub kind: DocKind,
    /// Qualified name, e.g. `module.Class.method` or an import path.
    pub name: String,
    /// The documentation text.
    pub body: String,
}

impl DocEntry {
    /// Builds an entry, trimming surrounding whitespace from the body.
    pub fn new(kind: DocKind, name: impl Into<String>, body: &str) -> Self {
        Self {
            kind,
            name: name.into(),
            body: body.trim().to_string(),
        }
    }
}

/// What one file yielded: entries plus non-fatal warnings.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Deduplicated entries in discovery order.
    pub entries: Vec<DocEntry>,
    /// Messages for the error sink (provider failures and the like).
    pub warnings: Vec<String>,
}

/// Per-invocation documentation collector with provider caches.
pub struct DocCollector {
    mode: DocMode,
    provider: Option<Box<dyn DocProvider>>,
    package_cache: HashMap<String, Option<String>>,
    symbol_cache: HashMap<(String, String), Option<String>>,
    module_path_cache: HashMap<std::path::PathBuf, Option<String>>,
}

impl std::fmt::Debug for DocCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocCollector")
            .field("mode", &self.mode)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

impl DocCollector {
    /// A collector for the given mode, with no remote provider attached.
    pub fn new(mode: DocMode) -> Self {
        Self {
            mode,
            provider: None,
            package_cache: HashMap::new(),
            symbol_cache: HashMap::new(),
            module_path_cache: HashMap::new(),
        }
    }

    /// Attaches a documentation provider, consulted only in `full` mode.
    pub fn with_provider(mut self, provider: Box<dyn DocProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Extracts documentation from one file's text.
    ///
    /// Dispatches on the extension; unknown extensions yield nothing.
    pub fn collect_from_file(&mut self, path: &Path, text: &str) -> CollectOutcome {
        if self.mode == DocMode::Disabled {
            return CollectOutcome::default();
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let module = module_name(path);

        let mut outcome = match extension.as_str() {
            "py" => CollectOutcome {
                entries: python::extract(&module, text),
                warnings: Vec::new(),
            },
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => CollectOutcome {
                entries: javascript::extract(&module, text),
                warnings: Vec::new(),
            },
            "go" => self.collect_go(path, text),
            _ => CollectOutcome::default(),
        };
        outcome.entries = dedupe(outcome.entries);
        outcome
    }

    fn collect_go(&mut self, path: &Path, text: &str) -> CollectOutcome {
        let mut outcome = CollectOutcome::default();
        if self.mode != DocMode::Full || self.provider.is_none() {
            // Import-based entries need a doc source; without one there is
            // nothing local to extract from a Go file.
            return outcome;
        }

        let imports = gosrc::parse_imports(text);
        if imports.is_empty() {
            return outcome;
        }
        let local_module = self.enclosing_module(path);
        let selectors = gosrc::parse_selectors(text, &imports);

        for import in &imports {
            if let Some(module) = &local_module {
                if import.path == *module || import.path.starts_with(&format!("{}/", module)) {
                    continue;
                }
            }
            match self.package_doc(&import.path) {
                Ok(Some(body)) if !body.is_empty() => {
                    outcome
                        .entries
                        .push(DocEntry::new(DocKind::Package, import.path.clone(), &body));
                }
                Ok(_) => {}
                Err(message) => outcome.warnings.push(message),
            }
        }

        for (import_path, symbol) in selectors {
            if let Some(module) = &local_module {
                if import_path == *module || import_path.starts_with(&format!("{}/", module)) {
                    continue;
                }
            }
            match self.symbol_doc(&import_path, &symbol) {
                Ok(Some(body)) if !body.is_empty() => {
                    outcome.entries.push(DocEntry::new(
                        DocKind::Function,
                        format!("{}.{}", import_path, symbol),
                        &body,
                    ));
                }
                Ok(_) => {}
                Err(message) => outcome.warnings.push(message),
            }
        }
        outcome
    }

    fn package_doc(&mut self, import_path: &str) -> std::result::Result<Option<String>, String> {
        if let Some(cached) = self.package_cache.get(import_path) {
            return Ok(cached.clone());
        }
        let Some(provider) = self.provider.as_mut() else {
            return Ok(None);
        };
        match provider.package_doc(import_path) {
            Ok(doc) => {
                self.package_cache.insert(import_path.to_string(), doc.clone());
                Ok(doc)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    fn symbol_doc(
        &mut self,
        import_path: &str,
        symbol: &str,
    ) -> std::result::Result<Option<String>, String> {
        let key = (import_path.to_string(), symbol.to_string());
        if let Some(cached) = self.symbol_cache.get(&key) {
            return Ok(cached.clone());
        }
        let Some(provider) = self.provider.as_mut() else {
            return Ok(None);
        };
        match provider.symbol_doc(import_path, symbol) {
            Ok(doc) => {
                self.symbol_cache.insert(key, doc.clone());
                Ok(doc)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// Module path from the nearest `go.mod`, cached per directory.
    fn enclosing_module(&mut self, path: &Path) -> Option<String> {
        let dir = path.parent()?.to_path_buf();
        if let Some(cached) = self.module_path_cache.get(&dir) {
            return cached.clone();
        }
        let module = gosrc::find_module_path(&dir);
        self.module_path_cache.insert(dir, module.clone());
        module
    }
}

/// Keeps the first entry per `(kind, name)`.
fn dedupe(entries: Vec<DocEntry>) -> Vec<DocEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert((entry.kind, entry.name.clone())))
        .collect()
}

fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
