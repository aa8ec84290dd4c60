//! The interface a documentation source implements.
//!
//! The core ships no live provider; the remote fetcher is an external
//! collaborator that plugs in through [`DocCollector::with_provider`].
//!
//! [`DocCollector::with_provider`]: super::DocCollector::with_provider

use crate::errors::Result;

/// A source of package- and symbol-level documentation, keyed by import
/// path.
///
/// Implementations may block (the collector serializes calls and caches
/// results per import path), but should bound each request; the pipeline
/// treats any error as non-fatal.
pub trait DocProvider: Send {
    /// Package-level documentation for an import path, if any.
    fn package_doc(&mut self, import_path: &str) -> Result<Option<String>>;

    /// Documentation for one exported symbol of an import path, if any.
    fn symbol_doc(&mut self, import_path: &str, symbol: &str) -> Result<Option<String>>;
}
