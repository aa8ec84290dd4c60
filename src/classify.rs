//! File classification: MIME type, binary detection, size, and mtime.

use crate::errors::{read_error_with_path, Result};
use chrono::{DateTime, Local, SecondsFormat};
use std::fs::{File, Metadata};
use std::io::Read;
use std::path::Path;

/// Number of head bytes sampled for binary detection.
const HEAD_SAMPLE_SIZE: usize = 8 * 1024;

/// Fraction of non-text bytes above which a file is considered binary.
const BINARY_THRESHOLD: f64 = 0.30;

/// Everything the pipeline needs to know about a file without its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Detected MIME type.
    pub mime_type: String,
    /// Whether the head bytes look binary.
    pub is_binary: bool,
    /// Size in bytes from lstat.
    pub size_bytes: u64,
    /// Last-modified timestamp, RFC 3339 with second precision.
    pub last_modified: String,
}

impl Classification {
    /// The classification used when the file's head cannot be read.
    pub fn degraded(metadata: &Metadata) -> Self {
        Self {
            mime_type: "application/octet-stream".to_string(),
            is_binary: true,
            size_bytes: metadata.len(),
            last_modified: format_mtime(metadata),
        }
    }
}

/// Classifies a file from its head bytes and metadata.
///
/// # Errors
/// Returns `Error::ReadFailed` when the head sample cannot be read; callers
/// degrade to [`Classification::degraded`] and report a warning.
pub fn classify(path: &Path, metadata: &Metadata) -> Result<Classification> {
    let mut file = File::open(path).map_err(|e| read_error_with_path(e, path))?;
    let mut head = [0u8; HEAD_SAMPLE_SIZE];
    let read = file
        .read(&mut head)
        .map_err(|e| read_error_with_path(e, path))?;
    let head = &head[..read];

    let is_binary = is_binary_bytes(head);
    Ok(Classification {
        mime_type: detect_mime(path, is_binary),
        is_binary,
        size_bytes: metadata.len(),
        last_modified: format_mtime(metadata),
    })
}

/// Heuristic binary check over a head sample.
///
/// A buffer is binary iff it contains a NUL byte or more than 30 % of its
/// bytes fall outside the printable-plus-whitespace range. Bytes >= 0x80
/// count as printable so multi-byte UTF-8 text is not penalized.
pub fn is_binary_bytes(head: &[u8]) -> bool {
    if head.is_empty() {
        return false;
    }
    let mut suspicious = 0usize;
    for &byte in head {
        if byte == 0 {
            return true;
        }
        let printable =
            byte >= 0x20 || matches!(byte, b'\t' | b'\n' | b'\r' | 0x0C | 0x08);
        if !printable || byte == 0x7F {
            suspicious += 1;
        }
    }
    (suspicious as f64) / (head.len() as f64) > BINARY_THRESHOLD
}

fn detect_mime(path: &Path, is_binary: bool) -> String {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return mime.to_string();
    }
    if is_binary {
        "application/octet-stream".to_string()
    } else {
        "text/plain; charset=utf-8".to_string()
    }
}

fn format_mtime(metadata: &Metadata) -> String {
    match metadata.modified() {
        Ok(mtime) => {
            DateTime::<Local>::from(mtime).to_rfc3339_opts(SecondsFormat::Secs, true)
        }
        Err(_) => String::new(),
    }
}
