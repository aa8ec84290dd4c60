//! Format-specific event consumers.
//!
//! A renderer holds only the state needed to emit its format
//! incrementally; it never seeks in the output stream, and warnings and
//! errors go to the error sink, never the primary output.

mod json;
mod raw;
mod toon;
mod xml;

pub use json::JsonRenderer;
pub use raw::RawRenderer;
pub use toon::ToonRenderer;
pub use xml::XmlRenderer;

use crate::config::{CommandKind, Format};
use crate::errors::Result;
use crate::events::{Event, Payload};
use std::io::Write;

/// The slice of settings renderers care about.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Which subcommand is rendering (raw output differs).
    pub command: CommandKind,
    /// Whether summary sections are emitted.
    pub summary: bool,
    /// Whether token counting is active (shapes labels and summaries).
    pub tokens: bool,
    /// Number of roots expected this invocation.
    pub root_count: usize,
}

/// A format-specific consumer of the event stream.
pub trait Renderer: Send {
    /// Consumes one event, writing any resulting output incrementally.
    fn handle(&mut self, event: &Event, out: &mut dyn Write, err: &mut dyn Write) -> Result<()>;

    /// Completes the output after the stream ends (closing brackets,
    /// summary sections). Must be called exactly once.
    fn finish(&mut self, out: &mut dyn Write, err: &mut dyn Write) -> Result<()>;
}

/// Builds the renderer for a format.
pub fn for_format(format: Format, options: RenderOptions) -> Box<dyn Renderer> {
    match format {
        Format::Raw => Box::new(RawRenderer::new(options)),
        Format::Toon => Box::new(ToonRenderer::new(options)),
        Format::Json => Box::new(JsonRenderer::new(options)),
        Format::Xml => Box::new(XmlRenderer::new(options)),
    }
}

/// Routes warning and error payloads to the error sink.
///
/// Returns `true` when the event was a diagnostic and needs no further
/// handling by the renderer.
pub(crate) fn route_diagnostic(event: &Event, err: &mut dyn Write) -> Result<bool> {
    match &event.payload {
        Payload::Warning { message, .. } => {
            writeln!(err, "Warning: {}", message)?;
            Ok(true)
        }
        Payload::Error { message } => {
            writeln!(err, "Error: {}", message)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// `1 file` / `N files`.
pub(crate) fn format_file_count(count: u64) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", count)
    }
}
