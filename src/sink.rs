//! Output destination handling: primary writer, clipboard, or both.
//!
//! The sink implements `Write` so renderers never know where bytes go.
//! In copy mode bytes are mirrored into an internal buffer; in copy-only
//! mode the primary writer receives nothing at all. The buffer reaches
//! the clipboard exactly once, on successful finalization.

use crate::config::CopyMode;
use crate::errors::{Error, Result};
use std::io::{self, Write};

/// The single operation the core needs from a clipboard.
pub trait Clipboard {
    /// Replaces the clipboard contents with `text`.
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard, via `arboard`.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}

/// Splits renderer output between the primary writer and a copy buffer.
pub struct OutputSink {
    primary: Box<dyn Write + Send>,
    buffer: Vec<u8>,
    mode: CopyMode,
}

impl OutputSink {
    /// Wraps a primary writer in the requested copy mode.
    pub fn new(primary: Box<dyn Write + Send>, mode: CopyMode) -> Self {
        Self {
            primary,
            buffer: Vec::new(),
            mode,
        }
    }

    /// Flushes the primary writer and, in a copy mode, hands the captured
    /// buffer to the clipboard.
    ///
    /// # Errors
    /// Clipboard failures surface as [`Error::Clipboard`]; output already
    /// written to the primary writer is unaffected.
    pub fn finalize(mut self, clipboard: &mut dyn Clipboard) -> Result<()> {
        self.primary.flush()?;
        if self.mode != CopyMode::Disabled {
            let text = String::from_utf8_lossy(&self.buffer);
            clipboard.copy(&text)?;
        }
        Ok(())
    }

    /// The captured copy buffer (tests only).
    #[doc(hidden)]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.mode {
            CopyMode::Disabled => self.primary.write_all(buf)?,
            CopyMode::Also => {
                self.primary.write_all(buf)?;
                self.buffer.extend_from_slice(buf);
            }
            CopyMode::Only => self.buffer.extend_from_slice(buf),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.mode {
            CopyMode::Only => Ok(()),
            _ => self.primary.flush(),
        }
    }
}
