//! The JSON renderer.
//!
//! A single root serializes as one pretty-printed object; multiple roots
//! stream as a pretty-printed array: `[` before the first root, `,`
//! between roots, `]` on finish. Output is always newline-terminated so
//! diffs stay stable.

use super::{route_diagnostic, RenderOptions, Renderer};
use crate::errors::Result;
use crate::events::{Event, Payload};
use std::io::Write;

pub struct JsonRenderer {
    options: RenderOptions,
    roots_emitted: usize,
    opened_array: bool,
}

impl JsonRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            roots_emitted: 0,
            opened_array: false,
        }
    }

    fn multi_root(&self) -> bool {
        self.options.root_count > 1
    }
}

impl Renderer for JsonRenderer {
    fn handle(&mut self, event: &Event, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        if route_diagnostic(event, err)? {
            return Ok(());
        }
        if let Payload::Tree(node) = &event.payload {
            let pretty = serde_json::to_string_pretty(node.as_ref())?;
            if self.multi_root() {
                if self.roots_emitted == 0 {
                    write!(out, "[\n")?;
                    self.opened_array = true;
                } else {
                    write!(out, ",\n")?;
                }
            }
            out.write_all(pretty.as_bytes())?;
            self.roots_emitted += 1;
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn Write, _err: &mut dyn Write) -> Result<()> {
        if self.opened_array {
            write!(out, "\n]\n")?;
        } else if self.roots_emitted > 0 {
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}
