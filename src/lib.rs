//! Core library for `ctx`: stream a structured description of project
//! trees for LLM tooling.
//!
//! The pipeline is a producer/consumer pair: a [`walker::Walker`] emits
//! typed [`events::Event`]s over a bounded channel and a format-specific
//! [`render::Renderer`] consumes them, writing through an
//! [`sink::OutputSink`] that handles the copy and copy-only modes.

pub mod cancellation;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod docs;
pub mod errors;
pub mod events;
pub mod filtering;
pub mod render;
pub mod signal;
pub mod sink;
pub mod tokens;
pub mod validate;
pub mod walker;

pub use cancellation::CancellationToken;
pub use config::{CommandKind, CopyMode, DocMode, Format, Settings};
pub use errors::{Error, Result};

use crate::render::RenderOptions;
use crate::sink::{Clipboard, OutputSink, SystemClipboard};
use crate::tokens::TokenCounter;
use crate::walker::{WalkOptions, Walker};
use log::{debug, info};
use std::io::Write;

/// Runs one invocation against stdout/stderr and the system clipboard.
///
/// This is the binary's entry point into the library; tests and embedders
/// use [`run_with`] to supply their own sinks.
///
/// # Errors
/// Returns the first fatal error: invalid paths, an unavailable tokenizer
/// when counting was requested, a renderer/write failure, cancellation, or
/// a clipboard failure during finalization.
pub fn run(settings: &Settings, token: &CancellationToken) -> Result<()> {
    let mut clipboard = SystemClipboard;
    let mut stderr = std::io::stderr();
    run_with(
        settings,
        token,
        Box::new(std::io::stdout()),
        &mut stderr,
        &mut clipboard,
    )
}

/// Runs one invocation with explicit output, error, and clipboard sinks.
///
/// Orchestration order: validate paths, resolve the token counter (fatal
/// only because counting was requested), build the documentation
/// collector and renderer, stream all roots through one dispatcher, then
/// flush the renderer and finalize the sink.
pub fn run_with(
    settings: &Settings,
    token: &CancellationToken,
    primary: Box<dyn Write + Send>,
    err: &mut (dyn Write + Send),
    clipboard: &mut dyn Clipboard,
) -> Result<()> {
    info!("Starting ctx run: {:?} over {:?}", settings.command, settings.paths);

    let (roots, pre_warnings) = validate::resolve_paths(&settings.paths)?;
    debug!("Validated {} root(s)", roots.len());

    let counter = if settings.tokens {
        Some(TokenCounter::for_model(&settings.model)?)
    } else {
        None
    };
    let docs = (settings.doc_mode != DocMode::Disabled)
        .then(|| docs::DocCollector::new(settings.doc_mode));

    let render_options = RenderOptions {
        command: settings.command,
        summary: settings.summary,
        tokens: counter.is_some(),
        root_count: roots.len(),
    };
    let mut renderer = render::for_format(settings.format, render_options);
    let mut sink = OutputSink::new(primary, settings.copy_mode);
    let mut walker = Walker::new(WalkOptions::from_settings(settings), counter, docs);

    dispatch::run_pipeline(
        token,
        |out| walker.stream(&roots, &pre_warnings, out),
        &mut |event| renderer.handle(&event, &mut sink, &mut *err),
    )?;

    renderer.finish(&mut sink, &mut *err)?;
    sink.finalize(clipboard)?;
    info!("ctx run completed successfully.");
    Ok(())
}
