// src/main.rs

use clap::Parser;
use ctx::cli::Cli;
use ctx::config::{load_file_config, merge, CommandKind};
use ctx::errors::Error;
use ctx::signal::setup_signal_handler;

fn main() {
    // Initialize logging to stderr. Default to 'info' unless RUST_LOG says
    // otherwise (or 'debug' for debug builds).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                if cfg!(debug_assertions) {
                    "ctx=debug".parse().expect("valid directive")
                } else {
                    "ctx=info".parse().expect("valid directive")
                },
            ),
        )
        .init();

    log::debug!("Starting ctx v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let (kind, args) = cli.command.split();

    let file_config = load_file_config();
    let section = file_config.as_ref().and_then(|config| match kind {
        CommandKind::Tree => config.tree.as_ref(),
        CommandKind::Content => config.content.as_ref(),
    });

    let settings = match merge(kind, args.paths.clone(), args.overrides(), section) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Effective settings: {:?}", settings);

    let token = match setup_signal_handler() {
        Ok(token) => token,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match ctx::run(&settings, &token) {
        Ok(()) => {}
        Err(Error::Cancelled) => {
            eprintln!("\nOperation cancelled.");
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
