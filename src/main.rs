//! contentsync CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use contentsync::cli::{Cli, CommandDispatcher};
use contentsync::config::load_config;
use contentsync::ui::{create_ui, OutputMode, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("contentsync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contentsync=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> contentsync::Result<i32> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.cache_dir {
        config.cache.dir = Some(dir.clone());
    }

    let dispatcher = CommandDispatcher::from_config(&config)?;
    Ok(dispatcher.dispatch(cli, ui)?.exit_code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("contentsync starting with args: {:?}", cli);

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let mut ui = create_ui(output_mode, cli.no_color);

    match run(&cli, ui.as_mut()) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
