//! # Plume - A Small Text Editor
//!
//! Find/replace, Python highlighting, auto-save and session restore over a
//! line-oriented console.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Run with a file
//! cargo run -- path/to/script.py
//!
//! # Run without touching the session file
//! cargo run -- --no-session
//! ```

mod console;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plume_core::{Config, Editor, EditorEvent};

/// Plume - a small text editor
#[derive(Parser, Debug)]
#[command(name = "plume")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Session file to restore from and write on exit
    #[arg(short, long, value_name = "PATH")]
    session: Option<PathBuf>,

    /// Neither restore nor record a session
    #[arg(long)]
    no_session: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; stdout belongs to the console
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Plume v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let mut editor = Editor::new(config).context("Failed to create editor")?;

    if editor.config().session.enabled {
        let session_path = editor.config().session.path.clone();
        editor.load_session(&session_path);
    }

    // Nothing is modified yet, so opening never needs confirmation
    if let Some(file) = args.file {
        editor.handle(EditorEvent::Open(file), &mut |_: &str, _: &str| true);
    }

    console::run(editor).await
}

/// Loads the config file and applies command line overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    if let Some(session) = &args.session {
        config.session.path = session.clone();
    }
    if args.no_session {
        config.session.enabled = false;
    }
    Ok(config)
}
