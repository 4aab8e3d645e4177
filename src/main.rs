use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use podium::core::config::{self, CliOverrides, PodiumConfig};
use podium::core::loader::{LoadError, load_deck};
use podium::core::state::Presentation;
use podium::eval::{Bridge, CommandEvaluator};
use podium::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "podium", about = "Present plain-text slide decks in the terminal")]
struct Args {
    /// Deck file to present
    deck: PathBuf,

    /// Slide number to open on (1-based, clamped to the deck)
    #[arg(short, long)]
    start: Option<i64>,

    /// Start with code evaluation switched on
    #[arg(short, long)]
    exec: bool,

    /// Seconds before a running code block is abandoned
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

fn exit_code(error: &LoadError) -> ExitCode {
    match error {
        LoadError::NotFound(_) => ExitCode::from(2),
        LoadError::Parse(_) => ExitCode::from(3),
        LoadError::Io(_) => ExitCode::from(1),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize file logger - writes to podium.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("podium.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Using default config: {}", e);
        PodiumConfig::default()
    });
    let cfg = config::resolve(
        &file_config,
        &CliOverrides {
            exec: args.exec,
            timeout_secs: args.timeout,
        },
    );

    let deck = match load_deck(&args.deck) {
        Ok(deck) => deck,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("podium: {e}");
            return exit_code(&e);
        }
    };

    log::info!(
        "Podium starting: {} slides, evaluation {}, timeout {:?}",
        deck.len(),
        if cfg.start_evaluating { "on" } else { "off" },
        cfg.eval_timeout
    );

    let bridge = Bridge::new(
        Arc::new(CommandEvaluator::new(cfg.interpreters)),
        cfg.eval_timeout,
    );
    let start = args.start.map_or(0, |n| n.saturating_sub(1));
    let presentation = Presentation::new(deck, start, cfg.start_evaluating);

    match tui::run(presentation, bridge, cfg.min_width) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {}", e);
            eprintln!("podium: {e}");
            ExitCode::FAILURE
        }
    }
}
