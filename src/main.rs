//! Application entry point for the recitation tracker CLI.
//!
//! # Startup sequence
//!
//! 1. Parse CLI flags and load [`AppConfig`].
//! 2. Initialise logging.  `--write-config` saves the settings and exits here.
//! 3. Load the verse corpus (fatal on failure).
//! 4. Create a [`tokio`] runtime.
//! 5. Read transcripts from stdin, one segment per line, and print every
//!    position change as `CCC:VVV<TAB>verse text`.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use recitation_tracker::{
    config::AppConfig,
    corpus::Corpus,
    session::{new_shared_session, Admission, PositionUpdate, SessionDriver},
};

use cli::CliArgs;

// ---------------------------------------------------------------------------
// Segment loops
// ---------------------------------------------------------------------------

fn print_update(update: &PositionUpdate) {
    println!("{}\t{}", update.position, update.verse_text);
}

/// Track every line in order.
async fn run_sequential(mut driver: SessionDriver) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let Some(update) = driver.process_text(&line)? {
            print_update(&update);
        }
    }
    Ok(())
}

/// Submit lines through the admission gate as a live capture would.
async fn run_live(driver: SessionDriver, channel_capacity: usize) -> anyhow::Result<()> {
    let sender = driver.sender();
    let (update_tx, mut update_rx) = mpsc::channel::<PositionUpdate>(channel_capacity.max(1));

    let driver_task = tokio::spawn(driver.run(update_tx));
    let printer_task = tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            print_update(&update);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if sender.submit_text(line) == Admission::Closed {
            log::warn!("session stopped, ignoring remaining input");
            break;
        }
    }
    sender.close();

    driver_task.await??;
    printer_task.await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Configuration
    let args = CliArgs::parse();
    let (mut config, config_error) = match args.load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    args.apply(&mut config);

    // 2. Logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    )
    .init();
    log::info!("Recitation tracker starting up");

    if args.write_config {
        let path = args.save_settings(&config, config_error.as_ref())?;
        log::info!("Settings written to {}", path.display());
        return Ok(());
    }
    if let Some(e) = &config_error {
        log::warn!("Failed to load config ({e:#}); using defaults");
    }

    // 3. Corpus
    let corpus_path = config.corpus.resolve_path();
    let corpus = Corpus::load(&corpus_path)
        .with_context(|| format!("cannot start without a corpus ({})", corpus_path.display()))?;
    let corpus = Arc::new(corpus);

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Session
    let driver = SessionDriver::new(new_shared_session(), corpus, &config);
    if args.live {
        rt.block_on(run_live(driver, config.session.channel_capacity))
    } else {
        rt.block_on(run_sequential(driver))
    }
}
