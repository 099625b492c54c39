//! Subcommand implementations and the helpers they share.

pub mod init;
pub mod master;
pub mod notes_quiz;
pub mod quiz;
pub mod stats;
pub mod translate;

use std::path::Path;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use hafalan_core::session::SessionProgress;
use hafalan_core::statistics::accuracy;
use hafalan_core::traits::Store;
use hafalan_store::config::load_config_from;
use hafalan_store::{create_store, HafalanConfig};

/// Load the config and open the store it names.
pub(crate) fn open_store(config_path: Option<&Path>) -> Result<(HafalanConfig, Box<dyn Store>)> {
    let config = load_config_from(config_path)?;
    let store = create_store(&config.store)?;
    tracing::debug!(store = store.name(), owner_id = config.owner_id, "store ready");
    Ok((config, store))
}

/// Question order is reproducible when a seed is given.
pub(crate) fn quiz_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub(crate) fn answer_lines() -> Lines<BufReader<Stdin>> {
    BufReader::new(tokio::io::stdin()).lines()
}

pub(crate) fn print_score(progress: &SessionProgress) {
    println!();
    if progress.remaining() > 0 {
        println!(
            "Session ended early: {} of {} questions left.",
            progress.remaining(),
            progress.total
        );
    } else {
        println!("Session complete.");
    }
    println!(
        "Score: {}/{} correct ({:.0}%)",
        progress.correct,
        progress.attempted,
        accuracy(progress) * 100.0
    );
}
