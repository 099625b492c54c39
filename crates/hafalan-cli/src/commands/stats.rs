//! The `hafalan stats` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use hafalan_core::statistics::{compute_learning_stats, LearningStats, MasteryCount};
use hafalan_core::traits::SnapshotProvider;

use super::open_store;

pub async fn execute(config_path: Option<PathBuf>, json: bool) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref())?;

    // Statistics count mastered items too.
    let (concepts, notes) = futures::try_join!(
        store.fetch_vocabulary(config.owner_id, true),
        store.fetch_notes(config.owner_id, true),
    )
    .with_context(|| format!("failed to load data from the {} store", store.name()))?;

    let stats = compute_learning_stats(&concepts, &notes);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_tables(&stats);
    }
    Ok(())
}

fn print_tables(stats: &LearningStats) {
    let mut mastery = Table::new();
    mastery.set_header(vec!["Items", "Total", "Mastered", "Unmastered", "Mastered %"]);
    for (label, count) in [("Vocabulary", &stats.concepts), ("Notes", &stats.notes)] {
        mastery.add_row(mastery_row(label, count));
    }
    println!("{mastery}");

    let mut languages = Table::new();
    languages.set_header(vec!["Language", "Translations"]);
    for (language, count) in &stats.per_language {
        languages.add_row(vec![Cell::new(language), Cell::new(count)]);
    }
    languages.add_row(vec![Cell::new("Total"), Cell::new(stats.translations)]);
    println!("\n{languages}");
}

fn mastery_row(label: &str, count: &MasteryCount) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(count.total),
        Cell::new(count.mastered),
        Cell::new(count.unmastered()),
        Cell::new(format!("{:.1}%", count.ratio() * 100.0)),
    ]
}
