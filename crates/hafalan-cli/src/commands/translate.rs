//! The `hafalan translate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use hafalan_core::model::{Language, TranslationUpsert};
use hafalan_core::practice::Practice;

use super::open_store;

pub async fn execute(
    config_path: Option<PathBuf>,
    concept_id: i64,
    language: Language,
    term: String,
    pronunciation: String,
    gloss: String,
) -> Result<()> {
    let term = term.trim().to_string();
    anyhow::ensure!(!term.is_empty(), "term must not be empty");

    let (config, store) = open_store(config_path.as_deref())?;
    let practice = Practice::new(store.as_ref(), store.as_ref(), config.owner_id);

    let upsert = TranslationUpsert {
        concept_id,
        language,
        term,
        pronunciation: pronunciation.trim().to_string(),
        gloss: gloss.trim().to_string(),
    };
    let saved = practice
        .save_translation(&upsert)
        .await
        .with_context(|| {
            format!("failed to save {language} translation of concept#{concept_id}")
        })?;

    println!(
        "Saved {} translation #{} for concept#{}: {}",
        saved.language, saved.id, saved.concept_id, saved.term
    );
    Ok(())
}
