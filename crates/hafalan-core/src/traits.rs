//! Collaborator contracts consumed by the quiz engine.
//!
//! The engine never owns persistent data. Snapshots come in through
//! [`SnapshotProvider`] and mastery/translation writes go out through
//! [`MutationSink`]; `hafalan-store` implements both.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{
    FreeformNote, ItemRef, Mastery, Translation, TranslationUpsert, VocabularyConcept,
};

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

/// Point-in-time reads of a user's data.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// All concepts owned by `owner_id`, each with its translations.
    ///
    /// When `include_mastered` is false, implementations may filter mastered
    /// concepts out; the engine filters again either way.
    async fn fetch_vocabulary(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<VocabularyConcept>, StoreError>;

    /// All free-form notes owned by `owner_id`.
    async fn fetch_notes(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<FreeformNote>, StoreError>;
}

// ---------------------------------------------------------------------------
// Write side
// ---------------------------------------------------------------------------

/// Writes issued by the engine and by manual edits.
#[async_trait]
pub trait MutationSink: Send + Sync {
    /// Persist a mastery flag for one item.
    async fn write_mastery(&self, item: ItemRef, state: Mastery) -> Result<(), StoreError>;

    /// Find the translation for `(concept_id, language)` and update it, or
    /// insert one if none exists. This is the only place translation
    /// uniqueness per language is kept.
    async fn upsert_translation(
        &self,
        upsert: &TranslationUpsert,
    ) -> Result<Translation, StoreError>;
}

/// A complete backing store.
pub trait Store: SnapshotProvider + MutationSink {
    /// Human-readable backend name (e.g. "postgrest").
    fn name(&self) -> &str;
}
