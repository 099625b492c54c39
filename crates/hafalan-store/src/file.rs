//! JSON file store for offline practice.
//!
//! The whole collection lives in one JSON document. Reads parse it fresh on
//! every fetch; writes rewrite it through a temp file and an atomic rename.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::instrument;

use hafalan_core::error::StoreError;
use hafalan_core::model::{
    FreeformNote, ItemRef, Mastery, Translation, TranslationUpsert, VocabularyConcept,
};
use hafalan_core::traits::{MutationSink, SnapshotProvider, Store};

/// On-disk document shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDocument {
    #[serde(default)]
    pub concepts: Vec<VocabularyConcept>,
    #[serde(default)]
    pub notes: Vec<FreeformNote>,
}

impl FileDocument {
    fn next_translation_id(&self) -> i64 {
        self.concepts
            .iter()
            .flat_map(|c| &c.translations)
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Store backed by a single JSON file.
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing file is an empty collection.
    pub fn load(&self) -> Result<FileDocument, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| StoreError::Decode(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileDocument::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the document atomically.
    pub fn save(&self, doc: &FileDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotProvider for FileStore {
    async fn fetch_vocabulary(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<VocabularyConcept>, StoreError> {
        let doc = self.load()?;
        Ok(doc
            .concepts
            .into_iter()
            .filter(|c| c.owner_id == owner_id)
            .filter(|c| include_mastered || !c.mastery.is_mastered())
            .collect())
    }

    async fn fetch_notes(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<FreeformNote>, StoreError> {
        let doc = self.load()?;
        Ok(doc
            .notes
            .into_iter()
            .filter(|n| n.owner_id == owner_id)
            .filter(|n| include_mastered || !n.mastery.is_mastered())
            .collect())
    }
}

#[async_trait]
impl MutationSink for FileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn write_mastery(&self, item: ItemRef, state: Mastery) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load()?;

        let slot = match item {
            ItemRef::Concept(id) => doc
                .concepts
                .iter_mut()
                .find(|c| c.id == id)
                .map(|c| &mut c.mastery),
            ItemRef::Note(id) => doc.notes.iter_mut().find(|n| n.id == id).map(|n| &mut n.mastery),
        };
        let Some(slot) = slot else {
            return Err(StoreError::NotFound(item.to_string()));
        };
        *slot = state;

        self.save(&doc)
    }

    #[instrument(
        skip(self, upsert),
        fields(concept_id = upsert.concept_id, language = %upsert.language)
    )]
    async fn upsert_translation(
        &self,
        upsert: &TranslationUpsert,
    ) -> Result<Translation, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load()?;
        let next_id = doc.next_translation_id();

        let Some(concept) = doc.concepts.iter_mut().find(|c| c.id == upsert.concept_id) else {
            return Err(StoreError::NotFound(ItemRef::Concept(upsert.concept_id).to_string()));
        };

        let saved = match concept
            .translations
            .iter_mut()
            .find(|t| t.language == upsert.language)
        {
            Some(existing) => {
                existing.term = upsert.term.clone();
                existing.pronunciation = upsert.pronunciation.clone();
                existing.gloss = upsert.gloss.clone();
                existing.clone()
            }
            None => {
                let t = Translation {
                    id: next_id,
                    concept_id: upsert.concept_id,
                    language: upsert.language,
                    term: upsert.term.clone(),
                    pronunciation: upsert.pronunciation.clone(),
                    gloss: upsert.gloss.clone(),
                };
                concept.translations.push(t.clone());
                t
            }
        };

        self.save(&doc)?;
        Ok(saved)
    }
}

impl Store for FileStore {
    fn name(&self) -> &str {
        "file"
    }
}
