//! In-memory store for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use hafalan_core::error::StoreError;
use hafalan_core::model::{
    FreeformNote, ItemRef, Mastery, Translation, TranslationUpsert, VocabularyConcept,
};
use hafalan_core::traits::{MutationSink, SnapshotProvider, Store};

/// A store that keeps everything in memory and records what was asked of it.
///
/// Fetch and write failures can be switched on to exercise degraded paths.
#[derive(Default)]
pub struct MemoryStore {
    concepts: Mutex<Vec<VocabularyConcept>>,
    notes: Mutex<Vec<FreeformNote>>,
    writes: Mutex<Vec<(ItemRef, Mastery)>>,
    fetch_count: AtomicU32,
    fail_fetches: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new(concepts: Vec<VocabularyConcept>, notes: Vec<FreeformNote>) -> Self {
        Self {
            concepts: Mutex::new(concepts),
            notes: Mutex::new(notes),
            ..Default::default()
        }
    }

    /// Make every fetch return a network error.
    pub fn failing_fetches(mut self) -> Self {
        self.fail_fetches = true;
        self
    }

    /// Make every write return an API error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Mastery writes received, in issuance order.
    pub fn writes(&self) -> Vec<(ItemRef, Mastery)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn concepts(&self) -> Vec<VocabularyConcept> {
        self.concepts.lock().unwrap().clone()
    }

    fn check_fetch(&self) -> Result<(), StoreError> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_fetches {
            return Err(StoreError::Network("memory store is offline".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Api {
                status: 500,
                message: "memory store rejected the write".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotProvider for MemoryStore {
    async fn fetch_vocabulary(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<VocabularyConcept>, StoreError> {
        self.check_fetch()?;
        Ok(self
            .concepts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .filter(|c| include_mastered || !c.mastery.is_mastered())
            .cloned()
            .collect())
    }

    async fn fetch_notes(
        &self,
        owner_id: i64,
        include_mastered: bool,
    ) -> Result<Vec<FreeformNote>, StoreError> {
        self.check_fetch()?;
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .filter(|n| include_mastered || !n.mastery.is_mastered())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MutationSink for MemoryStore {
    async fn write_mastery(&self, item: ItemRef, state: Mastery) -> Result<(), StoreError> {
        self.check_write()?;
        let found = match item {
            ItemRef::Concept(id) => {
                match self.concepts.lock().unwrap().iter_mut().find(|c| c.id == id) {
                    Some(c) => {
                        c.mastery = state;
                        true
                    }
                    None => false,
                }
            }
            ItemRef::Note(id) => match self.notes.lock().unwrap().iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.mastery = state;
                    true
                }
                None => false,
            },
        };
        if !found {
            return Err(StoreError::NotFound(item.to_string()));
        }
        self.writes.lock().unwrap().push((item, state));
        Ok(())
    }

    async fn upsert_translation(
        &self,
        upsert: &TranslationUpsert,
    ) -> Result<Translation, StoreError> {
        self.check_write()?;
        let mut concepts = self.concepts.lock().unwrap();
        let next_id = concepts
            .iter()
            .flat_map(|c| &c.translations)
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1;
        let concept = concepts
            .iter_mut()
            .find(|c| c.id == upsert.concept_id)
            .ok_or_else(|| StoreError::NotFound(ItemRef::Concept(upsert.concept_id).to_string()))?;

        if let Some(t) = concept
            .translations
            .iter_mut()
            .find(|t| t.language == upsert.language)
        {
            t.term = upsert.term.clone();
            t.pronunciation = upsert.pronunciation.clone();
            t.gloss = upsert.gloss.clone();
            return Ok(t.clone());
        }

        let t = Translation {
            id: next_id,
            concept_id: upsert.concept_id,
            language: upsert.language,
            term: upsert.term.clone(),
            pronunciation: upsert.pronunciation.clone(),
            gloss: upsert.gloss.clone(),
        };
        concept.translations.push(t.clone());
        Ok(t)
    }
}

impl Store for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use hafalan_core::model::{Language, LanguageFilter, QuizSettings};
    use hafalan_core::practice::Practice;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn concept(id: i64, terms: &[(Language, &str)]) -> VocabularyConcept {
        VocabularyConcept {
            id,
            owner_id: 1,
            folder_id: None,
            note: String::new(),
            mastery: Mastery::Unmastered,
            translations: terms
                .iter()
                .enumerate()
                .map(|(i, (language, term))| Translation {
                    id: id * 10 + i as i64,
                    concept_id: id,
                    language: *language,
                    term: term.to_string(),
                    pronunciation: String::new(),
                    gloss: String::new(),
                })
                .collect(),
        }
    }

    fn scenario() -> MemoryStore {
        MemoryStore::new(
            vec![
                concept(1, &[(Language::Indonesian, "apel"), (Language::English, "apple")]),
                concept(
                    2,
                    &[
                        (Language::Indonesian, "meja"),
                        (Language::English, "table"),
                        (Language::Mandarin, "桌子"),
                    ],
                ),
            ],
            vec![],
        )
    }

    #[tokio::test]
    async fn full_scenario_pool_and_mastery() {
        let store = scenario();
        let practice = Practice::new(&store, &store, 1);
        let settings = QuizSettings {
            max_questions: 100,
            ..Default::default()
        };

        let mut session = practice
            .start_vocabulary(&settings, &mut StdRng::seed_from_u64(5))
            .await
            .unwrap();
        assert_eq!(session.progress().total, 8);

        while let Some(q) = session.current().cloned() {
            let is_target = q.item == ItemRef::Concept(1)
                && q.from == Some(Language::Indonesian)
                && q.to == Some(Language::English);
            let answer = if is_target { "apple" } else { "no idea" };
            practice.submit(&mut session, answer).await.unwrap();
        }

        assert_eq!(session.progress().correct, 1);
        assert_eq!(store.writes(), vec![(ItemRef::Concept(1), Mastery::Mastered)]);
        assert_eq!(store.concepts()[0].mastery, Mastery::Mastered);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn next_session_excludes_newly_mastered_concept() {
        let store = scenario();
        store
            .write_mastery(ItemRef::Concept(2), Mastery::Mastered)
            .await
            .unwrap();
        let practice = Practice::new(&store, &store, 1);

        let session = practice
            .start_vocabulary(&QuizSettings::default(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();
        assert_eq!(session.progress().total, 2);

        let settings = QuizSettings {
            from: LanguageFilter::Only(Language::Mandarin),
            include_mastered: true,
            ..Default::default()
        };
        let session = practice
            .start_vocabulary(&settings, &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();
        assert_eq!(session.progress().total, 2);
    }

    #[tokio::test]
    async fn write_failures_do_not_stop_the_session() {
        let store = scenario().failing_writes();
        let practice = Practice::new(&store, &store, 1);
        let mut session = practice
            .start_vocabulary(&QuizSettings::default(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        let answer = session.current().unwrap().answer.clone();
        let report = practice.submit(&mut session, &answer).await.unwrap();
        assert!(report.outcome.correct);
        assert!(report.write_error.is_some());
        assert_eq!(session.progress().index, 1);
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn offline_store_yields_empty_quiz() {
        let store = scenario().failing_fetches();
        let practice = Practice::new(&store, &store, 1);
        let session = practice
            .start_notes(&QuizSettings::default(), &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();
        assert!(session.is_finished());
    }
}
