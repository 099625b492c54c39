//! Practice driver: glue between the collaborators and the sessions.
//!
//! One snapshot fetch seeds each session; the pool stays frozen for the
//! session's lifetime. Mastery writes go out after the session has already
//! advanced, one at a time, and are never retried or rolled back.

use rand::Rng;
use tracing::instrument;

use crate::engine::{build_vocabulary_pool, sample_notes};
use crate::error::{QuizError, StoreError};
use crate::mastery::{MasteryBook, MasteryEvent, MasteryWrite};
use crate::model::{ItemRef, Mastery, QuizSettings, Translation, TranslationUpsert};
use crate::session::{QuizSession, RecallSession, SubmitOutcome};
use crate::traits::{MutationSink, SnapshotProvider};

/// What the caller gets back after an answer.
#[derive(Debug)]
pub struct SubmitReport {
    pub outcome: SubmitOutcome,
    /// Set when the mastery write was attempted and failed. The session has
    /// moved on regardless.
    pub write_error: Option<StoreError>,
}

/// Binds a user's store to quiz sessions.
pub struct Practice<'a, P: ?Sized, M: ?Sized> {
    snapshots: &'a P,
    sink: &'a M,
    owner_id: i64,
}

impl<'a, P, M> Practice<'a, P, M>
where
    P: SnapshotProvider + ?Sized,
    M: MutationSink + ?Sized,
{
    pub fn new(snapshots: &'a P, sink: &'a M, owner_id: i64) -> Self {
        Self {
            snapshots,
            sink,
            owner_id,
        }
    }

    /// Fetch vocabulary once and start a typed-answer quiz.
    ///
    /// A failed fetch degrades to an empty snapshot, which yields an empty
    /// (already finished) session.
    #[instrument(skip(self, settings, rng), fields(owner_id = self.owner_id))]
    pub async fn start_vocabulary<R: Rng + ?Sized>(
        &self,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<QuizSession, QuizError> {
        settings.validate()?;
        let concepts = self
            .snapshots
            .fetch_vocabulary(self.owner_id, settings.include_mastered)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("vocabulary snapshot unavailable, practicing nothing: {e}");
                Vec::new()
            });
        let pool = build_vocabulary_pool(&concepts, settings, rng);
        Ok(QuizSession::start(pool, MasteryBook::from_concepts(&concepts)))
    }

    /// Fetch notes once and start a recall quiz.
    #[instrument(skip(self, settings, rng), fields(owner_id = self.owner_id))]
    pub async fn start_notes<R: Rng + ?Sized>(
        &self,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> Result<RecallSession, QuizError> {
        if settings.max_questions == 0 {
            return Err(QuizError::ZeroQuestions);
        }
        let notes = self
            .snapshots
            .fetch_notes(self.owner_id, settings.include_mastered)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("note snapshot unavailable, practicing nothing: {e}");
                Vec::new()
            });
        let pool = sample_notes(&notes, settings, rng);
        Ok(RecallSession::start(pool, MasteryBook::from_notes(&notes)))
    }

    /// Grade a typed answer, then issue the mastery write if one resulted.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        raw_answer: &str,
    ) -> Option<SubmitReport> {
        let outcome = session.submit(raw_answer)?;
        Some(self.dispatch(outcome).await)
    }

    /// Record a "recalled it" verdict on the current note.
    pub async fn mark_correct(&self, session: &mut RecallSession) -> Option<SubmitReport> {
        let outcome = session.mark_correct()?;
        Some(self.dispatch(outcome).await)
    }

    /// Manual toggle from outside a quiz: always writes the requested state.
    pub async fn set_mastery(&self, item: ItemRef, state: Mastery) -> Result<(), StoreError> {
        let mut book = MasteryBook::new();
        match book.apply(item, MasteryEvent::ManualToggle(state)) {
            Some(write) => self.sink.write_mastery(write.item, write.state).await,
            None => Ok(()),
        }
    }

    /// Create or update the translation of a concept in one language.
    pub async fn save_translation(
        &self,
        upsert: &TranslationUpsert,
    ) -> Result<Translation, StoreError> {
        self.sink.upsert_translation(upsert).await
    }

    async fn dispatch(&self, outcome: SubmitOutcome) -> SubmitReport {
        let write_error = match outcome.write {
            Some(MasteryWrite { item, state }) => {
                match self.sink.write_mastery(item, state).await {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(%item, %state, "mastery write failed: {e}");
                        Some(e)
                    }
                }
            }
            None => None,
        };
        SubmitReport {
            outcome,
            write_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::model::{FreeformNote, Language, LanguageFilter, VocabularyConcept};

    /// Minimal in-process store for exercising the driver.
    #[derive(Default)]
    struct FakeStore {
        concepts: Vec<VocabularyConcept>,
        notes: Vec<FreeformNote>,
        fail_fetch: bool,
        fail_write: bool,
        writes: Mutex<Vec<(ItemRef, Mastery)>>,
        fetches: Mutex<u32>,
    }

    #[async_trait]
    impl SnapshotProvider for FakeStore {
        async fn fetch_vocabulary(
            &self,
            _owner_id: i64,
            _include_mastered: bool,
        ) -> Result<Vec<VocabularyConcept>, StoreError> {
            *self.fetches.lock().unwrap() += 1;
            if self.fail_fetch {
                return Err(StoreError::Network("offline".into()));
            }
            Ok(self.concepts.clone())
        }

        async fn fetch_notes(
            &self,
            _owner_id: i64,
            _include_mastered: bool,
        ) -> Result<Vec<FreeformNote>, StoreError> {
            *self.fetches.lock().unwrap() += 1;
            if self.fail_fetch {
                return Err(StoreError::Network("offline".into()));
            }
            Ok(self.notes.clone())
        }
    }

    #[async_trait]
    impl MutationSink for FakeStore {
        async fn write_mastery(&self, item: ItemRef, state: Mastery) -> Result<(), StoreError> {
            if self.fail_write {
                return Err(StoreError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            self.writes.lock().unwrap().push((item, state));
            Ok(())
        }

        async fn upsert_translation(
            &self,
            upsert: &TranslationUpsert,
        ) -> Result<Translation, StoreError> {
            Ok(Translation {
                id: 1,
                concept_id: upsert.concept_id,
                language: upsert.language,
                term: upsert.term.clone(),
                pronunciation: upsert.pronunciation.clone(),
                gloss: upsert.gloss.clone(),
            })
        }
    }

    fn apel() -> VocabularyConcept {
        VocabularyConcept {
            id: 1,
            owner_id: 1,
            folder_id: None,
            note: String::new(),
            mastery: Mastery::Unmastered,
            translations: vec![
                Translation {
                    id: 10,
                    concept_id: 1,
                    language: Language::Indonesian,
                    term: "apel".into(),
                    pronunciation: String::new(),
                    gloss: String::new(),
                },
                Translation {
                    id: 11,
                    concept_id: 1,
                    language: Language::English,
                    term: "apple".into(),
                    pronunciation: String::new(),
                    gloss: String::new(),
                },
            ],
        }
    }

    fn id_to_en() -> QuizSettings {
        QuizSettings {
            from: LanguageFilter::Only(Language::Indonesian),
            to: LanguageFilter::Only(Language::English),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn correct_answer_writes_through_sink() {
        let store = FakeStore {
            concepts: vec![apel()],
            ..Default::default()
        };
        let practice = Practice::new(&store, &store, 1);
        let mut rng = StdRng::seed_from_u64(1);

        let mut session = practice.start_vocabulary(&id_to_en(), &mut rng).await.unwrap();
        assert_eq!(session.current().unwrap().prompt, "apel");

        let report = practice.submit(&mut session, " Apple").await.unwrap();
        assert!(report.outcome.correct);
        assert!(report.write_error.is_none());
        assert_eq!(
            *store.writes.lock().unwrap(),
            vec![(ItemRef::Concept(1), Mastery::Mastered)]
        );
        assert!(practice.submit(&mut session, "apple").await.is_none());
        assert_eq!(*store.fetches.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_degrades_to_empty_session() {
        let store = FakeStore {
            concepts: vec![apel()],
            fail_fetch: true,
            ..Default::default()
        };
        let practice = Practice::new(&store, &store, 1);
        let session = practice
            .start_vocabulary(&QuizSettings::default(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();
        assert!(session.is_finished());
    }

    #[tokio::test]
    async fn failed_write_is_surfaced_but_session_advances() {
        let store = FakeStore {
            concepts: vec![apel()],
            fail_write: true,
            ..Default::default()
        };
        let practice = Practice::new(&store, &store, 1);
        let mut session = practice
            .start_vocabulary(&id_to_en(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();

        let report = practice.submit(&mut session, "apple").await.unwrap();
        assert!(report.outcome.correct);
        assert!(report.write_error.is_some());
        assert!(session.is_finished());
        assert_eq!(session.progress().correct, 1);
    }

    #[tokio::test]
    async fn same_language_is_rejected_before_fetch() {
        let store = FakeStore::default();
        let practice = Practice::new(&store, &store, 1);
        let settings = QuizSettings {
            from: LanguageFilter::Only(Language::Mandarin),
            to: LanguageFilter::Only(Language::Mandarin),
            ..Default::default()
        };
        let err = practice
            .start_vocabulary(&settings, &mut StdRng::seed_from_u64(0))
            .await
            .unwrap_err();
        assert_eq!(err, QuizError::SameLanguage(Language::Mandarin));
        assert_eq!(*store.fetches.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn note_quiz_marks_note_mastered() {
        let store = FakeStore {
            notes: vec![FreeformNote {
                id: 4,
                owner_id: 1,
                folder_id: None,
                title: "Pythagoras".into(),
                body: "a² + b² = c²".into(),
                mastery: Mastery::Unmastered,
                created_at: Utc::now(),
            }],
            ..Default::default()
        };
        let practice = Practice::new(&store, &store, 1);
        let mut session = practice
            .start_notes(&QuizSettings::default(), &mut StdRng::seed_from_u64(0))
            .await
            .unwrap();

        let report = practice.mark_correct(&mut session).await.unwrap();
        assert_eq!(report.outcome.question.item, ItemRef::Note(4));
        assert_eq!(
            *store.writes.lock().unwrap(),
            vec![(ItemRef::Note(4), Mastery::Mastered)]
        );
    }

    #[tokio::test]
    async fn manual_toggle_always_writes() {
        let store = FakeStore::default();
        let practice = Practice::new(&store, &store, 1);
        practice
            .set_mastery(ItemRef::Concept(2), Mastery::Unmastered)
            .await
            .unwrap();
        assert_eq!(
            *store.writes.lock().unwrap(),
            vec![(ItemRef::Concept(2), Mastery::Unmastered)]
        );
    }
}
