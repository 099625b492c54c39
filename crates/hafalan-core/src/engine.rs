//! Question pool generation.
//!
//! Turns a snapshot of vocabulary concepts into directed translation
//! questions (every ordered pair of usable languages), or a snapshot of notes
//! into recall questions, then shuffles and truncates the pool.
//!
//! Randomness is injected so pools are reproducible under a seeded RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{FreeformNote, ItemRef, QuizQuestion, QuizSettings, VocabularyConcept};

/// Every directed question the snapshot can produce under `settings`,
/// before shuffling and truncation.
///
/// Concepts are visited in snapshot order and language pairs in canonical
/// language order, so the candidate pool is deterministic.
pub fn vocabulary_candidates(
    concepts: &[VocabularyConcept],
    settings: &QuizSettings,
) -> Vec<QuizQuestion> {
    let mut pool = Vec::new();

    for concept in concepts {
        if !settings.include_mastered && concept.mastery.is_mastered() {
            continue;
        }

        let available = concept.available_languages();
        if available.len() < 2 {
            continue;
        }

        for &from in &available {
            if !settings.from.matches(from) {
                continue;
            }
            for &to in &available {
                if from == to || !settings.to.matches(to) {
                    continue;
                }
                // Both terms exist: `available` only holds languages with a term.
                let (Some(prompt), Some(answer)) = (concept.term(from), concept.term(to)) else {
                    continue;
                };
                pool.push(QuizQuestion {
                    item: ItemRef::Concept(concept.id),
                    from: Some(from),
                    to: Some(to),
                    prompt: prompt.to_string(),
                    answer: answer.to_string(),
                });
            }
        }
    }

    pool
}

/// Build a shuffled vocabulary question pool of at most
/// `settings.max_questions` entries.
pub fn build_vocabulary_pool<R: Rng + ?Sized>(
    concepts: &[VocabularyConcept],
    settings: &QuizSettings,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let pool = vocabulary_candidates(concepts, settings);
    tracing::debug!(
        concepts = concepts.len(),
        candidates = pool.len(),
        from = %settings.from,
        to = %settings.to,
        "built vocabulary candidate pool"
    );
    shuffle_truncate(pool, settings.max_questions, rng)
}

/// Pick recall questions from a note snapshot: title as prompt, body as
/// answer, one question per eligible note.
pub fn sample_notes<R: Rng + ?Sized>(
    notes: &[FreeformNote],
    settings: &QuizSettings,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let pool: Vec<QuizQuestion> = notes
        .iter()
        .filter(|n| settings.include_mastered || !n.mastery.is_mastered())
        .map(|n| QuizQuestion {
            item: ItemRef::Note(n.id),
            from: None,
            to: None,
            prompt: n.title.clone(),
            answer: n.body.clone(),
        })
        .collect();
    tracing::debug!(notes = notes.len(), eligible = pool.len(), "sampled notes");
    shuffle_truncate(pool, settings.max_questions, rng)
}

fn shuffle_truncate<T, R: Rng + ?Sized>(mut pool: Vec<T>, max: usize, rng: &mut R) -> Vec<T> {
    pool.shuffle(rng);
    pool.truncate(max);
    pool
}
