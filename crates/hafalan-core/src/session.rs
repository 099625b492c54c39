//! Quiz session controllers.
//!
//! A session owns a frozen, already shuffled question sequence and walks it
//! strictly forward, once. [`QuizSession`] grades typed answers against the
//! expected term; [`RecallSession`] takes the user's own verdict for notes,
//! whose answers are prose and cannot be string-compared.
//!
//! Sessions never talk to the store. A correct answer returns the
//! [`MasteryWrite`] to issue and the caller dispatches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mastery::{MasteryBook, MasteryEvent, MasteryWrite};
use crate::model::QuizQuestion;

/// Trim, then apply full Unicode default case folding (so `ß` and `ss`
/// compare equal). Nothing else: no accent stripping, no punctuation
/// removal, no fuzzy matching.
pub fn normalize_answer(s: &str) -> String {
    caseless::default_case_fold_str(s.trim())
}

/// Position and score of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionProgress {
    /// Index of the current question; equals `total` once finished.
    pub index: usize,
    pub total: usize,
    pub correct: u32,
    pub attempted: u32,
}

impl SessionProgress {
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.index)
    }
}

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The question that was answered.
    pub question: QuizQuestion,
    pub correct: bool,
    /// Mastery write to issue, if the answer changed the item's state.
    pub write: Option<MasteryWrite>,
}

/// Forward-only walk over a question list with score counters.
#[derive(Debug, Clone)]
struct Cursor {
    id: Uuid,
    started_at: DateTime<Utc>,
    questions: Vec<QuizQuestion>,
    index: usize,
    correct: u32,
    attempted: u32,
    book: MasteryBook,
}

impl Cursor {
    fn new(questions: Vec<QuizQuestion>, book: MasteryBook) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            questions,
            index: 0,
            correct: 0,
            attempted: 0,
            book,
        }
    }

    fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    /// Score the current question and move past it.
    fn record(&mut self, correct: bool) -> Option<SubmitOutcome> {
        let question = self.current()?.clone();
        self.attempted += 1;
        let write = if correct {
            self.correct += 1;
            self.book.apply(question.item, MasteryEvent::QuizCorrect)
        } else {
            None
        };
        self.index += 1;
        Some(SubmitOutcome {
            question,
            correct,
            write,
        })
    }

    fn skip(&mut self) -> bool {
        if self.current().is_none() {
            return false;
        }
        self.index += 1;
        true
    }

    fn progress(&self) -> SessionProgress {
        SessionProgress {
            index: self.index,
            total: self.questions.len(),
            correct: self.correct,
            attempted: self.attempted,
        }
    }
}

// ---------------------------------------------------------------------------
// Vocabulary quiz
// ---------------------------------------------------------------------------

/// Typed-answer quiz over translation questions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    cursor: Cursor,
}

impl QuizSession {
    /// Install `pool` and reset position and counters.
    pub fn start(pool: Vec<QuizQuestion>, book: MasteryBook) -> Self {
        let session = Self {
            cursor: Cursor::new(pool, book),
        };
        tracing::info!(
            session_id = %session.id(),
            questions = session.cursor.questions.len(),
            "vocabulary quiz started"
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.cursor.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.cursor.started_at
    }

    /// The question to answer, or `None` once the pool is exhausted.
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.cursor.current()
    }

    /// Grade `raw_answer` against the current question and advance.
    ///
    /// Returns `None` (and changes nothing) when there is no current question.
    pub fn submit(&mut self, raw_answer: &str) -> Option<SubmitOutcome> {
        let expected = normalize_answer(&self.current()?.answer);
        let correct = normalize_answer(raw_answer) == expected;
        let outcome = self.cursor.record(correct);
        if let Some(o) = &outcome {
            tracing::debug!(
                session_id = %self.cursor.id,
                item = %o.question.item,
                correct,
                "answer graded"
            );
        }
        outcome
    }

    /// Move past the current question without scoring it.
    pub fn skip(&mut self) -> bool {
        self.cursor.skip()
    }

    pub fn progress(&self) -> SessionProgress {
        self.cursor.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    pub fn mastery(&self) -> &MasteryBook {
        &self.cursor.book
    }
}

// ---------------------------------------------------------------------------
// Note recall quiz
// ---------------------------------------------------------------------------

/// Self-graded recall quiz over notes.
#[derive(Debug, Clone)]
pub struct RecallSession {
    cursor: Cursor,
    answer_visible: bool,
}

impl RecallSession {
    pub fn start(pool: Vec<QuizQuestion>, book: MasteryBook) -> Self {
        let session = Self {
            cursor: Cursor::new(pool, book),
            answer_visible: false,
        };
        tracing::info!(
            session_id = %session.id(),
            questions = session.cursor.questions.len(),
            "recall quiz started"
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.cursor.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.cursor.started_at
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.cursor.current()
    }

    /// Show or hide the answer. Display only; scoring is unaffected.
    pub fn toggle_answer(&mut self) -> bool {
        if self.current().is_some() {
            self.answer_visible = !self.answer_visible;
        }
        self.answer_visible
    }

    pub fn answer_visible(&self) -> bool {
        self.answer_visible
    }

    /// The user recalled the note.
    pub fn mark_correct(&mut self) -> Option<SubmitOutcome> {
        self.advance_with(|c| c.record(true))
    }

    /// The user did not recall the note. Never touches mastery.
    pub fn mark_wrong(&mut self) -> Option<SubmitOutcome> {
        self.advance_with(|c| c.record(false))
    }

    pub fn skip(&mut self) -> bool {
        self.advance_with(|c| c.skip().then_some(())).is_some()
    }

    pub fn progress(&self) -> SessionProgress {
        self.cursor.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    pub fn mastery(&self) -> &MasteryBook {
        &self.cursor.book
    }

    fn advance_with<T>(&mut self, step: impl FnOnce(&mut Cursor) -> Option<T>) -> Option<T> {
        let out = step(&mut self.cursor);
        if out.is_some() {
            self.answer_visible = false;
        }
        out
    }
}
