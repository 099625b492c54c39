//! Mastery state machine.
//!
//! Two states, two events:
//!
//! - `ManualToggle(target)` sets the flag to exactly `target` from any state.
//! - `QuizCorrect` moves `Unmastered -> Mastered` and is a no-op otherwise.
//!
//! There is no event for a wrong answer; quizzes can never un-master an item.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{FreeformNote, ItemRef, Mastery, VocabularyConcept};

/// Something that happened to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryEvent {
    /// Explicit user action (checkbox, "mark as learned" button).
    ManualToggle(Mastery),
    /// A quiz answer for the item was judged correct.
    QuizCorrect,
}

/// Next state for `current` under `event`.
pub fn transition(current: Mastery, event: MasteryEvent) -> Mastery {
    match event {
        MasteryEvent::ManualToggle(target) => target,
        MasteryEvent::QuizCorrect => Mastery::Mastered,
    }
}

/// A pending flag write for the mutation sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryWrite {
    pub item: ItemRef,
    pub state: Mastery,
}

/// Known mastery state per item, seeded from a snapshot.
///
/// Items never seen default to `Unmastered`.
#[derive(Debug, Clone, Default)]
pub struct MasteryBook {
    states: HashMap<ItemRef, Mastery>,
}

impl MasteryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_concepts(concepts: &[VocabularyConcept]) -> Self {
        Self {
            states: concepts
                .iter()
                .map(|c| (ItemRef::Concept(c.id), c.mastery))
                .collect(),
        }
    }

    pub fn from_notes(notes: &[FreeformNote]) -> Self {
        Self {
            states: notes
                .iter()
                .map(|n| (ItemRef::Note(n.id), n.mastery))
                .collect(),
        }
    }

    pub fn state(&self, item: ItemRef) -> Mastery {
        self.states.get(&item).copied().unwrap_or_default()
    }

    /// Apply `event` to `item`.
    ///
    /// Returns the write to issue when the state changed. Manual toggles
    /// always produce a write since the user asked for that exact state.
    pub fn apply(&mut self, item: ItemRef, event: MasteryEvent) -> Option<MasteryWrite> {
        let current = self.state(item);
        let next = transition(current, event);
        self.states.insert(item, next);

        let changed = next != current;
        match event {
            MasteryEvent::ManualToggle(_) => Some(MasteryWrite { item, state: next }),
            MasteryEvent::QuizCorrect if changed => Some(MasteryWrite { item, state: next }),
            MasteryEvent::QuizCorrect => None,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
