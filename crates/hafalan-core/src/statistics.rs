//! Learning progress statistics computed from snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{FreeformNote, Language, VocabularyConcept};
use crate::session::SessionProgress;

/// Mastered/unmastered split for one kind of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MasteryCount {
    pub total: usize,
    pub mastered: usize,
}

impl MasteryCount {
    pub fn unmastered(&self) -> usize {
        self.total - self.mastered
    }

    /// Fraction mastered; 0.0 when there is nothing to count.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered as f64 / self.total as f64
        }
    }
}

/// Overview of a user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
    pub concepts: MasteryCount,
    pub notes: MasteryCount,
    pub translations: usize,
    /// Translation count per language. Every language is present.
    pub per_language: BTreeMap<Language, usize>,
}

/// Compute collection statistics. Expects unfiltered snapshots
/// (mastered items included).
pub fn compute_learning_stats(
    concepts: &[VocabularyConcept],
    notes: &[FreeformNote],
) -> LearningStats {
    let mut per_language: BTreeMap<Language, usize> =
        Language::ALL.into_iter().map(|l| (l, 0)).collect();
    let mut translations = 0;

    for t in concepts.iter().flat_map(|c| &c.translations) {
        translations += 1;
        *per_language.entry(t.language).or_default() += 1;
    }

    LearningStats {
        concepts: MasteryCount {
            total: concepts.len(),
            mastered: concepts.iter().filter(|c| c.mastery.is_mastered()).count(),
        },
        notes: MasteryCount {
            total: notes.len(),
            mastered: notes.iter().filter(|n| n.mastery.is_mastered()).count(),
        },
        translations,
        per_language,
    }
}

/// Share of attempted questions answered correctly.
pub fn accuracy(progress: &SessionProgress) -> f64 {
    if progress.attempted == 0 {
        0.0
    } else {
        progress.correct as f64 / progress.attempted as f64
    }
}
