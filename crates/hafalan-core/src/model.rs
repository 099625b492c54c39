//! Core data model types for hafalan.
//!
//! These are the fundamental types shared by the quiz engine, the store
//! implementations and the CLI: vocabulary concepts with their translations,
//! free-form notes, mastery flags and the ephemeral quiz questions generated
//! from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Languages a translation can be written in.
///
/// The set is closed. Variant order is the canonical order used whenever
/// languages are enumerated (e.g. when building question pairs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Indonesian,
    English,
    Mandarin,
    Japanese,
}

impl Language {
    /// All languages in canonical order.
    pub const ALL: [Language; 4] = [
        Language::Indonesian,
        Language::English,
        Language::Mandarin,
        Language::Japanese,
    ];

    /// The tag the remote store keeps in its `bahasa` column.
    pub fn store_tag(self) -> &'static str {
        match self {
            Language::Indonesian => "Indonesia",
            Language::English => "Inggris",
            Language::Mandarin => "Mandarin",
            Language::Japanese => "Jepang",
        }
    }

    /// Inverse of [`Language::store_tag`]. Exact match only.
    pub fn from_store_tag(tag: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.store_tag() == tag)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Indonesian => write!(f, "Indonesian"),
            Language::English => write!(f, "English"),
            Language::Mandarin => write!(f, "Mandarin"),
            Language::Japanese => write!(f, "Japanese"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indonesian" | "indonesia" | "id" => Ok(Language::Indonesian),
            "english" | "inggris" | "en" => Ok(Language::English),
            "mandarin" | "chinese" | "zh" => Ok(Language::Mandarin),
            "japanese" | "jepang" | "ja" => Ok(Language::Japanese),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// Source/target constraint for question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFilter {
    #[default]
    Any,
    Only(Language),
}

impl LanguageFilter {
    pub fn matches(self, language: Language) -> bool {
        match self {
            LanguageFilter::Any => true,
            LanguageFilter::Only(l) => l == language,
        }
    }
}

impl fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageFilter::Any => write!(f, "any"),
            LanguageFilter::Only(l) => write!(f, "{l}"),
        }
    }
}

impl FromStr for LanguageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "acak" | "*" => Ok(LanguageFilter::Any),
            other => other.parse().map(LanguageFilter::Only),
        }
    }
}

/// Binary per-item learning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mastery {
    #[default]
    Unmastered,
    Mastered,
}

impl Mastery {
    pub fn is_mastered(self) -> bool {
        self == Mastery::Mastered
    }
}

impl From<bool> for Mastery {
    fn from(flag: bool) -> Self {
        if flag {
            Mastery::Mastered
        } else {
            Mastery::Unmastered
        }
    }
}

impl From<Mastery> for bool {
    fn from(m: Mastery) -> Self {
        m.is_mastered()
    }
}

impl fmt::Display for Mastery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mastery::Unmastered => write!(f, "unmastered"),
            Mastery::Mastered => write!(f, "mastered"),
        }
    }
}

/// A unit of vocabulary meaning with its language-specific translations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConcept {
    pub id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub folder_id: Option<i64>,
    /// Free-text note attached to the concept.
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub mastery: Mastery,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

impl VocabularyConcept {
    /// The trimmed term for `language`, if a translation with non-blank
    /// term text exists. The first matching translation wins.
    pub fn term(&self, language: Language) -> Option<&str> {
        self.translations
            .iter()
            .filter(|t| t.language == language)
            .map(|t| t.term.trim())
            .find(|term| !term.is_empty())
    }

    /// Languages with a usable term, in canonical order.
    pub fn available_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|&l| self.term(l).is_some())
            .collect()
    }
}

/// A concept's realization in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: i64,
    pub concept_id: i64,
    pub language: Language,
    pub term: String,
    #[serde(default)]
    pub pronunciation: String,
    /// Short meaning/explanation of the term.
    #[serde(default)]
    pub gloss: String,
}

/// Payload for the find-then-upsert translation write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUpsert {
    pub concept_id: i64,
    pub language: Language,
    pub term: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub gloss: String,
}

/// A free-form note practiced by recalling its body from its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeformNote {
    pub id: i64,
    pub owner_id: i64,
    #[serde(default)]
    pub folder_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub mastery: Mastery,
    pub created_at: DateTime<Utc>,
}

/// Which kind of item a mastery flag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Concept,
    Note,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Concept => write!(f, "concept"),
            ItemKind::Note => write!(f, "note"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concept" | "vocab" | "vocabulary" => Ok(ItemKind::Concept),
            "note" | "notes" => Ok(ItemKind::Note),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// Stable identity of a masterable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ItemRef {
    Concept(i64),
    Note(i64),
}

impl ItemRef {
    pub fn new(kind: ItemKind, id: i64) -> Self {
        match kind {
            ItemKind::Concept => ItemRef::Concept(id),
            ItemKind::Note => ItemRef::Note(id),
        }
    }

    pub fn kind(self) -> ItemKind {
        match self {
            ItemRef::Concept(_) => ItemKind::Concept,
            ItemRef::Note(_) => ItemKind::Note,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            ItemRef::Concept(id) | ItemRef::Note(id) => id,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id())
    }
}

/// A generated question. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub item: ItemRef,
    /// Present only for vocabulary questions.
    pub from: Option<Language>,
    /// Present only for vocabulary questions.
    pub to: Option<Language>,
    pub prompt: String,
    pub answer: String,
}

/// Quiz configuration chosen by the user before a practice run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    #[serde(default)]
    pub from: LanguageFilter,
    #[serde(default)]
    pub to: LanguageFilter,
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
    #[serde(default)]
    pub include_mastered: bool,
}

fn default_max_questions() -> usize {
    40
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            from: LanguageFilter::Any,
            to: LanguageFilter::Any,
            max_questions: default_max_questions(),
            include_mastered: false,
        }
    }
}

impl QuizSettings {
    /// Reject combinations no question can satisfy.
    ///
    /// The engine itself tolerates these (it yields an empty pool); callers
    /// validate first so the user gets a reason instead of an empty quiz.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.max_questions == 0 {
            return Err(QuizError::ZeroQuestions);
        }
        if let (LanguageFilter::Only(a), LanguageFilter::Only(b)) = (self.from, self.to) {
            if a == b {
                return Err(QuizError::SameLanguage(a));
            }
        }
        Ok(())
    }
}
