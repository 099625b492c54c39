//! hafalan-core: quiz generation and mastery tracking engine.
//!
//! This crate defines the data model, the collaborator traits, and the logic
//! that turns vocabulary and note snapshots into randomized quizzes, grades
//! answers and advances per-item mastery.

pub mod engine;
pub mod error;
pub mod mastery;
pub mod model;
pub mod practice;
pub mod session;
pub mod statistics;
pub mod traits;

pub use error::{QuizError, StoreError};
