//! markwise-core — weighted scoring of free-text answers.
//!
//! This crate defines the data model, the assessor capability, the judgment
//! read pipeline, weight selection, score aggregation and feedback text that
//! the rest of markwise builds on.

pub mod engine;
pub mod error;
pub mod feedback;
pub mod judgment;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod report;
pub mod results;
pub mod scorer;
pub mod statistics;
pub mod traits;
pub mod weights;

pub use error::{JudgmentError, ProviderError};
pub use judgment::Judgment;
pub use model::{Dimension, Question, QuestionBank, Submission};
pub use results::EvaluationResult;
pub use scorer::Scorer;
pub use traits::Assessor;
pub use weights::{select_weights, WeightSet};
