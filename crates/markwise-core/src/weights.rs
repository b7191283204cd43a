//! Dimension weight selection.
//!
//! Weights start from a base set, are replaced by a difficulty preset, and
//! then by a context rule. Context rules apply after difficulty and only the
//! first matching rule is used.

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Dimension};

/// Percentage weights for the four dimensions.
///
/// Presets sum to 100 or more; the spelling and grammar context rules raise
/// two weights without lowering the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub intent: f64,
    pub vocabulary: f64,
    pub spelling: f64,
    pub grammar: f64,
}

impl WeightSet {
    pub const fn new(intent: f64, vocabulary: f64, spelling: f64, grammar: f64) -> Self {
        Self {
            intent,
            vocabulary,
            spelling,
            grammar,
        }
    }

    /// Weight of a single dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Intent => self.intent,
            Dimension::Vocabulary => self.vocabulary,
            Dimension::Spelling => self.spelling,
            Dimension::Grammar => self.grammar,
        }
    }

    /// Sum of all four weights.
    pub fn total(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        BASE_WEIGHTS
    }
}

pub const BASE_WEIGHTS: WeightSet = WeightSet::new(40.0, 25.0, 15.0, 20.0);
pub const EASY_WEIGHTS: WeightSet = WeightSet::new(35.0, 20.0, 20.0, 25.0);
pub const HARD_WEIGHTS: WeightSet = WeightSet::new(50.0, 25.0, 10.0, 15.0);
pub const COMPREHENSION_WEIGHTS: WeightSet = WeightSet::new(50.0, 25.0, 10.0, 15.0);

/// The emphasis a question's context string asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextFocus {
    /// Context mentions "comprehension" or "reading".
    Comprehension,
    /// Context mentions "spelling".
    Spelling,
    /// Context mentions "grammar".
    Grammar,
    /// No rule matched.
    General,
}

impl ContextFocus {
    /// Detect the focus by case-insensitive substring match, checking
    /// comprehension/reading, then spelling, then grammar.
    pub fn detect(context: &str) -> ContextFocus {
        let context = context.to_lowercase();
        if context.contains("comprehension") || context.contains("reading") {
            ContextFocus::Comprehension
        } else if context.contains("spelling") {
            ContextFocus::Spelling
        } else if context.contains("grammar") {
            ContextFocus::Grammar
        } else {
            ContextFocus::General
        }
    }
}

/// Select the weight set for a question's difficulty label and context.
pub fn select_weights(difficulty: &str, context: &str) -> WeightSet {
    let mut weights = match Difficulty::from_label(difficulty) {
        Some(Difficulty::Easy) => EASY_WEIGHTS,
        Some(Difficulty::Hard) => HARD_WEIGHTS,
        Some(Difficulty::Medium) | None => BASE_WEIGHTS,
    };

    match ContextFocus::detect(context) {
        ContextFocus::Comprehension => weights = COMPREHENSION_WEIGHTS,
        ContextFocus::Spelling => {
            weights.spelling = 35.0;
            weights.intent = 30.0;
        }
        ContextFocus::Grammar => {
            weights.grammar = 35.0;
            weights.intent = 30.0;
        }
        ContextFocus::General => {}
    }

    weights
}
