//! Evaluation result types.
//!
//! These are the presentation shapes handed back to callers; the judgment's
//! dimension records are renamed into `*_analysis` blocks here.

use serde::{Deserialize, Serialize};

use crate::judgment::{GrammarError, Judgment, SpellingError};
use crate::model::Dimension;

/// Complete assessment of one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub question_id: String,
    /// Weighted score scaled to `max_score`, rounded to 2 decimals.
    pub final_score: f64,
    pub max_score: f64,
    /// `final_score` as a share of `max_score`, rounded to 1 decimal.
    pub percentage: f64,
    pub partial_scores: PartialScores,
    pub intent_analysis: IntentAnalysis,
    pub vocabulary_analysis: VocabularyAnalysis,
    pub spelling_analysis: SpellingAnalysis,
    pub grammar_analysis: GrammarAnalysis,
    pub remarks: String,
    pub suggestions: String,
}

/// Portion of `max_score` attributed to each dimension, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialScores {
    pub intent: f64,
    pub vocabulary: f64,
    pub spelling: f64,
    pub grammar: f64,
}

impl PartialScores {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Intent => self.intent,
            Dimension::Vocabulary => self.vocabulary,
            Dimension::Spelling => self.spelling,
            Dimension::Grammar => self.grammar,
        }
    }

    pub fn total(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub intent_match_score: f64,
    pub understood_concept: bool,
    pub key_concepts_identified: Vec<String>,
    pub key_concepts_missed: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyAnalysis {
    pub vocabulary_score: f64,
    pub appropriate_words: Vec<String>,
    pub suggested_improvements: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellingAnalysis {
    pub spelling_score: f64,
    pub misspelled_words: Vec<SpellingError>,
    pub phonetic_attempts: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarAnalysis {
    pub grammar_score: f64,
    pub errors: Vec<GrammarError>,
    pub strengths: Vec<String>,
    pub reasoning: String,
}

impl From<&Judgment> for IntentAnalysis {
    fn from(judgment: &Judgment) -> Self {
        let intent = &judgment.intent;
        Self {
            intent_match_score: intent.score,
            understood_concept: intent.understood,
            key_concepts_identified: intent.concepts_matched.clone(),
            key_concepts_missed: intent.concepts_missed.clone(),
            reasoning: intent.note.clone(),
        }
    }
}

impl From<&Judgment> for VocabularyAnalysis {
    fn from(judgment: &Judgment) -> Self {
        let vocabulary = &judgment.vocabulary;
        Self {
            vocabulary_score: vocabulary.score,
            appropriate_words: vocabulary.good_words.clone(),
            suggested_improvements: vocabulary.improvements.clone(),
            reasoning: vocabulary.note.clone(),
        }
    }
}

impl From<&Judgment> for SpellingAnalysis {
    fn from(judgment: &Judgment) -> Self {
        let spelling = &judgment.spelling;
        Self {
            spelling_score: spelling.score,
            misspelled_words: spelling.errors.clone(),
            phonetic_attempts: spelling.phonetic_attempts.clone(),
            reasoning: spelling.note.clone(),
        }
    }
}

impl From<&Judgment> for GrammarAnalysis {
    fn from(judgment: &Judgment) -> Self {
        let grammar = &judgment.grammar;
        Self {
            grammar_score: grammar.score,
            errors: grammar.errors.clone(),
            strengths: grammar.strengths.clone(),
            reasoning: grammar.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::fallback_judgment;

    #[test]
    fn analyses_rename_judgment_fields() {
        let judgment = fallback_judgment();
        let intent = IntentAnalysis::from(judgment);
        assert_eq!(intent.intent_match_score, 50.0);
        assert!(intent.understood_concept);
        assert_eq!(intent.reasoning, "Parse error");

        let json = serde_json::to_value(SpellingAnalysis::from(judgment)).unwrap();
        assert!(json.get("misspelled_words").is_some());
        assert!(json.get("phonetic_attempts").is_some());
    }

    #[test]
    fn partial_scores_total() {
        let partial = PartialScores {
            intent: 3.2,
            vocabulary: 1.75,
            spelling: 0.9,
            grammar: 1.8,
        };
        assert!((partial.total() - 7.65).abs() < 1e-9);
        assert_eq!(partial.get(Dimension::Spelling), 0.9);
    }
}
