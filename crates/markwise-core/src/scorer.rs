//! Weighted scoring of assessor judgments.
//!
//! [`Scorer::evaluate`] makes exactly one assessor call, reads the judgment
//! (falling back to the neutral judgment on unusable output), and turns it
//! into an [`EvaluationResult`]. Everything after the call is pure and lives
//! in [`score_judgment`].

use std::sync::Arc;

use tracing::instrument;

use crate::error::ProviderError;
use crate::feedback::{generate_remarks, generate_suggestions};
use crate::judgment::{read_judgment, Judgment, JudgmentSource};
use crate::model::{Dimension, Question};
use crate::results::{
    EvaluationResult, GrammarAnalysis, IntentAnalysis, PartialScores, SpellingAnalysis,
    VocabularyAnalysis,
};
use crate::traits::{AssessRequest, Assessor, TokenUsage};
use crate::weights::{select_weights, WeightSet};

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Numbers derived from dimension scores, weights and max score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Weighted average on a 0-100 scale.
    pub weighted_average: f64,
    /// Unrounded score. Exceeds `max_score` only for weight sets above 100.
    pub final_score: f64,
    /// Unrounded share of `max_score`.
    pub percentage: f64,
    pub partial_scores: PartialScores,
}

/// Combine the judgment's four scores with a weight set.
///
/// `max_score` must already be positive (see
/// [`Question::effective_max_score`]).
pub fn compute_breakdown(judgment: &Judgment, weights: &WeightSet, max_score: f64) -> ScoreBreakdown {
    let weighted_average = Dimension::ALL
        .iter()
        .map(|d| judgment.score(*d) * weights.get(*d))
        .sum::<f64>()
        / 100.0;

    let final_score = (weighted_average / 100.0) * max_score;

    let partial = |d: Dimension| {
        round_to(
            (judgment.score(d) / 100.0) * (weights.get(d) / 100.0) * max_score,
            2,
        )
    };

    ScoreBreakdown {
        weighted_average,
        final_score,
        percentage: (final_score / max_score) * 100.0,
        partial_scores: PartialScores {
            intent: partial(Dimension::Intent),
            vocabulary: partial(Dimension::Vocabulary),
            spelling: partial(Dimension::Spelling),
            grammar: partial(Dimension::Grammar),
        },
    }
}

/// Score a judgment for a question. Pure; never fails.
pub fn score_judgment(question: &Question, judgment: &Judgment) -> EvaluationResult {
    let max_score = question.effective_max_score();
    let weights = select_weights(&question.difficulty, &question.context);
    if (weights.total() - 100.0).abs() > f64::EPSILON {
        tracing::debug!(total = weights.total(), "weight set does not sum to 100");
    }
    tracing::debug!(?weights, difficulty = %question.difficulty, "selected weights");

    let breakdown = compute_breakdown(judgment, &weights, max_score);
    let final_score = round_to(breakdown.final_score, 2);

    EvaluationResult {
        question_id: question.question_id.clone(),
        final_score,
        max_score,
        percentage: round_to(final_score / max_score * 100.0, 1),
        partial_scores: breakdown.partial_scores,
        intent_analysis: IntentAnalysis::from(judgment),
        vocabulary_analysis: VocabularyAnalysis::from(judgment),
        spelling_analysis: SpellingAnalysis::from(judgment),
        grammar_analysis: GrammarAnalysis::from(judgment),
        remarks: generate_remarks(breakdown.percentage, judgment),
        suggestions: generate_suggestions(judgment),
    }
}

/// An evaluation together with what the assessor call cost.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub result: EvaluationResult,
    pub source: JudgmentSource,
    pub model: String,
    pub token_usage: TokenUsage,
    pub latency_ms: u64,
}

/// Scores student answers through a shared assessor.
///
/// Holds no per-call state, so one scorer can serve concurrent evaluations.
#[derive(Clone)]
pub struct Scorer {
    assessor: Arc<dyn Assessor>,
}

impl Scorer {
    pub fn new(assessor: Arc<dyn Assessor>) -> Self {
        Self { assessor }
    }

    /// Name of the underlying assessor.
    pub fn assessor_name(&self) -> &str {
        self.assessor.name()
    }

    /// Evaluate one answer. Only assessor failures are returned as errors.
    pub async fn evaluate(
        &self,
        question: &Question,
        student_answer: &str,
    ) -> Result<EvaluationResult, ProviderError> {
        Ok(self.evaluate_detailed(question, student_answer).await?.result)
    }

    /// Like [`Scorer::evaluate`], also reporting call metadata and whether
    /// the fallback judgment was used.
    #[instrument(skip(self, question, student_answer), fields(question_id = %question.question_id))]
    pub async fn evaluate_detailed(
        &self,
        question: &Question,
        student_answer: &str,
    ) -> Result<Evaluation, ProviderError> {
        let request = AssessRequest::for_question(question, student_answer);
        let response = self.assessor.judge(&request).await?;

        let read = read_judgment(&response.content);
        if let Some(reason) = &read.error {
            tracing::warn!(
                assessor = self.assessor.name(),
                "unusable judgment, using fallback: {reason}"
            );
        }

        Ok(Evaluation {
            result: score_judgment(question, &read.judgment),
            source: read.source,
            model: response.model,
            token_usage: response.token_usage,
            latency_ms: response.latency_ms,
        })
    }
}
