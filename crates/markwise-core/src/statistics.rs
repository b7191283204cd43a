//! Aggregate statistics over a batch of graded submissions.

use serde::{Deserialize, Serialize};

use crate::model::Dimension;
use crate::report::GradedSubmission;
use crate::results::EvaluationResult;
use crate::scorer::round_to;

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub submitted: usize,
    pub graded: usize,
    pub failed: usize,
    /// Graded submissions that were scored with the fallback judgment.
    pub fallback_count: usize,
    /// Mean percentage over graded submissions, rounded to 1 decimal.
    pub mean_percentage: f64,
    /// Mean raw score (0-100) per dimension, rounded to 1 decimal.
    pub mean_dimension_scores: DimensionMeans,
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionMeans {
    pub intent: f64,
    pub vocabulary: f64,
    pub spelling: f64,
    pub grammar: f64,
}

/// Raw 0-100 score of a dimension as reported in a result.
pub fn dimension_score(result: &EvaluationResult, dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Intent => result.intent_analysis.intent_match_score,
        Dimension::Vocabulary => result.vocabulary_analysis.vocabulary_score,
        Dimension::Spelling => result.spelling_analysis.spelling_score,
        Dimension::Grammar => result.grammar_analysis.grammar_score,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, 1)
    }
}

/// Compute the summary for a finished batch.
pub fn summarize(submitted: usize, graded: &[GradedSubmission], failed: usize) -> BatchSummary {
    let dim_mean = |d: Dimension| mean(graded.iter().map(|g| dimension_score(&g.result, d)));

    BatchSummary {
        submitted,
        graded: graded.len(),
        failed,
        fallback_count: graded.iter().filter(|g| g.used_fallback).count(),
        mean_percentage: mean(graded.iter().map(|g| g.result.percentage)),
        mean_dimension_scores: DimensionMeans {
            intent: dim_mean(Dimension::Intent),
            vocabulary: dim_mean(Dimension::Vocabulary),
            spelling: dim_mean(Dimension::Spelling),
            grammar: dim_mean(Dimension::Grammar),
        },
        total_tokens: graded
            .iter()
            .map(|g| u64::from(g.token_usage.total_tokens))
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgment::{fallback_judgment, parse_raw_judgment};
    use crate::model::Question;
    use crate::scorer::score_judgment;
    use crate::traits::TokenUsage;

    fn graded(scores: [u32; 4], used_fallback: bool, tokens: u32) -> GradedSubmission {
        let judgment = if used_fallback {
            fallback_judgment().clone()
        } else {
            let text = format!(
                r#"{{"intent": {{"score": {}}}, "vocabulary": {{"score": {}}}, "spelling": {{"score": {}}}, "grammar": {{"score": {}}}}}"#,
                scores[0], scores[1], scores[2], scores[3]
            );
            parse_raw_judgment(&text).unwrap().into_judgment()
        };
        GradedSubmission {
            submission_id: "s".into(),
            result: score_judgment(&Question::new("Q", "q", "a"), &judgment),
            used_fallback,
            model: "m".into(),
            token_usage: TokenUsage {
                prompt_tokens: 0,
                completion_tokens: 0,
                total_tokens: tokens,
            },
            latency_ms: 0,
        }
    }

    #[test]
    fn empty_batch() {
        let summary = summarize(0, &[], 0);
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn means_over_graded_submissions() {
        let items = vec![
            graded([100, 100, 100, 100], false, 20),
            graded([0, 0, 0, 0], true, 30),
        ];
        let summary = summarize(3, &items, 1);
        assert_eq!(summary.submitted, 3);
        assert_eq!(summary.graded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.fallback_count, 1);
        // Fallback scores 50 everywhere.
        assert_eq!(summary.mean_percentage, 75.0);
        assert_eq!(summary.mean_dimension_scores.intent, 75.0);
        assert_eq!(summary.mean_dimension_scores.grammar, 75.0);
        assert_eq!(summary.total_tokens, 50);
    }
}
