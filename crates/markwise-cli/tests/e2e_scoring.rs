//! End-to-end scoring through the mock assessor.
//!
//! These tests drive `Scorer` and `BatchEngine` the way the CLI does, with
//! scripted judgment text standing in for a live model.

use std::collections::HashMap;
use std::sync::Arc;

use markwise_core::engine::{BatchConfig, BatchEngine, NoopReporter};
use markwise_core::judgment::JudgmentSource;
use markwise_core::model::{Question, QuestionBank, Submission};
use markwise_core::scorer::Scorer;
use markwise_core::ProviderError;
use markwise_providers::MockAssessor;

fn judgment(intent: u32, vocabulary: u32, spelling: u32, grammar: u32) -> String {
    format!(
        r#"```json
{{
  "intent": {{"score": {intent}, "understood": true, "concepts_right": ["bat"], "concepts_missed": [], "note": "ok"}},
  "vocabulary": {{"score": {vocabulary}, "improve": [], "note": "ok"}},
  "spelling": {{"score": {spelling}, "errors": [], "phonetic_tries": [], "note": "ok"}},
  "grammar": {{"score": {grammar}, "errors": [], "strengths": [], "note": "ok"}}
}}
```"#
    )
}

fn scorer_with(mock: Arc<MockAssessor>) -> Scorer {
    Scorer::new(mock)
}

#[tokio::test]
async fn medium_question_worked_example() {
    let mock = Arc::new(MockAssessor::with_fixed_response(&judgment(80, 70, 60, 90)));
    let scorer = scorer_with(Arc::clone(&mock));
    let question = Question::new("Q1", "Name a mammal that can fly.", "A bat").with_max_score(10.0);

    let result = scorer.evaluate(&question, "a bat can fly").await.unwrap();

    assert_eq!(result.final_score, 7.65);
    assert_eq!(result.percentage, 76.5);
    assert_eq!(result.max_score, 10.0);
    assert_eq!(result.partial_scores.intent, 3.2);
    assert_eq!(result.partial_scores.vocabulary, 1.75);
    assert_eq!(result.partial_scores.spelling, 0.9);
    assert_eq!(result.partial_scores.grammar, 1.8);
    assert_eq!(result.remarks, "Great job! You understood the main idea.");
    assert_eq!(result.suggestions, "Keep up the good work!");
    assert_eq!(result.intent_analysis.key_concepts_identified, vec!["bat"]);

    assert_eq!(mock.call_count(), 1);
    let request = mock.last_request().unwrap();
    assert_eq!(request.reference_answer, "A bat");
    assert_eq!(request.student_answer, "a bat can fly");
}

#[tokio::test]
async fn malformed_output_scores_neutral() {
    let mock = Arc::new(MockAssessor::with_fixed_response("I think the child did well."));
    let scorer = scorer_with(mock);
    let question = Question::new("Q2", "q", "a").with_max_score(4.0);

    let evaluation = scorer.evaluate_detailed(&question, "answer").await.unwrap();
    let result = evaluation.result;

    assert_eq!(result.intent_analysis.intent_match_score, 50.0);
    assert_eq!(result.vocabulary_analysis.vocabulary_score, 50.0);
    assert_eq!(result.spelling_analysis.spelling_score, 50.0);
    assert_eq!(result.grammar_analysis.grammar_score, 50.0);
    assert_eq!(result.grammar_analysis.reasoning, "Parse error");
    assert_eq!(result.final_score, 2.0);
    assert_eq!(result.percentage, 50.0);
}

#[tokio::test]
async fn absent_dimension_scores_zero_without_fallback() {
    let mock = Arc::new(MockAssessor::with_fixed_response(
        r#"{"intent": {"score": 90, "understood": true}, "vocabulary": {"score": 80}, "spelling": {"score": 70}}"#,
    ));
    let scorer = scorer_with(mock);
    let question = Question::new("Q5", "q", "a").with_max_score(10.0);

    let evaluation = scorer.evaluate_detailed(&question, "answer").await.unwrap();
    assert_eq!(evaluation.source, JudgmentSource::Parsed);

    let result = evaluation.result;
    assert_eq!(result.intent_analysis.intent_match_score, 90.0);
    assert_eq!(result.grammar_analysis.grammar_score, 0.0);
    assert_eq!(result.grammar_analysis.reasoning, "");
    assert_eq!(result.final_score, 6.65);
    assert_eq!(result.percentage, 66.5);
}

#[tokio::test]
async fn zero_max_score_is_treated_as_one() {
    let mock = Arc::new(MockAssessor::with_fixed_response(&judgment(100, 100, 100, 100)));
    let scorer = scorer_with(mock);
    let question = Question::new("Q3", "q", "a").with_max_score(0.0);

    let result = scorer.evaluate(&question, "answer").await.unwrap();
    assert_eq!(result.max_score, 1.0);
    assert_eq!(result.final_score, 1.0);
    assert_eq!(result.percentage, 100.0);
}

#[tokio::test]
async fn provider_failure_propagates() {
    let mock = Arc::new(MockAssessor::failing(|| {
        ProviderError::AuthenticationFailed("invalid key".into())
    }));
    let scorer = scorer_with(mock);
    let question = Question::new("Q4", "q", "a");

    let err = scorer.evaluate(&question, "answer").await.unwrap_err();
    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    assert!(err.is_permanent());
}

#[tokio::test]
async fn batch_mixes_parsed_fallback_and_unknown_questions() {
    let mut responses = HashMap::new();
    responses.insert("bat".to_string(), judgment(100, 100, 100, 100));
    responses.insert("mumble".to_string(), "{\"intent\": 3}".to_string());
    let mock = Arc::new(MockAssessor::new(responses));

    let bank = QuestionBank::new(vec![
        Question::new("Q1", "Name a mammal that can fly.", "A bat").with_max_score(10.0),
        Question::new("Q2", "Spell 'cat'.", "cat")
            .with_context("spelling practice")
            .with_difficulty("easy")
            .with_max_score(5.0),
    ]);
    let submissions = vec![
        Submission {
            submission_id: Some("s1".into()),
            question_id: "Q1".into(),
            answer: "a bat".into(),
        },
        Submission {
            submission_id: Some("s2".into()),
            question_id: "Q2".into(),
            answer: "mumble".into(),
        },
        Submission {
            submission_id: None,
            question_id: "Q9".into(),
            answer: "bat".into(),
        },
    ];

    let engine = BatchEngine::new(
        Arc::new(Scorer::new(Arc::clone(&mock) as Arc<dyn markwise_core::Assessor>)),
        BatchConfig { parallelism: 2 },
    );
    let report = engine.run(&bank, &submissions, &NoopReporter).await.unwrap();

    assert_eq!(report.assessor, "mock");
    assert_eq!(report.summary.submitted, 3);
    assert_eq!(report.summary.graded, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.fallback_count, 1);
    assert_eq!(report.failures[0].submission_id, "#3");
    assert_eq!(report.failures[0].error, "unknown question_id 'Q9'");
    // Unknown questions never reach the assessor.
    assert_eq!(mock.call_count(), 2);

    let s1 = report.graded.iter().find(|g| g.submission_id == "s1").unwrap();
    assert!(!s1.used_fallback);
    assert_eq!(s1.result.final_score, 10.0);

    // Easy spelling weights are 30/20/35/25, so the neutral judgment lands at 55%.
    let s2 = report.graded.iter().find(|g| g.submission_id == "s2").unwrap();
    assert!(s2.used_fallback);
    assert_eq!(s2.result.percentage, 55.0);
    assert_eq!(s2.result.final_score, 2.75);
}

#[tokio::test]
async fn batch_report_round_trips_through_disk() {
    let mock = Arc::new(MockAssessor::with_fixed_response(&judgment(60, 60, 60, 60)));
    let bank = QuestionBank::new(vec![Question::new("Q1", "q", "a")]);
    let submissions = vec![Submission {
        submission_id: Some("only".into()),
        question_id: "Q1".into(),
        answer: "x".into(),
    }];

    let engine = BatchEngine::new(Arc::new(Scorer::new(mock)), BatchConfig::default());
    let report = engine.run(&bank, &submissions, &NoopReporter).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();

    let loaded = markwise_core::report::BatchReport::load_json(&path).unwrap();
    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.summary.mean_percentage, 60.0);
    assert_eq!(loaded.graded[0].result.remarks, "Good effort! You understood the main idea.");
}
