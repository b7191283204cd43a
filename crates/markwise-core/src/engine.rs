//! Batch evaluation engine.
//!
//! Grades many submissions concurrently through one shared [`Scorer`].
//! Each submission is a single assessor call; failures are recorded in the
//! report and never retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::judgment::JudgmentSource;
use crate::model::{QuestionBank, Submission};
use crate::report::{BatchReport, FailedSubmission, GradedSubmission};
use crate::scorer::Scorer;
use crate::statistics::summarize;

/// Configuration for the batch engine.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum concurrent assessor calls.
    pub parallelism: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_submission_start(&self, submission_id: &str, question_id: &str);
    fn on_submission_graded(&self, graded: &GradedSubmission);
    fn on_submission_failed(&self, submission_id: &str, question_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_submission_start(&self, _: &str, _: &str) {}
    fn on_submission_graded(&self, _: &GradedSubmission) {}
    fn on_submission_failed(&self, _: &str, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Grades a batch of submissions against a question bank.
pub struct BatchEngine {
    scorer: Arc<Scorer>,
    config: BatchConfig,
}

impl BatchEngine {
    pub fn new(scorer: Arc<Scorer>, config: BatchConfig) -> Self {
        Self { scorer, config }
    }

    /// Grade every submission. Individual failures end up in the report.
    pub async fn run(
        &self,
        bank: &QuestionBank,
        submissions: &[Submission],
        progress: &dyn ProgressReporter,
    ) -> Result<BatchReport> {
        anyhow::ensure!(self.config.parallelism >= 1, "parallelism must be at least 1");

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism));

        let mut failures = Vec::new();
        let mut futures = FuturesUnordered::new();

        for (index, submission) in submissions.iter().enumerate() {
            let submission_id = submission
                .submission_id
                .clone()
                .unwrap_or_else(|| format!("#{}", index + 1));

            let Some(question) = bank.get(&submission.question_id).cloned() else {
                let error = format!("unknown question_id '{}'", submission.question_id);
                tracing::warn!("skipping submission {submission_id}: {error}");
                progress.on_submission_failed(&submission_id, &submission.question_id, &error);
                failures.push(FailedSubmission {
                    submission_id,
                    question_id: submission.question_id.clone(),
                    error,
                });
                continue;
            };

            let scorer = Arc::clone(&self.scorer);
            let semaphore = Arc::clone(&semaphore);
            let answer = submission.answer.clone();

            futures.push(async move {
                let outcome = async {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_submission_start(&submission_id, &question.question_id);
                    let evaluation = scorer.evaluate_detailed(&question, &answer).await?;
                    anyhow::Ok(evaluation)
                }
                .await;
                (submission_id, question.question_id, outcome)
            });
        }

        let mut graded = Vec::new();
        let total = submissions.len();

        while let Some((submission_id, question_id, outcome)) = futures.next().await {
            match outcome {
                Ok(evaluation) => {
                    let entry = GradedSubmission {
                        submission_id,
                        used_fallback: evaluation.source == JudgmentSource::Fallback,
                        model: evaluation.model,
                        token_usage: evaluation.token_usage,
                        latency_ms: evaluation.latency_ms,
                        result: evaluation.result,
                    };
                    progress.on_submission_graded(&entry);
                    graded.push(entry);
                }
                Err(e) => {
                    tracing::error!("evaluation failed for {submission_id}/{question_id}: {e:#}");
                    progress.on_submission_failed(&submission_id, &question_id, &e.to_string());
                    failures.push(FailedSubmission {
                        submission_id,
                        question_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, graded.len(), failures.len(), elapsed);

        let summary = summarize(total, &graded, failures.len());

        Ok(BatchReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            assessor: self.scorer.assessor_name().to_string(),
            graded,
            failures,
            summary,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::error::ProviderError;
    use crate::model::Question;
    use crate::traits::{AssessRequest, AssessResponse, Assessor, TokenUsage};

    /// Answers containing "fail" get a provider error; "garbled" gets
    /// unparseable text; everything else scores 100 on every dimension.
    struct ScriptedAssessor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Assessor for ScriptedAssessor {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn judge(&self, request: &AssessRequest) -> Result<AssessResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.student_answer.contains("fail") {
                return Err(ProviderError::Timeout(1));
            }
            let content = if request.student_answer.contains("garbled") {
                "???".to_string()
            } else {
                r#"{"intent": {"score": 100}, "vocabulary": {"score": 100}, "spelling": {"score": 100}, "grammar": {"score": 100}}"#.to_string()
            };
            Ok(AssessResponse {
                content,
                model: "scripted-1".into(),
                token_usage: TokenUsage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                },
                latency_ms: 2,
            })
        }
    }

    fn submission(id: &str, question_id: &str, answer: &str) -> Submission {
        Submission {
            submission_id: Some(id.into()),
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }

    #[tokio::test]
    async fn batch_collects_results_and_failures() {
        let assessor = Arc::new(ScriptedAssessor {
            calls: AtomicUsize::new(0),
        });
        let scorer = Arc::new(Scorer::new(assessor.clone()));
        let engine = BatchEngine::new(scorer, BatchConfig { parallelism: 2 });

        let bank = QuestionBank::new(vec![
            Question::new("Q1", "q", "a").with_max_score(4.0),
            Question::new("Q2", "q", "a"),
        ]);
        let submissions = vec![
            submission("s1", "Q1", "good answer"),
            submission("s2", "Q2", "garbled"),
            submission("s3", "Q1", "please fail"),
            submission("s4", "Q9", "no such question"),
        ];

        let report = engine
            .run(&bank, &submissions, &NoopReporter)
            .await
            .unwrap();

        assert_eq!(assessor.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.assessor, "scripted");
        assert_eq!(report.graded.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.summary.submitted, 4);
        assert_eq!(report.summary.fallback_count, 1);
        assert_eq!(report.summary.total_tokens, 30);

        let s1 = report
            .graded
            .iter()
            .find(|g| g.submission_id == "s1")
            .unwrap();
        assert_eq!(s1.result.final_score, 4.0);
        assert!(!s1.used_fallback);

        assert!(report
            .failures
            .iter()
            .any(|f| f.submission_id == "s4" && f.error.contains("unknown question_id")));
        assert!(report
            .failures
            .iter()
            .any(|f| f.submission_id == "s3" && f.error.contains("timed out")));
    }

    #[tokio::test]
    async fn submissions_without_ids_are_numbered() {
        let assessor = Arc::new(ScriptedAssessor {
            calls: AtomicUsize::new(0),
        });
        let engine = BatchEngine::new(Arc::new(Scorer::new(assessor)), BatchConfig::default());
        let bank = QuestionBank::new(vec![Question::new("Q1", "q", "a")]);
        let submissions = vec![Submission {
            submission_id: None,
            question_id: "Q1".into(),
            answer: "ok".into(),
        }];

        let report = engine
            .run(&bank, &submissions, &NoopReporter)
            .await
            .unwrap();
        assert_eq!(report.graded[0].submission_id, "#1");
    }

    #[tokio::test]
    async fn zero_parallelism_is_rejected() {
        let assessor = Arc::new(ScriptedAssessor {
            calls: AtomicUsize::new(0),
        });
        let engine = BatchEngine::new(
            Arc::new(Scorer::new(assessor)),
            BatchConfig { parallelism: 0 },
        );
        let result = engine
            .run(&QuestionBank::default(), &[], &NoopReporter)
            .await;
        assert!(result.is_err());
    }
}
