//! The `markwise batch` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use markwise_core::engine::{BatchConfig, BatchEngine, ProgressReporter};
use markwise_core::parser;
use markwise_core::report::{BatchReport, GradedSubmission};
use markwise_core::scorer::Scorer;
use markwise_providers::load_config_from;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_submission_start(&self, submission_id: &str, question_id: &str) {
        eprintln!("  Grading: {submission_id} :: {question_id}");
    }

    fn on_submission_graded(&self, graded: &GradedSubmission) {
        let fallback = if graded.used_fallback { " (fallback)" } else { "" };
        eprintln!(
            "  Done: {} :: {} {}/{} ({:.1}%){} ({}ms)",
            graded.submission_id,
            graded.result.question_id,
            graded.result.final_score,
            graded.result.max_score,
            graded.result.percentage,
            fallback,
            graded.latency_ms,
        );
    }

    fn on_submission_failed(&self, submission_id: &str, question_id: &str, error: &str) {
        eprintln!("  ERROR: {submission_id} :: {question_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded}/{total} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub struct BatchArgs {
    pub questions: PathBuf,
    pub submissions: PathBuf,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub parallelism: Option<usize>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: BatchArgs) -> Result<()> {
    super::check_temperature(args.temperature)?;

    let config = load_config_from(args.config.as_deref())?;
    let parallelism = args.parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());

    let bank = parser::load_question_bank(&args.questions)?;
    let submissions = parser::load_submissions(&args.submissions)?;

    let assessor = super::build_assessor(
        &config,
        args.provider.as_deref(),
        args.model.as_deref(),
        args.temperature,
    )?;
    let engine = BatchEngine::new(
        Arc::new(Scorer::new(assessor)),
        BatchConfig { parallelism },
    );

    eprintln!(
        "markwise v{} — Grading {} submissions against {} questions",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        bank.len()
    );
    eprintln!();

    let report = engine.run(&bank, &submissions, &ConsoleReporter).await?;

    print_summary(&report);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &BatchReport) {
    use comfy_table::{Cell, Table};

    let summary = &report.summary;
    let means = &summary.mean_dimension_scores;

    let mut table = Table::new();
    table.set_header(vec![
        "Assessor",
        "Graded",
        "Failed",
        "Fallback",
        "Mean %",
        "Intent",
        "Vocabulary",
        "Spelling",
        "Grammar",
        "Tokens",
    ]);
    table.add_row(vec![
        Cell::new(&report.assessor),
        Cell::new(format!("{}/{}", summary.graded, summary.submitted)),
        Cell::new(summary.failed),
        Cell::new(summary.fallback_count),
        Cell::new(format!("{:.1}%", summary.mean_percentage)),
        Cell::new(format!("{:.1}", means.intent)),
        Cell::new(format!("{:.1}", means.vocabulary)),
        Cell::new(format!("{:.1}", means.spelling)),
        Cell::new(format!("{:.1}", means.grammar)),
        Cell::new(summary.total_tokens),
    ]);

    eprintln!("\n{table}");
}
