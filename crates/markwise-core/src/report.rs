//! Batch report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::EvaluationResult;
use crate::statistics::BatchSummary;
use crate::traits::TokenUsage;

/// A complete batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Name of the assessor backend.
    pub assessor: String,
    /// Successfully graded submissions.
    pub graded: Vec<GradedSubmission>,
    /// Submissions that could not be graded.
    pub failures: Vec<FailedSubmission>,
    /// Aggregate statistics.
    pub summary: BatchSummary,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// One graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub submission_id: String,
    pub result: EvaluationResult,
    /// Whether the assessor output was unusable and the neutral judgment
    /// was scored instead.
    pub used_fallback: bool,
    pub model: String,
    pub token_usage: TokenUsage,
    pub latency_ms: u64,
}

/// A submission that produced no result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedSubmission {
    pub submission_id: String,
    pub question_id: String,
    pub error: String,
}

impl BatchReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
