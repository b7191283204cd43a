//! The `markwise evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use markwise_core::parser;
use markwise_core::scorer::Scorer;
use markwise_providers::load_config_from;

pub struct EvaluateArgs {
    pub questions: PathBuf,
    pub question_id: String,
    pub answer: Option<String>,
    pub answer_file: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: EvaluateArgs) -> Result<()> {
    super::check_temperature(args.temperature)?;

    let answer = match (&args.answer, &args.answer_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer from {}", path.display()))?,
        (None, None) => anyhow::bail!("either --answer or --answer-file is required"),
    };

    let bank = parser::load_question_bank(&args.questions)?;
    let question = bank.get(&args.question_id).with_context(|| {
        format!(
            "question '{}' not found in {}",
            args.question_id,
            args.questions.display()
        )
    })?;

    let config = load_config_from(args.config.as_deref())?;
    let assessor = super::build_assessor(
        &config,
        args.provider.as_deref(),
        args.model.as_deref(),
        args.temperature,
    )?;
    let scorer = Scorer::new(assessor);

    let result = scorer.evaluate(question, &answer).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
