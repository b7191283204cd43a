//! The `markwise validate` command.

use std::path::PathBuf;

use anyhow::Result;

use markwise_core::parser;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let bank = parser::load_question_bank(&questions_path)?;
    println!(
        "Question bank: {} ({} questions)",
        questions_path.display(),
        bank.len()
    );

    let warnings = parser::validate_question_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
