//! The `markwise init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("markwise.toml").exists() {
        println!("markwise.toml already exists, skipping.");
    } else {
        std::fs::write("markwise.toml", SAMPLE_CONFIG)?;
        println!("Created markwise.toml");
    }

    std::fs::create_dir_all("questions")?;
    let example_path = Path::new("questions/example.json");
    if example_path.exists() {
        println!("questions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTIONS)?;
        println!("Created questions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Set OPENAI_API_KEY or edit markwise.toml");
    println!("  2. Run: markwise validate --questions questions/example.json");
    println!(
        "  3. Run: markwise evaluate --questions questions/example.json --question-id 1 --answer \"plants need sun and watter\""
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# markwise configuration

default_provider = "openai"
default_model = "gpt-5-mini"
default_temperature = 0.2
max_tokens = 1500
parallelism = 4
output_dir = "./markwise-results"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"
"#;

const EXAMPLE_QUESTIONS: &str = r#"{
  "questions": [
    {
      "question_id": 1,
      "question_text": "What do plants need to grow?",
      "correct_answer": { "option_text": "Plants need sunlight, water and soil to grow." },
      "context": "Science",
      "difficulty": "Easy",
      "max_score": 10
    },
    {
      "question_id": 2,
      "question_text": "Why did the fox in the story go back to the forest?",
      "correct_answer": { "option_text": "Because he missed his family and his home." },
      "context": "Reading comprehension",
      "difficulty": "Medium",
      "max_score": 10
    },
    {
      "question_id": 3,
      "question_text": "Write a sentence using the word 'because'.",
      "correct_answer": { "option_text": "I wore my coat because it was cold outside." },
      "context": "Grammar practice",
      "difficulty": "Hard",
      "max_score": 5
    }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_questions_parse_cleanly() {
        let bank = markwise_core::parser::parse_question_bank_json(
            EXAMPLE_QUESTIONS,
            Path::new("questions/example.json"),
        )
        .unwrap();
        assert_eq!(bank.len(), 3);
        assert!(markwise_core::parser::validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn sample_config_parses() {
        let config = markwise_providers::config::parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.default_model, "gpt-5-mini");
    }
}
