//! markwise CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "markwise",
    version,
    about = "Weighted LLM grading of free-text answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one answer and print the result as JSON
    Evaluate {
        /// Question bank file (.json or .toml)
        #[arg(long)]
        questions: PathBuf,

        /// Question to grade against
        #[arg(long)]
        question_id: String,

        /// Student answer text
        #[arg(long, conflicts_with = "answer_file", required_unless_present = "answer_file")]
        answer: Option<String>,

        /// Read the student answer from a file
        #[arg(long)]
        answer_file: Option<PathBuf>,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a file of submissions
    Batch {
        /// Question bank file (.json or .toml)
        #[arg(long)]
        questions: PathBuf,

        /// Submissions JSON file
        #[arg(long)]
        submissions: PathBuf,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f64>,

        /// Max concurrent assessor calls
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question bank
    Validate {
        /// Question bank file (.json or .toml)
        #[arg(long)]
        questions: PathBuf,
    },

    /// Show the weights a question would be scored with
    Weights {
        /// Difficulty label (Easy, Medium, Hard)
        #[arg(long)]
        difficulty: String,

        /// Question context
        #[arg(long, default_value = "")]
        context: String,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("markwise=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            questions,
            question_id,
            answer,
            answer_file,
            provider,
            model,
            temperature,
            config,
        } => {
            commands::evaluate::execute(commands::evaluate::EvaluateArgs {
                questions,
                question_id,
                answer,
                answer_file,
                provider,
                model,
                temperature,
                config,
            })
            .await
        }
        Commands::Batch {
            questions,
            submissions,
            provider,
            model,
            temperature,
            parallelism,
            output,
            config,
        } => {
            commands::batch::execute(commands::batch::BatchArgs {
                questions,
                submissions,
                provider,
                model,
                temperature,
                parallelism,
                output,
                config,
            })
            .await
        }
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Weights {
            difficulty,
            context,
        } => commands::weights::execute(&difficulty, &context),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
