//! quizbench CLI — run quizzes against LLMs, grade the replies, chart the scores.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizbench", version, about = "LLM quiz runner, scorer and grading editor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send every question in a quiz file to a model and save the replies
    Run {
        /// Model identifier (e.g. "provider/model-v1.4")
        #[arg(long)]
        model: String,

        /// Path to the question .txt file
        #[arg(long)]
        input: PathBuf,

        /// Path to the output JSON file
        #[arg(long)]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score graded result files and plot a per-section comparison chart
    Score {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Interactively mark replies in a result file as correct or incorrect
    Edit {
        /// Path to the JSON result file to edit
        filepath: PathBuf,
    },

    /// Check a question file for structural problems
    Validate {
        /// Path to the question .txt file
        #[arg(long)]
        input: PathBuf,
    },

    /// Create a starter config and example question file
    Init,
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["quizbench=info", "quizbench_core=info", "quizbench_providers=info"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            model,
            input,
            output,
            config,
        } => commands::run::execute(model, input, output, config).await,
        Commands::Score { config } => commands::score::execute(config),
        Commands::Edit { filepath } => commands::edit::execute(filepath),
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
