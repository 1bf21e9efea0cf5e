//! The `quizbench run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizbench_core::collector::{AnswerCollector, ProgressReporter};
use quizbench_core::error::ProviderError;
use quizbench_core::parser;
use quizbench_providers::config::load_config_from;
use quizbench_providers::create_provider;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_start(&self, total: usize) {
        eprintln!("Total Questions: {total}");
    }

    fn on_section(&self, section_name: &str, first: bool) {
        if first {
            eprintln!("SECTION: {section_name}");
        } else {
            eprintln!("NEXT SECTION: {section_name}");
        }
    }

    fn on_question_complete(&self, completed: usize, total: usize) {
        eprintln!("Processed Question {completed} / {total}");
    }

    fn on_question_error(&self, section_name: &str, question: &str, error: &ProviderError) {
        let kind = if error.is_response_shape() {
            "unexpected response format"
        } else {
            "request failed"
        };
        eprintln!("  WARNING: {kind} for [{section_name}] {question:?}: {error} (recording empty reply)");
    }
}

pub async fn execute(
    model: String,
    input: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!model.trim().is_empty(), "model identifier must not be empty");

    let config = load_config_from(config_path.as_deref())?;
    let provider = create_provider(&config.provider)?;

    let sections = match parser::parse_question_file(&input) {
        Ok(sections) => sections,
        Err(e) => {
            tracing::error!("error parsing questions file: {e}");
            Vec::new()
        }
    };
    anyhow::ensure!(
        !sections.is_empty(),
        "no sections found in {}, exiting without writing output",
        input.display()
    );

    for w in parser::validate_sections(&sections) {
        tracing::warn!("[{}] {}", w.section, w.message);
    }

    tracing::info!(
        provider = provider.name(),
        model = %model,
        sections = sections.len(),
        "starting run"
    );

    let collector = AnswerCollector::new(
        Arc::from(provider),
        config.provider.collector_config(&model),
    );
    let document = collector.collect(sections, &ConsoleReporter).await;

    document
        .write_new(&output)
        .context("failed to write results to file")?;
    println!("Results saved to {}", output.display());

    Ok(())
}
