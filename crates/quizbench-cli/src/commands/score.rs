//! The `quizbench score` command.

use std::path::PathBuf;

use anyhow::Result;

use quizbench_core::scoring::{score_directory, ScoringConfig};
use quizbench_providers::config::load_config_from;
use quizbench_report::chart::{write_chart, ChartOptions};
use quizbench_report::table::score_table;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    run(&config.scoring)
}

fn run(config: &ScoringConfig) -> Result<()> {
    let shown_dir =
        std::path::absolute(&config.input_dir).unwrap_or_else(|_| config.input_dir.clone());
    println!("Scanning for JSON files in: {}", shown_dir.display());

    let outcome = score_directory(&config.input_dir)?;

    if outcome.files_found == 0 {
        println!("No JSON files found in the specified folder.");
        return Ok(());
    }
    for (path, reason) in &outcome.skipped {
        println!("Skipped {}: {reason}", path.display());
    }
    if outcome.scoreboard.is_empty() {
        println!("No valid model results were extracted from the JSON files.");
        return Ok(());
    }

    let (order, extras) = outcome.scoreboard.section_order(&config.section_order);
    if !extras.is_empty() {
        println!(
            "Note: Sections not in the configured order found: {}. Adding them to the end of the plot.",
            extras.join(", ")
        );
    }
    if order.is_empty() {
        println!("No sections found across all files to plot.");
        return Ok(());
    }

    let data = outcome.scoreboard.chart_data(&order);
    eprintln!("\n{}", score_table(&data));

    write_chart(&data, &ChartOptions::default(), &config.output_file)?;
    println!("\nPlot saved successfully to: {}", config.output_file.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizbench_core::model::{Grading, QuestionRecord, ResultDocument, Section};

    fn graded(model: &str, name: &str, gradings: &[Grading]) -> ResultDocument {
        let mut section = Section::new(name);
        for g in gradings {
            let mut q = QuestionRecord::new("q", "a");
            q.reply = Some("r".into());
            q.correct = *g;
            section.questions.push(q);
        }
        ResultDocument::new(model, vec![section])
    }

    #[test]
    fn writes_chart_for_graded_files() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("rated");
        graded("a/m1:free", "EASY", &[Grading::Correct, Grading::Unknown])
            .write_new(&input_dir.join("a.json"))
            .unwrap();
        graded("b/m2", "BONUS", &[Grading::Correct])
            .write_new(&input_dir.join("b.json"))
            .unwrap();

        let config = ScoringConfig {
            input_dir,
            output_file: dir.path().join("chart.svg"),
            ..Default::default()
        };
        run(&config).unwrap();

        let svg = std::fs::read_to_string(&config.output_file).unwrap();
        assert!(svg.contains(">EASY</text>"));
        assert!(svg.contains(">BONUS</text>"));
        assert!(svg.find(">EASY</text>").unwrap() < svg.find(">BONUS</text>").unwrap());
        assert!(svg.contains(">m1</text>"));
        assert!(svg.contains(">m2</text>"));
    }

    #[test]
    fn empty_folder_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoringConfig {
            input_dir: dir.path().to_path_buf(),
            output_file: dir.path().join("chart.svg"),
            ..Default::default()
        };
        run(&config).unwrap();
        assert!(!config.output_file.exists());
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoringConfig {
            input_dir: dir.path().join("missing"),
            output_file: dir.path().join("chart.svg"),
            ..Default::default()
        };
        assert!(run(&config).is_err());
    }
}
