//! The `quizbench validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizbench_core::parser;

pub fn execute(input: PathBuf) -> Result<()> {
    let sections = parser::parse_question_file(&input)?;

    for section in &sections {
        println!(
            "Section: {} ({} questions)",
            section.section_name,
            section.questions.len()
        );
    }

    let warnings = parser::validate_sections(&sections);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.section, w.message);
    }

    if warnings.is_empty() {
        println!("All sections valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
