//! Per-section scoring across result documents.
//!
//! Each document contributes one model's percentages; a [`Scoreboard`]
//! gathers them (last write wins on duplicate model names) and resolves the
//! section order used for charts and tables.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{ResultDocument, Section};

/// Where the scorer looks for result files and how it lays out the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Folder scanned for `*.json` result documents.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Chart output path.
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    /// Preferred section order. Sections not listed follow alphabetically.
    #[serde(default = "default_section_order")]
    pub section_order: Vec<String>,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./rated-replies")
}
fn default_output_file() -> PathBuf {
    PathBuf::from("llm_performance_comparison.svg")
}
fn default_section_order() -> Vec<String> {
    ["EASY", "NORMAL", "HARD", "VERY HARD"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_file: default_output_file(),
            section_order: default_section_order(),
        }
    }
}

/// Percentage of questions explicitly graded correct, or `None` for an
/// empty section.
pub fn section_score(section: &Section) -> Option<f64> {
    if section.questions.is_empty() {
        return None;
    }
    Some(100.0 * section.correct_count() as f64 / section.questions.len() as f64)
}

/// One model's score per section name.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScores {
    /// Raw model identifier, as stored in the document.
    pub model: String,
    pub sections: HashMap<String, f64>,
}

impl ModelScores {
    /// Score every section of a document. `source` names the file in warnings.
    pub fn from_document(doc: &ResultDocument, source: &str) -> Self {
        let mut sections = HashMap::new();
        for section in &doc.sections {
            let score = section_score(section).unwrap_or_else(|| {
                tracing::warn!(
                    "no questions found in section '{}' in file {source}",
                    section.section_name
                );
                0.0
            });
            if sections
                .insert(section.section_name.clone(), score)
                .is_some()
            {
                tracing::warn!(
                    "duplicate section '{}' in file {source}, keeping the later score",
                    section.section_name
                );
            }
        }

        Self {
            model: doc.model.clone(),
            sections,
        }
    }
}

/// Strip the provider prefix and any `:tag` suffix from a model identifier.
///
/// `"meta-llama/llama-3:free"` -> `"llama-3"`.
pub fn display_name(model: &str) -> String {
    let without_provider = match model.split_once('/') {
        Some((prefix, rest))
            if !prefix.is_empty()
                && prefix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
        {
            rest
        }
        _ => model,
    };
    let without_tag = match without_provider.split_once(':') {
        Some((name, _)) => name,
        None => without_provider,
    };
    without_tag.trim().to_string()
}

/// Order sections: preferred ones first (in preferred order), then the rest
/// alphabetically. Returns the full order and the unlisted extras.
pub fn resolve_section_order<'a>(
    preferred: &[String],
    present: impl IntoIterator<Item = &'a str>,
) -> (Vec<String>, Vec<String>) {
    let mut remaining: BTreeSet<&str> = present.into_iter().collect();

    let mut ordered = Vec::new();
    for name in preferred {
        if remaining.remove(name.as_str()) {
            ordered.push(name.clone());
        }
    }

    let extras: Vec<String> = remaining.into_iter().map(String::from).collect();
    ordered.extend(extras.iter().cloned());
    (ordered, extras)
}

/// One bar series in a grouped chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub model: String,
    pub display_name: String,
    /// One value per section, aligned with [`ChartData::sections`].
    pub values: Vec<f64>,
}

/// Scores laid out for plotting: sections along the x axis, one series per model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub sections: Vec<String>,
    pub series: Vec<Series>,
}

/// Scores for several models, in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    models: Vec<ModelScores>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model's scores. Returns `true` if an earlier entry with the
    /// same raw identifier was overwritten.
    pub fn insert(&mut self, scores: ModelScores) -> bool {
        match self.models.iter_mut().find(|m| m.model == scores.model) {
            Some(existing) => {
                *existing = scores;
                true
            }
            None => {
                self.models.push(scores);
                false
            }
        }
    }

    pub fn models(&self) -> &[ModelScores] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Section order for display, plus sections missing from `preferred`.
    pub fn section_order(&self, preferred: &[String]) -> (Vec<String>, Vec<String>) {
        resolve_section_order(
            preferred,
            self.models
                .iter()
                .flat_map(|m| m.sections.keys().map(String::as_str)),
        )
    }

    /// Lay scores out for a grouped bar chart. Missing sections score 0.
    pub fn chart_data(&self, section_order: &[String]) -> ChartData {
        let series = self
            .models
            .iter()
            .map(|m| Series {
                model: m.model.clone(),
                display_name: display_name(&m.model),
                values: section_order
                    .iter()
                    .map(|s| m.sections.get(s).copied().unwrap_or(0.0))
                    .collect(),
            })
            .collect();

        ChartData {
            sections: section_order.to_vec(),
            series,
        }
    }
}

/// What a directory scan found.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Number of `.json` files seen.
    pub files_found: usize,
    /// Files that could not be used, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    pub scoreboard: Scoreboard,
}

/// Sorted `.json` file paths, plus a skip entry for each unreadable entry.
fn json_paths(
    dir: &Path,
    entries: impl IntoIterator<Item = std::io::Result<PathBuf>>,
) -> (Vec<PathBuf>, Vec<(PathBuf, String)>) {
    let mut paths = Vec::new();
    let mut unreadable = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {e}", dir.display());
                unreadable.push((
                    dir.to_path_buf(),
                    format!("unreadable directory entry: {e}"),
                ));
                continue;
            }
        };
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    (paths, unreadable)
}

/// Score every `.json` file in `dir`, in file-name order.
///
/// A file or directory entry that cannot be read, or a file that cannot be
/// decoded, is skipped with a warning; only a missing or unreadable folder is
/// an error.
pub fn score_directory(dir: &Path) -> Result<ScanOutcome> {
    if !dir.is_dir() {
        anyhow::bail!("folder not found: {}", dir.display());
    }

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()));
    let (paths, unreadable) = json_paths(dir, entries);

    let mut outcome = ScanOutcome {
        files_found: paths.len(),
        skipped: unreadable,
        ..Default::default()
    };

    for path in paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("processing {file_name}");

        let doc = match ResultDocument::load(&path) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("skipping {file_name}: {e}");
                outcome.skipped.push((path, e.to_string()));
                continue;
            }
        };

        if doc.sections.is_empty() {
            tracing::warn!(
                "skipping model '{}' from {file_name}: no sections found",
                doc.model
            );
            outcome
                .skipped
                .push((path, "no sections found".to_string()));
            continue;
        }

        let scores = ModelScores::from_document(&doc, &file_name);
        if outcome.scoreboard.insert(scores) {
            tracing::warn!(
                "duplicate model name '{}' found in {file_name}, overwriting previous results",
                doc.model
            );
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grading, QuestionRecord};

    fn section(name: &str, gradings: &[Grading]) -> Section {
        let mut s = Section::new(name);
        for (i, g) in gradings.iter().enumerate() {
            let mut q = QuestionRecord::new(format!("q{i}"), "a");
            q.reply = Some("r".into());
            q.correct = *g;
            s.questions.push(q);
        }
        s
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn score_counts_only_explicit_true() {
        use Grading::*;
        let s = section("EASY", &[Correct, Incorrect, Unknown, Correct]);
        assert_eq!(section_score(&s), Some(50.0));
        assert_eq!(section_score(&section("E", &[])), None);
    }

    #[test]
    fn empty_section_scores_zero() {
        let doc = ResultDocument::new("m", vec![section("EMPTY", &[])]);
        let scores = ModelScores::from_document(&doc, "test.json");
        assert_eq!(scores.sections["EMPTY"], 0.0);
    }

    #[test]
    fn duplicate_section_in_document_keeps_later() {
        use Grading::*;
        let doc = ResultDocument::new(
            "m",
            vec![section("S", &[Correct]), section("S", &[Incorrect])],
        );
        let scores = ModelScores::from_document(&doc, "test.json");
        assert_eq!(scores.sections["S"], 0.0);
    }

    #[test]
    fn display_name_strips_provider_and_tag() {
        assert_eq!(display_name("a/m1:free"), "m1");
        assert_eq!(display_name("b/m1"), "m1");
        assert_eq!(display_name("meta-llama/llama-3.1-8b:beta"), "llama-3.1-8b");
        assert_eq!(display_name("plain"), "plain");
        assert_eq!(display_name("weird.prefix/model"), "weird.prefix/model");
        assert_eq!(display_name("/model"), "/model");
    }

    #[test]
    fn section_order_prefers_list_then_alphabetical() {
        let preferred = names(&["EASY", "NORMAL", "HARD"]);
        let (order, extras) =
            resolve_section_order(&preferred, ["ZETA", "HARD", "ALPHA", "EASY", "HARD"]);
        assert_eq!(order, names(&["EASY", "HARD", "ALPHA", "ZETA"]));
        assert_eq!(extras, names(&["ALPHA", "ZETA"]));
    }

    #[test]
    fn distinct_identifiers_with_same_display_name_are_separate() {
        use Grading::*;
        let mut board = Scoreboard::new();
        board.insert(ModelScores::from_document(
            &ResultDocument::new("a/m1:free", vec![section("EASY", &[Correct, Incorrect])]),
            "a.json",
        ));
        board.insert(ModelScores::from_document(
            &ResultDocument::new("b/m1", vec![section("EASY", &[Correct, Correct])]),
            "b.json",
        ));

        let (order, _) = board.section_order(&names(&["EASY"]));
        let chart = board.chart_data(&order);
        assert_eq!(chart.sections, names(&["EASY"]));
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].display_name, "m1");
        assert_eq!(chart.series[1].display_name, "m1");
        assert_eq!(chart.series[0].values, vec![50.0]);
        assert_eq!(chart.series[1].values, vec![100.0]);
    }

    #[test]
    fn duplicate_model_is_last_write_wins() {
        use Grading::*;
        let mut board = Scoreboard::new();
        assert!(!board.insert(ModelScores::from_document(
            &ResultDocument::new("m", vec![section("EASY", &[Correct])]),
            "1.json",
        )));
        assert!(board.insert(ModelScores::from_document(
            &ResultDocument::new("m", vec![section("HARD", &[Incorrect])]),
            "2.json",
        )));

        assert_eq!(board.models().len(), 1);
        let (order, _) = board.section_order(&[]);
        assert_eq!(order, names(&["HARD"]));
    }

    #[test]
    fn missing_sections_plot_as_zero() {
        use Grading::*;
        let mut board = Scoreboard::new();
        board.insert(ModelScores::from_document(
            &ResultDocument::new("m", vec![section("EASY", &[Correct])]),
            "m.json",
        ));
        let chart = board.chart_data(&names(&["EASY", "HARD"]));
        assert_eq!(chart.series[0].values, vec![100.0, 0.0]);
    }

    #[test]
    fn scan_directory_skips_bad_files() {
        use Grading::*;
        let dir = tempfile::tempdir().unwrap();
        ResultDocument::new("good", vec![section("EASY", &[Correct, Unknown])])
            .write_new(&dir.path().join("a.json"))
            .unwrap();
        std::fs::write(dir.path().join("b.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("c.JSON"), r#"{"sections": []}"#).unwrap();
        ResultDocument::new("empty", vec![])
            .write_new(&dir.path().join("d.json"))
            .unwrap();
        std::fs::write(dir.path().join("a.json.bak"), "ignored").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let outcome = score_directory(dir.path()).unwrap();
        assert_eq!(outcome.files_found, 4);
        assert_eq!(outcome.skipped.len(), 3);
        assert_eq!(outcome.scoreboard.models().len(), 1);
        assert_eq!(outcome.scoreboard.models()[0].sections["EASY"], 50.0);
    }

    #[test]
    fn unreadable_entry_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.json");
        std::fs::write(&good, "{}").unwrap();

        let entries = vec![
            Err(std::io::Error::other("stale handle")),
            Ok(good.clone()),
            Ok(dir.path().join("notes.txt")),
        ];
        let (paths, skipped) = json_paths(dir.path(), entries);

        assert_eq!(paths, vec![good]);
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].1.contains("stale handle"));
    }

    #[test]
    fn scan_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(score_directory(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("./rated-replies"));
        assert_eq!(config.section_order.len(), 4);
        assert_eq!(config.section_order[3], "VERY HARD");
    }
}
