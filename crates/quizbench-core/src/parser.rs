//! Question file parser.
//!
//! Question files are line oriented:
//!
//! ```text
//! ### EASY
//! Q: 2+2?
//! A: 4
//! ```
//!
//! `###` opens a section, `Q:` introduces a question and the next non-blank
//! line must carry its `A:` answer. Everything else is ignored.

use std::collections::HashSet;
use std::path::Path;

use crate::error::ParseError;
use crate::model::{QuestionRecord, Section};

pub const SECTION_MARKER: &str = "###";
pub const QUESTION_MARKER: &str = "Q:";
pub const ANSWER_MARKER: &str = "A:";

/// Parse a question file from disk.
pub fn parse_question_file(path: &Path) -> Result<Vec<Section>, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_questions(&content)
}

/// Parse question file contents into sections, in document order.
///
/// Any `Q:` line not followed by an `A:` line fails the whole parse, as does
/// a `Q:` or `A:` line with nothing after the marker.
pub fn parse_questions(content: &str) -> Result<Vec<Section>, ParseError> {
    let mut sections: Vec<Section> = Vec::new();
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    while let Some((line_no, line)) = lines.next() {
        if let Some(name) = line.strip_prefix(SECTION_MARKER) {
            sections.push(Section::new(name.trim()));
        } else if let Some(question) = line.strip_prefix(QUESTION_MARKER) {
            let section = sections
                .last_mut()
                .ok_or(ParseError::OrphanQuestion { line: line_no })?;

            let question = question.trim();
            if question.is_empty() {
                return Err(ParseError::EmptyText {
                    line: line_no,
                    marker: QUESTION_MARKER,
                });
            }

            let answer = match lines.find(|(_, l)| !l.is_empty()) {
                Some((n, l)) if l.starts_with(ANSWER_MARKER) => {
                    let answer = l[ANSWER_MARKER.len()..].trim();
                    if answer.is_empty() {
                        return Err(ParseError::EmptyText {
                            line: n,
                            marker: ANSWER_MARKER,
                        });
                    }
                    answer
                }
                Some((n, l)) => {
                    return Err(ParseError::MalformedPair {
                        line: n,
                        found: l.to_string(),
                    })
                }
                None => {
                    return Err(ParseError::MalformedPair {
                        line: line_no,
                        found: String::new(),
                    })
                }
            };

            section
                .questions
                .push(QuestionRecord::new(question, answer));
        }
    }

    Ok(sections)
}

/// A non-fatal issue found in parsed sections.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Section the warning refers to.
    pub section: String,
    /// Warning message.
    pub message: String,
}

/// Check parsed sections for issues that do not stop a run.
pub fn validate_sections(sections: &[Section]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for section in sections {
        if !seen.insert(section.section_name.as_str()) {
            warnings.push(ValidationWarning {
                section: section.section_name.clone(),
                message: "duplicate section name; sections are kept separately".into(),
            });
        }
    }

    for section in sections {
        if section.questions.is_empty() {
            warnings.push(ValidationWarning {
                section: section.section_name.clone(),
                message: "section has no questions".into(),
            });
        }

        for (i, q) in section.questions.iter().enumerate() {
            if q.question.is_empty() {
                warnings.push(ValidationWarning {
                    section: section.section_name.clone(),
                    message: format!("question {} has empty text", i + 1),
                });
            }
            if q.expected_answer.is_empty() {
                warnings.push(ValidationWarning {
                    section: section.section_name.clone(),
                    message: format!("question {} has an empty expected answer", i + 1),
                });
            }
        }
    }

    warnings
}
