//! Core data model types for quizbench.
//!
//! A [`ResultDocument`] is one model's full run over a question file: the
//! sections in file order, each holding its questions in file order, with the
//! model's reply and the grading verdict attached to every question.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Verdict on a recorded reply.
///
/// Stored in JSON as `null`, `true` or `false`. Only [`Grading::Correct`]
/// counts towards a score; `Unknown` and `Incorrect` both count as not correct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Grading {
    #[default]
    Unknown,
    Correct,
    Incorrect,
}

impl Grading {
    pub fn is_correct(self) -> bool {
        self == Grading::Correct
    }

    pub fn is_unknown(self) -> bool {
        self == Grading::Unknown
    }
}

impl From<Option<bool>> for Grading {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Grading::Unknown,
            Some(true) => Grading::Correct,
            Some(false) => Grading::Incorrect,
        }
    }
}

impl From<Grading> for Option<bool> {
    fn from(value: Grading) -> Self {
        match value {
            Grading::Unknown => None,
            Grading::Correct => Some(true),
            Grading::Incorrect => Some(false),
        }
    }
}

impl fmt::Display for Grading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grading::Unknown => write!(f, "None"),
            Grading::Correct => write!(f, "True"),
            Grading::Incorrect => write!(f, "False"),
        }
    }
}

/// A single quiz question with its expected answer and, once collected,
/// the model's reply and its grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The question text sent to the model.
    pub question: String,
    /// The answer a human expects.
    pub expected_answer: String,
    /// The model's reply. Absent until the collector has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Grading verdict.
    #[serde(default)]
    pub correct: Grading,
    /// Keys not covered above, kept so a load and save round trip loses nothing.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl QuestionRecord {
    /// A freshly parsed question with no reply and no verdict.
    pub fn new(question: impl Into<String>, expected_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            expected_answer: expected_answer.into(),
            reply: None,
            correct: Grading::Unknown,
            extra: Map::new(),
        }
    }
}

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_name: String,
    pub questions: Vec<QuestionRecord>,
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl Section {
    pub fn new(section_name: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            questions: Vec::new(),
            extra: Map::new(),
        }
    }

    /// A section is complete when no question is still ungraded.
    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|q| !q.correct.is_unknown())
    }

    /// Number of questions explicitly graded correct.
    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.correct.is_correct()).count()
    }
}

/// One model's run: the unit of persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Raw model identifier (e.g. "provider/model:tag").
    pub model: String,
    pub sections: Vec<Section>,
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl ResultDocument {
    pub fn new(model: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            model: model.into(),
            sections,
            extra: Map::new(),
        }
    }

    /// Total number of questions across all sections.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Number of questions that have a verdict.
    pub fn graded_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.questions)
            .filter(|q| !q.correct.is_unknown())
            .count()
    }
}
