//! Sequential grading of a section's questions.
//!
//! A [`ReviewSession`] walks questions `start..end` one at a time. Each step
//! takes a verdict: yes or no grades the current question and advances,
//! cancel stops the pass without touching the remaining questions.

use crate::error::UserInputError;
use crate::model::{Grading, QuestionRecord};

/// Where a review pass currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Waiting for a verdict on question `i` (0-based).
    Reviewing(usize),
    Cancelled,
    Done,
}

impl ReviewState {
    pub fn is_finished(self) -> bool {
        !matches!(self, ReviewState::Reviewing(_))
    }
}

/// A single answer typed at the review prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Yes,
    No,
    Cancel,
}

impl std::str::FromStr for Verdict {
    type Err = UserInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" => Ok(Verdict::Yes),
            "n" => Ok(Verdict::No),
            "c" => Ok(Verdict::Cancel),
            _ => Err(UserInputError::InvalidChoice(s.trim().to_string())),
        }
    }
}

/// Parse a 1-based menu number into a 0-based index below `len`.
pub fn parse_menu_index(input: &str, len: usize) -> Result<usize, UserInputError> {
    let trimmed = input.trim();
    let n: usize = trimmed
        .parse()
        .map_err(|_| UserInputError::InvalidChoice(trimmed.to_string()))?;
    if n == 0 || n > len {
        return Err(UserInputError::OutOfRange { index: n, len });
    }
    Ok(n - 1)
}

/// A review pass over one section's questions.
pub struct ReviewSession<'a> {
    questions: &'a mut [QuestionRecord],
    state: ReviewState,
}

impl<'a> ReviewSession<'a> {
    /// Start reviewing at `start` (0-based).
    pub fn new(questions: &'a mut [QuestionRecord], start: usize) -> Result<Self, UserInputError> {
        if start >= questions.len() {
            return Err(UserInputError::OutOfRange {
                index: start + 1,
                len: questions.len(),
            });
        }
        Ok(Self {
            questions,
            state: ReviewState::Reviewing(start),
        })
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    /// The question awaiting a verdict, with its 0-based index.
    pub fn current(&self) -> Option<(usize, &QuestionRecord)> {
        match self.state {
            ReviewState::Reviewing(i) => Some((i, &self.questions[i])),
            _ => None,
        }
    }

    /// Apply a verdict to the current question and advance.
    pub fn apply(&mut self, verdict: Verdict) -> ReviewState {
        let ReviewState::Reviewing(i) = self.state else {
            return self.state;
        };

        let grading = match verdict {
            Verdict::Yes => Grading::Correct,
            Verdict::No => Grading::Incorrect,
            Verdict::Cancel => {
                self.state = ReviewState::Cancelled;
                return self.state;
            }
        };

        self.questions[i].correct = grading;
        self.state = if i + 1 == self.questions.len() {
            ReviewState::Done
        } else {
            ReviewState::Reviewing(i + 1)
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<QuestionRecord> {
        (1..=n)
            .map(|i| QuestionRecord::new(format!("q{i}"), format!("a{i}")))
            .collect()
    }

    #[test]
    fn yes_then_cancel_leaves_rest_unknown() {
        let mut qs = questions(3);
        let mut session = ReviewSession::new(&mut qs, 1).unwrap();

        assert_eq!(session.apply(Verdict::Yes), ReviewState::Reviewing(2));
        assert_eq!(session.apply(Verdict::Cancel), ReviewState::Cancelled);
        assert!(session.current().is_none());

        assert_eq!(qs[0].correct, Grading::Unknown);
        assert_eq!(qs[1].correct, Grading::Correct);
        assert_eq!(qs[2].correct, Grading::Unknown);
    }

    #[test]
    fn reaching_the_end_is_done() {
        let mut qs = questions(2);
        let mut session = ReviewSession::new(&mut qs, 0).unwrap();

        assert_eq!(session.apply(Verdict::No), ReviewState::Reviewing(1));
        assert_eq!(session.apply(Verdict::Yes), ReviewState::Done);
        assert!(session.state().is_finished());

        assert_eq!(qs[0].correct, Grading::Incorrect);
        assert_eq!(qs[1].correct, Grading::Correct);
    }

    #[test]
    fn invalid_input_reprompts_without_mutation() {
        let mut qs = questions(1);
        let mut session = ReviewSession::new(&mut qs, 0).unwrap();

        for input in ["maybe", "", "yes"] {
            assert!(input.parse::<Verdict>().is_err());
        }
        assert_eq!(session.state(), ReviewState::Reviewing(0));
        assert!(session.current().unwrap().1.correct.is_unknown());

        let verdict: Verdict = " Y \n".parse().unwrap();
        assert_eq!(session.apply(verdict), ReviewState::Done);
        assert_eq!(qs[0].correct, Grading::Correct);
    }

    #[test]
    fn regrading_overwrites_previous_verdict() {
        let mut qs = questions(1);
        qs[0].correct = Grading::Correct;
        ReviewSession::new(&mut qs, 0).unwrap().apply(Verdict::No);
        assert_eq!(qs[0].correct, Grading::Incorrect);
    }

    #[test]
    fn start_out_of_range_is_rejected() {
        let mut qs = questions(2);
        assert!(matches!(
            ReviewSession::new(&mut qs, 2),
            Err(UserInputError::OutOfRange { index: 3, len: 2 })
        ));
        let mut empty = questions(0);
        assert!(ReviewSession::new(&mut empty, 0).is_err());
    }

    #[test]
    fn verdict_parsing() {
        assert_eq!("y".parse::<Verdict>().unwrap(), Verdict::Yes);
        assert_eq!("N".parse::<Verdict>().unwrap(), Verdict::No);
        assert_eq!(" c ".parse::<Verdict>().unwrap(), Verdict::Cancel);
        assert!("yes".parse::<Verdict>().is_err());
    }

    #[test]
    fn menu_index_parsing() {
        assert_eq!(parse_menu_index("1", 3).unwrap(), 0);
        assert_eq!(parse_menu_index(" 3 ", 3).unwrap(), 2);
        assert!(matches!(
            parse_menu_index("0", 3),
            Err(UserInputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_menu_index("4", 3),
            Err(UserInputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_menu_index("x", 3),
            Err(UserInputError::InvalidChoice(_))
        ));
    }
}
