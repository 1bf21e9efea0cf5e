//! The `quizbench edit` command: an interactive grading editor.
//!
//! The editor walks a loaded result document through three menus. The main
//! menu lists sections, the section menu lists questions, and picking a
//! question starts a review pass from there to the end of the section.
//! Nothing touches the disk until the user chooses to save.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use quizbench_core::error::UserInputError;
use quizbench_core::model::{QuestionRecord, ResultDocument, Section};
use quizbench_core::review::{parse_menu_index, ReviewSession, ReviewState, Verdict};

pub fn execute(path: PathBuf) -> Result<()> {
    let document = ResultDocument::load(&path)?;
    println!("Loaded '{}'. Starting editor...", path.display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let exit = Editor::new(document, &path, stdin.lock(), stdout.lock()).run()?;
    tracing::debug!(?exit, "editor finished");

    println!("\nEditor closed.");
    Ok(())
}

/// How an editing session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditorExit {
    Saved,
    Discarded,
}

/// What a nested menu hands back to its caller.
enum Step {
    Back,
    InputClosed,
}

pub(crate) struct Editor<'p, R, W> {
    doc: ResultDocument,
    path: &'p Path,
    input: R,
    out: W,
}

impl<'p, R: BufRead, W: Write> Editor<'p, R, W> {
    pub(crate) fn new(doc: ResultDocument, path: &'p Path, input: R, out: W) -> Self {
        Self {
            doc,
            path,
            input,
            out,
        }
    }

    pub(crate) fn run(mut self) -> io::Result<EditorExit> {
        loop {
            self.print_main_menu()?;
            let Some(choice) = read_choice(&mut self.input, &mut self.out, "Enter choice: ")? else {
                writeln!(self.out, "\nInput closed. Exiting without saving.")?;
                return Ok(EditorExit::Discarded);
            };

            match choice.as_str() {
                "q" => {
                    writeln!(self.out, "Exiting without saving.")?;
                    return Ok(EditorExit::Discarded);
                }
                "s" => {
                    if self.save()? {
                        return Ok(EditorExit::Saved);
                    }
                }
                other => match parse_menu_index(other, self.doc.sections.len()) {
                    Ok(index) => {
                        if let Step::InputClosed = self.section_menu(index)? {
                            writeln!(self.out, "\nInput closed. Exiting without saving.")?;
                            return Ok(EditorExit::Discarded);
                        }
                    }
                    Err(UserInputError::OutOfRange { .. }) => {
                        writeln!(self.out, "Invalid section number.")?;
                    }
                    Err(UserInputError::InvalidChoice(_)) => {
                        writeln!(
                            self.out,
                            "Invalid input. Please enter a section number, 's', or 'q'."
                        )?;
                    }
                },
            }
        }
    }

    /// Returns `true` once the document is on disk.
    fn save(&mut self) -> io::Result<bool> {
        match self.doc.save_with_backup(self.path) {
            Ok(outcome) => {
                if let Some(backup) = outcome.backup {
                    writeln!(
                        self.out,
                        "Backup of previous version created at '{}'",
                        backup.display()
                    )?;
                }
                writeln!(
                    self.out,
                    "Successfully saved changes to '{}'",
                    self.path.display()
                )?;
                writeln!(self.out, "Changes saved. Exiting.")?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!("save failed: {e}");
                writeln!(self.out, "Error: {e}")?;
                writeln!(self.out, "Save failed. Please check errors above. Not exiting.")?;
                Ok(false)
            }
        }
    }

    fn print_main_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n--- Result Editor Main Menu ---")?;
        if self.doc.sections.is_empty() {
            writeln!(self.out, "The document has no sections.")?;
        } else {
            writeln!(self.out, "Sections:")?;
            for (i, section) in self.doc.sections.iter().enumerate() {
                let indicator = if section.is_complete() { "" } else { " (!)" };
                writeln!(self.out, "  {}: {}{indicator}", i + 1, section.section_name)?;
            }
            writeln!(
                self.out,
                "Graded: {}/{} questions",
                self.doc.graded_count(),
                self.doc.question_count()
            )?;
        }
        writeln!(self.out, "\nOptions:")?;
        writeln!(self.out, "  Enter section number to view/edit.")?;
        writeln!(self.out, "  s: Save changes and exit")?;
        writeln!(self.out, "  q: Quit without saving")?;
        writeln!(self.out, "-------------------------------")
    }

    fn section_menu(&mut self, index: usize) -> io::Result<Step> {
        loop {
            print_section_menu(&mut self.out, &self.doc.sections[index])?;
            let Some(choice) = read_choice(&mut self.input, &mut self.out, "Enter choice: ")? else {
                return Ok(Step::InputClosed);
            };

            if choice == "b" {
                writeln!(self.out, "Returning to main menu.")?;
                return Ok(Step::Back);
            }

            let questions = &mut self.doc.sections[index].questions;
            match parse_menu_index(&choice, questions.len()) {
                Ok(start) => {
                    writeln!(
                        self.out,
                        "\nStarting edit sequence from question {}...",
                        start + 1
                    )?;
                    let step = review(&mut self.input, &mut self.out, questions, start)?;
                    if let Step::InputClosed = step {
                        return Ok(Step::InputClosed);
                    }
                }
                Err(UserInputError::OutOfRange { .. }) => {
                    writeln!(self.out, "Invalid question number.")?;
                }
                Err(UserInputError::InvalidChoice(_)) => {
                    writeln!(self.out, "Invalid input. Please enter a question number or 'b'.")?;
                }
            }
        }
    }
}

fn print_section_menu<W: Write>(out: &mut W, section: &Section) -> io::Result<()> {
    writeln!(out, "\n--- Editing Section: {} ---", section.section_name)?;
    if section.questions.is_empty() {
        writeln!(out, "This section has no questions.")?;
    } else {
        writeln!(out, "Questions:")?;
        for (i, q) in section.questions.iter().enumerate() {
            writeln!(out, "  {}: {} (Correct: {})", i + 1, q.question, q.correct)?;
        }
    }
    writeln!(out, "\nOptions:")?;
    writeln!(out, "  Enter question number to start editing sequence from there.")?;
    writeln!(out, "  b: Back to main menu")?;
    writeln!(out, "--------------------------------------")
}

fn print_question<W: Write>(
    out: &mut W,
    question: &QuestionRecord,
    number: usize,
    total: usize,
) -> io::Result<()> {
    writeln!(out, "\n--- Edit Question ({number}/{total}) ---")?;
    writeln!(out, "  Question:        {}", question.question)?;
    writeln!(out, "  Expected Answer: {}", question.expected_answer)?;
    writeln!(out, "  Reply:           {}", question.reply.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "  Current Status:  {}", question.correct)
}

/// Run a review pass over `questions[start..]`.
fn review<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    questions: &mut [QuestionRecord],
    start: usize,
) -> io::Result<Step> {
    let total = questions.len();
    let mut session = match ReviewSession::new(questions, start) {
        Ok(session) => session,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(Step::Back);
        }
    };
    while let Some((i, question)) = session.current() {
        print_question(out, question, i + 1, total)?;

        let verdict = loop {
            let Some(choice) = read_choice(
                input,
                out,
                "Is the reply correct? (y/n/c - yes/no/cancel sequence): ",
            )?
            else {
                return Ok(Step::InputClosed);
            };
            match choice.parse::<Verdict>() {
                Ok(verdict) => break verdict,
                Err(_) => writeln!(out, "Invalid input. Please enter 'y', 'n', or 'c'.")?,
            }
        };

        match verdict {
            Verdict::Yes => writeln!(out, "Status set to True.")?,
            Verdict::No => writeln!(out, "Status set to False.")?,
            Verdict::Cancel => writeln!(out, "Edit sequence cancelled.")?,
        }
        if let ReviewState::Done = session.apply(verdict) {
            writeln!(out, "Reached the end of the section.")?;
        }
    }

    Ok(Step::Back)
}

/// Prompt and read one trimmed, lowercased line. `None` at end of input.
fn read_choice<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}
