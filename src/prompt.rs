//! Directory confirmation.
//!
//! The driver never talks to the console directly; it asks a
//! [`DecisionSource`] whether to process each directory.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors while asking for a decision.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed while waiting for an answer")]
    Closed,

    #[error("console IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can answer "process this directory?".
pub trait DecisionSource {
    fn confirm_directory(&mut self, dir: &Path) -> Result<bool, PromptError>;
}

impl<D: DecisionSource + ?Sized> DecisionSource for &mut D {
    fn confirm_directory(&mut self, dir: &Path) -> Result<bool, PromptError> {
        (**self).confirm_directory(dir)
    }
}

/// Accepts every directory without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl DecisionSource for AutoConfirm {
    fn confirm_directory(&mut self, _dir: &Path) -> Result<bool, PromptError> {
        Ok(true)
    }
}

/// Whether a typed answer means yes: exactly `yes`, any case.
pub fn is_affirmative(answer: &str) -> bool {
    answer.to_lowercase() == "yes"
}

/// Prompts on a writer and reads answers line by line from a reader.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line, without its terminator.
    pub fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Ask for the root folder to harvest.
    pub fn ask_root(&mut self) -> Result<PathBuf, PromptError> {
        self.ask("Enter the path to your folder: ").map(PathBuf::from)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> DecisionSource for ConsolePrompt<R, W> {
    fn confirm_directory(&mut self, dir: &Path) -> Result<bool, PromptError> {
        let answer = self.ask(&format!(
            "Do you want to enter the folder {}? (yes/no): ",
            dir.display()
        ))?;
        Ok(is_affirmative(&answer))
    }
}

/// Replays canned answers and records every directory asked about.
///
/// Runs out of answers the same way a closed console does.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<bool>,
    asked: Vec<PathBuf>,
}

impl ScriptedDecisions {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Directories asked about so far, in order.
    pub fn asked(&self) -> &[PathBuf] {
        &self.asked
    }
}

impl DecisionSource for ScriptedDecisions {
    fn confirm_directory(&mut self, dir: &Path) -> Result<bool, PromptError> {
        self.asked.push(dir.to_path_buf());
        self.answers.pop_front().ok_or(PromptError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("YES"));
        assert!(is_affirmative("Yes"));
        assert!(!is_affirmative("y"));
        assert!(!is_affirmative(" yes"));
        assert!(!is_affirmative("yes "));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn test_console_prompt_answers() {
        let input = Cursor::new("yes\nNo\nYES\r\n");
        let mut prompt = ConsolePrompt::new(input, Vec::new());

        assert!(prompt.confirm_directory(Path::new("root")).unwrap());
        assert!(!prompt.confirm_directory(Path::new("root/a")).unwrap());
        assert!(prompt.confirm_directory(Path::new("root/b")).unwrap());

        let (_, output) = prompt.into_inner();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Do you want to enter the folder root? (yes/no): \
             Do you want to enter the folder root/a? (yes/no): \
             Do you want to enter the folder root/b? (yes/no): "
        );
    }

    #[test]
    fn test_console_prompt_closed() {
        let mut prompt = ConsolePrompt::new(Cursor::new(""), Vec::new());
        let result = prompt.confirm_directory(Path::new("root"));
        assert!(matches!(result, Err(PromptError::Closed)));
    }

    #[test]
    fn test_ask_root() {
        let mut prompt = ConsolePrompt::new(Cursor::new("/tmp/project\n"), Vec::new());
        assert_eq!(prompt.ask_root().unwrap(), PathBuf::from("/tmp/project"));

        let (_, output) = prompt.into_inner();
        assert_eq!(output, b"Enter the path to your folder: ");
    }

    #[test]
    fn test_scripted_decisions() {
        let mut decisions = ScriptedDecisions::new([false, true]);
        assert!(!decisions.confirm_directory(Path::new("a")).unwrap());
        assert!(decisions.confirm_directory(Path::new("b")).unwrap());
        assert!(matches!(
            decisions.confirm_directory(Path::new("c")),
            Err(PromptError::Closed)
        ));
        assert_eq!(
            decisions.asked(),
            &[PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm.confirm_directory(Path::new("anything")).unwrap());
    }
}
