//! Terminal implementation of the directory chooser.

use inknote_core::{ChooserError, DirectoryChooser};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Asks for a folder path on a line reader; an empty line cancels.
pub struct PromptChooser<R> {
    input: Mutex<R>,
}

impl PromptChooser<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> PromptChooser<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl<R: BufRead> DirectoryChooser for PromptChooser<R> {
    fn choose_directory(&self, title: &str) -> Result<Option<PathBuf>, ChooserError> {
        eprint!("{title}: ");
        io::stderr()
            .flush()
            .map_err(|err| ChooserError::new(err.to_string()))?;

        let mut line = String::new();
        let mut input = self
            .input
            .lock()
            .map_err(|_| ChooserError::new("prompt input lock poisoned"))?;
        input
            .read_line(&mut line)
            .map_err(|err| ChooserError::new(err.to_string()))?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(trimmed)))
    }
}
