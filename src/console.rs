//! User-facing prompts and status lines.
//!
//! Everything meant for a human goes to the diagnostic stream (stderr in
//! production) so that stdout only ever carries a command's result path.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

pub struct Console {
    input: RefCell<Box<dyn BufRead>>,
    output: RefCell<Box<dyn Write>>,
}

impl Console {
    #[must_use]
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Reads from stdin, writes to stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdin().lock()), Box::new(io::stderr()))
    }

    /// Prints one line. A closed stderr is not worth failing a command over.
    pub fn say(&self, message: impl Display) {
        let _ = writeln!(self.output.borrow_mut(), "{message}");
    }

    pub fn warn(&self, message: impl Display) {
        self.say(format_args!("Warning: {message}"));
    }

    /// Prints `message` without a newline and flushes.
    pub fn prompt(&self, message: impl Display) {
        let mut output = self.output.borrow_mut();
        let _ = write!(output, "{message}");
        let _ = output.flush();
    }

    /// One trimmed line of input, `None` at end of input.
    ///
    /// # Errors
    /// Returns an error if reading fails.
    pub fn read_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.borrow_mut().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks a `[y/N]` question. Only `y` and `yes` (any case) count as yes.
    ///
    /// # Errors
    /// Returns an error if reading the answer fails.
    pub fn confirm(&self, question: impl Display) -> io::Result<bool> {
        self.prompt(format_args!("{question} [y/N] "));
        let answer = self.read_line()?.unwrap_or_default().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
