use std::io;
use std::path::{Path, PathBuf};

/// Where a child process's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stdio {
    /// Capture stdout and stderr.
    #[default]
    Captured,
    /// Capture stdout, let the child write straight to our stderr.
    /// Used for pickers that draw their UI there.
    CaptureStdout,
    /// Send both of the child's streams to our stderr so stdout stays clean.
    Diagnostic,
    /// Attach stdin, stdout and stderr to the controlling terminal.
    Terminal,
}

/// A fully described subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub stdin: Option<String>,
    pub stdio: Stdio,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            stdin: None,
            stdio: Stdio::default(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    #[must_use]
    pub fn stdio(mut self, stdio: Stdio) -> Self {
        self.stdio = stdio;
        self
    }

    /// Renders the invocation for logs and error messages.
    #[must_use]
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout followed by stderr, trimmed. Mirrors what a user would have
    /// seen on the terminal.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }
}

/// Port for running external programs (git, fzf, post-create hooks).
///
/// Everything in the crate that spawns a process goes through this trait, so
/// tests can substitute [`crate::runner::FakeRunner`].
pub trait CommandRunner {
    /// Runs the command to completion.
    ///
    /// # Errors
    /// Returns an error only when the process could not be started or its
    /// output could not be collected. A non-zero exit is reported through
    /// [`CommandOutput::status`].
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput>;
}
