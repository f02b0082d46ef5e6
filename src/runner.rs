//! Implementations of the [`CommandRunner`] port.

use log::debug;
use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio as ProcessStdio};

use crate::traits::{CommandOutput, CommandRunner, CommandSpec, Stdio};

#[cfg(unix)]
const TERMINAL_DEVICE: &str = "/dev/tty";
#[cfg(windows)]
const TERMINAL_DEVICE: &str = "CON";

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        debug!("running `{}`", spec.display());

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        match spec.stdio {
            Stdio::Captured => {
                cmd.stdout(ProcessStdio::piped())
                    .stderr(ProcessStdio::piped());
            }
            Stdio::CaptureStdout => {
                cmd.stdout(ProcessStdio::piped())
                    .stderr(ProcessStdio::inherit());
            }
            Stdio::Diagnostic => {
                cmd.stdout(io::stderr()).stderr(ProcessStdio::inherit());
            }
            Stdio::Terminal => {
                let tty = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(TERMINAL_DEVICE)?;
                cmd.stdin(tty.try_clone()?)
                    .stdout(tty.try_clone()?)
                    .stderr(tty);
            }
        }

        if spec.stdin.is_some() {
            cmd.stdin(ProcessStdio::piped());
        } else if spec.stdio != Stdio::Terminal {
            cmd.stdin(ProcessStdio::null());
        }

        let mut child = cmd.spawn()?;

        if let (Some(input), Some(mut pipe)) = (&spec.stdin, child.stdin.take()) {
            // The child may exit before consuming everything (e.g. fzf on ESC).
            match pipe.write_all(input.as_bytes()) {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        debug!("`{}` exited with {:?}", spec.program, output.status.code());

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

struct Rule {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    output: CommandOutput,
}

impl Rule {
    fn matches(&self, spec: &CommandSpec) -> bool {
        self.program == spec.program
            && self.args == spec.args
            && self
                .current_dir
                .as_ref()
                .is_none_or(|dir| spec.current_dir.as_ref() == Some(dir))
    }
}

/// Scripted runner for tests.
///
/// Responses are matched on program, exact arguments and, optionally, the
/// working directory. Later rules win over earlier ones. Unmatched commands
/// fail to "spawn" with [`io::ErrorKind::NotFound`], which is how a missing
/// directory or binary looks to the real runner.
#[derive(Default)]
pub struct FakeRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl FakeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a response for `program args...` run from any directory.
    pub fn on(&self, program: &str, args: &[&str], output: CommandOutput) -> &Self {
        self.push_rule(program, args, None, output)
    }

    /// Scripts a response for `program args...` run from `dir`.
    pub fn on_in(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        output: CommandOutput,
    ) -> &Self {
        self.push_rule(program, args, Some(dir.to_path_buf()), output)
    }

    fn push_rule(
        &self,
        program: &str,
        args: &[&str],
        current_dir: Option<PathBuf>,
        output: CommandOutput,
    ) -> &Self {
        self.rules.borrow_mut().push(Rule {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            current_dir,
            output,
        });
        self
    }

    /// Every command run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Successful exit with the given stdout.
    #[must_use]
    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Exit with `code` and the given stderr.
    #[must_use]
    pub fn exit(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        self.rules
            .borrow()
            .iter()
            .rev()
            .find(|rule| rule.matches(spec))
            .map(|rule| rule.output.clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no scripted response for `{}`", spec.display()),
                )
            })
    }
}
