use anyhow::{Context, Result, bail};
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

use std::path::Path;
use std::process::Command;

/// A scratch directory holding a real git repository named `myrepo`, a wtt
/// state directory, and an unrelated directory outside any repository.
pub struct CliTestEnvironment {
    pub repo_dir: ChildPath,
    pub config_dir: ChildPath,
    pub outside_dir: ChildPath,
    root: ChildPath,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates a new test environment with a committed `main` branch.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        // git reports resolved paths, e.g. /private/var on macOS
        let root = ChildPath::new(
            temp_dir
                .path()
                .canonicalize()
                .context("Failed to resolve temporary directory")?,
        );
        let repo_dir = root.child("myrepo");
        let config_dir = root.child("wtt-config");
        let outside_dir = root.child("elsewhere");

        repo_dir.create_dir_all()?;
        outside_dir.create_dir_all()?;

        Self::git_in(repo_dir.path(), &["init"])?;
        Self::git_in(repo_dir.path(), &["config", "user.name", "Test User"])?;
        Self::git_in(
            repo_dir.path(),
            &["config", "user.email", "test@example.com"],
        )?;
        Self::git_in(repo_dir.path(), &["config", "commit.gpgsign", "false"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        repo_dir
            .child(".gitignore")
            .write_str(".env\n.vscode/\n.claude/\n")?;
        Self::git_in(repo_dir.path(), &["add", "."])?;
        Self::git_in(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        Self::git_in(repo_dir.path(), &["branch", "-M", "main"])?;

        Ok(Self {
            repo_dir,
            config_dir,
            outside_dir,
            root,
            _temp_dir: temp_dir,
        })
    }

    fn git_in(dir: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs git in the repository and returns its stdout.
    ///
    /// # Errors
    /// Returns an error if git cannot be started or exits non-zero.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::git_in(self.repo_dir.path(), args)
    }

    /// `wtt-bin` started inside the repository, isolated from the real user
    /// state and from any installed fzf.
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found.
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        self.run_command_in(self.repo_dir.path(), args)
    }

    /// Like [`Self::run_command`], started from `dir`.
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found.
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("wtt-bin")
            .context("Failed to find wtt-bin binary")?;
        cmd.args(args)
            .current_dir(dir)
            .env("WTT_CONFIG_DIR", self.config_dir.path())
            .env("WTT_NO_FZF", "1")
            .env_remove("WTT_LOG");
        Ok(cmd)
    }

    /// Number shown next to the first menu row that starts with `label` when
    /// `args` opens the numbered picker. The picker is cancelled.
    ///
    /// # Errors
    /// Returns an error if the command fails or no row matches.
    pub fn menu_number(&self, dir: &Path, args: &[&str], label: &str) -> Result<String> {
        let output = self.run_command_in(dir, args)?.write_stdin("").output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        stderr
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix('['))
            .filter_map(|rest| rest.split_once("] "))
            .find(|(_, row)| row.starts_with(label))
            .map(|(number, _)| number.to_string())
            .with_context(|| format!("no menu row for {label:?} in:\n{stderr}"))
    }

    /// Directory that holds the worktrees with the default configuration.
    #[must_use]
    pub fn worktrees_dir(&self) -> ChildPath {
        self.root.child("myrepo-worktrees")
    }

    /// Where `wtt create <branch>` puts the worktree by default.
    #[must_use]
    pub fn worktree_path(&self, branch: &str) -> ChildPath {
        self.worktrees_dir().child(branch.replace('/', "-"))
    }

    /// Contents of the known-repos file, one path per line.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn known_repos(&self) -> Result<Vec<String>> {
        let path = self.config_dir.child("repos");
        if !path.path().exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path.path())?;
        Ok(content.lines().map(str::to_string).collect())
    }
}
