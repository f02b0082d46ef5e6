use log::debug;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{Result, WttError};
use crate::traits::{CommandOutput, CommandRunner, CommandSpec};

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeRecord {
    pub path: PathBuf,
    /// Commit currently checked out.
    pub head: String,
    /// Full ref (`refs/heads/...`), empty for a detached checkout.
    pub branch: String,
}

impl WorktreeRecord {
    /// Branch name without the `refs/heads/` prefix.
    #[must_use]
    pub fn branch_name(&self) -> &str {
        self.branch
            .strip_prefix(BRANCH_REF_PREFIX)
            .unwrap_or(&self.branch)
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.branch.is_empty()
    }

    /// Label used in pickers and messages.
    #[must_use]
    pub fn display_branch(&self) -> &str {
        if self.is_detached() {
            "(detached)"
        } else {
            self.branch_name()
        }
    }

    /// Accepts both `feature/x` and `refs/heads/feature/x`.
    #[must_use]
    pub fn is_on_branch(&self, branch: &str) -> bool {
        !self.is_detached() && (self.branch == branch || self.branch_name() == branch)
    }
}

/// Parses porcelain worktree output.
///
/// Records are separated by blank lines; `worktree`, `HEAD` and `branch`
/// lines fill the record being built and every other line is ignored. A
/// record without a path is dropped. A trailing record with no terminating
/// blank line is still emitted.
#[must_use]
pub fn parse_worktrees(raw: &str) -> Vec<WorktreeRecord> {
    let mut records = Vec::new();
    let mut current = WorktreeRecord::default();

    for line in raw.lines() {
        if line.is_empty() {
            if !current.path.as_os_str().is_empty() {
                records.push(current);
            }
            current = WorktreeRecord::default();
            continue;
        }

        if let Some(path) = line.strip_prefix("worktree ") {
            current.path = PathBuf::from(path);
        } else if let Some(head) = line.strip_prefix("HEAD ") {
            current.head = head.to_string();
        } else if let Some(branch) = line.strip_prefix("branch ") {
            current.branch = branch.to_string();
        }
    }

    if !current.path.as_os_str().is_empty() {
        records.push(current);
    }

    records
}

/// Thin wrapper over the `git` binary.
pub struct Git {
    runner: Rc<dyn CommandRunner>,
}

impl Git {
    #[must_use]
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        let spec = CommandSpec::new("git")
            .args(args.iter().copied())
            .current_dir(dir);
        debug!("git {} (in {})", args.join(" "), dir.display());
        Ok(self.runner.run(&spec)?)
    }

    /// Returns the top-level directory of the working tree containing `dir`.
    ///
    /// # Errors
    /// Returns [`WttError::NotInRepository`] when `dir` is not inside a
    /// working tree or git cannot be run there.
    pub fn toplevel(&self, dir: &Path) -> Result<PathBuf> {
        match self.run(dir, &["rev-parse", "--show-toplevel"]) {
            Ok(output) if output.success() => {
                let root = output.stdout.trim();
                if root.is_empty() {
                    Err(WttError::NotInRepository)
                } else {
                    Ok(PathBuf::from(root))
                }
            }
            _ => Err(WttError::NotInRepository),
        }
    }

    /// Lists every worktree of the repository that `repo` belongs to. The
    /// main working directory comes first.
    ///
    /// # Errors
    /// Returns an error if git cannot be started or exits non-zero.
    pub fn list_worktrees(&self, repo: &Path) -> Result<Vec<WorktreeRecord>> {
        let output = self.run(repo, &["worktree", "list", "--porcelain"])?;
        if !output.success() {
            return Err(WttError::Git {
                command: "worktree list".to_string(),
                output: output.combined(),
            });
        }
        Ok(parse_worktrees(&output.stdout))
    }

    /// Resolves any path inside a repository, linked worktrees included, to
    /// the main working directory.
    ///
    /// # Errors
    /// Returns an error if `dir` is gone, is not under version control, or
    /// git reports no worktrees at all.
    pub fn main_root_of(&self, dir: &Path) -> Result<PathBuf> {
        self.list_worktrees(dir)?
            .into_iter()
            .next()
            .map(|record| record.path)
            .ok_or_else(|| WttError::Git {
                command: "worktree list".to_string(),
                output: format!("no worktrees reported for {}", dir.display()),
            })
    }

    /// Checks `name` with `git check-ref-format --branch`.
    ///
    /// # Errors
    /// Returns [`WttError::InvalidBranchName`] if the name is empty or
    /// rejected by git.
    pub fn validate_branch_name(&self, repo: &Path, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(WttError::InvalidBranchName(name.to_string()));
        }
        match self.run(repo, &["check-ref-format", "--branch", name]) {
            Ok(output) if output.success() => Ok(()),
            _ => Err(WttError::InvalidBranchName(name.to_string())),
        }
    }

    /// Checks whether a local branch exists.
    ///
    /// # Errors
    /// Returns an error if git cannot be started.
    pub fn branch_exists(&self, repo: &Path, name: &str) -> Result<bool> {
        let reference = format!("{BRANCH_REF_PREFIX}{name}");
        let output = self.run(repo, &["rev-parse", "--verify", "--quiet", &reference])?;
        Ok(output.success())
    }

    /// Adds a worktree at `path`.
    ///
    /// With `create_branch` the branch is created (`-b`) from `base`, or from
    /// HEAD when no base is given. Otherwise the existing branch is checked
    /// out and `base` is not used.
    ///
    /// # Errors
    /// Returns [`WttError::WorktreeCreate`] carrying git's output when the
    /// command fails.
    pub fn add_worktree(
        &self,
        repo: &Path,
        path: &Path,
        branch: &str,
        create_branch: bool,
        base: Option<&str>,
    ) -> Result<()> {
        let path_arg = path.to_string_lossy();
        let mut args = vec!["worktree", "add"];
        if create_branch {
            args.extend(["-b", branch, &*path_arg]);
            if let Some(base) = base {
                args.push(base);
            }
        } else {
            args.extend([&*path_arg, branch]);
        }

        let output = self
            .run(repo, &args)
            .map_err(|e| WttError::WorktreeCreate {
                output: e.to_string(),
            })?;
        if !output.success() {
            return Err(WttError::WorktreeCreate {
                output: output.combined(),
            });
        }
        Ok(())
    }

    /// Runs `git worktree remove`; `force` skips git's dirty-tree check.
    ///
    /// # Errors
    /// Returns [`WttError::WorktreeRemove`] carrying git's output when the
    /// command fails.
    pub fn remove_worktree(&self, repo: &Path, path: &Path, force: bool) -> Result<()> {
        let path_arg = path.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&path_arg);

        let output = self
            .run(repo, &args)
            .map_err(|e| WttError::WorktreeRemove {
                output: e.to_string(),
            })?;
        if !output.success() {
            return Err(WttError::WorktreeRemove {
                output: output.combined(),
            });
        }
        Ok(())
    }
}
