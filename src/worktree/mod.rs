//! Adding, populating and removing linked worktrees.

mod populate;

pub use populate::{PopulateReport, populate, run_post_create};

use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::git::Git;

/// A non-fatal problem met while setting up a worktree. Commands print these
/// as warnings and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    /// What was being attempted, e.g. `copy .env`.
    pub action: String,
    pub detail: String,
}

impl Advisory {
    pub fn new(action: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self {
            action: action.into(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action, self.detail)
    }
}

/// Maps a branch name to a single path component.
///
/// Path separators and characters that are invalid in file names on common
/// platforms become `-`, so `feature/login` lands in `feature-login`.
#[must_use]
pub fn sanitize_branch_name(branch: &str) -> String {
    branch
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            _ => c,
        })
        .collect()
}

/// Result of [`create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedWorktree {
    pub path: PathBuf,
    /// The branch already existed and was checked out rather than created.
    pub existing_branch: bool,
}

/// Adds a worktree for `branch` under `base_dir`.
///
/// A new branch is started from `base` (HEAD when `None`). If the branch
/// already exists locally it is checked out instead and `base` is ignored.
///
/// # Errors
/// Returns [`crate::error::WttError::WorktreeCreate`] with git's output if
/// git refuses, e.g. because the target path already exists.
pub fn create(
    git: &Git,
    repo_root: &Path,
    base_dir: &Path,
    branch: &str,
    base: Option<&str>,
) -> Result<CreatedWorktree> {
    let path = base_dir.join(sanitize_branch_name(branch));
    let existing_branch = git.branch_exists(repo_root, branch)?;

    if existing_branch {
        info!("branch {branch} exists, checking it out");
        git.add_worktree(repo_root, &path, branch, false, None)?;
    } else {
        git.add_worktree(repo_root, &path, branch, true, base)?;
    }

    Ok(CreatedWorktree {
        path,
        existing_branch,
    })
}

/// Removes the worktree at `path`, then its parent directory if that is left
/// empty.
///
/// # Errors
/// Returns [`crate::error::WttError::WorktreeRemove`] with git's output if
/// git refuses, e.g. because the tree is dirty and `force` is not set.
pub fn remove(git: &Git, repo_root: &Path, path: &Path, force: bool) -> Result<()> {
    git.remove_worktree(repo_root, path, force)?;
    if let Some(parent) = path.parent() {
        prune_empty_dir(parent);
    }
    Ok(())
}

fn prune_empty_dir(dir: &Path) {
    let is_empty = fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none());
    if is_empty {
        match fs::remove_dir(dir) {
            Ok(()) => debug!("removed empty directory {}", dir.display()),
            Err(e) => debug!("could not remove {}: {e}", dir.display()),
        }
    }
}
