use anyhow::{Context, Result};
use std::path::PathBuf;

use super::Session;
use crate::error::WttError;

/// Finds the worktree that has `branch` checked out.
///
/// # Errors
/// Returns an error if:
/// - There is no active repository
/// - Listing worktrees fails
/// - No worktree is on `branch` ([`WttError::BranchNotFound`])
pub fn jump_to_branch(session: &Session, branch: &str) -> Result<PathBuf> {
    let repo_root = session.active_repo()?;
    let worktrees = session
        .git
        .list_worktrees(&repo_root)
        .context("listing worktrees")?;

    worktrees
        .into_iter()
        .find(|wt| wt.is_on_branch(branch))
        .map(|wt| wt.path)
        .ok_or_else(|| WttError::BranchNotFound(branch.to_string()).into())
}
