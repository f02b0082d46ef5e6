use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{Picked, Session, worktree_rows};

/// Lets the user pick any worktree of the active repository, the main one
/// included. Returns `None` when the picker is cancelled.
///
/// # Errors
/// Returns an error if there is no active repository, listing fails, or the
/// picker fails.
pub fn list_worktrees(session: &Session) -> Result<Option<PathBuf>> {
    let repo_root = session.active_repo()?;
    let worktrees = session
        .git
        .list_worktrees(&repo_root)
        .context("listing worktrees")?;

    let list = worktree_rows("Select a worktree:", "no worktrees found", &worktrees);
    match session.pick_from(&list, &worktrees)? {
        Picked::One(wt) => Ok(Some(wt.path)),
        Picked::Cleared | Picked::Cancelled => Ok(None),
    }
}
