use anyhow::{Context, Result};

use super::{Picked, Session, worktree_rows};
use crate::error::WttError;
use crate::worktree;

/// Removes a linked worktree, chosen by branch or interactively. The main
/// worktree is never a candidate.
///
/// Without `force` the user must confirm, and git refuses to drop a tree
/// with local modifications.
///
/// # Errors
/// Returns an error if:
/// - There is no active repository
/// - No linked worktree is on `branch`, or there are none to pick from
/// - The picker fails
/// - `git worktree remove` fails
pub fn remove_worktree(session: &Session, branch: Option<&str>, force: bool) -> Result<()> {
    let repo_root = session.active_repo()?;
    let worktrees = session
        .git
        .list_worktrees(&repo_root)
        .context("listing worktrees")?;
    let removable = worktrees.get(1..).unwrap_or_default();

    let target = match branch {
        Some(branch) => removable
            .iter()
            .find(|wt| wt.is_on_branch(branch))
            .cloned()
            .ok_or_else(|| WttError::BranchNotFound(branch.to_string()))?,
        None => {
            let list = worktree_rows(
                "Select a worktree to remove:",
                "no worktrees to remove",
                removable,
            );
            match session.pick_from(&list, removable)? {
                Picked::One(wt) => wt,
                Picked::Cleared | Picked::Cancelled => return Ok(()),
            }
        }
    };
    let label = branch.unwrap_or_else(|| target.branch_name());

    if !force {
        let question = format!("Remove worktree at {}?", target.path.display());
        if !session.console.confirm(question)? {
            session.console.say("Aborted.");
            return Ok(());
        }
    }

    worktree::remove(&session.git, &repo_root, &target.path, force)?;
    session
        .console
        .say(format_args!("Removed worktree for branch {label:?}"));
    Ok(())
}
