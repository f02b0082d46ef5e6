use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{Picked, Session, base_name};
use crate::selection::PickList;

const NO_REPOS: &str =
    "No repos registered yet. Run any wtt command from inside a git repo first.";
const CLEAR_LABEL: &str = "(none) - clear repo context";

fn repo_rows(prompt: &str, repos: &[PathBuf]) -> PickList {
    repos.iter().fold(PickList::new(prompt, NO_REPOS), |list, repo| {
        list.row([base_name(repo), repo.display().to_string()])
    })
}

fn known_repos(session: &Session) -> Result<Vec<PathBuf>> {
    session
        .registry
        .canonicalize(&session.git)
        .context("loading known repos")
}

/// Picks a registered repository and makes it the current context. With
/// `offer_clear` the list starts with an entry that unsets the context.
///
/// # Errors
/// Returns an error if the registry cannot be read or written, or the
/// picker fails.
pub fn switch_repo(session: &Session, offer_clear: bool) -> Result<()> {
    let repos = known_repos(session)?;
    if repos.is_empty() {
        session.console.say(NO_REPOS);
        return Ok(());
    }

    let mut list = repo_rows("Select a repo:", &repos);
    if offer_clear {
        list = list.with_clear(CLEAR_LABEL);
    }

    match session.pick_from(&list, &repos)? {
        Picked::One(repo) => {
            session
                .registry
                .set_current(&repo)
                .context("saving repo context")?;
            session
                .console
                .say(format_args!("Switched to repo: {}", base_name(&repo)));
        }
        Picked::Cleared => {
            session
                .registry
                .clear_current()
                .context("clearing repo context")?;
            session.console.say("Cleared repo context.");
        }
        Picked::Cancelled => {}
    }
    Ok(())
}

/// Picks a registered repository and forgets it, clearing the current
/// context if it pointed there.
///
/// # Errors
/// Returns an error if the registry cannot be read or written, or the
/// picker fails.
pub fn remove_repo(session: &Session, force: bool) -> Result<()> {
    let repos = known_repos(session)?;
    if repos.is_empty() {
        session.console.say("No repos registered yet.");
        return Ok(());
    }

    let list = repo_rows("Select a repo to remove:", &repos);
    let repo = match session.pick_from(&list, &repos)? {
        Picked::One(repo) => repo,
        Picked::Cleared | Picked::Cancelled => return Ok(()),
    };
    let name = base_name(&repo);

    let question = format!("Remove {name} from known repos?");
    if !force && !session.console.confirm(&question)? {
        session.console.say("Aborted.");
        return Ok(());
    }

    let removal = session.registry.remove(&repo).context("removing repo")?;
    if removal.cleared_current {
        session
            .console
            .say(format_args!("Removed {name} and cleared repo context."));
    } else {
        session
            .console
            .say(format_args!("Removed {name} from known repos."));
    }
    Ok(())
}
