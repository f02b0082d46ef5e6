use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{Session, base_name};
use crate::config::RepoConfig;
use crate::namegen;
use crate::traits::{CommandSpec, Stdio};
use crate::worktree::{self, populate, run_post_create};

/// Program started by `create --claude`.
const COMPANION: &str = "claude";

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Branch to create or check out. A random name is used when `None`.
    pub branch: Option<String>,
    /// Start point for a new branch.
    pub base: Option<String>,
    /// Start the companion program in the new worktree afterwards.
    pub launch_companion: bool,
}

/// Creates and populates a worktree, returning its path.
///
/// # Errors
/// Returns an error if:
/// - There is no active repository
/// - `.wtt.toml` cannot be parsed
/// - The branch name is rejected by git
/// - `git worktree add` fails
///
/// Copy, symlink and post-create problems are printed as warnings only.
pub fn create_worktree(session: &Session, options: &CreateOptions) -> Result<PathBuf> {
    let repo_root = session.active_repo()?;
    let repo_name = base_name(&repo_root);
    let config = RepoConfig::load(&repo_root, &repo_name).context("loading config")?;

    let branch = match &options.branch {
        Some(branch) => branch.clone(),
        None => namegen::generate(&repo_name),
    };
    session.git.validate_branch_name(&repo_root, &branch)?;

    let base_dir = config.worktree_base_dir(&repo_root);
    session
        .console
        .say(format_args!("Creating worktree for branch {branch:?}..."));

    let created = worktree::create(
        &session.git,
        &repo_root,
        &base_dir,
        &branch,
        options.base.as_deref(),
    )?;

    if created.existing_branch {
        session
            .console
            .say(format_args!("Checked out existing branch {branch:?}"));
        if let Some(base) = &options.base {
            session
                .console
                .warn(format_args!("--base {base} ignored because the branch already exists"));
        }
    }

    let report = populate(&config, &repo_root, &created.path);
    let post_create = run_post_create(
        session.runner.as_ref(),
        &session.console,
        &created.path,
        &config.post_create,
    );
    for advisory in report.advisories.iter().chain(&post_create) {
        session.console.warn(advisory);
    }

    if options.launch_companion {
        launch_companion(session, &created.path);
    }

    Ok(created.path)
}

fn launch_companion(session: &Session, worktree: &Path) {
    let spec = CommandSpec::new(COMPANION)
        .current_dir(worktree)
        .stdio(Stdio::Terminal);

    match session.runner.run(&spec) {
        Ok(output) if output.success() => {}
        Ok(output) => session.console.say(format_args!(
            "{COMPANION} exited with status {}",
            output
                .status
                .map_or_else(|| "signal".to_string(), |code| code.to_string())
        )),
        Err(e) => session
            .console
            .warn(format_args!("could not start {COMPANION}: {e}")),
    }
}
