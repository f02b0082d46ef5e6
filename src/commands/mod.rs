//! One module per CLI command, plus the [`Session`] they share.

pub mod context;
pub mod create;
pub mod init;
pub mod jump;
pub mod list;
pub mod remove;
pub mod repo;
pub mod shell_init;

use anyhow::Context;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::console::Console;
use crate::error::{Result, WttError};
use crate::git::{Git, WorktreeRecord};
use crate::registry::RepoRegistry;
use crate::runner::SystemCommandRunner;
use crate::selection::{PickList, Selection, SelectionProvider, picker_for};
use crate::traits::CommandRunner;

/// Everything a command needs for one invocation.
pub struct Session {
    pub runner: Rc<dyn CommandRunner>,
    pub git: Git,
    pub registry: RepoRegistry,
    pub picker: Box<dyn SelectionProvider>,
    pub console: Rc<Console>,
    /// Directory the command was started from.
    pub cwd: PathBuf,
}

/// Outcome of [`Session::pick_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picked<T> {
    One(T),
    Cleared,
    Cancelled,
}

impl Session {
    /// Wires up real processes, the terminal and the per-user state directory.
    ///
    /// # Errors
    /// Returns an error if the current directory or the home directory
    /// cannot be determined.
    pub fn new(config_dir: Option<PathBuf>, no_fzf: bool) -> anyhow::Result<Self> {
        let runner: Rc<dyn CommandRunner> = Rc::new(SystemCommandRunner);
        let console = Rc::new(Console::stdio());
        let picker = picker_for(Rc::clone(&runner), Rc::clone(&console), no_fzf);

        Ok(Self {
            git: Git::new(Rc::clone(&runner)),
            registry: RepoRegistry::new(config_dir)?,
            picker,
            console,
            runner,
            cwd: std::env::current_dir().context("Failed to get current directory")?,
        })
    }

    /// The repository containing the working directory, or else the one saved
    /// with `wtt repo`.
    ///
    /// # Errors
    /// Returns [`WttError::NotInRepository`] when neither is available.
    pub fn resolve_repo_root(&self) -> Result<PathBuf> {
        match self.git.toplevel(&self.cwd) {
            Ok(root) => Ok(root),
            Err(_) => {
                let saved = self.registry.current().ok().flatten();
                debug!("not in a repository, saved context: {saved:?}");
                saved.ok_or(WttError::NotInRepository)
            }
        }
    }

    /// Best-effort registration so the repository shows up in `wtt repo`.
    pub fn auto_register(&self, repo_root: &Path) {
        match self.registry.register(repo_root) {
            Ok(true) => debug!("registered {}", repo_root.display()),
            Ok(false) => {}
            Err(e) => warn!("could not register {}: {e}", repo_root.display()),
        }
    }

    /// [`Session::resolve_repo_root`] followed by [`Session::auto_register`].
    ///
    /// # Errors
    /// Returns [`WttError::NotInRepository`] when there is no repository to
    /// work on.
    pub fn active_repo(&self) -> Result<PathBuf> {
        let repo_root = self.resolve_repo_root()?;
        self.auto_register(&repo_root);
        Ok(repo_root)
    }

    /// Runs the picker over `list` and maps the answer back onto `items`,
    /// which must be in row order.
    ///
    /// # Errors
    /// Returns whatever the picker returns.
    pub fn pick_from<T: Clone>(&self, list: &PickList, items: &[T]) -> Result<Picked<T>> {
        match self.picker.select(list)? {
            Selection::Chosen(i) => items
                .get(i)
                .cloned()
                .map(Picked::One)
                .ok_or_else(|| WttError::Picker(format!("selection {i} out of range"))),
            Selection::Cleared => Ok(Picked::Cleared),
            Selection::Cancelled => Ok(Picked::Cancelled),
        }
    }
}

/// One row per worktree: branch, then path.
pub(crate) fn worktree_rows(
    prompt: &str,
    empty_message: &str,
    worktrees: &[WorktreeRecord],
) -> PickList {
    worktrees.iter().fold(PickList::new(prompt, empty_message), |list, wt| {
        list.row([
            wt.display_branch().to_string(),
            wt.path.display().to_string(),
        ])
    })
}

/// Last path component, used as the human name of a repository.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    )
}
