use anyhow::Context;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::git::Git;

const REPOS_FILE: &str = "repos";
const CURRENT_FILE: &str = "current_repo";

static TMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Outcome of [`RepoRegistry::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Removal {
    /// The path was in the known-repos list.
    pub removed: bool,
    /// The path was also the current repo, which is now unset.
    pub cleared_current: bool,
}

/// File-backed list of known repositories plus the "current repo" pointer.
///
/// Nothing is cached: every call reads or rewrites the files under the
/// storage directory. Writes go through a temporary file and a rename, so a
/// concurrent reader sees either the old or the new list. Concurrent writers
/// are not coordinated and the last one wins.
pub struct RepoRegistry {
    root_dir: PathBuf,
}

impl RepoRegistry {
    /// Opens the registry at `override_dir`, or at `~/.config/wtt`.
    ///
    /// # Errors
    /// Returns an error if no override is given and the home directory
    /// cannot be determined.
    pub fn new(override_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let root_dir = match override_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("Failed to get user home directory")?
                .join(".config")
                .join("wtt"),
        };
        Ok(Self { root_dir })
    }

    /// Opens the registry stored in `root_dir`.
    #[must_use]
    pub fn at(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn read_optional(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.root_dir.join(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, name: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.root_dir)?;
        let target = self.root_dir.join(name);
        let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_path = self
            .root_dir
            .join(format!(".{name}.{}.{seq}.tmp", std::process::id()));
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!("wrote {}", target.display());
        Ok(())
    }

    /// All registered repository paths in registration order.
    ///
    /// # Errors
    /// Returns an error if the list exists but cannot be read.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let Some(content) = self.read_optional(REPOS_FILE)? else {
            return Ok(Vec::new());
        };
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    /// Appends `path` unless it is already registered. Returns whether the
    /// list changed.
    ///
    /// # Errors
    /// Returns an error if the list cannot be read or written.
    pub fn register(&self, path: &Path) -> Result<bool> {
        let mut repos = self.list()?;
        if repos.iter().any(|known| known == path) {
            return Ok(false);
        }
        repos.push(path.to_path_buf());
        self.replace_all(&repos)?;
        Ok(true)
    }

    /// Drops `path` from the list and unsets the current repo if it pointed
    /// at the same path.
    ///
    /// # Errors
    /// Returns an error if either file cannot be read or written.
    pub fn remove(&self, path: &Path) -> Result<Removal> {
        let repos = self.list()?;
        let remaining: Vec<PathBuf> = repos.iter().filter(|r| *r != path).cloned().collect();

        let mut removal = Removal::default();
        if remaining.len() != repos.len() {
            self.replace_all(&remaining)?;
            removal.removed = true;
        }

        if self.current()?.as_deref() == Some(path) {
            self.clear_current()?;
            removal.cleared_current = true;
        }

        Ok(removal)
    }

    /// Rewrites the whole list.
    ///
    /// # Errors
    /// Returns an error if the list cannot be written.
    pub fn replace_all(&self, repos: &[PathBuf]) -> Result<()> {
        let content: String = repos
            .iter()
            .map(|repo| format!("{}\n", repo.display()))
            .collect();
        self.write_atomic(REPOS_FILE, &content)
    }

    /// The saved current repo, `None` when unset.
    ///
    /// # Errors
    /// Returns an error if the pointer exists but cannot be read.
    pub fn current(&self) -> Result<Option<PathBuf>> {
        let current = self
            .read_optional(CURRENT_FILE)?
            .map(|content| content.trim().to_string())
            .filter(|line| !line.is_empty())
            .map(PathBuf::from);
        Ok(current)
    }

    /// # Errors
    /// Returns an error if the pointer cannot be written.
    pub fn set_current(&self, path: &Path) -> Result<()> {
        self.write_atomic(CURRENT_FILE, &format!("{}\n", path.display()))
    }

    /// # Errors
    /// Returns an error if the pointer exists but cannot be deleted.
    pub fn clear_current(&self) -> Result<()> {
        match fs::remove_file(self.root_dir.join(CURRENT_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves every known path to its main working directory, drops the
    /// ones git no longer recognises and removes duplicates, keeping
    /// first-seen order. The list is rewritten only if it changed.
    ///
    /// # Errors
    /// Returns an error if the list cannot be read or written. Paths that
    /// fail to resolve are dropped, not reported.
    pub fn canonicalize(&self, git: &Git) -> Result<Vec<PathBuf>> {
        let repos = self.list()?;
        let mut canonical: Vec<PathBuf> = Vec::with_capacity(repos.len());

        for repo in &repos {
            match git.main_root_of(repo) {
                Ok(main) => {
                    if !canonical.contains(&main) {
                        canonical.push(main);
                    }
                }
                Err(e) => debug!("dropping {} from registry: {e}", repo.display()),
            }
        }

        if canonical != repos {
            self.replace_all(&canonical)?;
        }
        Ok(canonical)
    }
}
