//! Per-repository configuration loaded from `.wtt.toml`.
//!
//! The file lives at the repository root and may set any of:
//!
//! ```toml
//! worktree_dir = "../myrepo-worktrees"
//! copy_files = [".env", ".gitignore"]
//! copy_dirs = [".vscode"]
//! symlink_files = [".claude/settings.local.json"]
//! post_create = ["npm install"]
//! ```
//!
//! A field that is present and non-empty replaces the built-in default
//! outright. Missing or empty fields keep the default. Lists are never merged
//! element by element.

use normalize_path::NormalizePath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WttError};

/// File name of the per-repository override file.
pub const CONFIG_FILE_NAME: &str = ".wtt.toml";

/// Scaffold written by `wtt init`.
pub const CONFIG_TEMPLATE: &str = r#"# wtt configuration

# Directory for worktrees (relative to repo root)
# worktree_dir = "../<reponame>-worktrees"

# Files to copy into new worktrees (glob patterns allowed)
copy_files = [".env", ".gitignore"]

# Directories to copy into new worktrees
# copy_dirs = []

# Files to symlink (shared with main repo) into new worktrees
symlink_files = [".claude/settings.local.json"]

# Commands to run after creating a worktree
# post_create = []
"#;

/// Effective settings for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Base directory for new worktrees, relative to the repository root or
    /// absolute.
    pub worktree_dir: String,
    pub copy_files: Vec<String>,
    pub copy_dirs: Vec<String>,
    pub symlink_files: Vec<String>,
    /// Shell commands run inside each new worktree.
    pub post_create: Vec<String>,
}

impl RepoConfig {
    #[must_use]
    pub fn defaults(repo_name: &str) -> Self {
        Self {
            worktree_dir: format!("../{repo_name}-worktrees"),
            copy_files: vec![".gitignore".to_string()],
            copy_dirs: Vec::new(),
            symlink_files: Vec::new(),
            post_create: Vec::new(),
        }
    }

    /// Loads `.wtt.toml` from `repo_root` and applies it over the defaults.
    ///
    /// # Errors
    /// Returns [`WttError::ConfigParse`] if the file exists but is not valid
    /// TOML for this schema, or an I/O error if it cannot be read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::path::Path;
    /// use wtt::config::RepoConfig;
    ///
    /// let config = RepoConfig::load(Path::new("/nonexistent/myrepo"), "myrepo")?;
    /// assert_eq!(config.worktree_dir, "../myrepo-worktrees");
    /// # Ok::<(), wtt::error::WttError>(())
    /// ```
    pub fn load(repo_root: &Path, repo_name: &str) -> Result<Self> {
        let defaults = Self::defaults(repo_name);
        let path = repo_root.join(CONFIG_FILE_NAME);

        if !path.exists() {
            return Ok(defaults);
        }

        let content = fs::read_to_string(&path)?;
        let overrides: RepoConfig =
            toml::from_str(&content).map_err(|source| WttError::ConfigParse {
                path: path.clone(),
                source,
            })?;

        Ok(defaults.overridden_by(overrides))
    }

    /// Field-wise precedence merge: non-empty values in `overrides` win.
    #[must_use]
    pub fn overridden_by(self, overrides: RepoConfig) -> Self {
        fn pick<T>(default: Vec<T>, custom: Vec<T>) -> Vec<T> {
            if custom.is_empty() { default } else { custom }
        }

        Self {
            worktree_dir: if overrides.worktree_dir.is_empty() {
                self.worktree_dir
            } else {
                overrides.worktree_dir
            },
            copy_files: pick(self.copy_files, overrides.copy_files),
            copy_dirs: pick(self.copy_dirs, overrides.copy_dirs),
            symlink_files: pick(self.symlink_files, overrides.symlink_files),
            post_create: pick(self.post_create, overrides.post_create),
        }
    }

    /// Absolute base directory for worktrees of the repository at
    /// `repo_root`, with `..` segments folded away.
    #[must_use]
    pub fn worktree_base_dir(&self, repo_root: &Path) -> PathBuf {
        let dir = Path::new(&self.worktree_dir);
        if dir.is_absolute() {
            dir.normalize()
        } else {
            repo_root.join(dir).normalize()
        }
    }
}
