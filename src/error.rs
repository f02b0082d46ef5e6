use std::io;
use std::path::PathBuf;

/// Errors surfaced by the library layer.
///
/// Every variant is terminal for the command that produced it. Non-fatal
/// problems are reported as [`crate::worktree::Advisory`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum WttError {
    #[error("not inside a git repository (run 'wtt repo' to set a repo context)")]
    NotInRepository,

    #[error("failed to parse {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid branch name {0:?}")]
    InvalidBranchName(String),

    #[error("git worktree add failed:\n{output}")]
    WorktreeCreate { output: String },

    #[error("git worktree remove failed:\n{output}")]
    WorktreeRemove { output: String },

    #[error("picker: {0}")]
    Picker(String),

    #[error("{0}")]
    NoCandidates(String),

    #[error("no worktree found for branch {0:?}")]
    BranchNotFound(String),

    #[error("git {command} failed: {output}")]
    Git { command: String, output: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = WttError> = std::result::Result<T, E>;
