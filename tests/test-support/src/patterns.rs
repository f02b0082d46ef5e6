//! Fixtures shared by the create and config tests.

use anyhow::Result;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Writes `.wtt.toml` into the repository.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_wtt_config(repo_dir: &ChildPath, content: &str) -> Result<()> {
    repo_dir.child(".wtt.toml").write_str(content)?;
    Ok(())
}

/// Untracked files a developer typically wants in every worktree.
///
/// # Errors
/// Returns an error if a file cannot be written.
pub fn create_sample_local_files(repo_dir: &ChildPath) -> Result<()> {
    repo_dir.child(".env").write_str("API_KEY=secret\n")?;
    repo_dir
        .child(".vscode/settings.json")
        .write_str(r#"{"editor.tabSize": 2}"#)?;
    repo_dir
        .child(".claude/settings.local.json")
        .write_str(r#"{"permissions": {}}"#)?;
    Ok(())
}

/// Checks the result of creating a worktree with [`LOCAL_FILES_CONFIG`].
pub fn assert_local_files_populated(worktree: &ChildPath) {
    worktree.child(".env").assert("API_KEY=secret\n");
    worktree
        .child(".vscode/settings.json")
        .assert(predicate::str::contains("tabSize"));
    let link = worktree.child(".claude/settings.local.json");
    link.assert(predicate::path::is_symlink());
    link.assert(predicate::str::contains("permissions"));
}

/// Configuration that brings the files from [`create_sample_local_files`]
/// into new worktrees.
pub const LOCAL_FILES_CONFIG: &str = r#"copy_files = [".env", ".gitignore"]
copy_dirs = [".vscode"]
symlink_files = [".claude/settings.local.json"]
"#;
