//! Integration tests for `wtt remove`

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;
use test_support::CliTestEnvironment;

#[test]
fn test_remove_by_branch_after_confirmation() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["create", "demo"])?.assert().success();
    let worktree = env.worktree_path("demo");

    env.run_command(&["remove", "demo"])?
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains(format!(
            "Remove worktree at {}? [y/N]",
            worktree.path().display()
        )))
        .stderr(predicate::str::contains("Removed worktree for branch \"demo\""));

    worktree.assert(predicate::path::missing());
    // The emptied container goes too.
    env.worktrees_dir().assert(predicate::path::missing());
    // The branch itself is kept.
    assert!(env.git(&["branch", "--list", "demo"])?.contains("demo"));
    Ok(())
}

#[test]
fn test_remove_declined_keeps_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["create", "demo"])?.assert().success();

    env.run_command(&["remove", "demo"])?
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Aborted."));

    env.worktree_path("demo").assert(predicate::path::is_dir());
    Ok(())
}

#[test]
fn test_remove_keeps_non_empty_container() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["create", "one"])?.assert().success();
    env.run_command(&["create", "two"])?.assert().success();

    env.run_command(&["remove", "one", "--force"])?
        .assert()
        .success();

    env.worktree_path("one").assert(predicate::path::missing());
    env.worktree_path("two").assert(predicate::path::is_dir());
    Ok(())
}

#[test]
fn test_force_removes_dirty_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["create", "dirty"])?.assert().success();
    let worktree = env.worktree_path("dirty");
    worktree.child("README.md").write_str("changed")?;

    env.run_command(&["remove", "dirty"])?
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("git worktree remove failed"));
    worktree.assert(predicate::path::is_dir());

    env.run_command(&["remove", "dirty", "-f"])?
        .assert()
        .success();
    worktree.assert(predicate::path::missing());
    Ok(())
}

#[test]
fn test_remove_nonexistent_branch() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["remove", "nope"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("no worktree found for branch \"nope\""));
    Ok(())
}

#[test]
fn test_remove_never_offers_main_worktree() -> Result<()> {
    let env = CliTestEnvironment::new()?;

    env.run_command(&["remove", "main"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("no worktree found for branch \"main\""));

    env.run_command(&["remove"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("no worktrees to remove"));

    env.repo_dir.assert(predicate::path::is_dir());
    Ok(())
}

#[test]
fn test_interactive_remove_selection() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["create", "first"])?.assert().success();
    env.run_command(&["create", "second"])?.assert().success();

    let number = env.menu_number(env.repo_dir.path(), &["remove"], "second")?;

    env.run_command(&["remove"])?
        .write_stdin(format!("{number}\ny\n"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Select a worktree to remove:"))
        .stderr(predicate::str::contains("] first"))
        .stderr(predicate::str::contains("] main ").not())
        .stderr(predicate::str::contains("Removed worktree for branch \"second\""));

    env.worktree_path("first").assert(predicate::path::is_dir());
    env.worktree_path("second")
        .assert(predicate::path::missing());
    Ok(())
}

#[test]
fn test_interactive_remove_cancelled() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.run_command(&["create", "keep"])?.assert().success();

    env.run_command(&["remove"])?
        .write_stdin("\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed").not());

    env.worktree_path("keep").assert(predicate::path::is_dir());
    Ok(())
}
