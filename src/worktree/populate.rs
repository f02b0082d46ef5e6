use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Advisory;
use crate::config::RepoConfig;
use crate::console::Console;
use crate::traits::{CommandRunner, CommandSpec, Stdio};

/// What [`populate`] did to a new worktree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Files and directories copied, relative to the worktree.
    pub copied: Vec<PathBuf>,
    /// Symlinks created, relative to the worktree.
    pub linked: Vec<PathBuf>,
    pub advisories: Vec<Advisory>,
}

/// Brings untracked local files from the main checkout at `source` into the
/// new worktree at `target`, as configured.
///
/// Sources that do not exist are skipped silently. Nothing here fails the
/// caller: problems end up in [`PopulateReport::advisories`].
#[must_use]
pub fn populate(config: &RepoConfig, source: &Path, target: &Path) -> PopulateReport {
    let mut report = PopulateReport::default();

    for entry in &config.copy_files {
        if is_glob(entry) {
            copy_matches(source, target, entry, &mut report);
        } else {
            copy_entry(source, target, Path::new(entry), &mut report);
        }
    }

    for entry in &config.copy_dirs {
        let src = source.join(entry);
        if !src.is_dir() {
            continue;
        }
        match copy_dir_recursive(&src, &target.join(entry)) {
            Ok(()) => report.copied.push(PathBuf::from(entry)),
            Err(e) => report
                .advisories
                .push(Advisory::new(format!("copy directory {entry}"), e)),
        }
    }

    for entry in &config.symlink_files {
        match symlink_entry(source, target, Path::new(entry)) {
            Ok(true) => report.linked.push(PathBuf::from(entry)),
            Ok(false) => {}
            Err(e) => report
                .advisories
                .push(Advisory::new(format!("symlink {entry}"), e)),
        }
    }

    report
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn copy_matches(source: &Path, target: &Path, pattern: &str, report: &mut PopulateReport) {
    let full = format!(
        "{}/{pattern}",
        glob::Pattern::escape(&source.to_string_lossy())
    );
    let paths = match glob::glob(&full) {
        Ok(paths) => paths,
        Err(e) => {
            report
                .advisories
                .push(Advisory::new(format!("copy {pattern}"), e));
            return;
        }
    };

    for path in paths {
        match path {
            Ok(path) => {
                if let Ok(relative) = path.strip_prefix(source) {
                    copy_entry(source, target, relative, report);
                }
            }
            Err(e) => report
                .advisories
                .push(Advisory::new(format!("copy {pattern}"), e)),
        }
    }
}

fn copy_entry(source: &Path, target: &Path, relative: &Path, report: &mut PopulateReport) {
    let src = source.join(relative);
    let dst = target.join(relative);

    let result = if src.is_dir() {
        copy_dir_recursive(&src, &dst).map(|()| true)
    } else {
        copy_file(&src, &dst)
    };

    match result {
        Ok(true) => report.copied.push(relative.to_path_buf()),
        Ok(false) => {}
        Err(e) => report
            .advisories
            .push(Advisory::new(format!("copy {}", relative.display()), e)),
    }
}

/// Returns `false` when `src` does not exist.
fn copy_file(src: &Path, dst: &Path) -> io::Result<bool> {
    if !src.exists() {
        return Ok(false);
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    debug!("copied {} -> {}", src.display(), dst.display());
    Ok(true)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let source_path = entry.path();
        let target_path = dst.join(entry.file_name());

        if source_path.is_dir() {
            copy_dir_recursive(&source_path, &target_path)?;
        } else {
            fs::copy(&source_path, &target_path)?;
        }
    }

    // Applied last so a read-only source directory can still be filled.
    fs::set_permissions(dst, fs::metadata(src)?.permissions())
}

/// Returns `false` when the source does not exist.
fn symlink_entry(source: &Path, target: &Path, relative: &Path) -> io::Result<bool> {
    let src = source.join(relative);
    if src.symlink_metadata().is_err() {
        return Ok(false);
    }

    let dst = target.join(relative);
    if dst.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists in the worktree", relative.display()),
        ));
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(&src, &dst)?;
    #[cfg(windows)]
    std::os::windows::fs::symlink_file(&src, &dst)?;

    debug!("linked {} -> {}", dst.display(), src.display());
    Ok(true)
}

/// Runs each command with `sh -c` inside `worktree`, in order.
///
/// Output goes to stderr. A failing command is reported and the rest still
/// run.
pub fn run_post_create(
    runner: &dyn CommandRunner,
    console: &Console,
    worktree: &Path,
    commands: &[String],
) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    for command in commands {
        console.say(format_args!("Running: {command}"));
        let spec = CommandSpec::new("sh")
            .args(["-c", command.as_str()])
            .current_dir(worktree)
            .stdio(Stdio::Diagnostic);

        let action = format!("post_create command `{command}`");
        match runner.run(&spec) {
            Ok(output) if output.success() => {}
            Ok(output) => advisories.push(Advisory::new(
                action,
                match output.status {
                    Some(code) => format!("exited with status {code}"),
                    None => "terminated by signal".to_string(),
                },
            )),
            Err(e) => advisories.push(Advisory::new(action, e)),
        }
    }

    advisories
}
