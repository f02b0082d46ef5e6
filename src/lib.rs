//! # wtt
//!
//! A thin layer over `git worktree` that creates, lists and removes linked
//! working directories, and remembers an active repository across shell
//! sessions for prompt integration.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the shell wrapper (lets wtt cd into new worktrees)
//! eval "$(wtt-bin --init zsh)"
//!
//! # Create a worktree for a new branch and cd into it
//! wtt create feature/auth
//!
//! # Jump to the worktree that has a branch checked out
//! wtt feature/auth
//!
//! # Pick a worktree with fzf (or a numbered prompt)
//! wtt list
//!
//! # Remove a worktree
//! wtt remove feature/auth
//!
//! # Work on another repository from anywhere
//! wtt repo
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - One module per CLI command and the shared [`commands::Session`]
//! - [`config`] - `.wtt.toml` loading and the built-in defaults
//! - [`git`] - `git worktree list --porcelain` parsing and git invocations
//! - [`registry`] - Known repositories and the current-repo pointer under `~/.config/wtt`
//! - [`selection`] - fzf picker with a numbered fallback
//! - [`worktree`] - Creating, populating and removing worktrees
//! - [`traits`] / [`runner`] - The subprocess port and its implementations

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod git;
pub mod namegen;
pub mod registry;
pub mod runner;
pub mod selection;
pub mod traits;
pub mod worktree;

pub use error::{Result, WttError};
