//! Test support utilities for wtt integration tests
//!
//! This crate provides shared test helpers and utilities for integration tests.
//! It's designed to be used only during development and testing, not published.

pub mod patterns;
pub mod test_env;

// Re-export commonly used items for convenience
pub use patterns::{
    LOCAL_FILES_CONFIG, assert_local_files_populated, create_sample_local_files, write_wtt_config,
};
pub use test_env::CliTestEnvironment;
