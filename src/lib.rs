pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod hooks;
pub mod manifest;
pub mod utils;

/// Administrative directory marker of a Git repository or worktree.
pub const GIT_ROOT: &str = ".git";
