//! Git Operations Module
//!
//! Repository-level functionality for the hooksync CLI tool: locating the
//! administrative `.git` directory (including worktree indirection) and
//! resolving the directory hook scripts are written to.

pub mod repository;

pub use repository::*;
