//! Repository Operations
//!
//! Locates the administrative directory of a Git repository from any starting
//! path and resolves the directory hook scripts live in. Worktrees are
//! supported: a `.git` *file* containing a `gitdir: <path>` redirect is
//! followed, and a `commondir` pointer inside the target is resolved to the
//! directory shared across worktrees.

use std::{
    fs,
    path::{Component, Path, PathBuf},
    process::Command,
};

use regex::Regex;

use crate::{GIT_ROOT, errors::Result};

/// Subdirectory of the administrative directory holding hook scripts.
pub const HOOKS_DIR_NAME: &str = "hooks";

/// Finds the administrative `.git` directory from a starting path.
///
/// Walks from `start` up through its ancestors, testing each level for a
/// `.git` entry. A directory entry is returned as-is. A regular-file entry is
/// read as a `gitdir: <path>` redirect and followed; if the redirect target
/// contains a `commondir` pointer file, the pointer's content is resolved
/// against the target to reach the shared worktree directory.
///
/// The walk is purely read-only and nothing is cached: repeated calls always
/// reflect the current filesystem state.
///
/// # Arguments
/// * `start` - Any path inside the repository (a file or a directory).
///
/// # Errors
/// * If the redirect file or the `commondir` pointer cannot be read.
///
/// # Returns
/// * `Ok(Some(path))` - The resolved administrative directory.
/// * `Ok(None)` - No `.git` entry exists at any ancestor level. Reaching the
///   filesystem root without a match is not an error; the caller decides
///   whether an absent repository is fatal.
pub fn locate_admin_directory(start: &Path) -> Result<Option<PathBuf>> {
    for dir in start.ancestors() {
        let marker = dir.join(GIT_ROOT);

        let Ok(metadata) = fs::symlink_metadata(&marker) else {
            continue;
        };

        if metadata.is_dir() {
            return Ok(Some(marker));
        }

        if metadata.is_file() {
            return follow_gitdir_redirect(dir, &marker);
        }
    }

    Ok(None)
}

/// Resolves the directory hook scripts are read from and written to.
///
/// A `core.hooksPath` override in the repository configuration wins: it is
/// queried through `git config` as a best-effort external call (any failure
/// falls back silently, it never aborts the resolution). An absolute override
/// is used as-is, a relative one is resolved against `project_root`.
/// Without an override the result is `<admin directory>/hooks`.
///
/// # Errors
/// * If the ancestor walk fails while reading a redirect file.
///
/// # Returns
/// * `Ok(Some(path))` - The hooks directory (it may not exist yet).
/// * `Ok(None)` - No repository was found. Callers must treat this as a skip
///   condition, not a crash: the tool may run outside a repository, e.g.
///   during a nested dependency install.
pub fn resolve_hooks_directory(project_root: &Path) -> Result<Option<PathBuf>> {
    if let Some(custom) = configured_hooks_path(project_root) {
        let custom = PathBuf::from(custom);
        let resolved = if custom.is_absolute() {
            custom
        } else {
            project_root.join(custom)
        };

        return Ok(Some(resolved));
    }

    Ok(locate_admin_directory(project_root)?.map(|admin| admin.join(HOOKS_DIR_NAME)))
}

/// Normalizes a path lexically, resolving `.` and `..` components without
/// touching the filesystem. Parent components that would escape the path's
/// root are dropped.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}

/// Follows a `gitdir: <path>` redirect file found at `marker` inside
/// `containing_dir`, resolving worktree `commondir` indirection.
fn follow_gitdir_redirect(containing_dir: &Path, marker: &Path) -> Result<Option<PathBuf>> {
    let content = fs::read_to_string(marker)?;
    let pattern = gitdir_pattern()?;

    let Some(target) = pattern
        .captures(&content)
        .and_then(|captures| captures.get(1))
        .map(|match_| match_.as_str().trim())
    else {
        // A .git file that is not a redirect is not a repository marker.
        return Ok(None);
    };

    let target = PathBuf::from(target);
    let mut admin = if target.is_absolute() {
        target
    } else {
        containing_dir.join(target)
    };

    let pointer = admin.join("commondir");
    if pointer.is_file() {
        let common = fs::read_to_string(&pointer)?;
        let common = PathBuf::from(common.trim());

        admin = if common.is_absolute() {
            common
        } else {
            admin.join(common)
        };
    }

    Ok(Some(normalize_lexically(&admin)))
}

/// Best-effort read of the `core.hooksPath` repository configuration.
///
/// Failures of any kind (git not installed, not a repository, key unset) fall
/// back silently to `None`.
fn configured_hooks_path(project_root: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "core.hooksPath"])
        .current_dir(project_root)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();

    if value.is_empty() { None } else { Some(value) }
}

/// Returns the regex matching a `gitdir: <path>` redirect line.
///
/// # Errors
/// * If the regex cannot be compiled
fn gitdir_pattern() -> Result<Regex> {
    Regex::new(r"(?m)^gitdir:[ \t]*(.+?)[ \t\r]*$").map_err(Into::into)
}
