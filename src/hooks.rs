//! Hook Synchronization Module
//!
//! Reconciles the scripts inside the repository's hooks directory with a
//! validated configuration: one executable script per configured hook,
//! removal of scripts for hooks no longer configured, and a preserve-unused
//! allow-list for scripts hooksync does not manage.

use std::{fs, os::unix::fs::PermissionsExt, path::Path};

use crate::{
    config::HookConfig,
    errors::Result,
    git::resolve_hooks_directory,
    utils::print_info,
};

/// Every hook name git recognizes. This set defines configuration validity:
/// a key outside it (other than recognized options) voids the whole config.
pub const VALID_GIT_HOOKS: [&str; 28] = [
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "proc-receive",
    "post-receive",
    "post-update",
    "reference-transaction",
    "push-to-checkout",
    "pre-auto-gc",
    "post-rewrite",
    "sendemail-validate",
    "fsmonitor-watchman",
    "p4-changelist",
    "p4-prepare-changelist",
    "p4-post-changelist",
    "p4-pre-submit",
    "post-index-change",
];

/// Environment variable checked *inside* every generated script: set to `1`
/// at commit time to skip the hook command.
pub const SKIP_HOOK_ENV: &str = "SKIP_HOOKSYNC";

/// Environment variable naming an init script the generated hook sources
/// before running its command.
pub const INIT_SCRIPT_ENV: &str = "HOOKSYNC_RC";

/// Permission bits applied to every written hook script.
const HOOK_MODE: u32 = 0o755;

/// Composes the body of a generated hook script: a shebang, the skip-switch
/// early exit, optional sourcing of a user init script, then the command.
#[must_use]
pub fn hook_script(command: &str) -> String {
    format!(
        "#!/bin/sh\n\n\
         if [ \"${SKIP_HOOK_ENV}\" = \"1\" ]; then\n    exit 0\nfi\n\n\
         if [ -n \"${INIT_SCRIPT_ENV}\" ] && [ -f \"${INIT_SCRIPT_ENV}\" ]; then\n    . \"${INIT_SCRIPT_ENV}\"\nfi\n\n\
         {command}\n"
    )
}

/// Reconciles the hooks directory with `config`.
///
/// Every name in [`VALID_GIT_HOOKS`] is visited, not only the configured
/// ones: configured hooks are written (overwriting any existing script) and
/// marked executable, unconfigured hooks are removed unless exempted by the
/// preserve-unused directive. After the call the scripts present are exactly
/// {configured} ∪ {preserved pre-existing}, whatever was there before.
///
/// # Errors
/// * Any filesystem failure while writing, chmod-ing, or removing a script.
///   Errors propagate unmodified and already-written hooks stay written.
///
/// # Returns
/// The hook names written, in [`VALID_GIT_HOOKS`] order. When no repository
/// is found the call logs, writes nothing, and returns an empty list: running
/// outside a repository is a skip, not a failure.
pub fn synchronize(project_root: &Path, config: &HookConfig) -> Result<Vec<String>> {
    let Some(hooks_dir) = resolve_hooks_directory(project_root)? else {
        print_info(
            "No git repository found",
            "Skipping hook synchronization - there is no hooks directory to write to.",
        );
        return Ok(Vec::new());
    };

    fs::create_dir_all(&hooks_dir)?;

    let mut written = Vec::new();

    for hook in VALID_GIT_HOOKS {
        let hook_path = hooks_dir.join(hook);

        if let Some(command) = config.command_for(hook) {
            fs::write(&hook_path, hook_script(command))?;
            fs::set_permissions(&hook_path, fs::Permissions::from_mode(HOOK_MODE))?;

            written.push(hook.to_string());
        } else if !config.preserves(hook) && hook_path.exists() {
            fs::remove_file(&hook_path)?;
        }
    }

    Ok(written)
}

/// Removes every managed hook script, honoring the preserve-unused exemption
/// of `config`. Used by the explicit uninstall flow.
///
/// # Errors
/// * Any filesystem failure while removing a script.
pub fn remove_all(project_root: &Path, config: &HookConfig) -> Result<()> {
    let Some(hooks_dir) = resolve_hooks_directory(project_root)? else {
        print_info(
            "No git repository found",
            "Skipping hook removal - there is no hooks directory to clean.",
        );
        return Ok(());
    };

    for hook in VALID_GIT_HOOKS {
        if config.preserves(hook) {
            continue;
        }

        let hook_path = hooks_dir.join(hook);
        if hook_path.exists() {
            fs::remove_file(&hook_path)?;
        }
    }

    Ok(())
}
