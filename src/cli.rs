use std::{
    env, io,
    path::{Path, PathBuf},
};

use clap::{CommandFactory, Parser, Subcommand, command};
use clap_complete::{Shell, generate};

use crate::{
    config::resolve_config,
    errors::{ConfigError, Result},
    hooks::{remove_all, synchronize},
    manifest::{project_root_from_node_modules, read_manifest},
    utils::{format_list, print_info, print_success, print_warning},
};

/// Environment variable that skips installation entirely (set to `1` or
/// `true`). Read here, at the edge - the core never touches the environment.
pub const SKIP_INSTALL_ENV: &str = "SKIP_HOOKSYNC_INSTALL";

#[derive(Subcommand)]
enum Commands {
    /// Install subcommand (the default when no subcommand is given).
    /// Synchronizes the repository's hook scripts with the configuration.
    #[command(short_flag = 'i')]
    Install {
        /// Path to a configuration file, overriding source discovery
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Uninstall subcommand
    /// Removes every managed hook script, honoring preserveUnused.
    #[command(short_flag = 'u')]
    Uninstall,

    /// Package-manager postinstall entry point.
    /// Derives the project root from the install path, checks that the
    /// project declares hooksync as a (dev) dependency, then installs.
    /// Never fails the surrounding install.
    Postinstall,

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Parser)]
#[command(about = "Installs and synchronizes git hook scripts from a declarative\n\
configuration file (.hooksync.toml/.yaml/.json or a package.json field).")]
#[command(help_template = "{about}\n\nUSAGE:\n{usage}\n\n{all-args}\n")]
#[command(name = "hooksync")]
pub struct Cli {
    /// Commands
    #[command(subcommand)]
    command: Option<Commands>,
}

/// # `run`
/// Runs the program.
///
/// ## Errors
/// Returns an error if the selected command fails; `main` translates this
/// into a non-zero exit code. Skips (skip switch set, no repository found)
/// are successful no-ops.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let project_root = env::current_dir()?;
    let skip_install = env::var(SKIP_INSTALL_ENV).is_ok_and(|value| value == "1" || value == "true");

    match cli.command.unwrap_or(Commands::Install { config: None }) {
        Commands::Install { config } => {
            if skip_install {
                print_info(
                    "Skipping hook installation",
                    &format!("{SKIP_INSTALL_ENV} is set."),
                );
                return Ok(());
            }

            install(&project_root, config.as_deref())
        }
        Commands::Uninstall => uninstall(&project_root),
        Commands::Postinstall => {
            if skip_install {
                print_info(
                    "Skipping hook installation",
                    &format!("{SKIP_INSTALL_ENV} is set."),
                );
                return Ok(());
            }

            postinstall(&project_root);

            Ok(())
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "hooksync", &mut io::stdout());

            Ok(())
        }
    }
}

fn install(project_root: &Path, explicit_config: Option<&Path>) -> Result<()> {
    let Some(config) = resolve_config(project_root, explicit_config)? else {
        // The "not configured yet" condition; main turns the actionable
        // Display message into the exit-1 error line.
        return Err(ConfigError::NotFound.into());
    };

    let written = synchronize(project_root, &config)?;

    if written.is_empty() {
        print_info(
            "No hooks were installed",
            "The configuration declares no hook commands.",
        );
    } else {
        print_success(
            "Successfully set all git hooks",
            &format_list(&written),
        );
    }

    Ok(())
}

fn uninstall(project_root: &Path) -> Result<()> {
    // Best-effort config lookup: preserveUnused still applies on uninstall,
    // but a missing or broken config must not block removal.
    let config = resolve_config(project_root, None)
        .ok()
        .flatten()
        .unwrap_or_default();

    remove_all(project_root, &config)?;

    print_success(
        "Git hooks removed",
        "Managed hook scripts were deleted from the hooks directory.",
    );

    Ok(())
}

/// Runs the install flow from a package-manager lifecycle. Every failure is
/// reported and swallowed: a hook setup problem must never break the
/// consuming project's install.
fn postinstall(invoked_from: &Path) {
    let project_root = invoked_from
        .to_str()
        .and_then(project_root_from_node_modules)
        .map(PathBuf::from)
        .unwrap_or_else(|| invoked_from.to_path_buf());

    let declared = match read_manifest(&project_root) {
        Ok(manifest) => manifest.is_declared_dependency(),
        Err(error) => {
            print_info(
                "Skipping hook installation",
                &format!("Could not read the project manifest: {error}"),
            );
            return;
        }
    };

    if !declared {
        return;
    }

    match resolve_config(&project_root, None) {
        Ok(Some(config)) => match synchronize(&project_root, &config) {
            Ok(written) if written.is_empty() => {}
            Ok(written) => print_success("Successfully set all git hooks", &format_list(&written)),
            Err(error) => print_warning("Was not able to set git hooks", &error.to_string()),
        },
        Ok(None) => print_info(
            "No hook configuration found",
            "Add a .hooksync.toml file or a \"hooksync\" field to package.json to set up hooks.",
        ),
        Err(error) => print_warning("Was not able to set git hooks", &error.to_string()),
    }
}
