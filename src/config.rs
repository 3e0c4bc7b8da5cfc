//! Configuration Resolution Module for hooksync
//!
//! This module handles discovery, parsing, and validation of the hook
//! configuration, including
//! - The precedence-ordered list of candidate config files
//! - The embedded `hooksync` field of package.json (inline table or a
//!   one-level path redirect)
//! - Structural validation of the resolved key set
//!
//! # Configuration Structure
//!
//! A configuration maps hook names (members of
//! [`VALID_GIT_HOOKS`](crate::hooks::VALID_GIT_HOOKS)) to shell command
//! strings, plus the optional `preserveUnused` directive whose value is either
//! a boolean (applying to every hook) or a list of hook names to exempt from
//! removal.
//!
//! # Resolution Semantics
//!
//! Candidate sources are consulted strictly in order. Each source is absent
//! (try the next), structurally invalid (fail the whole resolution - an
//! invalid match never falls through to a later source), or valid (wins).
//! A source that fails to *load* (missing file, parse error) counts as
//! absent; only a source that loads but carries unrecognized keys is invalid.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs, io,
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{ConfigError, HooksyncError, Result},
    hooks::VALID_GIT_HOOKS,
    manifest::{self, CONFIG_FIELD, MANIFEST_FILE_NAME},
    utils::print_warning,
};

/// The single recognized option key.
pub const PRESERVE_UNUSED_KEY: &str = "preserveUnused";

/// Dedicated config file candidates, in precedence order: dot-prefixed and
/// bare variants for each supported format, TOML first, then YAML, then JSON.
pub const CONFIG_FILE_CANDIDATES: [&str; 6] = [
    ".hooksync.toml",
    "hooksync.toml",
    ".hooksync.yaml",
    "hooksync.yaml",
    ".hooksync.json",
    "hooksync.json",
];

/// A single configuration value.
///
/// Hook entries carry a command string; the `preserveUnused` option carries
/// either a boolean or a list of hook names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Toggle(bool),
    Command(String),
    HookList(Vec<String>),
}

/// The preserve-unused exemption computed from a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreserveUnused {
    /// No exemption: every unconfigured hook script is removed.
    Disabled,
    /// Every unconfigured hook script is left in place.
    All,
    /// Exactly these hook names are left in place.
    Listed(BTreeSet<String>),
}

/// A resolved hook configuration: recognized keys mapped to their values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HookConfig {
    entries: BTreeMap<String, ConfigValue>,
}

impl HookConfig {
    /// Builds a configuration from raw entries. Mostly useful in tests; real
    /// configurations come out of [`resolve_config`].
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        HookConfig {
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the configured command for a hook, if any.
    #[must_use]
    pub fn command_for(&self, hook: &str) -> Option<&str> {
        match self.entries.get(hook) {
            Some(ConfigValue::Command(command)) => Some(command),
            _ => None,
        }
    }

    /// Computes the preserve-unused exemption.
    ///
    /// The value is interpreted permissively: `true` means every hook,
    /// a list of hook names means exactly those, anything else (including
    /// `false` and absence) means none.
    #[must_use]
    pub fn preserve_unused(&self) -> PreserveUnused {
        match self.entries.get(PRESERVE_UNUSED_KEY) {
            Some(ConfigValue::Toggle(true)) => PreserveUnused::All,
            Some(ConfigValue::HookList(hooks)) => {
                PreserveUnused::Listed(hooks.iter().cloned().collect())
            }
            _ => PreserveUnused::Disabled,
        }
    }

    /// Whether `hook` is exempt from removal during synchronization.
    #[must_use]
    pub fn preserves(&self, hook: &str) -> bool {
        match self.preserve_unused() {
            PreserveUnused::Disabled => false,
            PreserveUnused::All => true,
            PreserveUnused::Listed(hooks) => hooks.contains(hook),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the configuration's keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Validates a configuration's key set.
///
/// A configuration is valid iff every key is a recognized hook name or a
/// recognized option name. Validation is purely structural; value types are
/// not inspected beyond what synchronization needs.
#[must_use]
pub fn validate(config: &HookConfig) -> bool {
    unknown_keys(config).is_empty()
}

/// Returns every key that is neither a valid hook name nor a recognized
/// option, in configuration order.
#[must_use]
pub fn unknown_keys(config: &HookConfig) -> Vec<String> {
    config
        .keys()
        .filter(|key| !VALID_GIT_HOOKS.contains(key) && *key != PRESERVE_UNUSED_KEY)
        .map(String::from)
        .collect()
}

/// Outcome of probing a single configuration source.
#[derive(Debug)]
enum SourceOutcome {
    /// The source does not exist or could not be loaded as data.
    Absent,
    /// The source loaded but its key set failed validation.
    Invalid(ConfigError),
    /// The source loaded and validated.
    Found(HookConfig),
}

#[derive(Debug, Clone, Copy)]
enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

/// Resolves the hook configuration for a project.
///
/// Sources are consulted in strict precedence order:
/// 1. `explicit`, when supplied (a CLI positional), regardless of extension;
/// 2. the [`CONFIG_FILE_CANDIDATES`] inside `project_root`;
/// 3. the `hooksync` field of `package.json` - an inline table, or a string
///    treated as a path and followed through a single level of indirection.
///
/// # Errors
/// * `ConfigError::UnrecognizedKeys` when a matched source carries keys
///   outside the valid hook/option sets. This is fatal: an invalid match
///   never falls through to a later source.
/// * `HooksyncError::InvalidInput` when the manifest field is neither a
///   table nor a string.
///
/// # Returns
/// * `Ok(Some(config))` - the first valid non-empty source.
/// * `Ok(None)` - no candidate source yielded data. This is the normal
///   "not configured yet" condition; callers surface it as user-actionable.
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<Option<HookConfig>> {
    resolve_config_inner(project_root, explicit, false)
}

fn resolve_config_inner(
    project_root: &Path,
    explicit: Option<&Path>,
    via_redirect: bool,
) -> Result<Option<HookConfig>> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        };

        match load_config_file(&path, &formats_for(&path)) {
            SourceOutcome::Found(config) => return Ok(Some(config)),
            SourceOutcome::Invalid(error) => return Err(error.into()),
            // A redirect target is terminal: absent means unconfigured, it
            // never re-enters the candidate list.
            SourceOutcome::Absent if via_redirect => return Ok(None),
            SourceOutcome::Absent => {}
        }
    }

    for candidate in CONFIG_FILE_CANDIDATES {
        let path = project_root.join(candidate);

        match load_config_file(&path, &formats_for(&path)) {
            SourceOutcome::Found(config) => return Ok(Some(config)),
            SourceOutcome::Invalid(error) => return Err(error.into()),
            SourceOutcome::Absent => {}
        }
    }

    resolve_config_from_manifest(project_root)
}

/// Probes the `hooksync` field of package.json, the last candidate source.
fn resolve_config_from_manifest(project_root: &Path) -> Result<Option<HookConfig>> {
    // A missing or unparsable manifest makes this source absent, not fatal.
    let Ok(manifest) = manifest::read_manifest(project_root) else {
        return Ok(None);
    };

    match manifest.config_field() {
        None => Ok(None),
        Some(Value::String(redirect)) => {
            // Single level of indirection, by construction: the target is
            // loaded as a plain data file and data files cannot redirect.
            resolve_config_inner(project_root, Some(Path::new(redirect)), true)
        }
        Some(value @ Value::Object(_)) => {
            match serde_json::from_value::<HookConfig>(value.clone()) {
                Ok(config) if config.is_empty() => Ok(None),
                Ok(config) => {
                    let unknown = unknown_keys(&config);

                    if unknown.is_empty() {
                        Ok(Some(config))
                    } else {
                        Err(ConfigError::UnrecognizedKeys {
                            source_name: format!("{MANIFEST_FILE_NAME} \"{CONFIG_FIELD}\" field"),
                            keys: unknown,
                        }
                        .into())
                    }
                }
                Err(_) => {
                    print_warning(
                        "Ignoring malformed manifest configuration",
                        &format!(
                            "The \"{CONFIG_FIELD}\" field of {MANIFEST_FILE_NAME} does not map hook names to command strings."
                        ),
                    );
                    Ok(None)
                }
            }
        }
        Some(_) => Err(HooksyncError::InvalidInput(format!(
            "The \"{CONFIG_FIELD}\" field of {MANIFEST_FILE_NAME} must be a table of hooks or a path to a config file"
        ))),
    }
}

/// Loads and validates one candidate file, trying each of `formats` in turn.
fn load_config_file(path: &Path, formats: &[ConfigFormat]) -> SourceOutcome {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == io::ErrorKind::PermissionDenied => {
            // Historically indistinguishable from not-found; worth a line.
            print_warning(
                "Skipping unreadable configuration file",
                &format!("{} exists but could not be read: {error}", path.display()),
            );
            return SourceOutcome::Absent;
        }
        Err(_) => return SourceOutcome::Absent,
    };

    let Some(config) = formats
        .iter()
        .find_map(|format| parse_config(&content, *format))
    else {
        // Unparsable content is an absent source, not an invalid one.
        return SourceOutcome::Absent;
    };

    // First valid *non-empty* source wins; an empty table is absent.
    if config.is_empty() {
        return SourceOutcome::Absent;
    }

    let unknown = unknown_keys(&config);
    if unknown.is_empty() {
        SourceOutcome::Found(config)
    } else {
        SourceOutcome::Invalid(ConfigError::UnrecognizedKeys {
            source_name: path.display().to_string(),
            keys: unknown,
        })
    }
}

fn parse_config(content: &str, format: ConfigFormat) -> Option<HookConfig> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).ok(),
        ConfigFormat::Yaml => serde_yaml::from_str(content).ok(),
        ConfigFormat::Json => serde_json::from_str(content).ok(),
    }
}

/// Picks parse formats for a path: by extension when recognized, otherwise
/// every supported format is probed in order.
fn formats_for(path: &Path) -> Vec<ConfigFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => vec![ConfigFormat::Toml],
        Some("yaml" | "yml") => vec![ConfigFormat::Yaml],
        Some("json") => vec![ConfigFormat::Json],
        _ => vec![ConfigFormat::Toml, ConfigFormat::Yaml, ConfigFormat::Json],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HooksyncError;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, content: &str) {
        fs::write(root.join("package.json"), content).unwrap();
    }

    #[test]
    fn test_resolves_toml_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".hooksync.toml"),
            "\"pre-commit\" = \"cargo fmt --check\"\n\"pre-push\" = \"cargo test\"\n",
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("cargo fmt --check"));
        assert_eq!(config.command_for("pre-push"), Some("cargo test"));
    }

    #[test]
    fn test_resolves_yaml_and_json_config_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("hooksync.yaml"),
            "pre-commit: make lint\n",
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("make lint"));

        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".hooksync.json"),
            r#"{"commit-msg": "verify-msg"}"#,
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("commit-msg"), Some("verify-msg"));
    }

    #[test]
    fn test_dedicated_file_wins_over_manifest_field() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".hooksync.toml"),
            "\"pre-commit\" = \"from-file\"\n",
        )
        .unwrap();
        write_manifest(
            temp_dir.path(),
            r#"{"hooksync": {"pre-commit": "from-manifest"}}"#,
        );

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("from-file"));
    }

    #[test]
    fn test_invalid_source_does_not_fall_through() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".hooksync.toml"),
            "\"not-a-hook\" = \"x\"\n",
        )
        .unwrap();
        // A perfectly valid later source must never be consulted.
        write_manifest(
            temp_dir.path(),
            r#"{"hooksync": {"pre-commit": "from-manifest"}}"#,
        );

        let result = resolve_config(temp_dir.path(), None);
        assert!(matches!(
            result,
            Err(HooksyncError::Config(ConfigError::UnrecognizedKeys { .. }))
        ));
    }

    #[test]
    fn test_unrecognized_keys_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("hooksync.json"),
            r#"{"pre-commit": "ok", "not-a-hook": "x"}"#,
        )
        .unwrap();

        match resolve_config(temp_dir.path(), None) {
            Err(HooksyncError::Config(ConfigError::UnrecognizedKeys { keys, .. })) => {
                assert_eq!(keys, vec!["not-a-hook".to_string()]);
            }
            other => panic!("expected UnrecognizedKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_failure_counts_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".hooksync.toml"), "{{{ not toml").unwrap();
        write_manifest(temp_dir.path(), r#"{"hooksync": {"pre-push": "lint"}}"#);

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-push"), Some("lint"));
    }

    #[test]
    fn test_empty_source_counts_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".hooksync.json"), "{}").unwrap();
        write_manifest(temp_dir.path(), r#"{"hooksync": {"pre-push": "lint"}}"#);

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-push"), Some("lint"));
    }

    #[test]
    fn test_manifest_inline_config() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(
            temp_dir.path(),
            r#"{"name": "demo", "hooksync": {"pre-commit": "npm test", "preserveUnused": true}}"#,
        );

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("npm test"));
        assert_eq!(config.preserve_unused(), PreserveUnused::All);
    }

    #[test]
    fn test_manifest_string_redirect() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), r#"{"hooksync": "hooks/commands.json"}"#);
        fs::create_dir_all(temp_dir.path().join("hooks")).unwrap();
        fs::write(
            temp_dir.path().join("hooks").join("commands.json"),
            r#"{"pre-commit": "redirected"}"#,
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), None).unwrap().unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("redirected"));
    }

    #[test]
    fn test_manifest_redirect_to_missing_file_is_unconfigured() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), r#"{"hooksync": "nowhere.json"}"#);

        let config = resolve_config(temp_dir.path(), None).unwrap();
        assert_eq!(config, None);
    }

    #[test]
    fn test_manifest_field_of_wrong_type_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), r#"{"hooksync": 42}"#);

        assert!(matches!(
            resolve_config(temp_dir.path(), None),
            Err(HooksyncError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".hooksync.toml"),
            "\"pre-commit\" = \"from-candidate\"\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("custom.toml"),
            "\"pre-commit\" = \"from-explicit\"\n",
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), Some(Path::new("custom.toml")))
            .unwrap()
            .unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("from-explicit"));
    }

    #[test]
    fn test_explicit_path_without_extension_probes_every_format() {
        // TOML content: the first probed format succeeds.
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("hookrc"),
            "\"pre-commit\" = \"from-toml\"\n",
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), Some(Path::new("hookrc")))
            .unwrap()
            .unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("from-toml"));

        // YAML content: the TOML probe fails and the fallback kicks in.
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("hookrc"), "pre-push: from-yaml\n").unwrap();

        let config = resolve_config(temp_dir.path(), Some(Path::new("hookrc")))
            .unwrap()
            .unwrap();
        assert_eq!(config.command_for("pre-push"), Some("from-yaml"));
    }

    #[test]
    fn test_missing_explicit_path_falls_through() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("hooksync.toml"),
            "\"pre-commit\" = \"fallback\"\n",
        )
        .unwrap();

        let config = resolve_config(temp_dir.path(), Some(Path::new("missing.toml")))
            .unwrap()
            .unwrap();
        assert_eq!(config.command_for("pre-commit"), Some("fallback"));
    }

    #[test]
    fn test_nothing_configured() {
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(resolve_config(temp_dir.path(), None).unwrap(), None);
    }

    #[test]
    fn test_validate_rejects_unknown_keys() {
        let config = HookConfig::from_entries([(
            "not-a-hook".to_string(),
            ConfigValue::Command("x".to_string()),
        )]);

        assert!(!validate(&config));
        assert_eq!(unknown_keys(&config), vec!["not-a-hook".to_string()]);
    }

    #[test]
    fn test_validate_accepts_hooks_and_options() {
        let config = HookConfig::from_entries([
            (
                "pre-commit".to_string(),
                ConfigValue::Command("cargo test".to_string()),
            ),
            (PRESERVE_UNUSED_KEY.to_string(), ConfigValue::Toggle(true)),
        ]);

        assert!(validate(&config));
    }

    #[test]
    fn test_preserve_unused_interpretation() {
        let all = HookConfig::from_entries([(
            PRESERVE_UNUSED_KEY.to_string(),
            ConfigValue::Toggle(true),
        )]);
        assert_eq!(all.preserve_unused(), PreserveUnused::All);
        assert!(all.preserves("post-commit"));

        let disabled = HookConfig::from_entries([(
            PRESERVE_UNUSED_KEY.to_string(),
            ConfigValue::Toggle(false),
        )]);
        assert_eq!(disabled.preserve_unused(), PreserveUnused::Disabled);
        assert!(!disabled.preserves("post-commit"));

        let listed = HookConfig::from_entries([(
            PRESERVE_UNUSED_KEY.to_string(),
            ConfigValue::HookList(vec!["commit-msg".to_string()]),
        )]);
        assert!(listed.preserves("commit-msg"));
        assert!(!listed.preserves("pre-push"));

        assert_eq!(HookConfig::default().preserve_unused(), PreserveUnused::Disabled);
    }
}
