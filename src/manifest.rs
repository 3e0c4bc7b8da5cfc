//! Project Manifest Module
//!
//! Reads the consuming project's package.json: the dependency sections that
//! gate automated install flows, and the embedded `hooksync` configuration
//! field. Also hosts the node_modules path gymnastics the postinstall entry
//! point needs to find the real project root.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    errors::{ManifestError, Result},
    utils::print_warning,
};

/// The name this tool is published under, as it appears in dependency
/// sections and install paths.
pub const PACKAGE_NAME: &str = "hooksync";

/// The manifest field carrying embedded configuration.
pub const CONFIG_FIELD: &str = "hooksync";

pub const MANIFEST_FILE_NAME: &str = "package.json";

/// A parsed project manifest.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    document: serde_json::Map<String, Value>,
}

/// Reads and parses `<project_root>/package.json`.
///
/// # Errors
/// * `ManifestError::Missing` - the file does not exist or is not a regular
///   file.
/// * `ManifestError::Parse` - the file is not valid JSON.
/// * `ManifestError::NotAnObject` - the document is valid JSON but its top
///   level is not an object.
pub fn read_manifest(project_root: &Path) -> Result<Manifest> {
    let path = project_root.join(MANIFEST_FILE_NAME);

    if !path.is_file() {
        return Err(ManifestError::Missing { path }.into());
    }

    let raw = fs::read_to_string(&path)?;
    let document: Value = serde_json::from_str(&raw).map_err(ManifestError::Parse)?;

    let Value::Object(document) = document else {
        return Err(ManifestError::NotAnObject.into());
    };

    Ok(Manifest { path, document })
}

impl Manifest {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The embedded configuration field, if present.
    #[must_use]
    pub fn config_field(&self) -> Option<&Value> {
        self.document.get(CONFIG_FIELD)
    }

    /// Whether this tool is declared as a dependency of the project.
    ///
    /// Presence under `dependencies` counts but earns a warning - the tool is
    /// only needed at development time. Otherwise membership in
    /// `devDependencies` decides; a manifest without that section reports
    /// false. The check exists so automated install flows only touch projects
    /// that actually depend on hooksync, not dependencies of dependencies.
    #[must_use]
    pub fn is_declared_dependency(&self) -> bool {
        if self.section_declares("dependencies") {
            print_warning(
                "hooksync belongs in devDependencies",
                "Move hooksync from \"dependencies\" to \"devDependencies\" - it is only needed while developing.",
            );
            return true;
        }

        self.section_declares("devDependencies")
    }

    fn section_declares(&self, section: &str) -> bool {
        self.document
            .get(section)
            .and_then(Value::as_object)
            .is_some_and(|dependencies| dependencies.contains_key(PACKAGE_NAME))
    }
}

/// Strips the trailing `node_modules/<tool>` suffix from an install path,
/// yielding the consuming project's root.
///
/// During a package-manager install the working directory looks like
/// `<project>/node_modules/hooksync` (or a pnpm/yarn store variant such as
/// `<project>/node_modules/.pnpm/hooksync@<version>/node_modules/hooksync`).
/// Only the trailing suffix is removed, so a nested dependency install keeps
/// its own root: `a/node_modules/b/node_modules/hooksync` resolves to
/// `a/node_modules/b`, not `a`. Both `/` and `\` delimiters are handled
/// identically.
///
/// # Returns
/// * `Some(project_root)` - the path with the install suffix stripped,
///   joined with `/`.
/// * `None` - the path does not end at this tool inside a `node_modules`
///   tree; the caller is presumably already at the project root.
#[must_use]
pub fn project_root_from_node_modules(install_path: &str) -> Option<String> {
    let mut components: Vec<&str> = install_path.split(['/', '\\']).collect();

    // Direct layout ends in node_modules/<tool>; strip exactly that pair.
    if matches!(components.as_slice(), [.., "node_modules", last] if *last == PACKAGE_NAME) {
        components.truncate(components.len() - 2);
    } else if !ends_in_store_entry(&components) {
        return None;
    }

    // pnpm and yarn-berry stores park the package one level deeper:
    // node_modules/(.pnpm|.store)/<tool>@<version>[/node_modules/<tool>].
    // Walk back past the store segment to reach the real project root.
    if ends_in_store_entry(&components) {
        components.truncate(components.len() - 3);
    }

    if components.is_empty() {
        return None;
    }

    Some(components.join("/"))
}

/// Whether a component list ends in a package-store entry for this tool,
/// i.e. `node_modules/(.pnpm|.store)/<tool>@<version>`.
fn ends_in_store_entry(components: &[&str]) -> bool {
    matches!(
        components,
        [.., "node_modules", ".pnpm" | ".store", entry]
            if entry
                .strip_prefix(PACKAGE_NAME)
                .is_some_and(|rest| rest.starts_with('@'))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HooksyncError;
    use tempfile::TempDir;

    #[test]
    fn test_project_root_typical_case() {
        assert_eq!(
            project_root_from_node_modules("var/my-project/node_modules/hooksync"),
            Some("var/my-project".to_string())
        );
    }

    #[test]
    fn test_project_root_windows_delimiters() {
        assert_eq!(
            project_root_from_node_modules("user\\allProjects\\project\\node_modules\\hooksync"),
            Some("user/allProjects/project".to_string())
        );
    }

    #[test]
    fn test_project_root_nested_dependency() {
        // A dependency-of-a-dependency install must resolve to the inner
        // project's root, not the outermost one.
        assert_eq!(
            project_root_from_node_modules("a/node_modules/b/node_modules/hooksync"),
            Some("a/node_modules/b".to_string())
        );
        assert_eq!(
            project_root_from_node_modules(
                "a/node_modules/b/node_modules/.pnpm/hooksync@0.3.0/node_modules/hooksync"
            ),
            Some("a/node_modules/b".to_string())
        );
    }

    #[test]
    fn test_project_root_outside_node_modules() {
        assert_eq!(
            project_root_from_node_modules("var/my-project/hooksync"),
            None
        );
    }

    #[test]
    fn test_project_root_pnpm_store_layouts() {
        assert_eq!(
            project_root_from_node_modules("var/my-project/node_modules/.pnpm/hooksync@0.3.0"),
            Some("var/my-project".to_string())
        );
        assert_eq!(
            project_root_from_node_modules(
                "var/my-project/node_modules/.pnpm/hooksync@0.3.0/node_modules/hooksync"
            ),
            Some("var/my-project".to_string())
        );
        assert_eq!(
            project_root_from_node_modules(
                "var/my-project/node_modules/.store/hooksync@0.3.0/node_modules/hooksync"
            ),
            Some("var/my-project".to_string())
        );
    }

    #[test]
    fn test_dependency_check_in_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{"dependencies": {"hooksync": "^0.3.0"}}"#,
        )
        .unwrap();

        let manifest = read_manifest(temp_dir.path()).unwrap();
        assert!(manifest.is_declared_dependency());
    }

    #[test]
    fn test_dependency_check_in_dev_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{"devDependencies": {"hooksync": "^0.3.0"}}"#,
        )
        .unwrap();

        let manifest = read_manifest(temp_dir.path()).unwrap();
        assert!(manifest.is_declared_dependency());
    }

    #[test]
    fn test_dependency_check_absent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("package.json"),
            r#"{"name": "unrelated", "devDependencies": {"left-pad": "1.0.0"}}"#,
        )
        .unwrap();

        let manifest = read_manifest(temp_dir.path()).unwrap();
        assert!(!manifest.is_declared_dependency());
    }

    #[test]
    fn test_dependency_check_without_sections() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), r#"{"name": "bare"}"#).unwrap();

        let manifest = read_manifest(temp_dir.path()).unwrap();
        assert!(!manifest.is_declared_dependency());
    }

    #[test]
    fn test_missing_manifest() {
        let temp_dir = TempDir::new().unwrap();

        assert!(matches!(
            read_manifest(temp_dir.path()),
            Err(HooksyncError::Manifest(ManifestError::Missing { .. }))
        ));
    }

    #[test]
    fn test_manifest_must_be_an_object() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), "[1, 2, 3]").unwrap();

        assert!(matches!(
            read_manifest(temp_dir.path()),
            Err(HooksyncError::Manifest(ManifestError::NotAnObject))
        ));
    }
}
