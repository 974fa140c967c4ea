use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{DistConfig, SOURCE_MANIFEST, STAGING_MANIFEST};
use crate::error::DistError;
use crate::rewrite::{rewrite_exports, rewrite_path, rewrite_side_effects};

/// Fields copied into the distributed manifest, in output order.
pub const DIST_FIELDS: [&str; 15] = [
    "name",
    "version",
    "description",
    "main",
    "module",
    "types",
    "style",
    "exports",
    "type",
    "keywords",
    "author",
    "license",
    "peerDependencies",
    "dependencies",
    "sideEffects",
];

/// Single-path fields that get the output-directory prefix stripped.
pub const PATH_FIELDS: [&str; 4] = ["main", "module", "types", "style"];

/// The filtered, path-rewritten manifest that ships inside the output
/// directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistManifest {
    fields: Map<String, Value>,
}

impl DistManifest {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn dependencies(&self) -> Option<&Map<String, Value>> {
        self.fields.get("dependencies").and_then(Value::as_object)
    }

    pub fn peer_dependencies(&self) -> Option<&Map<String, Value>> {
        self.fields.get("peerDependencies").and_then(Value::as_object)
    }
}

pub struct ManifestProjector {
    config: DistConfig,
}

impl ManifestProjector {
    pub fn new(config: DistConfig) -> Self {
        Self { config }
    }

    /// Read, project and stage the manifest, printing progress as it goes.
    pub fn build_staging(&self) -> Result<DistManifest, DistError> {
        println!("Building {} from {}...", STAGING_MANIFEST, SOURCE_MANIFEST);

        let source = self.read_source()?;
        let manifest = self.project(&source);
        if manifest.is_empty() {
            tracing::warn!("{} has no distributable fields", SOURCE_MANIFEST);
        }
        let staging_path = self.write_staging(&manifest)?;
        tracing::debug!("staged {} fields", manifest.len());

        println!("✓ Successfully created {}", staging_path.display());
        report_versions(&manifest);

        Ok(manifest)
    }

    pub fn read_source(&self) -> Result<Map<String, Value>, DistError> {
        let path = self.config.source_path();
        tracing::debug!("reading source manifest from {}", path.display());

        if !path.exists() {
            return Err(DistError::MissingInput { path });
        }

        let content = fs::read_to_string(&path)
            .map_err(|source| DistError::ReadFailure { path: path.clone(), source })?;

        serde_json::from_str(&content).map_err(|source| DistError::MalformedInput { path, source })
    }

    /// Select the distributed fields of `source` and rewrite their paths.
    pub fn project(&self, source: &Map<String, Value>) -> DistManifest {
        let out_dir = self.config.out_dir_name();
        let mut fields = Map::new();

        for field in DIST_FIELDS {
            let Some(value) = source.get(field) else {
                continue;
            };

            let value = match field {
                "exports" => rewrite_exports(value, out_dir),
                "sideEffects" => rewrite_side_effects(value, out_dir),
                f if PATH_FIELDS.contains(&f) => rewrite_path(value, out_dir),
                _ => value.clone(),
            };
            fields.insert(field.to_string(), value);
        }

        DistManifest { fields }
    }

    pub fn write_staging(&self, manifest: &DistManifest) -> Result<PathBuf, DistError> {
        let path = self.config.staging_path();
        write_json(&path, manifest)?;
        Ok(path)
    }

    pub fn read_staging(&self) -> Result<DistManifest, DistError> {
        let path = self.config.staging_path();
        if !path.exists() {
            return Err(DistError::MissingStagingFile { path });
        }

        let content = fs::read_to_string(&path)
            .map_err(|source| DistError::ReadFailure { path: path.clone(), source })?;

        serde_json::from_str(&content).map_err(|source| DistError::MalformedInput { path, source })
    }
}

/// Pretty-print with two-space indentation and a trailing newline.
/// Non-ASCII text is written literally.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DistError> {
    let json = to_pretty_json(value).map_err(|source| DistError::WriteFailure {
        path: path.to_path_buf(),
        source: io::Error::from(source),
    })?;

    fs::write(path, json).map_err(|source| DistError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

fn report_versions(manifest: &DistManifest) {
    if let Some(deps) = manifest.dependencies() {
        println!("  Dependencies version synchronized:");
        print_versions(deps);
    }

    if let Some(deps) = manifest.peer_dependencies() {
        println!("  Peer dependencies version synchronized:");
        print_versions(deps);
    }
}

fn print_versions(deps: &Map<String, Value>) {
    for (name, version) in deps {
        // Strings print bare, without JSON quotes.
        let version = version.as_str().map_or_else(|| version.to_string(), str::to_owned);
        println!("    {}: {}", name, version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn source(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn projector_in(dir: &TempDir) -> ManifestProjector {
        ManifestProjector::new(DistConfig::new(dir.path()))
    }

    #[test]
    fn test_projection_rewrites_path_fields() {
        let projector = ManifestProjector::new(DistConfig::default());
        let manifest = projector.project(&source(json!({
            "name": "@acme/widgets",
            "main": "dist/cjs/index.js",
            "module": "./dist/esm/index.js",
            "types": "dist/types/index.d.ts",
            "style": "dist/widgets.css",
            "sideEffects": ["dist/widgets.css"],
            "exports": {
                ".": {
                    "import": "./dist/index.mjs",
                    "require": "dist/index.cjs"
                }
            }
        })));

        assert_eq!(manifest.get("main"), Some(&json!("cjs/index.js")));
        assert_eq!(manifest.get("module"), Some(&json!("./esm/index.js")));
        assert_eq!(manifest.get("types"), Some(&json!("types/index.d.ts")));
        assert_eq!(manifest.get("style"), Some(&json!("widgets.css")));
        assert_eq!(manifest.get("sideEffects"), Some(&json!(["widgets.css"])));
        assert_eq!(
            manifest.get("exports"),
            Some(&json!({".": {"import": "./index.mjs", "require": "index.cjs"}}))
        );
    }

    #[test]
    fn test_projection_filters_fields() {
        let projector = ManifestProjector::new(DistConfig::default());
        let manifest = projector.project(&source(json!({
            "name": "widgets",
            "version": "1.2.0",
            "scripts": {"build": "tsc"},
            "devDependencies": {"typescript": "^5.0.0"},
            "private": true
        })));

        assert!(!manifest.contains("scripts"));
        assert!(!manifest.contains("devDependencies"));
        assert!(!manifest.contains("private"));
        // Absent fields are not synthesized.
        assert!(!manifest.contains("main"));
        assert!(!manifest.contains("exports"));
        assert_eq!(manifest.len(), 2);
    }

    #[test]
    fn test_projection_uses_allow_list_order() {
        let projector = ManifestProjector::new(DistConfig::default());
        let manifest = projector.project(&source(json!({
            "license": "MIT",
            "dependencies": {"zod": "^3.0.0"},
            "version": "0.1.0",
            "name": "widgets"
        })));

        let fields: Vec<&str> = manifest.fields().collect();
        assert_eq!(fields, ["name", "version", "license", "dependencies"]);
    }

    #[test]
    fn test_other_fields_are_copied_verbatim() {
        let projector = ManifestProjector::new(DistConfig::default());
        let manifest = projector.project(&source(json!({
            "keywords": ["dist/ui"],
            "author": {"name": "A", "url": "dist/about"},
            "dependencies": {"dist-utils": "dist/local"}
        })));

        assert_eq!(manifest.get("keywords"), Some(&json!(["dist/ui"])));
        assert_eq!(manifest.get("author"), Some(&json!({"name": "A", "url": "dist/about"})));
        assert_eq!(manifest.get("dependencies"), Some(&json!({"dist-utils": "dist/local"})));
    }

    #[test]
    fn test_build_staging_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
  "name": "widgets",
  "description": "Composants réutilisables ✨",
  "main": "dist/cjs/index.js",
  "peerDependencies": {"react": ">=18"},
  "dependencies": {"clsx": "^2.0.0"}
}"#,
        )
        .unwrap();

        let projector = projector_in(&dir);
        let manifest = projector.build_staging().unwrap();

        let staged = projector.read_staging().unwrap();
        assert_eq!(staged, manifest);

        let raw = fs::read_to_string(dir.path().join("package.dist.json")).unwrap();
        assert!(raw.ends_with("}\n"));
        assert!(raw.contains("Composants réutilisables ✨"));
        assert!(raw.contains("\n  \"main\": \"cjs/index.js\""));
    }

    #[test]
    fn test_staging_file_is_overwritten() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "fresh"}"#).unwrap();
        fs::write(dir.path().join("package.dist.json"), "stale contents").unwrap();

        projector_in(&dir).build_staging().unwrap();

        let raw = fs::read_to_string(dir.path().join("package.dist.json")).unwrap();
        assert_eq!(raw, "{\n  \"name\": \"fresh\"\n}\n");
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = projector_in(&dir).build_staging().unwrap_err();

        assert!(matches!(err, DistError::MissingInput { .. }));
        assert!(!dir.path().join("package.dist.json").exists());
    }

    #[test]
    fn test_malformed_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{\"name\": ").unwrap();

        let err = projector_in(&dir).read_source().unwrap_err();
        assert!(matches!(err, DistError::MalformedInput { .. }));
    }

    #[test]
    fn test_non_object_source_is_malformed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "[1, 2, 3]").unwrap();

        let err = projector_in(&dir).read_source().unwrap_err();
        assert!(matches!(err, DistError::MalformedInput { .. }));
    }

    #[test]
    fn test_unreadable_source() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("package.json")).unwrap();

        let err = projector_in(&dir).build_staging().unwrap_err();

        assert!(matches!(err, DistError::ReadFailure { .. }));
        assert!(!dir.path().join("package.dist.json").exists());
    }

    #[test]
    fn test_unwritable_staging_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "widgets"}"#).unwrap();
        fs::create_dir_all(dir.path().join("package.dist.json/nested")).unwrap();

        let err = projector_in(&dir).build_staging().unwrap_err();

        assert!(matches!(err, DistError::WriteFailure { .. }));
        assert!(dir.path().join("package.dist.json").is_dir());
    }
}
