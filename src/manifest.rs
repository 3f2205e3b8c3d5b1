//! Manifest model, loading and schema validation.
//!
//! A manifest is a JSON document listing the template artifacts installed for
//! one agent:
//!
//! ```json
//! {
//!   "version": 1,
//!   "artifacts": [
//!     { "id": "doc_main",
//!       "source": { "type": "templateFile", "from": "docs/AGENT.tpl.md", "toDir": "." } },
//!     { "id": "commands_os_mac", "when": { "os": "mac" },
//!       "source": { "type": "templateDir", "from": "commands/os-mac", "toDir": "{{AGENT_COMMANDS_DIR}}" } }
//!   ]
//! }
//! ```
//!
//! Unknown top-level fields are kept in [`Manifest::extra`] untouched.
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ManifestError;
use crate::platform::Os;

/// A parsed and validated manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema version. Any JSON number is accepted and kept as written.
    pub version: Number,
    /// Entries in manifest order.
    pub artifacts: Vec<Artifact>,
    /// Passthrough metadata (every top-level field other than `version` and
    /// `artifacts`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One manifest entry: a template file or directory and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Identifier shown in reports and error messages.
    pub id: String,
    /// Where the content comes from and where it goes.
    pub source: TemplateSource,
    /// Platform restriction; unqualified artifacts apply everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

/// Where an artifact's template content comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TemplateSource {
    /// A single template file rendered into `to_dir`.
    #[serde(rename_all = "camelCase")]
    TemplateFile {
        /// Template path, relative to the templates root.
        from: String,
        /// Destination directory, relative to the target.
        to_dir: String,
        /// Output file name; defaults to the source name without `.tpl`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        out_file: Option<String>,
    },
    /// A whole directory of templates mirrored into `to_dir`.
    #[serde(rename_all = "camelCase")]
    TemplateDir {
        /// Template directory, relative to the templates root.
        from: String,
        /// Destination directory, relative to the target.
        to_dir: String,
    },
}

impl TemplateSource {
    /// Source path template, relative to the templates root.
    #[must_use]
    pub fn from(&self) -> &str {
        match self {
            Self::TemplateFile { from, .. } | Self::TemplateDir { from, .. } => from,
        }
    }

    /// Destination directory template, relative to the target directory.
    #[must_use]
    pub fn to_dir(&self) -> &str {
        match self {
            Self::TemplateFile { to_dir, .. } | Self::TemplateDir { to_dir, .. } => to_dir,
        }
    }
}

/// Platform qualification attached to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The only OS the artifact applies to.
    pub os: Os,
}

impl Manifest {
    /// Select the artifacts that apply to `os`, in manifest order.
    ///
    /// Unqualified artifacts always apply. Artifacts qualified for `os` apply.
    /// When nothing in the manifest is qualified for `os`, the artifacts
    /// qualified for [`Os::FALLBACK`] stand in for it.
    #[must_use]
    pub fn artifacts_for(&self, os: Os) -> Vec<&Artifact> {
        let has_variant = self
            .artifacts
            .iter()
            .any(|a| a.when.is_some_and(|w| w.os == os));
        let effective = if has_variant { os } else { Os::FALLBACK };

        self.artifacts
            .iter()
            .filter(|a| a.when.is_none_or(|w| w.os == effective))
            .collect()
    }
}

/// Load and validate the manifest at `path`.
///
/// # Errors
///
/// - [`ManifestError::NotFound`] if the file does not exist
/// - [`ManifestError::Io`] for any other read failure, with the cause intact
/// - [`ManifestError::InvalidJson`] if the content is not JSON
/// - [`ManifestError::InvalidSchema`] if the document has the wrong shape
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ManifestError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ManifestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let value: Value =
        serde_json::from_str(&content).map_err(|source| ManifestError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
    from_value(value)
}

/// Validate an already parsed JSON document and convert it into a [`Manifest`].
///
/// Checks run in a fixed order: the document must be an object (an array
/// passes this check and then fails on `version`), `version` must be a
/// number, `artifacts` must be an array, and each artifact must match the
/// artifact shape.
///
/// # Errors
///
/// Returns [`ManifestError::InvalidSchema`] describing the first violation.
pub fn from_value(value: Value) -> Result<Manifest, ManifestError> {
    let schema = |detail: &str| ManifestError::InvalidSchema(detail.to_string());

    if !(value.is_object() || value.is_array()) {
        return Err(schema("Manifest must be an object"));
    }

    let version = match value.get("version") {
        Some(Value::Number(n)) => n.clone(),
        _ => return Err(schema("Manifest.version must be a number")),
    };

    if !value.get("artifacts").is_some_and(Value::is_array) {
        return Err(schema("Manifest.artifacts must be an array"));
    }

    let Value::Object(mut fields) = value else {
        return Err(schema("Manifest must be an object"));
    };
    let raw_artifacts = match fields.remove("artifacts") {
        Some(Value::Array(items)) => items,
        _ => return Err(schema("Manifest.artifacts must be an array")),
    };
    fields.remove("version");

    let artifacts = raw_artifacts
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<Artifact>(item)
                .map_err(|e| ManifestError::InvalidSchema(format!("Manifest.artifacts[{i}]: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Manifest {
        version,
        artifacts,
        extra: fields,
    })
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_manifest(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn schema_detail(err: ManifestError) -> String {
        match err {
            ManifestError::InvalidSchema(detail) => detail,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    fn file_artifact(id: &str, os: Option<Os>) -> Artifact {
        Artifact {
            id: id.to_string(),
            source: TemplateSource::TemplateFile {
                from: format!("{id}.tpl.md"),
                to_dir: "out".to_string(),
                out_file: None,
            },
            when: os.map(|os| Condition { os }),
        }
    }

    fn manifest_of(artifacts: Vec<Artifact>) -> Manifest {
        Manifest {
            version: Number::from(1),
            artifacts,
            extra: Map::new(),
        }
    }

    // -----------------------------------------------------------------------
    // load
    // -----------------------------------------------------------------------

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(err.to_string().contains("Manifest not found"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let (_dir, path) = write_manifest("{ invalid json");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidJson { .. }));
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn directory_path_is_io_error_not_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(
            !matches!(err, ManifestError::NotFound { .. }),
            "reading a directory must keep its own cause: {err}"
        );
    }

    #[test]
    fn loads_minimal_valid_manifest() {
        let (_dir, path) = write_manifest(
            r#"{"version":2,"artifacts":[{"id":"test","source":{"type":"templateFile","from":"test.tpl.md","toDir":"out"}}]}"#,
        );
        let manifest = load(&path).unwrap();
        assert_eq!(manifest.version.as_i64(), Some(2));
        assert_eq!(manifest.artifacts.len(), 1);
        assert_eq!(manifest.artifacts[0].id, "test");
        assert_eq!(manifest.artifacts[0].source.from(), "test.tpl.md");
        assert_eq!(manifest.artifacts[0].source.to_dir(), "out");
    }

    #[test]
    fn preserves_additional_properties() {
        let (_dir, path) = write_manifest(
            r#"{"version":1,"artifacts":[],"metadata":{"author":"test"},"description":"Test manifest"}"#,
        );
        let manifest = load(&path).unwrap();
        assert!(manifest.artifacts.is_empty());
        assert_eq!(manifest.extra["metadata"], json!({"author": "test"}));
        assert_eq!(manifest.extra["description"], json!("Test manifest"));
        assert!(!manifest.extra.contains_key("version"));
    }

    // -----------------------------------------------------------------------
    // from_value: check ordering
    // -----------------------------------------------------------------------

    #[test]
    fn version_must_be_a_number_regardless_of_artifacts() {
        for doc in [
            json!({"version": "1", "artifacts": []}),
            json!({"version": "1", "artifacts": {}}),
            json!({"artifacts": []}),
            json!({"version": null}),
        ] {
            let detail = schema_detail(from_value(doc).unwrap_err());
            assert_eq!(detail, "Manifest.version must be a number");
        }
    }

    #[test]
    fn artifacts_must_be_an_array() {
        for doc in [
            json!({"version": 1, "artifacts": {}}),
            json!({"version": 1, "artifacts": "x"}),
            json!({"version": 1}),
        ] {
            let detail = schema_detail(from_value(doc).unwrap_err());
            assert_eq!(detail, "Manifest.artifacts must be an array");
        }
    }

    #[test]
    fn null_and_scalars_must_be_objects() {
        for doc in [json!(null), json!("string"), json!(3), json!(true)] {
            let detail = schema_detail(from_value(doc).unwrap_err());
            assert_eq!(detail, "Manifest must be an object");
        }
    }

    #[test]
    fn bare_array_fails_on_version_first() {
        let detail = schema_detail(from_value(json!([])).unwrap_err());
        assert_eq!(detail, "Manifest.version must be a number");
    }

    #[test]
    fn any_numeric_version_is_accepted() {
        for version in [json!(1.0), json!(-1), json!(0), json!(1.5)] {
            let manifest = from_value(json!({"version": version, "artifacts": []})).unwrap();
            assert_eq!(Value::Number(manifest.version), version);
        }
    }

    #[test]
    fn float_version_text_loads() {
        let (_dir, path) = write_manifest(r#"{"version": 1.0, "artifacts": []}"#);
        let manifest = load(&path).unwrap();
        assert_eq!(manifest.version.as_f64(), Some(1.0));
    }

    #[test]
    fn malformed_artifact_names_its_index() {
        let doc = json!({"version": 1, "artifacts": [
            {"id": "ok", "source": {"type": "templateDir", "from": "a", "toDir": "b"}},
            {"id": "bad", "source": {"type": "symlink", "from": "a", "toDir": "b"}}
        ]});
        let detail = schema_detail(from_value(doc).unwrap_err());
        assert!(detail.starts_with("Manifest.artifacts[1]:"), "{detail}");
    }

    #[test]
    fn parses_os_condition_and_out_file() {
        let doc = json!({"version": 1, "artifacts": [
            {"id": "doc", "source": {"type": "templateFile", "from": "d.tpl.md", "toDir": ".", "outFile": "{{AGENT_DOC}}"}},
            {"id": "cmds", "when": {"os": "windows"}, "source": {"type": "templateDir", "from": "c", "toDir": "x"}}
        ]});
        let manifest = from_value(doc).unwrap();
        assert_eq!(
            manifest.artifacts[0].source,
            TemplateSource::TemplateFile {
                from: "d.tpl.md".into(),
                to_dir: ".".into(),
                out_file: Some("{{AGENT_DOC}}".into()),
            }
        );
        assert_eq!(manifest.artifacts[1].when, Some(Condition { os: Os::Windows }));
    }

    // -----------------------------------------------------------------------
    // artifacts_for
    // -----------------------------------------------------------------------

    #[test]
    fn unqualified_artifacts_apply_everywhere() {
        let manifest = manifest_of(vec![file_artifact("a", None), file_artifact("b", None)]);
        for os in [Os::Mac, Os::Windows, Os::Linux] {
            assert_eq!(manifest.artifacts_for(os).len(), 2);
        }
    }

    #[test]
    fn exact_os_variant_wins_over_fallback() {
        let manifest = manifest_of(vec![
            file_artifact("mac", Some(Os::Mac)),
            file_artifact("win", Some(Os::Windows)),
            file_artifact("doc", None),
        ]);
        let ids: Vec<&str> = manifest
            .artifacts_for(Os::Windows)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, ["win", "doc"]);
    }

    #[test]
    fn linux_falls_back_to_mac_variant() {
        let manifest = manifest_of(vec![
            file_artifact("commands_os_mac", Some(Os::Mac)),
            file_artifact("commands_os_windows", Some(Os::Windows)),
            file_artifact("doc_main", None),
        ]);
        let ids: Vec<&str> = manifest
            .artifacts_for(Os::Linux)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, ["commands_os_mac", "doc_main"]);
    }
}
