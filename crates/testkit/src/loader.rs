use crate::config::TestDataConfig;
use crate::error::{Result, TestkitError};
use lens_core::{load_all_lenses, load_lens};
use lens_fhir::{LensLibrary, Resource};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A loaded test resource together with the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub filename: String,
    pub resource: Resource,
}

impl Fixture {
    /// Label used in logs and output names: resource id, else file stem
    #[must_use]
    pub fn label(&self) -> &str {
        self.resource.id.as_deref().unwrap_or_else(|| {
            Path::new(&self.filename)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(&self.filename)
        })
    }
}

/// Read one JSON resource
pub fn load_json_file(path: impl AsRef<Path>) -> Result<Resource> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| TestkitError::io(path, e))?;
    let value = serde_json::from_str(&raw).map_err(|e| TestkitError::json(path, e))?;
    Ok(Resource::from_value(value)?)
}

/// Load every `*.json` directly inside `dir`, sorted by file name.
///
/// A missing directory is an error.
pub fn load_json_files(dir: impl AsRef<Path>) -> Result<Vec<Fixture>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(TestkitError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut fixtures = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            TestkitError::io(path, e.into())
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }

        log::debug!("Loading {}", path.display());
        fixtures.push(Fixture {
            filename: entry.file_name().to_string_lossy().into_owned(),
            resource: load_json_file(path)?,
        });
    }

    Ok(fixtures)
}

/// Test data access over a [`TestDataConfig`]
#[derive(Debug, Clone, Default)]
pub struct TestData {
    config: TestDataConfig,
}

impl TestData {
    #[must_use]
    pub fn new(config: TestDataConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TestDataConfig {
        &self.config
    }

    /// Load an ePI by file name; custom directories shadow bundled ones
    pub fn load_epi(&self, filename: &str) -> Result<Resource> {
        find_in("ePI", &self.config.pepis_dirs, filename)
    }

    pub fn load_ips(&self, filename: &str) -> Result<Resource> {
        find_in("IPS", &self.config.ips_dirs, filename)
    }

    /// Every ePI across all configured directories
    pub fn load_all_epis(&self) -> Result<Vec<Fixture>> {
        load_all_in(&self.config.pepis_dirs)
    }

    pub fn load_all_ips(&self) -> Result<Vec<Fixture>> {
        load_all_in(&self.config.ips_dirs)
    }

    /// Compile every lens in the lens directory
    pub fn load_lenses(&self) -> Result<Vec<LensLibrary>> {
        Ok(load_all_lenses(&self.config.lens_dir)?)
    }

    /// Compile one lens from the lens directory
    pub fn load_lens(&self, base_name: &str) -> Result<LensLibrary> {
        Ok(load_lens(&self.config.lens_dir, base_name)?)
    }
}

fn find_in(kind: &'static str, dirs: &[PathBuf], filename: &str) -> Result<Resource> {
    let found = dirs
        .iter()
        .rev()
        .map(|dir| dir.join(filename))
        .find(|path| path.is_file());

    match found {
        Some(path) => load_json_file(path),
        None => Err(TestkitError::FileNotFound {
            kind,
            name: filename.to_string(),
            searched: dirs.to_vec(),
        }),
    }
}

fn load_all_in(dirs: &[PathBuf]) -> Result<Vec<Fixture>> {
    let mut fixtures = Vec::new();
    for dir in dirs {
        fixtures.extend(load_json_files(dir)?);
    }
    log::info!("Loaded {} resources from {} directories", fixtures.len(), dirs.len());
    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomTestData;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_load_json_files_attaches_filename() {
        let temp = tempdir().unwrap();
        write(temp.path(), "b.json", r#"{ "resourceType": "Bundle" }"#);
        write(temp.path(), "a.json", r#"{ "resourceType": "Bundle", "id": "epi-a" }"#);
        write(temp.path(), "notes.txt", "ignored");

        let fixtures = load_json_files(temp.path()).unwrap();
        let names: Vec<_> = fixtures.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert_eq!(fixtures[0].label(), "epi-a");
        assert_eq!(fixtures[1].label(), "b");
    }

    #[test]
    fn test_missing_directory_fails_fast() {
        let temp = tempdir().unwrap();
        let err = load_json_files(temp.path().join("PePIs")).unwrap_err();
        assert!(matches!(err, TestkitError::DirectoryNotFound(_)));
        assert!(err.to_string().contains("PePIs"));
    }

    #[test]
    fn test_malformed_json_names_file() {
        let temp = tempdir().unwrap();
        write(temp.path(), "broken.json", "{");
        let err = load_json_files(temp.path()).unwrap_err();
        assert!(matches!(err, TestkitError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_custom_dirs_extend_and_shadow() {
        let temp = tempdir().unwrap();
        let bundled = temp.path().join("bundled");
        let custom = temp.path().join("custom");
        write(&bundled.join("PePIs"), "shared.json", r#"{ "resourceType": "Bundle", "id": "bundled" }"#);
        write(&bundled.join("IPS"), "ips.json", r#"{ "resourceType": "Bundle" }"#);
        write(&custom, "shared.json", r#"{ "resourceType": "Bundle", "id": "custom" }"#);
        write(&custom, "extra.json", r#"{ "resourceType": "Bundle", "id": "extra" }"#);

        let data = TestData::new(TestDataConfig::bundled(&bundled).with_custom(CustomTestData {
            pepis_path: Some(custom),
            ips_path: None,
        }));

        let labels: Vec<_> = data
            .load_all_epis()
            .unwrap()
            .iter()
            .map(|f| f.label().to_string())
            .collect();
        assert_eq!(labels, vec!["bundled", "extra", "custom"]);
        assert_eq!(data.load_epi("shared.json").unwrap().id.as_deref(), Some("custom"));
        assert_eq!(data.load_all_ips().unwrap().len(), 1);
    }

    #[test]
    fn test_load_by_name_not_found() {
        let temp = tempdir().unwrap();
        let data = TestData::new(TestDataConfig::bundled(temp.path()));
        let err = data.load_ips("nobody.json").unwrap_err();
        assert!(matches!(err, TestkitError::FileNotFound { kind: "IPS", .. }));
        assert!(err.to_string().starts_with("IPS not found: nobody.json"));
    }
}
