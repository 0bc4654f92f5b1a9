use crate::error::{Result, TestkitError};
use lens_dom::DEFAULT_PRESERVATION_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment flag that turns on writing transformed ePIs to disk
pub const WRITE_OUTPUTS_ENV: &str = "WRITE_LENS_OUTPUTS";

pub const PEPIS_DIR_NAME: &str = "PePIs";
pub const IPS_DIR_NAME: &str = "IPS";
pub const OUTPUT_DIR_NAME: &str = "test-outputs";

/// Where test data lives and what the combination run does with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestDataConfig {
    /// ePI directories, bundled first, custom ones after
    pub pepis_dirs: Vec<PathBuf>,

    /// IPS directories, bundled first, custom ones after
    pub ips_dirs: Vec<PathBuf>,

    /// Directory holding `<lens>.json` + `<lens>.js` pairs
    pub lens_dir: PathBuf,

    /// Where `output-<epi>-<ips>.json` files go
    pub output_dir: PathBuf,

    /// Write every transformed ePI to `output_dir`
    pub write_outputs: bool,

    /// Minimum content-preservation ratio for a combination to pass
    pub threshold: f64,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self::bundled("testdata")
    }
}

/// Extra directories that extend the bundled data set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTestData {
    pub pepis_path: Option<PathBuf>,
    pub ips_path: Option<PathBuf>,
}

impl TestDataConfig {
    /// Create config for a data root laid out as `PePIs/` and `IPS/`
    pub fn bundled(data_root: impl AsRef<Path>) -> Self {
        let root = data_root.as_ref();
        Self {
            pepis_dirs: vec![root.join(PEPIS_DIR_NAME)],
            ips_dirs: vec![root.join(IPS_DIR_NAME)],
            lens_dir: PathBuf::from("lens"),
            output_dir: root.join(OUTPUT_DIR_NAME),
            write_outputs: false,
            threshold: DEFAULT_PRESERVATION_THRESHOLD,
        }
    }

    /// Add custom directories on top of the current ones
    #[must_use]
    pub fn with_custom(mut self, custom: CustomTestData) -> Self {
        if let Some(dir) = custom.pepis_path {
            self.pepis_dirs.push(dir);
        }
        if let Some(dir) = custom.ips_path {
            self.ips_dirs.push(dir);
        }
        self
    }

    #[must_use]
    pub fn with_lens_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lens_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Load config from a TOML file.
    ///
    /// Relative paths in the file are taken relative to the file's directory.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| TestkitError::io(path, e))?;
        let config: Self = toml::from_str(&raw).map_err(|source| TestkitError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = config.resolve_relative(base);
        config.validate().map_err(TestkitError::Config)?;
        Ok(config)
    }

    /// Apply the `WRITE_LENS_OUTPUTS` override
    #[must_use]
    pub fn apply_env(mut self) -> Self {
        if env_truthy(WRITE_OUTPUTS_ENV) {
            log::debug!("{WRITE_OUTPUTS_ENV} set, writing lens outputs");
            self.write_outputs = true;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.pepis_dirs.is_empty() {
            return Err("at least one ePI directory is required".to_string());
        }

        if self.ips_dirs.is_empty() {
            return Err("at least one IPS directory is required".to_string());
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "threshold must be in [0, 1] (got {})",
                self.threshold
            ));
        }

        Ok(())
    }

    fn resolve_relative(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.pepis_dirs.iter_mut().for_each(resolve);
        self.ips_dirs.iter_mut().for_each(resolve);
        resolve(&mut self.lens_dir);
        resolve(&mut self.output_dir);
        self
    }
}

fn env_truthy(var: &str) -> bool {
    env::var(var).map(|v| truthy(&v)).unwrap_or(false)
}

fn truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TestDataConfig::default();
        assert_eq!(config.pepis_dirs, vec![PathBuf::from("testdata/PePIs")]);
        assert_eq!(config.ips_dirs, vec![PathBuf::from("testdata/IPS")]);
        assert_eq!(config.output_dir, PathBuf::from("testdata/test-outputs"));
        assert!(!config.write_outputs);
        assert_eq!(config.threshold, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_extends_bundled() {
        let config = TestDataConfig::bundled("data").with_custom(CustomTestData {
            pepis_path: Some(PathBuf::from("custom/PePIs")),
            ips_path: None,
        });
        assert_eq!(
            config.pepis_dirs,
            vec![PathBuf::from("data/PePIs"), PathBuf::from("custom/PePIs")]
        );
        assert_eq!(config.ips_dirs, vec![PathBuf::from("data/IPS")]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(TestDataConfig::default().with_threshold(1.5).validate().is_err());
        assert!(TestDataConfig::default().with_threshold(f64::NAN).validate().is_err());

        let mut config = TestDataConfig::default();
        config.ips_dirs.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "TRUE", "True"] {
            assert!(truthy(value), "{value}");
        }
        for value in ["0", "false", "yes", ""] {
            assert!(!truthy(value), "{value}");
        }
    }

    #[test]
    fn test_apply_env_toggles_outputs() {
        env::remove_var(WRITE_OUTPUTS_ENV);
        assert!(!TestDataConfig::default().apply_env().write_outputs);

        env::set_var(WRITE_OUTPUTS_ENV, "TRUE");
        assert!(TestDataConfig::default().apply_env().write_outputs);

        env::set_var(WRITE_OUTPUTS_ENV, "0");
        assert!(!TestDataConfig::default().apply_env().write_outputs);

        env::remove_var(WRITE_OUTPUTS_ENV);
    }

    #[test]
    fn test_from_toml_file_resolves_relative_paths() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("lens-test.toml");
        fs::write(
            &path,
            r#"
pepis_dirs = ["data/PePIs", "/abs/PePIs"]
lens_dir = "."
threshold = 0.9
"#,
        )
        .unwrap();

        let config = TestDataConfig::from_toml_file(&path).unwrap();
        assert_eq!(
            config.pepis_dirs,
            vec![temp.path().join("data/PePIs"), PathBuf::from("/abs/PePIs")]
        );
        assert_eq!(config.ips_dirs, vec![temp.path().join("testdata/IPS")]);
        assert_eq!(config.lens_dir, temp.path().join("."));
        assert_eq!(config.threshold, 0.9);
    }

    #[test]
    fn test_from_toml_file_errors() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "threshold = \"high\"").unwrap();
        assert!(matches!(
            TestDataConfig::from_toml_file(&path),
            Err(TestkitError::Toml { .. })
        ));

        fs::write(&path, "threshold = 2.0").unwrap();
        assert!(matches!(
            TestDataConfig::from_toml_file(&path),
            Err(TestkitError::Config(_))
        ));
    }
}
