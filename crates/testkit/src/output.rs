use crate::error::{Result, TestkitError};
use lens_fhir::Resource;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// Writes transformed ePIs as `output-<epi>-<ips>.json`
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, epi_label: &str, ips_label: &str) -> PathBuf {
        self.dir.join(format!(
            "output-{}-{}.json",
            sanitize(epi_label),
            sanitize(ips_label)
        ))
    }

    /// Write `epi` as pretty JSON, creating the directory on first use
    pub fn write(&self, epi_label: &str, ips_label: &str, epi: &Resource) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| TestkitError::io(&self.dir, e))?;

        let path = self.path_for(epi_label, ips_label);
        let json = epi.to_json_pretty()?;
        fs::write(&path, json).map_err(|e| TestkitError::io(&path, e))?;

        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

fn sanitize(label: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(label, "_");
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned.into_owned()
    }
}
