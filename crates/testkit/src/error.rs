use lens_core::LensError;
use lens_fhir::FhirError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for test-data operations
pub type Result<T> = std::result::Result<T, TestkitError>;

/// Errors that can occur while loading test data or running combinations
#[derive(Error, Debug)]
pub enum TestkitError {
    /// A configured data directory does not exist
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A named fixture is not in any configured directory
    #[error("{kind} not found: {name} (searched {})", display_dirs(.searched))]
    FileNotFound {
        kind: &'static str,
        name: String,
        searched: Vec<PathBuf>,
    },

    /// Filesystem error
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A fixture is not valid JSON
    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A config file is not valid TOML
    #[error("Failed to parse config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Lens(#[from] LensError),

    #[error(transparent)]
    Fhir(#[from] FhirError),
}

impl TestkitError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
