use lens_fhir::FhirError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for lens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Errors that can occur while loading, compiling or applying lenses
#[derive(Error, Debug)]
pub enum LensError {
    /// Resource model error
    #[error(transparent)]
    Fhir(#[from] FhirError),

    /// Reading a lens file failed
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A lens file is not valid JSON
    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The lens directory does not exist
    #[error("Lens directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// `<name>.json` is missing
    #[error("Lens JSON not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// `<name>.js` is missing and the manifest carries no content
    #[error("Lens JavaScript not found for lens {lens} at path: {}", .path.display())]
    SourceNotFound { lens: String, path: PathBuf },

    /// A lens failed to transform a fragment
    #[error("Enhance failed: {0}")]
    Enhance(String),
}

impl LensError {
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

    pub fn enhance(msg: impl Into<String>) -> Self {
        Self::Enhance(msg.into())
    }
}
