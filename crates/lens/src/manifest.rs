//! Lens manifest compilation.
//!
//! A lens ships as two files side by side: `<name>.json` (a FHIR `Library`)
//! and `<name>.js` (the script). Compiling embeds the script into the
//! manifest's `content` as base64.

use crate::error::{LensError, Result};
use lens_fhir::{LensLibrary, LIBRARY};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of lens script files
pub const LENS_SOURCE_EXTENSION: &str = "js";

/// Embed `source` into the manifest, replacing any existing content
#[must_use]
pub fn compile_lens(mut manifest: LensLibrary, source: &str) -> LensLibrary {
    manifest.set_source(source);
    log::debug!(
        "Compiled lens {} ({} bytes of source)",
        manifest.display_name(),
        source.len()
    );
    manifest
}

/// Load `<dir>/<base_name>.json` and compile it with `<dir>/<base_name>.js`
pub fn load_lens(dir: impl AsRef<Path>, base_name: &str) -> Result<LensLibrary> {
    let dir = dir.as_ref();
    let json_path = dir.join(format!("{base_name}.json"));
    let source_path = dir.join(format!("{base_name}.{LENS_SOURCE_EXTENSION}"));

    if !json_path.is_file() {
        return Err(LensError::ManifestNotFound(json_path));
    }
    if !source_path.is_file() {
        return Err(LensError::SourceNotFound {
            lens: base_name.to_string(),
            path: source_path,
        });
    }

    let manifest = LensLibrary::from_value(read_json(&json_path)?)?;
    let source = read_text(&source_path)?;
    Ok(compile_lens(manifest, &source))
}

/// Load every `Library` manifest directly inside `dir`.
///
/// JSON files of other resource types are skipped. Manifests that already
/// carry content are kept as they are; the rest are compiled from the sibling
/// script with the same file stem, falling back to `<id>.js`.
pub fn load_all_lenses(dir: impl AsRef<Path>) -> Result<Vec<LensLibrary>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LensError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut lenses = Vec::new();
    for path in json_files(dir) {
        let value = read_json(&path)?;
        if value.get("resourceType").and_then(Value::as_str) != Some(LIBRARY) {
            log::debug!("Skipping non-Library JSON {}", path.display());
            continue;
        }

        let manifest = LensLibrary::from_value(value)?;
        if manifest.has_content() {
            lenses.push(manifest);
            continue;
        }

        let source_path = source_path_for(dir, &path, &manifest).ok_or_else(|| {
            LensError::SourceNotFound {
                lens: manifest.display_name().to_string(),
                path: path.with_extension(LENS_SOURCE_EXTENSION),
            }
        })?;
        let source = read_text(&source_path)?;
        log::info!("Added content to lens: {}", manifest.display_name());
        lenses.push(compile_lens(manifest, &source));
    }

    log::info!("Loaded {} lenses from {}", lenses.len(), dir.display());
    Ok(lenses)
}

fn json_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Failed to read entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect()
}

fn source_path_for(dir: &Path, json_path: &Path, manifest: &LensLibrary) -> Option<PathBuf> {
    let sibling = json_path.with_extension(LENS_SOURCE_EXTENSION);
    if sibling.is_file() {
        return Some(sibling);
    }
    let by_id = dir.join(format!("{}.{LENS_SOURCE_EXTENSION}", manifest.id.as_deref()?));
    by_id.is_file().then_some(by_id)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| LensError::io(path, e))
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).map_err(|e| LensError::json(path, e))
}
