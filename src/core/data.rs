//! TOML data file discovery and parsing shared by the registries

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::core::error::DataError;

/// Every `.toml` file under `path`, recursively, in sorted path order
pub fn toml_files(path: &Path) -> Result<Vec<PathBuf>, DataError> {
    let mut files = Vec::new();
    collect_toml_files(path, &mut files)?;
    Ok(files)
}

fn collect_toml_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), DataError> {
    let mut entries: Vec<_> = std::fs::read_dir(path)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    // Directory order is platform dependent
    entries.sort();

    for entry_path in entries {
        if entry_path.is_dir() {
            collect_toml_files(&entry_path, files)?;
        } else if entry_path.extension().map_or(false, |ext| ext == "toml") {
            files.push(entry_path);
        }
    }
    Ok(())
}

/// Parse TOML text; `origin` names the source in error messages
pub fn parse_toml<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T, DataError> {
    toml::from_str(content).map_err(|source| DataError::Toml {
        origin: origin.to_string(),
        source,
    })
}
