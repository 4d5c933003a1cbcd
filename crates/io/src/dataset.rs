// Local dataset file
// Pretty JSON under the platform data directory unless a path is given.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roilens_core::Dataset;

/// Error type for dataset file operations.
#[derive(Debug)]
pub enum DatasetError {
    /// No dataset file exists at the resolved path.
    Missing(PathBuf),
    /// Reading or writing the file failed.
    Io(PathBuf, String),
    /// The file contents were not valid dataset JSON.
    Malformed(PathBuf, String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Missing(path) => write!(
                f,
                "no dataset file at {} (run `roilens pull` to fetch one)",
                path.display()
            ),
            DatasetError::Io(path, msg) => write!(f, "cannot access {}: {}", path.display(), msg),
            DatasetError::Malformed(path, msg) => {
                write!(f, "malformed dataset file {}: {}", path.display(), msg)
            }
        }
    }
}

impl std::error::Error for DatasetError {}

/// Default location of the working copy.
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roilens")
        .join("dataset.json")
}

/// Load the working copy from disk.
///
/// A missing file is an error with a hint to run `pull`; commands that can
/// start from nothing use [`load_or_empty`] instead.
pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::Missing(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| DatasetError::Io(path.to_path_buf(), e.to_string()))?;
    serde_json::from_str(&contents)
        .map_err(|e| DatasetError::Malformed(path.to_path_buf(), e.to_string()))
}

/// Load the working copy, treating a missing file as empty.
pub fn load_or_empty(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        return Ok(Dataset::default());
    }
    load(path)
}

/// Save the working copy as pretty JSON, creating the parent directory.
pub fn save(data: &Dataset, path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| DatasetError::Io(parent.to_path_buf(), e.to_string()))?;
    }
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| DatasetError::Io(path.to_path_buf(), e.to_string()))?;
    fs::write(path, json).map_err(|e| DatasetError::Io(path.to_path_buf(), e.to_string()))
}
