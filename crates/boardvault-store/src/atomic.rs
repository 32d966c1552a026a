//! Atomic file operations for crash-safe persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, StoreError};

/// Writes data to a file atomically.
///
/// Writes to a temporary file in the target directory first, then renames
/// it onto the target path. The addressable document is never observable
/// in a partially written state: a failure at any point leaves the
/// previous file untouched.
///
/// # Errors
/// Returns an error if the write or rename fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    // Create temp file in same directory (for same-filesystem rename)
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    temp_file
        .write_all(data)
        .map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    temp_file.flush().map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    // Atomic rename
    temp_file.persist(path).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Serializes a value to pretty JSON and writes it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &json)
}

/// Reads a file's raw bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserializes a value from a JSON payload read from `path`.
///
/// Parse failures are reported as [`StoreError::MalformedDocument`] with
/// the field and position information serde provides.
pub fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|source| StoreError::MalformedDocument {
        path: path.to_path_buf(),
        source,
    })
}
