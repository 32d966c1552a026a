//! The process-wide catalog of known workspaces.
//!
//! The registry maps workspace names to document locations and an
//! encrypted flag, persisted as a JSON index that is rewritten atomically
//! after every mutation. Entries whose backing document has gone missing
//! or unreadable out-of-band are dropped on listing rather than allowed
//! to break everything else.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use boardvault_crypto::is_ciphertext;
use boardvault_models::Workspace;

use crate::atomic::{atomic_write_json, read_bytes};
use crate::error::{Result, StoreError};

/// Environment variable overriding the default base directory.
pub const HOME_ENV: &str = "BOARDVAULT_HOME";

/// Default base directory name under home.
const DEFAULT_BASE_DIR: &str = ".boardvault";

/// File name of the registry index within the base directory.
const INDEX_FILE: &str = "registry.json";

/// Subdirectory holding one directory per workspace.
const WORKSPACES_SUBDIR: &str = "workspaces";

/// File name of a workspace document within its directory.
const DOCUMENT_FILE: &str = "workspace.json";

/// A catalog entry for one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Name of the workspace.
    pub name: String,

    /// Location of the workspace's backing document.
    pub location: PathBuf,

    /// Whether the document is encrypted (tracked so a UI can prompt for
    /// a password before attempting the load).
    pub is_encrypted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    location: PathBuf,
    #[serde(default)]
    is_encrypted: bool,
}

/// The process-wide workspace catalog.
pub struct WorkspaceRegistry {
    base_dir: PathBuf,
    entries: BTreeMap<String, IndexEntry>,
}

impl WorkspaceRegistry {
    /// Opens the registry rooted at `base_dir`, reading its index file.
    ///
    /// A missing index starts an empty registry; a corrupt one is logged
    /// and replaced with an empty registry on the next persisted
    /// mutation, so a damaged installation recovers instead of failing
    /// to start.
    pub fn open(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let index_path = base_dir.join(INDEX_FILE);
        let entries = match fs::read(&index_path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        index = %index_path.display(),
                        error = %err,
                        "registry index is corrupt, starting fresh"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(
                    index = %index_path.display(),
                    error = %err,
                    "registry index is unreadable, starting fresh"
                );
                BTreeMap::new()
            }
        };
        Self { base_dir, entries }
    }

    /// Opens the registry at the default location: `$BOARDVAULT_HOME`, or
    /// `~/.boardvault` when unset.
    pub fn open_default() -> Self {
        let base_dir = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(DEFAULT_BASE_DIR)
            });
        Self::open(base_dir)
    }

    /// The directory this registry is rooted at.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns true if a workspace with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the entry for a workspace, if registered.
    pub fn entry(&self, name: &str) -> Option<RegistryEntry> {
        self.entries.get(name).map(|e| RegistryEntry {
            name: name.to_string(),
            location: e.location.clone(),
            is_encrypted: e.is_encrypted,
        })
    }

    /// Creates a new workspace: allocates a document location, writes a
    /// fresh plaintext document containing one empty board, registers it
    /// and persists the index.
    pub fn create(&mut self, name: &str) -> Result<RegistryEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidData(
                "workspace name must be non-empty".to_string(),
            ));
        }
        if self.entries.contains_key(name) {
            return Err(StoreError::DuplicateName {
                kind: "workspace".to_string(),
                name: name.to_string(),
            });
        }

        let location = self
            .base_dir
            .join(WORKSPACES_SUBDIR)
            .join(name)
            .join(DOCUMENT_FILE);
        atomic_write_json(&location, &Workspace::new(name))?;

        self.entries.insert(
            name.to_string(),
            IndexEntry {
                location: location.clone(),
                is_encrypted: false,
            },
        );
        self.persist_index()?;
        debug!(workspace = name, location = %location.display(), "created workspace");
        Ok(RegistryEntry {
            name: name.to_string(),
            location,
            is_encrypted: false,
        })
    }

    /// Renames a workspace in the registry.
    ///
    /// Registry metadata only: the backing document keeps its location.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::InvalidData(
                "workspace name must be non-empty".to_string(),
            ));
        }
        if new_name != old_name && self.entries.contains_key(new_name) {
            return Err(StoreError::DuplicateName {
                kind: "workspace".to_string(),
                name: new_name.to_string(),
            });
        }
        let entry = self
            .entries
            .remove(old_name)
            .ok_or_else(|| StoreError::NotFound {
                kind: "workspace".to_string(),
                name: old_name.to_string(),
            })?;
        self.entries.insert(new_name.to_string(), entry);
        self.persist_index()
    }

    /// Deletes a workspace: drops the registry entry and removes the
    /// backing document. Irreversible — workspaces do not pass through
    /// the bin.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let entry = self
            .entries
            .remove(name)
            .ok_or_else(|| StoreError::NotFound {
                kind: "workspace".to_string(),
                name: name.to_string(),
            })?;

        if entry.location.exists() {
            fs::remove_file(&entry.location).map_err(|source| StoreError::Write {
                path: entry.location.clone(),
                source,
            })?;
            // drop the workspace's now-empty directory, best effort
            if let Some(parent) = entry.location.parent() {
                let _ = fs::remove_dir(parent);
            }
        }
        self.persist_index()
    }

    /// Lists all registered workspaces.
    ///
    /// Self-healing: entries whose document is missing or fails the cheap
    /// header check are dropped with a warning and the index is
    /// rewritten, so one broken workspace never blocks listing the rest.
    pub fn list_all(&mut self) -> Result<Vec<RegistryEntry>> {
        let mut dropped = false;
        self.entries.retain(|name, entry| {
            if document_is_readable(&entry.location) {
                true
            } else {
                warn!(
                    workspace = name.as_str(),
                    location = %entry.location.display(),
                    "dropping registry entry with missing or unreadable document"
                );
                dropped = true;
                false
            }
        });
        if dropped {
            self.persist_index()?;
        }

        Ok(self
            .entries
            .iter()
            .map(|(name, entry)| RegistryEntry {
                name: name.clone(),
                location: entry.location.clone(),
                is_encrypted: entry.is_encrypted,
            })
            .collect())
    }

    /// Records whether a workspace's document is encrypted, after the
    /// store has added or removed a password on it.
    pub fn set_encrypted_flag(&mut self, name: &str, is_encrypted: bool) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound {
                kind: "workspace".to_string(),
                name: name.to_string(),
            })?;
        entry.is_encrypted = is_encrypted;
        self.persist_index()
    }

    fn persist_index(&self) -> Result<()> {
        atomic_write_json(&self.base_dir.join(INDEX_FILE), &self.entries)
    }
}

/// Cheap structural check that a document exists and is at least
/// header-parseable: either an encrypted blob or something that starts
/// like a JSON object.
fn document_is_readable(location: &Path) -> bool {
    let Ok(bytes) = read_bytes(location) else {
        return false;
    };
    is_ciphertext(&bytes)
        || bytes
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'{')
}
