//! Persistence layer for BoardVault.
//!
//! This crate provides crash-safe, optionally encrypted persistence for
//! workspace documents using atomic file operations (write to a temp
//! file, then rename), plus the process-wide registry of workspaces.
//!
//! # Example
//!
//! ```no_run
//! use boardvault_store::{BinItemKind, WorkspaceRegistry, WorkspaceSession};
//!
//! let mut registry = WorkspaceRegistry::open_default();
//! let entry = registry.create("Alpha").unwrap();
//!
//! // Every mutation auto-saves.
//! let mut session = WorkspaceSession::open(&entry.location, None).unwrap();
//! session
//!     .update(|ws| {
//!         let board = ws.create_board("Sprint 1")?;
//!         board.create_list("Todo").map(|_| ())
//!     })
//!     .unwrap();
//!
//! // Protect the workspace with a password and record it in the registry.
//! session.set_password(None, Some("hunter2")).unwrap();
//! registry.set_encrypted_flag("Alpha", true).unwrap();
//!
//! // Soft deletions are recoverable until purged.
//! session.soft_delete_list("Sprint 1", "Todo").unwrap();
//! session.restore_item("Todo", BinItemKind::List).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod registry;
pub mod session;

pub use error::{Result, StoreError};
pub use registry::{RegistryEntry, WorkspaceRegistry, HOME_ENV};
pub use session::{BinItemKind, WorkspaceSession};
