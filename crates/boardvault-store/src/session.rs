//! Workspace sessions: load, save and mutate one workspace's document.
//!
//! A [`WorkspaceSession`] is the only reader and writer of a workspace's
//! backing document. It owns the in-memory [`Workspace`], the document
//! location and, for encrypted workspaces, the cached [`SessionKey`], so
//! the slow key derivation runs once per open or password change and
//! never on the auto-save that follows every mutation. Dropping the
//! session zeroizes the key material.

use std::path::{Path, PathBuf};

use tracing::debug;

use boardvault_crypto::{self as crypto, CryptoError, SessionKey};
use boardvault_models::{DeletedCard, DeletedList, Workspace};

use crate::atomic::{atomic_write, parse_json, read_bytes};
use crate::error::{Result, StoreError};

/// Which kind of bin item a restore or purge targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinItemKind {
    List,
    Card,
}

impl BinItemKind {
    fn label(self) -> &'static str {
        match self {
            Self::List => "deleted list",
            Self::Card => "deleted card",
        }
    }
}

/// An open workspace: the in-memory entity tree, its document location
/// and the session's cached encryption key (if a password is set).
pub struct WorkspaceSession {
    workspace: Workspace,
    location: PathBuf,
    key: Option<SessionKey>,
}

impl WorkspaceSession {
    /// Opens the workspace document at `location`.
    ///
    /// Ciphertext documents (detected structurally, no registry hint
    /// needed) require a password: absent one the call fails with
    /// [`StoreError::PasswordRequired`], and a wrong password or corrupt
    /// blob fails with [`StoreError::DecryptionFailed`]. Plaintext
    /// documents are parsed directly.
    pub fn open(location: impl Into<PathBuf>, password: Option<&str>) -> Result<Self> {
        let location = location.into();
        if !location.exists() {
            return Err(StoreError::NotFound {
                kind: "workspace document".to_string(),
                name: location.display().to_string(),
            });
        }

        let bytes = read_bytes(&location)?;
        let (payload, key) = if crypto::is_ciphertext(&bytes) {
            let password = password.ok_or_else(|| StoreError::PasswordRequired {
                path: location.clone(),
            })?;
            let (payload, key) = crypto::open(&bytes, password)?;
            (payload, Some(key))
        } else {
            (bytes, None)
        };

        let workspace = parse_json(&location, &payload)?;
        debug!(location = %location.display(), encrypted = key.is_some(), "opened workspace");
        Ok(Self {
            workspace,
            location,
            key,
        })
    }

    /// Creates a fresh plaintext workspace document at `location` and
    /// opens a session on it.
    pub fn create(location: impl Into<PathBuf>, name: &str) -> Result<Self> {
        let mut session = Self {
            workspace: Workspace::new(name),
            location: location.into(),
            key: None,
        };
        session.save()?;
        Ok(session)
    }

    /// The workspace this session owns.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Mutable access for callers that batch mutations before an explicit
    /// [`save`](Self::save); prefer [`update`](Self::update).
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    /// The backing document's location.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Whether saves are encrypted (a password is set for this session).
    pub fn is_encrypted(&self) -> bool {
        self.key.is_some()
    }

    /// Persists the workspace to its document, atomically.
    ///
    /// Refreshes `last_edited`, serializes, seals with the session key if
    /// one is set, and atomically replaces the target file. On failure
    /// the previous document is left untouched while the in-memory
    /// mutation stays applied; callers surface the error and may retry.
    pub fn save(&mut self) -> Result<()> {
        self.workspace.touch();
        let json = serde_json::to_vec_pretty(&self.workspace)?;
        let payload = match &self.key {
            Some(key) => key.seal(&json)?,
            None => json,
        };
        atomic_write(&self.location, &payload)
    }

    /// Applies a model mutation and auto-saves.
    ///
    /// This is the mutation entry point the UI layer calls: it never
    /// needs a separate save step.
    pub fn update<T>(
        &mut self,
        mutate: impl FnOnce(&mut Workspace) -> boardvault_models::Result<T>,
    ) -> Result<T> {
        let value = mutate(&mut self.workspace)?;
        self.save()?;
        Ok(value)
    }

    /// Sets, changes or removes the workspace password, then re-saves the
    /// document in its new form.
    ///
    /// When a password is already set, `current` must match it. `None`
    /// (or an empty string) for `new` removes the password, reverting the
    /// document to plaintext. The caller updates the registry's
    /// encrypted flag afterwards.
    pub fn set_password(&mut self, current: Option<&str>, new: Option<&str>) -> Result<()> {
        if let Some(key) = &self.key {
            let attempt = current.ok_or_else(|| StoreError::PasswordRequired {
                path: self.location.clone(),
            })?;
            if SessionKey::rederive(attempt, *key.salt()) != *key {
                return Err(CryptoError::WrongPasswordOrCorruptData.into());
            }
        }
        self.key = new.filter(|p| !p.is_empty()).map(SessionKey::generate);
        self.save()
    }

    /// Soft-deletes a list (cards included) into the bin, then saves.
    ///
    /// The completed flag does not follow the list into the bin, so a
    /// later restore cannot produce a board with two completed lists.
    pub fn soft_delete_list(&mut self, board_name: &str, list_name: &str) -> Result<()> {
        let board = self.board_mut(board_name)?;
        let mut list = board.take_list(list_name)?;
        list.is_completed = false;
        self.workspace.bin.push_list(board_name, list);
        self.save()
    }

    /// Soft-deletes a card into the bin with its source context, then
    /// saves.
    pub fn soft_delete_card(
        &mut self,
        board_name: &str,
        list_name: &str,
        card_name: &str,
    ) -> Result<()> {
        let board = self.board_mut(board_name)?;
        let list = board
            .list_mut(list_name)
            .ok_or_else(|| StoreError::NotFound {
                kind: "list".to_string(),
                name: list_name.to_string(),
            })?;
        let card = list.take_card(card_name)?;
        self.workspace.bin.push_card(board_name, list_name, card);
        self.save()
    }

    /// Restores a bin item, then saves.
    ///
    /// The destination is deterministic and the restore always succeeds:
    /// the original location when it still exists, otherwise a fallback
    /// (selected board, its first list, or a recreated container), with
    /// name collisions resolved by a "(restored)" suffix.
    pub fn restore_item(&mut self, name: &str, kind: BinItemKind) -> Result<()> {
        match kind {
            BinItemKind::List => self.restore_list(name)?,
            BinItemKind::Card => self.restore_card(name)?,
        }
        self.save()
    }

    /// Permanently removes a bin item, then saves.
    ///
    /// Purging a list also purges the binned cards that came from it.
    pub fn purge_item(&mut self, name: &str, kind: BinItemKind) -> Result<()> {
        let removed = match kind {
            BinItemKind::List => self.workspace.bin.purge_list(name),
            BinItemKind::Card => self.workspace.bin.purge_card(name),
        };
        if !removed {
            return Err(StoreError::NotFound {
                kind: kind.label().to_string(),
                name: name.to_string(),
            });
        }
        self.save()
    }

    fn restore_list(&mut self, name: &str) -> Result<()> {
        let DeletedList {
            board: source_board,
            mut list,
        } = self
            .workspace
            .bin
            .take_list(name)
            .ok_or_else(|| StoreError::NotFound {
                kind: BinItemKind::List.label().to_string(),
                name: name.to_string(),
            })?;

        let target = self.destination_board(&source_board)?;
        let board = self.board_mut(&target)?;
        list.name = unique_name(&list.name, |candidate| board.list(candidate).is_some());
        board.add_list(list)?;
        Ok(())
    }

    fn restore_card(&mut self, name: &str) -> Result<()> {
        let DeletedCard {
            board: source_board,
            list: source_list,
            mut card,
        } = self
            .workspace
            .bin
            .take_card(name)
            .ok_or_else(|| StoreError::NotFound {
                kind: BinItemKind::Card.label().to_string(),
                name: name.to_string(),
            })?;

        let target_board = self.destination_board(&source_board)?;
        let board = self.board_mut(&target_board)?;
        let target_list = if target_board == source_board && board.list(&source_list).is_some() {
            source_list
        } else if let Some(first) = board.lists.first() {
            first.name.clone()
        } else {
            board.create_list("Restored")?;
            "Restored".to_string()
        };

        let list = board
            .list_mut(&target_list)
            .ok_or_else(|| StoreError::NotFound {
                kind: "list".to_string(),
                name: target_list.clone(),
            })?;
        card.name = unique_name(&card.name, |candidate| list.card(candidate).is_some());
        list.add_card(card)?;
        Ok(())
    }

    /// Picks the board a restore lands on: the source board when it still
    /// exists, else the selected board, else the source board recreated
    /// (only possible when the workspace has no boards at all).
    fn destination_board(&mut self, source: &str) -> Result<String> {
        if self.workspace.board(source).is_some() {
            return Ok(source.to_string());
        }
        if let Some(selected) = self.workspace.selected_board() {
            return Ok(selected.name.clone());
        }
        self.workspace.create_board(source)?;
        Ok(source.to_string())
    }

    fn board_mut(&mut self, name: &str) -> Result<&mut boardvault_models::Board> {
        self.workspace
            .board_mut(name)
            .ok_or_else(|| StoreError::NotFound {
                kind: "board".to_string(),
                name: name.to_string(),
            })
    }
}

/// Returns `base` if the predicate says it is free, otherwise the first
/// free "`base (restored)`" / "`base (restored N)`" variant.
fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut candidate = format!("{base} (restored)");
    let mut n = 2;
    while taken(&candidate) {
        candidate = format!("{base} (restored {n})");
        n += 1;
    }
    candidate
}
