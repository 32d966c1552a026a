//! Workspace types for BoardVault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bin::Bin;
use crate::board::Board;
use crate::error::{ModelError, Result};

/// A top-level named project container.
///
/// Owns an ordered sequence of boards, the index of the board shown on
/// next open, and the workspace's recycle bin. Whenever boards are added
/// or removed, `selected_board_index` is clamped so that a non-empty
/// workspace always selects a valid board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Name of the workspace.
    pub name: String,

    /// Updated on every successful save.
    pub last_edited: DateTime<Utc>,

    /// Boards in display order.
    #[serde(default)]
    pub boards: Vec<Board>,

    /// Index of the board shown on next open.
    #[serde(default)]
    pub selected_board_index: usize,

    /// Recycle bin for soft-deleted lists and cards.
    #[serde(default)]
    pub bin: Bin,
}

impl Workspace {
    /// Creates a new workspace with a single empty default board.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let board = Board::new(format!("{name} Board"));
        Self {
            name,
            last_edited: Utc::now(),
            boards: vec![board],
            selected_board_index: 0,
            bin: Bin::default(),
        }
    }

    /// Refreshes the last-edited timestamp.
    pub fn touch(&mut self) {
        self.last_edited = Utc::now();
    }

    /// Returns the board with the given name, if present.
    pub fn board(&self, name: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.name == name)
    }

    /// Returns a mutable reference to the board with the given name.
    pub fn board_mut(&mut self, name: &str) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.name == name)
    }

    /// Creates a new empty board at the end of the sequence.
    ///
    /// Fails with [`ModelError::DuplicateName`] if a board with that name
    /// already exists in this workspace.
    pub fn create_board(&mut self, name: impl Into<String>) -> Result<&mut Board> {
        let name = name.into();
        if self.board(&name).is_some() {
            return Err(ModelError::duplicate("board", name));
        }
        self.boards.push(Board::new(name));
        let last = self.boards.len() - 1;
        Ok(&mut self.boards[last])
    }

    /// Renames a board, re-checking name uniqueness within the workspace.
    pub fn rename_board(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        if new_name != old_name && self.board(&new_name).is_some() {
            return Err(ModelError::duplicate("board", new_name));
        }
        let board = self
            .board_mut(old_name)
            .ok_or_else(|| ModelError::not_found("board", old_name))?;
        board.name = new_name;
        Ok(())
    }

    /// Removes and returns the board with the given name.
    ///
    /// Board deletion is immediate and unrecoverable; boards do not pass
    /// through the bin. The selected index is clamped afterwards.
    pub fn remove_board(&mut self, name: &str) -> Result<Board> {
        let index = self
            .boards
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| ModelError::not_found("board", name))?;
        let board = self.boards.remove(index);
        self.clamp_selected_index();
        Ok(board)
    }

    /// Selects the board at the given index, clamped to the valid range.
    pub fn select_board(&mut self, index: usize) {
        self.selected_board_index = index;
        self.clamp_selected_index();
    }

    /// Returns the currently selected board, or `None` if the workspace
    /// has no boards.
    pub fn selected_board(&self) -> Option<&Board> {
        self.boards.get(self.selected_board_index)
    }

    /// Returns a mutable reference to the currently selected board.
    pub fn selected_board_mut(&mut self) -> Option<&mut Board> {
        self.boards.get_mut(self.selected_board_index)
    }

    fn clamp_selected_index(&mut self) {
        if self.boards.is_empty() {
            self.selected_board_index = 0;
        } else if self.selected_board_index >= self.boards.len() {
            self.selected_board_index = self.boards.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    #[test]
    fn test_new_workspace_has_default_board() {
        let ws = Workspace::new("Alpha");

        assert_eq!(ws.boards.len(), 1);
        assert_eq!(ws.boards[0].name, "Alpha Board");
        assert_eq!(ws.selected_board_index, 0);
        assert!(ws.bin.is_empty());
    }

    #[test]
    fn test_create_board_rejects_duplicate() {
        let mut ws = Workspace::new("Alpha");
        ws.create_board("Sprint 1").unwrap();

        assert!(matches!(
            ws.create_board("Sprint 1"),
            Err(ModelError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_rename_board_rechecks_uniqueness() {
        let mut ws = Workspace::new("Alpha");
        ws.create_board("Sprint 1").unwrap();

        assert!(matches!(
            ws.rename_board("Sprint 1", "Alpha Board"),
            Err(ModelError::DuplicateName { .. })
        ));

        ws.rename_board("Sprint 1", "Sprint 2").unwrap();
        assert!(ws.board("Sprint 2").is_some());
    }

    #[test]
    fn test_remove_board_clamps_selected_index() {
        let mut ws = Workspace::new("Alpha");
        ws.create_board("Sprint 1").unwrap();
        ws.create_board("Sprint 2").unwrap();
        ws.select_board(2);
        assert_eq!(ws.selected_board().unwrap().name, "Sprint 2");

        ws.remove_board("Sprint 2").unwrap();

        assert_eq!(ws.selected_board_index, 1);
        assert_eq!(ws.selected_board().unwrap().name, "Sprint 1");
    }

    #[test]
    fn test_remove_last_board_leaves_empty_workspace() {
        let mut ws = Workspace::new("Alpha");

        ws.remove_board("Alpha Board").unwrap();

        assert!(ws.boards.is_empty());
        assert_eq!(ws.selected_board_index, 0);
        assert!(ws.selected_board().is_none());
    }

    #[test]
    fn test_select_board_clamps() {
        let mut ws = Workspace::new("Alpha");
        ws.create_board("Sprint 1").unwrap();

        ws.select_board(99);

        assert_eq!(ws.selected_board_index, 1);
    }

    #[test]
    fn test_touch_advances_last_edited() {
        let mut ws = Workspace::new("Alpha");
        let before = ws.last_edited;

        ws.touch();

        assert!(ws.last_edited >= before);
    }

    #[test]
    fn test_workspace_serialization_roundtrip() {
        let mut ws = Workspace::new("Alpha");
        let board = ws.selected_board_mut().unwrap();
        let list = board.create_list("Todo").unwrap();
        let card = list.create_card("Write spec").unwrap();
        card.set_priority(3);
        ws.create_board("Empty").unwrap();
        ws.bin.push_card("Alpha Board", "Todo", Card::new("binned"));

        let json = serde_json::to_string(&ws).unwrap();
        let deserialized: Workspace = serde_json::from_str(&json).unwrap();

        assert_eq!(ws, deserialized);
    }

    #[test]
    fn test_workspace_missing_optional_fields_default() {
        let json = r#"{"name":"Alpha","last_edited":"2025-06-15T10:00:00Z"}"#;

        let ws: Workspace = serde_json::from_str(json).unwrap();

        assert!(ws.boards.is_empty());
        assert_eq!(ws.selected_board_index, 0);
        assert!(ws.bin.is_empty());
    }

    #[test]
    fn test_workspace_wrong_field_type_fails() {
        let json = r#"{"name":"Alpha","last_edited":"2025-06-15T10:00:00Z","boards":{}}"#;

        let err = serde_json::from_str::<Workspace>(json).unwrap_err();

        assert!(err.to_string().contains("sequence"), "{err}");
    }
}
