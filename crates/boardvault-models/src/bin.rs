//! The recycle bin for soft-deleted lists and cards.
//!
//! Deleted items keep the names of the board (and list) they were removed
//! from so a restore can target the original location, or fall back
//! deterministically when it no longer exists. Items leave the bin only
//! through an explicit restore or purge.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::list::ListObject;

/// A soft-deleted list, retaining its source board name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedList {
    /// Name of the board the list was deleted from.
    pub board: String,

    /// The deleted list, cards included.
    pub list: ListObject,
}

/// A soft-deleted card, retaining its source board and list names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCard {
    /// Name of the board the card was deleted from.
    pub board: String,

    /// Name of the list the card was deleted from.
    pub list: String,

    /// The deleted card.
    pub card: Card,
}

/// Per-workspace recycle bin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    /// Soft-deleted lists, oldest first.
    #[serde(default)]
    pub lists: Vec<DeletedList>,

    /// Soft-deleted cards, oldest first.
    #[serde(default)]
    pub cards: Vec<DeletedCard>,
}

impl Bin {
    /// Returns true if the bin holds no items.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.cards.is_empty()
    }

    /// Adds a deleted list with its source board context.
    pub fn push_list(&mut self, board: impl Into<String>, list: ListObject) {
        self.lists.push(DeletedList {
            board: board.into(),
            list,
        });
    }

    /// Adds a deleted card with its source board and list context.
    pub fn push_card(&mut self, board: impl Into<String>, list: impl Into<String>, card: Card) {
        self.cards.push(DeletedCard {
            board: board.into(),
            list: list.into(),
            card,
        });
    }

    /// Returns the first deleted list with the given name, if present.
    pub fn deleted_list(&self, name: &str) -> Option<&DeletedList> {
        self.lists.iter().find(|d| d.list.name == name)
    }

    /// Returns the first deleted card with the given name, if present.
    pub fn deleted_card(&self, name: &str) -> Option<&DeletedCard> {
        self.cards.iter().find(|d| d.card.name == name)
    }

    /// Removes and returns the first deleted list with the given name.
    pub fn take_list(&mut self, name: &str) -> Option<DeletedList> {
        let index = self.lists.iter().position(|d| d.list.name == name)?;
        Some(self.lists.remove(index))
    }

    /// Removes and returns the first deleted card with the given name.
    pub fn take_card(&mut self, name: &str) -> Option<DeletedCard> {
        let index = self.cards.iter().position(|d| d.card.name == name)?;
        Some(self.cards.remove(index))
    }

    /// Permanently removes the first deleted list with the given name,
    /// together with any binned cards that came from that list.
    ///
    /// Returns true if a list was removed.
    pub fn purge_list(&mut self, name: &str) -> bool {
        let Some(deleted) = self.take_list(name) else {
            return false;
        };
        self.cards
            .retain(|d| !(d.board == deleted.board && d.list == deleted.list.name));
        true
    }

    /// Permanently removes the first deleted card with the given name.
    ///
    /// Returns true if a card was removed.
    pub fn purge_card(&mut self, name: &str) -> bool {
        self.take_card(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_default_is_empty() {
        assert!(Bin::default().is_empty());
    }

    #[test]
    fn test_take_list_removes_entry() {
        let mut bin = Bin::default();
        bin.push_list("Sprint 1", ListObject::new("Todo"));

        let deleted = bin.take_list("Todo").unwrap();

        assert_eq!(deleted.board, "Sprint 1");
        assert_eq!(deleted.list.name, "Todo");
        assert!(bin.is_empty());
        assert!(bin.take_list("Todo").is_none());
    }

    #[test]
    fn test_purge_list_cascades_to_its_cards() {
        let mut bin = Bin::default();
        bin.push_list("Sprint 1", ListObject::new("Todo"));
        bin.push_card("Sprint 1", "Todo", Card::new("from todo"));
        bin.push_card("Sprint 1", "Done", Card::new("from done"));
        bin.push_card("Sprint 2", "Todo", Card::new("other board"));

        assert!(bin.purge_list("Todo"));

        assert!(bin.deleted_card("from todo").is_none());
        assert!(bin.deleted_card("from done").is_some());
        assert!(bin.deleted_card("other board").is_some());
    }

    #[test]
    fn test_purge_missing_returns_false() {
        let mut bin = Bin::default();

        assert!(!bin.purge_list("zzz"));
        assert!(!bin.purge_card("zzz"));
    }

    #[test]
    fn test_bin_serialization_roundtrip() {
        let mut bin = Bin::default();
        let mut list = ListObject::new("Todo");
        list.create_card("inner").unwrap();
        bin.push_list("Sprint 1", list);
        bin.push_card("Sprint 1", "Done", Card::new("task"));

        let json = serde_json::to_string(&bin).unwrap();
        let deserialized: Bin = serde_json::from_str(&json).unwrap();

        assert_eq!(bin, deserialized);
    }
}
