//! List types for BoardVault.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::{ModelError, Result};

/// A named, ordered column of cards on a board.
///
/// Identity is the list's name, unique within its owning board. At most
/// one list per board may carry the completed flag; that invariant is
/// enforced by [`Board::set_completed_list`](crate::Board::set_completed_list),
/// which is the only mutation that should set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListObject {
    /// Name of the list.
    pub name: String,

    /// Cards in display order.
    #[serde(default)]
    pub cards: Vec<Card>,

    /// Whether this list is the board's "completed" column.
    #[serde(default)]
    pub is_completed: bool,
}

impl ListObject {
    /// Creates a new, empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
            is_completed: false,
        }
    }

    /// Returns the card with the given name, if present.
    pub fn card(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    /// Returns a mutable reference to the card with the given name.
    pub fn card_mut(&mut self, name: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.name == name)
    }

    /// Creates a new card at the end of the list.
    ///
    /// Fails with [`ModelError::DuplicateName`] if a card with that name
    /// already exists in this list.
    pub fn create_card(&mut self, name: impl Into<String>) -> Result<&mut Card> {
        self.add_card(Card::new(name.into()))?;
        let last = self.cards.len() - 1;
        Ok(&mut self.cards[last])
    }

    /// Appends an existing card to the list, enforcing name uniqueness.
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        if self.card(&card.name).is_some() {
            return Err(ModelError::duplicate("card", card.name));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Renames a card, re-checking name uniqueness within the list.
    pub fn rename_card(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        if new_name != old_name && self.card(&new_name).is_some() {
            return Err(ModelError::duplicate("card", new_name));
        }
        let card = self
            .card_mut(old_name)
            .ok_or_else(|| ModelError::not_found("card", old_name))?;
        card.name = new_name;
        Ok(())
    }

    /// Removes and returns the card with the given name.
    pub fn take_card(&mut self, name: &str) -> Result<Card> {
        let index = self
            .cards
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ModelError::not_found("card", name))?;
        Ok(self.cards.remove(index))
    }

    /// Moves a card to a new position, preserving the relative order of
    /// the remaining cards. The index is clamped to the list length.
    pub fn move_card(&mut self, name: &str, index: usize) -> Result<()> {
        let card = self.take_card(name)?;
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(names: &[&str]) -> ListObject {
        let mut list = ListObject::new("Todo");
        for name in names {
            list.create_card(*name).unwrap();
        }
        list
    }

    fn card_names(list: &ListObject) -> Vec<&str> {
        list.cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_create_card_rejects_duplicate() {
        let mut list = list_with(&["a"]);

        let result = list.create_card("a");

        assert!(matches!(result, Err(ModelError::DuplicateName { .. })));
        assert_eq!(list.cards.len(), 1);
    }

    #[test]
    fn test_rename_card_rechecks_uniqueness() {
        let mut list = list_with(&["a", "b"]);

        assert!(matches!(
            list.rename_card("a", "b"),
            Err(ModelError::DuplicateName { .. })
        ));

        list.rename_card("a", "c").unwrap();
        assert!(list.card("c").is_some());
        assert!(list.card("a").is_none());
    }

    #[test]
    fn test_rename_card_to_same_name_is_noop() {
        let mut list = list_with(&["a"]);
        list.rename_card("a", "a").unwrap();
        assert!(list.card("a").is_some());
    }

    #[test]
    fn test_take_card_missing() {
        let mut list = list_with(&["a"]);

        assert!(matches!(
            list.take_card("zzz"),
            Err(ModelError::NotFound { .. })
        ));
    }

    #[test]
    fn test_move_card_preserves_relative_order() {
        let mut list = list_with(&["a", "b", "c", "d"]);

        list.move_card("c", 0).unwrap();
        assert_eq!(card_names(&list), vec!["c", "a", "b", "d"]);

        list.move_card("a", 99).unwrap();
        assert_eq!(card_names(&list), vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_list_missing_optional_fields_default() {
        let list: ListObject = serde_json::from_str(r#"{"name":"Todo"}"#).unwrap();

        assert_eq!(list.name, "Todo");
        assert!(list.cards.is_empty());
        assert!(!list.is_completed);
    }

    #[test]
    fn test_list_serialization_roundtrip() {
        let mut list = list_with(&["a", "b"]);
        list.is_completed = true;
        list.card_mut("b").unwrap().set_priority(4);

        let json = serde_json::to_string(&list).unwrap();
        let deserialized: ListObject = serde_json::from_str(&json).unwrap();

        assert_eq!(list, deserialized);
    }
}
