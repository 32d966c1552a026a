//! Board types for BoardVault.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::list::ListObject;

/// A named collection of ordered lists within a workspace.
///
/// A board with zero lists is a valid empty state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Name of the board.
    pub name: String,

    /// Lists in display order.
    #[serde(default)]
    pub lists: Vec<ListObject>,
}

impl Board {
    /// Creates a new, empty board.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lists: Vec::new(),
        }
    }

    /// Returns the list with the given name, if present.
    pub fn list(&self, name: &str) -> Option<&ListObject> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// Returns a mutable reference to the list with the given name.
    pub fn list_mut(&mut self, name: &str) -> Option<&mut ListObject> {
        self.lists.iter_mut().find(|l| l.name == name)
    }

    /// Creates a new empty list at the end of the board.
    ///
    /// Fails with [`ModelError::DuplicateName`] if a list with that name
    /// already exists on this board.
    pub fn create_list(&mut self, name: impl Into<String>) -> Result<&mut ListObject> {
        self.add_list(ListObject::new(name.into()))?;
        let last = self.lists.len() - 1;
        Ok(&mut self.lists[last])
    }

    /// Appends an existing list to the board, enforcing name uniqueness.
    pub fn add_list(&mut self, list: ListObject) -> Result<()> {
        if self.list(&list.name).is_some() {
            return Err(ModelError::duplicate("list", list.name));
        }
        self.lists.push(list);
        Ok(())
    }

    /// Renames a list, re-checking name uniqueness within the board.
    pub fn rename_list(&mut self, old_name: &str, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        if new_name != old_name && self.list(&new_name).is_some() {
            return Err(ModelError::duplicate("list", new_name));
        }
        let list = self
            .list_mut(old_name)
            .ok_or_else(|| ModelError::not_found("list", old_name))?;
        list.name = new_name;
        Ok(())
    }

    /// Removes and returns the list with the given name.
    pub fn take_list(&mut self, name: &str) -> Result<ListObject> {
        let index = self
            .lists
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| ModelError::not_found("list", name))?;
        Ok(self.lists.remove(index))
    }

    /// Moves a list to a new position, preserving the relative order of
    /// the remaining lists. The index is clamped to the board length.
    pub fn move_list(&mut self, name: &str, index: usize) -> Result<()> {
        let list = self.take_list(name)?;
        let index = index.min(self.lists.len());
        self.lists.insert(index, list);
        Ok(())
    }

    /// Moves a card from one list to another on this board.
    ///
    /// The card keeps its position relative to the remaining cards of the
    /// source list and is inserted at `index` in the destination (clamped;
    /// `None` appends). Fails with [`ModelError::DuplicateName`] if the
    /// destination already holds a card with that name, in which case the
    /// source list is left unchanged.
    pub fn move_card(
        &mut self,
        from_list: &str,
        card_name: &str,
        to_list: &str,
        index: Option<usize>,
    ) -> Result<()> {
        let to_pos = self
            .lists
            .iter()
            .position(|l| l.name == to_list)
            .ok_or_else(|| ModelError::not_found("list", to_list))?;
        if from_list != to_list && self.lists[to_pos].card(card_name).is_some() {
            return Err(ModelError::duplicate("card", card_name));
        }

        let source = self
            .list_mut(from_list)
            .ok_or_else(|| ModelError::not_found("list", from_list))?;
        let card = source.take_card(card_name)?;

        let destination = &mut self.lists[to_pos];
        let index = index
            .unwrap_or(destination.cards.len())
            .min(destination.cards.len());
        destination.cards.insert(index, card);
        Ok(())
    }

    /// Marks the named list as this board's completed column, or clears
    /// the flag entirely when `name` is `None`.
    ///
    /// A single pass over the board's lists clears every other flag and
    /// sets the target, so no intermediate state with two completed lists
    /// is ever observable.
    pub fn set_completed_list(&mut self, name: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            if self.list(name).is_none() {
                return Err(ModelError::not_found("list", name));
            }
        }
        for list in &mut self.lists {
            list.is_completed = name == Some(list.name.as_str());
        }
        Ok(())
    }

    /// Returns the name of the completed list, if one is set.
    pub fn completed_list_name(&self) -> Option<&str> {
        self.lists
            .iter()
            .find(|l| l.is_completed)
            .map(|l| l.name.as_str())
    }
}
