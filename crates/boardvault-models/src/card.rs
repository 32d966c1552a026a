//! Card types for BoardVault.
//!
//! A card is a single task with a name, free-form description, optional
//! deadline and a 0-5 priority.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lowest assignable priority (no priority).
pub const MIN_PRIORITY: u8 = 0;

/// Highest assignable priority.
pub const MAX_PRIORITY: u8 = 5;

/// Display labels for each priority level, indexed by value.
pub const PRIORITY_LABELS: [&str; 6] = ["None", "Lowest", "Low", "Medium", "High", "Highest"];

/// Returns the display label for a priority value.
///
/// Total over all inputs: out-of-range values clamp to the nearest bound.
pub fn priority_label(priority: u8) -> &'static str {
    PRIORITY_LABELS[priority.min(MAX_PRIORITY) as usize]
}

/// A single task on a list.
///
/// Identity is the card's name, unique within its owning list at the time
/// of creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Name of the card.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Priority from 0 (none) to 5 (highest).
    #[serde(default)]
    pub priority: u8,
}

impl Card {
    /// Creates a new card with the given name and no other attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            deadline: None,
            priority: MIN_PRIORITY,
        }
    }

    /// Replaces the card's description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sets or clears the card's deadline.
    pub fn set_deadline(&mut self, deadline: Option<NaiveDate>) {
        self.deadline = deadline;
    }

    /// Sets the card's priority, clamping any value into the valid range.
    pub fn set_priority(&mut self, priority: i64) {
        self.priority = priority.clamp(MIN_PRIORITY as i64, MAX_PRIORITY as i64) as u8;
    }

    /// Returns the display label for this card's priority.
    pub fn priority_label(&self) -> &'static str {
        priority_label(self.priority)
    }

    /// Returns true if the card's deadline lies strictly before `today`.
    ///
    /// Cards without a deadline are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline.is_some_and(|deadline| deadline < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_new_defaults() {
        let card = Card::new("Write spec");

        assert_eq!(card.name, "Write spec");
        assert_eq!(card.description, "");
        assert!(card.deadline.is_none());
        assert_eq!(card.priority, 0);
    }

    #[test]
    fn test_set_priority_clamps() {
        let mut card = Card::new("task");

        card.set_priority(3);
        assert_eq!(card.priority, 3);

        card.set_priority(42);
        assert_eq!(card.priority, MAX_PRIORITY);

        card.set_priority(-1);
        assert_eq!(card.priority, MIN_PRIORITY);
    }

    #[test]
    fn test_priority_label_total() {
        assert_eq!(priority_label(0), "None");
        assert_eq!(priority_label(5), "Highest");
        assert_eq!(priority_label(200), "Highest");
    }

    #[test]
    fn test_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        let mut card = Card::new("task");
        assert!(!card.is_overdue(today));

        card.deadline = NaiveDate::from_ymd_opt(2025, 6, 14);
        assert!(card.is_overdue(today));

        card.deadline = NaiveDate::from_ymd_opt(2025, 6, 15);
        assert!(!card.is_overdue(today));
    }

    #[test]
    fn test_card_serialization_roundtrip() {
        let mut card = Card::new("Write spec");
        card.description = "Draft the storage section".to_string();
        card.deadline = NaiveDate::from_ymd_opt(2025, 7, 1);
        card.set_priority(3);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }

    #[test]
    fn test_card_missing_optional_fields_default() {
        let card: Card = serde_json::from_str(r#"{"name":"bare"}"#).unwrap();

        assert_eq!(card.name, "bare");
        assert_eq!(card.description, "");
        assert!(card.deadline.is_none());
        assert_eq!(card.priority, 0);
    }

    #[test]
    fn test_card_absent_deadline_not_serialized() {
        let card = Card::new("bare");
        let json = serde_json::to_string(&card).unwrap();

        assert!(!json.contains("deadline"));
    }

    #[test]
    fn test_card_missing_required_field_fails() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"description":"x"}"#);
        let err = result.unwrap_err().to_string();

        assert!(err.contains("name"), "error should name the field: {err}");
    }
}
