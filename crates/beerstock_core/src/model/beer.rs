//! Beer stock domain model.
//!
//! # Responsibility
//! - Define the canonical stock record shared by service, storage and transport.
//! - Validate runtime invariants before any persistence write.
//!
//! # Invariants
//! - `id` is assigned by storage on first save and never reused.
//! - `0 <= quantity <= capacity_max` for every persisted record.
//! - `name` and `brand` are non-empty and at most `MAX_TEXT_CHARS` characters.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identity of a beer record.
pub type BeerId = i64;

/// Maximum character count for `name` and `brand`.
pub const MAX_TEXT_CHARS: usize = 200;
/// Upper limit for `capacity_max`.
pub const MAX_CAPACITY: u32 = 500;

/// Closed set of beer styles a record can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BeerCategory {
    Lager,
    Malzbier,
    Witbier,
    Weiss,
    Ale,
    Ipa,
    Stout,
    Pilsen,
}

impl BeerCategory {
    /// Every category in declaration order.
    pub const ALL: [BeerCategory; 8] = [
        Self::Lager,
        Self::Malzbier,
        Self::Witbier,
        Self::Weiss,
        Self::Ale,
        Self::Ipa,
        Self::Stout,
        Self::Pilsen,
    ];

    /// Stable lowercase id used for storage columns and CLI arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lager => "lager",
            Self::Malzbier => "malzbier",
            Self::Witbier => "witbier",
            Self::Weiss => "weiss",
            Self::Ale => "ale",
            Self::Ipa => "ipa",
            Self::Stout => "stout",
            Self::Pilsen => "pilsen",
        }
    }

    /// Parses a category id, ignoring ASCII case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

impl Display for BeerCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One beer stock line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    /// `None` until the record is first saved.
    pub id: Option<BeerId>,
    pub name: String,
    pub brand: String,
    /// Exposed as `max` on the wire.
    pub capacity_max: u32,
    pub quantity: u32,
    /// Exposed as `type` on the wire.
    pub category: BeerCategory,
}

impl Beer {
    /// Creates an unsaved record.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        capacity_max: u32,
        quantity: u32,
        category: BeerCategory,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            brand: brand.into(),
            capacity_max,
            quantity,
            category,
        }
    }

    /// Returns `quantity + amount` when it stays within `capacity_max`.
    pub fn quantity_after_increment(&self, amount: u32) -> Option<u32> {
        self.quantity
            .checked_add(amount)
            .filter(|next| *next <= self.capacity_max)
    }

    /// Returns `quantity - amount` when it does not go below zero.
    pub fn quantity_after_decrement(&self, amount: u32) -> Option<u32> {
        self.quantity.checked_sub(amount)
    }

    /// Checks runtime invariants required before persistence.
    pub fn validate(&self) -> Result<(), BeerValidationError> {
        validate_text("name", &self.name)?;
        validate_text("brand", &self.brand)?;

        if self.capacity_max > MAX_CAPACITY {
            return Err(BeerValidationError::CapacityTooLarge {
                capacity_max: self.capacity_max,
            });
        }
        if self.quantity > self.capacity_max {
            return Err(BeerValidationError::QuantityAboveCapacity {
                quantity: self.quantity,
                capacity_max: self.capacity_max,
            });
        }

        Ok(())
    }
}

fn validate_text(field: &'static str, value: &str) -> Result<(), BeerValidationError> {
    if value.is_empty() {
        return Err(BeerValidationError::EmptyText { field });
    }
    let chars = value.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(BeerValidationError::TextTooLong { field, chars });
    }
    Ok(())
}

/// Runtime invariant violation of a `Beer` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeerValidationError {
    EmptyText { field: &'static str },
    TextTooLong { field: &'static str, chars: usize },
    CapacityTooLarge { capacity_max: u32 },
    QuantityAboveCapacity { quantity: u32, capacity_max: u32 },
}

impl Display for BeerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText { field } => write!(f, "{field} must not be empty"),
            Self::TextTooLong { field, chars } => write!(
                f,
                "{field} has {chars} characters; at most {MAX_TEXT_CHARS} allowed"
            ),
            Self::CapacityTooLarge { capacity_max } => write!(
                f,
                "capacity {capacity_max} exceeds the limit of {MAX_CAPACITY}"
            ),
            Self::QuantityAboveCapacity {
                quantity,
                capacity_max,
            } => write!(f, "quantity {quantity} exceeds capacity {capacity_max}"),
        }
    }
}

impl Error for BeerValidationError {}

#[cfg(test)]
mod tests {
    use super::{Beer, BeerCategory, BeerValidationError};

    fn skol() -> Beer {
        Beer::new("Skol", "Ambev", 100, 10, BeerCategory::Lager)
    }

    #[test]
    fn increment_stops_at_capacity() {
        let beer = skol();
        assert_eq!(beer.quantity_after_increment(90), Some(100));
        assert_eq!(beer.quantity_after_increment(91), None);
        assert_eq!(beer.quantity_after_increment(u32::MAX), None);
    }

    #[test]
    fn decrement_stops_at_zero() {
        let beer = skol();
        assert_eq!(beer.quantity_after_decrement(10), Some(0));
        assert_eq!(beer.quantity_after_decrement(11), None);
    }

    #[test]
    fn validate_rejects_empty_name_but_keeps_whitespace() {
        let mut beer = skol();
        beer.name = String::new();
        assert_eq!(
            beer.validate(),
            Err(BeerValidationError::EmptyText { field: "name" })
        );

        beer.name = "   ".to_string();
        assert_eq!(beer.validate(), Ok(()));
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(BeerCategory::parse(" IPA "), Some(BeerCategory::Ipa));
        assert_eq!(BeerCategory::parse("porter"), None);
    }
}
