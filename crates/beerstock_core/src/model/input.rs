//! Boundary validation for caller-supplied stock input.
//!
//! # Responsibility
//! - Turn loosely typed input (every field optional, signed numbers) into a
//!   `Beer` or a quantity delta.
//! - Report every violated field at once, not just the first.
//!
//! # Invariants
//! - Input quantities, for new records and for deltas, lie in
//!   `0..=MAX_INPUT_QUANTITY`.
//! - A record built here also passes `Beer::validate`.

use crate::model::beer::{Beer, BeerCategory, MAX_CAPACITY, MAX_TEXT_CHARS};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest quantity accepted on input, both for new records and for deltas.
pub const MAX_INPUT_QUANTITY: i64 = 100;

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every constraint an input failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Names of the violated fields, in check order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations
            .iter()
            .map(|violation| violation.field)
            .collect()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .violations
            .iter()
            .map(|violation| format!("{}: {}", violation.field, violation.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid input: {fields}")
    }
}

impl Error for ValidationError {}

/// Unvalidated fields of a new stock line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerDraft {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub capacity_max: Option<i64>,
    pub quantity: Option<i64>,
    pub category: Option<BeerCategory>,
}

impl BeerDraft {
    /// Validates the draft and builds an unsaved record.
    pub fn into_beer(self) -> Result<Beer, ValidationError> {
        let mut violations = Violations::default();

        let name = violations.text("name", self.name);
        let brand = violations.text("brand", self.brand);
        let capacity_max = violations.count("max", self.capacity_max, i64::from(MAX_CAPACITY));
        let quantity = violations.count("quantity", self.quantity, MAX_INPUT_QUANTITY);
        let category = violations.required("type", self.category);

        if let (Some(capacity_max), Some(quantity)) = (capacity_max, quantity) {
            if quantity > capacity_max {
                violations.push(
                    "quantity",
                    format!("must not exceed max ({capacity_max}), got {quantity}"),
                );
            }
        }

        let beer = match (name, brand, capacity_max, quantity, category) {
            (Some(name), Some(brand), Some(capacity_max), Some(quantity), Some(category)) => {
                Some(Beer::new(name, brand, capacity_max, quantity, category))
            }
            _ => None,
        };
        violations.finish(beer)
    }
}

/// Validates an increment/decrement amount.
pub fn quantity_delta(amount: Option<i64>) -> Result<u32, ValidationError> {
    let mut violations = Violations::default();
    let amount = violations.count("quantity", amount, MAX_INPUT_QUANTITY);
    violations.finish(amount)
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "is required");
        }
        value
    }

    fn text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let value = self.required(field, value)?;
        let chars = value.chars().count();
        if chars == 0 {
            self.push(field, "must not be empty");
            return None;
        }
        if chars > MAX_TEXT_CHARS {
            self.push(
                field,
                format!("must be at most {MAX_TEXT_CHARS} characters, got {chars}"),
            );
            return None;
        }
        Some(value)
    }

    fn count(&mut self, field: &'static str, value: Option<i64>, max: i64) -> Option<u32> {
        let value = self.required(field, value)?;
        if !(0..=max).contains(&value) {
            self.push(field, format!("must be between 0 and {max}, got {value}"));
            return None;
        }
        u32::try_from(value).ok()
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(ValidationError { violations: self.0 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{quantity_delta, BeerDraft};
    use crate::model::beer::{Beer, BeerCategory};

    fn valid() -> BeerDraft {
        BeerDraft {
            name: Some("Skol".to_string()),
            brand: Some("Ambev".to_string()),
            capacity_max: Some(100),
            quantity: Some(10),
            category: Some(BeerCategory::Lager),
        }
    }

    #[test]
    fn valid_draft_builds_unsaved_record() {
        assert_eq!(
            valid().into_beer().unwrap(),
            Beer::new("Skol", "Ambev", 100, 10, BeerCategory::Lager)
        );
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let err = BeerDraft::default().into_beer().unwrap_err();
        assert_eq!(err.fields(), vec!["name", "brand", "max", "quantity", "type"]);
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let draft = BeerDraft {
            name: Some("x".repeat(201)),
            brand: Some(String::new()),
            capacity_max: Some(501),
            quantity: Some(-1),
            ..valid()
        };
        assert_eq!(
            draft.into_beer().unwrap_err().fields(),
            vec!["name", "brand", "max", "quantity"]
        );
    }

    #[test]
    fn quantity_limits_apply_at_input() {
        let above_input_limit = BeerDraft {
            capacity_max: Some(400),
            quantity: Some(350),
            ..valid()
        };
        assert_eq!(above_input_limit.into_beer().unwrap_err().fields(), vec!["quantity"]);

        let above_max = BeerDraft {
            capacity_max: Some(5),
            quantity: Some(6),
            ..valid()
        };
        assert_eq!(above_max.into_beer().unwrap_err().fields(), vec!["quantity"]);
    }

    #[test]
    fn whitespace_text_counts_as_non_empty() {
        let draft = BeerDraft {
            brand: Some("   ".to_string()),
            ..valid()
        };
        assert_eq!(draft.into_beer().unwrap().brand, "   ");
    }

    #[test]
    fn quantity_delta_bounds() {
        assert_eq!(quantity_delta(Some(0)), Ok(0));
        assert_eq!(quantity_delta(Some(100)), Ok(100));
        assert_eq!(quantity_delta(Some(101)).unwrap_err().fields(), vec!["quantity"]);
        assert!(quantity_delta(Some(-5)).is_err());
        assert!(quantity_delta(None).is_err());
    }
}
