//! Wire payloads.
//!
//! Inbound payloads keep every field optional so a missing field is reported
//! as a validation violation instead of a parse failure. Field rules live in
//! `beerstock_core::model::input`, shared with the CLI.

use beerstock_core::model::input::quantity_delta;
use beerstock_core::{Beer, BeerCategory, BeerDraft, BeerId, ValidationError};
use serde::{Deserialize, Serialize};

/// Beer record as it travels over HTTP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BeerId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, rename = "type")]
    pub category: Option<BeerCategory>,
}

/// Quantity delta for increment/decrement requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityDto {
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl BeerDto {
    /// Validates the payload and builds an unsaved record.
    ///
    /// Any inbound `id` is dropped; storage assigns identities.
    pub fn into_beer(self) -> Result<Beer, ValidationError> {
        BeerDraft {
            name: self.name,
            brand: self.brand,
            capacity_max: self.max,
            quantity: self.quantity,
            category: self.category,
        }
        .into_beer()
    }
}

impl From<&Beer> for BeerDto {
    fn from(beer: &Beer) -> Self {
        Self {
            id: beer.id,
            name: Some(beer.name.clone()),
            brand: Some(beer.brand.clone()),
            max: Some(i64::from(beer.capacity_max)),
            quantity: Some(i64::from(beer.quantity)),
            category: Some(beer.category),
        }
    }
}

impl QuantityDto {
    /// Validates the delta and returns it as an unsigned amount.
    pub fn into_amount(self) -> Result<u32, ValidationError> {
        quantity_delta(self.quantity)
    }
}
