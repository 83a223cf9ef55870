//! Core domain logic for beer stock management.
//! This crate is the single source of truth for stock invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::beer::{Beer, BeerCategory, BeerId, BeerValidationError};
pub use model::input::{BeerDraft, FieldViolation, ValidationError, MAX_INPUT_QUANTITY};
pub use repo::beer_repo::{BeerRepository, RepoError, RepoResult, SqliteBeerRepository};
pub use repo::memory_repo::InMemoryBeerRepository;
pub use service::stock_service::{BeerKey, StockError, StockResult, StockService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
