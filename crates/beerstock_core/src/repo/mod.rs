//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the stock service depends on.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Beer::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateName`) in
//!   addition to DB transport errors.

pub mod beer_repo;
pub mod memory_repo;
