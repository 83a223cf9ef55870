//! Beer stock domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every persisted record is identified by a storage-assigned `BeerId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod beer;
pub mod input;
