//! Domain model for markdown documents and user preferences.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep lifecycle transitions (archive/restore/star) next to the data.
//!
//! # Invariants
//! - Every document is identified by a storage-assigned `DocumentId`.
//! - Deletion goes through the archive before permanent removal.

pub mod document;
pub mod preferences;
