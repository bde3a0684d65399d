//! Journal domain model.
//!
//! # Responsibility
//! - Define the records held by store slices (entries, profile, preferences).
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Removal is a hard delete; there are no tombstones.

pub mod entry;
pub mod profile;
