//! Domain model for preferences and backup documents.
//!
//! # Responsibility
//! - Define the typed shapes stored under the preference keys.
//! - Define the versioned backup envelope and its validity rules.
//!
//! # Invariants
//! - Serialized field names match the persisted/backup JSON exactly.

pub mod backup;
pub mod palette;
pub mod theme;
