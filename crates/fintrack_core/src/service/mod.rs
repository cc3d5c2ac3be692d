//! Core use-case services.
//!
//! # Responsibility
//! - Expose preference, backup and seeding use cases over an injected `Store`.
//! - Keep UI/CLI layers independent of the storage backend.
//!
//! # Invariants
//! - Services never share state except through the store.

pub mod backup_service;
pub mod preference_service;
pub mod seed_service;
