//! Domain model for life-management modules.
//!
//! # Responsibility
//! - Define canonical data structures shared by services, repositories and
//!   the sync layer.
//! - Keep persisted JSON shapes stable across app versions.
//!
//! # Invariants
//! - Every relationship is identified by a stable `RelationshipId`.
//! - Payload structs round-trip through serde without field loss.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod modules;
pub mod relationship;
pub mod settings;
