//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Provide key-value slice storage with backup shadows for module state.
//! - Back the remote document contract with a SQLite table for local-only
//!   deployments.
//!
//! # Invariants
//! - Every overwrite of a slice key first shadows the previous value under
//!   `<key>Backup`.
//! - Repository APIs return semantic misses (`None`) separately from DB
//!   transport errors.
//!
//! # See also
//! - docs/architecture/storage.md

pub mod local_store;
pub mod remote_docs;
