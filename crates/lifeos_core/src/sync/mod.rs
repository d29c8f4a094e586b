//! Local-first synchronization between slice storage and remote documents.
//!
//! # Responsibility
//! - Define the remote module-document contract and its error envelope.
//! - Reconcile local slices with remote state on identity arrival and push
//!   local changes best-effort.
//!
//! # Invariants
//! - A missing remote document is a semantic miss, never an error.
//! - Remote failures never corrupt or block local state.
//! - Stale reconcile results from a superseded session are discarded.
//!
//! # See also
//! - docs/architecture/sync.md

pub mod identity;
pub mod reconciler;
pub mod remote;
