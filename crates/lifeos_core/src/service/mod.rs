//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and sync calls into use-case level APIs.
//! - Host the pure relationship analytics engines (care, scoring,
//!   calendar derivation).
//!
//! # See also
//! - docs/architecture/analytics.md

pub mod calendar_service;
pub mod care_service;
pub mod people_service;
pub mod score_service;
