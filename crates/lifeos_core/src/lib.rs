//! Core domain logic for LifeOS.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::modules::{ModuleKind, PeoplePayload, PAYLOAD_VERSION};
pub use model::relationship::{
    ContactLog, Group, Intel, PromiseItem, PromiseOwner, PromiseStatus, Relationship,
    RelationshipId,
};
pub use model::settings::{AppSettings, SettingsHub, SettingsObserver};
pub use repo::local_store::{LocalStore, StoreError, StoreResult};
pub use repo::remote_docs::SqliteRemoteStore;
pub use service::calendar_service::{derive_month_events, month_grid, CalendarEvent, EventKind};
pub use service::care_service::{action_plan, classify, CareAssessment, CareStatus};
pub use service::people_service::{PeopleService, PeopleServiceError, RelationshipDraft};
pub use service::score_service::{behavior_score, evaluation_total, BehaviorScore};
pub use sync::identity::{AuthObserver, IdentityHub};
pub use sync::reconciler::{ModuleSync, SyncOutcome};
pub use sync::remote::{InMemoryRemoteStore, RemoteStore, RemoteStoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
