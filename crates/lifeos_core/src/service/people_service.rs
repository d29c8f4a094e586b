//! People module use-cases over slice storage and sync.
//!
//! # Responsibility
//! - Load the relationship list through its legacy key fallback chain.
//! - Apply write paths (add, contact log, evaluation, reschedule, removal)
//!   and push the full payload after every change.
//! - Provide the search/sort projections the list view consumes.
//!
//! # Invariants
//! - Every mutation persists locally first; the remote push is best-effort
//!   and never blocks or fails the write.
//! - Logging a contact always advances `last_contact` to the log date.
//! - Evaluation vectors are normalized to length 5 with entries 0..=10
//!   before persisting.
//!
//! # See also
//! - docs/architecture/analytics.md

use crate::model::modules::{ModuleKind, PeoplePayload};
use crate::model::relationship::{
    next_relationship_id, ContactLog, Group, Intel, PromiseItem, PromiseOwner, PromiseStatus,
    Relationship, RelationshipId, EVALUATION_CRITERIA, EVALUATION_MAX_PER_CRITERION,
};
use crate::repo::local_store::{LocalStore, StoreError};
use crate::service::calendar_service::rescheduled_last_contact;
use crate::service::score_service::evaluation_total;
use crate::sync::reconciler::{ModuleSync, SyncOutcome};
use chrono::{Duration, NaiveDate};
use log::warn;
use rusqlite::Connection;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Promise drafts entered at creation default to this due window.
const PROMISE_DRAFT_DUE_DAYS: i64 = 14;

/// Service error for people use-cases.
#[derive(Debug)]
pub enum PeopleServiceError {
    RelationshipNotFound(RelationshipId),
    Store(StoreError),
    Encode(serde_json::Error),
}

impl Display for PeopleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelationshipNotFound(id) => write!(f, "relationship not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode people payload: {err}"),
        }
    }
}

impl Error for PeopleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::RelationshipNotFound(_) => None,
        }
    }
}

impl From<StoreError> for PeopleServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for PeopleServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Input for creating one relationship.
#[derive(Debug, Clone, Default)]
pub struct RelationshipDraft {
    pub name: String,
    pub role: String,
    pub group: Option<Group>,
    pub impact: i32,
    pub last_contact: Option<NaiveDate>,
    pub birthday: Option<NaiveDate>,
    pub note: String,
    pub promises: String,
    pub their_principles: String,
    pub intel: Intel,
    pub face_image: Option<String>,
    pub face_note: Option<String>,
    /// Free-text promise I made; becomes a structured pending item.
    pub my_promise_draft: String,
    /// Free-text promise they made; becomes a structured pending item.
    pub their_promise_draft: String,
}

/// Sort order for the relationship list projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Impact,
    Score,
    Group,
    Name,
}

/// Search/sort query for the list projection.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search: String,
    pub sort: SortKey,
    pub only_pending_promises: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::Name,
            only_pending_promises: false,
        }
    }
}

/// People use-case service over a database connection.
pub struct PeopleService<'conn> {
    store: LocalStore<'conn>,
    sync: Option<Arc<ModuleSync>>,
}

impl<'conn> PeopleService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            store: LocalStore::new(conn),
            sync: None,
        }
    }

    /// Attaches a sync driver; writes push the full payload through it.
    pub fn with_sync(conn: &'conn Connection, sync: Arc<ModuleSync>) -> Self {
        Self {
            store: LocalStore::new(conn),
            sync: Some(sync),
        }
    }

    /// Loads the relationship list, probing legacy keys when the primary
    /// slice is absent. Parse failures fall through to the next key.
    pub fn load(&self) -> Result<PeoplePayload, PeopleServiceError> {
        let module = ModuleKind::People;
        let mut keys: Vec<&str> = module.primary_keys().to_vec();
        keys.extend_from_slice(module.legacy_keys());

        for key in keys {
            let Some(raw) = self.store.raw_get(key)? else {
                continue;
            };
            match decode_relationships(&raw) {
                Some(relationships) => {
                    let mut payload = PeoplePayload::new(relationships);
                    payload.normalize_loaded();
                    return Ok(payload);
                }
                None => {
                    warn!(
                        "event=people_load module=service status=parse_fallback key={key}"
                    );
                }
            }
        }
        Ok(PeoplePayload::default())
    }

    /// Persists the list locally and pushes the full payload best-effort.
    pub fn save(&self, payload: &PeoplePayload) -> Result<(), PeopleServiceError> {
        self.store
            .set(ModuleKind::People.primary_keys()[0], &payload.relationships)?;
        if let Some(sync) = &self.sync {
            let value = serde_json::to_value(payload)?;
            sync.push(&value);
        }
        Ok(())
    }

    /// Reconciles against the remote document for `user_id`. A remote
    /// document replaces local state; absence seeds the remote from local.
    pub fn start_sync(&self, user_id: &str) -> Result<SyncOutcome, PeopleServiceError> {
        let Some(sync) = &self.sync else {
            return Ok(SyncOutcome::Unavailable);
        };
        let local = self.load()?;
        let local_value = serde_json::to_value(&local)?;
        let outcome = sync.start(user_id, &local_value);
        if let SyncOutcome::RemoteApplied(remote_value) = &outcome {
            let mut payload = decode_payload_value(remote_value);
            payload.normalize_loaded();
            self.store
                .set(ModuleKind::People.primary_keys()[0], &payload.relationships)?;
        }
        Ok(outcome)
    }

    /// Unbinds sync; local persistence continues unaffected.
    pub fn stop_sync(&self) {
        if let Some(sync) = &self.sync {
            sync.stop();
        }
    }

    /// Creates a relationship with a fresh id and blank evaluation scores.
    /// Non-blank promise drafts become pending items due in two weeks.
    pub fn add_relationship(
        &self,
        draft: RelationshipDraft,
        today: NaiveDate,
    ) -> Result<Relationship, PeopleServiceError> {
        let mut promise_items = Vec::new();
        for (text, owner) in [
            (draft.my_promise_draft.trim(), PromiseOwner::Me),
            (draft.their_promise_draft.trim(), PromiseOwner::Them),
        ] {
            if !text.is_empty() {
                promise_items.push(PromiseItem {
                    title: text.to_string(),
                    due_date: today + Duration::days(PROMISE_DRAFT_DUE_DAYS),
                    created_at: today,
                    status: PromiseStatus::Pending,
                    owner,
                    completed_at: None,
                    notes: None,
                });
            }
        }

        let relationship = Relationship {
            id: next_relationship_id(),
            name: draft.name,
            role: draft.role,
            group: draft.group.unwrap_or(Group::C),
            impact: draft.impact,
            last_contact: draft.last_contact,
            birthday: draft.birthday,
            note: draft.note,
            promises: draft.promises,
            their_principles: draft.their_principles,
            promise_items,
            face_image: draft.face_image,
            face_note: draft.face_note,
            scores: vec![0; EVALUATION_CRITERIA],
            intel: draft.intel,
            contacts: Vec::new(),
        };

        let mut payload = self.load()?;
        payload.relationships.push(relationship.clone());
        self.save(&payload)?;
        Ok(relationship)
    }

    /// Appends a contact log and advances `last_contact` to its date.
    pub fn log_contact(
        &self,
        id: RelationshipId,
        entry: ContactLog,
    ) -> Result<(), PeopleServiceError> {
        self.update_one(id, |rel| {
            rel.last_contact = Some(entry.date);
            rel.contacts.push(entry);
        })
    }

    /// Replaces the manual evaluation vector, normalized to five entries
    /// each clamped to 0..=10.
    pub fn set_evaluation(
        &self,
        id: RelationshipId,
        scores: &[u8],
    ) -> Result<(), PeopleServiceError> {
        let mut normalized = vec![0u8; EVALUATION_CRITERIA];
        for (slot, value) in normalized.iter_mut().zip(scores.iter()) {
            *slot = (*value).min(EVALUATION_MAX_PER_CRITERION);
        }
        self.update_one(id, move |rel| {
            rel.scores = normalized;
        })
    }

    /// Moves the next cadence event to `target` by back-computing the
    /// last-contact date.
    pub fn apply_reschedule(
        &self,
        id: RelationshipId,
        target: NaiveDate,
    ) -> Result<(), PeopleServiceError> {
        self.update_one(id, move |rel| {
            rel.last_contact = Some(rescheduled_last_contact(rel.group, target));
        })
    }

    /// Removes relationships by id; absent ids are ignored.
    pub fn remove_relationships(
        &self,
        ids: &[RelationshipId],
    ) -> Result<usize, PeopleServiceError> {
        let mut payload = self.load()?;
        let before = payload.relationships.len();
        payload.relationships.retain(|rel| !ids.contains(&rel.id));
        let removed = before - payload.relationships.len();
        if removed > 0 {
            self.save(&payload)?;
        }
        Ok(removed)
    }

    fn update_one(
        &self,
        id: RelationshipId,
        apply: impl FnOnce(&mut Relationship),
    ) -> Result<(), PeopleServiceError> {
        let mut payload = self.load()?;
        let Some(rel) = payload.relationships.iter_mut().find(|rel| rel.id == id) else {
            return Err(PeopleServiceError::RelationshipNotFound(id));
        };
        apply(rel);
        self.save(&payload)?;
        Ok(())
    }
}

/// Accepts both persisted shapes: a bare relationship array (local slice)
/// or a payload object carrying `relationships`.
fn decode_relationships(raw: &str) -> Option<Vec<Relationship>> {
    if let Ok(relationships) = serde_json::from_str::<Vec<Relationship>>(raw) {
        return Some(relationships);
    }
    serde_json::from_str::<PeoplePayload>(raw)
        .ok()
        .map(|payload| payload.relationships)
}

fn decode_payload_value(value: &Value) -> PeoplePayload {
    if let Ok(payload) = serde_json::from_value::<PeoplePayload>(value.clone()) {
        return payload;
    }
    match serde_json::from_value::<Vec<Relationship>>(value.clone()) {
        Ok(relationships) => PeoplePayload::new(relationships),
        Err(err) => {
            warn!("event=people_sync module=service status=parse_fallback error={err}");
            PeoplePayload::default()
        }
    }
}

/// Filters by search term and pending promises, then sorts.
///
/// The search term matches name, role or note case-insensitively. Sorting
/// by impact and score is descending, group and name ascending.
pub fn filter_and_sort(relationships: &[Relationship], query: &ListQuery) -> Vec<Relationship> {
    let term = query.search.trim().to_lowercase();
    let mut data: Vec<Relationship> = relationships
        .iter()
        .filter(|rel| {
            if !term.is_empty() {
                let haystacks = [&rel.name, &rel.role, &rel.note];
                if !haystacks
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
                {
                    return false;
                }
            }
            if query.only_pending_promises && rel.open_promise_items().next().is_none() {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    match query.sort {
        SortKey::Impact => data.sort_by(|a, b| b.impact.cmp(&a.impact)),
        SortKey::Score => {
            data.sort_by(|a, b| evaluation_total(b).cmp(&evaluation_total(a)));
        }
        SortKey::Group => data.sort_by(|a, b| a.group.cmp(&b.group)),
        SortKey::Name => data.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    data
}
