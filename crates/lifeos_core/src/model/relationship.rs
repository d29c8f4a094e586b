//! Relationship domain model for the People module.
//!
//! # Responsibility
//! - Define the canonical tracked-person record: classification, contact
//!   history, intel fields, promises and evaluation scores.
//! - Provide cadence expectations per group and score normalization helpers.
//!
//! # Invariants
//! - `id` is stable, unique per user and never reused.
//! - `group` is always one of the five classifications A..E.
//! - The evaluation score vector has canonical length 5; missing entries
//!   default to 0.
//!
//! # See also
//! - docs/architecture/data-model.md

use chrono::NaiveDate;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Stable numeric identifier for a relationship record.
///
/// Assigned from the epoch-millisecond clock at creation, bumped when the
/// clock has not advanced since the previous assignment.
pub type RelationshipId = i64;

/// Number of manual evaluation criteria.
pub const EVALUATION_CRITERIA: usize = 5;

/// Maximum value for one manual evaluation criterion.
pub const EVALUATION_MAX_PER_CRITERION: u8 = 10;

/// Evaluation totals below this mark a relationship as "deprioritize".
pub const DEPRIORITIZE_THRESHOLD: u32 = 25;

/// Cadence fallback when a group label cannot be recognized at an import
/// boundary. Inside the type system `Group` is total, so this only applies
/// to raw string input.
pub const DEFAULT_CADENCE_DAYS: i64 = 30;

/// Sentinel cadence for group E: contact is never expected.
pub const CADENCE_NEVER_DAYS: i64 = 9999;

static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

/// Relationship classification with a fixed contact-cadence expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Group {
    A,
    B,
    C,
    D,
    E,
}

impl Group {
    /// All groups in priority order (A highest).
    pub const ALL: [Group; 5] = [Group::A, Group::B, Group::C, Group::D, Group::E];

    /// Expected maximum interval in days between contacts.
    pub fn cadence_days(self) -> i64 {
        match self {
            Self::A => 7,
            Self::B => 21,
            Self::C => 75,
            Self::D => 180,
            Self::E => CADENCE_NEVER_DAYS,
        }
    }

    /// Priority rank for action ordering; lower ranks first.
    pub fn priority(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
            Self::C => 3,
            Self::D => 4,
            Self::E => 5,
        }
    }

    /// Parses a group label, returning `None` for unrecognized input.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            _ => None,
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        };
        write!(f, "{label}")
    }
}

/// Cadence lookup over raw labels, with the documented fallback of 30 days
/// for unrecognized classifications.
pub fn cadence_days_for_label(label: &str) -> i64 {
    Group::parse(label).map_or(DEFAULT_CADENCE_DAYS, Group::cadence_days)
}

/// Qualitative profile of a person: eight free-text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intel {
    pub personality: String,
    pub values: String,
    pub fear: String,
    pub need: String,
    pub hate: String,
    pub talk: String,
    pub stress: String,
    pub maintain: String,
}

impl Intel {
    /// Counts fields that carry non-blank text. Saturates at 8 by schema.
    pub fn filled_count(&self) -> usize {
        [
            &self.personality,
            &self.values,
            &self.fear,
            &self.need,
            &self.hate,
            &self.talk,
            &self.stress,
            &self.maintain,
        ]
        .iter()
        .filter(|field| !field.trim().is_empty())
        .count()
    }
}

/// One contact-log entry. Append-only from the engine's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub mood: String,
    /// Signed energy delta, expected range -2..=2.
    #[serde(default)]
    pub energy: i32,
    #[serde(default)]
    pub feeling: String,
}

/// Lifecycle state of a structured promise.
///
/// Transitions are externally driven; the engine never auto-moves
/// `Pending` to `Late` when a due date passes. Use
/// [`PromiseItem::is_effectively_late`] for the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromiseStatus {
    Pending,
    Done,
    Late,
}

/// Which side of the relationship owns a promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromiseOwner {
    Me,
    Them,
}

/// A structured promise with a due date and externally-driven status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromiseItem {
    pub title: String,
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
    #[serde(rename = "createdAt")]
    pub created_at: NaiveDate,
    pub status: PromiseStatus,
    pub owner: PromiseOwner,
    #[serde(rename = "completedAt", default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PromiseItem {
    /// Derived lateness view: pending past the due date.
    ///
    /// Stored status stays untouched; callers that want the observed
    /// behavior keep reading `status` directly.
    pub fn is_effectively_late(&self, today: NaiveDate) -> bool {
        self.status == PromiseStatus::Pending && today > self.due_date
    }

    /// A promise still waiting on its owner (pending or marked late).
    pub fn is_open(&self) -> bool {
        matches!(self.status, PromiseStatus::Pending | PromiseStatus::Late)
    }
}

/// Canonical record for one tracked person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub group: Group,
    /// Signed impact score, intended range roughly -10..=10.
    #[serde(default)]
    pub impact: i32,
    #[serde(
        rename = "lastContact",
        default,
        deserialize_with = "lenient_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_contact: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub note: String,
    /// Free-text promise summary; presence drives the calendar marker.
    #[serde(default)]
    pub promises: String,
    #[serde(rename = "theirPrinciples", default)]
    pub their_principles: String,
    #[serde(rename = "promiseItems", default, skip_serializing_if = "Vec::is_empty")]
    pub promise_items: Vec<PromiseItem>,
    #[serde(rename = "faceImage", default, skip_serializing_if = "Option::is_none")]
    pub face_image: Option<String>,
    #[serde(rename = "faceNote", default, skip_serializing_if = "Option::is_none")]
    pub face_note: Option<String>,
    /// Manual evaluation vector; canonical length 5, entries 0..=10.
    #[serde(default)]
    pub scores: Vec<u8>,
    #[serde(default)]
    pub intel: Intel,
    #[serde(default)]
    pub contacts: Vec<ContactLog>,
}

impl Relationship {
    /// Creates a relationship with a fresh clock-based id and blank
    /// evaluation scores.
    pub fn new(name: impl Into<String>, group: Group) -> Self {
        Self {
            id: next_relationship_id(),
            name: name.into(),
            role: String::new(),
            group,
            impact: 0,
            last_contact: None,
            birthday: None,
            note: String::new(),
            promises: String::new(),
            their_principles: String::new(),
            promise_items: Vec::new(),
            face_image: None,
            face_note: None,
            scores: blank_scores(),
            intel: Intel::default(),
            contacts: Vec::new(),
        }
    }

    /// Evaluation vector padded/truncated to canonical length, each entry
    /// clamped to the per-criterion maximum.
    pub fn normalized_scores(&self) -> [u8; EVALUATION_CRITERIA] {
        let mut normalized = [0u8; EVALUATION_CRITERIA];
        for (slot, value) in normalized.iter_mut().zip(self.scores.iter()) {
            *slot = (*value).min(EVALUATION_MAX_PER_CRITERION);
        }
        normalized
    }

    /// Whether the free-text promise summary is non-empty.
    pub fn has_open_promise_note(&self) -> bool {
        !self.promises.trim().is_empty()
    }

    /// Promise items still waiting to be resolved.
    pub fn open_promise_items(&self) -> impl Iterator<Item = &PromiseItem> {
        self.promise_items.iter().filter(|item| item.is_open())
    }

    /// Mean of all contact-log energy deltas; 0 when no entries exist.
    pub fn average_energy(&self) -> f64 {
        if self.contacts.is_empty() {
            return 0.0;
        }
        let sum: i32 = self.contacts.iter().map(|log| log.energy).sum();
        f64::from(sum) / self.contacts.len() as f64
    }
}

/// Blank evaluation vector: five zeroed criteria.
pub fn blank_scores() -> Vec<u8> {
    vec![0; EVALUATION_CRITERIA]
}

/// Issues the next clock-based relationship id.
///
/// Epoch milliseconds, bumped past the previously issued value when the
/// clock has not advanced. Monotonic within a process, matching the
/// single-writer-per-user assumption.
pub fn next_relationship_id() -> RelationshipId {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0);

    let mut previous = LAST_ISSUED_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now_ms.max(previous + 1);
        match LAST_ISSUED_ID.compare_exchange_weak(
            previous,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => previous = observed,
        }
    }
}

/// Accepts a date, `null`, a missing field, or an empty string.
///
/// Persisted legacy payloads encode "no contact yet" as `""`.
fn lenient_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|err| DeError::custom(format!("invalid ISO date `{text}`: {err}"))),
    }
}
