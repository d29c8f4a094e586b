//! Relationship scoring: behavior composite and manual evaluation.
//!
//! # Responsibility
//! - Compute the 0..=100 behavior score from current relationship fields.
//! - Sum the manual 5-criterion evaluation to its 0..=50 total and flag
//!   deprioritized relationships.
//!
//! # Invariants
//! - Both scores are pure functions of their inputs; nothing is cached or
//!   persisted.
//! - Component caps: intel 40, contact 30, energy 0..=20, cadence 10.
//!
//! # See also
//! - docs/architecture/analytics.md

use crate::model::relationship::{Relationship, DEPRIORITIZE_THRESHOLD};
use chrono::NaiveDate;

const INTEL_POINTS_PER_FIELD: u32 = 5;
const INTEL_CAP: u32 = 40;
const CONTACT_POINTS_PER_LOG: u32 = 3;
const CONTACT_CAP: u32 = 30;

/// Component contributions to the behavior score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorBreakdown {
    pub intel: u32,
    pub contact: u32,
    pub energy: u32,
    pub cadence: u32,
}

/// Behavior score with its component breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorScore {
    /// Composite total, clamped to 0..=100.
    pub total: u32,
    pub breakdown: BehaviorBreakdown,
    pub energy_average: f64,
    pub contact_count: usize,
}

/// Computes the behavior score for one relationship.
///
/// All-empty input (no intel, no contacts, never contacted) scores 10:
/// the energy component maps an average of 0 onto the middle of its
/// 0..=20 band.
pub fn behavior_score(relationship: &Relationship, today: NaiveDate) -> BehaviorScore {
    let intel = (relationship.intel.filled_count() as u32 * INTEL_POINTS_PER_FIELD).min(INTEL_CAP);

    let contact_count = relationship.contacts.len();
    let contact = (contact_count as u32 * CONTACT_POINTS_PER_LOG).min(CONTACT_CAP);

    let energy_average = relationship.average_energy();
    let energy = (((energy_average + 2.0) / 4.0) * 20.0).round().clamp(0.0, 20.0) as u32;

    let threshold = relationship.group.cadence_days();
    let cadence = match relationship.last_contact {
        None => 0,
        Some(last) => {
            let elapsed = (today - last).num_days();
            if elapsed <= threshold {
                10
            } else if elapsed as f64 <= threshold as f64 * 1.5 {
                5
            } else {
                0
            }
        }
    };

    let total = (intel + contact + energy + cadence).min(100);

    BehaviorScore {
        total,
        breakdown: BehaviorBreakdown {
            intel,
            contact,
            energy,
            cadence,
        },
        energy_average,
        contact_count,
    }
}

/// Sum of the manual 5-criterion evaluation, 0..=50.
pub fn evaluation_total(relationship: &Relationship) -> u32 {
    relationship
        .normalized_scores()
        .iter()
        .map(|score| u32::from(*score))
        .sum()
}

/// A relationship scoring under the evaluation threshold should receive
/// less investment. Pure threshold check, never stored.
pub fn is_deprioritized(evaluation_total: u32) -> bool {
    evaluation_total < DEPRIORITIZE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::{behavior_score, evaluation_total, is_deprioritized};
    use crate::model::relationship::{ContactLog, Group, Relationship};
    use chrono::NaiveDate;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
    }

    fn contact(day: &str, energy: i32) -> ContactLog {
        ContactLog {
            date: date(day),
            note: String::new(),
            mood: String::new(),
            energy,
            feeling: String::new(),
        }
    }

    #[test]
    fn empty_relationship_scores_ten() {
        let rel = Relationship::new("Blank", Group::C);
        let score = behavior_score(&rel, date("2026-06-01"));
        assert_eq!(score.breakdown.intel, 0);
        assert_eq!(score.breakdown.contact, 0);
        assert_eq!(score.breakdown.cadence, 0);
        assert_eq!(score.breakdown.energy, 10);
        assert_eq!(score.total, 10);
    }

    #[test]
    fn contact_component_saturates_at_thirty() {
        let mut rel = Relationship::new("Busy", Group::B);
        for _ in 0..20 {
            rel.contacts.push(contact("2026-05-20", 0));
        }
        let score = behavior_score(&rel, date("2026-06-01"));
        assert_eq!(score.breakdown.contact, 30);
    }

    #[test]
    fn cadence_component_uses_ten_five_zero_tiers() {
        let mut rel = Relationship::new("Tier", Group::A);
        let today = date("2026-06-01");

        rel.last_contact = Some(date("2026-05-27"));
        assert_eq!(behavior_score(&rel, today).breakdown.cadence, 10);

        // elapsed 9, between 7 and 10.5
        rel.last_contact = Some(date("2026-05-23"));
        assert_eq!(behavior_score(&rel, today).breakdown.cadence, 5);

        rel.last_contact = Some(date("2026-05-01"));
        assert_eq!(behavior_score(&rel, today).breakdown.cadence, 0);
    }

    #[test]
    fn total_stays_inside_bounds() {
        let mut rel = Relationship::new("Max", Group::A);
        rel.intel.personality = "x".into();
        rel.intel.values = "x".into();
        rel.intel.fear = "x".into();
        rel.intel.need = "x".into();
        rel.intel.hate = "x".into();
        rel.intel.talk = "x".into();
        rel.intel.stress = "x".into();
        rel.intel.maintain = "x".into();
        rel.last_contact = Some(date("2026-05-31"));
        for _ in 0..12 {
            rel.contacts.push(contact("2026-05-30", 2));
        }
        let score = behavior_score(&rel, date("2026-06-01"));
        assert_eq!(score.breakdown.intel, 40);
        assert_eq!(score.breakdown.energy, 20);
        assert_eq!(score.total, 100);
    }

    #[test]
    fn evaluation_threshold_flags_deprioritized() {
        let mut rel = Relationship::new("Eval", Group::C);
        rel.scores = vec![5, 5, 5, 5, 4];
        let total = evaluation_total(&rel);
        assert_eq!(total, 24);
        assert!(is_deprioritized(total));

        rel.scores = vec![5, 5, 5, 5, 5];
        assert!(!is_deprioritized(evaluation_total(&rel)));
    }
}
