//! Contact-cadence classification and relationship care analytics.
//!
//! # Responsibility
//! - Classify every relationship against its group's cadence expectation.
//! - Produce the priority-ordered outreach action plan.
//! - Derive energy analytics: leaders, low-energy alerts, period reports.
//!
//! # Invariants
//! - All functions are pure; `today` is always an explicit parameter.
//! - Group E never classifies as overdue or due-soon; its cadence sentinel
//!   means contact is never expected.
//! - Overdue means `elapsed > threshold`; landing exactly on the threshold
//!   day is still on time.
//!
//! # See also
//! - docs/architecture/analytics.md

use crate::model::relationship::{Group, Relationship, RelationshipId};
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::BTreeMap;

/// How many never-contacted entries the action plan surfaces.
pub const NEVER_CONTACTED_DISPLAY_CAP: usize = 3;

/// Fraction of the cadence window after which contact counts as due soon.
const DUE_SOON_FRACTION: f64 = 0.8;

/// Cadence standing of one relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareStatus {
    NeverContacted,
    OnSchedule,
    DueSoon,
    Overdue,
}

/// Result of classifying one relationship at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareAssessment {
    pub status: CareStatus,
    /// Days left inside the cadence window, floored at 0. `None` when the
    /// relationship has never been contacted.
    pub days_remaining: Option<i64>,
}

/// Classifies a relationship against its group cadence.
pub fn classify(relationship: &Relationship, today: NaiveDate) -> CareAssessment {
    let Some(last_contact) = relationship.last_contact else {
        return CareAssessment {
            status: CareStatus::NeverContacted,
            days_remaining: None,
        };
    };

    let threshold = relationship.group.cadence_days();
    let elapsed = (today - last_contact).num_days();
    let status = if elapsed > threshold {
        CareStatus::Overdue
    } else if elapsed as f64 > threshold as f64 * DUE_SOON_FRACTION {
        CareStatus::DueSoon
    } else {
        CareStatus::OnSchedule
    };

    CareAssessment {
        status,
        days_remaining: Some((threshold - elapsed).max(0)),
    }
}

/// One entry in the outreach action plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub id: RelationshipId,
    pub name: String,
    pub group: Group,
    pub status: CareStatus,
    pub days_remaining: Option<i64>,
}

/// Priority-ordered outreach plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    /// Overdue and due-soon relationships, highest-priority group first,
    /// then least days remaining.
    pub urgent: Vec<ActionItem>,
    /// Relationships without any recorded contact, capped for display.
    pub never_contacted: Vec<ActionItem>,
}

/// Builds the outreach action plan for a set of relationships.
pub fn action_plan(relationships: &[Relationship], today: NaiveDate) -> ActionPlan {
    let mut urgent = Vec::new();
    let mut never_contacted = Vec::new();

    for relationship in relationships {
        let assessment = classify(relationship, today);
        let item = ActionItem {
            id: relationship.id,
            name: relationship.name.clone(),
            group: relationship.group,
            status: assessment.status,
            days_remaining: assessment.days_remaining,
        };
        match assessment.status {
            CareStatus::Overdue | CareStatus::DueSoon => urgent.push(item),
            CareStatus::NeverContacted => never_contacted.push(item),
            CareStatus::OnSchedule => {}
        }
    }

    urgent.sort_by(|a, b| {
        a.group
            .priority()
            .cmp(&b.group.priority())
            .then(a.days_remaining.cmp(&b.days_remaining))
    });
    never_contacted.truncate(NEVER_CONTACTED_DISPLAY_CAP);

    ActionPlan {
        urgent,
        never_contacted,
    }
}

/// Outreach suggestion for one group.
pub fn outreach_prompt(group: Group) -> &'static str {
    match group {
        Group::A => "Short check-in plus a specific thank-you; lock in a meeting date",
        Group::B => "Share a project update or fresh lesson; suggest coffee this week",
        Group::C => "Three-line message: check in, recall a shared memory, wish them well",
        Group::D => "Light touch message; keep the history warm without investing more",
        Group::E => "If the contact drains energy, consider stopping proactive outreach",
    }
}

/// Recurrence of a birthday in a given year, with the day clamped to the
/// month's length (Feb 29 birthdays land on Feb 28 in non-leap years).
pub fn birthday_in_year(birthday: NaiveDate, year: i32) -> NaiveDate {
    let month = birthday.month();
    let mut day = birthday.day();
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return date;
        }
        day -= 1;
    }
}

/// Days until the next occurrence of a birthday; 0 when it is today.
pub fn days_until_birthday(birthday: NaiveDate, today: NaiveDate) -> i64 {
    let this_year = birthday_in_year(birthday, today.year());
    let next = if this_year < today {
        birthday_in_year(birthday, today.year() + 1)
    } else {
        this_year
    };
    (next - today).num_days()
}

/// Mean contact energy for one relationship, with sample count.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyLeader {
    pub id: RelationshipId,
    pub name: String,
    pub group: Group,
    pub average: f64,
    pub samples: usize,
}

/// Top-3 strongest and weakest relationships by mean contact energy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyLeaders {
    pub strongest: Vec<EnergyLeader>,
    pub weakest: Vec<EnergyLeader>,
}

pub fn energy_leaders(relationships: &[Relationship]) -> EnergyLeaders {
    let mut with_energy: Vec<EnergyLeader> = relationships
        .iter()
        .filter(|rel| !rel.contacts.is_empty())
        .map(|rel| EnergyLeader {
            id: rel.id,
            name: rel.name.clone(),
            group: rel.group,
            average: rel.average_energy(),
            samples: rel.contacts.len(),
        })
        .collect();

    let mut strongest = with_energy.clone();
    strongest.sort_by(|a, b| b.average.total_cmp(&a.average));
    strongest.truncate(3);

    with_energy.sort_by(|a, b| a.average.total_cmp(&b.average));
    with_energy.truncate(3);

    EnergyLeaders {
        strongest,
        weakest: with_energy,
    }
}

/// A relationship trending into negative energy territory.
#[derive(Debug, Clone, PartialEq)]
pub struct LowEnergyAlert {
    pub id: RelationshipId,
    pub name: String,
    pub group: Group,
    /// Mean energy over the last three contact logs.
    pub recent_average: f64,
    /// Whether the last three logs were all negative.
    pub negative_streak: bool,
}

/// Flags relationships whose last three contacts were all negative, or
/// whose recent mean energy dipped below zero.
pub fn low_energy_alerts(relationships: &[Relationship]) -> Vec<LowEnergyAlert> {
    relationships
        .iter()
        .filter_map(|rel| {
            let recent: Vec<i32> = rel
                .contacts
                .iter()
                .rev()
                .take(3)
                .map(|log| log.energy)
                .collect();
            let recent_average = if recent.is_empty() {
                0.0
            } else {
                f64::from(recent.iter().sum::<i32>()) / recent.len() as f64
            };
            let negative_streak = recent.len() == 3 && recent.iter().all(|energy| *energy < 0);
            if negative_streak || recent_average < 0.0 {
                Some(LowEnergyAlert {
                    id: rel.id,
                    name: rel.name.clone(),
                    group: rel.group,
                    recent_average,
                    negative_streak,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Reporting window for period summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRange {
    Week,
    Month,
    Quarter,
    Year,
}

impl ReportRange {
    fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Week => today - Duration::days(7),
            Self::Month => today - Months::new(1),
            Self::Quarter => today - Months::new(3),
            Self::Year => today - Months::new(12),
        }
    }
}

/// Contact activity for one group over a report window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupActivity {
    pub contacts: usize,
    pub energy_mean: Option<f64>,
}

/// Contact activity for one person over a report window.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonActivity {
    pub name: String,
    pub group: Group,
    pub contacts: usize,
    pub energy_mean: f64,
}

/// Period summary: per-group totals plus the most-contacted people.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    pub group_totals: BTreeMap<Group, GroupActivity>,
    pub top_active: Vec<PersonActivity>,
}

/// Aggregates contact logs inside `[range start, today]`.
pub fn period_report(
    relationships: &[Relationship],
    range: ReportRange,
    today: NaiveDate,
) -> PeriodReport {
    let start = range.start(today);
    let mut sums: BTreeMap<Group, (usize, i64)> = Group::ALL
        .into_iter()
        .map(|group| (group, (0usize, 0i64)))
        .collect();
    let mut people = Vec::new();

    for rel in relationships {
        let logs: Vec<_> = rel
            .contacts
            .iter()
            .filter(|log| log.date >= start && log.date <= today)
            .collect();
        if let Some(entry) = sums.get_mut(&rel.group) {
            entry.0 += logs.len();
            entry.1 += logs.iter().map(|log| i64::from(log.energy)).sum::<i64>();
        }
        let energy_mean = if logs.is_empty() {
            0.0
        } else {
            logs.iter().map(|log| f64::from(log.energy)).sum::<f64>() / logs.len() as f64
        };
        people.push(PersonActivity {
            name: rel.name.clone(),
            group: rel.group,
            contacts: logs.len(),
            energy_mean,
        });
    }

    let group_totals = sums
        .into_iter()
        .map(|(group, (contacts, energy_sum))| {
            let energy_mean = (contacts > 0).then(|| energy_sum as f64 / contacts as f64);
            (
                group,
                GroupActivity {
                    contacts,
                    energy_mean,
                },
            )
        })
        .collect();

    people.retain(|person| person.contacts > 0);
    people.sort_by(|a, b| b.contacts.cmp(&a.contacts));
    people.truncate(3);

    PeriodReport {
        group_totals,
        top_active: people,
    }
}

#[cfg(test)]
mod tests {
    use super::{birthday_in_year, classify, days_until_birthday, CareStatus};
    use crate::model::relationship::{Group, Relationship};
    use chrono::NaiveDate;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn threshold_day_is_still_on_time() {
        let mut rel = Relationship::new("An", Group::A);
        rel.last_contact = Some(date("2026-03-01"));

        // elapsed 7 with threshold 7: due soon, not overdue
        let at_threshold = classify(&rel, date("2026-03-08"));
        assert_eq!(at_threshold.status, CareStatus::DueSoon);
        assert_eq!(at_threshold.days_remaining, Some(0));

        // elapsed 8 crosses the line
        let past = classify(&rel, date("2026-03-09"));
        assert_eq!(past.status, CareStatus::Overdue);
        assert_eq!(past.days_remaining, Some(0));
    }

    #[test]
    fn feb29_birthday_clamps_in_common_years() {
        let birthday = date("1992-02-29");
        assert_eq!(birthday_in_year(birthday, 2026), date("2026-02-28"));
        assert_eq!(birthday_in_year(birthday, 2028), date("2028-02-29"));
    }

    #[test]
    fn birthday_today_counts_as_zero_days() {
        let birthday = date("1990-09-21");
        assert_eq!(days_until_birthday(birthday, date("2026-09-21")), 0);
        assert_eq!(days_until_birthday(birthday, date("2026-09-22")), 364);
    }
}
