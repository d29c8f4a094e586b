//! Month-view event derivation for relationships.
//!
//! # Responsibility
//! - Derive birthday, promise and cadence events for a queried month.
//! - Assemble the Sunday-first month grid with events bucketed per day.
//! - Back-compute a last-contact date for cadence rescheduling.
//!
//! # Invariants
//! - Derivation is pure and produces no persisted side effects; the one
//!   write path (reschedule) lives in the people service.
//! - Birthday recurrence uses month/day only; the birth year never moves
//!   the event.
//!
//! # See also
//! - docs/architecture/analytics.md

use crate::model::relationship::{Group, Relationship, RelationshipId};
use crate::service::care_service::birthday_in_year;
use chrono::{Datelike, Duration, NaiveDate};

/// Kind of a derived calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Birthday,
    Promise,
    Cadence,
}

/// One derived calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub label: String,
    pub date: NaiveDate,
    pub relationship_id: RelationshipId,
    pub kind: EventKind,
}

/// Derives all events landing in `(year, month)`.
///
/// The promise marker sits on `today` whenever the free-text promise note
/// is non-empty; it is a static reminder, not due-date placement.
pub fn derive_month_events(
    relationships: &[Relationship],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for rel in relationships {
        if let Some(birthday) = rel.birthday {
            if birthday.month() == month {
                events.push(CalendarEvent {
                    label: format!("Birthday: {}", rel.name),
                    date: birthday_in_year(birthday, year),
                    relationship_id: rel.id,
                    kind: EventKind::Birthday,
                });
            }
        }

        if rel.has_open_promise_note() && today.year() == year && today.month() == month {
            events.push(CalendarEvent {
                label: format!("Promise: {}", rel.name),
                date: today,
                relationship_id: rel.id,
                kind: EventKind::Promise,
            });
        }

        // Never-contacted relationships project from today, mirroring how
        // the cadence window opens at first sight.
        let base = rel.last_contact.unwrap_or(today);
        let target = base + Duration::days(rel.group.cadence_days());
        if target.year() == year && target.month() == month {
            events.push(CalendarEvent {
                label: format!("Cadence: {}", rel.name),
                date: target,
                relationship_id: rel.id,
                kind: EventKind::Cadence,
            });
        }
    }

    events
}

/// One cell of the month grid. Leading offset cells carry no date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: Option<u32>,
    pub date: Option<NaiveDate>,
    pub events: Vec<CalendarEvent>,
}

/// Builds the Sunday-first month grid with events bucketed by exact date.
pub fn month_grid(events: &[CalendarEvent], year: i32, month: u32) -> Vec<CalendarCell> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let offset = first.weekday().num_days_from_sunday();
    let days_in_month = days_in_month(year, month);

    let mut cells = Vec::with_capacity((offset + days_in_month) as usize);
    for _ in 0..offset {
        cells.push(CalendarCell {
            day: None,
            date: None,
            events: Vec::new(),
        });
    }
    for day in 1..=days_in_month {
        let date = NaiveDate::from_ymd_opt(year, month, day);
        let day_events = events
            .iter()
            .filter(|event| Some(event.date) == date)
            .cloned()
            .collect();
        cells.push(CalendarCell {
            day: Some(day),
            date,
            events: day_events,
        });
    }
    cells
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (next_month, NaiveDate::from_ymd_opt(year, month, 1)) {
        (Some(next), Some(first)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

/// Last-contact date that places the next cadence event on `target`.
pub fn rescheduled_last_contact(group: Group, target: NaiveDate) -> NaiveDate {
    target - Duration::days(group.cadence_days())
}

#[cfg(test)]
mod tests {
    use super::{
        derive_month_events, month_grid, rescheduled_last_contact, EventKind,
    };
    use crate::model::relationship::{Group, Relationship};
    use chrono::NaiveDate;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn cadence_event_lands_at_last_contact_plus_window() {
        let mut rel = Relationship::new("An", Group::B);
        rel.last_contact = Some(date("2026-06-10"));

        let events = derive_month_events(&[rel], 2026, 7, date("2026-07-02"));
        let cadence: Vec<_> = events
            .iter()
            .filter(|event| event.kind == EventKind::Cadence)
            .collect();
        assert_eq!(cadence.len(), 1);
        assert_eq!(cadence[0].date, date("2026-07-01"));
    }

    #[test]
    fn promise_marker_sits_on_today() {
        let mut rel = Relationship::new("An", Group::C);
        rel.promises = "return the book".to_string();

        let today = date("2026-07-15");
        let events = derive_month_events(std::slice::from_ref(&rel), 2026, 7, today);
        assert!(events
            .iter()
            .any(|event| event.kind == EventKind::Promise && event.date == today));

        // Querying a different month drops the marker.
        let elsewhere = derive_month_events(&[rel], 2026, 8, today);
        assert!(!elsewhere.iter().any(|event| event.kind == EventKind::Promise));
    }

    #[test]
    fn grid_offsets_by_first_weekday() {
        // 2026-07-01 is a Wednesday: three leading blanks (Sun, Mon, Tue).
        let cells = month_grid(&[], 2026, 7);
        assert_eq!(cells.len(), 3 + 31);
        assert!(cells[0].day.is_none());
        assert!(cells[2].day.is_none());
        assert_eq!(cells[3].day, Some(1));
        assert_eq!(cells.last().and_then(|cell| cell.day), Some(31));
    }

    #[test]
    fn reschedule_back_computes_last_contact() {
        assert_eq!(
            rescheduled_last_contact(Group::B, date("2026-08-22")),
            date("2026-08-01")
        );
    }
}
