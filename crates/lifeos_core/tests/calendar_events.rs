use lifeos_core::{derive_month_events, month_grid, EventKind, Group, Relationship};
use chrono::NaiveDate;

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

#[test]
fn birthday_recurs_by_month_and_day() {
    let mut rel = Relationship::new("Mai", Group::B);
    rel.birthday = Some(date("1986-09-21"));

    let events = derive_month_events(std::slice::from_ref(&rel), 2026, 9, date("2026-09-01"));
    let birthday: Vec<_> = events
        .iter()
        .filter(|event| event.kind == EventKind::Birthday)
        .collect();
    assert_eq!(birthday.len(), 1);
    assert_eq!(birthday[0].date, date("2026-09-21"));

    // Other months see no birthday event.
    let other = derive_month_events(&[rel], 2026, 8, date("2026-08-01"));
    assert!(!other.iter().any(|event| event.kind == EventKind::Birthday));
}

#[test]
fn leap_day_birthday_lands_on_feb_28_in_common_years() {
    let mut rel = Relationship::new("Leap", Group::C);
    rel.birthday = Some(date("1992-02-29"));

    let events = derive_month_events(&[rel], 2026, 2, date("2026-02-01"));
    let birthday = events
        .iter()
        .find(|event| event.kind == EventKind::Birthday)
        .unwrap();
    assert_eq!(birthday.date, date("2026-02-28"));
}

#[test]
fn cadence_projects_from_today_when_never_contacted() {
    let rel = Relationship::new("New", Group::A);
    let today = date("2026-07-10");

    let events = derive_month_events(&[rel], 2026, 7, today);
    let cadence = events
        .iter()
        .find(|event| event.kind == EventKind::Cadence)
        .unwrap();
    assert_eq!(cadence.date, date("2026-07-17"));
}

#[test]
fn cadence_outside_queried_month_is_dropped() {
    let mut rel = Relationship::new("Later", Group::D);
    rel.last_contact = Some(date("2026-07-01"));

    // 180 days later is late December; July sees nothing.
    let events = derive_month_events(&[rel], 2026, 7, date("2026-07-02"));
    assert!(!events.iter().any(|event| event.kind == EventKind::Cadence));
}

#[test]
fn grid_buckets_events_by_exact_date() {
    let mut rel = Relationship::new("Mai", Group::B);
    rel.birthday = Some(date("1986-09-21"));

    let events = derive_month_events(&[rel], 2026, 9, date("2026-09-01"));
    let cells = month_grid(&events, 2026, 9);

    // 2026-09-01 is a Tuesday: two leading blanks.
    assert!(cells[0].day.is_none());
    assert!(cells[1].day.is_none());
    assert_eq!(cells[2].day, Some(1));

    let birthday_cell = cells
        .iter()
        .find(|cell| cell.day == Some(21))
        .unwrap();
    assert_eq!(birthday_cell.events.len(), 1);
    assert_eq!(birthday_cell.events[0].kind, EventKind::Birthday);
}
