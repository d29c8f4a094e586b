use lifeos_core::service::care_service::{
    action_plan, classify, energy_leaders, low_energy_alerts, period_report, CareStatus,
    ReportRange,
};
use lifeos_core::{ContactLog, Group, Relationship};
use chrono::{Duration, NaiveDate};

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

fn contacted(name: &str, group: Group, days_ago: i64, today: NaiveDate) -> Relationship {
    let mut rel = Relationship::new(name, group);
    rel.last_contact = Some(today - Duration::days(days_ago));
    rel
}

fn log(day: &str, energy: i32) -> ContactLog {
    ContactLog {
        date: date(day),
        note: String::new(),
        mood: String::new(),
        energy,
        feeling: String::new(),
    }
}

#[test]
fn group_a_boundaries() {
    let today = date("2026-06-20");

    let on_time = classify(&contacted("a", Group::A, 5, today), today);
    assert_eq!(on_time.status, CareStatus::OnSchedule);
    assert_eq!(on_time.days_remaining, Some(2));

    // 6 days elapsed crosses 0.8 * 7 = 5.6
    let due_soon = classify(&contacted("a", Group::A, 6, today), today);
    assert_eq!(due_soon.status, CareStatus::DueSoon);

    // exactly on the threshold is not overdue yet
    let threshold = classify(&contacted("a", Group::A, 7, today), today);
    assert_eq!(threshold.status, CareStatus::DueSoon);
    assert_eq!(threshold.days_remaining, Some(0));

    let overdue = classify(&contacted("a", Group::A, 8, today), today);
    assert_eq!(overdue.status, CareStatus::Overdue);
}

#[test]
fn group_b_at_25_days_is_overdue_with_zero_remaining() {
    let today = date("2026-06-20");
    let assessment = classify(&contacted("b", Group::B, 25, today), today);
    assert_eq!(assessment.status, CareStatus::Overdue);
    assert_eq!(assessment.days_remaining, Some(0));
}

#[test]
fn never_contacted_has_no_days_remaining() {
    let today = date("2026-06-20");
    let rel = Relationship::new("quiet", Group::B);
    let assessment = classify(&rel, today);
    assert_eq!(assessment.status, CareStatus::NeverContacted);
    assert_eq!(assessment.days_remaining, None);
}

#[test]
fn group_e_is_never_urgent() {
    let today = date("2026-06-20");
    // Ten years without contact still fits inside the sentinel window.
    let rel = contacted("e", Group::E, 3650, today);
    let assessment = classify(&rel, today);
    assert_eq!(assessment.status, CareStatus::OnSchedule);

    let plan = action_plan(&[rel], today);
    assert!(plan.urgent.is_empty());
}

#[test]
fn action_plan_orders_by_group_then_days_remaining() {
    let today = date("2026-06-20");
    let list = vec![
        contacted("b-overdue", Group::B, 25, today),
        contacted("a-due-soon", Group::A, 6, today),
        contacted("a-overdue", Group::A, 10, today),
        contacted("c-fine", Group::C, 10, today),
    ];

    let plan = action_plan(&list, today);
    let names: Vec<&str> = plan.urgent.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["a-overdue", "a-due-soon", "b-overdue"]);
}

#[test]
fn never_contacted_bucket_is_capped_at_three() {
    let today = date("2026-06-20");
    let list: Vec<Relationship> = (0..5)
        .map(|idx| Relationship::new(format!("quiet-{idx}"), Group::C))
        .collect();

    let plan = action_plan(&list, today);
    assert_eq!(plan.never_contacted.len(), 3);
}

#[test]
fn low_energy_alert_triggers_on_three_negative_streak() {
    let mut streaky = Relationship::new("streak", Group::B);
    streaky.contacts = vec![
        log("2026-06-01", 2),
        log("2026-06-05", -1),
        log("2026-06-10", -1),
        log("2026-06-15", -1),
    ];
    let mut healthy = Relationship::new("fine", Group::B);
    healthy.contacts = vec![log("2026-06-10", 1), log("2026-06-15", 2)];

    let alerts = low_energy_alerts(&[streaky, healthy]);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].name, "streak");
    assert!(alerts[0].negative_streak);
}

#[test]
fn energy_leaders_rank_by_mean_and_skip_unlogged() {
    let mut high = Relationship::new("high", Group::A);
    high.contacts = vec![log("2026-06-01", 2), log("2026-06-05", 2)];
    let mut low = Relationship::new("low", Group::B);
    low.contacts = vec![log("2026-06-01", -2)];
    let unlogged = Relationship::new("silent", Group::C);

    let leaders = energy_leaders(&[high, low, unlogged]);
    assert_eq!(leaders.strongest.first().map(|l| l.name.as_str()), Some("high"));
    assert_eq!(leaders.weakest.first().map(|l| l.name.as_str()), Some("low"));
    assert_eq!(leaders.strongest.len(), 2);
}

#[test]
fn period_report_counts_only_logs_in_range() {
    let today = date("2026-06-20");
    let mut rel = Relationship::new("active", Group::A);
    rel.contacts = vec![
        log("2026-06-18", 1),
        log("2026-06-15", 1),
        log("2026-01-02", 2), // outside the week window
    ];

    let report = period_report(std::slice::from_ref(&rel), ReportRange::Week, today);
    let group_a = report.group_totals.get(&Group::A).copied().unwrap();
    assert_eq!(group_a.contacts, 2);
    assert_eq!(group_a.energy_mean, Some(1.0));
    assert_eq!(report.top_active.len(), 1);
    assert_eq!(report.top_active[0].contacts, 2);

    let yearly = period_report(&[rel], ReportRange::Year, today);
    assert_eq!(yearly.group_totals.get(&Group::A).copied().unwrap().contacts, 3);
}
