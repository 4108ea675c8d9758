use chrono::{FixedOffset, TimeZone, Utc};
use tango_core::DayWindow;

fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[test]
fn window_spans_local_midnight_to_end_of_day() {
    let as_of = tokyo().with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let w = DayWindow::containing(&as_of);
    assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 1, 9, 15, 0, 0).unwrap());
    assert_eq!(w.end, Utc.with_ymd_and_hms(2024, 1, 10, 14, 59, 59).unwrap());
}

#[test]
fn both_ends_are_inclusive() {
    let as_of = tokyo().with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    let w = DayWindow::containing(&as_of);
    assert!(w.contains(w.start));
    assert!(w.contains(w.end));
}

#[test]
fn same_window_at_start_and_end_of_day() {
    let morning = tokyo().with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let night = tokyo().with_ymd_and_hms(2024, 1, 10, 23, 59, 59).unwrap();
    assert_eq!(DayWindow::containing(&morning), DayWindow::containing(&night));
}

#[test]
fn yesterday_evening_is_not_due_today() {
    let as_of = tokyo().with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let w = DayWindow::containing(&as_of);
    let missed = tokyo().with_ymd_and_hms(2024, 1, 9, 23, 0, 0).unwrap();
    assert!(!w.contains(missed.with_timezone(&Utc)));
}

#[test]
fn tomorrow_is_not_due_today() {
    let as_of = tokyo().with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let w = DayWindow::containing(&as_of);
    let tomorrow = tokyo().with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
    assert!(!w.contains(tomorrow.with_timezone(&Utc)));
}

#[test]
fn utc_caller_gets_utc_day_bounds() {
    let as_of = Utc.with_ymd_and_hms(2024, 3, 31, 10, 30, 0).unwrap();
    let w = DayWindow::containing(&as_of);
    assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap());
    assert_eq!(w.end, Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap());
}
