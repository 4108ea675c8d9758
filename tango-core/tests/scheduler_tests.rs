use chrono::{DateTime, Duration, TimeZone, Utc};
use tango_core::{next_review, pass_interval_days, CoreError, Outcome};

fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
}

#[test]
fn pass_grows_interval_by_two_days_per_streak() {
    let now = at(2024, 1, 10, 9);
    for streak in [0, 1, 2, 5, 40, 1000] {
        let up = next_review(streak, Outcome::Pass, now).unwrap();
        assert_eq!(up.success_count, streak + 1);
        assert_eq!(up.next_date - now, Duration::days(streak * 2 + 1));
    }
}

#[test]
fn first_pass_is_due_in_one_day() {
    let now = at(2024, 1, 10, 9);
    let up = next_review(0, Outcome::Pass, now).unwrap();
    assert_eq!(up.success_count, 1);
    assert_eq!(up.next_date, now + Duration::days(1));
}

#[test]
fn fail_resets_streak_and_is_due_immediately() {
    let now = at(2024, 1, 10, 9);
    for streak in [0, 3, 17] {
        let up = next_review(streak, Outcome::Fail, now).unwrap();
        assert_eq!(up.success_count, 0);
        assert_eq!(up.next_date, now);
    }
}

#[test]
fn negative_streak_is_rejected_not_clamped() {
    let now = at(2024, 1, 10, 9);
    assert!(matches!(
        next_review(-1, Outcome::Pass, now),
        Err(CoreError::Invalid(_))
    ));
    assert!(matches!(
        next_review(-42, Outcome::Fail, now),
        Err(CoreError::Invalid(_))
    ));
}

#[test]
fn repeated_passes_are_not_idempotent() {
    let now = at(2024, 1, 10, 9);
    let first = next_review(2, Outcome::Pass, now).unwrap();
    let second = next_review(first.success_count, Outcome::Pass, now).unwrap();
    assert_ne!(first.success_count, second.success_count);
    assert_ne!(first.next_date, second.next_date);
    assert_eq!(first.next_date - now, Duration::days(5));
    assert_eq!(second.next_date - now, Duration::days(7));
}

#[test]
fn pass_intervals_run_one_three_five_seven() {
    assert_eq!(pass_interval_days(0), 1);
    assert_eq!(pass_interval_days(1), 3);
    assert_eq!(pass_interval_days(2), 5);
    assert_eq!(pass_interval_days(3), 7);
}
