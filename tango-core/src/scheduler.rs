use crate::{CoreError, Outcome};
use chrono::{DateTime, Duration, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub success_count: i64,
    pub next_date: DateTime<Utc>,
}

// Pass intervals run 1, 3, 5, 7, … days.
pub fn pass_interval_days(success_count: i64) -> i64 {
    success_count * 2 + 1
}

pub fn next_review(
    success_count: i64,
    outcome: Outcome,
    now: DateTime<Utc>,
) -> Result<ScheduleUpdate, CoreError> {
    if success_count < 0 {
        return Err(CoreError::Invalid("negative success count"));
    }
    let update = match outcome {
        Outcome::Pass => ScheduleUpdate {
            success_count: success_count + 1,
            next_date: now + Duration::days(pass_interval_days(success_count)),
        },
        Outcome::Fail => ScheduleUpdate {
            success_count: 0,
            next_date: now,
        },
    };
    Ok(update)
}
