use chrono::{DateTime, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};

// Local midnight through 23:59:59, both ends inclusive. The window is
// exactly "today": cards scheduled before it (missed days) are not due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn containing<Tz: TimeZone>(as_of: &DateTime<Tz>) -> Self {
        let tz = as_of.timezone();
        let date = as_of.date_naive();
        let start = resolve_local(&tz, date.and_time(NaiveTime::MIN));
        let end = resolve_local(
            &tz,
            date.and_hms_opt(23, 59, 59).expect("valid wall-clock time"),
        );
        Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, wall: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(t) => t,
        // DST fold: both readings sit on the right calendar day.
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Wall-clock time skipped by a DST jump.
        LocalResult::None => tz.from_utc_datetime(&wall),
    }
}
