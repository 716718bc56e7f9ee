//! Week window calculation.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// The Monday-00:00 to next-Monday-00:00 span that events are filtered and
/// grouped into. Recomputed from "now" on every run; immutable afterwards.
#[derive(Debug, Clone)]
pub struct WeekWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> WeekWindow<Tz> {
    /// Compute the window of the week containing `now`.
    ///
    /// The start is the most recent Monday on or before `now`'s local
    /// calendar date, truncated to local midnight, so every time-of-day on
    /// the same date resolves to the same Monday. The end is a fixed 7 days
    /// after the start.
    pub fn containing(now: &DateTime<Tz>) -> Self {
        let days_back = now.weekday().num_days_from_monday() as i64;
        let monday = now.date_naive() - Duration::days(days_back);
        let start = local_midnight(monday, &now.timezone());
        let end = start.clone() + Duration::days(7);
        WeekWindow { start, end }
    }
}

impl<Tz: TimeZone> WeekWindow<Tz>
where
    Tz::Offset: fmt::Display,
{
    /// Window start as an RFC 3339 string, for the event-query collaborator.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    /// Window end as an RFC 3339 string.
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

/// Resolve a calendar date to its local midnight instant.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        // Clocks rolled back across midnight: take the earlier instant.
        LocalResult::Ambiguous(first, _) => first,
        // Clocks jumped forward across midnight: take the first valid hour.
        LocalResult::None => tz
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .expect("no valid instant within an hour of local midnight"),
    }
}
