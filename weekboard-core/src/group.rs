//! Grouping of a time-ordered event list into per-day view buckets.
//!
//! The grouper is the parsing boundary for event timestamps: provider input
//! arrives as RFC 3339 strings, and any string that does not parse aborts the
//! whole run. Correctness of the day buckets depends on the input already
//! being ordered by start time (an upstream query guarantee); no sorting is
//! performed here.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};

use crate::error::{WeekboardError, WeekboardResult};
use crate::event::{ColorTable, RawEvent};

/// Full weekday names, indexed Sunday=0 through Saturday=6.
const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Short weekday names, same indexing.
const WEEKDAY_ABBREVS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// CSS class suffixes, same indexing.
const WEEKDAY_CLASS_SUFFIXES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// One event, ready for template consumption.
#[derive(Debug, Clone)]
pub struct EventView {
    /// Start time as "HH:MM"
    pub start_label: String,
    /// End time as "HH:MM"
    pub end_label: String,
    /// Start as minutes since local midnight (0-1439)
    pub start_minute: u32,
    /// End as minutes since local midnight, computed from the raw end
    /// timestamp even when the event crosses midnight (events are never
    /// split across days)
    pub end_minute: u32,
    /// Title, trimmed of surrounding spaces and HTML-escaped
    pub caption: String,
    pub background_color: String,
    pub foreground_color: String,
}

/// One calendar day's bucket of events, in first-seen order.
#[derive(Debug, Clone)]
pub struct DayView {
    /// Heading like "Monday 25.08.2025"
    pub caption: String,
    /// Weekday suffix for CSS class names ("mon", "tue", ...)
    pub class_suffix: &'static str,
    /// Short weekday name ("Mon", "Tue", ...)
    pub day_abbrev: &'static str,
    /// Zero-padded day of month ("05", "25", ...)
    pub day_number: String,
    /// Day key used to decide whether the next event starts a new bucket
    pub weekday: Weekday,
    /// Events of this day, preserving input order
    pub events: Vec<EventView>,
}

/// The current week as an ordered sequence of day buckets.
#[derive(Debug, Clone, Default)]
pub struct WeekView {
    pub days: Vec<DayView>,
}

/// Bucket `events` into day views, skipping events that start before
/// `filter_time`.
///
/// The filter guards against the upstream query's inclusive lower bound
/// returning events that started before the week boundary (e.g. spanning
/// Sunday midnight): such events are excluded entirely, not clipped.
pub fn group_week(
    events: &[RawEvent],
    colors: &ColorTable,
    filter_time: DateTime<FixedOffset>,
) -> WeekboardResult<WeekView> {
    let mut days: Vec<DayView> = Vec::new();

    for event in events {
        let start = parse_timestamp(&event.start)?;
        let end = parse_timestamp(&event.end)?;

        if start < filter_time {
            continue;
        }

        let day_idx = match days.last() {
            Some(day) if day.weekday == start.weekday() => days.len() - 1,
            _ => {
                days.push(day_view_for(&start));
                days.len() - 1
            }
        };

        let color = colors.color_for(&event.color_id);
        days[day_idx].events.push(EventView {
            start_label: format!("{:02}:{:02}", start.hour(), start.minute()),
            end_label: format!("{:02}:{:02}", end.hour(), end.minute()),
            start_minute: start.hour() * 60 + start.minute(),
            end_minute: end.hour() * 60 + end.minute(),
            caption: escape_html(event.summary.trim_matches(' ')),
            background_color: color.background,
            foreground_color: color.foreground,
        });
    }

    Ok(WeekView { days })
}

fn parse_timestamp(value: &str) -> WeekboardResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|source| WeekboardError::MalformedTimestamp {
        value: value.to_string(),
        source,
    })
}

/// Build an empty day bucket with captions derived from the event's start date.
fn day_view_for(start: &DateTime<FixedOffset>) -> DayView {
    let idx = start.weekday().num_days_from_sunday() as usize;
    DayView {
        caption: format!(
            "{} {:02}.{:02}.{:04}",
            WEEKDAY_NAMES[idx],
            start.day(),
            start.month(),
            start.year()
        ),
        class_suffix: WEEKDAY_CLASS_SUFFIXES[idx],
        day_abbrev: WEEKDAY_ABBREVS[idx],
        day_number: format!("{:02}", start.day()),
        weekday: start.weekday(),
        events: Vec::new(),
    }
}

/// Escape text for embedding into HTML: `& < > " '`.
fn escape_html(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;

    fn make_event(start: &str, end: &str, summary: &str, color_id: &str) -> RawEvent {
        RawEvent {
            start: start.to_string(),
            end: end.to_string(),
            summary: summary.to_string(),
            color_id: color_id.to_string(),
        }
    }

    fn make_colors() -> ColorTable {
        [
            (
                "1".to_string(),
                EventColor {
                    background: "#fff".to_string(),
                    foreground: "#000".to_string(),
                },
            ),
            (
                "2".to_string(),
                EventColor {
                    background: "#000".to_string(),
                    foreground: "#fff".to_string(),
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    /// Monday 2025-08-25, 00:00 UTC
    fn window_start() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-08-25T00:00:00+00:00").unwrap()
    }

    #[test]
    fn test_two_events_on_two_days() {
        let events = vec![
            make_event(
                "2025-08-25T09:00:00+00:00",
                "2025-08-25T10:00:00+00:00",
                "A",
                "1",
            ),
            make_event(
                "2025-08-26T14:30:00+00:00",
                "2025-08-26T15:00:00+00:00",
                "B",
                "2",
            ),
        ];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        assert_eq!(week.days.len(), 2);

        let monday = &week.days[0];
        assert_eq!(monday.caption, "Monday 25.08.2025");
        assert_eq!(monday.class_suffix, "mon");
        assert_eq!(monday.day_abbrev, "Mon");
        assert_eq!(monday.day_number, "25");
        assert_eq!(monday.events.len(), 1);
        assert_eq!(monday.events[0].start_label, "09:00");
        assert_eq!(monday.events[0].end_label, "10:00");
        assert_eq!(monday.events[0].start_minute, 540);
        assert_eq!(monday.events[0].end_minute, 600);
        assert_eq!(monday.events[0].background_color, "#fff");
        assert_eq!(monday.events[0].foreground_color, "#000");

        let tuesday = &week.days[1];
        assert_eq!(tuesday.class_suffix, "tue");
        assert_eq!(tuesday.events.len(), 1);
        assert_eq!(tuesday.events[0].start_label, "14:30");
        assert_eq!(tuesday.events[0].background_color, "#000");
    }

    #[test]
    fn test_same_day_events_keep_input_order() {
        let events = vec![
            make_event(
                "2025-08-25T09:00:00+00:00",
                "2025-08-25T10:00:00+00:00",
                "first",
                "1",
            ),
            make_event(
                "2025-08-25T09:00:00+00:00",
                "2025-08-25T09:30:00+00:00",
                "second",
                "1",
            ),
            make_event(
                "2025-08-25T11:00:00+00:00",
                "2025-08-25T12:00:00+00:00",
                "third",
                "1",
            ),
        ];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        assert_eq!(week.days.len(), 1);
        let captions: Vec<&str> = week.days[0]
            .events
            .iter()
            .map(|e| e.caption.as_str())
            .collect();
        assert_eq!(captions, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_event_before_window_dropped_even_if_end_inside() {
        let events = vec![
            // Starts Sunday evening, ends Monday morning: dropped, not clipped
            make_event(
                "2025-08-24T23:00:00+00:00",
                "2025-08-25T01:00:00+00:00",
                "overnight",
                "1",
            ),
            make_event(
                "2025-08-25T09:00:00+00:00",
                "2025-08-25T10:00:00+00:00",
                "kept",
                "1",
            ),
        ];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        assert_eq!(week.days.len(), 1);
        assert_eq!(week.days[0].events.len(), 1);
        assert_eq!(week.days[0].events[0].caption, "kept");
    }

    #[test]
    fn test_caption_trimmed_and_escaped() {
        let events = vec![
            make_event(
                "2025-08-25T09:00:00+00:00",
                "2025-08-25T10:00:00+00:00",
                "  Team Sync  ",
                "1",
            ),
            make_event(
                "2025-08-25T11:00:00+00:00",
                "2025-08-25T12:00:00+00:00",
                "<b>R&D \"review\"</b>",
                "1",
            ),
        ];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        let events = &week.days[0].events;
        assert_eq!(events[0].caption, "Team Sync");
        assert_eq!(
            events[1].caption,
            "&lt;b&gt;R&amp;D &#34;review&#34;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_malformed_start_is_fatal() {
        let events = vec![make_event(
            "not-a-timestamp",
            "2025-08-25T10:00:00+00:00",
            "A",
            "1",
        )];

        let err = group_week(&events, &make_colors(), window_start()).unwrap_err();
        assert!(matches!(
            err,
            WeekboardError::MalformedTimestamp { ref value, .. } if value == "not-a-timestamp"
        ));
    }

    #[test]
    fn test_malformed_end_is_fatal_even_for_filtered_event() {
        // Starts before the window, but the corrupt end timestamp still
        // aborts the run: parsing happens before filtering.
        let events = vec![make_event("2025-08-20T09:00:00+00:00", "garbage", "A", "1")];

        let err = group_week(&events, &make_colors(), window_start()).unwrap_err();
        assert!(matches!(err, WeekboardError::MalformedTimestamp { .. }));
    }

    #[test]
    fn test_unknown_color_id_resolves_to_empty_colors() {
        let events = vec![make_event(
            "2025-08-25T09:00:00+00:00",
            "2025-08-25T10:00:00+00:00",
            "A",
            "99",
        )];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        assert_eq!(week.days[0].events[0].background_color, "");
        assert_eq!(week.days[0].events[0].foreground_color, "");
    }

    #[test]
    fn test_minute_offsets_stay_in_day_range() {
        let events = vec![make_event(
            "2025-08-25T00:00:00+00:00",
            "2025-08-25T23:59:00+00:00",
            "all day long",
            "1",
        )];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        let event = &week.days[0].events[0];
        assert_eq!(event.start_minute, 0);
        assert_eq!(event.end_minute, 1439);
    }

    #[test]
    fn test_labels_use_source_encoded_offset() {
        // 09:00+03:00 is 06:00 UTC; the label shows the encoded local time
        let events = vec![make_event(
            "2025-08-25T09:00:00+03:00",
            "2025-08-25T10:00:00+03:00",
            "A",
            "1",
        )];

        let week = group_week(&events, &make_colors(), window_start()).unwrap();

        assert_eq!(week.days[0].events[0].start_label, "09:00");
        assert_eq!(week.days[0].events[0].start_minute, 540);
    }

    #[test]
    fn test_empty_input_yields_empty_week() {
        let week = group_week(&[], &make_colors(), window_start()).unwrap();
        assert!(week.days.is_empty());
    }
}
