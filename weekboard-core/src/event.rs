//! Provider-neutral event input types.
//!
//! The calendar provider converts its API responses into these types; the
//! grouper works exclusively with them. Timestamps stay as RFC 3339 strings
//! until the grouper parses them, so an unparseable value surfaces as a
//! [`MalformedTimestamp`](crate::WeekboardError::MalformedTimestamp) error in
//! the core rather than being silently dropped at the fetch boundary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A calendar event as delivered by the provider.
///
/// The provider guarantees the event list is ordered by start time ascending
/// and that recurring events are already expanded into single occurrences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Start timestamp, RFC 3339 with offset (e.g. "2025-08-25T09:00:00+03:00")
    pub start: String,
    /// End timestamp, RFC 3339 with offset
    pub end: String,
    /// Event title
    pub summary: String,
    /// Identifier into the provider's color table
    pub color_id: String,
}

/// Display colors for one event color identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventColor {
    pub background: String,
    pub foreground: String,
}

/// Mapping from an event's color identifier to its display colors.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    entries: HashMap<String, EventColor>,
}

impl ColorTable {
    pub fn new(entries: HashMap<String, EventColor>) -> Self {
        ColorTable { entries }
    }

    /// Look up the colors for an id. Unknown ids resolve to the default
    /// (empty) colors, which the templates emit as-is.
    pub fn color_for(&self, color_id: &str) -> EventColor {
        self.entries.get(color_id).cloned().unwrap_or_default()
    }
}

impl FromIterator<(String, EventColor)> for ColorTable {
    fn from_iter<I: IntoIterator<Item = (String, EventColor)>>(iter: I) -> Self {
        ColorTable {
            entries: iter.into_iter().collect(),
        }
    }
}
