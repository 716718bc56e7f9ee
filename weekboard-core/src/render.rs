//! Rendering of the week view into the two published artifacts.
//!
//! The templates are compiled into the crate and selected by [`Artifact`];
//! there is no process-wide template state. Template auto-escaping is
//! disabled on purpose: all user-controlled text (event captions) is already
//! HTML-escaped by the grouper, and everything else the templates emit is
//! structural.

use askama::Template;

use crate::error::{WeekboardError, WeekboardResult};
use crate::group::{DayView, WeekView};

/// One of the two rendered output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Fragment embedded into the kiosk display page
    Display,
    /// Fragment embedded into the printable page
    Print,
}

impl Artifact {
    pub fn template_name(&self) -> &'static str {
        match self {
            Artifact::Display => "display.html",
            Artifact::Print => "print.html",
        }
    }
}

#[derive(Template)]
#[template(path = "display.html", escape = "none")]
struct DisplayTemplate<'a> {
    days: &'a [DayView],
}

#[derive(Template)]
#[template(path = "print.html", escape = "none")]
struct PrintTemplate<'a> {
    days: &'a [DayView],
}

/// Render the week through the named template. A failure here is fatal to
/// the run; no partial output is produced.
pub fn render(artifact: Artifact, week: &WeekView) -> WeekboardResult<String> {
    let result = match artifact {
        Artifact::Display => DisplayTemplate { days: &week.days }.render(),
        Artifact::Print => PrintTemplate { days: &week.days }.render(),
    };

    result.map_err(|source| WeekboardError::TemplateRender {
        template: artifact.template_name(),
        source,
    })
}
