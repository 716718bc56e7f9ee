//! Core pipeline for weekboard.
//!
//! This crate holds everything between "now" and two published HTML
//! fragments:
//! - `window`: compute the Monday-to-Monday boundaries of the current week
//! - `group`: bucket a time-ordered event list into per-day views
//! - `render`: produce the display and print artifacts from templates
//! - `publish`: atomically promote rendered content to its final path
//!
//! Fetching events and colors from a calendar provider is the binary's job;
//! this crate only consumes the provider-neutral types in `event`.

pub mod error;
pub mod event;
pub mod group;
pub mod publish;
pub mod render;
pub mod window;

pub use error::{WeekboardError, WeekboardResult};
pub use event::{ColorTable, EventColor, RawEvent};
pub use group::{DayView, EventView, WeekView};
pub use render::Artifact;
pub use window::WeekWindow;
