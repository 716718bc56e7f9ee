//! The sync pipeline: compute the week window, fetch events and colors,
//! group into day buckets, render both artifacts, and publish them.

use anyhow::{Context, Result};
use chrono::Local;

use weekboard_core::{group, publish, render, Artifact, WeekWindow};

use crate::config::Config;
use crate::gcal;

/// Run one fetch-group-render-publish pass for the current week.
///
/// The two artifacts publish independently and in a fixed order (print, then
/// display): a failure between the two leaves print fresh and display stale.
/// When the query returns no events, nothing is published and the previous
/// artifacts stay in place.
pub async fn run(config: &Config) -> Result<()> {
    let google = config.google()?;
    let tokens = gcal::fresh_tokens(google).await?;

    let now = Local::now();
    let window = WeekWindow::containing(&now);
    let time_min = window.start_rfc3339();
    let time_max = window.end_rfc3339();
    tracing::debug!(start = %time_min, end = %time_max, "computed week window");

    let colors = gcal::fetch_colors(google, &tokens).await?;

    let events = gcal::fetch_events(google, &tokens, &config.calendar_id, &time_min, &time_max)
        .await
        .with_context(|| format!("Failed to fetch events for calendar {}", config.calendar_id))?;

    if events.is_empty() {
        println!("No calendar events found.");
        return Ok(());
    }
    tracing::info!(count = events.len(), "fetched events");

    let week = group::group_week(&events, &colors, window.start.fixed_offset())?;

    let print_html = render::render(Artifact::Print, &week)?;
    publish::publish(&config.print_output, &print_html)?;
    tracing::info!(path = %config.print_output.display(), "published print fragment");

    let display_html = render::render(Artifact::Display, &week)?;
    publish::publish(&config.display_output, &display_html)?;
    tracing::info!(path = %config.display_output.display(), "published display fragment");

    println!(
        "Published {} days, {} events.",
        week.days.len(),
        week.days.iter().map(|d| d.events.len()).sum::<usize>()
    );

    Ok(())
}
