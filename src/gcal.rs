//! Google Calendar plumbing: OAuth flow, token refresh, and the calendar,
//! color, and event queries that feed the core pipeline.

use anyhow::{Context, Result};
use chrono::Local;
use google_calendar::types::{MinAccessRole, OrderBy};
use google_calendar::Client;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;

use weekboard_core::{ColorTable, EventColor, RawEvent};

use crate::config::{self, AccountTokens, GoogleConfig};

const REDIRECT_PORT: u16 = 8085;
const REDIRECT_URI: &str = "http://localhost:8085/callback";

const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar.readonly"];

/// Create a Google Calendar client from stored tokens
fn create_client(config: &GoogleConfig, tokens: &AccountTokens) -> Client {
    Client::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        REDIRECT_URI.to_string(),
        tokens.access_token.clone(),
        tokens.refresh_token.clone(),
    )
}

/// Create a new client for initial authentication (no tokens yet)
fn create_auth_client(config: &GoogleConfig) -> Client {
    Client::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        REDIRECT_URI.to_string(),
        String::new(),
        String::new(),
    )
}

/// Start a local HTTP server to receive the OAuth callback.
/// Returns (code, state)
fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", REDIRECT_PORT))
        .with_context(|| format!("Failed to bind to port {}", REDIRECT_PORT))?;

    println!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Request line looks like: GET /callback?code=xxx&state=yyy HTTP/1.1
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .context("No code in callback")?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .context("No state in callback")?;

    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok((code, state))
}

/// Run the full OAuth authentication flow
pub async fn authenticate(config: &GoogleConfig) -> Result<AccountTokens> {
    let mut client = create_auth_client(config);

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    println!("\nOpen this URL in your browser to authenticate:\n");
    println!("{}\n", auth_url);

    if open::that(&auth_url).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, state) = wait_for_callback()?;

    println!("\nReceived authorization code, exchanging for tokens...");

    let access_token = client
        .get_access_token(&code, &state)
        .await
        .context("Failed to exchange code for tokens")?;

    println!("Authentication successful!");

    let expires_at = if access_token.expires_in > 0 {
        Some(chrono::Utc::now() + chrono::Duration::seconds(access_token.expires_in))
    } else {
        None
    };

    Ok(AccountTokens {
        access_token: access_token.access_token,
        refresh_token: access_token.refresh_token,
        expires_at,
    })
}

/// Refresh an expired access token
async fn refresh_tokens(config: &GoogleConfig, tokens: &AccountTokens) -> Result<AccountTokens> {
    let client = create_client(config, tokens);

    let access_token = client
        .refresh_access_token()
        .await
        .context("Failed to refresh token")?;

    let expires_at = if access_token.expires_in > 0 {
        Some(chrono::Utc::now() + chrono::Duration::seconds(access_token.expires_in))
    } else {
        None
    };

    Ok(AccountTokens {
        access_token: access_token.access_token,
        refresh_token: if access_token.refresh_token.is_empty() {
            tokens.refresh_token.clone()
        } else {
            access_token.refresh_token
        },
        expires_at,
    })
}

/// Load stored tokens, refreshing (and re-saving) them if they are expired
/// or about to expire.
pub async fn fresh_tokens(config: &GoogleConfig) -> Result<AccountTokens> {
    let tokens = config::load_tokens()?
        .context("Not authenticated. Run `weekboard auth` first")?;

    let expired = match tokens.expires_at {
        Some(at) => at <= chrono::Utc::now() + chrono::Duration::seconds(60),
        None => true,
    };

    if !expired {
        return Ok(tokens);
    }

    tracing::debug!("access token expired, refreshing");
    let refreshed = refresh_tokens(config, &tokens).await?;
    config::save_tokens(&refreshed)?;

    Ok(refreshed)
}

/// Fetch the user's email to confirm who authenticated
pub async fn fetch_user_email(config: &GoogleConfig, tokens: &AccountTokens) -> Result<String> {
    let client = create_client(config, tokens);

    let response = client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .context("Failed to fetch calendar list")?;

    // The primary calendar's id is typically the user's email
    for cal in response.body {
        if cal.primary && !cal.id.is_empty() {
            return Ok(cal.id);
        }
    }

    Ok("(unknown email)".to_string())
}

/// A calendar from the user's calendar list
#[derive(Debug)]
pub struct CalendarEntry {
    pub id: String,
    pub name: String,
    pub primary: bool,
}

/// Fetch the list of calendars for the authenticated user
pub async fn fetch_calendars(
    config: &GoogleConfig,
    tokens: &AccountTokens,
) -> Result<Vec<CalendarEntry>> {
    let client = create_client(config, tokens);

    let response = client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .context("Failed to fetch calendars")?;

    Ok(response
        .body
        .into_iter()
        .filter(|c| !c.id.is_empty())
        .map(|c| CalendarEntry {
            id: c.id,
            name: if c.summary.is_empty() {
                "(unnamed)".to_string()
            } else {
                c.summary
            },
            primary: c.primary,
        })
        .collect())
}

/// Fetch the event color table
pub async fn fetch_colors(config: &GoogleConfig, tokens: &AccountTokens) -> Result<ColorTable> {
    let client = create_client(config, tokens);

    let response = client
        .colors()
        .get()
        .await
        .context("Failed to fetch color table")?;

    Ok(response
        .body
        .event
        .into_iter()
        .map(|(id, def)| {
            (
                id,
                EventColor {
                    background: def.background,
                    foreground: def.foreground,
                },
            )
        })
        .collect())
}

/// Fetch this window's events from a specific calendar, ordered by start
/// time, with deleted events excluded and recurring events expanded into
/// single occurrences.
pub async fn fetch_events(
    config: &GoogleConfig,
    tokens: &AccountTokens,
    calendar_id: &str,
    time_min: &str,
    time_max: &str,
) -> Result<Vec<RawEvent>> {
    let client = create_client(config, tokens);

    let response = client
        .events()
        .list_all(
            calendar_id,
            "",                 // i_cal_uid
            0,                  // max_attendees
            OrderBy::StartTime, // order_by
            &[],                // private_extended_property
            "",                 // q (search query)
            &[],                // shared_extended_property
            false,              // show_deleted
            false,              // show_hidden_invitations
            true,               // single_events: expand recurring events
            time_max,           // time_max
            time_min,           // time_min
            "",                 // time_zone
            "",                 // updated_min
        )
        .await
        .context("Failed to query user events")?;

    let mut result = Vec::new();

    for event in response.body {
        if event.status == "cancelled" || event.id.is_empty() {
            continue;
        }

        // All-day events carry a date instead of a dateTime; the week grid
        // only shows timed events.
        let start = match event.start.as_ref().and_then(|s| s.date_time) {
            Some(dt) => dt,
            None => continue,
        };
        let end = match event.end.as_ref().and_then(|e| e.date_time) {
            Some(dt) => dt,
            None => continue,
        };

        result.push(RawEvent {
            start: start.with_timezone(&Local).to_rfc3339(),
            end: end.with_timezone(&Local).to_rfc3339(),
            summary: event.summary,
            color_id: event.color_id,
        });
    }

    Ok(result)
}
