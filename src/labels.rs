//! Human-readable labels for timestamps.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Label for a conversation's last activity, relative to `now`.
///
/// Days are compared as calendar dates in `now`'s time zone. Unknown
/// timestamps, and timestamps in the future, read as "Today".
pub fn relative_date_label<Tz: TimeZone>(ts: Option<DateTime<Utc>>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(ts) = ts else {
        return "Today".to_string();
    };

    let local = ts.with_timezone(&now.timezone());
    let days = (now.date_naive() - local.date_naive()).num_days();

    match days {
        d if d <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => local.format("%A").to_string(),
        7..=364 => local.format("%b %-d").to_string(),
        _ => local.format("%b %-d, %Y").to_string(),
    }
}

/// [`relative_date_label`] against the local clock.
pub fn relative_date_label_now(ts: Option<DateTime<Utc>>) -> String {
    relative_date_label(ts, &Local::now())
}

/// `HH:MM` in local time, or empty when the time is unknown.
pub fn message_time_label(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|ts| ts.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}
