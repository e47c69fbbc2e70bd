//! iCalendar export of a single ping

use crate::domain::Ping;
use chrono::{DateTime, Duration, Utc};

/// Length of the exported event
pub const EVENT_DURATION_MIN: i64 = 120;

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes a TEXT value (RFC 5545, section 3.3.11)
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn filename(ping: &Ping) -> String {
    format!("aura-{}.ics", ping.id)
}

/// Renders `ping` as a VCALENDAR holding one VEVENT, with CRLF line endings
pub fn render(ping: &Ping) -> String {
    let start = ping.starts_at;
    let end = start + Duration::minutes(EVENT_DURATION_MIN);

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Aura//Ping for Beer//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:aura-{}@aura", ping.id),
        format!("DTSTAMP:{}", format_instant(start)),
        format!("DTSTART:{}", format_instant(start)),
        format!("DTEND:{}", format_instant(end)),
        format!("SUMMARY:{}", escape_text(&ping.title)),
        format!("LOCATION:{}", escape_text(&ping.location)),
    ];
    if !ping.notes.trim().is_empty() {
        lines.push(format!("DESCRIPTION:{}", escape_text(&ping.notes)));
    }
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    let mut body = lines.join("\r\n");
    body.push_str("\r\n");
    body
}
