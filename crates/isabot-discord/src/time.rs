// ABOUTME: Free-text time parsing into Discord timestamps and fixed UTC offsets.
// ABOUTME: Natural-language parsing is delegated to chrono-english (US dialect).

use crate::error::{BotError, Result};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Largest offset in use anywhere (UTC+14).
const MAX_OFFSET_HOURS: i32 = 14;

/// Parse `input` relative to `now` and render `<t:SECONDS:STYLE>`.
pub fn discord_timestamp<Tz>(input: &str, now: DateTime<Tz>, style: char) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let parsed = parse_time(input, now)?;
    Ok(format_timestamp(&parsed, style))
}

/// Discord's `<t:unix:style>` markup.
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>, style: char) -> String {
    format!("<t:{}:{}>", time.timestamp(), style)
}

/// Parse `input` relative to `now` and show it at each offset, one line each.
pub fn convert<Tz>(input: &str, offsets: &[&str], now: DateTime<Tz>) -> Result<Vec<String>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    if offsets.is_empty() {
        return Err(BotError::Time("no offsets given".into()));
    }
    let parsed = parse_time(input, now)?;
    Ok(render_at(&parsed.with_timezone(&Utc), offsets))
}

/// One line per offset; unrecognized offsets are reported in place.
pub fn render_at(time: &DateTime<Utc>, offsets: &[&str]) -> Vec<String> {
    offsets
        .iter()
        .map(|raw| match parse_offset(raw) {
            Some(offset) => format!(
                "`{}` {}",
                format_offset(&offset),
                time.with_timezone(&offset).format("%Y-%m-%d %H:%M")
            ),
            None => format!("`{}` unknown offset", raw),
        })
        .collect()
}

fn parse_time<Tz>(input: &str, now: DateTime<Tz>) -> Result<DateTime<Tz>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    if input.trim().is_empty() {
        return Err(BotError::Time("empty time string".into()));
    }
    parse_date_string(input.trim(), now, Dialect::Us)
        .map_err(|e| BotError::Time(format!("could not parse {:?}: {}", input, e)))
}

/// Accepts `UTC`, `GMT`, `Z`, `+5`, `-04:00`, `+0530`, `UTC+2`, `GMT-3:30`.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let upper = raw.trim().to_ascii_uppercase();
    if upper == "Z" {
        return FixedOffset::east_opt(0);
    }
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);
    if rest.is_empty() {
        return if upper.is_empty() {
            None
        } else {
            FixedOffset::east_opt(0)
        };
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    if !digits.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    if hours.is_empty() || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !minutes.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > MAX_OFFSET_HOURS || minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// `UTC`, `UTC+05:30`, `UTC-04:00`.
pub fn format_offset(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    format!("UTC{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60)
}
