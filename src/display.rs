//! Display formatting helpers for the surrounding UI layer.
//!
//! Pure string formatting only; callers pass the current time in so nothing
//! here reads a clock.

use chrono::{DateTime, Utc};

use crate::message::ChannelRecord;

/// Discord epoch (first second of 2015) in milliseconds.
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Milliseconds a snowflake's timestamp bits are shifted by (2^22).
const SNOWFLAKE_TIMESTAMP_SHIFT: u64 = 4_194_304;

/// Compact member/message counts: 1234 -> "1.23K", 1500000 -> "1.5M".
/// Trailing zeros after the decimal point are trimmed.
pub fn format_compact_count(count: u64) -> String {
    fn trim_zeros(mut value: String) -> String {
        if value.contains('.') {
            while value.ends_with('0') {
                value.pop();
            }
            if value.ends_with('.') {
                value.pop();
            }
        }
        value
    }

    if count >= 1_000_000_000 {
        trim_zeros(format!("{:.2}", count as f64 / 1_000_000_000.0)) + "B"
    } else if count >= 1_000_000 {
        trim_zeros(format!("{:.2}", count as f64 / 1_000_000.0)) + "M"
    } else if count >= 1_000 {
        trim_zeros(format!("{:.2}", count as f64 / 1_000.0)) + "K"
    } else {
        count.to_string()
    }
}

/// Creation time embedded in a snowflake id. `None` for non-numeric input.
pub fn snowflake_timestamp(snowflake: &str) -> Option<DateTime<Utc>> {
    let id = snowflake.parse::<u64>().ok()?;
    let millis = (id / SNOWFLAKE_TIMESTAMP_SHIFT) as i64 + DISCORD_EPOCH_MS;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

/// Relative timestamp the channel list shows: time of day for today,
/// "Yesterday", "N days ago" within a week, a plain date beyond that.
pub fn format_timestamp(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = timestamp else {
        return "Never".to_string();
    };
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return "Never".to_string();
    };
    let parsed = parsed.with_timezone(&Utc);

    let elapsed_days = (now - parsed).num_days();
    match elapsed_days {
        0 => parsed.format("%H:%M").to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{elapsed_days} days ago"),
        _ => parsed.format("%Y-%m-%d").to_string(),
    }
}

/// Name shown for a channel in the sidebar and recents list.
pub fn channel_display_name(channel: &ChannelRecord, current_user_id: Option<&str>) -> String {
    match channel.kind {
        // Guild text, voice, announcement and group DM channels have names
        0 | 2 | 3 | 5 => channel
            .name
            .clone()
            .unwrap_or_else(|| format!("ID: {}", channel.id)),
        // DMs are named after the other participant
        1 => channel
            .recipients
            .iter()
            .find(|user| Some(user.id.as_str()) != current_user_id)
            .map(|user| format!("@{}", user.username))
            .unwrap_or_else(|| "Unknown User".to_string()),
        _ => "Unknown Channel".to_string(),
    }
}

/// Embed accent color as a CSS hex string, zero-padded.
pub fn embed_color_hex(color: u32) -> String {
    format!("#{color:06x}")
}
