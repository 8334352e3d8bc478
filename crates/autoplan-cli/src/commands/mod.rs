pub mod config;
pub mod event;
pub mod ledger;
pub mod plan;
pub mod stats;
pub mod task;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Parse an RFC 3339 instant or a local `YYYY-MM-DD HH:MM`.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|_| format!("expected RFC 3339 or 'YYYY-MM-DD HH:MM', got '{s}'"))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("'{s}' does not exist in the local time zone"))
}

/// Local wall-clock `HH:MM` for display.
pub fn hm(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%H:%M").to_string()
}

/// Local wall-clock `YYYY-MM-DD HH:MM` for display.
pub fn ymd_hm(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
