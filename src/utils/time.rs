use chrono::{DateTime, FixedOffset, Utc};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y às %H:%M:%S";

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Display offset from a minute count east of UTC; out-of-range values fall
/// back to UTC.
pub fn display_offset(minutes_east: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes_east.saturating_mul(60))
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
}

pub fn format_display(dt: DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).format(DISPLAY_FORMAT).to_string()
}
