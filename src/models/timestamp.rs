use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::time::format_display;

/// Timestamp as stored by the document database.
///
/// Accepts the managed backend's `{ seconds, nanoseconds }` shape (also the
/// underscored `_seconds`/`_nanoseconds` variant produced by admin SDK
/// exports) as well as RFC 3339 strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "RawTimestamp")]
pub struct StoreTimestamp(DateTime<Utc>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Parts {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Text(String),
}

impl TryFrom<RawTimestamp> for StoreTimestamp {
    type Error = String;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        match raw {
            RawTimestamp::Parts {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(seconds, nanoseconds)
                .map(StoreTimestamp)
                .ok_or_else(|| format!("timestamp out of range: {}s {}ns", seconds, nanoseconds)),
            RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| StoreTimestamp(dt.with_timezone(&Utc)))
                .map_err(|e| format!("invalid timestamp '{}': {}", s, e)),
        }
    }
}

impl Serialize for StoreTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl StoreTimestamp {
    pub fn to_date(&self) -> DateTime<Utc> {
        self.0
    }

    /// `DD/MM/YYYY às HH:MM:SS` in the given display offset.
    pub fn display(&self, offset: FixedOffset) -> String {
        format_display(self.0, offset)
    }
}
