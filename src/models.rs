//! Data models for message loading
//!
//! This module contains the scraped message record as it appears on disk,
//! the row inserted into the landing table, and the results reported back
//! after a load.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::telegram_messages;

/// A scraped message as written by the collector
///
/// Every field is optional; absent keys and explicit `null`s both become
/// `None` and are loaded as NULL. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Telegram message identifier within its channel
    #[serde(default)]
    pub message_id: Option<i64>,
    /// Channel username
    #[serde(default)]
    pub channel_name: Option<String>,
    /// Channel display title
    #[serde(default)]
    pub channel_title: Option<String>,
    /// Time the message was posted
    #[serde(default, deserialize_with = "deserialize_message_date")]
    pub message_date: Option<DateTime<Utc>>,
    /// Message body
    #[serde(default)]
    pub message_text: Option<String>,
    /// True if the message carried a photo or document
    #[serde(default)]
    pub has_media: Option<bool>,
    /// Where the collector saved the media file
    #[serde(default)]
    pub image_path: Option<String>,
    /// View counter at scrape time
    #[serde(default)]
    pub views: Option<i32>,
    /// Forward counter at scrape time
    #[serde(default)]
    pub forwards: Option<i32>,
}

/// Timestamp layouts carrying an offset; `%#z` takes `+03`, `+0300` and `+03:00`
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

/// Offset-less layouts, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a scraped timestamp.
///
/// Accepts RFC 3339 (`2026-01-18T09:30:00+00:00`, `...Z`), `T` or space
/// separated timestamps with an hour, `hhmm` or `hh:mm` offset, offset-less
/// timestamps taken as UTC, and bare dates taken as midnight UTC.
pub fn parse_message_date(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn deserialize_message_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| {
        parse_message_date(&value)
            .map_err(|e| serde::de::Error::custom(format!("invalid message_date {value:?}: {e}")))
    })
    .transpose()
}

/// Landing table row; `loaded_at` is filled in by the server
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = telegram_messages, treat_none_as_default_value = false)]
pub struct NewTelegramMessage<'a> {
    /// Telegram message identifier
    pub message_id: Option<i64>,
    /// Channel username
    pub channel_name: Option<&'a str>,
    /// Channel display title
    pub channel_title: Option<&'a str>,
    /// Time the message was posted
    pub message_date: Option<DateTime<Utc>>,
    /// Message body
    pub message_text: Option<&'a str>,
    /// Media flag
    pub has_media: Option<bool>,
    /// Saved media path
    pub image_path: Option<&'a str>,
    /// View counter
    pub views: Option<i32>,
    /// Forward counter
    pub forwards: Option<i32>,
}

impl<'a> From<&'a RawMessage> for NewTelegramMessage<'a> {
    fn from(message: &'a RawMessage) -> Self {
        Self {
            message_id: message.message_id,
            channel_name: message.channel_name.as_deref(),
            channel_title: message.channel_title.as_deref(),
            message_date: message.message_date,
            message_text: message.message_text.as_deref(),
            has_media: message.has_media,
            image_path: message.image_path.as_deref(),
            views: message.views,
            forwards: message.forwards,
        }
    }
}

/// Row count for one channel in the landing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, QueryableByName)]
pub struct ChannelCount {
    /// Channel username, `None` for rows without one
    #[diesel(sql_type = Nullable<Text>)]
    pub channel_name: Option<String>,
    /// Rows loaded for the channel
    #[diesel(sql_type = BigInt)]
    pub message_count: i64,
}

impl ChannelCount {
    /// Channel name for display
    #[must_use]
    pub fn label(&self) -> &str {
        self.channel_name.as_deref().unwrap_or("<no channel>")
    }
}

/// Read-only row counts taken after a load
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadVerification {
    /// Rows in the landing table
    pub total_rows: i64,
    /// Rows per channel, largest first
    pub per_channel: Vec<ChannelCount>,
}

/// Outcome of one load run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Partition date that was loaded
    pub date: String,
    /// Message files read from the partition
    pub files_read: usize,
    /// Records parsed across all files
    pub messages_read: usize,
    /// Rows inserted
    pub rows_loaded: usize,
    /// Post-load counts, absent when the partition held no messages
    pub verification: Option<LoadVerification>,
}
