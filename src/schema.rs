//! Database schema definitions
//!
//! The landing table lives in the `raw` namespace and is dropped and
//! recreated on every load. The DDL below is the source of truth; the
//! diesel `table!` block mirrors it so inserts and counts are type-checked.
//!
//! The table has no primary key. Diesel requires one to be named, so
//! `message_id` is declared here; nothing relies on it being unique.

/// Namespace holding unprocessed data
pub const RAW_SCHEMA: &str = "raw";

/// Landing table name inside [`RAW_SCHEMA`]
pub const MESSAGES_TABLE: &str = "telegram_messages";

/// Idempotently creates the landing namespace
pub const CREATE_RAW_SCHEMA: &str = "CREATE SCHEMA IF NOT EXISTS raw;";

/// Drops the landing table and every previously loaded partition with it
pub const DROP_MESSAGES_TABLE: &str = "DROP TABLE IF EXISTS raw.telegram_messages;";

/// Recreates the landing table
pub const CREATE_MESSAGES_TABLE: &str = "
CREATE TABLE raw.telegram_messages (
    message_id BIGINT,
    channel_name TEXT,
    channel_title TEXT,
    message_date TIMESTAMP WITH TIME ZONE,
    message_text TEXT,
    has_media BOOLEAN,
    image_path TEXT,
    views INTEGER,
    forwards INTEGER,
    loaded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);";

/// Row count per channel, largest first
pub const COUNT_BY_CHANNEL: &str = "
SELECT channel_name, COUNT(*) AS message_count
FROM raw.telegram_messages
GROUP BY channel_name
ORDER BY message_count DESC, channel_name ASC;";

diesel::table! {
    /// Landing table for scraped messages
    raw.telegram_messages (message_id) {
        /// Telegram message identifier
        message_id -> Nullable<Int8>,
        /// Channel username
        channel_name -> Nullable<Text>,
        /// Channel display title
        channel_title -> Nullable<Text>,
        /// Time the message was posted
        message_date -> Nullable<Timestamptz>,
        /// Message body
        message_text -> Nullable<Text>,
        /// Photo or document attached
        has_media -> Nullable<Bool>,
        /// Saved media path
        image_path -> Nullable<Text>,
        /// View counter
        views -> Nullable<Int4>,
        /// Forward counter
        forwards -> Nullable<Int4>,
        /// Set by the server on insert
        loaded_at -> Nullable<Timestamp>,
    }
}
