//! Helpers for building partition directories on disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use telegram_raw_loader::Partition;

pub const TEST_DATE: &str = "2026-01-18";

/// `count` messages for `channel`, ids starting at 1
pub fn channel_messages(channel: &str, count: usize) -> Value {
    let messages: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "message_id": i,
                "channel_name": channel,
                "channel_title": format!("{channel} Official"),
                "message_date": "2026-01-18T09:30:00+00:00",
                "message_text": format!("post {i} from {channel}"),
                "has_media": i % 2 == 0,
                "image_path": if i % 2 == 0 { Value::from(format!("data/raw/images/{channel}/{i}.jpg")) } else { Value::Null },
                "views": 100 * i,
                "forwards": i,
            })
        })
        .collect();
    Value::Array(messages)
}

/// Create `<base>/raw/telegram_messages/<date>/` and return it
pub fn partition_dir(base: &Path, date: &str) -> PathBuf {
    let dir = Partition::new(base, date).dir();
    fs::create_dir_all(&dir).expect("create partition dir");
    dir
}

/// Write `content` to `<dir>/<name>`
pub fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write partition file");
}

/// Write a JSON value to `<dir>/<name>`
pub fn write_json(dir: &Path, name: &str, value: &Value) {
    write_file(dir, name, &value.to_string());
}
