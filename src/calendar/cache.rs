use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logger::LogExt;

use super::event::Row;

pub const CACHE_KEY: &str = "club_calendar_cache";

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Record {
  /// Epoch milliseconds of the fetch.
  timestamp: i64,
  data: Vec<Row>,
}

/// Short lived copy of the last fetched sheet, one file per cache directory.
#[derive(Debug, Clone)]
pub struct Cache {
  path: PathBuf,
  ttl: Duration,
}

impl Cache {
  pub fn new(dir: &Path, ttl: Duration) -> Self {
    Self {
      path: dir.join(format!("{CACHE_KEY}.json")),
      ttl,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Rows of the last fetch, unless they are older than the freshness window
  /// or the file is missing or unreadable.
  pub fn read(&self, now_millis: i64) -> Option<Vec<Row>> {
    let raw = std::fs::read_to_string(&self.path).ok()?;
    let record: Record = serde_json::from_str(&raw).log_debug("Discarding unreadable cache")?;

    let age = now_millis.saturating_sub(record.timestamp);
    if age > i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX) {
      log::debug!("Cache is stale ({age} ms old)");
      return None;
    }

    Some(record.data)
  }

  /// Stores `rows`, failures are logged and otherwise ignored.
  pub fn write(&self, rows: &[Row], now_millis: i64) {
    let record = Record {
      timestamp: now_millis,
      data: rows.to_vec(),
    };

    let written = serde_json::to_string(&record)
      .map_err(std::io::Error::from)
      .and_then(|json| {
        if let Some(parent) = self.path.parent() {
          std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
      });

    written.log_warn("Could not write the event cache");
  }
}
