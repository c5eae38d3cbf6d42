use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;

use super::cache::Cache;
use super::repository::Repository;
use super::source::{parse_rows, Error, ErrorKind, Source};

/// Shared flag telling a fetch that nobody waits for its result any more.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

impl PartialEq for CancellationToken {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for CancellationToken {}

/// Fetches the sheet, consulting and refreshing the cache.
#[derive(Debug, Clone)]
pub struct Loader {
  source: Arc<dyn Source>,
  cache: Option<Cache>,
  timeout: Duration,
  tz: Tz,
}

impl Loader {
  pub fn new(source: Arc<dyn Source>, cache: Option<Cache>, timeout: Duration, tz: Tz) -> Self {
    Self {
      source,
      cache,
      timeout,
      tz,
    }
  }

  /// Events of a fresh cache entry, if there is one with usable events.
  pub fn cached(&self, now_millis: i64) -> Option<Repository> {
    let rows = self.cache.as_ref()?.read(now_millis)?;
    let repository = Repository::from_rows(rows, self.tz);

    (!repository.is_empty()).then_some(repository)
  }

  /// Fetches and maps the sheet, racing the source against the deadline.
  ///
  /// On timeout `token` is cancelled and the eventual response is dropped.
  /// Successful non-empty fetches are written to the cache.
  ///
  /// # Errors
  /// Returns an error if the fetch fails, times out or yields no events.
  pub fn load(&self, token: &CancellationToken, now_millis: i64) -> Result<Repository, Error> {
    let rows = self.fetch_rows(token)?;

    if rows.is_empty() {
      return Err(Error::empty_dataset());
    }

    if let Some(cache) = &self.cache {
      cache.write(&rows, now_millis);
    }

    Repository::try_from_rows(rows, self.tz)
  }

  fn fetch_rows(&self, token: &CancellationToken) -> Result<Vec<super::Row>, Error> {
    let (sender, receiver) = mpsc::channel();
    let source = Arc::clone(&self.source);
    let worker_token = token.clone();

    std::thread::spawn(move || {
      let result = source.fetch().and_then(|body| parse_rows(&body));

      if worker_token.is_cancelled() {
        log::debug!("Dropping a response that arrived after the deadline");
        return;
      }

      // the receiver is gone when the deadline passed in the meantime
      let _ = sender.send(result);
    });

    match receiver.recv_timeout(self.timeout) {
      Ok(result) => result,
      Err(RecvTimeoutError::Timeout) => {
        token.cancel();
        log::warn!("Fetching events timed out after {:?}", self.timeout);

        Err(Error::timeout(self.timeout))
      }
      Err(RecvTimeoutError::Disconnected) => Err(Error {
        kind: ErrorKind::Fetch,
        message: "The fetch worker stopped without an answer".to_string(),
      }),
    }
  }
}
