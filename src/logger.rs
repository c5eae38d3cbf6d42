use std::fmt::Debug;

pub fn init() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
}

/// Logs a failure at the caller's location and discards it.
///
/// For work that is allowed to fail quietly, like the cache or the clipboard.
pub trait LogExt<T> {
  fn log_debug(self, msg: &str) -> Option<T>;
  fn log_warn(self, msg: &str) -> Option<T>;
}

impl<T, E> LogExt<T> for Result<T, E> where E: Debug {
  #[track_caller]
  fn log_debug(self, msg: &str) -> Option<T> {
    match self {
      Ok(value) => Some(value),
      Err(error) => {
        let location = std::panic::Location::caller();

        log::debug!("[{location}] {msg}: {error:?}");

        None
      }
    }
  }

  #[track_caller]
  fn log_warn(self, msg: &str) -> Option<T> {
    match self {
      Ok(value) => Some(value),
      Err(error) => {
        let location = std::panic::Location::caller();

        log::warn!("[{location}] {msg}: {error:?}");

        None
      }
    }
  }
}
