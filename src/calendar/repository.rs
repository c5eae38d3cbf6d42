use chrono::NaiveDate;
use chrono_tz::Tz;

use super::event::{Event, Row};
use super::source::Error;

/// The loaded events in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
  events: Vec<Event>,
}

impl Repository {
  /// Maps sheet rows to events, silently dropping rows without a name or a
  /// readable date.
  pub fn from_rows(rows: impl IntoIterator<Item = Row>, tz: Tz) -> Self {
    let mut dropped = 0_usize;
    let events = rows
      .into_iter()
      .filter_map(|row| {
        let event = Event::from_row(row, tz);
        if event.is_none() {
          dropped += 1;
        }
        event
      })
      .collect::<Vec<_>>();

    if dropped > 0 {
      log::debug!("Dropped {dropped} rows without a name or a readable date");
    }

    Self { events }
  }

  /// Same as [`Self::from_rows`] but treats a sheet without usable events as
  /// a failed load.
  ///
  /// # Errors
  /// Returns [`super::ErrorKind::EmptyDataset`] if no event survives.
  pub fn try_from_rows(rows: impl IntoIterator<Item = Row>, tz: Tz) -> Result<Self, Error> {
    let repository = Self::from_rows(rows, tz);

    if repository.is_empty() {
      return Err(Error::empty_dataset());
    }

    Ok(repository)
  }

  pub fn events(&self) -> &[Event] {
    &self.events
  }

  pub fn on_day(&self, date: NaiveDate) -> impl Iterator<Item = &Event> {
    self.events.iter().filter(move |event| event.is_on(date))
  }

  /// First event carrying `id`, colliding ids resolve to the earliest row.
  pub fn find(&self, id: &str) -> Option<&Event> {
    self.events.iter().find(|event| event.id == *id)
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }
}
