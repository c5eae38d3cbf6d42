use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use super::date;

/// One record of the published sheet, keyed by header.
pub type Row = BTreeMap<String, String>;

/// Header names of the published form responses.
pub mod column {
  pub const NAME: &str = "Nome do Evento";
  pub const DATE: &str = "Data";
  pub const TIMESTAMP: &str = "Timestamp";
  pub const START_TIME: &str = "Hora de início";
  pub const LOCATION: &str = "Local";
  pub const COST: &str = "Custo";
  pub const LINK: &str = "Link do Evento";
  pub const ORGANIZER: &str = "Realização";
  pub const DESCRIPTION: &str = "Breve Descrição";
  pub const KIND: &str = "Tipo do Evento";
  pub const RATING: &str = "Rating?";
}

/// Deep-link identity of an event, `ev` followed by the epoch milliseconds of
/// its start. Two events starting at the same moment share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

impl EventId {
  pub fn from_date_time(date_time: NaiveDateTime) -> Self {
    Self(format!("ev{}", date_time.and_utc().timestamp_millis()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for EventId {
  fn fmt(&self, formatter: &mut Formatter) -> Result {
    formatter.write_str(&self.0)
  }
}

impl PartialEq<str> for EventId {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
  Tournament,
  Meetup,
  Other,
  Default,
}

impl EventKind {
  pub fn classify(kind: Option<&str>) -> Self {
    let Some(kind) = kind.filter(|kind| !kind.trim().is_empty()) else {
      return Self::Default;
    };

    let lower = kind.to_lowercase();
    if lower.contains("torneio") {
      Self::Tournament
    } else if lower.contains("encontro") || lower.contains("clube") {
      Self::Meetup
    } else {
      Self::Other
    }
  }

  pub const fn css_class(self) -> &'static str {
    match self {
      Self::Tournament => "tournament",
      Self::Meetup => "meetup",
      Self::Other => "other",
      Self::Default => "default",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
  pub id: EventId,
  pub raw: Row,
  pub occurs_at: NaiveDateTime,
  pub day: u32,
  /// Zero based, January is 0.
  pub month: u32,
  pub year: i32,
}

impl Event {
  /// Builds an event from a sheet row, `None` for rows without a name or
  /// without a readable date.
  pub fn from_row(raw: Row, tz: Tz) -> Option<Self> {
    if raw.get(column::NAME).is_none_or(|name| name.trim().is_empty()) {
      return None;
    }

    let occurs_at = date::resolve(
      raw.get(column::DATE).map(String::as_str),
      raw.get(column::TIMESTAMP).map(String::as_str),
      tz,
    )?;

    Some(Self {
      id: EventId::from_date_time(occurs_at),
      day: occurs_at.day(),
      month: occurs_at.month0(),
      year: occurs_at.year(),
      occurs_at,
      raw,
    })
  }

  /// Trimmed, non-empty value of a column.
  pub fn field(&self, column: &str) -> Option<&str> {
    self
      .raw
      .get(column)
      .map(|value| value.trim())
      .filter(|value| !value.is_empty())
  }

  pub fn name(&self) -> &str {
    self.field(column::NAME).unwrap_or_default()
  }

  pub fn kind(&self) -> EventKind {
    EventKind::classify(self.field(column::KIND))
  }

  pub const fn date(&self) -> NaiveDate {
    self.occurs_at.date()
  }

  pub fn is_on(&self, date: NaiveDate) -> bool {
    self.day == date.day() && self.month == date.month0() && self.year == date.year()
  }
}

#[cfg(test)]
pub(crate) fn row(fields: &[(&str, &str)]) -> Row {
  fields
    .iter()
    .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
    .collect()
}
