use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;

use ureq::Agent;
use url::Url;

use super::event::Row;

/// Where the published sheet is read from.
pub trait Source: Debug + Send + Sync {
  /// Returns the raw CSV body.
  ///
  /// # Errors
  /// Returns an error if the resource cannot be read.
  fn fetch(&self) -> Result<String, Error>;
}

/// Picks the source implementation matching the scheme of `url`.
pub fn from_url(url: &Url, timeout: Duration) -> Result<Box<dyn Source>, Error> {
  match url.scheme() {
    "http" | "https" => Ok(Box::new(HttpSource::new(url.clone(), timeout))),
    "file" => {
      let path = url.to_file_path().map_err(|()| Error {
        kind: ErrorKind::Fetch,
        message: format!("Not a local path: {url}"),
      })?;

      Ok(Box::new(FileSource::new(path)))
    }
    scheme => Err(Error {
      kind: ErrorKind::Fetch,
      message: format!("Unsupported source scheme: {scheme}"),
    }),
  }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
  agent: Agent,
  url: Url,
}

impl HttpSource {
  pub fn new(url: Url, timeout: Duration) -> Self {
    Self {
      agent: ureq::AgentBuilder::new().timeout(timeout).build(),
      url,
    }
  }
}

impl Source for HttpSource {
  fn fetch(&self) -> Result<String, Error> {
    log::debug!("Fetching events from {}", self.url);

    self
      .agent
      .get(self.url.as_str())
      .set("Accept", "text/csv")
      .call()?
      .into_string()
      .map_err(Error::from)
  }
}

#[derive(Debug, Clone)]
pub struct FileSource {
  path: PathBuf,
}

impl FileSource {
  pub const fn new(path: PathBuf) -> Self {
    Self { path }
  }
}

impl Source for FileSource {
  fn fetch(&self) -> Result<String, Error> {
    log::debug!("Reading events from {}", self.path.display());

    Ok(std::fs::read_to_string(&self.path)?)
  }
}

/// Splits a CSV body into rows keyed by the header line.
///
/// Blank records are skipped, short records only carry the columns they have.
///
/// # Errors
/// Returns an error if the body is not valid CSV.
pub fn parse_rows(body: &str) -> Result<Vec<Row>, Error> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .from_reader(body.as_bytes());

  let headers = reader.headers()?.clone();

  let mut rows = Vec::new();
  for record in reader.records() {
    let record = record?;

    if record.iter().all(|field| field.trim().is_empty()) {
      continue;
    }

    rows.push(
      headers
        .iter()
        .zip(record.iter())
        .map(|(header, field)| (header.trim().to_string(), field.to_string()))
        .collect(),
    );
  }

  Ok(rows)
}

/// Errors that may occur while loading the events.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct Error {
  pub kind: ErrorKind,
  pub message: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
  Fetch,
  Parse,
  EmptyDataset,
  Timeout,
}

impl Error {
  pub fn empty_dataset() -> Self {
    Self {
      kind: ErrorKind::EmptyDataset,
      message: "The sheet has no usable events".to_string(),
    }
  }

  pub fn timeout(after: Duration) -> Self {
    Self {
      kind: ErrorKind::Timeout,
      message: format!("No response after {}s", after.as_secs_f32()),
    }
  }
}

impl From<ureq::Error> for Error {
  fn from(e: ureq::Error) -> Self {
    Self {
      kind: ErrorKind::Fetch,
      message: format!("{e:?}"),
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    Self {
      kind: ErrorKind::Fetch,
      message: e.to_string(),
    }
  }
}

impl From<csv::Error> for Error {
  fn from(e: csv::Error) -> Self {
    Self {
      kind: ErrorKind::Parse,
      message: e.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::calendar::event::column;

  const SHEET: &str = "\
Timestamp,Nome do Evento,Data,Local,Tipo do Evento
2/1/2026 10:00:00,Torneio X,2/15/2026,\"Praça Central, 10\",Torneio

,,,,
2/2/2026 11:00:00,Encontro Y,31/1/2026
";

  #[test]
  fn rows_are_keyed_by_header() {
    let rows = parse_rows(SHEET).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][column::NAME], "Torneio X");
    assert_eq!(rows[0][column::LOCATION], "Praça Central, 10");
    assert_eq!(rows[1][column::DATE], "31/1/2026");
    assert!(!rows[1].contains_key(column::KIND));
  }

  #[test]
  fn header_only_body_has_no_rows() {
    assert!(parse_rows("Nome do Evento,Data\n").unwrap().is_empty());
  }

  #[test]
  fn file_source_reads_the_body() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("events.csv");
    std::fs::write(&path, SHEET).unwrap();

    let url = Url::from_file_path(&path).unwrap();
    let source = from_url(&url, Duration::from_secs(1)).unwrap();

    assert_eq!(source.fetch().unwrap(), SHEET);
  }

  #[test]
  fn missing_file_is_a_fetch_error() {
    let source = FileSource::new(PathBuf::from("/definitely/not/here.csv"));

    assert_eq!(source.fetch().unwrap_err().kind, ErrorKind::Fetch);
  }

  #[test]
  fn unknown_schemes_are_rejected() {
    let url = Url::parse("ftp://example.org/events.csv").unwrap();

    assert_eq!(from_url(&url, Duration::from_secs(1)).unwrap_err().kind, ErrorKind::Fetch);
  }
}
