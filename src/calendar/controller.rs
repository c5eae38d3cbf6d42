use chrono::NaiveDate;

use super::deep_link;
use super::event::Event;
use super::grid_service::{self, CalendarMonth, YearMonth};
use super::loader::CancellationToken;
use super::repository::Repository;
use super::source::{Error, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Loading,
  Content,
  Error,
}

/// A fetch the shell has to run and report back through
/// [`Controller::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
  pub ticket: u64,
  pub background: bool,
  pub token: CancellationToken,
}

/// Application state of the calendar: which month is shown, which events are
/// loaded and what is open. It never does I/O itself.
#[derive(Debug)]
pub struct Controller {
  phase: Phase,
  repository: Repository,
  fallback: Option<Repository>,
  displayed: YearMonth,
  today: NaiveDate,
  selected: Option<Event>,
  links: deep_link::Tracker,
  next_ticket: u64,
  last_error: Option<Error>,
}

impl Controller {
  /// `today` must be a representable month, which any real date is.
  pub fn new(today: NaiveDate, fallback: Option<Repository>) -> Option<Self> {
    Some(Self {
      phase: Phase::Loading,
      repository: Repository::default(),
      fallback: fallback.filter(|fallback| !fallback.is_empty()),
      displayed: YearMonth::of(today)?,
      today,
      selected: None,
      links: deep_link::Tracker::default(),
      next_ticket: 0,
      last_error: None,
    })
  }

  pub const fn phase(&self) -> Phase {
    self.phase
  }

  pub const fn displayed(&self) -> YearMonth {
    self.displayed
  }

  pub const fn today(&self) -> NaiveDate {
    self.today
  }

  pub const fn repository(&self) -> &Repository {
    &self.repository
  }

  pub const fn last_error(&self) -> Option<&Error> {
    self.last_error.as_ref()
  }

  pub const fn selected(&self) -> Option<&Event> {
    self.selected.as_ref()
  }

  /// The grid of the displayed month, only while there is content.
  pub fn month(&self) -> Option<CalendarMonth<'_>> {
    (self.phase == Phase::Content)
      .then(|| grid_service::build(self.displayed, self.repository.events(), self.today))
  }

  pub fn is_current_month(&self) -> bool {
    self.displayed.contains(self.today)
  }

  /// Starts a load. A cached repository is shown right away and refreshed in
  /// the background, otherwise the calendar waits for a foreground fetch.
  pub fn load(&mut self, cached: Option<Repository>) -> FetchRequest {
    self.phase = Phase::Loading;

    let background = match cached {
      Some(repository) if !repository.is_empty() => {
        log::info!("Showing {} cached events", repository.len());
        self.show(repository);
        true
      }
      _ => false,
    };

    self.next_ticket += 1;

    FetchRequest {
      ticket: self.next_ticket,
      background,
      token: CancellationToken::new(),
    }
  }

  pub fn retry(&mut self, cached: Option<Repository>) -> FetchRequest {
    self.load(cached)
  }

  /// Periodic refresh of shown content, never leaves the content phase.
  pub fn refresh(&mut self) -> Option<FetchRequest> {
    if self.phase != Phase::Content {
      return None;
    }

    self.next_ticket += 1;

    Some(FetchRequest {
      ticket: self.next_ticket,
      background: true,
      token: CancellationToken::new(),
    })
  }

  /// Applies the outcome of a fetch.
  ///
  /// Background failures keep whatever is shown. Results arriving through a
  /// cancelled token are stale and ignored, except the timeout itself.
  pub fn complete(&mut self, request: &FetchRequest, result: Result<Repository, Error>) {
    let timed_out = matches!(&result, Err(error) if error.kind == ErrorKind::Timeout);
    if request.token.is_cancelled() && !timed_out {
      log::debug!("Ignoring the late result of fetch #{}", request.ticket);
      return;
    }

    match (result, request.background) {
      (Ok(repository), _) => {
        log::info!("Loaded {} events (fetch #{})", repository.len(), request.ticket);
        self.last_error = None;
        self.show(repository);
      }
      (Err(error), true) => {
        log::warn!("Background refresh #{} failed: {error}", request.ticket);
      }
      (Err(error), false) => {
        log::error!("Loading events failed: {error}");

        match self.fallback.clone() {
          Some(fallback) => {
            log::warn!("Showing the {} fallback events instead", fallback.len());
            self.show(fallback);
          }
          None => {
            self.phase = Phase::Error;
            self.selected = None;
          }
        }

        self.last_error = Some(error);
      }
    }
  }

  fn show(&mut self, repository: Repository) {
    self.repository = repository;
    self.phase = Phase::Content;
    self.resolve_link();
  }

  pub fn previous_month(&mut self) {
    if let Some(month) = self.navigable().and_then(|month| month.pred()) {
      self.displayed = month;
    }
  }

  pub fn next_month(&mut self) {
    if let Some(month) = self.navigable().and_then(|month| month.succ()) {
      self.displayed = month;
    }
  }

  pub fn go_to_today(&mut self) {
    if let Some(month) = self.navigable().and_then(|_| YearMonth::of(self.today)) {
      self.displayed = month;
    }
  }

  fn navigable(&self) -> Option<YearMonth> {
    (self.phase == Phase::Content).then_some(self.displayed)
  }

  pub fn set_today(&mut self, today: NaiveDate) {
    self.today = today;
  }

  /// Opens the detail of the event at `index` in the loaded events, as
  /// handed out by the grid cells.
  pub fn open_at(&mut self, index: usize) -> bool {
    match self.repository.events().get(index) {
      Some(event) => {
        self.selected = Some(event.clone());
        true
      }
      None => false,
    }
  }

  pub fn dismiss(&mut self) {
    self.selected = None;
  }

  /// Takes an incoming shared link. The event opens as soon as it is loaded,
  /// and only once per distinct link.
  pub fn follow_link(&mut self, link: &str) {
    if self.links.offer(link) && self.phase == Phase::Content {
      self.resolve_link();
    }
  }

  fn resolve_link(&mut self) {
    let Some(id) = self.links.take() else {
      return;
    };

    let Some(event) = self.repository.find(&id).cloned() else {
      log::info!("Shared link points to unknown event {id}");
      return;
    };

    if let Some(month) = YearMonth::new(event.year, event.month) {
      self.displayed = month;
    }
    self.selected = Some(event);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::calendar::event::{column, row};

  const TZ: chrono_tz::Tz = chrono_tz::America::Sao_Paulo;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
  }

  fn repository() -> Repository {
    Repository::from_rows(
      vec![
        row(&[(column::NAME, "Torneio X"), (column::DATE, "2/15/2026")]),
        row(&[(column::NAME, "Encontro Y"), (column::DATE, "10/24/2026")]),
      ],
      TZ,
    )
  }

  fn failure(kind: ErrorKind) -> Error {
    Error {
      kind,
      message: "boom".to_string(),
    }
  }

  fn loaded() -> Controller {
    let mut controller = Controller::new(today(), None).unwrap();
    let request = controller.load(None);
    controller.complete(&request, Ok(repository()));

    controller
  }

  #[test]
  fn foreground_load_shows_content() {
    let mut controller = Controller::new(today(), None).unwrap();
    let request = controller.load(None);

    assert!(!request.background);
    assert_eq!(controller.phase(), Phase::Loading);
    assert!(controller.month().is_none());

    controller.complete(&request, Ok(repository()));

    assert_eq!(controller.phase(), Phase::Content);
    assert_eq!(controller.displayed().label(), "Outubro 2026");
    assert!(controller.month().is_some());
  }

  #[test]
  fn foreground_failures_show_the_error_until_retried() {
    for kind in [ErrorKind::Fetch, ErrorKind::EmptyDataset, ErrorKind::Timeout] {
      let mut controller = Controller::new(today(), None).unwrap();
      let request = controller.load(None);
      controller.complete(&request, Err(failure(kind)));

      assert_eq!(controller.phase(), Phase::Error);
      assert_eq!(controller.last_error().map(|e| e.kind), Some(kind));

      let retry = controller.retry(None);
      assert_eq!(controller.phase(), Phase::Loading);
      assert!(retry.ticket > request.ticket);

      controller.complete(&retry, Ok(repository()));
      assert_eq!(controller.phase(), Phase::Content);
      assert!(controller.last_error().is_none());
    }
  }

  #[test]
  fn late_response_after_timeout_is_ignored() {
    let mut controller = Controller::new(today(), None).unwrap();
    let request = controller.load(None);

    request.token.cancel();
    controller.complete(&request, Err(failure(ErrorKind::Timeout)));
    controller.complete(&request, Ok(repository()));

    assert_eq!(controller.phase(), Phase::Error);
    assert!(controller.repository().is_empty());
  }

  #[test]
  fn cached_events_show_immediately_and_refresh_in_background() {
    let mut controller = Controller::new(today(), None).unwrap();
    let request = controller.load(Some(repository()));

    assert!(request.background);
    assert_eq!(controller.phase(), Phase::Content);

    controller.complete(&request, Err(failure(ErrorKind::Timeout)));
    assert_eq!(controller.phase(), Phase::Content);
    assert_eq!(controller.repository().len(), 2);
    assert!(controller.last_error().is_none());

    let refreshed = Repository::from_rows(vec![row(&[(column::NAME, "Novo"), (column::DATE, "10/1/2026")])], TZ);
    let request = controller.load(Some(repository()));
    controller.complete(&request, Ok(refreshed.clone()));
    assert_eq!(controller.repository(), &refreshed);
  }

  #[test]
  fn refresh_only_with_content() {
    let mut controller = Controller::new(today(), None).unwrap();
    let _ = controller.load(None);
    assert!(controller.refresh().is_none());

    let mut controller = loaded();
    let request = controller.refresh().unwrap();
    assert!(request.background);

    controller.complete(&request, Err(failure(ErrorKind::Fetch)));
    assert_eq!(controller.phase(), Phase::Content);
    assert_eq!(controller.repository().len(), 2);
  }

  #[test]
  fn empty_cache_is_a_foreground_load() {
    let mut controller = Controller::new(today(), None).unwrap();

    assert!(!controller.load(Some(Repository::default())).background);
    assert_eq!(controller.phase(), Phase::Loading);
  }

  #[test]
  fn fallback_replaces_the_error_state() {
    let fallback = Repository::from_rows(vec![row(&[(column::NAME, "Demo"), (column::DATE, "10/5/2026")])], TZ);
    let mut controller = Controller::new(today(), Some(fallback.clone())).unwrap();
    let request = controller.load(None);

    controller.complete(&request, Err(failure(ErrorKind::Fetch)));

    assert_eq!(controller.phase(), Phase::Content);
    assert_eq!(controller.repository(), &fallback);
    assert_eq!(controller.last_error().map(|e| e.kind), Some(ErrorKind::Fetch));
  }

  #[test]
  fn navigation_only_with_content() {
    let mut controller = Controller::new(today(), None).unwrap();
    let _ = controller.load(None);

    controller.next_month();
    assert_eq!(controller.displayed(), YearMonth::new(2026, 9).unwrap());

    let mut controller = loaded();
    controller.next_month();
    controller.next_month();
    controller.next_month();
    assert_eq!(controller.displayed(), YearMonth::new(2027, 0).unwrap());
    assert!(!controller.is_current_month());

    controller.previous_month();
    assert_eq!(controller.displayed(), YearMonth::new(2026, 11).unwrap());

    controller.go_to_today();
    assert_eq!(controller.displayed(), YearMonth::new(2026, 9).unwrap());
    assert!(controller.is_current_month());
  }

  #[test]
  fn open_and_dismiss() {
    let mut controller = loaded();

    assert!(controller.open_at(1));
    assert_eq!(controller.selected().map(Event::name), Some("Encontro Y"));

    controller.dismiss();
    assert!(controller.selected().is_none());
    assert!(!controller.open_at(2));
  }

  #[test]
  fn clicked_event_opens_even_when_its_day_shares_an_id() {
    let mut controller = Controller::new(today(), None).unwrap();
    let request = controller.load(None);
    controller.complete(
      &request,
      Ok(Repository::from_rows(
        vec![
          row(&[(column::NAME, "Torneio X"), (column::DATE, "10/24/2026")]),
          row(&[(column::NAME, "Encontro Y"), (column::DATE, "10/24/2026")]),
        ],
        TZ,
      )),
    );

    let (index, clicked) = {
      let month = controller.month().unwrap();
      let cell = month.month_cells().find(|cell| cell.day == 24).unwrap();
      assert_eq!(cell.events[0].1.id, cell.events[1].1.id);

      (cell.events[1].0, cell.events[1].1.name().to_string())
    };

    assert!(controller.open_at(index));
    assert_eq!(clicked, "Encontro Y");
    assert_eq!(controller.selected().map(Event::name), Some("Encontro Y"));
  }

  #[test]
  fn startup_link_opens_once_loaded() {
    let id = repository().events()[0].id.clone();
    let mut controller = Controller::new(today(), None).unwrap();

    controller.follow_link(&format!("https://clube.example/#{id}"));
    assert!(controller.selected().is_none());

    let request = controller.load(None);
    controller.complete(&request, Ok(repository()));

    assert_eq!(controller.selected().map(|event| &event.id), Some(&id));
    assert_eq!(controller.displayed(), YearMonth::new(2026, 1).unwrap());
  }

  #[test]
  fn same_link_does_not_reopen() {
    let id = repository().events()[0].id.clone();
    let mut controller = loaded();

    controller.follow_link(id.as_str());
    assert!(controller.selected().is_some());

    controller.dismiss();
    controller.go_to_today();
    controller.follow_link(&format!("#{id}"));
    assert!(controller.selected().is_none());

    // a background refresh does not bring it back either
    let request = controller.load(Some(repository()));
    controller.complete(&request, Ok(repository()));
    assert!(controller.selected().is_none());
    assert_eq!(controller.displayed(), YearMonth::new(2026, 9).unwrap());
  }

  #[test]
  fn changed_link_opens_the_new_event() {
    let events = repository();
    let mut controller = loaded();

    controller.follow_link(events.events()[0].id.as_str());
    controller.follow_link(events.events()[1].id.as_str());

    assert_eq!(controller.selected().map(Event::name), Some("Encontro Y"));
    assert_eq!(controller.displayed(), YearMonth::new(2026, 9).unwrap());
  }

  #[test]
  fn unknown_link_is_ignored() {
    let mut controller = loaded();
    controller.follow_link("#ev1");

    assert!(controller.selected().is_none());
    assert_eq!(controller.displayed(), YearMonth::new(2026, 9).unwrap());
  }
}
