use chrono::{Datelike as _, Days, Months, NaiveDate};

use super::event::Event;

pub const GRID_COLS: usize = 7;

pub const WEEKDAYS: [&str; GRID_COLS] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

pub const MONTHS: [&str; 12] = [
  "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
  "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// A calendar month, always backed by valid first and last days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
  first: NaiveDate,
  last: NaiveDate,
}

impl YearMonth {
  /// `month0` is zero based.
  pub fn new(year: i32, month0: u32) -> Option<Self> {
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    // day 0 of the next month
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;

    Some(Self { first, last })
  }

  pub fn of(date: NaiveDate) -> Option<Self> {
    Self::new(date.year(), date.month0())
  }

  pub const fn first(&self) -> NaiveDate {
    self.first
  }

  pub const fn last(&self) -> NaiveDate {
    self.last
  }

  pub fn year(&self) -> i32 {
    self.first.year()
  }

  pub fn month0(&self) -> u32 {
    self.first.month0()
  }

  pub fn days(&self) -> u32 {
    self.last.day()
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.first <= date && date <= self.last
  }

  pub fn succ(&self) -> Option<Self> {
    Self::of(self.last.succ_opt()?)
  }

  pub fn pred(&self) -> Option<Self> {
    Self::of(self.first.pred_opt()?)
  }

  /// Portuguese label, e.g. `Fevereiro 2026`.
  pub fn label(&self) -> String {
    format!("{} {}", MONTHS[self.month0() as usize], self.year())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell<'a> {
  pub date: NaiveDate,
  pub day: u32,
  pub in_month: bool,
  /// Only set on cells of the displayed month.
  pub is_today: bool,
  /// Events of the day with their position in the event slice.
  pub events: Vec<(usize, &'a Event)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth<'a> {
  pub month: YearMonth,
  pub cells: Vec<DayCell<'a>>,
}

impl<'a> CalendarMonth<'a> {
  pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
    self.cells.chunks(GRID_COLS)
  }

  /// Cells of the displayed month, skipping the fillers.
  pub fn month_cells(&self) -> impl Iterator<Item = &DayCell<'a>> {
    self.cells.iter().filter(|cell| cell.in_month)
  }
}

/// Lays out `month` as whole weeks starting on Sunday.
///
/// The weeks are padded with the tail of the previous month and the head of
/// the next one; those filler cells still carry their events.
pub fn build<'a>(month: YearMonth, events: &'a [Event], today: NaiveDate) -> CalendarMonth<'a> {
  let leading = month.first().weekday().num_days_from_sunday() as usize;
  let days = month.days() as usize;
  let trailing = (GRID_COLS - (leading + days) % GRID_COLS) % GRID_COLS;

  let cell = |date: NaiveDate| {
    let in_month = month.contains(date);

    DayCell {
      date,
      day: date.day(),
      in_month,
      is_today: in_month && date == today,
      events: events
        .iter()
        .enumerate()
        .filter(|(_, event)| event.is_on(date))
        .collect(),
    }
  };

  let before = (1..=leading as u64)
    .rev()
    .filter_map(|offset| month.first().checked_sub_days(Days::new(offset)));

  let cells = before
    .chain(month.first().iter_days().take(days + trailing))
    .map(cell)
    .collect::<Vec<_>>();

  log::trace!("Built {} with {} cells", month.label(), cells.len());

  CalendarMonth { month, cells }
}
