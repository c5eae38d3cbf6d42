use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Zone-less formats tried by the free-form fallback, most specific first.
const DATE_TIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%B %d, %Y %H:%M",
];

const DATE_FORMATS: [&str; 8] = [
  "%B %d, %Y",
  "%b %d, %Y",
  "%B %d %Y",
  "%b %d %Y",
  "%d %B %Y",
  "%d %b %Y",
  "%A, %B %d, %Y",
  "%Y%m%d",
];

/// Current calendar day in the display time zone.
pub fn today(tz: Tz) -> NaiveDate {
  Utc::now().with_timezone(&tz).date_naive()
}

pub fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

/// Resolves the date of a spreadsheet row.
///
/// The primary value wins whenever it is not blank, the fallback (the form
/// submission timestamp) is only consulted for rows without a date.
pub fn resolve(primary: Option<&str>, fallback: Option<&str>, tz: Tz) -> Option<NaiveDateTime> {
  let primary = primary.map(str::trim).filter(|value| !value.is_empty());

  match primary {
    Some(value) => parse_date(value, tz),
    None => parse_date(fallback?, tz),
  }
}

/// Parses a date as written by the spreadsheet or by hand.
///
/// Slash separated dates are read as month/day/year unless one of the first
/// two components can only be a day. `2/3/2026` is therefore the 3rd of
/// February, which is how the published sheet exports its dates.
pub fn parse_date(text: &str, tz: Tz) -> Option<NaiveDateTime> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }

  if text.contains('/') {
    if let Some(date) = parse_slashed(text) {
      return Some(date.and_time(NaiveTime::MIN));
    }
  }

  if text.contains('-') {
    if let Some(date) = parse_iso_like(text) {
      return Some(date.and_time(NaiveTime::MIN));
    }
  }

  parse_free_form(text, tz)
}

fn parse_slashed(text: &str) -> Option<NaiveDate> {
  let [p0, p1, p2] = split_three(text, '/')?;

  let (p0, p1, p2) = (leading_int(p0)?, leading_int(p1)?, leading_int(p2)?);
  let year = expand_year(p2);

  if p0 > 12 {
    ymd(year, p1, p0)
  } else {
    // p1 > 12 and the ambiguous case both read month first
    ymd(year, p0, p1)
  }
}

fn parse_iso_like(text: &str) -> Option<NaiveDate> {
  let [year, month, day] = split_three(text, '-')?;

  if year.chars().count() != 4 {
    return None;
  }

  ymd(expand_year(leading_int(year)?), leading_int(month)?, leading_int(day)?)
}

fn parse_free_form(text: &str, tz: Tz) -> Option<NaiveDateTime> {
  if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
    return Some(date_time.with_timezone(&tz).naive_local());
  }

  if let Ok(date_time) = DateTime::parse_from_rfc2822(text) {
    return Some(date_time.with_timezone(&tz).naive_local());
  }

  if let Some(date_time) = DATE_TIME_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
  {
    return Some(date_time);
  }

  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    .map(|date| date.and_time(NaiveTime::MIN))
}

fn split_three(text: &str, separator: char) -> Option<[&str; 3]> {
  let mut parts = text.split(separator);
  let split = [parts.next()?, parts.next()?, parts.next()?];

  match parts.next() {
    Some(_) => None,
    None => Some(split),
  }
}

/// Reads the integer at the start of a component, ignoring what follows it,
/// so `"2026 10:23:45"` reads as `2026`.
fn leading_int(part: &str) -> Option<i32> {
  let part = part.trim();
  let end = part
    .char_indices()
    .find(|(_, c)| !c.is_ascii_digit())
    .map_or(part.len(), |(idx, _)| idx);

  part[..end].parse().ok()
}

const fn expand_year(year: i32) -> i32 {
  if matches!(year, 0..=99) {
    1900 + year
  } else {
    year
  }
}

/// Builds a date letting out of range parts roll over: month 13 is January
/// of the next year, day 0 the last day of the previous month.
fn ymd(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
  let january = NaiveDate::from_ymd_opt(year, 1, 1)?;
  let first = shift_months(january, month.checked_sub(1)?)?;

  shift_days(first, day.checked_sub(1)?)
}

fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
  let by = Months::new(months.unsigned_abs());

  match months.is_negative() {
    true => date.checked_sub_months(by),
    false => date.checked_add_months(by),
  }
}

fn shift_days(date: NaiveDate, days: i32) -> Option<NaiveDate> {
  let by = Days::new(u64::from(days.unsigned_abs()));

  match days.is_negative() {
    true => date.checked_sub_days(by),
    false => date.checked_add_days(by),
  }
}
