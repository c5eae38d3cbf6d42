use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use chrono::Datelike;
use maud::{html, Markup, DOCTYPE};
use url::Url;

use crate::calendar::detail;
use crate::calendar::{self, CalendarMonth, CancellationToken, DayCell, Repository, YearMonth, WEEKDAYS};
use crate::config::Config;

/// Loads the events and writes `year`/`month` (1-12) as a static page.
pub fn run(config: &Config, year: Option<i32>, month: Option<u32>, output: Option<&Path>) -> anyhow::Result<()> {
    let today = calendar::today(config.display.timezone);
    let month = YearMonth::new(
        year.unwrap_or_else(|| today.year()),
        month.map_or_else(|| today.month0(), |month| month.saturating_sub(1)),
    )
    .context("No such month")?;

    let repository = load(config)?;
    let grid = calendar::build(month, repository.events(), today);
    let page = render(&config.display.title, &grid, config.share.base_url.as_ref()).into_string();

    match output {
        Some(path) => {
            std::fs::write(path, page).with_context(|| format!("Could not write {}", path.display()))?;
            log::info!("Wrote {} to {}", month.label(), path.display());
        }
        None => print!("{page}"),
    }

    Ok(())
}

fn load(config: &Config) -> anyhow::Result<Repository> {
    let loader = config.loader()?;
    let now = calendar::now_millis();

    if let Some(repository) = loader.cached(now) {
        return Ok(repository);
    }

    match loader.load(&CancellationToken::new(), now) {
        Ok(repository) => Ok(repository),
        Err(error) => match config.fallback()? {
            Some(fallback) if !fallback.is_empty() => {
                log::warn!("Loading events failed ({error}), exporting the fallback sheet");
                Ok(fallback)
            }
            _ => Err(error).context("Could not load the events"),
        },
    }
}

/// The month grid followed by one detail section per event. Sections are
/// anchored by the event's position, so pills of same-day events sharing an
/// id still land on their own section. The first event carrying an id also
/// gets that id as an anchor for shared links.
pub fn render(title: &str, grid: &CalendarMonth<'_>, share_base: Option<&Url>) -> Markup {
    let label = grid.month.label();

    let mut linked = BTreeSet::new();
    let details = grid
        .cells
        .iter()
        .flat_map(|cell| &cell.events)
        .map(|&(index, event)| (index, event, linked.insert(event.id.as_str())))
        .collect::<Vec<_>>();

    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                title { (title) " - " (label) }
            }
            body {
                h1 { (title) }
                table.calendar {
                    caption { (label) }
                    thead {
                        tr {
                            @for day in &WEEKDAYS {
                                th { (day) }
                            }
                        }
                    }
                    tbody {
                        @for week in grid.weeks() {
                            tr {
                                @for cell in week {
                                    td class=(day_class(cell)) {
                                        span.day-number { (cell.day) }
                                        @for &(index, event) in &cell.events {
                                            a class={ "event-pill " (event.kind().css_class()) } href={ "#" (anchor(index)) } {
                                                (event.name())
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                section.details {
                    @for &(index, event, first) in &details {
                        div id=(anchor(index)) {
                            @if first {
                                span id=(event.id.as_str()) {}
                            }
                            (detail::present(event, share_base).to_html())
                        }
                    }
                }
            }
        }
    }
}

fn anchor(index: usize) -> String {
    format!("event-{index}")
}

const fn day_class(cell: &DayCell<'_>) -> &'static str {
    match (cell.in_month, cell.is_today) {
        (false, _) => "day other-month",
        (true, true) => "day today",
        (true, false) => "day",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::calendar::{column, Row};

    const TZ: chrono_tz::Tz = chrono_tz::America::Sao_Paulo;

    fn sheet(rows: &[&[(&str, &str)]]) -> Repository {
        Repository::from_rows(
            rows.iter().map(|fields| {
                fields
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                    .collect::<Row>()
            }),
            TZ,
        )
    }

    #[test]
    fn renders_the_month_with_anchored_details() {
        let repository = sheet(&[
            &[(column::NAME, "Torneio <X>"), (column::DATE, "2/15/2026"), (column::KIND, "Torneio")],
            &[(column::NAME, "Outro mês"), (column::DATE, "3/15/2026")],
        ]);
        let month = YearMonth::new(2026, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let base = Url::parse("https://clube.example/").unwrap();

        let html = render("Clube & Cia", &calendar::build(month, repository.events(), today), Some(&base)).into_string();

        assert!(html.contains("<title>Clube &amp; Cia - Fevereiro 2026</title>"));
        assert!(html.contains("<th>Dom</th><th>Seg</th>"));
        assert!(html.contains(r##"<a class="event-pill tournament" href="#event-0">Torneio &lt;X&gt;</a>"##));
        assert!(html.contains(r#"<div id="event-0"><span id="ev1771113600000"></span><article class="event-detail">"#));
        assert!(html.contains("https://clube.example/#ev1771113600000"));
        assert!(html.contains(r#"<td class="day today">"#));
        assert!(!html.contains("Outro mês"));
        assert!(!html.contains("<X>"));

        // February 2026 starts on a Sunday and fills exactly four weeks
        assert_eq!(html.matches("<tr>").count(), 1 + 4);
    }

    #[test]
    fn filler_days_are_marked() {
        let month = YearMonth::new(2026, 9).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let html = render("Clube", &calendar::build(month, &[], today), None).into_string();

        assert_eq!(html.matches("day other-month").count(), 4);
        assert_eq!(html.matches("<td").count(), 35);
        assert!(!html.contains("event-detail"));
    }

    #[test]
    fn same_day_events_sharing_an_id_get_their_own_sections() {
        let repository = sheet(&[
            &[(column::NAME, "Encontro X"), (column::DATE, "10/24/2026")],
            &[(column::NAME, "Encontro Y"), (column::DATE, "10/24/2026")],
        ]);
        let month = YearMonth::new(2026, 9).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let html = render("Clube", &calendar::build(month, repository.events(), today), None).into_string();

        assert!(html.contains(r##"href="#event-0">Encontro X</a>"##));
        assert!(html.contains(r##"href="#event-1">Encontro Y</a>"##));
        assert_eq!(html.matches(r#"<div id="event-0">"#).count(), 1);
        assert_eq!(html.matches(r#"<div id="event-1">"#).count(), 1);
        assert_eq!(html.matches(r#"<span id="ev"#).count(), 1);
        assert_eq!(html.matches("event-detail").count(), 2);
    }
}
