use chrono::Locale;
use maud::{html, Markup};
use url::Url;

use super::event::{column, Event, EventId, EventKind};

pub const UNNAMED: &str = "Evento Sem Nome";
pub const UNKNOWN_LOCATION: &str = "Local não informado";
pub const DEFAULT_KIND: &str = "Evento";

/// Everything the detail view shows about one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetail {
  pub id: EventId,
  pub name: String,
  pub when: String,
  pub iso_date: String,
  pub kind_label: String,
  pub kind: EventKind,
  pub free: bool,
  pub rated: bool,
  pub description: String,
  pub organizer: Option<String>,
  pub location: String,
  pub link: Option<String>,
  pub share_url: Option<Url>,
}

pub fn present(event: &Event, share_base: Option<&Url>) -> EventDetail {
  let kind_label = event.field(column::KIND).unwrap_or(DEFAULT_KIND);

  EventDetail {
    id: event.id.clone(),
    name: event.field(column::NAME).unwrap_or(UNNAMED).to_string(),
    when: long_date(event),
    iso_date: event.date().format("%Y-%m-%d").to_string(),
    kind: EventKind::classify(Some(kind_label)),
    kind_label: kind_label.to_string(),
    free: event
      .field(column::COST)
      .is_some_and(|cost| cost.to_lowercase().contains("gratuito")),
    rated: event.raw.get(column::RATING).is_some_and(|rating| !rating.is_empty()),
    description: event.field(column::DESCRIPTION).unwrap_or_default().to_string(),
    organizer: event.field(column::ORGANIZER).map(str::to_string),
    location: event.field(column::LOCATION).unwrap_or(UNKNOWN_LOCATION).to_string(),
    link: event.field(column::LINK).map(str::to_string),
    share_url: share_base.map(|base| share_url(base, &event.id)),
  }
}

/// `15 de fevereiro de 2026`, followed by ` às <hora>` when the sheet has a
/// start time.
pub fn long_date(event: &Event) -> String {
  let date = event
    .date()
    .format_localized("%d de %B de %Y", Locale::pt_BR)
    .to_string();

  match event.field(column::START_TIME) {
    Some(time) => format!("{date} às {time}"),
    None => date,
  }
}

pub fn share_url(base: &Url, id: &EventId) -> Url {
  let mut url = base.clone();
  url.set_fragment(Some(id.as_str()));

  url
}

impl EventDetail {
  pub const fn badge_class(&self) -> &'static str {
    match self.kind {
      EventKind::Tournament => "badge-tournament",
      EventKind::Meetup => "badge-meetup",
      EventKind::Other | EventKind::Default => "badge-default",
    }
  }

  /// Renders the detail card. Every value coming from the sheet is escaped
  /// by `maud`.
  pub fn to_html(&self) -> Markup {
    html! {
      article.event-detail {
        h2.event-title { (self.name) }
        div.event-meta {
          div.event-datetime {
            "📅 "
            time datetime=(self.iso_date) { (self.when) }
          }
          div.badges {
            span class={ "badge " (self.badge_class()) } { (self.kind_label) }
            @if self.free {
              span.badge.badge-free { "Gratuito" }
            }
            @if self.rated {
              span.rating-info { "⚡ Rating!" }
            }
          }
        }
        div.event-description {
          p { (self.description) }
        }
        @if let Some(organizer) = &self.organizer {
          div.event-organizer {
            span { "♟️" }
            span { (organizer) }
          }
        }
        div.event-location {
          span { "📍" }
          span { (self.location) }
        }
        @if let Some(link) = &self.link {
          a.event-link href=(link) target="_blank" rel="noopener noreferrer" { "Mais Informações" }
        }
        @if let Some(url) = &self.share_url {
          a.share-link href=(url.as_str()) { "🔗 Link para compartilhar" }
        }
      }
    }
  }
}
