use url::Url;

pub const QUERY_PARAMETER: &str = "event";

/// Extracts the event id of a shared link.
///
/// Accepts full URLs (`...#ev123` or `...?event=ev123`, the fragment wins), a
/// bare fragment (`#ev123`) or the id itself.
pub fn parse(link: &str) -> Option<String> {
  let link = link.trim();
  if link.is_empty() {
    return None;
  }

  if let Some(fragment) = link.strip_prefix('#') {
    return non_empty(fragment);
  }

  if let Some(query) = link.strip_prefix('?') {
    return from_query(query);
  }

  match Url::parse(link) {
    Ok(url) => url
      .fragment()
      .and_then(non_empty)
      .or_else(|| {
        url
          .query_pairs()
          .find(|(key, _)| key == QUERY_PARAMETER)
          .and_then(|(_, value)| non_empty(&value))
      }),
    Err(_) if !link.contains(['/', '?', '#', ' ']) => Some(link.to_string()),
    Err(_) => None,
  }
}

fn from_query(query: &str) -> Option<String> {
  url::form_urlencoded::parse(query.as_bytes())
    .find(|(key, _)| key == QUERY_PARAMETER)
    .and_then(|(_, value)| non_empty(&value))
}

fn non_empty(value: &str) -> Option<String> {
  let value = value.trim();

  (!value.is_empty()).then(|| value.to_string())
}

/// Remembers the last link that was acted upon so a link opens its event only
/// once, however often it is delivered again.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tracker {
  pending: Option<String>,
  handled: Option<String>,
}

impl Tracker {
  /// Queues the id of an incoming link. Returns false for links that are
  /// unreadable or equal to the one handled last.
  pub fn offer(&mut self, link: &str) -> bool {
    let Some(id) = parse(link) else {
      return false;
    };

    if self.handled.as_deref() == Some(id.as_str()) {
      log::debug!("Ignoring repeated link to {id}");
      // the latest link wins over one still waiting
      self.pending = None;
      return false;
    }

    self.pending = Some(id);

    true
  }

  /// Hands out the queued id once, marking it as handled.
  pub fn take(&mut self) -> Option<String> {
    let id = self.pending.take()?;
    self.handled = Some(id.clone());

    Some(id)
  }

  pub fn pending(&self) -> Option<&str> {
    self.pending.as_deref()
  }
}
