use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono_tz::Tz;
use url::Url;

use crate::calendar::{self, Loader, Repository};

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    pub source: Source,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub share: Share,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Source {
    /// Published CSV export of the sheet, `http(s)://` or `file://`.
    pub url: Url,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Local CSV shown when the sheet cannot be loaded.
    pub fallback: Option<PathBuf>,
}

impl Source {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Cache {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub dir: Option<PathBuf>,
    #[serde(default = "default_cache_ttl")]
    pub ttl: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            dir: None,
            ttl: default_cache_ttl(),
        }
    }
}

impl Cache {
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    /// Configured directory, or the user's cache directory.
    pub fn dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME"))))
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Display {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            title: default_title(),
            timezone: default_timezone(),
        }
    }
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Share {
    /// Page the share links point to, the event id becomes its fragment.
    pub base_url: Option<Url>,
}

impl Config {
    /// Loader reading the configured source through the cache.
    pub fn loader(&self) -> anyhow::Result<Loader> {
        let source = calendar::from_url(&self.source.url, self.source.timeout())
            .context("Unusable source url")?;

        let cache = self
            .cache
            .enabled
            .then(|| self.cache.dir())
            .flatten()
            .map(|dir| calendar::Cache::new(&dir, self.cache.ttl()));

        if cache.is_none() {
            log::info!("Event cache disabled");
        }

        Ok(Loader::new(source.into(), cache, self.source.timeout(), self.display.timezone))
    }

    /// Events of the fallback sheet, if one is configured.
    pub fn fallback(&self) -> anyhow::Result<Option<Repository>> {
        let Some(path) = &self.source.fallback else {
            return Ok(None);
        };

        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read the fallback sheet {}", path.display()))?;
        let rows = calendar::parse_rows(&body)
            .with_context(|| format!("Invalid fallback sheet {}", path.display()))?;

        Ok(Some(Repository::from_rows(rows, self.display.timezone)))
    }
}

pub fn init(path: &Path) -> anyhow::Result<Config> {
    let string = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    parse(&string).with_context(|| format!("Invalid configuration in {}", path.display()))
}

pub fn parse(string: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(string)?;

    if config.source.timeout == 0 {
        anyhow::bail!("source.timeout must be at least one second");
    }

    Ok(config)
}

const fn default_timeout() -> u64 {
    10
}

const fn default_cache_ttl() -> u64 {
    600
}

const fn default_true() -> bool {
    true
}

fn default_title() -> String {
    "Calendário de Eventos".to_string()
}

const fn default_timezone() -> Tz {
    chrono_tz::America::Sao_Paulo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(
            r#"
            [source]
            url = "https://docs.example/spreadsheets/d/e/abc/pub?output=csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.timeout(), Duration::from_secs(10));
        assert_eq!(config.source.fallback, None);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl(), Duration::from_secs(600));
        assert_eq!(config.display.timezone, chrono_tz::America::Sao_Paulo);
        assert_eq!(config.share.base_url, None);
    }

    #[test]
    fn full_config() {
        let config = parse(
            r#"
            [source]
            url = "file:///srv/eventos.csv"
            timeout = 3
            fallback = "/srv/demo.csv"

            [cache]
            enabled = false
            dir = "/tmp/club"
            ttl = 60

            [display]
            title = "Clube de Xadrez"
            timezone = "Europe/Lisbon"

            [share]
            base_url = "https://clube.example/calendario"
            "#,
        )
        .unwrap();

        assert_eq!(config.source.url.scheme(), "file");
        assert_eq!(config.source.fallback.as_deref(), Some(Path::new("/srv/demo.csv")));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.dir(), Some(PathBuf::from("/tmp/club")));
        assert_eq!(config.display.title, "Clube de Xadrez");
        assert_eq!(config.display.timezone, chrono_tz::Europe::Lisbon);
        assert_eq!(
            config.share.base_url.map(String::from).as_deref(),
            Some("https://clube.example/calendario")
        );
    }

    #[test]
    fn reads_the_fallback_sheet() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let sheet = dir.path().join("demo.csv");
        std::fs::write(&sheet, "Nome do Evento,Data\nDemo,10/5/2026\n,10/6/2026\n").unwrap();

        let config = parse(&format!(
            "[source]\nurl = \"https://a.example\"\nfallback = {:?}\n[cache]\nenabled = false",
            sheet.display().to_string()
        ))
        .unwrap();

        let fallback = config.fallback().unwrap().unwrap();
        assert_eq!(fallback.len(), 1);
        assert!(config.loader().unwrap().cached(0).is_none());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse("[source]\nurl = \"not a url\"").is_err());
        assert!(parse("[source]\nurl = \"https://a.example\"\ntimeout = 0").is_err());
        assert!(parse("[source]\nurl = \"https://a.example\"\n[display]\ntimezone = \"Mars/Olympus\"").is_err());
        assert!(parse("").is_err());
    }
}
