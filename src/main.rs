#![warn(
    clippy::all,
    // clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    // clippy::unwrap_used
)]
use std::time::Duration;

use anyhow::Context;
use app::App;
use clap::Parser;

use crate::views::calendars::Options;

mod app;
pub mod calendar;
mod cli;
pub mod config;
mod export;
mod logger;
pub mod views;

const MIN_REFRESH: Duration = Duration::from_secs(60);

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = cli::Cli::parse();
    let config = config::init(&cli.config).context("Could not load the configuration file")?;

    match cli.command {
        Some(cli::Command::Export { year, month, output }) => {
            export::run(&config, year, month, output.as_deref())
        }
        None => run(config, cli.link),
    }
}

fn run(config: config::Config, link: Option<String>) -> anyhow::Result<()> {
    let loader = config.loader()?;
    let fallback = config.fallback()?;
    let options = Options {
        tz: config.display.timezone,
        share_base: config.share.base_url,
        fallback,
        link,
        refresh: config.cache.ttl().max(MIN_REFRESH),
    };
    let title = config.display.title;

    let (app, task) = App::new(title, loader, options).context("Today is outside the supported calendar range")?;

    iced::application::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(|_| iced::Theme::TokyoNightLight)
        .run_with(move || (app, task))
        .map_err(|error| anyhow::anyhow!("The calendar window failed: {error}"))
}
