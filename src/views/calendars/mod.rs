use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use iced::keyboard::{self, key};
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Length, Task};
use url::Url;

use crate::calendar::{self, Controller, FetchRequest, Loader, Phase, Repository};

mod event;
mod month;
mod status;

/// The calendar screen: the controller plus the capabilities it needs.
pub struct Calendar {
    controller: Controller,
    loader: Loader,
    tz: Tz,
    now: NaiveDateTime,
    share_base: Option<Url>,
    link_input: String,
    refresh: Duration,
}

#[derive(Debug, Clone)]
pub enum Message {
    Load,
    Refresh,
    Loaded(FetchRequest, Result<Repository, calendar::Error>),
    NextDay(Instant),
    PreviousMonth,
    NextMonth,
    Today,
    /// Position of the clicked event in the loaded events.
    Open(usize),
    Dismiss,
    CopyShareLink(Url),
    LinkInput(String),
    FollowLink,
}

pub struct Options {
    pub tz: Tz,
    pub share_base: Option<Url>,
    pub fallback: Option<Repository>,
    pub link: Option<String>,
    pub refresh: Duration,
}

impl Calendar {
    pub fn new(loader: Loader, options: Options) -> Option<(Self, Task<Message>)> {
        let now = local_now(options.tz);
        let mut controller = Controller::new(now.date(), options.fallback)?;

        if let Some(link) = &options.link {
            controller.follow_link(link);
        }

        let mut calendar = Self {
            controller,
            loader,
            tz: options.tz,
            now,
            share_base: options.share_base,
            link_input: String::new(),
            refresh: options.refresh,
        };

        let task = calendar.update(Message::Load);

        Some((calendar, task))
    }

    pub fn subscription(&self) -> iced::Subscription<Message> {
        iced::Subscription::batch([
            iced::time::every(until_next_day(self.now)).map(Message::NextDay),
            iced::time::every(self.refresh).map(|_| Message::Refresh),
            keyboard::on_key_press(|key, _| match key {
                keyboard::Key::Named(key::Named::Escape) => Some(Message::Dismiss),
                _ => None,
            }),
        ])
    }

    pub fn view(&self) -> iced::Element<Message> {
        let content = match self.controller.phase() {
            Phase::Loading => status::loading(),
            Phase::Error => status::error(self.controller.last_error()),
            Phase::Content => column![
                month::view(&self.controller),
                self.view_link_input(),
            ]
            .spacing(16)
            .into(),
        };

        let page = container(content).padding(16).width(Length::Fill).height(Length::Fill);

        match self.controller.selected() {
            Some(selected) => {
                let detail = calendar::detail::present(selected, self.share_base.as_ref());

                event::modal(page, event::view(detail), Message::Dismiss)
            }
            None => page.into(),
        }
    }

    fn view_link_input(&self) -> iced::Element<Message> {
        row![
            text_input("Cole um link de evento", &self.link_input)
                .on_input(Message::LinkInput)
                .on_submit(Message::FollowLink)
                .width(Length::Fill),
            button(text("Abrir"))
                .style(button::secondary)
                .on_press(Message::FollowLink),
        ]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Load => {
                let cached = self.loader.cached(calendar::now_millis());
                let request = self.controller.load(cached);

                return self.fetch(request);
            }
            Message::Refresh => {
                if let Some(request) = self.controller.refresh() {
                    return self.fetch(request);
                }
            }
            Message::Loaded(request, result) => {
                self.controller.complete(&request, result);
            }
            Message::NextDay(_) => {
                self.now = local_now(self.tz);
                self.controller.set_today(self.now.date());
            }
            Message::PreviousMonth => self.controller.previous_month(),
            Message::NextMonth => self.controller.next_month(),
            Message::Today => self.controller.go_to_today(),
            Message::Open(index) => {
                self.controller.open_at(index);
            }
            Message::Dismiss => self.controller.dismiss(),
            Message::CopyShareLink(url) => {
                log::info!("Copied share link {url}");

                return iced::clipboard::write(url.to_string());
            }
            Message::LinkInput(input) => {
                self.link_input = input;
            }
            Message::FollowLink => {
                self.controller.follow_link(&self.link_input);
                self.link_input.clear();
            }
        };

        Task::none()
    }

    fn fetch(&self, request: FetchRequest) -> Task<Message> {
        let loader = self.loader.clone();
        log::debug!("Starting fetch #{} (background: {})", request.ticket, request.background);

        Task::perform(
            async move {
                let result = loader.load(&request.token, calendar::now_millis());

                (request, result)
            },
            |(request, result)| Message::Loaded(request, result),
        )
    }
}

fn local_now(tz: Tz) -> NaiveDateTime {
    chrono::Utc::now().with_timezone(&tz).naive_local()
}

fn until_next_day(now: NaiveDateTime) -> Duration {
    let secs = now
        .date()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(86_400, |next_day| (next_day - now).num_seconds());

    Duration::from_secs(secs.unsigned_abs() + 30)
}
