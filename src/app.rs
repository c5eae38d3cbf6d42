use iced::{Subscription, Task};

use crate::calendar::Loader;
use crate::views::{self, calendars};

pub struct App {
    title: String,
    calendar: views::Calendar,
}

#[derive(Debug, Clone)]
pub enum Message {
    Calendar(calendars::Message),
}

impl App {
    pub fn new(title: String, loader: Loader, options: calendars::Options) -> Option<(Self, Task<Message>)> {
        let (calendar, task) = views::Calendar::new(loader, options)?;

        Some((Self { title, calendar }, task.map(Message::Calendar)))
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        self.calendar.subscription().map(Message::Calendar)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Calendar(calendar_message) => self
                .calendar
                .update(calendar_message)
                .map(Message::Calendar),
        }
    }

    pub fn view(&self) -> iced::Element<Message> {
        self.calendar.view().map(Message::Calendar)
    }
}
