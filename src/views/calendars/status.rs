use iced::widget::{button, column, container, text};
use iced::{Alignment, Length};
use iced_font_awesome::fa_icon_solid;

use super::Message;
use crate::calendar::{Error, ErrorKind};

pub fn loading<'a>() -> iced::Element<'a, Message> {
    container(
        column![
            fa_icon_solid("spinner").size(32.0),
            text("Carregando eventos..."),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .center(Length::Fill)
    .into()
}

pub fn error<'a>(error: Option<&Error>) -> iced::Element<'a, Message> {
    container(
        column![
            fa_icon_solid("triangle-exclamation").size(32.0),
            text(message(error.map(|error| error.kind))),
            button(text("Tentar novamente"))
                .style(button::primary)
                .on_press(Message::Load),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .center(Length::Fill)
    .into()
}

const fn message(kind: Option<ErrorKind>) -> &'static str {
    match kind {
        Some(ErrorKind::EmptyDataset) => "Nenhum evento encontrado.",
        Some(ErrorKind::Timeout) => "A planilha demorou demais para responder.",
        Some(ErrorKind::Fetch | ErrorKind::Parse) | None => "Não foi possível carregar os eventos.",
    }
}
