use iced::widget::{button, column, container, row, scrollable, text, Column, Row};
use iced::{Border, Color, Font, Length};
use iced_font_awesome::fa_icon_solid;

use super::Message;
use crate::calendar::{Controller, DayCell, Event, EventKind, WEEKDAYS};

pub fn view(controller: &Controller) -> iced::Element<Message> {
    let Some(month) = controller.month() else {
        return column![].into();
    };

    let controls = view_controls(month.month.label(), controller.is_current_month());

    let days = Row::from_iter(WEEKDAYS.iter().map(|day| view_day(day)));

    let month_grid = column![days].extend(month.weeks().map(|week| {
        Row::from_iter(week.iter().map(view_cell))
            .height(Length::FillPortion(1))
            .into()
    }));

    column![container(controls), container(month_grid).height(Length::Fill)]
        .spacing(16)
        .height(Length::Fill)
        .into()
}

fn view_controls<'a>(label: String, is_current_month: bool) -> iced::Element<'a, Message> {
    row![
        button(fa_icon_solid("caret-left").size(32.0))
            .style(style_month_button)
            .on_press(Message::PreviousMonth),
        text(label)
            .center()
            .width(Length::Fill)
            .size(24.0)
            .font(Font {
                weight: iced::font::Weight::Bold,
                ..Font::default()
            })
            .wrapping(text::Wrapping::None),
        button(text("Hoje"))
            .style(style_month_button)
            .on_press_maybe((!is_current_month).then_some(Message::Today)),
        button(fa_icon_solid("caret-right").size(32.0))
            .style(style_month_button)
            .on_press(Message::NextMonth),
    ]
    .spacing(8)
    .height(50)
    .align_y(iced::Alignment::Center)
    .into()
}

fn view_cell<'a>(cell: &DayCell<'a>) -> iced::Element<'a, Message> {
    let number = text(cell.day).style(match cell.in_month {
        true => style_text_on_month,
        false => style_text_off_month,
    });

    let events = Column::from_iter(
        cell.events
            .iter()
            .map(|&(index, event)| view_event(index, event, cell.in_month)),
    )
    .spacing(2);

    container(column![number, scrollable(events)].spacing(4))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(4)
        .style(match cell.is_today {
            true => style_today,
            false => style_normal,
        })
        .into()
}

fn view_event<'a>(index: usize, event: &'a Event, in_month: bool) -> iced::Element<'a, Message> {
    let color = kind_color(event.kind());

    button(text(event.name()).size(12).wrapping(text::Wrapping::None))
        .width(Length::Fill)
        .padding([2, 4])
        .style(move |theme: &iced::Theme, status| style_event(theme, status, color, in_month))
        .on_press(Message::Open(index))
        .into()
}

fn view_day<'a>(day: &'a str) -> iced::Element<'a, Message> {
    text(day)
        .size(18.0)
        .font(Font {
            weight: iced::font::Weight::Semibold,
            ..Font::default()
        })
        .center()
        .width(Length::Fill)
        .into()
}

pub fn kind_color(kind: EventKind) -> Color {
    match kind {
        EventKind::Tournament => Color::from_rgb8(0xd9, 0x48, 0x3b),
        EventKind::Meetup => Color::from_rgb8(0x2e, 0x8b, 0x57),
        EventKind::Other | EventKind::Default => Color::from_rgb8(0x3b, 0x6e, 0xd9),
    }
}

pub fn style_month_button(theme: &iced::Theme, status: button::Status) -> button::Style {
    let palette = theme.extended_palette();

    button::Style {
        text_color: palette.primary.strong.text,
        background: Some(match status {
            button::Status::Disabled => palette.primary.weak.color.into(),
            _ => palette.primary.strong.color.into(),
        }),
        border: Border::default().rounded(3),
        ..Default::default()
    }
}

fn style_event(theme: &iced::Theme, status: button::Status, color: Color, in_month: bool) -> button::Style {
    let palette = theme.extended_palette();
    let color = match (in_month, status) {
        (false, _) => color.scale_alpha(0.5),
        (true, button::Status::Hovered) => color.scale_alpha(0.8),
        (true, _) => color,
    };

    button::Style {
        text_color: palette.background.base.color,
        background: Some(color.into()),
        border: Border::default().rounded(3),
        ..Default::default()
    }
}

pub fn style_text_on_month(theme: &iced::Theme) -> text::Style {
    let palette = theme.extended_palette();

    text::Style {
        color: palette.secondary.base.text.into(),
    }
}

pub fn style_text_off_month(theme: &iced::Theme) -> text::Style {
    let palette = theme.extended_palette();

    text::Style {
        color: palette.secondary.strong.color.into(),
    }
}

pub fn style_normal(theme: &iced::Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        border: Border {
            width: 1.0,
            color: palette.background.strong.color,
            ..Border::default()
        },
        ..Default::default()
    }
}

pub fn style_today(theme: &iced::Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.primary.weak.color.into()),
        border: Border {
            width: 2.0,
            color: palette.primary.strong.color,
            ..Border::default()
        },
        ..Default::default()
    }
}
