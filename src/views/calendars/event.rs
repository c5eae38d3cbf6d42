use iced::widget::{button, center, container, mouse_area, opaque, row, stack, text, Column};
use iced::{Alignment, Border, Color, Font, Length};
use iced_font_awesome::fa_icon_solid;

use super::month::kind_color;
use super::Message;
use crate::calendar::detail::EventDetail;

/// Detail card of the selected event.
pub fn view<'a>(detail: EventDetail) -> iced::Element<'a, Message> {
    let mut badges = row![badge(detail.kind_label, kind_color(detail.kind))].spacing(6);
    if detail.free {
        badges = badges.push(badge("Gratuito".to_string(), Color::from_rgb8(0x2e, 0x8b, 0x57)));
    }
    if detail.rated {
        badges = badges.push(row![fa_icon_solid("bolt").size(14.0), text("Rating!")].spacing(4));
    }

    let mut body = Column::new()
        .push(
            text(detail.name)
                .size(24)
                .font(Font {
                    weight: iced::font::Weight::Bold,
                    ..Font::default()
                }),
        )
        .push(line("calendar", detail.when))
        .push(badges)
        .spacing(12);

    if !detail.description.is_empty() {
        body = body.push(text(detail.description));
    }
    if let Some(organizer) = detail.organizer {
        body = body.push(line("chess-knight", organizer));
    }
    body = body.push(line("location-dot", detail.location));
    if let Some(link) = detail.link {
        body = body.push(line("link", link));
    }

    let mut actions = row![].spacing(8);
    if let Some(url) = detail.share_url {
        actions = actions.push(
            button(row![fa_icon_solid("share-nodes").size(14.0), text("Copiar link")].spacing(6))
                .style(button::secondary)
                .on_press(Message::CopyShareLink(url)),
        );
    }
    actions = actions.push(
        button(text("Fechar"))
            .style(button::primary)
            .on_press(Message::Dismiss),
    );

    container(body.push(actions))
        .width(480)
        .padding(24)
        .style(container::rounded_box)
        .into()
}

fn line<'a>(icon: &'a str, value: String) -> iced::Element<'a, Message> {
    row![fa_icon_solid(icon).size(16.0), text(value)]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
}

fn badge<'a>(label: String, color: Color) -> iced::Element<'a, Message> {
    container(text(label).size(12))
        .padding([2, 8])
        .style(move |_| container::Style {
            text_color: Some(Color::WHITE),
            background: Some(color.into()),
            border: Border::default().rounded(8),
            ..Default::default()
        })
        .into()
}

/// Shows `content` above a dimmed `base`, a click outside triggers `on_blur`.
pub fn modal<'a>(
    base: impl Into<iced::Element<'a, Message>>,
    content: impl Into<iced::Element<'a, Message>>,
    on_blur: Message,
) -> iced::Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).width(Length::Fill).height(Length::Fill).style(|_| {
                container::Style {
                    background: Some(
                        Color {
                            a: 0.6,
                            ..Color::BLACK
                        }
                        .into()
                    ),
                    ..container::Style::default()
                }
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}
