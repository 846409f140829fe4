use iced::border::Border;
use iced::widget::{column, container, mouse_area, row, text, Space};
use iced::{Color, Element, Length, Theme};

use soundlift_core::conversion::domain::catalog::ConversionKind;

use crate::app::{HoverTarget, Message};
use crate::theme::{border_color, lerp_color, surface_alt_color, surface_color, tertiary_color};

/// A landing-screen card. Only available kinds react to clicks.
pub fn catalog_card<'a>(
    kind: &ConversionKind,
    index: usize,
    hovered: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let accent = theme.extended_palette().primary.base.color;
    let available = kind.available;

    let mut badge_row = row![text(kind.icon).size(24), Space::new().width(Length::Fill)]
        .align_y(iced::Alignment::Center);
    if !available {
        badge_row = badge_row.push(
            container(text("Coming soon").size(11).color(tertiary))
                .padding([2, 8])
                .style(move |_theme: &Theme| container::Style {
                    border: Border {
                        color: tertiary,
                        width: 1.0,
                        radius: 8.0.into(),
                    },
                    ..container::Style::default()
                }),
        );
    }

    let title_color = if available { None } else { Some(tertiary) };
    let mut title = text(kind.title).size(16).font(iced::Font {
        weight: iced::font::Weight::Bold,
        ..iced::Font::DEFAULT
    });
    if let Some(color) = title_color {
        title = title.color(color);
    }

    let body = column![
        badge_row,
        Space::new().height(10),
        title,
        Space::new().height(4),
        text(kind.description).size(13).color(tertiary),
        Space::new().height(8),
        text(format!("{} \u{2192} {}", kind.from, kind.to))
            .size(12)
            .color(if available { accent } else { tertiary }),
    ];

    let surface = surface_color(theme);
    let surface_hover = surface_alt_color(theme);
    let border = border_color(theme);
    let t = if hovered && available { 1.0 } else { 0.0 };
    let card = container(body)
        .padding(16)
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(lerp_color(surface, surface_hover, t))),
            border: Border {
                color: lerp_color(border, Color { a: 0.6, ..accent }, t),
                width: 1.0,
                radius: 14.0.into(),
            },
            ..container::Style::default()
        });

    if !available {
        return card.into();
    }

    mouse_area(card)
        .on_press(Message::OpenConverter(kind.id))
        .on_enter(Message::Hover(HoverTarget::Card(index), true))
        .on_exit(Message::Hover(HoverTarget::Card(index), false))
        .interaction(iced::mouse::Interaction::Pointer)
        .into()
}
