use iced::widget::{column, container, progress_bar, row, text, Space};
use iced::{Color, Element, Length, Theme};

use soundlift_core::conversion::domain::conversion_item::{ConversionItem, ConversionStatus};

use crate::app::{HoverTarget, Message};
use crate::theme::{border_color, surface_color, tertiary_color};
use crate::widgets::hover_button::{hover_button, Variant};

const CORNER_RADIUS: f32 = 12.0;

/// One queued file: name, status, progress, and its actions.
pub fn queue_row<'a>(
    item: &ConversionItem,
    hovered: Option<HoverTarget>,
    theme: &Theme,
) -> Element<'a, Message> {
    let id = item.id;
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);
    let border = border_color(theme);
    let palette = theme.extended_palette();

    let status_color = match item.status {
        ConversionStatus::Pending => tertiary,
        ConversionStatus::Converting => palette.primary.base.color,
        ConversionStatus::Completed => palette.success.base.color,
        ConversionStatus::Error => palette.danger.base.color,
    };
    let status_label = match item.status {
        ConversionStatus::Converting => format!("{} {}%", item.status, item.progress),
        _ => item.status.to_string(),
    };

    let name = text(item.source.name().to_string())
        .size(15)
        .font(iced::Font {
            weight: iced::font::Weight::Medium,
            ..iced::Font::DEFAULT
        })
        .width(Length::Fill);

    let mut actions = row![].spacing(8).align_y(iced::Alignment::Center);
    if item.status == ConversionStatus::Completed {
        let target = HoverTarget::Download(id);
        actions = actions.push(
            hover_button(
                || text("Download").size(13).color(Color::WHITE).into(),
                Variant::Primary,
                hovered == Some(target),
                move |h| Message::Hover(target, h),
            )
            .on_press(Message::DownloadItem(id))
            .padding([6, 14]),
        );
    }
    let remove = HoverTarget::Remove(id);
    let removable = item.status != ConversionStatus::Converting;
    actions = actions.push(
        hover_button(
            || text("Remove").size(13).into(),
            Variant::Secondary,
            hovered == Some(remove),
            move |h| Message::Hover(remove, h),
        )
        .on_press_maybe(removable.then_some(Message::RemoveItem(id)))
        .padding([6, 14]),
    );

    let header = row![
        column![name, text(status_label).size(12).color(status_color)],
        actions
    ]
    .spacing(8)
    .align_y(iced::Alignment::Center);

    let mut body = column![header].spacing(6);
    if item.status == ConversionStatus::Converting {
        body = body.push(progress_bar(0.0..=100.0, f32::from(item.progress)));
    }
    if let Some(error) = &item.error {
        body = body.push(text(error.clone()).size(12).color(palette.danger.base.color));
    }
    body = body.push(Space::new().height(2));

    container(body)
        .padding([12, 16])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(surface)),
            border: iced::border::Border {
                color: border,
                width: 1.0,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}
