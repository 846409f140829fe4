use iced::border::Border;
use iced::widget::{column, container, mouse_area, row, svg, text, Space};
use iced::{Color, Element, Length, Theme};

use crate::app::{HoverTarget, Message};
use crate::theme::{border_color, lerp_color, surface_color, tertiary_color};
use crate::widgets::hover_button::{hover_button, Variant};

const CORNER_RADIUS: f32 = 16.0;

/// Target for window file drops, with a button opening the multi-select picker.
///
/// `compact` shrinks it to a single row once the queue has items.
pub fn view<'a>(
    theme: &Theme,
    hovered: Option<HoverTarget>,
    drop_zone_hovered: bool,
    compact: bool,
) -> Element<'a, Message> {
    let palette = theme.extended_palette();
    let accent = palette.primary.base.color;
    let tertiary = tertiary_color(theme);

    let browse = hover_button(
        || text("Choose videos").size(14).color(Color::WHITE).into(),
        Variant::Primary,
        hovered == Some(HoverTarget::Browse),
        |h| Message::Hover(HoverTarget::Browse, h),
    )
    .on_press(Message::SelectFiles)
    .padding([10, 24]);

    let inner: Element<'a, Message> = if compact {
        row![
            upload_icon(accent, 18),
            text("Drop more videos here").size(14).width(Length::Fill),
            browse,
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center)
        .into()
    } else {
        let icon_circle = container(upload_icon(accent, 24))
            .width(56)
            .height(56)
            .center_x(56)
            .center_y(56)
            .style(move |_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(Color { a: 0.12, ..accent })),
                border: Border {
                    radius: 100.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            });

        column![
            icon_circle,
            Space::new().height(16),
            text("Drop videos here").size(18).font(iced::Font {
                weight: iced::font::Weight::Bold,
                ..iced::Font::DEFAULT
            }),
            Space::new().height(6),
            text("or choose several at once").size(14).color(tertiary),
            Space::new().height(20),
            browse,
            Space::new().height(16),
            text("MP4, MOV, MKV, WEBM, AVI and more").size(12).color(tertiary),
        ]
        .align_x(iced::Alignment::Center)
        .into()
    };

    let base_border = border_color(theme);
    let surface = surface_color(theme);
    let padding = if compact { [12, 16] } else { [40, 40] };
    let zone = container(inner)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(padding)
        .style(move |_theme: &Theme| {
            let t = if drop_zone_hovered { 1.0 } else { 0.0 };
            container::Style {
                background: Some(iced::Background::Color(lerp_color(
                    surface,
                    Color { a: 0.06, ..accent },
                    t,
                ))),
                border: Border {
                    color: lerp_color(base_border, Color { a: 0.5, ..accent }, t),
                    width: 2.0,
                    radius: CORNER_RADIUS.into(),
                },
                ..container::Style::default()
            }
        });

    mouse_area(zone)
        .on_enter(Message::DropZoneHover(true))
        .on_exit(Message::DropZoneHover(false))
        .into()
}

fn upload_icon<'a>(accent: Color, size: u16) -> Element<'a, Message> {
    svg(svg::Handle::from_memory(
        include_bytes!("../../assets/upload.svg").as_slice(),
    ))
    .width(u32::from(size))
    .height(u32::from(size))
    .style(move |_theme: &Theme, _status| svg::Style {
        color: Some(accent),
    })
    .into()
}
