use iced::widget::{column, row, text, Space};
use iced::{Element, Length, Theme};

use soundlift_core::conversion::domain::catalog::CATALOG;

use crate::app::{HoverTarget, Message};
use crate::theme::tertiary_color;
use crate::widgets::catalog_card::catalog_card;

const COLUMNS: usize = 3;

pub fn view<'a>(hovered: Option<HoverTarget>, theme: &Theme) -> Element<'a, Message> {
    let mut grid = column![].spacing(12);
    for (chunk_index, chunk) in CATALOG.chunks(COLUMNS).enumerate() {
        let mut cards = row![].spacing(12);
        for (offset, kind) in chunk.iter().enumerate() {
            let index = chunk_index * COLUMNS + offset;
            cards = cards.push(catalog_card(
                kind,
                index,
                hovered == Some(HoverTarget::Card(index)),
                theme,
            ));
        }
        for _ in chunk.len()..COLUMNS {
            cards = cards.push(Space::new().width(Length::Fill));
        }
        grid = grid.push(cards);
    }

    column![
        text("File conversions").size(26).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().height(6),
        text("Pick a conversion. Files never leave your computer.")
            .size(14)
            .color(tertiary_color(theme)),
        Space::new().height(24),
        grid,
    ]
    .width(Length::Fill)
    .into()
}
