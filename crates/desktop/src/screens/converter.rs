use std::path::Path;

use iced::widget::{column, container, progress_bar, row, text, Space};
use iced::{Color, Element, Length, Theme};

use soundlift_core::conversion::domain::conversion_item::ConversionStatus;
use soundlift_core::conversion::domain::conversion_queue::ConversionQueue;
use soundlift_core::pipeline::engine_adapter::{LoadProgress, LoadStage};

use crate::app::{EngineState, HoverTarget, Message};
use crate::theme::tertiary_color;
use crate::widgets::drop_zone;
use crate::widgets::hover_button::{hover_button, Variant};
use crate::widgets::queue_row::queue_row;

pub struct ConverterView<'v> {
    pub engine: &'v EngineState,
    pub queue: &'v ConversionQueue,
    pub batch_running: bool,
    pub error: Option<&'v str>,
    pub last_saved: Option<&'v Path>,
    pub hovered: Option<HoverTarget>,
    pub drop_zone_hovered: bool,
}

pub fn view<'a>(state: ConverterView<'_>, theme: &Theme) -> Element<'a, Message> {
    let hovered = state.hovered;
    let tertiary = tertiary_color(theme);

    let back = hover_button(
        || text("\u{2190} All conversions").size(13).into(),
        Variant::Secondary,
        hovered == Some(HoverTarget::Back),
        |h| Message::Hover(HoverTarget::Back, h),
    )
    .on_press(Message::Back)
    .padding([6, 14]);

    let mut page = column![
        back,
        Space::new().height(16),
        text("MP4 \u{2192} MP3").size(26).font(iced::Font {
            weight: iced::font::Weight::Bold,
            ..iced::Font::DEFAULT
        }),
        Space::new().height(6),
        text("Add videos and download their audio as MP3. Everything runs on your computer.")
            .size(14)
            .color(tertiary),
        Space::new().height(20),
    ]
    .width(Length::Fill);

    page = match state.engine {
        EngineState::Idle => page.push(
            hover_button(
                || text("Start converter").size(15).color(Color::WHITE).into(),
                Variant::Primary,
                hovered == Some(HoverTarget::Start),
                |h| Message::Hover(HoverTarget::Start, h),
            )
            .on_press(Message::StartConverter)
            .padding([12, 28]),
        ),
        EngineState::Loading(progress) => page.push(loading(progress, tertiary)),
        EngineState::Ready => page.push(ready(&state, theme)),
    };

    if let Some(error) = state.error {
        page = page.push(Space::new().height(16)).push(
            text(error.to_owned())
                .size(14)
                .color(theme.extended_palette().danger.base.color),
        );
    }

    page.into()
}

fn loading<'a>(progress: &Option<LoadProgress>, tertiary: Color) -> Element<'a, Message> {
    let detail = progress.map(|p| {
        let what = match p.stage {
            LoadStage::Glue => "Downloading the media probe",
            LoadStage::Payload => "Downloading the converter",
            LoadStage::Starting => "Starting the converter",
        };
        match p.stage {
            LoadStage::Starting => (what.to_string(), None),
            _ if p.total > 0 => {
                let pct = p.downloaded as f32 / p.total as f32 * 100.0;
                (format!("{what} \u{2014} {pct:.0}%"), Some(pct))
            }
            _ => (format!("{what}\u{2026} {} KiB", p.downloaded / 1024), None),
        }
    });

    let mut col = column![text("Loading converter\u{2026}").size(15)]
        .spacing(8)
        .width(Length::Fill);
    if let Some((label, pct)) = detail {
        if let Some(pct) = pct {
            col = col.push(progress_bar(0.0..=100.0, pct));
        }
        col = col.push(text(label).size(13).color(tertiary));
    }
    container(col).padding([24, 0]).into()
}

fn ready<'a>(state: &ConverterView<'_>, theme: &Theme) -> Element<'a, Message> {
    let hovered = state.hovered;
    let queue = state.queue;

    let mut col = column![drop_zone::view(
        theme,
        hovered,
        state.drop_zone_hovered,
        !queue.is_empty(),
    )]
    .spacing(10)
    .width(Length::Fill);

    if queue.is_empty() {
        return col.into();
    }

    for item in queue.items() {
        col = col.push(queue_row(item, hovered, theme));
    }

    let pending = queue.count(ConversionStatus::Pending);
    let finished = queue.completed().count();
    let convert_label = if state.batch_running {
        "Converting\u{2026}".to_string()
    } else {
        format!("Convert all ({pending})")
    };
    let convert = hover_button(
        move || text(convert_label.clone()).size(15).color(Color::WHITE).into(),
        Variant::Primary,
        hovered == Some(HoverTarget::ConvertAll),
        |h| Message::Hover(HoverTarget::ConvertAll, h),
    )
    .on_press_maybe((pending > 0 && !state.batch_running).then_some(Message::ConvertAll))
    .padding([12, 24])
    .width(Length::Fill);

    let download_all = hover_button(
        move || text(format!("Download all ({finished})")).size(14).into(),
        Variant::Secondary,
        hovered == Some(HoverTarget::DownloadAll),
        |h| Message::Hover(HoverTarget::DownloadAll, h),
    )
    .on_press_maybe((finished > 0).then_some(Message::DownloadAll))
    .padding([12, 20]);

    col = col
        .push(Space::new().height(6))
        .push(row![convert, download_all].spacing(10));

    if let Some(path) = state.last_saved {
        let shown = path.display().to_string();
        let show = hover_button(
            || text("Show in folder").size(13).into(),
            Variant::Secondary,
            hovered == Some(HoverTarget::ShowInFolder),
            |h| Message::Hover(HoverTarget::ShowInFolder, h),
        )
        .on_press(Message::ShowInFolder(path.to_path_buf()))
        .padding([6, 14]);
        col = col.push(
            row![
                text(format!("Saved {shown}"))
                    .size(13)
                    .color(tertiary_color(theme))
                    .width(Length::Fill),
                show,
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        );
    }

    col.into()
}
