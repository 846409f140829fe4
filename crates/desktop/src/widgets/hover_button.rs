use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area};
use iced::{Color, Element, Length, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::theme::{
    border_color, lerp_color, muted_color, surface_alt_color, surface_color, tertiary_color,
};

const HOVER_DARKEN: f32 = 0.05;
const FLOAT_HEIGHT: f32 = 1.0;
const CORNER_RADIUS: f32 = 10.0;
const SHADOW_BLUR_BASE: f32 = 10.0;
const SHADOW_BLUR_HOVER: f32 = 15.0;
const SHADOW_ALPHA_BASE: f32 = 0.25;
const SHADOW_ALPHA_HOVER: f32 = 0.35;
const DISABLED_ALPHA: f32 = 0.45;
const ANIMATION_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Filled accent button with a soft shadow that lifts on hover.
    Primary,
    /// Outlined surface button.
    Secondary,
}

/// Animated button. `on_press: None` renders it disabled.
pub struct HoverButton<'a, Message> {
    content: Box<dyn Fn() -> Element<'a, Message> + 'a>,
    on_press: Option<Message>,
    variant: Variant,
    hovered: bool,
    on_hover: Box<dyn Fn(bool) -> Message + 'a>,
    padding: [u16; 2],
    width: Length,
}

pub fn hover_button<'a, Message: Clone + 'a>(
    content: impl Fn() -> Element<'a, Message> + 'a,
    variant: Variant,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
) -> HoverButton<'a, Message> {
    HoverButton {
        content: Box::new(content),
        on_press: None,
        variant,
        hovered,
        on_hover: Box::new(on_hover),
        padding: [10, 20],
        width: Length::Shrink,
    }
}

impl<'a, Message: Clone + 'a> HoverButton<'a, Message> {
    pub fn on_press(mut self, message: Message) -> Self {
        self.on_press = Some(message);
        self
    }

    pub fn on_press_maybe(mut self, message: Option<Message>) -> Self {
        self.on_press = message;
        self
    }

    pub fn padding(mut self, padding: [u16; 2]) -> Self {
        self.padding = padding;
        self
    }

    pub fn width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }
}

impl<'a, Message: Clone + 'a> From<HoverButton<'a, Message>> for Element<'a, Message> {
    fn from(b: HoverButton<'a, Message>) -> Self {
        let enabled = b.on_press.is_some();
        let target = if b.hovered && enabled { 1.0_f32 } else { 0.0 };
        let HoverButton {
            content,
            on_press,
            variant,
            on_hover,
            padding,
            width,
            ..
        } = b;

        let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
            let t = t.clamp(0.0, 1.0);
            build_button(&content, on_press.clone(), variant, padding, width, t)
        })
        .animates_layout(true)
        .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
        .into();

        mouse_area(animated)
            .on_enter(on_hover(true))
            .on_exit(on_hover(false))
            .into()
    }
}

fn build_button<'a, Message: Clone + 'a>(
    content: &dyn Fn() -> Element<'a, Message>,
    on_press: Option<Message>,
    variant: Variant,
    padding: [u16; 2],
    width: Length,
    hover_amount: f32,
) -> Element<'a, Message> {
    let btn = button(content())
        .on_press_maybe(on_press)
        .padding(padding)
        .width(width)
        .style(move |theme: &Theme, status: button::Status| {
            let amount = if status == button::Status::Pressed {
                1.0
            } else {
                hover_amount
            };
            let style = match variant {
                Variant::Primary => primary_style(theme, amount),
                Variant::Secondary => secondary_style(theme, amount),
            };
            if status == button::Status::Disabled {
                disabled(style)
            } else {
                style
            }
        });

    let rise = match variant {
        Variant::Primary => hover_amount * FLOAT_HEIGHT,
        Variant::Secondary => 0.0,
    };
    let padding = match variant {
        Variant::Primary => Padding {
            top: FLOAT_HEIGHT - rise,
            bottom: rise,
            ..Padding::ZERO
        },
        Variant::Secondary => Padding::ZERO,
    };
    container(btn).padding(padding).into()
}

fn primary_style(theme: &Theme, t: f32) -> button::Style {
    let base = theme.extended_palette().primary.base.color;
    button::Style {
        background: Some(darken(base, t).into()),
        text_color: Color::WHITE,
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color {
                a: lerp(SHADOW_ALPHA_BASE, SHADOW_ALPHA_HOVER, t),
                ..base
            },
            offset: Vector::new(0.0, 3.0),
            blur_radius: lerp(SHADOW_BLUR_BASE, SHADOW_BLUR_HOVER, t),
        },
        ..button::Style::default()
    }
}

fn secondary_style(theme: &Theme, t: f32) -> button::Style {
    button::Style {
        background: Some(lerp_color(surface_color(theme), surface_alt_color(theme), t).into()),
        text_color: muted_color(theme),
        border: Border {
            color: lerp_color(border_color(theme), tertiary_color(theme), t),
            width: 1.0,
            radius: CORNER_RADIUS.into(),
        },
        ..button::Style::default()
    }
}

fn disabled(style: button::Style) -> button::Style {
    let fade = |c: Color| Color { a: c.a * DISABLED_ALPHA, ..c };
    button::Style {
        background: style.background.map(|bg| match bg {
            iced::Background::Color(c) => iced::Background::Color(fade(c)),
            other => other,
        }),
        text_color: fade(style.text_color),
        shadow: Shadow::default(),
        ..style
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn darken(color: Color, amount: f32) -> Color {
    let shift = HOVER_DARKEN * amount;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: 1.0,
    }
}
