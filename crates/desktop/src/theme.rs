use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

/// Build the app theme for a light or dark system appearance.
pub fn resolve_theme(dark: bool) -> Theme {
    let palette = if dark { dark_palette() } else { light_palette() };
    Theme::custom("Soundlift", palette)
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x1c, 0x1c, 0x1e),
        text: color!(0xe5, 0xe5, 0xe7),
        primary: color!(0x5e, 0x9f, 0xf5),
        success: color!(0x30, 0xd1, 0x58),
        warning: color!(0xff, 0xcc, 0x00),
        danger: color!(0xff, 0x45, 0x3a),
    }
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xf5, 0xf5, 0xf7),
        text: color!(0x1d, 0x1d, 0x1f),
        primary: color!(0x34, 0x78, 0xf6),
        success: color!(0x34, 0xc7, 0x59),
        warning: color!(0xff, 0x9f, 0x0a),
        danger: color!(0xff, 0x3b, 0x30),
    }
}

fn is_light(theme: &Theme) -> bool {
    let bg = theme.palette().background;
    bg.r * 0.299 + bg.g * 0.587 + bg.b * 0.114 > 0.5
}

/// Card and row background, one step off the window background.
pub fn surface_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    if is_light(theme) {
        Color::WHITE
    } else {
        Color {
            r: (bg.r + 0.06).min(1.0),
            g: (bg.g + 0.06).min(1.0),
            b: (bg.b + 0.06).min(1.0),
            a: 1.0,
        }
    }
}

/// Hovered surface.
pub fn surface_alt_color(theme: &Theme) -> Color {
    let bg = theme.palette().background;
    if is_light(theme) {
        Color::from_rgb(0xF0 as f32 / 255.0, 0xED as f32 / 255.0, 0xE8 as f32 / 255.0)
    } else {
        Color {
            r: (bg.r + 0.12).min(1.0),
            g: (bg.g + 0.12).min(1.0),
            b: (bg.b + 0.12).min(1.0),
            a: 1.0,
        }
    }
}

pub fn muted_color(theme: &Theme) -> Color {
    Color { a: 0.70, ..theme.palette().text }
}

/// Hints, captions, and placeholder text.
pub fn tertiary_color(theme: &Theme) -> Color {
    Color { a: 0.50, ..theme.palette().text }
}

pub fn border_color(theme: &Theme) -> Color {
    Color { a: 0.15, ..theme.palette().text }
}

pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color {
        r: a.r + (b.r - a.r) * t,
        g: a.g + (b.g - a.g) * t,
        b: a.b + (b.b - a.b) * t,
        a: a.a + (b.a - a.a) * t,
    }
}
