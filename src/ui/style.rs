//! Theming and color definitions.
//!
//! Maps the typography color set onto terminal colors. Uses ANSI colors so
//! the terminal palette decides the exact shade.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastLevel;
use crate::typography::FontColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    Dark,
    Light,
}

/// Guess the terminal background from `COLORFGBG`, defaulting to dark.
pub fn background_mode() -> BackgroundMode {
    background_mode_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_mode_from_colorfgbg(colorfgbg: Option<&str>) -> BackgroundMode {
    let Some(value) = colorfgbg else {
        return BackgroundMode::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    let Ok(bg) = bg_str.parse::<u8>() else {
        return BackgroundMode::Dark;
    };

    if bg >= 7 {
        BackgroundMode::Light
    } else {
        BackgroundMode::Dark
    }
}

/// Terminal color for a preview text color.
///
/// Black text on a dark terminal would vanish, so it falls back to the
/// terminal's default foreground there.
pub const fn preview_color(color: FontColor, mode: BackgroundMode) -> Color {
    match (color, mode) {
        (FontColor::Black, BackgroundMode::Light) => Color::Black,
        (FontColor::Black, BackgroundMode::Dark) => Color::Reset,
        (FontColor::Red, _) => Color::Red,
        (FontColor::Blue, _) => Color::Blue,
        (FontColor::Green, _) => Color::Green,
    }
}

pub fn toolbar_style() -> Style {
    Style::default().bg(Color::Indexed(236)).fg(Color::White)
}

pub fn toolbar_key_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

pub fn toolbar_value_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn gutter_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn cursor_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

/// Dimmed style for the container tags around the preview markup.
pub fn container_style() -> Style {
    Style::default()
        .fg(Color::Indexed(245))
        .add_modifier(Modifier::DIM)
}

pub fn status_style(previewing: bool) -> Style {
    if previewing {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().bg(Color::Magenta).fg(Color::White)
    }
}

pub fn toast_style(level: ToastLevel) -> (&'static str, Style) {
    match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_dark_background() {
        let mode = background_mode_from_colorfgbg(Some("15;0"));
        assert_eq!(mode, BackgroundMode::Dark);
    }

    #[test]
    fn test_colorfgbg_light_background() {
        let mode = background_mode_from_colorfgbg(Some("0;15"));
        assert_eq!(mode, BackgroundMode::Light);
    }

    #[test]
    fn test_colorfgbg_garbage_defaults_to_dark() {
        assert_eq!(background_mode_from_colorfgbg(Some("x")), BackgroundMode::Dark);
        assert_eq!(background_mode_from_colorfgbg(None), BackgroundMode::Dark);
    }

    #[test]
    fn test_black_preview_stays_visible_on_dark_terminals() {
        assert_eq!(preview_color(FontColor::Black, BackgroundMode::Dark), Color::Reset);
        assert_eq!(preview_color(FontColor::Black, BackgroundMode::Light), Color::Black);
        assert_eq!(preview_color(FontColor::Red, BackgroundMode::Dark), Color::Red);
    }
}
