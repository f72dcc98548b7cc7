//! Theme and styling definitions for the docchat TUI.

use docchat_engine::NoticeLevel;
use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(32, 30, 44);
    pub const FG: Color = Color::Rgb(225, 222, 235);
    pub const DIM: Color = Color::Rgb(145, 140, 165);

    // Accent colors (lavender)
    pub const ACCENT: Color = Color::Rgb(170, 150, 250);
    pub const ACCENT_DIM: Color = Color::Rgb(95, 85, 150);

    // Chat roles
    pub const USER: Color = Color::Rgb(130, 190, 255);
    pub const ASSISTANT: Color = Color::Rgb(170, 150, 250);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(48, 45, 64);
    pub const STATUS_KEY_BG: Color = Color::Rgb(90, 80, 150);

    // Status colors
    pub const SUCCESS: Color = Color::Rgb(130, 220, 130);
    pub const WARNING: Color = Color::Rgb(240, 200, 100);
    pub const ERROR: Color = Color::Rgb(240, 100, 100);

    // Border colors
    pub const BORDER: Color = Color::Rgb(80, 76, 104);
    pub const BORDER_ACTIVE: Color = Color::Rgb(170, 150, 250);
}

/// Indicator symbols (ASCII only).
pub struct Symbols;

impl Symbols {
    pub const BULLET: &'static str = ">";
    pub const DOCUMENT: &'static str = "[pdf]";
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
    pub const TYPING: [&'static str; 3] = [".  ", ".. ", "..."];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// Author label of user messages.
    pub fn user() -> Style {
        Style::default()
            .fg(Palette::USER)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Author label of assistant messages.
    pub fn assistant() -> Style {
        Style::default()
            .fg(Palette::ASSISTANT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Source citations under an answer.
    pub fn source() -> Style {
        Style::default()
            .fg(Palette::ACCENT_DIM)
            .bg(Palette::BG)
            .add_modifier(Modifier::ITALIC)
    }

    /// Success status.
    pub fn success() -> Style {
        Style::default().fg(Palette::SUCCESS).bg(Palette::BG)
    }

    /// Warning status.
    pub fn warning() -> Style {
        Style::default().fg(Palette::WARNING).bg(Palette::BG)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar text for a notice of the given level.
    pub fn notice(level: NoticeLevel) -> Style {
        let fg = match level {
            NoticeLevel::Info => Palette::FG,
            NoticeLevel::Success => Palette::SUCCESS,
            NoticeLevel::Warning => Palette::WARNING,
            NoticeLevel::Error => Palette::ERROR,
        };
        Style::default().fg(fg).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

/// Spinner frame for the given tick.
pub fn spinner(tick: usize) -> &'static str {
    Symbols::SPINNER[tick % Symbols::SPINNER.len()]
}

/// Typing indicator frame for the given tick.
pub fn typing_dots(tick: usize) -> &'static str {
    Symbols::TYPING[tick % Symbols::TYPING.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner(0), "|");
        assert_eq!(spinner(5), "/");
    }

    #[test]
    fn test_typing_dots_cycle() {
        assert_eq!(typing_dots(0), ".  ");
        assert_eq!(typing_dots(2), "...");
        assert_eq!(typing_dots(3), ".  ");
    }

    #[test]
    fn test_notice_styles_differ() {
        assert_ne!(
            Styles::notice(NoticeLevel::Error),
            Styles::notice(NoticeLevel::Success)
        );
    }
}
