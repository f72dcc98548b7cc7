//! Status bar widget.

use crate::ui::theme::{Palette, Styles};
use docchat_engine::Notice;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Status bar widget displayed at the bottom of the screen.
///
/// The left side shows the session mode and key hints. The right side shows
/// the current notice, or a plain label when there is none.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right: Option<(&'a str, Style)>,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right: None,
        }
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set right-aligned text.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right = Some((text, Styles::status_bar()));
        self
    }

    /// Show a notice on the right, colored by its level.
    #[must_use]
    pub fn notice(mut self, notice: &'a Notice) -> Self {
        self.right = Some((notice.message.as_str(), Styles::notice(notice.level)));
        self
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::STATUS_BG);
        }

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                Styles::default().bg(Palette::ACCENT).fg(Palette::BG),
            ),
            Span::styled(" ", Styles::status_bar()),
        ];
        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(
                format!(" {} ", hint.label),
                Styles::key_label(),
            ));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // The notice wins over hints when both do not fit.
        if let Some((text, style)) = self.right {
            let text_len = text.chars().count() as u16;
            if text_len < area.width {
                let x = area.x + area.width - text_len - 1;
                buf.set_string(x, area.y, text, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_status_bar_shows_mode_and_hints() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new("Chat")
            .hints(vec![KeyHint::new("Enter", "Send")])
            .render(area, &mut buf);

        insta::assert_snapshot!(buffer_to_string(&buf).trim_start(), @"Chat   Enter  Send");
    }

    #[test]
    fn test_status_bar_notice_right_aligned() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        let notice = Notice::success("Done");
        StatusBar::new("Chat").notice(&notice).render(area, &mut buf);

        let rendered = buffer_to_string(&buf);
        assert!(rendered.ends_with("Done"));
        assert_eq!(buf[(35u16, 0u16)].fg, Palette::SUCCESS);
    }
}
