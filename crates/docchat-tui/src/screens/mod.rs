//! Screen definitions for the docchat TUI.

pub mod chat;
pub mod upload;

use crate::app::{App, Screen as Stage};
use crate::ui::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render whichever stage the app is on, without overlays.
pub fn render_stage(app: &App, area: Rect, buf: &mut Buffer) {
    match app.stage() {
        Stage::Chat => chat::ChatScreen.render(app, area, buf),
        Stage::Upload | Stage::QuitConfirm => upload::UploadScreen.render(app, area, buf),
    }
}

/// Quit confirmation overlay on top of the current stage.
pub struct QuitConfirmScreen;

impl Screen for QuitConfirmScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_stage(app, area, buf);

        let width = 44.min(area.width.saturating_sub(4));
        let height = 7.min(area.height.saturating_sub(2));
        let overlay_area = centered_fixed(width, height, area);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Quit docchat? ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());

        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  The conversation is not saved.",
                Styles::default(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  ", Styles::default()),
                Span::styled("[Enter]", Styles::key_hint()),
                Span::styled(" Quit   ", Styles::default()),
                Span::styled("[Esc]", Styles::key_hint()),
                Span::styled(" Stay", Styles::default()),
            ]),
        ];

        Paragraph::new(lines)
            .style(Styles::default())
            .render(inner, buf);
    }
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Upload
    Enter             Upload the PDF at the typed path
    Esc               Back to chat / quit

  Chat
    Enter             Send question
    Up/Down           Question history
    PgUp/PgDn, wheel  Scroll conversation
    Ctrl+End          Jump to latest
    Ctrl+O            Upload another PDF
    Ctrl+D            Remove document
    Ctrl+N            New session

  F1 or ?             Toggle this help
  Ctrl+C              Quit
";

    let width = 58.min(area.width.saturating_sub(4));
    let height = 21.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
