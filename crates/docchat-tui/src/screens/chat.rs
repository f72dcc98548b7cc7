//! Chat screen: document panel, conversation transcript and question box.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::{typing_dots, Styles, Symbols};
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{chat_layout, main_layout};
use chrono::Local;
use docchat_engine::{Document, Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// What the document panel suggests trying.
const CAPABILITIES: [&str; 3] = [
    "Ask questions about the document",
    "Request summaries of sections",
    "Extract specific information",
];

/// The chat stage.
pub struct ChatScreen;

impl Screen for ChatScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        let (panel_area, conversation_area) = chat_layout(main_area);

        if let Some(panel_area) = panel_area {
            render_document_panel(app.session.document(), panel_area, buf);
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(conversation_area);
        render_transcript(app, chunks[0], buf);
        render_input(app, chunks[1], buf);

        let hints = vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("^O", "Upload"),
            KeyHint::new("^D", "Remove"),
            KeyHint::new("^N", "New"),
            KeyHint::new("F1", "Help"),
        ];
        let mut status_bar = StatusBar::new("Chat").hints(hints);
        if let Some(notice) = &app.notification {
            status_bar = status_bar.notice(notice);
        }
        status_bar.render(status_area, buf);
    }
}

fn render_document_panel(document: Option<&Document>, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Document ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    let mut lines = vec![Line::from("")];
    match document {
        Some(document) => {
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", Symbols::DOCUMENT), Styles::active()),
                Span::styled(document.name.clone(), Styles::highlight()),
            ]));
            lines.push(Line::from(Span::styled(
                format!("   {}", document.size_label()),
                Styles::dim(),
            )));
            lines.push(Line::from(Span::styled("   Ready", Styles::success())));
        }
        None => {
            lines.push(Line::from(Span::styled(
                " No document loaded",
                Styles::warning(),
            )));
            lines.push(Line::from(Span::styled(
                " Ctrl+O to upload one",
                Styles::dim(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " What can you do?",
        Styles::highlight(),
    )));
    for capability in CAPABILITIES {
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", Symbols::BULLET), Styles::active()),
            Span::styled(capability, Styles::dim()),
        ]));
    }

    Paragraph::new(lines)
        .style(Styles::default())
        .render(inner, buf);
}

/// Lay out the chat history as display lines wrapped to `width`.
pub(crate) fn transcript_lines(
    messages: &[Message],
    width: usize,
    tick: usize,
) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(2).max(8);
    let mut lines = Vec::new();

    for message in messages {
        let (author, style) = match message.role {
            Role::User => ("You", Styles::user()),
            Role::Assistant => ("Assistant", Styles::assistant()),
        };
        let time = message.timestamp.with_timezone(&Local).format("%H:%M");
        lines.push(Line::from(vec![
            Span::styled(author, style),
            Span::styled(format!("  {time}"), Styles::dim()),
        ]));

        if message.pending {
            lines.push(Line::from(Span::styled(
                format!("  {}", typing_dots(tick)),
                Styles::active(),
            )));
        } else {
            for row in textwrap::wrap(&message.content, body_width) {
                lines.push(Line::from(Span::styled(
                    format!("  {row}"),
                    Styles::default(),
                )));
            }
        }

        if let Some(sources) = message.sources.as_deref().filter(|s| !s.is_empty()) {
            lines.push(Line::from(Span::styled("  Sources:", Styles::source())));
            for (i, source) in sources.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("    [{}] {source}", i + 1),
                    Styles::source(),
                )));
            }
        }

        lines.push(Line::from(""));
    }

    lines
}

#[allow(clippy::cast_possible_truncation)]
fn render_transcript(app: &App, area: Rect, buf: &mut Buffer) {
    let title = if app.transcript_scroll > 0 {
        " Conversation (scrolled) "
    } else {
        " Conversation "
    };
    let block = Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    let history = app.session.history();
    if history.is_empty() {
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No messages yet. Ask something below.",
                Styles::dim(),
            )),
        ])
        .style(Styles::default())
        .render(inner, buf);
        return;
    }

    let lines = transcript_lines(history.messages(), usize::from(inner.width), app.tick);

    // Anchor to the bottom, then move up by the scroll amount.
    let bottom = lines.len().saturating_sub(usize::from(inner.height));
    let offset = bottom.saturating_sub(app.transcript_scroll);

    Paragraph::new(lines)
        .style(Styles::default())
        .scroll((offset.min(usize::from(u16::MAX)) as u16, 0))
        .render(inner, buf);
}

fn render_input(app: &App, area: Rect, buf: &mut Buffer) {
    let enabled = app.can_ask();
    let (title, border) = if enabled {
        (" Ask a question ", Styles::border_active())
    } else {
        (" Waiting for the answer... ", Styles::dim())
    };
    let block = Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    app.question_input
        .widget()
        .enabled(enabled)
        .placeholder("Ask a question about your document...")
        .render(inner, buf);
}
