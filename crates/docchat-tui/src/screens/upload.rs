//! Upload screen: path prompt, then the processing indicator.

use crate::app::App;
use crate::screens::Screen;
use crate::ui::theme::{spinner, Styles, Symbols};
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::{centered_fixed, main_layout};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The upload stage.
pub struct UploadScreen;

impl Screen for UploadScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        Block::default().style(Styles::default()).render(main_area, buf);

        let width = 64.min(main_area.width.saturating_sub(2));
        let height = 12.min(main_area.height);
        let card = centered_fixed(width, height, main_area);

        let block = Block::default()
            .title(" docchat ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());
        let inner = block.inner(card);
        block.render(card, buf);

        if app.session.is_processing() {
            render_processing(app, inner, buf);
        } else {
            render_prompt(app, inner, buf);
        }

        let (mode, hints) = if app.session.is_processing() {
            ("Processing", vec![KeyHint::new("Ctrl+N", "Start over")])
        } else {
            let back = if app.picker_open() { "Back" } else { "Quit" };
            (
                "Upload",
                vec![
                    KeyHint::new("Enter", "Upload"),
                    KeyHint::new("Esc", back),
                    KeyHint::new("F1", "Help"),
                ],
            )
        };
        let mut status_bar = StatusBar::new(mode).hints(hints);
        if let Some(notice) = &app.notification {
            status_bar = status_bar.notice(notice);
        } else {
            status_bar = status_bar.right(&app.config.server_url);
        }
        status_bar.render(status_area, buf);
    }
}

fn render_prompt(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let heading = if app.picker_open() {
        "  Upload another PDF"
    } else {
        "  Upload a PDF to start chatting"
    };
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(heading, Styles::highlight())),
        Line::from(""),
        Line::from(Span::styled("  Path to the file:", Styles::dim())),
    ])
    .style(Styles::default())
    .render(chunks[0], buf);

    let input_area = Rect {
        x: chunks[1].x + 2,
        width: chunks[1].width.saturating_sub(4),
        ..chunks[1]
    };
    app.path_input
        .widget()
        .placeholder("~/papers/report.pdf")
        .render(input_area, buf);

    let mut footer = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Only PDF files are accepted.",
            Styles::dim(),
        )),
    ];
    if app.picker_open() {
        footer.push(Line::from(Span::styled(
            "  The current conversation is kept.",
            Styles::dim(),
        )));
    }
    Paragraph::new(footer)
        .style(Styles::default())
        .render(chunks[2], buf);
}

fn render_processing(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} ", spinner(app.tick)), Styles::active()),
            Span::styled("Processing your PDF...", Styles::highlight()),
        ]),
        Line::from(""),
    ];
    if let Some(document) = app.session.document() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", Symbols::DOCUMENT), Styles::dim()),
            Span::styled(document.name.clone(), Styles::default()),
            Span::styled(format!("  {}", document.size_label()), Styles::dim()),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  Large documents can take a while.",
        Styles::dim(),
    )));

    Paragraph::new(lines)
        .style(Styles::default())
        .render(area, buf);
}
