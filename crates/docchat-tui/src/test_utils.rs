//! Test utilities for docchat-tui rendering and navigation tests.
//!
//! Helpers for building apps in known states, rendering screens into a
//! buffer and converting buffers to strings for comparison.

use crate::app::App;
use crate::screens::Screen as ScreenTrait;
use docchat_engine::UploadFile;
use ratatui::{buffer::Buffer, layout::Rect};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test app on the upload stage.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// Create a test app on the chat stage with `report.pdf` (2.19 MB) loaded.
pub fn create_ready_app() -> App {
    let mut app = App::new_for_test();
    let file = UploadFile::new("report.pdf", "application/pdf", vec![0; 2_300_000]);
    let ticket = app
        .session
        .submit_upload(file)
        .expect("pdf upload is accepted");
    app.apply_upload_result(ticket.generation, Ok(()));
    app.notification = None;
    app
}

/// Convert a buffer to a string, one line per row with trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render a screen at the default size and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen with custom dimensions and return it as a string.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Screen;

    #[test]
    fn test_create_ready_app() {
        let app = create_ready_app();
        assert_eq!(app.screen(), Screen::Chat);
        assert_eq!(app.session.history().len(), 1);
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 2, "World", ratatui::style::Style::default());

        insta::assert_snapshot!(buffer_to_string(&buffer), @r"
        Hello

        World
        ");
    }
}
