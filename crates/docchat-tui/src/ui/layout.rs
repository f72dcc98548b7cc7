//! Layout helpers for the docchat TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Split into the body and the one-line status bar.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split the chat body into the document panel and the conversation.
///
/// Narrow terminals drop the document panel entirely.
pub fn chat_layout(area: Rect) -> (Option<Rect>, Rect) {
    if area.width < 70 {
        return (None, area);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(33), Constraint::Percentage(67)])
        .split(area);
    (Some(chunks[0]), chunks[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_fixed(40, 4, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 4);
        assert_eq!(rect.y, 3);
    }

    #[test]
    fn test_chat_layout_narrow_hides_panel() {
        let (panel, chat) = chat_layout(Rect::new(0, 0, 60, 20));
        assert!(panel.is_none());
        assert_eq!(chat.width, 60);

        let (panel, _) = chat_layout(Rect::new(0, 0, 120, 20));
        assert!(panel.is_some());
    }
}
