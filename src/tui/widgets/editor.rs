// ABOUTME: Editor and panel widgets — bordered text areas with cursor placement.
// ABOUTME: Editors scroll vertically to keep the cursor in view; panels are read-only.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::input::EditBuffer;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Vertical scroll that keeps `cursor_row` inside a viewport of `height` rows.
fn follow_cursor(cursor_row: usize, height: usize) -> u16 {
    cursor_row.saturating_sub(height.max(1) - 1) as u16
}

/// Render an editable buffer in a bordered block. When focused, the terminal
/// cursor is placed at the buffer's cursor position.
pub fn render_editor(frame: &mut Frame, area: Rect, title: &str, buf: &EditBuffer, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), border_style(focused)))
        .border_style(border_style(focused));
    let inner = block.inner(area);

    let (row, col) = buf.cursor_line_col();
    let scroll = follow_cursor(row, inner.height as usize);

    let paragraph = Paragraph::new(buf.text().to_string())
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    if focused && inner.width > 0 && inner.height > 0 {
        let line = buf.text().split('\n').nth(row).unwrap_or("");
        let prefix: String = line.chars().take(col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str())
            .min(inner.width.saturating_sub(1) as usize);
        let cursor_y = inner.y + (row as u16).saturating_sub(scroll).min(inner.height - 1);
        frame.set_cursor_position(Position::new(inner.x + visual_col as u16, cursor_y));
    }
}

/// Render read-only wrapped text in a bordered block.
pub fn render_panel(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(text.to_string())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_is_zero_while_cursor_fits() {
        assert_eq!(follow_cursor(0, 5), 0);
        assert_eq!(follow_cursor(4, 5), 0);
    }

    #[test]
    fn scroll_follows_cursor_past_the_viewport() {
        assert_eq!(follow_cursor(5, 5), 1);
        assert_eq!(follow_cursor(10, 5), 6);
    }

    #[test]
    fn degenerate_viewport_does_not_underflow() {
        assert_eq!(follow_cursor(3, 0), 3);
        assert_eq!(follow_cursor(3, 1), 3);
    }
}
