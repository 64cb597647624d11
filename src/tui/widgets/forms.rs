// ABOUTME: Auth form widget — labelled single-line fields with password masking.
// ABOUTME: Renders the login and register forms and places the cursor in the focused field.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::input::EditBuffer;

pub struct FormField<'a> {
    pub label: &'a str,
    pub buffer: &'a EditBuffer,
    pub masked: bool,
    pub focused: bool,
}

/// Displayed value of a field; passwords render as one bullet per character.
fn display_value(buf: &EditBuffer, masked: bool) -> String {
    if masked {
        "•".repeat(buf.char_len())
    } else {
        buf.text().to_string()
    }
}

/// Render an auth form: one row per field, then a status message. The
/// terminal cursor lands after the focused field's text.
pub fn render_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    fields: &[FormField],
    message: &str,
    is_error: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    let mut lines = Vec::new();
    for field in fields {
        let label_style = if field.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", field.label), label_style),
            Span::raw(display_value(field.buffer, field.masked)),
        ]));
    }
    if !message.is_empty() {
        lines.push(Line::from(""));
        let style = if is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        lines.push(Line::from(Span::styled(message.to_string(), style)));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }
    for (row, field) in fields.iter().enumerate() {
        if !field.focused {
            continue;
        }
        let (_, col) = field.buffer.cursor_line_col();
        let prefix: String = display_value(field.buffer, field.masked)
            .chars()
            .take(col)
            .collect();
        let label_width = UnicodeWidthStr::width(field.label) + 2;
        let x = label_width + UnicodeWidthStr::width(prefix.as_str());
        let x = x.min(inner.width.saturating_sub(1) as usize);
        let y = (row as u16).min(inner.height - 1);
        frame.set_cursor_position(Position::new(inner.x + x as u16, inner.y + y));
        break;
    }
}
