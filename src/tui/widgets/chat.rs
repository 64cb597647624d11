// ABOUTME: Chat widget — renders the assistant transcript into styled ratatui Lines.
// ABOUTME: User messages get a "❯" prefix, assistant replies a "⏺" prefix.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::store::{ChatMessage, Sender};

/// Render the transcript into styled Lines for display.
pub fn render_chat_lines(messages: &[ChatMessage]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (prefix, color) = match msg.sender {
            Sender::User => ("❯ ", Color::Green),
            Sender::Ai => ("⏺ ", Color::Cyan),
        };

        // First line gets the prefix, subsequent lines are plain.
        for (i, text) in msg.text.split('\n').enumerate() {
            if i == 0 {
                lines.push(Line::from(vec![
                    Span::styled(
                        prefix,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(text.to_string()),
                ]));
            } else {
                lines.push(Line::from(Span::raw(text.to_string())));
            }
        }
    }

    lines
}
