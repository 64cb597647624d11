// ABOUTME: Header and status bar widgets — screen tabs, signed-in user, and key hints.
// ABOUTME: Single-line widgets rendered at the top and bottom of every screen.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::Screen;

const TABS: [(Screen, &str); 4] = [
    (Screen::CodeSolve, "F1 Solve"),
    (Screen::ClickToCode, "F2 Snippets"),
    (Screen::DebugZone, "F3 Debug"),
    (Screen::Assistant, "F4 Assistant"),
];

/// Header line: app name, the tool tabs, and the signed-in username.
pub fn header_line(screen: Screen, username: Option<&str>) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " codedeck ",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    if username.is_some() {
        for (tab_screen, label) in TABS {
            let style = if tab_screen == screen {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" [{label}]"), style));
        }
    }

    if let Some(name) = username {
        spans.push(Span::styled(
            format!("  {name}"),
            Style::default().fg(Color::Green),
        ));
    }

    Line::from(spans)
}

/// Status bar: the screen's key hints, plus any one-line notice.
pub fn status_line(hint: &str, notice: &str) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" {hint}"),
        Style::default().fg(Color::DarkGray),
    )];
    if !notice.is_empty() {
        spans.push(Span::styled(
            format!("  {notice}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

/// Key hints for the bottom bar, per screen.
pub fn screen_hint(screen: Screen) -> &'static str {
    match screen {
        Screen::Login => "Enter submit | Tab field | Ctrl+R register | Ctrl+C twice quits",
        Screen::Register => "Enter submit | Tab next field | Esc back to login",
        Screen::CodeSolve => "Ctrl+R run | Ctrl+P language | Esc focus | Ctrl+L logout",
        Screen::ClickToCode => "Enter insert snippet | Ctrl+R run | Ctrl+P language | Esc focus",
        Screen::DebugZone => "Enter select | Ctrl+R check fix | Ctrl+F reload | Esc focus",
        Screen::Assistant => "Enter send | Alt+Enter newline | Ctrl+X clear chat",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_hides_tabs_when_logged_out() {
        let line = header_line(Screen::Login, None);
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, " codedeck ");
    }

    #[test]
    fn header_highlights_the_active_tab() {
        let line = header_line(Screen::DebugZone, Some("ada"));
        let debug_span = line
            .spans
            .iter()
            .find(|s| s.content.contains("F3 Debug"))
            .unwrap();
        assert_eq!(debug_span.style.fg, Some(Color::Cyan));
        let solve_span = line
            .spans
            .iter()
            .find(|s| s.content.contains("F1 Solve"))
            .unwrap();
        assert_eq!(solve_span.style.fg, Some(Color::DarkGray));
        assert!(line.spans.last().unwrap().content.contains("ada"));
    }

    #[test]
    fn status_line_appends_notice() {
        let line = status_line("hints here", "recovered state");
        assert!(line.spans[1].content.contains("recovered state"));
    }
}
