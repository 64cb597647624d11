// ABOUTME: Main TUI rendering function — assembles header, screen body, and status bar.
// ABOUTME: Splits the frame into layout chunks and delegates to the screen renderers.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::catalog;
use crate::session::store::SessionStore;
use crate::tui::state::{AuthField, DebugPanel, Screen, SnippetPanel, SolvePanel, TuiState};
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::editor::{render_editor, render_panel};
use crate::tui::widgets::forms::{FormField, render_form};
use crate::tui::widgets::status::{header_line, screen_hint, status_line};

/// Render the full screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &TuiState, store: &SessionStore) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Screen body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let username = store.auth().user.as_ref().map(|u| u.username.as_str());
    frame.render_widget(
        Paragraph::new(header_line(state.screen, username)),
        chunks[0],
    );

    match state.screen {
        Screen::Login => render_login(frame, chunks[1], state),
        Screen::Register => render_register(frame, chunks[1], state),
        Screen::CodeSolve => render_solve(frame, chunks[1], state, store),
        Screen::ClickToCode => render_click(frame, chunks[1], state, store),
        Screen::DebugZone => render_debug(frame, chunks[1], state, store),
        Screen::Assistant => render_assistant(frame, chunks[1], state, store),
    }

    frame.render_widget(
        Paragraph::new(status_line(screen_hint(state.screen), &state.notice)),
        chunks[2],
    );
}

/// Rect of the given size centered inside `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_login(frame: &mut Frame, area: Rect, state: &TuiState) {
    let title = if state.login.busy {
        " Log in (signing in...) "
    } else {
        " Log in "
    };
    render_form(
        frame,
        centered(area, 50, 8),
        title,
        &[
            FormField {
                label: "Username",
                buffer: &state.login.username,
                masked: false,
                focused: !state.login.focus_password,
            },
            FormField {
                label: "Password",
                buffer: &state.login.password,
                masked: true,
                focused: state.login.focus_password,
            },
        ],
        &state.login.message,
        state.login.is_error,
    );
}

fn render_register(frame: &mut Frame, area: Rect, state: &TuiState) {
    let title = if state.register.busy {
        " Register (submitting...) "
    } else {
        " Register "
    };
    let reg = &state.register;
    render_form(
        frame,
        centered(area, 50, 9),
        title,
        &[
            FormField {
                label: "Username",
                buffer: &reg.username,
                masked: false,
                focused: reg.focus == AuthField::Username,
            },
            FormField {
                label: "Email",
                buffer: &reg.email,
                masked: false,
                focused: reg.focus == AuthField::Email,
            },
            FormField {
                label: "Password",
                buffer: &reg.password,
                masked: true,
                focused: reg.focus == AuthField::Password,
            },
        ],
        &reg.message,
        reg.is_error,
    );
}

fn render_solve(frame: &mut Frame, area: Rect, state: &TuiState, store: &SessionStore) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let ws = store.execution();
    render_editor(
        frame,
        cols[0],
        &format!(" Editor ({}) ", ws.language_name),
        &state.solve.code,
        state.solve.focus == SolvePanel::Editor,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(cols[1]);
    render_editor(
        frame,
        right[0],
        " Stdin ",
        &state.solve.stdin,
        state.solve.focus == SolvePanel::Stdin,
    );

    let output_title = if state.solve.status.is_empty() {
        " Output ".to_string()
    } else {
        format!(" Output - {} ", state.solve.status)
    };
    render_panel(frame, right[1], &output_title, &ws.output);
}

fn render_click(frame: &mut Frame, area: Rect, state: &TuiState, store: &SessionStore) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(44),
            Constraint::Percentage(28),
        ])
        .split(area);

    let ws = store.snippet();
    let snippets = catalog::snippets_for(&ws.active_language);
    let items: Vec<&str> = snippets.iter().map(|s| s.name).collect();
    render_list(
        frame,
        cols[0],
        &format!(" Snippets ({}) ", ws.active_language),
        &items,
        state.click.snippet_index,
        state.click.focus == SnippetPanel::Snippets,
    );

    render_editor(
        frame,
        cols[1],
        " Editor ",
        &state.click.code,
        state.click.focus == SnippetPanel::Editor,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(cols[2]);
    render_editor(
        frame,
        right[0],
        " Stdin ",
        &state.click.stdin,
        state.click.focus == SnippetPanel::Stdin,
    );
    render_panel(frame, right[1], " Output ", &ws.output);
}

fn render_debug(frame: &mut Frame, area: Rect, state: &TuiState, store: &SessionStore) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    if state.debug.problems.is_empty() {
        let text = match &state.debug.fetch_error {
            Some(err) => err.clone(),
            None if state.debug.fetch_started => "Loading challenges...".to_string(),
            None => "No challenges loaded.".to_string(),
        };
        render_panel(frame, cols[0], " Challenges ", &text);
    } else {
        let items: Vec<&str> = state.debug.problems.iter().map(|p| p.title.as_str()).collect();
        render_list(
            frame,
            cols[0],
            " Challenges ",
            &items,
            state.debug.problem_index,
            state.debug.focus == DebugPanel::Problems,
        );
    }

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(6),
        ])
        .split(cols[1]);

    // Describe the chosen problem, falling back to the highlighted one.
    let debug_ws = store.debug();
    let described = debug_ws
        .selected_problem
        .as_ref()
        .or_else(|| state.debug.problems.get(state.debug.problem_index));
    let description = match described {
        Some(p) => format!("{}\n\nLanguage: {}", p.description, p.language),
        None => String::new(),
    };
    render_panel(frame, right[0], " Description ", &description);

    render_editor(
        frame,
        right[1],
        " Your Fix ",
        &state.debug.code,
        state.debug.focus == DebugPanel::Editor,
    );

    let (result_title, result_text) = if state.debug.busy {
        (" Result ".to_string(), "Checking...".to_string())
    } else {
        match &debug_ws.judge_result {
            Some(result) => (format!(" Result - {} ", result.status), result.output.clone()),
            None => (" Result ".to_string(), String::new()),
        }
    };
    render_panel(frame, right[2], &result_title, &result_text);
}

fn render_assistant(frame: &mut Frame, area: Rect, state: &TuiState, store: &SessionStore) {
    const MAX_INPUT_HEIGHT: u16 = 8;
    let input_lines = state.assistant.input.text().split('\n').count();
    // +2 accounts for top and bottom borders
    let input_height = (input_lines as u16 + 2).clamp(3, MAX_INPUT_HEIGHT);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(input_height)])
        .split(area);

    // Chat area, pinned to the bottom of the transcript.
    let chat_chunk = chunks[0];
    let chat_paragraph =
        Paragraph::new(render_chat_lines(store.chat())).wrap(Wrap { trim: false });
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let scroll = total_lines.saturating_sub(chat_chunk.height);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Input area.
    let mut input_block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if state.assistant.busy {
        input_block = input_block.title(Span::styled(
            " thinking... ",
            Style::default().fg(Color::DarkGray),
        ));
    }
    let input_chunk = chunks[1];
    let input_text: Vec<Line> = state
        .assistant
        .input
        .text()
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    frame.render_widget(Paragraph::new(input_text).block(input_block), input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        let (row, col) = state.assistant.input.cursor_line_col();
        let line = state.assistant.input.text().split('\n').nth(row).unwrap_or("");
        let prefix: String = line.chars().take(col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str())
            .min(input_chunk.width.saturating_sub(1) as usize);
        let cursor_x = input_chunk.x + visual_col as u16;
        // +1 for the top border, then offset by the cursor's line index.
        let cursor_y = input_chunk.y.saturating_add(1 + row as u16);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

/// Render a selectable list in a bordered block, scrolled so the selected
/// item stays visible.
fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[&str],
    selected: usize,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), border_style))
        .border_style(border_style);
    let inner = block.inner(area);

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == selected {
                Line::from(Span::styled(
                    format!("> {item}"),
                    Style::default().add_modifier(Modifier::REVERSED),
                ))
            } else {
                Line::from(format!("  {item}"))
            }
        })
        .collect();

    let scroll = selected.saturating_sub(inner.height.max(1) as usize - 1) as u16;
    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}
