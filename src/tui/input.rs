// ABOUTME: Multi-line edit buffer with UTF-8-safe cursor movement.
// ABOUTME: Backs every editable field: code editors, stdin panels, and auth forms.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A text buffer with a character-indexed cursor. All editing is performed
/// on character boundaries so multi-byte input can never split a code point.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer over existing text with the cursor at the end.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole buffer, cursor moving to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.char_len());
    }

    fn byte_index(&self, char_index: usize) -> usize {
        match self.text.char_indices().nth(char_index) {
            Some((idx, _)) => idx,
            None => self.text.len(),
        }
    }

    pub fn cursor_byte_index(&self) -> usize {
        self.byte_index(self.cursor)
    }

    pub fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        let at = self.cursor_byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Insert a string at the cursor (snippets, pastes).
    pub fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        let at = self.cursor_byte_index();
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    pub fn backspace(&mut self) {
        self.clamp_cursor();
        if self.cursor == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = self.byte_index(self.cursor - 1);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        self.clamp_cursor();
        if self.cursor >= self.char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = self.byte_index(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.clamp_cursor();
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.clamp_cursor();
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Row and column of the cursor in character terms.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let mut row = 0;
        let mut col = 0;
        for c in self.text.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (row, col)
    }

    fn line_lengths(&self) -> Vec<usize> {
        self.text.split('\n').map(|l| l.chars().count()).collect()
    }

    /// Set the cursor from a row/column pair, clamping to line bounds.
    fn set_line_col(&mut self, row: usize, col: usize) {
        let lines = self.line_lengths();
        let row = row.min(lines.len().saturating_sub(1));
        let col = col.min(lines[row]);
        // Chars before the target line, plus one newline per preceding line.
        let mut cursor = 0;
        for len in lines.iter().take(row) {
            cursor += len + 1;
        }
        self.cursor = cursor + col;
    }

    pub fn move_up(&mut self) {
        let (row, col) = self.cursor_line_col();
        if row > 0 {
            self.set_line_col(row - 1, col);
        }
    }

    pub fn move_down(&mut self) {
        let (row, col) = self.cursor_line_col();
        self.set_line_col(row + 1, col);
    }

    pub fn move_home(&mut self) {
        let (row, _) = self.cursor_line_col();
        self.set_line_col(row, 0);
    }

    pub fn move_end(&mut self) {
        let (row, _) = self.cursor_line_col();
        self.set_line_col(row, usize::MAX);
    }
}

/// Apply a key event to a buffer. Returns true when the text changed, which
/// is the signal to write the new value through to the session store.
///
/// Enter is only consumed in multiline mode; single-line fields leave it to
/// the screen (it usually means "submit").
pub fn apply_key(buf: &mut EditBuffer, key: KeyEvent, multiline: bool) -> bool {
    match key.code {
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            buf.insert_char(c);
            true
        }
        KeyCode::Enter if multiline => {
            buf.insert_char('\n');
            true
        }
        KeyCode::Tab if multiline => {
            buf.insert_str("    ");
            true
        }
        KeyCode::Backspace => {
            let before = buf.cursor;
            buf.backspace();
            before != buf.cursor
        }
        KeyCode::Delete => {
            let before = buf.char_len();
            buf.delete();
            before != buf.char_len()
        }
        KeyCode::Left => {
            buf.move_left();
            false
        }
        KeyCode::Right => {
            buf.move_right();
            false
        }
        KeyCode::Up if multiline => {
            buf.move_up();
            false
        }
        KeyCode::Down if multiline => {
            buf.move_down();
            false
        }
        KeyCode::Home => {
            buf.move_home();
            false
        }
        KeyCode::End => {
            buf.move_end();
            false
        }
        _ => false,
    }
}
