use ropey::Rope;

/// Cursor position in the editor buffer.
///
/// Both coordinates count chars, not bytes, so multi-byte text never puts the
/// cursor inside a code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based char offset within the line.
    pub col: usize,
    /// Column to return to when moving vertically through shorter lines.
    sticky_col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky_col: col,
        }
    }

    const fn place(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        self.sticky_col = col;
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The raw-text editing surface: a rope plus a cursor.
///
/// Editing methods return `true` when the text changed, which is the caller's
/// cue to push the new text into the session.
#[derive(Clone)]
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl EditorBuffer {
    /// Create a buffer with the cursor at the end of `text`.
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
        };
        buf.move_to_end();
        buf
    }

    /// Replace the whole text, leaving the cursor at the end.
    ///
    /// Returns `false` (and keeps the cursor) when `text` is already the content.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.rope == text {
            return false;
        }
        self.rope = Rope::from_str(text);
        self.move_to_end();
        true
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Content of a line without its line terminator.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in chars, excluding its line terminator.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        let mut tail = line.chars_at(len);
        while len > 0 && matches!(tail.prev(), Some('\n' | '\r')) {
            len -= 1;
        }
        len
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' {
            return self.split_line();
        }
        self.rope.insert_char(self.cursor_char_idx(), ch);
        self.cursor.place(self.cursor.line, self.cursor.col + 1);
        true
    }

    /// Insert text at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, s: &str) -> bool {
        if s.is_empty() {
            return false;
        }
        let start = self.cursor_char_idx();
        self.rope.insert(start, s);
        self.place_at_char_idx(start + s.chars().count());
        true
    }

    /// Break the line at the cursor (Enter).
    pub fn split_line(&mut self) -> bool {
        self.rope.insert_char(self.cursor_char_idx(), '\n');
        self.cursor.place(self.cursor.line + 1, 0);
        true
    }

    /// Remove the char before the cursor (Backspace), joining lines at column 0.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        self.rope.remove(idx - 1..idx);
        self.place_at_char_idx(idx - 1);
        true
    }

    /// Remove the char under the cursor (Delete), joining lines at line end.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(idx..=idx);
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                let idx = self.cursor_char_idx();
                if idx > 0 {
                    self.place_at_char_idx(idx - 1);
                }
            }
            Direction::Right => {
                let idx = self.cursor_char_idx();
                if idx < self.rope.len_chars() {
                    self.place_at_char_idx(idx + 1);
                }
            }
            Direction::Up if self.cursor.line > 0 => self.move_vertically(self.cursor.line - 1),
            Direction::Down if self.cursor.line + 1 < self.line_count() => {
                self.move_vertically(self.cursor.line + 1);
            }
            Direction::Up | Direction::Down => {}
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.place(self.cursor.line, 0);
    }

    pub fn move_end(&mut self) {
        self.cursor
            .place(self.cursor.line, self.line_len(self.cursor.line));
    }

    /// Jump to the start of the previous word, crossing into the previous line at column 0.
    pub fn move_word_left(&mut self) {
        let mut idx = self.cursor_char_idx();
        while idx > 0 && !is_word_char(self.rope.char(idx - 1)) {
            idx -= 1;
        }
        while idx > 0 && is_word_char(self.rope.char(idx - 1)) {
            idx -= 1;
        }
        self.place_at_char_idx(idx);
    }

    /// Jump past the current word and the gap after it.
    pub fn move_word_right(&mut self) {
        let len = self.rope.len_chars();
        let mut idx = self.cursor_char_idx();
        while idx < len && is_word_char(self.rope.char(idx)) {
            idx += 1;
        }
        while idx < len && !is_word_char(self.rope.char(idx)) {
            idx += 1;
        }
        self.place_at_char_idx(idx);
    }

    /// Move to `(line, col)`, clamped to the text.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        self.cursor.place(line, col.min(self.line_len(line)));
    }

    pub const fn move_to_start(&mut self) {
        self.cursor.place(0, 0);
    }

    pub fn move_to_end(&mut self) {
        self.place_at_char_idx(self.rope.len_chars());
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    fn place_at_char_idx(&mut self, idx: usize) {
        let line = self.rope.char_to_line(idx);
        let col = idx - self.rope.line_to_char(line);
        self.cursor.place(line, col);
    }

    fn move_vertically(&mut self, line: usize) {
        let sticky = self.cursor.sticky_col;
        self.cursor.line = line;
        self.cursor.col = sticky.min(self.line_len(line));
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.rope.len_lines())
            .field("chars", &self.rope.len_chars())
            .field("cursor", &self.cursor)
            .finish()
    }
}
