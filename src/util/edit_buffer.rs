use super::unicode::{byte_offset_to_display_col, next_grapheme_boundary, prev_grapheme_boundary};

/// Single-line text being edited in place, with a grapheme-aligned cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditBuffer {
    text: String,
    /// Byte offset, always on a grapheme boundary
    cursor: usize,
}

impl EditBuffer {
    /// Start editing `text` with the cursor at the end
    pub fn new(text: &str) -> Self {
        EditBuffer {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in terminal cells
    pub fn cursor_col(&self) -> usize {
        byte_offset_to_display_col(&self.text, self.cursor)
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            return;
        }
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace_handle_hangul() {
        let mut buf = EditBuffer::new("수학");
        buf.insert_char('!');
        assert_eq!(buf.text(), "수학!");
        buf.backspace();
        buf.backspace();
        assert_eq!(buf.text(), "수");
        assert_eq!(buf.cursor_col(), 2);
    }

    #[test]
    fn cursor_moves_by_grapheme() {
        let mut buf = EditBuffer::new("e\u{0301}x");
        buf.home();
        buf.move_right();
        assert_eq!(buf.cursor(), 3);
        buf.insert_char('-');
        assert_eq!(buf.text(), "e\u{0301}-x");
        buf.move_left();
        buf.move_left();
        assert_eq!(buf.cursor(), 0);
        buf.move_left();
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn delete_removes_forward() {
        let mut buf = EditBuffer::new("abc");
        buf.home();
        buf.delete();
        assert_eq!(buf.text(), "bc");
        buf.end();
        buf.delete();
        assert_eq!(buf.text(), "bc");
    }

    #[test]
    fn newlines_are_ignored() {
        let mut buf = EditBuffer::default();
        buf.insert_str("a\nb");
        assert_eq!(buf.text(), "ab");
    }
}
