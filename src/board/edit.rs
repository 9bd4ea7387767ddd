/// Draft text for the card currently in edit mode.
///
/// The cursor counts characters, not bytes, so multi-byte text edits cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub index: usize,
    buffer: String,
    cursor: usize,
}

impl EditSession {
    /// Start a session on `index` seeded with `text`, cursor at the end.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let buffer = text.into();
        let cursor = buffer.chars().count();
        Self {
            index,
            buffer,
            cursor,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn into_buffer(self) -> String {
        self.buffer
    }

    /// Replace the whole draft; the cursor moves to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let at = byte_index_for_cursor(&self.buffer, self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let from = byte_index_for_cursor(&self.buffer, self.cursor - 1);
        let to = byte_index_for_cursor(&self.buffer, self.cursor);
        self.buffer.replace_range(from..to, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.buffer.chars().count() {
            return;
        }
        let from = byte_index_for_cursor(&self.buffer, self.cursor);
        let to = byte_index_for_cursor(&self.buffer, self.cursor + 1);
        self.buffer.replace_range(from..to, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let max = self.buffer.chars().count();
        self.cursor = (self.cursor + 1).min(max);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }
}

pub fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
