//! A terminal-like screen buffer with a one-line command prompt.
//!
//! The bottom row is the console: the prompt, the current history line and
//! a block cursor. Everything else is written with [`Terminal::message`].

/// Prompt printed at the start of the console row.
pub const PROMPT: &[u8] = b"COMMAND => ";

/// CP437 full block, drawn at the cursor position.
pub const CURSOR: u8 = 219;

/// Number of command lines kept for up/down recall.
pub const HISTORY: usize = 16;

const SPACE: u8 = b' ';

pub struct Terminal {
    width: usize,
    height: usize,
    buffer: Vec<u8>,
    history: Vec<Vec<u8>>,
    line: usize,
    cursor: usize,
}

impl Terminal {
    /// A blank terminal of `width × height` tiles.
    ///
    /// # Panics
    ///
    /// If the console row has no room after the prompt, or `height` is 0.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > PROMPT.len(), "console narrower than the prompt");
        assert!(height > 0, "terminal has no rows");
        Self {
            width,
            height,
            buffer: vec![0; width * height],
            history: vec![vec![SPACE; width - PROMPT.len()]; HISTORY],
            line: 0,
            cursor: 0,
        }
    }

    /// The whole display, row-major.
    pub fn screen(&self) -> &[u8] {
        &self.buffer
    }

    /// The bottom row.
    pub fn console(&self) -> &[u8] {
        &self.buffer[self.console_start()..]
    }

    fn console_start(&self) -> usize {
        self.width * (self.height - 1)
    }

    fn line_width(&self) -> usize {
        self.width - PROMPT.len()
    }

    /// Overwrite the character under the cursor and move right. Input is
    /// taken as code page 437; code units outside it are dropped.
    pub fn input(&mut self, unit: u16) {
        let Ok(c) = u8::try_from(unit) else {
            return;
        };
        self.history[self.line][self.cursor] = c;
        self.right();
        self.update_console();
    }

    /// Reprint the prompt, current line and cursor into the console row.
    pub fn update_console(&mut self) {
        let start = self.console_start();
        let (prompt, text) = self.buffer[start..].split_at_mut(PROMPT.len());
        prompt.copy_from_slice(PROMPT);
        text.copy_from_slice(&self.history[self.line]);
        text[self.cursor] = CURSOR;
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.update_console();
        }
    }

    pub fn right(&mut self) {
        if self.cursor + 1 < self.line_width() {
            self.cursor += 1;
            self.update_console();
        }
    }

    /// Recall the next history line.
    pub fn down(&mut self) {
        self.cursor = 0;
        self.line = (self.line + 1) % HISTORY;
        self.update_console();
    }

    /// Recall the previous history line.
    pub fn up(&mut self) {
        self.cursor = 0;
        self.line = (self.line + HISTORY - 1) % HISTORY;
        self.update_console();
    }

    /// Take the current line as a command and start a fresh one.
    pub fn enter(&mut self) -> Vec<u8> {
        let command = self.history[self.line].clone();
        self.down();
        self.history[self.line].fill(SPACE);
        self.update_console();
        command
    }

    /// Lay `text` out from the top-left corner. Newlines start a new row,
    /// long rows are truncated and the remainder of each row is blanked.
    pub fn message(&mut self, text: &[u8]) {
        let mut lines = text.split(|&c| c == b'\n');
        for row in self.buffer.chunks_exact_mut(self.width) {
            let line = lines.next().unwrap_or_default();
            let n = line.len().min(row.len());
            row[..n].copy_from_slice(&line[..n]);
            row[n..].fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn term() -> Terminal {
        let mut t = Terminal::new(16, 3);
        t.update_console();
        t
    }

    fn console_text(t: &Terminal) -> &[u8] {
        &t.console()[PROMPT.len()..]
    }

    #[test]
    fn prompt_and_cursor() {
        let t = term();
        assert_eq!(&t.console()[..PROMPT.len()], PROMPT);
        assert_eq!(console_text(&t), [CURSOR, b' ', b' ', b' ', b' ']);
    }

    #[test]
    fn typing_and_editing() {
        let mut t = term();
        for c in "ab".encode_utf16() {
            t.input(c);
        }
        assert_eq!(console_text(&t), b"ab\xDB  ");
        // Backspace as the dispatcher issues it: left, blank, left.
        t.left();
        t.input(u16::from(b' '));
        t.left();
        assert_eq!(console_text(&t), b"a\xDB   ");
    }

    #[test]
    fn non_cp437_units_are_dropped() {
        let mut t = term();
        t.input(0x263A);
        assert_eq!(console_text(&t)[0], CURSOR);
    }

    #[test]
    fn cursor_stops_at_line_end() {
        let mut t = term();
        for _ in 0..10 {
            t.input(u16::from(b'x'));
        }
        assert_eq!(console_text(&t), b"xxxx\xDB");
    }

    #[test]
    fn history_wraps_both_ways() {
        let mut t = term();
        t.input(u16::from(b'1'));
        assert_eq!(t.enter()[..2], *b"1 ");
        t.up();
        assert_eq!(console_text(&t), b"\xDB    ");
        // From the first line, up wraps to the last.
        t.up();
        assert_eq!(t.line, HISTORY - 1);
        t.down();
        assert_eq!(t.line, 0);
    }

    #[test]
    fn message_layout() {
        let mut t = Terminal::new(14, 3);
        t.message(b"hello\nthis line is too long");
        assert_eq!(&t.screen()[..14], b"hello\0\0\0\0\0\0\0\0\0");
        assert_eq!(&t.screen()[14..28], b"this line is t");
        assert_eq!(&t.screen()[28..], [0; 14]);
    }
}
