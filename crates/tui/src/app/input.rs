use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Editable text with a grapheme-indexed cursor. Used for the label body and
/// for the settings fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextField {
    pub buffer: String,
    pub cursor: usize,
}

impl TextField {
    pub fn with_text(s: &str) -> Self {
        Self {
            buffer: s.to_string(),
            cursor: s.graphemes(true).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn set(&mut self, s: &str) {
        self.buffer = s.to_string();
        self.cursor = s.graphemes(true).count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.buffer.graphemes(true).count()
    }

    pub fn insert_text(&mut self, s: &str) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        let mut next = String::with_capacity(self.buffer.len() + s.len());
        for g in &parts[..idx] {
            next.push_str(g);
        }
        next.push_str(s);
        for g in &parts[idx..] {
            next.push_str(g);
        }
        self.buffer = next;
        let added = s.graphemes(true).count();
        self.cursor = (idx + added).min(self.len());
    }

    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf));
    }

    pub fn delete_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        parts.remove(idx - 1);
        self.buffer = parts.concat();
        self.cursor = idx - 1;
    }

    pub fn delete_right(&mut self) {
        let mut parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.buffer = parts.concat();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_line_start(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1] != "\n" {
            i -= 1;
        }
        self.cursor = i;
    }

    pub fn move_line_end(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i] != "\n" {
            i += 1;
        }
        self.cursor = i;
    }

    pub fn delete_prev_word(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let end = self.cursor.min(parts.len());
        let mut i = end;
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        let mut rest = parts.clone();
        rest.drain(i..end);
        self.buffer = rest.concat();
        self.cursor = i;
    }

    pub fn kill_to_line_start(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let end = self.cursor.min(parts.len());
        let mut start = end;
        while start > 0 && parts[start - 1] != "\n" {
            start -= 1;
        }
        let mut rest = parts.clone();
        rest.drain(start..end);
        self.buffer = rest.concat();
        self.cursor = start;
    }

    pub fn kill_to_line_end(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let start = self.cursor.min(parts.len());
        let mut end = start;
        while end < parts.len() && parts[end] != "\n" {
            end += 1;
        }
        let mut rest = parts.clone();
        rest.drain(start..end);
        self.buffer = rest.concat();
    }

    pub fn move_word_left(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        self.cursor = i;
    }

    pub fn move_word_right(&mut self) {
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.cursor = i;
    }

    /// Applies a plain editing key. Returns false for keys the caller owns.
    pub fn apply_edit_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Backspace => self.delete_left(),
            KeyCode::Delete => self.delete_right(),
            KeyCode::Left if ctrl => self.move_word_left(),
            KeyCode::Right if ctrl => self.move_word_right(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.kill_to_line_start(),
            KeyCode::Char('k') if ctrl => self.kill_to_line_end(),
            KeyCode::Char('a') if ctrl => self.move_line_start(),
            KeyCode::Char('e') if ctrl => self.move_line_end(),
            KeyCode::Char(ch) if !ctrl => self.insert_char(ch),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_cursor() {
        let mut f = TextField::with_text("Flour");
        f.cursor = 0;
        f.insert_text("Rye ");
        assert_eq!(f.buffer, "Rye Flour");
        assert_eq!(f.cursor, 4);
    }

    #[test]
    fn delete_counts_graphemes_not_bytes() {
        let mut f = TextField::with_text("Café");
        f.delete_left();
        assert_eq!(f.buffer, "Caf");
        f.move_left();
        f.delete_right();
        assert_eq!(f.buffer, "Ca");
    }

    #[test]
    fn line_motion_stops_at_newline() {
        let mut f = TextField::with_text("top\nbottom");
        f.move_line_start();
        assert_eq!(f.cursor, 4);
        f.kill_to_line_end();
        assert_eq!(f.buffer, "top\n");
        f.move_left();
        f.kill_to_line_start();
        assert_eq!(f.buffer, "\n");
        assert_eq!(f.cursor, 0);
    }

    #[test]
    fn edit_keys_drive_the_buffer() {
        let mut f = TextField::default();
        for ch in "jam".chars() {
            assert!(f.apply_edit_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)));
        }
        f.apply_edit_key(&KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        f.apply_edit_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(f.buffer, "jm");
        assert!(!f.apply_edit_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)));
        assert!(!f.apply_edit_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(f.buffer, "jm");
    }

    #[test]
    fn delete_prev_word_skips_trailing_space() {
        let mut f = TextField::with_text("Brown rice  ");
        f.delete_prev_word();
        assert_eq!(f.buffer, "Brown ");
    }
}
