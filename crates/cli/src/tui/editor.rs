// Multi-line text buffer for editing the message template

/// Template text plus a cursor kept on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    text: String,
    /// Byte offset into `text`
    cursor: usize,
}

impl TemplateEditor {
    /// Start editing `text` with the cursor at the end.
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string(), cursor: text.len() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    pub fn right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    /// Start of the current line.
    pub fn home(&mut self) {
        self.cursor = self.text[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    }

    /// End of the current line.
    pub fn end(&mut self) {
        self.cursor += self.text[self.cursor..].find('\n').unwrap_or(self.text.len() - self.cursor);
    }

    /// Cursor as (line, display column), both zero-based.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        (line, crate::util::display_width(&before[line_start..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_at_the_end() {
        let mut ed = TemplateEditor::new("Hola ");
        for ch in "{nombre}".chars() {
            ed.insert(ch);
        }
        assert_eq!(ed.text(), "Hola {nombre}");
        assert_eq!(ed.cursor_line_col(), (0, 13));
    }

    #[test]
    fn backspace_and_delete_respect_multibyte_chars() {
        let mut ed = TemplateEditor::new("¡Olé!");
        ed.backspace();
        ed.backspace();
        assert_eq!(ed.text(), "¡Ol");
        ed.home();
        ed.delete();
        assert_eq!(ed.text(), "Ol");
        ed.backspace();
        assert_eq!(ed.text(), "Ol");
    }

    #[test]
    fn line_navigation() {
        let mut ed = TemplateEditor::new("Hola\nAdiós");
        assert_eq!(ed.cursor_line_col(), (1, 5));
        ed.home();
        assert_eq!(ed.cursor_line_col(), (1, 0));
        ed.left();
        assert_eq!(ed.cursor_line_col(), (0, 4));
        ed.home();
        ed.right();
        ed.insert('-');
        assert_eq!(ed.text(), "H-ola\nAdiós");
        ed.end();
        assert_eq!(ed.cursor_line_col(), (0, 5));
        ed.right();
        ed.end();
        assert_eq!(ed.cursor_line_col(), (1, 5));
    }
}
