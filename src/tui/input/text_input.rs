//! Text input field handling.

/// State for a single-line text input field.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    /// The current text content.
    pub content: String,
    /// Cursor position (character index).
    pub cursor: usize,
    /// Render as mask characters (password fields).
    pub masked: bool,
}

impl TextInput {
    /// Creates a new empty text input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an input whose content renders masked.
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.content.remove(self.cursor);
        }
    }

    /// Moves the cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor += 1;
        }
    }

    /// Empties the field.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Returns the current content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Returns the text to render, applying the mask if set.
    pub fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.content.chars().count())
        } else {
            self.content.clone()
        }
    }

    /// Returns whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_track_cursor() {
        let mut input = TextInput::new();
        for c in "AAPL".chars() {
            input.insert(c);
        }
        assert_eq!(input.as_str(), "AAPL");

        input.move_left();
        input.backspace();
        assert_eq!(input.as_str(), "AAL");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn masked_display_hides_content() {
        let mut input = TextInput::masked();
        for c in "secret".chars() {
            input.insert(c);
        }
        assert_eq!(input.display(), "******");
        assert_eq!(input.as_str(), "secret");
    }
}
