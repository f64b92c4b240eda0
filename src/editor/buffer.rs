use ropey::Rope;

use super::caret;
use crate::history::Snapshot;
use crate::markup::{Converter, INDENT, INDENT_WIDTH, TagDefinition};

/// Selection in the editor buffer, as char offsets.
///
/// `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// A selection between two offsets, in either order.
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A collapsed selection at `pos`.
    pub const fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected chars. Zero for an inverted hand-built selection.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// A raw note buffer backed by a rope data structure.
///
/// Holds the text and selection of the editing surface. Caret movement
/// treats tag markers and aligned indentation units as single steps.
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::default(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current selection.
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Caret position (selection start).
    pub const fn caret(&self) -> usize {
        self.selection.start
    }

    /// Length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The selected text.
    pub fn selected_text(&self) -> String {
        let Selection { start, end } = self.selection;
        self.rope.slice(start..end).to_string()
    }

    /// Collapse the selection to `pos`, clamped to the buffer.
    pub fn select(&mut self, pos: usize) {
        self.selection = Selection::caret(pos.min(self.len_chars()));
    }

    /// Set the selection, clamping both ends to the buffer.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len_chars();
        self.selection = Selection::new(start.min(len), end.min(len));
    }

    /// Replace the selection with `s` and put the caret after it.
    pub fn insert_str(&mut self, s: &str) {
        let start = self.selection.start;
        self.replace_selection(s);
        self.select(start + s.chars().count());
    }

    /// Insert a character, replacing the selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Tab: pad the caret to the next indentation boundary.
    ///
    /// Returns `false` (and does nothing) when text is selected.
    pub fn insert_tab(&mut self) -> bool {
        if !self.selection.is_collapsed() {
            return false;
        }
        let fill = caret::indent_fill(&self.rope, self.caret());
        self.insert_str(&" ".repeat(fill));
        true
    }

    /// Enter: break the line and repeat the current line's leading indentation.
    pub fn insert_newline(&mut self) {
        let depth = caret::continuation_depth(&self.rope, self.selection.start);
        let text = format!("\n{}", INDENT.repeat(depth));
        self.insert_str(&text);
    }

    /// Backspace. Deletes the selection, a whole aligned indentation unit
    /// behind the caret, or one character.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if !self.selection.is_collapsed() {
            self.replace_selection("");
            let start = self.selection.start;
            self.select(start);
            return true;
        }

        let pos = self.caret();
        if pos == 0 {
            return false;
        }
        let width = if caret::behind_indent(&self.rope, pos) {
            INDENT_WIDTH
        } else {
            1
        };
        self.rope.remove(pos - width..pos);
        self.select(pos - width);
        true
    }

    /// Delete the character at the caret (Delete key).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_collapsed() {
            return self.delete_back();
        }
        let pos = self.caret();
        if pos >= self.len_chars() {
            return false;
        }
        self.rope.remove(pos..=pos);
        true
    }

    /// Move the caret one step. A step covers a whole tag marker or an
    /// aligned indentation unit when one is adjacent, otherwise one char.
    ///
    /// A non-empty selection collapses to the edge in `direction`.
    pub fn move_cursor(&mut self, direction: Direction, converter: &Converter) {
        match direction {
            Direction::Left => self.move_left(converter),
            Direction::Right => self.move_right(converter),
        }
    }

    /// Move caret to the end of the buffer.
    pub fn move_to_end(&mut self) {
        self.select(self.len_chars());
    }

    /// Surround the selection with `marker` on both sides, keeping the
    /// wrapped text selected between them.
    pub fn wrap_selection(&mut self, marker: &str) {
        let Selection { start, end } = self.selection;
        let len = marker.chars().count();
        self.rope.insert(end, marker);
        self.rope.insert(start, marker);
        self.selection = Selection::new(start + len, end + len);
    }

    /// Remove every known marker inside the selection and select what remains.
    pub fn erase_markers(&mut self, converter: &Converter) {
        let start = self.selection.start;
        let stripped = converter.strip_markers(&self.selected_text());
        self.replace_selection(&stripped);
        self.selection = Selection::new(start, start + stripped.chars().count());
    }

    /// Text and selection as a history entry.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.text(), self.selection.start, self.selection.end)
    }

    /// Replace the whole buffer with a history entry.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.rope = Rope::from_str(&snapshot.text);
        self.set_selection(snapshot.start, snapshot.end);
    }

    // --- Private helpers ---

    fn replace_selection(&mut self, s: &str) {
        let Selection { start, end } = self.selection;
        if start == end && s.is_empty() {
            return;
        }
        self.rope.remove(start..end);
        self.rope.insert(start, s);
    }

    fn move_left(&mut self, converter: &Converter) {
        if !self.selection.is_collapsed() {
            self.select(self.selection.start);
            return;
        }
        let pos = self.caret();
        let step = if caret::behind_indent(&self.rope, pos) {
            INDENT_WIDTH
        } else {
            converter
                .marker_ending_at(pos, &self.rope)
                .map_or(1, TagDefinition::marker_len)
        };
        self.select(pos.saturating_sub(step));
    }

    fn move_right(&mut self, converter: &Converter) {
        if !self.selection.is_collapsed() {
            self.select(self.selection.end);
            return;
        }
        let pos = self.caret();
        let step = match converter.marker_starting_at(pos, &self.rope) {
            Some(tag) => tag.marker_len(),
            None if caret::in_front_of_indent(&self.rope, pos) => INDENT_WIDTH,
            None => 1,
        };
        self.select(pos.saturating_add(step));
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("selection", &self.selection)
            .finish()
    }
}
