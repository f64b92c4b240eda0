use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use super::{Direction, EditorBuffer};
use crate::history::History;
use crate::markup::Converter;

/// A raw-text editing surface: buffer, tag table and undo history.
///
/// Alt chords are commands:
/// - Alt+token wraps the selection in that tag's markers
/// - Alt+E erases markers inside the selection
/// - Alt+Z / Alt+Y undo / redo
/// - Alt+X / Alt+V record a snapshot ahead of a cut or paste
///
/// Every other key first offers a throttled snapshot to the history, then
/// edits the buffer.
#[derive(Debug)]
pub struct EditorSession {
    buffer: EditorBuffer,
    converter: Converter,
    history: History,
}

impl EditorSession {
    pub fn new(text: &str, converter: Converter, history: History) -> Self {
        Self {
            buffer: EditorBuffer::from_text(text),
            converter,
            history,
        }
    }

    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub const fn buffer_mut(&mut self) -> &mut EditorBuffer {
        &mut self.buffer
    }

    pub const fn converter(&self) -> &Converter {
        &self.converter
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Rendered markup for the current text.
    pub fn preview(&self) -> String {
        self.converter.convert(&self.buffer.text())
    }

    /// Handle a key press. Returns `true` if the session consumed the key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return self.handle_command(key.code);
        }
        self.history.save(self.buffer.snapshot());
        self.handle_edit(key)
    }

    /// Wrap the selection in the markers of the tag for `token`.
    ///
    /// Returns `false` when `token` is not a tag.
    pub fn insert_tag(&mut self, token: char) -> bool {
        let Some(tag) = self.converter.tag_for(token) else {
            return false;
        };
        self.buffer.wrap_selection(tag.marker());
        self.force_save();
        true
    }

    /// Strip markers from the selection.
    pub fn erase_tags(&mut self) {
        self.buffer.erase_markers(&self.converter);
        self.force_save();
    }

    /// Restore the most recent undo entry. Returns `false` if there was none.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Ok(snapshot) => {
                self.buffer.restore(&snapshot);
                true
            }
            Err(err) => {
                debug!(%err, "undo ignored");
                false
            }
        }
    }

    /// Restore the most recent redo entry. Returns `false` if there was none.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Ok(snapshot) => {
                self.buffer.restore(&snapshot);
                true
            }
            Err(err) => {
                debug!(%err, "redo ignored");
                false
            }
        }
    }

    /// Record the current state regardless of the save throttle.
    pub fn force_save(&mut self) {
        self.history.force_save(self.buffer.snapshot());
    }

    fn handle_command(&mut self, code: KeyCode) -> bool {
        let KeyCode::Char(ch) = code else {
            return false;
        };
        if self.converter.has_token(ch) {
            return self.insert_tag(ch);
        }
        match ch.to_ascii_lowercase() {
            'e' => self.erase_tags(),
            'z' => {
                self.undo();
            }
            'y' => {
                self.redo();
            }
            'x' | 'v' => self.force_save(),
            _ => return false,
        }
        true
    }

    fn handle_edit(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab => self.buffer.insert_tab(),
            KeyCode::Enter => {
                self.buffer.insert_newline();
                true
            }
            KeyCode::Backspace => self.buffer.delete_back(),
            KeyCode::Delete => self.buffer.delete_forward(),
            KeyCode::Left => {
                self.buffer.move_cursor(Direction::Left, &self.converter);
                true
            }
            KeyCode::Right => {
                self.buffer.move_cursor(Direction::Right, &self.converter);
                true
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.insert_char(ch);
                true
            }
            _ => false,
        }
    }
}
