//! Raw-text editing for notes.
//!
//! Provides a rope-backed buffer with selection management, the caret
//! rules for tag markers and indentation units, and a session that maps
//! key events onto buffer edits and undo history.

mod buffer;
pub mod caret;
mod session;

pub use buffer::{Direction, EditorBuffer, Selection};
pub use session::EditorSession;
