// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorBuffer)
    clippy::module_name_repetitions
)]

//! # Notemark
//!
//! The editing kernel of a note-sharing site's raw-text editor.
//!
//! Notes are flat text with paired tag markers (`<b>bold<b>`,
//! `<1>colored<1>`). Notemark provides:
//! - A converter that renders tag markup to spans for the preview
//! - A throttled, bounded undo/redo history of buffer snapshots
//! - Caret rules that hop over markers and 4-space indentation units
//!
//! ## Modules
//!
//! - [`markup`]: Tag table and converter
//! - [`history`]: Undo/redo snapshots
//! - [`editor`]: Rope-backed buffer, caret rules and key handling
//! - [`config`]: Persisted defaults (colors, escaping)

pub mod config;
pub mod editor;
pub mod history;
pub mod markup;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditorBuffer, EditorSession, Selection};
    pub use crate::history::{History, HistoryError, Snapshot};
    pub use crate::markup::{Converter, TagDefinition};
}
