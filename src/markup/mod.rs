//! Inline tag markup.
//!
//! Notes are written as flat text with paired markers such as `<b>bold<b>`.
//! The same marker opens and closes a region; a stack decides which is
//! which. This module holds:
//! - The tag table (structural tags plus numbered color tags)
//! - The converter that renders marked-up text into spans

mod converter;
mod tags;

pub use converter::Converter;
pub use tags::{
    ColorError, DEFAULT_COLORS, MAX_COLOR_TAGS, TagDefinition, TextSource, build_tags,
    parse_colors,
};

/// One indentation unit in raw note text.
pub const INDENT: &str = "    ";

/// Width of [`INDENT`] in chars.
pub const INDENT_WIDTH: usize = INDENT.len();
