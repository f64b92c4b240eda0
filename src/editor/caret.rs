//! Caret rules for indentation units.
//!
//! Offsets are char indices into the rope. Every helper clamps the caret
//! to the buffer, so positions past the end or before a line start simply
//! report "no unit here".

use ropey::Rope;

use crate::markup::{INDENT, INDENT_WIDTH};

/// Offset just after the nearest newline before `caret`, or 0.
pub fn line_start(rope: &Rope, caret: usize) -> usize {
    let caret = caret.min(rope.len_chars());
    rope.chars_at(caret)
        .reversed()
        .position(|c| c == '\n')
        .map_or(0, |back| caret - back)
}

/// Column of `caret` within its line.
pub fn column(rope: &Rope, caret: usize) -> usize {
    let caret = caret.min(rope.len_chars());
    caret - line_start(rope, caret)
}

/// Whether `caret` sits on an indentation boundary of its line.
pub fn is_aligned(rope: &Rope, caret: usize) -> bool {
    column(rope, caret) % INDENT_WIDTH == 0
}

/// Whether a whole aligned indentation unit ends at `caret`.
pub fn behind_indent(rope: &Rope, caret: usize) -> bool {
    caret
        .checked_sub(INDENT_WIDTH)
        .is_some_and(|start| is_unit_at(rope, start))
        && is_aligned(rope, caret)
}

/// Whether a whole aligned indentation unit starts at `caret`.
pub fn in_front_of_indent(rope: &Rope, caret: usize) -> bool {
    is_unit_at(rope, caret) && is_aligned(rope, caret)
}

/// Number of spaces Tab inserts at `caret`: enough to reach the next boundary.
pub fn indent_fill(rope: &Rope, caret: usize) -> usize {
    INDENT_WIDTH - column(rope, caret) % INDENT_WIDTH
}

/// Number of whole indentation units leading the line of `caret`, counting
/// only text before the caret. Enter repeats this many units on the new line.
pub fn continuation_depth(rope: &Rope, caret: usize) -> usize {
    let caret = caret.min(rope.len_chars());
    let mut pos = line_start(rope, caret);
    let mut depth = 0;
    while pos + INDENT_WIDTH <= caret && is_unit_at(rope, pos) {
        depth += 1;
        pos += INDENT_WIDTH;
    }
    depth
}

fn is_unit_at(rope: &Rope, start: usize) -> bool {
    let end = start.saturating_add(INDENT_WIDTH);
    rope.get_slice(start..end).is_some_and(|slice| slice == INDENT)
}
