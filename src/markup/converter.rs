use std::collections::HashSet;

use tracing::{debug, trace};

use super::INDENT;
use super::tags::{TagDefinition, TextSource, build_tags};

const CLOSE_SPAN: &str = "</span>";
const LINE_BREAK: &str = "<br><hr>";
const TAB_MARKUP: &str = "<tab></tab>";

/// Renders tag markup into spans.
///
/// Built once from the configured colors; conversion itself is a pure
/// function of the input text.
#[derive(Debug, Clone)]
pub struct Converter {
    tags: Vec<TagDefinition>,
    tokens: HashSet<char>,
    escape_html: bool,
}

impl Converter {
    /// Build a converter for the given colors. An empty list selects the
    /// built-in defaults.
    pub fn new<S: AsRef<str>>(colors: &[S]) -> Self {
        let tags = build_tags(colors);
        let tokens = tags.iter().map(TagDefinition::token).collect();
        debug!(tags = tags.len(), "built tag table");
        Self {
            tags,
            tokens,
            escape_html: false,
        }
    }

    /// Converter using [`DEFAULT_COLORS`](super::DEFAULT_COLORS).
    pub fn with_default_colors() -> Self {
        let none: [&str; 0] = [];
        Self::new(&none)
    }

    /// Escape `&`, `<` and `>` in literal text so the output can be injected
    /// into a page as-is. Unknown markers are then rendered as text.
    #[must_use]
    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    /// The ordered tag table.
    pub fn tags(&self) -> &[TagDefinition] {
        &self.tags
    }

    /// Whether `ch` is the token of some tag.
    pub fn has_token(&self, ch: char) -> bool {
        self.tokens.contains(&ch)
    }

    /// The tag whose token is `ch`.
    pub fn tag_for(&self, ch: char) -> Option<&TagDefinition> {
        self.tags.iter().find(|tag| tag.token() == ch)
    }

    /// First tag, in table order, whose marker starts at `offset`.
    pub fn marker_starting_at<T: TextSource + ?Sized>(
        &self,
        offset: usize,
        buffer: &T,
    ) -> Option<&TagDefinition> {
        self.tags.iter().find(|tag| tag.marker_at(offset, buffer))
    }

    /// First tag, in table order, whose marker ends exactly at `offset`.
    pub fn marker_ending_at<T: TextSource + ?Sized>(
        &self,
        offset: usize,
        buffer: &T,
    ) -> Option<&TagDefinition> {
        self.tags.iter().find(|tag| {
            offset
                .checked_sub(tag.marker_len())
                .is_some_and(|start| tag.marker_at(start, buffer))
        })
    }

    /// Remove every known marker from `text`.
    pub fn strip_markers(&self, text: &str) -> String {
        self.tags
            .iter()
            .fold(text.to_string(), |acc, tag| acc.replace(tag.marker(), ""))
    }

    /// Render `raw` into span markup.
    ///
    /// The marker on top of the stack is checked first and closes its
    /// region; otherwise the first matching tag opens a new one. Regions
    /// still open at the end are closed in stack order. Newlines and
    /// indentation units are substituted over the whole output afterwards.
    pub fn convert(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + raw.len() / 4);
        let mut stack: Vec<&TagDefinition> = Vec::new();
        let mut literal_start = 0;
        let mut idx = 0;

        while idx < raw.len() {
            let rest = &raw[idx..];

            let closing = stack
                .last()
                .copied()
                .filter(|top| rest.starts_with(top.marker()));
            if let Some(tag) = closing {
                stack.pop();
                self.push_literal(&mut out, &raw[literal_start..idx]);
                out.push_str(CLOSE_SPAN);
                trace!(token = %tag.token(), at = idx, "close");
                idx += tag.marker().len();
                literal_start = idx;
                continue;
            }

            if let Some(tag) = self.tags.iter().find(|tag| rest.starts_with(tag.marker())) {
                self.push_literal(&mut out, &raw[literal_start..idx]);
                out.push_str(&tag.opening_markup());
                trace!(token = %tag.token(), at = idx, "open");
                stack.push(tag);
                idx += tag.marker().len();
                literal_start = idx;
                continue;
            }

            idx += rest.chars().next().map_or(1, char::len_utf8);
        }

        self.push_literal(&mut out, &raw[literal_start..]);

        if !stack.is_empty() {
            debug!(unclosed = stack.len(), "auto-closing open tags");
        }
        out.push_str(&CLOSE_SPAN.repeat(stack.len()));

        out.replace('\n', LINE_BREAK).replace(INDENT, TAB_MARKUP)
    }

    fn push_literal(&self, out: &mut String, literal: &str) {
        if self.escape_html {
            out.push_str(&html_escape::encode_text(literal));
        } else {
            out.push_str(literal);
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::with_default_colors()
    }
}
