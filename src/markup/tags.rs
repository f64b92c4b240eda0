use ropey::Rope;
use serde::Serialize;
use thiserror::Error;

/// Colors used for the numbered tags when no configuration supplies any.
pub const DEFAULT_COLORS: [&str; 3] = ["#b03830", "#b0972a", "#5d62f0"];

/// Numbered color tags use single-digit tokens, so at most nine exist.
pub const MAX_COLOR_TAGS: usize = 9;

/// Structural tags, in lookup order: (token, css class).
const STRUCTURAL_TAGS: [(char, &str); 4] = [
    ('t', "title"),
    ('b', "bold"),
    ('i', "italic"),
    ('u', "underline"),
];

/// Error raised when a configured color value cannot be used in a style attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color `{0}`: expected 3, 4, 6 or 8 hex digits")]
    Invalid(String),
}

/// One named style region and the marker that delimits it.
///
/// The same marker text both opens and closes the region; which role a
/// marker plays is decided by the converter's stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDefinition {
    token: char,
    marker: String,
    css_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

impl TagDefinition {
    /// A structural tag styled by a css class.
    pub fn structural(token: char, css_class: &str) -> Self {
        Self {
            token,
            marker: format!("<{token}>"),
            css_class: css_class.to_string(),
            color: None,
        }
    }

    /// A numbered tag styled by an inline text color. `color` must already
    /// be normalized by [`parse_colors`].
    fn colored(token: char, color: &str) -> Self {
        Self {
            token,
            marker: format!("<{token}>"),
            css_class: "base".to_string(),
            color: Some(color.to_string()),
        }
    }

    pub const fn token(&self) -> char {
        self.token
    }

    /// The literal `<token>` text.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Marker length in chars.
    pub fn marker_len(&self) -> usize {
        self.marker.chars().count()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Opening span for this tag.
    pub fn opening_markup(&self) -> String {
        match &self.color {
            Some(color) => format!(
                "<span class=\"{}\" style=\"color: {color};\">",
                self.css_class
            ),
            None => format!("<span class=\"{}\">", self.css_class),
        }
    }

    /// Whether `buffer` holds this tag's marker starting exactly at char `offset`.
    pub fn marker_at<T: TextSource + ?Sized>(&self, offset: usize, buffer: &T) -> bool {
        buffer.contains_at(offset, &self.marker)
    }
}

/// Text that can be probed for a needle at a char offset.
///
/// Lets marker lookups run against both plain strings and the editor's rope
/// without copying the rope out first.
pub trait TextSource {
    /// Whether `needle` occurs starting at char `offset`. Out-of-range
    /// offsets never match.
    fn contains_at(&self, offset: usize, needle: &str) -> bool;
}

impl TextSource for str {
    fn contains_at(&self, offset: usize, needle: &str) -> bool {
        self.char_indices()
            .nth(offset)
            .is_some_and(|(byte, _)| self[byte..].starts_with(needle))
    }
}

impl TextSource for String {
    fn contains_at(&self, offset: usize, needle: &str) -> bool {
        self.as_str().contains_at(offset, needle)
    }
}

impl TextSource for Rope {
    fn contains_at(&self, offset: usize, needle: &str) -> bool {
        let end = offset.saturating_add(needle.chars().count());
        self.get_slice(offset..end).is_some_and(|slice| slice == needle)
    }
}

/// Build the ordered tag table: structural tags first, then one numbered
/// tag per color. An empty color list falls back to [`DEFAULT_COLORS`].
///
/// Colors that are not hex values are skipped with a warning and do not
/// take a token.
pub fn build_tags<S: AsRef<str>>(colors: &[S]) -> Vec<TagDefinition> {
    let colors: Vec<String> = if colors.is_empty() {
        DEFAULT_COLORS.iter().map(ToString::to_string).collect()
    } else {
        colors
            .iter()
            .filter_map(|color| match normalize_color(color.as_ref()) {
                Ok(color) => Some(color),
                Err(err) => {
                    tracing::warn!(%err, "skipping color");
                    None
                }
            })
            .collect()
    };

    if colors.len() > MAX_COLOR_TAGS {
        tracing::warn!(
            configured = colors.len(),
            kept = MAX_COLOR_TAGS,
            "too many colors configured, extra colors are ignored"
        );
    }

    let mut tags: Vec<TagDefinition> = STRUCTURAL_TAGS
        .iter()
        .map(|&(token, class)| TagDefinition::structural(token, class))
        .collect();

    let digits = ('1'..='9').take(MAX_COLOR_TAGS);
    tags.extend(
        digits
            .zip(colors)
            .map(|(token, color)| TagDefinition::colored(token, &color)),
    );
    tags
}

/// Parse a configured color list.
///
/// Values are separated by whitespace or commas; the leading `#` is
/// optional, matching how colors were stored as bare hex digits.
///
/// # Errors
///
/// Returns [`ColorError::Invalid`] for any value that is not 3, 4, 6 or 8
/// hex digits.
pub fn parse_colors(list: &str) -> Result<Vec<String>, ColorError> {
    list.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(normalize_color)
        .collect()
}

fn normalize_color(raw: &str) -> Result<String, ColorError> {
    let digits = raw.strip_prefix('#').unwrap_or(raw);
    let valid_len = matches!(digits.len(), 3 | 4 | 6 | 8);
    if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::Invalid(raw.to_string()));
    }
    Ok(format!("#{}", digits.to_ascii_lowercase()))
}
