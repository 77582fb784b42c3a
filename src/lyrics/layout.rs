//! Word-wrapping of lyric lines into terminal rows.
//!
//! The scroll anchor needs each line's offset and rendered height. Wrapping is
//! done here rather than by the paragraph widget so that the rows we measure
//! are exactly the rows we draw.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Vertical extent of one lyric line inside the wrapped content.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LineGeometry {
    /// Row at which the line starts, counted from the top of the content.
    pub offset_top: usize,
    /// Number of rows the line occupies (at least 1).
    pub height: usize,
}

/// A single rendered row and the lyric line it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub line: usize,
    pub text: String,
}

/// Lyric lines wrapped to a fixed width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsLayout {
    width: u16,
    rows: Vec<LayoutRow>,
    lines: Vec<LineGeometry>,
}

impl LyricsLayout {
    /// Wrap `lines` to `width` columns.
    pub fn build<'a>(lines: impl IntoIterator<Item = &'a str>, width: u16) -> Self {
        let mut rows = Vec::new();
        let mut geometry = Vec::new();

        for (i, text) in lines.into_iter().enumerate() {
            let wrapped = wrap_line(text, width as usize);
            geometry.push(LineGeometry {
                offset_top: rows.len(),
                height: wrapped.len(),
            });
            rows.extend(wrapped.into_iter().map(|text| LayoutRow { line: i, text }));
        }

        Self {
            width,
            rows,
            lines: geometry,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    /// Total number of rows of wrapped content.
    pub fn content_height(&self) -> usize {
        self.rows.len()
    }

    pub fn line(&self, index: usize) -> Option<LineGeometry> {
        self.lines.get(index).copied()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Greedy word wrap by display width. Words wider than `width` are split
/// across rows. Always returns at least one row, so blank lines keep their
/// spacing.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.trim().to_string()];
    }

    let mut rows: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            // Flush and hard-split the oversized word.
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for ch in word.chars() {
                let cw = ch.width().unwrap_or(0);
                if current_width + cw > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += cw;
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed > width {
            rows.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}
