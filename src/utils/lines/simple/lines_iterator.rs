use super::{prefix, simple_prefix, Row, Span};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Generates rows of text in constrained width.
///
/// Works on a single `&str`; returned rows are offsets into it.
/// Hard breaks on `\n`, soft breaks between words.
pub struct LinesIterator<'a> {
    content: &'a str,
    width: usize,
    /// Byte offset of the next row. One past the end once exhausted.
    offset: usize,
}

impl<'a> LinesIterator<'a> {
    /// Creates a new iterator with the given content and width.
    pub fn new(content: &'a str, width: usize) -> Self {
        LinesIterator {
            content,
            width,
            offset: 0,
        }
    }
}

impl<'a> Iterator for LinesIterator<'a> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.offset >= self.content.len() {
            return None;
        }

        let start = self.offset;
        let content = &self.content[start..];
        let line_end = content.find('\n').unwrap_or_else(|| content.len());
        let line = &content[..line_end];

        if line.is_empty() {
            // An empty line still takes a row.
            self.offset = start + 1;
            return Some(Row {
                start,
                end: start,
                width: 0,
            });
        }

        if line.width() <= self.width {
            self.offset = start + line_end + 1;
            return Some(Row {
                start,
                end: start + line_end,
                width: line.width(),
            });
        }

        // The line is too wide; break it on word boundaries.
        let mut span = prefix(line.split(' '), self.width, " ");
        if span.length == 0 {
            // The first word doesn't fit; break inside it.
            span = simple_prefix(line, self.width);
        }
        if span.length == 0 {
            // Cannot fit even one grapheme. Take one anyway so we keep
            // making progress.
            let grapheme = line.graphemes(true).next().unwrap();
            span = Span {
                length: grapheme.len(),
                width: grapheme.width(),
            };
        }

        let end = start + span.length;
        self.offset = end;
        if self.content[end..].starts_with(' ') {
            // Skip the space we broke on.
            self.offset += 1;
        }

        Some(Row {
            start,
            end,
            width: span.width,
        })
    }
}
