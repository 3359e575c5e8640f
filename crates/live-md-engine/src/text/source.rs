use std::borrow::Cow;

use xi_rope::{LinesMetric, Rope};

use super::span::Span;

/// A single line of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of the line, without its `\n` / `\r\n` terminator.
    pub span: Span,
}

/// Read access to the document buffer.
///
/// Offsets past the end are clamped to the end; offsets are expected on
/// `char` boundaries.
pub trait TextSource {
    /// Length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text covered by `span`.
    fn slice_text(&self, span: Span) -> Cow<'_, str>;

    /// The line containing `offset`.
    fn line_at(&self, offset: usize) -> Line;

    /// Line by 1-based number, `None` past the last line.
    fn line(&self, number: usize) -> Option<Line>;
}

fn strip_terminator(text: &str) -> usize {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let text = text.strip_suffix('\r').unwrap_or(text);
    text.len()
}

impl TextSource for Rope {
    fn len(&self) -> usize {
        Rope::len(self)
    }

    fn slice_text(&self, span: Span) -> Cow<'_, str> {
        let len = Rope::len(self);
        let end = span.end.min(len);
        let start = span.start.min(end);
        self.slice_to_cow(start..end)
    }

    fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(Rope::len(self));
        let index = self.line_of_offset(offset);
        // line_of_offset is 0-based and always names an existing line
        rope_line(self, index)
    }

    fn line(&self, number: usize) -> Option<Line> {
        let count = self.measure::<LinesMetric>() + 1;
        if number == 0 || number > count {
            return None;
        }
        Some(rope_line(self, number - 1))
    }
}

fn rope_line(rope: &Rope, index: usize) -> Line {
    let start = rope.offset_of_line(index);
    let next = rope.offset_of_line(index + 1).max(start);
    let raw = rope.slice_to_cow(start..next);
    Line {
        number: index + 1,
        span: Span::new(start, start + strip_terminator(&raw)),
    }
}

/// Each lookup scans the text from the start; wrap the text in a
/// [`LineIndex`] when a pass asks for many lines.
impl TextSource for str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn slice_text(&self, span: Span) -> Cow<'_, str> {
        let end = span.end.min(str::len(self));
        let start = span.start.min(end);
        Cow::Borrowed(self.get(start..end).unwrap_or(""))
    }

    fn line_at(&self, offset: usize) -> Line {
        let bytes = self.as_bytes();
        let offset = offset.min(bytes.len());
        let start = bytes[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        let number = bytes[..start].iter().filter(|&&b| b == b'\n').count() + 1;
        let next = bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |i| start + i + 1);
        Line {
            number,
            span: Span::new(start, start + strip_terminator(&self[start..next])),
        }
    }

    fn line(&self, number: usize) -> Option<Line> {
        if number == 0 {
            return None;
        }
        let start = if number == 1 {
            0
        } else {
            self.match_indices('\n').nth(number - 2)?.0 + 1
        };
        Some(self.line_at(start))
    }
}

/// A `str` with its line starts computed once.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of every line start, beginning with 0.
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    fn line_from(&self, index: usize) -> Line {
        let start = self.starts[index];
        let next = self.starts.get(index + 1).copied().unwrap_or(self.text.len());
        Line {
            number: index + 1,
            span: Span::new(start, start + strip_terminator(&self.text[start..next])),
        }
    }
}

impl TextSource for LineIndex<'_> {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn slice_text(&self, span: Span) -> Cow<'_, str> {
        self.text.slice_text(span)
    }

    fn line_at(&self, offset: usize) -> Line {
        let offset = offset.min(self.text.len());
        // starts[0] is 0, so at least one start is <= offset
        let index = self.starts.partition_point(|&start| start <= offset) - 1;
        self.line_from(index)
    }

    fn line(&self, number: usize) -> Option<Line> {
        let index = number.checked_sub(1)?;
        (index < self.starts.len()).then(|| self.line_from(index))
    }
}

impl TextSource for String {
    fn len(&self) -> usize {
        self.as_str().len()
    }

    fn slice_text(&self, span: Span) -> Cow<'_, str> {
        self.as_str().slice_text(span)
    }

    fn line_at(&self, offset: usize) -> Line {
        self.as_str().line_at(offset)
    }

    fn line(&self, number: usize) -> Option<Line> {
        self.as_str().line(number)
    }
}
