//! Decoration records handed to the edit surface.
//!
//! Four kinds, matching what an editor view can apply:
//!
//! - [`DecorationKind::Hide`] - render nothing for the range
//! - [`DecorationKind::Mark`] - attach a class to the range
//! - [`DecorationKind::Line`] - attach a class to the line starting at the
//!   (zero-width) span
//! - [`DecorationKind::Widget`] - render a [`Preview`] instead of, or after,
//!   the range

use std::borrow::Cow;

use crate::payload::Preview;
use crate::text::Span;

/// Class applied to a hidden range.
pub const HIDDEN_CLASS: &str = "cm-mark-hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkStyle {
    /// Markup that collapses when the cursor leaves its construct.
    ToHide,
    /// The `#` run plus the gap after it.
    HeaderMark { level: u8 },
    Heading(u8),
    InlineCode,
    Emphasis,
    Strong,
    Link,
    Strikethrough,
    Subscript,
    Superscript,
    FencedCode,
    /// Fence delimiters and the info string; never hidden.
    CodeFence,
    ListMark,
    TaskMarker { checked: bool },
    MathInline,
    MathBlock,
    Tag,
}

impl MarkStyle {
    pub fn class(&self) -> Cow<'static, str> {
        match self {
            MarkStyle::ToHide => "cm-mark-to-hide".into(),
            MarkStyle::HeaderMark { level } => format!("cm-mark-header-mark-{level}").into(),
            MarkStyle::Heading(level) => format!("cm-mark-heading-{level}").into(),
            MarkStyle::InlineCode => "cm-mark-inlinecode".into(),
            MarkStyle::Emphasis => "cm-mark-emphasis".into(),
            MarkStyle::Strong => "cm-mark-strongemphasis".into(),
            MarkStyle::Link => "cm-mark-link".into(),
            MarkStyle::Strikethrough => "cm-mark-strikethrough".into(),
            MarkStyle::Subscript => "cm-mark-subscript".into(),
            MarkStyle::Superscript => "cm-mark-superscript".into(),
            MarkStyle::FencedCode => "cm-mark-fencedcode".into(),
            MarkStyle::CodeFence => "cm-mark-code".into(),
            MarkStyle::ListMark => "cm-mark-list".into(),
            MarkStyle::TaskMarker { .. } => "cm-mark-task".into(),
            MarkStyle::MathInline => "cm-mark-math-inline".into(),
            MarkStyle::MathBlock => "cm-mark-math-block".into(),
            MarkStyle::Tag => "cm-mark-tag".into(),
        }
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            MarkStyle::TaskMarker { checked } => vec![("data-checked", checked.to_string())],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LineClass {
    CodeLine,
    /// First line of a fenced block, carrying its language tag.
    CodeStart { language: String },
    CodeEnd,
    BulletList,
    OrderedList,
    ListStart,
    ListEnd,
    /// The selection sits inside the list.
    ListFocused,
    Blockquote,
    BlockquoteStart,
    BlockquoteEnd,
    /// Interior line of a collapsed math block.
    HiddenLine,
}

impl LineClass {
    pub fn class(&self) -> &'static str {
        match self {
            LineClass::CodeLine => "cm-fenced-code-line",
            LineClass::CodeStart { .. } => "cm-fenced-code-start-line",
            LineClass::CodeEnd => "cm-fenced-code-end-line",
            LineClass::BulletList => "cm-bullet-list-line",
            LineClass::OrderedList => "cm-ordered-list-line",
            LineClass::ListStart => "cm-list-start-line",
            LineClass::ListEnd => "cm-list-end-line",
            LineClass::ListFocused => "cm-list-focused-line",
            LineClass::Blockquote => "cm-blockquote-line",
            LineClass::BlockquoteStart => "cm-blockquote-start-line",
            LineClass::BlockquoteEnd => "cm-blockquote-end-line",
            LineClass::HiddenLine => "cm-hidden-line",
        }
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            LineClass::CodeStart { language } => vec![("data-lang", language.clone())],
            _ => Vec::new(),
        }
    }
}

/// Where a widget goes relative to its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// The widget stands in for the span's text.
    Replace,
    /// The widget is inserted at the end of the span; the text stays.
    After,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub preview: Preview,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    Hide,
    Mark(MarkStyle),
    Line(LineClass),
    Widget(Widget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub span: Span,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn hide(span: Span) -> Self {
        Self {
            span,
            kind: DecorationKind::Hide,
        }
    }

    pub fn mark(span: Span, style: MarkStyle) -> Self {
        Self {
            span,
            kind: DecorationKind::Mark(style),
        }
    }

    /// Line decoration anchored at `line_start`.
    pub fn line(line_start: usize, class: LineClass) -> Self {
        Self {
            span: Span::point(line_start),
            kind: DecorationKind::Line(class),
        }
    }

    pub fn widget(span: Span, preview: Preview, placement: Placement) -> Self {
        Self {
            span,
            kind: DecorationKind::Widget(Widget { preview, placement }),
        }
    }

    /// CSS class for hide/mark/line decorations.
    pub fn class(&self) -> Option<Cow<'static, str>> {
        match &self.kind {
            DecorationKind::Hide => Some(HIDDEN_CLASS.into()),
            DecorationKind::Mark(style) => Some(style.class()),
            DecorationKind::Line(class) => Some(class.class().into()),
            DecorationKind::Widget(_) => None,
        }
    }
}

/// Decorations ordered by start offset; equal starts keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn new(mut decorations: Vec<Decoration>) -> Self {
        // sort_by_key is stable
        decorations.sort_by_key(|d| d.span.start);
        Self { decorations }
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn hidden_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.iter()
            .filter(|d| d.kind == DecorationKind::Hide)
            .map(|d| d.span)
    }

    /// True if a hide decoration covers exactly `span`.
    pub fn hides(&self, span: Span) -> bool {
        self.hidden_spans().any(|s| s == span)
    }

    pub fn widgets(&self) -> impl Iterator<Item = (Span, &Widget)> + '_ {
        self.iter().filter_map(|d| match &d.kind {
            DecorationKind::Widget(widget) => Some((d.span, widget)),
            _ => None,
        })
    }

    pub fn marks(&self) -> impl Iterator<Item = (Span, MarkStyle)> + '_ {
        self.iter().filter_map(|d| match d.kind {
            DecorationKind::Mark(style) => Some((d.span, style)),
            _ => None,
        })
    }

    /// Line decorations as `(line start, class)`.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &LineClass)> + '_ {
        self.iter().filter_map(|d| match &d.kind {
            DecorationKind::Line(class) => Some((d.span.start, class)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for DecorationSet {
    type Item = Decoration;
    type IntoIter = std::vec::IntoIter<Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.into_iter()
    }
}
