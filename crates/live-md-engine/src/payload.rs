//! Preview payload builders.
//!
//! Each builder reads one node's source and produces a renderer-agnostic
//! value. Missing pieces are filled with defaults instead of failing.

use live_md_syntax::SyntaxKind;
use serde::Serialize;

use crate::options::DecorationOptions;
use crate::selection::Selection;
use crate::text::{Span, TextSource};
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    pub url: String,
    pub alt: String,
    pub title: Option<String>,
    pub width: Option<String>,
    pub span: Span,
    /// Source range of the URL, absent when the placeholder is used.
    pub url_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathPayload {
    /// LaTeX without the `$` / `$$` delimiters.
    pub content: String,
    pub display_block: bool,
    pub span: Span,
    pub content_span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupPayload {
    pub html: String,
    pub is_block: bool,
    pub span: Span,
    /// Between the end of the opening tag and the start of the closing tag.
    pub inner_span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Preview {
    Image(ImagePayload),
    Math(MathPayload),
    Markup(MarkupPayload),
}

impl Preview {
    /// Source range the preview stands for.
    pub fn span(&self) -> Span {
        match self {
            Preview::Image(image) => image.span,
            Preview::Math(math) => math.span,
            Preview::Markup(markup) => markup.span,
        }
    }

    /// Selection to set when the rendered preview is clicked: the part of
    /// the source worth editing rather than the whole construct.
    pub fn activation_selection(&self) -> Selection {
        let span = match self {
            Preview::Image(image) => image.url_span.unwrap_or(image.span),
            Preview::Math(math) => math.content_span,
            Preview::Markup(markup) => markup.inner_span.unwrap_or(markup.span),
        };
        Selection::spanning(span)
    }
}

pub fn image_payload<T: TextSource + ?Sized>(
    tree: &Tree,
    id: NodeId,
    text: &T,
    options: &DecorationOptions,
) -> ImagePayload {
    let span = tree.span(id);
    let mut alt_end = None;
    let mut url_span = None;
    let mut title_span = None;

    for child in tree.children(id) {
        let child_span = tree.span(child);
        match tree.kind(child) {
            SyntaxKind::LINK_MARK if alt_end.is_none() && child_span.start > span.start => {
                alt_end = Some(child_span.start);
            }
            SyntaxKind::URL if url_span.is_none() => url_span = Some(child_span),
            SyntaxKind::LINK_TITLE if title_span.is_none() => title_span = Some(child_span),
            _ => {}
        }
    }

    let alt_start = (span.start + 2).min(span.end);
    let alt = alt_end
        .map(|end| text.slice_text(Span::new(alt_start, end)).into_owned())
        .unwrap_or_default();

    let url = url_span
        .map(|s| strip_angle_brackets(&text.slice_text(s)).to_string())
        .filter(|url| !url.is_empty());
    let (url, url_span) = match url {
        Some(url) => (url, url_span),
        None => (options.placeholder_image_url.clone(), None),
    };

    ImagePayload {
        url,
        alt,
        title: title_span.map(|s| unquote(&text.slice_text(s)).to_string()),
        width: options.image_width.clone(),
        span,
        url_span,
    }
}

pub fn math_payload<T: TextSource + ?Sized>(tree: &Tree, id: NodeId, text: &T) -> MathPayload {
    let span = tree.span(id);
    let display_block = tree.kind(id) == SyntaxKind::BLOCK_MATH;

    let mut marks = tree
        .children(id)
        .filter(|&child| tree.kind(child) == SyntaxKind::MATH_MARK)
        .map(|child| tree.span(child));
    let open = marks.next();
    let close = marks.last();

    let content_span = match (open, close) {
        (Some(open), Some(close)) if display_block => block_content(text, open, close),
        (Some(open), Some(close)) => Span::new(open.end, close.start.max(open.end)),
        _ => span,
    };

    MathPayload {
        content: text.slice_text(content_span).into_owned(),
        display_block,
        span,
        content_span,
    }
}

/// Lines strictly between the delimiter lines.
fn block_content<T: TextSource + ?Sized>(text: &T, open: Span, close: Span) -> Span {
    let open_line = text.line_at(open.start);
    let close_line = text.line_at(close.start);

    let start = text
        .line(open_line.number + 1)
        .map_or(close_line.span.start, |line| line.span.start);
    let end = text
        .line(close_line.number.saturating_sub(1))
        .map_or(start, |line| line.span.end);

    if start >= end {
        Span::point(start.min(close_line.span.start))
    } else {
        Span::new(start, end)
    }
}

pub fn markup_payload<T: TextSource + ?Sized>(
    text: &T,
    span: Span,
    inner_span: Option<Span>,
    is_block: bool,
) -> MarkupPayload {
    MarkupPayload {
        html: text.slice_text(span).into_owned(),
        is_block,
        span,
        inner_span,
    }
}

/// Language tag from the first line of a fenced block.
pub fn code_language(first_line: &str, default: &str) -> String {
    let language = first_line.replace(['`', '~'], "");
    let language = language.trim();
    if language.is_empty() {
        default.to_string()
    } else {
        language.to_string()
    }
}

/// Strip one matching pair of `"`, `'` or `(...)`.
fn unquote(title: &str) -> &str {
    let pairs = [('"', '"'), ('\'', '\''), ('(', ')')];
    for (open, close) in pairs {
        if title.len() >= 2 && title.starts_with(open) && title.ends_with(close) {
            return &title[1..title.len() - 1];
        }
    }
    title
}

fn strip_angle_brackets(url: &str) -> &str {
    url.strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(url)
}
