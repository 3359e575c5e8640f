//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within a line: links, emphasis, code
//! spans, math. Parsing is driven by special characters and always bounded
//! by an `end` token index (the end of the line, or the closing delimiter of
//! an enclosing construct), so nested elements can never run past their
//! parent.
//!
//! | Token | Element |
//! |-------|---------|
//! | `` ` `` | code span |
//! | `*` `_` | emphasis, strong |
//! | `~` | strikethrough (`~~`), subscript (`~`) |
//! | `^` | superscript |
//! | `$` | inline math (`$$` is plain text) |
//! | `!` `[` | image, link |
//! | `<` | raw HTML tag |
//! | `\` | escape, hard break |
//! | trailing spaces | hard break |
//!
//! Every rule checks for its closing delimiter before starting a node. When
//! there is none the opening token is consumed as plain text, so half-typed
//! input like `Some *half done emphasis` still round-trips byte-for-byte.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse inline content until newline or EOF.
pub fn inline_until_newline(p: &mut Parser<'_, '_>) {
    let end = p.line_end();
    inline_until(p, end);
}

/// Parse inline content up to (not including) the token at index `end`.
fn inline_until(p: &mut Parser<'_, '_>, end: usize) {
    while p.position() < end && !p.at_end() {
        inline_element(p, end);
    }
}

/// Parse a single inline element.
fn inline_element(p: &mut Parser<'_, '_>, end: usize) {
    let matched = match p.current() {
        SyntaxKind::BACKTICK => {
            code_span(p, end);
            true
        }
        SyntaxKind::STAR | SyntaxKind::UNDERSCORE => emphasis(p, end),
        SyntaxKind::TILDE => tilde(p, end),
        SyntaxKind::CARET => delimited(
            p,
            end,
            Delimiter {
                width: 1,
                mark: SyntaxKind::SUPERSCRIPT_MARK,
                node: SyntaxKind::SUPERSCRIPT,
                allow_space: false,
            },
        ),
        SyntaxKind::DOLLAR => inline_math(p, end),
        SyntaxKind::EXCLAIM => image(p, end),
        SyntaxKind::LBRACKET => link(p, end),
        SyntaxKind::LT => html_tag(p, end),
        SyntaxKind::BACKSLASH => backslash(p, end),
        SyntaxKind::WHITESPACE => hard_break(p, end),
        _ => false,
    };

    if !matched {
        p.bump();
    }
}

/// Length of the run of `kind` tokens at lookahead `n`, capped at `avail`.
fn run(p: &Parser<'_, '_>, n: usize, kind: SyntaxKind, avail: usize) -> usize {
    let mut i = n;
    while i < avail && p.nth(i) == kind {
        i += 1;
    }
    i - n
}

/// Parse a code span. An unmatched backtick run is consumed as text.
fn code_span(p: &mut Parser<'_, '_>, end: usize) {
    let avail = end - p.position();
    let open = run(p, 0, SyntaxKind::BACKTICK, avail);

    let mut i = open;
    while i < avail {
        if p.nth(i) != SyntaxKind::BACKTICK {
            i += 1;
            continue;
        }
        let close = run(p, i, SyntaxKind::BACKTICK, avail);
        if close == open {
            let m = p.start();
            p.bump_n(open, SyntaxKind::CODE_MARK);
            for _ in open..i {
                p.bump();
            }
            p.bump_n(close, SyntaxKind::CODE_MARK);
            m.complete(p, SyntaxKind::CODE_SPAN);
            return;
        }
        i += close;
    }

    for _ in 0..open {
        p.bump();
    }
}

/// Shape of a symmetric delimiter pair such as `**` ... `**`.
#[derive(Clone, Copy)]
struct Delimiter {
    width: usize,
    mark: SyntaxKind,
    node: SyntaxKind,
    /// Subscript and superscript content may not contain spaces
    allow_space: bool,
}

/// Emphasis (`*a*`, `_a_`) or strong (`**a**`, `__a__`).
fn emphasis(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let kind = p.current();

    // snake_case_words stay text
    if kind == SyntaxKind::UNDERSCORE && p.prev() == SyntaxKind::TEXT {
        return false;
    }

    let strong = Delimiter {
        width: 2,
        mark: SyntaxKind::EMPHASIS_MARK,
        node: SyntaxKind::STRONG,
        allow_space: true,
    };
    let em = Delimiter {
        width: 1,
        node: SyntaxKind::EMPHASIS,
        ..strong
    };

    let avail = end - p.position();
    if run(p, 0, kind, avail) >= 2 && delimited(p, end, strong) {
        return true;
    }
    delimited(p, end, em)
}

/// Strikethrough (`~~a~~`) or subscript (`~a~`).
fn tilde(p: &mut Parser<'_, '_>, end: usize) -> bool {
    if p.nth(1) == SyntaxKind::TILDE {
        return delimited(
            p,
            end,
            Delimiter {
                width: 2,
                mark: SyntaxKind::STRIKETHROUGH_MARK,
                node: SyntaxKind::STRIKETHROUGH,
                allow_space: true,
            },
        );
    }
    delimited(
        p,
        end,
        Delimiter {
            width: 1,
            mark: SyntaxKind::SUBSCRIPT_MARK,
            node: SyntaxKind::SUBSCRIPT,
            allow_space: false,
        },
    )
}

/// Parse a delimited span if its closing delimiter exists before `end`.
fn delimited(p: &mut Parser<'_, '_>, end: usize, delim: Delimiter) -> bool {
    let avail = end - p.position();
    if delim.width >= avail
        || matches!(
            p.nth(delim.width),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
    {
        return false;
    }

    let Some(close) = find_close(p, p.current(), delim, avail) else {
        return false;
    };

    let inner_end = p.position() + close;
    let m = p.start();
    p.bump_n(delim.width, delim.mark);
    inline_until(p, inner_end);
    p.bump_n(delim.width, delim.mark);
    m.complete(p, delim.node);
    true
}

/// Lookahead offset of the closing delimiter for an opener at offset 0.
fn find_close(
    p: &Parser<'_, '_>,
    kind: SyntaxKind,
    delim: Delimiter,
    avail: usize,
) -> Option<usize> {
    // At least one token of content
    let mut i = delim.width + 1;
    while i + delim.width <= avail {
        let current = p.nth(i);
        if current == SyntaxKind::WHITESPACE && !delim.allow_space {
            return None;
        }
        if current != kind {
            i += 1;
            continue;
        }

        let len = run(p, i, kind, avail);
        let fits = if delim.width == 1 {
            len == 1
        } else {
            len >= delim.width
        };
        let left_flanking = p.nth(i - 1) != SyntaxKind::WHITESPACE;
        let intraword =
            kind == SyntaxKind::UNDERSCORE && p.nth(i + delim.width) == SyntaxKind::TEXT;

        if fits && left_flanking && !intraword {
            return Some(i);
        }
        i += len;
    }
    None
}

/// Inline math `$...$` up to the next `$` in the window; `$$` is plain text.
fn inline_math(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let avail = end - p.position();

    if p.nth(1) == SyntaxKind::DOLLAR {
        if avail >= 2 {
            p.bump_n(2, SyntaxKind::TEXT);
            return true;
        }
        return false;
    }

    let Some(close) = (1..avail).find(|&i| p.nth(i) == SyntaxKind::DOLLAR) else {
        return false;
    };

    let m = p.start();
    p.bump_remap(SyntaxKind::MATH_MARK);
    for _ in 1..close {
        p.bump();
    }
    p.bump_remap(SyntaxKind::MATH_MARK);
    m.complete(p, SyntaxKind::INLINE_MATH);
    true
}

/// Lookahead offsets of the `]` and `)` closing a `[...](...)` that opens
/// at offset `open`.
fn link_parts(p: &Parser<'_, '_>, open: usize, avail: usize) -> Option<(usize, usize)> {
    let bracket = matching(p, open, avail, SyntaxKind::LBRACKET, SyntaxKind::RBRACKET)?;
    if p.nth(bracket + 1) != SyntaxKind::LPAREN {
        return None;
    }
    let paren = matching(
        p,
        bracket + 1,
        avail,
        SyntaxKind::LPAREN,
        SyntaxKind::RPAREN,
    )?;
    Some((bracket, paren))
}

fn matching(
    p: &Parser<'_, '_>,
    open: usize,
    avail: usize,
    left: SyntaxKind,
    right: SyntaxKind,
) -> Option<usize> {
    let mut depth = 0usize;
    for i in open..avail {
        match p.nth(i) {
            k if k == left => depth += 1,
            k if k == right => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse an image `![alt](url "title")`.
fn image(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let avail = end - p.position();
    if p.nth(1) != SyntaxKind::LBRACKET {
        return false;
    }
    let Some((bracket, paren)) = link_parts(p, 1, avail) else {
        return false;
    };

    let m = p.start();
    p.bump_n(2, SyntaxKind::LINK_MARK);
    for _ in 2..bracket {
        p.bump();
    }
    p.bump_remap(SyntaxKind::LINK_MARK);
    p.bump_remap(SyntaxKind::LINK_MARK);
    destination(p, paren - bracket - 2);
    p.bump_remap(SyntaxKind::LINK_MARK);
    m.complete(p, SyntaxKind::IMAGE);
    true
}

/// Parse a standard link `[text](url "title")`.
fn link(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let avail = end - p.position();
    let Some((bracket, paren)) = link_parts(p, 0, avail) else {
        return false;
    };

    let text_end = p.position() + bracket;
    let m = p.start();
    p.bump_remap(SyntaxKind::LINK_MARK);
    inline_until(p, text_end);
    p.bump_remap(SyntaxKind::LINK_MARK);
    p.bump_remap(SyntaxKind::LINK_MARK);
    destination(p, paren - bracket - 2);
    p.bump_remap(SyntaxKind::LINK_MARK);
    m.complete(p, SyntaxKind::LINK);
    true
}

/// The `count` tokens between `(` and `)`: a URL, then an optional title.
fn destination(p: &mut Parser<'_, '_>, count: usize) {
    let stop = p.position() + count;

    while p.position() < stop && p.at(SyntaxKind::WHITESPACE) {
        p.bump();
    }

    let mut url = 0;
    while p.position() + url < stop && p.nth(url) != SyntaxKind::WHITESPACE {
        url += 1;
    }
    p.bump_n(url, SyntaxKind::URL);

    while p.position() < stop && p.at(SyntaxKind::WHITESPACE) {
        p.bump();
    }

    let mut title = stop - p.position();
    while title > 0 && p.nth(title - 1) == SyntaxKind::WHITESPACE {
        title -= 1;
    }
    p.bump_n(title, SyntaxKind::LINK_TITLE);

    while p.position() < stop {
        p.bump();
    }
}

/// `/?name/?` where name is an ASCII letter followed by letters, digits or `-`.
fn is_tag_name(text: &str) -> bool {
    let text = text.strip_prefix('/').unwrap_or(text);
    let text = text.strip_suffix('/').unwrap_or(text);
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Number of raw tokens in a raw HTML tag at lookahead `n`, if there is one
/// closing before lookahead `avail`.
pub(super) fn html_tag_len(p: &Parser<'_, '_>, n: usize, avail: usize) -> Option<usize> {
    if p.nth(n) != SyntaxKind::LT
        || p.nth(n + 1) != SyntaxKind::TEXT
        || !is_tag_name(p.nth_text(n + 1))
    {
        return None;
    }

    for i in n + 2..avail {
        match p.nth(i) {
            SyntaxKind::GT => return Some(i - n + 1),
            SyntaxKind::LT => return None,
            _ => {}
        }
    }
    None
}

/// Consume a raw HTML tag as a single `HTML_TAG` token.
pub(super) fn html_tag(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let avail = end - p.position();
    match html_tag_len(p, 0, avail) {
        Some(len) => {
            p.bump_n(len, SyntaxKind::HTML_TAG);
            true
        }
        None => false,
    }
}

/// `\` before a line end is a hard break, before punctuation an escape.
fn backslash(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let avail = end - p.position();

    if avail == 1 && p.nth(1) == SyntaxKind::NEWLINE {
        p.bump_remap(SyntaxKind::HARD_BREAK);
        return true;
    }

    let escapable = !matches!(
        p.nth(1),
        SyntaxKind::TEXT | SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
    );
    if avail >= 2 && escapable {
        p.bump_n(2, SyntaxKind::ESCAPE);
        return true;
    }
    false
}

/// Two or more trailing spaces before a line end.
fn hard_break(p: &mut Parser<'_, '_>, end: usize) -> bool {
    let avail = end - p.position();
    let text = p.current_text();

    if avail == 1
        && p.nth(1) == SyntaxKind::NEWLINE
        && text.len() >= 2
        && text.bytes().all(|b| b == b' ')
    {
        p.bump_remap(SyntaxKind::HARD_BREAK);
        return true;
    }
    false
}
