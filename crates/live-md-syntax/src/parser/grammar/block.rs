//! Block-level grammar rules.
//!
//! Besides the CommonMark subset (headings, quotes, lists, fences, raw HTML,
//! thematic breaks, paragraphs) this module hosts the two line-oriented
//! extensions:
//!
//! - **custom tag** - a line whose trimmed text is `{% ... %}` becomes one
//!   opaque `CUSTOM_TAG` block spanning the whole line; such a line also
//!   interrupts a running paragraph.
//! - **block math** - a line trimmed to exactly `$$` opens `BLOCK_MATH`, which
//!   runs to the next line trimmed to exactly `$$`. Without a closing line
//!   the rule declines and the lines parse as ordinary paragraphs.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::inline;

/// Parse a block element.
pub fn block(p: &mut Parser<'_, '_>) {
    // Blank lines, and the newline that terminated the previous block
    loop {
        if p.at(SyntaxKind::NEWLINE) {
            p.bump();
        } else if p.at(SyntaxKind::WHITESPACE)
            && matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF)
        {
            p.bump();
        } else {
            break;
        }
    }

    if p.at_end() {
        return;
    }

    // These two own their leading indentation
    if is_custom_tag(p, 0) {
        return custom_tag(p);
    }
    if list_marker(p, 0).is_some() {
        return list(p);
    }

    p.eat(SyntaxKind::WHITESPACE);

    match p.current() {
        SyntaxKind::HASH if heading_level(p, 0).is_some() => heading(p),
        SyntaxKind::GT => blockquote(p),
        SyntaxKind::DOLLAR => match block_math_end(p) {
            Some(end) => block_math(p, end),
            None => paragraph(p),
        },
        SyntaxKind::BACKTICK | SyntaxKind::TILDE if fence_run(p, 0, p.current()) >= 3 => {
            fenced_code(p)
        }
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
            if is_thematic_break(p, 0) =>
        {
            thematic_break(p)
        }
        SyntaxKind::LT if inline::html_tag_len(p, 0, p.line_len(0)).is_some() => html_block(p),
        _ => paragraph(p),
    }
}

/// `{% ... %}` on a line of its own.
fn is_custom_tag(p: &Parser<'_, '_>, n: usize) -> bool {
    let line = p.line_text(n);
    let trimmed = line.trim();
    trimmed.len() >= 4 && trimmed.starts_with("{%") && trimmed.ends_with("%}")
}

fn custom_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let end = p.line_end();
    while p.position() < end {
        p.bump();
    }
    m.complete(p, SyntaxKind::CUSTOM_TAG);
}

/// Lookahead offset of the end of the closing `$$` line, if the current
/// line opens a terminated math block.
fn block_math_end(p: &Parser<'_, '_>) -> Option<usize> {
    if p.line_text(0).trim() != "$$" {
        return None;
    }

    let mut i = p.line_len(0);
    loop {
        if p.nth(i) != SyntaxKind::NEWLINE {
            return None;
        }
        i += 1;
        let len = p.line_len(i);
        if p.line_text(i).trim() == "$$" {
            return Some(i + len);
        }
        i += len;
    }
}

fn block_math(p: &mut Parser<'_, '_>, end_offset: usize) {
    let end = p.position() + end_offset;
    let m = p.start();

    p.bump_n(2, SyntaxKind::MATH_MARK);
    p.eat(SyntaxKind::WHITESPACE);

    while p.position() < end {
        p.bump(); // NEWLINE
        if p.line_end() == end {
            p.eat(SyntaxKind::WHITESPACE);
            p.bump_n(2, SyntaxKind::MATH_MARK);
            p.eat(SyntaxKind::WHITESPACE);
        } else {
            while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
                p.bump();
            }
        }
    }

    m.complete(p, SyntaxKind::BLOCK_MATH);
}

/// Heading level if the line at lookahead `n` is an ATX heading.
fn heading_level(p: &Parser<'_, '_>, n: usize) -> Option<usize> {
    let level = fence_run(p, n, SyntaxKind::HASH);
    let followed_by_gap = matches!(
        p.nth(n + level),
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
    );
    ((1..=6).contains(&level) && followed_by_gap).then_some(level)
}

/// Parse an ATX heading.
fn heading(p: &mut Parser<'_, '_>) {
    let level = heading_level(p, 0).unwrap_or(1);
    let m = p.start();

    p.bump_n(level, SyntaxKind::HEADER_MARK);
    p.eat(SyntaxKind::WHITESPACE);
    inline::inline_until_newline(p);

    m.complete(p, SyntaxKind::HEADING);
}

/// Parse a blockquote.
fn blockquote(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        while p.at(SyntaxKind::GT) {
            p.bump_remap(SyntaxKind::QUOTE_MARK);
            p.eat(SyntaxKind::WHITESPACE);
        }

        inline::inline_until_newline(p);

        // Continue only if the next line is quoted too
        let indent = usize::from(p.nth(1) == SyntaxKind::WHITESPACE);
        if p.at(SyntaxKind::NEWLINE) && p.nth(1 + indent) == SyntaxKind::GT {
            p.bump();
            p.eat(SyntaxKind::WHITESPACE);
        } else {
            break;
        }
    }

    m.complete(p, SyntaxKind::BLOCK_QUOTE);
}

/// A list item marker found by lookahead.
struct ListMarker {
    /// Width in bytes of the indentation before the marker
    indent: usize,
    ordered: bool,
    /// Raw tokens making up the marker (`1)` is two)
    tokens: usize,
}

fn list_marker(p: &Parser<'_, '_>, n: usize) -> Option<ListMarker> {
    let (indent, k) = if p.nth(n) == SyntaxKind::WHITESPACE {
        (p.nth_text(n).len(), n + 1)
    } else {
        (0, n)
    };

    let (ordered, tokens) = match p.nth(k) {
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS => {
            if is_thematic_break(p, k) {
                return None;
            }
            (false, 1)
        }
        SyntaxKind::TEXT if is_ordinal(p.nth_text(k)) => (true, 1),
        SyntaxKind::TEXT if is_digits(p.nth_text(k)) && p.nth(k + 1) == SyntaxKind::RPAREN => {
            (true, 2)
        }
        _ => return None,
    };

    matches!(
        p.nth(k + tokens),
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
    )
    .then_some(ListMarker {
        indent,
        ordered,
        tokens,
    })
}

fn is_digits(text: &str) -> bool {
    (1..=9).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

fn is_ordinal(text: &str) -> bool {
    text.strip_suffix('.').is_some_and(is_digits)
}

/// Parse a list: consecutive items of the same type at the same indentation.
fn list(p: &mut Parser<'_, '_>) {
    let Some(first) = list_marker(p, 0) else {
        return paragraph(p);
    };
    let m = p.start();

    loop {
        list_item(p, first.indent);

        if !p.at(SyntaxKind::NEWLINE) {
            break;
        }
        match list_marker(p, 1) {
            Some(next) if next.indent == first.indent && next.ordered == first.ordered => {
                p.bump();
            }
            _ => break,
        }
    }

    let kind = if first.ordered {
        SyntaxKind::ORDERED_LIST
    } else {
        SyntaxKind::BULLET_LIST
    };
    m.complete(p, kind);
}

/// Parse a list item, including indented continuation lines and nested lists.
fn list_item(p: &mut Parser<'_, '_>, indent: usize) {
    let tokens = list_marker(p, 0).map_or(1, |marker| marker.tokens);
    p.eat(SyntaxKind::WHITESPACE);

    let m = p.start();
    p.bump_n(tokens, SyntaxKind::LIST_MARK);
    p.eat(SyntaxKind::WHITESPACE);

    if is_task_marker(p) {
        p.bump_n(3, SyntaxKind::TASK_MARKER);
    }

    inline::inline_until_newline(p);

    while p.at(SyntaxKind::NEWLINE) {
        if let Some(child) = list_marker(p, 1) {
            if child.indent <= indent {
                break;
            }
            p.bump();
            list(p);
        } else if p.nth(1) == SyntaxKind::WHITESPACE
            && p.nth_text(1).len() > indent
            && !p.line_is_blank(1)
        {
            // Indented continuation of the item text
            p.bump();
            p.bump();
            inline::inline_until_newline(p);
        } else {
            break;
        }
    }

    m.complete(p, SyntaxKind::LIST_ITEM);
}

/// `[ ]`, `[x]` or `[X]` followed by a gap.
fn is_task_marker(p: &Parser<'_, '_>) -> bool {
    let inner = match p.nth(1) {
        SyntaxKind::WHITESPACE => p.nth_text(1) == " ",
        SyntaxKind::TEXT => matches!(p.nth_text(1), "x" | "X"),
        _ => false,
    };
    p.at(SyntaxKind::LBRACKET)
        && inner
        && p.nth(2) == SyntaxKind::RBRACKET
        && matches!(
            p.nth(3),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
}

/// Check if the line at lookahead `n` is a thematic break (---, ***, ___).
fn is_thematic_break(p: &Parser<'_, '_>, n: usize) -> bool {
    let marker = p.nth(n);
    if !matches!(
        marker,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
    ) {
        return false;
    }

    let mut count = 0;
    let mut i = n;
    while !matches!(p.nth(i), SyntaxKind::EOF | SyntaxKind::NEWLINE) {
        match p.nth(i) {
            k if k == marker => count += 1,
            SyntaxKind::WHITESPACE => {}
            _ => return false,
        }
        i += 1;
    }

    count >= 3
}

/// Parse a thematic break.
fn thematic_break(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        p.bump();
    }
    m.complete(p, SyntaxKind::THEMATIC_BREAK);
}

/// Length of the run of `kind` tokens starting at lookahead `n`.
fn fence_run(p: &Parser<'_, '_>, n: usize, kind: SyntaxKind) -> usize {
    let mut i = n;
    while p.nth(i) == kind {
        i += 1;
    }
    i - n
}

/// Parse a fenced code block. An unclosed fence runs to the end of input.
fn fenced_code(p: &mut Parser<'_, '_>) {
    let marker = p.current();
    let open = fence_run(p, 0, marker);
    let m = p.start();

    p.bump_n(open, SyntaxKind::CODE_MARK);
    p.eat(SyntaxKind::WHITESPACE);
    let info = p.line_len(0);
    p.bump_n(info, SyntaxKind::CODE_INFO);

    while p.at(SyntaxKind::NEWLINE) {
        p.bump();

        let indent = usize::from(p.at(SyntaxKind::WHITESPACE));
        let close = fence_run(p, indent, marker);
        let trailing = usize::from(p.nth(indent + close) == SyntaxKind::WHITESPACE);
        if close >= open && p.line_len(0) == indent + close + trailing {
            p.eat(SyntaxKind::WHITESPACE);
            p.bump_n(close, SyntaxKind::CODE_MARK);
            p.eat(SyntaxKind::WHITESPACE);
            break;
        }

        while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
            p.bump();
        }
    }

    m.complete(p, SyntaxKind::FENCED_CODE);
}

/// Parse a raw HTML block: runs until the next blank line.
fn html_block(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        let end = p.line_end();
        while p.position() < end {
            if !inline::html_tag(p, end) {
                p.bump();
            }
        }

        if p.at(SyntaxKind::NEWLINE) && !p.line_is_blank(1) {
            p.bump();
        } else {
            break;
        }
    }

    m.complete(p, SyntaxKind::HTML_BLOCK);
}

/// Whether the line at lookahead `n` starts a block that ends a paragraph.
fn interrupts_paragraph(p: &Parser<'_, '_>, n: usize) -> bool {
    if p.line_is_blank(n) || list_marker(p, n).is_some() {
        return true;
    }
    if p.line_text(n).trim_start().starts_with("{%") {
        return true;
    }

    let k = n + usize::from(p.nth(n) == SyntaxKind::WHITESPACE);
    match p.nth(k) {
        SyntaxKind::HASH => heading_level(p, k).is_some(),
        SyntaxKind::GT => true,
        SyntaxKind::BACKTICK | SyntaxKind::TILDE => fence_run(p, k, p.nth(k)) >= 3,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE => is_thematic_break(p, k),
        _ => false,
    }
}

/// Parse a paragraph (default block).
fn paragraph(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        inline::inline_until_newline(p);

        if !p.at(SyntaxKind::NEWLINE) || interrupts_paragraph(p, 1) {
            break;
        }
        p.bump();
    }

    m.complete(p, SyntaxKind::PARAGRAPH);
}
