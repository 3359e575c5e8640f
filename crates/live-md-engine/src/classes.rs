//! Which node kinds the decoration policy cares about.

use live_md_syntax::SyntaxKind;

/// Constructs that style their content and own markers the cursor can reveal.
pub fn is_inline_mark(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CODE_SPAN
            | SyntaxKind::EMPHASIS
            | SyntaxKind::STRONG
            | SyntaxKind::LINK
            | SyntaxKind::STRIKETHROUGH
            | SyntaxKind::SUBSCRIPT
            | SyntaxKind::SUPERSCRIPT
            | SyntaxKind::HEADING
            | SyntaxKind::BULLET_LIST
            | SyntaxKind::ORDERED_LIST
            | SyntaxKind::BLOCK_QUOTE
    )
}

/// Punctuation that belongs to a construct rather than to the prose.
pub fn is_syntax_marker(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::HARD_BREAK
            | SyntaxKind::EMPHASIS_MARK
            | SyntaxKind::CODE_MARK
            | SyntaxKind::CODE_INFO
            | SyntaxKind::LINK_MARK
            | SyntaxKind::URL
            | SyntaxKind::LINK_TITLE
            | SyntaxKind::LIST_MARK
            | SyntaxKind::TASK_MARKER
            | SyntaxKind::QUOTE_MARK
            | SyntaxKind::HEADER_MARK
            | SyntaxKind::STRIKETHROUGH_MARK
            | SyntaxKind::SUBSCRIPT_MARK
            | SyntaxKind::SUPERSCRIPT_MARK
    )
}

/// Constructs that can be swapped for a rendered preview.
pub fn is_replaceable(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IMAGE
            | SyntaxKind::FENCED_CODE
            | SyntaxKind::BLOCK_MATH
            | SyntaxKind::INLINE_MATH
            | SyntaxKind::HTML_BLOCK
            | SyntaxKind::HTML_TAG
    )
}

/// Ancestors a syntax marker is revealed by.
pub fn is_marker_owner(kind: SyntaxKind) -> bool {
    is_inline_mark(kind) || is_replaceable(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyntaxKind::EMPHASIS, true, false, false)]
    #[case(SyntaxKind::HEADING, true, false, false)]
    #[case(SyntaxKind::HEADER_MARK, false, true, false)]
    #[case(SyntaxKind::TASK_MARKER, false, true, false)]
    #[case(SyntaxKind::BLOCK_MATH, false, false, true)]
    #[case(SyntaxKind::HTML_TAG, false, false, true)]
    #[case(SyntaxKind::MATH_MARK, false, false, false)]
    #[case(SyntaxKind::CUSTOM_TAG, false, false, false)]
    #[case(SyntaxKind::PARAGRAPH, false, false, false)]
    fn classes_are_disjoint(
        #[case] kind: SyntaxKind,
        #[case] inline_mark: bool,
        #[case] marker: bool,
        #[case] replaceable: bool,
    ) {
        assert_eq!(is_inline_mark(kind), inline_mark);
        assert_eq!(is_syntax_marker(kind), marker);
        assert_eq!(is_replaceable(kind), replaceable);
    }
}
