//! # live-md-syntax
//!
//! A lossless Markdown syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model, extended with the constructs the live
//! editor decorates: `{% ... %}` tag blocks and `$`/`$$` math.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! - [`lexer`] - context-free tokens; every byte lands in exactly one token
//! - [`parser`] - marker-based grammar emitting events; re-labels raw tokens
//!   into marker tokens (`HEADER_MARK`, `URL`, `MATH_MARK`, ...)
//! - [`parser::sink`] - builds the immutable, cheaply clonable Rowan tree
//!
//! ## Module Structure
//!
//! ```text
//! live-md-syntax/
//! ├── lib.rs           # This file - public API and tree-shape tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens, markers, nodes) + Rowan glue
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, parse()
//!     ├── event.rs     # Event enum (Reserved, Open, Leaf, Close)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Blocks, custom tag block, block math
//!         └── inline.rs# Inline elements, inline math
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use live_md_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("$$\nE=mc^2\n$$");
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "$$\nE=mc^2\n$$");
//!
//! let math = tree.children().next().unwrap();
//! assert_eq!(math.kind(), SyntaxKind::BLOCK_MATH);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    let text = t.text().replace('\n', "\\n");
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        text
                    ));
                }
            }
        }

        result
    }

    #[test]
    fn snapshot_heading() {
        let tree = parse("# Title\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..8
          HEADING@0..7
            HEADER_MARK@0..1 "#"
            WHITESPACE@1..2 " "
            TEXT@2..7 "Title"
          NEWLINE@7..8 "\\n"
        "##);
    }

    #[test]
    fn snapshot_block_math() {
        let tree = parse("$$\nE=mc^2\n$$");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..12
          BLOCK_MATH@0..12
            MATH_MARK@0..2 "$$"
            NEWLINE@2..3 "\\n"
            TEXT@3..7 "E=mc"
            CARET@7..8 "^"
            TEXT@8..9 "2"
            NEWLINE@9..10 "\\n"
            MATH_MARK@10..12 "$$"
        "##);
    }

    #[test]
    fn snapshot_image_in_paragraph() {
        let tree = parse("See ![alt](a.png \"t\")\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..22
          PARAGRAPH@0..21
            TEXT@0..3 "See"
            WHITESPACE@3..4 " "
            IMAGE@4..21
              LINK_MARK@4..6 "!["
              TEXT@6..9 "alt"
              LINK_MARK@9..10 "]"
              LINK_MARK@10..11 "("
              URL@11..16 "a.png"
              WHITESPACE@16..17 " "
              LINK_TITLE@17..20 "\"t\""
              LINK_MARK@20..21 ")"
          NEWLINE@21..22 "\\n"
        "##);
    }

    #[test]
    fn snapshot_custom_tag_and_task_list() {
        let tree = parse("{% note %}\n- [x] done\n");
        assert_snapshot!(format_tree(&tree, 0), @r##"
        ROOT@0..22
          CUSTOM_TAG@0..10
            TEXT@0..2 "{%"
            WHITESPACE@2..3 " "
            TEXT@3..7 "note"
            WHITESPACE@7..8 " "
            TEXT@8..10 "%}"
          NEWLINE@10..11 "\\n"
          BULLET_LIST@11..21
            LIST_ITEM@11..21
              LIST_MARK@11..12 "-"
              WHITESPACE@12..13 " "
              TASK_MARKER@13..16 "[x]"
              WHITESPACE@16..17 " "
              TEXT@17..21 "done"
          NEWLINE@21..22 "\\n"
        "##);
    }

    // === Error tolerance / messy input tests ===
    // Half-finished edits must still produce a valid tree preserving all bytes.

    #[test]
    fn messy_unclosed_constructs_round_trip() {
        let input = r#"# Draft notes

Also see [broken link without url

Some *half done emphasis and $unclosed math

And `unclosed code span

$$
\int_0^1 never closed

<div><span>unbalanced
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
        assert!(
            tree.descendants()
                .all(|n| !matches!(n.kind(), SyntaxKind::BLOCK_MATH | SyntaxKind::INLINE_MATH))
        );
    }

    #[test]
    fn messy_real_world_notes_round_trip() {
        let input = r#"#Meeting Notes 2024-01-15
##Action Items
- [ ] Call about project
- [x] Review PR #123
* mixed bullet style
+ another style
  - nested but inconsistent indent

> half finished blockquote
that continues without >

Price is $5, or $$10 with tax

```python
def broken():
    # oops forgot to close the fence
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "Hello, world!\n",
            "# Heading\n",
            "> Quote\n",
            "- Item\n",
            "```\ncode\n```\n",
            "[link](url)\n",
            "*emphasis*\n",
            "**strong**\n",
            "`code span`\n",
            "$x$\n",
            "$$\nx\n$$\n",
            "{% tag %}\n",
            "<b>bold</b>\n",
            "H~2~O and x^2^ and ~~gone~~\n",
            "line\r\nbreaks\r\n",
        ];

        for input in inputs {
            let tree = parse(input);
            assert_eq!(
                tree.text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}
