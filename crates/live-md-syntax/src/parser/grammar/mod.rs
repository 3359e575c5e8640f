//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to inspect
//! tokens, consume them, and build structure via markers.
//!
//! - [`block`] - block-level elements, including the `{% tag %}` block and
//!   `$$` math block extensions
//! - [`inline`] - inline elements, including `$math$`
//!
//! ## Conventions
//!
//! - Blocks end *before* their terminating NEWLINE; the newline belongs to
//!   the parent (ROOT, or the list between two items).
//! - A rule that needs a closing delimiter looks for it first and declines
//!   (leaving the tokens as plain text) when there is none.
//! - Grammar functions never fail: the worst case is a PARAGRAPH of text.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        block::block(p);
    }

    m.complete(p, SyntaxKind::ROOT);
}
