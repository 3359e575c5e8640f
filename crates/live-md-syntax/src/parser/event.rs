//! Flat event stream recorded by the grammar.
//!
//! Grammar rules never touch rowan. They bracket nodes with `Open`/`Close`
//! and record one `Leaf` per tree token; the [`Sink`](super::sink::Sink)
//! replays the stream into a green tree once parsing is done.
//!
//! ```text
//! "$$\nx\n$$"  →  Open(BLOCK_MATH)
//!                   Leaf(MATH_MARK, glued: 2)   "$" "$"
//!                   Leaf(NEWLINE) Leaf(TEXT) Leaf(NEWLINE)
//!                   Leaf(MATH_MARK, glued: 2)
//!                 Close
//! ```
//!
//! A leaf may cover several lexer tokens. The lexer is context-free, so
//! `$$`, a task box or a whole `<div class="x">` only become one marker once
//! the grammar has recognised them.

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Slot reserved by `Parser::start`. Completing the marker turns it into
    /// `Open`; an abandoned slot stays inert.
    Reserved,
    Open(SyntaxKind),
    /// One tree token made of the next `glued` lexer tokens.
    Leaf { kind: SyntaxKind, glued: u32 },
    Close,
}

impl Event {
    /// A leaf for exactly one lexer token.
    pub fn leaf(kind: SyntaxKind) -> Self {
        Event::Leaf { kind, glued: 1 }
    }

    /// A leaf gluing `n` lexer tokens under one kind.
    pub fn glued(kind: SyntaxKind, n: usize) -> Self {
        Event::Leaf {
            kind,
            glued: n as u32,
        }
    }

    /// Lexer tokens this event consumes.
    pub fn raw_len(&self) -> usize {
        match self {
            Event::Leaf { glued, .. } => *glued as usize,
            _ => 0,
        }
    }
}
