//! # Parser - Event-Based Tree Construction
//!
//! Transforms the token stream into a syntax tree using the **event-based**
//! architecture from rust-analyzer: grammar rules emit a flat list of
//! [`Event`]s and the [`Sink`] builds the Rowan tree from them afterwards.
//!
//! ```text
//! "$x$"  →  Open(PARAGRAPH)
//!             Open(INLINE_MATH)
//!               Leaf(MATH_MARK) Leaf(TEXT) Leaf(MATH_MARK)
//!             Close
//!           Close
//! ```
//!
//! ## Markers
//!
//! `parser.start()` returns a [`Marker`] that **must** be completed
//! (`marker.complete(p, KIND)`) or abandoned (`marker.abandon(p)`); dropping
//! it otherwise panics. This keeps half-built nodes out of the tree.
//!
//! ## Re-labelling tokens
//!
//! The lexer is context-free, so the grammar re-labels raw tokens once it
//! knows their role: [`Parser::bump_remap`] turns one `HASH` into a
//! `HEADER_MARK`, [`Parser::bump_n`] glues several raw tokens into a single
//! `URL` or `HTML_TAG` token.
//!
//! ## Lookahead
//!
//! Closing delimiters are always found *before* a node is started
//! (`nth`, `line_len`, `line_text`), so an unclosed construct never leaves a
//! partial node behind; it simply stays plain text.
//!
//! ```
//! use live_md_syntax::parse;
//!
//! let tree = parse("# Hello\n");
//! println!("{:#?}", tree);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        Sink::new(self.tokens).finish(self.events)
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Reserved);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Kind of the token just consumed, EOF at the start of input.
    pub fn prev(&self) -> SyntaxKind {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].kind,
            None => SyntaxKind::EOF,
        }
    }

    /// Index of the current token in the stream.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::leaf(kind));
            self.pos += 1;
        }
    }

    /// Consume the current token, recording it as `kind`.
    pub fn bump_remap(&mut self, kind: SyntaxKind) {
        self.bump_n(1, kind);
    }

    /// Consume n tokens as a single composite token.
    pub fn bump_n(&mut self, n: usize, kind: SyntaxKind) {
        if n > 0 && self.pos + n <= self.tokens.len() {
            self.events.push(Event::glued(kind, n));
            self.pos += n;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.nth_text(0)
    }

    /// Check if we're at the start of a line (after newline or at start).
    pub fn at_line_start(&self) -> bool {
        self.pos == 0 || self.prev() == SyntaxKind::NEWLINE
    }

    /// Number of tokens from lookahead `n` up to (not including) the next
    /// NEWLINE or the end of input.
    pub fn line_len(&self, n: usize) -> usize {
        self.tokens
            .iter()
            .skip(self.pos + n)
            .take_while(|t| t.kind != SyntaxKind::NEWLINE)
            .count()
    }

    /// Absolute index of the NEWLINE (or end of input) ending the current line.
    pub fn line_end(&self) -> usize {
        self.pos + self.line_len(0)
    }

    /// Text of the line starting at lookahead `n`, without its terminator.
    pub fn line_text(&self, n: usize) -> String {
        self.tokens
            .iter()
            .skip(self.pos + n)
            .take_while(|t| t.kind != SyntaxKind::NEWLINE)
            .map(|t| t.text)
            .collect()
    }

    /// True if the line starting at lookahead `n` is empty or whitespace.
    pub fn line_is_blank(&self, n: usize) -> bool {
        match self.nth(n) {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => true,
            SyntaxKind::WHITESPACE => {
                matches!(self.nth(n + 1), SyntaxKind::NEWLINE | SyntaxKind::EOF)
            }
            _ => false,
        }
    }

    /// Remaining tokens count.
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }
}

/// A marker for a node being constructed.
///
/// `parser.start()` reserves an event slot and hands back a `Marker`
/// pointing at it. Completing the marker opens the node in that slot;
/// abandoning it drops the slot again.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Index of the reserved slot in the event list
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let slot = &mut p.events[self.pos];
        assert!(matches!(slot, Event::Reserved));
        *slot = Event::Open(kind);
        p.events.push(Event::Close);
    }

    /// Abandon this marker without creating a node.
    ///
    /// The slot is popped when nothing was recorded after it; otherwise it
    /// stays reserved and the Sink skips it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Reserved) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// Parse markdown source into a syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    Parser::new(&tokens).parse()
}
