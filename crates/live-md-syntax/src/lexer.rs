//! # Lexer - Tokenizing Markdown Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token.** Nothing is
//! skipped, which is what lets the decoration layer map tree positions back
//! onto the live buffer byte-for-byte:
//!
//! ```
//! use live_md_syntax::lexer::lex;
//!
//! let input = "Energy is $E=mc^2$.\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are **minimal and context-free**. The lexer doesn't know whether
//! `$` opens inline math or is just a price, or whether `~` starts a fence,
//! strikethrough or subscript; the parser decides and re-labels the token.
//!
//! Single-character punctuation with syntactic meaning gets its own kind:
//! `# > < - * + _ ` ~ ^ $ ! \ [ ] ( )`. Everything else becomes `TEXT`,
//! grouped into runs (so `{%`, `"title"` and `/div` are single TEXT tokens).
//!
//! [`TokenKind`] exists separately from [`SyntaxKind`] because Logos needs
//! its own derive target; [`TokenKind::to_syntax_kind`] converts between them.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// The `#[logos(skip r"")]` attribute means "skip nothing" - we explicitly
/// handle all input rather than letting Logos skip anything.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("^")]
    Caret,

    #[token("$")]
    Dollar,

    #[token("!")]
    Exclaim,

    #[token("\\")]
    Backslash,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("#")]
    Hash,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\s\[\]()<>`*+#~_^$!\\-]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Dollar => SyntaxKind::DOLLAR,
            TokenKind::Exclaim => SyntaxKind::EXCLAIM,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Unrecognized characters (a lone `\r`, exotic spaces) are text
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}
