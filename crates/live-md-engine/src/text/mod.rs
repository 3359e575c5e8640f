//! Byte-addressed access to the document text.
//!
//! The engine never owns the buffer. It reads through [`TextSource`], which
//! the xi-rope [`Rope`](xi_rope::Rope) implements. Plain `str` implements it
//! too, rescanning on every line lookup; [`LineIndex`] caches the line starts.

pub mod source;
pub mod span;

pub use source::{Line, LineIndex, TextSource};
pub use span::Span;
