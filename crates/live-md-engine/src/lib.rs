//! # live-md-engine
//!
//! The decoration engine behind a live ("what you see") Markdown editor.
//!
//! Given a parsed [`Tree`], the current [`Selection`] and the visible ranges,
//! [`compute_decorations`] decides what to hide, style, line-tag or replace
//! with a rendered preview. Markup is hidden only while the cursor is away
//! from it, so the source stays editable in place.
//!
//! ```text
//! Rope → live_md_syntax::parse → Tree ─┐
//!                 Selection, viewport ─┼→ compute_decorations → DecorationSet
//!                                      └→ NodeSink (walked nodes)
//! DecorationSet widgets → PreviewRenderer → clicks → Selection
//! ```
//!
//! [`editing::LiveDocument`] ties these together for an edit surface.

pub mod classes;
pub mod decorate;
pub mod decoration;
pub mod editing;
pub mod export;
pub mod options;
pub mod payload;
pub mod render;
pub mod resolver;
pub mod selection;
pub mod text;
pub mod tree;

pub use decorate::compute_decorations;
pub use decoration::{
    Decoration, DecorationKind, DecorationSet, HIDDEN_CLASS, LineClass, MarkStyle, Placement,
    Widget,
};
pub use editing::{Cmd, DocumentError, LiveDocument, Patch, ViewUpdate};
pub use export::{ExportedNode, NodeSink};
pub use options::DecorationOptions;
pub use payload::{ImagePayload, MarkupPayload, MathPayload, Preview};
pub use render::{HtmlRenderer, PreviewRenderer, RenderedHtml};
pub use resolver::{ResolveError, ResolvedTag};
pub use selection::Selection;
pub use text::{Line, LineIndex, Span, TextSource};
pub use tree::{NodeId, Tree, TreeNode};
