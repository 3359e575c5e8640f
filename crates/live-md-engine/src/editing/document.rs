use log::debug;
use thiserror::Error;
use xi_rope::Rope;

use crate::decorate::compute_decorations;
use crate::decoration::{DecorationSet, Widget};
use crate::editing::commands::{Cmd, compile_command, transform_selection};
use crate::editing::Patch;
use crate::export::ExportedNode;
use crate::options::DecorationOptions;
use crate::render::PreviewRenderer;
use crate::selection::Selection;
use crate::text::Span;
use crate::tree::Tree;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("edit range {start}..{end} is outside the document (length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// What changed since decorations were last computed. Decorations depend on
/// nothing else, so an update with no flag set is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewUpdate {
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub selection_set: bool,
}

impl ViewUpdate {
    pub fn doc_changed() -> Self {
        Self {
            doc_changed: true,
            ..Self::default()
        }
    }

    pub fn viewport_changed() -> Self {
        Self {
            viewport_changed: true,
            ..Self::default()
        }
    }

    pub fn selection_set() -> Self {
        Self {
            selection_set: true,
            ..Self::default()
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            doc_changed: self.doc_changed || other.doc_changed,
            viewport_changed: self.viewport_changed || other.viewport_changed,
            selection_set: self.selection_set || other.selection_set,
        }
    }

    pub fn is_relevant(&self) -> bool {
        self.doc_changed || self.viewport_changed || self.selection_set
    }
}

/// An editable Markdown document and its current decorations.
///
/// ## Ownership
/// - **`buffer`**: the only copy of the text; edits arrive as [`Cmd`]s
/// - **`tree`**: re-parsed from the buffer after every edit
/// - **`decorations`**: recomputed by [`LiveDocument::update`] for the
///   current selection and viewport
pub struct LiveDocument {
    buffer: Rope,
    tree: Tree,
    selection: Selection,
    /// Visible byte ranges; `None` decorates the whole document
    viewport: Option<Vec<Span>>,
    version: u64,
    options: DecorationOptions,
    decorations: DecorationSet,
    exported: Vec<ExportedNode>,
}

impl LiveDocument {
    pub fn new(text: &str) -> Self {
        Self::with_options(text, DecorationOptions::default())
    }

    /// Create a document from raw bytes, cursor at the end.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn with_options(text: &str, options: DecorationOptions) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        let mut doc = Self {
            tree: Tree::parse(text),
            buffer,
            selection: Selection::cursor(len),
            viewport: None,
            version: 0,
            options,
            decorations: DecorationSet::default(),
            exported: Vec::new(),
        };
        doc.recompute();
        doc
    }

    /// Exact bytes of the document
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn options(&self) -> &DecorationOptions {
        &self.options
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Nodes walked by the last decoration pass, in walk order
    pub fn exported_nodes(&self) -> &[ExportedNode] {
        &self.exported
    }

    /// Apply an edit.
    ///
    /// 1. Validate the range against the buffer
    /// 2. Compile the command to a Delta and apply it
    /// 3. Re-parse the new text
    /// 4. Carry the selection through the edit
    ///
    /// Decorations are left alone until the caller passes
    /// [`ViewUpdate::doc_changed`] to [`LiveDocument::update`].
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, DocumentError> {
        let range = cmd.range();
        let len = self.buffer.len();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        for offset in [range.start, range.end] {
            if !self.buffer.is_codepoint_boundary(offset) {
                return Err(DocumentError::NotCharBoundary(offset));
            }
        }

        let delta = compile_command(len, &cmd);
        self.buffer = delta.apply(&self.buffer);
        self.tree = Tree::parse(&self.buffer.to_string());

        let new_selection = transform_selection(self.selection, &cmd).clamp(self.buffer.len());
        self.selection = new_selection;
        self.version += 1;

        let changed = if cmd.inserted().is_empty() {
            Vec::new()
        } else {
            vec![range.start..range.start + cmd.inserted().len()]
        };
        debug!(
            "applied {:?} at {}..{} (version {})",
            cmd_name(&cmd),
            range.start,
            range.end,
            self.version
        );

        Ok(Patch {
            changed,
            new_selection,
            version: self.version,
        })
    }

    /// Move the selection; it is clamped to the document.
    pub fn set_selection(&mut self, selection: Selection) -> ViewUpdate {
        let selection = selection.clamp(self.buffer.len());
        if selection == self.selection {
            return ViewUpdate::default();
        }
        self.selection = selection;
        ViewUpdate::selection_set()
    }

    /// Restrict decoration to these ranges, or to the whole document with `None`.
    pub fn set_viewport(&mut self, viewport: Option<Vec<Span>>) -> ViewUpdate {
        if viewport == self.viewport {
            return ViewUpdate::default();
        }
        self.viewport = viewport;
        ViewUpdate::viewport_changed()
    }

    /// Recompute decorations if the update touches anything they depend on.
    /// Returns whether they were recomputed.
    pub fn update(&mut self, update: ViewUpdate) -> bool {
        if !update.is_relevant() {
            return false;
        }
        self.recompute();
        true
    }

    /// Click on a rendered preview: select the source it came from.
    pub fn activate<R: PreviewRenderer>(&mut self, renderer: &R, handle: &R::Handle) -> ViewUpdate {
        self.set_selection(renderer.on_activate(handle))
    }

    /// First widget whose source span contains `offset`, boundaries included.
    pub fn widget_at(&self, offset: usize) -> Option<(Span, &Widget)> {
        self.decorations
            .widgets()
            .find(|(span, _)| span.start <= offset && offset <= span.end)
    }

    fn recompute(&mut self) {
        let visible = match &self.viewport {
            Some(ranges) => ranges.clone(),
            None => vec![Span::new(0, self.buffer.len())],
        };
        let mut exported = Vec::new();
        let mut sink = |nodes: &[ExportedNode]| exported = nodes.to_vec();
        self.decorations = compute_decorations(
            &visible,
            &self.tree,
            &self.buffer,
            self.selection,
            &self.options,
            Some(&mut sink),
        );
        self.exported = exported;
    }
}

fn cmd_name(cmd: &Cmd) -> &'static str {
    match cmd {
        Cmd::InsertText { .. } => "insert",
        Cmd::DeleteRange { .. } => "delete",
        Cmd::ReplaceRange { .. } => "replace",
    }
}
