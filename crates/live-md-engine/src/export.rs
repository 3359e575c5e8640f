//! Flattened view of the nodes a decoration pass walked, for inspection
//! panels and tests.

use serde::Serialize;

use crate::text::Span;
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedNode {
    /// Kind name, e.g. `EMPHASIS_MARK`.
    pub name: String,
    pub span: Span,
    /// Kind name of the parent; `None` for the root.
    pub parent: Option<String>,
}

impl ExportedNode {
    pub fn from_tree(tree: &Tree, id: NodeId) -> Self {
        Self {
            name: format!("{:?}", tree.kind(id)),
            span: tree.span(id),
            parent: tree.parent(id).map(|p| format!("{:?}", tree.kind(p))),
        }
    }

    /// `[name, parent, from, to]` as shown in a node table.
    pub fn display_row(&self) -> [String; 4] {
        [
            self.name.clone(),
            self.parent.clone().unwrap_or_default(),
            self.span.start.to_string(),
            self.span.end.to_string(),
        ]
    }
}

/// Receives the walked nodes once per pass.
pub trait NodeSink {
    fn nodes_exported(&mut self, nodes: &[ExportedNode]);
}

impl<F> NodeSink for F
where
    F: FnMut(&[ExportedNode]),
{
    fn nodes_exported(&mut self, nodes: &[ExportedNode]) {
        self(nodes)
    }
}
