//! Flat pre-order view of the syntax tree.
//!
//! The rowan CST is great for parsing but the decoration walk wants
//! `{kind, span, parent}` triples it can visit in document order, skip whole
//! subtrees of, and climb with an explicit loop. [`Tree`] stores exactly
//! that in an arena. Only named elements (composite nodes and marker tokens)
//! are kept; raw text, whitespace and punctuation never carry decorations.

use live_md_syntax::{SyntaxKind, SyntaxNode};
use rowan::WalkEvent;

use crate::text::Span;

/// Index of a node in its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Arena of nodes in pre-order.
///
/// `subtree_end[i]` is one past the last descendant of node `i`, so the
/// descendants of a node are the contiguous ids `i + 1 .. subtree_end[i]`.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    subtree_end: Vec<usize>,
}

impl Tree {
    /// Parse `text` and build the tree.
    pub fn parse(text: &str) -> Self {
        Self::from_syntax(&live_md_syntax::parse(text))
    }

    pub fn from_syntax(root: &SyntaxNode) -> Self {
        let mut tree = Tree::default();
        let mut stack: Vec<NodeId> = Vec::new();

        for event in root.preorder_with_tokens() {
            match event {
                WalkEvent::Enter(element) => {
                    if !element.kind().is_named() {
                        continue;
                    }
                    let id = NodeId(tree.nodes.len());
                    tree.nodes.push(TreeNode {
                        kind: element.kind(),
                        span: element.text_range().into(),
                        parent: stack.last().copied(),
                    });
                    tree.subtree_end.push(id.0 + 1);
                    stack.push(id);
                }
                WalkEvent::Leave(element) => {
                    if !element.kind().is_named() {
                        continue;
                    }
                    if let Some(id) = stack.pop() {
                        tree.subtree_end[id.0] = tree.nodes.len();
                    }
                }
            }
        }

        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.0].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// All nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Nodes touching `range` (boundaries included) in document order.
    /// Subtrees entirely outside the range are skipped without visiting
    /// their descendants.
    pub fn iter_range(&self, range: Span) -> RangeIter<'_> {
        RangeIter {
            tree: self,
            next: 0,
            range,
        }
    }

    /// Direct children of `id`.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: id.0 + 1,
            end: self.subtree_end[id.0],
        }
    }

    /// Descendants of `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        (id.0 + 1..self.subtree_end[id.0]).map(NodeId)
    }

    /// Nearest proper ancestor of `id` whose kind satisfies `pred`.
    ///
    /// The root never matches: the climb stops once it reaches it.
    pub fn nearest_ancestor(
        &self,
        id: NodeId,
        mut pred: impl FnMut(SyntaxKind) -> bool,
    ) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            let node = self.node(candidate);
            if node.parent.is_none() {
                return None;
            }
            if pred(node.kind) {
                return Some(candidate);
            }
            current = node.parent;
        }
        None
    }

    /// The ancestor-or-self of `id` whose parent is the root.
    pub fn top_level(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if self.parent(parent).is_none() {
                return current;
            }
            current = parent;
        }
        current
    }
}

pub struct RangeIter<'a> {
    tree: &'a Tree,
    next: usize,
    range: Span,
}

impl Iterator for RangeIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while self.next < self.tree.nodes.len() {
            let i = self.next;
            if self.tree.nodes[i].span.touches(self.range) {
                self.next = i + 1;
                return Some(NodeId(i));
            }
            self.next = self.tree.subtree_end[i];
        }
        None
    }
}

pub struct Children<'a> {
    tree: &'a Tree,
    next: usize,
    end: usize,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next >= self.end {
            return None;
        }
        let id = NodeId(self.next);
        self.next = self.tree.subtree_end[self.next];
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SyntaxKind::*;
    use pretty_assertions::assert_eq;

    fn kinds(tree: &Tree, ids: impl Iterator<Item = NodeId>) -> Vec<SyntaxKind> {
        ids.map(|id| tree.kind(id)).collect()
    }

    #[test]
    fn keeps_named_elements_in_preorder() {
        let tree = Tree::parse("*hi* $x$");
        assert_eq!(
            kinds(&tree, tree.iter()),
            vec![
                ROOT,
                PARAGRAPH,
                EMPHASIS,
                EMPHASIS_MARK,
                EMPHASIS_MARK,
                INLINE_MATH,
                MATH_MARK,
                MATH_MARK
            ]
        );
    }

    #[test]
    fn parents_and_spans() {
        let tree = Tree::parse("*hi*");
        let emphasis = NodeId(2);
        let open = NodeId(3);
        assert_eq!(tree.span(emphasis), Span::new(0, 4));
        assert_eq!(tree.span(open), Span::new(0, 1));
        assert_eq!(tree.parent(open), Some(emphasis));
        assert_eq!(tree.parent(NodeId(0)), None);
        assert_eq!(kinds(&tree, tree.children(emphasis)), vec![EMPHASIS_MARK, EMPHASIS_MARK]);
    }

    #[test]
    fn iter_range_skips_subtrees_outside_the_window() {
        let tree = Tree::parse("# One\n\n*two*\n\n`three`\n");
        let visited = kinds(&tree, tree.iter_range(Span::new(7, 12)));
        assert_eq!(visited, vec![ROOT, PARAGRAPH, EMPHASIS, EMPHASIS_MARK, EMPHASIS_MARK]);
    }

    #[test]
    fn iter_range_includes_touching_nodes() {
        let tree = Tree::parse("*a*b");
        let visited = kinds(&tree, tree.iter_range(Span::point(3)));
        assert_eq!(visited, vec![ROOT, PARAGRAPH, EMPHASIS, EMPHASIS_MARK]);
    }

    #[test]
    fn nearest_ancestor_never_matches_root() {
        let tree = Tree::parse("*hi*");
        let open = NodeId(3);
        assert_eq!(tree.nearest_ancestor(open, |k| k == EMPHASIS), Some(NodeId(2)));
        assert_eq!(tree.nearest_ancestor(open, |k| k == ROOT), None);
        assert_eq!(tree.nearest_ancestor(open, |k| k == HEADING), None);
    }

    #[test]
    fn top_level_climbs_to_child_of_root() {
        let tree = Tree::parse("- *a*\n");
        let mark = tree
            .iter()
            .find(|&id| tree.kind(id) == EMPHASIS_MARK)
            .unwrap();
        assert_eq!(tree.kind(tree.top_level(mark)), BULLET_LIST);
        assert_eq!(tree.top_level(NodeId(0)), NodeId(0));
    }

    #[test]
    fn descendants_are_contiguous() {
        let tree = Tree::parse("> a *b*\n\nc");
        let quote = tree.iter().find(|&id| tree.kind(id) == BLOCK_QUOTE).unwrap();
        assert_eq!(
            kinds(&tree, tree.descendants(quote)),
            vec![QUOTE_MARK, EMPHASIS, EMPHASIS_MARK, EMPHASIS_MARK]
        );
    }
}
