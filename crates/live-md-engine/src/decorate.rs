//! # Decoration pass
//!
//! [`compute_decorations`] walks the visible part of the tree once and
//! decides, node by node, what the editor should hide, style or replace.
//!
//! ## Cursor rules
//!
//! | Node | Cursor outside | Cursor inside |
//! |------|----------------|---------------|
//! | syntax marker (`*`, `` ` ``, `](`, `#` ...) | `to-hide` + hidden | `to-hide` only |
//! | fence delimiters, list marks, task markers | styled | styled |
//! | image | hidden + preview after | source + preview after |
//! | inline math | hidden + preview after | source |
//! | block math | hidden + preview after | source + preview after |
//! | raw markup pair / block | replaced by preview | source |
//!
//! "Inside" for markers means the selection is contained in the construct,
//! boundaries included. For images, math and markup it means the selection
//! overlaps the construct.
//!
//! Every decoration is clipped to each merged visible range it touches, and
//! the result is sorted by start offset with ties kept in walk order.

use std::collections::HashSet;

use live_md_syntax::SyntaxKind;
use log::{debug, trace};

use crate::classes::{is_marker_owner, is_syntax_marker};
use crate::decoration::{Decoration, DecorationSet, LineClass, MarkStyle, Placement};
use crate::export::{ExportedNode, NodeSink};
use crate::options::DecorationOptions;
use crate::payload::{Preview, code_language, image_payload, markup_payload, math_payload};
use crate::resolver::{ConsumedTags, parse_tag, resolve};
use crate::selection::Selection;
use crate::text::span::merge_spans;
use crate::text::{Span, TextSource};
use crate::tree::{NodeId, Tree};

/// Compute every decoration for the `visible` ranges of the document.
///
/// Pure: the same inputs always give the same set. The walked nodes are
/// handed to `sink`, when there is one, after the walk.
pub fn compute_decorations<T: TextSource + ?Sized>(
    visible: &[Span],
    tree: &Tree,
    text: &T,
    selection: Selection,
    options: &DecorationOptions,
    sink: Option<&mut dyn NodeSink>,
) -> DecorationSet {
    let mut pass = Pass::new(tree, text, selection, options);

    let doc = Span::new(0, pass.doc_len);
    pass.windows = merge_spans(visible)
        .into_iter()
        .filter_map(|window| window.clamp_to(doc))
        .collect();

    for window in pass.windows.clone() {
        for id in tree.iter_range(window) {
            if pass.visited.insert(id) {
                pass.exported.push(ExportedNode::from_tree(tree, id));
                pass.visit(id);
            }
        }
    }

    trace!(
        "decoration pass: {} nodes walked, {} decorations, selection {}..{}",
        pass.exported.len(),
        pass.decorations.len(),
        selection.from(),
        selection.to()
    );

    if let Some(sink) = sink {
        sink.nodes_exported(&pass.exported);
    }
    DecorationSet::new(pass.decorations)
}

/// Accumulators for one call of [`compute_decorations`].
struct Pass<'a, T: ?Sized> {
    tree: &'a Tree,
    text: &'a T,
    selection: Selection,
    options: &'a DecorationOptions,
    doc_len: usize,
    /// Merged visible ranges; every decoration is clipped to each of them
    windows: Vec<Span>,
    decorations: Vec<Decoration>,
    exported: Vec<ExportedNode>,
    consumed: ConsumedTags,
    visited: HashSet<NodeId>,
}

impl<'a, T: TextSource + ?Sized> Pass<'a, T> {
    fn new(
        tree: &'a Tree,
        text: &'a T,
        selection: Selection,
        options: &'a DecorationOptions,
    ) -> Self {
        Self {
            tree,
            text,
            selection,
            options,
            doc_len: text.len(),
            windows: Vec::new(),
            decorations: Vec::new(),
            exported: Vec::new(),
            consumed: ConsumedTags::default(),
            visited: HashSet::new(),
        }
    }

    fn push(&mut self, decoration: Decoration) {
        for window in &self.windows {
            if let Some(span) = decoration.span.clamp_to(*window) {
                self.decorations.push(Decoration {
                    span,
                    ..decoration.clone()
                });
            }
        }
    }

    fn mark(&mut self, span: Span, style: MarkStyle) {
        self.push(Decoration::mark(span, style));
    }

    fn line(&mut self, line_start: usize, class: LineClass) {
        self.push(Decoration::line(line_start, class));
    }

    fn visit(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        match self.tree.kind(id) {
            SyntaxKind::CUSTOM_TAG => self.mark(span, MarkStyle::Tag),
            SyntaxKind::HEADING => self.heading(id),
            SyntaxKind::FENCED_CODE => self.fenced_code(id),
            SyntaxKind::BULLET_LIST => self.lines_of(id, LineClass::BulletList),
            SyntaxKind::ORDERED_LIST => self.lines_of(id, LineClass::OrderedList),
            SyntaxKind::BLOCK_QUOTE => self.lines_of(id, LineClass::Blockquote),
            SyntaxKind::IMAGE => self.image(id),
            SyntaxKind::BLOCK_MATH | SyntaxKind::INLINE_MATH => self.math(id),
            SyntaxKind::HTML_BLOCK => self.html_block(id),
            SyntaxKind::HTML_TAG => self.html_tag(id),
            SyntaxKind::CODE_SPAN => self.mark(span, MarkStyle::InlineCode),
            SyntaxKind::EMPHASIS => self.mark(span, MarkStyle::Emphasis),
            SyntaxKind::STRONG => self.mark(span, MarkStyle::Strong),
            SyntaxKind::LINK => self.mark(span, MarkStyle::Link),
            SyntaxKind::STRIKETHROUGH => self.mark(span, MarkStyle::Strikethrough),
            SyntaxKind::SUBSCRIPT => self.mark(span, MarkStyle::Subscript),
            SyntaxKind::SUPERSCRIPT => self.mark(span, MarkStyle::Superscript),
            kind if is_syntax_marker(kind) => self.marker(id),
            _ => {}
        }
    }

    /// Cursor-overlap rule for a syntax marker.
    fn marker(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        let kind = self.tree.kind(id);

        match kind {
            SyntaxKind::LIST_MARK => return self.mark(span, MarkStyle::ListMark),
            SyntaxKind::TASK_MARKER => {
                let checked = self.text.slice_text(span).contains(['x', 'X']);
                return self.mark(span, MarkStyle::TaskMarker { checked });
            }
            _ => {}
        }

        let Some(owner) = self.tree.nearest_ancestor(id, is_marker_owner) else {
            return;
        };

        if matches!(kind, SyntaxKind::CODE_MARK | SyntaxKind::CODE_INFO)
            && self.tree.kind(owner) == SyntaxKind::FENCED_CODE
        {
            return self.mark(span, MarkStyle::CodeFence);
        }

        self.mark(span, MarkStyle::ToHide);

        let hidden = if kind == SyntaxKind::HEADER_MARK {
            // The gap after the `#` run goes with it
            let hidden = span.extend_end(1, self.doc_len);
            let level = heading_level(span);
            self.mark(hidden, MarkStyle::HeaderMark { level });
            hidden
        } else {
            span
        };

        if !self.selection.is_within(self.tree.span(owner)) {
            self.push(Decoration::hide(hidden));
        }
    }

    fn heading(&mut self, id: NodeId) {
        let level = self
            .tree
            .children(id)
            .find(|&child| self.tree.kind(child) == SyntaxKind::HEADER_MARK)
            .map_or(1, |mark| heading_level(self.tree.span(mark)));
        let span = self.tree.span(id).extend_end(1, self.doc_len);
        self.mark(span, MarkStyle::Heading(level));
    }

    fn fenced_code(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        self.mark(span, MarkStyle::FencedCode);

        let first = self.text.line_at(span.start);
        let last = self.text.line_at(span.end);

        for number in first.number + 1..last.number {
            if let Some(line) = self.text.line(number) {
                self.line(line.span.start, LineClass::CodeLine);
            }
        }

        let fence_line = self.text.slice_text(Span::new(span.start, first.span.end));
        let language = code_language(&fence_line, &self.options.default_code_language);
        self.line(first.span.start, LineClass::CodeStart { language });
        self.line(last.span.start, LineClass::CodeEnd);
    }

    /// Per-line classes for lists and blockquotes.
    fn lines_of(&mut self, id: NodeId, class: LineClass) {
        let span = self.tree.span(id);
        let (start_class, end_class) = match class {
            LineClass::Blockquote => (LineClass::BlockquoteStart, LineClass::BlockquoteEnd),
            _ => (LineClass::ListStart, LineClass::ListEnd),
        };
        let focused = class != LineClass::Blockquote && self.selection.is_within(span);

        let first = self.text.line_at(span.start);
        let last = self.text.line_at(span.end);

        for number in first.number..=last.number {
            let Some(line) = self.text.line(number) else {
                break;
            };
            let at = line.span.start;
            self.line(at, class.clone());
            if number == first.number {
                self.line(at, start_class.clone());
            }
            if number == last.number {
                self.line(at, end_class.clone());
            }
            if focused {
                self.line(at, LineClass::ListFocused);
            }
        }
    }

    fn image(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        let payload = image_payload(self.tree, id, self.text, self.options);
        self.push(Decoration::widget(span, Preview::Image(payload), Placement::After));
        if !self.selection.overlaps(span) {
            self.push(Decoration::hide(span));
        }
    }

    fn math(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        let block = self.tree.kind(id) == SyntaxKind::BLOCK_MATH;
        let overlapping = self.selection.overlaps(span);

        let style = if block {
            MarkStyle::MathBlock
        } else {
            MarkStyle::MathInline
        };
        self.mark(span, style);

        if block || !overlapping {
            let payload = math_payload(self.tree, id, self.text);
            self.push(Decoration::widget(span, Preview::Math(payload), Placement::After));
        }

        if !overlapping {
            self.push(Decoration::hide(span));
            if block {
                let first = self.text.line_at(span.start);
                let last = self.text.line_at(span.end);
                for number in first.number + 1..last.number {
                    if let Some(line) = self.text.line(number) {
                        self.line(line.span.start, LineClass::HiddenLine);
                    }
                }
            }
        }
    }

    /// A raw markup block owns its tags; each top-level element in it is
    /// replaced on its own.
    fn html_block(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        let tags: Vec<NodeId> = self
            .tree
            .children(id)
            .filter(|&child| self.tree.kind(child) == SyntaxKind::HTML_TAG)
            .collect();
        for &tag in &tags {
            self.consumed.insert(self.tree.span(tag).start);
        }

        let Some(&first) = tags.first() else {
            return;
        };
        if self.tree.span(first).start != span.start || self.text.slice_text(span).trim().is_empty() {
            return;
        }

        let mut covered_until = span.start;
        for tag in tags {
            let tag_span = self.tree.span(tag);
            if tag_span.start < covered_until {
                continue;
            }
            let Some(info) = parse_tag(&self.text.slice_text(tag_span)) else {
                continue;
            };

            if info.self_closing {
                self.replace_markup(tag_span, None, true);
                covered_until = tag_span.end;
            } else if info.is_opening() {
                match resolve(self.tree, tag, self.text, id, &mut self.consumed) {
                    Ok(resolved) => {
                        self.replace_markup(resolved.span(), Some(resolved.inner()), true);
                        covered_until = resolved.span().end;
                    }
                    Err(err) => {
                        debug!("raw markup block at {}: {err}", tag_span.start);
                        return;
                    }
                }
            }
        }
    }

    /// An inline tag pair inside ordinary content.
    fn html_tag(&mut self, id: NodeId) {
        let span = self.tree.span(id);
        if self.consumed.contains(span.start) {
            return;
        }
        let is_opening = parse_tag(&self.text.slice_text(span)).is_some_and(|tag| tag.is_opening());
        if !is_opening {
            return;
        }

        let scope = self.tree.top_level(id);
        match resolve(self.tree, id, self.text, scope, &mut self.consumed) {
            Ok(resolved) => self.replace_markup(resolved.span(), Some(resolved.inner()), false),
            Err(err) => debug!("raw markup tag at {}: {err}", span.start),
        }
    }

    fn replace_markup(&mut self, target: Span, inner: Option<Span>, is_block: bool) {
        if self.selection.overlaps(target) {
            return;
        }
        let payload = markup_payload(self.text, target, inner, is_block);
        self.push(Decoration::widget(target, Preview::Markup(payload), Placement::Replace));
    }
}

/// Level of a heading from the width of its `#` run.
fn heading_level(mark: Span) -> u8 {
    mark.len().clamp(1, 6) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::DecorationKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn decorate(doc: &str, selection: Selection) -> DecorationSet {
        let tree = Tree::parse(doc);
        compute_decorations(
            &[Span::new(0, doc.len())],
            &tree,
            doc,
            selection,
            &DecorationOptions::default(),
            None,
        )
    }

    fn kinds(set: &DecorationSet) -> Vec<(usize, usize, String)> {
        set.iter()
            .map(|d| {
                let label = match &d.kind {
                    DecorationKind::Hide => "hide".to_string(),
                    DecorationKind::Widget(w) => format!("widget {:?}", w.placement),
                    _ => d.class().map(|c| c.into_owned()).unwrap_or_default(),
                };
                (d.span.start, d.span.end, label)
            })
            .collect()
    }

    #[test]
    fn heading_marker_hidden_with_its_gap_when_cursor_leaves() {
        let doc = "# Title\n";
        let inside = decorate(doc, Selection::cursor(0));
        assert!(!inside.hides(Span::new(0, 2)));
        assert!(inside.marks().any(|(s, m)| s == Span::new(0, 1) && m == MarkStyle::ToHide));

        let outside = decorate(doc, Selection::cursor(8));
        assert!(outside.hides(Span::new(0, 2)));
        assert_eq!(
            kinds(&outside),
            vec![
                (0, 8, "cm-mark-heading-1".to_string()),
                (0, 1, "cm-mark-to-hide".to_string()),
                (0, 2, "cm-mark-header-mark-1".to_string()),
                (0, 2, "hide".to_string()),
            ]
        );
    }

    #[rstest]
    #[case::before(0, true)]
    #[case::at_open(2, false)]
    #[case::inside(4, false)]
    #[case::at_close(7, false)]
    #[case::at_end(8, false)]
    #[case::after(9, true)]
    fn emphasis_markers_follow_the_cursor(#[case] cursor: usize, #[case] hidden: bool) {
        let doc = "a **bo** b";
        let set = decorate(doc, Selection::cursor(cursor));
        assert_eq!(set.hides(Span::new(2, 4)), hidden);
        assert_eq!(set.hides(Span::new(6, 8)), hidden);
        assert!(set.marks().any(|(s, m)| s == Span::new(2, 8) && m == MarkStyle::Strong));
    }

    #[test]
    fn selection_straddling_the_construct_hides_markers() {
        let set = decorate("a *b* c", Selection::new(0, 3));
        assert!(set.hides(Span::new(2, 3)));
        assert!(set.hides(Span::new(4, 5)));
    }

    #[test]
    fn fence_markers_are_never_hidden() {
        let doc = "```rust\nlet a = 1;\nlet b = 2;\n```\n\ntext";
        let set = decorate(doc, Selection::cursor(doc.len()));
        assert_eq!(set.hidden_spans().count(), 0);
        assert_eq!(
            kinds(&set),
            vec![
                (0, 33, "cm-mark-fencedcode".to_string()),
                (0, 0, "cm-fenced-code-start-line".to_string()),
                (0, 3, "cm-mark-code".to_string()),
                (3, 7, "cm-mark-code".to_string()),
                (8, 8, "cm-fenced-code-line".to_string()),
                (19, 19, "cm-fenced-code-line".to_string()),
                (30, 30, "cm-fenced-code-end-line".to_string()),
                (30, 33, "cm-mark-code".to_string()),
            ]
        );
        let language = set.lines().find_map(|(_, class)| match class {
            LineClass::CodeStart { language } => Some(language.clone()),
            _ => None,
        });
        assert_eq!(language.as_deref(), Some("rust"));
    }

    #[test]
    fn fence_without_info_uses_default_language() {
        let set = decorate("```\nx\n```", Selection::cursor(0));
        assert!(set.lines().any(|(at, class)| at == 0
            && *class
                == LineClass::CodeStart {
                    language: "plane".to_string()
                }));
    }

    #[test]
    fn list_lines_and_focus() {
        let doc = "- a\n- [x] b\n\npara";
        let outside = decorate(doc, Selection::cursor(doc.len()));
        let lines: Vec<_> = outside.lines().map(|(at, c)| (at, c.class())).collect();
        assert_eq!(
            lines,
            vec![
                (0, "cm-bullet-list-line"),
                (0, "cm-list-start-line"),
                (4, "cm-bullet-list-line"),
                (4, "cm-list-end-line"),
            ]
        );
        assert!(outside.marks().any(|(s, m)| s == Span::new(6, 9)
            && m == MarkStyle::TaskMarker { checked: true }));
        assert!(outside.marks().any(|(s, m)| s == Span::new(0, 1) && m == MarkStyle::ListMark));
        assert_eq!(outside.hidden_spans().count(), 0);

        let inside = decorate(doc, Selection::cursor(2));
        let focused = inside
            .lines()
            .filter(|(_, c)| **c == LineClass::ListFocused)
            .count();
        assert_eq!(focused, 2);
    }

    #[test]
    fn blockquote_lines() {
        let doc = "> one\n> two\n";
        let set = decorate(doc, Selection::cursor(0));
        let lines: Vec<_> = set.lines().map(|(at, c)| (at, c.class())).collect();
        assert_eq!(
            lines,
            vec![
                (0, "cm-blockquote-line"),
                (0, "cm-blockquote-start-line"),
                (6, "cm-blockquote-line"),
                (6, "cm-blockquote-end-line"),
            ]
        );
    }

    #[test]
    fn image_hidden_unless_cursor_overlaps_but_widget_stays() {
        let doc = "![alt](http://x/y.png \"t\")";
        let outside = decorate(doc, Selection::cursor(0));
        assert!(outside.hides(Span::new(0, 26)));
        let (span, widget) = outside.widgets().next().unwrap();
        assert_eq!(span, Span::new(0, 26));
        assert_eq!(widget.placement, Placement::After);
        match &widget.preview {
            Preview::Image(image) => {
                assert_eq!(image.url, "http://x/y.png");
                assert_eq!(image.alt, "alt");
                assert_eq!(image.title.as_deref(), Some("t"));
            }
            other => panic!("expected image preview, got {other:?}"),
        }

        let inside = decorate(doc, Selection::cursor(10));
        assert!(!inside.hides(Span::new(0, 26)));
        assert_eq!(inside.widgets().count(), 1);
    }

    #[test]
    fn inline_math_collapses_outside_and_opens_inside() {
        let outside = decorate("$x$", Selection::cursor(3));
        assert!(outside.hides(Span::new(0, 3)));
        assert_eq!(outside.widgets().count(), 1);

        let inside = decorate("$x$", Selection::cursor(1));
        assert_eq!(inside.hidden_spans().count(), 0);
        assert_eq!(inside.widgets().count(), 0);
        assert!(inside.marks().any(|(_, m)| m == MarkStyle::MathInline));
    }

    #[test]
    fn block_math_always_previews_and_hides_interior_lines_when_away() {
        let doc = "$$\na\nb\n$$\n\nafter";
        let away = decorate(doc, Selection::cursor(doc.len()));
        assert!(away.hides(Span::new(0, 9)));
        let hidden_lines: Vec<_> = away
            .lines()
            .filter(|(_, c)| **c == LineClass::HiddenLine)
            .map(|(at, _)| at)
            .collect();
        assert_eq!(hidden_lines, vec![3, 5]);

        let editing = decorate(doc, Selection::cursor(4));
        assert_eq!(editing.hidden_spans().count(), 0);
        let (_, widget) = editing.widgets().next().unwrap();
        match &widget.preview {
            Preview::Math(math) => assert_eq!(math.content, "a\nb"),
            other => panic!("expected math preview, got {other:?}"),
        }
    }

    #[test]
    fn balanced_markup_block_is_replaced_whole() {
        let doc = "<div><span>x</span></div>";
        let set = decorate(doc, Selection::cursor(doc.len()));
        let widgets: Vec<_> = set.widgets().collect();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0].0, Span::new(0, 25));
        assert_eq!(widgets[0].1.placement, Placement::Replace);
    }

    #[test]
    fn markup_block_with_several_elements_replaces_each() {
        let doc = "<div>a</div>\n<p>b</p>\n\nafter";
        let set = decorate(doc, Selection::cursor(doc.len()));
        let widgets: Vec<_> = set.widgets().map(|(span, w)| (span, w.placement)).collect();
        assert_eq!(
            widgets,
            vec![
                (Span::new(0, 12), Placement::Replace),
                (Span::new(13, 21), Placement::Replace),
            ]
        );
    }

    #[test]
    fn unbalanced_markup_block_yields_nothing() {
        let doc = "<div><span>x</span>";
        let set = decorate(doc, Selection::cursor(doc.len()));
        assert_eq!(set.widgets().count(), 0);
    }

    #[test]
    fn markup_under_the_cursor_stays_editable() {
        let doc = "<div>x</div>";
        let set = decorate(doc, Selection::cursor(6));
        assert_eq!(set.widgets().count(), 0);
    }

    #[test]
    fn inline_markup_pair_is_replaced_once() {
        let doc = "a <b>x <i>y</i></b> c";
        let set = decorate(doc, Selection::cursor(0));
        let widgets: Vec<_> = set.widgets().map(|(span, w)| (span, w.placement)).collect();
        assert_eq!(widgets, vec![(Span::new(2, 19), Placement::Replace)]);
    }

    #[test]
    fn custom_tag_is_only_styled() {
        let doc = "{% callout type=\"note\" %}\n";
        let set = decorate(doc, Selection::cursor(doc.len()));
        assert_eq!(kinds(&set), vec![(0, 25, "cm-mark-tag".to_string())]);
    }

    #[test]
    fn decorations_are_clipped_to_the_visible_range() {
        let doc = "# One\n\n*two*\n\n# Three\n";
        let tree = Tree::parse(doc);
        let visible = [Span::new(7, 12)];
        let set = compute_decorations(
            &visible,
            &tree,
            doc,
            Selection::cursor(0),
            &DecorationOptions::default(),
            None,
        );
        assert!(!set.is_empty());
        assert!(set.iter().all(|d| visible[0].contains_span(d.span)));
    }

    #[test]
    fn sink_receives_every_walked_node_once() {
        let doc = "*a* $b$";
        let tree = Tree::parse(doc);
        let mut exported = Vec::new();
        let mut sink = |nodes: &[ExportedNode]| exported.extend_from_slice(nodes);
        compute_decorations(
            &[Span::new(0, 3), Span::new(2, doc.len())],
            &tree,
            doc,
            Selection::cursor(0),
            &DecorationOptions::default(),
            Some(&mut sink),
        );
        let names: Vec<_> = exported.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ROOT",
                "PARAGRAPH",
                "EMPHASIS",
                "EMPHASIS_MARK",
                "EMPHASIS_MARK",
                "INLINE_MATH",
                "MATH_MARK",
                "MATH_MARK"
            ]
        );
    }

    #[test]
    fn empty_visible_ranges_produce_nothing() {
        let doc = "*a*";
        let tree = Tree::parse(doc);
        let set = compute_decorations(
            &[],
            &tree,
            doc,
            Selection::cursor(0),
            &DecorationOptions::default(),
            None,
        );
        assert!(set.is_empty());
    }
}
