use insta::assert_snapshot;
use live_md_engine::{
    DecorationKind, DecorationOptions, DecorationSet, ExportedNode, LineIndex, Placement, Preview,
    Selection, Span, Tree, compute_decorations,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const NOTES: &str = r#"# Weekly notes

Some *emphasis*, **strong**, `code`, ~~gone~~ and a [link](http://x/y).

- [x] shipped
- [ ] review
  1. nested

> quoted text

![chart](http://x/chart.png "Chart")

Inline $a^2+b^2$ math.

$$
\int_0^1 x\,dx
$$

```rust
fn main() {}
```

<div><span>raw</span></div>

Inline <b>bold</b> markup.

{% note %}
"#;

fn decorate_range(doc: &str, visible: &[Span], selection: Selection) -> DecorationSet {
    let tree = Tree::parse(doc);
    compute_decorations(
        visible,
        &tree,
        &LineIndex::new(doc),
        selection,
        &DecorationOptions::default(),
        None,
    )
}

fn decorate(doc: &str, selection: Selection) -> DecorationSet {
    decorate_range(doc, &[Span::new(0, doc.len())], selection)
}

fn cursors(doc: &str) -> impl Iterator<Item = Selection> + '_ {
    (0..=doc.len())
        .filter(|&at| doc.is_char_boundary(at))
        .map(Selection::cursor)
}

#[test]
fn same_inputs_give_same_decorations() {
    for selection in cursors(NOTES).step_by(7) {
        assert_eq!(decorate(NOTES, selection), decorate(NOTES, selection));
    }
}

#[test]
fn decorations_are_sorted_by_start() {
    for selection in cursors(NOTES).step_by(5) {
        let set = decorate(NOTES, selection);
        let starts: Vec<usize> = set.iter().map(|d| d.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted, "cursor at {}", selection.from());
    }
}

#[test]
fn cursor_is_never_inside_hidden_or_replaced_text() {
    for selection in cursors(NOTES) {
        let at = selection.from();
        let set = decorate(NOTES, selection);
        for decoration in &set {
            let collapsed = match &decoration.kind {
                DecorationKind::Hide => true,
                DecorationKind::Widget(widget) => widget.placement == Placement::Replace,
                _ => false,
            };
            if collapsed {
                let span = decoration.span;
                assert!(
                    !(span.start < at && at < span.end),
                    "cursor {at} inside collapsed {}..{}",
                    span.start,
                    span.end
                );
            }
        }
    }
}

#[test]
fn decorations_stay_inside_visible_ranges() {
    let visible = [Span::new(0, 20), Span::new(120, 200)];
    let set = decorate_range(NOTES, &visible, Selection::cursor(0));
    assert!(!set.is_empty());
    for decoration in &set {
        assert!(
            visible.iter().any(|v| v.contains_span(decoration.span)),
            "{:?} escapes the viewport",
            decoration
        );
    }
}

#[test]
fn block_spanning_two_windows_is_decorated_in_both() {
    let doc = "```\na\nb\nc\nd\ne\n```\n";
    let visible = [Span::new(0, 5), Span::new(12, doc.len())];
    let whole = decorate(doc, Selection::cursor(doc.len()));
    let split = decorate_range(doc, &visible, Selection::cursor(doc.len()));

    let in_view = |at: usize| visible.iter().any(|v| v.start <= at && at <= v.end);
    let expected: Vec<(usize, &str)> = whole
        .lines()
        .filter(|(at, _)| in_view(*at))
        .map(|(at, class)| (at, class.class()))
        .collect();
    let lines: Vec<(usize, &str)> = split.lines().map(|(at, class)| (at, class.class())).collect();
    assert_eq!(lines, expected);
    assert!(lines.contains(&(12, "cm-fenced-code-line")));
    assert!(lines.contains(&(14, "cm-fenced-code-end-line")));

    let blocks: Vec<Span> = split
        .marks()
        .filter(|(_, style)| style.class() == "cm-mark-fencedcode")
        .map(|(span, _)| span)
        .collect();
    assert_eq!(blocks, vec![Span::new(0, 5), Span::new(12, 17)]);
}

#[test]
fn overlapping_visible_ranges_do_not_duplicate() {
    let whole = decorate(NOTES, Selection::cursor(0));
    let split = decorate_range(
        NOTES,
        &[Span::new(0, NOTES.len()), Span::new(10, 40)],
        Selection::cursor(0),
    );
    assert_eq!(split, whole);
}

#[rstest]
#[case::balanced("<div><span>x</span></div>", Some(Span::new(0, 25)))]
#[case::unbalanced("<div><span>x</span>", None)]
fn raw_markup_needs_balanced_tags(#[case] doc: &str, #[case] replaced: Option<Span>) {
    let set = decorate(doc, Selection::cursor(doc.len()));
    let replacements: Vec<Span> = set
        .widgets()
        .filter(|(_, w)| w.placement == Placement::Replace)
        .map(|(span, _)| span)
        .collect();
    assert_eq!(replacements, replaced.into_iter().collect::<Vec<_>>());
}

#[test]
fn block_math_payload_round_trips_content() {
    let doc = "$$\nE=mc^2\n$$";
    let set = decorate(doc, Selection::cursor(0));
    let math = set
        .widgets()
        .find_map(|(_, w)| match &w.preview {
            Preview::Math(math) => Some(math.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(math.content, "E=mc^2");
    assert!(math.display_block);
}

#[test]
fn inline_math_hidden_when_cursor_outside() {
    assert!(decorate("$x$", Selection::cursor(3)).hides(Span::new(0, 3)));
}

#[rstest]
#[case::on_heading(0, false)]
#[case::next_line(8, true)]
fn heading_marker_follows_cursor(#[case] at: usize, #[case] hidden: bool) {
    let set = decorate("# Title\n", Selection::cursor(at));
    assert_eq!(set.hides(Span::new(0, 2)), hidden);
}

#[rstest]
#[case::outside(0, true)]
#[case::inside(10, false)]
fn image_collapses_but_keeps_preview(#[case] at: usize, #[case] hidden: bool) {
    let doc = r#"x ![alt](http://x/y.png "t")"#;
    let set = decorate(doc, Selection::cursor(at));
    assert_eq!(set.hides(Span::new(2, 28)), hidden);

    let previews: Vec<_> = set.widgets().map(|(_, w)| w.preview.clone()).collect();
    assert_eq!(previews.len(), 1);
    let Preview::Image(image) = &previews[0] else {
        panic!("expected an image preview, got {:?}", previews[0]);
    };
    assert_eq!(image.url, "http://x/y.png");
    assert_eq!(image.alt, "alt");
    assert_eq!(image.title.as_deref(), Some("t"));
}

#[test]
fn exported_nodes_follow_walk_order() {
    let doc = "# Title\n\n*a*\n";
    let tree = Tree::parse(doc);
    let mut rows = String::new();
    let mut sink = |nodes: &[ExportedNode]| {
        for node in nodes {
            rows.push_str(&node.display_row().join(" "));
            rows.push('\n');
        }
    };
    compute_decorations(
        &[Span::new(0, doc.len())],
        &tree,
        doc,
        Selection::cursor(0),
        &DecorationOptions::default(),
        Some(&mut sink),
    );
    assert_snapshot!(rows, @r"
    ROOT  0 13
    HEADING ROOT 0 7
    HEADER_MARK HEADING 0 1
    PARAGRAPH ROOT 9 12
    EMPHASIS PARAGRAPH 9 12
    EMPHASIS_MARK EMPHASIS 9 10
    EMPHASIS_MARK EMPHASIS 11 12
    ");
}
