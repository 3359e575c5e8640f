use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use live_md_engine::{
    DecorationOptions, ExportedNode, LiveDocument, Selection, Span, Tree, ViewUpdate,
    compute_decorations,
};
use xi_rope::Rope;
mod common;

fn bench_parse_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("parse", |b| {
        b.iter(|| std::hint::black_box(Tree::parse(std::hint::black_box(&content))));
    });

    group.finish();
}

fn bench_full_document_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorations");
    group.sample_size(10);

    let options = DecorationOptions::default();
    for size in [10, 100] {
        let content = common::generate_markdown_content(size);
        let tree = Tree::parse(&content);
        let rope = Rope::from(content.as_str());
        let visible = [Span::new(0, rope.len())];
        let selection = Selection::cursor(common::offset_in_quarter(&content, 1));

        group.bench_with_input(BenchmarkId::new("full_document", size), &size, |b, _| {
            b.iter(|| {
                std::hint::black_box(compute_decorations(
                    &visible,
                    &tree,
                    &rope,
                    selection,
                    &options,
                    None,
                ))
            });
        });
    }

    group.finish();
}

fn bench_viewport_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorations");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    let tree = Tree::parse(&content);
    let rope = Rope::from(content.as_str());
    let options = DecorationOptions::default();
    let start = common::offset_in_quarter(&content, 2);
    // Roughly one screen of text
    let visible = [Span::new(start, (start + 4_000).min(rope.len()))];

    group.bench_function("viewport_with_export", |b| {
        b.iter(|| {
            let mut exported: Vec<ExportedNode> = Vec::new();
            let mut sink = |nodes: &[ExportedNode]| exported = nodes.to_vec();
            let set = compute_decorations(
                &visible,
                &tree,
                &rope,
                Selection::cursor(start),
                &options,
                Some(&mut sink),
            );
            std::hint::black_box((set, exported))
        });
    });

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("live_document");
    group.sample_size(10);

    let content = common::generate_markdown_content(50);
    group.bench_function("type_and_redecorate", |b| {
        b.iter_batched(
            || LiveDocument::new(&content),
            |mut doc| {
                let at = common::offset_in_quarter(&content, 3);
                for (i, ch) in "typed".chars().enumerate() {
                    doc.apply(live_md_engine::Cmd::InsertText {
                        at: at + i,
                        text: ch.to_string(),
                    })
                    .ok();
                    doc.update(ViewUpdate::doc_changed());
                }
                std::hint::black_box(doc.decorations().len())
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_tree,
    bench_full_document_pass,
    bench_viewport_pass,
    bench_typing
);
criterion_main!(benches);
