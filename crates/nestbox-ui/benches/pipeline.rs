use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nestbox_ui::prelude::*;

const SECTION_COUNT: usize = 4;
const ROWS_PER_SECTION: usize = 64;
const ROWS_PER_SECTION_SAMPLES: &[usize] = &[16, ROWS_PER_SECTION];
const CHAIN_LENGTHS: &[usize] = &[16, 128];
const WINDOW: (i32, i32) = (1080, 1920);

struct PipelineFixture {
    tree: LayoutTree,
    leaves: Vec<NodeId>,
}

impl PipelineFixture {
    /// A column of sections, each a column of rows holding a weighted title
    /// and a wrapped detail.
    fn new(sections: usize, rows_per_section: usize) -> Self {
        let mut tree = LayoutTree::new();
        let mut leaves = Vec::new();
        let root = tree.create_node(
            LayoutIntent::new(Dimension::MatchParent, Dimension::MatchParent),
            LinearLayout::vertical(),
        );
        tree.set_root(root).expect("root");

        for _ in 0..sections {
            let section = tree.create_node(
                LinearIntent::new(Dimension::MatchParent, Dimension::WrapContent).into(),
                LinearLayout::vertical(),
            );
            tree.add_child(root, section).expect("section");
            let heading = tree.create_node(
                LinearIntent::new(Dimension::WrapContent, Dimension::WrapContent).into(),
                ContentLeaf::new(160, 24).with_baseline(18),
            );
            tree.add_child(section, heading).expect("heading");
            leaves.push(heading);

            for row in 0..rows_per_section {
                let line = tree.create_node(
                    LinearIntent::new(Dimension::MatchParent, Dimension::WrapContent).into(),
                    LinearLayout::horizontal(),
                );
                tree.add_child(section, line).expect("row");
                let title = tree.create_node(
                    LinearIntent::new(Dimension::Fixed(0), Dimension::WrapContent)
                        .with_weight(1.0)
                        .into(),
                    ContentLeaf::new(200 + (row as i32 % 7) * 10, 20).with_baseline(15),
                );
                tree.add_child(line, title).expect("title");
                let detail = tree.create_node(
                    LinearIntent::new(Dimension::WrapContent, Dimension::WrapContent).into(),
                    ContentLeaf::new(80, 16).with_baseline(12),
                );
                tree.add_child(line, detail).expect("detail");
                leaves.push(title);
                leaves.push(detail);
            }
        }

        Self { tree, leaves }
    }

    fn traverse(&mut self) -> bool {
        self.tree
            .perform_traversal(WINDOW.0, WINDOW.1)
            .expect("traversal")
    }
}

/// Relative children chained with "below" rules, declared in reverse order.
fn relative_chain(length: usize) -> LayoutTree {
    let mut tree = LayoutTree::new();
    let root = tree.create_node(
        LayoutIntent::new(Dimension::MatchParent, Dimension::WrapContent),
        RelativeLayout::new(),
    );
    tree.set_root(root).expect("root");
    for index in (0..length).rev() {
        let mut rules = RuleSet::new();
        if index > 0 {
            rules = rules.sibling(RelativeVerb::Below, &format!("item{}", index - 1));
        }
        let child = tree.create_node(
            RelativeIntent::new(Dimension::MatchParent, Dimension::WrapContent)
                .with_rules(rules)
                .into(),
            ContentLeaf::new(100, 12),
        );
        tree.add_child(root, child).expect("child");
        tree.set_key(child, Some(AnchorId::new(&format!("item{index}"))))
            .expect("key");
    }
    tree
}

fn node_count(sections: usize, rows_per_section: usize) -> usize {
    1 + sections * (2 + rows_per_section * 3)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_build");
    for &rows_per_section in ROWS_PER_SECTION_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("nodes", node_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                b.iter(|| black_box(PipelineFixture::new(SECTION_COUNT, rows_per_section)));
            },
        );
    }
    group.finish();
}

fn bench_full_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_full_traversal");
    for &rows_per_section in ROWS_PER_SECTION_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("nodes", node_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                let mut fixture = PipelineFixture::new(SECTION_COUNT, rows_per_section);
                fixture.traverse();
                let mut rtl = false;

                b.iter(|| {
                    // A direction flip forces every node through its measure hook.
                    rtl = !rtl;
                    let direction = if rtl {
                        LayoutDirection::Rtl
                    } else {
                        LayoutDirection::Ltr
                    };
                    fixture.tree.set_layout_direction(direction);
                    black_box(fixture.traverse());
                });
            },
        );
    }
    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_incremental");
    for &rows_per_section in ROWS_PER_SECTION_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("nodes", node_count(SECTION_COUNT, rows_per_section)),
            &rows_per_section,
            |b, &rows_per_section| {
                let mut fixture = PipelineFixture::new(SECTION_COUNT, rows_per_section);
                fixture.traverse();
                let leaf = fixture.leaves[fixture.leaves.len() / 2];

                b.iter(|| {
                    fixture.tree.request_layout(leaf);
                    black_box(fixture.traverse());
                });
            },
        );
    }
    group.finish();
}

fn bench_relative_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("relative_chain");
    for &length in CHAIN_LENGTHS {
        group.bench_with_input(BenchmarkId::new("children", length), &length, |b, &length| {
            let mut tree = relative_chain(length);
            tree.perform_traversal(WINDOW.0, WINDOW.1).expect("traversal");
            let root = tree.root().expect("root");
            let first = tree.children(root)[0];

            b.iter(|| {
                // Replacing an intent marks the hierarchy dirty and forces a re-sort.
                let intent = tree.intent(first).cloned().expect("intent");
                tree.set_intent(first, intent).expect("intent");
                black_box(tree.perform_traversal(WINDOW.0, WINDOW.1).expect("traversal"));
            });
        });
    }
    group.finish();
}

criterion_group!(
    pipeline,
    bench_build,
    bench_full_traversal,
    bench_incremental,
    bench_relative_sort
);
criterion_main!(pipeline);
