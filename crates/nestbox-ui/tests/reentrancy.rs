//! Layout requests raised while a pass is running, and the caches that keep
//! repeated passes cheap.

use nestbox_ui::prelude::*;

/// A fixed-size label that grows a sibling leaf the first time it is measured.
struct Grower {
    target: NodeId,
    grown: Size,
    done: bool,
}

impl LayoutStrategy for Grower {
    fn debug_name(&self) -> &'static str {
        "Grower"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        tree.measure_default(node, width, height);
        if self.done {
            return;
        }
        self.done = true;
        if let Some(leaf) = tree.strategy_mut::<ContentLeaf>(self.target) {
            leaf.set_content(self.grown);
        }
        tree.request_layout(self.target);
    }
}

fn column(tree: &mut LayoutTree) -> NodeId {
    let root = tree.create_node(LayoutIntent::fixed(100, 100), LinearLayout::vertical());
    tree.set_root(root).expect("root");
    root
}

fn wrapped_leaf(tree: &mut LayoutTree, parent: NodeId, width: i32, height: i32) -> NodeId {
    let intent = LinearIntent::new(Dimension::WrapContent, Dimension::WrapContent);
    let id = tree.create_node(intent.into(), ContentLeaf::new(width, height));
    tree.add_child(parent, id).expect("attach");
    id
}

#[test]
fn request_from_a_later_sibling_gets_one_extra_pass() {
    let mut tree = LayoutTree::new();
    let root = column(&mut tree);
    let target = wrapped_leaf(&mut tree, root, 50, 10);
    let grower = tree.create_node(
        LinearIntent::new(Dimension::Fixed(50), Dimension::Fixed(10)).into(),
        Grower {
            target,
            grown: Size::new(50, 30),
            done: false,
        },
    );
    tree.add_child(root, grower).expect("attach");

    assert_eq!(tree.perform_traversal(100, 100), Ok(true));

    let stats = tree.stats();
    assert_eq!(stats.queued_requests, 1);
    assert_eq!(stats.extra_passes, 1);
    assert!(!tree.is_in_layout());
    assert!(!tree.needs_traversal());
    assert_eq!(tree.frame(target), Some(Rect::new(0, 0, 50, 30)));
    assert_eq!(tree.frame(grower), Some(Rect::new(0, 30, 50, 40)));
}

#[test]
fn repeated_requests_stop_at_the_first_pending_ancestor() {
    let mut tree = LayoutTree::new();
    let root = column(&mut tree);
    let leaf = wrapped_leaf(&mut tree, root, 50, 10);
    tree.perform_traversal(100, 100).expect("traversal");
    tree.reset_stats();

    tree.request_layout(leaf);
    tree.request_layout(leaf);
    assert_eq!(tree.stats().request_walk_steps, 3);
    assert!(tree.is_layout_requested(root));

    tree.perform_traversal(100, 100).expect("traversal");
    assert_eq!(tree.stats().measure_hook_calls, 2);
    assert!(!tree.is_layout_requested(leaf));
}

#[test]
fn unchanged_constraints_skip_the_measure_hook() {
    let mut tree = LayoutTree::new();
    let root = column(&mut tree);
    let leaf = wrapped_leaf(&mut tree, root, 50, 10);
    tree.perform_traversal(100, 100).expect("traversal");
    tree.reset_stats();

    tree.measure(leaf, SizeConstraint::at_most(100), SizeConstraint::at_most(100));
    assert_eq!(tree.stats().measure_calls, 1);
    assert_eq!(tree.stats().measure_hook_calls, 0);
    assert_eq!(tree.perform_traversal(100, 100), Ok(false));
}

#[test]
fn returning_to_earlier_constraints_is_served_from_cache() {
    let mut tree = LayoutTree::new();
    let root = tree.create_node(
        LayoutIntent::new(Dimension::MatchParent, Dimension::MatchParent),
        LinearLayout::vertical(),
    );
    tree.set_root(root).expect("root");
    let bar = tree.create_node(
        LinearIntent::new(Dimension::MatchParent, Dimension::Fixed(10)).into(),
        ContentLeaf::new(5, 10),
    );
    tree.add_child(root, bar).expect("attach");

    tree.perform_traversal(100, 100).expect("traversal");
    tree.perform_traversal(120, 100).expect("traversal");
    assert_eq!(tree.frame(bar), Some(Rect::new(0, 0, 120, 10)));
    tree.reset_stats();

    tree.perform_traversal(100, 100).expect("traversal");

    assert!(tree.stats().cache_hits >= 1);
    assert_eq!(tree.frame(root), Some(Rect::new(0, 0, 100, 100)));
    assert_eq!(tree.frame(bar), Some(Rect::new(0, 0, 100, 10)));
}

#[test]
fn attaching_during_a_pass_is_applied_afterwards() {
    struct Adopter {
        orphan: NodeId,
    }

    impl LayoutStrategy for Adopter {
        fn debug_name(&self) -> &'static str {
            "Adopter"
        }

        fn measure_children(
            &mut self,
            tree: &mut LayoutTree,
            node: NodeId,
            width: SizeConstraint,
            height: SizeConstraint,
        ) {
            tree.measure_default(node, width, height);
            if let Some(root) = tree.root() {
                if tree.parent(self.orphan).is_none() {
                    tree.add_child(root, self.orphan).expect("queued attach");
                }
            }
        }
    }

    let mut tree = LayoutTree::new();
    let root = column(&mut tree);
    let orphan = tree.create_node(
        LinearIntent::new(Dimension::Fixed(20), Dimension::Fixed(20)).into(),
        ContentLeaf::new(20, 20),
    );
    let adopter = tree.create_node(
        LinearIntent::new(Dimension::Fixed(10), Dimension::Fixed(10)).into(),
        Adopter { orphan },
    );
    tree.add_child(root, adopter).expect("attach");

    tree.perform_traversal(100, 100).expect("traversal");
    assert_eq!(tree.stats().deferred_mutations, 1);
    assert_eq!(tree.children(root), &[adopter, orphan]);
    assert!(tree.needs_traversal());

    tree.perform_traversal(100, 100).expect("traversal");
    assert_eq!(tree.frame(orphan), Some(Rect::new(0, 10, 20, 30)));
}
