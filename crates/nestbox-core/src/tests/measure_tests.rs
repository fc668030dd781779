use super::*;
use crate::test_support::{stack_with_leaves, FixedLeaf};
use crate::{LayoutPhase, LayoutStrategy};
use nestbox_layout::LayoutIntent;

struct Forgetful;

impl LayoutStrategy for Forgetful {
    fn debug_name(&self) -> &'static str {
        "Forgetful"
    }

    fn measure_children(
        &mut self,
        _tree: &mut LayoutTree,
        _node: NodeId,
        _width: SizeConstraint,
        _height: SizeConstraint,
    ) {
    }
}

#[test]
fn unchanged_constraints_do_not_rerun_the_hook() {
    let mut tree = LayoutTree::new();
    let (leaf, measures) = FixedLeaf::new(30, 20);
    let id = tree.create_node(LayoutIntent::wrap_content(), leaf);

    tree.measure(id, SizeConstraint::at_most(100), SizeConstraint::at_most(100));
    assert_eq!(tree.measured_size(id).width, 30);
    assert_eq!(measures.get(), 1);

    tree.measure(id, SizeConstraint::at_most(100), SizeConstraint::at_most(100));
    assert_eq!(tree.measured_size(id).width, 30);
    assert_eq!(measures.get(), 1);
}

#[test]
fn forced_nodes_skip_the_cache() {
    let mut tree = LayoutTree::new();
    let (leaf, measures) = FixedLeaf::new(30, 20);
    let id = tree.create_node(LayoutIntent::wrap_content(), leaf);
    let pair = (SizeConstraint::at_most(100), SizeConstraint::at_most(100));

    tree.measure(id, pair.0, pair.1);
    tree.layout(id, 0, 0, 30, 20);
    tree.request_layout(id);
    assert_eq!(tree.node(id).map(|node| node.cached_measurements()), Some(0));

    tree.measure(id, pair.0, pair.1);
    assert_eq!(measures.get(), 2);
}

#[test]
fn returning_to_a_cached_pair_defers_the_hook_to_layout() {
    let mut tree = LayoutTree::new();
    let (leaf, measures) = FixedLeaf::new(30, 20);
    let id = tree.create_node(LayoutIntent::wrap_content(), leaf);
    let wide = (SizeConstraint::at_most(100), SizeConstraint::at_most(100));
    let narrow = (SizeConstraint::at_most(10), SizeConstraint::at_most(100));

    tree.measure(id, wide.0, wide.1);
    tree.layout(id, 0, 0, 30, 20);
    tree.measure(id, narrow.0, narrow.1);
    assert_eq!(tree.measured_size(id).width, 10);
    tree.layout(id, 0, 0, 10, 20);
    assert_eq!(measures.get(), 2);

    tree.measure(id, wide.0, wide.1);
    assert_eq!(tree.measured_size(id).width, 30);
    assert_eq!(measures.get(), 2);
    assert_eq!(tree.stats().cache_hits, 1);
    assert!(tree
        .flags(id)
        .contains(NodeFlags::MEASURE_NEEDED_BEFORE_LAYOUT));

    tree.layout(id, 0, 0, 30, 20);
    assert_eq!(measures.get(), 3);
    assert!(!tree
        .flags(id)
        .contains(NodeFlags::MEASURE_NEEDED_BEFORE_LAYOUT));
}

#[test]
fn hook_without_dimension_falls_back_to_default_sizing() {
    let mut tree = LayoutTree::new();
    let id = tree.create_node(LayoutIntent::wrap_content(), Forgetful);
    tree.set_min_size(id, nestbox_layout::Size::new(7, 9))
        .expect("min size");

    tree.measure(id, SizeConstraint::unspecified(), SizeConstraint::exactly(40));
    assert_eq!(tree.measured_size(id), nestbox_layout::Size::new(7, 40));
    assert!(tree.flags(id).contains(NodeFlags::MEASURED_DIMENSION_SET));
}

#[test]
fn default_sizing_uses_minimum_only_when_unspecified() {
    let mut tree = LayoutTree::new();
    let id = tree.create_leaf(LayoutIntent::wrap_content());
    tree.set_min_size(id, nestbox_layout::Size::new(12, 12))
        .expect("min size");

    tree.measure(id, SizeConstraint::unspecified(), SizeConstraint::at_most(50));
    assert_eq!(tree.measured_size(id), nestbox_layout::Size::new(12, 50));
}

#[test]
fn phases_follow_measure_layout_and_request() {
    let mut tree = LayoutTree::new();
    let id = tree.create_leaf(LayoutIntent::wrap_content());
    assert_eq!(tree.layout_phase(id), Some(LayoutPhase::NotLaidOut));

    tree.measure(id, SizeConstraint::exactly(10), SizeConstraint::exactly(10));
    assert_eq!(tree.layout_phase(id), Some(LayoutPhase::Measured));

    tree.layout(id, 0, 0, 10, 10);
    assert_eq!(tree.layout_phase(id), Some(LayoutPhase::LaidOut));
    assert!(tree.is_laid_out(id));

    tree.request_layout(id);
    assert_eq!(tree.layout_phase(id), Some(LayoutPhase::NotLaidOut));
    assert_eq!(tree.frame(id), Some(Rect::new(0, 0, 10, 10)));
}

#[test]
fn unchanged_frame_skips_the_layout_hook() {
    let mut tree = LayoutTree::new();
    let (root, _, _) = stack_with_leaves(&mut tree, 50, &[(10, 10)]);
    tree.perform_traversal(50, 50).expect("traversal");
    let hooks = tree.stats().layout_hook_calls;

    tree.layout(root, 0, 0, 50, 50);
    assert_eq!(tree.stats().layout_hook_calls, hooks);
}
