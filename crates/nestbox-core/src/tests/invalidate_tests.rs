use super::*;
use crate::test_support::{stack_with_leaves, StackGroup};
use nestbox_layout::{LayoutIntent, Padding};

fn nested_tree() -> (LayoutTree, NodeId, NodeId, NodeId) {
    let mut tree = LayoutTree::new();
    let (root, _, _) = stack_with_leaves(&mut tree, 100, &[]);
    let group = tree.create_node(LayoutIntent::wrap_content(), StackGroup::default());
    let leaf = tree.create_leaf(LayoutIntent::fixed(10, 10));
    tree.add_child(group, leaf).expect("attach leaf");
    tree.add_child(root, group).expect("attach group");
    tree.perform_traversal(100, 100).expect("traversal");
    tree.take_dirty_region();
    tree.reset_stats();
    (tree, root, group, leaf)
}

#[test]
fn request_layout_walks_to_the_root_once() {
    let (mut tree, root, group, leaf) = nested_tree();
    tree.request_layout(leaf);
    assert_eq!(tree.stats().request_walk_steps, 3);
    assert!(tree.is_layout_requested(group));
    assert!(tree.is_layout_requested(root));
    assert!(tree.needs_traversal());

    tree.request_layout(leaf);
    assert_eq!(tree.stats().request_walk_steps, 4);
}

#[test]
fn request_layout_clears_caches_along_the_walk() {
    let (mut tree, _, group, leaf) = nested_tree();
    assert!(tree.node(group).map_or(0, |node| node.cached_measurements()) > 0);
    tree.request_layout(leaf);
    assert_eq!(tree.node(leaf).map(|node| node.cached_measurements()), Some(0));
    assert_eq!(tree.node(group).map(|node| node.cached_measurements()), Some(0));
}

#[test]
fn invalidate_leaves_measurement_state_alone() {
    let (mut tree, root, _, leaf) = nested_tree();
    tree.invalidate(leaf);
    assert!(!tree.is_layout_requested(leaf));
    assert!(!tree.is_layout_requested(root));
    assert!(tree.node(leaf).map_or(0, |node| node.cached_measurements()) > 0);
    assert!(tree.flags(leaf).contains(NodeFlags::DIRTY));
    assert_eq!(tree.dirty_region(), Some(Rect::new(0, 0, 10, 10)));
}

#[test]
fn request_layout_does_not_touch_the_dirty_region() {
    let (mut tree, _, _, leaf) = nested_tree();
    tree.request_layout(leaf);
    assert_eq!(tree.take_dirty_region(), None);
}

#[test]
fn dirty_rectangles_are_translated_into_root_space() {
    let mut tree = LayoutTree::new();
    let (root, leaves, _) = stack_with_leaves(&mut tree, 100, &[(10, 10)]);
    tree.set_padding(root, Padding::new(20, 30, 0, 0)).expect("padding");
    tree.perform_traversal(100, 100).expect("traversal");
    tree.take_dirty_region();

    tree.invalidate_rect(leaves[0], Rect::new(2, 2, 4, 4));
    tree.invalidate_rect(leaves[0], Rect::new(6, 6, 8, 8));
    assert_eq!(tree.take_dirty_region(), Some(Rect::new(22, 32, 28, 38)));
    assert_eq!(tree.take_dirty_region(), None);
}

#[test]
fn dirty_rectangles_are_clipped_to_the_parent() {
    let (mut tree, _, _, leaf) = nested_tree();
    tree.invalidate_rect(leaf, Rect::new(-50, -50, 500, 500));
    assert_eq!(tree.take_dirty_region(), Some(Rect::new(0, 0, 10, 10)));
}

#[test]
fn hidden_nodes_are_not_invalidated() {
    let (mut tree, _, _, leaf) = nested_tree();
    tree.set_visibility(leaf, Visibility::Invisible).expect("hide");
    tree.take_dirty_region();
    tree.mark_drawn(leaf);

    tree.invalidate(leaf);
    assert_eq!(tree.take_dirty_region(), None);
    assert!(tree.flags(leaf).contains(NodeFlags::DRAWN));
}
