use super::*;
use crate::test_support::{stack_with_leaves, StackGroup};

#[test]
fn destroyed_handles_stop_resolving() {
    let mut tree = LayoutTree::new();
    let leaf = tree.create_leaf(LayoutIntent::wrap_content());
    assert!(tree.contains(leaf));

    tree.destroy(leaf).expect("destroy leaf");
    assert!(!tree.contains(leaf));
    assert_eq!(tree.destroy(leaf), Err(LayoutError::StaleNode(leaf)));

    let reused = tree.create_leaf(LayoutIntent::wrap_content());
    assert_eq!(reused.index(), leaf.index());
    assert_ne!(reused.generation(), leaf.generation());
    assert!(!tree.contains(leaf));
}

#[test]
fn destroying_a_group_frees_its_subtree_and_detaches_it() {
    let mut tree = LayoutTree::new();
    let (root, leaves, _) = stack_with_leaves(&mut tree, 100, &[(10, 10)]);
    let group = tree.create_node(LayoutIntent::wrap_content(), StackGroup::default());
    let nested = tree.create_leaf(LayoutIntent::wrap_content());
    tree.add_child(group, nested).expect("attach nested");
    tree.add_child(root, group).expect("attach group");

    tree.destroy(group).expect("destroy group");
    assert!(!tree.contains(nested));
    assert_eq!(tree.children(root), leaves.as_slice());
    assert_eq!(tree.len(), 2);
}

#[test]
fn find_by_key_searches_the_subtree() {
    let mut tree = LayoutTree::new();
    let (root, leaves, _) = stack_with_leaves(&mut tree, 100, &[(10, 10), (20, 20)]);
    tree.set_key(leaves[1], Some(AnchorId::new("second")))
        .expect("set key");

    assert_eq!(
        tree.find_by_key(root, &AnchorId::new("second")),
        Some(leaves[1])
    );
    assert_eq!(tree.find_by_key(root, &AnchorId::new("missing")), None);
}

#[test]
fn strategy_downcasts_to_the_concrete_type() {
    let mut tree = LayoutTree::new();
    let (root, leaves, _) = stack_with_leaves(&mut tree, 100, &[(10, 10)]);
    assert!(tree.strategy::<StackGroup>(root).is_some());
    assert!(tree.strategy::<StackGroup>(leaves[0]).is_none());
}

#[test]
fn frame_is_unavailable_before_first_layout() {
    let mut tree = LayoutTree::new();
    let (root, leaves, _) = stack_with_leaves(&mut tree, 100, &[(10, 10)]);
    assert_eq!(tree.frame(leaves[0]), None);
    assert_eq!(tree.layout_phase(leaves[0]), Some(LayoutPhase::NotLaidOut));

    tree.perform_traversal(100, 100).expect("traversal");
    assert_eq!(tree.frame(root), Some(Rect::new(0, 0, 100, 100)));
    assert_eq!(tree.frame(leaves[0]), Some(Rect::new(0, 0, 10, 10)));
    assert_eq!(tree.layout_phase(leaves[0]), Some(LayoutPhase::LaidOut));
}

#[test]
fn absolute_frame_accumulates_ancestor_origins() {
    let mut tree = LayoutTree::new();
    let (root, _, _) = stack_with_leaves(&mut tree, 100, &[]);
    tree.set_padding(root, Padding::new(5, 7, 0, 0)).expect("padding");
    let group = tree.create_node(LayoutIntent::wrap_content(), StackGroup::default());
    tree.set_padding(group, Padding::uniform(3)).expect("padding");
    let leaf = tree.create_leaf(LayoutIntent::fixed(4, 4));
    tree.add_child(group, leaf).expect("attach leaf");
    tree.add_child(root, group).expect("attach group");

    tree.perform_traversal(100, 100).expect("traversal");
    assert_eq!(tree.frame(leaf), Some(Rect::new(3, 3, 7, 7)));
    assert_eq!(tree.absolute_frame(leaf), Some(Rect::new(8, 10, 12, 14)));
}

#[test]
fn attached_nodes_cannot_become_root() {
    let mut tree = LayoutTree::new();
    let (root, leaves, _) = stack_with_leaves(&mut tree, 100, &[(10, 10)]);
    assert_eq!(
        tree.set_root(leaves[0]),
        Err(LayoutError::AlreadyAttached {
            child: leaves[0],
            parent: root
        })
    );
}
