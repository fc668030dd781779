//! Strategies shared by the engine's unit tests.

use crate::{LayoutStrategy, LayoutTree, NodeId};
use nestbox_layout::{
    resolve_size_and_state, IntentKind, LayoutIntent, MarginIntent, Dimension, Rect,
    SizeConstraint,
};
use std::cell::Cell;
use std::rc::Rc;

/// A leaf with a fixed content size that counts its measure hook calls.
pub(crate) struct FixedLeaf {
    pub width: i32,
    pub height: i32,
    pub measures: Rc<Cell<u32>>,
}

impl FixedLeaf {
    pub fn new(width: i32, height: i32) -> (Self, Rc<Cell<u32>>) {
        let measures = Rc::new(Cell::new(0));
        (
            Self {
                width,
                height,
                measures: Rc::clone(&measures),
            },
            measures,
        )
    }
}

impl LayoutStrategy for FixedLeaf {
    fn debug_name(&self) -> &'static str {
        "FixedLeaf"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        self.measures.set(self.measures.get() + 1);
        tree.set_measured_dimension(
            node,
            resolve_size_and_state(self.width, width, false),
            resolve_size_and_state(self.height, height, false),
        );
    }
}

/// Children stacked on top of each other at the padding origin.
#[derive(Default)]
pub(crate) struct StackGroup {
    pub layouts: u32,
}

impl LayoutStrategy for StackGroup {
    fn debug_name(&self) -> &'static str {
        "StackGroup"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        let mut max_width = 0;
        let mut max_height = 0;
        for child in tree.children(node).to_vec() {
            tree.measure_child_with_margins(node, child, width, 0, height, 0);
            max_width = max_width.max(tree.measured_width(child));
            max_height = max_height.max(tree.measured_height(child));
        }
        let padding = tree.padding(node);
        tree.set_measured_dimension(
            node,
            resolve_size_and_state(max_width + padding.horizontal(), width, false),
            resolve_size_and_state(max_height + padding.vertical(), height, false),
        );
    }

    fn position_children(&mut self, tree: &mut LayoutTree, node: NodeId, _changed: bool, _frame: Rect) {
        self.layouts += 1;
        let padding = tree.padding(node);
        for child in tree.children(node).to_vec() {
            let size = tree.measured_size(child);
            tree.layout(
                child,
                padding.left,
                padding.top,
                padding.left + size.width,
                padding.top + size.height,
            );
        }
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

/// A group that only accepts margin intents.
pub(crate) struct MarginOnlyGroup;

impl LayoutStrategy for MarginOnlyGroup {
    fn debug_name(&self) -> &'static str {
        "MarginOnlyGroup"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        tree.measure_default(node, width, height);
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn accepts_intent(&self, intent: &LayoutIntent) -> bool {
        intent.kind() == IntentKind::Margin
    }

    fn default_intent(&self) -> LayoutIntent {
        MarginIntent::new(Dimension::WrapContent, Dimension::WrapContent).into()
    }
}

/// A leaf that requests layout on `target` every time it is measured.
pub(crate) struct Requester {
    pub target: Option<NodeId>,
    pub fired: Rc<Cell<u32>>,
}

impl LayoutStrategy for Requester {
    fn debug_name(&self) -> &'static str {
        "Requester"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        tree.measure_default(node, width, height);
        if let Some(target) = self.target {
            self.fired.set(self.fired.get() + 1);
            tree.request_layout(target);
        }
    }
}

/// A leaf that replaces its own intent from inside its measure hook.
pub(crate) struct SelfResizer {
    pub next: Dimension,
}

impl LayoutStrategy for SelfResizer {
    fn debug_name(&self) -> &'static str {
        "SelfResizer"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        tree.measure_default(node, width, height);
        let _ = tree.set_intent(node, LayoutIntent::new(self.next, self.next));
    }
}

/// Builds a root stack group of the given fixed size with `leaves` fixed-size children.
pub(crate) fn stack_with_leaves(
    tree: &mut LayoutTree,
    size: i32,
    leaves: &[(i32, i32)],
) -> (NodeId, Vec<NodeId>, Vec<Rc<Cell<u32>>>) {
    let root = tree.create_node(LayoutIntent::fixed(size, size), StackGroup::default());
    tree.set_root(root).expect("fresh root");
    let mut ids = Vec::new();
    let mut counters = Vec::new();
    for &(width, height) in leaves {
        let (leaf, counter) = FixedLeaf::new(width, height);
        let id = tree.create_node(LayoutIntent::wrap_content(), leaf);
        tree.add_child(root, id).expect("attach leaf");
        ids.push(id);
        counters.push(counter);
    }
    (root, ids, counters)
}
