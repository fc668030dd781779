use crate::{LayoutTree, NodeId};
use nestbox_layout::{LayoutIntent, Rect, Size, SizeConstraint};
use std::any::Any;

/// Downcasting support for strategy objects.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Pluggable sizing and placement behavior of a node.
///
/// The tree takes the strategy out of its node while a hook runs, so hooks
/// get full mutable access to the tree, including the node they belong to.
pub trait LayoutStrategy: AsAny {
    fn debug_name(&self) -> &'static str;

    /// Sizes the node, measuring children as needed.
    ///
    /// Implementations must finish by calling
    /// [`LayoutTree::set_measured_dimension`] for `node`.
    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    );

    /// Places children inside `frame`, which is the node's own geometry in
    /// its parent's coordinates.
    fn position_children(
        &mut self,
        _tree: &mut LayoutTree,
        _node: NodeId,
        _changed: bool,
        _frame: Rect,
    ) {
    }

    /// Whether children may be attached to a node using this strategy.
    fn accepts_children(&self) -> bool {
        false
    }

    /// Whether `intent` is a configuration this strategy can lay out.
    fn accepts_intent(&self, _intent: &LayoutIntent) -> bool {
        true
    }

    /// Replacement for children attached with an intent this strategy rejects.
    fn default_intent(&self) -> LayoutIntent {
        LayoutIntent::wrap_content()
    }

    /// Distance from the node's top to its text baseline.
    fn baseline(&self, _tree: &LayoutTree, _node: NodeId) -> Option<i32> {
        None
    }

    fn on_size_changed(&mut self, _new_size: Size, _old_size: Size) {}

    /// A child was added or removed, or a child's intent or key changed.
    fn on_hierarchy_changed(&mut self) {}

    fn on_layout_requested(&mut self) {}
}

/// Leaf sizing: the suggested minimum when unconstrained, the constraint size otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSizing;

impl LayoutStrategy for DefaultSizing {
    fn debug_name(&self) -> &'static str {
        "DefaultSizing"
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
}
