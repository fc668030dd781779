//! Child orchestration shared by every group strategy.

use crate::driver::PendingMutation;
use crate::{LayoutError, LayoutTree, NodeId, Visibility};
use nestbox_layout::{AnchorId, Dimension, LayoutIntent, Padding, Size, SizeConstraint, SpecMode};
use smallvec::SmallVec;

/// Derives a child's constraint on one axis.
///
/// `padding` is everything the parent has already used on this axis
/// (its padding, the child's margins and any space taken by siblings).
pub fn child_constraint(
    parent: SizeConstraint,
    padding: i32,
    dimension: Dimension,
) -> SizeConstraint {
    let remaining = (parent.size() - padding).max(0);
    match (parent.mode(), dimension) {
        (_, Dimension::Fixed(size)) => SizeConstraint::exactly(size),
        (SpecMode::Exactly, Dimension::MatchParent) => SizeConstraint::exactly(remaining),
        (SpecMode::Exactly, Dimension::WrapContent)
        | (SpecMode::AtMost, Dimension::MatchParent | Dimension::WrapContent) => {
            SizeConstraint::at_most(remaining)
        }
        (SpecMode::Unspecified, Dimension::MatchParent | Dimension::WrapContent) => {
            SizeConstraint::unspecified()
        }
    }
}

impl LayoutTree {
    /// Measures `child` against its parent's constraints minus the parent's padding.
    pub fn measure_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        parent_width: SizeConstraint,
        parent_height: SizeConstraint,
    ) {
        let padding = self.padding(parent);
        let Some(intent) = self.intent(child) else {
            return;
        };
        let width = child_constraint(parent_width, padding.horizontal(), intent.width());
        let height = child_constraint(parent_height, padding.vertical(), intent.height());
        self.measure(child, width, height);
    }

    /// Like [`LayoutTree::measure_child`], also taking the child's margins and
    /// the space already used by siblings into account.
    pub fn measure_child_with_margins(
        &mut self,
        parent: NodeId,
        child: NodeId,
        parent_width: SizeConstraint,
        width_used: i32,
        parent_height: SizeConstraint,
        height_used: i32,
    ) {
        let padding = self.padding(parent);
        let direction = self.direction;
        let Some(intent) = self.intent(child) else {
            return;
        };
        let margins = intent.resolved_margins(direction);
        let width = child_constraint(
            parent_width,
            padding.horizontal() + margins.horizontal() + width_used,
            intent.width(),
        );
        let height = child_constraint(
            parent_height,
            padding.vertical() + margins.vertical() + height_used,
            intent.height(),
        );
        self.measure(child, width, height);
    }

    /// Measures every child that is not gone with [`LayoutTree::measure_child`].
    pub fn measure_children(
        &mut self,
        parent: NodeId,
        parent_width: SizeConstraint,
        parent_height: SizeConstraint,
    ) {
        let children: SmallVec<[NodeId; 8]> = self.children(parent).iter().copied().collect();
        for child in children {
            if !self.is_gone(child) {
                self.measure_child(parent, child, parent_width, parent_height);
            }
        }
    }

    /// Appends `child` to `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        let len = self.child_count(parent);
        self.insert_child(parent, child, len)
    }

    /// Inserts `child` at `index` among the children of `parent`.
    ///
    /// An intent the parent's strategy does not accept is replaced by the
    /// strategy's default intent.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), LayoutError> {
        let parent_node = self.require(parent)?;
        let accepts_children = parent_node
            .strategy
            .as_ref()
            .is_some_and(|strategy| strategy.accepts_children());
        if !accepts_children {
            return Err(LayoutError::NotAGroup(parent));
        }
        let len = parent_node.children.len();
        if let Some(existing) = self.require(child)?.parent {
            return Err(LayoutError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor_or_self(child, parent) || self.root == Some(child) {
            return Err(LayoutError::WouldCreateCycle { parent, child });
        }
        if index > len {
            return Err(LayoutError::IndexOutOfBounds { index, len });
        }
        if self.defer(PendingMutation::InsertChild {
            parent,
            child,
            index,
        }) {
            return Ok(());
        }

        self.conform_intent(parent, child);
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(index, child);
            if let Some(strategy) = node.strategy.as_mut() {
                strategy.on_hierarchy_changed();
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        log::trace!("attached {child:?} to {parent:?} at {index}");
        self.request_layout(child);
        self.invalidate(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`. The child stays alive in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.require(parent)?;
        self.require(child)?;
        let Some(index) = self.index_of_child(parent, child) else {
            return Err(LayoutError::NotAChild { parent, child });
        };
        if self.defer(PendingMutation::RemoveChild { parent, child }) {
            return Ok(());
        }

        self.invalidate(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.remove(index);
            if let Some(strategy) = node.strategy.as_mut() {
                strategy.on_hierarchy_changed();
            }
        }
        self.pass.requesters.shift_remove(&child);
        log::trace!("detached {child:?} from {parent:?}");
        self.request_layout(parent);
        self.invalidate(parent);
        Ok(())
    }

    /// Detaches every child of `parent`.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<(), LayoutError> {
        let children: SmallVec<[NodeId; 8]> = self.require(parent)?.children.iter().copied().collect();
        for child in children.into_iter().rev() {
            self.remove_child(parent, child)?;
        }
        Ok(())
    }

    /// Replaces the intent of `id` wholesale and requests layout.
    pub fn set_intent(&mut self, id: NodeId, intent: LayoutIntent) -> Result<(), LayoutError> {
        let parent = self.require(id)?.parent;
        if self.defer(PendingMutation::SetIntent(id, intent.clone())) {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.intent = intent;
        }
        if let Some(parent) = parent {
            self.conform_intent(parent, id);
            self.notify_hierarchy_changed(parent);
        }
        self.request_layout(id);
        Ok(())
    }

    pub fn set_padding(&mut self, id: NodeId, padding: Padding) -> Result<(), LayoutError> {
        if self.require(id)?.padding == padding {
            return Ok(());
        }
        if self.defer(PendingMutation::SetPadding(id, padding)) {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.padding = padding;
        }
        self.request_layout(id);
        self.invalidate(id);
        Ok(())
    }

    /// Sets the suggested minimum size used by default sizing.
    pub fn set_min_size(&mut self, id: NodeId, size: Size) -> Result<(), LayoutError> {
        if self.require(id)?.min_size == size {
            return Ok(());
        }
        if self.defer(PendingMutation::SetMinSize(id, size)) {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.min_size = size;
        }
        self.request_layout(id);
        Ok(())
    }

    /// Changes visibility. Transitions to or from [`Visibility::Gone`] request layout.
    pub fn set_visibility(&mut self, id: NodeId, visibility: Visibility) -> Result<(), LayoutError> {
        let old = self.require(id)?.visibility;
        if old == visibility {
            return Ok(());
        }
        if self.defer(PendingMutation::SetVisibility(id, visibility)) {
            return Ok(());
        }
        self.invalidate(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.visibility = visibility;
        }
        if old == Visibility::Gone || visibility == Visibility::Gone {
            self.request_layout(id);
        }
        self.invalidate(id);
        Ok(())
    }

    /// Sets the identity siblings use to anchor to `id`.
    pub fn set_key(&mut self, id: NodeId, key: Option<AnchorId>) -> Result<(), LayoutError> {
        let parent = self.require(id)?.parent;
        if self.defer(PendingMutation::SetKey(id, key.clone())) {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.key = key;
        }
        if let Some(parent) = parent {
            self.notify_hierarchy_changed(parent);
            self.request_layout(parent);
        }
        Ok(())
    }

    fn conform_intent(&mut self, parent: NodeId, child: NodeId) {
        let Some(strategy) = self.nodes.get(parent).and_then(|node| node.strategy.as_deref()) else {
            return;
        };
        let Some(intent) = self.intent(child) else {
            return;
        };
        if strategy.accepts_intent(intent) {
            return;
        }
        let replacement = strategy.default_intent();
        log::warn!(
            "{} rejected {:?} intent of {child:?}; using its default intent",
            strategy.debug_name(),
            intent.kind()
        );
        if let Some(node) = self.nodes.get_mut(child) {
            node.intent = replacement;
        }
    }

    fn notify_hierarchy_changed(&mut self, parent: NodeId) {
        if let Some(strategy) = self.nodes.get_mut(parent).and_then(|node| node.strategy.as_mut()) {
            strategy.on_hierarchy_changed();
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

#[cfg(test)]
#[path = "tests/group_tests.rs"]
mod tests;
