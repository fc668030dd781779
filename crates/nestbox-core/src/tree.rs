//! Node arena and read access to the layout tree.

use crate::driver::PendingMutation;
use crate::{
    DefaultSizing, EngineConfig, LayoutError, LayoutNode, LayoutPhase, LayoutStats,
    LayoutStrategy, NodeFlags, Visibility,
};
use indexmap::IndexSet;
use nestbox_layout::{
    AnchorId, LayoutDirection, LayoutIntent, MeasuredState, Padding, Rect, Size,
};

/// Generational handle to a node in a [`LayoutTree`].
///
/// A handle outlives the node it names; once the node is destroyed the
/// slot's generation moves on and the handle stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

struct Slot {
    generation: u32,
    value: Option<LayoutNode>,
    next_free: Option<u32>,
}

#[derive(Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
}

impl NodeArena {
    fn insert(&mut self, node: LayoutNode) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            self.free_head = slot.next_free.take();
            slot.value = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(node),
            next_free: None,
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&LayoutNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut LayoutNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    fn remove(&mut self, id: NodeId) -> Option<LayoutNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = Some(id.index);
        self.len -= 1;
        Some(node)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|_| NodeId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }
}

/// Bookkeeping owned by the root driver across passes.
#[derive(Default)]
pub(crate) struct PassState {
    /// A measure or layout pass is running.
    pub(crate) in_layout: bool,
    /// The extra passes for requests raised during a pass are running.
    pub(crate) handling_layout_requests: bool,
    /// Nodes that requested layout while a pass was running.
    pub(crate) requesters: IndexSet<NodeId>,
    /// A request-layout walk reached the root.
    pub(crate) root_layout_requested: bool,
    pub(crate) pending: Vec<PendingMutation>,
    /// Accumulated dirty region in root coordinates.
    pub(crate) dirty: Option<Rect>,
    /// Window size used by the last traversal.
    pub(crate) window: Option<Size>,
}

/// Owns every node and drives measure and layout passes over them.
pub struct LayoutTree {
    pub(crate) nodes: NodeArena,
    pub(crate) root: Option<NodeId>,
    pub(crate) direction: LayoutDirection,
    pub(crate) config: EngineConfig,
    pub(crate) stats: LayoutStats,
    pub(crate) pass: PassState,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            nodes: NodeArena::default(),
            root: None,
            direction: LayoutDirection::Ltr,
            config,
            stats: LayoutStats::default(),
            pass: PassState::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len == 0
    }

    /// Allocates a detached node.
    pub fn create_node<S>(&mut self, intent: LayoutIntent, strategy: S) -> NodeId
    where
        S: LayoutStrategy + 'static,
    {
        let node = LayoutNode::new(intent, Box::new(strategy));
        let id = self.nodes.insert(node);
        log::trace!("created {id:?}");
        id
    }

    /// Allocates a detached leaf with [`DefaultSizing`].
    pub fn create_leaf(&mut self, intent: LayoutIntent) -> NodeId {
        self.create_node(intent, DefaultSizing)
    }

    /// Detaches `id` from its parent and frees it together with its subtree.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let parent = self.require(id)?.parent;
        if self.defer(PendingMutation::Destroy(id)) {
            return Ok(());
        }
        if let Some(parent) = parent {
            self.remove_child(parent, id)?;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                self.pass.requesters.shift_remove(&current);
            }
        }
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    pub(crate) fn require(&self, id: NodeId) -> Result<&LayoutNode, LayoutError> {
        self.nodes.get(id).ok_or(LayoutError::StaleNode(id))
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Makes a detached node the root of the tree.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = self.require(id)?;
        if let Some(parent) = node.parent {
            return Err(LayoutError::AlreadyAttached { child: id, parent });
        }
        self.root = Some(id);
        self.pass.root_layout_requested = true;
        self.request_layout(id);
        Ok(())
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Changes the reading direction and forces a full relayout.
    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        if self.direction == direction {
            return;
        }
        if self.defer(PendingMutation::SetLayoutDirection(direction)) {
            return;
        }
        self.direction = direction;
        let ids: Vec<NodeId> = self.nodes.ids().collect();
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.measure_cache.clear();
                node.flags.insert(NodeFlags::FORCE_LAYOUT);
                if let Some(strategy) = node.strategy.as_mut() {
                    strategy.on_layout_requested();
                }
            }
        }
        self.pass.root_layout_requested = true;
        log::debug!("layout direction changed to {direction:?}");
    }

    /// Borrows the strategy of `id` as its concrete type.
    pub fn strategy<S: LayoutStrategy + 'static>(&self, id: NodeId) -> Option<&S> {
        let strategy: &dyn LayoutStrategy = self.nodes.get(id)?.strategy.as_deref()?;
        strategy.as_any().downcast_ref::<S>()
    }

    /// Mutable form of [`LayoutTree::strategy`]. Changing strategy settings
    /// does not request layout on its own.
    pub fn strategy_mut<S: LayoutStrategy + 'static>(&mut self, id: NodeId) -> Option<&mut S> {
        let strategy: &mut dyn LayoutStrategy = self.nodes.get_mut(id)?.strategy.as_deref_mut()?;
        strategy.as_any_mut().downcast_mut::<S>()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Children in insertion order; empty for leaves and stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    pub fn index_of_child(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&id| id == child)
    }

    pub fn intent(&self, id: NodeId) -> Option<&LayoutIntent> {
        self.nodes.get(id).map(|node| &node.intent)
    }

    pub fn key(&self, id: NodeId) -> Option<&AnchorId> {
        self.nodes.get(id)?.key.as_ref()
    }

    pub fn visibility(&self, id: NodeId) -> Visibility {
        self.nodes
            .get(id)
            .map_or(Visibility::Gone, |node| node.visibility)
    }

    pub fn is_gone(&self, id: NodeId) -> bool {
        self.visibility(id) == Visibility::Gone
    }

    /// Geometry from the last layout, or `None` if the node was never laid out.
    pub fn frame(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        node.is_laid_out().then_some(node.frame)
    }

    /// Geometry translated into root coordinates.
    pub fn absolute_frame(&self, id: NodeId) -> Option<Rect> {
        let mut rect = self.frame(id)?;
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            let frame = self.nodes.get(ancestor)?.frame;
            rect = rect.offset(frame.left, frame.top);
            current = self.parent(ancestor);
        }
        Some(rect)
    }

    pub fn padding(&self, id: NodeId) -> Padding {
        self.nodes.get(id).map_or(Padding::ZERO, |node| node.padding)
    }

    pub fn min_size(&self, id: NodeId) -> Size {
        self.nodes.get(id).map_or(Size::ZERO, |node| node.min_size)
    }

    pub fn measured_size(&self, id: NodeId) -> Size {
        self.nodes
            .get(id)
            .map_or(Size::ZERO, |node| node.measured.size())
    }

    pub fn measured_width(&self, id: NodeId) -> i32 {
        self.measured_size(id).width
    }

    pub fn measured_height(&self, id: NodeId) -> i32 {
        self.measured_size(id).height
    }

    pub fn measured_state(&self, id: NodeId) -> MeasuredState {
        self.nodes
            .get(id)
            .map_or(MeasuredState::empty(), |node| node.measured.state)
    }

    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes
            .get(id)
            .map_or(NodeFlags::empty(), |node| node.flags)
    }

    pub fn is_laid_out(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(LayoutNode::is_laid_out)
    }

    pub fn is_layout_requested(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(LayoutNode::is_layout_requested)
    }

    pub fn layout_phase(&self, id: NodeId) -> Option<LayoutPhase> {
        self.nodes.get(id).map(LayoutNode::phase)
    }

    /// Baseline of `id` as reported by its strategy.
    pub fn baseline(&self, id: NodeId) -> Option<i32> {
        let strategy = self.nodes.get(id)?.strategy.as_deref()?;
        strategy.baseline(self, id)
    }

    /// True when the parent chain of `id` reaches the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        let mut current = Some(id);
        while let Some(node) = current {
            if node == root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Depth-first search for a node carrying `key`, starting at `scope`.
    pub fn find_by_key(&self, scope: NodeId, key: &AnchorId) -> Option<NodeId> {
        let mut stack = vec![scope];
        while let Some(current) = stack.pop() {
            let node = self.nodes.get(current)?;
            if node.key.as_ref() == Some(key) {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
