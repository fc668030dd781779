//! Request-layout and invalidation propagation up the parent chain.
//!
//! The two never mix: requesting layout only touches measurement state and
//! invalidation only touches drawing state.

use crate::{LayoutTree, NodeFlags, NodeId, Visibility};
use nestbox_layout::Rect;

impl LayoutTree {
    /// Marks `id` as needing a new measure and layout.
    ///
    /// The measurement cache of every visited node is cleared. Outside a
    /// pass the request walks up the parent chain and stops at the first
    /// ancestor that already has a pending request. During a pass an attached
    /// node is queued instead and serviced once the pass completes.
    pub fn request_layout(&mut self, id: NodeId) {
        if self.pass.in_layout && self.is_attached(id) {
            let Some(node) = self.nodes.get_mut(id) else {
                return;
            };
            node.measure_cache.clear();
            node.flags
                .insert(NodeFlags::FORCE_LAYOUT | NodeFlags::REQUESTED_DURING_PASS);
            if self.pass.requesters.insert(id) {
                self.stats.queued_requests += 1;
                log::debug!("{id:?} requested layout during a pass; queued");
            }
            return;
        }

        let mut current = id;
        loop {
            let Some(node) = self.nodes.get_mut(current) else {
                return;
            };
            self.stats.request_walk_steps += 1;
            node.measure_cache.clear();
            node.flags.insert(NodeFlags::FORCE_LAYOUT | NodeFlags::INVALIDATED);
            if let Some(strategy) = node.strategy.as_mut() {
                strategy.on_layout_requested();
            }
            let parent = node.parent;
            match parent {
                Some(parent) if !self.is_layout_requested(parent) => current = parent,
                Some(_) => return,
                None => {
                    if self.root == Some(current) {
                        self.pass.root_layout_requested = true;
                    }
                    return;
                }
            }
        }
    }

    /// Forces the next measure of `id` to run its hook, without touching ancestors.
    pub fn force_layout(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.measure_cache.clear();
            node.flags.insert(NodeFlags::FORCE_LAYOUT);
        }
    }

    /// Marks the whole of `id` as needing a redraw.
    pub fn invalidate(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let bounds = Rect::from_size(node.frame.width(), node.frame.height());
        self.invalidate_rect(id, bounds);
    }

    /// Marks `rect`, in the local coordinates of `id`, as needing a redraw.
    ///
    /// The rectangle is translated into each ancestor's space and clipped to
    /// its bounds on the way up. Whatever reaches the root is added to the
    /// tree's dirty region.
    pub fn invalidate_rect(&mut self, id: NodeId, rect: Rect) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.visibility != Visibility::Visible {
            return;
        }
        node.flags.insert(NodeFlags::DIRTY | NodeFlags::INVALIDATED);
        node.flags.remove(NodeFlags::DRAWN);

        let mut dirty = rect;
        let mut current = id;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return;
            };
            let Some(parent) = node.parent else {
                break;
            };
            let frame = node.frame;
            let Some(parent_node) = self.nodes.get_mut(parent) else {
                return;
            };
            if parent_node.visibility != Visibility::Visible {
                return;
            }
            let parent_bounds = Rect::from_size(parent_node.frame.width(), parent_node.frame.height());
            let Some(clipped) = dirty.offset(frame.left, frame.top).intersect(&parent_bounds) else {
                return;
            };
            parent_node.flags.insert(NodeFlags::DIRTY);
            dirty = clipped;
            current = parent;
        }

        if self.root != Some(current) {
            return;
        }
        let Some(root) = self.nodes.get(current) else {
            return;
        };
        let root_bounds = Rect::from_size(root.frame.width(), root.frame.height());
        if let Some(clipped) = dirty.intersect(&root_bounds) {
            self.pass.dirty = Some(match self.pass.dirty {
                Some(existing) => existing.union(&clipped),
                None => clipped,
            });
        }
    }

    /// Accumulated dirty region in root coordinates, without clearing it.
    pub fn dirty_region(&self) -> Option<Rect> {
        self.pass.dirty
    }

    /// Hands the accumulated dirty region to the renderer and clears it.
    pub fn take_dirty_region(&mut self) -> Option<Rect> {
        self.pass.dirty.take()
    }

    /// Records that the renderer drew the current state of `id`.
    pub fn mark_drawn(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.remove(NodeFlags::DIRTY | NodeFlags::INVALIDATED);
            node.flags.insert(NodeFlags::DRAWN);
        }
    }
}

#[cfg(test)]
#[path = "tests/invalidate_tests.rs"]
mod tests;
