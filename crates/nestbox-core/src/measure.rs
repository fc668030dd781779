//! The two-phase measure/layout protocol shared by every node.

use crate::node::MeasuredDimensions;
use crate::{LayoutTree, NodeFlags, NodeId};
use nestbox_layout::{default_size, MeasuredSize, Rect, SizeConstraint};

impl LayoutTree {
    /// Asks `id` how big it wants to be under the given constraints.
    ///
    /// The measure hook runs only when the node was forced or the constraint
    /// pair changed and has no cached answer. A repeated call with the same
    /// pair does nothing.
    pub fn measure(&mut self, id: NodeId, width: SizeConstraint, height: SizeConstraint) {
        self.stats.measure_calls += 1;
        let pair = (width, height);
        let Some(node) = self.nodes.get_mut(id) else {
            log::warn!("measure on stale node {id:?}");
            return;
        };
        let forced = node.flags.contains(NodeFlags::FORCE_LAYOUT);
        let changed = node.last_constraints != Some(pair);
        if !forced && !changed {
            return;
        }

        node.flags.remove(NodeFlags::MEASURED_DIMENSION_SET);
        let cached = if forced {
            None
        } else {
            node.measure_cache.get(&pair).copied()
        };
        match cached {
            Some(dimensions) => {
                node.measured = dimensions;
                node.flags.insert(
                    NodeFlags::MEASURED_DIMENSION_SET | NodeFlags::MEASURE_NEEDED_BEFORE_LAYOUT,
                );
                self.stats.cache_hits += 1;
                log::trace!("measure {id:?} [{width}, {height}] served from cache");
            }
            None => {
                log::trace!("measure {id:?} [{width}, {height}]");
                self.run_measure_hook(id, width, height);
                if let Some(node) = self.nodes.get_mut(id) {
                    node.flags.remove(NodeFlags::MEASURE_NEEDED_BEFORE_LAYOUT);
                }
            }
        }

        let capacity = self.config.measure_cache_capacity;
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.flags.insert(NodeFlags::LAYOUT_REQUIRED);
        node.last_constraints = Some(pair);
        if node.measure_cache.len() >= capacity && !node.measure_cache.contains_key(&pair) {
            node.measure_cache.clear();
        }
        node.measure_cache.insert(pair, node.measured);
    }

    fn run_measure_hook(&mut self, id: NodeId, width: SizeConstraint, height: SizeConstraint) {
        let Some(mut strategy) = self.nodes.get_mut(id).and_then(|node| node.strategy.take())
        else {
            log::error!("{id:?} was measured again from inside its own measure hook");
            self.measure_default(id, width, height);
            return;
        };
        self.stats.measure_hook_calls += 1;
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.remove(NodeFlags::REQUESTED_DURING_PASS);
        }
        strategy.measure_children(self, id, width, height);
        let name = strategy.debug_name();
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.strategy = Some(strategy);
        if !node.flags.contains(NodeFlags::MEASURED_DIMENSION_SET) {
            log::error!("{name} on {id:?} returned without setting a measured dimension");
            self.measure_default(id, width, height);
        }
    }

    /// Records the size chosen by a measure hook.
    pub fn set_measured_dimension(&mut self, id: NodeId, width: MeasuredSize, height: MeasuredSize) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.measured = MeasuredDimensions::new(width, height);
            node.flags.insert(NodeFlags::MEASURED_DIMENSION_SET);
        }
    }

    /// Default sizing for `id`: the suggested minimum when a constraint is
    /// unspecified, the constraint's size otherwise.
    pub fn measure_default(&mut self, id: NodeId, width: SizeConstraint, height: SizeConstraint) {
        let min = self.min_size(id);
        self.set_measured_dimension(
            id,
            MeasuredSize::new(default_size(min.width, width)),
            MeasuredSize::new(default_size(min.height, height)),
        );
    }

    /// Assigns geometry to `id` and lets its strategy place children.
    pub fn layout(&mut self, id: NodeId, left: i32, top: i32, right: i32, bottom: i32) {
        self.stats.layout_calls += 1;
        let Some(node) = self.nodes.get(id) else {
            log::warn!("layout on stale node {id:?}");
            return;
        };
        let deferred_measure = node
            .flags
            .contains(NodeFlags::MEASURE_NEEDED_BEFORE_LAYOUT)
            .then_some(node.last_constraints)
            .flatten();
        if let Some((width, height)) = deferred_measure {
            self.run_measure_hook(id, width, height);
            if let Some(node) = self.nodes.get_mut(id) {
                node.flags.remove(NodeFlags::MEASURE_NEEDED_BEFORE_LAYOUT);
            }
        }

        let frame = Rect::new(left, top, right, bottom);
        let changed = self.set_frame(id, frame);
        let layout_required = self
            .nodes
            .get(id)
            .is_some_and(|node| node.flags.contains(NodeFlags::LAYOUT_REQUIRED));
        if changed || layout_required {
            self.run_layout_hook(id, changed, frame);
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.remove(NodeFlags::LAYOUT_REQUIRED | NodeFlags::FORCE_LAYOUT);
            node.flags.insert(NodeFlags::IS_LAID_OUT);
        }
    }

    fn run_layout_hook(&mut self, id: NodeId, changed: bool, frame: Rect) {
        let Some(mut strategy) = self.nodes.get_mut(id).and_then(|node| node.strategy.take())
        else {
            log::error!("{id:?} was laid out again from inside its own layout hook");
            return;
        };
        self.stats.layout_hook_calls += 1;
        log::trace!("layout {id:?} {frame:?} changed={changed}");
        strategy.position_children(self, id, changed, frame);
        if let Some(node) = self.nodes.get_mut(id) {
            node.strategy = Some(strategy);
        }
    }

    /// Stores new geometry. Returns true when it differs from the old one.
    ///
    /// Both the old and the new bounds are invalidated, and the strategy is
    /// told when the size changed.
    pub(crate) fn set_frame(&mut self, id: NodeId, frame: Rect) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let old = node.frame;
        let had_bounds = node.flags.contains(NodeFlags::HAS_BOUNDS);
        if had_bounds && old == frame {
            return false;
        }
        let size_changed = old.size() != frame.size();
        if had_bounds {
            self.invalidate(id);
        }

        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.frame = frame;
        node.flags.insert(NodeFlags::HAS_BOUNDS);
        if size_changed {
            if let Some(strategy) = node.strategy.as_mut() {
                strategy.on_size_changed(frame.size(), old.size());
            }
        }
        self.invalidate(id);
        true
    }
}

#[cfg(test)]
#[path = "tests/measure_tests.rs"]
mod tests;
