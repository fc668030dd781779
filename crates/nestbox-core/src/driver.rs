//! Pass entry points for the root driver.
//!
//! A pass is one top-down measure and/or layout of the root. Requests and
//! structural mutations raised while it runs are queued and applied once it
//! completes, followed by a bounded number of extra passes.

use crate::{LayoutError, LayoutTree, NodeFlags, NodeId, Visibility};
use nestbox_layout::{
    AnchorId, Dimension, LayoutDirection, LayoutIntent, Padding, Size, SizeConstraint,
};
use smallvec::SmallVec;

/// A tree mutation deferred until the running pass completes.
#[derive(Debug, Clone)]
pub enum PendingMutation {
    InsertChild {
        parent: NodeId,
        child: NodeId,
        index: usize,
    },
    RemoveChild {
        parent: NodeId,
        child: NodeId,
    },
    SetIntent(NodeId, LayoutIntent),
    SetPadding(NodeId, Padding),
    SetMinSize(NodeId, Size),
    SetVisibility(NodeId, Visibility),
    SetKey(NodeId, Option<AnchorId>),
    SetLayoutDirection(LayoutDirection),
    Destroy(NodeId),
}

/// Root constraint for one axis of a window.
pub(crate) fn root_constraint(window: i32, dimension: Dimension) -> SizeConstraint {
    match dimension {
        Dimension::MatchParent => SizeConstraint::exactly(window),
        Dimension::WrapContent => SizeConstraint::at_most(window),
        Dimension::Fixed(size) => SizeConstraint::exactly(size),
    }
}

impl LayoutTree {
    /// Queues `mutation` when a pass is running. Returns true if it was queued.
    pub(crate) fn defer(&mut self, mutation: PendingMutation) -> bool {
        if !self.pass.in_layout {
            return false;
        }
        log::debug!("deferring {mutation:?} until the current pass completes");
        self.stats.deferred_mutations += 1;
        self.pass.pending.push(mutation);
        true
    }

    /// True while a measure or layout pass is running.
    pub fn is_in_layout(&self) -> bool {
        self.pass.in_layout
    }

    /// Mutations waiting for the running pass to complete.
    pub fn pending_mutations(&self) -> &[PendingMutation] {
        &self.pass.pending
    }

    /// Whether the next traversal has work to do.
    pub fn needs_traversal(&self) -> bool {
        match self.root {
            Some(root) => {
                self.pass.root_layout_requested
                    || !self.is_laid_out(root)
                    || self.is_layout_requested(root)
            }
            None => false,
        }
    }

    /// Measures the root under the given constraints.
    ///
    /// Requests and mutations raised while measuring stay queued until the
    /// following [`LayoutTree::perform_layout`].
    pub fn perform_measure(
        &mut self,
        width: SizeConstraint,
        height: SizeConstraint,
    ) -> Result<(), LayoutError> {
        let root = self.root.ok_or(LayoutError::NoRoot)?;
        log::debug!("measure pass [{width}, {height}]");
        let was_in_layout = std::mem::replace(&mut self.pass.in_layout, true);
        self.measure(root, width, height);
        self.pass.in_layout = was_in_layout;
        Ok(())
    }

    /// Lays out the root at the given bounds, then services requests raised
    /// during the pass.
    pub fn perform_layout(
        &mut self,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> Result<(), LayoutError> {
        let root = self.root.ok_or(LayoutError::NoRoot)?;
        log::debug!("layout pass ({left}, {top}, {right}, {bottom})");
        self.pass.in_layout = true;
        self.layout(root, left, top, right, bottom);
        self.pass.in_layout = false;
        self.pass.root_layout_requested = false;

        self.apply_pending_mutations();
        self.service_layout_requests(root);
        Ok(())
    }

    /// Measures and lays out the root for a window of the given size when
    /// anything requested it. Returns whether a pass ran.
    pub fn perform_traversal(
        &mut self,
        window_width: i32,
        window_height: i32,
    ) -> Result<bool, LayoutError> {
        let root = self.root.ok_or(LayoutError::NoRoot)?;
        let window = Size::new(window_width, window_height);
        let resized = self.pass.window != Some(window);
        if !resized && !self.needs_traversal() {
            return Ok(false);
        }
        self.pass.window = Some(window);

        let intent = self.intent(root).cloned().unwrap_or_default();
        let width = root_constraint(window_width, intent.width());
        let height = root_constraint(window_height, intent.height());
        self.perform_measure(width, height)?;
        let size = self.measured_size(root);
        self.perform_layout(0, 0, size.width, size.height)?;
        Ok(true)
    }

    /// Replays mutations queued during the last pass.
    fn apply_pending_mutations(&mut self) {
        while !self.pass.pending.is_empty() {
            let pending = std::mem::take(&mut self.pass.pending);
            for mutation in pending {
                let result = match mutation {
                    PendingMutation::InsertChild {
                        parent,
                        child,
                        index,
                    } => {
                        let index = index.min(self.child_count(parent));
                        self.insert_child(parent, child, index)
                    }
                    PendingMutation::RemoveChild { parent, child } => {
                        self.remove_child(parent, child)
                    }
                    PendingMutation::SetIntent(id, intent) => self.set_intent(id, intent),
                    PendingMutation::SetPadding(id, padding) => self.set_padding(id, padding),
                    PendingMutation::SetMinSize(id, size) => self.set_min_size(id, size),
                    PendingMutation::SetVisibility(id, visibility) => {
                        self.set_visibility(id, visibility)
                    }
                    PendingMutation::SetKey(id, key) => self.set_key(id, key),
                    PendingMutation::SetLayoutDirection(direction) => {
                        self.set_layout_direction(direction);
                        Ok(())
                    }
                    PendingMutation::Destroy(id) => self.destroy(id),
                };
                if let Err(err) = result {
                    log::warn!("deferred mutation failed: {err}");
                }
            }
        }
    }

    /// Requesters that still need layout: not measured since their request,
    /// attached and not hidden behind a gone ancestor.
    fn take_valid_layout_requesters(&mut self) -> SmallVec<[NodeId; 8]> {
        let requesters = std::mem::take(&mut self.pass.requesters);
        requesters
            .into_iter()
            .filter(|&id| {
                self.flags(id).contains(NodeFlags::REQUESTED_DURING_PASS)
                    && self.is_attached(id)
                    && !self.in_gone_chain(id)
            })
            .collect()
    }

    fn clear_pass_request(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.remove(NodeFlags::REQUESTED_DURING_PASS);
        }
    }

    fn in_gone_chain(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_gone(node) {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn service_layout_requests(&mut self, root: NodeId) {
        let mut passes = 0u8;
        loop {
            let valid = self.take_valid_layout_requesters();
            if valid.is_empty() {
                break;
            }
            if passes >= self.config.max_relayout_passes {
                log::debug!(
                    "{} layout requests still pending after {passes} extra passes; \
                     deferring to the next traversal",
                    valid.len()
                );
                for id in valid {
                    self.clear_pass_request(id);
                    self.request_layout(id);
                }
                break;
            }
            passes += 1;
            self.stats.extra_passes += 1;
            log::debug!("extra layout pass {passes} for {} requesters", valid.len());

            self.pass.handling_layout_requests = true;
            for &id in &valid {
                self.clear_pass_request(id);
                self.request_layout(id);
            }
            self.remeasure_and_layout_root(root);
            self.pass.handling_layout_requests = false;
            self.pass.root_layout_requested = false;
            self.apply_pending_mutations();
        }
    }

    fn remeasure_and_layout_root(&mut self, root: NodeId) {
        let Some(node) = self.nodes.get(root) else {
            return;
        };
        let Some((width, height)) = node.last_constraints else {
            return;
        };
        let origin = node.frame;
        self.pass.in_layout = true;
        self.measure(root, width, height);
        let size = self.measured_size(root);
        self.layout(
            root,
            origin.left,
            origin.top,
            origin.left + size.width,
            origin.top + size.height,
        );
        self.pass.in_layout = false;
    }

    /// True while the extra passes for in-pass requests are running.
    pub fn is_handling_layout_requests(&self) -> bool {
        self.pass.handling_layout_requests
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
