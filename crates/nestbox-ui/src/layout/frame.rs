use nestbox_core::{child_constraint, LayoutStrategy, LayoutTree, NodeId};
use nestbox_layout::{
    resolve_size_and_state, Dimension, FrameIntent, Gravity, IntentKind, LayoutIntent, Rect,
    SizeConstraint,
};
use smallvec::SmallVec;

const DEFAULT_CHILD_GRAVITY: Gravity = Gravity::TOP.union(Gravity::START);

/// Overlays its children inside its padded bounds, each placed by its own gravity.
#[derive(Debug, Clone, Default)]
pub struct FrameLayout {
    measure_all_children: bool,
    match_parent_children: SmallVec<[NodeId; 4]>,
}

impl FrameLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes gone children when sizing the frame.
    pub fn with_measure_all_children(mut self, enabled: bool) -> Self {
        self.measure_all_children = enabled;
        self
    }

    pub fn measures_all_children(&self) -> bool {
        self.measure_all_children
    }
}

impl LayoutStrategy for FrameLayout {
    fn debug_name(&self) -> &'static str {
        "FrameLayout"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        let collect_match_parent = !width.is_exactly() || !height.is_exactly();
        let direction = tree.layout_direction();
        self.match_parent_children.clear();

        let mut max_width = 0;
        let mut max_height = 0;
        let mut width_too_small = false;
        let mut height_too_small = false;
        let children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();
        for child in children {
            if !self.measure_all_children && tree.is_gone(child) {
                continue;
            }
            tree.measure_child_with_margins(node, child, width, 0, height, 0);
            let Some(intent) = tree.intent(child) else {
                continue;
            };
            let margins = intent.resolved_margins(direction);
            let matches_parent =
                intent.width().is_match_parent() || intent.height().is_match_parent();
            max_width = max_width.max(tree.measured_width(child) + margins.horizontal());
            max_height = max_height.max(tree.measured_height(child) + margins.vertical());
            let state = tree.measured_state(child);
            width_too_small |= state.width_too_small();
            height_too_small |= state.height_too_small();
            if collect_match_parent && matches_parent {
                self.match_parent_children.push(child);
            }
        }

        let padding = tree.padding(node);
        let min_size = tree.min_size(node);
        let wanted_width = (max_width + padding.horizontal()).max(min_size.width);
        let wanted_height = (max_height + padding.vertical()).max(min_size.height);
        tree.set_measured_dimension(
            node,
            resolve_size_and_state(wanted_width, width, width_too_small),
            resolve_size_and_state(wanted_height, height, height_too_small),
        );

        if self.match_parent_children.len() < 2 {
            return;
        }
        let measured = tree.measured_size(node);
        for &child in &self.match_parent_children {
            let Some(intent) = tree.intent(child) else {
                continue;
            };
            let margins = intent.resolved_margins(direction);
            let used_width = padding.horizontal() + margins.horizontal();
            let used_height = padding.vertical() + margins.vertical();
            let child_width = match intent.width() {
                Dimension::MatchParent => {
                    SizeConstraint::exactly((measured.width - used_width).max(0))
                }
                dimension => child_constraint(width, used_width, dimension),
            };
            let child_height = match intent.height() {
                Dimension::MatchParent => {
                    SizeConstraint::exactly((measured.height - used_height).max(0))
                }
                dimension => child_constraint(height, used_height, dimension),
            };
            tree.measure(child, child_width, child_height);
        }
    }

    fn position_children(&mut self, tree: &mut LayoutTree, node: NodeId, _changed: bool, frame: Rect) {
        let padding = tree.padding(node);
        let direction = tree.layout_direction();
        let parent_left = padding.left;
        let parent_right = frame.width() - padding.right;
        let parent_top = padding.top;
        let parent_bottom = frame.height() - padding.bottom;

        let children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();
        for child in children {
            if tree.is_gone(child) {
                continue;
            }
            let Some(intent) = tree.intent(child) else {
                continue;
            };
            let gravity = intent
                .as_frame()
                .and_then(|frame| frame.gravity)
                .unwrap_or(DEFAULT_CHILD_GRAVITY);
            let margins = intent.resolved_margins(direction);
            let size = tree.measured_size(child);

            let horizontal = gravity.absolute(direction) & Gravity::HORIZONTAL_MASK;
            let child_left = if horizontal == Gravity::CENTER_HORIZONTAL {
                parent_left + (parent_right - parent_left - size.width) / 2 + margins.left
                    - margins.right
            } else if horizontal == Gravity::RIGHT {
                parent_right - size.width - margins.right
            } else {
                parent_left + margins.left
            };

            let vertical = gravity.vertical();
            let child_top = if vertical == Gravity::CENTER_VERTICAL {
                parent_top + (parent_bottom - parent_top - size.height) / 2 + margins.top
                    - margins.bottom
            } else if vertical == Gravity::BOTTOM {
                parent_bottom - size.height - margins.bottom
            } else {
                parent_top + margins.top
            };

            tree.layout(
                child,
                child_left,
                child_top,
                child_left + size.width,
                child_top + size.height,
            );
        }
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn accepts_intent(&self, intent: &LayoutIntent) -> bool {
        intent.kind() == IntentKind::Frame
    }

    fn default_intent(&self) -> LayoutIntent {
        FrameIntent::new(Dimension::MatchParent, Dimension::MatchParent).into()
    }
}

#[cfg(test)]
#[path = "tests/frame_tests.rs"]
mod tests;
