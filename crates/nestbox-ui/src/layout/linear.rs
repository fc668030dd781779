//! Weighted single-axis stack.
//!
//! Children are measured one after another along the stacking axis. Leftover
//! (or missing) space is then handed to weighted children in proportion to
//! their weight, and children are placed from a gravity-dependent origin.

use nestbox_core::{child_constraint, LayoutStrategy, LayoutTree, NodeId};
use nestbox_layout::{
    resolve_size_and_state, AxisPlacement, Dimension, Gravity, IntentKind, LayoutDirection,
    LayoutIntent, LinearIntent, MeasuredSize, Orientation, Padding, Rect, ResolvedMargins,
    SizeConstraint,
};
use smallvec::SmallVec;

// Baseline buckets, indexed by vertical gravity: center, top, bottom, fill.
const INDEX_TOP: usize = 1;
const INDEX_BOTTOM: usize = 2;
const VERTICAL_GRAVITY_COUNT: usize = 4;

/// Hands out a stacking-axis delta to weighted children in insertion order.
///
/// Each share is `weight * remaining_delta / remaining_weight`, truncated
/// toward zero. Both the remaining delta and the remaining weight shrink as
/// shares are handed out, so a child whose weight covers the whole remaining
/// weight receives everything that is left. Pixels are only lost to
/// truncation when the configured weight sum exceeds the children's total
/// weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightDistributor {
    remaining_weight: f32,
    remaining_delta: i32,
}

impl WeightDistributor {
    pub fn new(delta: i32, weight_sum: f32) -> Self {
        Self {
            remaining_weight: weight_sum,
            remaining_delta: delta,
        }
    }

    /// Share of the remaining delta for a child of `weight`.
    pub fn share(&mut self, weight: f32) -> i32 {
        if weight <= 0.0 || self.remaining_weight <= 0.0 {
            return 0;
        }
        // Float subtraction leaves crumbs; a weight within rounding of the
        // remainder takes all of it.
        let covers_rest = self.remaining_weight - weight <= self.remaining_weight * 1e-5;
        let share = if covers_rest {
            self.remaining_delta
        } else {
            (f64::from(weight) * f64::from(self.remaining_delta) / f64::from(self.remaining_weight))
                as i32
        };
        self.remaining_weight -= weight;
        self.remaining_delta -= share;
        share
    }

    /// Delta not handed out yet.
    pub fn remaining_delta(&self) -> i32 {
        self.remaining_delta
    }
}

/// Per-child values the stack reads from a child's intent.
#[derive(Debug, Clone, Copy)]
struct ChildParams {
    width: Dimension,
    height: Dimension,
    margins: ResolvedMargins,
    weight: f32,
    gravity: Option<Gravity>,
}

impl ChildParams {
    fn of(intent: &LayoutIntent, direction: LayoutDirection) -> Self {
        let (weight, gravity) = intent
            .as_linear()
            .map_or((0.0, None), |linear| (linear.weight, linear.gravity));
        Self {
            width: intent.width(),
            height: intent.height(),
            margins: intent.resolved_margins(direction),
            weight,
            gravity,
        }
    }

    fn dimension(&self, axis: Orientation) -> Dimension {
        axis.pick(self.width, self.height)
    }

    fn with_dimension(mut self, axis: Orientation, dimension: Dimension) -> Self {
        match axis {
            Orientation::Horizontal => self.width = dimension,
            Orientation::Vertical => self.height = dimension,
        }
        self
    }

    /// Weighted child that asked for no size of its own on the stacking axis.
    fn is_weight_only(&self, axis: Orientation) -> bool {
        self.weight > 0.0 && self.dimension(axis) == Dimension::Fixed(0)
    }
}

fn child_specs(
    padding: &Padding,
    params: &ChildParams,
    width: SizeConstraint,
    width_used: i32,
    height: SizeConstraint,
    height_used: i32,
) -> (SizeConstraint, SizeConstraint) {
    (
        child_constraint(
            width,
            padding.horizontal() + params.margins.horizontal() + width_used,
            params.width,
        ),
        child_constraint(
            height,
            padding.vertical() + params.margins.vertical() + height_used,
            params.height,
        ),
    )
}

fn gravity_bucket(gravity: Gravity) -> usize {
    let bits = gravity.vertical().bits();
    (((bits >> 4) & !1) >> 1) as usize
}

/// Running ascent/descent maxima per vertical gravity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BaselineBuckets {
    ascent: [i32; VERTICAL_GRAVITY_COUNT],
    descent: [i32; VERTICAL_GRAVITY_COUNT],
}

impl Default for BaselineBuckets {
    fn default() -> Self {
        Self {
            ascent: [-1; VERTICAL_GRAVITY_COUNT],
            descent: [-1; VERTICAL_GRAVITY_COUNT],
        }
    }
}

impl BaselineBuckets {
    fn record(&mut self, gravity: Gravity, baseline: i32, extent: i32) {
        let index = gravity_bucket(gravity);
        self.ascent[index] = self.ascent[index].max(baseline);
        self.descent[index] = self.descent[index].max(extent - baseline);
    }

    /// Tallest ascent plus deepest descent, when any child reported a baseline.
    fn span(&self) -> Option<i32> {
        if self.ascent.iter().all(|&ascent| ascent == -1) {
            return None;
        }
        let ascent = self.ascent.iter().copied().max().unwrap_or(-1);
        let descent = self.descent.iter().copied().max().unwrap_or(-1);
        Some(ascent + descent)
    }
}

/// Stacks children along one axis, distributing leftover space by weight.
#[derive(Debug, Clone)]
pub struct LinearLayout {
    orientation: Orientation,
    gravity: Gravity,
    weight_sum: Option<f32>,
    baseline_aligned: bool,
    baseline_aligned_child_index: Option<usize>,
    measure_with_largest_child: bool,

    total_length: i32,
    baseline_child_top: i32,
    baselines: BaselineBuckets,
}

impl Default for LinearLayout {
    fn default() -> Self {
        Self::new(Orientation::Horizontal)
    }
}

impl LinearLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            gravity: Gravity::default(),
            weight_sum: None,
            baseline_aligned: true,
            baseline_aligned_child_index: None,
            measure_with_largest_child: false,
            total_length: 0,
            baseline_child_top: 0,
            baselines: BaselineBuckets::default(),
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Total weight shares are computed against. Non-positive values fall
    /// back to the sum of the children's weights.
    pub fn with_weight_sum(mut self, weight_sum: f32) -> Self {
        self.weight_sum = (weight_sum > 0.0).then_some(weight_sum);
        self
    }

    pub fn with_baseline_aligned(mut self, aligned: bool) -> Self {
        self.baseline_aligned = aligned;
        self
    }

    /// Child whose baseline becomes the baseline of the stack.
    pub fn with_baseline_aligned_child_index(mut self, index: usize) -> Self {
        self.baseline_aligned_child_index = Some(index);
        self
    }

    /// Sizes every weighted child like the largest child when the stacking
    /// axis is not exact.
    pub fn with_measure_with_largest_child(mut self, enabled: bool) -> Self {
        self.measure_with_largest_child = enabled;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn weight_sum(&self) -> Option<f32> {
        self.weight_sum
    }

    pub fn is_baseline_aligned(&self) -> bool {
        self.baseline_aligned
    }

    /// Stacking-axis length of the content, padding included, from the last measure.
    pub fn total_length(&self) -> i32 {
        self.total_length
    }

    fn grow(&mut self, extent: i32) {
        self.total_length = self.total_length.max(self.total_length + extent);
    }

    fn measure_stack(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        let axis = self.orientation;
        let cross = axis.cross_axis();
        let horizontal = axis.is_horizontal();
        let main_spec = axis.pick(width, height);
        let cross_spec = cross.pick(width, height);
        let main_exact = main_spec.is_exactly();
        let cross_exact = cross_spec.is_exactly();
        let padding = tree.padding(node);
        let min_size = tree.min_size(node);
        let direction = tree.layout_direction();
        let track_baselines = horizontal && self.baseline_aligned;
        let children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();

        self.total_length = 0;
        self.baseline_child_top = 0;
        self.baselines = BaselineBuckets::default();

        let mut max_cross = 0;
        let mut alternative_max_cross = 0;
        let mut weighted_max_cross = 0;
        let mut all_fill_parent = true;
        let mut match_cross = false;
        let mut total_weight = 0.0f32;
        let mut main_too_small = false;
        let mut cross_too_small = false;
        let mut largest_child = i32::MIN;
        let mut skipped_measure = false;

        for (index, &child) in children.iter().enumerate() {
            if tree.is_gone(child) {
                continue;
            }
            let Some(params) = tree.intent(child).map(|intent| ChildParams::of(intent, direction))
            else {
                continue;
            };
            total_weight += params.weight;

            if main_exact && params.is_weight_only(axis) {
                self.grow(params.margins.along(axis));
                skipped_measure = true;
                if track_baselines {
                    let free = SizeConstraint::unspecified();
                    tree.measure(child, free, free);
                }
            } else {
                // A weighted child asking for zero under a loose constraint is
                // measured as wrap content so it does not collapse.
                let probe = if params.is_weight_only(axis) {
                    params.with_dimension(axis, Dimension::WrapContent)
                } else {
                    params
                };
                let used = if total_weight == 0.0 {
                    self.total_length
                } else {
                    0
                };
                let (width_used, height_used) = axis.compose(used, 0);
                let (child_width, child_height) =
                    child_specs(&padding, &probe, width, width_used, height, height_used);
                tree.measure(child, child_width, child_height);

                let child_main = axis.pick(tree.measured_width(child), tree.measured_height(child));
                self.grow(child_main + params.margins.along(axis));
                if self.measure_with_largest_child {
                    largest_child = largest_child.max(child_main);
                }
            }

            if axis.is_vertical() {
                if let Some(baseline_index) = self.baseline_aligned_child_index {
                    if baseline_index == index + 1 {
                        self.baseline_child_top = self.total_length;
                    }
                    if index < baseline_index && params.weight > 0.0 {
                        log::warn!(
                            "weighted child {index} precedes baseline child {baseline_index}; \
                             the stack baseline will be off"
                        );
                    }
                }
            }

            let cross_dimension = params.dimension(cross);
            let match_locally = !cross_exact && cross_dimension.is_match_parent();
            match_cross |= match_locally;

            let cross_margins = params.margins.along(cross);
            let child_cross =
                cross.pick(tree.measured_width(child), tree.measured_height(child)) + cross_margins;
            let state = tree.measured_state(child);
            main_too_small |= axis.pick(state.width_too_small(), state.height_too_small());
            cross_too_small |= cross.pick(state.width_too_small(), state.height_too_small());

            if track_baselines {
                if let Some(baseline) = tree.baseline(child) {
                    let gravity = params.gravity.unwrap_or(self.gravity);
                    self.baselines.record(gravity, baseline, child_cross);
                }
            }

            max_cross = max_cross.max(child_cross);
            all_fill_parent &= cross_dimension.is_match_parent();
            let contribution = if match_locally {
                cross_margins
            } else {
                child_cross
            };
            if params.weight > 0.0 {
                weighted_max_cross = weighted_max_cross.max(contribution);
            } else {
                alternative_max_cross = alternative_max_cross.max(contribution);
            }
        }

        if let Some(span) = self.baselines.span() {
            max_cross = max_cross.max(span);
        }

        if self.measure_with_largest_child && !main_exact {
            self.total_length = 0;
            for &child in &children {
                if tree.is_gone(child) {
                    continue;
                }
                let margins = tree
                    .intent(child)
                    .map_or(0, |intent| intent.resolved_margins(direction).along(axis));
                self.grow(largest_child + margins);
            }
        }

        let main_padding = axis.pick(padding.horizontal(), padding.vertical());
        let cross_padding = cross.pick(padding.horizontal(), padding.vertical());
        self.total_length += main_padding;

        let wanted_main = self.total_length.max(axis.pick(min_size.width, min_size.height));
        let main_resolved = resolve_size_and_state(wanted_main, main_spec, false);
        let main_size = main_resolved.size;

        // Children skipped above still need their share, even when it is zero.
        let delta = main_size - self.total_length;
        if skipped_measure || (delta != 0 && total_weight > 0.0) {
            let weight_sum = self.weight_sum.unwrap_or(total_weight);
            let mut distributor = WeightDistributor::new(delta, weight_sum);
            log::trace!("distributing {delta}px over weight {weight_sum}");

            if track_baselines {
                self.baselines = BaselineBuckets::default();
                max_cross = -1;
            }
            self.total_length = 0;

            for &child in &children {
                if tree.is_gone(child) {
                    continue;
                }
                let Some(params) =
                    tree.intent(child).map(|intent| ChildParams::of(intent, direction))
                else {
                    continue;
                };
                let cross_dimension = params.dimension(cross);
                let cross_margins = params.margins.along(cross);

                if params.weight > 0.0 {
                    let share = distributor.share(params.weight);
                    let child_cross_spec =
                        child_constraint(cross_spec, cross_padding + cross_margins, cross_dimension);
                    let main = if params.is_weight_only(axis) && main_exact {
                        share.max(0)
                    } else {
                        let measured =
                            axis.pick(tree.measured_width(child), tree.measured_height(child));
                        (measured + share).max(0)
                    };
                    let (child_width, child_height) =
                        axis.compose(SizeConstraint::exactly(main), child_cross_spec);
                    tree.measure(child, child_width, child_height);

                    let state = tree.measured_state(child);
                    main_too_small |= axis.pick(state.width_too_small(), state.height_too_small());
                }

                let child_main = axis.pick(tree.measured_width(child), tree.measured_height(child));
                self.grow(child_main + params.margins.along(axis));

                let match_locally = !cross_exact && cross_dimension.is_match_parent();
                let child_cross = cross.pick(tree.measured_width(child), tree.measured_height(child))
                    + cross_margins;
                max_cross = max_cross.max(child_cross);
                alternative_max_cross = alternative_max_cross.max(if match_locally {
                    cross_margins
                } else {
                    child_cross
                });
                all_fill_parent &= cross_dimension.is_match_parent();

                if track_baselines {
                    if let Some(baseline) = tree.baseline(child) {
                        let gravity = params.gravity.unwrap_or(self.gravity);
                        self.baselines.record(gravity, baseline, child_cross);
                    }
                }
            }

            self.total_length += main_padding;
            if let Some(span) = self.baselines.span() {
                max_cross = max_cross.max(span);
            }
        } else {
            alternative_max_cross = alternative_max_cross.max(weighted_max_cross);

            if self.measure_with_largest_child && !main_exact {
                for &child in &children {
                    if tree.is_gone(child) {
                        continue;
                    }
                    let weighted = tree
                        .intent(child)
                        .and_then(LayoutIntent::as_linear)
                        .is_some_and(|linear| linear.weight > 0.0);
                    if !weighted {
                        continue;
                    }
                    let measured_cross =
                        cross.pick(tree.measured_width(child), tree.measured_height(child));
                    let (child_width, child_height) = axis.compose(
                        SizeConstraint::exactly(largest_child),
                        SizeConstraint::exactly(measured_cross),
                    );
                    tree.measure(child, child_width, child_height);
                }
            }
        }

        if !all_fill_parent && !cross_exact {
            max_cross = alternative_max_cross;
        }
        let wanted_cross =
            (max_cross + cross_padding).max(cross.pick(min_size.width, min_size.height));
        let cross_resolved = resolve_size_and_state(wanted_cross, cross_spec, cross_too_small);
        let main_measured = MeasuredSize {
            size: main_size,
            too_small: main_resolved.too_small || (horizontal && main_too_small),
        };
        let (measured_width, measured_height) = axis.compose(main_measured, cross_resolved);
        tree.set_measured_dimension(node, measured_width, measured_height);

        if match_cross {
            self.force_uniform_cross(tree, node, &children, main_spec);
        }
    }

    /// Remeasures children that match the stack on the cross axis now that
    /// the stack's cross size is known. Their stacking-axis size is pinned
    /// to what they measured before.
    fn force_uniform_cross(
        &self,
        tree: &mut LayoutTree,
        node: NodeId,
        children: &[NodeId],
        main_spec: SizeConstraint,
    ) {
        let axis = self.orientation;
        let cross = axis.cross_axis();
        let padding = tree.padding(node);
        let direction = tree.layout_direction();
        let uniform = SizeConstraint::exactly(
            cross.pick(tree.measured_width(node), tree.measured_height(node)),
        );
        for &child in children {
            if tree.is_gone(child) {
                continue;
            }
            let Some(params) = tree.intent(child).map(|intent| ChildParams::of(intent, direction))
            else {
                continue;
            };
            if !params.dimension(cross).is_match_parent() {
                continue;
            }
            let measured_main = axis.pick(tree.measured_width(child), tree.measured_height(child));
            let pinned = params.with_dimension(axis, Dimension::Fixed(measured_main));
            let (width, height) = axis.compose(main_spec, uniform);
            let (child_width, child_height) = child_specs(&padding, &pinned, width, 0, height, 0);
            tree.measure(child, child_width, child_height);
        }
    }

    fn layout_vertical(&self, tree: &mut LayoutTree, node: NodeId, frame: Rect) {
        let padding = tree.padding(node);
        let direction = tree.layout_direction();
        let width = frame.width();
        let child_right = width - padding.right;
        let child_space = width - padding.horizontal();
        let minor = self.gravity.horizontal();

        let mut child_top = match self.gravity.vertical_placement() {
            AxisPlacement::End => padding.top + frame.height() - self.total_length,
            AxisPlacement::Center => padding.top + (frame.height() - self.total_length) / 2,
            AxisPlacement::Start => padding.top,
        };

        let children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();
        for child in children {
            if tree.is_gone(child) {
                continue;
            }
            let Some(params) = tree.intent(child).map(|intent| ChildParams::of(intent, direction))
            else {
                continue;
            };
            let size = tree.measured_size(child);
            let margins = params.margins;
            let gravity = params.gravity.unwrap_or(minor);
            let child_left = match gravity.horizontal_placement(direction) {
                AxisPlacement::Center => {
                    padding.left + (child_space - size.width) / 2 + margins.left - margins.right
                }
                AxisPlacement::End => child_right - size.width - margins.right,
                AxisPlacement::Start => padding.left + margins.left,
            };

            child_top += margins.top;
            tree.layout(
                child,
                child_left,
                child_top,
                child_left + size.width,
                child_top + size.height,
            );
            child_top += size.height + margins.bottom;
        }
    }

    fn layout_horizontal(&self, tree: &mut LayoutTree, node: NodeId, frame: Rect) {
        let padding = tree.padding(node);
        let direction = tree.layout_direction();
        let height = frame.height();
        let child_bottom = height - padding.bottom;
        let child_space = height - padding.vertical();
        let minor = self.gravity.vertical();

        let mut child_left = match self.gravity.horizontal_placement(direction) {
            AxisPlacement::End => padding.left + frame.width() - self.total_length,
            AxisPlacement::Center => padding.left + (frame.width() - self.total_length) / 2,
            AxisPlacement::Start => padding.left,
        };

        let mut children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();
        if direction.is_rtl() {
            children.reverse();
        }
        for child in children {
            if tree.is_gone(child) {
                continue;
            }
            let Some(params) = tree.intent(child).map(|intent| ChildParams::of(intent, direction))
            else {
                continue;
            };
            let size = tree.measured_size(child);
            let margins = params.margins;
            let baseline = if self.baseline_aligned && !params.height.is_match_parent() {
                tree.baseline(child)
            } else {
                None
            };

            let gravity = params.gravity.unwrap_or(minor).vertical();
            let child_top = if gravity == Gravity::TOP {
                let top = padding.top + margins.top;
                match baseline {
                    Some(baseline) => top + self.baselines.ascent[INDEX_TOP] - baseline,
                    None => top,
                }
            } else if gravity == Gravity::CENTER_VERTICAL {
                padding.top + (child_space - size.height) / 2 + margins.top - margins.bottom
            } else if gravity == Gravity::BOTTOM {
                let top = child_bottom - size.height - margins.bottom;
                match baseline {
                    Some(baseline) => {
                        let descent = size.height - baseline;
                        top - (self.baselines.descent[INDEX_BOTTOM] - descent)
                    }
                    None => top,
                }
            } else {
                padding.top + margins.top
            };

            child_left += margins.left;
            tree.layout(
                child,
                child_left,
                child_top,
                child_left + size.width,
                child_top + size.height,
            );
            child_left += size.width + margins.right;
        }
    }
}

impl LayoutStrategy for LinearLayout {
    fn debug_name(&self) -> &'static str {
        "LinearLayout"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        self.measure_stack(tree, node, width, height);
    }

    fn position_children(&mut self, tree: &mut LayoutTree, node: NodeId, _changed: bool, frame: Rect) {
        match self.orientation {
            Orientation::Vertical => self.layout_vertical(tree, node, frame),
            Orientation::Horizontal => self.layout_horizontal(tree, node, frame),
        }
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn accepts_intent(&self, intent: &LayoutIntent) -> bool {
        intent.kind() == IntentKind::Linear
    }

    fn default_intent(&self) -> LayoutIntent {
        match self.orientation {
            Orientation::Horizontal => {
                LinearIntent::new(Dimension::WrapContent, Dimension::WrapContent).into()
            }
            Orientation::Vertical => {
                LinearIntent::new(Dimension::MatchParent, Dimension::WrapContent).into()
            }
        }
    }

    fn baseline(&self, tree: &LayoutTree, node: NodeId) -> Option<i32> {
        let index = self.baseline_aligned_child_index?;
        let child = tree.child_at(node, index)?;
        let child_baseline = tree.baseline(child)?;
        let padding = tree.padding(node);
        let top_margin = tree
            .intent(child)
            .map_or(0, |intent| intent.resolved_margins(tree.layout_direction()).top);

        let content_top = match self.orientation {
            Orientation::Vertical => {
                let height = tree
                    .frame(node)
                    .map_or_else(|| tree.measured_height(node), |frame| frame.height());
                let origin = match self.gravity.vertical_placement() {
                    AxisPlacement::Start => padding.top,
                    AxisPlacement::Center => padding.top + (height - self.total_length) / 2,
                    AxisPlacement::End => padding.top + height - self.total_length,
                };
                origin + self.baseline_child_top
            }
            Orientation::Horizontal => padding.top,
        };
        Some(content_top + top_margin + child_baseline)
    }
}

#[cfg(test)]
#[path = "tests/linear_tests.rs"]
mod tests;
