//! Rule-based relative positioning.
//!
//! Children name sibling anchors ("below #title", "left of #icon") or parent
//! edges. Children are sorted per axis with a [`DependencyGraph`] so that an
//! anchor is always measured and positioned before the children that refer
//! to it, then resolved in two passes: horizontal edges first, then vertical
//! edges with the final measurement.

mod graph;

pub use graph::{DependencyGraph, GraphAxis, GraphState, SortOutcome};

use nestbox_core::collections::map::{HashMap, HashSet};
use nestbox_core::{LayoutStrategy, LayoutTree, NodeId, UnresolvedChildPolicy};
use nestbox_layout::{
    resolve_size_and_state, AnchorId, Dimension, Gravity, IntentKind, LayoutDirection,
    LayoutIntent, Padding, Rect, RelativeIntent, RelativeVerb, ResolvedMargins,
    RuleSet, SizeConstraint,
};
use smallvec::SmallVec;

/// Edges of a child along one axis. `None` means the edge is free to move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Span {
    start: Option<i32>,
    end: Option<i32>,
}

impl Span {
    fn fixed(start: i32, extent: i32) -> Self {
        Span {
            start: Some(start),
            end: Some(start + extent),
        }
    }

    fn shift(&mut self, delta: i32) {
        self.start = self.start.map(|start| start + delta);
        self.end = self.end.map(|end| end + delta);
    }

    fn start_or_zero(&self) -> i32 {
        self.start.unwrap_or_default()
    }

    fn end_or_zero(&self) -> i32 {
        self.end.unwrap_or_default()
    }
}

/// Working geometry of one child during a measure pass.
#[derive(Debug, Clone, Copy, Default)]
struct ChildBounds {
    horizontal: Span,
    vertical: Span,
    resolved_horizontal: bool,
    resolved_vertical: bool,
}

impl ChildBounds {
    fn left(&self) -> i32 {
        self.horizontal.start_or_zero()
    }

    fn right(&self) -> i32 {
        self.horizontal.end_or_zero()
    }

    fn top(&self) -> i32 {
        self.vertical.start_or_zero()
    }

    fn bottom(&self) -> i32 {
        self.vertical.end_or_zero()
    }

    fn is_resolved(&self, axis: GraphAxis) -> bool {
        match axis {
            GraphAxis::Horizontal => self.resolved_horizontal,
            GraphAxis::Vertical => self.resolved_vertical,
        }
    }
}

/// Parent-relative rules that affect placement once both edges are known.
#[derive(Debug, Clone, Copy, Default)]
struct Placement {
    center_horizontal: bool,
    center_vertical: bool,
    parent_right: bool,
    parent_bottom: bool,
}

impl Placement {
    fn of(rules: &RuleSet) -> Self {
        let centered = rules.is_set(RelativeVerb::CenterInParent);
        Placement {
            center_horizontal: centered || rules.is_set(RelativeVerb::CenterHorizontal),
            center_vertical: centered || rules.is_set(RelativeVerb::CenterVertical),
            parent_right: rules.is_set(RelativeVerb::AlignParentRight),
            parent_bottom: rules.is_set(RelativeVerb::AlignParentBottom),
        }
    }
}

/// Union of the children's margin boxes, used for group gravity.
#[derive(Debug, Clone, Copy)]
struct ContentBounds {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl ContentBounds {
    const EMPTY: ContentBounds = ContentBounds {
        left: i32::MAX,
        top: i32::MAX,
        right: i32::MIN,
        bottom: i32::MIN,
    };

    fn include(
        &mut self,
        bounds: &ChildBounds,
        margins: &ResolvedMargins,
        leading: bool,
        trailing: bool,
    ) {
        if leading {
            self.left = self.left.min(bounds.left() - margins.left);
            self.top = self.top.min(bounds.top() - margins.top);
        }
        if trailing {
            self.right = self.right.max(bounds.right() + margins.right);
            self.bottom = self.bottom.max(bounds.bottom() + margins.bottom);
        }
    }

    fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }
}

/// Positions children by anchor rules relative to siblings and the parent.
#[derive(Debug, Default)]
pub struct RelativeLayout {
    gravity: Gravity,
    ignore_gravity: Option<AnchorId>,
    graph: DependencyGraph,
    dirty_hierarchy: bool,
    sorted_direction: Option<LayoutDirection>,
    horizontal_order: Vec<NodeId>,
    vertical_order: Vec<NodeId>,
    horizontal_sort: SortOutcome,
    vertical_sort: SortOutcome,
    unordered_horizontal: HashSet<NodeId>,
    unordered_vertical: HashSet<NodeId>,
    skipped: SmallVec<[NodeId; 4]>,
    bounds: HashMap<NodeId, ChildBounds>,
    baseline_child: Option<NodeId>,
    has_baseline_child: bool,
}

impl RelativeLayout {
    pub fn new() -> Self {
        Self {
            dirty_hierarchy: true,
            ..Self::default()
        }
    }

    /// Gravity applied to the children as a block inside the padded bounds.
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Child exempt from the group gravity.
    pub fn with_ignore_gravity(mut self, key: impl Into<AnchorId>) -> Self {
        self.ignore_gravity = Some(key.into());
        self
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Outcome of the most recent sort along `axis`.
    pub fn last_sort(&self, axis: GraphAxis) -> SortOutcome {
        match axis {
            GraphAxis::Horizontal => self.horizontal_sort,
            GraphAxis::Vertical => self.vertical_sort,
        }
    }

    /// Processing order used by the most recent measure along `axis`.
    pub fn sorted_children(&self, axis: GraphAxis) -> &[NodeId] {
        match axis {
            GraphAxis::Horizontal => &self.horizontal_order,
            GraphAxis::Vertical => &self.vertical_order,
        }
    }

    /// State of the dependency graph. A cycle on either axis is reported
    /// even when the other axis sorted afterwards.
    pub fn graph_state(&self) -> GraphState {
        if self.horizontal_sort.is_complete() && self.vertical_sort.is_complete() {
            self.graph.state()
        } else {
            GraphState::CycleDetected
        }
    }

    /// Rebuilds the graph from the current children and sorts both axes.
    fn sort_children(&mut self, tree: &LayoutTree, node: NodeId, direction: LayoutDirection) {
        self.dirty_hierarchy = false;
        self.sorted_direction = Some(direction);
        self.graph.clear();
        self.unordered_horizontal.clear();
        self.unordered_vertical.clear();
        self.skipped.clear();

        let children = tree.children(node);
        for &child in children {
            let rules = tree
                .intent(child)
                .and_then(LayoutIntent::as_relative)
                .map(|intent| intent.rules.resolve(direction))
                .unwrap_or_default();
            self.graph.add(child, tree.key(child).cloned(), rules);
        }

        self.horizontal_sort = self
            .graph
            .sort(GraphAxis::Horizontal, &mut self.horizontal_order);
        self.vertical_sort = self.graph.sort(GraphAxis::Vertical, &mut self.vertical_order);
        if self.horizontal_sort.is_complete() && self.vertical_sort.is_complete() {
            return;
        }

        match tree.config().unresolved_children {
            UnresolvedChildPolicy::MeasureAgainstParent => {
                for &child in children {
                    if !self.horizontal_order.contains(&child) {
                        self.horizontal_order.push(child);
                        self.unordered_horizontal.insert(child);
                    }
                    if !self.vertical_order.contains(&child) {
                        self.vertical_order.push(child);
                        self.unordered_vertical.insert(child);
                    }
                }
            }
            UnresolvedChildPolicy::Skip => {
                for &child in children {
                    if !self.horizontal_order.contains(&child)
                        || !self.vertical_order.contains(&child)
                    {
                        self.skipped.push(child);
                    }
                }
                let skipped = &self.skipped;
                self.horizontal_order.retain(|child| !skipped.contains(child));
                self.vertical_order.retain(|child| !skipped.contains(child));
            }
        }
    }

    fn rules(&self, child: NodeId) -> Option<&RuleSet> {
        self.graph.rules(child)
    }

    fn placement(&self, child: NodeId) -> Placement {
        self.rules(child).map(Placement::of).unwrap_or_default()
    }

    fn is_set(&self, child: NodeId, verb: RelativeVerb) -> bool {
        self.rules(child).is_some_and(|rules| rules.is_set(verb))
    }

    /// Sibling anchored by `verb`, skipping Gone anchors through their own
    /// rule for the same verb. Only anchors already resolved along `axis` in
    /// this pass count.
    fn related(
        &self,
        tree: &LayoutTree,
        child: NodeId,
        verb: RelativeVerb,
        axis: GraphAxis,
    ) -> Option<NodeId> {
        let unordered = match axis {
            GraphAxis::Horizontal => &self.unordered_horizontal,
            GraphAxis::Vertical => &self.unordered_vertical,
        };
        if unordered.contains(&child) {
            return None;
        }
        let mut anchor = self.graph.related(child, verb)?;
        for _ in 0..self.graph.len() {
            if !tree.is_gone(anchor) {
                let resolved = self
                    .bounds
                    .get(&anchor)
                    .is_some_and(|bounds| bounds.is_resolved(axis));
                return resolved.then_some(anchor);
            }
            anchor = self.graph.related(anchor, verb)?;
        }
        None
    }

    fn anchor_bounds(
        &self,
        tree: &LayoutTree,
        child: NodeId,
        verb: RelativeVerb,
        axis: GraphAxis,
    ) -> Option<(ChildBounds, ResolvedMargins)> {
        let anchor = self.related(tree, child, verb, axis)?;
        let bounds = *self.bounds.get(&anchor)?;
        let margins = tree
            .intent(anchor)
            .map(|intent| intent.resolved_margins(tree.layout_direction()))
            .unwrap_or_default();
        Some((bounds, margins))
    }

    fn horizontal_rule_span(
        &self,
        tree: &LayoutTree,
        child: NodeId,
        margins: &ResolvedMargins,
        padding: Padding,
        my_width: i32,
    ) -> Span {
        let axis = GraphAxis::Horizontal;
        let align_with_parent = align_with_parent(tree, child);
        let parent_right = (my_width >= 0).then(|| my_width - padding.right - margins.right);
        let parent_left = padding.left + margins.left;
        let mut span = Span::default();

        match self.anchor_bounds(tree, child, RelativeVerb::LeftOf, axis) {
            Some((anchor, anchor_margins)) => {
                span.end = Some(anchor.left() - (anchor_margins.left + margins.right));
            }
            None if align_with_parent && self.is_set(child, RelativeVerb::LeftOf) => {
                span.end = parent_right.or(span.end);
            }
            None => {}
        }
        match self.anchor_bounds(tree, child, RelativeVerb::RightOf, axis) {
            Some((anchor, anchor_margins)) => {
                span.start = Some(anchor.right() + anchor_margins.right + margins.left);
            }
            None if align_with_parent && self.is_set(child, RelativeVerb::RightOf) => {
                span.start = Some(parent_left);
            }
            None => {}
        }
        match self.anchor_bounds(tree, child, RelativeVerb::AlignLeft, axis) {
            Some((anchor, _)) => span.start = Some(anchor.left() + margins.left),
            None if align_with_parent && self.is_set(child, RelativeVerb::AlignLeft) => {
                span.start = Some(parent_left);
            }
            None => {}
        }
        match self.anchor_bounds(tree, child, RelativeVerb::AlignRight, axis) {
            Some((anchor, _)) => span.end = Some(anchor.right() - margins.right),
            None if align_with_parent && self.is_set(child, RelativeVerb::AlignRight) => {
                span.end = parent_right.or(span.end);
            }
            None => {}
        }
        if self.is_set(child, RelativeVerb::AlignParentLeft) {
            span.start = Some(parent_left);
        }
        if self.is_set(child, RelativeVerb::AlignParentRight) {
            span.end = parent_right.or(span.end);
        }
        span
    }

    fn vertical_rule_span(
        &self,
        tree: &LayoutTree,
        child: NodeId,
        margins: &ResolvedMargins,
        padding: Padding,
        my_height: i32,
    ) -> Span {
        let axis = GraphAxis::Vertical;
        let align_with_parent = align_with_parent(tree, child);
        let parent_bottom = (my_height >= 0).then(|| my_height - padding.bottom - margins.bottom);
        let parent_top = padding.top + margins.top;
        let mut span = Span::default();

        match self.anchor_bounds(tree, child, RelativeVerb::Above, axis) {
            Some((anchor, anchor_margins)) => {
                span.end = Some(anchor.top() - (anchor_margins.top + margins.bottom));
            }
            None if align_with_parent && self.is_set(child, RelativeVerb::Above) => {
                span.end = parent_bottom.or(span.end);
            }
            None => {}
        }
        match self.anchor_bounds(tree, child, RelativeVerb::Below, axis) {
            Some((anchor, anchor_margins)) => {
                span.start = Some(anchor.bottom() + anchor_margins.bottom + margins.top);
            }
            None if align_with_parent && self.is_set(child, RelativeVerb::Below) => {
                span.start = Some(parent_top);
            }
            None => {}
        }
        match self.anchor_bounds(tree, child, RelativeVerb::AlignTop, axis) {
            Some((anchor, _)) => span.start = Some(anchor.top() + margins.top),
            None if align_with_parent && self.is_set(child, RelativeVerb::AlignTop) => {
                span.start = Some(parent_top);
            }
            None => {}
        }
        match self.anchor_bounds(tree, child, RelativeVerb::AlignBottom, axis) {
            Some((anchor, _)) => span.end = Some(anchor.bottom() - margins.bottom),
            None if align_with_parent && self.is_set(child, RelativeVerb::AlignBottom) => {
                span.end = parent_bottom.or(span.end);
            }
            None => {}
        }
        if self.is_set(child, RelativeVerb::AlignParentTop) {
            span.start = Some(parent_top);
        }
        if self.is_set(child, RelativeVerb::AlignParentBottom) {
            span.end = parent_bottom.or(span.end);
        }
        span
    }

    /// Moves `child` so its baseline matches its baseline anchor, then
    /// tracks the top-most, left-most child as the group's baseline source.
    fn align_baseline(&mut self, tree: &LayoutTree, child: NodeId) {
        let anchor_top = self
            .related(tree, child, RelativeVerb::AlignBaseline, GraphAxis::Vertical)
            .and_then(|anchor| {
                let baseline = tree.baseline(anchor)?;
                let bounds = self.bounds.get(&anchor)?;
                Some(bounds.top() + baseline)
            });
        let Some(bounds) = self.bounds.get_mut(&child) else {
            return;
        };
        if let Some(mut offset) = anchor_top {
            if let Some(baseline) = tree.baseline(child) {
                offset -= baseline;
            }
            let height = bounds.bottom() - bounds.top();
            bounds.vertical = Span::fixed(offset, height);
        }

        let candidate = *bounds;
        let replace = match self.baseline_child.and_then(|current| self.bounds.get(&current)) {
            None => true,
            Some(current) => {
                candidate.top() < current.top()
                    || (candidate.top() == current.top() && candidate.left() < current.left())
            }
        };
        if replace {
            self.baseline_child = Some(child);
        }
    }

    fn for_each_visible(
        &mut self,
        tree: &LayoutTree,
        children: &[NodeId],
        mut apply: impl FnMut(NodeId, &mut ChildBounds, Placement),
    ) {
        for &child in children {
            if tree.is_gone(child) {
                continue;
            }
            let placement = self.placement(child);
            if let Some(bounds) = self.bounds.get_mut(&child) {
                apply(child, bounds, placement);
            }
        }
    }
}

fn align_with_parent(tree: &LayoutTree, child: NodeId) -> bool {
    tree.intent(child)
        .and_then(LayoutIntent::as_relative)
        .is_some_and(|intent| intent.align_with_parent_if_missing)
}

/// Constraint for one axis of a child from the edges its rules fixed.
///
/// A negative `my_size` means the group itself is unconstrained on this axis.
fn edge_constraint(
    span: Span,
    dimension: Dimension,
    (start_margin, end_margin): (i32, i32),
    (start_padding, end_padding): (i32, i32),
    my_size: i32,
) -> SizeConstraint {
    if my_size < 0 {
        return match dimension.fixed() {
            Some(size) => SizeConstraint::exactly(size),
            None => SizeConstraint::unspecified(),
        };
    }

    let start = span.start.unwrap_or(start_padding + start_margin);
    let end = span.end.unwrap_or(my_size - end_padding - end_margin);
    let available = end - start;
    if span.start.is_some() && span.end.is_some() {
        return SizeConstraint::exactly(available.max(0));
    }
    match dimension {
        Dimension::Fixed(size) if available >= 0 => SizeConstraint::exactly(available.min(size)),
        Dimension::Fixed(size) => SizeConstraint::exactly(size),
        Dimension::MatchParent => SizeConstraint::exactly(available.max(0)),
        Dimension::WrapContent if available >= 0 => SizeConstraint::at_most(available),
        Dimension::WrapContent => SizeConstraint::unspecified(),
    }
}

/// Fills in the free edges of `span` from the measured `extent`.
///
/// `leading` is where an unconstrained child starts and `trailing`, when
/// set, is where it ends instead. Returns true when the child was centered,
/// which needs a fixup once a wrapped group knows its size.
fn settle_span(
    span: &mut Span,
    extent: i32,
    centered: bool,
    wrap_content: bool,
    my_size: i32,
    leading: i32,
    trailing: Option<i32>,
) -> bool {
    match (span.start, span.end) {
        (None, Some(end)) => span.start = Some(end - extent),
        (Some(start), None) => span.end = Some(start + extent),
        (None, None) if centered => {
            *span = if wrap_content {
                Span::fixed(leading, extent)
            } else {
                Span::fixed((my_size - extent) / 2, extent)
            };
            return true;
        }
        (None, None) => {
            *span = match trailing {
                Some(end) => Span::fixed(end - extent, extent),
                None => Span::fixed(leading, extent),
            };
        }
        (Some(_), Some(_)) => {}
    }
    false
}

impl LayoutStrategy for RelativeLayout {
    fn debug_name(&self) -> &'static str {
        "RelativeLayout"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        let direction = tree.layout_direction();
        if self.dirty_hierarchy || self.sorted_direction != Some(direction) {
            self.sort_children(tree, node, direction);
        }
        let rtl = direction.is_rtl();
        let padding = tree.padding(node);

        let mut my_width = if width.is_unspecified() { -1 } else { width.size() };
        let my_height = if height.is_unspecified() { -1 } else { height.size() };
        let wrap_width = !width.is_exactly();
        let wrap_height = !height.is_exactly();
        let mut measured_width = if wrap_width { 0 } else { my_width };
        let mut measured_height = if wrap_height { 0 } else { my_height };

        let horizontal_gravity = {
            let gravity = self.gravity.horizontal();
            gravity != Gravity::START && !gravity.is_empty()
        };
        let vertical_gravity = {
            let gravity = self.gravity.vertical();
            gravity != Gravity::TOP && !gravity.is_empty()
        };
        let ignore = if horizontal_gravity || vertical_gravity {
            self.ignore_gravity
                .as_ref()
                .and_then(|key| self.graph.lookup(key))
        } else {
            None
        };

        if rtl && my_width < 0 {
            my_width = tree.config().rtl_default_width;
        }

        self.bounds.clear();
        self.has_baseline_child = false;
        self.baseline_child = None;
        let mut content = ContentBounds::EMPTY;
        let mut offset_horizontal = false;
        let mut offset_vertical = false;

        let horizontal = std::mem::take(&mut self.horizontal_order);
        for &child in &horizontal {
            if tree.is_gone(child) {
                continue;
            }
            let Some(intent) = tree.intent(child).cloned() else {
                continue;
            };
            let margins = intent.resolved_margins(direction);
            let mut span = self.horizontal_rule_span(tree, child, &margins, padding, my_width);

            let child_width = edge_constraint(
                span,
                intent.width(),
                (margins.left, margins.right),
                (padding.left, padding.right),
                my_width,
            );
            let child_height = if my_height < 0 {
                match intent.height().fixed() {
                    Some(size) => SizeConstraint::exactly(size),
                    None => SizeConstraint::unspecified(),
                }
            } else if intent.width().is_match_parent() {
                SizeConstraint::exactly(my_height)
            } else {
                SizeConstraint::at_most(my_height)
            };
            tree.measure(child, child_width, child_height);

            let placement = self.placement(child);
            let trailing = rtl.then(|| my_width - padding.right - margins.right);
            let centered = settle_span(
                &mut span,
                tree.measured_width(child),
                placement.center_horizontal,
                wrap_width,
                my_width,
                padding.left + margins.left,
                trailing,
            );
            offset_horizontal |= centered || placement.parent_right;

            self.bounds.insert(
                child,
                ChildBounds {
                    horizontal: span,
                    resolved_horizontal: true,
                    ..ChildBounds::default()
                },
            );
        }
        self.horizontal_order = horizontal;

        let vertical = std::mem::take(&mut self.vertical_order);
        for &child in &vertical {
            if tree.is_gone(child) {
                continue;
            }
            let Some(intent) = tree.intent(child).cloned() else {
                continue;
            };
            let margins = intent.resolved_margins(direction);
            let mut span = self.vertical_rule_span(tree, child, &margins, padding, my_height);
            if self.is_set(child, RelativeVerb::AlignBaseline) {
                self.has_baseline_child = true;
            }

            let horizontal_span = self
                .bounds
                .get(&child)
                .map(|bounds| bounds.horizontal)
                .unwrap_or_default();
            let child_width = edge_constraint(
                horizontal_span,
                intent.width(),
                (margins.left, margins.right),
                (padding.left, padding.right),
                my_width,
            );
            let child_height = edge_constraint(
                span,
                intent.height(),
                (margins.top, margins.bottom),
                (padding.top, padding.bottom),
                my_height,
            );
            tree.measure(child, child_width, child_height);

            let placement = self.placement(child);
            let centered = settle_span(
                &mut span,
                tree.measured_height(child),
                placement.center_vertical,
                wrap_height,
                my_height,
                padding.top + margins.top,
                None,
            );
            offset_vertical |= centered || placement.parent_bottom;

            let bounds = self.bounds.entry(child).or_default();
            bounds.vertical = span;
            bounds.resolved_vertical = true;
            let bounds = *bounds;

            if wrap_width {
                let extent = if rtl {
                    my_width - bounds.left() + margins.left
                } else {
                    bounds.right() + margins.right
                };
                measured_width = measured_width.max(extent);
            }
            if wrap_height {
                measured_height = measured_height.max(bounds.bottom() + margins.bottom);
            }
            let ignored = ignore == Some(child);
            content.include(
                &bounds,
                &margins,
                !ignored || vertical_gravity,
                !ignored || horizontal_gravity,
            );
        }
        self.vertical_order = vertical;

        let children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();
        if self.has_baseline_child {
            for &child in &children {
                if tree.is_gone(child) {
                    continue;
                }
                self.align_baseline(tree, child);
                let margins = tree
                    .intent(child)
                    .map(|intent| intent.resolved_margins(direction))
                    .unwrap_or_default();
                if let Some(bounds) = self.bounds.get(&child) {
                    let ignored = ignore == Some(child);
                    content.include(
                        bounds,
                        &margins,
                        !ignored || vertical_gravity,
                        !ignored || horizontal_gravity,
                    );
                }
            }
        }

        let min_size = tree.min_size(node);
        let own_intent = tree.intent(node).cloned().unwrap_or_default();
        let mut width_state = resolve_size_and_state(measured_width, width, false);
        let mut height_state = resolve_size_and_state(measured_height, height, false);

        if wrap_width {
            measured_width += if rtl { padding.left } else { padding.right };
            if let Some(fixed) = own_intent.width().fixed() {
                measured_width = measured_width.max(fixed);
            }
            measured_width = measured_width.max(min_size.width);
            width_state = resolve_size_and_state(measured_width, width, false);
            measured_width = width_state.size;
            if offset_horizontal {
                let group_width = measured_width;
                self.for_each_visible(tree, &children, |child, bounds, placement| {
                    let extent = tree.measured_width(child);
                    if placement.center_horizontal {
                        bounds.horizontal = Span::fixed((group_width - extent) / 2, extent);
                    } else if placement.parent_right {
                        bounds.horizontal =
                            Span::fixed(group_width - padding.right - extent, extent);
                    }
                });
            }
        }

        if wrap_height {
            measured_height += padding.bottom;
            if let Some(fixed) = own_intent.height().fixed() {
                measured_height = measured_height.max(fixed);
            }
            measured_height = measured_height.max(min_size.height);
            height_state = resolve_size_and_state(measured_height, height, false);
            measured_height = height_state.size;
            if offset_vertical {
                let group_height = measured_height;
                self.for_each_visible(tree, &children, |child, bounds, placement| {
                    let extent = tree.measured_height(child);
                    if placement.center_vertical {
                        bounds.vertical = Span::fixed((group_height - extent) / 2, extent);
                    } else if placement.parent_bottom {
                        bounds.vertical =
                            Span::fixed(group_height - padding.bottom - extent, extent);
                    }
                });
            }
        }

        if (horizontal_gravity || vertical_gravity) && !content.is_empty() {
            let self_bounds = Rect::new(
                padding.left,
                padding.top,
                measured_width - padding.right,
                measured_height - padding.bottom,
            );
            let placed = self.gravity.apply(
                content.right - content.left,
                content.bottom - content.top,
                self_bounds,
                direction,
            );
            let dx = placed.left - content.left;
            let dy = placed.top - content.top;
            if dx != 0 || dy != 0 {
                self.for_each_visible(tree, &children, |child, bounds, _| {
                    if ignore == Some(child) {
                        return;
                    }
                    if horizontal_gravity {
                        bounds.horizontal.shift(dx);
                    }
                    if vertical_gravity {
                        bounds.vertical.shift(dy);
                    }
                });
            }
        }

        if rtl {
            let offset = my_width - measured_width;
            if offset != 0 {
                self.for_each_visible(tree, &children, |_, bounds, _| {
                    bounds.horizontal.shift(-offset);
                });
            }
        }

        for &child in &self.skipped {
            tree.measure(child, SizeConstraint::exactly(0), SizeConstraint::exactly(0));
            self.bounds.insert(
                child,
                ChildBounds {
                    horizontal: Span::fixed(padding.left, 0),
                    vertical: Span::fixed(padding.top, 0),
                    ..ChildBounds::default()
                },
            );
        }

        tree.set_measured_dimension(node, width_state, height_state);
    }

    fn position_children(&mut self, tree: &mut LayoutTree, node: NodeId, _changed: bool, _frame: Rect) {
        let children: SmallVec<[NodeId; 8]> = tree.children(node).iter().copied().collect();
        for child in children {
            if tree.is_gone(child) {
                continue;
            }
            let Some(bounds) = self.bounds.get(&child).copied() else {
                continue;
            };
            tree.layout(
                child,
                bounds.left(),
                bounds.top(),
                bounds.right(),
                bounds.bottom(),
            );
        }
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn accepts_intent(&self, intent: &LayoutIntent) -> bool {
        intent.kind() == IntentKind::Relative
    }

    fn default_intent(&self) -> LayoutIntent {
        RelativeIntent::new(Dimension::WrapContent, Dimension::WrapContent).into()
    }

    fn baseline(&self, tree: &LayoutTree, _node: NodeId) -> Option<i32> {
        let child = self.baseline_child?;
        let bounds = self.bounds.get(&child)?;
        Some(bounds.top() + tree.baseline(child)?)
    }

    fn on_hierarchy_changed(&mut self) {
        self.dirty_hierarchy = true;
    }

    fn on_layout_requested(&mut self) {
        self.dirty_hierarchy = true;
    }
}

#[cfg(test)]
#[path = "../tests/relative_tests.rs"]
mod tests;
