use crate::collections::map::HashMap;
use crate::{LayoutStrategy, NodeFlags, NodeId};
use nestbox_layout::{
    AnchorId, LayoutIntent, MeasuredSize, MeasuredState, Padding, Rect, Size, SizeConstraint,
};

/// Whether a node takes part in drawing and in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Takes space but is not drawn.
    Invisible,
    /// Takes no space and is skipped by layout strategies.
    Gone,
}

/// Where a node is in its measure/layout cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    /// Never laid out, or a layout was requested since the last one.
    NotLaidOut,
    /// Measured since the last layout but not yet positioned.
    Measured,
    LaidOut,
}

/// A measured size together with its too-small bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasuredDimensions {
    pub width: i32,
    pub height: i32,
    pub state: MeasuredState,
}

impl MeasuredDimensions {
    pub fn new(width: MeasuredSize, height: MeasuredSize) -> Self {
        Self {
            width: width.size,
            height: height.size,
            state: MeasuredState::from_axes(width, height),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

pub(crate) type ConstraintPair = (SizeConstraint, SizeConstraint);

/// One participant in the layout tree.
///
/// Nodes live in the [`LayoutTree`](crate::LayoutTree) arena; relationships
/// are expressed with [`NodeId`] handles.
pub struct LayoutNode {
    pub(crate) key: Option<AnchorId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) intent: LayoutIntent,
    pub(crate) strategy: Option<Box<dyn LayoutStrategy>>,
    pub(crate) frame: Rect,
    pub(crate) padding: Padding,
    pub(crate) min_size: Size,
    pub(crate) measured: MeasuredDimensions,
    pub(crate) last_constraints: Option<ConstraintPair>,
    pub(crate) measure_cache: HashMap<ConstraintPair, MeasuredDimensions>,
    pub(crate) flags: NodeFlags,
    pub(crate) visibility: Visibility,
}

impl LayoutNode {
    pub(crate) fn new(intent: LayoutIntent, strategy: Box<dyn LayoutStrategy>) -> Self {
        Self {
            key: None,
            parent: None,
            children: Vec::new(),
            intent,
            strategy: Some(strategy),
            frame: Rect::ZERO,
            padding: Padding::ZERO,
            min_size: Size::ZERO,
            measured: MeasuredDimensions::default(),
            last_constraints: None,
            measure_cache: HashMap::default(),
            flags: NodeFlags::FORCE_LAYOUT,
            visibility: Visibility::Visible,
        }
    }

    pub fn key(&self) -> Option<&AnchorId> {
        self.key.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn intent(&self) -> &LayoutIntent {
        &self.intent
    }

    /// Last assigned geometry in parent coordinates. Meaningful only once
    /// [`NodeFlags::IS_LAID_OUT`] is set.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Suggested minimum size used when a constraint imposes nothing.
    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn measured(&self) -> MeasuredDimensions {
        self.measured
    }

    pub fn measured_width(&self) -> i32 {
        self.measured.width
    }

    pub fn measured_height(&self) -> i32 {
        self.measured.height
    }

    pub fn measured_state(&self) -> MeasuredState {
        self.measured.state
    }

    /// Constraint pair seen by the last measure that did work.
    pub fn last_constraints(&self) -> Option<(SizeConstraint, SizeConstraint)> {
        self.last_constraints
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_gone(&self) -> bool {
        self.visibility == Visibility::Gone
    }

    pub fn is_layout_requested(&self) -> bool {
        self.flags.contains(NodeFlags::FORCE_LAYOUT)
    }

    pub fn is_laid_out(&self) -> bool {
        self.flags.contains(NodeFlags::IS_LAID_OUT)
    }

    pub fn cached_measurements(&self) -> usize {
        self.measure_cache.len()
    }

    pub fn phase(&self) -> LayoutPhase {
        if self.flags.contains(NodeFlags::LAYOUT_REQUIRED) {
            LayoutPhase::Measured
        } else if self.flags.contains(NodeFlags::FORCE_LAYOUT) || !self.is_laid_out() {
            LayoutPhase::NotLaidOut
        } else {
            LayoutPhase::LaidOut
        }
    }

    /// Name of the attached strategy, for logs.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy
            .as_ref()
            .map_or("<detached>", |strategy| strategy.debug_name())
    }
}

impl std::fmt::Debug for LayoutNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutNode")
            .field("key", &self.key)
            .field("strategy", &self.strategy_name())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("frame", &self.frame)
            .field("measured", &self.measured)
            .field("flags", &self.flags)
            .field("visibility", &self.visibility)
            .finish()
    }
}
