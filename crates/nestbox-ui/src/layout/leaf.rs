use nestbox_core::{LayoutStrategy, LayoutTree, NodeId};
use nestbox_layout::{resolve_size_and_state, Size, SizeConstraint};

/// A leaf with an intrinsic content size, such as a text run or an image.
///
/// The measured size is the content plus padding, at least the node's
/// minimum size, resolved against each constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLeaf {
    content: Size,
    baseline: Option<i32>,
}

impl ContentLeaf {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            content: Size::new(width, height),
            baseline: None,
        }
    }

    /// Baseline measured from the top of the content.
    pub fn with_baseline(mut self, baseline: i32) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn content(&self) -> Size {
        self.content
    }

    /// Replaces the content size. Callers request layout on the node afterwards.
    pub fn set_content(&mut self, content: Size) {
        self.content = content;
    }
}

impl LayoutStrategy for ContentLeaf {
    fn debug_name(&self) -> &'static str {
        "ContentLeaf"
    }

    fn measure_children(
        &mut self,
        tree: &mut LayoutTree,
        node: NodeId,
        width: SizeConstraint,
        height: SizeConstraint,
    ) {
        let padding = tree.padding(node);
        let min = tree.min_size(node);
        let wanted_width = (self.content.width + padding.horizontal()).max(min.width);
        let wanted_height = (self.content.height + padding.vertical()).max(min.height);
        tree.set_measured_dimension(
            node,
            resolve_size_and_state(wanted_width, width, false),
            resolve_size_and_state(wanted_height, height, false),
        );
    }

    fn baseline(&self, tree: &LayoutTree, node: NodeId) -> Option<i32> {
        self.baseline.map(|baseline| tree.padding(node).top + baseline)
    }
}
