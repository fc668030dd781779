//! Group and leaf strategies plugged into [`nestbox_core::LayoutTree`] nodes.

mod frame;
mod leaf;
mod linear;
mod relative;

pub use frame::FrameLayout;
pub use leaf::ContentLeaf;
pub use linear::{LinearLayout, WeightDistributor};
pub use relative::{DependencyGraph, GraphAxis, GraphState, RelativeLayout, SortOutcome};
