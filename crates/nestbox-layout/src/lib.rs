//! Layout contracts for nestbox

mod axis;
mod constraint;
mod direction;
mod geometry;
mod gravity;
mod intent;
mod rules;

pub use axis::*;
pub use constraint::*;
pub use direction::*;
pub use geometry::*;
pub use gravity::*;
pub use intent::*;
pub use rules::*;

pub mod prelude {
    pub use crate::axis::Orientation;
    pub use crate::constraint::{SizeConstraint, SpecMode};
    pub use crate::direction::LayoutDirection;
    pub use crate::geometry::{Padding, Rect, Size};
    pub use crate::gravity::Gravity;
    pub use crate::intent::{Dimension, LayoutIntent, Margins};
    pub use crate::rules::{Anchor, AnchorId, RelativeVerb, RuleSet};
}
