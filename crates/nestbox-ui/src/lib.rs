//! Layout strategies for nestbox

pub mod layout;

pub use layout::*;

pub use nestbox_core;
pub use nestbox_layout;

pub mod prelude {
    pub use crate::layout::{ContentLeaf, FrameLayout, LinearLayout, RelativeLayout};
    pub use nestbox_core::prelude::*;
    pub use nestbox_layout::{FrameIntent, LinearIntent, RelativeIntent};
}
