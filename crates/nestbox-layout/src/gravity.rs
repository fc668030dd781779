//! Placement of an object inside a larger container.

use crate::{LayoutDirection, Rect};
use bitflags::bitflags;

const AXIS_SPECIFIED: u32 = 0x0001;
const AXIS_PULL_BEFORE: u32 = 0x0002;
const AXIS_PULL_AFTER: u32 = 0x0004;
const AXIS_CLIP: u32 = 0x0008;
const AXIS_X_SHIFT: u32 = 0;
const AXIS_Y_SHIFT: u32 = 4;

bitflags! {
    /// Gravity bits. Each axis uses four bits: specified, pull-before,
    /// pull-after and clip. `START`/`END` additionally carry the relative
    /// direction bit and resolve to `LEFT`/`RIGHT` through [`Gravity::absolute`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Gravity: u32 {
        const CENTER_HORIZONTAL = AXIS_SPECIFIED << AXIS_X_SHIFT;
        const LEFT = (AXIS_PULL_BEFORE | AXIS_SPECIFIED) << AXIS_X_SHIFT;
        const RIGHT = (AXIS_PULL_AFTER | AXIS_SPECIFIED) << AXIS_X_SHIFT;
        const FILL_HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const CLIP_HORIZONTAL = AXIS_CLIP << AXIS_X_SHIFT;

        const CENTER_VERTICAL = AXIS_SPECIFIED << AXIS_Y_SHIFT;
        const TOP = (AXIS_PULL_BEFORE | AXIS_SPECIFIED) << AXIS_Y_SHIFT;
        const BOTTOM = (AXIS_PULL_AFTER | AXIS_SPECIFIED) << AXIS_Y_SHIFT;
        const FILL_VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        const CLIP_VERTICAL = AXIS_CLIP << AXIS_Y_SHIFT;

        const CENTER = Self::CENTER_HORIZONTAL.bits() | Self::CENTER_VERTICAL.bits();
        const FILL = Self::FILL_HORIZONTAL.bits() | Self::FILL_VERTICAL.bits();

        const RELATIVE_LAYOUT_DIRECTION = 0x0080_0000;
        const START = Self::RELATIVE_LAYOUT_DIRECTION.bits() | Self::LEFT.bits();
        const END = Self::RELATIVE_LAYOUT_DIRECTION.bits() | Self::RIGHT.bits();
    }
}

/// Where an object sits along one axis of its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPlacement {
    Start,
    Center,
    End,
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::START | Gravity::TOP
    }
}

impl Gravity {
    pub const NONE: Gravity = Gravity::empty();
    pub const HORIZONTAL_MASK: Gravity = Gravity::from_bits_retain(0x07 << AXIS_X_SHIFT);
    pub const VERTICAL_MASK: Gravity = Gravity::from_bits_retain(0x07 << AXIS_Y_SHIFT);
    pub const RELATIVE_HORIZONTAL_MASK: Gravity =
        Gravity::from_bits_retain(Gravity::START.bits() | Gravity::END.bits());

    /// Horizontal part including the relative direction bit.
    #[inline]
    pub fn horizontal(self) -> Gravity {
        self & Gravity::RELATIVE_HORIZONTAL_MASK
    }

    #[inline]
    pub fn vertical(self) -> Gravity {
        self & Gravity::VERTICAL_MASK
    }

    #[inline]
    pub fn has_horizontal(self) -> bool {
        !self.horizontal().is_empty()
    }

    #[inline]
    pub fn has_vertical(self) -> bool {
        !self.vertical().is_empty()
    }

    /// Replaces `START`/`END` with `LEFT`/`RIGHT` for the given direction.
    pub fn absolute(self, direction: LayoutDirection) -> Gravity {
        let mut result = self.bits();
        if result & Gravity::RELATIVE_LAYOUT_DIRECTION.bits() != 0 {
            let rtl = direction.is_rtl();
            if result & Gravity::START.bits() == Gravity::START.bits() {
                result &= !Gravity::START.bits();
                result |= if rtl { Gravity::RIGHT } else { Gravity::LEFT }.bits();
            } else if result & Gravity::END.bits() == Gravity::END.bits() {
                result &= !Gravity::END.bits();
                result |= if rtl { Gravity::LEFT } else { Gravity::RIGHT }.bits();
            }
            result &= !Gravity::RELATIVE_LAYOUT_DIRECTION.bits();
        }
        Gravity::from_bits_retain(result)
    }

    /// Horizontal placement after direction resolution. Anything that is not
    /// centered or right-aligned starts at the left edge.
    pub fn horizontal_placement(self, direction: LayoutDirection) -> AxisPlacement {
        let bits = self.absolute(direction).bits() & Gravity::HORIZONTAL_MASK.bits();
        if bits == Gravity::CENTER_HORIZONTAL.bits() {
            AxisPlacement::Center
        } else if bits == Gravity::RIGHT.bits() {
            AxisPlacement::End
        } else {
            AxisPlacement::Start
        }
    }

    /// Vertical placement. Anything that is not centered or bottom-aligned is top-aligned.
    pub fn vertical_placement(self) -> AxisPlacement {
        let bits = self.bits() & Gravity::VERTICAL_MASK.bits();
        if bits == Gravity::CENTER_VERTICAL.bits() {
            AxisPlacement::Center
        } else if bits == Gravity::BOTTOM.bits() {
            AxisPlacement::End
        } else {
            AxisPlacement::Start
        }
    }

    /// Places a `width` x `height` object inside `container`.
    ///
    /// Unlike [`Gravity::horizontal_placement`], an axis with no bits set is
    /// centered, and a fill axis stretches to the container.
    pub fn apply(self, width: i32, height: i32, container: Rect, direction: LayoutDirection) -> Rect {
        let gravity = self.absolute(direction).bits();
        let (left, right) = apply_axis(
            gravity >> AXIS_X_SHIFT,
            width,
            container.left,
            container.right,
        );
        let (top, bottom) = apply_axis(
            gravity >> AXIS_Y_SHIFT,
            height,
            container.top,
            container.bottom,
        );
        Rect::new(left, top, right, bottom)
    }
}

fn apply_axis(axis_bits: u32, extent: i32, start: i32, end: i32) -> (i32, i32) {
    let clip = axis_bits & AXIS_CLIP == AXIS_CLIP;
    match axis_bits & (AXIS_PULL_BEFORE | AXIS_PULL_AFTER) {
        0 => {
            let mut lo = start + (end - start - extent) / 2;
            let mut hi = lo + extent;
            if clip {
                lo = lo.max(start);
                hi = hi.min(end);
            }
            (lo, hi)
        }
        AXIS_PULL_BEFORE => {
            let hi = start + extent;
            (start, if clip { hi.min(end) } else { hi })
        }
        AXIS_PULL_AFTER => {
            let lo = end - extent;
            (if clip { lo.max(start) } else { lo }, end)
        }
        _ => (start, end),
    }
}

#[cfg(test)]
#[path = "tests/gravity_tests.rs"]
mod tests;
