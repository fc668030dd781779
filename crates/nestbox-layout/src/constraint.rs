//! Size constraints exchanged between a parent and its children during measurement.

use bitflags::bitflags;
use std::fmt;

const MODE_SHIFT: u32 = 30;
const MODE_MASK: u32 = 0x3 << MODE_SHIFT;
const SIZE_MASK: u32 = !MODE_MASK;

/// Largest size a [`SizeConstraint`] can carry.
pub const MAX_SIZE: i32 = SIZE_MASK as i32;

/// How a child should interpret the size carried by a [`SizeConstraint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecMode {
    /// The parent imposes nothing; the child may be as big as it wants.
    Unspecified,
    /// The parent has decided the exact size.
    Exactly,
    /// The child may be as big as it wants up to the size.
    AtMost,
}

impl SpecMode {
    #[inline]
    fn bits(self) -> u32 {
        match self {
            SpecMode::Unspecified => 0,
            SpecMode::Exactly => 1 << MODE_SHIFT,
            SpecMode::AtMost => 2 << MODE_SHIFT,
        }
    }

    #[inline]
    fn from_bits(bits: u32) -> Self {
        match (bits & MODE_MASK) >> MODE_SHIFT {
            1 => SpecMode::Exactly,
            2 => SpecMode::AtMost,
            _ => SpecMode::Unspecified,
        }
    }
}

/// A size plus a resolution mode packed into a single scalar.
///
/// The mode lives in the two high bits and the size in the low thirty, so a
/// constraint is `Copy`, hashable and cheap to use as a cache key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeConstraint(u32);

impl SizeConstraint {
    /// Packs `size` and `mode`. Sizes outside `0..=MAX_SIZE` are clamped.
    #[inline]
    pub fn make(size: i32, mode: SpecMode) -> Self {
        let size = size.clamp(0, MAX_SIZE) as u32;
        Self(size | mode.bits())
    }

    #[inline]
    pub fn unspecified() -> Self {
        Self::make(0, SpecMode::Unspecified)
    }

    #[inline]
    pub fn exactly(size: i32) -> Self {
        Self::make(size, SpecMode::Exactly)
    }

    #[inline]
    pub fn at_most(size: i32) -> Self {
        Self::make(size, SpecMode::AtMost)
    }

    #[inline]
    pub fn mode(self) -> SpecMode {
        SpecMode::from_bits(self.0)
    }

    #[inline]
    pub fn size(self) -> i32 {
        (self.0 & SIZE_MASK) as i32
    }

    /// Re-encodes with the size shifted by `delta`, keeping the mode.
    ///
    /// The size never drops below zero. Unspecified constraints carry no
    /// meaningful size and are returned unchanged.
    pub fn adjust(self, delta: i32) -> Self {
        let mode = self.mode();
        if mode == SpecMode::Unspecified {
            return self;
        }
        Self::make(self.size().saturating_add(delta), mode)
    }

    #[inline]
    pub fn is_exactly(self) -> bool {
        self.mode() == SpecMode::Exactly
    }

    #[inline]
    pub fn is_unspecified(self) -> bool {
        self.mode() == SpecMode::Unspecified
    }

    /// Raw packed representation.
    #[inline]
    pub fn to_bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SizeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode() {
            SpecMode::Unspecified => write!(f, "UNSPECIFIED {}", self.size()),
            SpecMode::Exactly => write!(f, "EXACTLY {}", self.size()),
            SpecMode::AtMost => write!(f, "AT_MOST {}", self.size()),
        }
    }
}

impl fmt::Debug for SizeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SizeConstraint({self})")
    }
}

bitflags! {
    /// Measurement state bits reported by a node alongside its measured size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MeasuredState: u8 {
        /// The width constraint was smaller than the width the node wanted.
        const WIDTH_TOO_SMALL = 0b01;
        /// The height constraint was smaller than the height the node wanted.
        const HEIGHT_TOO_SMALL = 0b10;
    }
}

impl MeasuredState {
    /// Builds the combined state from per-axis results.
    pub fn from_axes(width: MeasuredSize, height: MeasuredSize) -> Self {
        let mut state = MeasuredState::empty();
        state.set(MeasuredState::WIDTH_TOO_SMALL, width.too_small);
        state.set(MeasuredState::HEIGHT_TOO_SMALL, height.too_small);
        state
    }

    #[inline]
    pub fn width_too_small(self) -> bool {
        self.contains(MeasuredState::WIDTH_TOO_SMALL)
    }

    #[inline]
    pub fn height_too_small(self) -> bool {
        self.contains(MeasuredState::HEIGHT_TOO_SMALL)
    }
}

/// A size resolved against a constraint, plus whether the constraint was too small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MeasuredSize {
    pub size: i32,
    pub too_small: bool,
}

impl MeasuredSize {
    pub const ZERO: Self = Self {
        size: 0,
        too_small: false,
    };

    #[inline]
    pub fn new(size: i32) -> Self {
        Self {
            size,
            too_small: false,
        }
    }
}

/// Utility to reconcile a desired size with a constraint.
///
/// `child_too_small` carries the state already accumulated from children so a
/// group can report that its own content was clipped.
pub fn resolve_size_and_state(
    size: i32,
    constraint: SizeConstraint,
    child_too_small: bool,
) -> MeasuredSize {
    let spec_size = constraint.size();
    let mut result = match constraint.mode() {
        SpecMode::Unspecified => MeasuredSize::new(size),
        SpecMode::Exactly => MeasuredSize::new(spec_size),
        SpecMode::AtMost => {
            if spec_size < size {
                MeasuredSize {
                    size: spec_size,
                    too_small: true,
                }
            } else {
                MeasuredSize::new(size)
            }
        }
    };
    result.too_small |= child_too_small;
    result
}

/// [`resolve_size_and_state`] without the state bit.
#[inline]
pub fn resolve_size(size: i32, constraint: SizeConstraint) -> i32 {
    resolve_size_and_state(size, constraint, false).size
}

/// Default sizing: the suggested size when unconstrained, the constraint size otherwise.
pub fn default_size(size: i32, constraint: SizeConstraint) -> i32 {
    match constraint.mode() {
        SpecMode::Unspecified => size,
        SpecMode::AtMost | SpecMode::Exactly => constraint.size(),
    }
}

#[cfg(test)]
#[path = "tests/constraint_tests.rs"]
mod tests;
