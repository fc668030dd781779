/// The stacking axis of a linear group.
///
/// Children are laid out one after another along the stacking axis and
/// aligned along the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Stacking axis: left to right (or right to left under RTL).
    /// Cross axis: top to bottom.
    Horizontal,

    /// Stacking axis: top to bottom.
    /// Cross axis: left to right.
    #[default]
    Vertical,
}

impl Orientation {
    /// Returns the opposite axis.
    #[inline]
    pub fn cross_axis(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Returns true if this is the horizontal axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Horizontal)
    }

    /// Returns true if this is the vertical axis.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    /// Picks the component of a `(width, height)` pair lying on this axis.
    #[inline]
    pub fn pick<T>(self, width: T, height: T) -> T {
        match self {
            Orientation::Horizontal => width,
            Orientation::Vertical => height,
        }
    }

    /// Builds a `(width, height)` pair from main and cross components.
    #[inline]
    pub fn compose<T>(self, main: T, cross: T) -> (T, T) {
        match self {
            Orientation::Horizontal => (main, cross),
            Orientation::Vertical => (cross, main),
        }
    }
}
