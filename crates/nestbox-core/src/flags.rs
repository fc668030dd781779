use bitflags::bitflags;

bitflags! {
    /// Validity and dirty state tracked on every node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Cached measurements are stale; the next measure must run the hook.
        const FORCE_LAYOUT                  = 1 << 0;
        /// The measure hook reported a size during the current measure.
        const MEASURED_DIMENSION_SET        = 1 << 1;
        /// Measured since the last layout; the layout hook must run.
        const LAYOUT_REQUIRED               = 1 << 2;
        /// Geometry has been assigned at least once.
        const IS_LAID_OUT                   = 1 << 3;
        /// Size came from the cache; the hook runs before the next layout.
        const MEASURE_NEEDED_BEFORE_LAYOUT  = 1 << 4;
        /// Rendering output is stale.
        const INVALIDATED                   = 1 << 5;
        /// Part of the node needs redrawing.
        const DIRTY                         = 1 << 6;
        /// The renderer has drawn the current state.
        const DRAWN                         = 1 << 7;
        /// A frame has been assigned.
        const HAS_BOUNDS                    = 1 << 8;
        /// Requested layout during a pass and has not been measured since.
        const REQUESTED_DURING_PASS         = 1 << 9;
    }
}
