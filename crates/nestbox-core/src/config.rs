/// What the relative resolver does with children left unsorted by a rule cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedChildPolicy {
    /// Append them after the sorted children and measure them against the
    /// parent edges only, ignoring their sibling anchors.
    #[default]
    MeasureAgainstParent,
    /// Measure them at zero size and place them as empty boxes at the padding origin.
    Skip,
}

/// Tunables for a [`LayoutTree`](crate::LayoutTree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Extra measure/layout passes run for requests raised during a pass.
    /// Requests still pending after this many passes wait for the next traversal.
    pub max_relayout_passes: u8,
    pub unresolved_children: UnresolvedChildPolicy,
    /// Width assumed by the relative resolver for RTL placement when its own
    /// width is not yet known.
    pub rtl_default_width: i32,
    /// Measurement cache entries kept per node before the cache is reset.
    pub measure_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_relayout_passes: 2,
            unresolved_children: UnresolvedChildPolicy::default(),
            rtl_default_width: 0x10000,
            measure_cache_capacity: 16,
        }
    }
}

impl EngineConfig {
    pub fn with_max_relayout_passes(mut self, passes: u8) -> Self {
        self.max_relayout_passes = passes;
        self
    }

    pub fn with_unresolved_children(mut self, policy: UnresolvedChildPolicy) -> Self {
        self.unresolved_children = policy;
        self
    }

    pub fn with_rtl_default_width(mut self, width: i32) -> Self {
        self.rtl_default_width = width;
        self
    }

    pub fn with_measure_cache_capacity(mut self, capacity: usize) -> Self {
        self.measure_cache_capacity = capacity.max(1);
        self
    }
}
