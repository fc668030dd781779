/// Counters describing the work done by a tree since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Calls to `measure`, including ones answered without work.
    pub measure_calls: u64,
    /// Measure hook invocations on strategies.
    pub measure_hook_calls: u64,
    /// Measurements satisfied from a node's cache.
    pub cache_hits: u64,
    pub layout_calls: u64,
    pub layout_hook_calls: u64,
    /// Nodes visited while walking request-layout up the parent chain.
    pub request_walk_steps: u64,
    /// Requests raised during a pass and queued for after it.
    pub queued_requests: u64,
    pub extra_passes: u64,
    /// Mutations deferred until the end of a pass.
    pub deferred_mutations: u64,
}

impl LayoutStats {
    pub fn reset(&mut self) {
        *self = LayoutStats::default();
    }
}
