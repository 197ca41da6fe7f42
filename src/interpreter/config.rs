//! Per-run interpreter configuration

/// Limits applied to a single run.
///
/// The default runs without a step budget and without recording history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// Fail with `StepLimitExceeded` once more than this many steps ran
    pub max_steps: Option<u64>,

    /// Record a snapshot per step, up to this many bytes of history
    pub snapshot_limit: Option<usize>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_history(mut self, snapshot_limit: usize) -> Self {
        self.snapshot_limit = Some(snapshot_limit);
        self
    }

    pub fn records_history(&self) -> bool {
        self.snapshot_limit.is_some()
    }
}
