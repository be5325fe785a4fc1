//! Plain data row types written by output backends.

/// One agent's pose at the end of a step.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSnapshotRow {
    pub step:      u64,
    /// Simulated seconds at the end of `step`.
    pub time_secs: f64,
    pub model_id:  u32,
    pub name:      String,
    pub x:         f64,
    pub y:         f64,
    pub z:         f64,
    pub yaw:       f64,
}

/// Agent counts for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummaryRow {
    pub step:           u64,
    pub time_secs:      f64,
    /// Agents still running after the step.
    pub active_models:  u64,
    /// Agents removed at the end of this step.
    pub retired_models: u64,
}
