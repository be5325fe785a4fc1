//! The `OutputWriter` trait implemented by output backends.

use crate::{ModelSnapshotRow, OutputResult, StepSummaryRow};

/// Sink for the rows produced by [`SimOutputObserver`][crate::SimOutputObserver].
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of model snapshots.
    fn write_snapshots(&mut self, rows: &[ModelSnapshotRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
