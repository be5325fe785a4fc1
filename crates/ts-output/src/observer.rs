//! Observer that turns step callbacks into output rows.

use ts_core::{SimClock, SimConfig, Step};
use ts_sim::{AgentSlot, RetiredAgent, SimObserver};

use crate::row::{ModelSnapshotRow, StepSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes model snapshots and step summaries to any
/// [`OutputWriter`] backend.
///
/// Observer hooks cannot fail, so the first write error is kept and later
/// ones are dropped.  Collect it with [`take_error`][Self::take_error] once the
/// run is over.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:          W,
    clock:           SimClock,
    retired_in_step: u64,
    last_error:      Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// `config` supplies `dt_secs` for the `time_secs` column.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            clock:           config.make_clock(),
            retired_in_step: 0,
            last_error:      None,
        }
    }

    /// First write error of the run, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Consume the observer and hand back its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            self.last_error.get_or_insert(e);
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_step_start(&mut self, _step: Step) {
        self.retired_in_step = 0;
    }

    fn on_retired(&mut self, _step: Step, _agent: &RetiredAgent) {
        self.retired_in_step += 1;
    }

    fn on_step_end(&mut self, step: Step, active: usize) {
        let row = StepSummaryRow {
            step:           step.0,
            time_secs:      self.clock.secs_at(step + 1),
            active_models:  active as u64,
            retired_models: self.retired_in_step,
        };
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, clock: &SimClock, agents: &[AgentSlot]) {
        let time_secs = clock.secs_at(step + 1);
        let rows: Vec<ModelSnapshotRow> = agents
            .iter()
            .map(|a| ModelSnapshotRow {
                step:     step.0,
                time_secs,
                model_id: a.id.0,
                name:     a.name.clone(),
                x:        a.state.x,
                y:        a.state.y,
                z:        a.state.z,
                yaw:      a.state.yaw,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_step: Step) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
