//! Per-agent records held by the driver.

use std::fmt;

use ts_behavior::{ActiveModel, BehaviorNode};
use ts_core::{ModelId, ModelState, Step};

/// One running agent: its pose and its own behavior tree.
#[derive(Debug)]
pub struct AgentSlot {
    pub id:         ModelId,
    pub name:       String,
    pub state:      ModelState,
    pub behavior:   Box<dyn BehaviorNode>,
    pub spawned_at: Step,
}

impl AgentSlot {
    /// Read-only view published to other agents for one step.
    pub fn snapshot(&self) -> ActiveModel {
        ActiveModel { id: self.id, name: self.name.clone(), state: self.state }
    }
}

/// Why an agent left the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetireReason {
    /// Its behavior tree completed.
    Completed,
    /// [`Sim::despawn`][crate::Sim::despawn] was called.
    Despawned,
}

impl fmt::Display for RetireReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RetireReason::Completed => "completed",
            RetireReason::Despawned => "despawned",
        })
    }
}

/// Final record of an agent removed at a step boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct RetiredAgent {
    pub id:         ModelId,
    pub name:       String,
    /// Pose after the last tick it took part in.
    pub state:      ModelState,
    pub spawned_at: Step,
    /// Step at whose end the agent was removed.
    pub step:       Step,
    pub reason:     RetireReason,
}
