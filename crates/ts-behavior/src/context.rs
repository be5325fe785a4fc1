//! Read-only simulation state passed to every behavior tick.

use ts_building::{Building, PlanResult, Planner};
use ts_core::{ModelId, ModelState, NodeId, Step};
use ts_scenario::Scenario;

/// Snapshot of one active agent, taken at the start of a step.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveModel {
    pub id:    ModelId,
    pub name:  String,
    pub state: ModelState,
}

/// A read-only view of the world passed to every
/// [`BehaviorNode::tick`][crate::BehaviorNode::tick].
///
/// `TickContext` is built once per step by ts-sim and shared (immutably)
/// across all agents.  `active_models` is the previous-step snapshot, so an
/// agent never observes another agent's half-applied update and tick order
/// cannot change results.
pub struct TickContext<'a> {
    /// Step being computed.
    pub step: Step,

    pub building: &'a Building,

    /// Planning service used by navigation nodes.
    pub planner: &'a dyn Planner,

    /// Every agent active at the start of this step, including the one being
    /// ticked.
    pub active_models: &'a [ActiveModel],

    /// Optional scenario consulted for named vertices.
    pub scenario: Option<&'a Scenario>,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        step:          Step,
        building:      &'a Building,
        planner:       &'a dyn Planner,
        active_models: &'a [ActiveModel],
    ) -> Self {
        Self { step, building, planner, active_models, scenario: None }
    }

    pub fn with_scenario(mut self, scenario: Option<&'a Scenario>) -> Self {
        self.scenario = scenario;
        self
    }

    /// Translate a symbolic destination into a target pose.
    ///
    /// Lookup order: building vertices and static models, scenario vertices,
    /// then active agents by instance name.  `None` means "not known yet";
    /// callers retry on a later tick.
    pub fn resolve_destination(&self, name: &str) -> Option<ModelState> {
        if let Some(state) = self.building.resolve_destination(name) {
            return Some(state);
        }
        if let Some(v) = self.scenario.and_then(|s| s.find_vertex(name)) {
            return Some(ModelState::new(v.x, v.y, v.z, 0.0));
        }
        self.active_models
            .iter()
            .find(|m| m.name == name)
            .map(|m| ModelState { velocity: None, ..m.state })
    }

    /// Ask the planning service for a route through the building.
    #[inline]
    pub fn plan(&self, from: &ModelState, to: &ModelState) -> PlanResult<Vec<NodeId>> {
        self.planner.plan(from, to, self.building)
    }
}
