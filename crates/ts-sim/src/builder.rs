//! Fluent builder for constructing a [`Sim`].

use ts_building::{Building, Planner};
use ts_core::SimConfig;
use ts_scenario::Scenario;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: step length, run length, output cadence, …
/// - [`Building`]: the map destinations resolve against
/// - `P: Planner`: the planning service (e.g. [`ts_building::DijkstraPlanner`])
///
/// # Optional inputs
///
/// | Method          | Default     |
/// |-----------------|-------------|
/// | `.scenario(s)`  | no scenario |
///
/// # Example
///
/// ```rust,ignore
/// let building = Building::load(Path::new("depot.building.yaml"), 0)?;
/// let mut sim = SimBuilder::new(config, building, DijkstraPlanner)
///     .scenario(scenario)
///     .build()?;
/// sim.spawn("forklift_1", ModelState::at(0.0, 0.0), template.as_ref());
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<P: Planner> {
    config:   SimConfig,
    building: Building,
    planner:  P,
    scenario: Option<Scenario>,
}

impl<P: Planner> SimBuilder<P> {
    pub fn new(config: SimConfig, building: Building, planner: P) -> Self {
        Self { config, building, planner, scenario: None }
    }

    /// Supply a scenario whose named vertices act as extra destinations.
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Validate the config, select the configured navigation graph, and
    /// return a ready-to-run [`Sim`] with no agents.
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        let building = self.building.with_nav_graph(self.config.nav_graph);

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };

        Ok(Sim::from_parts(
            self.config,
            building,
            self.planner,
            self.scenario,
            #[cfg(feature = "parallel")]
            pool,
        ))
    }
}
