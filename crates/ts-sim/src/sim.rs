//! The `Sim` struct and its step loop.

use std::collections::BTreeSet;

use ts_behavior::{ActiveModel, BehaviorError, BehaviorLibrary, BehaviorNode, TickContext};
use ts_building::{Building, Planner};
use ts_core::{ModelId, ModelState, SimClock, SimConfig, Step};
use ts_scenario::Scenario;

use crate::{AgentSlot, NoopObserver, RetireReason, RetiredAgent, SimError, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P>` owns the building, the planner, and every agent's behavior tree,
/// and drives the three-phase step loop:
///
/// 1. **Snapshot**: publish every active agent's pose as `ActiveModel`s.
/// 2. **Tick** (optionally parallel with the `parallel` feature): advance each
///    agent's tree by `config.dt_secs` against that snapshot.  An agent only
///    ever writes its own slot, so tick order cannot change results.
/// 3. **Retire** (sequential): remove agents whose tree completed or that
///    were despawned, in ascending `ModelId` order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Planner> {
    /// Step length, run length and output cadence.
    pub config: SimConfig,

    /// Current step and its mapping to seconds.
    pub clock: SimClock,

    /// Map every destination resolves against.  Its planning graph is the
    /// one selected by `config.nav_graph`.
    pub building: Building,

    pub planner: P,

    /// Optional scenario consulted for named vertices.
    pub scenario: Option<Scenario>,

    /// Active agents in ascending `ModelId` order.
    agents: Vec<AgentSlot>,

    retired: Vec<RetiredAgent>,

    /// Despawn requests applied at the next step boundary.
    pending_despawn: BTreeSet<ModelId>,

    next_id: ModelId,

    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl<P: Planner> Sim<P> {
    pub(crate) fn from_parts(
        config:   SimConfig,
        building: Building,
        planner:  P,
        scenario: Option<Scenario>,
        #[cfg(feature = "parallel")] pool: Option<rayon::ThreadPool>,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            building,
            planner,
            scenario,
            agents: Vec::new(),
            retired: Vec::new(),
            pending_despawn: BTreeSet::new(),
            next_id: ModelId(0),
            #[cfg(feature = "parallel")]
            pool,
        }
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Add an agent running a fresh clone of `template`.  It is first ticked
    /// on the next step.
    pub fn spawn(&mut self, name: impl Into<String>, state: ModelState, template: &dyn BehaviorNode) -> ModelId {
        let id = self.next_id;
        self.next_id = id.next();
        let name = name.into();
        tracing::debug!(%id, name = %name, at = %state, behavior = template.type_tag(), "spawned agent");
        self.agents.push(AgentSlot {
            id,
            name,
            state,
            behavior:   template.clone_node(),
            spawned_at: self.clock.current_step,
        });
        id
    }

    /// Spawn an agent running the library behavior called `behavior`.
    pub fn spawn_from_library(
        &mut self,
        name:     impl Into<String>,
        state:    ModelState,
        library:  &BehaviorLibrary,
        behavior: &str,
    ) -> SimResult<ModelId> {
        let template = library
            .get(behavior)
            .ok_or_else(|| BehaviorError::UnknownBehavior(behavior.to_owned()))?;
        Ok(self.spawn(name, state, template))
    }

    /// Request removal of an active agent.  The agent is still ticked on the
    /// current step and leaves at the step boundary.
    pub fn despawn(&mut self, id: ModelId) -> SimResult<()> {
        if self.agent(id).is_none() {
            return Err(SimError::UnknownModel(id));
        }
        self.pending_despawn.insert(id);
        Ok(())
    }

    pub fn agent(&self, id: ModelId) -> Option<&AgentSlot> {
        self.agents
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.agents[i])
    }

    /// Look an active agent up by instance name.
    pub fn agent_named(&self, name: &str) -> Option<&AgentSlot> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn agents(&self) -> &[AgentSlot] {
        &self.agents
    }

    pub fn active_count(&self) -> usize {
        self.agents.len()
    }

    /// Agents removed so far, in retirement order.
    pub fn retired(&self) -> &[RetiredAgent] {
        &self.retired
    }

    /// `true` once `total_steps` is reached or no agent is left.
    pub fn is_finished(&self) -> bool {
        self.clock.current_step >= self.config.end_step() || self.agents.is_empty()
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Advance one step without observer callbacks.  Returns the number of
    /// agents retired at the end of it.
    pub fn step(&mut self) -> usize {
        self.step_with(&mut NoopObserver)
    }

    /// Run from the current step until `config.end_step()` or until every
    /// agent has retired, whichever comes first.  Returns the step the run
    /// stopped at.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> Step {
        while !self.is_finished() {
            self.step_with(observer);
        }
        let now = self.clock.current_step;
        tracing::info!(
            step = %now,
            elapsed_secs = self.clock.elapsed_secs(),
            active = self.agents.len(),
            retired = self.retired.len(),
            "run finished"
        );
        observer.on_sim_end(now);
        now
    }

    /// Run exactly `n` steps from the current position (ignores `end_step`
    /// and keeps stepping with no agents).
    pub fn run_steps<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step_with(observer);
        }
    }

    fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> usize {
        let now = self.clock.current_step;
        observer.on_step_start(now);

        // ── Phase 1: snapshot ─────────────────────────────────────────────
        let snapshot: Vec<ActiveModel> = self.agents.iter().map(AgentSlot::snapshot).collect();

        // ── Phase 2: tick ─────────────────────────────────────────────────
        self.tick_agents(now, &snapshot);

        // ── Phase 3: retire ───────────────────────────────────────────────
        let retired_now = self.retire(now, observer);

        observer.on_step_end(now, self.agents.len());
        let interval = self.config.output_interval_steps;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.clock, &self.agents);
        }

        self.clock.advance();
        retired_now
    }

    fn tick_agents(&mut self, now: Step, snapshot: &[ActiveModel]) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let dt     = self.config.dt_secs;
        let agents = &mut self.agents;
        let ctx = TickContext::new(now, &self.building, &self.planner, snapshot)
            .with_scenario(self.scenario.as_ref());

        let tick_one = |slot: &mut AgentSlot| {
            if !slot.behavior.is_complete() {
                slot.behavior.tick(dt, &mut slot.state, &ctx);
            }
        };

        #[cfg(not(feature = "parallel"))]
        {
            agents.iter_mut().for_each(tick_one);
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            match &self.pool {
                Some(pool) => pool.install(|| agents.par_iter_mut().for_each(tick_one)),
                None => agents.par_iter_mut().for_each(tick_one),
            }
        }
    }

    /// Remove completed and despawned agents, preserving `ModelId` order.
    fn retire<O: SimObserver>(&mut self, now: Step, observer: &mut O) -> usize {
        let pending = std::mem::take(&mut self.pending_despawn);
        let is_leaving =
            |a: &AgentSlot| a.behavior.is_complete() || pending.contains(&a.id);
        if !self.agents.iter().any(is_leaving) {
            return 0;
        }

        let (leaving, staying): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.agents).into_iter().partition(is_leaving);
        self.agents = staying;

        let count = leaving.len();
        for slot in leaving {
            let reason = if slot.behavior.is_complete() {
                RetireReason::Completed
            } else {
                RetireReason::Despawned
            };
            let record = RetiredAgent {
                id:         slot.id,
                name:       slot.name,
                state:      slot.state,
                spawned_at: slot.spawned_at,
                step:       now,
                reason,
            };
            tracing::info!(
                step = %now,
                id = %record.id,
                name = %record.name,
                at = %record.state,
                %reason,
                "agent retired"
            );
            observer.on_retired(now, &record);
            self.retired.push(record);
        }
        count
    }
}
