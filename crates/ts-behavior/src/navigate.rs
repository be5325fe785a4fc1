//! Navigate to a named destination along a planned path.

use std::fmt;

use serde_yaml::Value;
use ts_building::Building;
use ts_core::{ModelState, NodeId};

use crate::loader::fields;
use crate::node::indent;
use crate::{BehaviorNode, BehaviorResult, TickContext};

/// Cruise speed used when the script does not give `max_speed` (m/s).
pub const DEFAULT_MAX_SPEED: f64 = 2.0;

/// Arrival radius used when the script does not give `tolerance` (m).
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Where a [`NavigateBehavior`] is in its run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavigatePhase {
    /// Destination name not resolved yet; retried every tick.
    Unresolved,
    /// Destination known, no usable plan yet; retried every tick.
    Planning,
    /// Following the planned path.
    EnRoute,
    /// Terminal.
    Arrived,
}

impl fmt::Display for NavigatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NavigatePhase::Unresolved => "unresolved",
            NavigatePhase::Planning   => "planning",
            NavigatePhase::EnRoute    => "en-route",
            NavigatePhase::Arrived    => "arrived",
        })
    }
}

/// Drives an agent to a symbolic destination.
///
/// Resolution, planning and the first movement can all happen within one
/// tick.  Each tick moves the agent at most `max_speed * dt` metres along the
/// path (graph waypoints, then the destination itself); travel budget left
/// over at a waypoint carries on toward the next one.
///
/// The node arrives once the distance to the destination is below
/// `tolerance` and did not grow since the previous tick.
///
/// Script form:
///
/// ```yaml
/// { type: navigate, destination: Dock-1, max_speed: 1.5, tolerance: 0.05 }
/// ```
#[derive(Debug)]
pub struct NavigateBehavior {
    pub destination_name: String,
    pub max_speed:        f64,
    pub tolerance:        f64,

    phase:             NavigatePhase,
    destination_found: bool,
    destination_state: Option<ModelState>,
    path:              Vec<NodeId>,
    /// Index into `path` of the waypoint being approached; `path.len()` means
    /// the destination itself.
    next_waypoint:     usize,
    prev_error:        Option<f64>,
    stalled:           bool,
}

impl NavigateBehavior {
    pub fn new(destination_name: impl Into<String>) -> Self {
        Self {
            destination_name:  destination_name.into(),
            max_speed:         DEFAULT_MAX_SPEED,
            tolerance:         DEFAULT_TOLERANCE,
            phase:             NavigatePhase::Unresolved,
            destination_found: false,
            destination_state: None,
            path:              Vec::new(),
            next_waypoint:     0,
            prev_error:        None,
            stalled:           false,
        }
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Build from a script node (`destination` required; `max_speed`,
    /// `tolerance` optional and strictly positive).
    pub fn from_yaml(desc: &Value) -> BehaviorResult<Self> {
        const TAG: &str = "navigate";
        let destination = fields::require_str(desc, TAG, "destination")?;
        if destination.is_empty() {
            return Err(fields::invalid(TAG, "destination", "must not be empty"));
        }
        let max_speed = fields::optional_positive_f64(desc, TAG, "max_speed")?;
        let tolerance = fields::optional_positive_f64(desc, TAG, "tolerance")?;
        Ok(Self::new(destination)
            .with_max_speed(max_speed.unwrap_or(DEFAULT_MAX_SPEED))
            .with_tolerance(tolerance.unwrap_or(DEFAULT_TOLERANCE)))
    }

    // ── Progress queries ──────────────────────────────────────────────────

    pub fn phase(&self) -> NavigatePhase {
        self.phase
    }

    pub fn destination_found(&self) -> bool {
        self.destination_found
    }

    pub fn destination_state(&self) -> Option<&ModelState> {
        self.destination_state.as_ref()
    }

    /// Planned route as planning-graph node ids (empty until planned).
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Distance to the destination measured on the previous tick.
    pub fn prev_error(&self) -> Option<f64> {
        self.prev_error
    }

    /// `true` if the last tick failed to reduce the distance to the
    /// destination.  Observation only; navigation carries on regardless.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    fn try_resolve(&mut self, ctx: &TickContext<'_>) -> bool {
        match ctx.resolve_destination(&self.destination_name) {
            None => {
                tracing::trace!(
                    step = %ctx.step,
                    destination = %self.destination_name,
                    "destination not known yet"
                );
                false
            }
            Some(dest) => {
                tracing::debug!(
                    step = %ctx.step,
                    destination = %self.destination_name,
                    at = %dest,
                    "destination resolved"
                );
                self.destination_found = true;
                self.destination_state = Some(dest);
                self.phase = NavigatePhase::Planning;
                true
            }
        }
    }

    fn try_plan(&mut self, state: &ModelState, dest: &ModelState, ctx: &TickContext<'_>) -> bool {
        match ctx.plan(state, dest) {
            Ok(path) if !path.is_empty() => {
                tracing::debug!(
                    step = %ctx.step,
                    destination = %self.destination_name,
                    waypoints = path.len(),
                    "path planned"
                );
                self.next_waypoint = first_waypoint_ahead(&path, state, dest, ctx.building);
                self.path = path;
                self.phase = NavigatePhase::EnRoute;
                true
            }
            Ok(_) => {
                tracing::trace!(
                    step = %ctx.step,
                    destination = %self.destination_name,
                    "planner returned an empty path"
                );
                false
            }
            Err(e) => {
                tracing::trace!(
                    step = %ctx.step,
                    destination = %self.destination_name,
                    error = %e,
                    "planning failed"
                );
                false
            }
        }
    }

    /// Current target: the next graph waypoint, or the destination once all
    /// waypoints are behind us.  Waypoints missing from the graph are skipped.
    fn current_target(&mut self, dest: &ModelState, ctx: &TickContext<'_>) -> ModelState {
        while self.next_waypoint < self.path.len() {
            if let Some(w) = ctx.building.waypoint(self.path[self.next_waypoint]) {
                return w;
            }
            self.next_waypoint += 1;
        }
        *dest
    }

    fn advance(
        &mut self,
        dt:    f64,
        state: &mut ModelState,
        dest:  &ModelState,
        ctx:   &TickContext<'_>,
    ) {
        let start = *state;
        let mut budget = (self.max_speed * dt).max(0.0);

        while budget > 0.0 {
            let target = self.current_target(dest, ctx);
            let remaining = state.distance_to(&target);
            if remaining <= budget {
                state.x = target.x;
                state.y = target.y;
                state.z = target.z;
                budget -= remaining;
                if self.next_waypoint >= self.path.len() {
                    break;
                }
                self.next_waypoint += 1;
            } else {
                // Unit direction keeps axis-aligned moves exact.
                state.x += (target.x - state.x) / remaining * budget;
                state.y += (target.y - state.y) / remaining * budget;
                state.z += (target.z - state.z) / remaining * budget;
                budget = 0.0;
            }
        }

        state.yaw = start.heading_to(state);
        state.velocity = (dt > 0.0).then(|| [(state.x - start.x) / dt, (state.y - start.y) / dt]);

        let error = state.distance_to(dest);
        let converging = self.prev_error.is_none_or(|prev| error <= prev);
        self.stalled = error > 0.0 && self.prev_error.is_some_and(|prev| error >= prev);
        self.prev_error = Some(error);

        if error < self.tolerance && (converging || error == 0.0) {
            tracing::debug!(
                step = %ctx.step,
                destination = %self.destination_name,
                error,
                "arrived"
            );
            self.phase = NavigatePhase::Arrived;
            self.stalled = false;
            state.velocity = None;
        }
    }
}

/// Index of the first path waypoint the agent still has to reach.
///
/// The planner snaps the start to the nearest graph node, which may lie behind
/// an agent standing mid-lane.  A waypoint is skipped while the agent is no
/// farther from the following point (next waypoint, or the destination after
/// the last one) than the waypoint itself is.
fn first_waypoint_ahead(
    path:     &[NodeId],
    state:    &ModelState,
    dest:     &ModelState,
    building: &Building,
) -> usize {
    let mut i = 0;
    while i < path.len() {
        let Some(here) = building.waypoint(path[i]) else {
            break;
        };
        let next = match path.get(i + 1) {
            Some(&n) => match building.waypoint(n) {
                Some(w) => w,
                None => break,
            },
            None => *dest,
        };
        if state.distance_to(&next) > here.distance_to(&next) {
            break;
        }
        i += 1;
    }
    i
}

impl BehaviorNode for NavigateBehavior {
    fn type_tag(&self) -> &'static str {
        "navigate"
    }

    fn tick(&mut self, dt: f64, state: &mut ModelState, ctx: &TickContext<'_>) {
        if self.phase == NavigatePhase::Arrived {
            return;
        }
        if self.phase == NavigatePhase::Unresolved && !self.try_resolve(ctx) {
            return;
        }
        let Some(dest) = self.destination_state else {
            return;
        };
        if self.phase == NavigatePhase::Planning && !self.try_plan(state, &dest, ctx) {
            return;
        }
        self.advance(dt, state, &dest, ctx);
    }

    fn is_complete(&self) -> bool {
        self.phase == NavigatePhase::Arrived
    }

    fn clone_node(&self) -> Box<dyn BehaviorNode> {
        Box::new(
            NavigateBehavior::new(self.destination_name.clone())
                .with_max_speed(self.max_speed)
                .with_tolerance(self.tolerance),
        )
    }

    fn print(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        indent(out, depth)?;
        writeln!(
            out,
            "navigate destination={:?} max_speed={} tolerance={} [{}]",
            self.destination_name, self.max_speed, self.tolerance, self.phase
        )
    }
}
