//! dock_run — a small warehouse shift for the traffic_sim behavior engine.
//!
//! Spawns a handful of forklifts near the `start` vertex and runs each one
//! through a scripted behavior (deliver, patrol or shuttle) until every
//! script completes or the step budget runs out.
//!
//! ```text
//! cargo run -p dock_run                       # built-in defaults
//! cargo run -p dock_run -- dock_run.toml      # config from TOML
//! RUST_LOG=ts_behavior=debug cargo run -p dock_run
//! ```

mod depot;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use ts_behavior::BehaviorLibrary;
use ts_building::{Building, DijkstraPlanner};
use ts_core::{ModelState, SimConfig, Step};
use ts_output::writer::OutputWriter;
use ts_output::{CsvWriter, SimOutputObserver};
use ts_scenario::Scenario;
use ts_sim::{AgentSlot, RetiredAgent, SimBuilder, SimObserver};

use depot::{BEHAVIORS_YAML, BUILDING_YAML, SCENARIO_YAML};

// ── Configuration ─────────────────────────────────────────────────────────────

const BEHAVIOR_ROTATION: [&str; 3] = ["deliver", "patrol", "shuttle"];

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunConfig {
    agents:     usize,
    output_dir: PathBuf,
    sim:        SimConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            agents:     6,
            output_dir: PathBuf::from("output/dock_run"),
            sim:        SimConfig { total_steps: 2_000, seed: 42, ..SimConfig::default() },
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    summary_rows:  usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, snapshot_rows: 0, summary_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_step_start(&mut self, step: Step) {
        self.inner.on_step_start(step);
    }

    fn on_retired(&mut self, step: Step, agent: &RetiredAgent) {
        self.inner.on_retired(step, agent);
    }

    fn on_step_end(&mut self, step: Step, active: usize) {
        self.summary_rows += 1;
        self.inner.on_step_end(step, active);
    }

    fn on_snapshot(&mut self, step: Step, clock: &ts_core::SimClock, agents: &[AgentSlot]) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(step, clock, agents);
    }

    fn on_sim_end(&mut self, final_step: Step) {
        self.inner.on_sim_end(final_step);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let run = load_config(config_path.as_deref())?;

    println!("=== dock_run: traffic_sim behavior engine ===");
    println!(
        "Agents: {}  |  dt: {} s  |  Max steps: {}  |  Seed: {}",
        run.agents, run.sim.dt_secs, run.sim.total_steps, run.sim.seed
    );
    println!();

    // 1. Static inputs.
    let building = Building::from_yaml_str(BUILDING_YAML, run.sim.nav_graph)?;
    let scenario = Scenario::from_yaml_str(SCENARIO_YAML)?;
    let library = BehaviorLibrary::from_yaml_str(BEHAVIORS_YAML)?;
    println!(
        "Building {:?}: {} nodes, {} edges  |  behaviors: {}",
        building.name,
        building.nav_graph().node_count(),
        building.nav_graph().edge_count(),
        library.names().collect::<Vec<_>>().join(", ")
    );

    // 2. Sim.
    let mut sim = SimBuilder::new(run.sim.clone(), building, DijkstraPlanner)
        .scenario(scenario)
        .build()?;

    // 3. Agents, jittered around `start`.
    let start = sim
        .building
        .resolve_destination("start")
        .context("building has no `start` vertex")?;
    let mut rng = SmallRng::seed_from_u64(run.sim.seed);
    for i in 0..run.agents {
        let behavior = BEHAVIOR_ROTATION[i % BEHAVIOR_ROTATION.len()];
        let state = ModelState {
            x: start.x + rng.gen_range(-0.5..0.5),
            y: start.y + rng.gen_range(-0.5..0.5),
            ..start
        };
        sim.spawn_from_library(format!("forklift_{i}"), state, &library, behavior)?;
    }

    // 4. Output.
    let writer = CsvWriter::new(&run.output_dir)?;
    let mut obs = CountingObserver::new(SimOutputObserver::new(writer, &run.sim));

    // 5. Run.
    let t0 = Instant::now();
    let end = sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!(
        "Stopped at {} ({:.1} s simulated) in {:.3} s",
        end,
        sim.clock.elapsed_secs(),
        elapsed.as_secs_f64()
    );
    println!("  model_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  step_summaries.csv  : {} rows", obs.summary_rows);
    println!();

    let scenario = sim.scenario.as_ref().context("scenario was attached above")?;
    println!("{:<12} {:<10} {:>8} {:>8} {:>8}", "Agent", "Status", "x", "y", "In yard");
    println!("{}", "-".repeat(50));
    let rows = sim
        .retired()
        .iter()
        .map(|r| (&r.name, r.reason.to_string(), r.state))
        .chain(sim.agents().iter().map(|a| (&a.name, "running".to_owned(), a.state)));
    for (name, status, state) in rows {
        println!(
            "{:<12} {:<10} {:>8.2} {:>8.2} {:>8}",
            name,
            status,
            state.x,
            state.y,
            if scenario.roi_contains("L1", state.x, state.y) { "yes" } else { "no" },
        );
    }

    Ok(())
}
