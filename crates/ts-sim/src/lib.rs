//! `ts-sim` — step loop driver for the traffic_sim behavior engine.
//!
//! # Step loop
//!
//! ```text
//! while step < config.total_steps and agents remain:
//!   ① Snapshot — copy every active agent into Vec<ActiveModel>.
//!   ② Tick     — behavior.tick(dt, &mut state, &ctx) for each agent
//!                (parallel with the `parallel` feature).
//!   ③ Retire   — drop agents whose tree completed or that were despawned;
//!                record a RetiredAgent for each.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the tick phase on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ts_behavior::parse_node;
//! use ts_building::{Building, DijkstraPlanner};
//! use ts_core::{ModelState, SimConfig};
//! use ts_sim::{NoopObserver, SimBuilder};
//!
//! let template = parse_node("{ type: navigate, destination: Dock-1 }")?;
//! let mut sim = SimBuilder::new(SimConfig::default(), building, DijkstraPlanner).build()?;
//! sim.spawn("forklift_1", ModelState::at(0.0, 0.0), template.as_ref());
//! sim.run(&mut NoopObserver);
//! ```

pub mod agent;
pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use agent::{AgentSlot, RetireReason, RetiredAgent};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
