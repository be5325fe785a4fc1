//! Planning trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Behaviors call planning through the [`Planner`] trait, so applications can
//! swap in A*, traffic-aware, or precomputed planners without touching the
//! behavior core.
//!
//! # Determinism
//!
//! A planner must be a pure query: the same start, destination and building
//! always produce the same path, and no planner state is written while a query
//! runs.  The simulation driver relies on this when it ticks agents in
//! parallel.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ts_core::{ModelState, NodeId};

use crate::graph::PlanningGraph;
use crate::{Building, BuildingError, PlanResult};

// ── Planner trait ─────────────────────────────────────────────────────────────

pub trait Planner: Send + Sync {
    /// Plan a route from `from` to `to` through `building`'s navigation graph.
    ///
    /// The returned `NodeId`s index into `building.nav_graph()`.  An `Err` or
    /// an empty path both mean "no plan this time".
    fn plan(
        &self,
        from:     &ModelState,
        to:       &ModelState,
        building: &Building,
    ) -> PlanResult<Vec<NodeId>>;
}

// ── DijkstraPlanner ───────────────────────────────────────────────────────────

/// Dijkstra over the building's navigation graph.
///
/// Both endpoints are snapped to their nearest graph node.  The returned path
/// includes both the start and goal nodes; a start that snaps onto the goal
/// yields a single-node path.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPlanner;

impl Planner for DijkstraPlanner {
    fn plan(
        &self,
        from:     &ModelState,
        to:       &ModelState,
        building: &Building,
    ) -> PlanResult<Vec<NodeId>> {
        let graph = building.nav_graph();
        let start = graph.snap_to_node(from).ok_or(BuildingError::EmptyGraph)?;
        let goal  = graph.snap_to_node(to).ok_or(BuildingError::EmptyGraph)?;
        shortest_path(graph, start, goal)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Node sequence of the cheapest route from `from` to `to`.
pub fn shortest_path(graph: &PlanningGraph, from: NodeId, to: NodeId) -> PlanResult<Vec<NodeId>> {
    let n = graph.node_count();
    if from.index() >= n {
        return Err(BuildingError::NodeNotFound(from));
    }
    if to.index() >= n {
        return Err(BuildingError::NodeNotFound(to));
    }
    if from == to {
        return Ok(vec![from]);
    }

    let mut dist      = vec![u64::MAX; n];
    let mut prev_node: Vec<Option<NodeId>> = vec![None; n];
    dist[from.index()] = 0;

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(&prev_node, to));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost.saturating_add(graph.edge_cost_mm[edge.index()]);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_node[neighbor.index()] = Some(node);
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(BuildingError::NoRoute { from, to })
}

fn reconstruct(prev_node: &[Option<NodeId>], to: NodeId) -> Vec<NodeId> {
    let mut path = vec![to];
    let mut cur = to;
    while let Some(prev) = prev_node[cur.index()] {
        cur = prev;
        path.push(cur);
    }
    path.reverse();
    path
}
