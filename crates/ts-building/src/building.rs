//! The building model: levels, vertices, lanes, and placed static models.
//!
//! A [`Building`] is read-only for the whole simulation.  It owns the
//! [`PlanningGraph`] built from the lanes of one navigation-graph index, and a
//! name index used to resolve symbolic destinations to concrete poses.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use ts_core::{ModelState, NodeId};

use crate::graph::{PlanningGraph, PlanningGraphBuilder};

// ── Map elements ──────────────────────────────────────────────────────────────

/// A named or anonymous point drawn on a level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub x:    f64,
    pub y:    f64,
    pub z:    f64,
    /// Empty when the vertex is unnamed.
    pub name: String,
}

impl Vertex {
    pub fn new(x: f64, y: f64, name: impl Into<String>) -> Self {
        Self { x, y, z: 0.0, name: name.into() }
    }
}

/// A traffic lane between two vertices of the same level.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub start:         usize,
    pub end:           usize,
    pub bidirectional: bool,
    /// Navigation graph this lane belongs to.
    pub graph_idx:     u32,
}

/// A static model instance placed on a level (a shelf, a dock, a charger).
#[derive(Clone, Debug, PartialEq)]
pub struct StaticModel {
    pub name:       String,
    pub model_name: String,
    pub x:          f64,
    pub y:          f64,
    pub z:          f64,
    pub yaw:        f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Level {
    pub name:      String,
    pub elevation: f64,
    pub vertices:  Vec<Vertex>,
    pub lanes:     Vec<Lane>,
    pub models:    Vec<StaticModel>,
}

#[derive(Copy, Clone, Debug)]
enum Landmark {
    Vertex { level: usize, index: usize },
    Model  { level: usize, index: usize },
}

// ── Building ──────────────────────────────────────────────────────────────────

pub struct Building {
    pub name:   String,
    pub levels: Vec<Level>,

    nav_graph_idx: u32,
    nav_graph:     PlanningGraph,
    landmarks:     HashMap<String, Landmark>,
}

impl Building {
    /// Assemble a building and build the planning graph for `nav_graph_idx`.
    pub fn new(name: impl Into<String>, levels: Vec<Level>, nav_graph_idx: u32) -> Self {
        let landmarks = index_landmarks(&levels);
        let nav_graph = build_nav_graph(&levels, nav_graph_idx);
        tracing::debug!(
            nodes = nav_graph.node_count(),
            edges = nav_graph.edge_count(),
            nav_graph_idx,
            "built navigation graph"
        );
        Self {
            name: name.into(),
            levels,
            nav_graph_idx,
            nav_graph,
            landmarks,
        }
    }

    /// A building with no levels.  Nothing resolves and nothing plans.
    pub fn empty() -> Self {
        Self::new("", Vec::new(), 0)
    }

    /// Rebuild the planning graph from the lanes of another graph index.
    pub fn with_nav_graph(mut self, nav_graph_idx: u32) -> Self {
        if nav_graph_idx != self.nav_graph_idx {
            self.nav_graph = build_nav_graph(&self.levels, nav_graph_idx);
            self.nav_graph_idx = nav_graph_idx;
        }
        self
    }

    #[inline]
    pub fn nav_graph(&self) -> &PlanningGraph {
        &self.nav_graph
    }

    #[inline]
    pub fn nav_graph_idx(&self) -> u32 {
        self.nav_graph_idx
    }

    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    /// Resolve a symbolic destination to a pose.
    ///
    /// Named vertices win over static models of the same name.  A vertex
    /// resolves at its level's elevation facing +x; a model resolves to its
    /// placed pose.
    pub fn resolve_destination(&self, name: &str) -> Option<ModelState> {
        match *self.landmarks.get(name)? {
            Landmark::Vertex { level, index } => {
                let lvl = &self.levels[level];
                let v = &lvl.vertices[index];
                Some(ModelState::new(v.x, v.y, lvl.elevation + v.z, 0.0))
            }
            Landmark::Model { level, index } => {
                let lvl = &self.levels[level];
                let m = &lvl.models[index];
                Some(ModelState::new(m.x, m.y, lvl.elevation + m.z, m.yaw))
            }
        }
    }

    /// Position of a path node, for behaviors walking a planned route.
    pub fn waypoint(&self, node: NodeId) -> Option<ModelState> {
        self.nav_graph.node(node).map(|n| n.state())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn index_landmarks(levels: &[Level]) -> HashMap<String, Landmark> {
    let mut landmarks: HashMap<String, Landmark> = HashMap::default();
    for (li, level) in levels.iter().enumerate() {
        for (mi, model) in level.models.iter().enumerate() {
            if !model.name.is_empty() {
                landmarks
                    .entry(model.name.clone())
                    .or_insert(Landmark::Model { level: li, index: mi });
            }
        }
    }
    // Second pass so vertices override models regardless of level order.
    for (li, level) in levels.iter().enumerate() {
        for (vi, vertex) in level.vertices.iter().enumerate() {
            if vertex.name.is_empty() {
                continue;
            }
            match landmarks.get(&vertex.name) {
                Some(Landmark::Vertex { .. }) => {}
                _ => {
                    landmarks.insert(vertex.name.clone(), Landmark::Vertex { level: li, index: vi });
                }
            }
        }
    }
    landmarks
}

/// Collect the lanes of `graph_idx` on every level into one graph.  Only
/// vertices touched by a lane become graph nodes.
fn build_nav_graph(levels: &[Level], graph_idx: u32) -> PlanningGraph {
    let mut builder = PlanningGraphBuilder::new();
    let mut node_of: HashMap<(usize, usize), NodeId> = HashMap::default();

    for (li, level) in levels.iter().enumerate() {
        for lane in level.lanes.iter().filter(|l| l.graph_idx == graph_idx) {
            let mut node_for = |vi: usize, builder: &mut PlanningGraphBuilder| {
                *node_of.entry((li, vi)).or_insert_with(|| {
                    let v = &level.vertices[vi];
                    let name = (!v.name.is_empty()).then(|| v.name.clone());
                    builder.add_node([v.x, v.y, level.elevation + v.z], li, name)
                })
            };
            let a = node_for(lane.start, &mut builder);
            let b = node_for(lane.end, &mut builder);
            if lane.bidirectional {
                builder.add_lane(a, b);
            } else {
                builder.add_directed_edge(a, b);
            }
        }
    }

    builder.build()
}
