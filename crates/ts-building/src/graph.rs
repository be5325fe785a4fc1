//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_to`, `edge_length_m`, `edge_cost_mm`)
//! are sorted by source node and indexed by `EdgeId`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps a 3-D position to the nearest `NodeId`.  The
//! planner uses it to snap an agent's pose and its destination onto the graph.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ts_core::{EdgeId, ModelState, NodeId};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── GraphNode ─────────────────────────────────────────────────────────────────

/// One waypoint of the navigation graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    /// `[x, y, z]` in metres; `z` is the level elevation.
    pub pos:   [f64; 3],
    /// Index into `Building::levels`.
    pub level: usize,
    /// The vertex name, when the source vertex had one.
    pub name:  Option<String>,
}

impl GraphNode {
    /// The node position as an idle [`ModelState`].
    pub fn state(&self) -> ModelState {
        ModelState::new(self.pos[0], self.pos[1], self.pos[2], 0.0)
    }
}

// ── PlanningGraph ─────────────────────────────────────────────────────────────

/// Directed navigation graph in CSR format plus a spatial index for snapping.
///
/// Paths returned by a [`Planner`][crate::Planner] are lists of `NodeId`s that
/// index into this graph; the graph itself stays owned by the
/// [`Building`][crate::Building].
pub struct PlanningGraph {
    pub nodes: Vec<GraphNode>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Euclidean length of each edge in metres.
    pub edge_length_m: Vec<f64>,

    /// Integer Dijkstra cost (length in millimetres).
    pub edge_cost_mm: Vec<u64>,

    spatial_idx: RTree<NodeEntry>,
}

impl PlanningGraph {
    /// A graph with no nodes.  Every plan against it fails.
    pub fn empty() -> Self {
        PlanningGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId::from_index(i))
    }

    /// Nearest graph node to `state`.  `None` only for an empty graph.
    pub fn snap_to_node(&self, state: &ModelState) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[state.x, state.y, state.z])
            .map(|e| e.id)
    }
}

// ── PlanningGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`PlanningGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ts_building::PlanningGraphBuilder;
///
/// let mut b = PlanningGraphBuilder::new();
/// let a = b.add_node([0.0, 0.0, 0.0], 0, None);
/// let c = b.add_node([3.0, 4.0, 0.0], 0, Some("dock".into()));
/// b.add_lane(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// assert_eq!(graph.edge_length_m[0], 5.0);
/// ```
#[derive(Default)]
pub struct PlanningGraphBuilder {
    nodes:     Vec<GraphNode>,
    raw_edges: Vec<(NodeId, NodeId)>,
}

impl PlanningGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: [f64; 3], level: usize, name: Option<String>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(GraphNode { pos, level, name });
        id
    }

    /// Add a **directed** edge; its cost is the Euclidean node distance.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) {
        self.raw_edges.push((from, to));
    }

    /// Add edges in both directions.
    pub fn add_lane(&mut self, a: NodeId, b: NodeId) {
        self.add_directed_edge(a, b);
        self.add_directed_edge(b, a);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`PlanningGraph`].
    pub fn build(self) -> PlanningGraph {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        // Stable sort keeps insertion order among a node's edges.
        raw.sort_by_key(|(from, _)| from.0);

        let length = |from: NodeId, to: NodeId| {
            let a = self.nodes[from.index()].pos;
            let b = self.nodes[to.index()].pos;
            ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2) + (b[2] - a[2]).powi(2)).sqrt()
        };

        let edge_to:       Vec<NodeId> = raw.iter().map(|&(_, t)| t).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|&(f, t)| length(f, t)).collect();
        let edge_cost_mm:  Vec<u64>    = edge_length_m
            .iter()
            .map(|m| (m * 1000.0).round() as u64)
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| NodeEntry { point: n.pos, id: NodeId::from_index(i) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        PlanningGraph {
            nodes: self.nodes,
            node_out_start,
            edge_to,
            edge_length_m,
            edge_cost_mm,
            spatial_idx,
        }
    }
}
