//! Graph analytics data models.
//!
//! Defines the complete type system for the metrics engine:
//!
//! ## Input types
//! - [`GraphMode`] — directed vs. undirected, fixed per graph
//! - [`NetworkGraph`] — petgraph wrapper with ID ↔ NodeIndex mapping and an
//!   edge set for O(1) existence tests
//!
//! ## Output types
//! - [`DegreeStats`] — degree-sequence statistics
//! - [`ComponentsSummary`] — connected-component statistics
//! - [`ScoreSummary`] / [`CentralitySummary`] — centrality averages and maxima
//! - [`CommunitySummary`] — community count, modularity, and partition
//! - [`MetricsRecord`] — the full metrics snapshot for one graph
//! - [`GraphAnalysis`] — engine output: record plus name, counts, and warnings
//!
//! ## Configuration
//! - [`MetricsConfig`] — tuning parameters and size thresholds
//! - [`CommunityAlgorithm`] — closed set of community-detection strategies
//!
//! ## Errors
//! - [`MetricsError`] — invalid arguments and soft-fail reasons

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by the metrics engine.
///
/// `UnknownAlgorithm` is the only hard failure exposed to callers; the other
/// variants describe soft-fail conditions that the engine converts into
/// defaulted values plus warnings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    /// A community-detection strategy name did not match any known algorithm.
    #[error("unknown community algorithm: {0:?} (expected louvain, greedy, or label_propagation)")]
    UnknownAlgorithm(String),
    /// The graph has no nodes, so the requested metric is undefined.
    #[error("graph has no nodes")]
    EmptyGraph,
    /// The graph has no edges, so edge-based statistics are undefined.
    #[error("graph has no edges")]
    NoEdges,
    /// The degree sequence has zero variance, so correlation is undefined.
    #[error("degree sequence has zero variance")]
    DegenerateDegrees,
}

// ============================================================================
// Input types — graph structure
// ============================================================================

/// Whether edges carry direction. Fixed for the lifetime of a graph and
/// determines which algorithm variants run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphMode {
    Directed,
    Undirected,
}

impl GraphMode {
    pub fn is_directed(self) -> bool {
        matches!(self, Self::Directed)
    }
}

/// Wrapper around `petgraph::DiGraph` with bidirectional ID ↔ NodeIndex
/// mapping and a canonical edge set.
///
/// Node identifiers are strings supplied by the loader. Duplicate and
/// parallel edges collapse on insertion; in undirected mode, reciprocal
/// edges collapse to one. The edge set gives `has_edge` its O(1) bound and
/// keeps `edge_count` correct under collapsing. Analysis code treats a
/// constructed graph as read-only.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    /// The underlying graph; node weights are the node IDs.
    pub graph: DiGraph<String, ()>,
    /// Mapping from node ID to petgraph NodeIndex.
    pub id_to_index: HashMap<String, NodeIndex>,
    mode: GraphMode,
    /// Canonical edge keys: (from, to) as inserted for directed graphs,
    /// (min, max) for undirected.
    edge_set: HashSet<(usize, usize)>,
}

impl NetworkGraph {
    /// Create a new empty graph in the given mode.
    pub fn new(mode: GraphMode) -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_index: HashMap::new(),
            mode,
            edge_set: HashSet::new(),
        }
    }

    /// Create a graph with pre-allocated capacity.
    pub fn with_capacity(mode: GraphMode, nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            id_to_index: HashMap::with_capacity(nodes),
            mode,
            edge_set: HashSet::with_capacity(edges),
        }
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    pub fn is_directed(&self) -> bool {
        self.mode.is_directed()
    }

    /// Add a node. If a node with the same ID already exists, returns its
    /// existing index.
    pub fn add_node(&mut self, id: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.id_to_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.id_to_index.insert(id, idx);
        idx
    }

    /// Add an edge between two nodes identified by their IDs.
    ///
    /// Returns `None` when either endpoint is absent or the edge already
    /// exists (duplicates collapse to a single edge).
    pub fn add_edge(&mut self, from_id: &str, to_id: &str) -> Option<petgraph::graph::EdgeIndex> {
        let from = *self.id_to_index.get(from_id)?;
        let to = *self.id_to_index.get(to_id)?;
        let key = self.canonical(from.index(), to.index());
        if !self.edge_set.insert(key) {
            return None;
        }
        Some(self.graph.add_edge(from, to, ()))
    }

    /// O(1) edge-existence test. In undirected mode the orientation of the
    /// query is irrelevant.
    pub fn has_edge(&self, from_id: &str, to_id: &str) -> bool {
        let (Some(&from), Some(&to)) = (self.id_to_index.get(from_id), self.id_to_index.get(to_id))
        else {
            return false;
        };
        self.edge_set.contains(&self.canonical(from.index(), to.index()))
    }

    /// O(1) edge-existence test by index.
    pub(crate) fn has_edge_by_index(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.edge_set.contains(&self.canonical(from.index(), to.index()))
    }

    fn canonical(&self, a: usize, b: usize) -> (usize, usize) {
        match self.mode {
            GraphMode::Directed => (a, b),
            GraphMode::Undirected => (a.min(b), a.max(b)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_set.len()
    }

    /// Node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// The ID of the node at the given index.
    pub fn node_id(&self, idx: NodeIndex) -> &str {
        self.graph[idx].as_str()
    }

    /// Neighbors of a node by ID. Directed graphs yield successors only;
    /// undirected graphs yield the full neighborhood.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        match self.mode {
            GraphMode::Directed => self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|n| self.graph[n].as_str())
                .collect(),
            GraphMode::Undirected => {
                let mut seen = HashSet::new();
                let mut out = Vec::new();
                for dir in [Direction::Outgoing, Direction::Incoming] {
                    for n in self.graph.neighbors_directed(idx, dir) {
                        if n != idx && seen.insert(n) {
                            out.push(self.graph[n].as_str());
                        }
                    }
                }
                out
            }
        }
    }

    /// Undirected adjacency lists indexed by `NodeIndex::index()`.
    ///
    /// Merges both edge directions, drops self-loops, and deduplicates.
    /// This is the projection every undirected-view algorithm (triangles,
    /// clustering, components, diameter, communities) runs on.
    pub(crate) fn undirected_neighbor_lists(&self) -> Vec<Vec<usize>> {
        let n = self.graph.node_count();
        let mut lists: Vec<Vec<usize>> = vec![Vec::new(); n];
        for &(a, b) in &self.edge_set {
            if a == b {
                continue;
            }
            lists[a].push(b);
            lists[b].push(a);
        }
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }
        lists
    }

    /// Successor lists indexed by `NodeIndex::index()`: outgoing edges for
    /// directed graphs, the full neighborhood for undirected ones.
    /// Self-loops are dropped.
    pub(crate) fn successor_lists(&self) -> Vec<Vec<usize>> {
        match self.mode {
            GraphMode::Undirected => self.undirected_neighbor_lists(),
            GraphMode::Directed => {
                let n = self.graph.node_count();
                let mut lists: Vec<Vec<usize>> = vec![Vec::new(); n];
                for &(a, b) in &self.edge_set {
                    if a != b {
                        lists[a].push(b);
                    }
                }
                for list in &mut lists {
                    list.sort_unstable();
                }
                lists
            }
        }
    }

    /// Total degree (in + out for directed graphs, neighbor count for
    /// undirected) per node, indexed by `NodeIndex::index()`.
    pub(crate) fn total_degrees(&self) -> Vec<usize> {
        let n = self.graph.node_count();
        let mut degrees = vec![0usize; n];
        for &(a, b) in &self.edge_set {
            degrees[a] += 1;
            if a != b {
                degrees[b] += 1;
            }
        }
        degrees
    }

    /// Build the undirected projection: same nodes, reciprocal and parallel
    /// edges merged into a single undirected edge set. The original graph is
    /// untouched.
    pub fn to_undirected(&self) -> NetworkGraph {
        let mut projected =
            NetworkGraph::with_capacity(GraphMode::Undirected, self.node_count(), self.edge_count());
        for idx in self.graph.node_indices() {
            projected.add_node(self.graph[idx].clone());
        }
        for &(a, b) in &self.edge_set {
            let from = self.graph[NodeIndex::new(a)].clone();
            let to = self.graph[NodeIndex::new(b)].clone();
            projected.add_edge(&from, &to);
        }
        projected
    }
}

// ============================================================================
// Output types — metric summaries
// ============================================================================

/// Statistics over the degree sequence.
///
/// Directed graphs use total degree (in + out), matching the behavior of the
/// undirected degree view most network toolkits report for digraphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    pub avg_degree: f64,
    pub max_degree: u64,
    pub min_degree: u64,
    pub degree_variance: f64,
    pub degree_std: f64,
}

impl Default for DegreeStats {
    fn default() -> Self {
        Self {
            avg_degree: 0.0,
            max_degree: 0,
            min_degree: 0,
            degree_variance: 0.0,
            degree_std: 0.0,
        }
    }
}

/// Connected-component statistics. Component sizes are reported in
/// descending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComponentsSummary {
    pub num_components: usize,
    pub largest_component_size: usize,
    pub component_sizes: Vec<usize>,
    pub avg_component_size: f64,
}

/// Average and maximum of a per-node score distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreSummary {
    pub average: f64,
    pub max: f64,
}

/// Summaries for the three centrality measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CentralitySummary {
    pub degree_centrality: ScoreSummary,
    pub betweenness_centrality: ScoreSummary,
    pub pagerank: ScoreSummary,
}

/// Community-detection result: community count, modularity of the partition,
/// and the node → community-label assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommunitySummary {
    pub num_communities: usize,
    pub modularity: f64,
    pub partition: HashMap<String, u32>,
}

impl CommunitySummary {
    /// The explicit "communities unavailable" result: zero communities, zero
    /// modularity, empty partition. Callers treat this as a non-fatal
    /// condition, never an error.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// The full metrics snapshot for one graph.
///
/// Built once by the engine after the complete pipeline has run; no
/// partially-populated record is ever observable. Serializes to the flat
/// JSON mapping consumed by reporting and plotting layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub density: f64,
    pub triangles: u64,
    pub connected_components: ComponentsSummary,
    pub diameter: u64,
    pub reciprocity: f64,
    pub clustering_coefficient: f64,
    pub degree_distribution: DegreeStats,
    pub assortativity: f64,
    pub radius: u64,
    pub centrality: CentralitySummary,
    pub communities: CommunitySummary,
}

impl MetricsRecord {
    /// Serialize to a flat JSON-compatible mapping with native numbers only.
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// Engine output: the metrics record plus identifying context and any
/// non-fatal warnings accumulated while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphAnalysis {
    /// Display name for this graph, used by the comparator output.
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub directed: bool,
    pub record: MetricsRecord,
    /// Soft-fail and approximation notices, in pipeline order.
    pub warnings: Vec<String>,
    /// Wall-clock computation time in milliseconds.
    pub computation_ms: u64,
}

// ============================================================================
// Configuration
// ============================================================================

/// Community-detection strategy. A closed set: unknown names fail parsing
/// with [`MetricsError::UnknownAlgorithm`] rather than defaulting silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommunityAlgorithm {
    /// Local modularity-gain moves with hierarchical aggregation. The
    /// default; generally the highest modularity.
    #[default]
    Louvain,
    /// Iterative best-pair community merging while a positive-gain merge
    /// exists.
    GreedyModularity,
    /// Majority-neighbor label adoption iterated to convergence, ties broken
    /// by the lowest label.
    LabelPropagation,
}

impl FromStr for CommunityAlgorithm {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "louvain" => Ok(Self::Louvain),
            "greedy" | "greedy_modularity" => Ok(Self::GreedyModularity),
            "label_propagation" => Ok(Self::LabelPropagation),
            other => Err(MetricsError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for CommunityAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Louvain => write!(f, "louvain"),
            Self::GreedyModularity => write!(f, "greedy"),
            Self::LabelPropagation => write!(f, "label_propagation"),
        }
    }
}

/// Tuning parameters for the metrics pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// PageRank damping factor (default: 0.85)
    pub pagerank_damping: f64,
    /// PageRank convergence tolerance on the L1 score delta (default: 1e-6)
    pub pagerank_tolerance: f64,
    /// PageRank maximum iterations (default: 100)
    pub pagerank_max_iterations: usize,
    /// Node count at or above which PageRank is skipped entirely
    /// (default: 100_000)
    pub pagerank_node_limit: usize,
    /// Node count at or above which betweenness switches from exact to
    /// sampled sources (default: 10_000)
    pub betweenness_exact_limit: usize,
    /// Number of source nodes used in sampled betweenness, taken in
    /// iteration order (default: 1_000)
    pub betweenness_sample_size: usize,
    /// Louvain resolution parameter (default: 1.0, higher = smaller
    /// communities)
    pub louvain_resolution: f64,
    /// Maximum sweeps for iterative community algorithms (default: 100)
    pub community_max_iterations: usize,
    /// Which community-detection strategy to run (default: Louvain)
    pub community_algorithm: CommunityAlgorithm,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            pagerank_damping: 0.85,
            pagerank_tolerance: 1e-6,
            pagerank_max_iterations: 100,
            pagerank_node_limit: 100_000,
            betweenness_exact_limit: 10_000,
            betweenness_sample_size: 1_000,
            louvain_resolution: 1.0,
            community_max_iterations: 100,
            community_algorithm: CommunityAlgorithm::Louvain,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
