//! Graph metrics and comparison engine.
//!
//! Computes a full structural-metrics snapshot for a graph — density,
//! triangles, connected components, diameter/radius, reciprocity, clustering,
//! degree statistics, assortativity, centrality measures, and community
//! partitions — and diffs two such snapshots for downstream reporting and
//! plotting.
//!
//! ## Architecture
//!
//! ```text
//! loader (external) ──► NetworkGraph
//!                            │
//!                      MetricsEngine ──► GraphAnalysis (MetricsRecord + warnings)
//!                            │                  │
//!                       algorithms         compare ──► ComparisonRecord
//! ```
//!
//! ## Modules
//!
//! - [`models`] — graph model, result records, configuration, errors
//! - [`metrics`] — density, triangles, reciprocity, clustering, degrees, assortativity
//! - [`connectivity`] — components, diameter, radius
//! - [`centrality`] — degree, betweenness (Brandes), PageRank
//! - [`community`] — Louvain, greedy modularity, label propagation
//! - [`engine`] — pipeline orchestrator and serialization
//! - [`compare`] — two-snapshot diffing
//!
//! The engine is synchronous and holds no shared state: independent graphs
//! can be analyzed by independent engines in parallel without coordination.
//! Construction of the input graph (file parsing, format dispatch) and
//! consumption of the serialized records (plots, reports) belong to external
//! layers.

pub mod centrality;
pub mod community;
pub mod compare;
pub mod connectivity;
pub mod engine;
pub mod metrics;
pub mod models;

// Re-export primary types for convenience
pub use compare::{compare, ComparisonRecord, ComponentComparison, ScalarComparison};
pub use engine::MetricsEngine;
pub use models::{
    CentralitySummary, CommunityAlgorithm, CommunitySummary, ComponentsSummary, DegreeStats,
    GraphAnalysis, GraphMode, MetricsConfig, MetricsError, MetricsRecord, NetworkGraph,
    ScoreSummary,
};
