//! Metrics engine — orchestrates the full pipeline.
//!
//! `MetricsEngine` is the single entry point for computing a complete
//! metrics snapshot. One `analyze` call runs the fixed pipeline:
//!
//! ```text
//! density → triangles → connected components → diameter → reciprocity
//!   → clustering coefficient → degree distribution → assortativity
//!   → radius → centrality suite → community detection
//! ```
//!
//! Soft-fail metrics (assortativity, radius, centrality, communities) never
//! abort the pipeline: each failure is logged at warning level, substituted
//! with its zero/empty default, and surfaced in
//! [`GraphAnalysis::warnings`]. The record itself is built once, after the
//! whole pipeline has run.

use std::time::Instant;

use crate::centrality;
use crate::community;
use crate::connectivity;
use crate::metrics;
use crate::models::{
    CentralitySummary, GraphAnalysis, MetricsConfig, MetricsRecord, NetworkGraph, ScoreSummary,
};

/// Average and maximum of a score distribution; zeros when empty.
fn summarize(scores: &[f64]) -> ScoreSummary {
    if scores.is_empty() {
        return ScoreSummary::default();
    }
    ScoreSummary {
        average: scores.iter().sum::<f64>() / scores.len() as f64,
        max: scores.iter().copied().fold(f64::MIN, f64::max),
    }
}

/// Computes a full [`MetricsRecord`] per graph.
///
/// The engine holds a display name (used by the comparator output) and the
/// tuning configuration. It is stateless across calls: two engines may
/// analyze two graphs in parallel without coordination.
pub struct MetricsEngine {
    name: String,
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create an engine with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, MetricsConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(name: impl Into<String>, config: MetricsConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Run the full metrics pipeline on a graph.
    ///
    /// Always returns a complete record; metrics that could not be computed
    /// carry their defaulted values and a corresponding entry in
    /// `warnings`.
    pub fn analyze(&self, graph: &NetworkGraph) -> GraphAnalysis {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();

        // 1–3. Density, triangles, components
        let density = metrics::density(graph);
        let triangles = metrics::triangle_count(graph);
        let connected_components = connectivity::connected_components(graph);

        // 4. Diameter
        let diameter = connectivity::diameter(graph);

        // 5–7. Reciprocity, clustering, degree distribution
        let reciprocity = metrics::reciprocity(graph);
        let clustering_coefficient = metrics::average_clustering(graph);
        let degree_distribution = metrics::degree_stats(graph);

        // 8. Assortativity (soft-fail → 0.0)
        let assortativity = match metrics::assortativity(graph) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(graph = %self.name, "could not compute assortativity: {}", e);
                warnings.push(format!("assortativity defaulted to 0.0: {}", e));
                0.0
            }
        };

        // 9. Radius (soft-fail → 0)
        let radius = match connectivity::radius(graph) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(graph = %self.name, "could not compute radius: {}", e);
                warnings.push(format!("radius defaulted to 0: {}", e));
                0
            }
        };

        // 10. Centrality suite
        let degree_scores = centrality::degree_centrality(graph);

        let betweenness = centrality::betweenness_centrality(graph, &self.config);
        if betweenness.approximate {
            let k = self
                .config
                .betweenness_sample_size
                .min(graph.node_count());
            tracing::warn!(
                graph = %self.name,
                "betweenness estimated from {} of {} source nodes",
                k,
                graph.node_count()
            );
            warnings.push(format!(
                "betweenness_centrality approximated from {} of {} source nodes",
                k,
                graph.node_count()
            ));
        }

        let pagerank_scores = match centrality::pagerank(graph, &self.config) {
            Some(scores) => scores,
            None => {
                tracing::warn!(
                    graph = %self.name,
                    "pagerank skipped: {} nodes exceeds the {} node limit",
                    graph.node_count(),
                    self.config.pagerank_node_limit
                );
                warnings.push(format!(
                    "pagerank skipped: {} nodes exceeds the {} node limit",
                    graph.node_count(),
                    self.config.pagerank_node_limit
                ));
                vec![0.0; graph.node_count()]
            }
        };

        let centrality = CentralitySummary {
            degree_centrality: summarize(&degree_scores),
            betweenness_centrality: summarize(&betweenness.scores),
            pagerank: summarize(&pagerank_scores),
        };

        // 11. Community detection
        let communities =
            community::detect_communities(graph, self.config.community_algorithm, &self.config);

        // The record is assembled only now, once the whole pipeline has run
        let record = MetricsRecord {
            density,
            triangles,
            connected_components,
            diameter,
            reciprocity,
            clustering_coefficient,
            degree_distribution,
            assortativity,
            radius,
            centrality,
            communities,
        };

        GraphAnalysis {
            name: self.name.clone(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            directed: graph.is_directed(),
            record,
            warnings,
            computation_ms: start.elapsed().as_millis() as u64,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
