//! Structural graph metrics.
//!
//! - **Density** — edge fraction of all possible node pairs
//! - **Triangle count** — per-node contribution sum on the undirected projection
//! - **Reciprocity** — mutual-edge fraction for directed graphs
//! - **Clustering coefficient** — average local clustering
//! - **Degree distribution** — mean/max/min/variance/std of the degree sequence
//! - **Assortativity** — Pearson correlation of edge-endpoint degrees
//!
//! Every function is a pure function of the graph; none of them errors on
//! empty or single-node inputs. Assortativity is the one metric with
//! genuinely undefined cases (no edges, zero degree variance) and reports
//! those via `Result` so the engine can substitute the soft default.

use petgraph::visit::EdgeRef;
use std::collections::HashSet;

use crate::models::{DegreeStats, MetricsError, NetworkGraph};

// ============================================================================
// Density
// ============================================================================

/// Graph density: `m / (n·(n−1))` for directed graphs, `2m / (n·(n−1))` for
/// undirected. Returns 0.0 when the graph has one node or fewer.
pub fn density(graph: &NetworkGraph) -> f64 {
    let n = graph.node_count();
    let m = graph.edge_count();
    if n <= 1 {
        return 0.0;
    }

    let max_edges = if graph.is_directed() {
        (n * (n - 1)) as f64
    } else {
        (n * (n - 1)) as f64 / 2.0
    };
    if max_edges == 0.0 {
        return 0.0;
    }
    m as f64 / max_edges
}

// ============================================================================
// Triangles
// ============================================================================

/// Per-node triangle membership counts on the undirected adjacency lists.
///
/// A node's count is the number of connected pairs among its neighbors, i.e.
/// the number of triangles it participates in.
fn local_triangles(adj: &[Vec<usize>]) -> Vec<u64> {
    let sets: Vec<HashSet<usize>> = adj.iter().map(|l| l.iter().copied().collect()).collect();

    adj.iter()
        .map(|neighbors| {
            let mut count = 0u64;
            for i in 0..neighbors.len() {
                for j in (i + 1)..neighbors.len() {
                    if sets[neighbors[i]].contains(&neighbors[j]) {
                        count += 1;
                    }
                }
            }
            count
        })
        .collect()
}

/// Number of triangles in the graph, computed on the undirected projection
/// regardless of directedness. Each triangle is counted once per corner and
/// the sum divided by 3.
pub fn triangle_count(graph: &NetworkGraph) -> u64 {
    let adj = graph.undirected_neighbor_lists();
    local_triangles(&adj).iter().sum::<u64>() / 3
}

// ============================================================================
// Reciprocity
// ============================================================================

/// Fraction of directed edges whose reverse edge also exists.
///
/// Undirected graphs are defined to have reciprocity 1.0 (every edge is
/// trivially mutual). Directed graphs with no edges report 0.0.
pub fn reciprocity(graph: &NetworkGraph) -> f64 {
    if !graph.is_directed() {
        return 1.0;
    }

    let m = graph.edge_count();
    if m == 0 {
        return 0.0;
    }

    let mutual = graph
        .graph
        .edge_references()
        .filter(|e| graph.has_edge_by_index(e.target(), e.source()))
        .count();
    mutual as f64 / m as f64
}

// ============================================================================
// Clustering coefficient
// ============================================================================

/// Average local clustering coefficient.
///
/// Each node contributes the fraction of its neighbor pairs that are
/// themselves connected; nodes with fewer than two neighbors contribute 0.
/// Computed on the undirected neighborhood for directed graphs.
pub fn average_clustering(graph: &NetworkGraph) -> f64 {
    let adj = graph.undirected_neighbor_lists();
    let n = adj.len();
    if n == 0 {
        return 0.0;
    }

    let triangles = local_triangles(&adj);
    let total: f64 = adj
        .iter()
        .zip(triangles.iter())
        .map(|(neighbors, &t)| {
            let k = neighbors.len();
            if k < 2 {
                0.0
            } else {
                let possible = (k * (k - 1) / 2) as f64;
                t as f64 / possible
            }
        })
        .sum();
    total / n as f64
}

// ============================================================================
// Degree distribution
// ============================================================================

/// Statistics of the degree sequence. Directed graphs use total degree
/// (in + out); variance is the population variance.
pub fn degree_stats(graph: &NetworkGraph) -> DegreeStats {
    let degrees = graph.total_degrees();
    if degrees.is_empty() {
        return DegreeStats::default();
    }

    let n = degrees.len() as f64;
    let avg = degrees.iter().sum::<usize>() as f64 / n;
    let variance = degrees
        .iter()
        .map(|&d| {
            let diff = d as f64 - avg;
            diff * diff
        })
        .sum::<f64>()
        / n;

    DegreeStats {
        avg_degree: avg,
        max_degree: degrees.iter().copied().max().unwrap_or(0) as u64,
        min_degree: degrees.iter().copied().min().unwrap_or(0) as u64,
        degree_variance: variance,
        degree_std: variance.sqrt(),
    }
}

// ============================================================================
// Assortativity
// ============================================================================

/// Degree assortativity: the Pearson correlation between the total degrees of
/// each edge's endpoints. Undirected edges contribute both orientations so
/// the two sequences are symmetric.
///
/// Degenerate inputs are reported as errors: the engine substitutes 0.0.
pub fn assortativity(graph: &NetworkGraph) -> Result<f64, MetricsError> {
    if graph.edge_count() == 0 {
        return Err(MetricsError::NoEdges);
    }

    let degrees = graph.total_degrees();
    let mut xs: Vec<f64> = Vec::with_capacity(graph.edge_count() * 2);
    let mut ys: Vec<f64> = Vec::with_capacity(graph.edge_count() * 2);

    for edge in graph.graph.edge_references() {
        let du = degrees[edge.source().index()] as f64;
        let dv = degrees[edge.target().index()] as f64;
        xs.push(du);
        ys.push(dv);
        if !graph.is_directed() {
            xs.push(dv);
            ys.push(du);
        }
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(MetricsError::DegenerateDegrees);
    }
    Ok(cov / (var_x * var_y).sqrt())
}

// ============================================================================
// Tests
// ============================================================================
