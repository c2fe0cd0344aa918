//! Centrality measures.
//!
//! - **Degree centrality** — normalized degree, `degree / (n−1)`
//! - **Betweenness centrality** — Brandes' algorithm; exact below the
//!   configured node threshold, estimated from a fixed prefix of source nodes
//!   above it
//! - **PageRank** — power iteration with teleport; skipped entirely above the
//!   configured node limit to bound runtime
//!
//! All scores are returned indexed by `NodeIndex::index()`. The engine owns
//! averaging and the soft-fail/warning policy.

use std::collections::VecDeque;

use crate::models::{MetricsConfig, NetworkGraph};

// ============================================================================
// Degree centrality
// ============================================================================

/// Normalized degree centrality per node: total degree divided by `n − 1`.
/// Graphs with one node or fewer score 0.0 everywhere.
pub fn degree_centrality(graph: &NetworkGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let normalizer = (n - 1) as f64;
    graph
        .total_degrees()
        .into_iter()
        .map(|d| d as f64 / normalizer)
        .collect()
}

// ============================================================================
// Betweenness centrality (Brandes)
// ============================================================================

/// Betweenness scores plus whether they were estimated from a sample of
/// source nodes rather than computed exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct BetweennessResult {
    pub scores: Vec<f64>,
    pub approximate: bool,
}

/// Betweenness centrality via Brandes' algorithm, normalized by
/// `(n−1)(n−2)`.
///
/// Below `betweenness_exact_limit` nodes every node is a source. At or above
/// it, only the first `betweenness_sample_size` nodes in iteration order are
/// used as sources and the scores are rescaled by `n / k`, trading accuracy
/// for tractability; the result is flagged as approximate.
pub fn betweenness_centrality(graph: &NetworkGraph, config: &MetricsConfig) -> BetweennessResult {
    let adj = graph.successor_lists();
    let n = adj.len();
    let mut centrality = vec![0.0f64; n];

    let approximate = n >= config.betweenness_exact_limit;
    let num_sources = if approximate {
        config.betweenness_sample_size.min(n)
    } else {
        n
    };

    for s in 0..num_sources {
        // Forward BFS: shortest-path counts and predecessor lists
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];

        sigma[s] = 1.0;
        dist[s] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(s);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for &w in &adj[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Backward pass: accumulate dependencies
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    // Normalize. Undirected accumulation visits each pair from both
    // endpoints, so the single (n−1)(n−2) divisor covers both modes.
    if n > 2 {
        let mut scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        if approximate && num_sources > 0 {
            scale *= n as f64 / num_sources as f64;
        }
        for c in &mut centrality {
            *c *= scale;
        }
    }

    BetweennessResult {
        scores: centrality,
        approximate,
    }
}

// ============================================================================
// PageRank (power iteration)
// ============================================================================

/// PageRank via power iteration with teleport.
///
/// Returns `None` when the node count is at or above
/// `pagerank_node_limit` — the computation is skipped entirely rather than
/// attempted, to bound runtime. Dangling-node mass is redistributed evenly
/// and the final scores are normalized to sum to 1.0.
pub fn pagerank(graph: &NetworkGraph, config: &MetricsConfig) -> Option<Vec<f64>> {
    let n = graph.node_count();
    if n >= config.pagerank_node_limit {
        return None;
    }
    if n == 0 {
        return Some(Vec::new());
    }

    let adj = graph.successor_lists();
    let damping = config.pagerank_damping;
    let out_degrees: Vec<usize> = adj.iter().map(|l| l.len()).collect();

    let initial = 1.0 / n as f64;
    let mut scores: Vec<f64> = vec![initial; n];
    let mut new_scores: Vec<f64> = vec![0.0; n];

    for _ in 0..config.pagerank_max_iterations {
        // Reset new scores to the teleportation base
        for s in new_scores.iter_mut() {
            *s = (1.0 - damping) / n as f64;
        }

        // Distribute scores along edges
        for i in 0..n {
            if out_degrees[i] > 0 {
                let contribution = damping * scores[i] / out_degrees[i] as f64;
                for &neighbor in &adj[i] {
                    new_scores[neighbor] += contribution;
                }
            } else {
                // Dangling node: distribute evenly to all nodes
                let contribution = damping * scores[i] / n as f64;
                for s in new_scores.iter_mut() {
                    *s += contribution;
                }
            }
        }

        // Check convergence
        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        std::mem::swap(&mut scores, &mut new_scores);

        if diff < config.pagerank_tolerance {
            break;
        }
    }

    // Normalize to sum = 1.0
    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        for s in scores.iter_mut() {
            *s /= total;
        }
    }

    Some(scores)
}

// ============================================================================
// Tests
// ============================================================================
