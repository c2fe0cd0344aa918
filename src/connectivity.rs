//! Connectivity analysis: components, diameter, radius.
//!
//! Undirected graphs use BFS flood fill for components; directed graphs use
//! strongly connected components via `petgraph::algo::tarjan_scc`. Diameter
//! and radius are eccentricity extremes over the largest component of the
//! undirected projection, so disconnected graphs degrade gracefully instead
//! of failing.

use std::collections::VecDeque;

use crate::models::{ComponentsSummary, MetricsError, NetworkGraph};

// ============================================================================
// Components
// ============================================================================

/// Component memberships on the undirected adjacency lists.
///
/// Returns one `Vec` of node indices per component, in discovery order (BFS
/// seeded in node insertion order).
fn undirected_components(adj: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adj.len();
    let mut component_of: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if component_of[start].is_some() {
            continue;
        }
        let id = components.len();
        let mut members = vec![start];
        component_of[start] = Some(id);

        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for &neighbor in &adj[current] {
                if component_of[neighbor].is_none() {
                    component_of[neighbor] = Some(id);
                    members.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(members);
    }

    components
}

/// Connected-component statistics.
///
/// Undirected graphs use standard connectivity; directed graphs use strongly
/// connected components (Tarjan's algorithm). Sizes are reported in
/// descending order.
pub fn connected_components(graph: &NetworkGraph) -> ComponentsSummary {
    let mut sizes: Vec<usize> = if graph.is_directed() {
        petgraph::algo::tarjan_scc(&graph.graph)
            .iter()
            .map(|scc| scc.len())
            .collect()
    } else {
        undirected_components(&graph.undirected_neighbor_lists())
            .iter()
            .map(|c| c.len())
            .collect()
    };
    sizes.sort_unstable_by(|a, b| b.cmp(a));

    let num = sizes.len();
    let largest = sizes.first().copied().unwrap_or(0);
    let avg = if num == 0 {
        0.0
    } else {
        sizes.iter().sum::<usize>() as f64 / num as f64
    };

    ComponentsSummary {
        num_components: num,
        largest_component_size: largest,
        component_sizes: sizes,
        avg_component_size: avg,
    }
}

// ============================================================================
// Diameter / radius
// ============================================================================

/// BFS distances from `source`, unreachable nodes marked `None`.
fn bfs_distances(adj: &[Vec<usize>], source: usize) -> Vec<Option<u64>> {
    let mut distances: Vec<Option<u64>> = vec![None; adj.len()];
    distances[source] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(current) = queue.pop_front() {
        let d = distances[current].unwrap_or(0);
        for &neighbor in &adj[current] {
            if distances[neighbor].is_none() {
                distances[neighbor] = Some(d + 1);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

/// Eccentricity of every node in the largest component of the undirected
/// projection. Empty for an empty graph.
///
/// When several components tie for largest, the first one discovered wins;
/// discovery order follows node insertion order, so the choice is
/// deterministic for a given construction sequence.
fn largest_component_eccentricities(graph: &NetworkGraph) -> Vec<u64> {
    let adj = graph.undirected_neighbor_lists();
    let components = undirected_components(&adj);
    // First-discovered component wins ties for largest.
    let mut largest: Option<&Vec<usize>> = None;
    for component in &components {
        if largest.map_or(true, |l| component.len() > l.len()) {
            largest = Some(component);
        }
    }
    let Some(component) = largest else {
        return Vec::new();
    };

    // The component is closed under adjacency, so a BFS from any member
    // reaches exactly the member set.
    component
        .iter()
        .map(|&source| {
            bfs_distances(&adj, source)
                .into_iter()
                .flatten()
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Diameter: the maximum eccentricity within the largest component of the
/// undirected projection. An empty graph has diameter 0.
pub fn diameter(graph: &NetworkGraph) -> u64 {
    largest_component_eccentricities(graph)
        .into_iter()
        .max()
        .unwrap_or(0)
}

/// Radius: the minimum eccentricity within the largest component of the
/// undirected projection. An empty graph is reported as an error so the
/// engine can substitute 0 with a warning.
pub fn radius(graph: &NetworkGraph) -> Result<u64, MetricsError> {
    largest_component_eccentricities(graph)
        .into_iter()
        .min()
        .ok_or(MetricsError::EmptyGraph)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GraphMode;

    /// Build an undirected chain of n nodes.
    fn make_chain(n: usize) -> NetworkGraph {
        let mut g = NetworkGraph::new(GraphMode::Undirected);
        let names: Vec<String> = (0..n).map(|i| format!("node_{}", i)).collect();
        for name in &names {
            g.add_node(name.clone());
        }
        for i in 0..n - 1 {
            g.add_edge(&names[i], &names[i + 1]);
        }
        g
    }

    /// Build two disjoint undirected triangles.
    fn make_two_triangles() -> NetworkGraph {
        let mut g = NetworkGraph::new(GraphMode::Undirected);
        for id in ["a", "b", "c", "x", "y", "z"] {
            g.add_node(id);
        }
        for (u, v) in [("a", "b"), ("b", "c"), ("c", "a"), ("x", "y"), ("y", "z"), ("z", "x")] {
            g.add_edge(u, v);
        }
        g
    }

    // --- Components ---

    #[test]
    fn test_components_two_disjoint_triangles() {
        let g = make_two_triangles();
        let summary = connected_components(&g);
        assert_eq!(summary.num_components, 2);
        assert_eq!(summary.component_sizes, vec![3, 3]);
        assert_eq!(summary.largest_component_size, 3);
        assert!((summary.avg_component_size - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_components_single_chain() {
        let g = make_chain(5);
        let summary = connected_components(&g);
        assert_eq!(summary.num_components, 1);
        assert_eq!(summary.largest_component_size, 5);
    }

    #[test]
    fn test_components_empty_graph() {
        let g = NetworkGraph::new(GraphMode::Undirected);
        let summary = connected_components(&g);
        assert_eq!(summary.num_components, 0);
        assert_eq!(summary.largest_component_size, 0);
        assert!(summary.component_sizes.is_empty());
        assert_eq!(summary.avg_component_size, 0.0);
    }

    #[test]
    fn test_components_directed_uses_scc() {
        // a → b → c → a is one SCC; d → a leaves d as its own SCC
        let mut g = NetworkGraph::new(GraphMode::Directed);
        for id in ["a", "b", "c", "d"] {
            g.add_node(id);
        }
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("c", "a");
        g.add_edge("d", "a");

        let summary = connected_components(&g);
        assert_eq!(summary.num_components, 2);
        assert_eq!(summary.component_sizes, vec![3, 1]);
        assert_eq!(summary.largest_component_size, 3);
        assert!((summary.avg_component_size - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_components_directed_chain_all_singletons() {
        let mut g = NetworkGraph::new(GraphMode::Directed);
        for id in ["a", "b", "c"] {
            g.add_node(id);
        }
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        let summary = connected_components(&g);
        assert_eq!(summary.num_components, 3);
        assert_eq!(summary.largest_component_size, 1);
    }

    // --- Diameter / radius ---

    #[test]
    fn test_chain_diameter_and_radius() {
        let g = make_chain(5);
        assert_eq!(diameter(&g), 4);
        assert_eq!(radius(&g).unwrap(), 2);
    }

    #[test]
    fn test_triangle_diameter_and_radius() {
        let mut g = NetworkGraph::new(GraphMode::Undirected);
        for id in ["a", "b", "c"] {
            g.add_node(id);
        }
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("c", "a");
        assert_eq!(diameter(&g), 1);
        assert_eq!(radius(&g).unwrap(), 1);
    }

    #[test]
    fn test_disconnected_uses_largest_component() {
        // Chain of 4 plus an isolated pair: largest component is the chain
        let mut g = make_chain(4);
        g.add_node("p");
        g.add_node("q");
        g.add_edge("p", "q");
        assert_eq!(diameter(&g), 3);
        assert_eq!(radius(&g).unwrap(), 2);
    }

    #[test]
    fn test_directed_diameter_on_undirected_projection() {
        // a → b → c: undirected projection is a chain of 3
        let mut g = NetworkGraph::new(GraphMode::Directed);
        for id in ["a", "b", "c"] {
            g.add_node(id);
        }
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        assert_eq!(diameter(&g), 2);
        assert_eq!(radius(&g).unwrap(), 1);
    }

    #[test]
    fn test_single_node_diameter_radius_zero() {
        let mut g = NetworkGraph::new(GraphMode::Undirected);
        g.add_node("only");
        assert_eq!(diameter(&g), 0);
        assert_eq!(radius(&g).unwrap(), 0);
    }

    #[test]
    fn test_empty_graph_radius_fails_soft() {
        let g = NetworkGraph::new(GraphMode::Undirected);
        assert_eq!(diameter(&g), 0);
        assert_eq!(radius(&g), Err(MetricsError::EmptyGraph));
    }

    #[test]
    fn test_diameter_idempotent() {
        let g = make_chain(7);
        assert_eq!(diameter(&g), diameter(&g));
        assert_eq!(radius(&g).unwrap(), radius(&g).unwrap());
    }
}
