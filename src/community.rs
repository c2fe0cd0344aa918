//! Community detection.
//!
//! Three interchangeable strategies behind one entry point, selected by
//! [`CommunityAlgorithm`]:
//!
//! - **Louvain** — greedy local modularity-gain moves plus hierarchical
//!   aggregation of communities into super-nodes, repeated until no gain
//! - **Greedy modularity** — iteratively merges the community pair with the
//!   largest modularity increase while a positive-gain merge exists
//! - **Label propagation** — majority-neighbor label adoption iterated to
//!   convergence, ties broken by the lowest label
//!
//! All strategies run on the undirected projection, return contiguous labels
//! starting at 0, and share the modularity scorer
//! `Q = Σ_c [ L_c/m − (d_c/2m)² ]`.

use std::collections::{BTreeMap, HashMap};

use crate::models::{CommunityAlgorithm, CommunitySummary, MetricsConfig, NetworkGraph};

// ============================================================================
// Entry point
// ============================================================================

/// Partition the graph into communities with the selected strategy.
///
/// Returns the community count, the modularity of the resulting partition,
/// and the node → label assignment. An empty graph yields the explicit
/// "unavailable" result; an edgeless graph yields one singleton community per
/// node with modularity 0.0.
pub fn detect_communities(
    graph: &NetworkGraph,
    algorithm: CommunityAlgorithm,
    config: &MetricsConfig,
) -> CommunitySummary {
    let adj = graph.undirected_neighbor_lists();
    let n = adj.len();
    if n == 0 {
        return CommunitySummary::unavailable();
    }

    let m: usize = adj.iter().map(|l| l.len()).sum::<usize>() / 2;
    let labels: Vec<u32> = if m == 0 {
        // No edges: each node is its own community
        (0..n as u32).collect()
    } else {
        match algorithm {
            CommunityAlgorithm::Louvain => louvain(
                &adj,
                config.louvain_resolution,
                config.community_max_iterations,
            ),
            CommunityAlgorithm::GreedyModularity => greedy_modularity(&adj, m),
            CommunityAlgorithm::LabelPropagation => {
                label_propagation(&adj, config.community_max_iterations)
            }
        }
    };

    let (labels, num_communities) = renumber(labels);
    let modularity = modularity_score(&adj, &labels);

    let partition: HashMap<String, u32> = graph
        .graph
        .node_indices()
        .map(|idx| (graph.node_id(idx).to_string(), labels[idx.index()]))
        .collect();

    CommunitySummary {
        num_communities,
        modularity,
        partition,
    }
}

// ============================================================================
// Modularity
// ============================================================================

/// Modularity `Q = Σ_c [ L_c/m − (d_c/2m)² ]` of a label assignment over the
/// undirected adjacency lists, where `L_c` is the edge count within
/// community `c` and `d_c` the sum of its members' degrees.
pub(crate) fn modularity_score(adj: &[Vec<usize>], labels: &[u32]) -> f64 {
    let two_m: f64 = adj.iter().map(|l| l.len() as f64).sum();
    if two_m == 0.0 {
        return 0.0;
    }
    let m = two_m / 2.0;

    let mut internal_edges: HashMap<u32, f64> = HashMap::new();
    let mut degree_sums: HashMap<u32, f64> = HashMap::new();

    for (i, neighbors) in adj.iter().enumerate() {
        let ci = labels[i];
        *degree_sums.entry(ci).or_default() += neighbors.len() as f64;
        for &j in neighbors {
            if labels[j] == ci {
                // Each internal edge appears twice in the adjacency lists
                *internal_edges.entry(ci).or_default() += 0.5;
            }
        }
    }

    degree_sums
        .iter()
        .map(|(c, &d)| {
            let l = internal_edges.get(c).copied().unwrap_or(0.0);
            l / m - (d / two_m) * (d / two_m)
        })
        .sum()
}

/// Renumber labels to be contiguous from 0 in first-seen order.
/// Returns the new labels and the community count.
fn renumber(mut labels: Vec<u32>) -> (Vec<u32>, usize) {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut next_id = 0u32;
    for label in &mut labels {
        let new_id = *remap.entry(*label).or_insert_with(|| {
            let id = next_id;
            next_id += 1;
            id
        });
        *label = new_id;
    }
    (labels, next_id as usize)
}

// ============================================================================
// Louvain
// ============================================================================

/// One level of the Louvain hierarchy: weighted adjacency (both directions),
/// self-loop weight per node, and the total edge weight.
struct Level {
    adj: Vec<Vec<(usize, f64)>>,
    self_weight: Vec<f64>,
    total_weight: f64,
}

impl Level {
    fn from_unweighted(adj: &[Vec<usize>]) -> Self {
        let weighted: Vec<Vec<(usize, f64)>> = adj
            .iter()
            .map(|l| l.iter().map(|&j| (j, 1.0)).collect())
            .collect();
        let total_weight = adj.iter().map(|l| l.len() as f64).sum::<f64>() / 2.0;
        Self {
            self_weight: vec![0.0; adj.len()],
            adj: weighted,
            total_weight,
        }
    }

    fn node_count(&self) -> usize {
        self.adj.len()
    }
}

/// Greedy local-move phase: sweep nodes in order, moving each to the
/// neighboring community with the best positive modularity gain, until a
/// full sweep moves nothing. Returns the community assignment and whether
/// any node moved.
fn local_move_phase(level: &Level, resolution: f64, max_sweeps: usize) -> (Vec<usize>, bool) {
    let n = level.node_count();
    let mut community: Vec<usize> = (0..n).collect();
    if level.total_weight == 0.0 {
        return (community, false);
    }

    // Node strength: weighted degree, self-loops counting twice
    let strengths: Vec<f64> = (0..n)
        .map(|i| {
            2.0 * level.self_weight[i] + level.adj[i].iter().map(|&(_, w)| w).sum::<f64>()
        })
        .collect();

    let mut comm_total: Vec<f64> = strengths.clone();
    let m2 = 2.0 * level.total_weight;
    let mut improved = false;

    for _ in 0..max_sweeps {
        let mut moved = false;

        for node in 0..n {
            let current = community[node];
            let ki = strengths[node];

            // Sum of weights to each neighboring community
            let mut comm_weights: HashMap<usize, f64> = HashMap::new();
            for &(neighbor, w) in &level.adj[node] {
                *comm_weights.entry(community[neighbor]).or_default() += w;
            }

            let w_current = comm_weights.get(&current).copied().unwrap_or(0.0);
            let remove_cost =
                w_current / m2 - resolution * ki * (comm_total[current] - ki) / (m2 * m2);

            let mut best_comm = current;
            let mut best_gain = 0.0;
            for (&target, &w_target) in &comm_weights {
                if target == current {
                    continue;
                }
                let insert_cost =
                    w_target / m2 - resolution * ki * comm_total[target] / (m2 * m2);
                let gain = insert_cost - remove_cost;
                if gain > best_gain {
                    best_gain = gain;
                    best_comm = target;
                }
            }

            if best_comm != current {
                comm_total[current] -= ki;
                comm_total[best_comm] += ki;
                community[node] = best_comm;
                moved = true;
                improved = true;
            }
        }

        if !moved {
            break;
        }
    }

    (community, improved)
}

/// Collapse each community into a super-node. Intra-community weight becomes
/// self-loop weight; inter-community weights merge into single edges.
fn aggregate(level: &Level, labels: &[usize], num_communities: usize) -> Level {
    let mut self_weight = vec![0.0; num_communities];
    let mut between: HashMap<(usize, usize), f64> = HashMap::new();

    for i in 0..level.node_count() {
        let ci = labels[i];
        self_weight[ci] += level.self_weight[i];
        for &(j, w) in &level.adj[i] {
            if j <= i {
                continue; // each undirected edge once
            }
            let cj = labels[j];
            if ci == cj {
                self_weight[ci] += w;
            } else {
                *between.entry((ci.min(cj), ci.max(cj))).or_default() += w;
            }
        }
    }

    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); num_communities];
    for (&(a, b), &w) in &between {
        adj[a].push((b, w));
        adj[b].push((a, w));
    }

    Level {
        adj,
        self_weight,
        total_weight: level.total_weight,
    }
}

/// Louvain method: local moves plus hierarchical aggregation, producing one
/// flat partition of the original nodes.
fn louvain(adj: &[Vec<usize>], resolution: f64, max_sweeps: usize) -> Vec<u32> {
    let n = adj.len();
    let mut flat: Vec<usize> = (0..n).collect();
    let mut level = Level::from_unweighted(adj);

    loop {
        let (assignment, improved) = local_move_phase(&level, resolution, max_sweeps);
        if !improved {
            break;
        }

        // Renumber level assignment to contiguous super-node ids
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let mut compact: Vec<usize> = Vec::with_capacity(assignment.len());
        for &c in &assignment {
            let next = remap.len();
            compact.push(*remap.entry(c).or_insert(next));
        }
        let num_communities = remap.len();

        for f in flat.iter_mut() {
            *f = compact[*f];
        }

        if num_communities == level.node_count() {
            break; // no reduction, nothing left to aggregate
        }
        level = aggregate(&level, &compact, num_communities);
    }

    flat.into_iter().map(|c| c as u32).collect()
}

// ============================================================================
// Greedy modularity (iterative best-pair merging)
// ============================================================================

/// Merge the community pair with the largest modularity gain
/// `ΔQ = L_ab/m − d_a·d_b/(2m²)` until no positive-gain merge remains.
/// Ties break toward the lowest community-id pair.
fn greedy_modularity(adj: &[Vec<usize>], m: usize) -> Vec<u32> {
    let n = adj.len();
    let m_f = m as f64;
    let mut labels: Vec<usize> = (0..n).collect();
    let mut degree_sums: Vec<f64> = adj.iter().map(|l| l.len() as f64).collect();

    // Edge weight between community pairs, keyed (low, high).
    // BTreeMap iteration keeps the merge order deterministic.
    let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for (i, neighbors) in adj.iter().enumerate() {
        for &j in neighbors {
            if j > i {
                *between.entry((i, j)).or_default() += 1.0;
            }
        }
    }

    loop {
        let mut best: Option<(f64, (usize, usize))> = None;
        for (&pair, &w) in &between {
            let (a, b) = pair;
            let gain = w / m_f - degree_sums[a] * degree_sums[b] / (2.0 * m_f * m_f);
            if best.map_or(true, |(bg, _)| gain > bg) {
                best = Some((gain, pair));
            }
        }

        let Some((gain, (a, b))) = best else {
            break;
        };
        if gain <= 0.0 {
            break;
        }

        // Merge b into a
        degree_sums[a] += degree_sums[b];
        degree_sums[b] = 0.0;
        for label in labels.iter_mut() {
            if *label == b {
                *label = a;
            }
        }

        let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for ((x, y), w) in between {
            let x = if x == b { a } else { x };
            let y = if y == b { a } else { y };
            if x == y {
                continue; // now internal to the merged community
            }
            *merged.entry((x.min(y), x.max(y))).or_default() += w;
        }
        between = merged;
    }

    labels.into_iter().map(|c| c as u32).collect()
}

// ============================================================================
// Label propagation
// ============================================================================

/// Each node adopts the most frequent label among its neighbors, sweeping in
/// node order until a full sweep changes nothing. Ties break toward the
/// lowest label, which keeps the result deterministic.
fn label_propagation(adj: &[Vec<usize>], max_sweeps: usize) -> Vec<u32> {
    let n = adj.len();
    let mut labels: Vec<u32> = (0..n as u32).collect();

    for _ in 0..max_sweeps {
        let mut changed = false;

        for node in 0..n {
            if adj[node].is_empty() {
                continue;
            }

            let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
            for &neighbor in &adj[node] {
                *counts.entry(labels[neighbor]).or_default() += 1;
            }

            // Ascending label order: on equal counts the lowest label wins
            let mut best_label = labels[node];
            let mut best_count = 0usize;
            for (&label, &count) in &counts {
                if count > best_count {
                    best_count = count;
                    best_label = label;
                }
            }

            if labels[node] != best_label {
                labels[node] = best_label;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    labels
}

// ============================================================================
// Tests
// ============================================================================
