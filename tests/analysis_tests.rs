//! End-to-end tests for graph-metrics
//!
//! Builds two graphs the way an external loader would, runs the full
//! analyze-then-compare flow, and checks the serialized outputs.
//! Run with: cargo test --test analysis_tests

use graph_metrics::{
    compare, CommunityAlgorithm, GraphMode, MetricsConfig, MetricsEngine, MetricsRecord,
    NetworkGraph,
};

/// Two 4-cliques joined by a single bridge edge — clear community structure.
fn clustered_graph() -> NetworkGraph {
    let mut g = NetworkGraph::new(GraphMode::Undirected);
    let a: Vec<String> = (0..4).map(|i| format!("a_{}", i)).collect();
    let b: Vec<String> = (0..4).map(|i| format!("b_{}", i)).collect();
    for id in a.iter().chain(b.iter()) {
        g.add_node(id.clone());
    }
    for group in [&a, &b] {
        for i in 0..4 {
            for j in (i + 1)..4 {
                g.add_edge(&group[i], &group[j]);
            }
        }
    }
    g.add_edge(&a[0], &b[0]);
    g
}

/// A sparse directed graph: a hub feeding a chain, with one mutual pair.
fn sparse_directed_graph() -> NetworkGraph {
    let mut g = NetworkGraph::new(GraphMode::Directed);
    for id in ["hub", "n1", "n2", "n3", "n4"] {
        g.add_node(id);
    }
    g.add_edge("hub", "n1");
    g.add_edge("hub", "n2");
    g.add_edge("n1", "n3");
    g.add_edge("n3", "n4");
    g.add_edge("n4", "n3");
    g
}

#[test]
fn test_full_two_graph_comparison_flow() {
    let engine_a = MetricsEngine::new("Graph A");
    let engine_b = MetricsEngine::new("Graph B");

    let analysis_a = engine_a.analyze(&clustered_graph());
    let analysis_b = engine_b.analyze(&sparse_directed_graph());

    // Graph A: dense, clustered, fully connected
    assert_eq!(analysis_a.node_count, 8);
    assert_eq!(analysis_a.edge_count, 13);
    assert!(analysis_a.record.density > analysis_b.record.density);
    assert!(analysis_a.record.triangles >= 8);
    assert_eq!(analysis_a.record.connected_components.num_components, 1);
    assert_eq!(analysis_a.record.reciprocity, 1.0);
    assert_eq!(analysis_a.record.communities.num_communities, 2);
    assert!(analysis_a.record.communities.modularity > 0.0);

    // Graph B: directed, one mutual pair out of five edges
    assert_eq!(analysis_b.node_count, 5);
    assert!((analysis_b.record.reciprocity - 2.0 / 5.0).abs() < 1e-12);
    assert_eq!(analysis_b.record.triangles, 0);

    // Comparison
    let cmp = compare(&analysis_a, &analysis_b);
    assert_eq!(cmp.name_a, "Graph A");
    assert_eq!(cmp.name_b, "Graph B");
    assert_eq!(cmp.metrics.len(), 5);

    // Chain has no triangles: ratio must be exactly +∞
    let triangles = cmp
        .metrics
        .iter()
        .find(|e| e.metric == "triangles")
        .unwrap();
    assert_eq!(triangles.ratio, f64::INFINITY);

    let density = cmp.metrics.iter().find(|e| e.metric == "density").unwrap();
    assert!(density.difference > 0.0);
    assert!(density.ratio > 1.0);

    assert_eq!(cmp.connected_components.num_components_a, 1);
    // Directed graph B: SCCs are {n3, n4} plus three singletons
    assert_eq!(cmp.connected_components.num_components_b, 4);
    assert_eq!(cmp.connected_components.largest_component_b, 2);
}

#[test]
fn test_snapshot_serialization_roundtrip() {
    let analysis = MetricsEngine::new("Graph A").analyze(&clustered_graph());

    let map = analysis.record.to_json_map();
    assert_eq!(map.len(), 11);

    // Scalars survive a serialize → parse cycle bit-identically
    let json = serde_json::to_string_pretty(&map).unwrap();
    let parsed: MetricsRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.density, analysis.record.density);
    assert_eq!(parsed.triangles, analysis.record.triangles);
    assert_eq!(parsed.diameter, analysis.record.diameter);
    assert_eq!(
        parsed.communities.partition,
        analysis.record.communities.partition
    );
    assert_eq!(parsed, analysis.record);

    // Partition keys are the original node IDs
    let communities = map["communities"].as_object().unwrap();
    let partition = communities["partition"].as_object().unwrap();
    assert_eq!(partition.len(), 8);
    assert!(partition.contains_key("a_0"));
}

#[test]
fn test_comparison_serialization_shape() {
    let a = MetricsEngine::new("Graph A").analyze(&clustered_graph());
    let b = MetricsEngine::new("Graph B").analyze(&sparse_directed_graph());

    let map = compare(&a, &b).to_json_map();
    for key in [
        "density",
        "triangles",
        "diameter",
        "reciprocity",
        "clustering_coefficient",
        "connected_components",
    ] {
        assert!(map.contains_key(key), "missing key {key}");
    }

    let reciprocity = map["reciprocity"].as_object().unwrap();
    assert!(reciprocity["Graph A"].is_number());
    assert!(reciprocity["Graph B"].is_number());
    assert!(reciprocity["difference"].is_number());
}

#[test]
fn test_all_community_algorithms_through_engine() {
    for algo in [
        CommunityAlgorithm::Louvain,
        CommunityAlgorithm::GreedyModularity,
        CommunityAlgorithm::LabelPropagation,
    ] {
        let config = MetricsConfig {
            community_algorithm: algo,
            ..MetricsConfig::default()
        };
        let analysis = MetricsEngine::with_config("clustered", config).analyze(&clustered_graph());
        let communities = &analysis.record.communities;

        // Every node appears exactly once in the partition
        assert_eq!(communities.partition.len(), 8, "algorithm {algo}");
        let distinct: std::collections::HashSet<u32> =
            communities.partition.values().copied().collect();
        assert_eq!(
            distinct.len(),
            communities.num_communities,
            "algorithm {algo}"
        );
    }
}

#[test]
fn test_independent_engines_agree() {
    // The same graph analyzed by two engine instances yields the same record
    let g = clustered_graph();
    let first = MetricsEngine::new("X").analyze(&g);
    let second = MetricsEngine::new("Y").analyze(&g);

    assert_eq!(first.record.density, second.record.density);
    assert_eq!(first.record.triangles, second.record.triangles);
    assert_eq!(first.record.diameter, second.record.diameter);
    assert_eq!(first.record.radius, second.record.radius);
    assert_eq!(
        first.record.degree_distribution,
        second.record.degree_distribution
    );
}
