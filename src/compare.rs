//! Two-graph comparison.
//!
//! Diffs two completed metrics snapshots: for each scalar metric (density,
//! triangles, diameter, reciprocity, clustering coefficient) it records both
//! values, their arithmetic difference (A − B), and their ratio (A / B, with
//! `+∞` when B is exactly 0 — never a division error). Connected components
//! are compared side by side. The comparator performs no graph traversal and
//! holds no state of its own.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::GraphAnalysis;

/// One scalar metric compared across the two graphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarComparison {
    /// Metric name (e.g. "density").
    pub metric: String,
    pub value_a: f64,
    pub value_b: f64,
    /// `value_a − value_b`.
    pub difference: f64,
    /// `value_a / value_b`; `+∞` when `value_b` is exactly 0.
    pub ratio: f64,
}

/// Connected-components statistics side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentComparison {
    pub num_components_a: usize,
    pub num_components_b: usize,
    pub largest_component_a: usize,
    pub largest_component_b: usize,
}

/// The full comparison between two metrics snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    /// Display name of graph A.
    pub name_a: String,
    /// Display name of graph B.
    pub name_b: String,
    /// Scalar comparisons in the fixed metric order.
    pub metrics: Vec<ScalarComparison>,
    pub connected_components: ComponentComparison,
}

fn scalar(metric: &str, value_a: f64, value_b: f64) -> ScalarComparison {
    ScalarComparison {
        metric: metric.to_string(),
        value_a,
        value_b,
        difference: value_a - value_b,
        ratio: if value_b != 0.0 {
            value_a / value_b
        } else {
            f64::INFINITY
        },
    }
}

/// Compare two completed analyses metric by metric.
pub fn compare(a: &GraphAnalysis, b: &GraphAnalysis) -> ComparisonRecord {
    let ra = &a.record;
    let rb = &b.record;

    let metrics = vec![
        scalar("density", ra.density, rb.density),
        scalar("triangles", ra.triangles as f64, rb.triangles as f64),
        scalar("diameter", ra.diameter as f64, rb.diameter as f64),
        scalar("reciprocity", ra.reciprocity, rb.reciprocity),
        scalar(
            "clustering_coefficient",
            ra.clustering_coefficient,
            rb.clustering_coefficient,
        ),
    ];

    ComparisonRecord {
        name_a: a.name.clone(),
        name_b: b.name.clone(),
        metrics,
        connected_components: ComponentComparison {
            num_components_a: ra.connected_components.num_components,
            num_components_b: rb.connected_components.num_components,
            largest_component_a: ra.connected_components.largest_component_size,
            largest_component_b: rb.connected_components.largest_component_size,
        },
    }
}

impl ComparisonRecord {
    /// Serialize to the JSON mapping consumed by reporting layers, keyed by
    /// metric name with the graphs' display names as value keys.
    ///
    /// JSON has no infinity literal, so a non-finite ratio is emitted as the
    /// string `"inf"`.
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();

        for entry in &self.metrics {
            let ratio = if entry.ratio.is_finite() {
                json!(entry.ratio)
            } else {
                json!("inf")
            };
            let mut inner = Map::new();
            inner.insert(self.name_a.clone(), json!(entry.value_a));
            inner.insert(self.name_b.clone(), json!(entry.value_b));
            inner.insert("difference".to_string(), json!(entry.difference));
            inner.insert("ratio".to_string(), ratio);
            map.insert(entry.metric.clone(), Value::Object(inner));
        }

        let cc = &self.connected_components;
        let mut inner = Map::new();
        inner.insert(
            format!("{}_num_components", self.name_a),
            json!(cc.num_components_a),
        );
        inner.insert(
            format!("{}_num_components", self.name_b),
            json!(cc.num_components_b),
        );
        inner.insert(
            format!("{}_largest_component", self.name_a),
            json!(cc.largest_component_a),
        );
        inner.insert(
            format!("{}_largest_component", self.name_b),
            json!(cc.largest_component_b),
        );
        map.insert("connected_components".to_string(), Value::Object(inner));

        map
    }
}

// ============================================================================
// Tests
// ============================================================================
