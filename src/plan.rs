//! Plan node model
//!
//! Deserializes the node structure produced by PostgreSQL's
//! `EXPLAIN (ANALYZE, FORMAT JSON)`. Only the fields the feature schema
//! needs are modeled; anything else in the plan JSON is ignored. The
//! `Actual *` fields are present only when the query was profiled, so they
//! stay optional here and defaults are applied at record-building time.

use serde::Deserialize;

/// One operator node of a profiled execution plan.
///
/// `node_type` is required: a plan without it means the upstream plan
/// format changed, and deserialization fails for the whole query instead
/// of papering over it with placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanNode {
    #[serde(rename = "Node Type")]
    pub node_type: String,

    #[serde(rename = "Relation Name", default)]
    pub relation_name: Option<String>,

    #[serde(rename = "Parallel Aware", default)]
    pub parallel_aware: Option<bool>,

    #[serde(rename = "Startup Cost", default)]
    pub startup_cost: Option<f64>,

    #[serde(rename = "Total Cost", default)]
    pub total_cost: Option<f64>,

    #[serde(rename = "Plan Rows", default)]
    pub plan_rows: Option<i64>,

    #[serde(rename = "Plan Width", default)]
    pub plan_width: Option<i64>,

    #[serde(rename = "Actual Startup Time", default)]
    pub actual_startup_time: Option<f64>,

    #[serde(rename = "Actual Total Time", default)]
    pub actual_total_time: Option<f64>,

    #[serde(rename = "Actual Rows", default)]
    pub actual_rows: Option<i64>,

    #[serde(rename = "Actual Loops", default)]
    pub actual_loops: Option<i64>,

    #[serde(rename = "Plans", default)]
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
