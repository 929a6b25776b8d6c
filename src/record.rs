//! Feature record schema
//!
//! The flat output unit, one per plan node. Field declaration order is the
//! CSV column order, so the struct must not be reordered without versioning
//! the output format. Every field is always populated: absent optimizer or
//! profiling values serialize as empty cells, undeterminable counts carry
//! the sentinel -1, and the two together keep downstream consumers from
//! ever seeing a missing column.

use serde::Serialize;

/// One flattened plan node.
///
/// `level_no` is `"<depth>.<sibling position>"`; the sibling position
/// resets under each parent, so records are disambiguated by the
/// `(level_no, parent_level)` pair rather than `level_no` alone. The root
/// carries `level_no = "1.1"` and `parent_level = "-1"`, and is the only
/// record of a query with a non-empty `query` field.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRecord {
    /// 1-based index of the source query within the batch
    pub query_index: u64,
    /// Full query text on the root record, empty otherwise
    pub query: String,
    pub level_no: String,
    pub parent_level: String,
    pub node_type: String,
    pub parallel_aware: Option<bool>,
    pub startup_cost_ms: Option<f64>,
    pub total_cost_ms: Option<f64>,
    pub plan_rows: Option<i64>,
    pub plan_width: Option<i64>,
    pub actual_startup_time_ms: Option<f64>,
    pub actual_total_time_ms: Option<f64>,
    pub input_cardinality_rows: i64,
    pub output_cardinality_rows: Option<i64>,
    pub base_cardinality_rows: i64,
    #[serde(rename = "loop")]
    pub loops: i64,
}

/// Sentinel `parent_level` for the root record of a query.
pub const ROOT_PARENT: &str = "-1";
