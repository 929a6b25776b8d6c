//! Per-node cardinality estimation
//!
//! Three derived metrics per plan node: input cardinality (rows flowing
//! into the operator), output cardinality (rows it produced) and base
//! cardinality (total rows of every table the query text references).
//! Row counts for named tables come through the [`RowCounter`] capability,
//! and any failed lookup degrades to the sentinel `-1` instead of aborting
//! the traversal.

use crate::plan::PlanNode;
use crate::tables::extract_table_names;
use thiserror::Error;
use tracing::debug;

/// A failed row-count lookup. Operational, always recovered locally.
#[derive(Error, Debug)]
#[error("row count for \"{table}\" failed: {reason}")]
pub struct RowCountError {
    pub table: String,
    pub reason: String,
}

/// Capability to count the rows of a named table.
///
/// Backed by a live database session in production; tests use an in-memory
/// map. Calls are issued strictly sequentially, one at a time, because the
/// underlying connection is not safe for concurrent use.
pub trait RowCounter {
    fn count_rows(&mut self, table: &str) -> std::result::Result<i64, RowCountError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cardinalities {
    /// Rows flowing into the node; sentinel -1 when undeterminable.
    pub input: i64,
    /// The node's measured output rows; stays absent when unprofiled.
    pub output: Option<i64>,
    /// Accumulated row count over every table referenced by the query text,
    /// with -1 contributed per failed lookup. May be negative.
    pub base: i64,
}

/// Computes the three cardinality metrics for one plan node.
///
/// Input cardinality: with children it is the sum of their actual row
/// counts (absent counts as 0 for the sum); a leaf with a relation name is
/// counted through `counter`, falling back to -1; a leaf without one is -1
/// outright, no lookup attempted.
///
/// Base cardinality scans the whole query text, not the node's own scope,
/// so every node of a plan reports the same value.
pub fn estimate(node: &PlanNode, query: &str, counter: &mut dyn RowCounter) -> Cardinalities {
    let input = if !node.is_leaf() {
        node.children
            .iter()
            .map(|child| child.actual_rows.unwrap_or(0))
            .sum()
    } else if let Some(relation) = &node.relation_name {
        count_or_sentinel(counter, relation)
    } else {
        -1
    };

    let output = node.actual_rows;

    let mut base = 0i64;
    for table in extract_table_names(query) {
        base += count_or_sentinel(counter, &table);
    }

    Cardinalities { input, output, base }
}

fn count_or_sentinel(counter: &mut dyn RowCounter, table: &str) -> i64 {
    match counter.count_rows(table) {
        Ok(count) => count,
        Err(e) => {
            debug!("{}, using sentinel -1", e);
            -1
        }
    }
}
