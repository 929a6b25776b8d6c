//! Plan tree flattening
//!
//! Walks a profiled plan depth-first, pre-order, and lazily yields one
//! [`FeatureRecord`] per node. Lineage context travels by value in explicit
//! stack frames, so sibling branches never share mutable counters, and a
//! record is handed to the consumer before its children are visited. The
//! iterator is finite, single-pass and not restartable.

use crate::cardinality::{estimate, RowCounter};
use crate::plan::PlanNode;
use crate::record::{FeatureRecord, ROOT_PARENT};

/// Lineage context for one pending node visit.
struct Frame<'p> {
    node: &'p PlanNode,
    level: u32,
    parent: String,
    position: u32,
}

pub struct FlattenIter<'a> {
    stack: Vec<Frame<'a>>,
    query_index: u64,
    query: &'a str,
    counter: &'a mut dyn RowCounter,
}

/// Flattens `root` into a lazy pre-order stream of feature records.
///
/// Row-count failures inside the traversal degrade to sentinels and never
/// escape the iterator; a record is never mutated after being yielded.
pub fn flatten<'a>(
    root: &'a PlanNode,
    query_index: u64,
    query: &'a str,
    counter: &'a mut dyn RowCounter,
) -> FlattenIter<'a> {
    FlattenIter {
        stack: vec![Frame {
            node: root,
            level: 1,
            parent: ROOT_PARENT.to_string(),
            position: 1,
        }],
        query_index,
        query,
        counter,
    }
}

impl<'a> Iterator for FlattenIter<'a> {
    type Item = FeatureRecord;

    fn next(&mut self) -> Option<FeatureRecord> {
        let frame = self.stack.pop()?;
        let node = frame.node;
        let lineage = format!("{}.{}", frame.level, frame.position);

        let cards = estimate(node, self.query, self.counter);

        // Children in original order: reversed on the stack so the first
        // child is visited next.
        for (i, child) in node.children.iter().enumerate().rev() {
            self.stack.push(Frame {
                node: child,
                level: frame.level + 1,
                parent: lineage.clone(),
                position: (i + 1) as u32,
            });
        }

        Some(FeatureRecord {
            query_index: self.query_index,
            query: if frame.level == 1 {
                self.query.to_string()
            } else {
                String::new()
            },
            level_no: lineage,
            parent_level: frame.parent,
            node_type: node.node_type.clone(),
            parallel_aware: node.parallel_aware,
            startup_cost_ms: node.startup_cost,
            total_cost_ms: node.total_cost,
            plan_rows: node.plan_rows,
            plan_width: node.plan_width,
            actual_startup_time_ms: node.actual_startup_time,
            actual_total_time_ms: node.actual_total_time,
            input_cardinality_rows: cards.input,
            output_cardinality_rows: cards.output,
            base_cardinality_rows: cards.base,
            loops: node.actual_loops.unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cardinality::tests::FakeCounter;
    use serde_json::json;

    fn plan(value: serde_json::Value) -> PlanNode {
        serde_json::from_value(value).unwrap()
    }

    fn two_leaf_join() -> PlanNode {
        plan(json!({
            "Node Type": "Nested Loop",
            "Actual Rows": 5,
            "Actual Loops": 1,
            "Plans": [
                { "Node Type": "Seq Scan", "Relation Name": "x", "Actual Rows": 10 },
                { "Node Type": "Seq Scan", "Relation Name": "y", "Actual Rows": 20 }
            ]
        }))
    }

    #[test]
    fn test_lineage_and_cardinalities() {
        let root = two_leaf_join();
        // y's count fails, x's succeeds
        let mut counter = FakeCounter::new(&[("x", 100)]);
        let records: Vec<FeatureRecord> = flatten(&root, 1, "", &mut counter).collect();

        assert_eq!(records.len(), 3);

        assert_eq!(records[0].level_no, "1.1");
        assert_eq!(records[0].parent_level, "-1");
        assert_eq!(records[0].input_cardinality_rows, 30);

        assert_eq!(records[1].level_no, "2.1");
        assert_eq!(records[1].parent_level, "1.1");
        assert_eq!(records[1].input_cardinality_rows, 100);

        assert_eq!(records[2].level_no, "2.2");
        assert_eq!(records[2].parent_level, "1.1");
        assert_eq!(records[2].input_cardinality_rows, -1);
    }

    #[test]
    fn test_query_text_only_on_root() {
        let root = two_leaf_join();
        let mut counter = FakeCounter::new(&[]);
        let query = "SELECT * FROM x, y";
        let records: Vec<FeatureRecord> = flatten(&root, 3, query, &mut counter).collect();

        assert_eq!(records[0].query, query);
        assert!(records[1].query.is_empty());
        assert!(records[2].query.is_empty());
        assert!(records.iter().all(|r| r.query_index == 3));
    }

    #[test]
    fn test_preorder_emission() {
        let root = plan(json!({
            "Node Type": "Sort",
            "Plans": [{
                "Node Type": "Hash Join",
                "Plans": [
                    { "Node Type": "Seq Scan", "Relation Name": "a" },
                    {
                        "Node Type": "Hash",
                        "Plans": [{ "Node Type": "Seq Scan", "Relation Name": "b" }]
                    }
                ]
            }]
        }));
        let mut counter = FakeCounter::new(&[]);
        let types: Vec<String> = flatten(&root, 1, "", &mut counter)
            .map(|r| r.node_type)
            .collect();

        assert_eq!(types, vec!["Sort", "Hash Join", "Seq Scan", "Hash", "Seq Scan"]);
    }

    #[test]
    fn test_sibling_positions_reset_per_parent() {
        let root = plan(json!({
            "Node Type": "Append",
            "Plans": [
                {
                    "Node Type": "Nested Loop",
                    "Plans": [
                        { "Node Type": "Seq Scan", "Relation Name": "a" },
                        { "Node Type": "Seq Scan", "Relation Name": "b" }
                    ]
                },
                {
                    "Node Type": "Nested Loop",
                    "Plans": [
                        { "Node Type": "Seq Scan", "Relation Name": "c" },
                        { "Node Type": "Seq Scan", "Relation Name": "d" }
                    ]
                }
            ]
        }));
        let mut counter = FakeCounter::new(&[]);
        let records: Vec<FeatureRecord> = flatten(&root, 1, "", &mut counter).collect();

        let lineages: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.level_no.as_str(), r.parent_level.as_str()))
            .collect();
        assert_eq!(
            lineages,
            vec![
                ("1.1", "-1"),
                ("2.1", "1.1"),
                ("3.1", "2.1"),
                ("3.2", "2.1"),
                ("2.2", "1.1"),
                ("3.1", "2.2"),
                ("3.2", "2.2"),
            ]
        );

        // level_no repeats across parents; (level_no, parent_level) does not
        let mut pairs = lineages.clone();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), records.len());
    }

    #[test]
    fn test_loop_defaults_to_one() {
        let root = plan(json!({ "Node Type": "Result" }));
        let mut counter = FakeCounter::new(&[]);
        let records: Vec<FeatureRecord> = flatten(&root, 1, "", &mut counter).collect();
        assert_eq!(records[0].loops, 1);
    }
}
