//! PostgreSQL access
//!
//! One connection, used strictly sequentially: the traversal performs its
//! row-count lookups one at a time, so a pool would buy nothing and the
//! shared connection must not be used concurrently. The async sqlx driver
//! is wrapped behind a blocking facade holding a handle to the runtime,
//! which keeps the flattening core synchronous.
//!
//! Statements run in autocommit mode, so a failed `COUNT(*)` or `EXPLAIN`
//! leaves the connection usable without an explicit rollback.

use crate::cardinality::{RowCountError, RowCounter};
use crate::config::PostgresConfig;
use crate::error::{FeatureError, Result};
use crate::plan::PlanNode;
use crate::runner::PlanSource;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tokio::runtime::Handle;
use tracing::debug;

pub struct Database {
    conn: PgConnection,
    handle: Handle,
}

impl Database {
    /// Opens a single connection using the runtime behind `handle` to
    /// drive the async driver.
    pub fn connect(handle: Handle, config: &PostgresConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);
        let conn = handle.block_on(PgConnection::connect_with(&options))?;
        Ok(Self { conn, handle })
    }

    fn count_table_rows(&mut self, table: &str) -> sqlx::Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        debug!("counting rows: {}", sql);
        self.handle
            .block_on(sqlx::query_scalar(&sql).fetch_one(&mut self.conn))
    }
}

impl PlanSource for Database {
    /// Profiles `query` and returns the root node of its execution plan.
    ///
    /// The query actually runs on the server (ANALYZE), which is what makes
    /// the actual-time and actual-rows measurements available.
    fn fetch_plan(&mut self, query: &str) -> Result<PlanNode> {
        let sql = format!("EXPLAIN (ANALYZE, FORMAT JSON) {query}");
        let value: Value = self
            .handle
            .block_on(sqlx::query_scalar(&sql).fetch_one(&mut self.conn))?;
        plan_from_explain(value)
    }
}

impl RowCounter for Database {
    fn count_rows(&mut self, table: &str) -> std::result::Result<i64, RowCountError> {
        self.count_table_rows(table).map_err(|e| RowCountError {
            table: table.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Peels the JSON envelope of `EXPLAIN (FORMAT JSON)`: a one-element array
/// whose entry holds the root under `"Plan"`. A missing `"Plan"` key means
/// the plan format changed and is reported as a per-query error rather
/// than masked.
fn plan_from_explain(value: Value) -> Result<PlanNode> {
    let entry = match value {
        Value::Array(mut items) if !items.is_empty() => items.remove(0),
        other => other,
    };
    let plan = entry
        .get("Plan")
        .cloned()
        .ok_or_else(|| FeatureError::Plan("EXPLAIN output has no \"Plan\" object".to_string()))?;
    Ok(serde_json::from_value(plan)?)
}

/// Double-quotes an identifier for interpolation into a statement,
/// doubling any embedded quote.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("title"), "\"title\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_plan_from_explain_unwraps_array_envelope() {
        let node = plan_from_explain(json!([{
            "Plan": { "Node Type": "Seq Scan", "Relation Name": "title" },
            "Planning Time": 0.2,
            "Execution Time": 310.5
        }]))
        .unwrap();
        assert_eq!(node.node_type, "Seq Scan");
    }

    #[test]
    fn test_plan_from_explain_accepts_bare_object() {
        let node = plan_from_explain(json!({
            "Plan": { "Node Type": "Result" }
        }))
        .unwrap();
        assert_eq!(node.node_type, "Result");
    }

    #[test]
    fn test_missing_plan_key_is_an_error() {
        let err = plan_from_explain(json!([{ "Planning Time": 0.2 }])).unwrap_err();
        assert!(matches!(err, FeatureError::Plan(_)));
    }
}
