//! Batch driver
//!
//! Reads the semicolon-delimited query batch, profiles each query and
//! streams the flattened feature records to the CSV file. A query that
//! fails to profile (or whose plan does not deserialize) is logged, written
//! to the error-log file and skipped; it contributes no records and the
//! batch keeps going.

use crate::cardinality::RowCounter;
use crate::config::Config;
use crate::error::Result;
use crate::flatten::flatten;
use crate::plan::PlanNode;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Capability to profile a query and hand back its plan root.
///
/// The database implements this; tests inject a canned source, the same
/// way row counting is injected through [`RowCounter`].
pub trait PlanSource {
    fn fetch_plan(&mut self, query: &str) -> Result<PlanNode>;
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub queries: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub records: usize,
}

/// Splits the batch file on `;`, trimming each statement and dropping
/// empty ones.
pub fn load_queries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .split(';')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .collect())
}

pub fn run<S>(config: &Config, db: &mut S) -> Result<RunSummary>
where
    S: PlanSource + RowCounter,
{
    let queries = load_queries(&config.files.queries)?;
    info!(
        "✅ Loaded {} queries from {}",
        queries.len(),
        config.files.queries.display()
    );

    let mut writer = csv::Writer::from_path(&config.files.csv)?;
    let mut error_file = File::create(&config.files.error_log)?;

    let mut summary = RunSummary {
        queries: queries.len(),
        ..RunSummary::default()
    };

    for (i, query) in queries.iter().enumerate() {
        let query_index = (i + 1) as u64;
        info!("▶ Running query {}: {:.80}...", query_index, query);

        match extract_query(db, query_index, query, &mut writer) {
            Ok(records) => {
                summary.succeeded += 1;
                summary.records += records;
            }
            Err(e) => {
                warn!("Query {} failed: {}", query_index, e);
                writeln!(error_file, "Query {} failed: {}", query_index, query)?;
                writeln!(error_file, "Error: {}", e)?;
                writeln!(error_file, "{}", "-".repeat(80))?;
                summary.failed += 1;
            }
        }
    }

    writer.flush()?;
    info!(
        "✅ Extraction completed: {} records from {}/{} queries, results in {}, errors in {}",
        summary.records,
        summary.succeeded,
        summary.queries,
        config.files.csv.display(),
        config.files.error_log.display()
    );
    Ok(summary)
}

/// Profiles one query and writes its record stream. The plan fetch can
/// fail as a whole; individual row-count lookups inside the traversal
/// cannot (they degrade to sentinels).
fn extract_query<S>(
    db: &mut S,
    query_index: u64,
    query: &str,
    writer: &mut csv::Writer<File>,
) -> Result<usize>
where
    S: PlanSource + RowCounter,
{
    let plan = db.fetch_plan(query)?;
    let mut records = 0;
    for record in flatten(&plan, query_index, query, db) {
        writer.serialize(record)?;
        records += 1;
    }
    Ok(records)
}
