//! Multi-file aggregation
//!
//! Parses each log in order and concatenates the records into one table,
//! carrying the trial offset from each file into the next so trial numbers
//! never collide across files.

use crate::error::ParseResult;
use crate::parser::{self, Record, Schema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Extent of one source file's records within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub records: usize,
    /// Trials the file opened; 0 for a file without a header
    pub trials: u32,
}

/// Ordered records from every processed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: Schema,
    /// Files in processing order
    pub sources: Vec<PathBuf>,
    pub records: Vec<Record>,
    /// One entry per source, in the same order
    pub segments: Vec<Segment>,
    /// Trials found across all files
    pub trials: u32,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            sources: Vec::new(),
            records: Vec::new(),
            segments: Vec::new(),
            trials: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Each source's records together with the trials it opened
    pub fn by_source(&self) -> impl Iterator<Item = (&[Record], u32)> + '_ {
        let mut start = 0;
        self.segments.iter().map(move |segment| {
            let end = start + segment.records;
            let records = self.records.get(start..end).unwrap_or_default();
            start = end;
            (records, segment.trials)
        })
    }
}

/// Parses files one after another into a single table
pub struct Aggregator {
    table: Table,
}

impl Aggregator {
    pub fn new(schema: Schema) -> Self {
        Self {
            table: Table::new(schema),
        }
    }

    /// Trial offset the next file will start from
    pub fn offset(&self) -> u32 {
        self.table.trials
    }

    /// Parse one more file and append its records
    pub fn push_file(&mut self, path: &Path) -> ParseResult<usize> {
        let outcome = parser::parse_file(path, self.table.trials, self.table.schema)?;
        let added = outcome.records.len();

        self.table.segments.push(Segment {
            records: added,
            trials: outcome.next_offset - self.table.trials,
        });
        self.table.records.extend(outcome.records);
        self.table.trials = outcome.next_offset;
        self.table.sources.push(path.to_path_buf());
        Ok(added)
    }

    pub fn finish(self) -> Table {
        self.table
    }
}

/// Parse every path in order into one table
pub fn aggregate<P: AsRef<Path>>(paths: &[P], schema: Schema) -> ParseResult<Table> {
    info!("Aggregating {} file(s) with the {} schema", paths.len(), schema);

    let mut aggregator = Aggregator::new(schema);
    for (i, path) in paths.iter().enumerate() {
        let added = aggregator.push_file(path.as_ref())?;
        info!(
            "Progress: {}/{} files ({} records, {} trials so far)",
            i + 1,
            paths.len(),
            added,
            aggregator.offset()
        );
    }

    let table = aggregator.finish();
    info!("Aggregation complete: {} records, {} trials", table.len(), table.trials);
    Ok(table)
}
