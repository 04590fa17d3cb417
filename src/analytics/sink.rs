//! CSV persistence for aggregated tables

use crate::aggregator::Table;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of timestamp-named output files
const TIMESTAMP_PREFIX: &str = "parser";

/// How the output file is named
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum OutputName {
    /// Caller-given file name, `.csv` appended when missing
    Explicit(String),
    /// `parser_<YYYYmmddHHMMSS>.csv`
    #[default]
    Timestamp,
    /// Scenario-bearing part of the first input's file name
    FromInput,
}

/// Writes tables as CSV files into an output directory
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Ensure the output directory exists
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })
    }

    /// Full path the table would be written to
    pub fn resolve_path(&self, name: &OutputName, sources: &[PathBuf]) -> PathBuf {
        let file_name = match name {
            OutputName::Explicit(name) => with_csv_extension(name),
            OutputName::FromInput => match sources.first() {
                Some(source) => with_csv_extension(&input_stem(source)),
                None => timestamp_name(),
            },
            OutputName::Timestamp => timestamp_name(),
        };
        self.output_dir.join(file_name)
    }

    /// Write the table and return the path written
    pub fn save(&self, table: &Table, name: &OutputName) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.resolve_path(name, &table.sources);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        write_table(table, file)
            .with_context(|| format!("Failed to write output file {}", path.display()))?;

        info!("Table saved to: {} ({} rows)", path.display(), table.len());
        Ok(path)
    }
}

/// Serialize a table as CSV: header row, then one row per record, no index
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(table.schema.columns())
        .context("Failed to write header row")?;
    for record in &table.records {
        csv.write_record(record.to_row(table.schema))
            .with_context(|| format!("Failed to write row for trial {}", record.trial))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn timestamp_name() -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    format!("{}_{}.csv", TIMESTAMP_PREFIX, timestamp)
}

fn with_csv_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".csv") {
        name.to_string()
    } else {
        format!("{}.csv", name)
    }
}

/// File stem up to the first all-digit `_` segment.
///
/// `RescueLong_1_20221019.log` names the `RescueLong` batch.
fn input_stem(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let kept: Vec<&str> = stem
        .split('_')
        .take_while(|segment| segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()))
        .collect();

    match kept.join("_") {
        joined if joined.is_empty() => stem,
        joined => joined,
    }
}
