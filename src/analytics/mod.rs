//! Output stages: CSV persistence and text summaries

pub mod sink;
pub mod summary;

pub use sink::{CsvSink, OutputName};
pub use summary::{format_summary, print_summary, SummaryCalculator};
