//! Trial Log Parser
//!
//! Converts the plain-text logs of the search-and-rescue drone simulation
//! into tables with one row per trial or per turn, ready for statistical
//! analysis.

pub mod aggregator;
pub mod analytics;
pub mod config;
pub mod error;
pub mod parser;
pub mod utils;

pub use aggregator::{aggregate, Aggregator, Segment, Table};
pub use config::ParserConfig;
pub use error::{ParseError, ParseResult};
pub use parser::{parse_file, Record, Schema};
