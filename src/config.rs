//! Parser configuration

use crate::analytics::OutputName;
use crate::parser::Schema;
use crate::utils::DEFAULT_BATCH_WIDTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Output schema variant
    pub schema: Schema,

    /// Directory CSV tables are written to
    pub output_dir: String,

    /// How the CSV file is named
    pub output_name: OutputName,

    /// Sibling logs a `_1_` template path expands into
    pub batch_width: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            schema: Schema::Full,
            output_dir: "logs".to_string(),
            output_name: OutputName::Timestamp,
            batch_width: DEFAULT_BATCH_WIDTH,
        }
    }
}

impl ParserConfig {
    /// One row per trial, victims counted from rescues
    pub fn legacy() -> Self {
        Self {
            schema: Schema::Trials,
            ..Default::default()
        }
    }

    /// One row per turn with score, victims counted from rescues
    pub fn turns() -> Self {
        Self {
            schema: Schema::Turns,
            ..Default::default()
        }
    }

    /// Preset matching a schema chosen on the command line
    pub fn for_schema(schema: Schema) -> Self {
        match schema {
            Schema::Trials => Self::legacy(),
            Schema::Turns => Self::turns(),
            Schema::Full => Self::default(),
        }
    }

    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
