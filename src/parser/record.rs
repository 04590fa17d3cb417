//! Output rows and the schema variants that select their columns

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output schema variant.
///
/// Each variant is a superset of the previous one. `Full` is the canonical
/// target; `Trials` and `Turns` reproduce the older table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// One row per trial; victims counted from `Rescued victim` lines
    Trials,
    /// One row per turn advance with score; victims counted from `Rescued victim`
    Turns,
    /// Turn rows with task outcomes and heat; victims deduplicated by id
    #[default]
    Full,
}

const TRIAL_COLUMNS: &[&str] = &[
    "Scenario", "Trial", "Seed", "Alpha", "Beta", "Gamma", "Drones", "Victims",
];
const TURN_COLUMNS: &[&str] = &["Turn", "Score"];
const FULL_COLUMNS: &[&str] = &["Successes", "Fails", "Heat"];

impl Schema {
    pub const ALL: [Schema; 3] = [Schema::Trials, Schema::Turns, Schema::Full];

    /// Column names written by the sink, in order
    pub fn columns(self) -> Vec<&'static str> {
        let mut columns = TRIAL_COLUMNS.to_vec();
        if self.emits_turns() {
            columns.extend_from_slice(TURN_COLUMNS);
        }
        if self == Schema::Full {
            columns.extend_from_slice(FULL_COLUMNS);
        }
        columns
    }

    /// Whether a turn advance closes a row
    pub fn emits_turns(self) -> bool {
        self != Schema::Trials
    }

    /// Whether victims are tracked as distinct detected identifiers
    pub fn dedups_victims(self) -> bool {
        self == Schema::Full
    }

    pub fn name(self) -> &'static str {
        match self {
            Schema::Trials => "trials",
            Schema::Turns => "turns",
            Schema::Full => "full",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schema::ALL
            .into_iter()
            .find(|schema| schema.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown schema '{}' (expected trials, turns or full)", s))
    }
}

/// Snapshot of a trial at the moment a boundary was crossed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Scenario name taken from the log's file name
    pub scenario: String,
    /// Trial number, offset so it is unique across the processed files
    pub trial: u32,
    pub seed: i64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Drones that reported done so far in this trial
    pub drones: u32,
    /// Victim cardinality (count or distinct ids, per schema)
    pub victims: u32,
    /// Turn the snapshot belongs to; the turn that was just left on a boundary
    pub turn: f64,
    pub successes: u32,
    pub fails: u32,
    pub score: f64,
    pub heat: f64,
}

impl Record {
    /// Field values in the same order as [`Schema::columns`]
    pub fn to_row(&self, schema: Schema) -> Vec<String> {
        let mut row = vec![
            self.scenario.clone(),
            self.trial.to_string(),
            self.seed.to_string(),
            self.alpha.to_string(),
            self.beta.to_string(),
            self.gamma.to_string(),
            self.drones.to_string(),
            self.victims.to_string(),
        ];
        if schema.emits_turns() {
            row.push(self.turn.to_string());
            row.push(self.score.to_string());
        }
        if schema == Schema::Full {
            row.push(self.successes.to_string());
            row.push(self.fails.to_string());
            row.push(self.heat.to_string());
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            scenario: "Rescue".to_string(),
            trial: 3,
            seed: 42,
            alpha: 0.5,
            beta: 0.25,
            gamma: 0.0,
            drones: 2,
            victims: 7,
            turn: 12.5,
            successes: 4,
            fails: 1,
            score: 0.75,
            heat: 0.125,
        }
    }

    #[test]
    fn test_schema_columns_are_supersets() {
        let trials = Schema::Trials.columns();
        let turns = Schema::Turns.columns();
        let full = Schema::Full.columns();

        assert_eq!(trials.len(), 8);
        assert_eq!(&turns[..8], &trials[..]);
        assert_eq!(&full[..10], &turns[..]);
        assert_eq!(full.last(), Some(&"Heat"));
    }

    #[test]
    fn test_row_matches_columns() {
        let record = sample();
        for schema in Schema::ALL {
            assert_eq!(record.to_row(schema).len(), schema.columns().len());
        }

        let row = record.to_row(Schema::Full);
        assert_eq!(row[0], "Rescue");
        assert_eq!(row[8], "12.5");
        assert_eq!(row[10], "4");
        assert_eq!(row[12], "0.125");
    }

    #[test]
    fn test_schema_from_str() {
        assert_eq!("TURNS".parse::<Schema>(), Ok(Schema::Turns));
        assert_eq!("full".parse::<Schema>(), Ok(Schema::Full));
        assert!("hourly".parse::<Schema>().is_err());
        assert_eq!(Schema::default(), Schema::Full);
    }
}
