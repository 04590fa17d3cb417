//! Trial log parser
//!
//! Streams a simulator log line by line, classifies each line and feeds it to
//! the trial state machine, collecting the records it emits.

pub mod header;
pub mod line;
pub mod record;
pub mod state;

pub use line::{classify, Entry, LogLine};
pub use record::{Record, Schema};
pub use state::{ScanContext, TrialState, Victims};

use crate::error::{ParseError, ParseResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Records read from one file and the offset for the next file
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub records: Vec<Record>,
    /// Starting offset plus the trials found in this file
    pub next_offset: u32,
}

/// Scenario name encoded in a log's file name: the text before the first `_`
pub fn scenario_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    file_name
        .split('_')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Parse one log file starting from the given trial offset
pub fn parse_file(path: &Path, offset: u32, schema: Schema) -> ParseResult<FileOutcome> {
    let file = File::open(path).map_err(|e| ParseError::io(path, e))?;
    let outcome = parse_reader(BufReader::new(file), path, offset, schema)?;

    info!(
        "Parsed {}: {} records, trials {}..={}",
        path.display(),
        outcome.records.len(),
        offset + 1,
        outcome.next_offset
    );
    Ok(outcome)
}

/// Parse log content from any buffered reader.
///
/// `path` is used for the scenario name and for error context only.
pub fn parse_reader<R: BufRead>(
    reader: R,
    path: &Path,
    offset: u32,
    schema: Schema,
) -> ParseResult<FileOutcome> {
    let scenario = scenario_name(path);
    let ctx = ScanContext {
        scenario: &scenario,
        offset,
        schema,
    };

    let mut state = TrialState::default();
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let raw = line.map_err(|e| ParseError::read(path, line_no, e))?;
        let entry = classify(&raw).map_err(|e| e.at(path, line_no, raw.trim()))?;

        if let Some(header) = entry.header() {
            debug!(
                "{}:{}: trial {} seed {} ({}, {}, {})",
                path.display(),
                line_no,
                offset + state.trial + 1,
                header.seed,
                header.alpha,
                header.beta,
                header.gamma
            );
        }

        let transition = state.step(entry, &ctx);
        state = transition.state;
        if let Some(record) = transition.emitted {
            debug!("Emitted trial {} turn {}", record.trial, record.turn);
            records.push(record);
        }
    }

    records.push(state.snapshot(&ctx));

    Ok(FileOutcome {
        records,
        next_offset: offset + state.trial,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    fn parse_str(
        content: &str,
        name: &str,
        offset: u32,
        schema: Schema,
    ) -> ParseResult<FileOutcome> {
        parse_reader(Cursor::new(content), Path::new(name), offset, schema)
    }

    #[test]
    fn test_scenario_from_file_name() {
        assert_eq!(scenario_name(Path::new("logs/RescueA_1_20221019.log")), "RescueA");
        assert_eq!(scenario_name(Path::new("Recon.log")), "Recon.log");
        assert_eq!(scenario_name(Path::new("/tmp/x_y/Heat_2_a.log")), "Heat");
    }

    #[test]
    fn test_end_to_end_single_trial() {
        let content = "\
[10/19/2022 -1.0000] Seed 42 - ALPHA 0.5
Drone done
Drone done
";
        let outcome = parse_str(content, "logs/Rescue_1_x.log", 0, Schema::Full).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.next_offset, 1);
        let record = &outcome.records[0];
        assert_eq!(record.scenario, "Rescue");
        assert_eq!(record.trial, 1);
        assert_eq!(record.seed, 42);
        assert_eq!((record.alpha, record.beta, record.gamma), (0.5, 0.0, 0.0));
        assert_eq!(record.drones, 2);
        assert_eq!(record.victims, 0);
    }

    #[test]
    fn test_turn_records_and_final_flush() {
        let content = "\
[10/19/2022 -1.0000] Seed 1 - ALPHA 0.1 - BETA 0.2 - GAMMA 0.3
[10/19/2022 0.0000] Mission begins
[10/19/2022 0.0000] Score: 0.0000
[10/19/2022 1.0000] :: drone_0 :: (1, 1, 0) :: victim_0 :: Detected victim
[10/19/2022 1.0000] Score: 0.2500
[10/19/2022 1.0000] Heat: 0.5000
[10/19/2022 2.0000] :: drone_0 :: (1, 1, 0) :: victim_0 :: Detected victim
[10/19/2022 2.0000] :: drone_0 :: (1, 1, 0) :: Drone done
[10/19/2022 -1.0000] Seed 2 - ALPHA 0.4 - BETA 0.5 - GAMMA 0.6
[10/19/2022 1.0000] :: a :: b :: Succeeds task
";
        let outcome = parse_str(content, "Rescue_1_x.log", 0, Schema::Full).unwrap();
        let turns: Vec<(u32, f64)> = outcome.records.iter().map(|r| (r.trial, r.turn)).collect();

        assert_eq!(turns, vec![(1, 0.0), (1, 1.0), (1, 2.0), (2, 0.0), (2, 1.0)]);
        assert_eq!(outcome.next_offset, 2);

        let closing_turn_one = &outcome.records[1];
        assert_eq!(closing_turn_one.victims, 1);
        assert_eq!(closing_turn_one.score, 0.25);
        assert_eq!(closing_turn_one.heat, 0.5);

        let trial_one_flush = &outcome.records[2];
        assert_eq!(trial_one_flush.victims, 1);
        assert_eq!(trial_one_flush.drones, 1);

        let last = outcome.records.last().unwrap();
        assert_eq!(last.successes, 1);
        assert_eq!(last.gamma, 0.6);
    }

    #[test]
    fn test_records_are_monotonic_within_trial() {
        let mut content = String::from("[d -1.0000] Seed 3\n");
        for turn in [1, 2, 2, 5, 3, 10, 9, 11] {
            content.push_str(&format!("[d {}.0000] Score: 0.{}\n", turn, turn));
        }
        let outcome = parse_str(&content, "S_1.log", 0, Schema::Turns).unwrap();

        let turns: Vec<f64> = outcome.records.iter().map(|r| r.turn).collect();
        assert!(turns.windows(2).all(|w| w[0] <= w[1]), "{:?}", turns);
        assert_eq!(turns, vec![0.0, 1.0, 2.0, 5.0, 10.0, 11.0]);
    }

    #[test]
    fn test_empty_file_still_emits_final_record() {
        let outcome = parse_str("", "Empty_1.log", 5, Schema::Full).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].trial, 5);
        assert_eq!(outcome.next_offset, 5);
    }

    #[test]
    fn test_malformed_header_reports_line() {
        let content = "[d -1.0000] Seed 1\n[d 1.0000] Drone done\n[d -1.0000] Seed x\n";
        let err = parse_str(content, "Bad_1.log", 0, Schema::Full).unwrap_err();

        match err {
            ParseError::MalformedHeader { line_no, line, .. } => {
                assert_eq!(line_no, 3);
                assert_eq!(line, "[d -1.0000] Seed x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_turn_reports_line() {
        let content = "[d -1.0000] Seed 1\n[d later] Drone done\n";
        let err = parse_str(content, "Bad_1.log", 0, Schema::Full).unwrap_err();
        assert!(matches!(err, ParseError::MalformedTurn { line_no: 2, .. }));
    }

    #[test]
    fn test_unreadable_line_reports_line() {
        let mut content = b"[d -1.0000] Seed 1\n".to_vec();
        content.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let err = parse_reader(Cursor::new(content), Path::new("Bad_1.log"), 0, Schema::Full)
            .unwrap_err();

        assert!(matches!(err, ParseError::Read { line_no: 2, .. }));
        assert!(err.to_string().starts_with("Bad_1.log:2:"));
    }

    #[test]
    fn test_parse_file_from_disk() {
        let mut file = tempfile::Builder::new()
            .prefix("Disk_1_")
            .suffix(".log")
            .tempfile()
            .unwrap();
        writeln!(file, "[d -1.0000] Seed 8 - ALPHA 0.2 - BETA 0.3").unwrap();
        writeln!(file, "[d 1.0000] :: d :: (0, 0, 0) :: Drone done").unwrap();
        file.flush().unwrap();

        let outcome = parse_file(file.path(), 0, Schema::Full).unwrap();
        assert_eq!(outcome.records.last().unwrap().scenario, "Disk");
        assert_eq!(outcome.records.last().unwrap().beta, 0.3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_file(Path::new("/definitely/not/here_1.log"), 0, Schema::Full).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
