//! Classification of individual log lines
//!
//! Every simulator log line is prefixed by the logger as
//! `[MM/dd/yyyy <sim time>] <message>`, so the second space-separated token
//! carries the turn with a trailing `]`. Lines without the `[` prefix carry
//! no turn; lines with it must carry a numeric one.

use crate::error::LineError;
use crate::parser::header::{self, TrialHeader};

const DRONE_DONE: &str = "Drone done";
const VICTIM_RESCUED: &str = "Rescued victim";
const VICTIM_DETECTED: &str = "Detected victim";
const TASK_SUCCEEDED: &str = "Succeeds task";
const TASK_FAILED: &str = "Fails task";
const SCORE: &str = "Score";
const HEAT: &str = "Heat";

/// Separator between fields of an event message
const FIELD_SEPARATOR: &str = "::";

/// Token offset of the turn marker
const TURN_OFFSET: usize = 1;

/// First character of a logger-stamped line
const STAMP_PREFIX: char = '[';

/// What a single line reports
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    TrialHeader(TrialHeader),
    DroneDone,
    VictimDetected(String),
    VictimRescued,
    TaskSucceeded,
    TaskFailed,
    ScoreReport(f64),
    HeatReport(f64),
    /// A timestamped line with no event the parser tracks
    TurnMarker,
    /// Blank line, or an unstamped line with no tracked event
    Unrecognized,
}

/// A classified line together with the turn it was logged at
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// `None` for headers and for lines without a turn token
    pub turn: Option<f64>,
    /// Events in marker order; never empty
    pub events: Vec<LogLine>,
}

impl Entry {
    fn untimed(line: LogLine) -> Self {
        Self {
            turn: None,
            events: vec![line],
        }
    }

    /// Header carried by this line, if it is a trial header
    pub fn header(&self) -> Option<&TrialHeader> {
        match self.events.first() {
            Some(LogLine::TrialHeader(header)) => Some(header),
            _ => None,
        }
    }
}

/// Classify one raw line
pub fn classify(raw: &str) -> Result<Entry, LineError> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(Entry::untimed(LogLine::Unrecognized));
    }

    let tokens: Vec<&str> = line.split(' ').collect();
    if header::is_header(&tokens) {
        let header = header::parse_header(&tokens)?;
        return Ok(Entry::untimed(LogLine::TrialHeader(header)));
    }

    let turn = match tokens.get(TURN_OFFSET) {
        Some(token) if line.starts_with(STAMP_PREFIX) => Some(parse_turn(token)?),
        _ => None,
    };

    let mut events = line_events(line)?;
    if events.is_empty() {
        events.push(match turn {
            Some(_) => LogLine::TurnMarker,
            None => LogLine::Unrecognized,
        });
    }

    Ok(Entry { turn, events })
}

/// Parse the turn token, ignoring a trailing non-numeric suffix such as `]`
pub fn parse_turn(token: &str) -> Result<f64, LineError> {
    let trimmed = token.trim_end_matches(|c: char| !c.is_ascii_digit());
    trimmed.parse::<f64>().map_err(|_| LineError::Turn)
}

/// Every tracked marker the line contains; each marker is matched on its own
fn line_events(line: &str) -> Result<Vec<LogLine>, LineError> {
    let mut events = Vec::new();
    if line.contains(DRONE_DONE) {
        events.push(LogLine::DroneDone);
    }
    if line.contains(VICTIM_RESCUED) {
        events.push(LogLine::VictimRescued);
    }
    if line.contains(VICTIM_DETECTED) {
        if let Some(id) = victim_id(line) {
            events.push(LogLine::VictimDetected(id.to_string()));
        }
    }
    if line.contains(TASK_SUCCEEDED) {
        events.push(LogLine::TaskSucceeded);
    }
    if line.contains(TASK_FAILED) {
        events.push(LogLine::TaskFailed);
    }
    if line.contains(SCORE) {
        events.push(LogLine::ScoreReport(report_value(line)?));
    }
    if line.contains(HEAT) {
        events.push(LogLine::HeatReport(report_value(line)?));
    }
    Ok(events)
}

/// Victim id of a detection line.
///
/// `[date t] :: drone :: (x, y, z) :: victim :: Detected victim`: the id is
/// the field immediately before the one carrying the event text.
fn victim_id(line: &str) -> Option<&str> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
    let event_at = fields.iter().rposition(|f| f.contains(VICTIM_DETECTED))?;
    // the first field is the logger prefix, never an id
    if event_at < 2 {
        return None;
    }
    fields.get(event_at - 1).copied().filter(|id| !id.is_empty())
}

fn report_value(line: &str) -> Result<f64, LineError> {
    let value = line.rsplit(':').next().unwrap_or_default().trim();
    value.parse::<f64>().map_err(|_| LineError::Report)
}
