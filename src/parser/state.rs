//! Running per-trial state and the per-line transition
//!
//! The scanner owns one [`TrialState`] per file and threads it through
//! [`TrialState::step`] for every classified line. A step consumes the state
//! and returns the next one together with the record the line closed, if any.

use crate::parser::header::TrialHeader;
use crate::parser::line::{Entry, LogLine};
use crate::parser::record::{Record, Schema};
use std::collections::BTreeSet;

/// Victims seen in the current trial.
///
/// Detection lines carry an id and are deduplicated; rescue lines carry no
/// usable id and only bump a counter. The reported count is the sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Victims {
    identified: BTreeSet<String>,
    anonymous: u32,
}

impl Victims {
    /// Record a detection; returns false if the id was already known
    pub fn detect(&mut self, id: impl Into<String>) -> bool {
        self.identified.insert(id.into())
    }

    pub fn rescue(&mut self) {
        self.anonymous += 1;
    }

    pub fn count(&self) -> u32 {
        self.identified.len() as u32 + self.anonymous
    }
}

/// Accumulated state of the trial currently being read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialState {
    /// Trials opened so far in this file; 0 until the first header
    pub trial: u32,
    pub seed: i64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub drones: u32,
    pub victims: Victims,
    pub turn: f64,
    pub successes: u32,
    pub fails: u32,
    pub score: f64,
    pub heat: f64,
}

/// Result of applying one line
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TrialState,
    pub emitted: Option<Record>,
}

/// Fixed inputs of a file scan
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub scenario: &'a str,
    /// Trials emitted by previously processed files
    pub offset: u32,
    pub schema: Schema,
}

impl TrialState {
    /// Snapshot the current state as an output row
    pub fn snapshot(&self, ctx: &ScanContext<'_>) -> Record {
        Record {
            scenario: ctx.scenario.to_string(),
            trial: ctx.offset + self.trial,
            seed: self.seed,
            alpha: self.alpha,
            beta: self.beta,
            gamma: self.gamma,
            drones: self.drones,
            victims: self.victims.count(),
            turn: self.turn,
            successes: self.successes,
            fails: self.fails,
            score: self.score,
            heat: self.heat,
        }
    }

    /// Apply one classified line; every event it carries counts
    pub fn step(self, entry: Entry, ctx: &ScanContext<'_>) -> Transition {
        if let Some(header) = entry.header().copied() {
            return self.open_trial(header, ctx);
        }

        let (mut state, emitted) = self.advance_turn(entry.turn, ctx);
        for event in entry.events {
            state.apply(event, ctx.schema);
        }
        Transition { state, emitted }
    }

    /// Close the open trial, if any, and start a fresh one from `header`
    fn open_trial(self, header: TrialHeader, ctx: &ScanContext<'_>) -> Transition {
        let emitted = (self.trial > 0).then(|| self.snapshot(ctx));

        let state = TrialState {
            trial: self.trial + 1,
            seed: header.seed,
            alpha: header.alpha,
            beta: header.beta,
            gamma: header.gamma,
            ..TrialState::default()
        };

        Transition { state, emitted }
    }

    /// Move to `turn` if it is later than the stored one.
    ///
    /// The boundary record is taken before the turn is updated, so it carries
    /// the turn being left and everything reported up to it.
    fn advance_turn(
        mut self,
        turn: Option<f64>,
        ctx: &ScanContext<'_>,
    ) -> (TrialState, Option<Record>) {
        let Some(turn) = turn else {
            return (self, None);
        };
        if turn <= self.turn {
            return (self, None);
        }

        let emitted = (ctx.schema.emits_turns() && self.trial > 0).then(|| self.snapshot(ctx));
        self.turn = turn;
        (self, emitted)
    }

    fn apply(&mut self, event: LogLine, schema: Schema) {
        match event {
            LogLine::DroneDone => self.drones += 1,
            LogLine::VictimRescued if !schema.dedups_victims() => self.victims.rescue(),
            LogLine::VictimDetected(id) if schema.dedups_victims() => {
                self.victims.detect(id);
            }
            LogLine::ScoreReport(score) if schema.emits_turns() => self.score = score,
            LogLine::TaskSucceeded if schema == Schema::Full => self.successes += 1,
            LogLine::TaskFailed if schema == Schema::Full => self.fails += 1,
            LogLine::HeatReport(heat) if schema == Schema::Full => self.heat = heat,
            _ => {}
        }
    }
}
