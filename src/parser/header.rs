//! Trial header grammar
//!
//! A header line looks like
//!
//! ```text
//! [10/19/2022 -1.0000] Seed 42 - ALPHA 0.50 - BETA 0.30 - GAMMA 0.10
//! ```
//!
//! The seed is always at token 3. Which configuration parameters follow is
//! decided by the highest-priority marker present, not by each marker
//! independently: `GAMMA` implies all three, `BETA` implies alpha and beta,
//! `ALPHA` implies alpha only.

use crate::error::LineError;

/// Token that marks a line as a trial header
pub const HEADER_TOKEN: &str = "Seed";

/// Token offset of the seed value
pub const SEED_OFFSET: usize = 3;

const ALPHA_OFFSET: usize = 6;
const BETA_OFFSET: usize = 9;
const GAMMA_OFFSET: usize = 12;

/// One header form: the marker that selects it and where its values sit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderForm {
    pub marker: &'static str,
    pub alpha: Option<usize>,
    pub beta: Option<usize>,
    pub gamma: Option<usize>,
}

/// Header forms in priority order; the first marker found wins
pub const HEADER_FORMS: &[HeaderForm] = &[
    HeaderForm {
        marker: "GAMMA",
        alpha: Some(ALPHA_OFFSET),
        beta: Some(BETA_OFFSET),
        gamma: Some(GAMMA_OFFSET),
    },
    HeaderForm {
        marker: "BETA",
        alpha: Some(ALPHA_OFFSET),
        beta: Some(BETA_OFFSET),
        gamma: None,
    },
    HeaderForm {
        marker: "ALPHA",
        alpha: Some(ALPHA_OFFSET),
        beta: None,
        gamma: None,
    },
];

/// Parameters declared by a trial header
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrialHeader {
    pub seed: i64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Whether the tokens of a line make it a trial header
pub fn is_header(tokens: &[&str]) -> bool {
    tokens.contains(&HEADER_TOKEN)
}

/// Select the header form for a token list, or `None` for a bare seed header
pub fn select_form(tokens: &[&str]) -> Option<&'static HeaderForm> {
    HEADER_FORMS
        .iter()
        .find(|form| tokens.contains(&form.marker))
}

/// Parse a header line that has already been identified by [`is_header`]
pub fn parse_header(tokens: &[&str]) -> Result<TrialHeader, LineError> {
    let seed = value_at::<i64>(tokens, SEED_OFFSET, "seed")?;

    let Some(form) = select_form(tokens) else {
        return Ok(TrialHeader {
            seed,
            ..Default::default()
        });
    };

    Ok(TrialHeader {
        seed,
        alpha: optional_value(tokens, form.alpha, "alpha")?,
        beta: optional_value(tokens, form.beta, "beta")?,
        gamma: optional_value(tokens, form.gamma, "gamma")?,
    })
}

fn optional_value(tokens: &[&str], offset: Option<usize>, name: &str) -> Result<f64, LineError> {
    match offset {
        Some(offset) => value_at::<f64>(tokens, offset, name),
        None => Ok(0.0),
    }
}

fn value_at<T: std::str::FromStr>(
    tokens: &[&str],
    offset: usize,
    name: &str,
) -> Result<T, LineError> {
    let token = tokens
        .get(offset)
        .ok_or_else(|| LineError::Header(format!("no {} at token {}", name, offset)))?;

    token
        .parse::<T>()
        .map_err(|_| LineError::Header(format!("{} token {:?} is not numeric", name, token)))
}
