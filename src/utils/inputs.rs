//! Input path expansion
//!
//! The simulator writes one log per worker thread, named
//! `<Scenario>_<n>_<timestamp>.log`. A single path naming the first worker's
//! log stands for the whole batch.

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::debug;

/// Marker of the first log in a batch
pub const BATCH_MARKER: &str = "_1_";

/// Logs in a batch produced by the simulator
pub const DEFAULT_BATCH_WIDTH: u32 = 4;

/// Turn command-line inputs into the ordered list of logs to parse.
///
/// - several arguments are taken as they are;
/// - a single argument containing whitespace is split into several paths;
/// - a single path containing `_1_` expands into `_1_` through `_<width>_`.
pub fn expand_inputs(args: &[String], batch_width: u32) -> Result<Vec<PathBuf>> {
    let paths: Vec<String> = match args {
        [] => bail!("No input files given"),
        [single] => single.split_whitespace().map(str::to_string).collect(),
        many => many.to_vec(),
    };

    if paths.is_empty() {
        bail!("No input files given");
    }

    let paths = if paths.len() == 1 && paths[0].contains(BATCH_MARKER) {
        expand_batch(&paths[0], batch_width)
    } else {
        paths.into_iter().map(PathBuf::from).collect()
    };

    debug!("Expanded inputs: {:?}", paths);
    Ok(paths)
}

/// Sibling paths of a batch, in worker order
pub fn expand_batch(template: &str, width: u32) -> Vec<PathBuf> {
    (1..=width)
        .map(|n| PathBuf::from(template.replace(BATCH_MARKER, &format!("_{}_", n))))
        .collect()
}
