//! Utility modules

pub mod inputs;

pub use inputs::{expand_batch, expand_inputs, BATCH_MARKER, DEFAULT_BATCH_WIDTH};
