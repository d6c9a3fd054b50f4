// src/acquisition/mod.rs
//! Session recorder: drives a full acquisition session through the safe
//! wrapper and persists results to text files.

pub mod recorder;
pub mod writers;

pub use recorder::{Recorder, RecorderError, RecordingSummary};
pub use writers::{SampleFileWriter, TimestampFileWriter};
