// src/acquisition/recorder.rs
//! The sequential acquisition drive
//!
//! Mirrors the operator workflow: query the device, point the SDK at its
//! destination file, initialize with a bounded retry, start, poll raw data
//! and timestamps on a fixed cadence into the two text files, then
//! pause/resume and stop. All retry policy lives here, visibly; the
//! wrapper below never retries anything.

use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::acquisition::writers::{SampleFileWriter, TimestampFileWriter};
use crate::config::RecorderConfig;
use crate::error::SdkError;
use crate::sdk::codes::{TimestampStream, STATUS_FAILED};
use crate::sdk::BAlert;

/// Recorder failures.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Sdk(#[from] SdkError),

    #[error("output file error: {0}")]
    Io(#[from] std::io::Error),

    /// Session initialization kept failing; `source` is the last
    /// rejection.
    #[error("session initialization failed after {attempts} attempts")]
    InitExhausted {
        attempts: u32,
        #[source]
        source: SdkError,
    },
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSummary {
    pub device_name: String,
    pub channel_count: u32,
    pub init_attempts: u32,
    pub polls_completed: u32,
    pub samples_written: usize,
    pub timestamps_written: usize,
}

/// Drives one recording session over an already-constructed SDK handle.
pub struct Recorder {
    sdk: BAlert,
    config: RecorderConfig,
}

impl Recorder {
    pub fn new(sdk: BAlert, config: RecorderConfig) -> Self {
        Self { sdk, config }
    }

    /// Run the full session. Unrecoverable conditions (no device, start
    /// rejection, exhausted init retries, file errors) abort the run and
    /// propagate; the caller decides how to report them.
    pub fn run(mut self) -> Result<RecordingSummary, RecorderError> {
        let info = self.sdk.device_info()?;
        info!(
            device = %info.device_name,
            channels = info.channel_count,
            "device detected"
        );

        let destination = std::path::absolute(self.config.destination_file())?;
        self.sdk.set_destination_file(&destination)?;
        info!(destination = %destination.display(), "destination file set");

        let init_attempts = self.init_with_retry()?;
        info!(attempts = init_attempts, "session initialized");

        self.sdk.start_acquisition()?;
        let mode = self.sdk.sdk_mode()?;
        info!(?mode, "acquisition started");

        let mut samples = SampleFileWriter::create(&self.config.samples_file)?;
        let mut timestamps = TimestampFileWriter::create(&self.config.timestamps_file)?;

        let mut samples_written = 0;
        let mut timestamps_written = 0;
        for poll in 0..self.config.poll_iterations {
            thread::sleep(Duration::from_millis(self.config.poll_interval_ms));

            let block = self.sdk.raw_data()?;
            // The timestamp stream carries no length of its own; it is
            // bounded by the sample count this poll just returned.
            let stamps = self.sdk.timestamps(TimestampStream::Raw, block.len())?;

            timestamps_written += timestamps.write_block(&stamps)?;
            samples_written += samples.write_block(&block)?;
            info!(poll, samples = block.len(), "poll complete");
        }

        self.sdk.pause_acquisition()?;
        info!("acquisition paused");
        self.sdk.resume_acquisition()?;
        info!("acquisition resumed");

        samples.flush()?;
        timestamps.flush()?;

        self.sdk.stop_acquisition()?;
        info!("acquisition stopped");

        Ok(RecordingSummary {
            device_name: info.device_name,
            channel_count: info.channel_count,
            init_attempts,
            polls_completed: self.config.poll_iterations,
            samples_written,
            timestamps_written,
        })
    }

    /// Initialize the session, retrying up to the configured attempt
    /// count and stopping early on success.
    fn init_with_retry(&mut self) -> Result<u32, RecorderError> {
        let mut last = SdkError::CommandRejected {
            command: "InitSession",
            code: STATUS_FAILED,
        };
        for attempt in 1..=self.config.init_retry_attempts {
            match self.sdk.init_session(
                self.config.device_type,
                self.config.session_type,
                self.config.play_recorded,
            ) {
                Ok(()) => return Ok(attempt),
                Err(err) => {
                    warn!(attempt, error = %err, "session initialization failed");
                    last = err;
                }
            }
        }
        Err(RecorderError::InitExhausted {
            attempts: self.config.init_retry_attempts,
            source: last,
        })
    }
}
