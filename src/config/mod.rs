// src/config/mod.rs
//! Recorder configuration
//!
//! Settings for the session-recorder binary: which backend to drive, how
//! the session is typed, where output goes, and the poll/retry cadence.
//! Loaded from a TOML file with environment-variable overrides layered on
//! top; every field has a default so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sdk::codes::{DeviceType, SessionType};

/// Which native layer the recorder drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Load the vendor module, from the platform library path or an
    /// explicit file.
    Native {
        #[serde(default)]
        library_path: Option<PathBuf>,
    },
    /// Drive the in-process stub with synthesized data; useful for dry
    /// runs with no hardware attached.
    Stub {
        #[serde(default = "defaults::stub_channel_count")]
        channel_count: usize,
        #[serde(default = "defaults::stub_rows_per_poll")]
        rows_per_poll: usize,
    },
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Native { library_path: None }
    }
}

/// Identifiers baked into the destination file name.
///
/// Widths follow the established recording convention: 4-digit subject,
/// 1-digit group, 1-digit session iteration, 2-digit task type, 1-digit
/// task iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentifiers {
    #[serde(default = "defaults::subject")]
    pub subject: String,
    #[serde(default = "defaults::group")]
    pub group: String,
    #[serde(default = "defaults::iteration")]
    pub iteration: String,
    #[serde(default = "defaults::task")]
    pub task: String,
    #[serde(default = "defaults::task_iteration")]
    pub task_iteration: String,
}

impl Default for SessionIdentifiers {
    fn default() -> Self {
        Self {
            subject: defaults::subject(),
            group: defaults::group(),
            iteration: defaults::iteration(),
            task: defaults::task(),
            task_iteration: defaults::task_iteration(),
        }
    }
}

/// Complete recorder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default = "defaults::device_type")]
    pub device_type: DeviceType,

    #[serde(default = "defaults::session_type")]
    pub session_type: SessionType,

    /// Play pre-recorded data instead of acquiring live.
    #[serde(default)]
    pub play_recorded: bool,

    /// Directory the SDK writes its destination file into.
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,

    /// Destination file-name prefix.
    #[serde(default = "defaults::file_prefix")]
    pub file_prefix: String,

    #[serde(default)]
    pub session: SessionIdentifiers,

    /// Bounded attempts at session initialization.
    #[serde(default = "defaults::init_retry_attempts")]
    pub init_retry_attempts: u32,

    /// Poll-loop iterations before pause/resume/stop.
    #[serde(default = "defaults::poll_iterations")]
    pub poll_iterations: u32,

    /// Sleep between polls, milliseconds.
    #[serde(default = "defaults::poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Samples text file, created in the working directory.
    #[serde(default = "defaults::samples_file")]
    pub samples_file: PathBuf,

    /// Timestamps text file, created in the working directory.
    #[serde(default = "defaults::timestamps_file")]
    pub timestamps_file: PathBuf,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        // An empty TOML document deserializes to all defaults; this cannot
        // fail.
        toml::from_str("").unwrap_or_else(|_| unreachable!("defaults are total"))
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::sdk::codes::{DeviceType, SessionType};

    pub fn device_type() -> DeviceType {
        DeviceType::X24Standard
    }
    pub fn session_type() -> SessionType {
        SessionType::Raw
    }
    pub fn output_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn file_prefix() -> String {
        "Record_".into()
    }
    pub fn init_retry_attempts() -> u32 {
        10
    }
    pub fn poll_iterations() -> u32 {
        10
    }
    pub fn poll_interval_ms() -> u64 {
        500
    }
    pub fn samples_file() -> PathBuf {
        PathBuf::from("RAWsamps.txt")
    }
    pub fn timestamps_file() -> PathBuf {
        PathBuf::from("timeStamps.txt")
    }
    pub fn stub_channel_count() -> usize {
        24
    }
    pub fn stub_rows_per_poll() -> usize {
        16
    }
    pub fn subject() -> String {
        "1234".into()
    }
    pub fn group() -> String {
        "1".into()
    }
    pub fn iteration() -> String {
        "1".into()
    }
    pub fn task() -> String {
        "12".into()
    }
    pub fn task_iteration() -> String {
        "1".into()
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration load failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl RecorderConfig {
    /// Load configuration, layering an optional TOML file under
    /// `BALERT_*` environment overrides (`BALERT_POLL_ITERATIONS=20`,
    /// `BALERT_SESSION__SUBJECT=0007`, ...).
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("BALERT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.init_retry_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "init_retry_attempts",
                reason: "at least one attempt is required".into(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                reason: "poll interval must be nonzero".into(),
            });
        }
        check_digits("session.subject", &self.session.subject, 4)?;
        check_digits("session.group", &self.session.group, 1)?;
        check_digits("session.iteration", &self.session.iteration, 1)?;
        check_digits("session.task", &self.session.task, 2)?;
        check_digits("session.task_iteration", &self.session.task_iteration, 1)?;
        Ok(())
    }

    /// The destination file handed to the SDK:
    /// `<output_dir>/<prefix><subject><group><iteration><task><taskiter>.ebs`
    pub fn destination_file(&self) -> PathBuf {
        let s = &self.session;
        self.output_dir.join(format!(
            "{}{}{}{}{}{}.ebs",
            self.file_prefix, s.subject, s.group, s.iteration, s.task, s.task_iteration
        ))
    }
}

fn check_digits(field: &'static str, value: &str, width: usize) -> Result<(), ConfigError> {
    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("expected {width} digit(s), got {value:?}"),
        });
    }
    Ok(())
}
