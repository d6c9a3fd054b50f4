// src/bin/record_main.rs
//! Session-recorder binary
//!
//! Drives one acquisition session against the configured backend and
//! writes the samples and timestamps text files. Usage:
//!
//! ```text
//! balert-record [config.toml]
//! ```
//!
//! Settings come from the optional TOML file with `BALERT_*` environment
//! overrides; see `config::RecorderConfig`.

use std::path::PathBuf;
use std::process::ExitCode;

use balert_sdk::acquisition::{Recorder, RecorderError};
use balert_sdk::config::{BackendConfig, RecorderConfig};
use balert_sdk::error::SdkError;
use balert_sdk::sdk::BAlert;
use balert_sdk::stub;
use balert_sdk::stub::StubScript;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_file: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let config = match RecorderConfig::load(config_file.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let sdk = match build_backend(&config) {
        Ok(sdk) => sdk,
        Err(err) => {
            eprintln!("could not load the acquisition SDK: {err}");
            eprintln!("check that the vendor library is installed next to the recorder");
            return ExitCode::FAILURE;
        }
    };

    println!("Starting acquisition session");
    match Recorder::new(sdk, config).run() {
        Ok(summary) => {
            println!(
                "Recorded {} samples and {} timestamps from {} ({} channels) over {} polls",
                summary.samples_written,
                summary.timestamps_written,
                summary.device_name,
                summary.channel_count,
                summary.polls_completed,
            );
            if summary.init_attempts > 1 {
                println!(
                    "Session initialization needed {} attempts",
                    summary.init_attempts
                );
            }
            ExitCode::SUCCESS
        }
        Err(RecorderError::Sdk(SdkError::NoDeviceDetected { channel_count })) => {
            eprintln!("No device detected (reported channel count {channel_count})");
            eprintln!("Reattach the headset and try again");
            ExitCode::FAILURE
        }
        Err(RecorderError::InitExhausted { attempts, source }) => {
            eprintln!("Could not initialize the session after {attempts} attempts: {source}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Recording failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn build_backend(config: &RecorderConfig) -> Result<BAlert, SdkError> {
    match &config.backend {
        BackendConfig::Native { library_path } => match library_path {
            Some(path) => BAlert::load_from(path),
            None => BAlert::load(),
        },
        BackendConfig::Stub {
            channel_count,
            rows_per_poll,
        } => {
            let script = StubScript::reset();
            script.enable_synthetic(*channel_count, *rows_per_poll);
            Ok(BAlert::from_symbols(stub::symbols()))
        }
    }
}
