//! balert-sdk: Safe Rust bindings for the B-Alert EEG acquisition SDK
//!
//! The vendor ships acquisition, filtering, artifact decontamination, and
//! classification inside a closed-source dynamic library. This crate owns
//! the part in between: loading that library, marshalling across its ABI,
//! and sequencing its implicit session lifecycle. It provides:
//!
//! - A binding layer with bit-exact record layouts and eagerly resolved
//!   `extern "system"` symbols
//! - A safe wrapper that turns status codes and sentinels into typed errors
//!   and copies library-owned buffers into bounded views
//! - A session recorder that drives a full acquisition into text files
//! - A scriptable in-process stub for tests and hardware-free dry runs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use balert_sdk::sdk::codes::{DeviceType, SessionType, TimestampStream};
//! use balert_sdk::sdk::BAlert;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sdk = BAlert::load()?;
//!     let device = sdk.device_info()?;
//!     println!("{} ({} channels)", device.device_name, device.channel_count);
//!
//!     sdk.init_session(DeviceType::X24Standard, SessionType::Raw, false)?;
//!     sdk.start_acquisition()?;
//!
//!     let block = sdk.raw_data()?;
//!     let stamps = sdk.timestamps(TimestampStream::Raw, block.len())?;
//!     for (row, stamp) in block.rows().zip(stamps.iter()) {
//!         println!("{} ms: {:?}", stamp.millis(), row.channels());
//!     }
//!
//!     sdk.stop_acquisition()?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod acquisition;
pub mod config;
pub mod data;
pub mod error;
pub mod ffi;
pub mod sdk;
pub mod stub;

// Re-export commonly used types for convenience
pub use acquisition::{Recorder, RecorderError, RecordingSummary};
pub use config::{BackendConfig, ConfigError, RecorderConfig};
pub use data::{SampleBlock, ThirdPartyPacket, Timestamp, TimestampBlock};
pub use error::{SdkError, SdkResult};
pub use sdk::{BAlert, DeviceInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "balert-sdk");
    }
}
