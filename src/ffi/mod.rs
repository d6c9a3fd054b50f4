// src/ffi/mod.rs
//! Raw binding layer for the vendor acquisition SDK
//!
//! Everything in here mirrors the native ABI exactly: record layouts are
//! bit-for-bit, exports use the platform GUI-subsystem calling convention
//! (`extern "system"`), and symbols are resolved eagerly so a missing export
//! fails at load time, never mid-session.

pub mod symbols;
pub mod types;

pub use symbols::{SdkLibrary, SdkSymbols, SDK_MODULE_NAME};
pub use types::{DeviceInfoRecord, DEVICE_ID_LEN, DEVICE_NAME_LEN};
