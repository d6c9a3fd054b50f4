// src/sdk/mod.rs
//! Safe wrapper over the native acquisition SDK
//!
//! One method per native export. The wrapper owns marshalling, sentinel
//! detection, bounded copy-out of library-owned buffers, and a local mirror
//! of the session lifecycle; it never retries, never caches data, and never
//! modifies a native status code before surfacing it.

pub mod codes;
pub mod state;

use std::ffi::CString;
use std::os::raw::c_int;
use std::path::Path;
use std::slice;

use tracing::{debug, warn};

use crate::data::{SampleBlock, TimestampBlock, HEADER_FIELDS, TIMESTAMP_WIDTH};
use crate::error::{SdkError, SdkResult};
use crate::ffi::types::fixed_buffer_to_string;
use crate::ffi::{DeviceInfoRecord, SdkLibrary, SdkSymbols};
use codes::{
    DeviceType, SdkMode, SessionType, TimestampStream, NO_DEVICE_SENTINEL,
    RESERVED_DEVICE_HANDLE, STATUS_OK, STATUS_WRONG_SEQUENCE,
};
use state::{SessionCommand, SessionPhase};

/// Decoded device descriptor, owned by the caller.
///
/// Only produced for an attached device; the no-device sentinel surfaces as
/// [`SdkError::NoDeviceDetected`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device serial/type string.
    pub device_name: String,
    /// COM port number.
    pub comm_port: i32,
    /// Position of the EKG channel (0 = first channel).
    pub ecg_position: i32,
    /// Number of physiological channels (never the sentinel).
    pub channel_count: u32,
    /// Receiver type as reported by the SDK.
    pub esu_type: ReceiverKind,
    /// Timestamp source as reported by the SDK.
    pub timestamp_type: TimestampSource,
    /// Reserved vendor handle.
    pub device_handle: i32,
    /// Reserved device identifier string.
    pub device_id: String,
}

/// Receiver (ESU) type from the device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    MultiChannel,
    SingleChannel,
    /// Value outside the documented pair, preserved for diagnostics.
    Other(i32),
}

impl From<i32> for ReceiverKind {
    fn from(value: i32) -> Self {
        match value {
            0 => ReceiverKind::MultiChannel,
            1 => ReceiverKind::SingleChannel,
            other => ReceiverKind::Other(other),
        }
    }
}

/// Timestamp source from the device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    Esu,
    System,
    /// Value outside the documented pair, preserved for diagnostics.
    Other(i32),
}

impl From<i32> for TimestampSource {
    fn from(value: i32) -> Self {
        match value {
            0 => TimestampSource::Esu,
            1 => TimestampSource::System,
            other => TimestampSource::Other(other),
        }
    }
}

/// Handle to the acquisition SDK.
///
/// The native library holds a single implicit session per process; this
/// handle mirrors its lifecycle locally (see [`SessionPhase`]) and refuses
/// known-illegal transitions before the native round trip. Every call is
/// synchronous and may block for a vendor-controlled duration; retry policy
/// belongs to the caller.
pub struct BAlert {
    symbols: SdkSymbols,
    // Keeps the native module mapped while the symbol table is callable.
    _library: Option<SdkLibrary>,
    phase: SessionPhase,
    channel_count: Option<usize>,
}

impl BAlert {
    /// Load the vendor module from the platform library path.
    pub fn load() -> SdkResult<Self> {
        Ok(Self::from_library(SdkLibrary::load()?))
    }

    /// Load the vendor module from an explicit path.
    pub fn load_from(path: impl AsRef<std::ffi::OsStr>) -> SdkResult<Self> {
        Ok(Self::from_library(SdkLibrary::load_from(path)?))
    }

    fn from_library(library: SdkLibrary) -> Self {
        Self {
            symbols: library.symbols(),
            _library: Some(library),
            phase: SessionPhase::Uninitialized,
            channel_count: None,
        }
    }

    /// Wrap an in-process symbol table (the stub backend, or tests).
    ///
    /// The caller guarantees the functions stay callable for the handle's
    /// lifetime; for `extern "system"` functions defined in this process
    /// that is automatic.
    pub fn from_symbols(symbols: SdkSymbols) -> Self {
        Self {
            symbols,
            _library: None,
            phase: SessionPhase::Uninitialized,
            channel_count: None,
        }
    }

    /// Local view of the session lifecycle.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Channel count cached from the last successful device query.
    pub fn channel_count(&self) -> Option<usize> {
        self.channel_count
    }

    /// Query the connected device (`GetDeviceInfo`).
    ///
    /// The sentinel channel count -1 raises [`SdkError::NoDeviceDetected`];
    /// a descriptor is only ever returned for an attached device. On
    /// success the channel count is cached for buffer-shape computation in
    /// the data-retrieval calls.
    pub fn device_info(&mut self) -> SdkResult<DeviceInfo> {
        let ptr = unsafe { (self.symbols.get_device_info)() };
        if ptr.is_null() {
            return Err(SdkError::NullPointer {
                what: "device info",
            });
        }
        // Safety: non-null pointer to the vendor's device record; decoded
        // into owned data before any further native call can reuse it.
        let record: &DeviceInfoRecord = unsafe { &*ptr };

        // The documented sentinel is -1; any negative count means there is
        // no usable device, so none of them may escape as a descriptor.
        if record.channel_count <= NO_DEVICE_SENTINEL {
            return Err(SdkError::NoDeviceDetected {
                channel_count: record.channel_count,
            });
        }

        let info = DeviceInfo {
            device_name: fixed_buffer_to_string(&record.device_name),
            comm_port: record.comm_port,
            ecg_position: record.ecg_position,
            channel_count: record.channel_count as u32,
            esu_type: ReceiverKind::from(record.esu_type),
            timestamp_type: TimestampSource::from(record.timestamp_type),
            device_handle: record.device_handle,
            device_id: fixed_buffer_to_string(&record.device_id),
        };
        self.channel_count = Some(info.channel_count as usize);
        debug!(
            device = %info.device_name,
            channels = info.channel_count,
            "device detected"
        );
        Ok(info)
    }

    /// Set the destination data file (`SetDestinationFile`).
    ///
    /// The SDK expects an absolute path; relative paths and paths that
    /// cannot be represented as a C string are rejected before the native
    /// call. A FALSE return surfaces as [`SdkError::CommandRejected`] with
    /// code 0; the caller decides whether that aborts the session.
    pub fn set_destination_file(&mut self, path: &Path) -> SdkResult<()> {
        if !path.is_absolute() {
            return Err(SdkError::InvalidPath {
                path: path.to_path_buf(),
                reason: "destination must be an absolute path".into(),
            });
        }
        let as_str = path.to_str().ok_or_else(|| SdkError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8".into(),
        })?;
        let c_path = CString::new(as_str).map_err(|_| SdkError::InvalidPath {
            path: path.to_path_buf(),
            reason: "path contains an interior NUL byte".into(),
        })?;

        let accepted = unsafe { (self.symbols.set_destination_file)(c_path.as_ptr()) };
        if accepted == 0 {
            warn!(path = %path.display(), "destination file rejected");
            return Err(SdkError::CommandRejected {
                command: "SetDestinationFile",
                code: accepted,
            });
        }
        Ok(())
    }

    /// Initialize a new session (`InitSession`).
    ///
    /// Passes the reserved device handle (-1) and marshals `play_recorded`
    /// as a single-byte boolean, which is what the native side expects for
    /// its pre-recorded-playback flag.
    pub fn init_session(
        &mut self,
        device: DeviceType,
        session: SessionType,
        play_recorded: bool,
    ) -> SdkResult<()> {
        self.check_sequence(SessionCommand::Init, "InitSession")?;
        let code = unsafe {
            (self.symbols.init_session)(
                device as c_int,
                session as c_int,
                RESERVED_DEVICE_HANDLE,
                play_recorded,
            )
        };
        self.finish_lifecycle(SessionCommand::Init, "InitSession", code)
    }

    /// Start data acquisition (`StartAcquisition`).
    pub fn start_acquisition(&mut self) -> SdkResult<()> {
        self.lifecycle(SessionCommand::Start, "StartAcquisition", self.symbols.start_acquisition)
    }

    /// Pause acquisition (`PauseAcquisition`); resume to continue.
    pub fn pause_acquisition(&mut self) -> SdkResult<()> {
        self.lifecycle(SessionCommand::Pause, "PauseAcquisition", self.symbols.pause_acquisition)
    }

    /// Resume a paused acquisition (`ResumeAcquisition`).
    pub fn resume_acquisition(&mut self) -> SdkResult<()> {
        self.lifecycle(SessionCommand::Resume, "ResumeAcquisition", self.symbols.resume_acquisition)
    }

    /// Stop acquisition (`StopAcquisition`).
    ///
    /// Resets the native session; a new `init_session` is required before
    /// acquisition can start again.
    pub fn stop_acquisition(&mut self) -> SdkResult<()> {
        self.lifecycle(SessionCommand::Stop, "StopAcquisition", self.symbols.stop_acquisition)
    }

    /// Fetch raw samples (`GetRawData`).
    ///
    /// Returns an owned [`SampleBlock`] of exactly
    /// `(channel_count + 6) * count` values; the library-side buffer is
    /// reused by the next retrieval call and is never referenced again.
    pub fn raw_data(&mut self) -> SdkResult<SampleBlock> {
        self.fetch_samples("GetRawData", self.symbols.get_raw_data)
    }

    /// Fetch filtered EEG/EKG samples (`GetFilteredData`).
    pub fn filtered_data(&mut self) -> SdkResult<SampleBlock> {
        self.fetch_samples("GetFilteredData", self.symbols.get_filtered_data)
    }

    /// Fetch artifact-decontaminated samples (`GetDeconData`).
    pub fn decon_data(&mut self) -> SdkResult<SampleBlock> {
        self.fetch_samples("GetDeconData", self.symbols.get_decon_data)
    }

    /// Fetch timestamps for one stream (`GetTimeStampsStreamData`).
    ///
    /// The native call returns no length: the stream carries 4 bytes per
    /// sample, and `sample_count` must be the count returned by the data
    /// retrieval this timestamp read corresponds to. That coupling spans
    /// two native calls and cannot be enforced here, only honored.
    pub fn timestamps(
        &mut self,
        stream: TimestampStream,
        sample_count: usize,
    ) -> SdkResult<TimestampBlock> {
        if sample_count == 0 {
            return Ok(TimestampBlock::new(Vec::new()));
        }
        let ptr = unsafe { (self.symbols.get_timestamps_stream_data)(stream as c_int) };
        if ptr.is_null() {
            return Err(SdkError::NullPointer { what: "timestamp" });
        }
        let len = sample_count * TIMESTAMP_WIDTH;
        // Safety: bounded by the sample count the caller just received from
        // the matching data call, per the vendor contract.
        let bytes = unsafe { slice::from_raw_parts(ptr, len) }.to_vec();
        Ok(TimestampBlock::new(bytes))
    }

    /// Current SDK operating mode (`GetCurrentSDKMode`). Pure read.
    pub fn sdk_mode(&mut self) -> SdkResult<SdkMode> {
        let code = unsafe { (self.symbols.get_current_sdk_mode)() };
        SdkMode::from_code(code).ok_or(SdkError::CommandRejected {
            command: "GetCurrentSDKMode",
            code,
        })
    }

    /// Fetch third-party instrument bytes (`GetThirdPartyData`).
    ///
    /// Returns the copied stream; parse with
    /// [`ThirdPartyPacket::parse_stream`](crate::data::ThirdPartyPacket::parse_stream).
    pub fn third_party_data(&mut self) -> SdkResult<Vec<u8>> {
        let mut count: c_int = 0;
        let ptr = unsafe { (self.symbols.get_third_party_data)(&mut count) };
        if count < 0 {
            return Err(SdkError::CommandRejected {
                command: "GetThirdPartyData",
                code: count,
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }
        if ptr.is_null() {
            return Err(SdkError::NullPointer {
                what: "third-party data",
            });
        }
        Ok(unsafe { slice::from_raw_parts(ptr, count as usize) }.to_vec())
    }

    fn fetch_samples(&mut self, command: &'static str, f: crate::ffi::symbols::GetDataFn) -> SdkResult<SampleBlock> {
        let channels = self.channel_count.ok_or(SdkError::ChannelCountUnknown)?;
        let mut count: c_int = 0;
        let ptr = unsafe { f(&mut count) };
        if count < 0 {
            return Err(SdkError::CommandRejected {
                command,
                code: count,
            });
        }
        if count == 0 {
            return Ok(SampleBlock::empty(channels));
        }
        if ptr.is_null() {
            return Err(SdkError::NullPointer { what: command });
        }
        let len = (channels + HEADER_FIELDS) * count as usize;
        // Safety: the vendor contract sizes the buffer at
        // (channel_count + 6) * count floats; nothing past that bound is
        // read, and the values are copied out before returning.
        let values = unsafe { slice::from_raw_parts(ptr, len) }.to_vec();
        debug!(command, samples = count, "samples copied out");
        Ok(SampleBlock::new(channels, values))
    }

    fn lifecycle(
        &mut self,
        command: SessionCommand,
        name: &'static str,
        f: crate::ffi::symbols::AcquisitionCommandFn,
    ) -> SdkResult<()> {
        self.check_sequence(command, name)?;
        let code = unsafe { f() };
        self.finish_lifecycle(command, name, code)
    }

    fn check_sequence(&self, command: SessionCommand, name: &'static str) -> SdkResult<()> {
        if !self.phase.permits(command) {
            warn!(
                command = name,
                phase = ?self.phase,
                "command rejected locally: wrong call sequence"
            );
            return Err(SdkError::CommandRejected {
                command: name,
                code: STATUS_WRONG_SEQUENCE,
            });
        }
        Ok(())
    }

    fn finish_lifecycle(
        &mut self,
        command: SessionCommand,
        name: &'static str,
        code: i32,
    ) -> SdkResult<()> {
        if code != STATUS_OK {
            warn!(command = name, code, "command rejected by SDK");
            return Err(SdkError::CommandRejected {
                command: name,
                code,
            });
        }
        self.phase = self.phase.after(command);
        debug!(command = name, phase = ?self.phase, "lifecycle advanced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{self, StubScript};
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_device_query_sentinel_never_returns_descriptor() {
        let script = StubScript::reset();
        script.set_device_absent();
        let mut sdk = BAlert::from_symbols(stub::symbols());

        match sdk.device_info() {
            Err(SdkError::NoDeviceDetected { channel_count }) => {
                assert_eq!(channel_count, -1);
            }
            other => panic!("expected NoDeviceDetected, got {other:?}"),
        }
        assert_eq!(sdk.channel_count(), None);
    }

    #[test]
    #[serial]
    fn test_device_query_decodes_and_caches_channels() {
        let script = StubScript::reset();
        script.set_device("X24-ABM", 24);
        let mut sdk = BAlert::from_symbols(stub::symbols());

        let info = sdk.device_info().unwrap();
        assert_eq!(info.device_name, "X24-ABM");
        assert_eq!(info.channel_count, 24);
        assert_eq!(sdk.channel_count(), Some(24));
    }

    #[test]
    #[serial]
    fn test_data_before_device_query_is_rejected_locally() {
        let _script = StubScript::reset();
        let mut sdk = BAlert::from_symbols(stub::symbols());
        assert!(matches!(
            sdk.raw_data(),
            Err(SdkError::ChannelCountUnknown)
        ));
    }

    #[test]
    #[serial]
    fn test_start_before_init_rejected_without_native_call() {
        let script = StubScript::reset();
        let mut sdk = BAlert::from_symbols(stub::symbols());

        let err = sdk.start_acquisition().unwrap_err();
        assert!(err.is_sequence_violation());
        assert_eq!(script.calls("StartAcquisition"), 0);
    }

    #[test]
    #[serial]
    fn test_relative_destination_rejected_before_native_call() {
        let script = StubScript::reset();
        let mut sdk = BAlert::from_symbols(stub::symbols());

        let err = sdk
            .set_destination_file(Path::new("relative/output.ebs"))
            .unwrap_err();
        assert!(matches!(err, SdkError::InvalidPath { .. }));
        assert_eq!(script.calls("SetDestinationFile"), 0);
    }

    #[test]
    #[serial]
    fn test_mode_decoding_and_unknown_mode() {
        let script = StubScript::reset();
        let mut sdk = BAlert::from_symbols(stub::symbols());

        script.set_mode(-1);
        assert_eq!(sdk.sdk_mode().unwrap(), SdkMode::Waiting);

        script.set_mode(7);
        let err = sdk.sdk_mode().unwrap_err();
        assert_eq!(err.rejection_code(), Some(7));
    }

    #[test]
    fn test_receiver_and_timestamp_decoding() {
        assert_eq!(ReceiverKind::from(0), ReceiverKind::MultiChannel);
        assert_eq!(ReceiverKind::from(1), ReceiverKind::SingleChannel);
        assert_eq!(ReceiverKind::from(9), ReceiverKind::Other(9));
        assert_eq!(TimestampSource::from(0), TimestampSource::Esu);
        assert_eq!(TimestampSource::from(1), TimestampSource::System);
        assert_eq!(TimestampSource::from(-3), TimestampSource::Other(-3));
    }
}
