// src/ffi/symbols.rs
//! Dynamic loading and symbol resolution
//!
//! The vendor ships the SDK as a GUI-subsystem dynamic library, so every
//! export is declared `extern "system"`. A mismatched calling convention
//! corrupts the stack instead of failing cleanly, which is why the
//! convention lives here in exactly one place and is covered by the stub
//! tests rather than left as an ambient assumption.

use std::ffi::OsStr;
use std::os::raw::{c_char, c_int};

use libloading::Library;
use tracing::info;

use crate::error::{SdkError, SdkResult};
use crate::ffi::types::DeviceInfoRecord;

/// Base name of the vendor module; the platform prefix/suffix is appended
/// at load time.
pub const SDK_MODULE_NAME: &str = "ABM_Athena";

/// `GetDeviceInfo`: no arguments, returns a pointer to the device record.
pub type GetDeviceInfoFn = unsafe extern "system" fn() -> *mut DeviceInfoRecord;

/// `SetDestinationFile`: NUL-terminated path in, boolean-like int out.
pub type SetDestinationFileFn = unsafe extern "system" fn(*const c_char) -> c_int;

/// `InitSession`: device type, session type, reserved handle (-1), and the
/// play-recorded-data flag. The flag is a true single-byte boolean; passing
/// a wider integer here would be misread by the native side.
pub type InitSessionFn = unsafe extern "system" fn(c_int, c_int, c_int, bool) -> c_int;

/// Start/Pause/Resume/Stop: no arguments, tri-state status out.
pub type AcquisitionCommandFn = unsafe extern "system" fn() -> c_int;

/// Raw/filtered/decon retrieval: writes the sample count through the
/// out-param and returns a pointer into library-owned float storage.
pub type GetDataFn = unsafe extern "system" fn(*mut c_int) -> *const f32;

/// `GetTimeStampsStreamData`: stream selector in, pointer to library-owned
/// bytes out. No length is returned; the caller bounds the read with the
/// sample count from the matching data-retrieval call.
pub type GetTimestampsFn = unsafe extern "system" fn(c_int) -> *const u8;

/// `GetCurrentSDKMode`: no arguments, mode integer out.
pub type GetSdkModeFn = unsafe extern "system" fn() -> c_int;

/// `GetThirdPartyData`: writes the byte count through the out-param and
/// returns a pointer into library-owned byte storage.
pub type GetThirdPartyDataFn = unsafe extern "system" fn(*mut c_int) -> *const u8;

/// Fully resolved symbol table for the native SDK.
///
/// Plain function pointers, resolved once at load time. The table is `Copy`
/// on purpose: the wrapper owns a copy and the [`SdkLibrary`] keeps the
/// backing module mapped for as long as any copy may be called.
#[derive(Clone, Copy)]
pub struct SdkSymbols {
    pub get_device_info: GetDeviceInfoFn,
    pub set_destination_file: SetDestinationFileFn,
    pub init_session: InitSessionFn,
    pub start_acquisition: AcquisitionCommandFn,
    pub pause_acquisition: AcquisitionCommandFn,
    pub resume_acquisition: AcquisitionCommandFn,
    pub stop_acquisition: AcquisitionCommandFn,
    pub get_raw_data: GetDataFn,
    pub get_filtered_data: GetDataFn,
    pub get_decon_data: GetDataFn,
    pub get_timestamps_stream_data: GetTimestampsFn,
    pub get_current_sdk_mode: GetSdkModeFn,
    pub get_third_party_data: GetThirdPartyDataFn,
}

impl SdkSymbols {
    /// Resolve every export out of an already-loaded library.
    ///
    /// Resolution is eager: a single missing export fails the whole load
    /// with [`SdkError::LibraryNotFound`] naming the symbol.
    pub fn resolve(library: &Library) -> SdkResult<Self> {
        Ok(Self {
            get_device_info: resolve(library, "GetDeviceInfo", b"GetDeviceInfo\0")?,
            set_destination_file: resolve(library, "SetDestinationFile", b"SetDestinationFile\0")?,
            init_session: resolve(library, "InitSession", b"InitSession\0")?,
            start_acquisition: resolve(library, "StartAcquisition", b"StartAcquisition\0")?,
            pause_acquisition: resolve(library, "PauseAcquisition", b"PauseAcquisition\0")?,
            resume_acquisition: resolve(library, "ResumeAcquisition", b"ResumeAcquisition\0")?,
            stop_acquisition: resolve(library, "StopAcquisition", b"StopAcquisition\0")?,
            get_raw_data: resolve(library, "GetRawData", b"GetRawData\0")?,
            get_filtered_data: resolve(library, "GetFilteredData", b"GetFilteredData\0")?,
            get_decon_data: resolve(library, "GetDeconData", b"GetDeconData\0")?,
            get_timestamps_stream_data: resolve(
                library,
                "GetTimeStampsStreamData",
                b"GetTimeStampsStreamData\0",
            )?,
            get_current_sdk_mode: resolve(library, "GetCurrentSDKMode", b"GetCurrentSDKMode\0")?,
            get_third_party_data: resolve(library, "GetThirdPartyData", b"GetThirdPartyData\0")?,
        })
    }
}

fn resolve<T: Copy>(library: &Library, name: &'static str, symbol: &[u8]) -> SdkResult<T> {
    // Safety: the function-pointer type is dictated by the vendor manual;
    // the symbol table above is the single place those signatures live.
    unsafe {
        library
            .get::<T>(symbol)
            .map(|sym| *sym)
            .map_err(|source| SdkError::LibraryNotFound {
                detail: name,
                source,
            })
    }
}

/// A loaded vendor module together with its resolved symbol table.
///
/// Process-wide singleton state by convention: load once, never unload
/// mid-process. Dropping this while copies of the symbol table are still
/// callable would unmap the code they point into, so the wrapper keeps the
/// library alive for its own lifetime.
pub struct SdkLibrary {
    symbols: SdkSymbols,
    _library: Library,
}

impl SdkLibrary {
    /// Load the vendor module by its conventional name, searching the
    /// platform library path.
    pub fn load() -> SdkResult<Self> {
        Self::load_from(libloading::library_filename(SDK_MODULE_NAME))
    }

    /// Load the vendor module from an explicit path.
    pub fn load_from(path: impl AsRef<OsStr>) -> SdkResult<Self> {
        let path = path.as_ref();
        // Safety: loading runs arbitrary vendor initialization code; there
        // is no way around that for a closed-source SDK.
        let library = unsafe {
            Library::new(path).map_err(|source| SdkError::LibraryNotFound {
                detail: "module load",
                source,
            })?
        };
        let symbols = SdkSymbols::resolve(&library)?;
        info!(module = %path.to_string_lossy(), "native SDK library loaded");
        Ok(Self {
            symbols,
            _library: library,
        })
    }

    /// The resolved symbol table.
    pub fn symbols(&self) -> SdkSymbols {
        self.symbols
    }
}
