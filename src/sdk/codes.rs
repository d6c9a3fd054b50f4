// src/sdk/codes.rs
//! Vendor-defined numeric tables
//!
//! Status constants, configuration enums, and the SDK error-code table.
//! The numeric values are part of the vendor wire contract and of existing
//! log-analysis tooling; they must not be renumbered.

use serde::{Deserialize, Serialize};

/// Per-command success status (`INIT_SESSION_OK`, `ACQ_STARTED_OK`, ...).
pub const STATUS_OK: i32 = 1;

/// Per-command explicit failure status.
pub const STATUS_FAILED: i32 = 0;

/// Command ignored because it was issued out of sequence
/// (`ID_WRONG_SEQUENCY_OF_COMMAND` in the vendor manual).
pub const STATUS_WRONG_SEQUENCE: i32 = -1;

/// Reserved device-handle argument to `InitSession`.
pub const RESERVED_DEVICE_HANDLE: i32 = -1;

/// Sentinel channel count meaning "no device attached".
pub const NO_DEVICE_SENTINEL: i32 = -1;

/// Device configuration selector for `InitSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum DeviceType {
    /// ABM_DEVICE_X10Standard
    #[serde(rename = "x10_standard")]
    X10Standard = 0,
    /// ABM_DEVICE_X4APPT
    #[serde(rename = "x4_appt")]
    X4Appt = 2,
    /// ABM_DEVICE_X4BAlert
    #[serde(rename = "x4_balert")]
    X4BAlert = 4,
    /// ABM_DEVICE_X24Standard
    #[serde(rename = "x24_standard")]
    X24Standard = 5,
}

/// Session configuration selector for `InitSession`.
///
/// Each successive value adds output streams on top of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum SessionType {
    /// RAW and RAW-PSD data only.
    Raw = 0,
    /// Additional DECON and DECON-PSD data.
    Decon = 1,
    /// Additional brain-state classification data.
    BrainState = 2,
    /// Additional workload data.
    Workload = 3,
}

/// Stream selector for timestamp retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum TimestampStream {
    Raw = 0,
    Psd = 1,
    Decon = 2,
    Classification = 3,
    Ekg = 4,
}

/// Operating mode reported by `GetCurrentSDKMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SdkMode {
    Waiting = -1,
    Normal = 0,
    Impedance = 1,
    TechnicalMonitoring = 2,
}

impl SdkMode {
    /// Decode the raw mode integer; `None` for undocumented values.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(SdkMode::Waiting),
            0 => Some(SdkMode::Normal),
            1 => Some(SdkMode::Impedance),
            2 => Some(SdkMode::TechnicalMonitoring),
            _ => None,
        }
    }
}

/// SDK error codes, reproduced verbatim from the vendor manual.
///
/// Surrounding tooling matches on these integers in saved logs, so both the
/// symbolic names and the values are load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SdkErrorCode {
    AcquisitionStopped = 100,
    NoDataArriving = 101,
    CreateMainWindowFailed = 110,
    CouldntFindDevice = 120,
    CouldntConnectDevice = 121,
    CouldntStartRealtime = 150,
    CouldntStartSaving = 151,
    CouldntStopRealtime = 170,
    CouldntLoadChannelMap = 180,
    WrongSessionType = 190,
    WrongInputSettings = 191,
    WrongFilePaths = 192,
    ClassificationInitFailed = 193,
    CouldntCloseConnection = 194,
    NotsetDeffile = 195,
    WrongDestpath = 196,
    TooLargeMissedBlock = 197,
}

impl SdkErrorCode {
    /// Look up a raw native code; `None` if it is not in the table.
    pub fn from_code(code: i32) -> Option<Self> {
        use SdkErrorCode::*;
        match code {
            100 => Some(AcquisitionStopped),
            101 => Some(NoDataArriving),
            110 => Some(CreateMainWindowFailed),
            120 => Some(CouldntFindDevice),
            121 => Some(CouldntConnectDevice),
            150 => Some(CouldntStartRealtime),
            151 => Some(CouldntStartSaving),
            170 => Some(CouldntStopRealtime),
            180 => Some(CouldntLoadChannelMap),
            190 => Some(WrongSessionType),
            191 => Some(WrongInputSettings),
            192 => Some(WrongFilePaths),
            193 => Some(ClassificationInitFailed),
            194 => Some(CouldntCloseConnection),
            195 => Some(NotsetDeffile),
            196 => Some(WrongDestpath),
            197 => Some(TooLargeMissedBlock),
            _ => None,
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(self) -> &'static str {
        use SdkErrorCode::*;
        match self {
            AcquisitionStopped => "acquisition stopped",
            NoDataArriving => "no data arriving",
            CreateMainWindowFailed => "could not create main window",
            CouldntFindDevice => "could not find device",
            CouldntConnectDevice => "could not connect device",
            CouldntStartRealtime => "could not start real-time processing",
            CouldntStartSaving => "could not start saving",
            CouldntStopRealtime => "could not stop real-time processing",
            CouldntLoadChannelMap => "could not load channel map",
            WrongSessionType => "wrong session type",
            WrongInputSettings => "wrong input settings",
            WrongFilePaths => "wrong file paths",
            ClassificationInitFailed => "classification init failed",
            CouldntCloseConnection => "could not close connection",
            NotsetDeffile => "definition file not set",
            WrongDestpath => "wrong destination path",
            TooLargeMissedBlock => "too large missed block",
        }
    }
}
