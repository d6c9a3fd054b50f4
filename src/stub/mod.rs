// src/stub/mod.rs
//! In-process stand-in for the native SDK
//!
//! A complete implementation of the exported symbol table backed by
//! process-global state, in the same spirit as a simulated device driver:
//! the test suite scripts it to exercise marshalling and status handling,
//! and the recorder can run against it when no hardware is attached.
//!
//! The native SDK is a process-wide singleton, so the stub is one too.
//! Tests that touch it must be serialized (`#[serial]`); each one starts
//! from [`StubScript::reset`].

use std::collections::VecDeque;
use std::ffi::{c_char, CStr};
use std::os::raw::c_int;
use std::sync::OnceLock;

use parking_lot::Mutex;
use rand::Rng;

use crate::ffi::types::{DeviceInfoRecord, DEVICE_ID_LEN, DEVICE_NAME_LEN};
use crate::ffi::SdkSymbols;
use crate::sdk::codes::{NO_DEVICE_SENTINEL, STATUS_OK};

/// Streams with their own sample buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStream {
    Raw,
    Filtered,
    Decon,
}

#[derive(Default)]
struct StreamBuf {
    values: Vec<f32>,
    count: i32,
}

struct Synthetic {
    channel_count: usize,
    rows_per_poll: usize,
    epoch: u32,
}

struct StubState {
    device_name: String,
    device_channels: i32,
    destination_result: i32,
    last_destination: Option<String>,
    init_results: VecDeque<i32>,
    last_init_args: Option<(i32, i32, i32)>,
    last_play_byte: Option<u8>,
    start_result: i32,
    pause_result: i32,
    resume_result: i32,
    stop_result: i32,
    streams: [StreamBuf; 3],
    timestamp_bytes: Vec<u8>,
    last_timestamp_stream: Option<i32>,
    third_party: Vec<u8>,
    third_party_count: Option<i32>,
    mode: i32,
    calls: Vec<(&'static str, usize)>,
    synthetic: Option<Synthetic>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            device_name: "X24-STUB".into(),
            device_channels: 24,
            destination_result: STATUS_OK,
            last_destination: None,
            init_results: VecDeque::new(),
            last_init_args: None,
            last_play_byte: None,
            start_result: STATUS_OK,
            pause_result: STATUS_OK,
            resume_result: STATUS_OK,
            stop_result: STATUS_OK,
            streams: Default::default(),
            timestamp_bytes: Vec::new(),
            last_timestamp_stream: None,
            third_party: Vec::new(),
            third_party_count: None,
            mode: 0,
            calls: Vec::new(),
            synthetic: None,
        }
    }
}

fn state() -> &'static Mutex<StubState> {
    static STATE: OnceLock<Mutex<StubState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(StubState::default()))
}

// The device-query export returns a pointer the caller reads after the call
// returns, so the record lives in its own static slot.
fn record_slot() -> &'static Mutex<DeviceInfoRecord> {
    static RECORD: OnceLock<Mutex<DeviceInfoRecord>> = OnceLock::new();
    RECORD.get_or_init(|| Mutex::new(empty_record()))
}

fn empty_record() -> DeviceInfoRecord {
    DeviceInfoRecord {
        device_name: [0; DEVICE_NAME_LEN],
        comm_port: 0,
        ecg_position: 0,
        channel_count: 0,
        esu_type: 0,
        timestamp_type: 0,
        device_handle: 0,
        device_id: [0; DEVICE_ID_LEN],
    }
}

fn bump(name: &'static str) {
    let mut guard = state().lock();
    if let Some(entry) = guard.calls.iter_mut().find(|(n, _)| *n == name) {
        entry.1 += 1;
    } else {
        guard.calls.push((name, 1));
    }
}

fn stream_index(stream: DataStream) -> usize {
    match stream {
        DataStream::Raw => 0,
        DataStream::Filtered => 1,
        DataStream::Decon => 2,
    }
}

/// Scripting handle for the stub.
///
/// Zero-sized; every method operates on the process-global stub state.
pub struct StubScript(());

impl StubScript {
    /// Reset the stub to its defaults (24-channel device present, every
    /// command succeeding, all buffers empty) and return the handle.
    pub fn reset() -> Self {
        *state().lock() = StubState::default();
        StubScript(())
    }

    /// Present a device with the given name and channel count.
    pub fn set_device(&self, name: &str, channel_count: i32) {
        let mut guard = state().lock();
        guard.device_name = name.into();
        guard.device_channels = channel_count;
    }

    /// Report the no-device sentinel from the device query.
    pub fn set_device_absent(&self) {
        state().lock().device_channels = NO_DEVICE_SENTINEL;
    }

    /// Status returned by the destination-file call.
    pub fn set_destination_result(&self, code: i32) {
        state().lock().destination_result = code;
    }

    /// The last destination path the native side received.
    pub fn last_destination(&self) -> Option<String> {
        state().lock().last_destination.clone()
    }

    /// Queue init-session results, consumed one per call; once the queue is
    /// empty, init succeeds.
    pub fn queue_init_results(&self, codes: &[i32]) {
        state().lock().init_results.extend(codes.iter().copied());
    }

    /// Arguments of the last init-session call (device, session, handle).
    pub fn last_init_args(&self) -> Option<(i32, i32, i32)> {
        state().lock().last_init_args
    }

    /// The play-recorded flag byte exactly as it crossed the boundary.
    pub fn last_play_byte(&self) -> Option<u8> {
        state().lock().last_play_byte
    }

    pub fn set_start_result(&self, code: i32) {
        state().lock().start_result = code;
    }

    pub fn set_pause_result(&self, code: i32) {
        state().lock().pause_result = code;
    }

    pub fn set_resume_result(&self, code: i32) {
        state().lock().resume_result = code;
    }

    pub fn set_stop_result(&self, code: i32) {
        state().lock().stop_result = code;
    }

    /// Buffer and out-param count for one data stream. The buffer may be
    /// longer than `(channels + 6) * count`; the wrapper must not read the
    /// excess.
    pub fn set_samples(&self, stream: DataStream, values: Vec<f32>, count: i32) {
        let mut guard = state().lock();
        guard.streams[stream_index(stream)] = StreamBuf { values, count };
    }

    /// Bytes returned by the timestamp-stream call.
    pub fn set_timestamp_bytes(&self, bytes: Vec<u8>) {
        state().lock().timestamp_bytes = bytes;
    }

    /// The stream selector of the last timestamp call.
    pub fn last_timestamp_stream(&self) -> Option<i32> {
        state().lock().last_timestamp_stream
    }

    /// Third-party stream content.
    pub fn set_third_party(&self, bytes: Vec<u8>) {
        state().lock().third_party = bytes;
    }

    /// Override the third-party byte count out-param (for error codes).
    pub fn set_third_party_count(&self, count: i32) {
        state().lock().third_party_count = Some(count);
    }

    /// Mode integer returned by the mode query.
    pub fn set_mode(&self, mode: i32) {
        state().lock().mode = mode;
    }

    /// How many times a native export was called since the last reset.
    pub fn calls(&self, name: &str) -> usize {
        state()
            .lock()
            .calls
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Synthesize plausible raw data on every poll: `rows_per_poll` rows of
    /// noise across `channel_count` channels, with matching timestamps.
    /// Lets the recorder run a full session with no hardware attached.
    pub fn enable_synthetic(&self, channel_count: usize, rows_per_poll: usize) {
        let mut guard = state().lock();
        guard.device_channels = channel_count as i32;
        guard.synthetic = Some(Synthetic {
            channel_count,
            rows_per_poll,
            epoch: 0,
        });
    }
}

fn synthesize_poll(state: &mut StubState) {
    let Some(synth) = state.synthetic.as_mut() else {
        return;
    };
    let rows = synth.rows_per_poll;
    let width = synth.channel_count + 6;
    let mut rng = rand::thread_rng();

    let mut values = Vec::with_capacity(rows * width);
    let mut ts = Vec::with_capacity(rows * 4);
    for row in 0..rows {
        let epoch = synth.epoch;
        let millis = epoch as u64 * 1000 / rows.max(1) as u64 + row as u64;
        values.push(epoch as f32);
        values.push(row as f32);
        values.push(((millis / 3_600_000) % 24) as f32);
        values.push(((millis / 60_000) % 60) as f32);
        values.push(((millis / 1000) % 60) as f32);
        values.push((millis % 1000) as f32);
        for _ in 0..synth.channel_count {
            values.push(rng.gen_range(-50.0..50.0));
        }
        ts.extend_from_slice(&(millis as u32).to_be_bytes());
    }
    synth.epoch += 1;

    state.streams[0] = StreamBuf {
        values,
        count: rows as i32,
    };
    state.timestamp_bytes = ts;
}

// ---------------------------------------------------------------------------
// The exported surface. Signatures mirror src/ffi/symbols.rs exactly; the
// calling convention is part of what the tests exercise.
// ---------------------------------------------------------------------------

unsafe extern "system" fn stub_get_device_info() -> *mut DeviceInfoRecord {
    bump("GetDeviceInfo");
    let guard = state().lock();
    let mut record = record_slot().lock();
    *record = empty_record();
    for (i, b) in guard.device_name.bytes().take(DEVICE_NAME_LEN - 1).enumerate() {
        record.device_name[i] = b as c_char;
    }
    record.comm_port = 7;
    record.ecg_position = 20;
    record.channel_count = guard.device_channels;
    record.esu_type = 0;
    record.timestamp_type = 0;
    record.device_handle = -1;
    &mut *record as *mut DeviceInfoRecord
}

unsafe extern "system" fn stub_set_destination_file(path: *const c_char) -> c_int {
    bump("SetDestinationFile");
    let mut guard = state().lock();
    if !path.is_null() {
        guard.last_destination = Some(CStr::from_ptr(path).to_string_lossy().into_owned());
    }
    guard.destination_result
}

unsafe extern "system" fn stub_init_session(
    device: c_int,
    session: c_int,
    handle: c_int,
    play_recorded: bool,
) -> c_int {
    bump("InitSession");
    let mut guard = state().lock();
    guard.last_init_args = Some((device, session, handle));
    guard.last_play_byte = Some(play_recorded as u8);
    guard.init_results.pop_front().unwrap_or(STATUS_OK)
}

unsafe extern "system" fn stub_start_acquisition() -> c_int {
    bump("StartAcquisition");
    state().lock().start_result
}

unsafe extern "system" fn stub_pause_acquisition() -> c_int {
    bump("PauseAcquisition");
    state().lock().pause_result
}

unsafe extern "system" fn stub_resume_acquisition() -> c_int {
    bump("ResumeAcquisition");
    state().lock().resume_result
}

unsafe extern "system" fn stub_stop_acquisition() -> c_int {
    bump("StopAcquisition");
    state().lock().stop_result
}

unsafe fn fetch_stream(index: usize, count_out: *mut c_int) -> *const f32 {
    let mut guard = state().lock();
    if index == 0 {
        synthesize_poll(&mut guard);
    }
    let buf = &guard.streams[index];
    *count_out = buf.count;
    if buf.values.is_empty() {
        std::ptr::null()
    } else {
        buf.values.as_ptr()
    }
}

unsafe extern "system" fn stub_get_raw_data(count_out: *mut c_int) -> *const f32 {
    bump("GetRawData");
    fetch_stream(0, count_out)
}

unsafe extern "system" fn stub_get_filtered_data(count_out: *mut c_int) -> *const f32 {
    bump("GetFilteredData");
    fetch_stream(1, count_out)
}

unsafe extern "system" fn stub_get_decon_data(count_out: *mut c_int) -> *const f32 {
    bump("GetDeconData");
    fetch_stream(2, count_out)
}

unsafe extern "system" fn stub_get_timestamps(stream: c_int) -> *const u8 {
    bump("GetTimeStampsStreamData");
    let mut guard = state().lock();
    guard.last_timestamp_stream = Some(stream);
    if guard.timestamp_bytes.is_empty() {
        std::ptr::null()
    } else {
        guard.timestamp_bytes.as_ptr()
    }
}

unsafe extern "system" fn stub_get_sdk_mode() -> c_int {
    bump("GetCurrentSDKMode");
    state().lock().mode
}

unsafe extern "system" fn stub_get_third_party(count_out: *mut c_int) -> *const u8 {
    bump("GetThirdPartyData");
    let guard = state().lock();
    *count_out = guard
        .third_party_count
        .unwrap_or(guard.third_party.len() as i32);
    if guard.third_party.is_empty() {
        std::ptr::null()
    } else {
        guard.third_party.as_ptr()
    }
}

/// The stub's symbol table, shaped exactly like the loaded library's.
pub fn symbols() -> SdkSymbols {
    SdkSymbols {
        get_device_info: stub_get_device_info,
        set_destination_file: stub_set_destination_file,
        init_session: stub_init_session,
        start_acquisition: stub_start_acquisition,
        pause_acquisition: stub_pause_acquisition,
        resume_acquisition: stub_resume_acquisition,
        stop_acquisition: stub_stop_acquisition,
        get_raw_data: stub_get_raw_data,
        get_filtered_data: stub_get_filtered_data,
        get_decon_data: stub_get_decon_data,
        get_timestamps_stream_data: stub_get_timestamps,
        get_current_sdk_mode: stub_get_sdk_mode,
        get_third_party_data: stub_get_third_party,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_reset_restores_defaults() {
        let script = StubScript::reset();
        script.set_device_absent();
        script.set_mode(2);

        let script = StubScript::reset();
        let mut count = 0;
        unsafe {
            let record = &*stub_get_device_info();
            assert_eq!(record.channel_count, 24);
            assert_eq!(stub_get_sdk_mode(), 0);
            let ptr = stub_get_raw_data(&mut count);
            assert!(ptr.is_null());
        }
        assert_eq!(count, 0);
        assert_eq!(script.calls("GetDeviceInfo"), 1);
    }

    #[test]
    #[serial]
    fn test_init_queue_drains_then_succeeds() {
        let script = StubScript::reset();
        script.queue_init_results(&[0, 0]);
        unsafe {
            assert_eq!(stub_init_session(5, 0, -1, false), 0);
            assert_eq!(stub_init_session(5, 0, -1, false), 0);
            assert_eq!(stub_init_session(5, 0, -1, false), STATUS_OK);
        }
        assert_eq!(script.calls("InitSession"), 3);
        assert_eq!(script.last_init_args(), Some((5, 0, -1)));
    }

    #[test]
    #[serial]
    fn test_synthetic_poll_shapes_buffers() {
        let script = StubScript::reset();
        script.enable_synthetic(4, 8);

        let mut count = 0;
        let ptr = unsafe { stub_get_raw_data(&mut count) };
        assert_eq!(count, 8);
        assert!(!ptr.is_null());

        let guard = state().lock();
        assert_eq!(guard.streams[0].values.len(), 8 * (4 + 6));
        assert_eq!(guard.timestamp_bytes.len(), 8 * 4);
    }
}
