// src/ffi/types.rs
//! Native record layouts
//!
//! Field order and sizes are fixed by the vendor and must not be altered;
//! the decode step reads these structs straight out of library-owned memory.

use std::ffi::c_char;
use std::os::raw::c_int;

/// Length of the fixed device name buffer.
pub const DEVICE_NAME_LEN: usize = 256;

/// Length of the fixed device identifier buffer (the platform MAX_PATH).
pub const DEVICE_ID_LEN: usize = 260;

/// Device descriptor as laid out by the native library.
///
/// Returned by pointer from the device query; the library keeps its own
/// copy, so the wrapper decodes into owned types immediately and never
/// holds on to the pointer.
#[repr(C)]
pub struct DeviceInfoRecord {
    /// Device serial/type, NUL-terminated within the buffer.
    pub device_name: [c_char; DEVICE_NAME_LEN],
    /// COM port number.
    pub comm_port: c_int,
    /// Position of the EKG channel (0 = first channel).
    pub ecg_position: c_int,
    /// Number of physiological channels; -1 means no device attached.
    pub channel_count: c_int,
    /// Receiver type (1 = single-channel ESU, 0 = multi-channel ESU).
    pub esu_type: c_int,
    /// Timestamp source (1 = system time, 0 = ESU time).
    pub timestamp_type: c_int,
    /// Reserved by the vendor.
    pub device_handle: c_int,
    /// Reserved device identifier buffer.
    pub device_id: [c_char; DEVICE_ID_LEN],
}

/// Decode a fixed NUL-terminated `c_char` buffer into an owned string.
///
/// Bytes past the first NUL are vendor scratch and are ignored. Non-UTF-8
/// content is replaced rather than rejected; device names are diagnostic
/// strings, not data.
pub(crate) fn fixed_buffer_to_string(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer
        .iter()
        .map(|&c| c as u8)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, offset_of, size_of};

    // The native decode is a straight memory read, so the Rust layout has to
    // match the vendor header byte for byte.
    #[test]
    fn test_device_record_field_offsets() {
        assert_eq!(offset_of!(DeviceInfoRecord, device_name), 0);
        assert_eq!(offset_of!(DeviceInfoRecord, comm_port), 256);
        assert_eq!(offset_of!(DeviceInfoRecord, ecg_position), 260);
        assert_eq!(offset_of!(DeviceInfoRecord, channel_count), 264);
        assert_eq!(offset_of!(DeviceInfoRecord, esu_type), 268);
        assert_eq!(offset_of!(DeviceInfoRecord, timestamp_type), 272);
        assert_eq!(offset_of!(DeviceInfoRecord, device_handle), 276);
        assert_eq!(offset_of!(DeviceInfoRecord, device_id), 280);
    }

    #[test]
    fn test_device_record_size_and_alignment() {
        assert_eq!(size_of::<DeviceInfoRecord>(), 540);
        assert_eq!(align_of::<DeviceInfoRecord>(), align_of::<c_int>());
    }

    #[test]
    fn test_fixed_buffer_decode_stops_at_nul() {
        let mut buffer = [0 as c_char; DEVICE_NAME_LEN];
        for (i, b) in b"X24-0042".iter().enumerate() {
            buffer[i] = *b as c_char;
        }
        // Trailing garbage after the terminator must not leak through.
        buffer[20] = b'!' as c_char;
        assert_eq!(fixed_buffer_to_string(&buffer), "X24-0042");
    }

    #[test]
    fn test_fixed_buffer_decode_empty() {
        let buffer = [0 as c_char; DEVICE_ID_LEN];
        assert_eq!(fixed_buffer_to_string(&buffer), "");
    }
}
