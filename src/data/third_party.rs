// src/data/third_party.rs
//! Third-party packet stream parsing
//!
//! Data from external instruments routed through the multi-channel receiver
//! arrives as a byte stream of variable-length packets:
//!
//! ```text
//! flag        2 bytes   0x56 0x5A
//! counter     1 byte    reserved message counter
//! timestamp   4 bytes   device (ESU) clock, high byte first
//! length      2 bytes   payload byte count, high byte first
//! type        1 byte
//! payload     `length` bytes
//! checksum    1 byte    vendor-defined, carried through unverified
//! ```

use thiserror::Error;

/// Fixed packet flag bytes.
pub const PACKET_FLAG: [u8; 2] = [0x56, 0x5A];

/// Bytes in a packet before the variable payload.
const FIXED_HEADER_LEN: usize = 10;

/// One parsed third-party packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyPacket {
    /// Reserved message counter.
    pub counter: u8,
    /// Device-clock timestamp, high byte first.
    pub timestamp: u32,
    /// Packet type discriminator.
    pub packet_type: u8,
    /// Instrument payload.
    pub payload: Vec<u8>,
    /// Trailing checksum byte, vendor-defined.
    pub checksum: u8,
}

/// Structural parse failures in a third-party stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("bad packet flag {found:02x?} at offset {offset} (expected 56 5a)")]
    BadFlag { offset: usize, found: [u8; 2] },

    #[error("truncated packet at offset {offset}: need {needed} more bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl ThirdPartyPacket {
    /// Parse a complete stream of zero or more packets.
    ///
    /// The byte count comes from the retrieval call's out-param, so a
    /// partial trailing packet is a structural error, not an expected
    /// condition.
    pub fn parse_stream(bytes: &[u8]) -> Result<Vec<ThirdPartyPacket>, PacketError> {
        let mut packets = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let remaining = &bytes[offset..];
            if remaining.len() < FIXED_HEADER_LEN {
                return Err(PacketError::Truncated {
                    offset,
                    needed: FIXED_HEADER_LEN - remaining.len(),
                    available: remaining.len(),
                });
            }

            let flag = [remaining[0], remaining[1]];
            if flag != PACKET_FLAG {
                return Err(PacketError::BadFlag { offset, found: flag });
            }

            let counter = remaining[2];
            let timestamp = u32::from_be_bytes([remaining[3], remaining[4], remaining[5], remaining[6]]);
            let payload_len = u16::from_be_bytes([remaining[7], remaining[8]]) as usize;
            let packet_type = remaining[9];

            let total = FIXED_HEADER_LEN + payload_len + 1;
            if remaining.len() < total {
                return Err(PacketError::Truncated {
                    offset,
                    needed: total - remaining.len(),
                    available: remaining.len(),
                });
            }

            let payload = remaining[FIXED_HEADER_LEN..FIXED_HEADER_LEN + payload_len].to_vec();
            let checksum = remaining[FIXED_HEADER_LEN + payload_len];

            packets.push(ThirdPartyPacket {
                counter,
                timestamp,
                packet_type,
                payload,
                checksum,
            });
            offset += total;
        }

        Ok(packets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(packet: &ThirdPartyPacket) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&PACKET_FLAG);
        bytes.push(packet.counter);
        bytes.extend_from_slice(&packet.timestamp.to_be_bytes());
        bytes.extend_from_slice(&(packet.payload.len() as u16).to_be_bytes());
        bytes.push(packet.packet_type);
        bytes.extend_from_slice(&packet.payload);
        bytes.push(packet.checksum);
        bytes
    }

    #[test]
    fn test_parse_single_packet() {
        let packet = ThirdPartyPacket {
            counter: 7,
            timestamp: 0x0102_0304,
            packet_type: 0x21,
            payload: vec![0xde, 0xad, 0xbe, 0xef],
            checksum: 0x5c,
        };
        let parsed = ThirdPartyPacket::parse_stream(&encode(&packet)).unwrap();
        assert_eq!(parsed, vec![packet]);
    }

    #[test]
    fn test_parse_back_to_back_packets() {
        let first = ThirdPartyPacket {
            counter: 0,
            timestamp: 1000,
            packet_type: 1,
            payload: vec![1, 2, 3],
            checksum: 9,
        };
        let second = ThirdPartyPacket {
            counter: 1,
            timestamp: 1004,
            packet_type: 2,
            payload: Vec::new(), // zero-length payload is legal
            checksum: 0,
        };
        let mut stream = encode(&first);
        stream.extend_from_slice(&encode(&second));

        let parsed = ThirdPartyPacket::parse_stream(&stream).unwrap();
        assert_eq!(parsed, vec![first, second]);
    }

    #[test]
    fn test_empty_stream_is_no_packets() {
        assert_eq!(ThirdPartyPacket::parse_stream(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_bad_flag_rejected_with_offset() {
        let good = encode(&ThirdPartyPacket {
            counter: 0,
            timestamp: 0,
            packet_type: 0,
            payload: vec![],
            checksum: 0,
        });
        let mut stream = good.clone();
        stream.extend_from_slice(&[0x56, 0x00]); // second flag byte wrong
        stream.extend_from_slice(&[0; 9]);

        let err = ThirdPartyPacket::parse_stream(&stream).unwrap_err();
        assert_eq!(
            err,
            PacketError::BadFlag {
                offset: good.len(),
                found: [0x56, 0x00],
            }
        );
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let packet = ThirdPartyPacket {
            counter: 3,
            timestamp: 42,
            packet_type: 5,
            payload: vec![0; 16],
            checksum: 1,
        };
        let mut stream = encode(&packet);
        stream.truncate(stream.len() - 4);

        let err = ThirdPartyPacket::parse_stream(&stream).unwrap_err();
        assert!(matches!(err, PacketError::Truncated { offset: 0, .. }));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let err = ThirdPartyPacket::parse_stream(&[0x56, 0x5A, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            PacketError::Truncated {
                offset: 0,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_timestamp_is_high_byte_first() {
        let packet = ThirdPartyPacket {
            counter: 0,
            timestamp: 0x0000_0100, // 256: third byte from the top
            packet_type: 0,
            payload: vec![],
            checksum: 0,
        };
        let bytes = encode(&packet);
        assert_eq!(&bytes[3..7], &[0x00, 0x00, 0x01, 0x00]);
        let parsed = ThirdPartyPacket::parse_stream(&bytes).unwrap();
        assert_eq!(parsed[0].timestamp, 256);
    }
}
