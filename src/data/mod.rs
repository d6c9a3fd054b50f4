// src/data/mod.rs
//! Owned, bounded views over decoded SDK buffers
//!
//! Everything handed out by the safe wrapper is copied out of library-owned
//! memory and carries its own length, so no raw pointer/length pair ever
//! reaches a call site.

pub mod channels;
pub mod sample_block;
pub mod third_party;
pub mod timestamps;

pub use channels::{samples_file_header, HEADER_LABELS, X24_CHANNEL_LABELS};
pub use sample_block::{SampleBlock, SampleRow, HEADER_FIELDS};
pub use third_party::{ThirdPartyPacket, PacketError, PACKET_FLAG};
pub use timestamps::{Timestamp, TimestampBlock, TIMESTAMP_WIDTH};
