// src/data/timestamps.rs
//! Timestamp byte-stream decoding
//!
//! The native timestamp call returns raw bytes with no length: 4 bytes per
//! sample, high byte first. The number of valid bytes is bounded by the
//! sample count from the matching data-retrieval call, which the wrapper
//! takes as an explicit argument.

/// Bytes per timestamp group.
pub const TIMESTAMP_WIDTH: usize = 4;

/// One 4-byte timestamp group, high byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp([u8; TIMESTAMP_WIDTH]);

impl Timestamp {
    pub fn new(bytes: [u8; TIMESTAMP_WIDTH]) -> Self {
        Self(bytes)
    }

    /// The raw bytes, in stream order.
    pub fn bytes(&self) -> [u8; TIMESTAMP_WIDTH] {
        self.0
    }

    /// Millisecond value:
    /// `b0 * 2^24 + b1 * 2^16 + b2 * 2^8 + b3`.
    pub fn millis(&self) -> u64 {
        u32::from_be_bytes(self.0) as u64
    }

    /// Dotted hex rendering used by the timestamps output file, one
    /// two-digit group per byte with a trailing separator: `aa.bb.cc.dd.`
    pub fn dotted_hex(&self) -> String {
        let [b0, b1, b2, b3] = self.0;
        format!("{b0:02x}.{b1:02x}.{b2:02x}.{b3:02x}.")
    }
}

/// An owned run of timestamp groups copied out of the native stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampBlock {
    bytes: Vec<u8>,
}

impl TimestampBlock {
    /// Build a block from copied stream bytes.
    ///
    /// The wrapper always copies `4 * sample_count` bytes, so the length is
    /// a whole number of groups by construction.
    pub fn new(bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len() % TIMESTAMP_WIDTH, 0);
        Self { bytes }
    }

    /// Number of timestamp groups.
    pub fn len(&self) -> usize {
        self.bytes.len() / TIMESTAMP_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// One group, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Timestamp> {
        let start = index.checked_mul(TIMESTAMP_WIDTH)?;
        let end = start.checked_add(TIMESTAMP_WIDTH)?;
        let chunk = self.bytes.get(start..end)?;
        let mut group = [0u8; TIMESTAMP_WIDTH];
        group.copy_from_slice(chunk);
        Some(Timestamp(group))
    }

    /// Iterate over the groups in stream order.
    pub fn iter(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.bytes.chunks_exact(TIMESTAMP_WIDTH).map(|chunk| {
            let mut group = [0u8; TIMESTAMP_WIDTH];
            group.copy_from_slice(chunk);
            Timestamp(group)
        })
    }

    /// The copied bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_millis_documented_vectors() {
        assert_eq!(Timestamp::new([0, 0, 0, 0]).millis(), 0);
        assert_eq!(Timestamp::new([0, 0, 1, 0]).millis(), 256);
        assert_eq!(Timestamp::new([1, 0, 0, 0]).millis(), 16_777_216);
    }

    #[test]
    fn test_millis_mixed_bytes() {
        assert_eq!(
            Timestamp::new([0x01, 0x02, 0x03, 0x04]).millis(),
            16_777_216 + 2 * 65_536 + 3 * 256 + 4
        );
        assert_eq!(
            Timestamp::new([0xff, 0xff, 0xff, 0xff]).millis(),
            u32::MAX as u64
        );
    }

    #[test]
    fn test_dotted_hex_format() {
        assert_eq!(
            Timestamp::new([0x0a, 0xff, 0x00, 0x3c]).dotted_hex(),
            "0a.ff.00.3c."
        );
    }

    #[test]
    fn test_block_grouping() {
        let block = TimestampBlock::new(vec![0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 1, 0]);
        assert_eq!(block.len(), 3);
        assert_eq!(block.get(0).unwrap().millis(), 1);
        assert_eq!(block.get(1).unwrap().millis(), 2);
        assert_eq!(block.get(2).unwrap().millis(), 256);
        assert!(block.get(3).is_none());

        let all: Vec<u64> = block.iter().map(|t| t.millis()).collect();
        assert_eq!(all, vec![1, 2, 256]);
    }

    #[test]
    fn test_empty_block() {
        let block = TimestampBlock::new(Vec::new());
        assert!(block.is_empty());
        assert_eq!(block.iter().count(), 0);
    }

    proptest! {
        // The weighted-sum definition from the vendor manual must agree
        // with the big-endian decode for every byte combination.
        #[test]
        fn prop_millis_matches_weighted_sum(b0: u8, b1: u8, b2: u8, b3: u8) {
            let expected = (b0 as u64) * (1 << 24)
                + (b1 as u64) * (1 << 16)
                + (b2 as u64) * (1 << 8)
                + b3 as u64;
            prop_assert_eq!(Timestamp::new([b0, b1, b2, b3]).millis(), expected);
        }

        #[test]
        fn prop_block_exposes_exactly_its_groups(groups in prop::collection::vec(any::<[u8; 4]>(), 0..64)) {
            let bytes: Vec<u8> = groups.iter().flatten().copied().collect();
            let block = TimestampBlock::new(bytes);
            prop_assert_eq!(block.len(), groups.len());
            for (i, group) in groups.iter().enumerate() {
                prop_assert_eq!(block.get(i).unwrap().bytes(), *group);
            }
            prop_assert!(block.get(groups.len()).is_none());
        }
    }
}
