// src/data/sample_block.rs
//! Decoded acquisition buffers
//!
//! The native data calls return `(channel_count + 6) * count` floats laid
//! out row-major: six header fields, then one value per channel. The block
//! owns its storage; the library-side buffer is reused by the next
//! retrieval call and must never be referenced after the wrapper returns.

use crate::data::channels::HEADER_LABELS;

/// Number of leading per-sample header fields
/// (Epoch, Offset, Hour, Min, Sec, mSec).
pub const HEADER_FIELDS: usize = 6;

/// An owned block of samples with a fixed row width.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBlock {
    channel_count: usize,
    values: Vec<f32>,
}

impl SampleBlock {
    /// Build a block from decoded values.
    ///
    /// `values.len()` must be a whole number of rows of width
    /// `channel_count + HEADER_FIELDS`; the wrapper guarantees this by
    /// construction, and test data must uphold it.
    pub fn new(channel_count: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(
            values.len() % (channel_count + HEADER_FIELDS),
            0,
            "sample buffer length must be a multiple of the row width"
        );
        Self {
            channel_count,
            values,
        }
    }

    /// An empty block (a poll that returned zero samples).
    pub fn empty(channel_count: usize) -> Self {
        Self::new(channel_count, Vec::new())
    }

    /// Physiological channels per row.
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Values per row: header fields plus channels.
    pub fn row_width(&self) -> usize {
        self.channel_count + HEADER_FIELDS
    }

    /// Number of sample rows in the block.
    pub fn len(&self) -> usize {
        if self.values.is_empty() {
            0
        } else {
            self.values.len() / self.row_width()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every decoded value, row-major. Exactly
    /// `(channel_count + HEADER_FIELDS) * len()` elements.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// One sample row, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<SampleRow<'_>> {
        let width = self.row_width();
        let start = index.checked_mul(width)?;
        let end = start.checked_add(width)?;
        self.values.get(start..end).map(SampleRow)
    }

    /// Iterate over sample rows.
    pub fn rows(&self) -> impl Iterator<Item = SampleRow<'_>> {
        self.values.chunks_exact(self.row_width()).map(SampleRow)
    }
}

/// A borrowed view of one sample row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRow<'a>(&'a [f32]);

impl<'a> SampleRow<'a> {
    pub fn epoch(&self) -> f32 {
        self.0[0]
    }

    pub fn offset(&self) -> f32 {
        self.0[1]
    }

    pub fn hour(&self) -> f32 {
        self.0[2]
    }

    pub fn minute(&self) -> f32 {
        self.0[3]
    }

    pub fn second(&self) -> f32 {
        self.0[4]
    }

    pub fn millisecond(&self) -> f32 {
        self.0[5]
    }

    /// The per-channel values, without the header fields.
    pub fn channels(&self) -> &'a [f32] {
        &self.0[HEADER_FIELDS..]
    }

    /// The full row: header fields then channels.
    pub fn values(&self) -> &'a [f32] {
        self.0
    }
}

// Compile-time tie between the header-field count and the label table.
const _: () = assert!(HEADER_LABELS.len() == HEADER_FIELDS);

#[cfg(test)]
mod tests {
    use super::*;

    fn block_2ch_3rows() -> SampleBlock {
        // 2 channels -> 8 columns per row, 3 rows -> 24 values.
        let mut values = Vec::with_capacity(24);
        for row in 0..3 {
            values.extend_from_slice(&[
                row as f32,        // epoch
                0.5,               // offset
                13.0,              // hour
                37.0,              // min
                2.0,               // sec
                125.0,             // msec
                0.1 * row as f32,  // ch 1
                -0.1 * row as f32, // ch 2
            ]);
        }
        SampleBlock::new(2, values)
    }

    #[test]
    fn test_block_shape() {
        let block = block_2ch_3rows();
        assert_eq!(block.channel_count(), 2);
        assert_eq!(block.row_width(), 8);
        assert_eq!(block.len(), 3);
        assert_eq!(block.values().len(), 24);
    }

    #[test]
    fn test_row_accessors() {
        let block = block_2ch_3rows();
        let row = block.row(1).unwrap();
        assert_eq!(row.epoch(), 1.0);
        assert_eq!(row.offset(), 0.5);
        assert_eq!(row.hour(), 13.0);
        assert_eq!(row.minute(), 37.0);
        assert_eq!(row.second(), 2.0);
        assert_eq!(row.millisecond(), 125.0);
        assert_eq!(row.channels(), &[0.1, -0.1]);
    }

    #[test]
    fn test_row_out_of_bounds_is_none() {
        let block = block_2ch_3rows();
        assert!(block.row(3).is_none());
        assert!(block.row(usize::MAX).is_none());
    }

    #[test]
    fn test_rows_iterator_is_bounded() {
        let block = block_2ch_3rows();
        let rows: Vec<_> = block.rows().collect();
        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(row.values().len(), 8);
        }
    }

    #[test]
    fn test_empty_block() {
        let block = SampleBlock::empty(24);
        assert!(block.is_empty());
        assert_eq!(block.len(), 0);
        assert_eq!(block.rows().count(), 0);
    }
}
