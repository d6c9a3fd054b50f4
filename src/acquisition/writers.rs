// src/acquisition/writers.rs
//! Text-file output for recorded samples and timestamps
//!
//! Two files per session: a samples file with one comma-separated row per
//! sample under a fixed channel-label header, and a timestamps file with
//! one row per 4-byte timestamp group giving its dotted hex bytes and the
//! computed millisecond value. Downstream tooling parses both headers
//! verbatim.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::data::{samples_file_header, SampleBlock, TimestampBlock};

/// Header row of the timestamps file.
pub const TIMESTAMPS_FILE_HEADER: &str = "Hexidecimal, Milliseconds";

/// Writer for the per-sample values file.
pub struct SampleFileWriter {
    out: BufWriter<File>,
}

impl SampleFileWriter {
    /// Create the file and write the channel-label header row.
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{}", samples_file_header())?;
        Ok(Self { out })
    }

    /// Append one row per sample; returns the number of rows written.
    pub fn write_block(&mut self, block: &SampleBlock) -> io::Result<usize> {
        for row in block.rows() {
            let mut first = true;
            for value in row.values() {
                if first {
                    first = false;
                } else {
                    self.out.write_all(b", ")?;
                }
                write!(self.out, "{value}")?;
            }
            self.out.write_all(b"\n")?;
        }
        Ok(block.len())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Writer for the timestamps file.
pub struct TimestampFileWriter {
    out: BufWriter<File>,
}

impl TimestampFileWriter {
    /// Create the file and write the header row.
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{TIMESTAMPS_FILE_HEADER}")?;
        Ok(Self { out })
    }

    /// Append one row per timestamp group; returns the number of rows
    /// written.
    pub fn write_block(&mut self, block: &TimestampBlock) -> io::Result<usize> {
        for timestamp in block.iter() {
            writeln!(self.out, "{}, {}", timestamp.dotted_hex(), timestamp.millis())?;
        }
        Ok(block.len())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_samples_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.txt");

        let block = SampleBlock::new(
            2,
            vec![
                1.0, 0.0, 13.0, 5.0, 2.0, 125.0, 0.5, -0.5, //
                2.0, 0.0, 13.0, 5.0, 2.0, 250.0, 1.5, -1.5,
            ],
        );
        let mut writer = SampleFileWriter::create(&path).unwrap();
        assert_eq!(writer.write_block(&block).unwrap(), 2);
        writer.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Epoch, Offset, Hour, Min, Sec, mSec, F3, F1, Fz, F2, F4, C3, C1, Cz, C2, C4, CPz, \
             P3, P1, Pz, P2, P4, POz, O1, Oz, O2, EKG, AUX1, AUX2, AUX3"
        );
        assert_eq!(lines.next().unwrap(), "1, 0, 13, 5, 2, 125, 0.5, -0.5");
        assert_eq!(lines.next().unwrap(), "2, 0, 13, 5, 2, 250, 1.5, -1.5");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_timestamps_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ts.txt");

        let block = TimestampBlock::new(vec![0, 0, 1, 0, 0x0a, 0xff, 0x00, 0x3c]);
        let mut writer = TimestampFileWriter::create(&path).unwrap();
        assert_eq!(writer.write_block(&block).unwrap(), 2);
        writer.flush().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "Hexidecimal, Milliseconds");
        assert_eq!(lines.next().unwrap(), "00.00.01.00., 256");
        assert_eq!(lines.next().unwrap(), "0a.ff.00.3c., 184483900");
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_blocks_write_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let mut samples = SampleFileWriter::create(&dir.path().join("s.txt")).unwrap();
        assert_eq!(samples.write_block(&SampleBlock::empty(24)).unwrap(), 0);

        let mut timestamps = TimestampFileWriter::create(&dir.path().join("t.txt")).unwrap();
        assert_eq!(
            timestamps.write_block(&TimestampBlock::new(Vec::new())).unwrap(),
            0
        );
    }
}
