// src/data/channels.rs
//! Channel label tables for the samples output file

/// Labels for the six per-sample header fields, in column order.
pub const HEADER_LABELS: [&str; 6] = ["Epoch", "Offset", "Hour", "Min", "Sec", "mSec"];

/// Channel labels for the 24-channel headset, in acquisition order:
/// twenty EEG sites, the EKG channel, and three auxiliary inputs.
pub const X24_CHANNEL_LABELS: [&str; 24] = [
    "F3", "F1", "Fz", "F2", "F4", "C3", "C1", "Cz", "C2", "C4", "CPz", "P3", "P1", "Pz", "P2",
    "P4", "POz", "O1", "Oz", "O2", "EKG", "AUX1", "AUX2", "AUX3",
];

/// Header row for the samples file: the six header fields followed by every
/// channel label, comma-separated.
pub fn samples_file_header() -> String {
    let mut columns: Vec<&str> = Vec::with_capacity(HEADER_LABELS.len() + X24_CHANNEL_LABELS.len());
    columns.extend_from_slice(&HEADER_LABELS);
    columns.extend_from_slice(&X24_CHANNEL_LABELS);
    columns.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matches_recorded_file_format() {
        // Existing analysis tooling keys on this exact header row.
        assert_eq!(
            samples_file_header(),
            "Epoch, Offset, Hour, Min, Sec, mSec, F3, F1, Fz, F2, F4, C3, C1, Cz, C2, C4, CPz, \
             P3, P1, Pz, P2, P4, POz, O1, Oz, O2, EKG, AUX1, AUX2, AUX3"
        );
    }

    #[test]
    fn test_x24_channel_count() {
        assert_eq!(X24_CHANNEL_LABELS.len(), 24);
        // EKG sits after the EEG sites, before the auxiliary inputs.
        assert_eq!(X24_CHANNEL_LABELS[20], "EKG");
    }
}
