// mod.rs - Recording loaders

pub mod binary;
pub mod csv;

pub use self::binary::{split_at_markers, BinaryRecordingDecoder, RecordIter, RecordingConfig};
pub use self::csv::DelimitedWaveformReader;
