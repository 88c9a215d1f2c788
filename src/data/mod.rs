// mod.rs - Data structures module

pub mod loaders;
pub mod matrix;
pub mod waveform;

// Re-export main types for convenience
pub use loaders::{BinaryRecordingDecoder, DelimitedWaveformReader, RecordingConfig};
pub use matrix::{MarkerSequence, SampleMatrix};
pub use waveform::Waveform;
