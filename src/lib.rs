// lib.rs - wavealign library root

//! # wavealign - temporal alignment of physiological waveform recordings
//!
//! Aligns a single-lead candidate recording against a multi-lead reference ECG
//! captured over an overlapping but unsynchronized time span, and reports how
//! confident the alignment is.
//!
//! ## Pipeline
//!
//! - **Decode**: fixed-width little-endian multi-lead recordings and marker files,
//!   or single-column delimited text files
//! - **Resample**: per-lead linear interpolation to a common rate
//! - **Debias**: per-lead mean removal
//! - **Search**: bounded sliding dot-product offset search with optional
//!   half-max amplitude blanking
//! - **Assess**: competitor-peak quality fraction and verdict
//! - **Extract**: offset-corrected aligned segments and Pearson goodness of fit
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use wavealign::prelude::*;
//!
//! let decoder = BinaryRecordingDecoder::new(RecordingConfig::default())?;
//! let source = BinaryRecordingSource::new(decoder, "session01", Some(0), 0);
//!
//! let candidate = DelimitedWaveformReader::new(512.0)
//!     .read_waveform(std::path::Path::new("session01.eb"))?;
//!
//! let outcome = align(&source, &candidate, &AlignConfig::for_mode(PipelineMode::Binary))?;
//! println!(
//!     "offset {} quality {:.3} ({})",
//!     outcome.result.best_offset,
//!     outcome.result.quality.fraction,
//!     outcome.result.quality.verdict.description()
//! );
//! # Ok::<(), wavealign::AlignError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::core::{align, AlignConfig, AlignmentOutcome, PipelineMode};
    pub use crate::core::{assess_quality, correlate, search, SearchOptions};
    pub use crate::core::{debias, extract_aligned, goodness_of_fit, resample, resample_markers};
    pub use crate::core::{AlignedPair, AlignmentResult, Blanking, CorrelationProfile};
    pub use crate::core::{BinaryRecordingSource, DelimitedSource, ReferenceSource};
    pub use crate::core::{QualityAssessment, Verdict};
    pub use crate::data::{BinaryRecordingDecoder, DelimitedWaveformReader, RecordingConfig};
    pub use crate::data::{MarkerSequence, SampleMatrix, Waveform};
    pub use crate::error::{AlignError, Result};
}

// Re-export main types at the root level for convenience
pub use crate::core::{AlignConfig, AlignmentResult, PipelineMode, QualityAssessment, Verdict};
pub use data::{MarkerSequence, SampleMatrix, Waveform};
pub use error::{AlignError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "wavealign v{} - waveform alignment and confidence scoring",
        VERSION
    )
}
