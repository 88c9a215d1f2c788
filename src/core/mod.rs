// mod.rs - Core alignment engine

pub mod debias;
pub mod extract;
pub mod pipeline;
pub mod quality;
pub mod resample;
pub mod search;
pub mod source;

// Re-export main types for convenience
pub use debias::{debias, debias_samples};
pub use extract::{extract_aligned, goodness_of_fit, AlignedPair};
pub use pipeline::{align, AlignConfig, AlignmentOutcome, PipelineMode};
pub use quality::{assess_quality, QualityAssessment, Verdict};
pub use resample::{resample, resample_markers};
pub use search::{correlate, search, AlignmentResult, Blanking, CorrelationProfile, SearchOptions};
pub use source::{BinaryRecordingSource, DelimitedSource, ReferenceSource, ReferenceTrace};
