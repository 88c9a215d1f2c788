// pipeline.rs - End-to-end alignment of a candidate against a reference source

use crate::core::extract::{
    extract_aligned, goodness_of_fit, AlignedPair, BINARY_OFFSET_CORRECTION,
    DELIMITED_OFFSET_CORRECTION,
};
use crate::core::quality::DEFAULT_BLANKING_WIDTH;
use crate::core::search::{search, AlignmentResult, Blanking, SearchOptions};
use crate::core::source::ReferenceSource;
use crate::data::Waveform;
use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Which kind of reference input the alignment runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineMode {
    /// Multi-lead binary recording with marker file
    Binary,
    /// Pair of single-column delimited files
    Delimited,
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "ecg" => Ok(PipelineMode::Binary),
            "delimited" | "csv" => Ok(PipelineMode::Delimited),
            _ => Err(format!("Invalid pipeline mode: {}. Use: binary, delimited", s)),
        }
    }
}

impl PipelineMode {
    pub fn description(&self) -> &str {
        match self {
            PipelineMode::Binary => "binary multi-lead recording + delimited candidate",
            PipelineMode::Delimited => "delimited reference + delimited candidate",
        }
    }
}

/// Parameters of one alignment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Common rate both series are brought to before correlating
    pub target_rate: f64,
    pub lowpad: usize,
    pub highpad: usize,
    /// Length of the aligned segments handed back
    pub plotrange: usize,
    pub blanking_width: usize,
    pub blanking: Blanking,
    /// Gain applied to the candidate before searching and extracting
    pub candidate_scale: f64,
    pub offset_correction: usize,
    pub show_progress: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self::for_mode(PipelineMode::Binary)
    }
}

impl AlignConfig {
    /// Defaults used by each pipeline
    pub fn for_mode(mode: PipelineMode) -> Self {
        match mode {
            PipelineMode::Binary => Self {
                target_rate: 512.0,
                lowpad: 0,
                highpad: 6000,
                plotrange: 9000,
                blanking_width: DEFAULT_BLANKING_WIDTH,
                blanking: Blanking::HalfMax,
                candidate_scale: 0.12,
                offset_correction: BINARY_OFFSET_CORRECTION,
                show_progress: false,
            },
            PipelineMode::Delimited => Self {
                target_rate: 512.0,
                lowpad: 0,
                highpad: 6000,
                plotrange: 9000,
                blanking_width: DEFAULT_BLANKING_WIDTH,
                blanking: Blanking::None,
                candidate_scale: 1.0,
                offset_correction: DELIMITED_OFFSET_CORRECTION,
                show_progress: false,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.target_rate.is_finite() && self.target_rate > 0.0) {
            return Err(AlignError::config(format!(
                "target rate must be positive, got {}",
                self.target_rate
            )));
        }
        if !self.candidate_scale.is_finite() {
            return Err(AlignError::config("candidate scale must be finite"));
        }
        if self.highpad <= self.lowpad {
            return Err(AlignError::EmptySearch {
                lowpad: self.lowpad,
                highpad: self.highpad,
            });
        }
        Ok(())
    }

    pub fn search_options(&self, anchor: usize) -> SearchOptions {
        SearchOptions {
            lowpad: self.lowpad,
            highpad: self.highpad,
            anchor,
            blanking: self.blanking,
            blanking_width: self.blanking_width,
            show_progress: self.show_progress,
        }
    }
}

/// Everything one alignment run produces
#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    pub result: AlignmentResult,
    pub anchor: usize,
    pub aligned: AlignedPair,
    /// Pearson r of the leading aligned window, when defined
    pub goodness_of_fit: Option<f64>,
}

/// Align `candidate` against the reference produced by `source`.
///
/// The candidate is brought to `config.target_rate` and scaled by
/// `config.candidate_scale`; the reference comes from the source already at
/// that rate. Any failure aborts the run.
pub fn align(
    source: &dyn ReferenceSource,
    candidate: &Waveform,
    config: &AlignConfig,
) -> Result<AlignmentOutcome> {
    config.validate()?;
    info!(source = source.name(), input = %source.describe(), "aligning");

    let reference = source.load_reference(config.target_rate)?;
    let candidate = if candidate.rate() == config.target_rate {
        candidate.scaled(config.candidate_scale)
    } else {
        info!(
            from = candidate.rate(),
            to = config.target_rate,
            "resampling candidate"
        );
        candidate
            .resample(config.target_rate)?
            .scaled(config.candidate_scale)
    };

    let options = config.search_options(reference.anchor);
    let result = search(&reference.waveform, &candidate, &options)?;

    let aligned = extract_aligned(
        &reference.waveform,
        &candidate,
        reference.anchor,
        result.best_offset,
        config.plotrange,
        config.offset_correction,
    );
    let goodness_of_fit = goodness_of_fit(&aligned);

    Ok(AlignmentOutcome {
        result,
        anchor: reference.anchor,
        aligned,
        goodness_of_fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quality::Verdict;
    use crate::core::source::{DelimitedSource, ReferenceTrace};
    use crate::data::DelimitedWaveformReader;
    use std::io::Write;

    struct FixedSource(ReferenceTrace);

    impl ReferenceSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn describe(&self) -> String {
            "in-memory".to_string()
        }

        fn load_reference(&self, _target_rate: f64) -> Result<ReferenceTrace> {
            Ok(self.0.clone())
        }
    }

    /// Sparse spike train standing in for QRS complexes
    fn spikes(len: usize, positions: &[usize]) -> Vec<f64> {
        let mut v = vec![0.0; len];
        for &p in positions {
            v[p] = 100.0;
            if p + 1 < len {
                v[p + 1] = 40.0;
            }
        }
        v
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("binary".parse::<PipelineMode>().unwrap(), PipelineMode::Binary);
        assert_eq!("CSV".parse::<PipelineMode>().unwrap(), PipelineMode::Delimited);
        assert!("wav".parse::<PipelineMode>().is_err());
    }

    #[test]
    fn test_mode_defaults() {
        let binary = AlignConfig::for_mode(PipelineMode::Binary);
        assert_eq!(binary.offset_correction, 3);
        assert_eq!(binary.blanking, Blanking::HalfMax);
        let delimited = AlignConfig::for_mode(PipelineMode::Delimited);
        assert_eq!(delimited.offset_correction, 0);
        assert_eq!(delimited.candidate_scale, 1.0);
    }

    #[test]
    fn test_default_window_starts_at_anchor() {
        for mode in [PipelineMode::Binary, PipelineMode::Delimited] {
            let config = AlignConfig::for_mode(mode);
            assert_eq!((config.lowpad, config.highpad), (0, 6000));
            let options = config.search_options(37);
            assert_eq!((options.anchor, options.lowpad, options.highpad), (37, 0, 6000));
        }
    }

    #[test]
    fn test_default_config_finds_short_shift() {
        let beats: Vec<usize> = (0..12).map(|i| 60 + i * 170 + (i * i) % 23).collect();
        let reference = spikes(5000, &beats.iter().map(|b| b + 1000).collect::<Vec<_>>());
        let candidate = spikes(2200, &beats);
        let source = FixedSource(ReferenceTrace {
            waveform: Waveform::new(reference, 512.0).unwrap(),
            anchor: 0,
        });

        let config = AlignConfig::for_mode(PipelineMode::Delimited);
        let outcome = align(&source, &Waveform::new(candidate, 512.0).unwrap(), &config).unwrap();
        assert_eq!(outcome.result.best_offset, 1000);
        assert_eq!(outcome.result.profile.len(), 6000);
    }

    #[test]
    fn test_config_rejects_empty_window() {
        let config = AlignConfig {
            lowpad: 10,
            highpad: 10,
            ..AlignConfig::for_mode(PipelineMode::Delimited)
        };
        assert!(matches!(config.validate(), Err(AlignError::EmptySearch { .. })));
    }

    #[test]
    fn test_align_recovers_shift_with_anchor() {
        let beats = [30, 95, 170, 230, 310, 390];
        let reference = spikes(600, &beats.iter().map(|b| b + 120).collect::<Vec<_>>());
        let candidate = spikes(420, &beats);
        let source = FixedSource(ReferenceTrace {
            waveform: Waveform::new(reference, 512.0).unwrap(),
            anchor: 20,
        });
        let config = AlignConfig {
            lowpad: 0,
            highpad: 200,
            plotrange: 300,
            blanking_width: 10,
            ..AlignConfig::for_mode(PipelineMode::Binary)
        };

        let outcome = align(&source, &Waveform::new(candidate, 512.0).unwrap(), &config).unwrap();
        assert_eq!(outcome.result.best_offset, 100);
        assert_eq!(outcome.anchor, 20);
        assert_eq!(outcome.aligned.reference.len(), 300);
        assert_eq!(outcome.result.quality.verdict, Verdict::LikelySuccessful);
    }

    #[test]
    fn test_delimited_round_trip_is_well_correlated() {
        let dir = tempfile::TempDir::new().unwrap();
        let beats = [40, 130, 215, 300, 380, 470, 560];
        let reference = spikes(900, &beats.iter().map(|b| b + 250).collect::<Vec<_>>());
        let candidate = spikes(600, &beats);

        let ref_path = dir.path().join("pair.ref.csv");
        let mut file = std::fs::File::create(&ref_path).unwrap();
        for v in &reference {
            writeln!(file, "{}", v).unwrap();
        }

        let source = DelimitedSource::new(DelimitedWaveformReader::new(512.0), &ref_path);
        let config = AlignConfig {
            lowpad: 0,
            highpad: 300,
            plotrange: 500,
            blanking_width: 20,
            ..AlignConfig::for_mode(PipelineMode::Delimited)
        };
        let outcome = align(&source, &Waveform::new(candidate, 512.0).unwrap(), &config).unwrap();

        assert_eq!(outcome.result.best_offset, 250);
        assert_eq!(outcome.result.profile.len(), 300);
        let r = outcome.goodness_of_fit.unwrap();
        assert!(r > 0.99, "r = {}", r);
    }

    #[test]
    fn test_align_propagates_source_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = DelimitedSource::new(
            DelimitedWaveformReader::new(512.0),
            dir.path().join("missing.ref.csv"),
        );
        let candidate = Waveform::new(vec![1.0, 2.0], 512.0).unwrap();
        assert!(matches!(
            align(&source, &candidate, &AlignConfig::for_mode(PipelineMode::Delimited)),
            Err(AlignError::Io { .. })
        ));
    }
}
