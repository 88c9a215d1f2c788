// quality.rs - Competitor-peak confidence scoring

use crate::core::search::CorrelationProfile;
use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Fractions at or above this value mark the alignment as ambiguous
pub const AMBIGUITY_THRESHOLD: f64 = 0.9;

/// Default half-width of the exclusion zone around the primary peak
pub const DEFAULT_BLANKING_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    LikelySuccessful,
    Ambiguous,
}

impl Verdict {
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < AMBIGUITY_THRESHOLD {
            Verdict::LikelySuccessful
        } else {
            Verdict::Ambiguous
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Verdict::LikelySuccessful => "The alignment is likely successful",
            Verdict::Ambiguous => {
                "Peak alignment was not strongly unique; manual checking may be required"
            }
        }
    }
}

/// How much the primary correlation peak stands out from its best rival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// competitor / best; lower is more confident
    pub fraction: f64,
    pub verdict: Verdict,
    /// Profile index of the primary peak
    pub best_index: usize,
    pub best_value: f64,
    /// Highest value outside the exclusion zone, 0 when nothing is left outside it
    pub competitor: f64,
}

/// Score a profile by its second-best peak outside `[argmax - b, argmax + b)`.
///
/// The exclusion zone is clamped to the profile. When clamping leaves nothing
/// on either side the competitor is 0.
pub fn assess_quality(profile: &CorrelationProfile, blanking_width: usize) -> Result<QualityAssessment> {
    let (best_index, best_value) = profile.argmax().ok_or(AlignError::EmptySearch {
        lowpad: profile.lowpad(),
        highpad: profile.lowpad(),
    })?;
    let values = profile.values();
    let len = values.len();

    let leftpad = best_index.saturating_sub(blanking_width);
    let rightpad = best_index.saturating_add(blanking_width).min(len);
    if best_index < blanking_width || best_index.saturating_add(blanking_width) > len {
        warn!(
            best_index,
            blanking_width,
            profile_len = len,
            leftpad,
            rightpad,
            "exclusion zone clamped to profile bounds"
        );
    }

    let competitor = values[..leftpad]
        .iter()
        .chain(&values[rightpad..])
        .copied()
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0);

    let fraction = if best_value > 0.0 {
        competitor / best_value
    } else {
        warn!(best_value, "non-positive correlation peak; reporting the alignment as ambiguous");
        1.0
    };
    let verdict = Verdict::from_fraction(fraction);

    info!(fraction, competitor, best_value, ?verdict, "quality assessed");
    Ok(QualityAssessment {
        fraction,
        verdict,
        best_index,
        best_value,
        competitor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(values: Vec<f64>) -> CorrelationProfile {
        CorrelationProfile::new(0, values)
    }

    #[test]
    fn test_sharp_peak_is_successful() {
        let mut values = vec![1.0; 300];
        values[150] = 10.0;
        values[20] = 0.5;
        let q = assess_quality(&profile(values), 50).unwrap();
        assert!(q.fraction <= 0.1);
        assert_eq!(q.verdict, Verdict::LikelySuccessful);
        assert_eq!(q.best_index, 150);
    }

    #[test]
    fn test_twin_peaks_are_ambiguous() {
        let mut values = vec![0.0; 300];
        values[40] = 10.0;
        values[200] = 9.95;
        let q = assess_quality(&profile(values), 50).unwrap();
        assert!(q.fraction >= 0.9);
        assert_eq!(q.verdict, Verdict::Ambiguous);
        assert_eq!(q.competitor, 9.95);
    }

    #[test]
    fn test_rival_inside_exclusion_is_ignored() {
        let mut values = vec![0.0; 300];
        values[100] = 10.0;
        values[130] = 9.95;
        values[5] = 2.0;
        let q = assess_quality(&profile(values), 50).unwrap();
        assert_eq!(q.competitor, 2.0);
        assert!((q.fraction - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_exclusion_is_half_open() {
        // index 150 is argmax + b and lies outside [argmax - b, argmax + b)
        let mut values = vec![0.0; 300];
        values[100] = 10.0;
        values[150] = 3.0;
        values[50] = 4.0;
        let q = assess_quality(&profile(values), 50).unwrap();
        assert_eq!(q.competitor, 3.0);
    }

    #[test]
    fn test_window_narrower_than_blanking_width() {
        let q = assess_quality(&profile(vec![1.0, 5.0, 2.0]), 50).unwrap();
        assert_eq!(q.competitor, 0.0);
        assert_eq!(q.fraction, 0.0);
        assert_eq!(q.verdict, Verdict::LikelySuccessful);
    }

    #[test]
    fn test_peak_at_edge_is_clamped() {
        let mut values = vec![0.0; 100];
        values[0] = 10.0;
        values[99] = 8.0;
        let q = assess_quality(&profile(values), 50).unwrap();
        assert_eq!(q.competitor, 8.0);
        assert_eq!(q.verdict, Verdict::LikelySuccessful);
    }

    #[test]
    fn test_non_positive_peak() {
        let q = assess_quality(&profile(vec![0.0; 10]), 2).unwrap();
        assert_eq!(q.fraction, 1.0);
        assert_eq!(q.verdict, Verdict::Ambiguous);
    }

    #[test]
    fn test_empty_profile() {
        assert!(matches!(
            assess_quality(&profile(vec![]), 50),
            Err(AlignError::EmptySearch { .. })
        ));
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(Verdict::from_fraction(0.899), Verdict::LikelySuccessful);
        assert_eq!(Verdict::from_fraction(0.9), Verdict::Ambiguous);
    }
}
