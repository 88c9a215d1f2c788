// search.rs - Bounded sliding dot-product offset search

use crate::core::quality::{assess_quality, QualityAssessment, DEFAULT_BLANKING_WIDTH};
use crate::data::Waveform;
use crate::error::{AlignError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Amplitude suppression applied to both series before correlating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Blanking {
    /// Correlate raw amplitudes
    None,
    /// Zero every sample below half of the array's own maximum
    HalfMax,
}

impl FromStr for Blanking {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Ok(Blanking::None),
            "half-max" | "halfmax" => Ok(Blanking::HalfMax),
            _ => Err(format!("Invalid blanking policy: {}. Use: none, half-max", s)),
        }
    }
}

/// Parameters of one offset search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// First tested offset (inclusive)
    pub lowpad: usize,
    /// Last tested offset (exclusive)
    pub highpad: usize,
    /// Reference index that offset 0 refers to
    pub anchor: usize,
    pub blanking: Blanking,
    /// Half-width of the region around the peak excluded from competitor search
    pub blanking_width: usize,
    pub show_progress: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            lowpad: 0,
            highpad: 0,
            anchor: 0,
            blanking: Blanking::None,
            blanking_width: DEFAULT_BLANKING_WIDTH,
            show_progress: false,
        }
    }
}

impl SearchOptions {
    pub fn window(lowpad: usize, highpad: usize) -> Self {
        Self {
            lowpad,
            highpad,
            ..Self::default()
        }
    }
}

/// One dot product per tested offset; entry `i` belongs to offset `lowpad + i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationProfile {
    lowpad: usize,
    values: Vec<f64>,
}

impl CorrelationProfile {
    pub fn new(lowpad: usize, values: Vec<f64>) -> Self {
        Self { lowpad, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn lowpad(&self) -> usize {
        self.lowpad
    }

    /// Offset tested at profile index `index`
    pub fn offset_at(&self, index: usize) -> usize {
        self.lowpad + index
    }

    /// Index and value of the first maximum
    pub fn argmax(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.values.iter().enumerate() {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        best
    }
}

/// Outcome of one alignment run, owned by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub best_offset: usize,
    pub profile: CorrelationProfile,
    pub quality: QualityAssessment,
}

/// Zero every sample below half of the slice's maximum
pub fn half_max_blank(samples: &[f64]) -> Vec<f64> {
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let threshold = max / 2.0;
    samples
        .iter()
        .map(|&v| if v < threshold { 0.0 } else { v })
        .collect()
}

/// Dot product of the reference window starting at `left` with the candidate,
/// truncating the candidate when the window runs past the reference end
fn dot_at(reference: &[f64], candidate: &[f64], left: usize) -> f64 {
    if left >= reference.len() {
        return 0.0;
    }
    let n = candidate.len().min(reference.len() - left);
    reference[left..left + n]
        .iter()
        .zip(&candidate[..n])
        .map(|(r, c)| r * c)
        .sum()
}

/// Compute the correlation profile over `[lowpad, highpad)`
pub fn correlate(
    reference: &Waveform,
    candidate: &Waveform,
    options: &SearchOptions,
) -> Result<CorrelationProfile> {
    let SearchOptions {
        lowpad,
        highpad,
        anchor,
        ..
    } = *options;
    if highpad <= lowpad {
        return Err(AlignError::EmptySearch { lowpad, highpad });
    }

    let r = reference.samples();
    // highpad > lowpad, so a representable anchor + highpad bounds every tested position
    let last = anchor.checked_add(highpad).ok_or_else(|| {
        AlignError::degenerate(format!(
            "anchor {} + highpad {} overflows the index range",
            anchor, highpad
        ))
    })?;
    let first = anchor + lowpad;
    if first >= r.len() {
        return Err(AlignError::degenerate(format!(
            "first tested position {} (anchor {} + lowpad {}) is beyond the reference length {}",
            first,
            anchor,
            lowpad,
            r.len()
        )));
    }
    if (reference.rate() - candidate.rate()).abs() > f64::EPSILON * reference.rate() {
        warn!(
            reference_rate = reference.rate(),
            candidate_rate = candidate.rate(),
            "correlating waveforms sampled at different rates"
        );
    }

    let (reference_eval, candidate_eval) = match options.blanking {
        Blanking::None => (r.to_vec(), candidate.samples().to_vec()),
        Blanking::HalfMax => {
            // The reference threshold comes from [anchor, anchor + highpad) only
            let window_end = last.min(r.len());
            let window_max = r[anchor..window_end]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let threshold = window_max / 2.0;
            let blanked_ref = r
                .iter()
                .map(|&v| if v < threshold { 0.0 } else { v })
                .collect();
            debug!(window_max, anchor, window_end, "reference half-max window");
            (blanked_ref, half_max_blank(candidate.samples()))
        }
    };

    log_window_clamps(r.len(), candidate.len(), options);

    let total = highpad - lowpad;
    let pb = if options.show_progress {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} offsets ({percent}%) ETA: {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };
    let update_interval = std::cmp::max(1, total / 100);
    let counter = AtomicUsize::new(0);

    let values: Vec<f64> = (lowpad..highpad)
        .into_par_iter()
        .map(|offset| {
            let dot = dot_at(&reference_eval, &candidate_eval, anchor + offset);
            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if count % update_interval == 0 {
                pb.set_position(count as u64);
            }
            dot
        })
        .collect();
    pb.finish_and_clear();

    if values.is_empty() {
        return Err(AlignError::EmptySearch { lowpad, highpad });
    }
    Ok(CorrelationProfile::new(lowpad, values))
}

fn log_window_clamps(reference_len: usize, candidate_len: usize, options: &SearchOptions) {
    let base = options.anchor;
    let range = options.lowpad..options.highpad;

    let truncated = range
        .clone()
        .filter(|o| {
            let left = base.saturating_add(*o);
            left < reference_len && left.saturating_add(candidate_len) > reference_len
        })
        .count();
    if truncated > 0 {
        warn!(
            truncated,
            candidate_len,
            reference_len,
            "candidate longer than the remaining reference at some offsets; truncating candidate"
        );
    }

    let outside = range
        .filter(|o| base.saturating_add(*o) >= reference_len)
        .count();
    if outside > 0 {
        warn!(
            outside,
            reference_len, "offsets start past the reference end; their dot product is 0"
        );
    }
}

/// Find the best offset and score it.
///
/// Ties resolve to the lowest offset. The profile is scored with
/// `options.blanking_width`.
pub fn search(
    reference: &Waveform,
    candidate: &Waveform,
    options: &SearchOptions,
) -> Result<AlignmentResult> {
    let profile = correlate(reference, candidate, options)?;
    let quality = assess_quality(&profile, options.blanking_width)?;
    let best_offset = profile.offset_at(quality.best_index);

    info!(
        best_offset,
        lowpad = options.lowpad,
        highpad = options.highpad,
        fraction = quality.fraction,
        "offset search complete"
    );
    Ok(AlignmentResult {
        best_offset,
        profile,
        quality,
    })
}
