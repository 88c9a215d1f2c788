// extract.rs - Offset-corrected aligned segments and goodness of fit

use crate::core::debias::debias_samples;
use crate::data::Waveform;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Left-pad correction for the binary-recording pipeline.
///
/// The offset search consistently lands a few samples late against the
/// binary reference; the value is empirical.
pub const BINARY_OFFSET_CORRECTION: usize = 3;

/// Left-pad correction for the delimited-file pipeline
pub const DELIMITED_OFFSET_CORRECTION: usize = 0;

/// Leading samples used for the Pearson goodness of fit
pub const GOF_WINDOW: usize = 4000;

/// Candidate and reference segments placed on a common time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub candidate: Vec<f64>,
    pub reference: Vec<f64>,
    pub rate: f64,
}

impl AlignedPair {
    /// Shorter of the two segments
    pub fn len(&self) -> usize {
        self.candidate.len().min(self.reference.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_waveforms(self) -> Result<(Waveform, Waveform)> {
        Ok((
            Waveform::new(self.candidate, self.rate)?,
            Waveform::new(self.reference, self.rate)?,
        ))
    }
}

/// Slice both series into offset-corrected segments of up to `plotrange` samples.
///
/// The candidate is left-padded with `offset - correction` zeros and read from
/// `offset`; the reference is read from `anchor + offset`. Nothing is bounds
/// checked: a `plotrange` past the available data yields shorter segments.
pub fn extract_aligned(
    reference: &Waveform,
    candidate: &Waveform,
    anchor: usize,
    offset: usize,
    plotrange: usize,
    correction: usize,
) -> AlignedPair {
    if offset < correction {
        warn!(offset, correction, "offset smaller than correction; candidate left unpadded");
    }
    let pad = offset.saturating_sub(correction);

    let mut padded = Vec::with_capacity(pad.saturating_add(candidate.len()));
    padded.resize(pad, 0.0);
    padded.extend_from_slice(candidate.samples());

    let candidate_segment = clamped_slice(&padded, offset, plotrange);
    let reference_segment =
        clamped_slice(reference.samples(), anchor.saturating_add(offset), plotrange);
    if candidate_segment.len() < plotrange || reference_segment.len() < plotrange {
        warn!(
            plotrange,
            candidate_len = candidate_segment.len(),
            reference_len = reference_segment.len(),
            "aligned segments shorter than requested"
        );
    }

    AlignedPair {
        candidate: candidate_segment,
        reference: reference_segment,
        rate: reference.rate(),
    }
}

fn clamped_slice(samples: &[f64], start: usize, len: usize) -> Vec<f64> {
    let start = start.min(samples.len());
    let end = start.saturating_add(len).min(samples.len());
    samples[start..end].to_vec()
}

/// Pearson correlation coefficient; `None` for fewer than two points or zero variance
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Pearson r over the first [`GOF_WINDOW`] samples of the re-debiased segments
pub fn goodness_of_fit(pair: &AlignedPair) -> Option<f64> {
    let candidate = debias_samples(&pair.candidate);
    let reference = debias_samples(&pair.reference);
    let n = GOF_WINDOW.min(candidate.len()).min(reference.len());
    pearson(&candidate[..n], &reference[..n])
}
