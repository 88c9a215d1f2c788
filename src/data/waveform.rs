// waveform.rs - Single-lead series with an explicit sampling rate

use crate::core::resample::{interpolate, resampled_length};
use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};

/// One-dimensional amplitude series at a known rate.
///
/// Both the decoded reference lead and the delimited candidate recording are
/// converted into this form before alignment. A waveform always holds at least
/// one sample and a positive rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    samples: Vec<f64>,
    rate: f64,
}

impl Waveform {
    pub fn new(samples: Vec<f64>, rate: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(AlignError::config("waveform must contain at least one sample"));
        }
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AlignError::config(format!(
                "sampling rate must be positive, got {}",
                rate
            )));
        }
        Ok(Self { samples, rate })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.rate
    }

    /// Multiply every sample by a constant gain
    pub fn scaled(&self, gain: f64) -> Self {
        Self {
            samples: self.samples.iter().map(|s| s * gain).collect(),
            rate: self.rate,
        }
    }

    /// Linearly interpolate onto a new rate
    pub fn resample(&self, new_rate: f64) -> Result<Self> {
        let new_len = resampled_length(self.samples.len(), self.rate, new_rate)?;
        Self::new(interpolate(&self.samples, new_len), new_rate)
    }
}
