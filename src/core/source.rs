// source.rs - Interchangeable producers of the reference trace

use crate::core::debias::debias;
use crate::core::resample::{resample, resample_markers};
use crate::data::{BinaryRecordingDecoder, DelimitedWaveformReader, Waveform};
use crate::error::{AlignError, Result};
use std::path::PathBuf;
use tracing::info;

/// Reference series ready for the offset search
#[derive(Debug, Clone)]
pub struct ReferenceTrace {
    pub waveform: Waveform,
    /// Reference index that offset 0 refers to
    pub anchor: usize,
}

/// Anything that can produce a reference trace at a requested rate
pub trait ReferenceSource {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Human-readable identification of the underlying input
    fn describe(&self) -> String;

    fn load_reference(&self, target_rate: f64) -> Result<ReferenceTrace>;
}

/// One lead of a binary multi-lead recording, anchored at one of its markers
#[derive(Debug, Clone)]
pub struct BinaryRecordingSource {
    decoder: BinaryRecordingDecoder,
    recording_id: String,
    /// Marker whose position becomes the anchor; `None` anchors at the start
    marker_index: Option<usize>,
    lead: usize,
}

impl BinaryRecordingSource {
    pub fn new(
        decoder: BinaryRecordingDecoder,
        recording_id: impl Into<String>,
        marker_index: Option<usize>,
        lead: usize,
    ) -> Self {
        Self {
            decoder,
            recording_id: recording_id.into(),
            marker_index,
            lead,
        }
    }
}

impl ReferenceSource for BinaryRecordingSource {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn describe(&self) -> String {
        format!(
            "{} (lead {}, marker {})",
            self.decoder.recording_path(&self.recording_id).display(),
            self.lead,
            self.marker_index
                .map_or_else(|| "none".to_string(), |m| m.to_string())
        )
    }

    /// Decode, resample to `target_rate`, debias, then pick the lead.
    ///
    /// The anchor is the chosen marker rescaled to `target_rate` and divided
    /// by the recording's marker divisor, truncated.
    fn load_reference(&self, target_rate: f64) -> Result<ReferenceTrace> {
        let config = self.decoder.config();
        if self.lead >= config.num_leads {
            return Err(AlignError::config(format!(
                "lead index {} out of range for a {}-lead recording",
                self.lead, config.num_leads
            )));
        }

        let matrix = self.decoder.decode(&self.recording_id)?;
        let resampled = resample(&matrix, config.native_rate, target_rate)?;

        let anchor = match self.marker_index {
            Some(index) => {
                let markers = self.decoder.read_markers(&self.recording_id)?;
                let markers = resample_markers(&markers, config.native_rate, target_rate)?;
                markers
                    .sample_index(index, config.marker_divisor)
                    .ok_or_else(|| {
                        AlignError::config(format!(
                            "marker index {} out of range ({} markers recorded)",
                            index,
                            markers.len()
                        ))
                    })?
            }
            None => 0,
        };

        let debiased = debias(&resampled);
        let lead = debiased.lead(self.lead).unwrap_or_default();
        if lead.is_empty() {
            return Err(AlignError::format(
                self.decoder
                    .recording_path(&self.recording_id)
                    .display()
                    .to_string(),
                "recording contains no samples",
            ));
        }

        info!(
            source = self.name(),
            anchor,
            samples = lead.len(),
            target_rate,
            "reference trace ready"
        );
        Ok(ReferenceTrace {
            waveform: Waveform::new(lead, target_rate)?,
            anchor,
        })
    }
}

/// A delimited single-column reference file, anchored at its first sample
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    reader: DelimitedWaveformReader,
    path: PathBuf,
}

impl DelimitedSource {
    pub fn new(reader: DelimitedWaveformReader, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
        }
    }
}

impl ReferenceSource for DelimitedSource {
    fn name(&self) -> &'static str {
        "delimited"
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_reference(&self, target_rate: f64) -> Result<ReferenceTrace> {
        let waveform = self.reader.read_waveform(&self.path)?;
        let waveform = if waveform.rate() == target_rate {
            waveform
        } else {
            waveform.resample(target_rate)?
        };
        Ok(ReferenceTrace {
            waveform,
            anchor: 0,
        })
    }
}
