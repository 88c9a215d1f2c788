// binary.rs - Fixed-width little-endian multi-lead recording decoder

use crate::data::matrix::{tick_to_index, MarkerSequence, SampleMatrix};
use crate::error::{AlignError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Width in bytes of one lead sample
pub const SAMPLE_WORD_BYTES: usize = 2;
/// Width in bytes of one marker tick
pub const MARKER_WORD_BYTES: usize = 4;

/// Layout and naming of a binary reference recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Native sampling rate in Hz
    pub native_rate: f64,
    pub num_leads: usize,
    /// Bytes skipped before the first record
    pub header_size: u64,
    /// Marker ticks per sample index
    pub marker_divisor: f64,
    pub ecg_suffix: String,
    pub marker_suffix: String,
    /// Discard a partial trailing record instead of failing
    pub allow_partial_tail: bool,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            native_rate: 200.0,
            num_leads: 12,
            header_size: 0,
            marker_divisor: 24.0,
            ecg_suffix: "ecg".to_string(),
            marker_suffix: "mrk".to_string(),
            allow_partial_tail: false,
        }
    }
}

impl RecordingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.native_rate.is_finite() && self.native_rate > 0.0) {
            return Err(AlignError::config(format!(
                "native rate must be positive, got {}",
                self.native_rate
            )));
        }
        if self.num_leads == 0 {
            return Err(AlignError::config("recording must have at least one lead"));
        }
        if !(self.marker_divisor.is_finite() && self.marker_divisor > 0.0) {
            return Err(AlignError::config(format!(
                "marker divisor must be positive, got {}",
                self.marker_divisor
            )));
        }
        Ok(())
    }

    /// Bytes per time point
    pub fn record_width(&self) -> usize {
        self.num_leads * SAMPLE_WORD_BYTES
    }
}

/// Lazy, produce-once sequence of fixed-width little-endian records.
///
/// Each item is one record decoded into `words_per_record` unsigned words.
/// Iteration stops at end of stream; a partial record at the tail is never
/// yielded and its byte count is kept in [`RecordIter::trailing_bytes`].
pub struct RecordIter<R> {
    reader: R,
    word_bytes: usize,
    buf: Vec<u8>,
    trailing: usize,
    finished: bool,
}

impl<R: Read> RecordIter<R> {
    pub fn new(reader: R, word_bytes: usize, words_per_record: usize) -> Self {
        Self {
            reader,
            word_bytes,
            buf: vec![0u8; word_bytes * words_per_record],
            trailing: 0,
            finished: false,
        }
    }

    /// Bytes left over after the last complete record
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    fn fill(&mut self) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.reader.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for RecordIter<R> {
    type Item = std::io::Result<Vec<u32>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.buf.is_empty() {
            return None;
        }
        let filled = match self.fill() {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };
        if filled < self.buf.len() {
            self.finished = true;
            self.trailing = filled;
            return None;
        }
        Some(Ok(self
            .buf
            .chunks_exact(self.word_bytes)
            .map(decode_le_word)
            .collect()))
    }
}

fn decode_le_word(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .rev()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Decoder for `<id>.<ecg_suffix>` recordings and their `<id>.<marker_suffix>` markers
#[derive(Debug, Clone)]
pub struct BinaryRecordingDecoder {
    config: RecordingConfig,
}

impl BinaryRecordingDecoder {
    pub fn new(config: RecordingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    pub fn recording_path(&self, recording_id: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}", recording_id, self.config.ecg_suffix))
    }

    pub fn marker_path(&self, recording_id: &str) -> PathBuf {
        PathBuf::from(format!("{}.{}", recording_id, self.config.marker_suffix))
    }

    /// Open a recording positioned past its header
    pub fn records(&self, recording_id: &str) -> Result<RecordIter<BufReader<File>>> {
        let path = self.recording_path(recording_id);
        let shown = path.display().to_string();
        let file = File::open(&path).map_err(|e| AlignError::io(&shown, e))?;
        let size = file
            .metadata()
            .map_err(|e| AlignError::io(&shown, e))?
            .len();
        if size < self.config.header_size {
            return Err(AlignError::format(
                &shown,
                format!(
                    "file is {} bytes, shorter than the {}-byte header",
                    size, self.config.header_size
                ),
            ));
        }

        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(self.config.header_size))
            .map_err(|e| AlignError::io(&shown, e))?;
        Ok(RecordIter::new(
            reader,
            SAMPLE_WORD_BYTES,
            self.config.num_leads,
        ))
    }

    /// Decode the whole recording into a sample matrix
    pub fn decode(&self, recording_id: &str) -> Result<SampleMatrix> {
        let shown = self.recording_path(recording_id).display().to_string();
        let mut records = self.records(recording_id)?;
        let mut matrix = SampleMatrix::new(self.config.num_leads);

        for record in records.by_ref() {
            let record = record.map_err(|e| AlignError::io(&shown, e))?;
            matrix.push_row(record.into_iter().map(f64::from));
        }

        self.check_tail(&shown, records.trailing_bytes(), self.config.record_width())?;
        info!(
            path = %shown,
            rows = matrix.len(),
            leads = matrix.num_leads(),
            "decoded recording"
        );
        Ok(matrix)
    }

    /// Decode the marker file into raw ticks
    pub fn read_markers(&self, recording_id: &str) -> Result<MarkerSequence> {
        let path = self.marker_path(recording_id);
        let shown = path.display().to_string();
        let file = File::open(&path).map_err(|e| AlignError::io(&shown, e))?;
        let mut records = RecordIter::new(BufReader::new(file), MARKER_WORD_BYTES, 1);

        let mut ticks = Vec::new();
        for record in records.by_ref() {
            let record = record.map_err(|e| AlignError::io(&shown, e))?;
            ticks.extend(record.into_iter().map(f64::from));
        }
        self.check_tail(&shown, records.trailing_bytes(), MARKER_WORD_BYTES)?;

        debug!(path = %shown, ?ticks, "raw marker array");
        MarkerSequence::new(ticks).map_err(|message| AlignError::format(&shown, message))
    }

    fn check_tail(&self, path: &str, trailing: usize, width: usize) -> Result<()> {
        if trailing == 0 {
            return Ok(());
        }
        if self.config.allow_partial_tail {
            warn!(
                path,
                trailing, width, "discarding partial record at end of stream"
            );
            return Ok(());
        }
        Err(AlignError::format(
            path,
            format!(
                "byte count is not a multiple of the {}-byte record width ({} trailing bytes)",
                width, trailing
            ),
        ))
    }

    /// Split at markers using this recording's divisor
    pub fn split(&self, matrix: &SampleMatrix, markers: &MarkerSequence) -> Vec<SampleMatrix> {
        split_at_markers(matrix, markers, self.config.marker_divisor)
    }
}

/// Partition a matrix into contiguous segments at each marker.
///
/// Marker `i` sits at row `trunc(tick_i / divisor)`. Segments are
/// `[0, m0)`, `[m(i-1), m(i))` and `[m(k-1), len)`, so `k` markers give
/// `k + 1` segments that together cover every row exactly once.
pub fn split_at_markers(
    matrix: &SampleMatrix,
    markers: &MarkerSequence,
    divisor: f64,
) -> Vec<SampleMatrix> {
    let len = matrix.len();
    let mut bounds = Vec::with_capacity(markers.len() + 2);
    bounds.push(0);
    for (i, &tick) in markers.ticks().iter().enumerate() {
        let index = tick_to_index(tick, divisor);
        if index > len {
            warn!(
                marker = i,
                index, len, "marker lies past the end of the recording, clamping"
            );
        }
        bounds.push(index.min(len));
    }
    bounds.push(len);

    bounds
        .windows(2)
        .map(|w| matrix.slice_rows(w[0], w[1]))
        .collect()
}
