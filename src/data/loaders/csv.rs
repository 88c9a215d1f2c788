// csv.rs - Single-column delimited waveform reader

use crate::data::waveform::Waveform;
use crate::error::{AlignError, Result};
use std::path::Path;
use tracing::info;

/// Reads the first comma-delimited field of every line as an integer amplitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelimitedWaveformReader {
    rate: f64,
}

impl DelimitedWaveformReader {
    /// `rate` is the sampling rate the file was recorded at; it is not stored in the file
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn read_waveform(&self, file_path: &Path) -> Result<Waveform> {
        let shown = file_path.display().to_string();
        let samples = read_first_column(file_path)?;
        if samples.is_empty() {
            return Err(AlignError::format(&shown, "file contains no samples"));
        }

        info!(path = %shown, samples = samples.len(), rate = self.rate, "waveform loaded");
        Waveform::new(samples, self.rate)
    }
}

/// Parse the first field of each record, truncating toward zero
fn read_first_column(file_path: &Path) -> Result<Vec<f64>> {
    let shown = file_path.display().to_string();
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(file_path)
        .map_err(|e| csv_error(&shown, e))?;

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&shown, e))?;
        let line = record.position().map_or(0, |p| p.line());
        let field = record.get(0).unwrap_or("");
        if field.is_empty() && record.len() <= 1 {
            continue;
        }

        let value = field
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                AlignError::format(
                    &shown,
                    format!("line {}: '{}' is not a numeric sample", line, field),
                )
            })?;
        samples.push(value.trunc());
    }

    Ok(samples)
}

fn csv_error(path: &str, e: ::csv::Error) -> AlignError {
    if e.is_io_error() {
        match e.into_kind() {
            ::csv::ErrorKind::Io(source) => AlignError::io(path, source),
            other => AlignError::format(path, format!("{:?}", other)),
        }
    } else {
        AlignError::format(path, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_first_column() {
        let file = temp_csv("12,99\n-4,7\n  30 , x\n");
        let w = DelimitedWaveformReader::new(512.0)
            .read_waveform(file.path())
            .unwrap();
        assert_eq!(w.samples(), &[12.0, -4.0, 30.0]);
        assert_eq!(w.rate(), 512.0);
    }

    #[test]
    fn test_float_fields_truncate() {
        let file = temp_csv("12.7\n-3.9\n1e2\n");
        let w = DelimitedWaveformReader::new(512.0)
            .read_waveform(file.path())
            .unwrap();
        assert_eq!(w.samples(), &[12.0, -3.0, 100.0]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let file = temp_csv("1\n\n2\n");
        let w = DelimitedWaveformReader::new(512.0)
            .read_waveform(file.path())
            .unwrap();
        assert_eq!(w.samples(), &[1.0, 2.0]);
    }

    #[test]
    fn test_non_numeric_field() {
        let file = temp_csv("1\nabc\n3\n");
        match DelimitedWaveformReader::new(512.0).read_waveform(file.path()) {
            Err(AlignError::Format { message, .. }) => {
                assert!(message.contains("line 2"));
                assert!(message.contains("abc"));
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let file = temp_csv("");
        assert!(matches!(
            DelimitedWaveformReader::new(512.0).read_waveform(file.path()),
            Err(AlignError::Format { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.eb.csv");
        assert!(matches!(
            DelimitedWaveformReader::new(512.0).read_waveform(&path),
            Err(AlignError::Io { .. })
        ));
    }
}
