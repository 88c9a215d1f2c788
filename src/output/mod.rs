// mod.rs - Output writers for aligned segments, reports and split recordings

use crate::core::{AlignedPair, AlignmentOutcome, PipelineMode, Verdict};
use crate::data::SampleMatrix;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent).map_err(|e| {
            format!(
                "Failed to create parent directory '{}': {}",
                parent.display(),
                e
            )
        })?;
    }
    Ok(())
}

fn create_with_header(file_path: &str, command_line: &str) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# wavealign v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;
    Ok(writer)
}

fn format_cell(value: Option<&f64>) -> String {
    value.map(|v| format!("{}", v)).unwrap_or_default()
}

/// Write the aligned candidate/reference pair, one row per sample.
/// A segment that ran short leaves its cells empty.
pub fn write_aligned_csv(
    file_path: &str,
    pair: &AlignedPair,
    command_line: &str,
) -> Result<(), String> {
    let writer = create_with_header(file_path, command_line)?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["sample", "time_s", "candidate", "reference"])
        .map_err(|e| format!("Write error: {}", e))?;

    let rows = pair.candidate.len().max(pair.reference.len());
    for i in 0..rows {
        csv_writer
            .write_record([
                i.to_string(),
                format!("{:.6}", i as f64 / pair.rate),
                format_cell(pair.candidate.get(i)),
                format_cell(pair.reference.get(i)),
            ])
            .map_err(|e| format!("Write error: {}", e))?;
    }

    csv_writer
        .flush()
        .map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Aligned segments written to: {}", file_path);
    Ok(())
}

/// Write a matrix with one row per time point, values rounded to integers
pub fn write_matrix_csv(
    file_path: &str,
    matrix: &SampleMatrix,
    command_line: &str,
) -> Result<(), String> {
    let writer = create_with_header(file_path, command_line)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for row in matrix.rows() {
        csv_writer
            .write_record(row.iter().map(|v| format!("{:.0}", v)))
            .map_err(|e| format!("Write error: {}", e))?;
    }

    csv_writer
        .flush()
        .map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Summary of one alignment run
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentReport {
    pub version: String,
    pub generated: String,
    pub command: String,
    pub mode: PipelineMode,
    pub reference: String,
    pub candidate: String,
    pub anchor: usize,
    pub best_offset: usize,
    pub lowpad: usize,
    pub highpad: usize,
    pub best_value: f64,
    pub competitor: f64,
    pub quality_fraction: f64,
    pub verdict: Verdict,
    pub goodness_of_fit: Option<f64>,
    pub aligned_samples: usize,
}

impl AlignmentReport {
    pub fn new(
        outcome: &AlignmentOutcome,
        mode: PipelineMode,
        reference: &str,
        candidate: &str,
        command_line: &str,
    ) -> Self {
        let quality = &outcome.result.quality;
        let profile = &outcome.result.profile;
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated: chrono::Utc::now().to_rfc3339(),
            command: command_line.to_string(),
            mode,
            reference: reference.to_string(),
            candidate: candidate.to_string(),
            anchor: outcome.anchor,
            best_offset: outcome.result.best_offset,
            lowpad: profile.lowpad(),
            highpad: profile.lowpad() + profile.len(),
            best_value: quality.best_value,
            competitor: quality.competitor,
            quality_fraction: quality.fraction,
            verdict: quality.verdict,
            goodness_of_fit: outcome.goodness_of_fit,
            aligned_samples: outcome.aligned.len(),
        }
    }
}

/// Write the report as pretty-printed JSON
pub fn write_report_json(file_path: &str, report: &AlignmentReport) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let content = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    std::fs::write(file_path, content)
        .map_err(|e| format!("Failed to write report '{}': {}", file_path, e))?;
    println!("✅ Alignment report written to: {}", file_path);
    Ok(())
}
