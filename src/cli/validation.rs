// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::{AlignConfig, Blanking, PipelineMode};
use crate::data::RecordingConfig;
use std::str::FromStr;

/// Inputs of one run, resolved from the recording identifier and overrides
#[derive(Debug, Clone, PartialEq)]
pub enum InputPaths {
    Binary {
        recording: String,
        candidate: String,
    },
    Delimited {
        reference: String,
        candidate: String,
    },
}

pub struct ValidationResult {
    pub mode: PipelineMode,
    pub align_config: AlignConfig,
    pub recording_config: RecordingConfig,
    /// Rate assumed for delimited input files
    pub candidate_rate: f64,
    pub inputs: InputPaths,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    let mode = PipelineMode::from_str(&args.mode)?;

    let defaults = AlignConfig::for_mode(mode);
    let blanking = match &args.blanking {
        Some(name) => Blanking::from_str(name)?,
        None => defaults.blanking,
    };
    let align_config = AlignConfig {
        target_rate: args.target_rate.unwrap_or(defaults.target_rate),
        lowpad: args.lowpad.unwrap_or(defaults.lowpad),
        highpad: args.highpad.unwrap_or(defaults.highpad),
        plotrange: args.plotrange.unwrap_or(defaults.plotrange),
        blanking_width: args.blanking_width.unwrap_or(defaults.blanking_width),
        blanking,
        candidate_scale: args.candidate_scale.unwrap_or(defaults.candidate_scale),
        offset_correction: args.offset_correction.unwrap_or(defaults.offset_correction),
        show_progress: args.progress,
    };
    align_config.validate().map_err(|e| e.to_string())?;

    let base = RecordingConfig::default();
    let recording_config = RecordingConfig {
        native_rate: args.native_rate.unwrap_or(base.native_rate),
        num_leads: args.num_leads.unwrap_or(base.num_leads),
        header_size: args.header_size.unwrap_or(base.header_size),
        marker_divisor: args.marker_divisor.unwrap_or(base.marker_divisor),
        allow_partial_tail: args.allow_partial_tail,
        ..base
    };
    recording_config.validate().map_err(|e| e.to_string())?;

    let lead = args.lead.unwrap_or(0);
    if lead >= recording_config.num_leads {
        return Err(format!(
            "Lead {} out of range for a {}-lead recording",
            lead, recording_config.num_leads
        ));
    }

    let candidate_rate = args.candidate_rate.unwrap_or(512.0);
    if !(candidate_rate.is_finite() && candidate_rate > 0.0) {
        return Err("Candidate rate must be positive".to_string());
    }
    if let Some(rate) = args.split_rate {
        if !(rate.is_finite() && rate > 0.0) {
            return Err("Split rate must be positive".to_string());
        }
    }

    let inputs = resolve_inputs(args, mode)?;

    Ok(ValidationResult {
        mode,
        align_config,
        recording_config,
        candidate_rate,
        inputs,
    })
}

fn resolve_inputs(args: &Args, mode: PipelineMode) -> Result<InputPaths, String> {
    match mode {
        PipelineMode::Binary => {
            if args.reference.is_some() {
                return Err(
                    "--reference is only used in delimited mode (binary mode reads --recording)"
                        .to_string(),
                );
            }
            let recording = args
                .recording
                .clone()
                .ok_or("--recording is required in binary mode")?;
            let candidate = args
                .candidate
                .clone()
                .unwrap_or_else(|| format!("{}.eb", recording));
            Ok(InputPaths::Binary {
                recording,
                candidate,
            })
        }
        PipelineMode::Delimited => {
            if args.split.is_some() {
                return Err("--split is only available in binary mode".to_string());
            }
            let reference = match (&args.reference, &args.recording) {
                (Some(path), _) => path.clone(),
                (None, Some(id)) => format!("{}.ref.csv", id),
                (None, None) => {
                    return Err("--reference or --recording is required in delimited mode".to_string())
                }
            };
            let candidate = match (&args.candidate, &args.recording) {
                (Some(path), _) => path.clone(),
                (None, Some(id)) => format!("{}.eb.csv", id),
                (None, None) => {
                    return Err("--candidate or --recording is required in delimited mode".to_string())
                }
            };
            Ok(InputPaths::Delimited {
                reference,
                candidate,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(argv: &[&str]) -> Args {
        Args::from_args(&["wavealign"], argv).unwrap()
    }

    #[test]
    fn test_binary_defaults() {
        let result = validate_args(&parse(&["--recording", "s01"])).unwrap();
        assert_eq!(result.mode, PipelineMode::Binary);
        assert_eq!(result.align_config, AlignConfig::for_mode(PipelineMode::Binary));
        assert_eq!(result.recording_config, RecordingConfig::default());
        assert_eq!(
            result.inputs,
            InputPaths::Binary {
                recording: "s01".to_string(),
                candidate: "s01.eb".to_string(),
            }
        );
    }

    #[test]
    fn test_delimited_paths_from_recording() {
        let result =
            validate_args(&parse(&["--mode", "delimited", "--recording", "pair"])).unwrap();
        assert_eq!(result.align_config.blanking, Blanking::None);
        assert_eq!(
            result.inputs,
            InputPaths::Delimited {
                reference: "pair.ref.csv".to_string(),
                candidate: "pair.eb.csv".to_string(),
            }
        );
    }

    #[test]
    fn test_overrides_applied() {
        let result = validate_args(&parse(&[
            "--recording",
            "s01",
            "--lowpad",
            "10",
            "--highpad",
            "20",
            "--blanking",
            "none",
            "--num-leads",
            "3",
            "--lead",
            "2",
        ]))
        .unwrap();
        assert_eq!(result.align_config.lowpad, 10);
        assert_eq!(result.align_config.blanking, Blanking::None);
        assert_eq!(result.recording_config.num_leads, 3);
    }

    #[test]
    fn test_rejections() {
        assert!(validate_args(&parse(&[])).is_err());
        assert!(validate_args(&parse(&["--recording", "s", "--mode", "wav"])).is_err());
        assert!(validate_args(&parse(&["--recording", "s", "--lowpad", "9", "--highpad", "9"]))
            .is_err());
        assert!(validate_args(&parse(&["--recording", "s", "--lead", "12"])).is_err());
        assert!(validate_args(&parse(&[
            "--mode",
            "delimited",
            "--recording",
            "s",
            "--split",
            "out"
        ]))
        .is_err());
    }
}
