// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use wavealign::cli::{validate_args, Args, Config, InputPaths, ValidationResult};
use wavealign::output::{write_aligned_csv, write_matrix_csv, write_report_json, AlignmentReport};
use wavealign::core::{
    align, debias, resample, BinaryRecordingSource, DelimitedSource, ReferenceSource, Verdict,
};
use wavealign::data::{BinaryRecordingDecoder, DelimitedWaveformReader};

fn main() {
    init_tracing();
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

/// Library diagnostics go to stderr, filtered by RUST_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation = validate_args(&args)?;

    println!("🚀 wavealign v{}", env!("CARGO_PKG_VERSION"));
    println!("⚡ Pipeline: {}", validation.mode.description());

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    if let Some(prefix) = &args.split {
        return run_split(&args, &validation, prefix, &command_line);
    }

    run_alignment(&args, &validation, &command_line)
}

fn run_alignment(
    args: &Args,
    validation: &ValidationResult,
    command_line: &str,
) -> Result<(), String> {
    let total_start = Instant::now();
    let config = &validation.align_config;
    let reader = DelimitedWaveformReader::new(validation.candidate_rate);

    let (source, reference_label, candidate_path): (Box<dyn ReferenceSource>, String, &str) =
        match &validation.inputs {
            InputPaths::Binary {
                recording,
                candidate,
            } => {
                let decoder = BinaryRecordingDecoder::new(validation.recording_config.clone())
                    .map_err(|e| e.to_string())?;
                let source = BinaryRecordingSource::new(
                    decoder,
                    recording.clone(),
                    args.marker_index,
                    args.lead.unwrap_or(0),
                );
                (
                    Box::new(source) as Box<dyn ReferenceSource>,
                    recording.clone(),
                    candidate.as_str(),
                )
            }
            InputPaths::Delimited {
                reference,
                candidate,
            } => (
                Box::new(DelimitedSource::new(reader, reference)) as Box<dyn ReferenceSource>,
                reference.clone(),
                candidate.as_str(),
            ),
        };

    println!("📂 Reference: {}", source.describe());
    println!("📂 Candidate: {}", candidate_path);
    println!(
        "🔍 Search window: [{}, {}) at {} Hz, blanking width {}",
        config.lowpad, config.highpad, config.target_rate, config.blanking_width
    );

    let load_start = Instant::now();
    let candidate = reader
        .read_waveform(Path::new(candidate_path))
        .map_err(|e| e.to_string())?;
    println!(
        "✅ Candidate loaded: {} samples ({:.1}s) in {:.2}s",
        candidate.len(),
        candidate.duration_secs(),
        load_start.elapsed().as_secs_f64()
    );

    let search_start = Instant::now();
    let outcome = align(source.as_ref(), &candidate, config).map_err(|e| e.to_string())?;
    let quality = &outcome.result.quality;
    println!(
        "✅ Search completed in {:.2}s",
        search_start.elapsed().as_secs_f64()
    );

    println!("\n📊 ALIGNMENT SUMMARY");
    println!("   Anchor:        {}", outcome.anchor);
    println!("   Best offset:   {}", outcome.result.best_offset);
    println!("   Peak value:    {:.3}", quality.best_value);
    println!("   Competitor:    {:.3}", quality.competitor);
    println!("   Quality:       {:.4}", quality.fraction);
    match outcome.goodness_of_fit {
        Some(r) => println!("   Pearson r:     {:.4}", r),
        None => println!("   Pearson r:     undefined"),
    }
    match quality.verdict {
        Verdict::LikelySuccessful => println!("✅ {}", quality.verdict.description()),
        Verdict::Ambiguous => println!("⚠️  {}", quality.verdict.description()),
    }

    if let Some(output) = &args.output {
        write_aligned_csv(output, &outcome.aligned, command_line)?;
    }
    if let Some(report_path) = &args.report {
        let report = AlignmentReport::new(
            &outcome,
            validation.mode,
            &reference_label,
            candidate_path,
            command_line,
        );
        write_report_json(report_path, &report)?;
    }

    println!(
        "🎉 Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Write each marker-delimited segment of the binary recording to its own CSV
fn run_split(
    args: &Args,
    validation: &ValidationResult,
    prefix: &str,
    command_line: &str,
) -> Result<(), String> {
    let recording = match &validation.inputs {
        InputPaths::Binary { recording, .. } => recording,
        InputPaths::Delimited { .. } => {
            return Err("--split is only available in binary mode".to_string())
        }
    };

    let decoder = BinaryRecordingDecoder::new(validation.recording_config.clone())
        .map_err(|e| e.to_string())?;
    let matrix = decoder.decode(recording).map_err(|e| e.to_string())?;
    let markers = decoder.read_markers(recording).map_err(|e| e.to_string())?;
    println!(
        "📂 Recording: {} rows x {} leads, {} markers",
        matrix.len(),
        matrix.num_leads(),
        markers.len()
    );

    let native_rate = decoder.config().native_rate;
    let segments = decoder.split(&matrix, &markers);
    for (i, segment) in segments.iter().enumerate() {
        let mut segment = segment.clone();
        if let Some(rate) = args.split_rate {
            segment = resample(&segment, native_rate, rate).map_err(|e| e.to_string())?;
        }
        if args.split_debias {
            segment = debias(&segment);
        }
        let path = format!("{}{}.csv", prefix, i);
        write_matrix_csv(&path, &segment, command_line)?;
        println!("✅ Segment {} ({} rows) written to: {}", i, segment.len(), path);
    }

    println!("🎉 Split into {} segments", segments.len());
    Ok(())
}
