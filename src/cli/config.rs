// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub mode: Option<String>,
    pub recording: Option<String>,
    pub candidate: Option<String>,
    pub reference: Option<String>,
    pub output: Option<String>,
    pub report: Option<String>,

    // Recording layout
    pub native_rate: Option<f64>,
    pub num_leads: Option<usize>,
    pub header_size: Option<u64>,
    pub marker_divisor: Option<f64>,
    pub allow_partial_tail: Option<bool>,

    // Alignment
    pub marker_index: Option<usize>,
    pub lead: Option<usize>,
    pub target_rate: Option<f64>,
    pub candidate_rate: Option<f64>,
    pub candidate_scale: Option<f64>,
    pub lowpad: Option<usize>,
    pub highpad: Option<usize>,
    pub plotrange: Option<usize>,
    pub blanking_width: Option<usize>,
    pub blanking: Option<String>,
    pub offset_correction: Option<usize>,

    // Performance
    pub threads: Option<usize>,
    pub progress: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# wavealign.toml - Configuration file for wavealign
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Pipeline mode: binary, delimited
mode = "binary"

# Recording identifier (binary: <id>.ecg + <id>.mrk, delimited: <id>.ref.csv)
recording = "/path/to/session01"

# Candidate file (default: <recording>.eb or <recording>.eb.csv)
# candidate = "/path/to/session01.eb"

# Reference file for delimited mode (default: <recording>.ref.csv)
# reference = "/path/to/session01.ref.csv"

# Aligned segments CSV
output = "aligned.csv"

# JSON alignment report
report = "report.json"

# =============================================================================
# RECORDING LAYOUT (binary mode)
# =============================================================================

# Native sampling rate in Hz
native_rate = 200.0

# Interleaved leads per record
num_leads = 12

# Bytes skipped before the first record
header_size = 0

# Divisor applied to marker ticks
marker_divisor = 24.0

# Discard a trailing partial record instead of failing
allow_partial_tail = false

# =============================================================================
# ALIGNMENT
# =============================================================================

# Marker anchoring the search (omit to anchor at the first sample)
marker_index = 0

# Reference lead
lead = 0

# Common sampling rate in Hz
target_rate = 512.0

# Sampling rate of delimited inputs in Hz
candidate_rate = 512.0

# Candidate gain (binary default 0.12, delimited default 1.0)
# candidate_scale = 0.12

# Searched offsets [lowpad, highpad) from the anchor
lowpad = 0
highpad = 6000

# Aligned segment length
plotrange = 9000

# Half width of the zone excluded around the best peak
blanking_width = 50

# Amplitude blanking: none, half-max
# blanking = "half-max"

# Samples subtracted from the candidate padding (binary default 3, delimited 0)
# offset_correction = 3

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
# threads = 8

# Show a progress bar during the offset search
progress = false
"#
        .to_string()
    }
}
