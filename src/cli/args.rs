// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// wavealign - Align a candidate waveform against a reference ECG recording
pub struct Args {
    /// pipeline mode: binary, delimited (default: binary)
    #[argh(option, default = "String::from(\"binary\")")]
    pub mode: String,

    /// recording identifier; binary mode reads <id>.ecg and <id>.mrk, delimited mode <id>.ref.csv
    #[argh(option)]
    pub recording: Option<String>,

    /// candidate file (default: <recording>.eb in binary mode, <recording>.eb.csv in delimited mode)
    #[argh(option)]
    pub candidate: Option<String>,

    /// reference file for delimited mode (default: <recording>.ref.csv)
    #[argh(option)]
    pub reference: Option<String>,

    /// marker whose position anchors the search (binary mode; omit to anchor at the first sample)
    #[argh(option)]
    pub marker_index: Option<usize>,

    /// reference lead to align against (default: 0)
    #[argh(option)]
    pub lead: Option<usize>,

    /// common sampling rate in Hz (default: 512)
    #[argh(option)]
    pub target_rate: Option<f64>,

    /// sampling rate of delimited input files in Hz (default: 512)
    #[argh(option)]
    pub candidate_rate: Option<f64>,

    /// gain applied to the candidate (default: 0.12 binary, 1.0 delimited)
    #[argh(option)]
    pub candidate_scale: Option<f64>,

    /// first searched offset from the anchor (default: 0)
    #[argh(option)]
    pub lowpad: Option<usize>,

    /// end of the searched offsets, exclusive (default: 6000)
    #[argh(option)]
    pub highpad: Option<usize>,

    /// length of the aligned segments (default: 9000)
    #[argh(option)]
    pub plotrange: Option<usize>,

    /// half width of the zone excluded around the best peak (default: 50)
    #[argh(option)]
    pub blanking_width: Option<usize>,

    /// amplitude blanking: none, half-max (default: half-max binary, none delimited)
    #[argh(option)]
    pub blanking: Option<String>,

    /// samples subtracted from the candidate padding (default: 3 binary, 0 delimited)
    #[argh(option)]
    pub offset_correction: Option<usize>,

    /// native rate of the binary recording in Hz (default: 200)
    #[argh(option)]
    pub native_rate: Option<f64>,

    /// number of interleaved leads in the binary recording (default: 12)
    #[argh(option)]
    pub num_leads: Option<usize>,

    /// bytes skipped at the start of the binary recording (default: 0)
    #[argh(option)]
    pub header_size: Option<u64>,

    /// divisor applied to marker ticks (default: 24)
    #[argh(option)]
    pub marker_divisor: Option<f64>,

    /// discard a trailing partial record instead of failing
    #[argh(switch)]
    pub allow_partial_tail: bool,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// write the aligned segments to this CSV file
    #[argh(option)]
    pub output: Option<String>,

    /// write a JSON alignment report to this file
    #[argh(option)]
    pub report: Option<String>,

    /// split the binary recording at its markers into <prefix><n>.csv and exit
    #[argh(option)]
    pub split: Option<String>,

    /// remove the per-lead mean from each split segment
    #[argh(switch)]
    pub split_debias: bool,

    /// resample split segments to this rate in Hz
    #[argh(option)]
    pub split_rate: Option<f64>,

    /// show a progress bar during the offset search
    #[argh(switch)]
    pub progress: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
