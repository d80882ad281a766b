//! Gesture CLI - Command-line interface for touchpad gesture classification
//!
//! Commands:
//! - classify: Replay a recorded trace and print the emitted events
//! - validate: Check a recorded trace for unusable samples
//! - config: Print or save the default classifier config
//! - doctor: Diagnose version, config and input availability

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use touchpad_gestures::trace::{replay, ReplayReport, TraceAdapter};
use touchpad_gestures::types::{ContactSample, GestureEvent};
use touchpad_gestures::{ClassifierConfig, GestureError, PRODUCER_NAME, VERSION};

/// Gesture - tap and swipe classification for head-worn touchpads
#[derive(Parser)]
#[command(name = "gesture")]
#[command(version = VERSION)]
#[command(about = "Classify touchpad contact traces into taps and swipes", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded trace and print the emitted events
    Classify {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Classifier config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print only recognised gestures, not scrolls or touch-ended events
        #[arg(long)]
        gestures_only: bool,

        /// Print the full replay report instead of the event stream
        #[arg(long)]
        report: bool,
    },

    /// Check a recorded trace for unusable samples
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or save the default classifier config
    Config {
        /// Write the config to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Diagnose version, config and input availability
    Doctor {
        /// Check a config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one sample per line)
    Ndjson,
    /// JSON array of samples
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// JSON array of events
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), GestureCliError> {
    match cli.command {
        Commands::Classify {
            input,
            input_format,
            output_format,
            config,
            gestures_only,
            report,
        } => cmd_classify(
            &input,
            input_format,
            output_format,
            config.as_deref(),
            gestures_only,
            report,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Config { output } => cmd_config(output.as_deref()),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn read_samples(input: &Path, input_format: InputFormat) -> Result<Vec<ContactSample>, GestureCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let samples = match input_format {
        InputFormat::Ndjson => TraceAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => TraceAdapter::parse_array(&input_data)?,
    };
    Ok(samples)
}

fn load_config(path: Option<&Path>) -> Result<ClassifierConfig, GestureCliError> {
    match path {
        Some(path) => Ok(ClassifierConfig::load(path)?),
        None => Ok(ClassifierConfig::default()),
    }
}

fn cmd_classify(
    input: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
    gestures_only: bool,
    report: bool,
) -> Result<(), GestureCliError> {
    let config = load_config(config)?;
    let samples = read_samples(input, input_format)?;

    if samples.is_empty() {
        return Err(GestureCliError::NoSamples);
    }

    TraceAdapter::ensure_valid(&samples)?;
    let replayed = replay(&config, &samples)?;
    info!(
        samples = replayed.sample_count,
        gestures = replayed.gestures.len(),
        "classified trace"
    );

    if report {
        print!("{}", format_report(&replayed, &output_format)?);
        return Ok(());
    }

    let events: Vec<&GestureEvent> = replayed
        .events
        .iter()
        .filter(|e| !gestures_only || e.gesture().is_some())
        .collect();
    print!("{}", format_output(&events, &output_format)?);
    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), GestureCliError> {
    let samples = read_samples(input, input_format)?;
    let results = TraceAdapter::validate_samples(&samples);

    let mut invalid: Vec<usize> = results.iter().map(|r| r.index).collect();
    invalid.dedup();

    let report = ValidationReport {
        total_samples: samples.len(),
        valid_samples: samples.len() - invalid.len(),
        invalid_samples: invalid.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total samples:   {}", report.total_samples);
        println!("Valid samples:   {}", report.valid_samples);
        println!("Invalid samples: {}", report.invalid_samples);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - Sample {}: {}", err.index, err.error);
            }
        }
    }

    if report.invalid_samples > 0 {
        Err(GestureCliError::ValidationFailed(report.invalid_samples))
    } else {
        Ok(())
    }
}

fn cmd_config(output: Option<&Path>) -> Result<(), GestureCliError> {
    let config = ClassifierConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            info!(path = %path.display(), "saved default config");
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), GestureCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} {}", PRODUCER_NAME, VERSION),
    });

    match config {
        Some(path) => match ClassifierConfig::load(path) {
            Ok(loaded) => checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Valid config (touch slop {}px, vertical gate {}°)",
                    loaded.touch_slop_px, loaded.vertical_gate_degrees
                ),
            }),
            Err(e) => checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            }),
        },
        None => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: "No config file specified, using defaults".to_string(),
        }),
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "Interactive terminal (pass a trace with -i <file>)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "Piped input available (use -i -)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Gesture Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(GestureCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn format_output(events: &[&GestureEvent], format: &OutputFormat) -> Result<String, GestureCliError> {
    let output = match format {
        OutputFormat::Ndjson => {
            let mut lines = String::new();
            for event in events {
                lines.push_str(&serde_json::to_string(event)?);
                lines.push('\n');
            }
            lines
        }
        OutputFormat::Json => format!("{}\n", serde_json::to_string(events)?),
        OutputFormat::JsonPretty => format!("{}\n", serde_json::to_string_pretty(events)?),
    };
    Ok(output)
}

fn format_report(report: &ReplayReport, format: &OutputFormat) -> Result<String, GestureCliError> {
    let output = match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(report)?,
        OutputFormat::Ndjson | OutputFormat::Json => serde_json::to_string(report)?,
    };
    Ok(format!("{}\n", output))
}

enum GestureCliError {
    Io(io::Error),
    Gesture(GestureError),
    Json(serde_json::Error),
    NoSamples,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for GestureCliError {
    fn from(e: io::Error) -> Self {
        GestureCliError::Io(e)
    }
}

impl From<GestureError> for GestureCliError {
    fn from(e: GestureError) -> Self {
        GestureCliError::Gesture(e)
    }
}

impl From<serde_json::Error> for GestureCliError {
    fn from(e: serde_json::Error) -> Self {
        GestureCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<GestureCliError> for CliError {
    fn from(e: GestureCliError) -> Self {
        match e {
            GestureCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            GestureCliError::Gesture(e) => {
                let (code, hint) = match &e {
                    GestureError::ParseError(_) | GestureError::JsonError(_) => (
                        "PARSE_ERROR",
                        "Each sample needs kind, x, y and timestamp_ms",
                    ),
                    GestureError::ConfigError(_) | GestureError::TomlError(_) => {
                        ("CONFIG_ERROR", "Run 'gesture config' for a valid starting point")
                    }
                    GestureError::IoError(_) => ("IO_ERROR", "Check file paths and permissions"),
                    GestureError::InvalidSample(_) | GestureError::OutOfOrder { .. } => {
                        ("VALIDATION_ERROR", "Run 'gesture validate' for details")
                    }
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            GestureCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            GestureCliError::NoSamples => CliError {
                code: "NO_SAMPLES".to_string(),
                message: "No samples found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            GestureCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} samples failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            GestureCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the checks above".to_string()),
            },
        }
    }
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_samples: usize,
    valid_samples: usize,
    invalid_samples: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
