//! timeline - clean per-frame detection flags into subtitle intervals
//!
//! Commands:
//! - transform: frame records in, ASS events or a JSON timeline out
//! - validate: report malformed or out-of-order frame records
//! - config: print the default per-channel tuning

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use magia_timeline::encoder::{AssEncoder, TimelineEncoder};
use magia_timeline::schema::{FrameRecord, FrameRecordAdapter, ValidationResult};
use magia_timeline::{PipelineConfig, TimelineError, TimelineProcessor, MAGIA_VERSION};

#[derive(Parser)]
#[command(name = "timeline", version = MAGIA_VERSION)]
#[command(about = "Clean per-frame detection flags into subtitle intervals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleanup pipeline over frame records
    Transform {
        #[command(flatten)]
        source: Source,

        /// Output file path (- for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Ass)]
        output_format: OutputFormat,

        /// Per-channel tuning as JSON (see `timeline config`)
        #[arg(long)]
        config: Option<PathBuf>,

        /// ASS script copied ahead of the generated events
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Check frame records without running the pipeline
    Validate {
        #[command(flatten)]
        source: Source,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default tuning as JSON
    Config,
}

#[derive(Args)]
struct Source {
    /// Frame record file (- for stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = InputFormat::Ndjson)]
    input_format: InputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// One frame record per line
    Ndjson,
    /// A single JSON array of frame records
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// ASS `Dialogue:` lines
    Ass,
    /// Compact JSON timeline
    Json,
    /// Indented JSON timeline
    JsonPretty,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = match Cli::parse().command {
        Commands::Transform {
            source,
            output,
            output_format,
            config,
            template,
        } => transform(
            &source,
            &output,
            output_format,
            config.as_deref(),
            template.as_deref(),
        ),
        Commands::Validate { source, json } => validate(&source, json),
        Commands::Config => print_default_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = CliError {
                code: e.code(),
                message: e.to_string(),
                hint: e.hint(),
            };
            match serde_json::to_string(&report) {
                Ok(line) => eprintln!("{line}"),
                Err(_) => eprintln!("{}: {}", report.code, report.message),
            }
            ExitCode::FAILURE
        }
    }
}

fn transform(
    source: &Source,
    output: &Path,
    output_format: OutputFormat,
    config: Option<&Path>,
    template: Option<&Path>,
) -> Result<(), TimelineCliError> {
    let config = match config {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    let processor = TimelineProcessor::new(config)?;

    let records = source.read()?;
    if records.is_empty() {
        return Err(TimelineCliError::NoFrames);
    }
    let timeline = processor.process_records(&records)?;

    let rendered = match output_format {
        OutputFormat::Ass => {
            let encoder = match template {
                Some(path) => AssEncoder::with_header(fs::read_to_string(path)?),
                None => AssEncoder::new(),
            };
            encoder.encode(&timeline.iir)?
        }
        OutputFormat::Json => {
            let payload = TimelineEncoder::new().encode(&timeline.iir, timeline.frame_count)?;
            format!("{}\n", serde_json::to_string(&payload)?)
        }
        OutputFormat::JsonPretty => format!(
            "{}\n",
            TimelineEncoder::new().encode_to_json(&timeline.iir, timeline.frame_count)?
        ),
    };

    write_output(output, &rendered)?;
    log::info!(
        "{} frames -> {} intervals ({})",
        timeline.frame_count,
        timeline.iir.len(),
        output.display()
    );
    Ok(())
}

fn validate(source: &Source, json: bool) -> Result<(), TimelineCliError> {
    let records = source.read()?;
    let failures = FrameRecordAdapter::validate_records(&records);

    if json {
        let report = ValidationReport::new(records.len(), &failures);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for failure in &failures {
            println!(
                "record {} (frame {}): {}",
                failure.position, failure.frame_index, failure.error
            );
        }
        println!(
            "{} records checked, {} invalid",
            records.len(),
            failures.len()
        );
    }

    match failures.len() {
        0 => Ok(()),
        n => Err(TimelineCliError::InvalidRecords(n)),
    }
}

fn print_default_config() -> Result<(), TimelineCliError> {
    println!("{}", PipelineConfig::default().to_json()?);
    Ok(())
}

impl Source {
    fn read(&self) -> Result<Vec<FrameRecord>, TimelineCliError> {
        let text = if is_stdio(&self.input) {
            if atty::is(atty::Stream::Stdin) {
                log::warn!("reading frame records from a terminal; finish with Ctrl-D");
            }
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(&self.input)?
        };

        let records = match self.input_format {
            InputFormat::Ndjson => FrameRecordAdapter::parse_ndjson(&text)?,
            InputFormat::Json => FrameRecordAdapter::parse_array(&text)?,
        };
        log::debug!("{} frame records read", records.len());
        Ok(records)
    }
}

fn write_output(path: &Path, contents: &str) -> io::Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.flush()
    } else {
        fs::write(path, contents)
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

#[derive(Debug, thiserror::Error)]
enum TimelineCliError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Input contains no frame records")]
    NoFrames,

    #[error("{0} records failed validation")]
    InvalidRecords(usize),
}

impl TimelineCliError {
    fn code(&self) -> &'static str {
        match self {
            TimelineCliError::Io(_) => "IO_ERROR",
            TimelineCliError::Timeline(TimelineError::InvalidConfig(_)) => "CONFIG_ERROR",
            TimelineCliError::Timeline(TimelineError::ParseError(_))
            | TimelineCliError::Timeline(TimelineError::JsonError(_))
            | TimelineCliError::Json(_) => "PARSE_ERROR",
            TimelineCliError::Timeline(_) => "PIPELINE_ERROR",
            TimelineCliError::NoFrames => "NO_FRAMES",
            TimelineCliError::InvalidRecords(_) => "VALIDATION_FAILED",
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            TimelineCliError::Io(_) => Some("Check file paths and permissions"),
            TimelineCliError::Timeline(TimelineError::InvalidConfig(_)) => {
                Some("Start from the output of `timeline config`")
            }
            TimelineCliError::Timeline(TimelineError::FlagCount { .. })
            | TimelineCliError::Timeline(TimelineError::OutOfOrderFrame { .. })
            | TimelineCliError::Timeline(TimelineError::NegativeTimestamp { .. })
            | TimelineCliError::Timeline(TimelineError::InvalidSchemaVersion { .. }) => {
                Some("Run `timeline validate` to list every bad record")
            }
            TimelineCliError::Json(_) | TimelineCliError::Timeline(TimelineError::ParseError(_)) => {
                Some("Check --input-format matches the input")
            }
            TimelineCliError::NoFrames => Some("The input file is empty"),
            _ => None,
        }
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: &'static str,
    message: String,
    hint: Option<&'static str>,
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    invalid_records: usize,
    failures: Vec<FailureEntry>,
}

#[derive(serde::Serialize)]
struct FailureEntry {
    position: usize,
    frame_index: u64,
    error: String,
}

impl ValidationReport {
    fn new(total_records: usize, failures: &[ValidationResult]) -> Self {
        Self {
            total_records,
            invalid_records: failures.len(),
            failures: failures
                .iter()
                .map(|f| FailureEntry {
                    position: f.position,
                    frame_index: f.frame_index,
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}
