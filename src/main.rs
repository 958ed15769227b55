//! Blackout - Command-Line Interface
//! Author: kartik4091
//! Created: 2025-06-06
//!
//! Redacts raw text or a PDF document and exports the result as a PDF or
//! as one JPEG per page.

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command, ValueEnum};
use blackout::config::RedactorConfig;
use blackout::error::{Error, DECODE_ALERT};
use blackout::oracle::{GeminiOracle, NoopOracle, PhraseOracle};
use blackout::render::PopplerRenderer;
use blackout::{ImageExporter, PdfExporter, RedactionMode, RedactionResult, Redactor, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Single multi-page PDF (default)
    Pdf,
    /// One JPEG per page
    Jpg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Independent random choice per word or grid cell (default)
    Random,
    /// Words containing phrases named by the oracle (text input only)
    AiSensitive,
}

impl From<ModeArg> for RedactionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Random => RedactionMode::Random,
            ModeArg::AiSensitive => RedactionMode::AiSensitive,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let matches = build_cli().get_matches();

    let log_level = matches
        .get_one::<LogLevel>("verbose")
        .copied()
        .unwrap_or(LogLevel::Info);
    init_logging(log_level);

    info!("🚀 Blackout v{} - Starting...", env!("CARGO_PKG_VERSION"));

    match run(&matches).await {
        Ok(()) => info!("🎉 Redaction completed successfully!"),
        Err(e) if e.is_user_visible() => {
            debug!("Decode failure: {}", e);
            eprintln!("{}", DECODE_ALERT);
            process::exit(1);
        }
        Err(e) => {
            error!("❌ Redaction failed: {}", e);
            process::exit(1);
        }
    }
}

async fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => RedactorConfig::load(path)?,
        None => RedactorConfig::default(),
    };
    if let Some(pdftoppm) = matches.get_one::<String>("pdftoppm") {
        config.render.pdftoppm_path = PathBuf::from(pdftoppm);
    }

    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or(OutputFormat::Pdf);
    let output = output_path(matches, format, &config);

    let mut session = Session::new();
    session.set_intensity(matches.get_one::<u8>("intensity").copied().unwrap_or(30))?;
    if let Some(mode) = matches.get_one::<ModeArg>("mode") {
        session.set_mode((*mode).into());
    }
    select_input(&mut session, matches)?;

    let redactor = Redactor::new(
        config.clone(),
        Arc::new(PopplerRenderer::new(config.render.pdftoppm_path.clone())),
        build_oracle(&config),
    );

    let mut rng = match matches.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };

    display_config_summary(&session, &output, format);
    let start_time = std::time::Instant::now();

    let result = session
        .generate(&redactor, &mut rng, &mut |update| {
            info!("⏳ Progress: {}% ({}/{})", update.percent, update.completed, update.total);
        })
        .await?;

    display_completion_summary(result, start_time.elapsed());
    if !matches.get_flag("force") {
        refuse_overwrite(&planned_outputs(result, format, &output, &config))?;
    }
    export(result, format, &output, &config)
}

fn select_input(session: &mut Session, matches: &ArgMatches) -> Result<(), Error> {
    if let Some(path) = matches.get_one::<String>("input") {
        let bytes = fs::read(path)?;
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        session.select_document(name, bytes);
    } else if let Some(text) = matches.get_one::<String>("text") {
        session.set_text(text.as_str());
    } else if let Some(path) = matches.get_one::<String>("text-file") {
        session.set_text(fs::read_to_string(path)?);
    }
    Ok(())
}

/// Falls back to an oracle that finds nothing when the HTTP client cannot be built
fn build_oracle(config: &RedactorConfig) -> Arc<dyn PhraseOracle> {
    match GeminiOracle::new(&config.oracle) {
        Ok(oracle) => Arc::new(oracle),
        Err(e) => {
            warn!("⚠️ Phrase oracle unavailable, continuing without it: {}", e);
            Arc::new(NoopOracle)
        }
    }
}

fn output_path(matches: &ArgMatches, format: OutputFormat, config: &RedactorConfig) -> PathBuf {
    match (matches.get_one::<String>("output"), format) {
        (Some(path), _) => PathBuf::from(path),
        (None, OutputFormat::Pdf) => PathBuf::from(&config.export.pdf_file_name),
        (None, OutputFormat::Jpg) => PathBuf::from("."),
    }
}

/// Paths `export` would write for this result
fn planned_outputs(
    result: &RedactionResult,
    format: OutputFormat,
    output: &Path,
    config: &RedactorConfig,
) -> Vec<PathBuf> {
    match format {
        OutputFormat::Pdf => vec![PdfExporter::new(&config.export).target_path(output)],
        OutputFormat::Jpg => {
            ImageExporter::new(&config.export).planned_paths(output, result.pages.len())
        }
    }
}

fn refuse_overwrite(paths: &[PathBuf]) -> Result<(), Error> {
    match paths.iter().find(|path| path.exists()) {
        Some(existing) => Err(Error::InvalidInput(format!(
            "Output file already exists: {} (use --force to overwrite)",
            existing.display()
        ))),
        None => Ok(()),
    }
}

fn export(
    result: &RedactionResult,
    format: OutputFormat,
    output: &Path,
    config: &RedactorConfig,
) -> Result<(), Error> {
    match format {
        OutputFormat::Pdf => {
            let exporter = PdfExporter::new(&config.export);
            let written = exporter.write_to(&result.pages, output)?;
            info!("📄 Output: {}", written.display());
        }
        OutputFormat::Jpg => {
            let exporter = ImageExporter::new(&config.export);
            for path in exporter.write_to_dir(&result.pages, output)? {
                info!("🖼️ Output: {}", path.display());
            }
        }
    }
    Ok(())
}

fn build_cli() -> Command {
    Command::new("Blackout")
        .version(env!("CARGO_PKG_VERSION"))
        .author("kartik4091")
        .about("Redacts text and PDF pages with random or phrase-targeted blackouts")

        // Input
        .arg(Arg::new("input")
            .short('i')
            .long("input")
            .value_name("FILE")
            .help("PDF document to redact"))

        .arg(Arg::new("text")
            .short('t')
            .long("text")
            .value_name("TEXT")
            .help("Raw text to redact"))

        .arg(Arg::new("text-file")
            .long("text-file")
            .value_name("FILE")
            .help("File whose contents are redacted as raw text"))

        .group(ArgGroup::new("source")
            .args(["input", "text", "text-file"])
            .required(true))

        // Redaction options
        .arg(Arg::new("intensity")
            .short('n')
            .long("intensity")
            .value_name("0-100")
            .value_parser(clap::value_parser!(u8).range(0..=100))
            .default_value("30")
            .help("Percentage of content to redact"))

        .arg(Arg::new("mode")
            .short('m')
            .long("mode")
            .value_parser(clap::value_parser!(ModeArg))
            .default_value("random")
            .help("Redaction mode; documents always use grid redaction"))

        .arg(Arg::new("seed")
            .long("seed")
            .value_name("SEED")
            .value_parser(clap::value_parser!(u64))
            .help("Seed for reproducible redactions"))

        // Output
        .arg(Arg::new("format")
            .short('f')
            .long("format")
            .value_parser(clap::value_parser!(OutputFormat))
            .default_value("pdf")
            .help("Output format"))

        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("PATH")
            .help("Output PDF file, or directory for JPEG pages"))

        .arg(Arg::new("force")
            .long("force")
            .action(ArgAction::SetTrue)
            .help("Force overwrite existing output files"))

        // Configuration
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Configuration file (JSON/YAML)"))

        .arg(Arg::new("pdftoppm")
            .long("pdftoppm")
            .value_name("PATH")
            .help("Location of the pdftoppm binary"))

        // Logging
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .value_parser(clap::value_parser!(LogLevel))
            .default_value("info")
            .help("Set logging verbosity"))
}

fn init_logging(level: LogLevel) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let filter_level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blackout={}", filter_level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn display_config_summary(session: &Session, output: &Path, format: OutputFormat) {
    info!("📋 Configuration Summary:");
    match session.input() {
        Some(input) => info!("   Input:     {:?}", input),
        None => info!("   Input:     none"),
    }
    info!("   Output:    {} ({:?})", output.display(), format);
    info!("   Intensity: {}", session.intensity());
    info!("   Mode:      {}", session.mode());
}

fn display_completion_summary(result: &RedactionResult, duration: std::time::Duration) {
    let stats = &result.stats;
    info!("📊 Redaction Summary:");
    info!("   Total Time: {:.2?}", duration);
    info!("   Pages: {} rendered, {} skipped", stats.pages_rendered, stats.pages_skipped);
    if result.redacted_text.is_some() {
        info!("   Words: {}/{} redacted", stats.tokens_redacted, stats.tokens_total);
        info!("   Phrases detected: {}", stats.phrases_detected);
    } else {
        info!("   Regions filled: {}", stats.regions_filled);
    }
    if stats.full_blackout {
        info!("   Full blackout applied");
    }
}
