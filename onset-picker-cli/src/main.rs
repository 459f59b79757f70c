//! Stop-Task Onset Picker CLI
//!
//! Command-line front end for the onset-picker library. It adds:
//! - Argument parsing
//! - Optional TOML configuration (naming conventions, column names)
//! - Log setup and progress output
//! - A batch summary (text or JSON)

use anyhow::{bail, Context, Result};
use clap::Parser;
use onset_picker::{LogReporter, OnsetPicker, Reporter, SilentReporter};
use std::path::PathBuf;

mod config;
mod report;

/// Onset Picker - Pick trial onsets from stop-task result files
#[derive(Parser, Debug)]
#[command(name = "onset-picker")]
#[command(about = "Pick onset data from stop-task CSV files", long_about = None)]
#[command(version)]
struct Args {
    /// Directory containing the stop-task CSV files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Directory (must exist) to write the onset files to
    #[arg(short, long, value_name = "DIR", alias = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop at the first file that fails instead of reporting it and continuing
    #[arg(long)]
    fail_fast: bool,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print what the tool is doing (errors are still shown)
    #[arg(short, long)]
    silent: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.silent);

    log::debug!("Onset Picker CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using picker library v{}", onset_picker::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };
    let app_config = app_config.with_overrides(args.output_dir.clone(), args.fail_fast);

    let reporter: Box<dyn Reporter> = if args.silent {
        Box::new(SilentReporter)
    } else {
        Box::new(LogReporter)
    };
    let picker = OnsetPicker::with_reporter(app_config.to_picker_config(), reporter);

    let batch = picker
        .process_directory(&args.directory)
        .with_context(|| format!("Failed to process directory {:?}", args.directory))?;

    if args.json {
        println!("{}", report::render_json(&batch)?);
    } else if !args.silent {
        print!("{}", report::render_text(&batch));
    }

    if !batch.is_success() {
        for failure in &batch.failures {
            log::error!("{}: {}", failure.input.display(), failure.error);
        }
        bail!("{} file(s) could not be processed", batch.failures.len());
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, silent: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if silent {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
