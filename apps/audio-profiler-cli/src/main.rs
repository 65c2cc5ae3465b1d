//! Audio performance gate binary
//!
//! Usage: audio-profiler <profiler_output.json>
//!
//! Optional: place audio_thresholds.json next to the capture (or next to
//! this executable) to customize performance thresholds.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use audio_profiler::config;
use audio_profiler::{Capture, OutputFormat, ProfileRunner, Reporter};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "audio-profiler")]
#[command(
    version,
    about = "Validate audio profiler captures against performance thresholds"
)]
struct Args {
    /// Profiler capture to analyse
    metrics: PathBuf,

    /// Threshold override document; replaces the conventional lookup
    #[arg(long, value_name = "PATH")]
    thresholds: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(short, long, value_name = "PATH", default_value = "report.json")]
    output: PathBuf,

    /// Also write a Markdown summary
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Hide passed checks in the console report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Help and version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Report goes to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    ExitCode::from(run(&args))
}

fn run(args: &Args) -> u8 {
    info!("Loading metrics from: {}", args.metrics.display());
    let capture = match Capture::load(&args.metrics) {
        Ok(capture) => capture,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    let (policy, source) = config::load_policy(&threshold_candidates(args));
    info!("Thresholds: {}", source);

    let report = ProfileRunner::new(policy).run(&capture);

    if let Err(e) = Reporter::new(OutputFormat::Console)
        .show_passed(!args.quiet)
        .report(&report)
    {
        warn!("Failed to print report: {:#}", e);
    }

    match Reporter::new(OutputFormat::JsonPretty).write_to_file(&report, &args.output) {
        Ok(()) => info!("Detailed report saved to: {}", args.output.display()),
        Err(e) => warn!("Failed to save report: {:#}", e),
    }

    if let Some(summary) = &args.summary {
        if let Err(e) = Reporter::new(OutputFormat::Markdown)
            .show_passed(!args.quiet)
            .write_to_file(&report, summary)
        {
            warn!("Failed to save summary: {:#}", e);
        }
    }

    report.exit_code()
}

/// Explicit path, else the capture's directory, else the executable's.
fn threshold_candidates(args: &Args) -> Vec<PathBuf> {
    if let Some(path) = &args.thresholds {
        return vec![path.clone()];
    }

    let mut dirs: Vec<PathBuf> = Vec::new();
    let capture_dir = args
        .metrics
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    dirs.push(capture_dir.to_path_buf());

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        if !dirs.contains(&exe_dir) {
            dirs.push(exe_dir);
        }
    }

    config::candidate_paths(dirs)
}
