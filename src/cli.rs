//! Command-line interface.
//!
//! Parses arguments, wires the coordinator's result stream to the
//! terminal (progress bar plus incremental result lines), hooks Ctrl-C to
//! cooperative cancellation, and hands the finished session to the
//! requested output format and optional CSV export.

use crate::error::{CliError, CliResult};
use crate::export;
use crate::interface;
use crate::output;
use crate::scanner::{ScanConfig, ScanCoordinator};
use crate::types::ScanSession;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Output format for the final session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV rows on stdout
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Discover live LAN hosts and probe common service ports.
///
/// Sweeps one or more CIDR ranges with a bounded worker pool, pinging
/// each host and checking ports 22, 80 and 443 on the reachable ones.
#[derive(Parser, Debug)]
#[command(name = "lansweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Discover live LAN hosts and probe common service ports", long_about = None)]
pub struct Cli {
    /// CIDR ranges to sweep (auto-detects the local /24 when omitted)
    ///
    /// Examples:
    ///   192.168.1.0/24     Local subnet
    ///   10.10.10.0/30      A second lab range
    #[arg(value_name = "RANGE")]
    pub ranges: Vec<String>,

    /// Maximum number of hosts probed concurrently
    #[arg(short, long, default_value = "50")]
    pub concurrency: usize,

    /// Reachability (ping) timeout in milliseconds
    #[arg(long = "ping-timeout", value_name = "MS", default_value = "1000")]
    pub ping_timeout: u64,

    /// TCP connect timeout per port in milliseconds
    #[arg(short = 't', long = "port-timeout", value_name = "MS", default_value = "1000")]
    pub port_timeout: u64,

    /// Output format for the final session
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Write the accumulated session to a CSV file
    #[arg(short = 'e', long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Also print offline hosts as they complete
    #[arg(long)]
    pub show_offline: bool,

    /// Suppress incremental output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute a sweep according to the parsed arguments.
pub async fn run(cli: Cli) -> CliResult<()> {
    let ranges = if cli.ranges.is_empty() {
        let detected = interface::local_cidr_or_default();
        info!(%detected, "no ranges given, using local subnet");
        vec![detected]
    } else {
        cli.ranges.clone()
    };

    let config = ScanConfig::new()
        .with_concurrency(cli.concurrency)
        .with_reachability_timeout(Duration::from_millis(cli.ping_timeout))
        .with_port_timeout(Duration::from_millis(cli.port_timeout));

    let coordinator = ScanCoordinator::new(config);
    let mut stream = coordinator.scan(&ranges)?;
    let total = stream.total_hosts();
    let started_at = stream.started_at();

    let plain = cli.output == OutputFormat::Plain && !cli.quiet;
    if plain {
        output::print_sweep_header(&ranges.join(", "), total);
    }

    // Ctrl-C requests cooperative cancellation; in-flight probes drain
    // and their results stay in the session.
    let handle = stream.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let progress = if plain {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} hosts")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut results = Vec::with_capacity(total);
    while let Some(result) = stream.recv().await {
        if let Some(pb) = &progress {
            pb.inc(1);
            if result.is_online() || cli.show_offline {
                pb.println(output::format_result_line(&result));
            }
        }
        results.push(result);
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let session = ScanSession::new(started_at, results);

    match cli.output {
        OutputFormat::Plain => {
            if !cli.quiet {
                output::print_summary(&session);
            }
        }
        OutputFormat::Json => {
            let json =
                output::session_json(&session).map_err(|e| CliError::Other(e.to_string()))?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            print!("{}", export::to_csv_string(&session)?);
        }
    }

    if let Some(path) = &cli.export {
        export::write_csv(&session, path)?;
        if !cli.quiet {
            output::print_info(&format!("Session exported to {}", path.display()));
        }
    }

    Ok(())
}
