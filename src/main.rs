//! lclog CLI

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lclog::config::Config;
use lclog::format::{FileHeader, FooterProbe};
use lclog::validate::{collect_logs, validate_paths};
use lclog::{LogFile, ValidationReport};

#[derive(Debug, Parser)]
#[command(name = "lclog", version, about = "Decode and verify load-cell datalogger logs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check log integrity: header, footer, CRC32, sequence gaps, counts
    #[command(group(ArgGroup::new("input").required(true).args(["file", "batch"])))]
    Validate {
        /// Log file to validate
        file: Option<PathBuf>,
        /// Validate every .bin file in this directory
        #[arg(short, long, value_name = "DIR")]
        batch: Option<PathBuf>,
        /// Skip CRC32 verification
        #[arg(long)]
        no_crc: bool,
        /// Skip sequence gap checking
        #[arg(long)]
        no_gaps: bool,
        /// Print reports as JSON
        #[arg(short, long)]
        json: bool,
        /// TOML configuration file
        #[arg(short, long, value_name = "TOML")]
        config: Option<PathBuf>,
    },
    /// Show the decoded header and footer of a log
    Info {
        /// Log file to inspect
        file: PathBuf,
        /// Print as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct InfoOutput<'a> {
    header: &'a FileHeader,
    header_valid: bool,
    interleave_ratio: Option<u32>,
    footer: &'a FooterProbe,
    data_bytes: u64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Validate {
            file,
            batch,
            no_crc,
            no_gaps,
            json,
            config,
        } => run_validate(file, batch, no_crc, no_gaps, json, config).await,
        Command::Info { file, json } => run_info(&file, json),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run_validate(
    file: Option<PathBuf>,
    batch: Option<PathBuf>,
    no_crc: bool,
    no_gaps: bool,
    json: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let mut config = match config_path {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    if no_crc {
        config.validation.check_checksum = false;
    }
    if no_gaps {
        config.validation.check_gaps = false;
    }

    let paths = match (batch, file) {
        (Some(dir), _) => {
            if !dir.is_dir() {
                bail!("{} is not a directory", dir.display());
            }
            let logs = collect_logs(&dir)
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            if logs.is_empty() {
                bail!("No .bin files found in {}", dir.display());
            }
            logs
        }
        (None, Some(file)) => vec![file],
        (None, None) => bail!("Either a file or --batch <DIR> is required"),
    };

    let mut all_valid = true;
    let mut reports: Vec<ValidationReport> = Vec::new();
    for (path, result) in validate_paths(paths, &config).await {
        match result {
            Ok(report) => {
                all_valid &= report.is_valid;
                reports.push(report);
            }
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                all_valid = false;
            }
        }
    }

    if json {
        let text = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        println!("{text}");
    } else {
        for report in &reports {
            println!("{report}");
        }
    }

    Ok(all_valid)
}

fn run_info(file: &Path, json: bool) -> anyhow::Result<bool> {
    let log = LogFile::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let header = log.header();

    if json {
        let output = InfoOutput {
            header,
            header_valid: header.is_valid(),
            interleave_ratio: header.interleave_ratio().map(std::num::NonZeroU32::get),
            footer: log.footer_probe(),
            data_bytes: log.data_region().len(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(header.is_valid());
    }

    println!("File:             {}", file.display());
    println!("Magic:            {:#010X}", header.magic);
    println!("Version:          {}", header.version);
    println!("Header size:      {}", header.header_size);
    for err in header.structural_errors() {
        println!("  ! {err}");
    }
    println!("Device:           {}", header.device_id);
    println!("Start (us):       {}", header.start_timestamp_us);
    println!("Primary rate:     {} Hz", header.primary_rate_hz);
    println!("Secondary rate:   {} Hz", header.secondary_rate_hz);
    match header.interleave_ratio() {
        Some(ratio) => println!("Interleave ratio: {ratio}"),
        None => println!("Interleave ratio: none (primary only)"),
    }
    println!("Gain / bits:      {} / {}", header.gain, header.bit_depth);
    println!("Accel / gyro:     scale {} / scale {}", header.accel_scale, header.gyro_scale);
    println!("Data bytes:       {}", log.data_region().len());
    match log.footer_probe() {
        FooterProbe::Present(footer) => {
            println!("Footer:           present");
            println!("  Primary:        {}", footer.total_primary);
            println!("  Secondary:      {}", footer.total_secondary);
            println!("  Dropped:        {}", footer.dropped);
            println!("  Duration:       {:.3} s", footer.duration_secs());
            println!("  CRC32:          {:#010X}", footer.checksum);
        }
        FooterProbe::NoRegion { .. } => println!("Footer:           missing (no room for footer)"),
        FooterProbe::MagicMismatch { magic } => {
            println!("Footer:           missing (tail magic {magic:#010X})");
        }
    }

    Ok(header.is_valid())
}
