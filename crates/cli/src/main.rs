use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use disk_reclaimer_core::{
    execute_run, format_size, parse_size, run_with_healthcheck, CronTrigger, Healthcheck,
    RemoteClient, RemoteConfig, RewriteTable, RunConfig, RunLock, RunReport, SizeThresholds,
    Trigger,
};
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "disk-reclaimer",
    version,
    about = "Move the oldest files to a remote backend when local free space runs low."
)]
struct Cli {
    /// Directories to scan for reclaimable files.
    #[arg(long = "directories", value_name = "PATH", num_args = 1.., action = ArgAction::Append, required = true)]
    directories: Vec<PathBuf>,

    /// Free-space floor that triggers cleanup (e.g. 500M, 10G, 1T).
    #[arg(long, default_value = "10G", value_name = "SIZE")]
    min_free: String,

    /// Additional headroom to create beyond the floor.
    #[arg(long, default_value = "20G", value_name = "SIZE")]
    cleanup_target: String,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Remote path rewrite rules; repeatable, first declared wins.
    #[arg(long = "remote-map", value_name = "PATTERN=REPLACEMENT", action = ArgAction::Append)]
    remote_map: Vec<String>,

    /// rclone remote-control endpoint, e.g. http://host:5572
    #[arg(long, value_name = "URL")]
    remote_url: String,

    /// Source remote name (`/` for the local filesystem root).
    #[arg(long, default_value = "/", value_name = "REMOTE")]
    source_fs: String,

    /// Destination remote name.
    #[arg(long, default_value = "/", value_name = "REMOTE")]
    dest_fs: String,

    #[arg(long, default_value = "", value_name = "USER")]
    auth_user: String,

    #[arg(long, default_value = "", value_name = "PASSWORD")]
    auth_password: String,

    /// Ask the remote to simulate moves; pass --dry-run=false to move
    /// for real.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    dry_run: bool,

    /// Crontab expression enabling scheduled mode.
    #[arg(long, value_name = "EXPR")]
    cron: Option<String>,

    /// Monitoring endpoint pinged at run start, success and failure
    /// (scheduled mode).
    #[arg(long, value_name = "URL")]
    healthcheck_url: Option<String>,

    /// Also write log output to this file; its tail becomes the
    /// healthcheck payload.
    #[arg(long, value_name = "FILE")]
    logfile: Option<PathBuf>,

    /// Write a JSON run report (one-shot mode).
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.logfile.as_deref())?;

    let thresholds = SizeThresholds {
        minimum_free: parse_size(&cli.min_free)
            .with_context(|| format!("invalid --min-free '{}'", cli.min_free))?,
        cleanup_target: parse_size(&cli.cleanup_target)
            .with_context(|| format!("invalid --cleanup-target '{}'", cli.cleanup_target))?,
    };

    let mut pairs = Vec::new();
    for raw in &cli.remote_map {
        let (pattern, replacement) = raw.split_once('=').ok_or_else(|| {
            anyhow!("invalid --remote-map '{raw}': expected PATTERN=REPLACEMENT")
        })?;
        pairs.push((pattern.to_string(), replacement.to_string()));
    }
    let rewrites = RewriteTable::from_pairs(&pairs)?;

    let client = RemoteClient::new(RemoteConfig {
        url: cli.remote_url.clone(),
        source_fs: cli.source_fs.clone(),
        dest_fs: cli.dest_fs.clone(),
        username: cli.auth_user.clone(),
        password: cli.auth_password.clone(),
        dry_run: cli.dry_run,
    })?;

    let run_config = RunConfig {
        directories: cli.directories.clone(),
        thresholds,
        rewrites,
    };

    match &cli.cron {
        None => {
            let report = execute_run(&run_config, &client)?;
            if let Some(path) = &cli.report {
                let payload = serde_json::to_string_pretty(&report)
                    .context("failed to serialize run report")?;
                fs::write(path, payload)
                    .with_context(|| format!("failed to write report to {}", path.display()))?;
                println!("Report written to {}", path.display());
            }
            print_summary(&report);
            Ok(())
        }
        Some(expression) => {
            let trigger = CronTrigger::new(expression)?;
            let healthcheck = match &cli.healthcheck_url {
                Some(url) => Some(Healthcheck::new(url.clone(), cli.logfile.clone())?),
                None => None,
            };
            let lock = RunLock::default();

            trigger.run(&mut || {
                let Some(_guard) = lock.try_acquire() else {
                    warn!("previous run still in progress; skipping this tick");
                    return Ok(());
                };
                run_with_healthcheck(healthcheck.as_ref(), || {
                    execute_run(&run_config, &client).map(|report| {
                        info!(
                            run_id = %report.run_id,
                            triggered = report.triggered,
                            dispatched = report.dispatched,
                            "scheduled run finished"
                        );
                    })
                })
            })?;
            Ok(())
        }
    }
}

fn print_summary(report: &RunReport) {
    match report.free_bytes {
        Some(free) => println!("Free space: {}", format_size(free)),
        None => println!("Free space: not checked"),
    }
    if !report.triggered {
        println!("Nothing to do; free space is above the floor.");
        return;
    }
    println!(
        "Scanned {} file(s); selected {} totalling {}; dispatched {}{}.",
        report.scanned_files,
        report.selected_files,
        format_size(report.collected_bytes),
        report.dispatched,
        if report.dry_run { " [dry-run]" } else { "" }
    );
    for warning in &report.warnings {
        println!("Warning: {warning}");
    }
}

fn init_tracing(level: LogLevel, logfile: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
    match logfile {
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open logfile {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stdout.and(Arc::new(file)))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    }
    Ok(())
}
