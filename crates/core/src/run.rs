use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::dispatch::dispatch_plan;
use crate::error::ReclaimError;
use crate::evaluate::{bytes_to_reclaim, needs_cleanup};
use crate::inventory::{free_bytes, scan_directories};
use crate::model::{RunReport, SizeThresholds};
use crate::remote::RemoteClient;
use crate::rewrite::RewriteTable;
use crate::select::select_files;
use crate::size::format_size;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Roots scanned for reclaimable files.
    pub directories: Vec<PathBuf>,
    pub thresholds: SizeThresholds,
    pub rewrites: RewriteTable,
}

/// One full reclamation pass: free-space gate, inventory, selection,
/// dispatch. Returns a report of what happened; a report with
/// `triggered: false` means the gate found enough free space and
/// nothing was touched.
///
/// Free space is measured on the volume of the process working
/// directory, not on the scanned roots. Surprising, but intentional:
/// the tool is expected to run with its working directory on the disk
/// it guards.
pub fn execute_run(config: &RunConfig, client: &RemoteClient) -> Result<RunReport, ReclaimError> {
    let started = Instant::now();
    let mut report = RunReport {
        run_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        free_bytes: None,
        minimum_free: config.thresholds.minimum_free,
        cleanup_target: config.thresholds.cleanup_target,
        triggered: false,
        scanned_files: 0,
        required_bytes: 0,
        selected_files: 0,
        collected_bytes: 0,
        satisfied: true,
        dispatched: 0,
        dry_run: client.config().dry_run,
        elapsed_ms: 0,
        warnings: Vec::new(),
    };

    if config.directories.is_empty() {
        warn!("no directories configured; nothing to do");
        report
            .warnings
            .push("no directories configured; nothing to do".to_string());
        report.elapsed_ms = elapsed_ms(&started);
        return Ok(report);
    }

    let free = free_bytes(Path::new("."))?;
    report.free_bytes = Some(free);
    debug!(
        free = %format_size(free),
        floor = %format_size(config.thresholds.minimum_free),
        "free space check"
    );

    if !needs_cleanup(free, config.thresholds.minimum_free) {
        info!("enough free space: {}", format_size(free));
        report.elapsed_ms = elapsed_ms(&started);
        return Ok(report);
    }
    report.triggered = true;

    let files = scan_directories(&config.directories)?;
    report.scanned_files = files.len() as u64;

    let required = bytes_to_reclaim(free, &config.thresholds);
    report.required_bytes = required;
    debug!("space to free: {}", format_size(required.max(0) as u64));

    let plan = select_files(files, required);
    report.selected_files = plan.selected_files.len() as u64;
    report.collected_bytes = plan.collected_bytes;
    report.satisfied = plan.satisfied;
    if !plan.satisfied {
        report.warnings.push(format!(
            "inventory exhausted before reaching the target: collected {}, required {}",
            format_size(plan.collected_bytes),
            format_size(required.max(0) as u64)
        ));
    }

    let dispatch = dispatch_plan(&plan, &config.rewrites, client)?;
    report.dispatched = dispatch.dispatched;
    report.elapsed_ms = elapsed_ms(&started);
    info!(
        moved = report.dispatched,
        satisfied = report.satisfied,
        "run complete"
    );
    Ok(report)
}

fn elapsed_ms(started: &Instant) -> u64 {
    started.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}
