use tracing::{debug, info};

use crate::error::ReclaimError;
use crate::model::{DispatchResult, ReclamationPlan};
use crate::remote::RemoteClient;
use crate::rewrite::RewriteTable;

/// Send the plan to the remote backend: probe it, push the per-run
/// options, then move each selected file in plan order. The source-side
/// path goes through the rewrite table; the destination keeps the local
/// path. The first failing move aborts the rest; already-moved files
/// stay moved.
pub fn dispatch_plan(
    plan: &ReclamationPlan,
    rewrites: &RewriteTable,
    client: &RemoteClient,
) -> Result<DispatchResult, ReclaimError> {
    client.ping()?;
    client.set_options()?;

    let mut dispatched = 0u64;
    for record in &plan.selected_files {
        let local = record.path.to_string_lossy();
        let remote = rewrites.resolve(&local);
        client.move_file(&remote, &local)?;
        dispatched += 1;
        debug!(file = %local, "move dispatched");
    }

    let result = DispatchResult {
        dispatched,
        dry_run: client.config().dry_run,
    };
    info!(
        moved = result.dispatched,
        dry_run = result.dry_run,
        "dispatch complete"
    );
    Ok(result)
}
