pub mod dispatch;
pub mod error;
pub mod evaluate;
pub mod healthcheck;
pub mod inventory;
pub mod model;
pub mod remote;
pub mod rewrite;
pub mod run;
pub mod schedule;
pub mod select;
pub mod size;

pub use dispatch::dispatch_plan;
pub use error::ReclaimError;
pub use evaluate::{bytes_to_reclaim, needs_cleanup};
pub use healthcheck::{read_log_tail, run_with_healthcheck, Healthcheck};
pub use inventory::{free_bytes, scan_directories};
pub use model::{DispatchResult, FileRecord, ReclamationPlan, RunReport, SizeThresholds};
pub use remote::{fs_root, RemoteClient, RemoteConfig};
pub use rewrite::{RewriteRule, RewriteTable};
pub use run::{execute_run, RunConfig};
pub use schedule::{CronTrigger, RunGuard, RunLock, Trigger};
pub use select::select_files;
pub use size::{format_size, parse_size};
