use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Snapshot of one regular file taken at inventory time. The file may
/// change on disk afterwards; the snapshot is not refreshed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub modified_at: SystemTime,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SizeThresholds {
    /// Free-space floor below which cleanup triggers.
    pub minimum_free: u64,
    /// Additional headroom to create beyond the floor.
    pub cleanup_target: u64,
}

/// Outcome of one selection pass. `satisfied` is false only when the
/// inventory ran out before `collected_bytes` reached `required_bytes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReclamationPlan {
    pub required_bytes: i64,
    pub selected_files: Vec<FileRecord>,
    pub collected_bytes: u64,
    pub satisfied: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DispatchResult {
    pub dispatched: u64,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub run_id: String,
    pub generated_at: String,
    pub free_bytes: Option<u64>,
    pub minimum_free: u64,
    pub cleanup_target: u64,
    pub triggered: bool,
    #[serde(default)]
    pub scanned_files: u64,
    #[serde(default)]
    pub required_bytes: i64,
    #[serde(default)]
    pub selected_files: u64,
    #[serde(default)]
    pub collected_bytes: u64,
    #[serde(default)]
    pub satisfied: bool,
    #[serde(default)]
    pub dispatched: u64,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub warnings: Vec<String>,
}
