use tracing::{debug, warn};

use crate::model::{FileRecord, ReclamationPlan};
use crate::size::format_size;

/// Pick the files to relocate, oldest modification time first. The stop
/// condition is checked before each file is added, so the selection is
/// the smallest oldest-first prefix whose byte sum reaches
/// `required_bytes`; the last file may overshoot. Files sharing a
/// modification time keep their inventory order (stable sort). If the
/// inventory runs out first, every file is selected and the plan is
/// marked unsatisfied.
pub fn select_files(mut files: Vec<FileRecord>, required_bytes: i64) -> ReclamationPlan {
    files.sort_by_key(|file| file.modified_at);

    let mut selected_files = Vec::new();
    let mut collected_bytes = 0u64;

    for file in files {
        if reached(collected_bytes, required_bytes) {
            break;
        }
        collected_bytes = collected_bytes.saturating_add(file.size_bytes);
        selected_files.push(file);
    }

    let satisfied = reached(collected_bytes, required_bytes);
    debug!(
        selected = selected_files.len(),
        collected = collected_bytes,
        required = required_bytes,
        "files collected"
    );
    if !satisfied {
        warn!(
            "not enough files to reach the target: collected {}, required {}",
            format_size(collected_bytes),
            format_size(required_bytes.max(0) as u64)
        );
    }

    ReclamationPlan {
        required_bytes,
        selected_files,
        collected_bytes,
        satisfied,
    }
}

fn reached(collected_bytes: u64, required_bytes: i64) -> bool {
    required_bytes <= 0 || collected_bytes >= required_bytes as u64
}
