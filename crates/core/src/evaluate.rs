use crate::model::SizeThresholds;

/// Cleanup triggers when free space is at or below the floor; only
/// strictly more free space than the floor counts as sufficient.
pub fn needs_cleanup(free_bytes: u64, minimum_free: u64) -> bool {
    free_bytes <= minimum_free
}

/// Exact bytes that must leave the disk to restore the floor plus the
/// configured headroom. Negative when free space already exceeds both
/// combined; callers treat a non-positive result as nothing to reclaim.
pub fn bytes_to_reclaim(free_bytes: u64, thresholds: &SizeThresholds) -> i64 {
    let required = thresholds.minimum_free as i128 + thresholds.cleanup_target as i128
        - free_bytes as i128;
    required.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
