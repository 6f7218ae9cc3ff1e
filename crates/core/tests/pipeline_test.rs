use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

use disk_reclaimer_core::{
    bytes_to_reclaim, needs_cleanup, scan_directories, select_files, SizeThresholds,
};

fn write_with_mtime(path: &Path, size: usize, mtime_secs: u64) {
    fs::write(path, vec![0u8; size]).unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(mtime_secs))
        .unwrap();
}

#[test]
fn pipeline_selects_the_oldest_prefix_from_a_real_scan() {
    let dir = tempfile::tempdir().unwrap();
    write_with_mtime(&dir.path().join("a.bin"), 100, 1_000);
    write_with_mtime(&dir.path().join("b.bin"), 50, 2_000);
    write_with_mtime(&dir.path().join("c.bin"), 200, 3_000);

    let records = scan_directories(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(records.len(), 3);

    let thresholds = SizeThresholds {
        minimum_free: 100,
        cleanup_target: 50,
    };
    let free = 30;
    assert!(needs_cleanup(free, thresholds.minimum_free));
    let required = bytes_to_reclaim(free, &thresholds);
    assert_eq!(required, 120);

    let plan = select_files(records, required);
    let names: Vec<_> = plan
        .selected_files
        .iter()
        .map(|record| record.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, ["a.bin", "b.bin"]);
    assert_eq!(plan.collected_bytes, 150);
    assert!(plan.satisfied);
}

#[test]
fn pipeline_reports_under_collection_when_the_inventory_is_too_small() {
    let dir = tempfile::tempdir().unwrap();
    write_with_mtime(&dir.path().join("only.bin"), 64, 1_000);

    let records = scan_directories(&[dir.path().to_path_buf()]).unwrap();
    let plan = select_files(records, 4096);

    assert_eq!(plan.selected_files.len(), 1);
    assert_eq!(plan.collected_bytes, 64);
    assert!(!plan.satisfied);
}

#[test]
fn pipeline_is_a_no_op_when_nothing_is_required() {
    let dir = tempfile::tempdir().unwrap();
    write_with_mtime(&dir.path().join("fresh.bin"), 64, 1_000);

    let records = scan_directories(&[dir.path().to_path_buf()]).unwrap();
    let thresholds = SizeThresholds {
        minimum_free: 10,
        cleanup_target: 0,
    };
    let required = bytes_to_reclaim(500, &thresholds);
    assert!(required < 0);

    let plan = select_files(records, required);
    assert!(plan.selected_files.is_empty());
    assert!(plan.satisfied);
}
