use std::path::{Path, PathBuf};

use sysinfo::Disks;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ReclaimError;
use crate::model::FileRecord;

/// Recursively enumerate every regular file under the given roots.
/// Directories are traversed, not recorded; symlinks are not followed.
/// Result order is unspecified; sorting is the caller's concern. Any
/// unreadable entry aborts the whole scan; there is no per-entry
/// recovery.
pub fn scan_directories(roots: &[PathBuf]) -> Result<Vec<FileRecord>, ReclaimError> {
    let mut records = Vec::new();
    for root in roots {
        for item in WalkDir::new(root).follow_links(false) {
            let entry = item.map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone());
                ReclaimError::Inventory {
                    path,
                    source: err.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = entry.metadata().map_err(|err| ReclaimError::Inventory {
                path: entry.path().to_path_buf(),
                source: err.into(),
            })?;
            let modified_at = metadata.modified().map_err(|source| ReclaimError::Inventory {
                path: entry.path().to_path_buf(),
                source,
            })?;

            records.push(FileRecord {
                path: entry.into_path(),
                modified_at,
                size_bytes: metadata.len(),
            });
        }
    }
    debug!(files = records.len(), "inventory scan complete");
    Ok(records)
}

/// Available bytes on the volume hosting `path`, resolved by matching
/// the canonicalized path against the longest mounted prefix.
pub fn free_bytes(path: &Path) -> Result<u64, ReclaimError> {
    let probe = path
        .canonicalize()
        .map_err(|source| ReclaimError::Inventory {
            path: path.to_path_buf(),
            source,
        })?;

    let disks = Disks::new_with_refreshed_list();
    let mut best: Option<(u64, usize)> = None;
    for disk in disks.list() {
        let mount = disk.mount_point();
        if !probe.starts_with(mount) {
            continue;
        }
        let score = mount.as_os_str().len();
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((disk.available_space(), score)),
        }
    }

    best.map(|(available, _)| available)
        .ok_or(ReclaimError::FreeSpaceUnavailable(probe))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{free_bytes, scan_directories};

    #[test]
    fn collects_only_regular_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), b"aaaa").unwrap();
        let nested = dir.path().join("sub/deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.bin"), b"bb").unwrap();

        let records = scan_directories(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(records.len(), 2);
        let mut sizes: Vec<_> = records.iter().map(|r| r.size_bytes).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, [2, 4]);
        assert!(records.iter().all(|r| r.path.is_file()));
    }

    #[test]
    fn scans_multiple_roots() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("x"), b"1").unwrap();
        fs::write(second.path().join("y"), b"22").unwrap();

        let records =
            scan_directories(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_root_aborts_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("kept.bin"), b"data").unwrap();
        let roots = vec![
            dir.path().to_path_buf(),
            PathBuf::from("/nonexistent/inventory/root"),
        ];
        assert!(scan_directories(&roots).is_err());
    }

    #[test]
    fn empty_root_list_yields_no_records() {
        assert!(scan_directories(&[]).unwrap().is_empty());
    }

    #[test]
    fn free_bytes_rejects_missing_path() {
        assert!(free_bytes(Path::new("/nonexistent/inventory/root")).is_err());
    }
}
