use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MarsError;

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Directories left in place because something survived inside them.
    pub retained: Vec<PathBuf>,
    pub failures: Vec<MarsError>,
}

impl CleanupReport {
    /// True when the directory the cleanup started from is gone.
    pub fn root_removed(&self, root: &Path) -> bool {
        self.removed.iter().any(|p| p == root)
    }
}

/// Remove `root` and every directory beneath it that is empty once its own
/// children have been processed, deepest first. Files are never deleted; a
/// directory holding anything that survives is kept, and so are its
/// ancestors. Sibling subtrees are handled independently.
pub fn remove_empty_dirs(root: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();
    prune(root, &mut report);
    tracing::debug!(
        root = %root.display(),
        removed = report.removed.len(),
        retained = report.retained.len(),
        "cleanup finished"
    );
    report
}

/// Returns whether `dir` itself was removed.
fn prune(dir: &Path, report: &mut CleanupReport) -> bool {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(source) => {
            record(report, dir, source);
            return false;
        }
    };

    let mut clear = true;
    for e in rd {
        let e = match e {
            Ok(e) => e,
            Err(source) => {
                record(report, dir, source);
                clear = false;
                continue;
            }
        };
        let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir || !prune(&e.path(), report) {
            clear = false;
        }
    }

    if !clear {
        report.retained.push(dir.to_path_buf());
        return false;
    }
    match fs::remove_dir(dir) {
        Ok(()) => {
            report.removed.push(dir.to_path_buf());
            true
        }
        Err(source) => {
            record(report, dir, source);
            false
        }
    }
}

fn record(report: &mut CleanupReport, path: &Path, source: std::io::Error) {
    let err = MarsError::CleanupFailed {
        path: path.to_path_buf(),
        source,
    };
    tracing::warn!(error = %err, "cleanup step failed");
    report.failures.push(err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_fully_empty_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("P_1");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("d")).unwrap();

        let report = remove_empty_dirs(&root);
        assert!(report.root_removed(&root));
        assert_eq!(report.removed.len(), 5);
        assert!(report.failures.is_empty());
        assert!(!root.exists());
    }

    #[test]
    fn leftover_file_keeps_branch_and_ancestors_only() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("P_1");
        fs::create_dir_all(root.join("keep/deep")).unwrap();
        fs::create_dir_all(root.join("gone/deeper")).unwrap();
        fs::write(root.join("keep/deep/file.txt"), b"x").unwrap();

        let report = remove_empty_dirs(&root);
        assert!(!report.root_removed(&root));
        assert!(root.join("keep/deep/file.txt").is_file());
        assert!(!root.join("gone").exists());
        assert!(report.retained.contains(&root));
        assert!(report.retained.contains(&root.join("keep")));
        assert!(report.retained.contains(&root.join("keep/deep")));
    }

    #[test]
    fn missing_root_is_recorded_not_raised() {
        let tmp = tempfile::tempdir().unwrap();
        let report = remove_empty_dirs(&tmp.path().join("nope"));
        assert_eq!(report.failures.len(), 1);
        assert!(!report.failures[0].is_fatal());
    }
}
