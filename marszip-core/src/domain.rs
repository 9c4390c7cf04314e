// marszip_core/src/domain.rs
use std::path::PathBuf;

/// Highest sequence number found under a prefix, and whether anything
/// qualified at all (so `Prefix0` is distinguishable from "no entries").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceScan {
    pub max: u64,
    pub exists: bool,
}

impl SequenceScan {
    pub fn next(&self) -> u64 {
        if self.exists { self.max + 1 } else { 1 }
    }

    pub(crate) fn observe(&mut self, n: u64) {
        if !self.exists || n > self.max {
            self.max = n;
        }
        self.exists = true;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    pub sequence: u64,
    pub files: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct EntryRow {
    pub path: String,
    pub size: u64,
    pub compressed: u64,
    pub method: String,
    pub is_dir: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    pub skipped: u64,
}

#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub sequence: u64,
    pub folder: PathBuf,
    pub files: usize,
    /// `Some` only when the container was written successfully.
    pub archive: Option<PathBuf>,
    pub source_removed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PackReport {
    pub batches: Vec<BatchOutcome>,
}

impl PackReport {
    pub fn last_sequence(&self) -> Option<u64> {
        self.batches.last().map(|b| b.sequence)
    }

    pub fn archived(&self) -> usize {
        self.batches.iter().filter(|b| b.archive.is_some()).count()
    }
}

#[derive(Clone, Debug)]
pub struct ExtractOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub files: u64,
    pub failed: usize,
    /// Set when the whole source was skipped (unreadable container).
    pub error: Option<String>,
    pub cleaned: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    pub items: Vec<ExtractOutcome>,
}

impl ExtractReport {
    pub fn files(&self) -> u64 {
        self.items.iter().map(|i| i.files).sum()
    }

    pub fn failures(&self) -> usize {
        self.items
            .iter()
            .map(|i| i.failed + usize::from(i.error.is_some()))
            .sum()
    }
}
