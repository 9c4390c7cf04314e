// marszip_core/src/run.rs
use std::fs;
use std::path::Path;

use crate::cleanup::remove_empty_dirs;
use crate::config::ARCHIVE_EXT;
use crate::domain::{BatchOutcome, ExtractOutcome, ExtractReport, PackReport, SequenceScan};
use crate::error::Result;
use crate::pack::materialize::materialize;
use crate::pack::planner::{loose_files, plan_batches};
use crate::pack::writer::{ArchiveOptions, pack_folder};
use crate::read::destination::resolve_destination;
use crate::read::extract::{extract_archive, extract_folder};
use crate::scan::listing::list_dir;
use crate::scan::numbering::{archive_name, resolve, scan_max_sequence};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackOptions {
    pub prefix: String,
    pub batch_size: usize,
    /// Remove each folder once its archive is written.
    pub delete_source: bool,
    /// Extensions (without the dot) that are never batched.
    pub exclude_extensions: Vec<String>,
    pub archive: ArchiveOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    pub prefix: String,
    pub only_matching_prefix: bool,
    pub delete_empty_folders: bool,
}

/// Batch the loose files of `source` into numbered folders and archive each.
///
/// Folder creation or a failed move ends the run with an error. A failed
/// archive is logged, its folder is kept, and the next batch goes ahead.
pub fn pack(source: &Path, opts: &PackOptions) -> Result<PackReport> {
    run_batches(source, opts, true)
}

/// Like [`pack`], but stops after the files are moved into their folders.
pub fn organize(source: &Path, opts: &PackOptions) -> Result<PackReport> {
    run_batches(source, opts, false)
}

fn run_batches(source: &Path, opts: &PackOptions, archive: bool) -> Result<PackReport> {
    let entries = list_dir(source)?;
    let scan = resolve(&entries, &opts.prefix);
    let files = loose_files(&entries, &opts.exclude_extensions);
    let batches = plan_batches(&files, opts.batch_size, scan)?;
    tracing::info!(
        source = %source.display(),
        files = files.len(),
        batches = batches.len(),
        first = scan.next(),
        "batches planned"
    );

    let mut report = PackReport::default();
    for batch in &batches {
        let folder = materialize(source, &opts.prefix, batch)?;
        let mut outcome = BatchOutcome {
            sequence: batch.sequence,
            folder: folder.clone(),
            files: batch.files.len(),
            archive: None,
            source_removed: false,
        };

        if archive {
            let out = source.join(archive_name(&opts.prefix, batch.sequence));
            match pack_folder(&folder, &out, &opts.archive) {
                Ok(stats) => {
                    tracing::info!(
                        archive = %out.display(),
                        files = stats.files,
                        bytes = stats.bytes,
                        "batch archived"
                    );
                    outcome.archive = Some(out);
                }
                Err(err) => {
                    tracing::warn!(sequence = batch.sequence, error = %err, "archive failed, folder kept");
                }
            }

            if opts.delete_source && outcome.archive.is_some() {
                match fs::remove_dir_all(&folder) {
                    Ok(()) => outcome.source_removed = true,
                    Err(err) => {
                        tracing::warn!(folder = %folder.display(), error = %err, "could not remove archived folder");
                    }
                }
            }
        } else {
            tracing::info!(folder = %folder.display(), files = batch.files.len(), "batch organized");
        }

        report.batches.push(outcome);
    }
    Ok(report)
}

/// Extract every `*.zip` directly under `source` into a folder named after it.
///
/// Only an unreadable `source` ends the run. A container that cannot be
/// opened or given a destination is recorded in its outcome and skipped.
pub fn extract_archives(source: &Path, opts: &ExtractOptions) -> Result<ExtractReport> {
    let entries = list_dir(source)?;
    let mut report = ExtractReport::default();

    let archives = entries.iter().filter(|e| {
        !e.is_dir()
            && e.extension()
                .is_some_and(|x| x.eq_ignore_ascii_case(ARCHIVE_EXT))
            && (!opts.only_matching_prefix || e.stem().starts_with(&opts.prefix))
    });

    for e in archives {
        report
            .items
            .push(extract_one_archive(source, &source.join(&e.name), e.stem()));
    }
    Ok(report)
}

fn extract_one_archive(source: &Path, path: &Path, stem: &str) -> ExtractOutcome {
    let mut outcome = ExtractOutcome {
        source: path.to_path_buf(),
        destination: source.join(stem),
        files: 0,
        failed: 0,
        error: None,
        cleaned: false,
    };
    let result = resolve_destination(source, stem).and_then(|dest| {
        let r = extract_archive(path, &dest);
        outcome.destination = dest;
        r
    });
    match result {
        Ok(r) => {
            outcome.files = r.files;
            outcome.failed = r.failures.len();
            tracing::info!(
                archive = %path.display(),
                dest = %outcome.destination.display(),
                files = r.files,
                "archive extracted"
            );
        }
        Err(err) => {
            tracing::warn!(archive = %path.display(), error = %err, "archive skipped");
            outcome.error = Some(err.to_string());
        }
    }
    outcome
}

/// Move the contents of every folder under `source` back into `source`.
///
/// With `delete_empty_folders`, prefix-matching folders are pruned of the
/// directories the move left empty. A folder that cannot be read is
/// recorded in its outcome and the run moves on.
pub fn extract_folders(source: &Path, opts: &ExtractOptions) -> Result<ExtractReport> {
    let entries = list_dir(source)?;
    let mut report = ExtractReport::default();

    let folders = entries
        .iter()
        .filter(|e| e.is_dir())
        .filter(|e| !opts.only_matching_prefix || e.name.starts_with(&opts.prefix));

    for e in folders {
        let cleanup = opts.delete_empty_folders && e.name.starts_with(&opts.prefix);
        report
            .items
            .push(extract_one_folder(source, &source.join(&e.name), cleanup));
    }
    Ok(report)
}

fn extract_one_folder(source: &Path, dir: &Path, cleanup: bool) -> ExtractOutcome {
    let mut outcome = ExtractOutcome {
        source: dir.to_path_buf(),
        destination: source.to_path_buf(),
        files: 0,
        failed: 0,
        error: None,
        cleaned: false,
    };
    match extract_folder(dir, source) {
        Ok(r) => {
            outcome.files = r.files;
            outcome.failed = r.failures.len();
        }
        Err(err) => {
            tracing::warn!(folder = %dir.display(), error = %err, "folder skipped");
            outcome.error = Some(err.to_string());
            return outcome;
        }
    }

    if cleanup {
        outcome.cleaned = remove_empty_dirs(dir).root_removed(dir);
    }
    tracing::info!(
        folder = %dir.display(),
        files = outcome.files,
        cleaned = outcome.cleaned,
        "folder extracted"
    );
    outcome
}

/// What the next batch under `prefix` in `source` would be numbered.
pub fn next_sequence(source: &Path, prefix: &str) -> Result<SequenceScan> {
    scan_max_sequence(source, prefix)
}
