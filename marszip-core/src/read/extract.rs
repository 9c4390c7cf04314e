use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

use crate::error::{MarsError, Result};
use crate::scan::listing::{Listed, list_dir};

#[derive(Debug, Default)]
pub struct EntryReport {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    /// Per-entry failures; the rest of the source was still processed.
    pub failures: Vec<MarsError>,
}

impl EntryReport {
    fn fail(&mut self, source_path: &Path, entry: impl Into<String>, reason: impl ToString) {
        let err = MarsError::ExtractEntryFailed {
            source_path: source_path.to_path_buf(),
            entry: entry.into(),
            reason: reason.to_string(),
        };
        tracing::warn!(error = %err, "entry skipped");
        self.failures.push(err);
    }
}

/// Unpack every entry of `archive` into `dest`, creating or truncating files.
///
/// An unreadable container is an error; a bad entry is recorded in the report
/// and extraction carries on with the next one.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<EntryReport> {
    let f = File::open(archive).map_err(|e| MarsError::unavailable(archive, e))?;
    let mut za = ZipArchive::new(f)?;
    fs::create_dir_all(dest).map_err(|e| MarsError::unavailable(dest, e))?;

    let mut report = EntryReport::default();
    // directory modes are applied last so a read-only dir can still be filled
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for i in 0..za.len() {
        let mut entry = match za.by_index(i) {
            Ok(e) => e,
            Err(e) => {
                report.fail(archive, format!("#{i}"), e);
                continue;
            }
        };
        let name = entry.name().to_string();
        let is_dir = entry.is_dir();
        let mode = entry.unix_mode();

        let outp = match safe_join(dest, &name) {
            Ok(p) => p,
            Err(e) => {
                report.fail(archive, name, e);
                continue;
            }
        };

        if is_dir {
            match fs::create_dir_all(&outp) {
                Ok(()) => {
                    report.dirs += 1;
                    if let Some(m) = mode {
                        dir_modes.push((outp, m));
                    }
                }
                Err(e) => report.fail(archive, name, e),
            }
            continue;
        }

        match write_file(&mut entry, &outp, mode) {
            Ok(n) => {
                report.files += 1;
                report.bytes += n;
            }
            Err(e) => report.fail(archive, name, e),
        }
    }

    for (dir, m) in dir_modes.into_iter().rev() {
        if let Err(e) = set_mode(&dir, m) {
            tracing::warn!(path = %dir.display(), error = %e, "could not restore directory mode");
        }
    }

    tracing::debug!(
        archive = %archive.display(),
        dest = %dest.display(),
        files = report.files,
        failed = report.failures.len(),
        "archive extracted"
    );
    Ok(report)
}

fn write_file<R: Read>(entry: &mut R, outp: &Path, mode: Option<u32>) -> io::Result<u64> {
    if let Some(parent) = outp.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(outp)?;
    let n = io::copy(entry, &mut out)?;
    out.sync_all()?;
    drop(out);
    if let Some(m) = mode {
        set_mode(outp, m)?;
    }
    Ok(n)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Move every file under `src` into `dest`, recreating the directory tree.
///
/// Files are renamed, not copied, so `src` ends up holding only empty
/// directories (and whatever could not be moved). A destination file that
/// already exists is left alone and reported.
pub fn extract_folder(src: &Path, dest: &Path) -> Result<EntryReport> {
    let mut report = EntryReport::default();
    let entries = list_dir(src)?;
    move_tree(src, dest, entries, src, &mut report);
    tracing::debug!(
        folder = %src.display(),
        dest = %dest.display(),
        files = report.files,
        failed = report.failures.len(),
        "folder extracted"
    );
    Ok(report)
}

fn move_tree(
    dir: &Path,
    dest: &Path,
    entries: Vec<Listed>,
    origin: &Path,
    report: &mut EntryReport,
) {
    for e in entries {
        let from = dir.join(&e.name);
        let to = dest.join(&e.name);
        let rel = from
            .strip_prefix(origin)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| e.name.clone());

        if e.is_dir() {
            if let Err(err) = fs::create_dir_all(&to) {
                report.fail(origin, rel, err);
                continue;
            }
            match list_dir(&from) {
                Ok(children) => {
                    report.dirs += 1;
                    move_tree(&from, &to, children, origin, report);
                }
                Err(err) => report.fail(origin, rel, err),
            }
            continue;
        }

        if fs::symlink_metadata(&to).is_ok() {
            report.fail(origin, rel, format!("{} already exists", to.display()));
            continue;
        }
        match fs::rename(&from, &to) {
            Ok(()) => {
                report.files += 1;
                tracing::debug!(from = %from.display(), to = %to.display(), "moved");
            }
            Err(err) => report.fail(origin, rel, err),
        }
    }
}

fn safe_join(root: &Path, rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);
    let clean = p
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if p.is_absolute() || !clean || rel.contains("..\\") {
        return Err(MarsError::Format(format!("unsafe path: {rel}")));
    }
    Ok(root.join(p))
}
