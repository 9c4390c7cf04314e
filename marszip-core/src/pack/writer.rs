use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::Builder;
use time::OffsetDateTime;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::codec::CodecId;
use crate::config::TEMP_PREFIX;
use crate::domain::ArchiveStats;
use crate::error::{MarsError, Result};
use crate::pack::walker::{TraversalMode, walk};

const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub mode: TraversalMode,
    pub codec: CodecId,
    /// When true, every entry gets the DOS epoch as its timestamp.
    pub deterministic: bool,
}

fn mode_from(md: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        md.permissions().mode() & 0o7777
    }
    #[cfg(not(unix))]
    {
        if md.is_dir() { 0o755 } else { 0o644 }
    }
}

fn mtime_from(md: &fs::Metadata, deterministic: bool) -> DateTime {
    if deterministic {
        return DateTime::default();
    }
    md.modified()
        .ok()
        .map(OffsetDateTime::from)
        .and_then(|t| {
            DateTime::from_date_and_time(
                u16::try_from(t.year()).ok()?,
                t.month() as u8,
                t.day(),
                t.hour(),
                t.minute(),
                t.second(),
            )
            .ok()
        })
        .unwrap_or_default()
}

fn entry_options(md: &fs::Metadata, opts: &ArchiveOptions) -> SimpleFileOptions {
    let method = if md.is_dir() {
        CompressionMethod::Stored
    } else {
        opts.codec.method()
    };
    SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(mode_from(md))
        .last_modified_time(mtime_from(md, opts.deterministic))
        .large_file(md.len() >= ZIP64_THRESHOLD)
}

/// Write every file under `folder` into a single container at `out`.
///
/// The container is assembled in a temporary file beside `out` and only
/// renamed into place once complete, so a failure never leaves a partial
/// archive behind. Any failure surfaces as [`MarsError::ArchiveCreateFailed`].
pub fn pack_folder(folder: &Path, out: &Path, opts: &ArchiveOptions) -> Result<ArchiveStats> {
    let fail = |reason: String| MarsError::ArchiveCreateFailed {
        path: out.to_path_buf(),
        reason,
    };
    let parent = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .map_err(|e| fail(e.to_string()))?;
    // On any error below `tmp` is dropped, which deletes the partial file.
    let stats = write_entries(folder, tmp.as_file_mut(), opts).map_err(|e| fail(e.to_string()))?;
    // temp files start out owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(ARCHIVE_MODE))
            .map_err(|e| fail(e.to_string()))?;
    }
    tmp.persist(out).map_err(|e| fail(e.error.to_string()))?;

    tracing::debug!(
        folder = %folder.display(),
        archive = %out.display(),
        files = stats.files,
        dirs = stats.dirs,
        bytes = stats.bytes,
        "archive written"
    );
    Ok(stats)
}

fn write_entries(folder: &Path, out: &mut File, opts: &ArchiveOptions) -> Result<ArchiveStats> {
    let plan = walk(folder, opts.mode)?;
    let mut stats = ArchiveStats {
        skipped: plan.skipped,
        ..Default::default()
    };

    let mut zw = ZipWriter::new(out);
    for entry in &plan.entries {
        let md = fs::metadata(&entry.source)?;
        let options = entry_options(&md, opts);
        if entry.is_dir {
            zw.add_directory(entry.name.as_str(), options)?;
            stats.dirs += 1;
        } else {
            zw.start_file(entry.name.as_str(), options)?;
            let mut src = File::open(&entry.source)?;
            stats.bytes += io::copy(&mut src, &mut zw)?;
            stats.files += 1;
        }
    }

    let f = zw.finish()?;
    f.sync_all()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn names_in(archive: &Path) -> Vec<String> {
        let mut za = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        (0..za.len())
            .map(|i| za.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn recursive_pack_stores_relative_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("MarsGoExe_1");
        fs::create_dir_all(folder.join("sub")).unwrap();
        fs::write(folder.join("a.txt"), b"alpha").unwrap();
        fs::write(folder.join("sub/b.txt"), b"beta").unwrap();
        let out = tmp.path().join("MarsGoExe_1.zip");

        let stats = pack_folder(&folder, &out, &ArchiveOptions::default()).unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.dirs, 1);
        assert_eq!(stats.bytes, 9);
        assert_eq!(names_in(&out), ["a.txt", "sub/", "sub/b.txt"]);

        let mut za = ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let mut e = za.by_name("sub/b.txt").unwrap();
        assert_eq!(e.compression(), CompressionMethod::Deflated);
        let mut s = String::new();
        e.read_to_string(&mut s).unwrap();
        assert_eq!(s, "beta");
    }

    #[test]
    fn flat_pack_uses_base_names() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("P_2");
        fs::create_dir_all(folder.join("nested")).unwrap();
        fs::write(folder.join("one.txt"), b"1").unwrap();
        fs::write(folder.join("nested/two.txt"), b"2").unwrap();
        let out = tmp.path().join("P_2.zip");

        let opts = ArchiveOptions {
            mode: TraversalMode::Flat,
            codec: CodecId::Store,
            ..Default::default()
        };
        pack_folder(&folder, &out, &opts).unwrap();
        assert_eq!(names_in(&out), ["two.txt", "one.txt"]);
    }

    #[test]
    fn deterministic_packs_are_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("P_1");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("x.bin"), vec![7u8; 4096]).unwrap();
        let opts = ArchiveOptions {
            deterministic: true,
            ..Default::default()
        };

        let a = tmp.path().join("a.zip");
        let b = tmp.path().join("b.zip");
        pack_folder(&folder, &a, &opts).unwrap();
        pack_folder(&folder, &b, &opts).unwrap();
        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn archive_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("P_1");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("a.txt"), b"a").unwrap();
        let out = tmp.path().join("P_1.zip");

        pack_folder(&folder, &out, &ArchiveOptions::default()).unwrap();
        let mode = fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn failure_leaves_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("P_9.zip");

        let err = pack_folder(&tmp.path().join("missing"), &out, &ArchiveOptions::default())
            .unwrap_err();
        assert!(matches!(err, MarsError::ArchiveCreateFailed { .. }));
        assert!(!err.is_fatal());
        assert!(!out.exists());
        let leftovers: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }
}
