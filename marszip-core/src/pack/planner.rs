use crate::config::{ARCHIVE_EXT, CONFIG_FILE_NAME, TEMP_PREFIX};
use crate::domain::{Batch, SequenceScan};
use crate::error::{MarsError, Result};
use crate::scan::listing::Listed;

/// Files eligible for batching: not folders, not archives, not the config
/// file, not leftover in-progress archives, not excluded.
/// Input order is kept, so a sorted listing yields a sorted list.
pub fn loose_files(entries: &[Listed], excluded: &[String]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| !e.is_dir() && e.name != CONFIG_FILE_NAME)
        .filter(|e| !e.name.starts_with(TEMP_PREFIX))
        .filter(|e| match e.extension() {
            Some(ext) => {
                !ext.eq_ignore_ascii_case(ARCHIVE_EXT)
                    && !excluded.iter().any(|x| x.eq_ignore_ascii_case(ext))
            }
            None => true,
        })
        .map(|e| e.name.clone())
        .collect()
}

/// Split `files` into consecutive groups of at most `batch_size`, numbered
/// contiguously from `scan.next()`.
pub fn plan_batches(files: &[String], batch_size: usize, scan: SequenceScan) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(MarsError::InvalidOptions(
            "batch_size must be a positive integer".into(),
        ));
    }
    let mut sorted = files.to_vec();
    sorted.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

    let first = scan.next();
    Ok(sorted
        .chunks(batch_size)
        .zip(first..)
        .map(|(chunk, sequence)| Batch {
            sequence,
            files: chunk.to_vec(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::listing::EntryKind;

    fn file(name: &str) -> Listed {
        Listed {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    fn dir(name: &str) -> Listed {
        Listed {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i:03}.txt")).collect()
    }

    #[test]
    fn filters_dirs_archives_leftovers_and_excluded() {
        let entries = vec![
            dir("MarsGoExe_1"),
            file("MarsGoExe_1.zip"),
            file("marszip.exe"),
            file("README"),
            file("marszip.toml"),
            file(".marszip-a1B2c3"),
            file("a.txt"),
        ];
        let got = loose_files(&entries, &["exe".to_string()]);
        assert_eq!(got, ["README", "a.txt"]);
    }

    #[test]
    fn batch_sizes_and_numbers() {
        for (n, b) in [(0, 3), (1, 1), (10, 10), (11, 10), (25, 4), (7, 100)] {
            let files = names(n);
            let scan = SequenceScan { max: 6, exists: true };
            let batches = plan_batches(&files, b, scan).unwrap();

            assert_eq!(batches.len(), n.div_ceil(b), "n={n} b={b}");
            let total: usize = batches.iter().map(|x| x.files.len()).sum();
            assert_eq!(total, n);
            for (i, batch) in batches.iter().enumerate() {
                assert_eq!(batch.sequence, 7 + i as u64);
                if i + 1 < batches.len() {
                    assert_eq!(batch.files.len(), b);
                } else {
                    assert!(!batch.files.is_empty() && batch.files.len() <= b);
                }
            }
            let flat: Vec<String> = batches.into_iter().flat_map(|x| x.files).collect();
            assert_eq!(flat, files);
        }
    }

    #[test]
    fn sorts_bytewise_before_splitting() {
        let files: Vec<String> = ["b", "B", "a", "_"].iter().map(|s| s.to_string()).collect();
        let batches = plan_batches(&files, 2, SequenceScan::default()).unwrap();
        assert_eq!(batches[0].files, ["B", "_"]);
        assert_eq!(batches[1].files, ["a", "b"]);
        assert_eq!(batches[0].sequence, 1);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(plan_batches(&names(3), 0, SequenceScan::default()).is_err());
    }
}
