use std::path::Path;

use crate::config::ARCHIVE_EXT;
use crate::domain::SequenceScan;
use crate::error::Result;
use crate::scan::listing::{Listed, list_dir};

/// Digits only: no sign, no whitespace, no empty string.
pub fn parse_sequence(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Sequence number an entry carries under `prefix`, if it belongs to the
/// sequence at all. Folders use their whole name, archives their stem.
pub fn sequence_of(entry: &Listed, prefix: &str) -> Option<u64> {
    let numbered = if entry.is_dir() {
        entry.name.as_str()
    } else if entry
        .extension()
        .is_some_and(|x| x.eq_ignore_ascii_case(ARCHIVE_EXT))
    {
        entry.stem()
    } else {
        return None;
    };
    numbered.strip_prefix(prefix).and_then(parse_sequence)
}

pub fn resolve(entries: &[Listed], prefix: &str) -> SequenceScan {
    let mut scan = SequenceScan::default();
    for n in entries.iter().filter_map(|e| sequence_of(e, prefix)) {
        scan.observe(n);
    }
    scan
}

pub fn scan_max_sequence(dir: &Path, prefix: &str) -> Result<SequenceScan> {
    let entries = list_dir(dir)?;
    Ok(resolve(&entries, prefix))
}

pub fn folder_name(prefix: &str, sequence: u64) -> String {
    format!("{prefix}{sequence}")
}

pub fn archive_name(prefix: &str, sequence: u64) -> String {
    format!("{prefix}{sequence}.{ARCHIVE_EXT}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::listing::EntryKind;
    use std::fs;

    fn dir(name: &str) -> Listed {
        Listed {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    fn file(name: &str) -> Listed {
        Listed {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert_eq!(parse_sequence("12"), Some(12));
        assert_eq!(parse_sequence("007"), Some(7));
        assert_eq!(parse_sequence(""), None);
        assert_eq!(parse_sequence("abc"), None);
        assert_eq!(parse_sequence("-1"), None);
        assert_eq!(parse_sequence("+1"), None);
        assert_eq!(parse_sequence("1a"), None);
        assert_eq!(parse_sequence("99999999999999999999999"), None);
    }

    #[test]
    fn folders_and_archives_both_count() {
        let entries = [
            dir("MarsGoExe_3"),
            file("MarsGoExe_5.zip"),
            file("MarsGoExe_9.txt"),
            dir("Other_12"),
            dir("MarsGoExe_abc"),
            file("MarsGoExe_7"),
        ];
        let scan = resolve(&entries, "MarsGoExe_");
        assert!(scan.exists);
        assert_eq!(scan.max, 5);
        assert_eq!(scan.next(), 6);
    }

    #[test]
    fn non_numeric_suffix_does_not_count() {
        let scan = resolve(&[dir("MarsGoExe_abc")], "MarsGoExe_");
        assert!(!scan.exists);
        assert_eq!(scan.next(), 1);
    }

    #[test]
    fn zero_is_distinct_from_nothing() {
        let scan = resolve(&[dir("MarsGoExe_0")], "MarsGoExe_");
        assert!(scan.exists);
        assert_eq!(scan.max, 0);
    }

    #[test]
    fn scans_real_directory() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("MarsGoExe_3")).unwrap();
        fs::write(tmp.path().join("MarsGoExe_2.zip"), b"").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"").unwrap();

        let scan = scan_max_sequence(tmp.path(), "MarsGoExe_").unwrap();
        assert_eq!(scan.max, 3);
        assert_eq!(scan.next(), 4);
    }

    #[test]
    fn names() {
        assert_eq!(folder_name("MarsGoExe_", 4), "MarsGoExe_4");
        assert_eq!(archive_name("MarsGoExe_", 4), "MarsGoExe_4.zip");
    }
}
