use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

use crate::domain::EntryRow;
use crate::error::{MarsError, Result};

pub fn list(archive: &Path) -> Result<Vec<EntryRow>> {
    let f = File::open(archive).map_err(|e| MarsError::unavailable(archive, e))?;
    let mut za = ZipArchive::new(f)?;
    let mut rows = Vec::with_capacity(za.len());
    for i in 0..za.len() {
        let e = za.by_index_raw(i)?;
        rows.push(EntryRow {
            path: e.name().to_string(),
            size: e.size(),
            compressed: e.compressed_size(),
            method: e.compression().to_string(),
            is_dir: e.is_dir(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecId;
    use crate::pack::writer::{ArchiveOptions, pack_folder};
    use std::fs;

    #[test]
    fn lists_entries_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("P_1");
        fs::create_dir_all(folder.join("d")).unwrap();
        fs::write(folder.join("x.txt"), b"0123456789").unwrap();
        let out = tmp.path().join("P_1.zip");
        let opts = ArchiveOptions {
            codec: CodecId::Store,
            ..Default::default()
        };
        pack_folder(&folder, &out, &opts).unwrap();

        let rows = list(&out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].path, "d/");
        assert!(rows[0].is_dir);
        assert_eq!(rows[1].path, "x.txt");
        assert_eq!(rows[1].size, 10);
        assert_eq!(rows[1].compressed, 10);
    }

    #[test]
    fn missing_archive_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            list(&tmp.path().join("none.zip")),
            Err(MarsError::IoUnavailable { .. })
        ));
    }
}
