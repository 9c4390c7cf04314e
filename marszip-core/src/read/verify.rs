use std::fs::File;
use std::io;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{MarsError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifySummary {
    pub entries: u64,
    pub total_u: u64,
    pub total_c: u64,
}

/// Read every entry to its end so the container's CRC-32 checks run.
pub fn verify(archive: &Path) -> Result<VerifySummary> {
    let f = File::open(archive).map_err(|e| MarsError::unavailable(archive, e))?;
    let mut za = ZipArchive::new(f)?;
    let mut summary = VerifySummary::default();

    for i in 0..za.len() {
        let mut e = za.by_index(i)?;
        let name = e.name().to_string();
        let n = io::copy(&mut e, &mut io::sink()).map_err(|err| MarsError::ExtractEntryFailed {
            source_path: archive.to_path_buf(),
            entry: name.clone(),
            reason: err.to_string(),
        })?;
        if n != e.size() {
            return Err(MarsError::Format(format!(
                "{name}: read {n} bytes, header says {}",
                e.size()
            )));
        }
        summary.entries += 1;
        summary.total_u = summary.total_u.saturating_add(n);
        summary.total_c = summary.total_c.saturating_add(e.compressed_size());
    }
    Ok(summary)
}
