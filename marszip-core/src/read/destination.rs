use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{MarsError, Result};
use crate::scan::listing::is_empty_dir;
use crate::scan::numbering::scan_max_sequence;

/// Pick the folder under `parent` that extraction of `base` writes into.
///
/// `parent/base` is used when missing (it is created) or empty. Otherwise the
/// existing `{base}_{n}` siblings are scanned and `{base}_{max+1}` is created,
/// so unrelated content is never written over.
pub fn resolve_destination(parent: &Path, base: &str) -> Result<PathBuf> {
    let natural = parent.join(base);
    match fs::symlink_metadata(&natural) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(&natural).map_err(|e| MarsError::unavailable(&natural, e))?;
            return Ok(natural);
        }
        Err(e) => return Err(MarsError::unavailable(&natural, e)),
        Ok(md) if md.is_dir() => {
            if is_empty_dir(&natural)? {
                return Ok(natural);
            }
        }
        Ok(_) => {}
    }

    let mut next = scan_max_sequence(parent, &format!("{base}_"))?.next();
    let mut candidate = parent.join(format!("{base}_{next}"));
    // a plain file may already hold the name
    while fs::symlink_metadata(&candidate).is_ok() {
        next += 1;
        candidate = parent.join(format!("{base}_{next}"));
    }
    fs::create_dir_all(&candidate).map_err(|e| MarsError::unavailable(&candidate, e))?;
    tracing::info!(
        natural = %natural.display(),
        chosen = %candidate.display(),
        "destination occupied, using disambiguated folder"
    );
    Ok(candidate)
}
