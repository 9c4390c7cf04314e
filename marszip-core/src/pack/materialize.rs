use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Batch;
use crate::error::{MarsError, Result};
use crate::scan::numbering::folder_name;

/// Create `{prefix}{sequence}` under `source_dir` and move the batch's files
/// into it. A failed move stops here; files moved before it stay moved.
pub fn materialize(source_dir: &Path, prefix: &str, batch: &Batch) -> Result<PathBuf> {
    let folder = source_dir.join(folder_name(prefix, batch.sequence));
    fs::create_dir_all(&folder).map_err(|e| MarsError::unavailable(&folder, e))?;

    for name in &batch.files {
        let from = source_dir.join(name);
        let to = folder.join(name);
        fs::rename(&from, &to).map_err(|source| MarsError::MoveFailed {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        tracing::debug!(from = %from.display(), to = %to.display(), "moved");
    }
    Ok(folder)
}
