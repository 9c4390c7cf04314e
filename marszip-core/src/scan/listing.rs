use std::fs;
use std::path::Path;

use crate::error::{MarsError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listed {
    pub name: String,
    pub kind: EntryKind,
}

impl Listed {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Extension after the last dot, if any (`a.tar.zip` -> `zip`).
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }

    /// Name with its last extension removed.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(i) if i > 0 => &self.name[..i],
            _ => &self.name,
        }
    }
}

/// One snapshot of a directory's direct children, sorted by name (byte order).
/// Symlinks are reported by what they are, not what they point to.
pub fn list_dir(dir: &Path) -> Result<Vec<Listed>> {
    let rd = fs::read_dir(dir).map_err(|e| MarsError::unavailable(dir, e))?;
    let mut out = Vec::new();
    for e in rd {
        let e = e.map_err(|e| MarsError::unavailable(dir, e))?;
        let ft = e.file_type().map_err(|err| MarsError::unavailable(e.path(), err))?;
        let name = match e.file_name().into_string() {
            Ok(n) => n,
            Err(raw) => {
                tracing::warn!(dir = %dir.display(), name = ?raw, "skipping non UTF-8 entry");
                continue;
            }
        };
        let kind = if ft.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        out.push(Listed { name, kind });
    }
    out.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    Ok(out)
}

/// True when the directory exists and has no children.
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut rd = fs::read_dir(dir).map_err(|e| MarsError::unavailable(dir, e))?;
    Ok(rd.next().is_none())
}
