use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

use crate::error::{MarsError, Result};

/// How a folder's tree maps onto archive entry names.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    /// Every file stored under its base name only; no directory entries.
    Flat,
    /// Paths relative to the folder root, directories included (`dir/`).
    #[default]
    Recursive,
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalMode::Flat => "flat",
            TraversalMode::Recursive => "recursive",
        })
    }
}

impl FromStr for TraversalMode {
    type Err = MarsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(TraversalMode::Flat),
            "recursive" => Ok(TraversalMode::Recursive),
            other => Err(MarsError::InvalidOptions(format!(
                "unknown traversal mode: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedEntry {
    pub source: PathBuf,
    /// Name inside the container, `/`-separated, never absolute.
    pub name: String,
    pub is_dir: bool,
}

#[derive(Clone, Debug, Default)]
pub struct WalkPlan {
    pub entries: Vec<PlannedEntry>,
    /// Symlinks, special files and flat-mode name collisions left out.
    pub skipped: u64,
}

pub fn walk(root: &Path, mode: TraversalMode) -> Result<WalkPlan> {
    let mut plan = WalkPlan::default();
    let mut seen: HashSet<String> = HashSet::new();

    for e in WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
    {
        let e = e.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let ft = e.file_type();
        // symlinks are not followed or stored
        if !ft.is_dir() && !ft.is_file() {
            tracing::warn!(path = %e.path().display(), "not a regular file or directory, left out of archive");
            plan.skipped += 1;
            continue;
        }

        match mode {
            TraversalMode::Recursive => {
                let rel = e
                    .path()
                    .strip_prefix(root)
                    .map_err(|_| MarsError::Format(format!("{} escapes root", e.path().display())))?;
                let mut name = rel_name(rel);
                if ft.is_dir() {
                    name.push('/');
                }
                plan.entries.push(PlannedEntry {
                    source: e.path().to_path_buf(),
                    name,
                    is_dir: ft.is_dir(),
                });
            }
            TraversalMode::Flat => {
                if ft.is_dir() {
                    continue;
                }
                let name = e.file_name().to_string_lossy().to_string();
                if !seen.insert(name.clone()) {
                    tracing::warn!(path = %e.path().display(), name = %name, "base name already stored, skipping");
                    plan.skipped += 1;
                    continue;
                }
                plan.entries.push(PlannedEntry {
                    source: e.path().to_path_buf(),
                    name,
                    is_dir: false,
                });
            }
        }
    }
    Ok(plan)
}

fn rel_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
