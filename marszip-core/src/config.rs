use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::CodecId;
use crate::error::{MarsError, Result};
use crate::pack::walker::TraversalMode;
use crate::pack::writer::ArchiveOptions;
use crate::run::{ExtractOptions, PackOptions};

pub const DEFAULT_PREFIX: &str = "MarsGoExe_";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const ARCHIVE_EXT: &str = "zip";
pub const CONFIG_FILE_NAME: &str = "marszip.toml";
/// Name prefix of in-progress archive files.
pub const TEMP_PREFIX: &str = ".marszip-";

/// Everything a run can be configured with. Loaded from TOML, then
/// overridden field by field from the command line.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub prefix: String,
    pub batch_size: usize,
    pub delete_source_after_archive: bool,
    pub delete_empty_folders_after_extract: bool,
    /// Unset means "use the command's own default".
    pub only_matching_prefix: Option<bool>,
    pub mode: TraversalMode,
    pub codec: CodecId,
    pub deterministic: bool,
    pub exclude_extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            delete_source_after_archive: false,
            delete_empty_folders_after_extract: false,
            only_matching_prefix: None,
            mode: TraversalMode::Recursive,
            codec: CodecId::Deflate,
            deterministic: false,
            exclude_extensions: vec!["exe".to_string()],
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MarsError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MarsError::unavailable(path, e))?;
        Self::from_toml_str(&text)
            .map_err(|e| MarsError::Config(format!("{}: {e}", path.display())))
    }

    /// Explicit path wins; otherwise `marszip.toml` in `dir` if present;
    /// otherwise defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        let candidate: PathBuf = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        validate_prefix(&self.prefix)?;
        if self.batch_size == 0 {
            return Err(MarsError::InvalidOptions(
                "batch_size must be a positive integer".into(),
            ));
        }
        Ok(())
    }

    pub fn pack_options(&self) -> Result<PackOptions> {
        self.validate()?;
        Ok(PackOptions {
            prefix: self.prefix.clone(),
            batch_size: self.batch_size,
            delete_source: self.delete_source_after_archive,
            exclude_extensions: self
                .exclude_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            archive: ArchiveOptions {
                mode: self.mode,
                codec: self.codec,
                deterministic: self.deterministic,
            },
        })
    }

    /// `default_only_matching` is the command's default when the setting is unset.
    pub fn extract_options(&self, default_only_matching: bool) -> Result<ExtractOptions> {
        validate_prefix(&self.prefix)?;
        Ok(ExtractOptions {
            prefix: self.prefix.clone(),
            only_matching_prefix: self.only_matching_prefix.unwrap_or(default_only_matching),
            delete_empty_folders: self.delete_empty_folders_after_extract,
        })
    }
}

pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(MarsError::InvalidOptions("prefix must not be empty".into()));
    }
    if prefix.contains(['/', '\\']) || prefix == "." || prefix == ".." {
        return Err(MarsError::InvalidOptions(format!(
            "prefix must be a plain name: {prefix}"
        )));
    }
    Ok(())
}
