use clap::{ArgAction, Args, Parser, Subcommand};
use marszip_core::{CodecId, Settings, TraversalMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch loose files into numbered folders and zip them", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to work and which config file to read.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Directory to operate on
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Config file (default: marszip.toml in DIR, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Folder/archive name prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Files per folder
    #[arg(short = 'n', long)]
    pub batch_size: Option<usize>,

    /// Extension never batched (repeatable; replaces the configured list)
    #[arg(long = "exclude-ext", value_name = "EXT")]
    pub exclude_ext: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ArchiveArgs {
    /// Remove each folder once its archive is written
    #[arg(long)]
    pub delete_source: bool,

    #[arg(long)]
    pub mode: Option<TraversalMode>,

    #[arg(long)]
    pub codec: Option<CodecId>,

    /// Fixed entry timestamps so repeated packs are byte-identical
    #[arg(long)]
    pub deterministic: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Only handle entries whose name starts with the prefix
    #[arg(long, conflicts_with = "all")]
    pub only_matching: bool,

    /// Handle every entry regardless of prefix
    #[arg(long)]
    pub all: bool,

    /// Remove emptied prefix folders afterwards
    #[arg(long)]
    pub delete_empty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Batch loose files into numbered folders and archive each folder
    Pack {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        batch: BatchArgs,
        #[command(flatten)]
        archive: ArchiveArgs,
    },

    /// Batch loose files into numbered folders without archiving
    Organize {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Extract every archive in DIR into a folder named after it
    ExtractArchives {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Move the contents of numbered folders back into DIR
    ExtractFolders {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Print the next sequence number for the prefix
    Next {
        #[command(flatten)]
        target: Target,
    },

    /// List archive contents
    List { archive: PathBuf },

    /// Read every entry and check its CRC
    Verify { archive: PathBuf },
}

impl BatchArgs {
    pub fn apply(&self, s: &mut Settings) {
        if let Some(n) = self.batch_size {
            s.batch_size = n;
        }
        if !self.exclude_ext.is_empty() {
            s.exclude_extensions = self.exclude_ext.clone();
        }
    }
}

impl ArchiveArgs {
    pub fn apply(&self, s: &mut Settings) {
        if self.delete_source {
            s.delete_source_after_archive = true;
        }
        if let Some(m) = self.mode {
            s.mode = m;
        }
        if let Some(c) = self.codec {
            s.codec = c;
        }
        if self.deterministic {
            s.deterministic = true;
        }
    }
}

impl ExtractArgs {
    pub fn apply(&self, s: &mut Settings) {
        if self.only_matching {
            s.only_matching_prefix = Some(true);
        } else if self.all {
            s.only_matching_prefix = Some(false);
        }
        if self.delete_empty {
            s.delete_empty_folders_after_extract = true;
        }
    }
}
