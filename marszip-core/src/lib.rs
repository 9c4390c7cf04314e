#![forbid(unsafe_code)]

pub mod cleanup;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod run;

pub mod scan {
    pub mod listing;
    pub mod numbering;
}

pub mod pack {
    pub mod materialize;
    pub mod planner;
    pub mod walker;
    pub mod writer;
}

pub mod read {
    pub mod destination;
    pub mod extract;
    pub mod verify;
}

pub mod list;

// Re-exports: stable API surface
pub use cleanup::{CleanupReport, remove_empty_dirs};
pub use codec::CodecId;
pub use config::Settings;
pub use domain::{ExtractReport, PackReport, SequenceScan};
pub use error::{MarsError, Result};
pub use list::list;
pub use pack::walker::TraversalMode;
pub use pack::writer::{ArchiveOptions, pack_folder};
pub use read::extract::{extract_archive, extract_folder};
pub use read::verify::{VerifySummary, verify};
pub use run::{
    ExtractOptions, PackOptions, extract_archives, extract_folders, next_sequence, organize, pack,
};
