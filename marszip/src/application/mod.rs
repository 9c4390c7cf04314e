pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use marszip_core::Result;
use std::io;

pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Pack {
            target,
            batch,
            archive,
        } => handlers::handle_pack(&target, &batch, &archive, &mut out),
        Commands::Organize { target, batch } => handlers::handle_organize(&target, &batch, &mut out),
        Commands::ExtractArchives { target, extract } => {
            handlers::handle_extract_archives(&target, &extract, &mut out)
        }
        Commands::ExtractFolders { target, extract } => {
            handlers::handle_extract_folders(&target, &extract, &mut out)
        }
        Commands::Next { target } => handlers::handle_next(&target, &mut out),
        Commands::List { archive } => handlers::handle_list(&archive, &mut out),
        Commands::Verify { archive } => handlers::handle_verify(&archive, &mut out),
    }
}
