use std::io::Write;
use std::path::Path;

use marszip_core::config::validate_prefix;
use marszip_core::domain::{ExtractReport, PackReport};
use marszip_core::{
    Result, Settings, extract_archives, extract_folders, list, next_sequence, organize, pack,
    verify,
};

use crate::presentation::cli::{ArchiveArgs, BatchArgs, ExtractArgs, Target};

/// Config file first, then command-line overrides on top.
fn settings_for(target: &Target) -> Result<Settings> {
    let mut s = Settings::discover(target.config.as_deref(), &target.dir)?;
    if let Some(p) = &target.prefix {
        s.prefix = p.clone();
    }
    Ok(s)
}

pub fn handle_pack<W: Write>(
    target: &Target,
    batch: &BatchArgs,
    archive: &ArchiveArgs,
    out: &mut W,
) -> Result<()> {
    let mut s = settings_for(target)?;
    batch.apply(&mut s);
    archive.apply(&mut s);
    let report = pack(&target.dir, &s.pack_options()?)?;
    print_pack(&report, out)
}

pub fn handle_organize<W: Write>(target: &Target, batch: &BatchArgs, out: &mut W) -> Result<()> {
    let mut s = settings_for(target)?;
    batch.apply(&mut s);
    let report = organize(&target.dir, &s.pack_options()?)?;
    print_pack(&report, out)
}

fn print_pack<W: Write>(report: &PackReport, out: &mut W) -> Result<()> {
    for b in &report.batches {
        let archive = match &b.archive {
            Some(p) => p.display().to_string(),
            None => "-".to_string(),
        };
        writeln!(
            out,
            "#{:<4} files={:<4} folder={} archive={}{}",
            b.sequence,
            b.files,
            b.folder.display(),
            archive,
            if b.source_removed { " (folder removed)" } else { "" }
        )?;
    }
    match report.last_sequence() {
        Some(n) => writeln!(
            out,
            "{} batch(es), {} archived, last number {n}",
            report.batches.len(),
            report.archived()
        )?,
        None => writeln!(out, "nothing to batch")?,
    }
    Ok(())
}

pub fn handle_extract_archives<W: Write>(
    target: &Target,
    extract: &ExtractArgs,
    out: &mut W,
) -> Result<()> {
    let mut s = settings_for(target)?;
    extract.apply(&mut s);
    let report = extract_archives(&target.dir, &s.extract_options(true)?)?;
    print_extract(&report, out)
}

pub fn handle_extract_folders<W: Write>(
    target: &Target,
    extract: &ExtractArgs,
    out: &mut W,
) -> Result<()> {
    let mut s = settings_for(target)?;
    extract.apply(&mut s);
    let report = extract_folders(&target.dir, &s.extract_options(false)?)?;
    print_extract(&report, out)
}

fn print_extract<W: Write>(report: &ExtractReport, out: &mut W) -> Result<()> {
    for i in &report.items {
        match &i.error {
            Some(e) => writeln!(out, "{}: skipped ({e})", i.source.display())?,
            None => writeln!(
                out,
                "{} -> {} files={} failed={}{}",
                i.source.display(),
                i.destination.display(),
                i.files,
                i.failed,
                if i.cleaned { " (cleaned)" } else { "" }
            )?,
        }
    }
    writeln!(
        out,
        "{} source(s), {} file(s), {} failure(s)",
        report.items.len(),
        report.files(),
        report.failures()
    )?;
    Ok(())
}

pub fn handle_next<W: Write>(target: &Target, out: &mut W) -> Result<()> {
    let s = settings_for(target)?;
    validate_prefix(&s.prefix)?;
    let scan = next_sequence(&target.dir, &s.prefix)?;
    if scan.exists {
        writeln!(
            out,
            "{}{} (prefix in use, highest {})",
            s.prefix,
            scan.next(),
            scan.max
        )?;
    } else {
        writeln!(out, "{}{}", s.prefix, scan.next())?;
    }
    Ok(())
}

pub fn handle_list<W: Write>(archive: &Path, out: &mut W) -> Result<()> {
    for r in list(archive)? {
        if r.is_dir {
            writeln!(out, "{:>12} {:>12} {:<8} {}", "-", "-", "dir", r.path)?;
        } else {
            writeln!(
                out,
                "{:>12} {:>12} {:<8} {}",
                r.size, r.compressed, r.method, r.path
            )?;
        }
    }
    Ok(())
}

pub fn handle_verify<W: Write>(archive: &Path, out: &mut W) -> Result<()> {
    let s = verify(archive)?;
    writeln!(
        out,
        "verify: OK ({} entries, {} bytes, {} compressed)",
        s.entries, s.total_u, s.total_c
    )?;
    Ok(())
}
