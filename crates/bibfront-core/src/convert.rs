//! Batch conversion of a BibTeX file into publication pages

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::policy::OverridePolicy;
use crate::record::PublicationRecord;
use crate::render::{Delivery, FrontmatterFormat, OutputOptions};

/// Where the pages of a run go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// One `<name>.md` per entry in this directory
    Directory(PathBuf),
    /// Print every page (dry run)
    Stdout,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub records: usize,
    /// Files written, in source order; empty for a dry run
    pub written: Vec<PathBuf>,
}

/// Convert every entry of `bib_path`, strictly in source order.
///
/// The first failing entry aborts the run; pages already written stay.
pub fn convert(
    bib_path: &Path,
    policy: &OverridePolicy,
    destination: &Destination,
    format: FrontmatterFormat,
) -> Result<ConversionReport> {
    let records = PublicationRecord::from_path(bib_path, Some(policy))?;
    info!(
        source = %bib_path.display(),
        entries = records.len(),
        "converting BibTeX entries"
    );
    log_inert_overrides(policy, &records);

    let options = match destination {
        Destination::Directory(dir) => OutputOptions::in_dir(dir),
        Destination::Stdout => OutputOptions::stdout(),
    }
    .with_format(format);

    let mut report = ConversionReport::default();
    for record in &records {
        debug!(
            id = record.id(),
            entry_type = %record.entry().entry_type,
            "rendering entry"
        );
        if let Delivery::Written(path) = record.write(&options)? {
            report.written.push(path);
        }
        report.records += 1;
    }

    info!(
        records = report.records,
        written = report.written.len(),
        "conversion finished"
    );
    Ok(report)
}

/// Override IDs with no matching entry are accepted and have no effect
fn log_inert_overrides(policy: &OverridePolicy, records: &[PublicationRecord<'_>]) {
    let known: HashSet<&str> = records.iter().map(|record| record.id()).collect();
    for id in policy.referenced_ids() {
        if !known.contains(id) {
            debug!(id, "override references an entry not in this source");
        }
    }
}

/// `.bib` files directly inside `dir`, sorted by path
pub fn list_bib_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    for dir_entry in read_dir {
        let path = dir_entry.map_err(|e| Error::io(dir, e))?.path();
        let is_bib = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "bib");
        if is_bib && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
