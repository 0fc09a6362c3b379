//! Merge command implementation

use anyhow::{Context, Result};
use logmerge_core::{RecordStore, StoreConfig, ZoneSetting};
use logmerge_sqlite::SqliteRecordStore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::output;
use crate::session::IngestSession;

/// What to merge and where to put it
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input logs; the first one is also the default output
    pub inputs: Vec<PathBuf>,

    /// Write here instead of overwriting the first input
    pub output: Option<PathBuf>,

    pub zone: ZoneSetting,

    pub store: StoreConfig,
}

impl MergeOptions {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            output: None,
            zone: ZoneSetting::default(),
            store: StoreConfig::default(),
        }
    }

    /// Path the consolidated log is written to
    pub fn target(&self) -> Option<&PathBuf> {
        self.output.as_ref().or_else(|| self.inputs.first())
    }
}

/// Counts reported after a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub lines_read: u64,
    pub records_written: u64,
    pub duplicates: u64,
    pub unformatted: usize,
}

pub fn execute(options: MergeOptions) -> Result<MergeSummary> {
    let target = options
        .target()
        .cloned()
        .context("At least one input file is required")?;
    let zones = options
        .zone
        .normalizer()
        .context("Failed to resolve output time zone")?;

    let store = SqliteRecordStore::open(options.store.clone())
        .context("Failed to open record store")?;

    let mut session = IngestSession::new();
    for input in &options.inputs {
        session
            .ingest_file(input, &store, &zones)
            .with_context(|| format!("Failed to read {}", input.display()))?;
    }
    tracing::info!("Skipped {} duplicate records", session.duplicates());

    // every input is read before the target is truncated
    tracing::info!("Writing {}", target.display());
    let file = File::create(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    let mut writer = BufWriter::new(file);

    let stream = store.open_stream().context("Failed to open record stream")?;
    let records_written = output::write_consolidated(&mut writer, session.unformatted(), stream)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", target.display()))?;

    store.close().context("Failed to close record store")?;

    tracing::debug!(
        "Wrote {} of {} accepted records and {} unformatted lines",
        records_written,
        session.accepted(),
        session.unformatted().len()
    );

    Ok(MergeSummary {
        lines_read: session.lines_read(),
        records_written,
        duplicates: session.duplicates(),
        unformatted: session.unformatted().len(),
    })
}
