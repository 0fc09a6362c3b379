//! Ingestion state for one merge run

use logmerge_core::{
    observe, parse_line, IngestTxn, ParsedLine, RecordStore, Result, ZoneNormalizer,
};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Everything the driver accumulates while reading inputs
#[derive(Debug, Default)]
pub struct IngestSession {
    unformatted: Vec<Vec<u8>>,
    duplicates: u64,
    accepted: u64,
    lines_read: u64,
}

impl IngestSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that are not records, in arrival order, as raw bytes
    pub fn unformatted(&self) -> &[Vec<u8>] {
        &self.unformatted
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    /// Records stored (duplicates excluded)
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Handle one raw input line (without its line terminator)
    ///
    /// Surrounding spaces and tabs are trimmed and blank lines skipped.
    /// Unformatted lines are kept byte for byte; invalid UTF-8 inside a
    /// record is replaced with U+FFFD.
    pub fn ingest_line<T>(&mut self, line: &[u8], zones: &ZoneNormalizer, txn: &mut T) -> Result<()>
    where
        T: IngestTxn + ?Sized,
    {
        let input = trim_blanks(line);
        if input.is_empty() {
            return Ok(());
        }

        let text = String::from_utf8_lossy(input);
        match parse_line(&text, zones)? {
            ParsedLine::Record(record) => {
                if let Cow::Owned(_) = text {
                    tracing::warn!(
                        "Replaced invalid UTF-8 in record from {}",
                        record.publisher()
                    );
                }
                if txn.add(&record)?.duplicate {
                    self.duplicates += 1;
                } else {
                    self.accepted += 1;
                }
            }
            ParsedLine::Unformatted => {
                observe::record_unformatted();
                self.unformatted.push(input.to_vec());
            }
        }
        Ok(())
    }

    /// Read every line of `reader`; returns the number of lines read
    pub fn ingest_reader<R, T>(
        &mut self,
        mut reader: R,
        zones: &ZoneNormalizer,
        txn: &mut T,
    ) -> Result<u64>
    where
        R: BufRead,
        T: IngestTxn + ?Sized,
    {
        let mut lines = 0u64;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            self.ingest_line(strip_terminator(&buf), zones, txn)?;
            lines += 1;
        }
        self.lines_read += lines;
        Ok(lines)
    }

    /// Read one input file into `store` inside a single transaction
    pub fn ingest_file<S>(&mut self, path: &Path, store: &S, zones: &ZoneNormalizer) -> Result<u64>
    where
        S: RecordStore,
    {
        tracing::info!("Reading {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let mut txn = store.begin_txn()?;
        let lines = self.ingest_reader(reader, zones, &mut txn)?;
        Box::new(txn).commit()?;

        tracing::info!("Read {} lines", lines);
        Ok(lines)
    }
}

/// Drop a trailing `\n` or `\r\n`
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn trim_blanks(line: &[u8]) -> &[u8] {
    let is_blank = |b: &u8| *b == b' ' || *b == b'\t';
    let start = line.iter().position(|b| !is_blank(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !is_blank(b)).map_or(start, |i| i + 1);
    &line[start..end]
}
