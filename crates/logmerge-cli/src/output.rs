//! Consolidated log writer

use logmerge_core::{Record, Result};
use std::io::Write;

/// Write one entry followed by a blank line
pub fn write_entry<W: Write>(w: &mut W, line: &[u8]) -> std::io::Result<()> {
    w.write_all(line)?;
    w.write_all(b"\n\n")
}

/// Write unformatted lines first, byte for byte, then every record the stream
/// yields
///
/// Returns the number of records written. A stream error stops the write and
/// is returned as is.
pub fn write_consolidated<W, I>(w: &mut W, unformatted: &[Vec<u8>], records: I) -> Result<u64>
where
    W: Write,
    I: IntoIterator<Item = Result<Record>>,
{
    for line in unformatted {
        write_entry(w, line)?;
    }

    let mut written = 0u64;
    for record in records {
        write_entry(w, record?.render().as_bytes())?;
        written += 1;
    }
    Ok(written)
}
