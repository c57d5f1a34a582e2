//! Persists mapped entries as JSON and reads them back.

use crate::error::Result;
use crate::models::Entry;
use log::info;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes `entries` to `path` as a JSON array, in the given order.
/// Parent directories are created as needed.
pub fn write_entries(path: &Path, entries: &[Entry], pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, entries)?;
    } else {
        serde_json::to_writer(&mut writer, entries)?;
    }
    writer.flush()?;
    info!("Wrote {} entries to {:?}.", entries.len(), path);
    Ok(())
}

/// Reads entries previously written by [`write_entries`].
pub fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    let reader = BufReader::new(File::open(path)?);
    let entries: Vec<Entry> = serde_json::from_reader(reader)?;
    info!("Read {} entries from {:?}.", entries.len(), path);
    Ok(entries)
}
