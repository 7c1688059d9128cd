// src/io/selection.rs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Dump the site-selection indices that defined a composition pattern,
/// one `row,value` record per line. Kept for provenance so a finished
/// sweep can be traced back to the exact slots or defect sites it used.
pub fn write(path: &Path, selection: &[usize]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    for (row, value) in selection.iter().enumerate() {
        writeln!(file, "{},{}", row, value)?;
    }

    file.flush()?;
    Ok(())
}
