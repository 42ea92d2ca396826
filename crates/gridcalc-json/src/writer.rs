//! JSON document writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::JsonResult;
use gridcalc_core::Grid;

/// Grid document writer.
///
/// Documents are written pretty-printed with the same top-level shape the
/// reader accepts, so a written grid loads back identically.
pub struct JsonWriter;

impl JsonWriter {
    /// Write a grid document to a file
    pub fn write_file<P: AsRef<Path>>(grid: &Grid, path: P) -> JsonResult<()> {
        let file = File::create(path)?;
        Self::write(grid, BufWriter::new(file))
    }

    /// Write a grid document to a writer
    pub fn write<W: Write>(grid: &Grid, mut writer: W) -> JsonResult<()> {
        serde_json::to_writer_pretty(&mut writer, grid)?;
        writer.flush()?;
        Ok(())
    }
}
