//! JSON document reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::JsonResult;
use gridcalc_core::{Grid, DEFAULT_ROW_HEIGHT};

/// Grid document reader.
///
/// A document is an object with a `columns` array and a `rawData` row array;
/// both must be present. Row heights that are missing, null, or 0 in the
/// source are sanitized to the default.
pub struct JsonReader;

impl JsonReader {
    /// Read a grid document from a file
    pub fn read_file<P: AsRef<Path>>(path: P) -> JsonResult<Grid> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a grid document from a reader
    pub fn read<R: Read>(reader: R) -> JsonResult<Grid> {
        let mut grid: Grid = serde_json::from_reader(reader)?;

        let mut defaulted = 0usize;
        for row in &mut grid.rows {
            if row.height == 0.0 {
                row.height = DEFAULT_ROW_HEIGHT;
                defaulted += 1;
            }
        }
        if defaulted > 0 {
            log::warn!("defaulted height on {defaulted} rows");
        }

        Ok(grid)
    }
}
