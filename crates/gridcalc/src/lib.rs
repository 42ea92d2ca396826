//! # gridcalc
//!
//! A formula-aware tabular grid engine.
//!
//! Gridcalc models a spreadsheet-like grid of text, numbers, and formulas,
//! recomputes every cell on demand, and keeps formula references valid
//! through structural edits.
//!
//! ## Features
//!
//! - Formulas with `+ - * /` arithmetic, cell references, and the `SUM`,
//!   `AVERAGE`, `MEAN`, and `MEDIAN` range functions
//! - Cycle detection and error sentinels (`#REF!`, `#DIV/0!`, `#ERROR`, ...)
//!   instead of evaluation failures
//! - Row and column insertion and deletion with automatic reference
//!   rewriting in formula text
//! - JSON document persistence
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! // A fresh document: columns A..J, rows 1..=20
//! let mut grid = Grid::default();
//!
//! grid.set_cell(1, "A", "100".into()).unwrap();
//! grid.set_cell(2, "A", "250".into()).unwrap();
//! grid.set_cell(3, "A", "=SUM(A1:A2)".into()).unwrap();
//!
//! let resolved = grid.resolve();
//! assert_eq!(resolved.value_at(3, "A"), Some(&ResolvedValue::Number(350.0)));
//!
//! // Deleting row 1 renumbers the range in the formula text
//! grid.delete_rows(&[1]);
//! assert_eq!(
//!     grid.cell(3, "A"),
//!     Some(&CellContent::Text("=SUM(#REF!:A1)".to_string()))
//! );
//! ```

pub mod calculation;
pub mod edits;
pub mod prelude;

// Re-export calculation types
pub use calculation::{GridResolveExt, RecalcStats, ResolvedGrid, ResolvedRow};

// Re-export edit types
pub use edits::{ColumnInsertPosition, GridEditExt, RowInsertPosition};

// Re-export core types
pub use gridcalc_core::{
    format_number,
    CellAddress,
    // Cell types
    CellContent,
    CellError,
    Column,
    // Error types
    Error,
    // Main types
    Grid,
    ResolvedValue,
    Result,
    Row,
    DEFAULT_COLUMN_WIDTH,
    DEFAULT_GRID_COLUMNS,
    // Constants
    DEFAULT_GRID_ROWS,
    DEFAULT_ROW_HEIGHT,
};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, evaluate_cell, evaluate_expression, AddressScanner, AddressToken,
    EvaluationContext, FormulaError, FormulaResult, VisitedSet,
};

// Re-export I/O types
pub use gridcalc_json::{JsonError, JsonReader, JsonResult, JsonWriter};

use std::path::Path;

/// Extension trait for Grid to add document file I/O
pub trait GridDocumentExt {
    /// Open a grid from a JSON document file
    fn open<P: AsRef<Path>>(path: P) -> Result<Grid>;

    /// Save the grid to a JSON document file
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl GridDocumentExt for Grid {
    fn open<P: AsRef<Path>>(path: P) -> Result<Grid> {
        JsonReader::read_file(path).map_err(|e| Error::other(e.to_string()))
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        JsonWriter::write_file(self, path).map_err(|e| Error::other(e.to_string()))
    }
}
