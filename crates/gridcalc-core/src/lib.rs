//! # gridcalc-core
//!
//! Core data structures for the gridcalc formula-aware grid engine.
//!
//! This crate provides the fundamental types used throughout gridcalc:
//! - [`Grid`], [`Row`], [`Column`] - the raw grid of cell contents
//! - [`CellContent`] - literal values and formulas as stored
//! - [`ResolvedValue`] and [`CellError`] - evaluated output and error sentinels
//! - [`CellAddress`] - transient positional addresses and column-letter math
//!
//! The core holds data only; formula evaluation and reference rewriting live
//! in the `gridcalc-formula` and `gridcalc` crates.
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellContent, Grid};
//!
//! // A fresh document: columns A..J, rows 1..=20, all cells blank
//! let mut grid = Grid::default();
//!
//! grid.set_cell(1, "A", CellContent::Number(10.0)).unwrap();
//! grid.set_cell(1, "B", CellContent::from("=A1*2")).unwrap();
//!
//! assert!(grid.cell(1, "B").unwrap().is_formula());
//! ```

pub mod address;
pub mod column;
pub mod error;
pub mod grid;
pub mod row;
pub mod value;

// Re-exports for convenience
pub use address::CellAddress;
pub use column::Column;
pub use error::{Error, Result};
pub use grid::Grid;
pub use row::Row;
pub use value::{format_number, CellContent, CellError, ResolvedValue};

/// Display height assigned to new rows and to loaded rows missing one
pub const DEFAULT_ROW_HEIGHT: f64 = 26.0;

/// Display width assigned to new columns
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;

/// Column count of a fresh document (A..J)
pub const DEFAULT_GRID_COLUMNS: usize = 10;

/// Row count of a fresh document
pub const DEFAULT_GRID_ROWS: usize = 20;
