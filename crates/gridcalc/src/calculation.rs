//! Grid recomputation
//!
//! Recomputing resolves every cell of a grid against the same source
//! snapshot: each cell is evaluated independently with a fresh visited set
//! seeded with its own address, so cell order never affects results and a
//! recompute never mutates the source grid. The output is a [`ResolvedGrid`]
//! mirroring the source's shape with every formula replaced by its value.
//!
//! # Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut grid = Grid::default();
//! grid.set_cell(1, "A", "10".into()).unwrap();
//! grid.set_cell(2, "A", "20".into()).unwrap();
//! grid.set_cell(3, "A", "=SUM(A1:A2)".into()).unwrap();
//!
//! let resolved = grid.resolve();
//! assert_eq!(resolved.value_at(3, "A"), Some(&ResolvedValue::Number(30.0)));
//! ```

use ahash::AHashMap;
use gridcalc_core::{Column, Grid, ResolvedValue};
use gridcalc_formula::{evaluate_cell, EvaluationContext};
use serde::Serialize;

/// A fully recomputed grid: the source's columns and row order, with every
/// cell resolved to a value. Serializes with the same top-level shape as a
/// grid document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGrid {
    pub columns: Vec<Column>,
    #[serde(rename = "rawData")]
    pub rows: Vec<ResolvedRow>,
}

/// One recomputed row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRow {
    pub id: u64,
    #[serde(rename = "_height")]
    pub height: f64,
    #[serde(flatten)]
    pub cells: AHashMap<String, ResolvedValue>,
}

impl ResolvedGrid {
    /// Resolved value by 1-based row position and field name
    pub fn value_at(&self, position: u64, field: &str) -> Option<&ResolvedValue> {
        let index = usize::try_from(position.checked_sub(1)?).ok()?;
        self.rows.get(index)?.cells.get(field)
    }
}

/// Statistics from a recompute pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecalcStats {
    /// Number of formula cells encountered
    pub formula_count: usize,
    /// Total cells resolved
    pub cells_resolved: usize,
    /// Number of cells that resolved to an error sentinel
    pub errors: usize,
}

/// The recompute engine. Borrows the grid for the duration of one pass.
pub struct RecalcEngine<'a> {
    grid: &'a Grid,
}

impl<'a> RecalcEngine<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Resolve every cell of the grid
    pub fn run(&self) -> (ResolvedGrid, RecalcStats) {
        let ctx = EvaluationContext::new(self.grid);
        let mut stats = RecalcStats::default();

        let mut rows = Vec::with_capacity(self.grid.row_count());
        for (index, row) in self.grid.rows.iter().enumerate() {
            let position = index as u64 + 1;

            let mut cells = AHashMap::with_capacity(row.cells.len());
            for (field, content) in &row.cells {
                if content.is_formula() {
                    stats.formula_count += 1;
                }

                let value = evaluate_cell(&ctx, position, field);
                if value.is_error() {
                    stats.errors += 1;
                }
                stats.cells_resolved += 1;

                cells.insert(field.clone(), value);
            }

            rows.push(ResolvedRow {
                id: row.id,
                height: row.height,
                cells,
            });
        }

        log::debug!(
            "recomputed {} cells ({} formulas, {} errors)",
            stats.cells_resolved,
            stats.formula_count,
            stats.errors
        );

        (
            ResolvedGrid {
                columns: self.grid.columns.clone(),
                rows,
            },
            stats,
        )
    }
}

/// Extension trait adding recompute methods to [`Grid`]
pub trait GridResolveExt {
    /// Recompute every cell, producing a resolved snapshot of the grid
    fn resolve(&self) -> ResolvedGrid;

    /// Recompute with statistics about the pass
    fn resolve_with_stats(&self) -> (ResolvedGrid, RecalcStats);

    /// Resolve a single cell by 1-based row position and field name
    fn resolve_cell(&self, position: u64, field: &str) -> ResolvedValue;
}

impl GridResolveExt for Grid {
    fn resolve(&self) -> ResolvedGrid {
        self.resolve_with_stats().0
    }

    fn resolve_with_stats(&self) -> (ResolvedGrid, RecalcStats) {
        RecalcEngine::new(self).run()
    }

    fn resolve_cell(&self, position: u64, field: &str) -> ResolvedValue {
        let ctx = EvaluationContext::new(self);
        evaluate_cell(&ctx, position, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::{CellContent, CellError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_recompute() {
        let mut grid = Grid::default();
        grid.set_cell(1, "A", "10".into()).unwrap();
        grid.set_cell(2, "A", "20".into()).unwrap();
        grid.set_cell(3, "A", "=A1+A2".into()).unwrap();

        let (resolved, stats) = grid.resolve_with_stats();

        assert_eq!(resolved.value_at(3, "A"), Some(&ResolvedValue::Number(30.0)));
        assert_eq!(stats.formula_count, 1);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.cells_resolved, 10 * 20);
    }

    #[test]
    fn test_chain_recompute() {
        let mut grid = Grid::default();
        grid.set_cell(1, "A", "5".into()).unwrap();
        grid.set_cell(2, "A", "=A1*2".into()).unwrap();
        grid.set_cell(3, "A", "=A2+10".into()).unwrap();
        grid.set_cell(4, "A", "=A3*A1".into()).unwrap();

        let resolved = grid.resolve();

        assert_eq!(resolved.value_at(2, "A"), Some(&ResolvedValue::Number(10.0)));
        assert_eq!(resolved.value_at(3, "A"), Some(&ResolvedValue::Number(20.0)));
        assert_eq!(resolved.value_at(4, "A"), Some(&ResolvedValue::Number(100.0)));
    }

    #[test]
    fn test_range_recompute() {
        let mut grid = Grid::default();
        for (row, value) in [(1, "1"), (2, "2"), (3, "3"), (4, "4")] {
            grid.set_cell(row, "A", value.into()).unwrap();
        }
        grid.set_cell(5, "A", "=SUM(A1:A4)".into()).unwrap();

        let resolved = grid.resolve();
        assert_eq!(resolved.value_at(5, "A"), Some(&ResolvedValue::Number(10.0)));
    }

    #[test]
    fn test_cycles_resolve_to_ref_errors() {
        let mut grid = Grid::default();
        grid.set_cell(1, "A", "=B1".into()).unwrap();
        grid.set_cell(1, "B", "=A1".into()).unwrap();

        let (resolved, stats) = grid.resolve_with_stats();

        assert_eq!(
            resolved.value_at(1, "A"),
            Some(&ResolvedValue::Error(CellError::Ref))
        );
        assert_eq!(
            resolved.value_at(1, "B"),
            Some(&ResolvedValue::Error(CellError::Ref))
        );
        assert_eq!(stats.errors, 2);
    }

    #[test]
    fn test_literals_pass_through() {
        let mut grid = Grid::default();
        grid.set_cell(1, "A", "hello".into()).unwrap();
        grid.set_cell(2, "A", CellContent::Number(2.5)).unwrap();

        let resolved = grid.resolve();

        assert_eq!(
            resolved.value_at(1, "A"),
            Some(&ResolvedValue::Text("hello".into()))
        );
        assert_eq!(resolved.value_at(2, "A"), Some(&ResolvedValue::Number(2.5)));
        assert_eq!(
            resolved.value_at(3, "A"),
            Some(&ResolvedValue::Text(String::new()))
        );
    }

    #[test]
    fn test_resolved_rows_keep_identity_and_height() {
        let mut grid = Grid::default();
        grid.set_row_height(2, 48.0).unwrap();
        grid.row_mut(1)
            .unwrap()
            .set_cell("NOTES", CellContent::from("=A1+1"));
        grid.set_cell(1, "A", "4".into()).unwrap();

        let resolved = grid.resolve();

        assert_eq!(resolved.rows[0].id, 1);
        assert_eq!(resolved.rows[1].height, 48.0);
        // Stray fields recompute like any cell
        assert_eq!(
            resolved.rows[0].cells.get("NOTES"),
            Some(&ResolvedValue::Number(5.0))
        );
    }

    #[test]
    fn test_resolve_cell_is_positional() {
        let mut grid = Grid::default();
        grid.set_cell(1, "A", "=2*3".into()).unwrap();
        assert_eq!(grid.resolve_cell(1, "A"), ResolvedValue::Number(6.0));
        assert_eq!(grid.resolve_cell(99, "A"), ResolvedValue::Empty);
    }

    #[test]
    fn test_resolved_grid_serializes_as_document_shape() {
        let mut grid = Grid::with_dimensions(2, 1);
        grid.set_cell(1, "A", "=1/0".into()).unwrap();
        grid.set_cell(1, "B", "7".into()).unwrap();

        let resolved = grid.resolve();
        let doc = serde_json::to_value(&resolved).unwrap();

        assert_eq!(doc["rawData"][0]["A"], "#DIV/0!");
        assert_eq!(doc["rawData"][0]["B"], "7");
        assert_eq!(doc["rawData"][0]["id"], 1);
        assert_eq!(doc["columns"][1]["field"], "B");
    }
}
