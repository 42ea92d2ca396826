//! The grid: an ordered row sequence plus a canonical column list

use crate::address::CellAddress;
use crate::column::Column;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::CellContent;
use crate::{DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS};

/// A raw grid of cell contents.
///
/// Rows are ordered (their index defines the 1-based row position used by
/// positional addresses) and carry stable identifiers. Columns are identified
/// by canonical letter-style field names that also define display order.
///
/// The grid itself holds raw content only; resolved values live in a separate
/// output grid produced by the recompute engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Column definitions in display order
    pub columns: Vec<Column>,
    /// Rows in display order
    #[cfg_attr(feature = "serde", serde(rename = "rawData"))]
    pub rows: Vec<Row>,
}

impl Grid {
    /// Create an empty grid (no columns, no rows)
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Create a grid with `columns` canonical columns (A, B, ...) and `rows`
    /// rows (ids 1..=rows), every cell blank
    pub fn with_dimensions(columns: usize, rows: usize) -> Self {
        let columns: Vec<Column> = (0..columns)
            .map(|i| Column::new(CellAddress::column_to_letters(i as u64)))
            .collect();

        let mut grid = Self {
            columns,
            rows: Vec::with_capacity(rows),
        };
        for id in 1..=rows as u64 {
            let row = grid.blank_row(id);
            grid.rows.push(row);
        }
        grid
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Look up a row by identifier
    pub fn row(&self, id: u64) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Look up a row mutably by identifier
    pub fn row_mut(&mut self, id: u64) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// A row's current 0-based index, if present
    pub fn row_position(&self, id: u64) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// The row at a 0-based index
    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Look up a column by field name
    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// A column's current 0-based index, if present
    pub fn column_position(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field == field)
    }

    /// Column field names in display order
    pub fn column_fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.field.as_str())
    }

    /// A cell's content by row identifier and field name
    pub fn cell(&self, row_id: u64, field: &str) -> Option<&CellContent> {
        self.row(row_id)?.cell(field)
    }

    /// A cell's content by positional address (1-based row position).
    ///
    /// Returns `None` for rows beyond the grid, row position 0, or fields the
    /// row does not carry.
    pub fn cell_at(&self, address: CellAddress) -> Option<&CellContent> {
        let index = usize::try_from(address.row.checked_sub(1)?).ok()?;
        let row = self.rows.get(index)?;
        row.cell(&address.column_letters())
    }

    /// A blank row for this grid's columns: default height, every field empty
    /// text
    pub fn blank_row(&self, id: u64) -> Row {
        let mut row = Row::new(id);
        for field in self.column_fields() {
            row.cells.insert(field.to_string(), CellContent::Text(String::new()));
        }
        row
    }

    /// The identifier the next created row receives: max existing id + 1, or
    /// 1 for an empty grid
    pub fn next_row_id(&self) -> u64 {
        self.rows.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
    }

    /// Append a blank row at the end. No formula references shift, so no
    /// rewriting happens. Returns the new row's id.
    pub fn append_row(&mut self) -> u64 {
        let id = self.next_row_id();
        let row = self.blank_row(id);
        self.rows.push(row);
        id
    }

    /// Append a blank column at the end (next canonical letter name). No
    /// formula references shift, so no rewriting happens. Returns the new
    /// field name.
    pub fn append_column(&mut self) -> String {
        let field = CellAddress::column_to_letters(self.columns.len() as u64);
        self.columns.push(Column::new(field.clone()));
        for row in &mut self.rows {
            row.cells
                .insert(field.clone(), CellContent::Text(String::new()));
        }
        field
    }

    /// Set a cell's content. The row must exist and the field must name a
    /// column.
    pub fn set_cell<S: Into<String>>(
        &mut self,
        row_id: u64,
        field: S,
        content: CellContent,
    ) -> Result<()> {
        let field = field.into();
        if self.column_position(&field).is_none() {
            return Err(Error::ColumnNotFound(field));
        }
        let row = self.row_mut(row_id).ok_or(Error::RowNotFound(row_id))?;
        row.set_cell(field, content);
        Ok(())
    }

    /// Set a row's display height
    pub fn set_row_height(&mut self, row_id: u64, height: f64) -> Result<()> {
        let row = self.row_mut(row_id).ok_or(Error::RowNotFound(row_id))?;
        row.height = height;
        Ok(())
    }
}

impl Default for Grid {
    /// The fresh-document state: 10 columns (A..J) by 20 rows
    fn default() -> Self {
        Self::with_dimensions(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS)
    }
}
