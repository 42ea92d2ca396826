//! Structural edits with reference rewriting
//!
//! Formulas name cells by position, so structural edits rewrite formula text
//! to keep references pointing at the same data. Rewrites work on the raw
//! stored text (only cells starting with `=`), splicing replacements over
//! the scanned address tokens:
//!
//! - Deleting rows renumbers surviving row references and leaves `#REF!`
//!   where a reference pointed at a deleted (or never-existing) row.
//! - Inserting a row shifts references at or below the insertion point down
//!   by one; references above it are left byte-for-byte as written.
//! - Inserting a column shifts column letters at or past the insertion point
//!   while keeping row digits as written, then renames every column to its
//!   canonical letters and remaps row fields to match.
//! - Deleting columns renumbers surviving column letters the same way and
//!   leaves `#REF!` where a reference pointed at a deleted (or off-grid)
//!   column.
//!
//! Column-structure edits rebuild each row from the surviving columns: row
//! ids and heights carry over, stray fields do not.

use gridcalc_core::{CellAddress, CellContent, Column, Error, Grid, Result};
use gridcalc_formula::{AddressScanner, AddressToken};

use ahash::{AHashMap, AHashSet};

/// Where an inserted row lands relative to the anchor row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowInsertPosition {
    Above,
    Below,
}

/// Where an inserted column lands relative to the anchor column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnInsertPosition {
    Left,
    Right,
}

/// Extension trait adding structural edits to [`Grid`]
pub trait GridEditExt {
    /// Delete the rows with the given ids, renumbering row references in the
    /// surviving formulas. Ids that match no row are ignored; an empty id
    /// list leaves the grid untouched. Returns the number of rows removed.
    fn delete_rows(&mut self, row_ids: &[u64]) -> usize;

    /// Insert a blank row above or below the row with the given id, shifting
    /// row references at or past the insertion point. Returns the new row's
    /// id.
    fn insert_row_at(&mut self, anchor_row_id: u64, position: RowInsertPosition) -> Result<u64>;

    /// Insert a blank column left or right of the given column, shifting
    /// column references at or past the insertion point and renaming all
    /// columns canonically. Returns the new column's field name.
    fn insert_column_at(
        &mut self,
        anchor_field: &str,
        position: ColumnInsertPosition,
    ) -> Result<String>;

    /// Delete the named columns, renumbering column references in formulas.
    /// Names that match no column are ignored; an empty list leaves the grid
    /// untouched. Deleting every remaining column is rejected. Returns the
    /// number of columns removed.
    fn delete_columns(&mut self, fields: &[&str]) -> Result<usize>;
}

impl GridEditExt for Grid {
    fn delete_rows(&mut self, row_ids: &[u64]) -> usize {
        if row_ids.is_empty() {
            return 0;
        }

        let ids: AHashSet<u64> = row_ids.iter().copied().collect();

        // Old 1-based position -> new 1-based position, survivors only
        let mut position_map: AHashMap<u64, u64> = AHashMap::new();
        let mut next_position = 1u64;
        for (index, row) in self.rows.iter().enumerate() {
            if !ids.contains(&row.id) {
                position_map.insert(index as u64 + 1, next_position);
                next_position += 1;
            }
        }

        let before = self.rows.len();
        self.rows.retain(|row| !ids.contains(&row.id));
        let removed = before - self.rows.len();

        let rewrites = rewrite_formulas(self, |token, text| {
            match position_map.get(&token.row) {
                // Letters as written, row number canonical
                Some(new_row) => Some(format!("{}{}", token.letters(text), new_row)),
                None => Some("#REF!".to_string()),
            }
        });

        log::debug!("deleted {removed} rows, rewrote {rewrites} formulas");
        removed
    }

    fn insert_row_at(&mut self, anchor_row_id: u64, position: RowInsertPosition) -> Result<u64> {
        let anchor_index = self
            .row_position(anchor_row_id)
            .ok_or(Error::RowNotFound(anchor_row_id))?;

        let insertion_index = match position {
            RowInsertPosition::Above => anchor_index,
            RowInsertPosition::Below => anchor_index + 1,
        };

        // 1-based positions at or past this shift down by one
        let threshold = insertion_index as u64 + 1;
        let rewrites = rewrite_formulas(self, |token, text| {
            if token.row >= threshold {
                Some(format!(
                    "{}{}",
                    token.letters(text),
                    token.row.saturating_add(1)
                ))
            } else {
                None
            }
        });

        let id = self.next_row_id();
        let row = self.blank_row(id);
        self.rows.insert(insertion_index, row);

        log::debug!(
            "inserted row {id} at position {}, rewrote {rewrites} formulas",
            insertion_index + 1
        );
        Ok(id)
    }

    fn insert_column_at(
        &mut self,
        anchor_field: &str,
        position: ColumnInsertPosition,
    ) -> Result<String> {
        let anchor_index = self
            .column_position(anchor_field)
            .ok_or_else(|| Error::ColumnNotFound(anchor_field.to_string()))?;

        let insertion_index = match position {
            ColumnInsertPosition::Left => anchor_index,
            ColumnInsertPosition::Right => anchor_index + 1,
        };

        // Column indexes at or past the insertion point shift by one; row
        // digits stay exactly as written.
        let threshold = insertion_index as u64;
        let rewrites = rewrite_formulas(self, |token, text| {
            if token.col >= threshold {
                // col + 1 cannot overflow: scanned indexes top out one below
                // u64::MAX
                Some(format!(
                    "{}{}",
                    CellAddress::column_to_letters(token.col + 1),
                    token.digits(text)
                ))
            } else {
                None
            }
        });

        // Every column is rebuilt with canonical letters and default
        // metadata; the field map pairs each old field with its new name.
        let new_count = self.columns.len() + 1;
        let mut new_columns = Vec::with_capacity(new_count);
        let mut field_map: Vec<(String, String)> = Vec::with_capacity(self.columns.len());
        let mut old_index = 0usize;
        for i in 0..new_count {
            let new_field = CellAddress::column_to_letters(i as u64);
            new_columns.push(Column::new(new_field.clone()));
            if i == insertion_index {
                continue;
            }
            field_map.push((self.columns[old_index].field.clone(), new_field));
            old_index += 1;
        }
        self.columns = new_columns;

        let inserted_field = CellAddress::column_to_letters(insertion_index as u64);
        for row in &mut self.rows {
            let mut cells = AHashMap::with_capacity(field_map.len() + 1);
            for (old_field, new_field) in &field_map {
                if let Some(content) = row.cells.remove(old_field) {
                    cells.insert(new_field.clone(), content);
                }
            }
            cells.insert(inserted_field.clone(), CellContent::Text(String::new()));
            row.cells = cells;
        }

        log::debug!(
            "inserted column {inserted_field} at index {insertion_index}, rewrote {rewrites} formulas"
        );
        Ok(inserted_field)
    }

    fn delete_columns(&mut self, fields: &[&str]) -> Result<usize> {
        if fields.is_empty() {
            return Ok(0);
        }

        let selected: AHashSet<&str> = fields.iter().copied().collect();
        let survivors: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, col)| !selected.contains(col.field.as_str()))
            .map(|(index, _)| index)
            .collect();

        if survivors.is_empty() {
            return Err(Error::CannotDeleteAllColumns);
        }

        let removed = self.columns.len() - survivors.len();

        // Old column index -> new column index, survivors only
        let mut index_map: AHashMap<u64, u64> = AHashMap::new();
        for (new_index, &old_index) in survivors.iter().enumerate() {
            index_map.insert(old_index as u64, new_index as u64);
        }

        let rewrites = rewrite_formulas(self, |token, text| {
            match index_map.get(&token.col) {
                // Letters canonical for the new index, digits as written
                Some(&new_col) => Some(format!(
                    "{}{}",
                    CellAddress::column_to_letters(new_col),
                    token.digits(text)
                )),
                None => Some("#REF!".to_string()),
            }
        });

        // Surviving columns keep their metadata but take canonical names
        let mut field_map: Vec<(String, String)> = Vec::with_capacity(survivors.len());
        let mut new_columns = Vec::with_capacity(survivors.len());
        for (new_index, &old_index) in survivors.iter().enumerate() {
            let mut column = self.columns[old_index].clone();
            let new_field = CellAddress::column_to_letters(new_index as u64);
            field_map.push((column.field.clone(), new_field.clone()));
            column.rename(new_field);
            new_columns.push(column);
        }
        self.columns = new_columns;

        for row in &mut self.rows {
            let mut cells = AHashMap::with_capacity(field_map.len());
            for (old_field, new_field) in &field_map {
                if let Some(content) = row.cells.remove(old_field) {
                    cells.insert(new_field.clone(), content);
                }
            }
            row.cells = cells;
        }

        log::debug!("deleted {removed} columns, rewrote {rewrites} formulas");
        Ok(removed)
    }
}

/// Apply a token rewrite to every formula cell of the grid. The callback
/// returns the replacement text for a token, or `None` to keep it exactly as
/// written. Returns the number of cells whose text changed.
fn rewrite_formulas<F>(grid: &mut Grid, mut rewrite: F) -> usize
where
    F: FnMut(&AddressToken, &str) -> Option<String>,
{
    let mut changed = 0;
    for row in &mut grid.rows {
        for content in row.cells.values_mut() {
            let CellContent::Text(text) = content else {
                continue;
            };
            if !text.starts_with('=') {
                continue;
            }

            let rewritten = splice_tokens(text, &mut rewrite);
            if rewritten != *text {
                *text = rewritten;
                changed += 1;
            }
        }
    }
    changed
}

/// Splice token replacements into formula text, preserving everything
/// between tokens byte-for-byte.
fn splice_tokens<F>(text: &str, rewrite: &mut F) -> String
where
    F: FnMut(&AddressToken, &str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for token in AddressScanner::new(text) {
        let Some(replacement) = rewrite(&token, text) else {
            continue;
        };
        out.push_str(&text[last..token.start]);
        out.push_str(&replacement);
        last = token.end;
    }

    out.push_str(&text[last..]);
    out
}
