//! Property tests for structural-edit rewriting and evaluation totality

use gridcalc::prelude::*;
use gridcalc::{evaluate_expression, AddressScanner};
use proptest::prelude::*;

const GRID_COLS: usize = 5;
const GRID_ROWS: u64 = 8;

/// A canonical in-grid reference like `C4`
fn arb_reference() -> impl Strategy<Value = String> {
    (0..GRID_COLS as u64, 1..=GRID_ROWS)
        .prop_map(|(col, row)| format!("{}{}", CellAddress::column_to_letters(col), row))
}

/// Arithmetic over canonical in-grid references
fn arb_formula() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_reference(), 1..4)
        .prop_map(|refs| format!("={}", refs.join("+")))
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    proptest::collection::vec((1..=GRID_ROWS, 0..GRID_COLS as u64, arb_formula()), 0..6)
        .prop_map(|cells| {
            let mut grid = Grid::with_dimensions(GRID_COLS, GRID_ROWS as usize);
            for (row, col, text) in cells {
                let field = CellAddress::column_to_letters(col);
                grid.set_cell(row, field, text.into()).unwrap();
            }
            grid
        })
}

/// Arbitrary cell content: junk text, junk formulas, and real formulas
fn arb_cell_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,12}",
        "=[ -~]{0,12}",
        arb_formula(),
    ]
}

proptest! {
    /// Inserting a row and deleting it again leaves the grid untouched,
    /// formula text included
    #[test]
    fn insert_then_delete_row_is_identity(
        grid in arb_grid(),
        anchor in 1..=GRID_ROWS,
        below in any::<bool>(),
    ) {
        let position = if below {
            RowInsertPosition::Below
        } else {
            RowInsertPosition::Above
        };

        let mut edited = grid.clone();
        let id = edited.insert_row_at(anchor, position).unwrap();
        edited.delete_rows(&[id]);

        prop_assert_eq!(edited, grid);
    }

    /// Inserting a column and deleting it again restores cell data and the
    /// column layout
    #[test]
    fn insert_then_delete_column_restores_cells(
        grid in arb_grid(),
        anchor in 0..GRID_COLS as u64,
        right in any::<bool>(),
    ) {
        let position = if right {
            ColumnInsertPosition::Right
        } else {
            ColumnInsertPosition::Left
        };
        let anchor_field = CellAddress::column_to_letters(anchor);

        let mut edited = grid.clone();
        let field = edited.insert_column_at(&anchor_field, position).unwrap();
        edited.delete_columns(&[field.as_str()]).unwrap();

        prop_assert_eq!(&edited.rows, &grid.rows);
        let fields: Vec<_> = edited.column_fields().collect();
        let expected: Vec<_> = grid.column_fields().collect();
        prop_assert_eq!(fields, expected);
    }

    /// Deleting a row id that matches nothing changes nothing when formulas
    /// are canonical and in range
    #[test]
    fn delete_of_absent_row_id_is_identity(grid in arb_grid()) {
        let mut edited = grid.clone();
        prop_assert_eq!(edited.delete_rows(&[GRID_ROWS + 100]), 0);
        prop_assert_eq!(edited, grid);
    }

    /// Writing resolved values back as literal content and resolving again
    /// reproduces the same display values
    #[test]
    fn resolved_values_are_a_fixed_point(grid in arb_grid()) {
        let first = grid.resolve();

        let mut literal = grid.clone();
        for row in &first.rows {
            for (field, value) in &row.cells {
                let content = match value {
                    ResolvedValue::Empty => CellContent::Empty,
                    ResolvedValue::Number(n) => CellContent::Number(*n),
                    ResolvedValue::Text(text) => CellContent::Text(text.clone()),
                    ResolvedValue::Error(e) => CellContent::Text(e.to_string()),
                };
                literal.set_cell(row.id, field, content).unwrap();
            }
        }

        let second = literal.resolve();
        for (index, row) in first.rows.iter().enumerate() {
            let position = index as u64 + 1;
            for (field, value) in &row.cells {
                let expected = match value {
                    ResolvedValue::Error(e) => ResolvedValue::Text(e.to_string()),
                    other => other.clone(),
                };
                prop_assert_eq!(second.value_at(position, field), Some(&expected));
            }
        }
    }

    /// Resolution always produces a value for every cell, junk included
    #[test]
    fn evaluation_is_total(
        cells in proptest::collection::vec(
            (1..=GRID_ROWS, 0..GRID_COLS as u64, arb_cell_text()),
            0..8,
        ),
    ) {
        let mut grid = Grid::with_dimensions(GRID_COLS, GRID_ROWS as usize);
        for (row, col, text) in cells {
            let field = CellAddress::column_to_letters(col);
            grid.set_cell(row, field, text.into()).unwrap();
        }

        let resolved = grid.resolve();
        prop_assert_eq!(resolved.rows.len(), grid.row_count());
        for position in 1..=GRID_ROWS {
            for col in 0..GRID_COLS as u64 {
                let field = CellAddress::column_to_letters(col);
                prop_assert!(resolved.value_at(position, &field).is_some());
            }
        }
    }

    /// The expression evaluator returns rather than panicking on any input
    #[test]
    fn expression_evaluation_never_panics(input in "[ -~]{0,16}") {
        let _ = evaluate_expression(&input);
    }

    /// Scanned tokens are well-formed, in-bounds, and non-overlapping
    #[test]
    fn scanned_tokens_are_well_formed(input in "[ -~]{0,24}") {
        let mut previous_end = 0;
        for token in AddressScanner::new(&input) {
            prop_assert!(token.start >= previous_end);
            prop_assert!(token.start < token.digits_start);
            prop_assert!(token.digits_start < token.end);
            prop_assert!(token.end <= input.len());
            prop_assert!(input[token.start..token.digits_start]
                .bytes()
                .all(|b| b.is_ascii_uppercase()));
            prop_assert!(input[token.digits_start..token.end]
                .bytes()
                .all(|b| b.is_ascii_digit()));
            previous_end = token.end;
        }
    }
}
