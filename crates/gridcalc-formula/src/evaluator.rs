//! Formula evaluation
//!
//! A formula body resolves in three passes over its text:
//!
//! 1. Range functions (`SUM(A1:B3)` and friends) are replaced by their
//!    aggregated value.
//! 2. Remaining cell references are replaced by the referenced cell's
//!    numeric value, recursively evaluating referenced formulas.
//! 3. What is left is evaluated as plain arithmetic.
//!
//! Both substitution passes splice rendered numbers back into the text, so a
//! pass can manufacture tokens the next pass picks up. That is deliberate
//! and observable (`=ASUM(A1:A2)` becomes `A` glued to the sum, which then
//! reads as a cell reference).
//!
//! Cycles are caught with a visited set of addresses threaded through the
//! recursion: each cell is evaluated with its own address pre-seeded, and a
//! reference back into the active chain resolves to `#REF!`. The set is
//! cloned per branch, so sibling references to the same cell are fine.
//!
//! The first error sentinel produced anywhere in the resolution becomes the
//! whole formula's value: range functions left to right, then references
//! left to right.

use crate::functions;
use crate::parser::evaluate_expression;
use crate::scanner::AddressScanner;
use ahash::AHashSet;
use gridcalc_core::{format_number, CellAddress, CellContent, CellError, Grid, ResolvedValue};
use lazy_regex::regex;

/// Addresses on the active resolution chain, used for cycle detection
pub type VisitedSet = AHashSet<CellAddress>;

/// Grid access for one evaluation run
pub struct EvaluationContext<'a> {
    grid: &'a Grid,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    fn content_at(&self, address: CellAddress) -> Option<&'a CellContent> {
        self.grid.cell_at(address)
    }

    /// Last addressable row position (1-based); range spans clamp to this
    fn last_row(&self) -> u64 {
        self.grid.row_count() as u64
    }
}

/// Evaluate one cell of the grid by row position and field name.
///
/// The cell's own address is pre-seeded into the visited set, so a formula
/// that refers back to its own cell resolves to `#REF!`. Fields that are not
/// letter-style column names (like `notes`) cannot be referenced from formula
/// text and get no seed.
pub fn evaluate_cell(ctx: &EvaluationContext<'_>, position: u64, field: &str) -> ResolvedValue {
    let mut visited = VisitedSet::default();
    if let Ok(col) = CellAddress::letters_to_column(field) {
        visited.insert(CellAddress::new(col, position));
    }

    let content = position
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| ctx.grid.row_at(i))
        .and_then(|row| row.cell(field));

    match content {
        Some(content) => evaluate(content, ctx, &visited),
        None => ResolvedValue::Empty,
    }
}

/// Evaluate cell content against the grid.
///
/// Non-formula content passes through unchanged. A formula (text starting
/// with `=`) has its body uppercased and resolved; every failure mode maps to
/// an error sentinel rather than an `Err`.
pub fn evaluate(
    content: &CellContent,
    ctx: &EvaluationContext<'_>,
    visited: &VisitedSet,
) -> ResolvedValue {
    let Some(body) = content.formula_body() else {
        return passthrough(content);
    };

    let body = body.to_ascii_uppercase();

    let body = match resolve_range_functions(&body, ctx, visited) {
        Ok(b) => b,
        Err(e) => return ResolvedValue::Error(e),
    };

    let body = match resolve_cell_references(&body, ctx, visited) {
        Ok(b) => b,
        Err(e) => return ResolvedValue::Error(e),
    };

    match evaluate_expression(&body) {
        Ok(n) if n.is_nan() => ResolvedValue::Error(CellError::Ref),
        Ok(n) if n.is_infinite() => ResolvedValue::Error(CellError::Div0),
        Ok(n) => ResolvedValue::Number(n),
        Err(_) => ResolvedValue::Error(CellError::Error),
    }
}

fn passthrough(content: &CellContent) -> ResolvedValue {
    match content {
        CellContent::Empty => ResolvedValue::Empty,
        CellContent::Number(n) => ResolvedValue::Number(*n),
        CellContent::Text(s) => ResolvedValue::Text(s.clone()),
    }
}

/// Replace every `NAME(START:END)` range call with its aggregated value,
/// left to right. The first aggregate that produces an error sentinel aborts
/// the whole resolution with it.
fn resolve_range_functions(
    body: &str,
    ctx: &EvaluationContext<'_>,
    visited: &VisitedSet,
) -> Result<String, CellError> {
    let re = regex!(r"(SUM|AVERAGE|MEDIAN|MEAN)\(([A-Z]+[0-9]+):([A-Z]+[0-9]+)\)");

    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for caps in re.captures_iter(body) {
        let Some(m) = caps.get(0) else { continue };
        let (_, [name, start_text, end_text]) = caps.extract();

        let (Some(start), Some(end)) = (parse_endpoint(start_text), parse_endpoint(end_text))
        else {
            // Endpoint beyond the address space
            return Err(CellError::Error);
        };

        let value = range_aggregate(name, start, end, ctx, visited)?;

        out.push_str(&body[last..m.start()]);
        out.push_str(&format_number(value));
        last = m.end();
    }

    out.push_str(&body[last..]);
    Ok(out)
}

/// Parse a range endpoint like `AA10`. The text shape is guaranteed by the
/// range pattern; `None` only on numeric overflow.
fn parse_endpoint(text: &str) -> Option<CellAddress> {
    let split = text.find(|c: char| c.is_ascii_digit())?;
    let col = CellAddress::letters_to_column(&text[..split]).ok()?;
    let row = text[split..].parse::<u64>().ok()?;
    Some(CellAddress::new(col, row))
}

/// Aggregate the numeric values of the rectangular span between two
/// endpoints (either orientation). Rows clamp to the grid; columns do not,
/// since off-grid fields can still hold values. Cells currently being
/// resolved make the range cyclic.
fn range_aggregate(
    name: &str,
    start: CellAddress,
    end: CellAddress,
    ctx: &EvaluationContext<'_>,
    visited: &VisitedSet,
) -> Result<f64, CellError> {
    let aggregate = functions::lookup(name).ok_or(CellError::Name)?;

    let first_row = start.row.min(end.row);
    let last_row = start.row.max(end.row).min(ctx.last_row());
    let first_col = start.col.min(end.col);
    let last_col = start.col.max(end.col);

    let mut values = Vec::new();
    for row in first_row..=last_row {
        for col in first_col..=last_col {
            let address = CellAddress::new(col, row);

            if visited.contains(&address) {
                return Err(CellError::Ref);
            }

            let Some(content) = ctx.content_at(address) else {
                continue;
            };

            let mut branch = visited.clone();
            branch.insert(address);

            match evaluate(content, ctx, &branch) {
                ResolvedValue::Error(e) => return Err(e),
                value => {
                    if let Some(n) = value.numeric_value() {
                        values.push(n);
                    }
                }
            }
        }
    }

    aggregate(&values)
}

/// Replace every address token with the referenced cell's numeric value,
/// left to right. Missing cells and non-numeric values substitute as 0; a
/// referenced error or a reference back into the active chain aborts the
/// resolution with its sentinel.
fn resolve_cell_references(
    body: &str,
    ctx: &EvaluationContext<'_>,
    visited: &VisitedSet,
) -> Result<String, CellError> {
    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for token in AddressScanner::new(body) {
        let address = token.address();

        if visited.contains(&address) {
            return Err(CellError::Ref);
        }

        let replacement = match ctx.content_at(address) {
            Some(content) => {
                let mut branch = visited.clone();
                branch.insert(address);

                match evaluate(content, ctx, &branch) {
                    ResolvedValue::Error(e) => return Err(e),
                    value => value.numeric_value().unwrap_or(0.0),
                }
            }
            None => 0.0,
        };

        out.push_str(&body[last..token.start]);
        out.push_str(&format_number(replacement));
        last = token.end;
    }

    out.push_str(&body[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::Grid;
    use pretty_assertions::assert_eq;

    /// 10x20 default grid with the given `(field, row id, text)` cells set.
    /// Row ids equal row positions here since nothing is inserted or removed.
    fn grid_with(cells: &[(&str, u64, &str)]) -> Grid {
        let mut grid = Grid::default();
        for (field, row_id, text) in cells {
            grid.set_cell(*row_id, *field, CellContent::from(*text))
                .unwrap();
        }
        grid
    }

    fn eval_str(grid: &Grid, formula: &str) -> ResolvedValue {
        let ctx = EvaluationContext::new(grid);
        evaluate(
            &CellContent::from(formula),
            &ctx,
            &VisitedSet::default(),
        )
    }

    #[test]
    fn test_non_formula_content_passes_through() {
        let grid = Grid::default();
        let ctx = EvaluationContext::new(&grid);
        let visited = VisitedSet::default();

        assert_eq!(
            evaluate(&CellContent::Number(5.0), &ctx, &visited),
            ResolvedValue::Number(5.0)
        );
        assert_eq!(
            evaluate(&CellContent::from("hello"), &ctx, &visited),
            ResolvedValue::Text("hello".into())
        );
        assert_eq!(
            evaluate(&CellContent::Empty, &ctx, &visited),
            ResolvedValue::Empty
        );
        // '#' text is literal unless it is a formula's result
        assert_eq!(
            evaluate(&CellContent::from("#hello"), &ctx, &visited),
            ResolvedValue::Text("#hello".into())
        );
        // Leading whitespace means not a formula
        assert_eq!(
            evaluate(&CellContent::from(" =2+3"), &ctx, &visited),
            ResolvedValue::Text(" =2+3".into())
        );
    }

    #[test]
    fn test_plain_arithmetic() {
        let grid = Grid::default();
        assert_eq!(eval_str(&grid, "=2+3"), ResolvedValue::Number(5.0));
        assert_eq!(eval_str(&grid, "=2+3*4"), ResolvedValue::Number(14.0));
        assert_eq!(eval_str(&grid, "= (1 + 1) * 4"), ResolvedValue::Number(8.0));
    }

    #[test]
    fn test_cell_references() {
        let grid = grid_with(&[("A", 1, "4"), ("B", 1, "6")]);
        assert_eq!(eval_str(&grid, "=A1+B1"), ResolvedValue::Number(10.0));
        // The body is uppercased before resolution
        assert_eq!(eval_str(&grid, "=a1+b1"), ResolvedValue::Number(10.0));
    }

    #[test]
    fn test_blank_and_missing_references_read_as_zero() {
        let grid = Grid::default();
        assert_eq!(eval_str(&grid, "=A1"), ResolvedValue::Number(0.0));
        assert_eq!(eval_str(&grid, "=A99+5"), ResolvedValue::Number(5.0));
        assert_eq!(eval_str(&grid, "=ZZ1+5"), ResolvedValue::Number(5.0));
    }

    #[test]
    fn test_text_coercion_in_references() {
        let grid = grid_with(&[("A", 1, "7"), ("A", 2, " 7 "), ("A", 3, "abc")]);
        assert_eq!(eval_str(&grid, "=A1*2"), ResolvedValue::Number(14.0));
        assert_eq!(eval_str(&grid, "=A2*2"), ResolvedValue::Number(14.0));
        // Non-numeric text reads as 0
        assert_eq!(eval_str(&grid, "=A3*2"), ResolvedValue::Number(0.0));
    }

    #[test]
    fn test_formula_chains() {
        let grid = grid_with(&[("A", 1, "2"), ("B", 1, "=A1+1"), ("C", 1, "=B1*2")]);
        assert_eq!(eval_str(&grid, "=C1"), ResolvedValue::Number(6.0));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let grid = grid_with(&[("A", 1, "=A1")]);
        let ctx = EvaluationContext::new(&grid);
        assert_eq!(
            evaluate_cell(&ctx, 1, "A"),
            ResolvedValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_mutual_cycle() {
        let grid = grid_with(&[("A", 1, "=B1"), ("B", 1, "=A1")]);
        let ctx = EvaluationContext::new(&grid);
        assert_eq!(
            evaluate_cell(&ctx, 1, "A"),
            ResolvedValue::Error(CellError::Ref)
        );
        assert_eq!(
            evaluate_cell(&ctx, 1, "B"),
            ResolvedValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_leading_zero_reference_normalizes_for_cycles() {
        let grid = grid_with(&[("A", 5, "=A05")]);
        let ctx = EvaluationContext::new(&grid);
        assert_eq!(
            evaluate_cell(&ctx, 5, "A"),
            ResolvedValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_diamond_references_are_not_cycles() {
        // D1 reads B1 and C1, both of which read A1. The shared upstream
        // cell is visited on two separate branches, which is fine.
        let grid = grid_with(&[
            ("A", 1, "3"),
            ("B", 1, "=A1+1"),
            ("C", 1, "=A1+2"),
            ("D", 1, "=B1+C1"),
        ]);
        let ctx = EvaluationContext::new(&grid);
        assert_eq!(evaluate_cell(&ctx, 1, "D"), ResolvedValue::Number(9.0));
    }

    #[test]
    fn test_referenced_error_propagates() {
        let grid = grid_with(&[("B", 1, "=1/0")]);
        assert_eq!(
            eval_str(&grid, "=B1+1"),
            ResolvedValue::Error(CellError::Div0)
        );
    }

    #[test]
    fn test_range_aggregates() {
        let grid = grid_with(&[("A", 1, "1"), ("A", 2, "2"), ("A", 3, "3"), ("A", 4, "4")]);
        assert_eq!(eval_str(&grid, "=SUM(A1:A4)"), ResolvedValue::Number(10.0));
        assert_eq!(
            eval_str(&grid, "=AVERAGE(A1:A4)"),
            ResolvedValue::Number(2.5)
        );
        assert_eq!(eval_str(&grid, "=MEAN(A1:A4)"), ResolvedValue::Number(2.5));
        assert_eq!(
            eval_str(&grid, "=MEDIAN(A1:A4)"),
            ResolvedValue::Number(2.5)
        );
        assert_eq!(
            eval_str(&grid, "=MEDIAN(A1:A3)"),
            ResolvedValue::Number(2.0)
        );
    }

    #[test]
    fn test_range_skips_blank_and_text_cells() {
        let grid = grid_with(&[("A", 1, "1"), ("A", 2, "notes"), ("A", 4, "3")]);
        assert_eq!(eval_str(&grid, "=SUM(A1:A5)"), ResolvedValue::Number(4.0));
        assert_eq!(
            eval_str(&grid, "=AVERAGE(A1:A5)"),
            ResolvedValue::Number(2.0)
        );
    }

    #[test]
    fn test_empty_range_per_function() {
        let grid = Grid::default();
        assert_eq!(eval_str(&grid, "=SUM(A1:A3)"), ResolvedValue::Number(0.0));
        assert_eq!(
            eval_str(&grid, "=AVERAGE(A1:A3)"),
            ResolvedValue::Error(CellError::Div0)
        );
        assert_eq!(
            eval_str(&grid, "=MEDIAN(A1:A3)"),
            ResolvedValue::Error(CellError::Num)
        );
    }

    #[test]
    fn test_range_endpoints_swap_freely() {
        let grid = grid_with(&[("A", 1, "1"), ("A", 2, "2"), ("A", 3, "3")]);
        assert_eq!(eval_str(&grid, "=SUM(A3:A1)"), ResolvedValue::Number(6.0));
    }

    #[test]
    fn test_rectangular_range() {
        let grid = grid_with(&[
            ("A", 1, "1"),
            ("B", 1, "2"),
            ("A", 2, "3"),
            ("B", 2, "4"),
        ]);
        assert_eq!(eval_str(&grid, "=SUM(A1:B2)"), ResolvedValue::Number(10.0));
        assert_eq!(eval_str(&grid, "=SUM(B2:A1)"), ResolvedValue::Number(10.0));
    }

    #[test]
    fn test_range_rows_clamp_to_grid() {
        let grid = grid_with(&[("A", 19, "5"), ("A", 20, "7")]);
        assert_eq!(
            eval_str(&grid, "=SUM(A19:A500)"),
            ResolvedValue::Number(12.0)
        );
    }

    #[test]
    fn test_range_evaluates_formulas_inside() {
        let grid = grid_with(&[("A", 1, "2"), ("A", 2, "=A1*10")]);
        assert_eq!(eval_str(&grid, "=SUM(A1:A2)"), ResolvedValue::Number(22.0));
    }

    #[test]
    fn test_range_over_own_cell_is_a_cycle() {
        let grid = grid_with(&[("A", 1, "=SUM(A1:A2)")]);
        let ctx = EvaluationContext::new(&grid);
        assert_eq!(
            evaluate_cell(&ctx, 1, "A"),
            ResolvedValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_error_inside_range_propagates() {
        let grid = grid_with(&[("A", 1, "1"), ("A", 2, "=1/0")]);
        assert_eq!(
            eval_str(&grid, "=SUM(A1:A3)"),
            ResolvedValue::Error(CellError::Div0)
        );
    }

    #[test]
    fn test_first_error_wins_left_to_right() {
        let grid = grid_with(&[("A", 1, "=1/0"), ("B", 1, "=(")]);
        assert_eq!(
            eval_str(&grid, "=A1+B1"),
            ResolvedValue::Error(CellError::Div0)
        );
        assert_eq!(
            eval_str(&grid, "=B1+A1"),
            ResolvedValue::Error(CellError::Error)
        );
    }

    #[test]
    fn test_range_errors_beat_reference_errors() {
        // Range functions resolve before references, so a range error wins
        // even when a failing reference sits to its left.
        let grid = grid_with(&[("A", 1, "=("), ("B", 1, "=0/0")]);
        assert_eq!(
            eval_str(&grid, "=A1+SUM(B1:B1)"),
            ResolvedValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_function_match_needs_no_word_boundary() {
        // "ASUM(A1:A2)" matches SUM starting inside the word; the leading A
        // fuses with the substituted sum and reads as a fresh reference.
        let grid = grid_with(&[("A", 1, "1"), ("A", 2, "2"), ("A", 3, "7")]);
        assert_eq!(
            eval_str(&grid, "=ASUM(A1:A2)"),
            ResolvedValue::Number(7.0)
        );
    }

    #[test]
    fn test_exponent_literals_read_as_references() {
        // "1E3" is not an exponent literal here: E3 scans as a reference.
        let grid = Grid::default();
        assert_eq!(eval_str(&grid, "=1E3"), ResolvedValue::Number(10.0));

        let grid = grid_with(&[("E", 3, "5")]);
        assert_eq!(eval_str(&grid, "=1E3"), ResolvedValue::Number(15.0));
    }

    #[test]
    fn test_unknown_function_names_fail_as_syntax() {
        let grid = grid_with(&[("A", 1, "1"), ("A", 2, "2")]);
        assert_eq!(
            eval_str(&grid, "=COUNT(A1:A2)"),
            ResolvedValue::Error(CellError::Error)
        );
    }

    #[test]
    fn test_sentinel_mapping() {
        let grid = Grid::default();
        // NaN results read as dangling references
        assert_eq!(eval_str(&grid, "="), ResolvedValue::Error(CellError::Ref));
        assert_eq!(
            eval_str(&grid, "=0/0"),
            ResolvedValue::Error(CellError::Ref)
        );
        assert_eq!(
            eval_str(&grid, "=#REF!"),
            ResolvedValue::Error(CellError::Ref)
        );
        // Infinite results read as division by zero
        assert_eq!(
            eval_str(&grid, "=1/0"),
            ResolvedValue::Error(CellError::Div0)
        );
        assert_eq!(
            eval_str(&grid, "=-1/0"),
            ResolvedValue::Error(CellError::Div0)
        );
        // Anything unparseable is a plain error
        assert_eq!(
            eval_str(&grid, "=("),
            ResolvedValue::Error(CellError::Error)
        );
        assert_eq!(
            eval_str(&grid, "=#DIV/0!"),
            ResolvedValue::Error(CellError::Error)
        );
        assert_eq!(
            eval_str(&grid, "=2+"),
            ResolvedValue::Error(CellError::Error)
        );
    }

    #[test]
    fn test_subtracting_a_negative_reference() {
        let grid = grid_with(&[("A", 1, "5"), ("B", 1, "-3")]);
        assert_eq!(eval_str(&grid, "=A1-B1"), ResolvedValue::Number(8.0));
    }

    #[test]
    fn test_off_grid_fields_are_referenceable() {
        // A row can carry fields beyond the column list; letter-style ones
        // are reachable from formulas like any column.
        let mut grid = Grid::default();
        grid.row_mut(1)
            .unwrap()
            .set_cell("NOTES", CellContent::Number(5.0));
        assert_eq!(eval_str(&grid, "=NOTES1+1"), ResolvedValue::Number(6.0));
    }

    #[test]
    fn test_evaluate_cell_literals_and_misses() {
        let grid = grid_with(&[("A", 1, "hi")]);
        let ctx = EvaluationContext::new(&grid);

        assert_eq!(
            evaluate_cell(&ctx, 1, "A"),
            ResolvedValue::Text("hi".into())
        );
        assert_eq!(evaluate_cell(&ctx, 99, "A"), ResolvedValue::Empty);
        assert_eq!(evaluate_cell(&ctx, 0, "A"), ResolvedValue::Empty);
        assert_eq!(evaluate_cell(&ctx, 1, "nope"), ResolvedValue::Empty);
    }
}
