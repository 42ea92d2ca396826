//! # gridcalc-formula
//!
//! Formula resolution for gridcalc grids.
//!
//! This crate provides:
//! - Address-token scanning over formula text
//! - Range aggregate functions (SUM, AVERAGE, MEAN, MEDIAN)
//! - A sandboxed arithmetic expression parser
//! - The recursive evaluator with cycle detection
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{Grid, ResolvedValue};
//! use gridcalc_formula::{evaluate_cell, EvaluationContext};
//!
//! let mut grid = Grid::default();
//! grid.set_cell(1, "A", "3".into()).unwrap();
//! grid.set_cell(1, "B", "=A1*2".into()).unwrap();
//!
//! let ctx = EvaluationContext::new(&grid);
//! assert_eq!(evaluate_cell(&ctx, 1, "B"), ResolvedValue::Number(6.0));
//! ```

pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod scanner;

pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_cell, EvaluationContext, VisitedSet};
pub use parser::evaluate_expression;
pub use scanner::{AddressScanner, AddressToken};
