//! Range aggregate functions
//!
//! The aggregates operate on the numeric values collected from a rectangular
//! span of cells; non-numeric and empty cells have already been filtered out
//! by the time an aggregate runs. Each one decides what an empty input set
//! means for itself.

use gridcalc_core::CellError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// An aggregate implementation: collected values in, a number or an error
/// sentinel out.
pub type AggregateFn = fn(&[f64]) -> Result<f64, CellError>;

static REGISTRY: Lazy<HashMap<&'static str, AggregateFn>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, AggregateFn> = HashMap::new();
    m.insert("SUM", fn_sum);
    m.insert("AVERAGE", fn_average);
    m.insert("MEAN", fn_average);
    m.insert("MEDIAN", fn_median);
    m
});

/// Look up an aggregate by its (already uppercased) name
pub fn lookup(name: &str) -> Option<AggregateFn> {
    REGISTRY.get(name).copied()
}

/// SUM: the arithmetic sum, with 0 for an empty set
fn fn_sum(values: &[f64]) -> Result<f64, CellError> {
    Ok(values.iter().sum())
}

/// AVERAGE and MEAN: arithmetic mean, `#DIV/0!` for an empty set
fn fn_average(values: &[f64]) -> Result<f64, CellError> {
    if values.is_empty() {
        return Err(CellError::Div0);
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// MEDIAN: the middle of the sorted values, the mean of the two middles for
/// an even count, `#NUM!` for an empty set
fn fn_median(values: &[f64]) -> Result<f64, CellError> {
    if values.is_empty() {
        return Err(CellError::Num);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 != 0 {
        Ok(sorted[mid])
    } else {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
