//! Cell content and resolved-value types

use std::fmt;

/// Raw cell content as stored in the grid.
///
/// A formula is `Text` whose first character is `=`; everything else is a
/// literal. JSON documents map `null` (or an absent field) to `Empty`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellContent {
    /// No content
    Empty,
    /// Numeric literal
    Number(f64),
    /// Text literal, or a formula when it starts with `=`
    Text(String),
}

impl CellContent {
    /// True if this content is a formula (text starting with `=`)
    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Text(s) if s.starts_with('='))
    }

    /// The formula body (text after the leading `=`), if this is a formula
    pub fn formula_body(&self) -> Option<&str> {
        match self {
            CellContent::Text(s) => s.strip_prefix('='),
            _ => None,
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        CellContent::Empty
    }
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellContent::Empty => Ok(()),
            CellContent::Number(n) => write!(f, "{}", format_number(*n)),
            CellContent::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellContent {
    fn from(n: f64) -> Self {
        CellContent::Number(n)
    }
}

impl From<&str> for CellContent {
    fn from(s: &str) -> Self {
        CellContent::Text(s.to_string())
    }
}

impl From<String> for CellContent {
    fn from(s: String) -> Self {
        CellContent::Text(s)
    }
}

/// A cell's value after evaluation.
///
/// Non-formula content passes through unchanged; formulas resolve to a number
/// or to one of the [`CellError`] sentinels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ResolvedValue {
    /// No content
    Empty,
    /// Numeric value
    Number(f64),
    /// Literal text passed through
    Text(String),
    /// Error sentinel
    Error(CellError),
}

impl ResolvedValue {
    /// Numeric coercion: a finite number is itself; non-blank text is numeric
    /// iff its full trimmed form parses as a finite f64. Everything else has
    /// no numeric value.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            ResolvedValue::Number(n) if n.is_finite() => Some(*n),
            ResolvedValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// True if this is an error sentinel
    pub fn is_error(&self) -> bool {
        matches!(self, ResolvedValue::Error(_))
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Empty => Ok(()),
            ResolvedValue::Number(n) => write!(f, "{}", format_number(*n)),
            ResolvedValue::Text(s) => write!(f, "{}", s),
            ResolvedValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<CellError> for ResolvedValue {
    fn from(e: CellError) -> Self {
        ResolvedValue::Error(e)
    }
}

/// Error sentinels: values, not exceptions.
///
/// Every malformed or inconsistent state during evaluation resolves to one of
/// these; the recompute itself never aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// Malformed arithmetic expression (`#ERROR`)
    Error,
    /// Dangling or cyclic reference (`#REF!`)
    Ref,
    /// Division by zero: empty-set average or infinite result (`#DIV/0!`)
    Div0,
    /// Invalid numeric operation: empty-set median (`#NUM!`)
    Num,
    /// Unrecognized function name (`#NAME?`)
    Name,
}

impl CellError {
    /// The sentinel token for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Error => "#ERROR",
            CellError::Ref => "#REF!",
            CellError::Div0 => "#DIV/0!",
            CellError::Num => "#NUM!",
            CellError::Name => "#NAME?",
        }
    }

    /// Parse a sentinel token
    pub fn from_str(s: &str) -> Option<CellError> {
        match s {
            "#ERROR" => Some(CellError::Error),
            "#REF!" => Some(CellError::Ref),
            "#DIV/0!" => Some(CellError::Div0),
            "#NUM!" => Some(CellError::Num),
            "#NAME?" => Some(CellError::Name),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Render a number the way it substitutes into formula text and displays to
/// the user: shortest round-trip decimal, negative zero normalized to `0`.
/// Infinities render as `inf`/`-inf` (only reachable mid-evaluation, from an
/// overflowed aggregate).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
