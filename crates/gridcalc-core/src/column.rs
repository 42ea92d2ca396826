//! Column types

use crate::DEFAULT_COLUMN_WIDTH;

/// Column definition: the field key rows are stored under, plus display
/// metadata passed through opaquely.
///
/// Invariant: `field` is always the canonical letter-style name for the
/// column's current position. Renames are systemic (structural edits rename
/// whole suffixes of the column list), never ad hoc.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    /// Field key (canonical letter-style name: A, B, ..., Z, AA, ...)
    pub field: String,
    /// Display header; kept equal to `field` by systemic renames
    #[cfg_attr(
        feature = "serde",
        serde(rename = "headerName", default, skip_serializing_if = "Option::is_none")
    )]
    pub header_name: Option<String>,
    /// Display width (None = consumer default)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub width: Option<f64>,
}

impl Column {
    /// Create a new column with default display metadata
    pub fn new<S: Into<String>>(field: S) -> Self {
        let field = field.into();
        Self {
            header_name: Some(field.clone()),
            width: Some(DEFAULT_COLUMN_WIDTH),
            field,
        }
    }

    /// Rename this column, keeping other metadata. The header is reset to
    /// the new field name.
    pub fn rename<S: Into<String>>(&mut self, field: S) {
        self.field = field.into();
        self.header_name = Some(self.field.clone());
    }
}
