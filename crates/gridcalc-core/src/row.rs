//! Row types

use crate::value::CellContent;
use crate::DEFAULT_ROW_HEIGHT;
use ahash::AHashMap;

/// A grid row: a stable opaque identifier, a display height, and the cell
/// contents keyed by column field name.
///
/// The identifier never changes with position; positional addresses are
/// derived from the row's current index in the grid. Loaded rows may carry
/// stray fields that are not in the column list; they evaluate normally but
/// are dropped by column-structure edits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Stable row identifier
    pub id: u64,
    /// Display height. Deserialized documents may carry 0 here (absent or
    /// null in the source); loading sanitizes it to the default.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "_height", default, deserialize_with = "de_height")
    )]
    pub height: f64,
    /// Cell contents by column field name
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub cells: AHashMap<String, CellContent>,
}

impl Row {
    /// Create an empty row with the default height
    pub fn new(id: u64) -> Self {
        Self {
            id,
            height: DEFAULT_ROW_HEIGHT,
            cells: AHashMap::new(),
        }
    }

    /// Get a cell's content by field name
    pub fn cell(&self, field: &str) -> Option<&CellContent> {
        self.cells.get(field)
    }

    /// Set a cell's content by field name
    pub fn set_cell<S: Into<String>>(&mut self, field: S, content: CellContent) {
        self.cells.insert(field.into(), content);
    }
}

#[cfg(feature = "serde")]
fn de_height<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
