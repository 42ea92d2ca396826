//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellAddress,
    CellContent,
    CellError,
    Column,
    ColumnInsertPosition,

    // Error types
    Error,

    // Main types
    Grid,

    // Extension traits
    GridDocumentExt,
    GridEditExt,
    GridResolveExt,

    // I/O types
    JsonReader,
    JsonWriter,

    // Calculation types
    RecalcStats,
    ResolvedGrid,
    ResolvedRow,
    ResolvedValue,
    Result,
    Row,
    RowInsertPosition,
};
