//! # gridcalc-json
//!
//! JSON document reader and writer for gridcalc.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{JsonError, JsonResult};
pub use reader::JsonReader;
pub use writer::JsonWriter;
