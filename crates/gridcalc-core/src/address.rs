//! Positional cell addresses and column-letter conversion
//!
//! A positional address names a cell by its column's letter-style name and its
//! row's current 1-based position in the grid (`B3` = second column, third row).
//! Addresses are transient: they are only meaningful against the current row
//! order and are recomputed whenever the grid's structure changes.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A positional cell address: 0-based column index, 1-based row position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Column index (0-based: A = 0, B = 1, ...)
    pub col: u64,
    /// Row position (1-based)
    pub row: u64,
}

impl CellAddress {
    /// Create a new address from a column index and a 1-based row position
    pub fn new(col: u64, row: u64) -> Self {
        Self { col, row }
    }

    /// Parse an address like "B3" (canonical uppercase letters, row >= 1)
    pub fn parse(s: &str) -> Result<Self> {
        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(|| {
            Error::InvalidAddress(format!("missing row number in '{}'", s))
        })?;

        let (letters, digits) = s.split_at(split);
        let col = Self::letters_to_column(letters)?;
        let row: u64 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row positions are 1-based: '{}'",
                s
            )));
        }

        Ok(Self { col, row })
    }

    /// Convert a column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u64) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Only canonical uppercase ASCII letters are accepted; anything else,
    /// including lowercase, is an error, so non-address row fields never
    /// resolve to a column index.
    pub fn letters_to_column(letters: &str) -> Result<u64> {
        if letters.is_empty() {
            return Err(Error::InvalidColumnName("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidColumnName(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(c as u64 - 'A' as u64 + 1))
                .ok_or_else(|| Error::InvalidColumnName(letters.into()))?;
        }

        Ok(col - 1) // Convert to 0-based
    }

    /// The column's letter-style name
    pub fn column_letters(&self) -> String {
        Self::column_to_letters(self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
