//! Address-token scanning over formula text
//!
//! Formula bodies reference cells with positional addresses embedded directly
//! in the text (`=A1+B2`). The scanner finds those tokens by walking the raw
//! text for maximal runs of uppercase ASCII letters followed immediately by a
//! run of ASCII digits. Byte offsets are kept on each token so callers can
//! splice replacements back into the surrounding text, which is how both the
//! evaluator (substituting values) and the structural-edit rewrites
//! (renumbering references) consume it.

use gridcalc_core::CellAddress;

/// An address token found in formula text, with the byte span it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressToken {
    /// Offset of the first letter
    pub start: usize,
    /// Offset just past the last digit
    pub end: usize,
    /// Offset where the letters end and the digits begin
    pub digits_start: usize,
    /// Column index the letters name (0-based)
    pub col: u64,
    /// Row position the digits name (1-based in canonical addresses, but the
    /// source text may carry 0 or leading zeros)
    pub row: u64,
}

impl AddressToken {
    /// The positional address this token names
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.col, self.row)
    }

    /// The letter part of the token as it appears in the source text
    pub fn letters<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.digits_start]
    }

    /// The digit part of the token as it appears in the source text
    pub fn digits<'t>(&self, text: &'t str) -> &'t str {
        &text[self.digits_start..self.end]
    }
}

/// Iterator over the address tokens of a piece of formula text, left to
/// right, non-overlapping.
///
/// A run of letters with no digits after it is not a token, and neither is a
/// letter run so long that its column index overflows; both are skipped
/// whole. Note that any letter run directly followed by digits scans as an
/// address, so `NOTES12` is column `NOTES`, row 12.
pub struct AddressScanner<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> AddressScanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for AddressScanner<'_> {
    type Item = AddressToken;

    fn next(&mut self) -> Option<AddressToken> {
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            if !bytes[self.pos].is_ascii_uppercase() {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            let mut digits_start = start;
            while digits_start < bytes.len() && bytes[digits_start].is_ascii_uppercase() {
                digits_start += 1;
            }

            let mut end = digits_start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }

            // Resume past the whole run either way; a rejected run is never
            // re-scanned from its interior.
            self.pos = end;

            if end == digits_start {
                continue;
            }

            let letters = &self.text[start..digits_start];
            let Ok(col) = CellAddress::letters_to_column(letters) else {
                continue;
            };
            let Ok(row) = self.text[digits_start..end].parse::<u64>() else {
                continue;
            };

            return Some(AddressToken {
                start,
                end,
                digits_start,
                col,
                row,
            });
        }

        None
    }
}
