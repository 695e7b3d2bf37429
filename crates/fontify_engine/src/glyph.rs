//! Packed 8x8 monochrome glyph.
//!
//! The bitmap is stored in a single `u64`: row 0 occupies the most significant
//! byte and every row is MSB-first, so bit 7 of a row byte is the leftmost pixel.
//! Two glyphs are identical exactly when their packed values are equal.

use std::fmt::Display;

use crate::ShadeVector;

pub const GLYPH_SIZE: usize = 8;

const COLUMN_0: u64 = 0x8080_8080_8080_8080;
const COLUMN_7: u64 = 0x0101_0101_0101_0101;
const ROW_0: u64 = 0xFF00_0000_0000_0000;
const ROW_7: u64 = 0x0000_0000_0000_00FF;

/// Quadrant masks in ShadeVector order: top-left, top-right, bottom-left, bottom-right.
const QUADRANTS: [u64; 4] = [0xF0F0_F0F0_0000_0000, 0x0F0F_0F0F_0000_0000, 0x0000_0000_F0F0_F0F0, 0x0000_0000_0F0F_0F0F];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Glyph(u64);

impl Glyph {
    pub const BLANK: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Create a glyph from 8 row bytes (MSB = leftmost pixel).
    pub fn from_rows(rows: [u8; GLYPH_SIZE]) -> Self {
        Self(u64::from_be_bytes(rows))
    }

    pub fn rows(self) -> [u8; GLYPH_SIZE] {
        self.0.to_be_bytes()
    }

    #[inline]
    fn mask(x: usize, y: usize) -> u64 {
        1 << (63 - (y * GLYPH_SIZE + x))
    }

    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn get_pixel(self, x: usize, y: usize) -> bool {
        if x >= GLYPH_SIZE || y >= GLYPH_SIZE {
            return false;
        }
        self.0 & Self::mask(x, y) != 0
    }

    /// Does nothing if coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        if x >= GLYPH_SIZE || y >= GLYPH_SIZE {
            return;
        }
        if value {
            self.0 |= Self::mask(x, y);
        } else {
            self.0 &= !Self::mask(x, y);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn ink_count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn has_ink_in_first_column(self) -> bool {
        self.0 & COLUMN_0 != 0
    }

    pub fn has_ink_in_last_column(self) -> bool {
        self.0 & COLUMN_7 != 0
    }

    pub fn has_ink_in_first_row(self) -> bool {
        self.0 & ROW_0 != 0
    }

    pub fn has_ink_in_last_row(self) -> bool {
        self.0 & ROW_7 != 0
    }

    /// Moves every pixel one column to the left, the last column becomes blank.
    /// Ink in the first column is dropped.
    pub fn shift_left(self) -> Self {
        Self((self.0 & !COLUMN_0) << 1)
    }

    /// Moves every row one up, the last row becomes blank.
    pub fn shift_up(self) -> Self {
        Self(self.0 << GLYPH_SIZE)
    }

    /// Per quadrant count of set pixels, each component is in `0..=16`.
    pub fn shade(self) -> ShadeVector {
        ShadeVector::from_counts(QUADRANTS.map(|q| (self.0 & q).count_ones() as u8))
    }

    /// Expands the glyph to one intensity byte per pixel (0x00 unset, 0xFF set).
    pub fn to_luma(self) -> [[u8; GLYPH_SIZE]; GLYPH_SIZE] {
        let mut result = [[0; GLYPH_SIZE]; GLYPH_SIZE];
        for (y, row) in result.iter_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                if self.get_pixel(x, y) {
                    *px = 0xFF;
                }
            }
        }
        result
    }
}

impl Display for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..GLYPH_SIZE {
            let line: String = (0..GLYPH_SIZE).map(|x| if self.get_pixel(x, y) { '#' } else { '-' }).collect();
            if y + 1 < GLYPH_SIZE {
                writeln!(f, "{line}")?;
            } else {
                write!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
