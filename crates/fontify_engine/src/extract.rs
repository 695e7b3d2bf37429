//! Glyph extraction and edge alignment.
//!
//! Sheets are scanned on a fixed stride. Cells may be separated by a one or two
//! pixel gutter, so an 8x8 block read at a stride origin can contain a trailing
//! gutter column/row or overlap the neighbouring glyph. Each axis is resolved
//! independently:
//!
//! * ink in the first and the last column: the block straddles two glyphs and is skipped,
//! * ink only in the last column: the block is shifted one pixel left,
//!
//! and the same for rows, shifting up. The aligned glyph must then lie inside
//! the interior mask ([`INTERIOR_MASK`] unless configured otherwise), anything
//! else means the sheet does not have the expected layout.
//!
//! With the default mask a column shift never yields a glyph: the shift only
//! happens when column 7 has ink, that ink lands in column 6 and column 6 is
//! outside [`INTERIOR_MASK`], so the sheet is rejected. Use [`ALIGNED_MASK`]
//! for sheets that need column alignment.

use crate::{FontifyError, Glyph, Result, Sheet, DEFAULT_THRESHOLD, STRIDES};

/// Pixels a canonical glyph may use: a 5x7 cell (columns 0-4, rows 0-6) plus row 3, column 5.
pub const INTERIOR_MASK: Glyph = Glyph::from_bits(0xF8F8_F8FC_F8F8_F800);

/// Everything an aligned block can contain: columns 0-6, rows 0-6.
pub const ALIGNED_MASK: Glyph = Glyph::from_bits(0xFEFE_FEFE_FEFE_FE00);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical {
    Glyph(Glyph),
    /// Block overlaps two glyphs on at least one axis.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Forces the scan stride. `None` picks the first of 8, 9, 10 dividing the width.
    pub stride: Option<u32>,
    pub threshold: u8,
    /// Ink outside this mask aborts the run.
    pub interior: Glyph,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            stride: None,
            threshold: DEFAULT_THRESHOLD,
            interior: INTERIOR_MASK,
        }
    }
}

impl ExtractOptions {
    pub fn stride_for(&self, sheet: &Sheet) -> Result<u32> {
        let Some(stride) = self.stride else {
            return sheet.detect_stride();
        };
        if !STRIDES.contains(&stride) {
            return Err(FontifyError::InvalidStride { stride });
        }
        if sheet.width() % stride != 0 {
            return Err(FontifyError::StrideMismatch {
                sheet: sheet.name().to_string(),
                stride,
                width: sheet.width(),
            });
        }
        Ok(stride)
    }
}

/// Aligns a raw block, the column check runs first.
pub fn canonicalize(block: Glyph) -> Canonical {
    let mut glyph = block;

    match (glyph.has_ink_in_first_column(), glyph.has_ink_in_last_column()) {
        (true, true) => return Canonical::Skip,
        (false, true) => glyph = glyph.shift_left(),
        _ => {}
    }

    match (glyph.has_ink_in_first_row(), glyph.has_ink_in_last_row()) {
        (true, true) => return Canonical::Skip,
        (false, true) => glyph = glyph.shift_up(),
        _ => {}
    }

    Canonical::Glyph(glyph)
}

pub fn is_inside(glyph: Glyph, mask: Glyph) -> bool {
    glyph.bits() & !mask.bits() == 0
}

/// Result of scanning one sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetGlyphs {
    pub stride: u32,
    /// Canonical glyphs in scan order, duplicates included.
    pub glyphs: Vec<Glyph>,
    /// Blocks dropped because they straddle two glyphs.
    pub skipped: usize,
}

/// Scans the sheet row by row on the stride chosen by `options`.
pub fn extract_glyphs(sheet: &Sheet, options: &ExtractOptions) -> Result<SheetGlyphs> {
    let stride = options.stride_for(sheet)?;
    let mut result = Vec::new();
    let mut skipped = 0;

    for y in (0..sheet.height()).step_by(stride as usize) {
        for x in (0..sheet.width()).step_by(stride as usize) {
            let glyph = match canonicalize(sheet.read_block(x, y)) {
                Canonical::Glyph(glyph) => glyph,
                Canonical::Skip => {
                    skipped += 1;
                    continue;
                }
            };
            if !is_inside(glyph, options.interior) {
                log::debug!("Glyph at {x},{y} in {} lies outside the glyph area:\n{glyph}", sheet.name());
                return Err(FontifyError::InkOutsideInterior {
                    sheet: sheet.name().to_string(),
                    x,
                    y,
                    width: sheet.width(),
                });
            }
            result.push(glyph);
        }
    }

    log::trace!("{}: stride {stride}, {} blocks, {skipped} skipped", sheet.name(), result.len() + skipped);
    Ok(SheetGlyphs {
        stride,
        glyphs: result,
        skipped,
    })
}
