//! Thresholded font sheet raster.

use std::path::Path;

use image::DynamicImage;

use crate::{FontifyError, Glyph, Result, GLYPH_SIZE};

/// Luma values above this count as ink.
pub const DEFAULT_THRESHOLD: u8 = 0x7F;

/// Scan strides in the order they are tried against the sheet width.
pub const STRIDES: [u32; 3] = [8, 9, 10];

/// A decoded sheet reduced to set/unset pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl Sheet {
    /// Builds a sheet from 8 bit luma data, one byte per pixel, row-major.
    pub fn from_luma(name: impl Into<String>, width: u32, height: u32, data: &[u8], threshold: u8) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FontifyError::SheetSizeMismatch { expected, actual: data.len() });
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            ink: data.iter().map(|&luma| luma > threshold).collect(),
        })
    }

    pub fn from_image(name: impl Into<String>, image: &DynamicImage, threshold: u8) -> Result<Self> {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        Self::from_luma(name, width, height, luma.as_raw(), threshold)
    }

    /// Decodes a sheet file with the `image` crate.
    pub fn load(path: &Path, threshold: u8) -> Result<Self> {
        let image = image::open(path).map_err(|e| FontifyError::open_sheet(path, e))?;
        let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
        Self::from_image(name, &image, threshold)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels outside the sheet read as unset.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.ink[y as usize * self.width as usize + x as usize]
    }

    /// Reads the raw 8x8 block with its top left corner at (x, y).
    pub fn read_block(&self, x: u32, y: u32) -> Glyph {
        let mut block = Glyph::BLANK;
        for dy in 0..GLYPH_SIZE {
            for dx in 0..GLYPH_SIZE {
                if self.is_set(x + dx as u32, y + dy as u32) {
                    block.set_pixel(dx, dy, true);
                }
            }
        }
        block
    }

    /// The first of 8, 9 and 10 that divides the width.
    pub fn detect_stride(&self) -> Result<u32> {
        STRIDES
            .into_iter()
            .find(|stride| self.width % stride == 0)
            .ok_or_else(|| FontifyError::UnsupportedSheetWidth {
                sheet: self.name.clone(),
                width: self.width,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_sheet(width: u32, height: u32) -> Sheet {
        Sheet::from_luma("blank.png", width, height, &vec![0; (width * height) as usize], DEFAULT_THRESHOLD).unwrap()
    }

    #[test]
    fn test_threshold() {
        let sheet = Sheet::from_luma("t", 4, 1, &[0x00, 0x7F, 0x80, 0xFF], DEFAULT_THRESHOLD).unwrap();
        assert!(!sheet.is_set(0, 0));
        assert!(!sheet.is_set(1, 0));
        assert!(sheet.is_set(2, 0));
        assert!(sheet.is_set(3, 0));
        assert!(!sheet.is_set(4, 0));
    }

    #[test]
    fn test_size_mismatch() {
        let err = Sheet::from_luma("t", 4, 4, &[0; 15], DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, FontifyError::SheetSizeMismatch { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_detect_stride() {
        assert_eq!(blank_sheet(16, 8).detect_stride().unwrap(), 8);
        assert_eq!(blank_sheet(18, 8).detect_stride().unwrap(), 9);
        assert_eq!(blank_sheet(20, 8).detect_stride().unwrap(), 10);
        // 8 is tried first even when 10 also divides the width
        assert_eq!(blank_sheet(80, 8).detect_stride().unwrap(), 8);
        assert_eq!(blank_sheet(90, 8).detect_stride().unwrap(), 9);

        let err = blank_sheet(17, 8).detect_stride().unwrap_err();
        assert!(matches!(err, FontifyError::UnsupportedSheetWidth { width: 17, .. }));
    }

    #[test]
    fn test_read_block_overhang() {
        let mut data = vec![0xFF; 8 * 4];
        data[0] = 0;
        let sheet = Sheet::from_luma("t", 8, 4, &data, DEFAULT_THRESHOLD).unwrap();
        let block = sheet.read_block(0, 0);
        assert_eq!(block.rows(), [0x7F, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    }
}
