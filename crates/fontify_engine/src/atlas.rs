//! Packs the distinct glyphs into one square-ish grayscale raster.

use std::path::Path;

use image::GrayImage;

use crate::{FontifyError, Glyph, Result, GLYPH_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    columns: u32,
    rows: u32,
    /// One byte per pixel, 0x00 unset and 0xFF set.
    pixels: Vec<u8>,
}

impl Atlas {
    /// Lays the glyphs out row-major in index order. Unused trailing cells stay blank.
    pub fn compose(glyphs: &[Glyph]) -> Self {
        let count = glyphs.len() as u32;
        let columns = ceil_sqrt(count);
        let rows = if columns == 0 { 0 } else { count.div_ceil(columns) };

        let width = (columns as usize) * GLYPH_SIZE;
        let height = (rows as usize) * GLYPH_SIZE;
        let mut pixels = vec![0u8; width * height];

        for (i, glyph) in glyphs.iter().enumerate() {
            let base_x = (i % columns as usize) * GLYPH_SIZE;
            let base_y = (i / columns as usize) * GLYPH_SIZE;
            for (y, row) in glyph.to_luma().iter().enumerate() {
                let start = (base_y + y) * width + base_x;
                pixels[start..start + GLYPH_SIZE].copy_from_slice(row);
            }
        }

        Self { columns, rows, pixels }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn width(&self) -> u32 {
        self.columns * GLYPH_SIZE as u32
    }

    pub fn height(&self) -> u32 {
        self.rows * GLYPH_SIZE as u32
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Top left pixel of the cell holding glyph `index`.
    pub fn cell_origin(&self, index: usize) -> Option<(u32, u32)> {
        if index >= (self.columns * self.rows) as usize {
            return None;
        }
        let index = index as u32;
        Some(((index % self.columns) * GLYPH_SIZE as u32, (index / self.columns) * GLYPH_SIZE as u32))
    }

    pub fn to_image(&self) -> Result<GrayImage> {
        GrayImage::from_raw(self.width(), self.height(), self.pixels.clone()).ok_or(FontifyError::ImageBufferCreationFailed)
    }

    /// Writes the atlas, the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_image()?.save(path)?;
        Ok(())
    }
}

fn ceil_sqrt(n: u32) -> u32 {
    let n = n as u64;
    let mut root = (n as f64).sqrt() as u64;
    while root * root < n {
        root += 1;
    }
    while root > 0 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ceil_sqrt() {
        let expected = [0, 1, 2, 2, 2, 3, 3, 3, 3, 3, 4];
        for (n, &root) in expected.iter().enumerate() {
            assert_eq!(ceil_sqrt(n as u32), root, "n = {n}");
        }
        assert_eq!(ceil_sqrt(1_000_000), 1000);
        assert_eq!(ceil_sqrt(1_000_001), 1001);
    }

    #[test]
    fn test_grid_size() {
        let glyphs = vec![Glyph::BLANK; 5];
        let atlas = Atlas::compose(&glyphs);
        assert_eq!((atlas.columns(), atlas.rows()), (3, 2));
        assert_eq!((atlas.width(), atlas.height()), (24, 16));
        assert_eq!(atlas.pixels().len(), 24 * 16);
        assert_eq!(atlas.cell_origin(4), Some((8, 8)));
        assert_eq!(atlas.cell_origin(5), Some((16, 8)));
        assert_eq!(atlas.cell_origin(6), None);

        let atlas = Atlas::compose(&[]);
        assert_eq!((atlas.width(), atlas.height()), (0, 0));
    }

    #[test]
    fn test_placement() {
        let mut dot = Glyph::BLANK;
        dot.set_pixel(1, 2, true);
        let glyphs = [Glyph::BLANK, Glyph::BLANK, dot];
        let atlas = Atlas::compose(&glyphs);
        assert_eq!((atlas.columns(), atlas.rows()), (2, 2));

        let width = atlas.width() as usize;
        let set: Vec<(usize, usize)> = atlas
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == 0xFF)
            .map(|(i, _)| (i % width, i / width))
            .collect();
        assert_eq!(set, vec![(1, 10)]);
        assert!(atlas.pixels().iter().all(|&p| p == 0 || p == 0xFF));
    }

    #[test]
    fn test_to_image() {
        let glyphs = [Glyph::from_bits(0x8000_0000_0000_0000)];
        let image = Atlas::compose(&glyphs).to_image().unwrap();
        assert_eq!(image.dimensions(), (8, 8));
        assert_eq!(image.get_pixel(0, 0).0, [0xFF]);
        assert_eq!(image.get_pixel(1, 0).0, [0x00]);
    }
}
