//! Exhaustive nearest bucket lookup over the whole shade space.
//!
//! Every one of the 17^4 shade vectors is resolved to the occupied bucket with the
//! smallest squared euclidean distance. Buckets are scanned in creation order and
//! only a strictly smaller distance replaces the current best, so ties go to the
//! bucket created first.
//!
//! # Index file
//!
//! All values are little endian.
//!
//! | offset | size          | content                                   |
//! |--------|---------------|-------------------------------------------|
//! | 0      | 4             | magic `FNIX`                              |
//! | 4      | 2             | version (1)                               |
//! | 6      | 2             | levels per component (17)                 |
//! | 8      | 4             | glyph count                               |
//! | 12     | 4             | bucket count                              |
//! | 16     | 83521 × 4     | glyph index per shade vector, in key order |

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{FontifyError, GlyphBucket, Result, ShadePartition, ShadeVector, SHADE_LEVELS, SHADE_SPACE};

pub const INDEX_MAGIC: &[u8; 4] = b"FNIX";
pub const INDEX_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearestIndex {
    partition: ShadePartition,
    /// Bucket index per packed shade key.
    entries: Vec<u32>,
}

impl NearestIndex {
    pub fn build(partition: ShadePartition) -> Result<Self> {
        if partition.is_empty() {
            return Err(FontifyError::EmptyGlyphSet);
        }

        let mut entries = Vec::with_capacity(SHADE_SPACE);
        for target in ShadeVector::all() {
            entries.push(nearest_bucket(partition.buckets(), target) as u32);
        }

        Ok(Self { partition, entries })
    }

    pub fn partition(&self) -> &ShadePartition {
        &self.partition
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries cover the whole shade space, so every valid vector has one.
    pub fn bucket_index(&self, shade: ShadeVector) -> usize {
        self.entries[shade.key()] as usize
    }

    pub fn bucket_for(&self, shade: ShadeVector) -> &GlyphBucket {
        &self.partition.buckets()[self.bucket_index(shade)]
    }

    /// Representative glyph index of the nearest bucket.
    pub fn glyph_for(&self, shade: ShadeVector) -> usize {
        self.bucket_for(shade).representative()
    }

    /// Like [`NearestIndex::glyph_for`] for a raw packed key, `None` outside the shade space.
    pub fn glyph_for_key(&self, key: usize) -> Option<usize> {
        ShadeVector::from_key(key).map(|shade| self.glyph_for(shade))
    }

    /// Flattens the index to glyph indices, the form that gets persisted.
    pub fn to_lookup(&self) -> GlyphLookup {
        let representatives: Vec<u32> = self.partition.buckets().iter().map(|b| b.representative() as u32).collect();
        GlyphLookup {
            glyph_count: self.partition.glyph_count() as u32,
            bucket_count: self.partition.len() as u32,
            glyphs: self.entries.iter().map(|&bucket| representatives[bucket as usize]).collect(),
        }
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        self.to_lookup().write_to(writer)
    }
}

/// Linear scan, earliest bucket wins ties.
fn nearest_bucket(buckets: &[GlyphBucket], target: ShadeVector) -> usize {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, bucket) in buckets.iter().enumerate() {
        let distance = target.distance_sq(bucket.shade());
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// Persisted form of a [`NearestIndex`]: one glyph index per shade vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphLookup {
    glyph_count: u32,
    bucket_count: u32,
    glyphs: Vec<u32>,
}

impl GlyphLookup {
    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    pub fn glyph_for(&self, shade: ShadeVector) -> usize {
        self.glyphs[shade.key()] as usize
    }

    pub fn glyph_for_key(&self, key: usize) -> Option<usize> {
        self.glyphs.get(key).map(|&glyph| glyph as usize)
    }

    pub fn glyphs(&self) -> &[u32] {
        &self.glyphs
    }

    pub fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        writer.write_all(INDEX_MAGIC)?;
        writer.write_u16::<LittleEndian>(INDEX_VERSION)?;
        writer.write_u16::<LittleEndian>(SHADE_LEVELS as u16)?;
        writer.write_u32::<LittleEndian>(self.glyph_count)?;
        writer.write_u32::<LittleEndian>(self.bucket_count)?;
        for &glyph in &self.glyphs {
            writer.write_u32::<LittleEndian>(glyph)?;
        }
        Ok(())
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != INDEX_MAGIC {
            return Err(FontifyError::invalid_index("magic number mismatch"));
        }
        let version = reader.read_u16::<LittleEndian>()?;
        if version != INDEX_VERSION {
            return Err(FontifyError::invalid_index(format!("unsupported version {version}")));
        }
        let levels = reader.read_u16::<LittleEndian>()?;
        if levels as usize != SHADE_LEVELS {
            return Err(FontifyError::invalid_index(format!("expected {SHADE_LEVELS} shade levels, got {levels}")));
        }
        let glyph_count = reader.read_u32::<LittleEndian>()?;
        let bucket_count = reader.read_u32::<LittleEndian>()?;

        let mut glyphs = Vec::with_capacity(SHADE_SPACE);
        for key in 0..SHADE_SPACE {
            let glyph = reader.read_u32::<LittleEndian>()?;
            if glyph >= glyph_count {
                return Err(FontifyError::invalid_index(format!("entry {key} references glyph {glyph} of {glyph_count}")));
            }
            glyphs.push(glyph);
        }

        Ok(Self {
            glyph_count,
            bucket_count,
            glyphs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Glyph;

    /// Builds a glyph with the given number of set pixels in each quadrant.
    fn glyph_with_shade(shade: [u8; 4]) -> Glyph {
        let mut glyph = Glyph::BLANK;
        for (q, &count) in shade.iter().enumerate() {
            let (ox, oy) = ((q % 2) * 4, (q / 2) * 4);
            for i in 0..count as usize {
                glyph.set_pixel(ox + i % 4, oy + i / 4, true);
            }
        }
        glyph
    }

    fn shade(components: [u8; 4]) -> ShadeVector {
        ShadeVector::new(components).unwrap()
    }

    fn index_for(shades: &[[u8; 4]]) -> NearestIndex {
        let glyphs: Vec<Glyph> = shades.iter().map(|&s| glyph_with_shade(s)).collect();
        NearestIndex::build(ShadePartition::new(&glyphs)).unwrap()
    }

    #[test]
    fn test_empty_partition() {
        let err = NearestIndex::build(ShadePartition::new(&[])).unwrap_err();
        assert!(matches!(err, FontifyError::EmptyGlyphSet));
    }

    #[test]
    fn test_complete() {
        let index = index_for(&[[3, 0, 7, 1]]);
        assert_eq!(index.len(), SHADE_SPACE);
        assert!(ShadeVector::all().all(|s| index.glyph_for(s) == 0));
    }

    #[test]
    fn test_nearest() {
        let index = index_for(&[[0, 0, 0, 0], [16, 16, 16, 16], [8, 0, 0, 0], [0, 8, 0, 0], [4, 4, 4, 4]]);

        assert_eq!(index.bucket_for(shade([1, 1, 1, 1])).shade(), shade([0, 0, 0, 0]));
        assert_eq!(index.bucket_for(shade([15, 16, 16, 14])).shade(), shade([16, 16, 16, 16]));
        assert_eq!(index.bucket_for(shade([7, 1, 0, 0])).shade(), shade([8, 0, 0, 0]));
        assert_eq!(index.bucket_for(shade([4, 4, 4, 3])).shade(), shade([4, 4, 4, 4]));
        assert_eq!(index.glyph_for(shade([0, 9, 0, 0])), 3);
    }

    #[test]
    fn test_brute_force_agrees() {
        let shades = [[0, 0, 0, 0], [16, 16, 16, 16], [8, 0, 0, 0], [0, 8, 0, 0], [4, 4, 4, 4], [12, 2, 9, 5]];
        let index = index_for(&shades);
        for target in ShadeVector::all().step_by(97) {
            let best = shades.iter().map(|&s| target.distance_sq(shade(s))).min().unwrap();
            assert_eq!(target.distance_sq(index.bucket_for(target).shade()), best);
        }
    }

    #[test]
    fn test_tie_goes_to_first_bucket() {
        // (4,0,0,0) is 16 away from both
        let index = index_for(&[[8, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(index.glyph_for(shade([4, 0, 0, 0])), 0);

        let index = index_for(&[[0, 0, 0, 0], [8, 0, 0, 0]]);
        assert_eq!(index.glyph_for(shade([4, 0, 0, 0])), 0);
    }

    #[test]
    fn test_lookup_uses_representative() {
        let a = glyph_with_shade([2, 0, 0, 0]);
        let mut b = Glyph::BLANK;
        b.set_pixel(3, 3, true);
        b.set_pixel(2, 3, true);
        let glyphs = [Glyph::BLANK, a, b];
        let index = NearestIndex::build(ShadePartition::new(&glyphs)).unwrap();

        assert_eq!(index.bucket_for(shade([2, 0, 0, 0])).glyphs(), &[1, 2]);
        let lookup = index.to_lookup();
        assert_eq!(lookup.glyph_count(), 3);
        assert_eq!(lookup.bucket_count(), 2);
        assert_eq!(lookup.glyph_for(shade([2, 0, 0, 0])), 1);
        assert_eq!(lookup.glyph_for(shade([0, 0, 0, 1])), 0);
    }

    #[test]
    fn test_raw_key_lookup() {
        let index = index_for(&[[0, 0, 0, 0], [16, 16, 16, 16]]);
        let lookup = index.to_lookup();
        let full = shade([16, 16, 16, 16]).key();

        assert_eq!(index.glyph_for_key(0), Some(0));
        assert_eq!(index.glyph_for_key(full), Some(1));
        assert_eq!(index.glyph_for_key(SHADE_SPACE), None);
        assert_eq!(index.glyph_for_key(usize::MAX), None);

        assert_eq!(lookup.glyph_for_key(full), Some(1));
        assert_eq!(lookup.glyph_for_key(SHADE_SPACE), None);
    }

    #[test]
    fn test_index_file() {
        let index = index_for(&[[0, 0, 0, 0], [16, 5, 12, 3]]);
        let mut data = Vec::new();
        index.write_to(&mut data).unwrap();
        assert_eq!(data.len(), 16 + 4 * SHADE_SPACE);
        assert_eq!(&data[0..4], b"FNIX");
        assert_eq!(&data[4..8], &[1, 0, 17, 0]);
        assert_eq!(&data[8..16], &[2, 0, 0, 0, 2, 0, 0, 0]);
        let last = data.len() - 4;
        assert_eq!(&data[last..], &[1, 0, 0, 0]);

        let read = GlyphLookup::read_from(&mut data.as_slice()).unwrap();
        assert_eq!(read, index.to_lookup());
    }

    #[test]
    fn test_index_file_errors() {
        let index = index_for(&[[0, 0, 0, 0]]);
        let mut data = Vec::new();
        index.write_to(&mut data).unwrap();

        let mut bad_magic = data.clone();
        bad_magic[0] = b'X';
        assert!(matches!(GlyphLookup::read_from(&mut bad_magic.as_slice()), Err(FontifyError::InvalidIndexFile { .. })));

        let mut bad_entry = data.clone();
        bad_entry[16] = 7;
        assert!(matches!(GlyphLookup::read_from(&mut bad_entry.as_slice()), Err(FontifyError::InvalidIndexFile { .. })));

        let truncated = &data[..data.len() - 1];
        assert!(matches!(GlyphLookup::read_from(&mut &truncated[..]), Err(FontifyError::Io(_))));
    }
}
