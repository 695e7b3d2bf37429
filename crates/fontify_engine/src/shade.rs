//! Quadrant brightness signatures and the partition of glyphs by them.

use std::collections::HashMap;

use crate::Glyph;

/// Number of values a single component can take (0..=16).
pub const SHADE_LEVELS: usize = 17;

/// Number of distinct shade vectors: 17^4.
pub const SHADE_SPACE: usize = SHADE_LEVELS * SHADE_LEVELS * SHADE_LEVELS * SHADE_LEVELS;

/// Set pixel counts of the top-left, top-right, bottom-left and bottom-right 4x4 quadrant.
///
/// Every component is in `0..=16`, which keeps [`ShadeVector::key`] unique and below [`SHADE_SPACE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShadeVector([u8; 4]);

impl ShadeVector {
    pub const MAX_COMPONENT: u8 = 16;

    /// Returns `None` if a component exceeds [`ShadeVector::MAX_COMPONENT`].
    pub const fn new(components: [u8; 4]) -> Option<Self> {
        let mut i = 0;
        while i < components.len() {
            if components[i] > Self::MAX_COMPONENT {
                return None;
            }
            i += 1;
        }
        Some(Self(components))
    }

    /// Caller guarantees every component is at most 16, e.g. popcounts of 16 bit masks.
    pub(crate) const fn from_counts(components: [u8; 4]) -> Self {
        debug_assert!(components[0] <= 16 && components[1] <= 16 && components[2] <= 16 && components[3] <= 16);
        Self(components)
    }

    pub fn components(self) -> [u8; 4] {
        self.0
    }

    /// Packs the vector into `s0·17³ + s1·17² + s2·17 + s3`.
    pub fn key(self) -> usize {
        self.0.iter().fold(0, |key, &c| key * SHADE_LEVELS + c as usize)
    }

    /// Inverse of [`ShadeVector::key`]. Returns `None` for keys outside the shade space.
    pub fn from_key(key: usize) -> Option<Self> {
        if key >= SHADE_SPACE {
            return None;
        }
        let mut rest = key;
        let mut components = [0u8; 4];
        for c in components.iter_mut().rev() {
            *c = (rest % SHADE_LEVELS) as u8;
            rest /= SHADE_LEVELS;
        }
        Some(Self(components))
    }

    pub fn distance_sq(self, other: ShadeVector) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum()
    }

    /// Iterates all shade vectors in packed key order.
    pub fn all() -> impl Iterator<Item = ShadeVector> {
        (0..SHADE_SPACE).filter_map(Self::from_key)
    }
}

/// Glyphs sharing one exact shade vector, in glyph index order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBucket {
    shade: ShadeVector,
    representative: usize,
    glyphs: Vec<usize>,
}

impl GlyphBucket {
    fn new(shade: ShadeVector, first: usize) -> Self {
        Self {
            shade,
            representative: first,
            glyphs: vec![first],
        }
    }

    pub fn shade(&self) -> ShadeVector {
        self.shade
    }

    pub fn glyphs(&self) -> &[usize] {
        &self.glyphs
    }

    /// The glyph a lookup resolves to: the first member.
    pub fn representative(&self) -> usize {
        self.representative
    }
}

/// Buckets in the order their shade vector was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadePartition {
    buckets: Vec<GlyphBucket>,
    glyph_count: usize,
}

impl ShadePartition {
    pub fn new(glyphs: &[Glyph]) -> Self {
        let mut buckets: Vec<GlyphBucket> = Vec::new();
        let mut lookup: HashMap<ShadeVector, usize> = HashMap::new();

        for (index, glyph) in glyphs.iter().enumerate() {
            let shade = glyph.shade();
            match lookup.get(&shade) {
                Some(&bucket) => buckets[bucket].glyphs.push(index),
                None => {
                    lookup.insert(shade, buckets.len());
                    buckets.push(GlyphBucket::new(shade, index));
                }
            }
        }

        Self {
            buckets,
            glyph_count: glyphs.len(),
        }
    }

    pub fn buckets(&self) -> &[GlyphBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }
}
