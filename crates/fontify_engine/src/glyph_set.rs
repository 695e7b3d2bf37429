use std::collections::HashMap;

use crate::Glyph;

/// Distinct glyphs in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GlyphSet {
    glyphs: Vec<Glyph>,
    seen: HashMap<Glyph, usize>,
}

impl GlyphSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the glyph and returns its new index, or `None` if an identical glyph was already recorded.
    pub fn insert(&mut self, glyph: Glyph) -> Option<usize> {
        if self.seen.contains_key(&glyph) {
            return None;
        }
        let index = self.glyphs.len();
        self.seen.insert(glyph, index);
        self.glyphs.push(glyph);
        Some(index)
    }

    pub fn index_of(&self, glyph: Glyph) -> Option<usize> {
        self.seen.get(&glyph).copied()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Drops the lookup, keeping only the ordered list.
    pub fn into_glyphs(self) -> Vec<Glyph> {
        self.glyphs
    }
}
