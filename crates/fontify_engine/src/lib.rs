#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]
//! Extracts the distinct 8x8 glyphs of bitmap font sheets and maps every
//! quadrant shade signature to the nearest available glyph.

mod error;
pub use error::*;

mod glyph;
pub use glyph::*;

mod sheet;
pub use sheet::*;

pub mod extract;
pub use extract::{canonicalize, extract_glyphs, Canonical, ExtractOptions, SheetGlyphs, INTERIOR_MASK};

mod glyph_set;
pub use glyph_set::*;

mod shade;
pub use shade::*;

pub mod nearest;
pub use nearest::{GlyphLookup, NearestIndex};

mod atlas;
pub use atlas::*;

mod pipeline;
pub use pipeline::*;
