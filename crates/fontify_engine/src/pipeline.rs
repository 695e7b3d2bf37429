//! Run scoped ingestion context.
//!
//! Sheets are processed strictly one after another: glyph indices, bucket order and
//! therefore every tie in the nearest index depend on the ingestion order.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use walkdir::{DirEntry, WalkDir};

use crate::{extract_glyphs, Atlas, ExtractOptions, FontifyError, Glyph, GlyphSet, NearestIndex, Result, ShadePartition, Sheet};

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct FontifyOutput {
    pub glyphs: Vec<Glyph>,
    pub index: NearestIndex,
    pub atlas: Atlas,
}

#[derive(Debug, Default)]
pub struct FontifyContext {
    options: ExtractOptions,
    glyphs: GlyphSet,
    sheets: usize,
}

impl FontifyContext {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            glyphs: GlyphSet::new(),
            sheets: 0,
        }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets
    }

    /// Extracts and records the sheet's glyphs, returns how many of them were new.
    pub fn ingest_sheet(&mut self, sheet: &Sheet) -> Result<usize> {
        let extracted = extract_glyphs(sheet, &self.options)?;
        let mut added = 0;
        for glyph in extracted.glyphs {
            if let Some(index) = self.glyphs.insert(glyph) {
                log::debug!("Glyph {index} from {}:\n{glyph}", sheet.name());
                added += 1;
            }
        }
        self.sheets += 1;
        log::info!(
            "{}: {}x{}, stride {}, {added} new glyphs ({} total)",
            sheet.name(),
            sheet.width(),
            sheet.height(),
            extracted.stride,
            self.glyphs.len()
        );
        Ok(added)
    }

    /// Decodes a sheet file and ingests it, the decoded raster is dropped before returning.
    pub fn ingest_path(&mut self, path: &Path) -> Result<usize> {
        let sheet = Sheet::load(path, self.options.threshold)?;
        self.ingest_sheet(&sheet)
    }

    /// Ingests every sheet of the directory in file name order. Returns the number of sheets.
    pub fn ingest_dir(&mut self, dir: &Path) -> Result<usize> {
        let sheets = list_sheets(dir)?;
        for path in &sheets {
            self.ingest_path(path)?;
        }
        Ok(sheets.len())
    }

    /// Partitions, indexes and packs the collected glyphs.
    pub fn finish(self) -> Result<FontifyOutput> {
        let glyphs = self.glyphs.into_glyphs();
        log::info!("{} distinct glyphs from {} sheets", glyphs.len(), self.sheets);
        if glyphs.is_empty() {
            return Err(FontifyError::EmptyGlyphSet);
        }

        let partition = ShadePartition::new(&glyphs);
        log::info!("{} shade buckets", partition.len());

        let now = Instant::now();
        let index = NearestIndex::build(partition)?;
        log::info!("Built nearest index with {} entries in {:?}", index.len(), now.elapsed());

        let atlas = Atlas::compose(&glyphs);
        Ok(FontifyOutput { glyphs, index, atlas })
    }
}

/// Files directly inside `dir`, hidden files excluded, sorted by file name.
pub fn list_sheets(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            log::warn!("Skipping {}, not a file", entry.path().display());
            continue;
        }
        result.push(entry.into_path());
    }
    Ok(result)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}
