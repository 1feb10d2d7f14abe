use std::sync::Arc;

use usvg::fontdb;

use crate::config::RenderConfig;
use crate::error::RenderError;

/// Font database shared by text measurement and rasterization, so both see
/// the same faces.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    db: Arc<fontdb::Database>,
    default_family: String,
}

impl FontLibrary {
    /// Empty library; text cannot be measured until fonts are loaded.
    pub fn new(default_family: impl Into<String>) -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
            default_family: default_family.into(),
        }
    }

    /// System fonts (when enabled) plus every configured font file. Files
    /// that fail to load are skipped with a warning.
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut lib = Self::new(config.default_font_family.clone());
        let db = Arc::make_mut(&mut lib.db);
        if config.system_fonts {
            db.load_system_fonts();
        }
        for path in &config.font_files {
            if let Err(err) = db.load_font_file(path) {
                log::warn!("font file {} not loaded: {err}", path.display());
            }
        }
        lib.map_generic_families();
        log::info!("font library ready: {} faces", lib.face_count());
        lib
    }

    /// Adds a font from raw bytes (TTF/OTF/collection). Returns the number of
    /// faces now available.
    pub fn load_font_data(&mut self, bytes: Vec<u8>) -> usize {
        Arc::make_mut(&mut self.db).load_font_data(bytes);
        self.map_generic_families();
        self.face_count()
    }

    pub fn load_font_file(&mut self, path: &std::path::Path) -> Result<usize, RenderError> {
        Arc::make_mut(&mut self.db).load_font_file(path)?;
        self.map_generic_families();
        Ok(self.face_count())
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn default_family(&self) -> &str {
        &self.default_family
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.db
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(family)))
    }

    /// Sorted, de-duplicated family names.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Family that will actually be used for `requested`. Unknown families
    /// fall back to the generic family with a warning; this never blocks.
    pub fn resolve_family(&self, requested: &str) -> String {
        if self.has_family(requested) {
            return requested.to_string();
        }
        let fallback = self.fallback_family().unwrap_or_else(|| requested.to_string());
        log::warn!("font family {requested:?} not available, using {fallback:?}");
        fallback
    }

    /// Parsing options carrying this library's fonts.
    pub fn usvg_options(&self) -> usvg::Options<'static> {
        let mut opt = usvg::Options::default();
        opt.font_family = self
            .fallback_family()
            .unwrap_or_else(|| self.default_family.clone());
        opt.fontdb = self.db.clone();
        opt
    }

    /// The default family when loaded, else the first sans-serif family,
    /// else the first family.
    fn fallback_family(&self) -> Option<String> {
        if self.has_family(&self.default_family) {
            return Some(self.default_family.clone());
        }
        let families = self.families();
        families
            .iter()
            .find(|name| is_sans_serif(name))
            .or_else(|| families.first())
            .cloned()
    }

    // Generic names, and so every unknown family, resolve to the fallback.
    fn map_generic_families(&mut self) {
        let Some(name) = self.fallback_family() else {
            return;
        };
        if name != self.default_family {
            log::warn!(
                "default font family {:?} not loaded, falling back to {name:?}",
                self.default_family
            );
        }
        let db = Arc::make_mut(&mut self.db);
        db.set_sans_serif_family(name.clone());
        db.set_serif_family(name);
    }
}

fn is_sans_serif(family: &str) -> bool {
    let name = family.to_ascii_lowercase();
    name.contains("sans") && !name.contains("mono")
}
