//! Font configuration and conversion to a fontdb database.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Fonts available to the surface.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Font files registered in addition to system fonts.
    pub custom_fonts: Vec<CustomFont>,
    /// Concrete families for the generic CSS family names.
    pub generic_families: GenericFamilyMap,
    /// Whether to scan installed system fonts (default: true).
    pub load_system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            custom_fonts: Vec::new(),
            generic_families: GenericFamilyMap::defaults(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

impl FontConfig {
    /// A configuration with no fonts at all, for surfaces that only paint
    /// shapes. Text measures as zero width and draws nothing.
    pub fn empty() -> Self {
        Self {
            load_system_fonts: false,
            ..Self::default()
        }
    }

    /// Build the font database described by this configuration.
    pub fn to_database(&self) -> fontdb::Database {
        let mut db = fontdb::Database::new();
        if self.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &self.font_dirs {
            db.load_fonts_dir(dir);
        }
        for font in &self.custom_fonts {
            db.load_font_data(Vec::from(font.data.as_slice()));
        }
        apply_generic_families(&mut db, &self.generic_families);
        log::debug!("font database holds {} faces", db.len());
        db
    }
}

/// Raw font file bytes to register.
#[derive(Clone, Debug)]
pub struct CustomFont {
    pub data: Arc<Vec<u8>>,
}

/// Generic CSS family names mapped to concrete families, in priority order.
#[derive(Clone, Debug, Default)]
pub struct GenericFamilyMap {
    pub serif: Vec<String>,
    pub sans_serif: Vec<String>,
    pub monospace: Vec<String>,
}

impl GenericFamilyMap {
    /// Browser-like defaults, with CJK capable faces after the Latin ones.
    pub fn defaults() -> Self {
        Self {
            sans_serif: vec![
                "PingFang SC".into(),
                "Arial".into(),
                "Helvetica".into(),
                "Liberation Sans".into(),
                "Noto Sans CJK SC".into(),
                "DejaVu Sans".into(),
            ],
            serif: vec![
                "Times New Roman".into(),
                "Times".into(),
                "Liberation Serif".into(),
                "DejaVu Serif".into(),
            ],
            monospace: vec![
                "Courier New".into(),
                "Courier".into(),
                "Liberation Mono".into(),
                "DejaVu Sans Mono".into(),
            ],
        }
    }
}

fn apply_generic_families(db: &mut fontdb::Database, families: &GenericFamilyMap) {
    let available: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(fam, _lang)| fam.clone()))
        .collect();

    if let Some(family) = families.sans_serif.iter().find(|f| available.contains(*f)) {
        db.set_sans_serif_family(family.as_str());
    }
    if let Some(family) = families.serif.iter().find(|f| available.contains(*f)) {
        db.set_serif_family(family.as_str());
    }
    if let Some(family) = families.monospace.iter().find(|f| available.contains(*f)) {
        db.set_monospace_family(family.as_str());
    }
}
