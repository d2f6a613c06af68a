use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use ab_glyph::FontVec;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};

use crate::primitives::{FontStyle, FontWeight};

/// Families tried after the configured stack when it names nothing installed.
const FALLBACK_FAMILIES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial"];

/// System font database, loaded once per process.
fn system_fonts() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("font database: {} faces", db.len());
        db
    })
}

/// Faces used to measure text for one CSS font-family stack.
///
/// Any face may be missing; callers fall back to an estimate.
pub struct FontHandle {
    regular: Option<FontVec>,
    bold: Option<FontVec>,
    italic: Option<FontVec>,
    bold_italic: Option<FontVec>,
}

impl FontHandle {
    /// Shared handle for `family`, resolved against the system fonts.
    pub fn for_family(family: &str) -> Arc<Self> {
        static CACHE: OnceLock<Mutex<HashMap<String, Arc<FontHandle>>>> = OnceLock::new();
        let mut cache = CACHE
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        cache.entry(family.to_string()).or_insert_with(|| Arc::new(Self::load(family))).clone()
    }

    /// Handle with no faces; every measurement uses the estimate.
    pub fn empty() -> Self {
        Self { regular: None, bold: None, italic: None, bold_italic: None }
    }

    fn load(family: &str) -> Self {
        let db = system_fonts();
        let families = parse_families(family);
        let face = |weight: Weight, style: Style| {
            let query = Query { families: &families, weight, stretch: Stretch::Normal, style };
            let id = db.query(&query)?;
            db.with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index)
            })?
            .map_err(|e| log::warn!("unreadable font face for {family:?}: {e}"))
            .ok()
        };
        let handle = Self {
            regular: face(Weight::NORMAL, Style::Normal),
            bold: face(Weight::BOLD, Style::Normal),
            italic: face(Weight::NORMAL, Style::Italic),
            bold_italic: face(Weight::BOLD, Style::Italic),
        };
        if handle.regular.is_none() {
            log::warn!("no system font matches {family:?}; text widths are estimated");
        }
        handle
    }

    pub fn select(&self, weight: FontWeight, style: FontStyle) -> Option<&FontVec> {
        let face = match (weight, style) {
            (FontWeight::Bold, FontStyle::Italic) => self.bold_italic.as_ref(),
            (FontWeight::Bold, _) => self.bold.as_ref(),
            (_, FontStyle::Italic) => self.italic.as_ref(),
            _ => self.regular.as_ref(),
        };
        face.or(self.regular.as_ref())
    }
}

/// CSS font-family list to fontdb families, with generic and common fallbacks appended.
fn parse_families(stack: &str) -> Vec<Family<'_>> {
    let mut families: Vec<Family<'_>> = stack
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|f| !f.is_empty())
        .map(|f| match f {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        })
        .collect();
    families.push(Family::SansSerif);
    families.extend(FALLBACK_FAMILIES.iter().copied().map(Family::Name));
    families
}
