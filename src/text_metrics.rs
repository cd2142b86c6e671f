use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use ttf_parser::{Face, GlyphId};

static TEXT_MEASURER: Lazy<std::sync::Mutex<TextMeasurer>> =
    Lazy::new(|| std::sync::Mutex::new(TextMeasurer::new()));

/// Measure the pixel extent (width, height) of one line of text. Returns
/// None when no face can be resolved for the family; callers fall back to
/// heuristic metrics.
pub fn measure_text(text: &str, px_size: f32, font_family: &str) -> Option<(f32, f32)> {
    if px_size <= 0.0 {
        return Some((0.0, 0.0));
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, px_size, font_family)
}

/// Load a font file ahead of the system lookup. Failure is reported but
/// never fatal; the pipeline continues on whatever the database resolves.
pub fn register_font_file(path: &Path) -> bool {
    let Ok(mut guard) = TEXT_MEASURER.lock() else {
        return false;
    };
    guard.register_file(path)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    fn register_file(&mut self, path: &Path) -> bool {
        let loaded = self.db.load_font_file(path).is_ok();
        if loaded {
            // Resolved faces may change now, drop memoized lookups.
            self.cache.clear();
        }
        loaded
    }

    fn measure(&mut self, text: &str, px_size: f32, font_family: &str) -> Option<(f32, f32)> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(font_family);
            self.cache.insert(family_key.clone(), face);
        }
        let face = self.cache.get_mut(&family_key).and_then(|f| f.as_mut())?;
        let normalized = text.replace('\t', "    ");
        face.measure(&normalized, px_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut names: Vec<String> = Vec::new();
        let mut generics: Vec<Option<Family<'static>>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => generics.push(Some(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    generics.push(Some(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => generics.push(Some(Family::Monospace)),
                "cursive" => generics.push(Some(Family::Cursive)),
                "fantasy" => generics.push(Some(Family::Fantasy)),
                _ => {
                    names.push(raw.to_string());
                    generics.push(None);
                }
            }
        }

        let mut families: Vec<Family<'_>> = Vec::with_capacity(generics.len() + 1);
        let mut name_idx = 0;
        for generic in generics {
            match generic {
                Some(family) => families.push(family),
                None => {
                    families.push(Family::Name(names[name_idx].as_str()));
                    name_idx += 1;
                }
            }
        }
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontFace> = None;
        self.db.with_face_data(id, |data, index| {
            loaded = FontFace::new(data.to_vec(), index);
        });
        loaded
    }
}

struct FontFace {
    _data: Vec<u8>,
    units_per_em: u16,
    /// Ascender minus descender, in font units.
    line_extent: f32,
    face: Face<'static>,
    glyph_cache: HashMap<char, Option<u16>>,
    advance_cache: HashMap<u16, u16>,
}

impl FontFace {
    fn new(data: Vec<u8>, index: u32) -> Option<Self> {
        let parsed = Face::parse(&data, index).ok()?;
        let units_per_em = parsed.units_per_em().max(1);
        let line_extent = (parsed.ascender() as f32) - (parsed.descender() as f32);
        // The face borrows `data`, which lives and dies with this struct.
        let face = unsafe { std::mem::transmute::<Face<'_>, Face<'static>>(parsed) };
        Some(Self {
            _data: data,
            units_per_em,
            line_extent,
            face,
            glyph_cache: HashMap::new(),
            advance_cache: HashMap::new(),
        })
    }

    fn measure(&mut self, text: &str, px_size: f32) -> Option<(f32, f32)> {
        let scale = px_size / self.units_per_em as f32;
        let fallback = px_size * 0.56;
        let mut width = 0.0f32;

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let glyph = if let Some(cached) = self.glyph_cache.get(&ch) {
                *cached
            } else {
                let glyph = self.face.glyph_index(ch).map(|id| id.0);
                self.glyph_cache.insert(ch, glyph);
                glyph
            };

            let Some(glyph_id) = glyph else {
                width += fallback;
                continue;
            };

            let advance = if let Some(value) = self.advance_cache.get(&glyph_id) {
                *value
            } else {
                let value = self.face.glyph_hor_advance(GlyphId(glyph_id)).unwrap_or(0);
                self.advance_cache.insert(glyph_id, value);
                value
            };
            if advance == 0 {
                width += fallback;
            } else {
                width += advance as f32 * scale;
            }
        }

        let height = self.line_extent * scale;
        Some((width.max(0.0), height.max(px_size)))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
