//! Display-font readiness and text shaping.
//!
//! Fonts are awaited once per card run with a bounded wait. A missing face never fails the run:
//! the set falls back to a system face, and an empty set makes text ops no-ops.

use std::{collections::HashMap, sync::Arc, time::Duration};

use crate::assets::source::AssetSource;
use crate::config::FontFile;
use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::foundation::wait::{Waited, wait_bounded};

/// Where a loaded face came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// A configured font file (path relative to the asset root).
    Configured(String),
    /// A face picked from the system font database.
    System(String),
}

/// One font face ready for shaping and glyph rendering.
#[derive(Clone)]
pub struct FontFace {
    pub weight: u16,
    /// Face index inside `bytes` (non-zero for collections).
    pub index: u32,
    pub bytes: Arc<Vec<u8>>,
    pub origin: FontOrigin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("weight", &self.weight)
            .field("index", &self.index)
            .field("bytes_len", &self.bytes.len())
            .field("origin", &self.origin)
            .finish()
    }
}

/// Faces available to text draw ops.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    faces: Vec<FontFace>,
}

impl FontSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_faces(faces: Vec<FontFace>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face with the closest weight; the first one wins ties.
    pub fn face_for_weight(&self, weight: u16) -> Option<&FontFace> {
        self.faces
            .iter()
            .min_by_key(|f| f.weight.abs_diff(weight))
    }
}

/// Wait (bounded by `timeout`) until every configured face is loaded.
///
/// Faces that are missing or unreadable are skipped. If none of the configured faces load, a
/// system sans-serif face is used instead. A timeout yields an empty set.
#[tracing::instrument(skip(source, files), fields(files = files.len()))]
pub fn await_fonts(
    source: Arc<dyn AssetSource>,
    files: &[FontFile],
    timeout: Duration,
) -> FontSet {
    let files = files.to_vec();
    let waited = wait_bounded("fonts", timeout, move || {
        let mut faces = load_configured_faces(source.as_ref(), &files);
        if faces.is_empty() {
            faces.extend(system_fallback_face());
        }
        faces
    });

    let faces = match waited {
        Waited::Done(faces) => faces,
        Waited::TimedOut => {
            tracing::warn!(?timeout, "font readiness wait timed out; continuing without fonts");
            Vec::new()
        }
        Waited::Lost(reason) => {
            tracing::warn!(%reason, "font loading failed; continuing without fonts");
            Vec::new()
        }
    };
    if faces.is_empty() {
        tracing::warn!("no font faces available; caption text will be skipped");
    }
    FontSet::from_faces(faces)
}

fn load_configured_faces(source: &dyn AssetSource, files: &[FontFile]) -> Vec<FontFace> {
    let mut faces = Vec::with_capacity(files.len());
    for file in files {
        let bytes = match source.fetch(&file.path) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(path = %file.path, error = %e, "display font unavailable");
                continue;
            }
        };
        if !contains_font_face(&bytes) {
            tracing::warn!(path = %file.path, "display font bytes are not a font");
            continue;
        }
        faces.push(FontFace {
            weight: file.weight,
            index: 0,
            bytes: Arc::new(bytes),
            origin: FontOrigin::Configured(file.path.clone()),
        });
    }
    faces
}

fn contains_font_face(bytes: &[u8]) -> bool {
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(bytes.to_vec());
    db.faces().next().is_some()
}

fn system_fallback_face() -> Option<FontFace> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let families = [
        usvg::fontdb::Family::SansSerif,
        usvg::fontdb::Family::Serif,
        usvg::fontdb::Family::Monospace,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))?;
    let info = db.face(id)?;
    let (index, name) = (info.index, info.post_script_name.clone());
    let bytes = db.with_face_data(id, |data, _| data.to_vec())?;

    tracing::debug!(face = %name, "using system fallback font");
    Some(FontFace {
        weight: 400,
        index,
        bytes: Arc::new(bytes),
        origin: FontOrigin::System(name),
    })
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Stateful helper for building single-line Parley layouts from [`FontFace`]s.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Register `face` (once) and return its family name.
    pub fn family_for(&mut self, face: &FontFace) -> GreetcardResult<String> {
        let key = Arc::as_ptr(&face.bytes) as usize;
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            GreetcardError::composition("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GreetcardError::composition("registered font family has no name"))?
            .to_string();

        self.families.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape one unwrapped line of text. Bidi direction comes from the text itself.
    pub fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> GreetcardResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GreetcardError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
