use crate::coords::Vec2;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FontWeight {
    #[default]
    Normal,
    Medium,
    Bold,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Font selection state carried by `set_font`.
///
/// `family` is a name the output surface resolves against whatever font
/// source it has; the engine does not validate it.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontSpec {
    #[inline]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        }
    }

    #[inline]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    #[inline]
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for FontSpec {
    #[inline]
    fn default() -> Self {
        Self::new("sans-serif", 12.0)
    }
}

/// One positioned glyph inside a [`GlyphRun`].
///
/// `offset` is relative to the run's draw position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    pub id: u32,
    pub offset: Vec2,
}

/// A pre-shaped run of glyphs with the font they were shaped against.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub font: FontSpec,
    pub glyphs: Vec<Glyph>,
}

impl GlyphRun {
    #[inline]
    pub fn new(font: FontSpec, glyphs: Vec<Glyph>) -> Self {
        Self { font, glyphs }
    }

    /// Bounding extent of the glyph anchor points. Glyph ink can exceed
    /// this; surfaces that need exact ink bounds must measure themselves.
    pub fn anchor_extent(&self) -> Vec2 {
        let mut max = Vec2::zero();
        for g in &self.glyphs {
            max = max.max(g.offset);
        }
        max
    }
}
