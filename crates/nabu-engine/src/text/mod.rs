//! Text state and glyph-run payloads.
//!
//! The engine does not shape or rasterize text. It transports the font
//! selection and, for callers that already shaped their text, positioned
//! glyph runs, leaving realization to the output surface.

mod font;

pub use font::{FontSpec, FontStyle, FontWeight, Glyph, GlyphRun};
