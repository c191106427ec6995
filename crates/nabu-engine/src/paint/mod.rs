//! Paint model shared between callers, the recorder, and output surfaces.
//!
//! Scope:
//! - color representation (straight-alpha sRGB)
//! - paint sources (solid, gradients)
//! - stroke geometry and compositing state
//!
//! Geometry types remain in `coords`.

mod color;
mod composite;
mod gradient;
mod stroke;

pub use color::Color;
pub use composite::{BlendMode, Composite};
pub use gradient::{ColorStop, LinearGradient, SpreadMode};
pub use stroke::{DashPattern, LineCap, LineJoin, Stroke};

/// Paint source for filling or stroking geometry.
///
/// Intentionally a small enum. Extend by adding variants
/// (`RadialGradient`, `Pattern`) while keeping it stable for surface
/// dispatch and command capture.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// The solid color, when this paint is one.
    #[inline]
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Paint::Solid(c) => Some(*c),
            _ => None,
        }
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0,
            Paint::LinearGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
        }
    }
}

impl Default for Paint {
    #[inline]
    fn default() -> Self {
        Paint::Solid(Color::BLACK)
    }
}
