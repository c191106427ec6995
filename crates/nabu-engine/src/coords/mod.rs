//! Coordinate and geometry types shared across surfaces and the recorder.
//!
//! Canonical space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Concrete surfaces map logical pixels onto their own device space through
//! the transform they carry when drawing begins.

mod corner_radii;
mod outline;
mod path;
mod rect;
mod transform;
mod vec2;

pub use corner_radii::CornerRadii;
pub use outline::{CaptureError, Outline};
pub use path::{FillRule, Path, Segment};
pub use rect::Rect;
pub use transform::{Transform, TransformError};
pub use vec2::Vec2;
