use thiserror::Error;

use super::{FillRule, Path, Rect, Segment};

/// An outline whose geometry cannot be copied into an independent shape.
///
/// This is determined by the shape value a caller keeps passing, so callers
/// should treat it as a configuration error rather than a per-call
/// condition.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CaptureError {
    #[error("outline has non-finite geometry and cannot be reconstructed")]
    NonFiniteGeometry,
}

/// Queryable geometry contract for shape arguments.
///
/// Drawing calls accept `&dyn Outline` so callers can pass their own shape
/// types without converting to [`Path`] up front. The recorder relies on
/// this contract to capture an independent copy of the geometry: either the
/// structural fast path ([`as_path`](Self::as_path)) or a reconstruction
/// from [`segments`](Self::segments).
pub trait Outline {
    /// Conservative bounding box of the outline.
    fn bounds(&self) -> Rect;

    /// The outline as absolute segments, in drawing order.
    ///
    /// This is the reconstruction source of last resort, so it must reflect
    /// the shape's geometry at the moment of the call.
    fn segments(&self) -> Vec<Segment>;

    fn fill_rule(&self) -> FillRule {
        FillRule::NonZero
    }

    /// Structural fast path: outlines that are paths (or own one) can expose
    /// it here and skip reconstruction entirely.
    fn as_path(&self) -> Option<&Path> {
        None
    }
}

impl Outline for Path {
    fn bounds(&self) -> Rect {
        Path::bounds(self)
    }

    fn segments(&self) -> Vec<Segment> {
        self.segments().to_vec()
    }

    fn fill_rule(&self) -> FillRule {
        Path::fill_rule(self)
    }

    fn as_path(&self) -> Option<&Path> {
        Some(self)
    }
}

impl Outline for Rect {
    fn bounds(&self) -> Rect {
        self.normalized()
    }

    fn segments(&self) -> Vec<Segment> {
        let [a, b, c, d] = self.normalized().corners();
        vec![
            Segment::MoveTo(a),
            Segment::LineTo(b),
            Segment::LineTo(c),
            Segment::LineTo(d),
            Segment::Close,
        ]
    }
}
