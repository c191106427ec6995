use crate::coords::{CaptureError, FillRule, Outline, Path, Rect, Segment, Vec2};

/// Read-only reconstruction of an outline's geometry.
///
/// Built when a shape argument offers no structural clone: the segments are
/// copied into an owned [`Path`] and the bounds are cached, giving an
/// independent object that reproduces containment, intersection, bounds,
/// and iteration behavior. Fidelity is best-effort on pathological inputs
/// (winding nuances of self-intersecting outlines follow the flattened
/// geometry, not the source type's own rules).
#[derive(Debug, Clone, PartialEq)]
pub struct PathSnapshot {
    path: Path,
    bounds: Rect,
}

impl PathSnapshot {
    /// Reconstructs `outline` from its queryable geometry.
    pub fn capture(outline: &dyn Outline) -> Result<Self, CaptureError> {
        let path = Path::from_segments(outline.segments(), outline.fill_rule());
        if !path.is_finite() {
            return Err(CaptureError::NonFiniteGeometry);
        }
        let bounds = outline.bounds().normalized();
        let bounds = if bounds.is_finite() { bounds } else { path.bounds() };
        Ok(Self { path, bounds })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.path.contains(p)
    }

    #[inline]
    pub fn intersects(&self, r: Rect) -> bool {
        self.path.intersects(r)
    }
}

impl Outline for PathSnapshot {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn segments(&self) -> Vec<Segment> {
        self.path.segments().to_vec()
    }

    fn fill_rule(&self) -> FillRule {
        self.path.fill_rule()
    }

    fn as_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
