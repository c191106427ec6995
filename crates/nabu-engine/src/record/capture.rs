use crate::coords::{CaptureError, FillRule, Outline, Path, Rect, Segment};

use super::PathSnapshot;

/// An independent copy of a shape argument, owned by the command journal.
///
/// Either a structural path clone or a geometry snapshot; both are frozen
/// at capture time and unaffected by whatever the caller does to the
/// original afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturedOutline {
    Path(Path),
    Snapshot(PathSnapshot),
}

impl CapturedOutline {
    #[inline]
    pub fn as_outline(&self) -> &dyn Outline {
        match self {
            CapturedOutline::Path(p) => p,
            CapturedOutline::Snapshot(s) => s,
        }
    }
}

impl Outline for CapturedOutline {
    fn bounds(&self) -> Rect {
        self.as_outline().bounds()
    }

    fn segments(&self) -> Vec<Segment> {
        self.as_outline().segments()
    }

    fn fill_rule(&self) -> FillRule {
        self.as_outline().fill_rule()
    }

    fn as_path(&self) -> Option<&Path> {
        self.as_outline().as_path()
    }
}

/// Copies a shape argument for the journal.
///
/// Strategy order:
/// 1. structural clone when the outline is (or owns) a [`Path`];
/// 2. otherwise reconstruct a [`PathSnapshot`] from the queryable geometry.
///
/// The error case is decided by the shape value itself (non-finite
/// geometry), so callers hitting it should fix the shape type they pass,
/// not retry.
pub fn capture_outline(outline: &dyn Outline) -> Result<CapturedOutline, CaptureError> {
    if let Some(path) = outline.as_path() {
        return Ok(CapturedOutline::Path(path.clone()));
    }
    Ok(CapturedOutline::Snapshot(PathSnapshot::capture(outline)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn path_takes_the_structural_route() {
        let path = Path::rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        match capture_outline(&path).unwrap() {
            CapturedOutline::Path(p) => assert_eq!(p, path),
            CapturedOutline::Snapshot(_) => panic!("expected structural clone"),
        }
    }

    #[test]
    fn snapshot_of_snapshot_stays_structural() {
        struct Tri;
        impl Outline for Tri {
            fn bounds(&self) -> Rect {
                Rect::new(0.0, 0.0, 2.0, 2.0)
            }
            fn segments(&self) -> Vec<Segment> {
                vec![
                    Segment::MoveTo(Vec2::zero()),
                    Segment::LineTo(Vec2::new(2.0, 0.0)),
                    Segment::LineTo(Vec2::new(0.0, 2.0)),
                    Segment::Close,
                ]
            }
        }

        let first = capture_outline(&Tri).unwrap();
        assert!(matches!(first, CapturedOutline::Snapshot(_)));

        // A snapshot exposes its path, so re-capturing is a cheap clone.
        let second = capture_outline(&first).unwrap();
        assert!(matches!(second, CapturedOutline::Path(_)));
    }
}
