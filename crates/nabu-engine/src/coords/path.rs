use super::{Rect, Transform, Vec2};

/// Winding rule deciding interior membership for self-overlapping outlines.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// One path segment. Coordinates are absolute, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

/// Flattening tolerance used by containment and intersection queries.
const FLATTEN_TOLERANCE: f32 = 0.25;

/// General path: an ordered segment list plus a fill rule.
///
/// The path is the one concrete outline type the engine owns. Caller shape
/// types participate through [`Outline`](super::Outline); the recorder turns
/// them into paths (or snapshots) when it captures arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
    fill_rule: FillRule,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_fill_rule(fill_rule: FillRule) -> Self {
        Self { segments: Vec::new(), fill_rule }
    }

    #[inline]
    pub fn from_segments(segments: Vec<Segment>, fill_rule: FillRule) -> Self {
        Self { segments, fill_rule }
    }

    // ── construction helpers ──────────────────────────────────────────────

    #[inline]
    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.segments.push(Segment::MoveTo(p));
        self
    }

    #[inline]
    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.segments.push(Segment::LineTo(p));
        self
    }

    #[inline]
    pub fn quad_to(&mut self, ctrl: Vec2, to: Vec2) -> &mut Self {
        self.segments.push(Segment::QuadTo { ctrl, to });
        self
    }

    #[inline]
    pub fn cubic_to(&mut self, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) -> &mut Self {
        self.segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
        self
    }

    #[inline]
    pub fn close(&mut self) -> &mut Self {
        self.segments.push(Segment::Close);
        self
    }

    /// Closed rectangular path.
    pub fn rect(r: Rect) -> Self {
        let r = r.normalized();
        let [a, b, c, d] = r.corners();
        let mut path = Path::new();
        path.move_to(a).line_to(b).line_to(c).line_to(d).close();
        path
    }

    /// Closed polygon through `points`. Empty input produces an empty path.
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut path = Path::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close();
        }
        path
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every coordinate (control points included) is finite.
    pub fn is_finite(&self) -> bool {
        self.segments.iter().all(|seg| match *seg {
            Segment::MoveTo(p) | Segment::LineTo(p) => p.is_finite(),
            Segment::QuadTo { ctrl, to } => ctrl.is_finite() && to.is_finite(),
            Segment::CubicTo { ctrl1, ctrl2, to } => {
                ctrl1.is_finite() && ctrl2.is_finite() && to.is_finite()
            }
            Segment::Close => true,
        })
    }

    /// Control-point bounding box. Curves may bulge less than their control
    /// hull, so this box is conservative. Empty paths yield an empty rect.
    pub fn bounds(&self) -> Rect {
        let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        let mut any = false;
        let mut grow = |p: Vec2| {
            min = min.min(p);
            max = max.max(p);
            any = true;
        };
        for seg in &self.segments {
            match *seg {
                Segment::MoveTo(p) | Segment::LineTo(p) => grow(p),
                Segment::QuadTo { ctrl, to } => {
                    grow(ctrl);
                    grow(to);
                }
                Segment::CubicTo { ctrl1, ctrl2, to } => {
                    grow(ctrl1);
                    grow(ctrl2);
                    grow(to);
                }
                Segment::Close => {}
            }
        }
        if any {
            Rect::from_corners(min, max)
        } else {
            Rect::default()
        }
    }

    /// The path with `t` applied to every coordinate.
    pub fn transformed(&self, t: Transform) -> Path {
        let segments = self
            .segments
            .iter()
            .map(|seg| match *seg {
                Segment::MoveTo(p) => Segment::MoveTo(t.apply(p)),
                Segment::LineTo(p) => Segment::LineTo(t.apply(p)),
                Segment::QuadTo { ctrl, to } => Segment::QuadTo {
                    ctrl: t.apply(ctrl),
                    to: t.apply(to),
                },
                Segment::CubicTo { ctrl1, ctrl2, to } => Segment::CubicTo {
                    ctrl1: t.apply(ctrl1),
                    ctrl2: t.apply(ctrl2),
                    to: t.apply(to),
                },
                Segment::Close => Segment::Close,
            })
            .collect();
        Path::from_segments(segments, self.fill_rule)
    }

    /// Flattens curves into polylines, one per subpath.
    ///
    /// Open subpaths are closed implicitly for containment queries, matching
    /// the behavior of fill operations on concrete surfaces.
    pub fn flatten(&self, tolerance: f32) -> Vec<Vec<Vec2>> {
        let mut subpaths: Vec<Vec<Vec2>> = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        let mut cursor = Vec2::zero();
        let mut start = Vec2::zero();

        for seg in &self.segments {
            match *seg {
                Segment::MoveTo(p) => {
                    if current.len() > 1 {
                        subpaths.push(core::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    current.push(p);
                    cursor = p;
                    start = p;
                }
                Segment::LineTo(p) => {
                    current.push(p);
                    cursor = p;
                }
                Segment::QuadTo { ctrl, to } => {
                    flatten_quad(cursor, ctrl, to, tolerance, 0, &mut current);
                    cursor = to;
                }
                Segment::CubicTo { ctrl1, ctrl2, to } => {
                    flatten_cubic(cursor, ctrl1, ctrl2, to, tolerance, 0, &mut current);
                    cursor = to;
                }
                Segment::Close => {
                    if !current.is_empty() {
                        current.push(start);
                        subpaths.push(core::mem::take(&mut current));
                    }
                    cursor = start;
                }
            }
        }
        if current.len() > 1 {
            subpaths.push(current);
        }
        subpaths
    }

    /// Interior containment under the path's fill rule.
    pub fn contains(&self, p: Vec2) -> bool {
        let mut winding = 0i32;
        let mut crossings = 0u32;
        for mut poly in self.flatten(FLATTEN_TOLERANCE) {
            // Open subpaths fill as if closed.
            if poly.first() != poly.last() {
                let first = poly[0];
                poly.push(first);
            }
            for pair in poly.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if (a.y <= p.y) != (b.y <= p.y) {
                    // Edge crosses the horizontal ray through p.
                    let t = (p.y - a.y) / (b.y - a.y);
                    let x = a.x + t * (b.x - a.x);
                    if x > p.x {
                        crossings += 1;
                        winding += if b.y > a.y { 1 } else { -1 };
                    }
                }
            }
        }
        match self.fill_rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => crossings % 2 == 1,
        }
    }

    /// Best-effort overlap test against a rectangle.
    ///
    /// True when any flattened edge touches `r`, or `r` lies entirely inside
    /// the path, or the path lies entirely inside `r`.
    pub fn intersects(&self, r: Rect) -> bool {
        let r = r.normalized();
        if r.is_empty() || self.is_empty() {
            return false;
        }
        if self.bounds().intersect(r).is_none() {
            return false;
        }
        for poly in self.flatten(FLATTEN_TOLERANCE) {
            for pair in poly.windows(2) {
                if segment_touches_rect(pair[0], pair[1], r) {
                    return true;
                }
            }
        }
        // No edge overlap: either disjoint or full containment.
        self.contains(r.center())
    }
}

fn flatten_quad(from: Vec2, ctrl: Vec2, to: Vec2, tolerance: f32, depth: u8, out: &mut Vec<Vec2>) {
    let flat = ctrl.distance(from.lerp(to, 0.5));
    if depth >= 16 || flat <= tolerance {
        out.push(to);
        return;
    }
    let ab = from.lerp(ctrl, 0.5);
    let bc = ctrl.lerp(to, 0.5);
    let mid = ab.lerp(bc, 0.5);
    flatten_quad(from, ab, mid, tolerance, depth + 1, out);
    flatten_quad(mid, bc, to, tolerance, depth + 1, out);
}

fn flatten_cubic(
    from: Vec2,
    ctrl1: Vec2,
    ctrl2: Vec2,
    to: Vec2,
    tolerance: f32,
    depth: u8,
    out: &mut Vec<Vec2>,
) {
    let chord_mid = from.lerp(to, 0.5);
    let flat = ctrl1.distance(chord_mid).max(ctrl2.distance(chord_mid));
    if depth >= 16 || flat <= tolerance {
        out.push(to);
        return;
    }
    let ab = from.lerp(ctrl1, 0.5);
    let bc = ctrl1.lerp(ctrl2, 0.5);
    let cd = ctrl2.lerp(to, 0.5);
    let abc = ab.lerp(bc, 0.5);
    let bcd = bc.lerp(cd, 0.5);
    let mid = abc.lerp(bcd, 0.5);
    flatten_cubic(from, ab, abc, mid, tolerance, depth + 1, out);
    flatten_cubic(mid, bcd, cd, to, tolerance, depth + 1, out);
}

fn segment_touches_rect(a: Vec2, b: Vec2, r: Rect) -> bool {
    if r.contains(a) || r.contains(b) {
        return true;
    }
    let corners = r.corners();
    for i in 0..4 {
        if segments_cross(a, b, corners[i], corners[(i + 1) % 4]) {
            return true;
        }
    }
    false
}

fn segments_cross(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    fn orient(p: Vec2, q: Vec2, r: Vec2) -> f32 {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    }
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    (o1 * o2 < 0.0) && (o3 * o4 < 0.0)
}
