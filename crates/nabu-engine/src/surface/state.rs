use crate::coords::{Outline, Rect, Transform, Vec2};
use crate::paint::{Color, Composite, Paint, Stroke};
use crate::text::FontSpec;

use super::{HintKey, HintValue};

/// Bookkeeping for the mutable state half of the capability set.
///
/// Value-object surfaces (the surrogate, markup emitters) embed this so the
/// getters behave consistently without each implementation re-deriving clip
/// and transform rules. It tracks state only; it draws nothing.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    pub paint: Paint,
    pub stroke: Stroke,
    pub composite: Composite,
    pub font: FontSpec,
    pub transform: Transform,
    /// Device-space clip bounds; `None` means unclipped. A degenerate clip
    /// collapses to an empty rect rather than disappearing.
    pub clip: Option<Rect>,
    hints: Vec<(HintKey, HintValue)>,
    /// Last solid color established through `set_color`/`set_paint`.
    color: Color,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            paint: Paint::default(),
            stroke: Stroke::default(),
            composite: Composite::default(),
            font: FontSpec::default(),
            transform: Transform::IDENTITY,
            clip: None,
            hints: Vec::new(),
            color: Color::BLACK,
        }
    }
}

impl SurfaceState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // ── paint ─────────────────────────────────────────────────────────────

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.paint = Paint::Solid(color);
    }

    pub fn set_paint(&mut self, paint: Paint) {
        if let Some(c) = paint.as_solid() {
            self.color = c;
        }
        self.paint = paint;
    }

    /// The current color: the solid paint if one is set, otherwise the last
    /// solid color the caller established.
    #[inline]
    pub fn color(&self) -> Color {
        self.paint.as_solid().unwrap_or(self.color)
    }

    // ── transform ─────────────────────────────────────────────────────────

    /// Composes `t` before the current transform (geometry side).
    pub fn concat(&mut self, t: Transform) {
        self.transform = t.then(self.transform);
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.concat(Transform::translation(dx, dy));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.concat(Transform::scaling(sx, sy));
    }

    pub fn rotate(&mut self, theta: f32) {
        self.concat(Transform::rotation(theta));
    }

    pub fn rotate_about(&mut self, theta: f32, center: Vec2) {
        self.concat(Transform::rotation_about(theta, center));
    }

    pub fn shear(&mut self, shx: f32, shy: f32) {
        self.concat(Transform::shearing(shx, shy));
    }

    // ── clip ──────────────────────────────────────────────────────────────

    /// Replaces the clip with the device-space bounds of `outline`.
    pub fn set_clip(&mut self, outline: &dyn Outline) {
        self.clip = Some(self.device_bounds(outline.bounds()));
    }

    /// Intersects the clip with the device-space bounds of `outline`.
    pub fn clip(&mut self, outline: &dyn Outline) {
        let bounds = self.device_bounds(outline.bounds());
        self.clip = Some(match self.clip {
            Some(clip) => clip.intersect(bounds).unwrap_or(Rect::from_origin_size(bounds.origin, Vec2::zero())),
            None => bounds,
        });
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    /// Additionally clips to `region` (user space); used for child
    /// derivation with a region.
    pub fn clip_to_region(&mut self, region: Rect) {
        self.clip(&region);
    }

    // ── hints ─────────────────────────────────────────────────────────────

    pub fn set_hint(&mut self, key: HintKey, value: HintValue) {
        if let Some(slot) = self.hints.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.hints.push((key, value));
        }
    }

    pub fn hint(&self, key: HintKey) -> Option<HintValue> {
        self.hints.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    // ── helpers ───────────────────────────────────────────────────────────

    /// Maps a user-space rect through the current transform and returns the
    /// device-space bounding box of the result.
    pub fn device_bounds(&self, rect: Rect) -> Rect {
        let corners = rect.normalized().corners().map(|p| self.transform.apply(p));
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }
        Rect::from_corners(min, max)
    }
}
