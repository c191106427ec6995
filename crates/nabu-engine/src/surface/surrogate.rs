use std::sync::{Arc, Mutex};

use crate::coords::{CornerRadii, Outline, Rect, Transform, Vec2};
use crate::paint::{Color, Composite, Paint, Stroke};
use crate::raster::ImageRef;
use crate::text::{FontSpec, GlyphRun};

use super::{HintKey, HintValue, Surface, SurfaceError, SurfaceState};

/// Shared accumulator for the device-space extent a surrogate (and every
/// child derived from it) has touched.
///
/// Obtain one from [`SurrogateSurface::used_bounds_handle`] before handing
/// the surface off, then read it once drawing has finished.
#[derive(Debug, Clone, Default)]
pub struct UsedBounds {
    inner: Arc<Mutex<Option<Rect>>>,
}

impl UsedBounds {
    /// The union of everything drawn so far, `None` before the first
    /// drawing call.
    pub fn get(&self) -> Option<Rect> {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn grow(&self, rect: Rect) {
        let mut slot = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(match *slot {
            Some(acc) => acc.union(rect),
            None => rect.normalized(),
        });
    }
}

/// A no-op sizing surface.
///
/// Tracks the full state half of the capability set (so getters behave like
/// a real surface's) and accumulates the device-space bounding box of every
/// drawing call, but renders nothing. Use it to measure a drawing before
/// committing to a real output surface. It is a pure value object with no
/// threading of its own.
///
/// Text and glyph extents are estimated from the font size since no font
/// data is available here; callers needing exact ink bounds must measure on
/// a concrete surface.
#[derive(Debug)]
pub struct SurrogateSurface {
    state: SurfaceState,
    used: UsedBounds,
    disposed: bool,
}

impl Default for SurrogateSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SurrogateSurface {
    pub fn new() -> Self {
        Self {
            state: SurfaceState::new(),
            used: UsedBounds::default(),
            disposed: false,
        }
    }

    /// A handle onto the shared extent accumulator. Children derived from
    /// this surface report into the same handle.
    pub fn used_bounds_handle(&self) -> UsedBounds {
        self.used.clone()
    }

    /// Convenience for single-owner use.
    pub fn used_bounds(&self) -> Option<Rect> {
        self.used.get()
    }

    fn live(&self) -> Result<(), SurfaceError> {
        if self.disposed {
            Err(SurfaceError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Accumulates the device bounds of filled user-space geometry.
    fn mark_fill(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.live()?;
        self.used.grow(self.state.device_bounds(rect));
        Ok(())
    }

    /// Like `mark_fill` but padded for the stroke width.
    fn mark_stroke(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.live()?;
        let pad = self.state.stroke.width / 2.0;
        self.used.grow(self.state.device_bounds(rect.expand(pad)));
        Ok(())
    }

    fn points_bounds(points: &[Vec2]) -> Rect {
        let mut iter = points.iter();
        let Some(first) = iter.next() else {
            return Rect::default();
        };
        let mut min = *first;
        let mut max = *first;
        for p in iter {
            min = min.min(*p);
            max = max.max(*p);
        }
        Rect::from_corners(min, max)
    }

    fn text_box(&self, text: &str, at: Vec2) -> Rect {
        let size = self.state.font.size;
        let width = text.chars().count() as f32 * size * 0.6;
        Rect::new(at.x, at.y - size, width, size * 1.25)
    }
}

impl Surface for SurrogateSurface {
    // ── state setters ─────────────────────────────────────────────────────

    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.set_color(color);
        Ok(())
    }

    fn set_paint(&mut self, paint: Paint) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.set_paint(paint);
        Ok(())
    }

    fn set_stroke(&mut self, stroke: Stroke) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.stroke = stroke;
        Ok(())
    }

    fn set_composite(&mut self, composite: Composite) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.composite = composite;
        Ok(())
    }

    fn set_font(&mut self, font: FontSpec) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.font = font;
        Ok(())
    }

    fn set_clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.set_clip(outline);
        Ok(())
    }

    fn clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.clip(outline);
        Ok(())
    }

    fn clear_clip(&mut self) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.clear_clip();
        Ok(())
    }

    fn set_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.transform = transform;
        Ok(())
    }

    fn concat_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.concat(transform);
        Ok(())
    }

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.translate(dx, dy);
        Ok(())
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.scale(sx, sy);
        Ok(())
    }

    fn rotate(&mut self, theta: f32) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.rotate(theta);
        Ok(())
    }

    fn rotate_about(&mut self, theta: f32, center: Vec2) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.rotate_about(theta, center);
        Ok(())
    }

    fn shear(&mut self, shx: f32, shy: f32) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.shear(shx, shy);
        Ok(())
    }

    fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.set_hint(key, value);
        Ok(())
    }

    // ── getters ───────────────────────────────────────────────────────────

    fn color(&self) -> Color {
        self.state.color()
    }

    fn paint(&self) -> Paint {
        self.state.paint.clone()
    }

    fn stroke(&self) -> Stroke {
        self.state.stroke.clone()
    }

    fn composite(&self) -> Composite {
        self.state.composite
    }

    fn font(&self) -> FontSpec {
        self.state.font.clone()
    }

    fn clip_bounds(&self) -> Option<Rect> {
        self.state.clip
    }

    fn transform(&self) -> Transform {
        self.state.transform
    }

    fn hint(&self, key: HintKey) -> Option<HintValue> {
        self.state.hint(key)
    }

    // ── geometry ──────────────────────────────────────────────────────────

    fn draw_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.mark_stroke(outline.bounds())
    }

    fn fill_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.mark_fill(outline.bounds())
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) -> Result<(), SurfaceError> {
        self.mark_stroke(Rect::from_corners(from, to))
    }

    fn draw_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.mark_stroke(rect)
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.mark_fill(rect)
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.mark_fill(rect)
    }

    fn draw_round_rect(&mut self, rect: Rect, _radii: CornerRadii) -> Result<(), SurfaceError> {
        self.mark_stroke(rect)
    }

    fn fill_round_rect(&mut self, rect: Rect, _radii: CornerRadii) -> Result<(), SurfaceError> {
        self.mark_fill(rect)
    }

    fn draw_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.mark_stroke(bounds)
    }

    fn fill_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.mark_fill(bounds)
    }

    fn draw_arc(&mut self, bounds: Rect, _start: f32, _sweep: f32) -> Result<(), SurfaceError> {
        self.mark_stroke(bounds)
    }

    fn fill_arc(&mut self, bounds: Rect, _start: f32, _sweep: f32) -> Result<(), SurfaceError> {
        self.mark_fill(bounds)
    }

    fn draw_polyline(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.mark_stroke(Self::points_bounds(points))
    }

    fn draw_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.mark_stroke(Self::points_bounds(points))
    }

    fn fill_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.mark_fill(Self::points_bounds(points))
    }

    // ── raster & text ─────────────────────────────────────────────────────

    fn draw_image(&mut self, image: &ImageRef, at: Vec2) -> Result<(), SurfaceError> {
        self.mark_fill(Rect::from_origin_size(at, image.size()))
    }

    fn draw_image_transformed(
        &mut self,
        image: &ImageRef,
        transform: Transform,
    ) -> Result<(), SurfaceError> {
        let local = Rect::from_origin_size(Vec2::zero(), image.size());
        let corners = local.corners().map(|p| transform.apply(p));
        let mut bounds = Rect::from_corners(corners[0], corners[1]);
        for c in &corners[2..] {
            bounds = bounds.union(Rect::from_origin_size(*c, Vec2::zero()));
        }
        self.mark_fill(bounds)
    }

    fn draw_text(&mut self, text: &str, at: Vec2) -> Result<(), SurfaceError> {
        let bounds = self.text_box(text, at);
        self.mark_fill(bounds)
    }

    fn draw_glyphs(&mut self, run: &GlyphRun, at: Vec2) -> Result<(), SurfaceError> {
        let size = run.font.size;
        let extent = run.anchor_extent();
        let bounds = Rect::new(at.x, at.y - size, extent.x + size, extent.y + size * 1.25);
        self.mark_fill(bounds)
    }

    // ── derivation & lifecycle ────────────────────────────────────────────

    fn create_child(&mut self, region: Option<Rect>) -> Result<Box<dyn Surface>, SurfaceError> {
        self.live()?;
        let mut state = self.state.clone();
        if let Some(region) = region {
            state.clip_to_region(region);
        }
        Ok(Box::new(SurrogateSurface {
            state,
            used: self.used.clone(),
            disposed: false,
        }))
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        self.disposed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_bounds_starts_empty() {
        let s = SurrogateSurface::new();
        assert_eq!(s.used_bounds(), None);
    }

    #[test]
    fn fill_accumulates_device_bounds() {
        let mut s = SurrogateSurface::new();
        s.translate(100.0, 100.0).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(s.used_bounds(), Some(Rect::new(100.0, 100.0, 10.0, 10.0)));
    }

    #[test]
    fn stroke_pads_by_half_width() {
        let mut s = SurrogateSurface::new();
        s.set_stroke(Stroke::new(4.0)).unwrap();
        s.draw_rect(Rect::new(10.0, 10.0, 10.0, 10.0)).unwrap();
        assert_eq!(s.used_bounds(), Some(Rect::new(8.0, 8.0, 14.0, 14.0)));
    }

    #[test]
    fn child_reports_into_parent_handle() {
        let mut s = SurrogateSurface::new();
        let handle = s.used_bounds_handle();
        let mut child = s.create_child(None).unwrap();
        child.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert_eq!(handle.get(), Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn disposed_surface_rejects_drawing() {
        let mut s = SurrogateSurface::new();
        s.dispose().unwrap();
        assert!(matches!(
            s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            Err(SurfaceError::Disposed)
        ));
    }
}
