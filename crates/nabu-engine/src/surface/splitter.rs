use crate::coords::{CornerRadii, Outline, Rect, Transform, Vec2};
use crate::paint::{Color, Composite, Paint, Stroke};
use crate::raster::ImageRef;
use crate::text::{FontSpec, GlyphRun};

use super::{HintKey, HintValue, Surface, SurfaceError};

/// Mirrors every request to two surfaces.
///
/// Both targets receive each call even when the first fails; the first
/// error (primary's, when both fail) is reported. Getters read the primary
/// only, so pair surfaces whose state agrees, or treat the secondary as
/// write-only. Derivation produces a child splitter over children of both
/// targets, so derivation trees stay paired.
pub struct SplitterSurface {
    primary: Box<dyn Surface>,
    secondary: Box<dyn Surface>,
}

impl SplitterSurface {
    pub fn new(primary: Box<dyn Surface>, secondary: Box<dyn Surface>) -> Self {
        Self { primary, secondary }
    }

    /// Takes the pair back apart.
    pub fn into_parts(self) -> (Box<dyn Surface>, Box<dyn Surface>) {
        (self.primary, self.secondary)
    }

    fn both(
        &mut self,
        op: impl Fn(&mut dyn Surface) -> Result<(), SurfaceError>,
    ) -> Result<(), SurfaceError> {
        let first = op(self.primary.as_mut());
        let second = op(self.secondary.as_mut());
        first.and(second)
    }
}

impl Surface for SplitterSurface {
    // ── state setters ─────────────────────────────────────────────────────

    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.both(|s| s.set_color(color))
    }

    fn set_paint(&mut self, paint: Paint) -> Result<(), SurfaceError> {
        self.both(|s| s.set_paint(paint.clone()))
    }

    fn set_stroke(&mut self, stroke: Stroke) -> Result<(), SurfaceError> {
        self.both(|s| s.set_stroke(stroke.clone()))
    }

    fn set_composite(&mut self, composite: Composite) -> Result<(), SurfaceError> {
        self.both(|s| s.set_composite(composite))
    }

    fn set_font(&mut self, font: FontSpec) -> Result<(), SurfaceError> {
        self.both(|s| s.set_font(font.clone()))
    }

    fn set_clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.both(|s| s.set_clip(outline))
    }

    fn clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.both(|s| s.clip(outline))
    }

    fn clear_clip(&mut self) -> Result<(), SurfaceError> {
        self.both(|s| s.clear_clip())
    }

    fn set_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.both(|s| s.set_transform(transform))
    }

    fn concat_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.both(|s| s.concat_transform(transform))
    }

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), SurfaceError> {
        self.both(|s| s.translate(dx, dy))
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), SurfaceError> {
        self.both(|s| s.scale(sx, sy))
    }

    fn rotate(&mut self, theta: f32) -> Result<(), SurfaceError> {
        self.both(|s| s.rotate(theta))
    }

    fn rotate_about(&mut self, theta: f32, center: Vec2) -> Result<(), SurfaceError> {
        self.both(|s| s.rotate_about(theta, center))
    }

    fn shear(&mut self, shx: f32, shy: f32) -> Result<(), SurfaceError> {
        self.both(|s| s.shear(shx, shy))
    }

    fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), SurfaceError> {
        self.both(|s| s.set_hint(key, value))
    }

    // ── getters (primary) ─────────────────────────────────────────────────

    fn color(&self) -> Color {
        self.primary.color()
    }

    fn paint(&self) -> Paint {
        self.primary.paint()
    }

    fn stroke(&self) -> Stroke {
        self.primary.stroke()
    }

    fn composite(&self) -> Composite {
        self.primary.composite()
    }

    fn font(&self) -> FontSpec {
        self.primary.font()
    }

    fn clip_bounds(&self) -> Option<Rect> {
        self.primary.clip_bounds()
    }

    fn transform(&self) -> Transform {
        self.primary.transform()
    }

    fn hint(&self, key: HintKey) -> Option<HintValue> {
        self.primary.hint(key)
    }

    // ── geometry ──────────────────────────────────────────────────────────

    fn draw_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_outline(outline))
    }

    fn fill_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.both(|s| s.fill_outline(outline))
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_line(from, to))
    }

    fn draw_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_rect(rect))
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.both(|s| s.fill_rect(rect))
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.both(|s| s.clear_rect(rect))
    }

    fn draw_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_round_rect(rect, radii))
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.both(|s| s.fill_round_rect(rect, radii))
    }

    fn draw_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_oval(bounds))
    }

    fn fill_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.both(|s| s.fill_oval(bounds))
    }

    fn draw_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_arc(bounds, start, sweep))
    }

    fn fill_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.both(|s| s.fill_arc(bounds, start, sweep))
    }

    fn draw_polyline(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_polyline(points))
    }

    fn draw_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_polygon(points))
    }

    fn fill_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.both(|s| s.fill_polygon(points))
    }

    // ── raster & text ─────────────────────────────────────────────────────

    fn draw_image(&mut self, image: &ImageRef, at: Vec2) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_image(image, at))
    }

    fn draw_image_transformed(
        &mut self,
        image: &ImageRef,
        transform: Transform,
    ) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_image_transformed(image, transform))
    }

    fn draw_text(&mut self, text: &str, at: Vec2) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_text(text, at))
    }

    fn draw_glyphs(&mut self, run: &GlyphRun, at: Vec2) -> Result<(), SurfaceError> {
        self.both(|s| s.draw_glyphs(run, at))
    }

    // ── derivation & lifecycle ────────────────────────────────────────────

    fn create_child(&mut self, region: Option<Rect>) -> Result<Box<dyn Surface>, SurfaceError> {
        let primary = self.primary.create_child(region)?;
        let secondary = self.secondary.create_child(region)?;
        Ok(Box::new(SplitterSurface::new(primary, secondary)))
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        self.both(|s| s.dispose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurrogateSurface;

    #[test]
    fn drawing_reaches_both_targets() {
        let a = SurrogateSurface::new();
        let b = SurrogateSurface::new();
        let bounds_a = a.used_bounds_handle();
        let bounds_b = b.used_bounds_handle();

        let mut split = SplitterSurface::new(Box::new(a), Box::new(b));
        split.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0)).unwrap();

        assert_eq!(bounds_a.get(), Some(Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert_eq!(bounds_b.get(), Some(Rect::new(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn children_stay_paired() {
        let a = SurrogateSurface::new();
        let b = SurrogateSurface::new();
        let bounds_b = b.used_bounds_handle();

        let mut split = SplitterSurface::new(Box::new(a), Box::new(b));
        let mut child = split.create_child(None).unwrap();
        child.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();

        assert_eq!(bounds_b.get(), Some(Rect::new(0.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn secondary_failure_is_reported() {
        let a = SurrogateSurface::new();
        let mut b = SurrogateSurface::new();
        b.dispose().unwrap();

        let mut split = SplitterSurface::new(Box::new(a), Box::new(b));
        assert!(split.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).is_err());
    }
}
