use thiserror::Error;

use crate::coords::{CaptureError, CornerRadii, Outline, Rect, Transform, TransformError, Vec2};
use crate::paint::{Color, Composite, Paint, Stroke};
use crate::raster::ImageRef;
use crate::text::{FontSpec, GlyphRun};

use super::{HintKey, HintValue};

/// Failure of a single surface operation.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A shape argument could not be copied for the command journal.
    #[error("argument capture failed")]
    Capture(#[from] CaptureError),

    /// A transform needed by the operation was degenerate.
    #[error("bad transform")]
    Transform(#[from] TransformError),

    /// The surface was already disposed.
    #[error("surface has been disposed")]
    Disposed,

    /// The target does not implement this capability.
    #[error("`{0}` is not supported by this surface")]
    Unsupported(&'static str),

    /// No live surface is bound to this drawing context, typically because
    /// the owning recorder was reset or its base surface was detached.
    #[error("no live surface is bound to this drawing context")]
    Unbound,
}

/// The 2D drawing-surface capability set.
///
/// Mutating operations return `Result` so problems surface at the failing
/// call. Pure getters read the surface's *live* state and are meaningful
/// only for values the caller itself established through the corresponding
/// setter; defaults differ between surfaces and are not replay-stable. This
/// is a deliberate caller contract: code that needs a particular stroke or
/// font sets it rather than relying on what a fresh surface happens to
/// report.
///
/// Transform convention: `set_transform` replaces the user-to-device
/// transform; `concat_transform` and the translate/scale/rotate/shear
/// helpers compose their argument *before* the current transform (the
/// argument applies to geometry first), matching the usual 2D API shape.
pub trait Surface: Send {
    // ── state setters ─────────────────────────────────────────────────────

    /// Sets the paint to a solid color. Equivalent to
    /// `set_paint(Paint::Solid(color))`.
    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError>;

    fn set_paint(&mut self, paint: Paint) -> Result<(), SurfaceError>;

    fn set_stroke(&mut self, stroke: Stroke) -> Result<(), SurfaceError>;

    fn set_composite(&mut self, composite: Composite) -> Result<(), SurfaceError>;

    fn set_font(&mut self, font: FontSpec) -> Result<(), SurfaceError>;

    /// Replaces the clip with `outline` (interpreted in user space).
    fn set_clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError>;

    /// Intersects the current clip with `outline`.
    fn clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError>;

    /// Removes any clip.
    fn clear_clip(&mut self) -> Result<(), SurfaceError>;

    fn set_transform(&mut self, transform: Transform) -> Result<(), SurfaceError>;

    fn concat_transform(&mut self, transform: Transform) -> Result<(), SurfaceError>;

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), SurfaceError>;

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), SurfaceError>;

    fn rotate(&mut self, theta: f32) -> Result<(), SurfaceError>;

    fn rotate_about(&mut self, theta: f32, center: Vec2) -> Result<(), SurfaceError>;

    fn shear(&mut self, shx: f32, shy: f32) -> Result<(), SurfaceError>;

    fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), SurfaceError>;

    // ── getters (live state only) ─────────────────────────────────────────

    fn color(&self) -> Color;

    fn paint(&self) -> Paint;

    fn stroke(&self) -> Stroke;

    fn composite(&self) -> Composite;

    fn font(&self) -> FontSpec;

    /// Device-space bounds of the current clip, `None` when unclipped.
    fn clip_bounds(&self) -> Option<Rect>;

    fn transform(&self) -> Transform;

    fn hint(&self, key: HintKey) -> Option<HintValue>;

    // ── geometry ──────────────────────────────────────────────────────────

    /// Strokes the outline with the current stroke and paint.
    fn draw_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError>;

    /// Fills the outline with the current paint under its fill rule.
    fn fill_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError>;

    fn draw_line(&mut self, from: Vec2, to: Vec2) -> Result<(), SurfaceError>;

    fn draw_rect(&mut self, rect: Rect) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SurfaceError>;

    /// Clears the rectangle to the surface's background, ignoring the
    /// current paint and composite.
    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError>;

    fn draw_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError>;

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError>;

    /// Strokes the ellipse inscribed in `bounds`.
    fn draw_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError>;

    fn fill_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError>;

    /// Strokes the elliptical arc inscribed in `bounds`, starting at
    /// `start` radians and sweeping `sweep` radians.
    fn draw_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError>;

    /// Fills the pie wedge of the elliptical arc.
    fn fill_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError>;

    fn draw_polyline(&mut self, points: &[Vec2]) -> Result<(), SurfaceError>;

    fn draw_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError>;

    fn fill_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError>;

    // ── raster & text ─────────────────────────────────────────────────────

    /// Draws the image with its top-left corner at `at`, one image pixel
    /// per logical pixel before the current transform.
    fn draw_image(&mut self, image: &ImageRef, at: Vec2) -> Result<(), SurfaceError>;

    /// Draws the image mapped through `transform` (composed before the
    /// current transform).
    fn draw_image_transformed(
        &mut self,
        image: &ImageRef,
        transform: Transform,
    ) -> Result<(), SurfaceError>;

    /// Draws text with the current font and paint; `at` is the baseline
    /// origin.
    fn draw_text(&mut self, text: &str, at: Vec2) -> Result<(), SurfaceError>;

    /// Draws a pre-shaped glyph run; `at` is the baseline origin.
    fn draw_glyphs(&mut self, run: &GlyphRun, at: Vec2) -> Result<(), SurfaceError>;

    // ── derivation & lifecycle ────────────────────────────────────────────

    /// Derives a child surface sharing the output device.
    ///
    /// The child starts with a copy of this surface's state. When `region`
    /// is given, the child is additionally clipped to it (user space).
    /// Children must be disposed by the caller; disposing the child never
    /// disposes the parent.
    fn create_child(&mut self, region: Option<Rect>) -> Result<Box<dyn Surface>, SurfaceError>;

    /// Releases the drawing context. Further mutating calls fail with
    /// [`SurfaceError::Disposed`].
    fn dispose(&mut self) -> Result<(), SurfaceError>;
}
