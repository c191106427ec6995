use crate::coords::{CornerRadii, Rect, Transform, Vec2};
use crate::paint::{Color, Composite, Paint, Stroke};
use crate::raster::ImageRef;
use crate::surface::{HintKey, HintValue};
use crate::text::{FontSpec, GlyphRun};

use super::{CapturedOutline, SurfaceId};

/// One captured drawing operation.
///
/// Every variant owns its arguments; once constructed an `Op` is never
/// mutated, so replaying it any number of times produces the same call.
#[derive(Debug, Clone)]
pub enum Op {
    // state
    SetColor(Color),
    SetPaint(Paint),
    SetStroke(Stroke),
    SetComposite(Composite),
    SetFont(FontSpec),
    SetClip(CapturedOutline),
    Clip(CapturedOutline),
    ClearClip,
    /// Stored exactly as the caller passed it; anchored to the session base
    /// at execution time.
    SetTransform(Transform),
    ConcatTransform(Transform),
    Translate { dx: f32, dy: f32 },
    Scale { sx: f32, sy: f32 },
    Rotate { theta: f32 },
    RotateAbout { theta: f32, center: Vec2 },
    Shear { shx: f32, shy: f32 },
    SetHint { key: HintKey, value: HintValue },

    // geometry
    DrawOutline(CapturedOutline),
    FillOutline(CapturedOutline),
    DrawLine { from: Vec2, to: Vec2 },
    DrawRect(Rect),
    FillRect(Rect),
    ClearRect(Rect),
    DrawRoundRect { rect: Rect, radii: CornerRadii },
    FillRoundRect { rect: Rect, radii: CornerRadii },
    DrawOval(Rect),
    FillOval(Rect),
    DrawArc { bounds: Rect, start: f32, sweep: f32 },
    FillArc { bounds: Rect, start: f32, sweep: f32 },
    DrawPolyline(Vec<Vec2>),
    DrawPolygon(Vec<Vec2>),
    FillPolygon(Vec<Vec2>),

    // raster & text
    DrawImage { image: ImageRef, at: Vec2 },
    DrawImageTransformed { image: ImageRef, transform: Transform },
    DrawText { text: String, at: Vec2 },
    DrawGlyphs { run: GlyphRun, at: Vec2 },

    // derivation & lifecycle
    CreateChild { child: SurfaceId, region: Option<Rect> },
    Dispose,
}

impl Op {
    /// Stable operation name for logs and replay errors.
    pub fn name(&self) -> &'static str {
        match self {
            Op::SetColor(_) => "set_color",
            Op::SetPaint(_) => "set_paint",
            Op::SetStroke(_) => "set_stroke",
            Op::SetComposite(_) => "set_composite",
            Op::SetFont(_) => "set_font",
            Op::SetClip(_) => "set_clip",
            Op::Clip(_) => "clip",
            Op::ClearClip => "clear_clip",
            Op::SetTransform(_) => "set_transform",
            Op::ConcatTransform(_) => "concat_transform",
            Op::Translate { .. } => "translate",
            Op::Scale { .. } => "scale",
            Op::Rotate { .. } => "rotate",
            Op::RotateAbout { .. } => "rotate_about",
            Op::Shear { .. } => "shear",
            Op::SetHint { .. } => "set_hint",
            Op::DrawOutline(_) => "draw_outline",
            Op::FillOutline(_) => "fill_outline",
            Op::DrawLine { .. } => "draw_line",
            Op::DrawRect(_) => "draw_rect",
            Op::FillRect(_) => "fill_rect",
            Op::ClearRect(_) => "clear_rect",
            Op::DrawRoundRect { .. } => "draw_round_rect",
            Op::FillRoundRect { .. } => "fill_round_rect",
            Op::DrawOval(_) => "draw_oval",
            Op::FillOval(_) => "fill_oval",
            Op::DrawArc { .. } => "draw_arc",
            Op::FillArc { .. } => "fill_arc",
            Op::DrawPolyline(_) => "draw_polyline",
            Op::DrawPolygon(_) => "draw_polygon",
            Op::FillPolygon(_) => "fill_polygon",
            Op::DrawImage { .. } => "draw_image",
            Op::DrawImageTransformed { .. } => "draw_image_transformed",
            Op::DrawText { .. } => "draw_text",
            Op::DrawGlyphs { .. } => "draw_glyphs",
            Op::CreateChild { .. } => "create_child",
            Op::Dispose => "dispose",
        }
    }
}

/// A captured operation aimed at one drawing context.
#[derive(Debug, Clone)]
pub struct Cmd {
    pub target: SurfaceId,
    pub op: Op,
}

impl Cmd {
    #[inline]
    pub fn new(target: SurfaceId, op: Op) -> Self {
        Self { target, op }
    }
}
