//! Shared test double: a surface that logs every call it receives.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use nabu_engine::coords::{CornerRadii, Outline, Rect, Transform, Vec2};
use nabu_engine::paint::{Color, Composite, Paint, Stroke};
use nabu_engine::raster::ImageRef;
use nabu_engine::surface::{HintKey, HintValue, Surface, SurfaceError, SurfaceState};
use nabu_engine::text::{FontSpec, GlyphRun};

/// One logged call: which trace context received it, and a stable text
/// rendering of the operation and its arguments.
pub type TraceEvent = (u32, String);

#[derive(Clone, Default)]
pub struct TraceLog {
    events: Arc<Mutex<Vec<TraceEvent>>>,
    next_id: Arc<Mutex<u32>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Event strings without the context ids.
    pub fn ops(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, op)| op).collect()
    }

    fn push(&self, id: u32, op: String) {
        self.events.lock().unwrap().push((id, op));
    }

    fn alloc(&self) -> u32 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }
}

/// A live surface that records the calls it receives into a [`TraceLog`].
///
/// State setters also update a real [`SurfaceState`] so the recorder's
/// transform ledger and the getters behave as on a concrete surface.
pub struct TraceSurface {
    log: TraceLog,
    id: u32,
    state: SurfaceState,
    fail_on: Option<&'static str>,
}

impl TraceSurface {
    pub fn new() -> (Self, TraceLog) {
        let log = TraceLog::new();
        let surface = Self {
            id: log.alloc(),
            log: log.clone(),
            state: SurfaceState::new(),
            fail_on: None,
        };
        (surface, log)
    }

    /// A trace surface whose own starting transform is `base`, as if it
    /// were handed out by a device with that placement. The base is not
    /// logged.
    pub fn with_base(base: Transform) -> (Self, TraceLog) {
        let (mut surface, log) = Self::new();
        surface.state.transform = base;
        (surface, log)
    }

    /// Makes the named operation fail with `Unsupported`, for tests that
    /// need a target lacking a capability.
    pub fn fail_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn trace_id(&self) -> u32 {
        self.id
    }

    fn record(&self, op: &'static str, detail: String) -> Result<(), SurfaceError> {
        if self.fail_on == Some(op) {
            return Err(SurfaceError::Unsupported(op));
        }
        let text = if detail.is_empty() {
            op.to_owned()
        } else {
            format!("{op} {detail}")
        };
        self.log.push(self.id, text);
        Ok(())
    }
}

fn v(p: Vec2) -> String {
    format!("({},{})", p.x, p.y)
}

fn r(rect: Rect) -> String {
    format!("({},{},{},{})", rect.origin.x, rect.origin.y, rect.size.x, rect.size.y)
}

fn t(tr: Transform) -> String {
    format!("[{} {} {} {} {} {}]", tr.m11, tr.m12, tr.m21, tr.m22, tr.dx, tr.dy)
}

impl Surface for TraceSurface {
    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.record("set_color", format!("{:?}", color.to_u8()))?;
        self.state.set_color(color);
        Ok(())
    }

    fn set_paint(&mut self, paint: Paint) -> Result<(), SurfaceError> {
        let detail = match &paint {
            Paint::Solid(c) => format!("solid {:?}", c.to_u8()),
            Paint::LinearGradient(g) => format!("gradient {} stops", g.stops.len()),
        };
        self.record("set_paint", detail)?;
        self.state.set_paint(paint);
        Ok(())
    }

    fn set_stroke(&mut self, stroke: Stroke) -> Result<(), SurfaceError> {
        self.record("set_stroke", format!("w={}", stroke.width))?;
        self.state.stroke = stroke;
        Ok(())
    }

    fn set_composite(&mut self, composite: Composite) -> Result<(), SurfaceError> {
        self.record(
            "set_composite",
            format!("{:?}@{}", composite.mode, composite.alpha),
        )?;
        self.state.composite = composite;
        Ok(())
    }

    fn set_font(&mut self, font: FontSpec) -> Result<(), SurfaceError> {
        self.record("set_font", format!("{}@{}", font.family, font.size))?;
        self.state.font = font;
        Ok(())
    }

    fn set_clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.record("set_clip", format!("bounds={}", r(outline.bounds())))?;
        self.state.set_clip(outline);
        Ok(())
    }

    fn clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.record("clip", format!("bounds={}", r(outline.bounds())))?;
        self.state.clip(outline);
        Ok(())
    }

    fn clear_clip(&mut self) -> Result<(), SurfaceError> {
        self.record("clear_clip", String::new())?;
        self.state.clear_clip();
        Ok(())
    }

    fn set_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.record("set_transform", t(transform))?;
        self.state.transform = transform;
        Ok(())
    }

    fn concat_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.record("concat_transform", t(transform))?;
        self.state.concat(transform);
        Ok(())
    }

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), SurfaceError> {
        self.record("translate", format!("({dx},{dy})"))?;
        self.state.translate(dx, dy);
        Ok(())
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), SurfaceError> {
        self.record("scale", format!("({sx},{sy})"))?;
        self.state.scale(sx, sy);
        Ok(())
    }

    fn rotate(&mut self, theta: f32) -> Result<(), SurfaceError> {
        self.record("rotate", format!("{theta}"))?;
        self.state.rotate(theta);
        Ok(())
    }

    fn rotate_about(&mut self, theta: f32, center: Vec2) -> Result<(), SurfaceError> {
        self.record("rotate_about", format!("{theta} {}", v(center)))?;
        self.state.rotate_about(theta, center);
        Ok(())
    }

    fn shear(&mut self, shx: f32, shy: f32) -> Result<(), SurfaceError> {
        self.record("shear", format!("({shx},{shy})"))?;
        self.state.shear(shx, shy);
        Ok(())
    }

    fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), SurfaceError> {
        self.record("set_hint", format!("{key:?}={value:?}"))?;
        self.state.set_hint(key, value);
        Ok(())
    }

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

    fn draw_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.record("draw_outline", format!("bounds={}", r(outline.bounds())))
    }

    fn fill_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.record("fill_outline", format!("bounds={}", r(outline.bounds())))
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) -> Result<(), SurfaceError> {
        self.record("draw_line", format!("{}->{}", v(from), v(to)))
    }

    fn draw_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.record("draw_rect", r(rect))
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.record("fill_rect", r(rect))
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.record("clear_rect", r(rect))
    }

    fn draw_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.record("draw_round_rect", format!("{} r={}", r(rect), radii.max()))
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.record("fill_round_rect", format!("{} r={}", r(rect), radii.max()))
    }

    fn draw_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.record("draw_oval", r(bounds))
    }

    fn fill_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.record("fill_oval", r(bounds))
    }

    fn draw_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.record("draw_arc", format!("{} {start}+{sweep}", r(bounds)))
    }

    fn fill_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.record("fill_arc", format!("{} {start}+{sweep}", r(bounds)))
    }

    fn draw_polyline(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        let detail = points.iter().map(|p| v(*p)).collect::<Vec<_>>().join(" ");
        self.record("draw_polyline", detail)
    }

    fn draw_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        let detail = points.iter().map(|p| v(*p)).collect::<Vec<_>>().join(" ");
        self.record("draw_polygon", detail)
    }

    fn fill_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        let detail = points.iter().map(|p| v(*p)).collect::<Vec<_>>().join(" ");
        self.record("fill_polygon", detail)
    }

    fn draw_image(&mut self, image: &ImageRef, at: Vec2) -> Result<(), SurfaceError> {
        self.record(
            "draw_image",
            format!("{}x{} at {}", image.width(), image.height(), v(at)),
        )
    }

    fn draw_image_transformed(
        &mut self,
        image: &ImageRef,
        transform: Transform,
    ) -> Result<(), SurfaceError> {
        self.record(
            "draw_image_transformed",
            format!("{}x{} {}", image.width(), image.height(), t(transform)),
        )
    }

    fn draw_text(&mut self, text: &str, at: Vec2) -> Result<(), SurfaceError> {
        self.record("draw_text", format!("{text:?} at {}", v(at)))
    }

    fn draw_glyphs(&mut self, run: &GlyphRun, at: Vec2) -> Result<(), SurfaceError> {
        self.record(
            "draw_glyphs",
            format!("{} glyphs at {}", run.glyphs.len(), v(at)),
        )
    }

    fn create_child(&mut self, region: Option<Rect>) -> Result<Box<dyn Surface>, SurfaceError> {
        if self.fail_on == Some("create_child") {
            return Err(SurfaceError::Unsupported("create_child"));
        }
        let child_id = self.log.alloc();
        let detail = match region {
            Some(region) => format!("-> {child_id} region={}", r(region)),
            None => format!("-> {child_id}"),
        };
        self.log.push(self.id, format!("create_child {detail}"));

        let mut state = self.state.clone();
        if let Some(region) = region {
            state.clip_to_region(region);
        }
        Ok(Box::new(TraceSurface {
            log: self.log.clone(),
            id: child_id,
            state,
            fail_on: self.fail_on,
        }))
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        self.record("dispose", String::new())
    }
}
