use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, trace};
use thiserror::Error;

use crate::coords::{CornerRadii, Outline, Rect, Transform, TransformError, Vec2};
use crate::paint::{Color, Composite, Paint, Stroke};
use crate::raster::ImageRef;
use crate::surface::{HintKey, HintValue, Surface, SurfaceError};
use crate::text::{FontSpec, GlyphRun};

use super::{capture_outline, BindingTable, Cmd, Op, SurfaceId, TransformLedger};

/// Replay failure, attributed to the failing command.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The replay target's own starting transform could not be inverted.
    #[error("replay target has a degenerate base transform")]
    Transform(#[from] TransformError),

    /// A command could not be executed against the target.
    #[error("command {index} ({op}) failed during replay")]
    Command {
        index: usize,
        op: &'static str,
        #[source]
        source: SurfaceError,
    },
}

struct RecorderInner {
    /// Live root surface (id 0) while recording. `None` after
    /// [`Recorder::detach_base`].
    base: Option<Box<dyn Surface>>,
    ledger: TransformLedger,
    log: Vec<Cmd>,
    /// Live child surfaces derived during recording.
    children: BindingTable,
    next_id: u32,
}

impl RecorderInner {
    fn push(&mut self, target: SurfaceId, op: Op) {
        trace!("record {} on {:?}", op.name(), target);
        self.log.push(Cmd::new(target, op));
    }

    fn bound_mut(&mut self, id: SurfaceId) -> Result<&mut (dyn Surface + 'static), SurfaceError> {
        if id.is_root() {
            self.base.as_deref_mut().ok_or(SurfaceError::Unbound)
        } else {
            self.children.get_mut(id).ok_or(SurfaceError::Unbound)
        }
    }

    /// Ids stay monotonic across [`Recorder::reset`] so a stale proxy can
    /// never silently alias a context from a later session.
    fn alloc_child(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// The command journal.
///
/// Wraps a live surface; every drawing call made through a proxy from
/// [`create_graphics`](Self::create_graphics) is captured into the ordered
/// command log *and* forwarded to the live surface, so drawing happens
/// immediately and can be repeated later with
/// [`playback`](Self::playback).
///
/// One internal mutex guards the log and the live bindings. The recorder
/// itself does not arbitrate which thread draws; the hand-off protocol in
/// `handoff` (or a single-threaded caller) must ensure one writer at a
/// time, because a command *sequence* is only meaningful as a whole.
///
/// Getters on the proxies read the live surface and are reliable only for
/// state the caller set itself; see [`Surface`] for the contract.
pub struct Recorder {
    inner: Mutex<RecorderInner>,
}

impl Recorder {
    /// Wraps `base` (bound as id 0). Fails when the surface's current
    /// transform is degenerate, since replays could never be re-anchored.
    pub fn new(base: Box<dyn Surface>) -> Result<Self, TransformError> {
        let ledger = TransformLedger::capture(base.as_ref())?;
        debug!("recorder created, base transform {:?}", ledger.base());
        Ok(Self {
            inner: Mutex::new(RecorderInner {
                base: Some(base),
                ledger,
                log: Vec::new(),
                children: BindingTable::new(),
                next_id: 1,
            }),
        })
    }

    fn lock_inner(&self) -> MutexGuard<'_, RecorderInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A drawing context over the root surface. May be called repeatedly;
    /// all root proxies share the root context's state.
    pub fn create_graphics(self: &Arc<Self>) -> RecorderSurface {
        RecorderSurface {
            recorder: Arc::clone(self),
            id: SurfaceId::ROOT,
        }
    }

    /// Number of captured commands.
    pub fn len(&self) -> usize {
        self.lock_inner().log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-executes every captured command, in order, against `target`.
    ///
    /// The root context is rebound to `target` and absolute transforms are
    /// re-anchored to `target`'s own starting transform. Child derivations
    /// replay too, rebuilding the same id sequence against fresh children
    /// of `target`. Failures propagate to the caller attributed to the
    /// failing command; the commands themselves are left untouched, so a
    /// replay can be attempted again on another target.
    ///
    /// The internal lock is held for the whole replay: recording and
    /// replaying can never interleave.
    pub fn playback(&self, target: &mut (dyn Surface + 'static)) -> Result<(), ReplayError> {
        let inner = self.lock_inner();
        let ledger = TransformLedger::capture(target)?;
        debug!("replaying {} commands", inner.log.len());

        let mut children = BindingTable::new();
        for (index, cmd) in inner.log.iter().enumerate() {
            replay_cmd(cmd, &mut *target, &mut children, &ledger).map_err(|source| {
                ReplayError::Command { index, op: cmd.op.name(), source }
            })?;
        }
        Ok(())
    }

    /// Clears the command log and drops all live child bindings.
    ///
    /// Proxies obtained before the reset must not be used afterward; any
    /// use fails with [`SurfaceError::Unbound`] rather than drawing into a
    /// later session.
    pub fn reset(&self) {
        let mut inner = self.lock_inner();
        debug!("recorder reset, discarding {} commands", inner.log.len());
        inner.log.clear();
        inner.children.clear();
    }

    /// Releases the wrapped root surface back to the caller.
    ///
    /// Recording through existing proxies fails afterwards; replay is
    /// unaffected. Returns `None` when the base was already detached.
    pub fn detach_base(&self) -> Option<Box<dyn Surface>> {
        self.lock_inner().base.take()
    }
}

fn resolve<'a>(
    root: &'a mut (dyn Surface + 'static),
    children: &'a mut BindingTable,
    id: SurfaceId,
) -> Result<&'a mut (dyn Surface + 'static), SurfaceError> {
    if id.is_root() {
        Ok(root)
    } else {
        children.get_mut(id).ok_or(SurfaceError::Unbound)
    }
}

fn replay_cmd(
    cmd: &Cmd,
    root: &mut (dyn Surface + 'static),
    children: &mut BindingTable,
    ledger: &TransformLedger,
) -> Result<(), SurfaceError> {
    match &cmd.op {
        Op::CreateChild { child, region } => {
            let live = resolve(root, children, cmd.target)?.create_child(*region)?;
            children.bind(*child, live);
            Ok(())
        }
        // The replay target is borrowed; its lifecycle belongs to whoever
        // owns it. Child contexts were created by the replay and are
        // disposed by it.
        Op::Dispose if cmd.target.is_root() => Ok(()),
        op => {
            let surface = resolve(root, children, cmd.target)?;
            apply_op(surface, op, ledger)
        }
    }
}

fn apply_op(
    surface: &mut dyn Surface,
    op: &Op,
    ledger: &TransformLedger,
) -> Result<(), SurfaceError> {
    match op {
        Op::SetColor(color) => surface.set_color(*color),
        Op::SetPaint(paint) => surface.set_paint(paint.clone()),
        Op::SetStroke(stroke) => surface.set_stroke(stroke.clone()),
        Op::SetComposite(composite) => surface.set_composite(*composite),
        Op::SetFont(font) => surface.set_font(font.clone()),
        Op::SetClip(outline) => surface.set_clip(outline.as_outline()),
        Op::Clip(outline) => surface.clip(outline.as_outline()),
        Op::ClearClip => surface.clear_clip(),
        Op::SetTransform(t) => surface.set_transform(ledger.anchor(*t)),
        Op::ConcatTransform(t) => surface.concat_transform(*t),
        Op::Translate { dx, dy } => surface.translate(*dx, *dy),
        Op::Scale { sx, sy } => surface.scale(*sx, *sy),
        Op::Rotate { theta } => surface.rotate(*theta),
        Op::RotateAbout { theta, center } => surface.rotate_about(*theta, *center),
        Op::Shear { shx, shy } => surface.shear(*shx, *shy),
        Op::SetHint { key, value } => surface.set_hint(*key, *value),
        Op::DrawOutline(outline) => surface.draw_outline(outline.as_outline()),
        Op::FillOutline(outline) => surface.fill_outline(outline.as_outline()),
        Op::DrawLine { from, to } => surface.draw_line(*from, *to),
        Op::DrawRect(rect) => surface.draw_rect(*rect),
        Op::FillRect(rect) => surface.fill_rect(*rect),
        Op::ClearRect(rect) => surface.clear_rect(*rect),
        Op::DrawRoundRect { rect, radii } => surface.draw_round_rect(*rect, *radii),
        Op::FillRoundRect { rect, radii } => surface.fill_round_rect(*rect, *radii),
        Op::DrawOval(bounds) => surface.draw_oval(*bounds),
        Op::FillOval(bounds) => surface.fill_oval(*bounds),
        Op::DrawArc { bounds, start, sweep } => surface.draw_arc(*bounds, *start, *sweep),
        Op::FillArc { bounds, start, sweep } => surface.fill_arc(*bounds, *start, *sweep),
        Op::DrawPolyline(points) => surface.draw_polyline(points),
        Op::DrawPolygon(points) => surface.draw_polygon(points),
        Op::FillPolygon(points) => surface.fill_polygon(points),
        Op::DrawImage { image, at } => surface.draw_image(image, *at),
        Op::DrawImageTransformed { image, transform } => {
            surface.draw_image_transformed(image, *transform)
        }
        Op::DrawText { text, at } => surface.draw_text(text, *at),
        Op::DrawGlyphs { run, at } => surface.draw_glyphs(run, *at),
        // Handled in replay_cmd.
        Op::CreateChild { .. } | Op::Dispose => Ok(()),
    }
}

/// Recording drawing context handed to callers.
///
/// Captures every mutating call into the owning [`Recorder`] and forwards
/// it to the live surface currently bound to this context's id. Cheap to
/// clone; clones address the same context.
#[derive(Clone)]
pub struct RecorderSurface {
    recorder: Arc<Recorder>,
    id: SurfaceId,
}

impl RecorderSurface {
    /// The context's id within the owning journal (0 for the root).
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Records `op` and forwards it to the live bound surface in one
    /// locked step. Forwarding reuses the replay interpreter, so the live
    /// surface sees exactly what a replay target would (absolute
    /// transforms anchored to the recording-time base included).
    fn record(&self, op: Op) -> Result<(), SurfaceError> {
        let mut inner = self.recorder.lock_inner();
        let ledger = inner.ledger;
        inner.push(self.id, op.clone());
        apply_op(inner.bound_mut(self.id)?, &op, &ledger)
    }

    /// Reads a live value through the bound surface, or `fallback` when no
    /// surface is bound (detached or reset journal).
    fn read<R>(&self, fallback: R, f: impl FnOnce(&mut dyn Surface) -> R) -> R {
        let mut inner = self.recorder.lock_inner();
        match inner.bound_mut(self.id) {
            Ok(surface) => f(surface),
            Err(_) => fallback,
        }
    }
}

impl Surface for RecorderSurface {
    // ── state setters ─────────────────────────────────────────────────────

    fn set_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.record(Op::SetColor(color))
    }

    fn set_paint(&mut self, paint: Paint) -> Result<(), SurfaceError> {
        self.record(Op::SetPaint(paint))
    }

    fn set_stroke(&mut self, stroke: Stroke) -> Result<(), SurfaceError> {
        self.record(Op::SetStroke(stroke))
    }

    fn set_composite(&mut self, composite: Composite) -> Result<(), SurfaceError> {
        self.record(Op::SetComposite(composite))
    }

    fn set_font(&mut self, font: FontSpec) -> Result<(), SurfaceError> {
        self.record(Op::SetFont(font))
    }

    fn set_clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        let captured = capture_outline(outline)?;
        self.record(Op::SetClip(captured))
    }

    fn clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        let captured = capture_outline(outline)?;
        self.record(Op::Clip(captured))
    }

    fn clear_clip(&mut self) -> Result<(), SurfaceError> {
        self.record(Op::ClearClip)
    }

    fn set_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.record(Op::SetTransform(transform))
    }

    fn concat_transform(&mut self, transform: Transform) -> Result<(), SurfaceError> {
        self.record(Op::ConcatTransform(transform))
    }

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), SurfaceError> {
        self.record(Op::Translate { dx, dy })
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), SurfaceError> {
        self.record(Op::Scale { sx, sy })
    }

    fn rotate(&mut self, theta: f32) -> Result<(), SurfaceError> {
        self.record(Op::Rotate { theta })
    }

    fn rotate_about(&mut self, theta: f32, center: Vec2) -> Result<(), SurfaceError> {
        self.record(Op::RotateAbout { theta, center })
    }

    fn shear(&mut self, shx: f32, shy: f32) -> Result<(), SurfaceError> {
        self.record(Op::Shear { shx, shy })
    }

    fn set_hint(&mut self, key: HintKey, value: HintValue) -> Result<(), SurfaceError> {
        self.record(Op::SetHint { key, value })
    }

    // ── getters (live state; see trait docs) ──────────────────────────────

    fn color(&self) -> Color {
        self.read(Color::BLACK, |s| s.color())
    }

    fn paint(&self) -> Paint {
        self.read(Paint::default(), |s| s.paint())
    }

    fn stroke(&self) -> Stroke {
        self.read(Stroke::default(), |s| s.stroke())
    }

    fn composite(&self) -> Composite {
        self.read(Composite::default(), |s| s.composite())
    }

    fn font(&self) -> FontSpec {
        self.read(FontSpec::default(), |s| s.font())
    }

    fn clip_bounds(&self) -> Option<Rect> {
        self.read(None, |s| s.clip_bounds())
    }

    /// The live transform expressed relative to the session base, so the
    /// value corresponds to what the caller established rather than to the
    /// device the journal happens to be bound to.
    fn transform(&self) -> Transform {
        let mut inner = self.recorder.lock_inner();
        let ledger = inner.ledger;
        match inner.bound_mut(self.id) {
            Ok(s) => ledger.relativize(s.transform()),
            Err(_) => Transform::IDENTITY,
        }
    }

    fn hint(&self, key: HintKey) -> Option<HintValue> {
        self.read(None, |s| s.hint(key))
    }

    // ── geometry ──────────────────────────────────────────────────────────

    fn draw_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        let captured = capture_outline(outline)?;
        self.record(Op::DrawOutline(captured))
    }

    fn fill_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        let captured = capture_outline(outline)?;
        self.record(Op::FillOutline(captured))
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) -> Result<(), SurfaceError> {
        self.record(Op::DrawLine { from, to })
    }

    fn draw_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.record(Op::DrawRect(rect))
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.record(Op::FillRect(rect))
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        self.record(Op::ClearRect(rect))
    }

    fn draw_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.record(Op::DrawRoundRect { rect, radii })
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.record(Op::FillRoundRect { rect, radii })
    }

    fn draw_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.record(Op::DrawOval(bounds))
    }

    fn fill_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        self.record(Op::FillOval(bounds))
    }

    fn draw_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.record(Op::DrawArc { bounds, start, sweep })
    }

    fn fill_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.record(Op::FillArc { bounds, start, sweep })
    }

    fn draw_polyline(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.record(Op::DrawPolyline(points.to_vec()))
    }

    fn draw_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.record(Op::DrawPolygon(points.to_vec()))
    }

    fn fill_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.record(Op::FillPolygon(points.to_vec()))
    }

    // ── raster & text ─────────────────────────────────────────────────────

    fn draw_image(&mut self, image: &ImageRef, at: Vec2) -> Result<(), SurfaceError> {
        self.record(Op::DrawImage { image: image.clone(), at })
    }

    fn draw_image_transformed(
        &mut self,
        image: &ImageRef,
        transform: Transform,
    ) -> Result<(), SurfaceError> {
        self.record(Op::DrawImageTransformed { image: image.clone(), transform })
    }

    fn draw_text(&mut self, text: &str, at: Vec2) -> Result<(), SurfaceError> {
        self.record(Op::DrawText { text: text.to_owned(), at })
    }

    fn draw_glyphs(&mut self, run: &GlyphRun, at: Vec2) -> Result<(), SurfaceError> {
        self.record(Op::DrawGlyphs { run: run.clone(), at })
    }

    // ── derivation & lifecycle ────────────────────────────────────────────

    fn create_child(&mut self, region: Option<Rect>) -> Result<Box<dyn Surface>, SurfaceError> {
        let mut inner = self.recorder.lock_inner();
        let live_child = inner.bound_mut(self.id)?.create_child(region)?;
        let child = inner.alloc_child();
        inner.children.bind(child, live_child);
        inner.push(self.id, Op::CreateChild { child, region });
        drop(inner);
        Ok(Box::new(RecorderSurface {
            recorder: Arc::clone(&self.recorder),
            id: child,
        }))
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        let mut inner = self.recorder.lock_inner();
        inner.push(self.id, Op::Dispose);
        // The root surface belongs to whoever supplied it; only child
        // contexts created by this journal are actually released.
        if self.id.is_root() {
            return Ok(());
        }
        inner.bound_mut(self.id)?.dispose()
    }
}
