use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use base64::Engine as _;

use nabu_engine::coords::{
    CornerRadii, Outline, Path, Rect, Segment, Transform, Vec2,
};
use nabu_engine::paint::{Color, Composite, Paint, Stroke};
use nabu_engine::raster::ImageRef;
use nabu_engine::surface::{
    HintKey, HintValue, Surface, SurfaceError, SurfaceState,
};
use nabu_engine::text::{FontSpec, FontStyle, FontWeight, GlyphRun};

struct DocInner {
    elements: Vec<String>,
    defs: Vec<String>,
    next_id: usize,
}

/// Shared, ordered element buffer for one SVG document.
///
/// All surfaces derived from one root (children included) append here, so
/// interleaved child drawing serializes in call order. Keep a clone to
/// assemble the document after drawing has finished.
#[derive(Clone)]
pub struct SvgDoc {
    inner: Arc<Mutex<DocInner>>,
}

impl Default for SvgDoc {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgDoc {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DocInner {
                elements: Vec::new(),
                defs: Vec::new(),
                next_id: 0,
            })),
        }
    }

    fn push(&self, element: String) {
        self.lock().elements.push(element);
    }

    /// Adds a def whose body is produced from a fresh id, and returns that
    /// id (e.g. `clip3`, `grad7`).
    fn add_def(&self, prefix: &str, body: impl FnOnce(&str) -> String) -> String {
        let mut inner = self.lock();
        let id = format!("{prefix}{}", inner.next_id);
        inner.next_id += 1;
        let def = body(&id);
        inner.defs.push(def);
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DocInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of emitted elements (defs excluded).
    pub fn element_count(&self) -> usize {
        self.lock().elements.len()
    }

    /// Assembles the complete document for a `width` x `height` viewBox.
    pub fn render(&self, width: f32, height: f32) -> String {
        let inner = self.lock();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        if !inner.defs.is_empty() {
            let _ = writeln!(out, "<defs>");
            for def in &inner.defs {
                let _ = writeln!(out, "{def}");
            }
            let _ = writeln!(out, "</defs>");
        }
        for element in &inner.elements {
            let _ = writeln!(out, "{element}");
        }
        out.push_str("</svg>\n");
        out
    }
}

/// A live drawing surface that serializes calls into SVG elements.
///
/// Each element carries the full state it was drawn with (transform, paint,
/// stroke, opacity, clip reference), so element order is the only ordering
/// that matters and child surfaces can interleave freely.
pub struct SvgSurface {
    doc: SvgDoc,
    state: SurfaceState,
    /// Def id of the active clip path, if a clip is set.
    clip_id: Option<String>,
    disposed: bool,
}

impl SvgSurface {
    pub fn new(doc: SvgDoc) -> Self {
        Self {
            doc,
            state: SurfaceState::new(),
            clip_id: None,
            disposed: false,
        }
    }

    pub fn doc(&self) -> &SvgDoc {
        &self.doc
    }

    fn live(&self) -> Result<(), SurfaceError> {
        if self.disposed {
            Err(SurfaceError::Disposed)
        } else {
            Ok(())
        }
    }

    // ── attribute assembly ────────────────────────────────────────────────

    fn common_attrs(&self) -> String {
        let mut attrs = String::new();
        let t = self.state.transform;
        if !t.is_identity() {
            let _ = write!(
                attrs,
                " transform=\"matrix({} {} {} {} {} {})\"",
                t.m11, t.m21, t.m12, t.m22, t.dx, t.dy
            );
        }
        let alpha = self.state.composite.alpha;
        if alpha < 1.0 {
            let _ = write!(attrs, " opacity=\"{alpha}\"");
        }
        attrs
    }

    fn paint_value(&self, paint: &Paint) -> (String, f32) {
        match paint {
            Paint::Solid(c) => (css_color(*c), c.a),
            Paint::LinearGradient(g) => {
                let g = g.clone();
                let id = self.doc.add_def("grad", |id| {
                    let mut def = format!(
                        "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">",
                        g.start.x, g.start.y, g.end.x, g.end.y
                    );
                    for stop in &g.stops {
                        let _ = write!(
                            def,
                            "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
                            stop.t,
                            css_color(stop.color),
                            stop.color.a
                        );
                    }
                    def.push_str("</linearGradient>");
                    def
                });
                (format!("url(#{id})"), 1.0)
            }
        }
    }

    fn fill_attrs(&self) -> String {
        let (value, alpha) = self.paint_value(&self.state.paint);
        let mut attrs = format!(" fill=\"{value}\"");
        if alpha < 1.0 {
            let _ = write!(attrs, " fill-opacity=\"{alpha}\"");
        }
        attrs
    }

    fn stroke_attrs(&self) -> String {
        let (value, alpha) = self.paint_value(&self.state.paint);
        let stroke = &self.state.stroke;
        let mut attrs = format!(" fill=\"none\" stroke=\"{value}\" stroke-width=\"{}\"", stroke.width);
        if alpha < 1.0 {
            let _ = write!(attrs, " stroke-opacity=\"{alpha}\"");
        }
        match stroke.cap {
            nabu_engine::paint::LineCap::Butt => {}
            nabu_engine::paint::LineCap::Round => attrs.push_str(" stroke-linecap=\"round\""),
            nabu_engine::paint::LineCap::Square => attrs.push_str(" stroke-linecap=\"square\""),
        }
        match stroke.join {
            nabu_engine::paint::LineJoin::Miter => {}
            nabu_engine::paint::LineJoin::Round => attrs.push_str(" stroke-linejoin=\"round\""),
            nabu_engine::paint::LineJoin::Bevel => attrs.push_str(" stroke-linejoin=\"bevel\""),
        }
        if let Some(dash) = &stroke.dash {
            let lengths: Vec<String> = dash.lengths.iter().map(|l| l.to_string()).collect();
            let _ = write!(attrs, " stroke-dasharray=\"{}\"", lengths.join(" "));
            if dash.offset != 0.0 {
                let _ = write!(attrs, " stroke-dashoffset=\"{}\"", dash.offset);
            }
        }
        attrs
    }

    fn emit(&self, element: String) -> Result<(), SurfaceError> {
        self.live()?;
        // Clip defs hold device-space geometry, so the reference must sit
        // outside the element's own transform.
        let element = match &self.clip_id {
            Some(id) => format!("<g clip-path=\"url(#{id})\">{element}</g>"),
            None => element,
        };
        self.doc.push(element);
        Ok(())
    }

    fn emit_shape(&self, body: &str, fill: bool) -> Result<(), SurfaceError> {
        let paint_attrs = if fill { self.fill_attrs() } else { self.stroke_attrs() };
        self.emit(format!("<{body}{paint_attrs}{}/>", self.common_attrs()))
    }

    fn round_rect_data(rect: Rect, radii: CornerRadii) -> String {
        let r = rect.normalized();
        let (x, y) = (r.origin.x, r.origin.y);
        let (w, h) = (r.size.x, r.size.y);
        let clamp = |v: f32| v.max(0.0).min(w / 2.0).min(h / 2.0);
        let (tl, tr, br, bl) = (
            clamp(radii.top_left),
            clamp(radii.top_right),
            clamp(radii.bottom_right),
            clamp(radii.bottom_left),
        );
        format!(
            "M{} {}H{}A{tr} {tr} 0 0 1 {} {}V{}A{br} {br} 0 0 1 {} {}H{}A{bl} {bl} 0 0 1 {} {}V{}A{tl} {tl} 0 0 1 {} {}Z",
            x + tl,
            y,
            x + w - tr,
            x + w,
            y + tr,
            y + h - br,
            x + w - br,
            y + h,
            x + bl,
            x,
            y + h - bl,
            y + tl,
            x + tl,
            y,
        )
    }

    fn arc_data(bounds: Rect, start: f32, sweep: f32, pie: bool) -> String {
        let r = bounds.normalized();
        let c = r.center();
        let rx = r.size.x / 2.0;
        let ry = r.size.y / 2.0;
        let point = |a: f32| Vec2::new(c.x + rx * a.cos(), c.y + ry * a.sin());
        let from = point(start);
        let to = point(start + sweep);
        let large = if sweep.abs() > core::f32::consts::PI { 1 } else { 0 };
        let dir = if sweep >= 0.0 { 1 } else { 0 };
        if pie {
            format!(
                "M{} {}L{} {}A{rx} {ry} 0 {large} {dir} {} {}Z",
                c.x, c.y, from.x, from.y, to.x, to.y
            )
        } else {
            format!("M{} {}A{rx} {ry} 0 {large} {dir} {} {}", from.x, from.y, to.x, to.y)
        }
    }
}

fn css_color(c: Color) -> String {
    let [r, g, b, _] = c.to_u8();
    format!("rgb({r},{g},{b})")
}

fn path_data(outline: &dyn Outline) -> String {
    let mut d = String::new();
    for seg in outline.segments() {
        match seg {
            Segment::MoveTo(p) => {
                let _ = write!(d, "M{} {}", p.x, p.y);
            }
            Segment::LineTo(p) => {
                let _ = write!(d, "L{} {}", p.x, p.y);
            }
            Segment::QuadTo { ctrl, to } => {
                let _ = write!(d, "Q{} {} {} {}", ctrl.x, ctrl.y, to.x, to.y);
            }
            Segment::CubicTo { ctrl1, ctrl2, to } => {
                let _ = write!(
                    d,
                    "C{} {} {} {} {} {}",
                    ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
                );
            }
            Segment::Close => d.push('Z'),
        }
    }
    d
}

fn fill_rule_attr(outline: &dyn Outline) -> &'static str {
    match outline.fill_rule() {
        nabu_engine::coords::FillRule::NonZero => "",
        nabu_engine::coords::FillRule::EvenOdd => " fill-rule=\"evenodd\"",
    }
}

fn points_attr(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

impl Surface for SvgSurface {
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
        self.register_clip(outline);
        Ok(())
    }

    fn clip(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        // SVG has no native clip intersection on one attribute; the state
        // keeps the intersected bounds and the newest outline wins in the
        // output.
        self.live()?;
        self.state.clip(outline);
        self.register_clip(outline);
        Ok(())
    }

    fn clear_clip(&mut self) -> Result<(), SurfaceError> {
        self.live()?;
        self.state.clear_clip();
        self.clip_id = None;
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
        self.emit_shape(&format!("path d=\"{}\"", path_data(outline)), false)
    }

    fn fill_outline(&mut self, outline: &dyn Outline) -> Result<(), SurfaceError> {
        self.emit_shape(
            &format!("path d=\"{}\"{}", path_data(outline), fill_rule_attr(outline)),
            true,
        )
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) -> Result<(), SurfaceError> {
        self.emit_shape(
            &format!("line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"", from.x, from.y, to.x, to.y),
            false,
        )
    }

    fn draw_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        let r = rect.normalized();
        self.emit_shape(
            &format!(
                "rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                r.origin.x, r.origin.y, r.size.x, r.size.y
            ),
            false,
        )
    }

    fn fill_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        let r = rect.normalized();
        self.emit_shape(
            &format!(
                "rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                r.origin.x, r.origin.y, r.size.x, r.size.y
            ),
            true,
        )
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), SurfaceError> {
        // Clearing paints page background over the region, ignoring the
        // current paint and composite.
        let r = rect.normalized();
        self.emit(format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"white\"{}/>",
            r.origin.x,
            r.origin.y,
            r.size.x,
            r.size.y,
            self.common_attrs()
        ))
    }

    fn draw_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.emit_shape(
            &format!("path d=\"{}\"", Self::round_rect_data(rect, radii)),
            false,
        )
    }

    fn fill_round_rect(&mut self, rect: Rect, radii: CornerRadii) -> Result<(), SurfaceError> {
        self.emit_shape(
            &format!("path d=\"{}\"", Self::round_rect_data(rect, radii)),
            true,
        )
    }

    fn draw_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        let r = bounds.normalized();
        let c = r.center();
        self.emit_shape(
            &format!(
                "ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                c.x,
                c.y,
                r.size.x / 2.0,
                r.size.y / 2.0
            ),
            false,
        )
    }

    fn fill_oval(&mut self, bounds: Rect) -> Result<(), SurfaceError> {
        let r = bounds.normalized();
        let c = r.center();
        self.emit_shape(
            &format!(
                "ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"",
                c.x,
                c.y,
                r.size.x / 2.0,
                r.size.y / 2.0
            ),
            true,
        )
    }

    fn draw_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.emit_shape(
            &format!("path d=\"{}\"", Self::arc_data(bounds, start, sweep, false)),
            false,
        )
    }

    fn fill_arc(&mut self, bounds: Rect, start: f32, sweep: f32) -> Result<(), SurfaceError> {
        self.emit_shape(
            &format!("path d=\"{}\"", Self::arc_data(bounds, start, sweep, true)),
            true,
        )
    }

    fn draw_polyline(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.emit_shape(&format!("polyline points=\"{}\"", points_attr(points)), false)
    }

    fn draw_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.emit_shape(&format!("polygon points=\"{}\"", points_attr(points)), false)
    }

    fn fill_polygon(&mut self, points: &[Vec2]) -> Result<(), SurfaceError> {
        self.emit_shape(&format!("polygon points=\"{}\"", points_attr(points)), true)
    }

    // ── raster & text ─────────────────────────────────────────────────────

    fn draw_image(&mut self, image: &ImageRef, at: Vec2) -> Result<(), SurfaceError> {
        self.live()?;
        let href = png_data_uri(image)?;
        self.emit(format!(
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"{href}\"{}/>",
            at.x,
            at.y,
            image.width(),
            image.height(),
            self.common_attrs()
        ))
    }

    fn draw_image_transformed(
        &mut self,
        image: &ImageRef,
        transform: Transform,
    ) -> Result<(), SurfaceError> {
        self.live()?;
        let href = png_data_uri(image)?;
        let t = transform.then(self.state.transform);
        self.emit(format!(
            "<image x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" href=\"{href}\" transform=\"matrix({} {} {} {} {} {})\"/>",
            image.width(),
            image.height(),
            t.m11,
            t.m21,
            t.m12,
            t.m22,
            t.dx,
            t.dy
        ))
    }

    fn draw_text(&mut self, text: &str, at: Vec2) -> Result<(), SurfaceError> {
        self.live()?;
        let font = &self.state.font;
        let mut attrs = format!(
            " font-family=\"{}\" font-size=\"{}\"",
            escape_text(&font.family),
            font.size
        );
        match font.weight {
            FontWeight::Normal => {}
            FontWeight::Medium => attrs.push_str(" font-weight=\"500\""),
            FontWeight::Bold => attrs.push_str(" font-weight=\"bold\""),
        }
        match font.style {
            FontStyle::Normal => {}
            FontStyle::Italic => attrs.push_str(" font-style=\"italic\""),
            FontStyle::Oblique => attrs.push_str(" font-style=\"oblique\""),
        }
        let fill = self.fill_attrs();
        self.emit(format!(
            "<text x=\"{}\" y=\"{}\"{attrs}{fill}{}>{}</text>",
            at.x,
            at.y,
            self.common_attrs(),
            escape_text(text)
        ))
    }

    fn draw_glyphs(&mut self, _run: &GlyphRun, _at: Vec2) -> Result<(), SurfaceError> {
        // Raw glyph ids cannot be rendered without the font they were
        // shaped against; callers targeting SVG should use `draw_text`.
        Err(SurfaceError::Unsupported("draw_glyphs"))
    }

    // ── derivation & lifecycle ────────────────────────────────────────────

    fn create_child(&mut self, region: Option<Rect>) -> Result<Box<dyn Surface>, SurfaceError> {
        self.live()?;
        let mut child = SvgSurface {
            doc: self.doc.clone(),
            state: self.state.clone(),
            clip_id: self.clip_id.clone(),
            disposed: false,
        };
        if let Some(region) = region {
            child.clip(&Path::rect(region))?;
        }
        Ok(Box::new(child))
    }

    fn dispose(&mut self) -> Result<(), SurfaceError> {
        self.disposed = true;
        Ok(())
    }
}

impl SvgSurface {
    /// Registers a clipPath def for `outline` (interpreted in the current
    /// user space) and makes it the active clip reference.
    fn register_clip(&mut self, outline: &dyn Outline) {
        let d = path_data(outline);
        let transform = self.state.transform;
        let id = self.doc.add_def("clip", |id| {
            if transform.is_identity() {
                format!("<clipPath id=\"{id}\"><path d=\"{d}\"/></clipPath>")
            } else {
                format!(
                    "<clipPath id=\"{id}\"><path d=\"{d}\" transform=\"matrix({} {} {} {} {} {})\"/></clipPath>",
                    transform.m11,
                    transform.m21,
                    transform.m12,
                    transform.m22,
                    transform.dx,
                    transform.dy
                )
            }
        });
        self.clip_id = Some(id);
    }
}

fn png_data_uri(image: &ImageRef) -> Result<String, SurfaceError> {
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
    image
        .pixels()
        .write_with_encoder(encoder)
        .map_err(|_| SurfaceError::Unsupported("draw_image"))?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:image/png;base64,{payload}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_emits_rect_element() {
        let doc = SvgDoc::new();
        let mut s = SvgSurface::new(doc.clone());
        s.set_color(Color::RED).unwrap();
        s.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();

        let svg = doc.render(10.0, 10.0);
        assert!(svg.contains("<rect x=\"1\" y=\"2\" width=\"3\" height=\"4\""));
        assert!(svg.contains("fill=\"rgb(255,0,0)\""));
    }

    #[test]
    fn transform_is_attached_to_elements() {
        let doc = SvgDoc::new();
        let mut s = SvgSurface::new(doc.clone());
        s.translate(10.0, 20.0).unwrap();
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();

        assert!(doc.render(1.0, 1.0).contains("matrix(1 0 0 1 10 20)"));
    }

    #[test]
    fn children_share_the_document() {
        let doc = SvgDoc::new();
        let mut s = SvgSurface::new(doc.clone());
        let mut child = s.create_child(None).unwrap();
        child.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        s.fill_rect(Rect::new(2.0, 2.0, 1.0, 1.0)).unwrap();

        assert_eq!(doc.element_count(), 2);
    }

    #[test]
    fn text_is_escaped() {
        let doc = SvgDoc::new();
        let mut s = SvgSurface::new(doc.clone());
        s.draw_text("a < b & c", Vec2::new(0.0, 10.0)).unwrap();
        assert!(doc.render(1.0, 1.0).contains("a &lt; b &amp; c"));
    }

    #[test]
    fn disposed_surface_rejects_drawing() {
        let doc = SvgDoc::new();
        let mut s = SvgSurface::new(doc);
        s.dispose().unwrap();
        assert!(matches!(
            s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0)),
            Err(SurfaceError::Disposed)
        ));
    }
}
