use std::io::Write;

use log::debug;

use nabu_engine::coords::Transform;
use nabu_engine::handoff::{
    HandoffError, ImageOrientation, OutputOptions, OutputSurfaceOps, RenderGate, SurfaceProvider,
    SurfaceWriter, ThreadedSurfaceWriter,
};
use nabu_engine::surface::{Surface, SurfaceError, SurrogateSurface};

use crate::{SvgDoc, SvgSurface};

/// Two-pass SVG writer.
///
/// Pass one draws into a surrogate to measure the content extent (used for
/// the page size when the options leave it open); pass two replays the
/// session into an [`SvgSurface`] and the assembled document is written to
/// the output stream. Run it through a
/// [`ThreadedSurfaceWriter`] rather than calling `write` yourself.
pub struct SvgWriter {
    out: Box<dyn Write + Send>,
    options: OutputOptions,
    doc: SvgDoc,
}

impl SvgWriter {
    pub fn new(out: Box<dyn Write + Send>, options: OutputOptions) -> Self {
        Self {
            out,
            options,
            doc: SvgDoc::new(),
        }
    }
}

impl SurfaceWriter for SvgWriter {
    fn placement(&self) -> Transform {
        if self.options.width == 0 || self.options.height == 0 {
            Transform::IDENTITY
        } else {
            self.options
                .orientation
                .placement(self.options.width, self.options.height)
        }
    }

    fn write(&mut self, gate: &mut RenderGate<'_>) -> anyhow::Result<()> {
        debug!("svg: measure pass");
        let measure = SurrogateSurface::new();
        let extent = measure.used_bounds_handle();
        gate.render(Box::new(measure))?;

        debug!("svg: emit pass");
        gate.render(Box::new(SvgSurface::new(self.doc.clone())))?;

        let (width, height) = if self.options.width > 0 && self.options.height > 0 {
            let (w, h) = self
                .options
                .orientation
                .oriented_size(self.options.width, self.options.height);
            (w as f32, h as f32)
        } else {
            // Open page size: size the viewBox to the measured content.
            let bounds = extent.get().unwrap_or_default();
            (bounds.max().x.max(1.0).ceil(), bounds.max().y.max(1.0).ceil())
        };

        debug!("svg: writing document ({width} x {height}, {} elements)", self.doc.element_count());
        self.out.write_all(self.doc.render(width, height).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// An opened SVG output: draw through [`create_graphics`]
/// (recording happens transparently), then call [`image_complete`] once to
/// run the replay pass and write the document.
///
/// [`create_graphics`]: OutputSurfaceOps::create_graphics
/// [`image_complete`]: OutputSurfaceOps::image_complete
pub struct SvgOutput {
    controller: ThreadedSurfaceWriter,
    options: OutputOptions,
}

/// Opens an SVG output over `out`.
///
/// Blocks briefly while the writer thread starts and supplies the first
/// recording surface.
pub fn open_svg(
    out: Box<dyn Write + Send>,
    options: OutputOptions,
) -> Result<SvgOutput, HandoffError> {
    let controller = ThreadedSurfaceWriter::start(SvgWriter::new(out, options))?;
    Ok(SvgOutput { controller, options })
}

impl OutputSurfaceOps for SvgOutput {
    fn width(&self) -> u32 {
        self.options.width
    }

    fn height(&self) -> u32 {
        self.options.height
    }

    fn orientation(&self) -> ImageOrientation {
        self.options.orientation
    }

    fn create_graphics(&mut self) -> Result<Box<dyn Surface>, SurfaceError> {
        Ok(Box::new(self.controller.create_graphics()))
    }

    fn image_complete(&mut self) -> Result<(), HandoffError> {
        self.controller.image_complete()
    }
}

/// SVG format registration.
pub struct SvgProvider;

impl SurfaceProvider for SvgProvider {
    fn format_name(&self) -> &'static str {
        "svg"
    }

    fn file_suffixes(&self) -> &'static [&'static str] {
        &["svg"]
    }

    fn media_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn open(
        &self,
        out: Box<dyn Write + Send>,
        options: OutputOptions,
    ) -> anyhow::Result<Box<dyn OutputSurfaceOps>> {
        Ok(Box::new(open_svg(out, options)?))
    }
}
