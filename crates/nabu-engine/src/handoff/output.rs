use std::io::Write;
use std::sync::Arc;

use crate::coords::Transform;
use crate::surface::{Surface, SurfaceError};

use super::HandoffError;

/// Page orientation for output formats with a fixed page coordinate frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ImageOrientation {
    #[default]
    Normal,
    Clockwise90,
    CounterClockwise90,
}

impl ImageOrientation {
    /// Placement transform mapping a `width` x `height` drawing onto the
    /// oriented page. Identity for [`Normal`](Self::Normal).
    pub fn placement(self, width: u32, height: u32) -> Transform {
        use core::f32::consts::FRAC_PI_2;
        match self {
            ImageOrientation::Normal => Transform::IDENTITY,
            ImageOrientation::Clockwise90 => {
                Transform::rotation(FRAC_PI_2).then(Transform::translation(height as f32, 0.0))
            }
            ImageOrientation::CounterClockwise90 => {
                Transform::rotation(-FRAC_PI_2).then(Transform::translation(0.0, width as f32))
            }
        }
    }

    /// The page size once the orientation is applied.
    pub fn oriented_size(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            ImageOrientation::Normal => (width, height),
            _ => (height, width),
        }
    }
}

/// Options for opening an output surface.
///
/// A zero width or height asks the format to derive the page size from the
/// drawn content, where the format supports that; formats with mandatory
/// dimensions reject it from `open`.
#[derive(Debug, Copy, Clone, Default)]
pub struct OutputOptions {
    pub width: u32,
    pub height: u32,
    pub orientation: ImageOrientation,
}

impl OutputOptions {
    pub fn sized(width: u32, height: u32) -> Self {
        Self { width, height, orientation: ImageOrientation::Normal }
    }

    pub fn with_orientation(mut self, orientation: ImageOrientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// The caller-facing shape of an opened output: obtain drawing contexts,
/// draw, then signal completion exactly once.
///
/// Implementations wrap either a direct single-pass encoder or a
/// [`super::ThreadedSurfaceWriter`] for callback-driven formats; the caller
/// cannot tell the difference.
pub trait OutputSurfaceOps {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn orientation(&self) -> ImageOrientation;

    /// A drawing context for the output. May be called repeatedly; all
    /// contexts address the same page.
    fn create_graphics(&mut self) -> Result<Box<dyn Surface>, SurfaceError>;

    /// Finishes the output, flushing (but not closing) the underlying
    /// stream. Calling it twice is a protocol error.
    fn image_complete(&mut self) -> Result<(), HandoffError>;
}

/// One output format: identification plus the ability to open an output
/// over a byte stream.
pub trait SurfaceProvider: Send + Sync {
    /// Short format name, e.g. `"svg"`.
    fn format_name(&self) -> &'static str;

    /// File suffixes (without the dot) the format claims.
    fn file_suffixes(&self) -> &'static [&'static str];

    /// Media type, e.g. `"image/svg+xml"`.
    fn media_type(&self) -> &'static str;

    fn open(
        &self,
        out: Box<dyn Write + Send>,
        options: OutputOptions,
    ) -> anyhow::Result<Box<dyn OutputSurfaceOps>>;
}

/// Explicit format registry.
///
/// Built once at startup from whatever providers the application links in
/// and passed to the code that needs it. There is no process-global
/// registry and no lazy discovery; a registry's contents are exactly what
/// was registered on it.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SurfaceProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn SurfaceProvider>) {
        self.providers.push(provider);
    }

    /// Lookup by format name, case-insensitive.
    pub fn by_format_name(&self, name: &str) -> Option<&Arc<dyn SurfaceProvider>> {
        self.providers
            .iter()
            .find(|p| p.format_name().eq_ignore_ascii_case(name))
    }

    /// Lookup by file suffix, case-insensitive, tolerating a leading dot.
    pub fn by_suffix(&self, suffix: &str) -> Option<&Arc<dyn SurfaceProvider>> {
        let suffix = suffix.strip_prefix('.').unwrap_or(suffix);
        self.providers.iter().find(|p| {
            p.file_suffixes()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(suffix))
        })
    }

    /// Lookup by media type, case-insensitive.
    pub fn by_media_type(&self, media_type: &str) -> Option<&Arc<dyn SurfaceProvider>> {
        self.providers
            .iter()
            .find(|p| p.media_type().eq_ignore_ascii_case(media_type))
    }

    /// Registered format names, in registration order.
    pub fn format_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.format_name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
