//! Raster image payloads for `draw_image` calls.

use std::sync::Arc;

use crate::coords::Vec2;

/// Shared, immutable raster image.
///
/// Pixel data lives behind an `Arc` and is never mutated after
/// construction, so capturing an image argument in the command journal is a
/// reference-count bump and mutation isolation holds by construction.
#[derive(Clone)]
pub struct ImageRef {
    data: Arc<image::RgbaImage>,
}

impl ImageRef {
    #[inline]
    pub fn new(data: image::RgbaImage) -> Self {
        Self { data: Arc::new(data) }
    }

    /// Wraps raw RGBA8 bytes. Returns `None` when the buffer does not match
    /// `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        image::RgbaImage::from_raw(width, height, pixels).map(Self::new)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.data.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.data.height()
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    #[inline]
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.data
    }
}

/// Identity comparison: two refs are equal when they share the same pixels.
impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl std::fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRef")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
