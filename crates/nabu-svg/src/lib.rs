//! SVG output for the nabu engine.
//!
//! Three pieces:
//! - [`SvgSurface`]: a live [`nabu_engine::surface::Surface`] that
//!   serializes every drawing call into SVG elements;
//! - [`SvgWriter`] / [`SvgOutput`]: a two-pass writer (measure with a
//!   surrogate, then emit) driven through the engine's threaded hand-off,
//!   exposed behind the ordinary draw-then-complete output contract;
//! - [`SvgProvider`]: the format registration for an explicit
//!   [`nabu_engine::handoff::ProviderRegistry`].

mod surface;
mod writer;

pub use surface::{SvgDoc, SvgSurface};
pub use writer::{open_svg, SvgOutput, SvgProvider, SvgWriter};

use std::sync::Arc;

use nabu_engine::handoff::ProviderRegistry;

/// Registers the SVG format on `registry`.
pub fn register(registry: &mut ProviderRegistry) {
    registry.register(Arc::new(SvgProvider));
}
