//! The drawing-surface capability contract and its adapter surfaces.
//!
//! One trait, several independent implementations sharing nothing but the
//! contract:
//! - concrete output surfaces (provided by format crates),
//! - the recording proxy (`record::RecorderSurface`),
//! - [`SurrogateSurface`]: a no-op sizing surface,
//! - [`SplitterSurface`]: mirrors every call to two surfaces.

mod capability;
mod hints;
mod splitter;
mod state;
mod surrogate;

pub use capability::{Surface, SurfaceError};
pub use hints::{HintKey, HintValue};
pub use splitter::SplitterSurface;
pub use state::SurfaceState;
pub use surrogate::{SurrogateSurface, UsedBounds};
