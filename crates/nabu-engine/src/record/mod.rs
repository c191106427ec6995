//! The command journal: record a drawing session once, replay it against
//! any surface.
//!
//! Responsibilities:
//! - capture an independent copy of every mutable drawing argument
//!   ([`capture`], [`PathSnapshot`])
//! - keep the ordered command log and the handle table for derived child
//!   surfaces ([`Recorder`], [`BindingTable`])
//! - re-anchor absolute transforms to the replay target's own base
//!   transform ([`TransformLedger`])
//!
//! The journal is in-memory and process-local; it is not a persistence
//! format.

mod capture;
mod ledger;
mod op;
mod recorder;
mod registry;
mod snapshot;

pub use capture::{capture_outline, CapturedOutline};
pub use ledger::TransformLedger;
pub use op::{Cmd, Op};
pub use recorder::{Recorder, RecorderSurface, ReplayError};
pub use registry::{BindingTable, SurfaceId};
pub use snapshot::PathSnapshot;
