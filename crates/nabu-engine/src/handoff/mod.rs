//! Worker-thread hand-off between imperative callers and callback-driven
//! writers.
//!
//! Some output formats invert control: the format library calls *you* with
//! a freshly created surface, possibly several times (measure pass, then a
//! render pass). [`ThreadedSurfaceWriter`] hides that behind the ordinary
//! "create a context, draw, signal completion" shape by running the writer
//! on a dedicated worker thread, recording the caller's drawing during the
//! first callback and replaying it on every later one.
//!
//! Exactly two threads participate per controller, coordinated by one
//! monitor; whichever side does not currently hold the journal is blocked.
//! There is no cancellation: the writer either finishes or fails, and both
//! outcomes are reported from [`ThreadedSurfaceWriter::image_complete`].

mod controller;
mod output;
mod writer;

pub use controller::{HandoffError, HandoffPhase, RenderGate, ThreadedSurfaceWriter};
pub use output::{
    ImageOrientation, OutputOptions, OutputSurfaceOps, ProviderRegistry, SurfaceProvider,
};
pub use writer::SurfaceWriter;
