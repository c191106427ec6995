use crate::coords::Transform;

use super::RenderGate;

/// The callback-driven collaborator a [`super::ThreadedSurfaceWriter`]
/// drives.
///
/// `write` runs on the controller's worker thread and performs the
/// format's whole multi-step output operation. It must call
/// [`RenderGate::render`] with a freshly created surface at least once and
/// may call it as many times as the format needs; the first call records,
/// later calls replay. Errors raised inside the render callback come back
/// out of `render` and should be propagated, not swallowed; whatever
/// `write` returns is surfaced to the caller.
pub trait SurfaceWriter: Send {
    /// Extra placement composed onto every surface passed to `render`,
    /// before recording or replay.
    ///
    /// Meant for devices that cannot be told their output region directly
    /// and need a compensating scale or orientation transform instead. The
    /// default is no adjustment.
    fn placement(&self) -> Transform {
        Transform::IDENTITY
    }

    /// Performs the output operation, calling `gate.render(...)` one or
    /// more times.
    fn write(&mut self, gate: &mut RenderGate<'_>) -> anyhow::Result<()>;
}
