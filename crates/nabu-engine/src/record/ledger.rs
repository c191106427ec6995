use crate::coords::{Transform, TransformError};
use crate::surface::Surface;

/// Base-transform bookkeeping for transform re-anchoring.
///
/// Captured once when a journal is constructed and recomputed once per
/// replay, never per command. Absolute `set_transform` arguments are stored
/// raw and composed with [`base`](Self::base) at execution time, so the net
/// placement is anchored to whatever starting transform the surface under
/// the journal happens to carry. Relative transform commands need no
/// anchoring and bypass the ledger.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformLedger {
    base: Transform,
    inv_base: Transform,
}

impl TransformLedger {
    /// Reads the surface's current transform as the session base.
    ///
    /// Fails immediately when the base cannot be inverted; deferring that
    /// to the first getter or replay would misattribute the error.
    pub fn capture(surface: &dyn Surface) -> Result<Self, TransformError> {
        Self::from_base(surface.transform())
    }

    pub fn from_base(base: Transform) -> Result<Self, TransformError> {
        let inv_base = if base.is_identity() { base } else { base.invert()? };
        Ok(Self { base, inv_base })
    }

    #[inline]
    pub fn base(&self) -> Transform {
        self.base
    }

    /// Re-anchors an absolute transform argument: the caller's transform
    /// applies first, the session base after it.
    #[inline]
    pub fn anchor(&self, t: Transform) -> Transform {
        t.then(self.base)
    }

    /// Expresses a live device transform relative to the session base, the
    /// inverse of [`anchor`](Self::anchor). Used by the recording proxy's
    /// transform getter.
    #[inline]
    pub fn relativize(&self, live: Transform) -> Transform {
        live.then(self.inv_base)
    }
}
