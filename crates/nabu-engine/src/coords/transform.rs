use thiserror::Error;

use super::Vec2;

/// Inversion failure for a degenerate matrix.
#[derive(Debug, Error, Copy, Clone, PartialEq)]
#[error("transform is not invertible (determinant {det})")]
pub struct TransformError {
    pub det: f32,
}

/// 2D affine transform.
///
/// Maps `(x, y)` to `(m11·x + m12·y + dx, m21·x + m22·y + dy)`.
///
/// Composition convention: [`then`](Self::then) applies `self` first, the
/// argument second, so `a.then(b).apply(p) == b.apply(a.apply(p))`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    #[inline]
    pub const fn new(m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> Self {
        Self { m11, m12, m21, m22, dx, dy }
    }

    // ── constructors ──────────────────────────────────────────────────────

    #[inline]
    pub const fn translation(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `theta` radians. Positive angles rotate +X toward +Y,
    /// which reads as clockwise in the top-left-origin space.
    #[inline]
    pub fn rotation(theta: f32) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos, -sin, sin, cos, 0.0, 0.0)
    }

    /// Rotation by `theta` radians around `center`.
    #[inline]
    pub fn rotation_about(theta: f32, center: Vec2) -> Self {
        Self::translation(-center.x, -center.y)
            .then(Self::rotation(theta))
            .then(Self::translation(center.x, center.y))
    }

    #[inline]
    pub const fn shearing(shx: f32, shy: f32) -> Self {
        Self::new(1.0, shx, shy, 1.0, 0.0, 0.0)
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.m11.is_finite()
            && self.m12.is_finite()
            && self.m21.is_finite()
            && self.m22.is_finite()
            && self.dx.is_finite()
            && self.dy.is_finite()
    }

    #[inline]
    pub fn determinant(self) -> f32 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m11 * p.x + self.m12 * p.y + self.dx,
            self.m21 * p.x + self.m22 * p.y + self.dy,
        )
    }

    // ── composition ───────────────────────────────────────────────────────

    /// Composes `self` with `after`: the result applies `self` first.
    #[inline]
    #[must_use]
    pub fn then(self, after: Transform) -> Transform {
        Transform::new(
            after.m11 * self.m11 + after.m12 * self.m21,
            after.m11 * self.m12 + after.m12 * self.m22,
            after.m21 * self.m11 + after.m22 * self.m21,
            after.m21 * self.m12 + after.m22 * self.m22,
            after.m11 * self.dx + after.m12 * self.dy + after.dx,
            after.m21 * self.dx + after.m22 * self.dy + after.dy,
        )
    }

    /// Inverse transform. Degenerate (or non-finite) matrices have none.
    pub fn invert(self) -> Result<Transform, TransformError> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(TransformError { det });
        }
        let inv = 1.0 / det;
        Ok(Transform::new(
            self.m22 * inv,
            -self.m12 * inv,
            -self.m21 * inv,
            self.m11 * inv,
            (self.m12 * self.dy - self.m22 * self.dx) * inv,
            (self.m21 * self.dx - self.m11 * self.dy) * inv,
        ))
    }
}
