// Copyright 2026 the Orogen Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform.
//!
//! This type covers the subset of 3-D transforms the engine actually needs:
//! identity, multiply, the usual constructors, full inversion, and 2-D point
//! projection with perspective divide. Hit testing and scroll-delta mapping
//! invert a layer's screen transform and project gesture points through it,
//! so inversion and projection live here rather than behind a full
//! linear-algebra crate.

use core::ops::Mul;

use kurbo::{Point, Vec2};

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f64; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        #[cfg(not(feature = "std"))]
        use kurbo::common::FloatFuncs as _;
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a CSS-style perspective transform with the given distance.
    ///
    /// Points at `z = 0` project unchanged; points toward positive `z` grow
    /// and points toward negative `z` shrink, diverging as `z` approaches
    /// `-distance`.
    #[inline]
    #[must_use]
    pub const fn from_perspective(distance: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.cols[2][3] = -1.0 / distance;
        t
    }

    /// Is every element of this transform [finite](f64::is_finite)?
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols
            .iter()
            .all(|col| col.iter().all(|v| v.is_finite()))
    }

    /// Is this transform invertible?
    ///
    /// Equivalent to [`inverse`](Self::inverse) returning `Some`, without
    /// computing the inverse.
    #[inline]
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det != 0.0
    }

    /// Returns the determinant of the matrix.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = &self.cols;
        let s0 = m[0][0] * m[1][1] - m[1][0] * m[0][1];
        let s1 = m[0][0] * m[2][1] - m[2][0] * m[0][1];
        let s2 = m[0][0] * m[3][1] - m[3][0] * m[0][1];
        let s3 = m[1][0] * m[2][1] - m[2][0] * m[1][1];
        let s4 = m[1][0] * m[3][1] - m[3][0] * m[1][1];
        let s5 = m[2][0] * m[3][1] - m[3][0] * m[2][1];

        let c5 = m[2][2] * m[3][3] - m[3][2] * m[2][3];
        let c4 = m[1][2] * m[3][3] - m[3][2] * m[1][3];
        let c3 = m[1][2] * m[2][3] - m[2][2] * m[1][3];
        let c2 = m[0][2] * m[3][3] - m[3][2] * m[0][3];
        let c1 = m[0][2] * m[2][3] - m[2][2] * m[0][3];
        let c0 = m[0][2] * m[1][3] - m[1][2] * m[0][3];

        s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0
    }

    /// Returns the inverse of this transform, or `None` if it is singular or
    /// non-finite.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.cols;
        let s0 = m[0][0] * m[1][1] - m[1][0] * m[0][1];
        let s1 = m[0][0] * m[2][1] - m[2][0] * m[0][1];
        let s2 = m[0][0] * m[3][1] - m[3][0] * m[0][1];
        let s3 = m[1][0] * m[2][1] - m[2][0] * m[1][1];
        let s4 = m[1][0] * m[3][1] - m[3][0] * m[1][1];
        let s5 = m[2][0] * m[3][1] - m[3][0] * m[2][1];

        let c5 = m[2][2] * m[3][3] - m[3][2] * m[2][3];
        let c4 = m[1][2] * m[3][3] - m[3][2] * m[1][3];
        let c3 = m[1][2] * m[2][3] - m[2][2] * m[1][3];
        let c2 = m[0][2] * m[3][3] - m[3][2] * m[0][3];
        let c1 = m[0][2] * m[2][3] - m[2][2] * m[0][3];
        let c0 = m[0][2] * m[1][3] - m[1][2] * m[0][3];

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;

        let cols = [
            [
                (m[1][1] * c5 - m[2][1] * c4 + m[3][1] * c3) * inv,
                (-m[0][1] * c5 + m[2][1] * c2 - m[3][1] * c1) * inv,
                (m[0][1] * c4 - m[1][1] * c2 + m[3][1] * c0) * inv,
                (-m[0][1] * c3 + m[1][1] * c1 - m[2][1] * c0) * inv,
            ],
            [
                (-m[1][0] * c5 + m[2][0] * c4 - m[3][0] * c3) * inv,
                (m[0][0] * c5 - m[2][0] * c2 + m[3][0] * c1) * inv,
                (-m[0][0] * c4 + m[1][0] * c2 - m[3][0] * c0) * inv,
                (m[0][0] * c3 - m[1][0] * c1 + m[2][0] * c0) * inv,
            ],
            [
                (m[1][3] * s5 - m[2][3] * s4 + m[3][3] * s3) * inv,
                (-m[0][3] * s5 + m[2][3] * s2 - m[3][3] * s1) * inv,
                (m[0][3] * s4 - m[1][3] * s2 + m[3][3] * s0) * inv,
                (-m[0][3] * s3 + m[1][3] * s1 - m[2][3] * s0) * inv,
            ],
            [
                (-m[1][2] * s5 + m[2][2] * s4 - m[3][2] * s3) * inv,
                (m[0][2] * s5 - m[2][2] * s2 + m[3][2] * s1) * inv,
                (-m[0][2] * s4 + m[1][2] * s2 - m[3][2] * s0) * inv,
                (m[0][2] * s3 - m[1][2] * s1 + m[2][2] * s0) * inv,
            ],
        ];
        Some(Self { cols })
    }

    /// Projects a 2-D point (taken at `z = 0`) through this transform,
    /// applying the perspective divide.
    ///
    /// Returns `None` when the point maps to or behind the eye plane
    /// (`w ≤ 0`), where the projection is undefined.
    #[must_use]
    pub fn project_point(&self, p: Point) -> Option<Point> {
        let m = &self.cols;
        let x = m[0][0] * p.x + m[1][0] * p.y + m[3][0];
        let y = m[0][1] * p.x + m[1][1] * p.y + m[3][1];
        let w = m[0][3] * p.x + m[1][3] * p.y + m[3][3];
        if w <= 0.0 || !w.is_finite() {
            return None;
        }
        Some(Point::new(x / w, y / w))
    }

    /// Maps a delta at `origin` through this transform.
    ///
    /// Projects `origin` and `origin + delta` and returns the difference,
    /// which is position-dependent for perspective transforms.
    #[must_use]
    pub fn project_delta(&self, origin: Point, delta: Vec2) -> Option<Vec2> {
        let p0 = self.project_point(origin)?;
        let p1 = self.project_point(origin + delta)?;
        Some(p1 - p0)
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}
