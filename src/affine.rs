// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine transforms and transform chains.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Mul, MulAssign};

use crate::{Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A 2D affine transform.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affine([f64; 6]);

impl Affine {
    /// The identity transform.
    pub const IDENTITY: Affine = Affine::scale(1.0);

    /// Construct an affine transform from coefficients.
    ///
    /// If the coefficients are `(a, b, c, d, e, f)`, then the resulting
    /// transformation represents this homogeneous matrix:
    ///
    /// ```text
    /// | a c e |
    /// | b d f |
    /// | 0 0 1 |
    /// ```
    ///
    /// so that `(A * B) * p == A * (B * p)`: the right operand is applied
    /// first.
    #[inline(always)]
    pub const fn new(c: [f64; 6]) -> Affine {
        Affine(c)
    }

    /// An affine transform representing uniform scaling.
    #[inline(always)]
    pub const fn scale(s: f64) -> Affine {
        Affine([s, 0.0, 0.0, s, 0.0, 0.0])
    }

    /// An affine transform representing non-uniform scaling
    /// with different scale values for x and y.
    #[inline(always)]
    pub const fn scale_non_uniform(s_x: f64, s_y: f64) -> Affine {
        Affine([s_x, 0.0, 0.0, s_y, 0.0, 0.0])
    }

    /// An affine transform representing counter-clockwise rotation
    /// (in a y-up space) by `th` radians about the origin.
    #[inline]
    pub fn rotate(th: f64) -> Affine {
        let s = th.sin();
        let c = th.cos();
        Affine([c, s, -s, c, 0.0, 0.0])
    }

    /// An affine transform representing translation.
    #[inline]
    pub fn translate<V: Into<Vec2>>(p: V) -> Affine {
        let p = p.into();
        Affine([1.0, 0.0, 0.0, 1.0, p.x, p.y])
    }

    /// A rotation by `th` followed by `self`.
    #[must_use]
    #[inline]
    pub fn pre_rotate(self, th: f64) -> Self {
        self * Affine::rotate(th)
    }

    /// `self` followed by a rotation of `th`.
    #[must_use]
    #[inline]
    pub fn then_rotate(self, th: f64) -> Self {
        Affine::rotate(th) * self
    }

    /// `self` followed by a translation.
    #[must_use]
    #[inline]
    pub fn then_translate(self, trans: Vec2) -> Self {
        Affine::translate(trans) * self
    }

    /// `self` followed by a uniform scale.
    #[must_use]
    #[inline]
    pub fn then_scale(self, scale: f64) -> Self {
        Affine::scale(scale) * self
    }

    /// Get the coefficients of the transform.
    #[inline(always)]
    pub fn as_coeffs(self) -> [f64; 6] {
        self.0
    }

    /// The full 3x3 homogeneous matrix, row major.
    pub fn as_matrix(self) -> [[f64; 3]; 3] {
        let [a, b, c, d, e, f] = self.0;
        [[a, c, e], [b, d, f], [0.0, 0.0, 1.0]]
    }

    /// Compute the determinant of this transform.
    #[inline]
    pub fn determinant(self) -> f64 {
        self.0[0] * self.0[3] - self.0[1] * self.0[2]
    }

    /// Compute the inverse transform.
    ///
    /// Produces NaN values when the determinant is zero.
    #[must_use]
    pub fn inverse(self) -> Affine {
        let inv_det = self.determinant().recip();
        Affine([
            inv_det * self.0[3],
            -inv_det * self.0[1],
            -inv_det * self.0[2],
            inv_det * self.0[0],
            inv_det * (self.0[2] * self.0[5] - self.0[3] * self.0[4]),
            inv_det * (self.0[1] * self.0[4] - self.0[0] * self.0[5]),
        ])
    }

    /// The translation part of this transform.
    #[inline]
    pub fn translation(self) -> Vec2 {
        Vec2::new(self.0[4], self.0[5])
    }

    /// Is this transform finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl Default for Affine {
    #[inline(always)]
    fn default() -> Affine {
        Affine::IDENTITY
    }
}

impl Mul<Point> for Affine {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Point {
        Point::new(
            self.0[0] * other.x + self.0[2] * other.y + self.0[4],
            self.0[1] * other.x + self.0[3] * other.y + self.0[5],
        )
    }
}

/// Vectors are displacements, so only the linear part applies.
impl Mul<Vec2> for Affine {
    type Output = Vec2;

    #[inline]
    fn mul(self, other: Vec2) -> Vec2 {
        Vec2::new(
            self.0[0] * other.x + self.0[2] * other.y,
            self.0[1] * other.x + self.0[3] * other.y,
        )
    }
}

impl Mul for Affine {
    type Output = Affine;

    #[inline]
    fn mul(self, other: Affine) -> Affine {
        Affine([
            self.0[0] * other.0[0] + self.0[2] * other.0[1],
            self.0[1] * other.0[0] + self.0[3] * other.0[1],
            self.0[0] * other.0[2] + self.0[2] * other.0[3],
            self.0[1] * other.0[2] + self.0[3] * other.0[3],
            self.0[0] * other.0[4] + self.0[2] * other.0[5] + self.0[4],
            self.0[1] * other.0[4] + self.0[3] * other.0[5] + self.0[5],
        ])
    }
}

impl MulAssign for Affine {
    #[inline]
    fn mul_assign(&mut self, other: Affine) {
        *self = self.mul(other);
    }
}

#[cfg(feature = "mint")]
impl From<Affine> for mint::ColumnMatrix2x3<f64> {
    #[inline(always)]
    fn from(a: Affine) -> mint::ColumnMatrix2x3<f64> {
        mint::ColumnMatrix2x3 {
            x: mint::Vector2 {
                x: a.0[0],
                y: a.0[1],
            },
            y: mint::Vector2 {
                x: a.0[2],
                y: a.0[3],
            },
            z: mint::Vector2 {
                x: a.0[4],
                y: a.0[5],
            },
        }
    }
}

/// A point mapping that isn't necessarily affine.
pub type PointMap = Arc<dyn Fn(Point) -> Point + Send + Sync>;

/// A transform applied to the points of a geometric object.
///
/// Affine transforms compose into a single matrix. An arbitrary point
/// mapping can't be folded into a matrix, so composing with one produces a
/// [`Transform::Chain`] that applies its steps in order.
#[derive(Clone)]
pub enum Transform {
    /// A single affine transform.
    Affine(Affine),
    /// An arbitrary point mapping.
    Map(PointMap),
    /// Steps applied first to last.
    Chain(Vec<Transform>),
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform::Affine(Affine::IDENTITY);

    /// Wrap an arbitrary point mapping.
    pub fn map(f: impl Fn(Point) -> Point + Send + Sync + 'static) -> Transform {
        Transform::Map(Arc::new(f))
    }

    /// `self` followed by `next`.
    ///
    /// Two affine transforms coalesce into `next * self`. Anything else
    /// forms a chain; chains are kept flat, and an affine step appended to a
    /// chain that ends in an affine step coalesces with it.
    #[must_use]
    pub fn then(self, next: Transform) -> Transform {
        let mut steps = match self {
            Transform::Chain(steps) => steps,
            step => alloc::vec![step],
        };
        match next {
            Transform::Chain(next_steps) => {
                for step in next_steps {
                    push_step(&mut steps, step);
                }
            }
            step => push_step(&mut steps, step),
        }
        if steps.len() == 1 {
            if let Some(step) = steps.pop() {
                return step;
            }
        }
        Transform::Chain(steps)
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        match self {
            Transform::Affine(affine) => *affine * p,
            Transform::Map(f) => f(p),
            Transform::Chain(steps) => steps.iter().fold(p, |p, step| step.apply(p)),
        }
    }

    /// The equivalent single affine transform, if there is one.
    pub fn as_affine(&self) -> Option<Affine> {
        match self {
            Transform::Affine(affine) => Some(*affine),
            Transform::Map(_) => None,
            Transform::Chain(steps) => steps
                .iter()
                .try_fold(Affine::IDENTITY, |acc, step| Some(step.as_affine()? * acc)),
        }
    }
}

fn push_step(steps: &mut Vec<Transform>, step: Transform) {
    if let (Some(Transform::Affine(last)), Transform::Affine(next)) = (steps.last_mut(), &step) {
        *last = *next * *last;
        return;
    }
    steps.push(step);
}

impl From<Affine> for Transform {
    #[inline]
    fn from(affine: Affine) -> Transform {
        Transform::Affine(affine)
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::IDENTITY
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Affine(affine) => f.debug_tuple("Affine").field(affine).finish(),
            Transform::Map(_) => f.write_str("Map(..)"),
            Transform::Chain(steps) => f.debug_tuple("Chain").field(steps).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Affine, Point, Transform, Vec2};
    use core::f64::consts::PI;

    fn assert_near(p0: Point, p1: Point) {
        assert!((p1 - p0).hypot() < 1e-9, "{p0:?} != {p1:?}");
    }

    #[test]
    fn affine_basic() {
        let p = Point::new(3.0, 4.0);

        assert_near(Affine::default() * p, p);
        assert_near(Affine::scale(2.0) * p, Point::new(6.0, 8.0));
        assert_near(Affine::rotate(0.0) * p, p);
        assert_near(Affine::rotate(PI / 2.0) * p, Point::new(-4.0, 3.0));
        assert_near(Affine::translate((5.0, 6.0)) * p, Point::new(8.0, 10.0));
        // Translation doesn't move vectors.
        assert_eq!(Affine::translate((5.0, 6.0)) * Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn affine_mul() {
        let a1 = Affine::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let a2 = Affine::new([0.1, 1.2, 2.3, 3.4, 4.5, 5.6]);

        let px = Point::new(1.0, 0.0);
        let py = Point::new(0.0, 1.0);
        let pxy = Point::new(1.0, 1.0);
        assert_near(a1 * (a2 * px), (a1 * a2) * px);
        assert_near(a1 * (a2 * py), (a1 * a2) * py);
        assert_near(a1 * (a2 * pxy), (a1 * a2) * pxy);
    }

    #[test]
    fn affine_inverse() {
        let a = Affine::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let p = Point::new(3.0, 4.0);
        assert_near(a.inverse() * (a * p), p);
        assert_eq!(
            Affine::translate((1.0, 2.0)).as_matrix(),
            [[1.0, 0.0, 1.0], [0.0, 1.0, 2.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn chain_coalesces_affines() {
        let a = Affine::translate((1.0, 0.0));
        let b = Affine::rotate(PI / 2.0);
        let c = Affine::scale(2.0);
        let chain = Transform::from(a)
            .then(Transform::from(b))
            .then(Transform::from(c));
        assert!(
            matches!(chain, Transform::Affine(_)),
            "affine steps should coalesce, got {chain:?}"
        );
        let combined = chain.as_affine().unwrap();
        let p = Point::new(1.0, 1.0);
        assert_near(combined * p, c * (b * (a * p)));
        assert_near(combined * p, (c * b * a) * p);
    }

    #[test]
    fn chain_with_point_map() {
        let mirror = Transform::map(|p| Point::new(p.y, p.x));
        let chain = Transform::from(Affine::translate((1.0, 0.0)))
            .then(mirror)
            .then(Transform::from(Affine::scale(2.0)))
            .then(Transform::from(Affine::translate((0.0, 1.0))));
        match &chain {
            // translate, map, then scale and translate folded together
            Transform::Chain(steps) => assert_eq!(steps.len(), 3),
            other => panic!("expected a chain, got {other:?}"),
        }
        assert!(chain.as_affine().is_none());
        // (1, 2) -> (2, 2) -> (2, 2) -> (4, 4) -> (4, 5)
        assert_near(chain.apply(Point::new(1.0, 2.0)), Point::new(4.0, 5.0));
    }

    #[test]
    fn chain_as_affine() {
        let a = Affine::translate((1.0, 2.0));
        let b = Affine::scale(3.0);
        let chain = Transform::Chain(vec![Transform::from(a), Transform::from(b)]);
        let p = Point::new(-1.0, 0.5);
        assert_near(chain.as_affine().unwrap() * p, b * (a * p));
        assert_near(chain.apply(p), b * (a * p));
    }
}
