// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations.

#![allow(missing_docs)]

use arrayvec::ArrayVec;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            /// Special implementation for signum, because libm doesn't have it.
            fn signum(self) -> Self;

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            #[inline]
            fn signum(self) -> f64 {
                if self.is_nan() {
                    f64::NAN
                } else {
                    1.0_f64.copysign(self)
                }
            }

            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathwise requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn acos(self) -> Self => acos;
    fn atan2(self, other: Self) -> Self => atan2;
    fn cbrt(self) -> Self => cbrt;
    fn ceil(self) -> Self => ceil;
    fn copysign(self, sign: Self) -> Self => copysign;
    fn cos(self) -> Self => cos;
    fn floor(self) -> Self => floor;
    fn hypot(self, other: Self) -> Self => hypot;
    fn log10(self) -> Self => log10;
    fn powi(self, n: i32) -> Self => pow;
    fn round(self) -> Self => round;
    fn sin(self) -> Self => sin;
    fn sqrt(self) -> Self => sqrt;
}

/// Find real roots of quadratic equation.
///
/// Return values of x for which c0 + c1 x + c2 x² = 0.
///
/// Complex roots (negative discriminant) are dropped. If the equation is
/// nearly linear, the root of the linear term is returned; in the
/// degenerate case where all coefficients are zero, a single `0.0` is
/// returned. Roots are sorted.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as linear eqn
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        // Likely, calculation of sc1 * sc1 overflowed. Find one root
        // using sc1 x + x² = 0, other root as sc0 / root1.
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

/// Find real roots of a cubic equation with Cardano's method.
///
/// Return values of x for which c0 + c1 x + c2 x² + c3 x³ = 0.
///
/// The equation is normalized by `c3` and reduced to the depressed cubic
/// `u³ + p u + q = 0` with `x = u - c2 / (3 c3)`. The sign of the
/// discriminant `(q/2)² + (p/3)³` selects the branch: three real roots
/// through the trigonometric triple-angle formula, a double root through
/// cube roots of `q/2`, or a single real root through Cardano's formula.
///
/// Unlike [`solve_quadratic`], the leading coefficient is not checked:
/// callers must only pass a `c3` that is meaningfully nonzero. Non-finite
/// roots are dropped. Roots are not sorted.
pub fn solve_cubic_cardano(c0: f64, c1: f64, c2: f64, c3: f64) -> ArrayVec<f64, 3> {
    let mut result = ArrayVec::new();
    let a = c2 / c3;
    let b = c1 / c3;
    let c = c0 / c3;
    let offset = a / 3.0;

    let p = (3.0 * b - a * a) / 3.0;
    let p3 = p / 3.0;
    let q = (2.0 * a * a * a - 9.0 * a * b + 27.0 * c) / 27.0;
    let q2 = q / 2.0;
    let discriminant = q2 * q2 + p3 * p3 * p3;

    if discriminant < 0.0 {
        // Three distinct real roots. p is necessarily negative here.
        let mp3 = -p3;
        let r = (mp3 * mp3 * mp3).sqrt();
        let cosphi = (-q / (2.0 * r)).clamp(-1.0, 1.0);
        let phi = cosphi.acos();
        let t1 = 2.0 * r.cbrt();
        const TAU: f64 = 2.0 * core::f64::consts::PI;
        result.push(t1 * (phi / 3.0).cos() - offset);
        result.push(t1 * ((phi + TAU) / 3.0).cos() - offset);
        result.push(t1 * ((phi + 2.0 * TAU) / 3.0).cos() - offset);
    } else if discriminant == 0.0 {
        let u1 = (-q2).cbrt();
        result.push(2.0 * u1 - offset);
        result.push(-u1 - offset);
    } else {
        let sd = discriminant.sqrt();
        let u1 = (-q2 + sd).cbrt();
        let v1 = (q2 + sd).cbrt();
        result.push(u1 - v1 - offset);
    }
    result.retain(|root| root.is_finite());
    result
}

#[cfg(test)]
mod tests {
    use crate::common::*;
    use arrayvec::ArrayVec;

    fn verify<const N: usize>(mut roots: ArrayVec<f64, N>, expected: &[f64]) {
        assert_eq!(expected.len(), roots.len(), "roots {roots:?}, expected {expected:?}");
        let epsilon = 1e-9;
        roots.sort_by(f64::total_cmp);
        for i in 0..expected.len() {
            assert!(
                (roots[i] - expected[i]).abs() < epsilon,
                "root {} != expected {}",
                roots[i],
                expected[i]
            );
        }
    }

    #[test]
    fn test_solve_quadratic() {
        verify(solve_quadratic(-5.0, 0.0, 1.0), &[-5.0f64.sqrt(), 5.0f64.sqrt()]);
        verify(solve_quadratic(5.0, 0.0, 1.0), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0), &[-5.0]);
        verify(solve_quadratic(1.0, 2.0, 1.0), &[-1.0]);
        verify(solve_quadratic(0.0, 0.0, 0.0), &[0.0]);
    }

    #[test]
    fn test_solve_cubic_three_roots() {
        // (x - 1)(x - 2)(x - 3) = x³ - 6x² + 11x - 6
        verify(solve_cubic_cardano(-6.0, 11.0, -6.0, 1.0), &[1.0, 2.0, 3.0]);
        // Scaled leading coefficient doesn't change the roots.
        verify(solve_cubic_cardano(-12.0, 22.0, -12.0, 2.0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_solve_cubic_one_root() {
        // x³ - 1 has a single real root.
        verify(solve_cubic_cardano(-1.0, 0.0, 0.0, 1.0), &[1.0]);
        // x³ + x + 2 = (x + 1)(x² - x + 2)
        verify(solve_cubic_cardano(2.0, 1.0, 0.0, 1.0), &[-1.0]);
    }

    #[test]
    fn test_solve_cubic_double_root() {
        // x³ - 3x + 2 = (x - 1)²(x + 2)
        verify(solve_cubic_cardano(2.0, -3.0, 0.0, 1.0), &[-2.0, 1.0]);
        // x³ has a triple root at zero, reported through the double root branch.
        verify(solve_cubic_cardano(0.0, 0.0, 0.0, 1.0), &[0.0, 0.0]);
    }
}
