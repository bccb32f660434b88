// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fuzzy comparison of floating point values.
//!
//! Every geometric computation in this crate takes a [`Tolerance`] and uses
//! it for each of its comparisons, so a single computation is consistently
//! fuzzy. [`ValueWithTolerance`] and [`RangeWithTolerance`] adapt that policy
//! to ordering and interval tests.

use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// A fuzzy-equality policy.
///
/// Two numbers are within tolerance when their difference, rounded to
/// `precision` decimal digits, is no larger than `delta`. The two fields are
/// kept consistent: `precision` is the decimal place of the leading digit
/// of `delta`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ToleranceDef"))]
pub struct Tolerance {
    delta: f64,
    precision: i32,
}

/// The serialized form of a [`Tolerance`], checked on the way in.
#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
struct ToleranceDef {
    delta: f64,
    precision: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<ToleranceDef> for Tolerance {
    type Error = &'static str;

    fn try_from(def: ToleranceDef) -> Result<Tolerance, Self::Error> {
        Tolerance::new(def.delta, def.precision)
            .ok_or("tolerance delta must be positive and match its precision")
    }
}

impl Tolerance {
    /// The default tolerance, `delta = 1e-6` with a precision of 6 digits.
    pub const DEFAULT: Tolerance = Tolerance {
        delta: 1e-6,
        precision: 6,
    };

    /// Create a tolerance from both a delta and a precision.
    ///
    /// Returns `None` if `delta` is not finite and positive, or if
    /// `precision` is not the one [`Tolerance::from_delta`] derives.
    pub fn new(delta: f64, precision: i32) -> Option<Tolerance> {
        let derived = Tolerance::from_delta(delta)?;
        (derived.precision == precision).then_some(derived)
    }

    /// Create a tolerance from a delta, deriving the precision.
    ///
    /// The precision is the decimal place of the leading digit of `delta`,
    /// `ceil(-log10(delta))`, so `0.01` and `0.015` give 2 and `1e-6` gives 6.
    /// Later digits of `delta` don't count. Deltas of 1 or more have a
    /// precision of 0.
    ///
    /// Returns `None` if `delta` is not finite and positive.
    pub fn from_delta(delta: f64) -> Option<Tolerance> {
        if !(delta.is_finite() && delta > 0.0) {
            return None;
        }
        let exact = -delta.log10();
        // Powers of ten land a hair off an integer, e.g. 1e-6.
        let digits = if (exact - exact.round()).abs() < 1e-9 {
            exact.round()
        } else {
            exact.ceil()
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "finite deltas have at most a few hundred digits"
        )]
        let precision = digits.max(0.0) as i32;
        Some(Tolerance { delta, precision })
    }

    /// Create a tolerance from a number of decimal digits.
    ///
    /// The delta is `10^-precision`. Negative precisions are treated as 0.
    pub fn from_precision(precision: i32) -> Tolerance {
        let precision = precision.max(0);
        Tolerance {
            delta: 10f64.powi(-precision),
            precision,
        }
    }

    /// The largest difference still considered equal.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// The number of decimal digits differences are rounded to.
    #[inline]
    pub fn precision(&self) -> i32 {
        self.precision
    }

    /// The maximum distance between a curve and its chord for the curve to
    /// count as flat during subdivision.
    #[inline]
    pub fn flatness(&self) -> f64 {
        self.delta
    }

    /// Round `value` to this tolerance's number of decimal digits.
    #[inline]
    pub fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision);
        (value * scale).round() / scale
    }

    /// Whether `a` and `b` are equal within this tolerance.
    #[inline]
    pub fn within(&self, a: f64, b: f64) -> bool {
        self.round((a - b).abs()) <= self.delta
    }

    /// Whether `value` is zero within this tolerance.
    #[inline]
    pub fn is_zero(&self, value: f64) -> bool {
        self.within(value, 0.0)
    }

    /// Wrap a value so it compares with this tolerance.
    #[inline]
    pub fn value(&self, value: f64) -> ValueWithTolerance {
        ValueWithTolerance::new(value, *self)
    }

    /// A closed interval tested with this tolerance.
    #[inline]
    pub fn range(&self, begin: f64, end: f64) -> RangeWithTolerance {
        RangeWithTolerance::new(begin, end, *self)
    }
}

impl Default for Tolerance {
    #[inline]
    fn default() -> Tolerance {
        Tolerance::DEFAULT
    }
}

/// A float that compares equal to anything within its tolerance.
///
/// This lets tolerant values take part in ordinary comparison logic; the
/// ordering is only partial, since tolerant equality is not transitive.
#[derive(Clone, Copy, Debug)]
pub struct ValueWithTolerance {
    /// The wrapped value.
    pub value: f64,
    /// The tolerance used for comparisons.
    pub tolerance: Tolerance,
}

impl ValueWithTolerance {
    /// Wrap a value.
    #[inline]
    pub fn new(value: f64, tolerance: Tolerance) -> ValueWithTolerance {
        ValueWithTolerance { value, tolerance }
    }

    /// Compare with a plain float.
    ///
    /// Returns `Equal` when the two are within tolerance, otherwise the
    /// numeric ordering. NaN compares greater than everything.
    pub fn cmp_value(&self, other: f64) -> Ordering {
        if self.tolerance.within(self.value, other) {
            Ordering::Equal
        } else {
            self.value.total_cmp(&other)
        }
    }
}

impl PartialEq for ValueWithTolerance {
    #[inline]
    fn eq(&self, other: &ValueWithTolerance) -> bool {
        self.tolerance.within(self.value, other.value)
    }
}

impl PartialEq<f64> for ValueWithTolerance {
    #[inline]
    fn eq(&self, other: &f64) -> bool {
        self.tolerance.within(self.value, *other)
    }
}

impl PartialOrd for ValueWithTolerance {
    #[inline]
    fn partial_cmp(&self, other: &ValueWithTolerance) -> Option<Ordering> {
        Some(self.cmp_value(other.value))
    }
}

impl PartialOrd<f64> for ValueWithTolerance {
    #[inline]
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        Some(self.cmp_value(*other))
    }
}

/// A closed interval whose bounds are compared with a tolerance.
#[derive(Clone, Copy, Debug)]
pub struct RangeWithTolerance {
    begin: f64,
    end: f64,
    tolerance: Tolerance,
}

impl RangeWithTolerance {
    /// Create a range. The bounds may be given in either order.
    #[inline]
    pub fn new(begin: f64, end: f64, tolerance: Tolerance) -> RangeWithTolerance {
        RangeWithTolerance {
            begin: begin.min(end),
            end: begin.max(end),
            tolerance,
        }
    }

    /// The lower bound.
    #[inline]
    pub fn begin(&self) -> f64 {
        self.begin
    }

    /// The upper bound.
    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether `value` lies in the range, allowing each bound to be missed
    /// by the tolerance.
    pub fn includes(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = self.tolerance.value(value);
        value >= self.begin && value <= self.end
    }
}
