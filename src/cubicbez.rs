// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::{Add, Mul, Sub};

use arrayvec::ArrayVec;

use crate::common::solve_quadratic;
use crate::{Affine, BezPath, Line, PathEl, Point, Rect, SegmentError, Tolerance, Transform, Vec2};

/// The number of intervals in the lookup table [`CubicBez::project_point`]
/// starts from.
pub const PROJECTION_SAMPLES: usize = 100;

/// The number of intervals sampled per round when an extremum has to be
/// searched for instead of solved.
pub const EXTREMA_SAMPLES: usize = 10;

/// The maximum number of extrema a cubic can have, two per axis.
pub const MAX_EXTREMA: usize = 4;

const MIN_PROJECTION_STEP: f64 = 1e-10;
const MAX_SEARCH_ROUNDS: usize = 64;

/// A single cubic Bézier segment.
///
/// `p0` is the start point, `p1` and `p2` the control points and `p3` the
/// end point.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Create a curve from a list of exactly four points.
    pub fn from_points(points: &[Point]) -> Result<CubicBez, SegmentError> {
        let &[p0, p1, p2, p3] = points else {
            return Err(SegmentError::WrongPointCount {
                expected: 4,
                found: points.len(),
            });
        };
        let c = CubicBez::new(p0, p1, p2, p3);
        if !c.is_finite() {
            return Err(SegmentError::NonFinite);
        }
        Ok(c)
    }

    /// Create a curve from its start point and the path element that
    /// continues from it.
    ///
    /// The element must be a [`PathEl::CurveTo`].
    pub fn from_start_and_element(start: Point, el: PathEl) -> Result<CubicBez, SegmentError> {
        let PathEl::CurveTo(p1, p2, p3) = el else {
            return Err(SegmentError::NotACurve);
        };
        let c = CubicBez::new(start, p1, p2, p3);
        if !c.is_finite() {
            return Err(SegmentError::NonFinite);
        }
        Ok(c)
    }

    /// The four defining points.
    #[inline]
    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// The point at parameter `t`, from the Bernstein form.
    ///
    /// `t == 0` and `t == 1` return the end points exactly.
    pub fn compute_point(&self, t: f64) -> Point {
        if t == 0.0 {
            return self.p0;
        }
        if t == 1.0 {
            return self.p3;
        }
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        )
    }

    /// The point at parameter `t`; same as [`CubicBez::compute_point`].
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        self.compute_point(t)
    }

    /// The control vectors of the derivative, a quadratic Bézier.
    #[inline]
    pub fn deriv(&self) -> [Vec2; 3] {
        [
            3.0 * (self.p1 - self.p0),
            3.0 * (self.p2 - self.p1),
            3.0 * (self.p3 - self.p2),
        ]
    }

    /// The first derivative at parameter `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let [d0, d1, d2] = self.deriv();
        let mt = 1.0 - t;
        d0 * (mt * mt) + d1 * (2.0 * mt * t) + d2 * (t * t)
    }

    /// Split the curve at parameter `t` with de Casteljau's algorithm.
    ///
    /// The left curve ends and the right one starts at the same point,
    /// which lies on this curve at `t`.
    pub fn split(&self, t: f64) -> (CubicBez, CubicBez) {
        let r1 = [
            self.p0.lerp(self.p1, t),
            self.p1.lerp(self.p2, t),
            self.p2.lerp(self.p3, t),
        ];
        let r2 = [r1[0].lerp(r1[1], t), r1[1].lerp(r1[2], t)];
        let s = r2[0].lerp(r2[1], t);
        (
            CubicBez::new(self.p0, r1[0], r2[0], s),
            CubicBez::new(s, r2[1], r1[2], self.p3),
        )
    }

    /// Split the curve in half.
    #[inline]
    pub fn subdivide(&self) -> (CubicBez, CubicBez) {
        self.split(0.5)
    }

    /// Parameters of the interior extrema on both axes, sorted.
    ///
    /// Each axis has a quadratic derivative. When its leading coefficient
    /// vanishes within `tolerance` the extremum is found by sampling
    /// instead.
    pub fn extrema(&self, tolerance: &Tolerance) -> ArrayVec<f64, MAX_EXTREMA> {
        let mut result = ArrayVec::new();
        let [p0, p1, p2, p3] = self.points();
        axis_extrema(&mut result, [p0.x, p1.x, p2.x, p3.x], tolerance);
        axis_extrema(&mut result, [p0.y, p1.y, p2.y, p3.y], tolerance);
        result.sort_by(f64::total_cmp);
        result
    }

    /// The tight bounding box of the curve.
    pub fn bounding_box(&self, tolerance: &Tolerance) -> Rect {
        self.extrema(tolerance)
            .iter()
            .fold(Rect::from_points(self.p0, self.p3), |rect, &t| {
                rect.union_pt(self.compute_point(t))
            })
    }

    /// The bounding box of the four defining points.
    ///
    /// Always contains the curve, usually loosely.
    pub fn control_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p3)
            .union_pt(self.p1)
            .union_pt(self.p2)
    }

    /// The parameter of the point on the curve nearest to `p`.
    ///
    /// Starts from the best of [`PROJECTION_SAMPLES`] + 1 evenly spaced
    /// samples, then rescans a window of two steps either side of the best
    /// parameter at a hundredth of the step, until the step is negligible
    /// or a round stops improving.
    pub fn project_point(&self, p: Point) -> f64 {
        let mut best_t = 0.0;
        let mut best_d = f64::INFINITY;
        for i in 0..=PROJECTION_SAMPLES {
            let t = i as f64 / PROJECTION_SAMPLES as f64;
            let d = self.compute_point(t).distance_squared(p);
            if d < best_d {
                best_t = t;
                best_d = d;
            }
        }
        let mut step = 1.0 / PROJECTION_SAMPLES as f64;
        while step > MIN_PROJECTION_STEP && best_d > 0.0 {
            let lo = (best_t - 2.0 * step).max(0.0);
            let hi = (best_t + 2.0 * step).min(1.0);
            step /= 100.0;
            let mut improved = false;
            let mut t = lo;
            while t <= hi {
                let d = self.compute_point(t).distance_squared(p);
                if d < best_d {
                    best_t = t;
                    best_d = d;
                    improved = true;
                }
                t += step;
            }
            if !improved {
                break;
            }
        }
        best_t
    }

    /// How far the control points stray from the chord.
    ///
    /// This is `max((3 p1 - 2 p0 - p3)², (3 p2 - p0 - 2 p3)²)` per axis,
    /// summed over both axes: sixteen times an upper bound on the squared
    /// distance between the curve and its chord.
    pub fn flatness_measure(&self) -> f64 {
        let u = 3.0 * self.p1.to_vec2() - 2.0 * self.p0.to_vec2() - self.p3.to_vec2();
        let v = 3.0 * self.p2.to_vec2() - self.p0.to_vec2() - 2.0 * self.p3.to_vec2();
        (u.x * u.x).max(v.x * v.x) + (u.y * u.y).max(v.y * v.y)
    }

    /// Whether the curve stays within `tolerance.flatness()` of its chord.
    #[inline]
    pub fn is_flat(&self, tolerance: &Tolerance) -> bool {
        let flatness = tolerance.flatness();
        self.flatness_measure() <= 16.0 * flatness * flatness
    }

    /// The straight line from start to end.
    #[inline]
    pub fn chord(&self) -> Line {
        Line::new(self.p0, self.p3)
    }

    /// The same curve traversed in the opposite direction.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> CubicBez {
        CubicBez::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// The curve moved by `v`.
    #[must_use]
    #[inline]
    pub fn translate(&self, v: Vec2) -> CubicBez {
        *self + v
    }

    /// The curve with all four points mapped through `transform`.
    ///
    /// This is exact for affine transforms; other mappings only move the
    /// defining points.
    #[must_use]
    pub fn transform(&self, transform: &Transform) -> CubicBez {
        let [p0, p1, p2, p3] = self.points().map(|p| transform.apply(p));
        CubicBez::new(p0, p1, p2, p3)
    }

    /// A path holding just this curve.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.p0);
        path.curve_to(self.p1, self.p2, self.p3);
        path
    }

    /// Is this curve [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }
}

/// Collect the interior extrema of one coordinate of a cubic.
fn axis_extrema(result: &mut ArrayVec<f64, MAX_EXTREMA>, v: [f64; 4], tolerance: &Tolerance) {
    let [p0, p1, p2, p3] = v;
    let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
    let b = 6.0 * (p0 - 2.0 * p1 + p2);
    let c = 3.0 * (p1 - p0);
    if tolerance.is_zero(a) {
        log::trace!("degenerate derivative (a = {a:e}), searching for extrema");
        let eval = |t: f64| {
            let mt = 1.0 - t;
            mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
        };
        let t_max = search_extremum(eval, |a, b| a > b, tolerance);
        let t_min = search_extremum(eval, |a, b| a < b, tolerance);
        for t in [t_max, t_min] {
            if t > 0.0 && t < 1.0 && !result.contains(&t) {
                result.push(t);
            }
        }
    } else {
        for t in solve_quadratic(c, b, a) {
            if t > 0.0 && t < 1.0 {
                result.push(t);
            }
        }
    }
}

/// Locate the best parameter of `f` on `[0, 1]` by repeated sampling.
///
/// Each round samples [`EXTREMA_SAMPLES`] + 1 points and narrows to the
/// neighbours of the best one. It stops once every sample in a round agrees
/// within `tolerance`.
fn search_extremum(
    f: impl Fn(f64) -> f64,
    better: impl Fn(f64, f64) -> bool,
    tolerance: &Tolerance,
) -> f64 {
    let (mut lo, mut hi) = (0.0, 1.0);
    let mut best_t = 0.0;
    for _ in 0..MAX_SEARCH_ROUNDS {
        let step = (hi - lo) / EXTREMA_SAMPLES as f64;
        let mut samples = ArrayVec::<(f64, f64), { EXTREMA_SAMPLES + 1 }>::new();
        for i in 0..=EXTREMA_SAMPLES {
            let t = if i == EXTREMA_SAMPLES {
                hi
            } else {
                lo + step * i as f64
            };
            samples.push((t, f(t)));
        }
        let mut best = 0;
        let (mut min, mut max) = (samples[0].1, samples[0].1);
        for (i, &(_, value)) in samples.iter().enumerate() {
            if better(value, samples[best].1) {
                best = i;
            }
            min = min.min(value);
            max = max.max(value);
        }
        best_t = samples[best].0;
        if tolerance.within(min, max) || step <= f64::EPSILON {
            break;
        }
        lo = samples[best.saturating_sub(1)].0;
        hi = samples[(best + 1).min(EXTREMA_SAMPLES)].0;
    }
    best_t
}

impl Mul<CubicBez> for Affine {
    type Output = CubicBez;

    #[inline]
    fn mul(self, c: CubicBez) -> CubicBez {
        CubicBez {
            p0: self * c.p0,
            p1: self * c.p1,
            p2: self * c.p2,
            p3: self * c.p3,
        }
    }
}

impl Add<Vec2> for CubicBez {
    type Output = CubicBez;

    #[inline]
    fn add(self, v: Vec2) -> CubicBez {
        CubicBez::new(self.p0 + v, self.p1 + v, self.p2 + v, self.p3 + v)
    }
}

impl Sub<Vec2> for CubicBez {
    type Output = CubicBez;

    #[inline]
    fn sub(self, v: Vec2) -> CubicBez {
        CubicBez::new(self.p0 - v, self.p1 - v, self.p2 - v, self.p3 - v)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::{
        Affine, CubicBez, Line, PathEl, Point, Rect, SegmentError, Tolerance, Transform, Vec2,
    };

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    fn arch() -> CubicBez {
        CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0))
    }

    fn random_curve(rng: &mut StdRng) -> CubicBez {
        let mut p = || Point::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        CubicBez::new(p(), p(), p(), p())
    }

    #[test]
    fn cubicbez_split_half() {
        let (left, right) = arch().split(0.5);
        assert_eq!(left.p0, Point::new(0.0, 0.0));
        assert_near(left.p1, Point::new(0.5, 1.0), 1e-12);
        assert_near(left.p2, Point::new(1.25, 1.5), 1e-12);
        assert_near(left.p3, Point::new(2.0, 1.5), 1e-12);
        assert_near(right.p0, Point::new(2.0, 1.5), 1e-12);
        assert_near(right.p1, Point::new(2.75, 1.5), 1e-12);
        assert_near(right.p2, Point::new(3.5, 1.0), 1e-12);
        assert_eq!(right.p3, Point::new(4.0, 0.0));
        assert_eq!(arch().subdivide(), (left, right));
    }

    #[test]
    fn cubicbez_split_round_trip() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let c = random_curve(&mut rng);
            let t = rng.random_range(0.01..0.99);
            let (left, right) = c.split(t);
            assert_eq!(left.p0, c.p0);
            assert_eq!(right.p3, c.p3);
            assert_eq!(left.compute_point(1.0), right.compute_point(0.0));
            assert_near(left.p3, c.compute_point(t), 1e-9);
            // Both halves keep tracing the original curve.
            assert_near(left.compute_point(0.5), c.compute_point(0.5 * t), 1e-9);
            assert_near(
                right.compute_point(0.5),
                c.compute_point(t + 0.5 * (1.0 - t)),
                1e-9,
            );
        }
    }

    #[test]
    fn cubicbez_endpoints_exact() {
        let c = CubicBez::new((0.1, 1e-17), (0.3, 0.7), (1.0 / 3.0, 5.0), (0.7, 0.1));
        assert_eq!(c.compute_point(0.0), c.p0);
        assert_eq!(c.compute_point(1.0), c.p3);
    }

    #[test]
    fn cubicbez_tangent() {
        let c = arch();
        assert_near(c.tangent(0.0).to_point(), Point::new(3.0, 6.0), 1e-12);
        assert_near(c.tangent(1.0).to_point(), Point::new(3.0, -6.0), 1e-12);
        // Horizontal at the apex.
        assert!(c.tangent(0.5).y.abs() < 1e-12);
    }

    #[test]
    fn cubicbez_project_point() {
        let scenario = CubicBez::new((0.0, 75.0), (50.0, 200.0), (50.0, 205.0), (100.0, 80.0));
        // y = x^3
        let cubic = CubicBez::new((0.0, 0.0), (1.0 / 3.0, 0.0), (2.0 / 3.0, 0.0), (1.0, 1.0));
        for c in [arch(), scenario, cubic] {
            for i in 0..=1000 {
                let t = i as f64 / 1000.0;
                let projected = c.project_point(c.compute_point(t));
                assert!((projected - t).abs() < 1e-4, "{t} projected to {projected}");
            }
        }
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let t = rng.random_range(0.0..=1.0);
            let projected = scenario.project_point(scenario.compute_point(t));
            assert!((projected - t).abs() < 1e-4, "{t} projected to {projected}");
        }
        assert_eq!(cubic.project_point(Point::new(-0.1, 0.0)), 0.0);
        assert_eq!(cubic.project_point(Point::new(1.1, 1.1)), 1.0);
    }

    #[test]
    fn cubicbez_extrema() {
        let tol = Tolerance::default();
        // Two extrema per axis.
        let c = CubicBez::new((0.4, 0.5), (0.0, 1.0), (1.0, 0.0), (0.5, 0.4));
        assert_eq!(c.extrema(&tol).len(), 4);

        // y is a parabola, so its derivative is linear and gets searched.
        let q = CubicBez::new((0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0));
        let extrema = q.extrema(&tol);
        assert_eq!(extrema.len(), 1);
        assert!((extrema[0] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn cubicbez_bounding_box() {
        let tol = Tolerance::default();
        let bbox = arch().bounding_box(&tol);
        assert_eq!(bbox.x0, 0.0);
        assert_eq!(bbox.x1, 4.0);
        assert_eq!(bbox.y0, 0.0);
        assert!((bbox.y1 - 1.5).abs() < 1e-6, "{bbox:?}");

        let scenario = CubicBez::new((0.0, 75.0), (50.0, 200.0), (50.0, 205.0), (100.0, 80.0));
        let bbox = scenario.bounding_box(&tol);
        assert!(bbox.y1 > 150.0 && bbox.y1 < 205.0);
        assert!(scenario.control_box().contains_rect(&bbox));

        // A straight curve has no extrema at all.
        let flat = CubicBez::new((0.0, 1.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0));
        assert_eq!(flat.bounding_box(&tol), Rect::new(0.0, 1.0, 3.0, 1.0));
    }

    #[test]
    fn cubicbez_flatness() {
        let tol = Tolerance::default();
        assert!(Line::new((0.0, 0.0), (5.0, 3.0)).to_cubic().is_flat(&tol));
        assert!(!arch().is_flat(&tol));
        let coarse = Tolerance::from_delta(2.0).unwrap();
        assert!(arch().is_flat(&coarse));
    }

    #[test]
    fn cubicbez_flatness_convergence() {
        fn flatten(c: CubicBez, tol: &Tolerance, depth: usize, out: &mut Vec<Line>) {
            if c.is_flat(tol) || depth > 32 {
                out.push(c.chord());
            } else {
                let (left, right) = c.subdivide();
                flatten(left, tol, depth + 1, out);
                flatten(right, tol, depth + 1, out);
            }
        }
        let tol = Tolerance::from_delta(1e-3).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut curves = vec![arch()];
        curves.extend((0..20).map(|_| random_curve(&mut rng)));
        for c in curves {
            let mut chords = Vec::new();
            flatten(c, &tol, 0, &mut chords);
            let approx = chords
                .iter()
                .map(|l| l.bounding_box())
                .reduce(|a, b| a.union(b))
                .unwrap();
            let exact = c.bounding_box(&Tolerance::from_precision(9));
            let bound = tol.flatness() + 1e-6;
            assert!((approx.x0 - exact.x0).abs() <= bound, "{approx:?} vs {exact:?}");
            assert!((approx.y0 - exact.y0).abs() <= bound, "{approx:?} vs {exact:?}");
            assert!((approx.x1 - exact.x1).abs() <= bound, "{approx:?} vs {exact:?}");
            assert!((approx.y1 - exact.y1).abs() <= bound, "{approx:?} vs {exact:?}");
        }
    }

    #[test]
    fn cubicbez_construction() {
        let points = arch().points();
        assert_eq!(CubicBez::from_points(&points), Ok(arch()));
        assert_eq!(
            CubicBez::from_points(&points[..3]),
            Err(SegmentError::WrongPointCount {
                expected: 4,
                found: 3
            })
        );
        let el = PathEl::CurveTo(points[1], points[2], points[3]);
        assert_eq!(CubicBez::from_start_and_element(points[0], el), Ok(arch()));
        assert_eq!(
            CubicBez::from_start_and_element(points[0], PathEl::LineTo(points[3])),
            Err(SegmentError::NotACurve)
        );
    }

    #[test]
    fn cubicbez_transforms() {
        let c = arch();
        assert_eq!(c.reversed().reversed(), c);
        assert_eq!(c.reversed().compute_point(0.25), c.compute_point(0.75));
        let moved = c.translate(Vec2::new(1.0, -1.0));
        assert_eq!(moved.p3, Point::new(5.0, -1.0));
        let affine = Affine::rotate(0.5).then_translate(Vec2::new(2.0, 3.0));
        let a = c.transform(&Transform::Affine(affine));
        assert_eq!(a, affine * c);
        assert_near(a.compute_point(0.3), affine * c.compute_point(0.3), 1e-9);
        assert_eq!(c.chord(), Line::new((0.0, 0.0), (4.0, 0.0)));
    }
}
