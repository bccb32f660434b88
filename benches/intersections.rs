// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks of segment and path intersection.

#![cfg(nightly)]
#![feature(test)]
extern crate test;
use test::{black_box, Bencher};

use pathwise::*;

fn arches() -> (CubicBez, CubicBez) {
    (
        CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0)),
        CubicBez::new((0.0, 2.0), (1.0, 0.0), (3.0, 0.0), (4.0, 2.0)),
    )
}

#[bench]
fn bench_curve_line(b: &mut Bencher) {
    let tol = Tolerance::default();
    let line = Line::new((0.0, 100.0), (100.0, 100.0));
    let curve = CubicBez::new((0.0, 75.0), (50.0, 200.0), (50.0, 205.0), (100.0, 80.0));
    b.iter(|| curve_line(black_box(&curve), black_box(&line), &tol));
}

#[bench]
fn bench_curve_curve(b: &mut Bencher) {
    let tol = Tolerance::default();
    let (a, c) = arches();
    b.iter(|| curve_curve(black_box(&a), black_box(&c), &tol));
}

#[bench]
fn bench_project_point(b: &mut Bencher) {
    let (a, _) = arches();
    b.iter(|| a.project_point(black_box(Point::new(1.0, 3.0))));
}

// A grid of overlapping squares, each crossing its neighbours.
#[bench]
fn bench_path_intersections(b: &mut Bencher) {
    let tol = Tolerance::default();
    let paths = (0..16)
        .map(|i| {
            let (x, y) = ((i % 4) as f64 * 0.75, (i / 4) as f64 * 0.75);
            let mut path = BezPath::new();
            path.move_to((x, y));
            path.line_to((x + 1.0, y));
            path.curve_to((x + 1.2, y + 0.3), (x + 1.2, y + 0.7), (x + 1.0, y + 1.0));
            path.line_to((x, y + 1.0));
            path.close_path();
            path
        })
        .collect::<Vec<_>>();
    b.iter(|| path_intersections(black_box(&paths), &tol));
}
