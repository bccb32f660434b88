// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections between whole paths.

use alloc::vec::Vec;

use crate::quadtree::resolve;
use crate::{intersections, BezPath, Graph, Point, Quadtree, Tolerance};

/// A point where two different paths meet.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathIntersection {
    /// Where the paths meet.
    pub point: Point,
    /// The indices of the two paths, lower first.
    pub paths: (usize, usize),
}

/// Find every point where segments of two different paths meet.
///
/// Crossings of a path with itself are not reported. A point found more
/// than once for the same pair of paths, such as a crossing at a vertex
/// shared by two consecutive segments, is reported once.
///
/// ```
/// use pathwise::{path_intersections, BezPath, Tolerance};
///
/// let mut a = BezPath::new();
/// a.move_to((0.0, 0.0));
/// a.line_to((2.0, 2.0));
/// let mut b = BezPath::new();
/// b.move_to((0.0, 2.0));
/// b.line_to((2.0, 0.0));
/// let found = path_intersections(&[a, b], &Tolerance::default());
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].paths, (0, 1));
/// ```
pub fn path_intersections(paths: &[BezPath], tolerance: &Tolerance) -> Vec<PathIntersection> {
    let graphs = paths
        .iter()
        .enumerate()
        .map(|(i, path)| Graph::new(i, path))
        .collect::<Vec<_>>();
    let tree = Quadtree::new(&graphs, tolerance);
    let candidates = tree.candidate_pairs();
    let mut result: Vec<PathIntersection> = Vec::new();
    for &(a, b) in &candidates {
        let (Some(ea), Some(eb)) = (resolve(&graphs, a), resolve(&graphs, b)) else {
            continue;
        };
        let pair = (a.graph, b.graph);
        for point in intersections(&ea.segment, &eb.segment, tolerance) {
            let seen = result
                .iter()
                .any(|found| found.paths == pair && found.point.approx_eq(point, tolerance));
            if !seen {
                result.push(PathIntersection { point, paths: pair });
            }
        }
    }
    log::debug!(
        "{} paths, {} edges, {} leaves, {} candidate pairs, {} intersections",
        paths.len(),
        graphs.iter().map(Graph::len).sum::<usize>(),
        tree.leaves().len(),
        candidates.len(),
        result.len()
    );
    result
}
