// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The segments of one path, linked in drawing order.

use alloc::vec::Vec;

use crate::bezpath::segments;
use crate::{BezPath, PathEl, Rect, Segment, Tolerance};

/// Identifies an edge among a set of graphs.
///
/// Ordered by graph, then by edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeRef {
    /// The index of the graph, which is also the index of its path.
    pub graph: usize,
    /// The index of the edge within the graph.
    pub edge: usize,
}

/// One segment of a path, with links to its neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// The segment itself.
    pub segment: Segment,
    /// The graph this edge belongs to.
    pub graph: usize,
    /// The position of this edge in its graph.
    pub index: usize,
    /// The edge drawn just before this one.
    pub preceding: Option<usize>,
    /// The edge drawn just after this one.
    pub following: Option<usize>,
}

impl Edge {
    /// The reference to this edge.
    #[inline]
    pub fn edge_ref(&self) -> EdgeRef {
        EdgeRef {
            graph: self.graph,
            edge: self.index,
        }
    }
}

/// The edges of one path.
///
/// Consecutive segments of a subpath are linked through
/// [`Edge::preceding`] and [`Edge::following`]. The links of a closed
/// subpath wrap around; those of an open one stop at its ends. Separate
/// subpaths are never linked.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    path_index: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Build the graph of `path`, which is path number `path_index` of the
    /// query.
    pub fn new(path_index: usize, path: &BezPath) -> Graph {
        let mut edges = Vec::new();
        for subpath in path.subpaths() {
            let first = edges.len();
            edges.extend(segments(subpath).enumerate().map(|(i, segment)| Edge {
                segment,
                graph: path_index,
                index: first + i,
                preceding: None,
                following: None,
            }));
            let last = edges.len() - 1;
            let closed = matches!(subpath.last(), Some(PathEl::ClosePath)) && last > first;
            for i in first..=last {
                edges[i].preceding = if i > first {
                    Some(i - 1)
                } else {
                    closed.then_some(last)
                };
                edges[i].following = if i < last {
                    Some(i + 1)
                } else {
                    closed.then_some(first)
                };
            }
        }
        Graph { path_index, edges }
    }

    /// The index of the path this graph was built from.
    #[inline]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// All the edges, in drawing order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edge at `index`.
    #[inline]
    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// The edge drawn before the one at `index`.
    pub fn preceding(&self, index: usize) -> Option<&Edge> {
        self.edge(index)?.preceding.and_then(|i| self.edge(i))
    }

    /// The edge drawn after the one at `index`.
    pub fn following(&self, index: usize) -> Option<&Edge> {
        self.edge(index)?.following.and_then(|i| self.edge(i))
    }

    /// The number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the path drew nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The union of the edges' bounding boxes, if there are any edges.
    pub fn bounding_box(&self, tolerance: &Tolerance) -> Option<Rect> {
        self.edges
            .iter()
            .map(|edge| edge.segment.bounding_box(tolerance))
            .reduce(|a, b| a.union(b))
    }
}
