// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A quadtree over the edges of several graphs, used to find the pairs of
//! edges from different graphs that might intersect.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::{intersections, Edge, EdgeRef, Graph, Rect, Segment, Tolerance};

/// The depth at which quadtree nodes stop splitting.
pub const MAX_QUADTREE_DEPTH: usize = 10;

/// One node of a quadtree, owning its subtree.
#[derive(Clone, Debug)]
pub struct Quadtree {
    extent: Rect,
    edges: Vec<EdgeRef>,
    depth: usize,
    children: Option<Box<[Quadtree; 4]>>,
}

impl Quadtree {
    /// Build a quadtree over all the edges of `graphs`.
    ///
    /// Graphs are addressed by their position in the slice.
    pub fn new(graphs: &[Graph], tolerance: &Tolerance) -> Quadtree {
        let delta = tolerance.delta();
        let extent = graphs
            .iter()
            .filter_map(|graph| graph.bounding_box(tolerance))
            .reduce(|a, b| a.union(b))
            .map(|rect| rect.inflate(delta, delta))
            .unwrap_or_default();
        let edges = graphs
            .iter()
            .enumerate()
            .flat_map(|(graph, g)| (0..g.len()).map(move |edge| EdgeRef { graph, edge }))
            .collect();
        Quadtree::build(graphs, extent, edges, 0, tolerance)
    }

    fn build(
        graphs: &[Graph],
        extent: Rect,
        edges: Vec<EdgeRef>,
        depth: usize,
        tolerance: &Tolerance,
    ) -> Quadtree {
        let mut node = Quadtree {
            extent,
            edges,
            depth,
            children: None,
        };
        if node.stops_splitting() {
            return node;
        }
        log::trace!("splitting quadtree node at depth {depth} with {} edges", node.edges.len());
        let delta = tolerance.delta();
        let children = extent.quadrants().map(|quadrant| {
            let quadrant = quadrant.inflate(delta, delta);
            let edges = node
                .edges
                .iter()
                .copied()
                .filter(|&r| {
                    resolve(graphs, r).is_some_and(|e| covers(&quadrant, &e.segment, tolerance))
                })
                .collect();
            Quadtree::build(graphs, quadrant, edges, depth + 1, tolerance)
        });
        node.children = Some(Box::new(children));
        node
    }

    /// Whether this node can't hold a pair of edges worth splitting for.
    fn stops_splitting(&self) -> bool {
        if self.depth >= MAX_QUADTREE_DEPTH || self.edges.len() <= 1 {
            return true;
        }
        let mut per_graph = BTreeMap::new();
        for r in &self.edges {
            *per_graph.entry(r.graph).or_insert(0usize) += 1;
        }
        per_graph.len() == 1 || per_graph.values().all(|&count| count == 1)
    }

    /// The region this node covers.
    #[inline]
    pub fn extent(&self) -> Rect {
        self.extent
    }

    /// The edges that reach into this node's region.
    #[inline]
    pub fn edges(&self) -> &[EdgeRef] {
        &self.edges
    }

    /// The depth of this node; the root is at depth zero.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The four quadrants, unless this is a leaf.
    #[inline]
    pub fn children(&self) -> Option<&[Quadtree; 4]> {
        self.children.as_deref()
    }

    /// Whether this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// All the leaves under this node.
    pub fn leaves(&self) -> Vec<&Quadtree> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Quadtree>) {
        match &self.children {
            Some(children) => children.iter().for_each(|child| child.collect_leaves(leaves)),
            None => leaves.push(self),
        }
    }

    /// Every pair of edges from different graphs sharing a leaf.
    ///
    /// Each pair is ordered with the lower reference first, and appears
    /// once however many leaves it shares.
    pub fn candidate_pairs(&self) -> BTreeSet<(EdgeRef, EdgeRef)> {
        let mut pairs = BTreeSet::new();
        for leaf in self.leaves() {
            for (i, &a) in leaf.edges.iter().enumerate() {
                for &b in &leaf.edges[i + 1..] {
                    if a.graph != b.graph {
                        pairs.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        pairs
    }
}

/// Look up the edge a reference points to.
pub(crate) fn resolve(graphs: &[Graph], r: EdgeRef) -> Option<&Edge> {
    graphs.get(r.graph)?.edge(r.edge)
}

/// Whether a segment reaches into a region: its bounding box lies inside
/// it, or overlaps it with the segment crossing one of its borders.
fn covers(region: &Rect, segment: &Segment, tolerance: &Tolerance) -> bool {
    let bbox = segment.bounding_box(tolerance);
    if region.contains_rect(&bbox) {
        return true;
    }
    region.overlaps(&bbox)
        && region
            .edges()
            .iter()
            .any(|border| !intersections(segment, &Segment::Line(*border), tolerance).is_empty())
}

#[cfg(test)]
mod tests {
    use crate::{BezPath, EdgeRef, Graph, Quadtree, Tolerance, MAX_QUADTREE_DEPTH};

    fn square(x: f64, y: f64, size: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x + size, y));
        path.line_to((x + size, y + size));
        path.line_to((x, y + size));
        path.close_path();
        path
    }

    fn graphs(paths: &[BezPath]) -> Vec<Graph> {
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| Graph::new(i, path))
            .collect()
    }

    #[test]
    fn single_graph_is_a_leaf() {
        let tol = Tolerance::default();
        let graphs = graphs(&[square(0.0, 0.0, 1.0)]);
        let tree = Quadtree::new(&graphs, &tol);
        assert!(tree.is_leaf());
        assert_eq!(tree.edges().len(), 4);
        assert!(tree.candidate_pairs().is_empty());
    }

    #[test]
    fn distant_paths_are_pruned() {
        let tol = Tolerance::default();
        let graphs = graphs(&[square(0.0, 0.0, 1.0), square(10.0, 10.0, 1.0)]);
        let tree = Quadtree::new(&graphs, &tol);
        assert!(!tree.is_leaf());
        assert_eq!(tree.depth(), 0);
        assert!(tree.extent().contains_rect(&crate::Rect::new(0.0, 0.0, 11.0, 11.0)));
        assert!(tree.candidate_pairs().is_empty());
    }

    #[test]
    fn overlapping_squares_pair_up() {
        let tol = Tolerance::default();
        let graphs = graphs(&[square(0.0, 0.0, 1.0), square(0.5, 0.5, 1.0)]);
        let tree = Quadtree::new(&graphs, &tol);
        let pairs = tree.candidate_pairs();
        // Right edge of the first against bottom edge of the second, and
        // top edge of the first against left edge of the second.
        let right = EdgeRef { graph: 0, edge: 1 };
        let top = EdgeRef { graph: 0, edge: 2 };
        let bottom = EdgeRef { graph: 1, edge: 0 };
        let left = EdgeRef { graph: 1, edge: 3 };
        assert!(pairs.contains(&(right, bottom)));
        assert!(pairs.contains(&(top, left)));
        assert!(pairs.iter().all(|(a, b)| a.graph == 0 && b.graph == 1));
        for leaf in tree.leaves() {
            assert!(leaf.depth() <= MAX_QUADTREE_DEPTH);
        }
    }
}
