// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D path geometry, with a focus on finding where curves meet.
//!
//! The pathwise library builds paths out of line segments and cubic Bézier
//! segments, and finds the points where they intersect: between two
//! segments of any kind, or between whole paths, where a quadtree prunes
//! the pairs of segments worth testing.
//!
//! Every fuzzy comparison goes through a [`Tolerance`] passed in by the
//! caller, so one computation uses one consistent notion of "close enough".
//!
//! # Examples
//!
//! Where a curve crosses a line:
//! ```
//! use pathwise::{intersections, CubicBez, Line, Segment, Tolerance};
//!
//! let tolerance = Tolerance::default();
//! let line = Segment::Line(Line::new((0.0, 100.0), (100.0, 100.0)));
//! let curve = Segment::Curve(CubicBez::new(
//!     (0.0, 75.0),
//!     (50.0, 200.0),
//!     (50.0, 205.0),
//!     (100.0, 80.0),
//! ));
//! let points = intersections(&line, &curve, &tolerance);
//! assert_eq!(points.len(), 2);
//! assert!(points.iter().all(|p| tolerance.within(p.y, 100.0)));
//! ```
//!
//! Splitting a curve:
//! ```
//! use pathwise::{CubicBez, Point};
//!
//! let arch = CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0));
//! let (left, right) = arch.split(0.5);
//! assert_eq!(left.p3, Point::new(2.0, 1.5));
//! assert_eq!(right.p0, left.p3);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. The crate uses the `alloc` crate regardless.
//!
//! Diagnostics go through the [`log`] facade; install any logger to see
//! them.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("pathwise requires either the `std` or `libm` feature");

extern crate alloc;

mod affine;
mod bezpath;
pub mod common;
mod cubicbez;
mod graph;
mod intersect;
mod line;
mod path_intersect;
mod point;
mod quadtree;
mod rect;
mod segment;
mod tolerance;
mod vec2;

pub use crate::affine::*;
pub use crate::bezpath::*;
pub use crate::cubicbez::*;
pub use crate::graph::*;
pub use crate::intersect::*;
pub use crate::line::*;
pub use crate::path_intersect::*;
pub use crate::point::*;
pub use crate::quadtree::*;
pub use crate::rect::*;
pub use crate::segment::*;
pub use crate::tolerance::*;
pub use crate::vec2::*;
