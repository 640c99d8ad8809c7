//! # Streamtri
//!
//! One-pass estimation of graph transitivity and triangle counts.
//!
//! Streamtri watches a graph go by as a stream of edges and keeps running
//! estimates of its global clustering coefficient and triangle count, using
//! memory bounded by two fixed-size reservoirs rather than by the graph.
//!
//! ## Features
//!
//! - **Edge Reservoir**: Uniform sample of the edges seen (Algorithm R)
//! - **Wedge Reservoir**: Weighted sample of wedges formed inside the edge sample
//! - **Running Estimates**: Transitivity and triangle count after every sampled edge
//! - **Reproducible**: Any seedable or hand-written `rand` generator drives the sampling
//!
//! ## Quick Start
//!
//! ```rust
//! use streamtri::prelude::*;
//!
//! let mut st = StreamingTriangles::new(100, 100).unwrap();
//! for (u, v) in [(1, 2), (2, 3), (1, 3), (3, 4)] {
//!     st.insert(u, v).unwrap();
//! }
//! println!("Transitivity: ~{}", st.transitivity());
//! println!("Triangles: ~{}", st.triangle_count());
//! ```
//!
//! ## Reading Edge Lists
//!
//! With the `std` feature, [`io::EdgeListReader`] streams SNAP-style edge list
//! files straight into a sketch:
//!
//! ```rust
//! use streamtri::io::EdgeListReader;
//! use streamtri::prelude::*;
//!
//! let data = "# toy graph\n1 2\n2 3\n1 3\n";
//! let mut st = StreamingTriangles::new(10, 10).unwrap();
//!
//! for edge in EdgeListReader::new(data.as_bytes()) {
//!     st.push(edge.unwrap());
//! }
//! assert_eq!(st.count(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support and the edge list reader
//! - `serde`: Serialization of edges, wedges and estimate snapshots
//! - `cli`: The `streamtri` command-line binary

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

pub mod graph;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod io;

mod math;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::graph::{Edge, StreamingTriangles, TriangleFormula, Wedge};
}

pub use graph::StreamingTriangles;
