//! Triangle statistics over edge streams
//!
//! This module estimates the transitivity and triangle count of a graph that
//! is only ever seen as a stream of edges. Memory is bounded by two fixed
//! reservoirs regardless of how many edges the stream carries.
//!
//! # Algorithms
//!
//! - [`StreamingTriangles`]: edge and wedge reservoir sampling
//!
//! # Example
//!
//! ```
//! use streamtri::graph::StreamingTriangles;
//! use streamtri::traits::TriangleSketch;
//!
//! let mut st = StreamingTriangles::with_seed(100, 100, 42).unwrap();
//!
//! // a small clique streamed edge by edge
//! for u in 0..20u64 {
//!     for v in (u + 1)..20 {
//!         st.insert(u, v).unwrap();
//!     }
//! }
//!
//! println!("transitivity: ~{}", st.transitivity());
//! println!("triangles: ~{}", st.triangle_count());
//! ```

mod edge;
mod streaming_triangles;

pub use edge::{Edge, NodeId, Wedge};
pub use streaming_triangles::{Diagnostics, StreamingTriangles, TriangleFormula, WedgeSlot};
