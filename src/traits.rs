//! Core traits for streaming graph sketches
//!
//! Every sketch implements the base [`Sketch`] trait. Sketches that estimate
//! triangle statistics additionally implement [`TriangleSketch`].

use core::fmt::Debug;

use crate::graph::NodeId;

/// Error raised when a sketch is constructed with an unusable configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Edge reservoir capacity must be at least one
    ZeroEdgeCapacity,
    /// Wedge reservoir capacity must be at least one
    ZeroWedgeCapacity,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroEdgeCapacity => write!(f, "edge reservoir capacity must be positive"),
            ConfigError::ZeroWedgeCapacity => {
                write!(f, "wedge reservoir capacity must be positive")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Error raised when an incoming stream element is rejected
///
/// A rejected element never changes sketch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Both endpoints of the edge are the same node
    SelfLoop { node: NodeId },
    /// The stream index is not exactly one past the last observed index
    OutOfSequence { expected: u64, found: u64 },
}

impl core::fmt::Display for StreamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamError::SelfLoop { node } => write!(f, "self-loop on node {}", node),
            StreamError::OutOfSequence { expected, found } => {
                write!(f, "stream index out of sequence: expected {}, found {}", expected, found)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StreamError {}

/// Point-in-time snapshot of the triangle estimates
///
/// Snapshots are only taken once an update has fully completed, so a
/// snapshot never reflects a partially applied edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Estimates {
    /// Estimated transitivity (global clustering coefficient)
    pub transitivity: f64,
    /// Estimated number of triangles
    pub triangle_count: f64,
}

impl Estimates {
    /// Create a new snapshot
    pub fn new(transitivity: f64, triangle_count: f64) -> Self {
        Self {
            transitivity,
            triangle_count,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Estimates {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Estimates", 2)?;
        state.serialize_field("transitivity", &self.transitivity)?;
        state.serialize_field("triangle_count", &self.triangle_count)?;
        state.end()
    }
}

/// Core trait for all streaming sketches
pub trait Sketch: Clone + Debug {
    /// The type of item this sketch processes
    type Item: ?Sized;

    /// Add an item to the sketch
    fn update(&mut self, item: &Self::Item);

    /// Memory usage in bytes
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if sketch is empty
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Triangle statistics estimated from an edge stream
pub trait TriangleSketch: Sketch {
    /// Estimated transitivity (global clustering coefficient)
    fn transitivity(&self) -> f64;

    /// Estimated number of triangles in the graph seen so far
    fn triangle_count(&self) -> f64;

    /// Both estimates as one snapshot
    fn estimates(&self) -> Estimates {
        Estimates::new(self.transitivity(), self.triangle_count())
    }
}
