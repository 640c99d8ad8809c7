//! Canonical edge and wedge types
//!
//! Both types are stored in sorted form, so the derived `Eq`, `Ord` and `Hash`
//! implementations are independent of the order the endpoints were given in.

use crate::traits::StreamError;

/// Node identifier
pub type NodeId = u64;

/// Undirected edge between two distinct nodes
///
/// # Example
///
/// ```
/// use streamtri::graph::Edge;
///
/// let a = Edge::new(3, 1).unwrap();
/// let b = Edge::new(1, 3).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.endpoints(), (1, 3));
///
/// assert!(Edge::new(2, 2).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    lo: NodeId,
    hi: NodeId,
}

impl Edge {
    /// Create an edge, rejecting self-loops
    pub fn new(u: NodeId, v: NodeId) -> Result<Self, StreamError> {
        match u.cmp(&v) {
            core::cmp::Ordering::Less => Ok(Self { lo: u, hi: v }),
            core::cmp::Ordering::Greater => Ok(Self { lo: v, hi: u }),
            core::cmp::Ordering::Equal => Err(StreamError::SelfLoop { node: u }),
        }
    }

    /// Endpoints in ascending order
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.lo, self.hi)
    }

    /// Check whether `node` is one of the endpoints
    pub fn touches(&self, node: NodeId) -> bool {
        self.lo == node || self.hi == node
    }

    /// The endpoint that is not `node`, if `node` is an endpoint
    pub fn opposite(&self, node: NodeId) -> Option<NodeId> {
        if node == self.lo {
            Some(self.hi)
        } else if node == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }

    /// The single endpoint shared with `other`
    ///
    /// Returns `None` when the edges are disjoint or identical, i.e. whenever
    /// the two edges together do not span exactly three nodes.
    pub fn shared_endpoint(&self, other: &Edge) -> Option<NodeId> {
        if self == other {
            return None;
        }
        if other.touches(self.lo) {
            Some(self.lo)
        } else if other.touches(self.hi) {
            Some(self.hi)
        } else {
            None
        }
    }
}

impl TryFrom<(NodeId, NodeId)> for Edge {
    type Error = StreamError;

    fn try_from((u, v): (NodeId, NodeId)) -> Result<Self, Self::Error> {
        Edge::new(u, v)
    }
}

impl core::fmt::Display for Edge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{{{}, {}}}", self.lo, self.hi)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Edge {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.lo)?;
        tuple.serialize_element(&self.hi)?;
        tuple.end()
    }
}

/// Path of length two: two edges meeting at a single center node
///
/// A wedge is *closed* by any edge that, together with the wedge's two edges,
/// spans only the wedge's three nodes: the edge joining the outer endpoints,
/// or a repeat of one of the wedge's own edges.
///
/// # Example
///
/// ```
/// use streamtri::graph::{Edge, Wedge};
///
/// let ab = Edge::new(1, 2).unwrap();
/// let bc = Edge::new(2, 3).unwrap();
/// let wedge = Wedge::new(ab, bc).unwrap();
///
/// assert_eq!(wedge.center(), 2);
/// assert!(wedge.closed_by(&Edge::new(3, 1).unwrap()));
/// assert!(wedge.closed_by(&ab));
/// assert!(!wedge.closed_by(&Edge::new(3, 4).unwrap()));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wedge {
    first: Edge,
    second: Edge,
    center: NodeId,
}

impl Wedge {
    /// Build a wedge from two edges sharing exactly one endpoint
    ///
    /// Returns `None` for disjoint or identical edges.
    pub fn new(a: Edge, b: Edge) -> Option<Self> {
        let center = a.shared_endpoint(&b)?;
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Some(Self {
            first,
            second,
            center,
        })
    }

    /// The two edges, smaller first
    pub fn edges(&self) -> (Edge, Edge) {
        (self.first, self.second)
    }

    /// The node both edges meet at
    pub fn center(&self) -> NodeId {
        self.center
    }

    /// The edge that would turn this wedge into a triangle
    pub fn closing_edge(&self) -> Edge {
        let (a, b) = self.outer_endpoints();
        // outer endpoints differ because the two edges are distinct
        Edge {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// Check whether the wedge's edges and `edge` together span exactly
    /// three nodes
    pub fn closed_by(&self, edge: &Edge) -> bool {
        *edge == self.closing_edge() || *edge == self.first || *edge == self.second
    }

    fn outer_endpoints(&self) -> (NodeId, NodeId) {
        let a = self.first.opposite(self.center).unwrap_or(self.first.lo);
        let b = self.second.opposite(self.center).unwrap_or(self.second.lo);
        (a, b)
    }
}

impl core::fmt::Display for Wedge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{{{}, {}}}", self.first, self.second)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Wedge {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.first)?;
        tuple.serialize_element(&self.second)?;
        tuple.end()
    }
}
