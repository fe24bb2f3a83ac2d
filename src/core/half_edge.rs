//! Half-edges and the edge pairs that own them.
//!
//! Every undirected edge of the graph is stored once, as an [`EdgePair`] holding
//! its two oppositely directed [`HalfEdge`]s and the payload both halves share.
//! Callers address a single half through a [`HalfEdgeHandle`]: the key of the
//! owning edge pair plus an [`Orientation`]. Handles are `Copy`, hashable and
//! ordered, and the mate of a handle is obtained without touching the graph.
//!
//! ## Link discipline
//!
//! A half-edge `h` stores its origin vertex, the face on its left, and the
//! `next`/`prev` half-edges walking counter-clockwise around that face. Links
//! are kept *direction-exact*: `next(h)` always originates at the destination
//! of `h`, and `prev(h)` always ends at the origin of `h`. Rotating around a
//! vertex is therefore `h -> mate(prev(h))` without any re-anchoring.

use crate::core::graph::{EdgeKey, FaceKey, VertexKey};
use crate::core::traits::GraphRecord;
use serde::{Deserialize, Serialize};
use slotmap::Key;

/// Which half of an edge pair a handle designates.
///
/// `Forward` is the half returned by the operator that created the edge;
/// `Reverse` is its mate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    /// The half returned when the edge was created.
    Forward,
    /// The mate of the forward half.
    Reverse,
}

impl Orientation {
    /// Returns the opposite orientation.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Reverse => 1,
        }
    }
}

/// Handle to one directed half of an edge.
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
///
/// let mut graph: Graph = Graph::new();
/// let seed = graph.make_vertex_face().unwrap();
/// let spur = graph
///     .make_edge_vertex(seed.face.unwrap(), seed.vertex.unwrap())
///     .unwrap();
/// let half = spur.edge.unwrap();
///
/// assert_eq!(half.mate().mate(), half);
/// assert!(half.same_edge(half.mate()));
/// assert_eq!(half.orientation(), Orientation::Forward);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HalfEdgeHandle {
    edge: EdgeKey,
    orientation: Orientation,
}

impl HalfEdgeHandle {
    /// Creates a handle to the given half of an edge pair.
    #[inline]
    #[must_use]
    pub const fn new(edge: EdgeKey, orientation: Orientation) -> Self {
        Self { edge, orientation }
    }

    /// Handle to the forward half of `edge`.
    #[inline]
    #[must_use]
    pub const fn forward(edge: EdgeKey) -> Self {
        Self::new(edge, Orientation::Forward)
    }

    /// Key of the edge pair owning this half.
    #[inline]
    #[must_use]
    pub const fn edge(self) -> EdgeKey {
        self.edge
    }

    /// Orientation of this half within its edge pair.
    #[inline]
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        self.orientation
    }

    /// The oppositely directed half of the same edge.
    #[inline]
    #[must_use]
    pub const fn mate(self) -> Self {
        Self {
            edge: self.edge,
            orientation: self.orientation.flipped(),
        }
    }

    /// Returns `true` if both handles designate halves of the same edge pair,
    /// regardless of direction.
    #[inline]
    #[must_use]
    pub fn same_edge(self, other: Self) -> bool {
        self.edge == other.edge
    }
}

impl From<EdgeKey> for HalfEdgeHandle {
    #[inline]
    fn from(edge: EdgeKey) -> Self {
        Self::forward(edge)
    }
}

/// One directed half of an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfEdge {
    pub(crate) origin: VertexKey,
    pub(crate) face: FaceKey,
    pub(crate) next: HalfEdgeHandle,
    pub(crate) prev: HalfEdgeHandle,
}

impl HalfEdge {
    /// A half-edge with null endpoints whose links point back at itself.
    ///
    /// Used while a copy allocates every record before wiring any of them.
    pub(crate) fn detached(at: HalfEdgeHandle) -> Self {
        Self {
            origin: VertexKey::null(),
            face: FaceKey::null(),
            next: at,
            prev: at,
        }
    }

    /// The vertex this half emanates from.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> VertexKey {
        self.origin
    }

    /// The face on the left of this half.
    #[inline]
    #[must_use]
    pub const fn face(&self) -> FaceKey {
        self.face
    }
}

/// The two mated halves of an edge and their shared payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgePair<E> {
    halves: [HalfEdge; 2],
    data: E,
}

impl<E> EdgePair<E> {
    pub(crate) const fn new(forward: HalfEdge, reverse: HalfEdge, data: E) -> Self {
        Self {
            halves: [forward, reverse],
            data,
        }
    }

    /// The half with the given orientation.
    #[inline]
    #[must_use]
    pub const fn half(&self, orientation: Orientation) -> &HalfEdge {
        &self.halves[orientation.index()]
    }

    #[inline]
    pub(crate) const fn half_mut(&mut self, orientation: Orientation) -> &mut HalfEdge {
        &mut self.halves[orientation.index()]
    }

    /// Consumes the pair, returning its payload.
    #[inline]
    pub(crate) fn into_data(self) -> E {
        self.data
    }
}

impl<E> GraphRecord for EdgePair<E> {
    type Data = E;

    #[inline]
    fn data(&self) -> &E {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut E {
        &mut self.data
    }
}
