//! Faces of an embedded graph and their boundaries.
//!
//! A face is bounded by a single cycle of half-edges linked through `next`.
//! [`FaceEdgeCycle`] walks that cycle and [`FaceVertexCycle`] reports the
//! origin of each half-edge along it. A vertex is reported once per visit, so
//! a vertex touched twice by the boundary (for example the base of a spur)
//! appears twice.

#![forbid(unsafe_code)]

use super::{
    collections::StorageMap,
    graph::{EdgeKey, FaceKey, Graph, VertexKey},
    half_edge::{EdgePair, HalfEdgeHandle},
    traits::GraphRecord,
};
use serde::{Deserialize, Serialize};

/// A face record.
///
/// `first_edge` is some half-edge on the boundary; it is `None` only for the
/// face of a seed graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Face<F> {
    pub(crate) first_edge: Option<HalfEdgeHandle>,
    data: F,
}

impl<F> Face<F> {
    pub(crate) const fn new(first_edge: Option<HalfEdgeHandle>, data: F) -> Self {
        Self { first_edge, data }
    }

    /// Some half-edge on the boundary of this face, if it has any.
    #[inline]
    #[must_use]
    pub const fn first_edge(&self) -> Option<HalfEdgeHandle> {
        self.first_edge
    }

    pub(crate) fn into_data(self) -> F {
        self.data
    }
}

impl<F> GraphRecord for Face<F> {
    type Data = F;

    #[inline]
    fn data(&self) -> &F {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut F {
        &mut self.data
    }
}

/// Lazy iterator over the boundary half-edges of a face.
///
/// Follows `next` from the face's first half-edge until the start recurs. The
/// walk is bounded by the number of half-edges in the graph.
pub struct FaceEdgeCycle<'g, E> {
    edges: &'g StorageMap<EdgeKey, EdgePair<E>>,
    start: Option<HalfEdgeHandle>,
    current: Option<HalfEdgeHandle>,
    remaining: usize,
}

impl<E> Clone for FaceEdgeCycle<'_, E> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges,
            start: self.start,
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<E> Iterator for FaceEdgeCycle<'_, E> {
    type Item = HalfEdgeHandle;

    fn next(&mut self) -> Option<HalfEdgeHandle> {
        let current = self.current.take()?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let pair = self.edges.get(current.edge())?;
        let following = pair.half(current.orientation()).next;
        if Some(following) != self.start {
            self.current = Some(following);
        }
        Some(current)
    }
}

/// Lazy iterator over the vertices on the boundary of a face.
///
/// The seed face yields the single vertex of the seed graph.
pub struct FaceVertexCycle<'g, E> {
    boundary: FaceEdgeCycle<'g, E>,
    isolated: Option<VertexKey>,
}

impl<E> Clone for FaceVertexCycle<'_, E> {
    fn clone(&self) -> Self {
        Self {
            boundary: self.boundary.clone(),
            isolated: self.isolated,
        }
    }
}

impl<E> Iterator for FaceVertexCycle<'_, E> {
    type Item = VertexKey;

    fn next(&mut self) -> Option<VertexKey> {
        if let Some(vertex) = self.isolated.take() {
            return Some(vertex);
        }
        let edge = self.boundary.next()?;
        self.boundary
            .edges
            .get(edge.edge())
            .map(|pair| pair.half(edge.orientation()).origin())
    }
}

impl<V, E, F, M> Graph<V, E, F, M> {
    /// Iterates over the boundary half-edges of `face`.
    ///
    /// Missing faces and the seed face yield an empty iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::prelude::*;
    ///
    /// let mut graph: Graph = Graph::new();
    /// let seed = graph.make_vertex_face().unwrap();
    /// let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
    /// graph.make_edge_vertex(f0, v0).unwrap();
    ///
    /// // A lone spur is walked once in each direction.
    /// let boundary: Vec<_> = graph.face_edge_cycle(f0).collect();
    /// assert_eq!(boundary.len(), 2);
    /// assert_eq!(boundary[0].mate(), boundary[1]);
    /// ```
    #[must_use]
    pub fn face_edge_cycle(&self, face: FaceKey) -> FaceEdgeCycle<'_, E> {
        let start = self.faces.get(face).and_then(|record| record.first_edge);
        FaceEdgeCycle {
            edges: &self.edges,
            start,
            current: start,
            remaining: self.walk_bound(),
        }
    }

    /// Iterates over the origins of the boundary half-edges of `face`.
    ///
    /// The seed face yields the seed vertex; missing faces yield nothing.
    #[must_use]
    pub fn face_vertex_cycle(&self, face: FaceKey) -> FaceVertexCycle<'_, E> {
        let isolated = match self.faces.get(face) {
            Some(record) if record.first_edge.is_none() => self.vertices.keys().next(),
            _ => None,
        };
        FaceVertexCycle {
            boundary: self.face_edge_cycle(face),
            isolated,
        }
    }
}
