//! Vertices of an embedded graph and the cycles around them.
//!
//! This module provides the [`Vertex`] record and two lazy traversals:
//!
//! - [`VertexEdgeCycle`]: the half-edges leaving a vertex, in rotation order
//! - [`VertexFaceCycle`]: the distinct faces met along that rotation
//!
//! Both are obtained from the graph ([`Graph::vertex_edge_cycle`] and
//! [`Graph::vertex_face_cycle`]), borrow it immutably, and are `Clone` so a
//! walk can be restarted from the same position.
//!
//! # Examples
//!
//! ```rust
//! use planar_topology::prelude::*;
//!
//! let mut graph: Graph = Graph::new();
//! let seed = graph.make_vertex_face().unwrap();
//! let (hub, face) = (seed.vertex.unwrap(), seed.face.unwrap());
//! for _ in 0..3 {
//!     graph.make_edge_vertex(face, hub).unwrap();
//! }
//!
//! assert_eq!(graph.vertex_edge_cycle(hub).count(), 3);
//! assert_eq!(graph.vertex_face_cycle(hub).collect::<Vec<_>>(), vec![face]);
//! ```

#![forbid(unsafe_code)]

use super::{
    collections::{SmallBuffer, StorageMap, TYPICAL_CYCLE_SIZE},
    graph::{EdgeKey, FaceKey, Graph, VertexKey},
    half_edge::{EdgePair, HalfEdge, HalfEdgeHandle},
    traits::GraphRecord,
};
use serde::{Deserialize, Serialize};

/// A vertex record.
///
/// `first_edge` is some half-edge leaving the vertex; it is `None` only for the
/// isolated vertex of a seed graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vertex<V> {
    pub(crate) first_edge: Option<HalfEdgeHandle>,
    data: V,
}

impl<V> Vertex<V> {
    pub(crate) const fn new(first_edge: Option<HalfEdgeHandle>, data: V) -> Self {
        Self { first_edge, data }
    }

    /// Some half-edge leaving this vertex, if it has any.
    #[inline]
    #[must_use]
    pub const fn first_edge(&self) -> Option<HalfEdgeHandle> {
        self.first_edge
    }

    pub(crate) fn into_data(self) -> V {
        self.data
    }
}

impl<V> GraphRecord for Vertex<V> {
    type Data = V;

    #[inline]
    fn data(&self) -> &V {
        &self.data
    }

    #[inline]
    fn data_mut(&mut self) -> &mut V {
        &mut self.data
    }
}

#[inline]
fn lookup<E>(
    edges: &StorageMap<EdgeKey, EdgePair<E>>,
    edge: HalfEdgeHandle,
) -> Option<&HalfEdge> {
    edges
        .get(edge.edge())
        .map(|pair| pair.half(edge.orientation()))
}

// =============================================================================
// TRAVERSALS
// =============================================================================

/// Lazy iterator over the half-edges leaving a vertex.
///
/// Steps `h -> mate(prev(h))` from the vertex's first half-edge and stops when
/// the start recurs, so it yields exactly `degree` items. The walk is bounded
/// by the number of half-edges in the graph and ends early on a missing record.
pub struct VertexEdgeCycle<'g, E> {
    edges: &'g StorageMap<EdgeKey, EdgePair<E>>,
    start: Option<HalfEdgeHandle>,
    current: Option<HalfEdgeHandle>,
    remaining: usize,
}

impl<E> Clone for VertexEdgeCycle<'_, E> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges,
            start: self.start,
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<E> Iterator for VertexEdgeCycle<'_, E> {
    type Item = HalfEdgeHandle;

    fn next(&mut self) -> Option<HalfEdgeHandle> {
        let current = self.current.take()?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let half = lookup(self.edges, current)?;
        let following = half.prev.mate();
        if Some(following) != self.start {
            self.current = Some(following);
        }
        Some(current)
    }
}

/// Lazy iterator over the distinct faces around a vertex.
///
/// Faces are reported in the order they are met along the vertex's edge
/// cycle. A vertex without edges reports the single face of the seed graph.
pub struct VertexFaceCycle<'g, E> {
    rotation: VertexEdgeCycle<'g, E>,
    isolated: Option<FaceKey>,
    seen: SmallBuffer<FaceKey, TYPICAL_CYCLE_SIZE>,
}

impl<E> Clone for VertexFaceCycle<'_, E> {
    fn clone(&self) -> Self {
        Self {
            rotation: self.rotation.clone(),
            isolated: self.isolated,
            seen: self.seen.clone(),
        }
    }
}

impl<E> Iterator for VertexFaceCycle<'_, E> {
    type Item = FaceKey;

    fn next(&mut self) -> Option<FaceKey> {
        if let Some(face) = self.isolated.take() {
            return Some(face);
        }
        while let Some(edge) = self.rotation.next() {
            let Some(half) = lookup(self.rotation.edges, edge) else {
                break;
            };
            if !self.seen.contains(&half.face) {
                self.seen.push(half.face);
                return Some(half.face);
            }
        }
        None
    }
}

impl<V, E, F, M> Graph<V, E, F, M> {
    /// The first half-edge of `vertex`, re-anchored to start at `vertex`.
    pub(crate) fn anchored_first_edge(&self, vertex: VertexKey) -> Option<HalfEdgeHandle> {
        let first = self.vertices.get(vertex)?.first_edge?;
        if self.origin(first) == Some(vertex) {
            Some(first)
        } else {
            Some(first.mate())
        }
    }

    /// Iterates over the half-edges leaving `vertex` in rotation order.
    ///
    /// Missing and isolated vertices yield an empty iterator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::prelude::*;
    ///
    /// let mut graph: Graph = Graph::new();
    /// let seed = graph.make_vertex_face().unwrap();
    /// let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
    /// assert_eq!(graph.vertex_edge_cycle(v0).count(), 0);
    ///
    /// let spur = graph.make_edge_vertex(f0, v0).unwrap();
    /// let outgoing: Vec<_> = graph.vertex_edge_cycle(v0).collect();
    /// assert_eq!(outgoing, vec![spur.edge.unwrap()]);
    /// ```
    #[must_use]
    pub fn vertex_edge_cycle(&self, vertex: VertexKey) -> VertexEdgeCycle<'_, E> {
        let start = self.anchored_first_edge(vertex);
        VertexEdgeCycle {
            edges: &self.edges,
            start,
            current: start,
            remaining: self.walk_bound(),
        }
    }

    /// Iterates over the distinct faces incident to `vertex`.
    ///
    /// The isolated vertex of a seed graph yields the seed face; missing
    /// vertices yield an empty iterator.
    #[must_use]
    pub fn vertex_face_cycle(&self, vertex: VertexKey) -> VertexFaceCycle<'_, E> {
        let isolated = match self.vertices.get(vertex) {
            Some(record) if record.first_edge.is_none() => self.faces.keys().next(),
            _ => None,
        };
        VertexFaceCycle {
            rotation: self.vertex_edge_cycle(vertex),
            isolated,
            seen: SmallBuffer::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(spokes: usize) -> (Graph, VertexKey, FaceKey, Vec<VertexKey>) {
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        let (hub, face) = (seed.vertex.unwrap(), seed.face.unwrap());
        let tips = (0..spokes)
            .map(|_| graph.make_edge_vertex(face, hub).unwrap().vertex.unwrap())
            .collect();
        (graph, hub, face, tips)
    }

    #[test]
    fn test_seed_vertex_cycles() {
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());

        assert_eq!(graph.vertex_edge_cycle(v0).count(), 0);
        assert_eq!(graph.vertex_face_cycle(v0).collect::<Vec<_>>(), vec![f0]);
        assert_eq!(graph.vertex(v0).unwrap().first_edge(), None);
    }

    #[test]
    fn test_star_rotation() {
        let (graph, hub, face, tips) = star(4);

        let outgoing: Vec<_> = graph.vertex_edge_cycle(hub).collect();
        assert_eq!(outgoing.len(), 4);
        for edge in &outgoing {
            assert_eq!(graph.origin(*edge), Some(hub));
            assert!(tips.contains(&graph.destination(*edge).unwrap()));
        }
        assert_eq!(graph.vertex_face_cycle(hub).collect::<Vec<_>>(), vec![face]);

        for tip in tips {
            assert_eq!(graph.vertex_degree(tip), 1);
            assert_eq!(graph.vertex_face_cycle(tip).count(), 1);
        }
    }

    #[test]
    fn test_cycle_is_restartable() {
        let (graph, hub, _, _) = star(3);

        let mut walk = graph.vertex_edge_cycle(hub);
        let first = walk.next().unwrap();
        let rest: Vec<_> = walk.clone().collect();
        let again: Vec<_> = walk.collect();
        assert_eq!(rest, again);
        assert_eq!(rest.len(), 2);
        assert!(!rest.contains(&first));
    }

    #[test]
    fn test_triangle_vertex_sees_both_faces() {
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
        let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
        let v2 = graph.make_edge_vertex(f0, v1).unwrap().vertex.unwrap();
        let split = graph.make_edge_face(f0, v2, v0).unwrap();
        let f1 = split.face.unwrap();

        for v in [v0, v1, v2] {
            let mut faces: Vec<_> = graph.vertex_face_cycle(v).collect();
            faces.sort();
            let mut expected = vec![f0, f1];
            expected.sort();
            assert_eq!(faces, expected);
        }
    }
}
