//! Copies and duals of embedded graphs.
//!
//! Both algorithms run in two steps. First every record of the source graph
//! gets a counterpart in the target, and the old→new keys are recorded in a
//! replica table. Then every counterpart is wired by translating the source
//! record's references through that table. The table lives only for the
//! duration of one call; nothing is stored on the records themselves.
//!
//! In the dual, primal faces become vertices and primal vertices become faces.
//! A primal half-edge `h` becomes `h*` leaving the dual vertex of `face(h)`
//! and bounding the dual face of `origin(mate(h))`. Each dual face boundary is
//! stitched from the rotation of half-edges around its primal vertex.
//!
//! # Examples
//!
//! ```rust
//! use planar_topology::prelude::*;
//!
//! let mut graph: Graph<&str, (), u8> = Graph::new();
//! let seed = graph.make_vertex_face().unwrap();
//! let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
//! graph.set_vertex_data(v0, "pole");
//! graph.set_face_data(f0, 7);
//! graph.make_edge_vertex(f0, v0).unwrap();
//!
//! let dual = graph.dual_copy().unwrap();
//! assert_eq!(dual.number_of_vertices(), graph.number_of_faces());
//! assert_eq!(dual.number_of_faces(), graph.number_of_vertices());
//! assert!(dual.vertices().all(|v| dual.vertex_data(v) == Some(&7)));
//! assert!(dual.is_valid().is_ok());
//! ```

#![forbid(unsafe_code)]

use crate::core::{
    collections::{EdgeSecondaryMap, FaceSecondaryMap, VertexSecondaryMap},
    face::Face,
    graph::{EdgeKey, FaceKey, Graph, GraphError, VertexKey},
    half_edge::{EdgePair, HalfEdge, HalfEdgeHandle},
    traits::{GraphRecord, RecordFactory},
    vertex::Vertex,
};
use slotmap::Key;

/// Old→new key table of one copy.
///
/// `VK` is the key type the source vertices map to and `FK` the key type the
/// source faces map to: `(VertexKey, FaceKey)` for a copy, `(FaceKey,
/// VertexKey)` for a dual.
struct ReplicaMap<VK: Key, FK: Key> {
    vertices: VertexSecondaryMap<VK>,
    edges: EdgeSecondaryMap<EdgeKey>,
    faces: FaceSecondaryMap<FK>,
}

impl<VK: Key, FK: Key> ReplicaMap<VK, FK> {
    fn with_capacity(vertices: usize, edges: usize, faces: usize) -> Self {
        Self {
            vertices: VertexSecondaryMap::with_capacity(vertices),
            edges: EdgeSecondaryMap::with_capacity(edges),
            faces: FaceSecondaryMap::with_capacity(faces),
        }
    }

    fn vertex(&self, vertex: VertexKey) -> Result<VK, GraphError> {
        self.vertices.get(vertex).copied().ok_or_else(|| {
            GraphError::MissingRecord {
                message: format!("no replica for vertex {vertex:?}"),
            }
            .logged()
        })
    }

    fn face(&self, face: FaceKey) -> Result<FK, GraphError> {
        self.faces.get(face).copied().ok_or_else(|| {
            GraphError::MissingRecord {
                message: format!("no replica for face {face:?}"),
            }
            .logged()
        })
    }

    /// The replica of `edge`, with the same orientation.
    fn half(&self, edge: HalfEdgeHandle) -> Result<HalfEdgeHandle, GraphError> {
        self.edges
            .get(edge.edge())
            .map(|&key| HalfEdgeHandle::new(key, edge.orientation()))
            .ok_or_else(|| {
                GraphError::MissingRecord {
                    message: format!("no replica for edge {edge:?}"),
                }
                .logged()
            })
    }
}

impl<V, E, F, M> Graph<V, E, F, M> {
    fn check_seed<V2, E2, F2, M2>(seed: &Graph<V2, E2, F2, M2>) -> Result<(), GraphError> {
        if seed.is_empty() {
            Ok(())
        } else {
            Err(GraphError::SeedNotEmpty {
                vertices: seed.number_of_vertices(),
                edges: seed.number_of_edges(),
                faces: seed.number_of_faces(),
            })
        }
    }

    /// Allocates one target edge pair per source edge pair, with detached halves.
    fn replicate_edges<V2, E2, F2, M2>(
        &self,
        target: &mut Graph<V2, E2, F2, M2>,
        edges: &mut EdgeSecondaryMap<EdgeKey>,
        mut payload: impl FnMut(&mut M2, &E) -> E2,
    ) {
        for (key, pair) in &self.edges {
            let data = payload(&mut target.factory, pair.data());
            let replica = target.edges.insert_with_key(|replica| {
                let forward = HalfEdgeHandle::forward(replica);
                EdgePair::new(
                    HalfEdge::detached(forward),
                    HalfEdge::detached(forward.mate()),
                    data,
                )
            });
            edges.insert(key, replica);
        }
    }

    fn replicate_into<V2, E2, F2, M2>(
        &self,
        target: &mut Graph<V2, E2, F2, M2>,
        mut vertex_payload: impl FnMut(&mut M2, &V) -> V2,
        edge_payload: impl FnMut(&mut M2, &E) -> E2,
        mut face_payload: impl FnMut(&mut M2, &F) -> F2,
    ) -> Result<(), GraphError> {
        let mut map: ReplicaMap<VertexKey, FaceKey> = ReplicaMap::with_capacity(
            self.number_of_vertices(),
            self.number_of_edges(),
            self.number_of_faces(),
        );

        for (key, vertex) in &self.vertices {
            let data = vertex_payload(&mut target.factory, vertex.data());
            map.vertices
                .insert(key, target.vertices.insert(Vertex::new(None, data)));
        }
        for (key, face) in &self.faces {
            let data = face_payload(&mut target.factory, face.data());
            map.faces
                .insert(key, target.faces.insert(Face::new(None, data)));
        }
        self.replicate_edges(target, &mut map.edges, edge_payload);

        for (key, vertex) in &self.vertices {
            let first = vertex.first_edge.map(|h| map.half(h)).transpose()?;
            target.set_vertex_first(map.vertex(key)?, first)?;
        }
        for (key, face) in &self.faces {
            let first = face.first_edge.map(|h| map.half(h)).transpose()?;
            target.set_face_first(map.face(key)?, first)?;
        }
        for edge in self.half_edges() {
            let source = self
                .half_edge(edge)
                .copied()
                .ok_or_else(|| GraphError::missing_half(edge))?;
            let wired = HalfEdge {
                origin: map.vertex(source.origin)?,
                face: map.face(source.face)?,
                next: map.half(source.next)?,
                prev: map.half(source.prev)?,
            };
            let replica = map.half(edge)?;
            *target
                .half_edge_mut(replica)
                .ok_or_else(|| GraphError::missing_half(replica))? = wired;
        }

        target.bump_generation();
        tracing::debug!(
            vertices = target.number_of_vertices(),
            edges = target.number_of_edges(),
            faces = target.number_of_faces(),
            "copied graph"
        );
        Ok(())
    }

    fn dualize_into<V2, E2, F2, M2>(
        &self,
        target: &mut Graph<V2, E2, F2, M2>,
        mut vertex_payload: impl FnMut(&mut M2, &F) -> V2,
        edge_payload: impl FnMut(&mut M2, &E) -> E2,
        mut face_payload: impl FnMut(&mut M2, &V) -> F2,
    ) -> Result<(), GraphError> {
        let mut map: ReplicaMap<FaceKey, VertexKey> = ReplicaMap::with_capacity(
            self.number_of_vertices(),
            self.number_of_edges(),
            self.number_of_faces(),
        );

        for (key, face) in &self.faces {
            let data = vertex_payload(&mut target.factory, face.data());
            map.faces
                .insert(key, target.vertices.insert(Vertex::new(None, data)));
        }
        for (key, vertex) in &self.vertices {
            let data = face_payload(&mut target.factory, vertex.data());
            map.vertices
                .insert(key, target.faces.insert(Face::new(None, data)));
        }
        self.replicate_edges(target, &mut map.edges, edge_payload);

        for (key, face) in &self.faces {
            let first = face.first_edge.map(|h| map.half(h)).transpose()?;
            target.set_vertex_first(map.face(key)?, first)?;
        }
        for (key, vertex) in &self.vertices {
            let first = vertex
                .first_edge
                .map(|h| map.half(h.mate()))
                .transpose()?;
            target.set_face_first(map.vertex(key)?, first)?;
        }
        for edge in self.half_edges() {
            let source = self
                .half_edge(edge)
                .copied()
                .ok_or_else(|| GraphError::missing_half(edge))?;
            let destination = self
                .origin(edge.mate())
                .ok_or_else(|| GraphError::missing_half(edge.mate()))?;
            let origin = map.face(source.face)?;
            let face = map.vertex(destination)?;
            let replica = map.half(edge)?;
            let record = target
                .half_edge_mut(replica)
                .ok_or_else(|| GraphError::missing_half(replica))?;
            record.origin = origin;
            record.face = face;
        }

        // Consecutive half-edges around a primal vertex give consecutive
        // half-edges on the boundary of its dual face.
        for vertex in self.vertices() {
            let rotation: Vec<HalfEdgeHandle> = self.vertex_edge_cycle(vertex).collect();
            for (index, &leaving) in rotation.iter().enumerate() {
                let following = rotation[(index + 1) % rotation.len()];
                target.link(map.half(leaving.mate())?, map.half(following.mate())?)?;
            }
        }

        target.bump_generation();
        tracing::debug!(
            vertices = target.number_of_vertices(),
            edges = target.number_of_edges(),
            faces = target.number_of_faces(),
            "built dual graph"
        );
        Ok(())
    }

    /// Returns an isomorphic copy with fresh keys and cloned payloads.
    ///
    /// The copy uses a clone of this graph's factory.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`GraphError::MissingRecord`] if this graph holds a
    /// reference to a record it does not store.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::prelude::*;
    ///
    /// let mut graph: Graph<u32, (), ()> = Graph::new();
    /// let seed = graph.make_vertex_face().unwrap();
    /// graph.set_vertex_data(seed.vertex.unwrap(), 42);
    ///
    /// let copy = graph.copy().unwrap();
    /// let vertex = copy.vertices().next().unwrap();
    /// assert_eq!(copy.vertex_data(vertex), Some(&42));
    /// assert_eq!(copy.number_of_faces(), 1);
    /// ```
    pub fn copy(&self) -> Result<Self, GraphError>
    where
        V: Clone,
        E: Clone,
        F: Clone,
        M: Clone,
    {
        let mut target = Self::with_factory(self.factory.clone());
        self.replicate_into(
            &mut target,
            |_, data| data.clone(),
            |_, data| data.clone(),
            |_, data| data.clone(),
        )?;
        Ok(target)
    }

    /// Fills the empty graph `seed` with a copy of this graph's topology.
    ///
    /// Payloads of the new records come from `seed`'s own factory, so the seed
    /// may use entirely different payload types.
    ///
    /// # Errors
    ///
    /// - [`GraphError::SeedNotEmpty`] if `seed` already holds records; it is
    ///   left untouched
    /// - a fatal [`GraphError::MissingRecord`] if this graph holds a dangling
    ///   reference
    pub fn copy_into<V2, E2, F2, M2>(
        &self,
        seed: &mut Graph<V2, E2, F2, M2>,
    ) -> Result<(), GraphError>
    where
        M2: RecordFactory<V2, E2, F2>,
    {
        Self::check_seed(seed)?;
        self.replicate_into(
            seed,
            |factory, _| factory.new_vertex(),
            |factory, _| factory.new_edge(),
            |factory, _| factory.new_face(),
        )
    }

    /// Returns the dual graph with cloned payloads.
    ///
    /// Face payloads move onto the dual vertices and vertex payloads onto the
    /// dual faces; edge payloads stay on their edges.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`GraphError`] if this graph holds a dangling reference.
    pub fn dual_copy(&self) -> Result<Graph<F, E, V>, GraphError>
    where
        V: Clone,
        E: Clone,
        F: Clone,
    {
        let mut target = Graph::new();
        self.dualize_into(
            &mut target,
            |_, data| data.clone(),
            |_, data| data.clone(),
            |_, data| data.clone(),
        )?;
        Ok(target)
    }

    /// Fills the empty graph `seed` with the dual of this graph.
    ///
    /// Payloads of the new records come from `seed`'s factory.
    ///
    /// # Errors
    ///
    /// - [`GraphError::SeedNotEmpty`] if `seed` already holds records
    /// - a fatal [`GraphError`] if this graph holds a dangling reference
    pub fn dual_copy_into<V2, E2, F2, M2>(
        &self,
        seed: &mut Graph<V2, E2, F2, M2>,
    ) -> Result<(), GraphError>
    where
        M2: RecordFactory<V2, E2, F2>,
    {
        Self::check_seed(seed)?;
        self.dualize_into(
            seed,
            |factory, _| factory.new_vertex(),
            |factory, _| factory.new_edge(),
            |factory, _| factory.new_face(),
        )
    }
}
