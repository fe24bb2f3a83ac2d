//! Embedded planar graph storage.
//!
//! This module provides [`Graph`], the owner of every vertex, edge pair and face
//! of an embedded planar graph, together with the key types used to address
//! them and the errors reported by the Euler operators and by structural
//! validation.
//!
//! # Key Features
//!
//! - **Arena storage**: records live in slotmap storages; every cross-reference
//!   is a Copy key, so the cyclic half-edge web needs no reference counting
//! - **Pluggable payloads**: vertices, edges and faces carry `V`, `E` and `F`
//!   payloads created by a [`RecordFactory`](super::traits::RecordFactory)
//! - **Euler operators only**: the structure is mutated exclusively through the
//!   operators in [`crate::core::algorithms::euler_operators`], which keep
//!   `|V| - |E| + |F| = 2` for every non-empty graph
//! - **Validation**: reference, link, cycle and Euler-characteristic checks
//!   with a first-failure ([`Graph::is_valid`]) and an all-failures
//!   ([`Graph::validation_report`]) entry point
//! - **Serialization**: snapshots through serde; the factory is not serialized
//!
//! # Examples
//!
//! ```rust
//! use planar_topology::prelude::*;
//!
//! let mut graph: Graph = Graph::new();
//! let seed = graph.make_vertex_face().unwrap();
//! let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
//!
//! // Grow a triangle out of the seed.
//! let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
//! let v2 = graph.make_edge_vertex(f0, v1).unwrap().vertex.unwrap();
//! graph.make_edge_face(f0, v2, v0).unwrap();
//!
//! assert_eq!(graph.number_of_vertices(), 3);
//! assert_eq!(graph.number_of_edges(), 3);
//! assert_eq!(graph.number_of_faces(), 2);
//! assert!(graph.is_valid().is_ok());
//! ```
//!
//! # Thread Safety
//!
//! Mutators take `&mut self` and readers take `&self`, so the borrow checker
//! guarantees that one exclusive lock guards the graph and every record
//! reachable from it. `Graph` is `Send + Sync` whenever its payloads and
//! factory are; share it between threads behind a `std::sync::RwLock`.

#![forbid(unsafe_code)]

use super::{
    collections::{FastHashSet, StorageMap, fast_hash_set_with_capacity},
    face::Face,
    half_edge::{EdgePair, HalfEdge, HalfEdgeHandle},
    traits::{DefaultFactory, GraphRecord},
    vertex::Vertex,
};
use crate::topology::characteristics::euler::{
    classify_counts, count_elements, euler_characteristic, expected_chi_for,
};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

// =============================================================================
// KEY TYPES
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices in the storage map.
    ///
    /// Each `VertexKey` identifies exactly one vertex of the graph that created
    /// it and stays valid until that vertex is removed by an Euler operator.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing faces in the storage map.
    pub struct FaceKey;
}

new_key_type! {
    /// Key type for accessing edge pairs in the storage map.
    ///
    /// Individual half-edges are addressed with a
    /// [`HalfEdgeHandle`], which pairs this key with an orientation.
    pub struct EdgeKey;
}

/// A key that can be tested for membership in a [`Graph`].
///
/// Implemented for [`VertexKey`], [`FaceKey`], [`EdgeKey`] and
/// [`HalfEdgeHandle`] so that [`Graph::contains`] accepts any of them.
pub trait GraphKey: Copy {
    /// Returns `true` if the record designated by this key is stored in `graph`.
    fn is_contained_in<V, E, F, M>(self, graph: &Graph<V, E, F, M>) -> bool;
}

impl GraphKey for VertexKey {
    #[inline]
    fn is_contained_in<V, E, F, M>(self, graph: &Graph<V, E, F, M>) -> bool {
        graph.contains_vertex(self)
    }
}

impl GraphKey for FaceKey {
    #[inline]
    fn is_contained_in<V, E, F, M>(self, graph: &Graph<V, E, F, M>) -> bool {
        graph.contains_face(self)
    }
}

impl GraphKey for EdgeKey {
    #[inline]
    fn is_contained_in<V, E, F, M>(self, graph: &Graph<V, E, F, M>) -> bool {
        graph.edges.contains_key(self)
    }
}

impl GraphKey for HalfEdgeHandle {
    #[inline]
    fn is_contained_in<V, E, F, M>(self, graph: &Graph<V, E, F, M>) -> bool {
        graph.contains_edge(self)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Classification of a [`GraphError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A caller-supplied argument violates an operator precondition.
    ///
    /// The graph is left untouched and the caller may recover.
    InvalidArgument,
    /// An internal invariant of the graph has been broken.
    ///
    /// The graph can no longer be trusted; callers must not attempt recovery.
    FatalInvariant,
}

/// Errors reported by the Euler operators and copy algorithms.
///
/// Every operator checks all of its preconditions before touching the graph,
/// so an [`ErrorKind::InvalidArgument`] error guarantees the graph is exactly
/// as it was before the call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The vertex is not stored in this graph.
    #[error("Vertex {vertex:?} is not in the graph")]
    VertexNotFound {
        /// The missing vertex.
        vertex: VertexKey,
    },
    /// The face is not stored in this graph.
    #[error("Face {face:?} is not in the graph")]
    FaceNotFound {
        /// The missing face.
        face: FaceKey,
    },
    /// The half-edge is not stored in this graph.
    #[error("Edge {edge:?} is not in the graph")]
    EdgeNotFound {
        /// The missing half-edge.
        edge: HalfEdgeHandle,
    },
    /// The vertex does not lie on the boundary of the face.
    #[error("Vertex {vertex:?} is not on the boundary of face {face:?}")]
    VertexNotOnFace {
        /// The vertex that was looked up.
        vertex: VertexKey,
        /// The face whose boundary was walked.
        face: FaceKey,
    },
    /// At least one of the two vertices does not lie on the face boundary.
    #[error("Vertices {head:?} and {tail:?} are not both on the boundary of face {face:?}")]
    VerticesNotOnFace {
        /// Start vertex of the requested edge.
        head: VertexKey,
        /// End vertex of the requested edge.
        tail: VertexKey,
        /// The face that was to be split.
        face: FaceKey,
    },
    /// An edge was requested from a vertex to itself.
    #[error("Head and tail are the same vertex {vertex:?}")]
    IdenticalVertices {
        /// The repeated vertex.
        vertex: VertexKey,
    },
    /// The face has no boundary edges and cannot be split.
    #[error("Face {face:?} has no boundary to split")]
    FaceNotDivisible {
        /// The face without boundary.
        face: FaceKey,
    },
    /// The edge is not a dangling spur.
    #[error("Edge {edge:?} is not dangling")]
    EdgeNotDangling {
        /// The offending edge.
        edge: HalfEdgeHandle,
    },
    /// The edge has the same face on both sides.
    #[error("Edge {edge:?} is dangling and separates no faces")]
    EdgeIsDangling {
        /// The offending edge.
        edge: HalfEdgeHandle,
    },
    /// The edge does not border the face.
    #[error("Edge {edge:?} does not border face {face:?}")]
    EdgeNotOnFace {
        /// The offending edge.
        edge: HalfEdgeHandle,
        /// The face it was expected to border.
        face: FaceKey,
    },
    /// The edge is not incident to the vertex.
    #[error("Edge {edge:?} is not incident to vertex {vertex:?}")]
    EdgeNotIncident {
        /// The offending edge.
        edge: HalfEdgeHandle,
        /// The vertex it was expected to touch.
        vertex: VertexKey,
    },
    /// The vertex does not have the degree the operator requires.
    #[error("Vertex {vertex:?} has degree {degree}, expected {expected}")]
    InvalidVertexDegree {
        /// The offending vertex.
        vertex: VertexKey,
        /// Its actual degree.
        degree: usize,
        /// The degree the operator requires.
        expected: usize,
    },
    /// Both edges at the vertex belong to one self-loop, which cannot be merged.
    #[error("Vertex {vertex:?} carries a self-loop and cannot be merged away")]
    SelfLoopAtVertex {
        /// The offending vertex.
        vertex: VertexKey,
    },
    /// The seed graph passed to a copy already holds records.
    #[error(
        "Copy target must be empty, found {vertices} vertices, {edges} edges and {faces} faces"
    )]
    SeedNotEmpty {
        /// Number of vertices in the seed.
        vertices: usize,
        /// Number of edges in the seed.
        edges: usize,
        /// Number of faces in the seed.
        faces: usize,
    },
    /// A seed vertex and face were requested on a graph that already holds records.
    #[error(
        "Cannot create a seed in a non-empty graph ({vertices} vertices, {edges} edges, {faces} faces)"
    )]
    GraphNotEmpty {
        /// Number of vertices in the graph.
        vertices: usize,
        /// Number of edges in the graph.
        edges: usize,
        /// Number of faces in the graph.
        faces: usize,
    },
    /// The seed was to be removed from a graph that is not a lone vertex and face.
    #[error(
        "Graph is not a seed: expected 1 vertex, 0 edges and 1 face, found {vertices}, {edges} and {faces}"
    )]
    NotSeedShape {
        /// Number of vertices in the graph.
        vertices: usize,
        /// Number of edges in the graph.
        edges: usize,
        /// Number of faces in the graph.
        faces: usize,
    },
    /// A boundary or rotation walk did not close.
    #[error("Broken half-edge cycle: {message}")]
    BrokenCycle {
        /// Description of the walk that failed.
        message: String,
    },
    /// A record referenced from inside the graph is missing.
    #[error("Missing record: {message}")]
    MissingRecord {
        /// Description of the dangling reference.
        message: String,
    },
}

impl GraphError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::GraphNotEmpty { .. }
            | Self::NotSeedShape { .. }
            | Self::BrokenCycle { .. }
            | Self::MissingRecord { .. } => ErrorKind::FatalInvariant,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Returns `true` if the graph can no longer be trusted after this error.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::FatalInvariant)
    }

    /// Emits a `tracing` error event for fatal errors and passes the error on.
    pub(crate) fn logged(self) -> Self {
        if self.is_fatal() {
            tracing::error!(error = %self, "fatal graph invariant violation");
        }
        self
    }

    pub(crate) fn missing_half(edge: HalfEdgeHandle) -> Self {
        Self::MissingRecord {
            message: format!("half-edge {edge:?} is referenced but not stored"),
        }
        .logged()
    }
}

/// Represents the type of record a validation error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// A vertex record.
    Vertex,
    /// A face record.
    Face,
    /// A half-edge record.
    HalfEdge,
}

/// Errors found by structural validation of a graph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphValidationError {
    /// A record refers to another record that is not stored.
    #[error("{entity:?} reference inconsistency: {message}")]
    DanglingReference {
        /// The kind of record holding the bad reference.
        entity: EntityKind,
        /// Description of the dangling reference.
        message: String,
    },
    /// `next`/`prev` links are not mutually inverse or not direction-exact.
    #[error("Inconsistent half-edge links: {message}")]
    InconsistentLinks {
        /// Description of the link failure.
        message: String,
    },
    /// The rotation around some vertex is broken.
    #[error("Invalid vertex cycle: {message}")]
    InvalidVertexCycle {
        /// Description of the cycle failure.
        message: String,
    },
    /// The boundary of some face is broken.
    #[error("Invalid face cycle: {message}")]
    InvalidFaceCycle {
        /// Description of the cycle failure.
        message: String,
    },
    /// The element counts do not satisfy Euler's formula.
    #[error(
        "Euler characteristic mismatch: V - E + F = {chi}, expected {expected} (V={vertices}, E={edges}, F={faces})"
    )]
    EulerCharacteristic {
        /// Computed characteristic.
        chi: isize,
        /// Expected characteristic.
        expected: isize,
        /// Number of vertices.
        vertices: usize,
        /// Number of edges.
        edges: usize,
        /// Number of faces.
        faces: usize,
    },
}

/// Classifies the kind of graph invariant that failed during validation.
///
/// This is used by [`GraphValidationReport`] to group related errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvariantKind {
    /// Every stored key refers to a stored record.
    References,
    /// `next`/`prev` are inverse and direction-exact.
    Links,
    /// Every half-edge belongs to exactly one vertex rotation.
    VertexCycles,
    /// Every half-edge belongs to exactly one face boundary.
    FaceCycles,
    /// `|V| - |E| + |F| = 2` for non-empty graphs.
    EulerCharacteristic,
}

/// A single invariant violation recorded during validation diagnostics.
#[derive(Clone, Debug)]
pub struct InvariantViolation {
    /// The kind of invariant that failed.
    pub kind: InvariantKind,
    /// The detailed validation error explaining the failure.
    pub error: GraphValidationError,
}

/// Aggregate report of one or more validation failures.
///
/// This is returned by [`Graph::validation_report`] to surface all failed
/// invariants at once for debugging and test diagnostics.
#[derive(Clone, Debug)]
pub struct GraphValidationReport {
    /// The ordered list of invariant violations that occurred.
    pub violations: Vec<InvariantViolation>,
}

impl GraphValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// An embedded planar graph in half-edge form.
///
/// # Type Parameters
///
/// - `V`: payload carried by every vertex
/// - `E`: payload carried by every edge, shared by its two half-edges
/// - `F`: payload carried by every face
/// - `M`: the [`RecordFactory`](super::traits::RecordFactory) producing
///   payloads for new records
///
/// # Properties
///
/// - `vertices`: vertex records, each naming one outgoing half-edge
/// - `edges`: edge pairs, each owning two mated half-edges and one payload
/// - `faces`: face records, each naming one half-edge on its boundary
///
/// Only the seed graph (one vertex, one face, no edges) has records without a
/// first half-edge.
///
/// # Usage
///
/// ```rust
/// use planar_topology::prelude::*;
///
/// let mut graph: Graph<&str, f64, u32> = Graph::new();
/// assert!(graph.is_empty());
///
/// let seed = graph.make_vertex_face().unwrap();
/// graph.set_vertex_data(seed.vertex.unwrap(), "origin");
///
/// assert_eq!(graph.vertex_data(seed.vertex.unwrap()), Some(&"origin"));
/// assert_eq!(graph.number_of_faces(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "V: Serialize, E: Serialize, F: Serialize",
    deserialize = "V: Deserialize<'de>, E: Deserialize<'de>, F: Deserialize<'de>, M: Default"
))]
pub struct Graph<V = (), E = (), F = (), M = DefaultFactory> {
    /// Storage map for vertices.
    pub(crate) vertices: StorageMap<VertexKey, Vertex<V>>,

    /// Storage map for edge pairs.
    pub(crate) edges: StorageMap<EdgeKey, EdgePair<E>>,

    /// Storage map for faces.
    pub(crate) faces: StorageMap<FaceKey, Face<F>>,

    /// Payload factory for records created by the Euler operators.
    ///
    /// Note: Not serialized - a deserialized graph gets `M::default()`.
    #[serde(skip)]
    pub(crate) factory: M,

    /// Generation counter for invalidating caches.
    /// Incremented on every successful structural mutation so dependent
    /// caches can detect when they need to refresh.
    ///
    /// Note: Not serialized - generation is runtime-only.
    #[serde(skip)]
    generation: u64,
}

impl<V, E, F> Graph<V, E, F, DefaultFactory> {
    /// Creates an empty graph whose records get `Default` payloads.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::core::graph::Graph;
    ///
    /// let graph: Graph = Graph::new();
    /// assert!(graph.is_empty());
    /// assert_eq!(graph.generation(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(DefaultFactory)
    }
}

impl<V, E, F, M> Default for Graph<V, E, F, M>
where
    M: Default,
{
    fn default() -> Self {
        Self::with_factory(M::default())
    }
}

// =============================================================================
// CONSTRUCTION AND BOOKKEEPING
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M> {
    /// Creates an empty graph whose records get payloads from `factory`.
    #[must_use]
    pub fn with_factory(factory: M) -> Self {
        Self {
            vertices: StorageMap::with_key(),
            edges: StorageMap::with_key(),
            faces: StorageMap::with_key(),
            factory,
            generation: 0,
        }
    }

    /// The payload factory of this graph.
    #[inline]
    #[must_use]
    pub const fn factory(&self) -> &M {
        &self.factory
    }

    /// Mutable access to the payload factory.
    #[inline]
    pub const fn factory_mut(&mut self) -> &mut M {
        &mut self.factory
    }

    /// Increments the generation counter to invalidate dependent caches.
    #[inline]
    pub(crate) const fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Gets the current generation value.
    ///
    /// The counter is incremented by every successful Euler operator; payload
    /// updates do not change it.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

// =============================================================================
// QUERY OPERATIONS
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M> {
    /// Number of vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges (edge pairs, not half-edges).
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn number_of_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the graph holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Iterates over the keys of all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    /// Iterates over one half-edge per edge, the forward half of each pair.
    pub fn edges(&self) -> impl Iterator<Item = HalfEdgeHandle> + '_ {
        self.edges.keys().map(HalfEdgeHandle::forward)
    }

    /// Iterates over both halves of every edge.
    pub fn half_edges(&self) -> impl Iterator<Item = HalfEdgeHandle> + '_ {
        self.edges().flat_map(|forward| [forward, forward.mate()])
    }

    /// Iterates over the keys of all faces.
    pub fn faces(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces.keys()
    }

    /// Returns `true` if the vertex is stored in this graph.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains_key(vertex)
    }

    /// Returns `true` if the face is stored in this graph.
    #[must_use]
    pub fn contains_face(&self, face: FaceKey) -> bool {
        self.faces.contains_key(face)
    }

    /// Returns `true` if the half-edge's edge pair is stored in this graph.
    #[must_use]
    pub fn contains_edge(&self, edge: HalfEdgeHandle) -> bool {
        self.edges.contains_key(edge.edge())
    }

    /// Membership test accepting any [`GraphKey`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::prelude::*;
    ///
    /// let mut graph: Graph = Graph::new();
    /// let seed = graph.make_vertex_face().unwrap();
    /// assert!(graph.contains(seed.vertex.unwrap()));
    /// assert!(graph.contains(seed.face.unwrap()));
    ///
    /// let mut other: Graph = Graph::new();
    /// let foreign = other.make_vertex_face().unwrap();
    /// graph.kill_vertex_face().unwrap();
    /// assert!(!graph.contains(foreign.face.unwrap()));
    /// ```
    #[must_use]
    pub fn contains<K: GraphKey>(&self, key: K) -> bool {
        key.is_contained_in(self)
    }

    /// The vertex record, if stored.
    #[must_use]
    pub fn vertex(&self, vertex: VertexKey) -> Option<&Vertex<V>> {
        self.vertices.get(vertex)
    }

    /// The face record, if stored.
    #[must_use]
    pub fn face(&self, face: FaceKey) -> Option<&Face<F>> {
        self.faces.get(face)
    }

    /// The edge pair owning `edge`, if stored.
    #[must_use]
    pub fn edge_pair(&self, edge: HalfEdgeHandle) -> Option<&EdgePair<E>> {
        self.edges.get(edge.edge())
    }

    /// The half-edge record, if stored.
    #[must_use]
    pub fn half_edge(&self, edge: HalfEdgeHandle) -> Option<&HalfEdge> {
        self.edges
            .get(edge.edge())
            .map(|pair| pair.half(edge.orientation()))
    }

    pub(crate) fn half_edge_mut(&mut self, edge: HalfEdgeHandle) -> Option<&mut HalfEdge> {
        self.edges
            .get_mut(edge.edge())
            .map(|pair| pair.half_mut(edge.orientation()))
    }

    /// The half-edge following `edge` around its face, in `edge`'s direction.
    pub(crate) fn next_edge(&self, edge: HalfEdgeHandle) -> Option<HalfEdgeHandle> {
        self.half_edge(edge).map(|half| half.next)
    }

    /// The half-edge preceding `edge` around its face, in `edge`'s direction.
    pub(crate) fn prev_edge(&self, edge: HalfEdgeHandle) -> Option<HalfEdgeHandle> {
        self.half_edge(edge).map(|half| half.prev)
    }

    /// The vertex `edge` starts at.
    #[must_use]
    pub fn origin(&self, edge: HalfEdgeHandle) -> Option<VertexKey> {
        self.half_edge(edge).map(HalfEdge::origin)
    }

    /// The vertex `edge` ends at, i.e. the origin of its mate.
    #[must_use]
    pub fn destination(&self, edge: HalfEdgeHandle) -> Option<VertexKey> {
        self.origin(edge.mate())
    }

    /// Origin and destination of `edge`.
    #[must_use]
    pub fn vertices_of(&self, edge: HalfEdgeHandle) -> Option<(VertexKey, VertexKey)> {
        Some((self.origin(edge)?, self.destination(edge)?))
    }

    /// The face on the left of `edge`.
    #[must_use]
    pub fn left_face(&self, edge: HalfEdgeHandle) -> Option<FaceKey> {
        self.half_edge(edge).map(HalfEdge::face)
    }

    /// The face on the right of `edge`, i.e. the face of its mate.
    #[must_use]
    pub fn right_face(&self, edge: HalfEdgeHandle) -> Option<FaceKey> {
        self.left_face(edge.mate())
    }

    /// Left and right faces of `edge`.
    #[must_use]
    pub fn faces_of(&self, edge: HalfEdgeHandle) -> Option<(FaceKey, FaceKey)> {
        Some((self.left_face(edge)?, self.right_face(edge)?))
    }

    /// Number of half-edges leaving `vertex`; 0 for missing or isolated vertices.
    #[must_use]
    pub fn vertex_degree(&self, vertex: VertexKey) -> usize {
        self.vertex_edge_cycle(vertex).count()
    }

    /// Number of half-edges on the boundary of `face`; 0 for missing or seed faces.
    #[must_use]
    pub fn face_degree(&self, face: FaceKey) -> usize {
        self.face_edge_cycle(face).count()
    }
}

// =============================================================================
// PAYLOAD ACCESS
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M> {
    /// The payload of `vertex`.
    #[must_use]
    pub fn vertex_data(&self, vertex: VertexKey) -> Option<&V> {
        self.vertices.get(vertex).map(GraphRecord::data)
    }

    /// Mutable access to the payload of `vertex`.
    pub fn vertex_data_mut(&mut self, vertex: VertexKey) -> Option<&mut V> {
        self.vertices.get_mut(vertex).map(GraphRecord::data_mut)
    }

    /// Replaces the payload of `vertex`, returning the previous one.
    ///
    /// Returns `None` and drops `data` if the vertex is not stored.
    pub fn set_vertex_data(&mut self, vertex: VertexKey, data: V) -> Option<V> {
        self.vertices
            .get_mut(vertex)
            .map(|record| record.set_data(data))
    }

    /// The payload of `face`.
    #[must_use]
    pub fn face_data(&self, face: FaceKey) -> Option<&F> {
        self.faces.get(face).map(GraphRecord::data)
    }

    /// Mutable access to the payload of `face`.
    pub fn face_data_mut(&mut self, face: FaceKey) -> Option<&mut F> {
        self.faces.get_mut(face).map(GraphRecord::data_mut)
    }

    /// Replaces the payload of `face`, returning the previous one.
    pub fn set_face_data(&mut self, face: FaceKey, data: F) -> Option<F> {
        self.faces.get_mut(face).map(|record| record.set_data(data))
    }

    /// The payload of the edge owning `edge`.
    ///
    /// Both halves of an edge share one payload, so `edge` and `edge.mate()`
    /// return the same value.
    #[must_use]
    pub fn edge_data(&self, edge: HalfEdgeHandle) -> Option<&E> {
        self.edges.get(edge.edge()).map(GraphRecord::data)
    }

    /// Mutable access to the payload of the edge owning `edge`.
    pub fn edge_data_mut(&mut self, edge: HalfEdgeHandle) -> Option<&mut E> {
        self.edges.get_mut(edge.edge()).map(GraphRecord::data_mut)
    }

    /// Replaces the payload of the edge owning `edge`, returning the previous one.
    pub fn set_edge_data(&mut self, edge: HalfEdgeHandle, data: E) -> Option<E> {
        self.edges
            .get_mut(edge.edge())
            .map(|record| record.set_data(data))
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M> {
    /// Upper bound on the length of any cycle in this graph.
    pub(crate) fn walk_bound(&self) -> usize {
        2 * self.edges.len()
    }

    /// Checks that every stored key refers to a stored record.
    ///
    /// This corresponds to [`InvariantKind::References`], which is reported by
    /// [`Graph::validation_report`](Self::validation_report).
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::DanglingReference`] naming the first
    /// record with a bad reference. Vertices and faces without a first
    /// half-edge are only accepted in a graph without edges.
    pub fn validate_references(&self) -> Result<(), GraphValidationError> {
        for (vertex_key, vertex) in &self.vertices {
            match vertex.first_edge {
                Some(first) => match self.half_edge(first) {
                    Some(half) if half.origin == vertex_key => {}
                    Some(half) => {
                        return Err(GraphValidationError::DanglingReference {
                            entity: EntityKind::Vertex,
                            message: format!(
                                "vertex {vertex_key:?} names first edge {first:?} which starts at {:?}",
                                half.origin
                            ),
                        });
                    }
                    None => {
                        return Err(GraphValidationError::DanglingReference {
                            entity: EntityKind::Vertex,
                            message: format!(
                                "vertex {vertex_key:?} names missing first edge {first:?}"
                            ),
                        });
                    }
                },
                None if !self.edges.is_empty() => {
                    return Err(GraphValidationError::DanglingReference {
                        entity: EntityKind::Vertex,
                        message: format!(
                            "vertex {vertex_key:?} has no first edge in a graph with edges"
                        ),
                    });
                }
                None => {}
            }
        }

        for (face_key, face) in &self.faces {
            match face.first_edge {
                Some(first) => match self.half_edge(first) {
                    Some(half) if half.face == face_key => {}
                    Some(half) => {
                        return Err(GraphValidationError::DanglingReference {
                            entity: EntityKind::Face,
                            message: format!(
                                "face {face_key:?} names first edge {first:?} which borders {:?}",
                                half.face
                            ),
                        });
                    }
                    None => {
                        return Err(GraphValidationError::DanglingReference {
                            entity: EntityKind::Face,
                            message: format!("face {face_key:?} names missing first edge {first:?}"),
                        });
                    }
                },
                None if !self.edges.is_empty() => {
                    return Err(GraphValidationError::DanglingReference {
                        entity: EntityKind::Face,
                        message: format!("face {face_key:?} has no first edge in a graph with edges"),
                    });
                }
                None => {}
            }
        }

        for edge in self.half_edges() {
            let Some(half) = self.half_edge(edge) else {
                continue;
            };
            let problem = if !self.vertices.contains_key(half.origin) {
                Some(format!("origin {:?}", half.origin))
            } else if !self.faces.contains_key(half.face) {
                Some(format!("face {:?}", half.face))
            } else if !self.contains_edge(half.next) {
                Some(format!("next {:?}", half.next))
            } else if !self.contains_edge(half.prev) {
                Some(format!("prev {:?}", half.prev))
            } else {
                None
            };
            if let Some(what) = problem {
                return Err(GraphValidationError::DanglingReference {
                    entity: EntityKind::HalfEdge,
                    message: format!("half-edge {edge:?} refers to missing {what}"),
                });
            }
        }

        Ok(())
    }

    /// Checks that `next` and `prev` are mutually inverse and direction-exact.
    ///
    /// For every half-edge `h`: `next(prev(h)) == h`, `prev(next(h)) == h`,
    /// `next(h)` starts where `h` ends and lies on the same face.
    ///
    /// This corresponds to [`InvariantKind::Links`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::InconsistentLinks`] for the first
    /// half-edge violating one of these conditions.
    pub fn validate_links(&self) -> Result<(), GraphValidationError> {
        for edge in self.half_edges() {
            let Some(half) = self.half_edge(edge) else {
                continue;
            };
            let inconsistent = |message: String| GraphValidationError::InconsistentLinks { message };

            let Some(next) = self.half_edge(half.next) else {
                return Err(inconsistent(format!("{edge:?} has a missing next")));
            };
            if next.prev != edge {
                return Err(inconsistent(format!(
                    "prev(next({edge:?})) is {:?}",
                    next.prev
                )));
            }
            if self.next_edge(half.prev) != Some(edge) {
                return Err(inconsistent(format!(
                    "next(prev({edge:?})) is {:?}",
                    self.next_edge(half.prev)
                )));
            }
            if Some(next.origin) != self.destination(edge) {
                return Err(inconsistent(format!(
                    "next({edge:?}) starts at {:?}, not at the destination of the edge",
                    next.origin
                )));
            }
            if next.face != half.face {
                return Err(inconsistent(format!(
                    "next({edge:?}) borders {:?} instead of {:?}",
                    next.face, half.face
                )));
            }
        }
        Ok(())
    }

    /// Checks that the rotations `h -> mate(prev(h))` around the vertices
    /// partition the half-edges.
    ///
    /// This corresponds to [`InvariantKind::VertexCycles`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::InvalidVertexCycle`] if a rotation does
    /// not close, leaves its vertex, repeats a half-edge, or if some half-edge
    /// is reached by no rotation.
    pub fn validate_vertex_cycles(&self) -> Result<(), GraphValidationError> {
        let bound = self.walk_bound();
        let mut visited: FastHashSet<HalfEdgeHandle> = fast_hash_set_with_capacity(bound);

        for (vertex_key, vertex) in &self.vertices {
            let Some(first) = vertex.first_edge else {
                continue;
            };
            let mut current = first;
            let mut steps = 0;
            loop {
                let Some(half) = self.half_edge(current) else {
                    return Err(GraphValidationError::InvalidVertexCycle {
                        message: format!("rotation of {vertex_key:?} reaches missing {current:?}"),
                    });
                };
                if half.origin != vertex_key {
                    return Err(GraphValidationError::InvalidVertexCycle {
                        message: format!(
                            "rotation of {vertex_key:?} reaches {current:?} starting at {:?}",
                            half.origin
                        ),
                    });
                }
                if !visited.insert(current) {
                    return Err(GraphValidationError::InvalidVertexCycle {
                        message: format!("{current:?} is visited twice (at {vertex_key:?})"),
                    });
                }
                steps += 1;
                current = half.prev.mate();
                if current == first {
                    break;
                }
                if steps > bound {
                    return Err(GraphValidationError::InvalidVertexCycle {
                        message: format!("rotation of {vertex_key:?} does not close"),
                    });
                }
            }
        }

        if visited.len() != bound {
            return Err(GraphValidationError::InvalidVertexCycle {
                message: format!(
                    "rotations cover {} of {bound} half-edges",
                    visited.len()
                ),
            });
        }
        Ok(())
    }

    /// Checks that the `next` cycles of the faces partition the half-edges.
    ///
    /// This corresponds to [`InvariantKind::FaceCycles`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::InvalidFaceCycle`] if a boundary does
    /// not close, leaves its face, repeats a half-edge, or if some half-edge
    /// lies on no boundary.
    pub fn validate_face_cycles(&self) -> Result<(), GraphValidationError> {
        let bound = self.walk_bound();
        let mut visited: FastHashSet<HalfEdgeHandle> = fast_hash_set_with_capacity(bound);

        for (face_key, face) in &self.faces {
            let Some(first) = face.first_edge else {
                continue;
            };
            let mut current = first;
            let mut steps = 0;
            loop {
                let Some(half) = self.half_edge(current) else {
                    return Err(GraphValidationError::InvalidFaceCycle {
                        message: format!("boundary of {face_key:?} reaches missing {current:?}"),
                    });
                };
                if half.face != face_key {
                    return Err(GraphValidationError::InvalidFaceCycle {
                        message: format!(
                            "boundary of {face_key:?} reaches {current:?} bordering {:?}",
                            half.face
                        ),
                    });
                }
                if !visited.insert(current) {
                    return Err(GraphValidationError::InvalidFaceCycle {
                        message: format!("{current:?} is visited twice (at {face_key:?})"),
                    });
                }
                steps += 1;
                current = half.next;
                if current == first {
                    break;
                }
                if steps > bound {
                    return Err(GraphValidationError::InvalidFaceCycle {
                        message: format!("boundary of {face_key:?} does not close"),
                    });
                }
            }
        }

        if visited.len() != bound {
            return Err(GraphValidationError::InvalidFaceCycle {
                message: format!("boundaries cover {} of {bound} half-edges", visited.len()),
            });
        }
        Ok(())
    }

    /// Checks Euler's formula against the classification of the graph.
    ///
    /// This corresponds to [`InvariantKind::EulerCharacteristic`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphValidationError::EulerCharacteristic`] if the counts do
    /// not give the characteristic expected for the graph's classification,
    /// or if the counts fit no classification at all.
    pub fn validate_euler_characteristic(&self) -> Result<(), GraphValidationError> {
        let counts = count_elements(self);
        let chi = euler_characteristic(&counts);
        let classification = classify_counts(&counts);
        match expected_chi_for(&classification) {
            Some(expected) if expected == chi => {}
            expected => {
                return Err(GraphValidationError::EulerCharacteristic {
                    chi,
                    expected: expected.unwrap_or(2),
                    vertices: counts.vertices,
                    edges: counts.edges,
                    faces: counts.faces,
                });
            }
        }
        Ok(())
    }

    /// Runs all structural checks and returns the first failure.
    ///
    /// Empty graphs are valid:
    ///
    /// ```rust
    /// use planar_topology::core::graph::Graph;
    ///
    /// let graph: Graph = Graph::new();
    /// assert!(graph.is_valid().is_ok());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the [`GraphValidationError`] of the first invariant group that
    /// fails, in the order of [`InvariantKind`].
    pub fn is_valid(&self) -> Result<(), GraphValidationError> {
        self.validate_references()?;
        self.validate_links()?;
        self.validate_vertex_cycles()?;
        self.validate_face_cycles()?;
        self.validate_euler_characteristic()
    }

    /// Runs all structural checks and returns a report containing **all**
    /// failed invariants.
    ///
    /// Link and cycle checks are skipped when references are broken, since
    /// they would only repeat the same failure.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphValidationReport`] containing all invariant violations
    /// if any validation step fails.
    pub fn validation_report(&self) -> Result<(), GraphValidationReport> {
        let mut violations = Vec::new();

        if let Err(error) = self.validate_references() {
            violations.push(InvariantViolation {
                kind: InvariantKind::References,
                error,
            });
        } else {
            if let Err(error) = self.validate_links() {
                violations.push(InvariantViolation {
                    kind: InvariantKind::Links,
                    error,
                });
            }
            if let Err(error) = self.validate_vertex_cycles() {
                violations.push(InvariantViolation {
                    kind: InvariantKind::VertexCycles,
                    error,
                });
            }
            if let Err(error) = self.validate_face_cycles() {
                violations.push(InvariantViolation {
                    kind: InvariantKind::FaceCycles,
                    error,
                });
            }
        }
        if let Err(error) = self.validate_euler_characteristic() {
            violations.push(InvariantViolation {
                kind: InvariantKind::EulerCharacteristic,
                error,
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(GraphValidationReport { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Graph, [VertexKey; 3], FaceKey) {
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
        let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
        let v2 = graph.make_edge_vertex(f0, v1).unwrap().vertex.unwrap();
        graph.make_edge_face(f0, v2, v0).unwrap();
        (graph, [v0, v1, v2], f0)
    }

    #[test]
    fn test_empty_graph_queries() {
        let graph: Graph = Graph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.number_of_vertices(), 0);
        assert_eq!(graph.number_of_edges(), 0);
        assert_eq!(graph.number_of_faces(), 0);
        assert_eq!(graph.vertices().count(), 0);
        assert_eq!(graph.half_edges().count(), 0);
        assert!(graph.is_valid().is_ok());
        assert!(graph.validation_report().is_ok());
    }

    #[test]
    fn test_error_kind_classification() {
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        let vertex = seed.vertex.unwrap();

        let invalid = GraphError::IdenticalVertices { vertex };
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);
        assert!(!invalid.is_fatal());

        let fatal = GraphError::NotSeedShape {
            vertices: 2,
            edges: 1,
            faces: 1,
        };
        assert_eq!(fatal.kind(), ErrorKind::FatalInvariant);
        assert!(fatal.is_fatal());
        assert!(fatal.to_string().contains("expected 1 vertex"));
    }

    #[test]
    fn test_half_edge_queries_on_triangle() {
        let (graph, [v0, v1, _], f0) = triangle();

        let edge = graph
            .vertex_edge_cycle(v0)
            .find(|&h| graph.destination(h) == Some(v1))
            .unwrap();
        assert_eq!(graph.vertices_of(edge), Some((v0, v1)));
        assert_eq!(graph.vertices_of(edge.mate()), Some((v1, v0)));

        let (left, right) = graph.faces_of(edge).unwrap();
        assert_ne!(left, right);
        assert!(left == f0 || right == f0);
        assert_eq!(graph.left_face(edge.mate()), Some(right));
    }

    #[test]
    fn test_degrees_and_membership() {
        let (graph, vertices, f0) = triangle();
        for v in vertices {
            assert_eq!(graph.vertex_degree(v), 2);
            assert!(graph.contains(v));
        }
        for f in graph.faces() {
            assert_eq!(graph.face_degree(f), 3);
        }
        assert!(graph.contains(f0));

        let first = graph.edges().next().unwrap();
        assert!(graph.contains(first));
        assert!(graph.contains(first.mate()));
        assert!(graph.contains(first.edge()));
        assert_eq!(graph.edges().count(), 3);
        assert_eq!(graph.half_edges().count(), 6);
    }

    #[test]
    fn test_missing_keys_yield_none() {
        let (graph, [v0, ..], f0) = triangle();
        let edge = graph.edges().next().unwrap();

        let mut emptied = graph.clone();
        emptied.vertices.clear();
        emptied.edges.clear();
        emptied.faces.clear();

        assert_eq!(emptied.origin(edge), None);
        assert_eq!(emptied.faces_of(edge), None);
        assert_eq!(emptied.vertex_data(v0), None);
        assert_eq!(emptied.set_vertex_data(v0, ()), None);
        assert_eq!(emptied.vertex_degree(v0), 0);
        assert_eq!(emptied.face_degree(f0), 0);
        assert_eq!(emptied.vertex_edge_cycle(v0).count(), 0);
        assert!(!emptied.contains(v0));
        assert!(!emptied.contains(edge));
    }

    #[test]
    fn test_payload_replacement() {
        let mut graph: Graph<i32, &str, char> = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
        let spur = graph.make_edge_vertex(f0, v0).unwrap();
        let edge = spur.edge.unwrap();

        assert_eq!(graph.set_vertex_data(v0, 7), Some(0));
        *graph.vertex_data_mut(v0).unwrap() += 1;
        assert_eq!(graph.vertex_data(v0), Some(&8));

        assert_eq!(graph.set_face_data(f0, 'x'), Some('\0'));
        assert_eq!(graph.face_data(f0), Some(&'x'));

        assert_eq!(graph.set_edge_data(edge, "spur"), Some(""));
        assert_eq!(graph.edge_data(edge.mate()), Some(&"spur"));
        *graph.edge_data_mut(edge.mate()).unwrap() = "both";
        assert_eq!(graph.edge_data(edge), Some(&"both"));
    }

    #[test]
    fn test_generation_tracks_structural_changes_only() {
        let mut graph: Graph<u8, (), ()> = Graph::new();
        assert_eq!(graph.generation(), 0);

        let seed = graph.make_vertex_face().unwrap();
        assert_eq!(graph.generation(), 1);

        graph.set_vertex_data(seed.vertex.unwrap(), 3);
        assert_eq!(graph.generation(), 1);

        assert!(graph.kill_edge_vertex(HalfEdgeHandle::forward(EdgeKey::default())).is_err());
        assert_eq!(graph.generation(), 1);
    }

    #[test]
    fn test_validation_detects_broken_links() {
        let (mut graph, _, _) = triangle();
        assert!(graph.is_valid().is_ok());

        let edge = graph.edges().next().unwrap();
        let current = graph.next_edge(edge).unwrap();
        let other = graph
            .half_edges()
            .find(|&h| !h.same_edge(edge) && h != current)
            .unwrap();
        graph.half_edge_mut(edge).unwrap().next = other;

        let error = graph.validate_links().unwrap_err();
        assert!(matches!(error, GraphValidationError::InconsistentLinks { .. }));

        let report = graph.validation_report().unwrap_err();
        assert!(!report.is_empty());
        assert!(
            report
                .violations
                .iter()
                .any(|violation| violation.kind == InvariantKind::Links)
        );
    }

    #[test]
    fn test_validation_detects_dangling_references() {
        let (mut graph, [v0, ..], _) = triangle();
        graph.vertices.get_mut(v0).unwrap().first_edge = None;

        let error = graph.validate_references().unwrap_err();
        assert!(matches!(
            error,
            GraphValidationError::DanglingReference {
                entity: EntityKind::Vertex,
                ..
            }
        ));
        let report = graph.validation_report().unwrap_err();
        assert_eq!(report.violations[0].kind, InvariantKind::References);
    }

    #[test]
    fn test_validation_detects_euler_mismatch() {
        let (mut graph, _, _) = triangle();
        graph.faces.insert(Face::new(None, ()));

        let error = graph.validate_euler_characteristic().unwrap_err();
        assert!(matches!(
            error,
            GraphValidationError::EulerCharacteristic { chi: 3, expected: 2, .. }
        ));
    }
}
