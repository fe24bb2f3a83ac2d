//! Euler operators: the only legal mutations of an embedded graph.
//!
//! Each operator changes the element counts `(V, E, F)` so that
//! `V - E + F` stays at 2 for every non-empty graph:
//!
//! | Operator | Effect | Δ(V, E, F) |
//! |---|---|---|
//! | [`make_vertex_face`](Graph::make_vertex_face) | seed vertex and face in an empty graph | (+1, 0, +1) |
//! | [`kill_vertex_face`](Graph::kill_vertex_face) | remove the seed | (-1, 0, -1) |
//! | [`make_edge_vertex`](Graph::make_edge_vertex) | dangling spur ending at a new vertex | (+1, +1, 0) |
//! | [`kill_edge_vertex`](Graph::kill_edge_vertex) | remove a spur and its tip | (-1, -1, 0) |
//! | [`make_vertex_edge`](Graph::make_vertex_edge) | split an edge at a new vertex | (+1, +1, 0) |
//! | [`kill_vertex_edge`](Graph::kill_vertex_edge) | merge the two edges of a degree-2 vertex | (-1, -1, 0) |
//! | [`make_edge_face`](Graph::make_edge_face) | split a face by a new edge | (0, +1, +1) |
//! | [`kill_edge_face`](Graph::kill_edge_face) | merge the two faces of an edge | (0, -1, -1) |
//!
//! Every operator checks all of its preconditions before touching the graph.
//! A precondition failure is reported as an
//! [`ErrorKind::InvalidArgument`](crate::core::graph::ErrorKind::InvalidArgument)
//! error and leaves the graph unchanged. Rewiring touches a bounded number of
//! `next`/`prev` links; only relabelling a split or merged face walks a whole
//! boundary.
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
//! let spur = graph.make_edge_vertex(f0, v0).unwrap();
//! assert_eq!(graph.number_of_vertices(), 2);
//!
//! let removed = graph.kill_edge_vertex(spur.edge.unwrap()).unwrap();
//! assert_eq!(removed.vertex, Some(()));
//! assert_eq!(graph.number_of_vertices(), 1);
//! assert_eq!(graph.number_of_edges(), 0);
//! ```

#![forbid(unsafe_code)]

use crate::core::{
    collections::{MAX_RELINKS, SmallBuffer, TYPICAL_CYCLE_SIZE},
    face::Face,
    graph::{FaceKey, Graph, GraphError, VertexKey},
    half_edge::{EdgePair, HalfEdge, HalfEdgeHandle},
    traits::RecordFactory,
    vertex::Vertex,
};

/// Records created by a `make_*` operator.
///
/// Fields an operator does not create are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EulerOpResult {
    /// The new vertex, if any.
    pub vertex: Option<VertexKey>,
    /// The forward half of the new edge, if any.
    pub edge: Option<HalfEdgeHandle>,
    /// The new face, if any.
    pub face: Option<FaceKey>,
}

/// Payloads of the records removed by a `kill_*` operator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Removed<V, E, F> {
    /// Payload of the removed vertex, if any.
    pub vertex: Option<V>,
    /// Payload of the removed edge, if any.
    pub edge: Option<E>,
    /// Payload of the removed face, if any.
    pub face: Option<F>,
}

type Boundary = SmallBuffer<HalfEdgeHandle, TYPICAL_CYCLE_SIZE>;

// =============================================================================
// SHARED HELPERS
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M> {
    fn require_vertex(&self, vertex: VertexKey) -> Result<&Vertex<V>, GraphError> {
        self.vertices
            .get(vertex)
            .ok_or(GraphError::VertexNotFound { vertex })
    }

    fn require_face(&self, face: FaceKey) -> Result<&Face<F>, GraphError> {
        self.faces.get(face).ok_or(GraphError::FaceNotFound { face })
    }

    fn require_edge(&self, edge: HalfEdgeHandle) -> Result<HalfEdge, GraphError> {
        self.half_edge(edge)
            .copied()
            .ok_or(GraphError::EdgeNotFound { edge })
    }

    /// Copy of a half-edge that must exist because the graph references it.
    fn record(&self, edge: HalfEdgeHandle) -> Result<HalfEdge, GraphError> {
        self.half_edge(edge)
            .copied()
            .ok_or_else(|| GraphError::missing_half(edge))
    }

    /// Sets `from.next = to` and `to.prev = from`.
    pub(crate) fn link(
        &mut self,
        from: HalfEdgeHandle,
        to: HalfEdgeHandle,
    ) -> Result<(), GraphError> {
        self.half_edge_mut(from)
            .ok_or_else(|| GraphError::missing_half(from))?
            .next = to;
        self.half_edge_mut(to)
            .ok_or_else(|| GraphError::missing_half(to))?
            .prev = from;
        Ok(())
    }

    fn set_origin(&mut self, edge: HalfEdgeHandle, origin: VertexKey) -> Result<(), GraphError> {
        self.half_edge_mut(edge)
            .ok_or_else(|| GraphError::missing_half(edge))?
            .origin = origin;
        Ok(())
    }

    pub(crate) fn set_vertex_first(
        &mut self,
        vertex: VertexKey,
        first: Option<HalfEdgeHandle>,
    ) -> Result<(), GraphError> {
        let record = self.vertices.get_mut(vertex).ok_or_else(|| {
            GraphError::MissingRecord {
                message: format!("vertex {vertex:?} is referenced but not stored"),
            }
            .logged()
        })?;
        record.first_edge = first;
        Ok(())
    }

    pub(crate) fn set_face_first(
        &mut self,
        face: FaceKey,
        first: Option<HalfEdgeHandle>,
    ) -> Result<(), GraphError> {
        let record = self.faces.get_mut(face).ok_or_else(|| {
            GraphError::MissingRecord {
                message: format!("face {face:?} is referenced but not stored"),
            }
            .logged()
        })?;
        record.first_edge = first;
        Ok(())
    }

    /// Collects the `next` cycle through `start`.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`GraphError::BrokenCycle`] if the walk does not return
    /// to `start` within the number of half-edges in the graph.
    fn boundary_from(&self, start: HalfEdgeHandle) -> Result<Boundary, GraphError> {
        let bound = self.walk_bound();
        let mut boundary = Boundary::new();
        let mut current = start;
        loop {
            boundary.push(current);
            current = self.record(current)?.next;
            if current == start {
                return Ok(boundary);
            }
            if boundary.len() > bound {
                return Err(GraphError::BrokenCycle {
                    message: format!("boundary through {start:?} does not close"),
                }
                .logged());
            }
        }
    }

    /// Assigns every half-edge of the cycle through `start` to `face`.
    fn relabel_boundary(&mut self, start: HalfEdgeHandle, face: FaceKey) -> Result<(), GraphError> {
        for edge in self.boundary_from(start)? {
            self.half_edge_mut(edge)
                .ok_or_else(|| GraphError::missing_half(edge))?
                .face = face;
        }
        Ok(())
    }

    /// First half-edge on the boundary of `face` leaving `vertex`.
    fn find_leaving(&self, face: FaceKey, vertex: VertexKey) -> Option<HalfEdgeHandle> {
        self.face_edge_cycle(face)
            .find(|&edge| self.origin(edge) == Some(vertex))
    }

    fn trace_operator(&self, operation: &'static str) {
        tracing::debug!(
            operation,
            vertices = self.number_of_vertices(),
            edges = self.number_of_edges(),
            faces = self.number_of_faces(),
            "Euler operator applied"
        );
    }
}

// =============================================================================
// CONSTRUCTIVE OPERATORS
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M>
where
    M: RecordFactory<V, E, F>,
{
    /// Creates the seed of a graph: one isolated vertex and one face.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`GraphError::GraphNotEmpty`] if the graph already
    /// holds records.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::prelude::*;
    ///
    /// let mut graph: Graph = Graph::new();
    /// let seed = graph.make_vertex_face().unwrap();
    /// assert!(seed.vertex.is_some() && seed.face.is_some());
    /// assert!(seed.edge.is_none());
    ///
    /// let error = graph.make_vertex_face().unwrap_err();
    /// assert!(error.is_fatal());
    /// ```
    pub fn make_vertex_face(&mut self) -> Result<EulerOpResult, GraphError> {
        if !self.is_empty() {
            return Err(GraphError::GraphNotEmpty {
                vertices: self.number_of_vertices(),
                edges: self.number_of_edges(),
                faces: self.number_of_faces(),
            }
            .logged());
        }

        let vertex_data = self.factory.new_vertex();
        let face_data = self.factory.new_face();
        let vertex = self.vertices.insert(Vertex::new(None, vertex_data));
        let face = self.faces.insert(Face::new(None, face_data));

        self.bump_generation();
        self.trace_operator("make_vertex_face");
        Ok(EulerOpResult {
            vertex: Some(vertex),
            edge: None,
            face: Some(face),
        })
    }

    /// Grows a dangling edge from `vertex` into `face`, ending at a new vertex.
    ///
    /// The new edge is inserted before the first half-edge of `face`'s
    /// boundary that leaves `vertex`. In a seed graph the edge becomes the
    /// whole boundary of the seed face.
    ///
    /// The returned edge is the half leaving `vertex`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexNotFound`] / [`GraphError::FaceNotFound`] for
    ///   foreign or removed keys
    /// - [`GraphError::VertexNotOnFace`] if `vertex` is not on the boundary of
    ///   `face`
    pub fn make_edge_vertex(
        &mut self,
        face: FaceKey,
        vertex: VertexKey,
    ) -> Result<EulerOpResult, GraphError> {
        let vertex_first = self.require_vertex(vertex)?.first_edge;
        let face_first = self.require_face(face)?.first_edge;

        let splice = match face_first {
            None if vertex_first.is_none() => None,
            None => return Err(GraphError::VertexNotOnFace { vertex, face }),
            Some(_) => {
                let next = self
                    .find_leaving(face, vertex)
                    .ok_or(GraphError::VertexNotOnFace { vertex, face })?;
                Some((self.record(next)?.prev, next))
            }
        };

        let vertex_data = self.factory.new_vertex();
        let edge_data = self.factory.new_edge();
        let tip = self.vertices.insert(Vertex::new(None, vertex_data));

        let key = self.edges.insert_with_key(|key| {
            let forward = HalfEdgeHandle::forward(key);
            let reverse = forward.mate();
            let (before, after) = splice.unwrap_or((reverse, forward));
            EdgePair::new(
                HalfEdge {
                    origin: vertex,
                    face,
                    next: reverse,
                    prev: before,
                },
                HalfEdge {
                    origin: tip,
                    face,
                    next: after,
                    prev: forward,
                },
                edge_data,
            )
        });
        let edge = HalfEdgeHandle::forward(key);

        if let Some((before, after)) = splice {
            self.link(before, edge)?;
            self.link(edge.mate(), after)?;
        } else {
            self.set_vertex_first(vertex, Some(edge))?;
            self.set_face_first(face, Some(edge))?;
        }
        self.set_vertex_first(tip, Some(edge.mate()))?;

        self.bump_generation();
        self.trace_operator("make_edge_vertex");
        Ok(EulerOpResult {
            vertex: Some(tip),
            edge: Some(edge),
            face: None,
        })
    }

    /// Splits `edge` at a new vertex.
    ///
    /// `edge` keeps its origin and now ends at the new vertex; the returned
    /// edge continues from the new vertex to the old destination. Both halves
    /// keep their faces. Spurs and self-loops are split like any other edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] for foreign or removed edges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_topology::prelude::*;
    ///
    /// let mut graph: Graph = Graph::new();
    /// let seed = graph.make_vertex_face().unwrap();
    /// let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
    /// let spur = graph.make_edge_vertex(f0, v0).unwrap();
    /// let (edge, tip) = (spur.edge.unwrap(), spur.vertex.unwrap());
    ///
    /// let split = graph.make_vertex_edge(edge).unwrap();
    /// let middle = split.vertex.unwrap();
    /// assert_eq!(graph.vertices_of(edge), Some((v0, middle)));
    /// assert_eq!(graph.vertices_of(split.edge.unwrap()), Some((middle, tip)));
    /// assert_eq!(graph.vertex_degree(middle), 2);
    /// ```
    pub fn make_vertex_edge(&mut self, edge: HalfEdgeHandle) -> Result<EulerOpResult, GraphError> {
        let mate = edge.mate();
        let half = self.require_edge(edge)?;
        let mate_half = self.record(mate)?;
        let far = mate_half.origin;

        let vertex_data = self.factory.new_vertex();
        let edge_data = self.factory.new_edge();
        let middle = self.vertices.insert(Vertex::new(None, vertex_data));
        let key = self.edges.insert_with_key(|key| {
            let forward = HalfEdgeHandle::forward(key);
            let reverse = forward.mate();
            EdgePair::new(
                HalfEdge {
                    origin: middle,
                    face: half.face,
                    next: forward,
                    prev: forward,
                },
                HalfEdge {
                    origin: far,
                    face: mate_half.face,
                    next: reverse,
                    prev: reverse,
                },
                edge_data,
            )
        });
        let outer = HalfEdgeHandle::forward(key);
        let outer_mate = outer.mate();

        // `edge` is cut into edge -> outer and `mate` into outer_mate -> mate.
        // Links that left the old halves now leave from their far piece, and
        // links that entered them now enter their near piece.
        let leaving = |h: HalfEdgeHandle| if h == edge { outer } else { h };
        let entering = |h: HalfEdgeHandle| if h == mate { outer_mate } else { h };

        let relinks = [
            (edge, outer),
            (outer_mate, mate),
            (outer, entering(half.next)),
            (leaving(half.prev), edge),
            (mate, entering(mate_half.next)),
            (leaving(mate_half.prev), outer_mate),
        ];
        for (from, to) in relinks {
            self.link(from, to)?;
        }

        self.set_origin(mate, middle)?;
        self.set_vertex_first(middle, Some(outer))?;
        self.set_vertex_first(far, Some(outer_mate))?;

        self.bump_generation();
        self.trace_operator("make_vertex_edge");
        Ok(EulerOpResult {
            vertex: Some(middle),
            edge: Some(outer),
            face: None,
        })
    }

    /// Splits `face` by a new edge from `head` to `tail`.
    ///
    /// The first occurrences of `head` and `tail` on the boundary of `face`
    /// are used; both are found in a single walk. The returned edge runs from
    /// `head` to `tail` and stays on `face`; its mate bounds the returned new
    /// face.
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexNotFound`] / [`GraphError::FaceNotFound`] for
    ///   foreign or removed keys
    /// - [`GraphError::IdenticalVertices`] if `head == tail`
    /// - [`GraphError::FaceNotDivisible`] for the seed face
    /// - [`GraphError::VerticesNotOnFace`] unless both vertices are on the
    ///   boundary of `face`
    pub fn make_edge_face(
        &mut self,
        face: FaceKey,
        head: VertexKey,
        tail: VertexKey,
    ) -> Result<EulerOpResult, GraphError> {
        self.check_face_split(face, head, tail)?;

        let mut next_head = None;
        let mut next_tail = None;
        for edge in self.face_edge_cycle(face) {
            let origin = self.origin(edge);
            if next_head.is_none() && origin == Some(head) {
                next_head = Some(edge);
            } else if next_tail.is_none() && origin == Some(tail) {
                next_tail = Some(edge);
            }
            if next_head.is_some() && next_tail.is_some() {
                break;
            }
        }
        let (Some(next_head), Some(next_tail)) = (next_head, next_tail) else {
            return Err(GraphError::VerticesNotOnFace { head, tail, face });
        };

        self.split_face(face, next_head, next_tail)
    }

    /// Splits `face` by a new edge from `head` to `tail`, choosing which
    /// occurrence of each vertex to connect.
    ///
    /// `head_edge` and `tail_edge` are half-edges incident to `head` and
    /// `tail`; either half of the edge may be passed. The half leaving the
    /// vertex must lie on `face`, and the new edge is inserted just before it.
    /// This is needed when a vertex appears more than once on the boundary.
    ///
    /// # Errors
    ///
    /// The errors of [`make_edge_face`](Self::make_edge_face), plus
    /// [`GraphError::EdgeNotFound`], [`GraphError::EdgeNotIncident`] if an
    /// edge does not touch its vertex, and [`GraphError::EdgeNotOnFace`] if
    /// the chosen occurrence is not on `face`.
    pub fn make_edge_face_between(
        &mut self,
        face: FaceKey,
        head: VertexKey,
        tail: VertexKey,
        head_edge: HalfEdgeHandle,
        tail_edge: HalfEdgeHandle,
    ) -> Result<EulerOpResult, GraphError> {
        self.check_face_split(face, head, tail)?;
        let next_head = self.leaving_half_on(face, head, head_edge)?;
        let next_tail = self.leaving_half_on(face, tail, tail_edge)?;
        self.split_face(face, next_head, next_tail)
    }

    fn check_face_split(
        &self,
        face: FaceKey,
        head: VertexKey,
        tail: VertexKey,
    ) -> Result<(), GraphError> {
        self.require_vertex(head)?;
        self.require_vertex(tail)?;
        let first = self.require_face(face)?.first_edge;
        if head == tail {
            return Err(GraphError::IdenticalVertices { vertex: head });
        }
        if first.is_none() {
            return Err(GraphError::FaceNotDivisible { face });
        }
        Ok(())
    }

    /// The half of `edge` leaving `vertex`, checked to lie on `face` together
    /// with its predecessor.
    fn leaving_half_on(
        &self,
        face: FaceKey,
        vertex: VertexKey,
        edge: HalfEdgeHandle,
    ) -> Result<HalfEdgeHandle, GraphError> {
        let half = self.require_edge(edge)?;
        let leaving = if half.origin == vertex {
            edge
        } else if self.origin(edge.mate()) == Some(vertex) {
            edge.mate()
        } else {
            return Err(GraphError::EdgeNotIncident { edge, vertex });
        };

        let record = self.record(leaving)?;
        let before = self.record(record.prev)?;
        if record.face != face || before.face != face {
            return Err(GraphError::EdgeNotOnFace { edge, face });
        }
        Ok(leaving)
    }

    /// Inserts an edge `head -> tail` before `next_tail`, with its mate before
    /// `next_head`, and moves the cycle through the mate to a new face.
    fn split_face(
        &mut self,
        face: FaceKey,
        next_head: HalfEdgeHandle,
        next_tail: HalfEdgeHandle,
    ) -> Result<EulerOpResult, GraphError> {
        let head_half = self.record(next_head)?;
        let tail_half = self.record(next_tail)?;
        let (head, prev_head) = (head_half.origin, head_half.prev);
        let (tail, prev_tail) = (tail_half.origin, tail_half.prev);

        let face_data = self.factory.new_face();
        let edge_data = self.factory.new_edge();
        let new_face = self.faces.insert(Face::new(None, face_data));
        let key = self.edges.insert_with_key(|key| {
            let forward = HalfEdgeHandle::forward(key);
            EdgePair::new(
                HalfEdge {
                    origin: head,
                    face,
                    next: next_tail,
                    prev: prev_head,
                },
                HalfEdge {
                    origin: tail,
                    face: new_face,
                    next: next_head,
                    prev: prev_tail,
                },
                edge_data,
            )
        });
        let edge = HalfEdgeHandle::forward(key);
        let mate = edge.mate();

        self.link(prev_head, edge)?;
        self.link(edge, next_tail)?;
        self.link(prev_tail, mate)?;
        self.link(mate, next_head)?;

        self.set_face_first(face, Some(edge))?;
        self.set_face_first(new_face, Some(mate))?;
        self.relabel_boundary(mate, new_face)?;

        self.bump_generation();
        self.trace_operator("make_edge_face");
        Ok(EulerOpResult {
            vertex: None,
            edge: Some(edge),
            face: Some(new_face),
        })
    }
}

// =============================================================================
// DESTRUCTIVE OPERATORS
// =============================================================================

impl<V, E, F, M> Graph<V, E, F, M> {
    /// Removes the seed vertex and face, leaving an empty graph.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`GraphError::NotSeedShape`] unless the graph holds
    /// exactly one vertex, no edges and one face.
    pub fn kill_vertex_face(&mut self) -> Result<Removed<V, E, F>, GraphError> {
        let shape_error = |graph: &Self| {
            GraphError::NotSeedShape {
                vertices: graph.number_of_vertices(),
                edges: graph.number_of_edges(),
                faces: graph.number_of_faces(),
            }
            .logged()
        };
        if (
            self.number_of_vertices(),
            self.number_of_edges(),
            self.number_of_faces(),
        ) != (1, 0, 1)
        {
            return Err(shape_error(self));
        }
        let (Some(vertex), Some(face)) = (self.vertices.keys().next(), self.faces.keys().next())
        else {
            return Err(shape_error(self));
        };

        let vertex = self.vertices.remove(vertex).map(Vertex::into_data);
        let face = self.faces.remove(face).map(Face::into_data);

        self.bump_generation();
        self.trace_operator("kill_vertex_face");
        Ok(Removed {
            vertex,
            edge: None,
            face,
        })
    }

    /// Removes a dangling edge together with its degree-1 tip.
    ///
    /// Either half of the spur may be passed. When both endpoints have degree
    /// one (the only edge of the graph), the destination of the half whose
    /// `next` is its mate is removed and the seed graph remains.
    ///
    /// # Errors
    ///
    /// - [`GraphError::EdgeNotFound`] for foreign or removed edges
    /// - [`GraphError::EdgeNotDangling`] unless both halves lie on one face
    ///   and turn around at a degree-1 vertex
    pub fn kill_edge_vertex(
        &mut self,
        edge: HalfEdgeHandle,
    ) -> Result<Removed<V, E, F>, GraphError> {
        let half = self.require_edge(edge)?;
        let mate_half = self.record(edge.mate())?;
        if half.face != mate_half.face {
            return Err(GraphError::EdgeNotDangling { edge });
        }

        // `inward` ends at the tip, `outward` leaves it.
        let (inward, outward) = if half.next == edge.mate() {
            (edge, edge.mate())
        } else if mate_half.next == edge {
            (edge.mate(), edge)
        } else {
            return Err(GraphError::EdgeNotDangling { edge });
        };
        let inward_half = self.record(inward)?;
        let outward_half = self.record(outward)?;
        let face = inward_half.face;
        let base = inward_half.origin;
        let tip = outward_half.origin;
        let before = inward_half.prev;
        let after = outward_half.next;

        if after == inward {
            self.set_vertex_first(base, None)?;
            self.set_face_first(face, None)?;
        } else {
            self.link(before, after)?;
            if self
                .vertices
                .get(base)
                .and_then(|record| record.first_edge)
                .is_some_and(|first| first.same_edge(edge))
            {
                self.set_vertex_first(base, Some(after))?;
            }
            if self
                .faces
                .get(face)
                .and_then(|record| record.first_edge)
                .is_some_and(|first| first.same_edge(edge))
            {
                self.set_face_first(face, Some(after))?;
            }
        }

        let vertex = self.vertices.remove(tip).map(Vertex::into_data);
        let edge = self.edges.remove(edge.edge()).map(EdgePair::into_data);

        self.bump_generation();
        self.trace_operator("kill_edge_vertex");
        Ok(Removed {
            vertex,
            edge,
            face: None,
        })
    }

    /// Removes a degree-2 `vertex` and the incident `edge`, stretching the
    /// other incident edge over the gap.
    ///
    /// The surviving edge keeps its key, payload and faces. On a bigon the
    /// surviving edge becomes a self-loop separating the two faces.
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexNotFound`] / [`GraphError::EdgeNotFound`] for
    ///   foreign or removed keys
    /// - [`GraphError::InvalidVertexDegree`] unless `vertex` has degree 2
    /// - [`GraphError::SelfLoopAtVertex`] if both incident half-edges belong
    ///   to one self-loop
    /// - [`GraphError::EdgeNotIncident`] if `edge` does not touch `vertex`
    pub fn kill_vertex_edge(
        &mut self,
        vertex: VertexKey,
        edge: HalfEdgeHandle,
    ) -> Result<Removed<V, E, F>, GraphError> {
        self.require_vertex(vertex)?;
        self.require_edge(edge)?;

        let degree_error = |graph: &Self| GraphError::InvalidVertexDegree {
            vertex,
            degree: graph.vertex_degree(vertex),
            expected: 2,
        };
        let Some(first) = self.anchored_first_edge(vertex) else {
            return Err(degree_error(self));
        };
        let second = self.record(first)?.prev.mate();
        if second == first {
            return Err(degree_error(self));
        }
        if self.record(second)?.prev.mate() != first {
            return Err(degree_error(self));
        }
        if first.same_edge(second) {
            return Err(GraphError::SelfLoopAtVertex { vertex });
        }

        // `doomed` leaves `vertex` on the removed edge, `kept` on the surviving one.
        let (doomed, kept) = if edge.same_edge(first) {
            (first, second)
        } else if edge.same_edge(second) {
            (second, first)
        } else {
            return Err(GraphError::EdgeNotIncident { edge, vertex });
        };
        let doomed_mate = doomed.mate();
        let kept_mate = kept.mate();
        let doomed_half = self.record(doomed)?;
        let doomed_mate_half = self.record(doomed_mate)?;
        let far = doomed_mate_half.origin;

        let redirect = |h: HalfEdgeHandle| {
            if h == doomed {
                kept_mate
            } else if h == doomed_mate {
                kept
            } else {
                h
            }
        };
        let after = redirect(doomed_half.next);
        let before = redirect(doomed_mate_half.prev);

        let far_first = self.vertices.get(far).and_then(|record| record.first_edge);
        let doomed_face_first = self
            .faces
            .get(doomed_half.face)
            .and_then(|record| record.first_edge);
        let doomed_mate_face_first = self
            .faces
            .get(doomed_mate_half.face)
            .and_then(|record| record.first_edge);

        self.link(kept_mate, after)?;
        self.link(before, kept)?;
        self.set_origin(kept, far)?;

        if far_first.is_some_and(|first| first.same_edge(doomed)) {
            self.set_vertex_first(far, Some(kept))?;
        }
        if doomed_face_first == Some(doomed) {
            self.set_face_first(doomed_half.face, Some(kept_mate))?;
        }
        if doomed_mate_face_first == Some(doomed_mate) {
            self.set_face_first(doomed_mate_half.face, Some(kept))?;
        }

        let vertex = self.vertices.remove(vertex).map(Vertex::into_data);
        let edge = self.edges.remove(doomed.edge()).map(EdgePair::into_data);

        self.bump_generation();
        self.trace_operator("kill_vertex_edge");
        Ok(Removed {
            vertex,
            edge,
            face: None,
        })
    }

    /// Removes `edge` and `face`, merging `face` into the face on the other
    /// side of `edge`.
    ///
    /// Every half-edge of the merged boundary is relabelled with the surviving
    /// face.
    ///
    /// # Errors
    ///
    /// - [`GraphError::EdgeNotFound`] / [`GraphError::FaceNotFound`] for
    ///   foreign or removed keys
    /// - [`GraphError::EdgeIsDangling`] if both halves of `edge` lie on one face
    /// - [`GraphError::EdgeNotOnFace`] if `face` is on neither side of `edge`
    pub fn kill_edge_face(
        &mut self,
        edge: HalfEdgeHandle,
        face: FaceKey,
    ) -> Result<Removed<V, E, F>, GraphError> {
        let half = self.require_edge(edge)?;
        self.require_face(face)?;
        let mate_half = self.record(edge.mate())?;
        if half.face == mate_half.face {
            return Err(GraphError::EdgeIsDangling { edge });
        }

        // `kept_side` lies on the surviving face, its mate on `face`.
        let kept_side = if face == half.face {
            edge.mate()
        } else if face == mate_half.face {
            edge
        } else {
            return Err(GraphError::EdgeNotOnFace { edge, face });
        };
        let survivor = self.record(kept_side)?.face;
        let removed = |h: HalfEdgeHandle| h.same_edge(edge);

        // First surviving half-edge leaving the origin of `side` once the edge is gone.
        let bridge = |graph: &Self, side: HalfEdgeHandle| -> Result<Option<HalfEdgeHandle>, GraphError> {
            let mut candidate = graph.record(side.mate())?.next;
            for _ in 0..2 {
                if !removed(candidate) {
                    return Ok(Some(candidate));
                }
                candidate = graph.record(candidate.mate())?.next;
            }
            Ok(None)
        };

        let mut relinks: SmallBuffer<(HalfEdgeHandle, HalfEdgeHandle), MAX_RELINKS> =
            SmallBuffer::new();
        let mut vertex_updates: SmallBuffer<(VertexKey, Option<HalfEdgeHandle>), 2> =
            SmallBuffer::new();
        for side in [kept_side, kept_side.mate()] {
            let side_half = self.record(side)?;
            let bridged = bridge(self, side)?;
            if !removed(side_half.prev) {
                let Some(to) = bridged else {
                    return Err(GraphError::BrokenCycle {
                        message: format!("no surviving half-edge follows {:?}", side_half.prev),
                    }
                    .logged());
                };
                relinks.push((side_half.prev, to));
            }
            let origin_first = self
                .vertices
                .get(side_half.origin)
                .and_then(|record| record.first_edge);
            if origin_first.is_some_and(removed) {
                vertex_updates.push((side_half.origin, bridged));
            }
        }

        let survivor_first = self
            .faces
            .get(survivor)
            .and_then(|record| record.first_edge)
            .filter(|&first| !removed(first))
            .or_else(|| relinks.first().map(|&(from, _)| from));

        for &(from, to) in &relinks {
            self.link(from, to)?;
        }
        for &(vertex, first) in &vertex_updates {
            self.set_vertex_first(vertex, first)?;
        }
        self.set_face_first(survivor, survivor_first)?;

        let face_data = self.faces.remove(face).map(Face::into_data);
        let edge_data = self.edges.remove(edge.edge()).map(EdgePair::into_data);
        if let Some(first) = survivor_first {
            self.relabel_boundary(first, survivor)?;
        }

        self.bump_generation();
        self.trace_operator("kill_edge_face");
        Ok(Removed {
            vertex: None,
            edge: edge_data,
            face: face_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::ErrorKind;

    fn seed() -> (Graph, VertexKey, FaceKey) {
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        (graph, seed.vertex.unwrap(), seed.face.unwrap())
    }

    fn counts(graph: &Graph) -> (usize, usize, usize) {
        (
            graph.number_of_vertices(),
            graph.number_of_edges(),
            graph.number_of_faces(),
        )
    }

    fn face_with(graph: &Graph, a: VertexKey, b: VertexKey) -> FaceKey {
        graph
            .faces()
            .find(|&f| {
                let on_face: Vec<_> = graph.face_vertex_cycle(f).collect();
                on_face.contains(&a) && on_face.contains(&b)
            })
            .unwrap()
    }

    /// Bigon: two vertices joined by two parallel edges.
    fn bigon() -> (Graph, [VertexKey; 2]) {
        let (mut graph, v0, f0) = seed();
        let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
        graph.make_edge_face(f0, v0, v1).unwrap();
        (graph, [v0, v1])
    }

    fn tetrahedron() -> (Graph, [VertexKey; 4]) {
        let (mut graph, v0, f0) = seed();
        let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
        let v2 = graph.make_edge_vertex(f0, v1).unwrap().vertex.unwrap();
        graph.make_edge_face(f0, v2, v0).unwrap();
        let v3 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
        graph.make_edge_face(f0, v3, v1).unwrap();
        let face = face_with(&graph, v3, v2);
        graph.make_edge_face(face, v3, v2).unwrap();
        (graph, [v0, v1, v2, v3])
    }

    #[test]
    fn test_seed_and_kill_seed() {
        let (mut graph, _, _) = seed();
        assert_eq!(counts(&graph), (1, 0, 1));
        assert!(graph.is_valid().is_ok());

        let removed = graph.kill_vertex_face().unwrap();
        assert_eq!(removed, Removed { vertex: Some(()), edge: None, face: Some(()) });
        assert!(graph.is_empty());
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_seed_operators_are_fatal_on_wrong_shape() {
        let (mut graph, v0, f0) = seed();
        let error = graph.make_vertex_face().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FatalInvariant);

        graph.make_edge_vertex(f0, v0).unwrap();
        let error = graph.kill_vertex_face().unwrap_err();
        assert!(matches!(error, GraphError::NotSeedShape { vertices: 2, edges: 1, faces: 1 }));
        assert_eq!(counts(&graph), (2, 1, 1));

        let mut empty: Graph = Graph::new();
        assert!(empty.kill_vertex_face().unwrap_err().is_fatal());
    }

    #[test]
    fn test_spur_from_seed() {
        let (mut graph, v0, f0) = seed();
        let spur = graph.make_edge_vertex(f0, v0).unwrap();
        let (tip, edge) = (spur.vertex.unwrap(), spur.edge.unwrap());

        assert_eq!(counts(&graph), (2, 1, 1));
        assert_eq!(graph.vertices_of(edge), Some((v0, tip)));
        assert_eq!(graph.faces_of(edge), Some((f0, f0)));
        assert_eq!(graph.next_edge(edge), Some(edge.mate()));
        assert_eq!(graph.prev_edge(edge), Some(edge.mate()));
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_spur_round_trip_from_either_half() {
        for use_mate in [false, true] {
            let (mut graph, v0, f0) = seed();
            let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
            let spur = graph.make_edge_vertex(f0, v1).unwrap();
            let edge = spur.edge.unwrap();

            let handle = if use_mate { edge.mate() } else { edge };
            graph.kill_edge_vertex(handle).unwrap();

            assert_eq!(counts(&graph), (2, 1, 1));
            assert!(!graph.contains(spur.vertex.unwrap()));
            assert_eq!(graph.vertex_degree(v1), 1);
            assert!(graph.is_valid().is_ok());
        }
    }

    #[test]
    fn test_kill_last_edge_restores_seed() {
        let (mut graph, v0, f0) = seed();
        let edge = graph.make_edge_vertex(f0, v0).unwrap().edge.unwrap();
        graph.kill_edge_vertex(edge).unwrap();

        assert_eq!(counts(&graph), (1, 0, 1));
        assert!(graph.contains(v0));
        assert_eq!(graph.vertex(v0).unwrap().first_edge(), None);
        assert_eq!(graph.face(f0).unwrap().first_edge(), None);
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_kill_edge_vertex_rejects_non_spurs() {
        let (mut graph, [v0, v1]) = bigon();
        let edge = graph.vertex_edge_cycle(v0).next().unwrap();
        assert_eq!(
            graph.kill_edge_vertex(edge).unwrap_err(),
            GraphError::EdgeNotDangling { edge }
        );

        // Middle edge of a path: same face on both sides, but no degree-1 end.
        let (mut path, a, f) = seed();
        let b = path.make_edge_vertex(f, a).unwrap().vertex.unwrap();
        let middle = path.make_edge_vertex(f, b).unwrap().edge.unwrap();
        path.make_edge_vertex(f, path.destination(middle).unwrap()).unwrap();
        let before = counts(&path);
        assert!(matches!(
            path.kill_edge_vertex(middle),
            Err(GraphError::EdgeNotDangling { .. })
        ));
        assert_eq!(counts(&path), before);
        assert_eq!(graph.vertex_degree(v1), 2);
    }

    #[test]
    fn test_bigon_scenario() {
        let (graph, [v0, v1]) = bigon();
        assert_eq!(counts(&graph), (2, 2, 2));
        assert_eq!(graph.vertex_degree(v0), 2);
        assert_eq!(graph.vertex_degree(v1), 2);
        for face in graph.faces() {
            assert_eq!(graph.face_degree(face), 2);
        }
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_tetrahedron_scenario() {
        let (graph, vertices) = tetrahedron();
        assert_eq!(counts(&graph), (4, 6, 4));
        for v in vertices {
            assert_eq!(graph.vertex_degree(v), 3);
        }
        for f in graph.faces() {
            assert_eq!(graph.face_degree(f), 3);
        }
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_split_and_merge_edge_round_trip() {
        let (mut graph, [v0, ..]) = tetrahedron();
        let edge = graph.vertex_edge_cycle(v0).next().unwrap();
        let destination = graph.destination(edge).unwrap();

        let split = graph.make_vertex_edge(edge).unwrap();
        let middle = split.vertex.unwrap();
        assert_eq!(counts(&graph), (5, 7, 4));
        assert_eq!(graph.vertex_degree(middle), 2);
        assert!(graph.is_valid().is_ok());

        graph.kill_vertex_edge(middle, split.edge.unwrap()).unwrap();
        assert_eq!(counts(&graph), (4, 6, 4));
        assert_eq!(graph.vertices_of(edge), Some((v0, destination)));
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_merge_keeping_the_new_edge() {
        let (mut graph, [v0, ..]) = tetrahedron();
        let edge = graph.vertex_edge_cycle(v0).next().unwrap();
        let destination = graph.destination(edge).unwrap();
        let split = graph.make_vertex_edge(edge).unwrap();
        let outer = split.edge.unwrap();

        graph.kill_vertex_edge(split.vertex.unwrap(), edge).unwrap();
        assert!(!graph.contains(edge));
        assert_eq!(graph.vertices_of(outer), Some((v0, destination)));
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_split_spur_and_loop() {
        let (mut graph, v0, f0) = seed();
        let spur = graph.make_edge_vertex(f0, v0).unwrap();
        let split = graph.make_vertex_edge(spur.edge.unwrap()).unwrap();
        assert_eq!(counts(&graph), (3, 2, 1));
        assert_eq!(graph.face_degree(f0), 4);
        assert!(graph.is_valid().is_ok());

        // Collapse a bigon into a self-loop, then split the loop again.
        let (mut looped, [v0, v1]) = bigon();
        let edge = looped.vertex_edge_cycle(v1).next().unwrap();
        looped.kill_vertex_edge(v1, edge).unwrap();
        assert_eq!(counts(&looped), (1, 1, 2));
        assert!(looped.is_valid().is_ok());

        let loop_edge = looped.vertex_edge_cycle(v0).next().unwrap();
        assert_eq!(looped.destination(loop_edge), Some(v0));
        let split = looped.make_vertex_edge(loop_edge).unwrap();
        assert_eq!(counts(&looped), (2, 2, 2));
        assert_eq!(looped.vertex_degree(split.vertex.unwrap()), 2);
        assert!(looped.is_valid().is_ok());
    }

    #[test]
    fn test_kill_vertex_edge_preconditions() {
        let (mut graph, [v0, ..]) = tetrahedron();
        let edge = graph.vertex_edge_cycle(v0).next().unwrap();
        assert!(matches!(
            graph.kill_vertex_edge(v0, edge),
            Err(GraphError::InvalidVertexDegree { degree: 3, expected: 2, .. })
        ));

        let split = graph.make_vertex_edge(edge).unwrap();
        let middle = split.vertex.unwrap();
        let unrelated = graph
            .edges()
            .find(|&h| graph.origin(h) != Some(middle) && graph.destination(h) != Some(middle))
            .unwrap();
        assert_eq!(
            graph.kill_vertex_edge(middle, unrelated),
            Err(GraphError::EdgeNotIncident { edge: unrelated, vertex: middle })
        );

        // A lone self-loop cannot be merged away.
        let (mut looped, [v0, v1]) = bigon();
        let edge = looped.vertex_edge_cycle(v1).next().unwrap();
        looped.kill_vertex_edge(v1, edge).unwrap();
        let remaining = looped.edges().next().unwrap();
        assert_eq!(
            looped.kill_vertex_edge(v0, remaining),
            Err(GraphError::SelfLoopAtVertex { vertex: v0 })
        );
    }

    #[test]
    fn test_make_edge_face_preconditions() {
        let (mut graph, v0, f0) = seed();
        assert_eq!(
            graph.make_edge_face(f0, v0, v0),
            Err(GraphError::IdenticalVertices { vertex: v0 })
        );

        let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
        let v2 = graph.make_edge_vertex(f0, v1).unwrap().vertex.unwrap();
        let split = graph.make_edge_face(f0, v2, v0).unwrap();
        let inner = split.face.unwrap();
        let v3 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();

        assert_eq!(
            graph.make_edge_face(inner, v3, v1),
            Err(GraphError::VerticesNotOnFace { head: v3, tail: v1, face: inner })
        );
        assert_eq!(counts(&graph), (4, 4, 2));
    }

    #[test]
    fn test_face_split_and_merge_round_trip() {
        let (mut graph, [v0, _, v2, _]) = tetrahedron();
        let edge = graph
            .vertex_edge_cycle(v0)
            .find(|&h| graph.destination(h) == Some(v2))
            .unwrap();
        let (left, right) = graph.faces_of(edge).unwrap();

        let removed = graph.kill_edge_face(edge, right).unwrap();
        assert_eq!(removed.face, Some(()));
        assert_eq!(counts(&graph), (4, 5, 3));
        assert_eq!(graph.face_degree(left), 4);
        assert!(!graph.contains(right));
        assert!(graph.is_valid().is_ok());

        let restored = graph.make_edge_face(left, v0, v2).unwrap();
        assert_eq!(counts(&graph), (4, 6, 4));
        assert_eq!(graph.face_degree(restored.face.unwrap()), 3);
        assert_eq!(graph.vertex_degree(v0), 3);
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_kill_edge_face_preconditions() {
        let (mut graph, v0, f0) = seed();
        let spur = graph.make_edge_vertex(f0, v0).unwrap().edge.unwrap();
        assert_eq!(
            graph.kill_edge_face(spur, f0),
            Err(GraphError::EdgeIsDangling { edge: spur })
        );

        let (mut tet, _) = tetrahedron();
        let edge = tet.edges().next().unwrap();
        let (left, right) = tet.faces_of(edge).unwrap();
        let elsewhere = tet.faces().find(|&f| f != left && f != right).unwrap();
        assert_eq!(
            tet.kill_edge_face(edge, elsewhere),
            Err(GraphError::EdgeNotOnFace { edge, face: elsewhere })
        );
        assert_eq!(counts(&tet), (4, 6, 4));
    }

    #[test]
    fn test_kill_loop_face_restores_seed() {
        let (mut graph, [v0, v1]) = bigon();
        let edge = graph.vertex_edge_cycle(v1).next().unwrap();
        graph.kill_vertex_edge(v1, edge).unwrap();

        let looped = graph.edges().next().unwrap();
        let face = graph.right_face(looped).unwrap();
        graph.kill_edge_face(looped, face).unwrap();

        assert_eq!(counts(&graph), (1, 0, 1));
        assert_eq!(graph.vertex(v0).unwrap().first_edge(), None);
        assert!(graph.is_valid().is_ok());
    }

    #[test]
    fn test_make_edge_face_between_picks_occurrence() {
        // A star whose hub appears twice on the outer boundary.
        let (mut graph, hub, f0) = seed();
        let a = graph.make_edge_vertex(f0, hub).unwrap();
        let b = graph.make_edge_vertex(f0, hub).unwrap();
        let tip_a = a.vertex.unwrap();

        // Connect tip_a with the hub occurrence leaving along `b`.
        let leaving_b = b.edge.unwrap();
        let tip_a_edge = a.edge.unwrap().mate();
        let split = graph
            .make_edge_face_between(f0, hub, tip_a, leaving_b, tip_a_edge)
            .unwrap();
        assert_eq!(counts(&graph), (3, 3, 2));
        assert_eq!(graph.vertices_of(split.edge.unwrap()), Some((hub, tip_a)));
        assert!(graph.is_valid().is_ok());

        let stray = graph.edges().find(|&h| !h.same_edge(split.edge.unwrap())).unwrap();
        let far_vertex = graph
            .vertices()
            .find(|&v| graph.origin(stray) != Some(v) && graph.destination(stray) != Some(v))
            .unwrap();
        assert!(matches!(
            graph.make_edge_face_between(f0, far_vertex, hub, stray, leaving_b),
            Err(GraphError::EdgeNotIncident { .. })
        ));
    }

    #[test]
    fn test_failed_operators_leave_graph_untouched() {
        let (mut graph, [v0, v1, ..]) = tetrahedron();
        let generation = graph.generation();
        let before = counts(&graph);

        let face = graph.faces().next().unwrap();
        let _ = graph.make_edge_face(face, v0, v0);
        let edge = graph.edges().next().unwrap();
        let _ = graph.kill_edge_vertex(edge);
        let _ = graph.kill_vertex_edge(v1, edge);

        assert_eq!(counts(&graph), before);
        assert_eq!(graph.generation(), generation);
        assert!(graph.is_valid().is_ok());
    }
}
