//! Capability shared by the vertex, face and edge-pair records.
//!
//! Each record carries one opaque payload. The kernel never inspects it; it is
//! where curve, surface or application data gets attached.

/// A topological record carrying a user payload.
///
/// Implemented by [`Vertex`](crate::core::vertex::Vertex),
/// [`Face`](crate::core::face::Face) and
/// [`EdgePair`](crate::core::half_edge::EdgePair).
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
///
/// let mut graph: Graph<&str, (), ()> = Graph::new();
/// let seed = graph.make_vertex_face().unwrap();
/// let vertex = seed.vertex.unwrap();
///
/// graph.set_vertex_data(vertex, "origin");
/// let record = graph.vertex(vertex).unwrap();
/// assert_eq!(*record.data(), "origin");
/// ```
pub trait GraphRecord {
    /// The payload type carried by this record.
    type Data;

    /// Returns a reference to the payload.
    fn data(&self) -> &Self::Data;

    /// Returns a mutable reference to the payload.
    fn data_mut(&mut self) -> &mut Self::Data;

    /// Replaces the payload, returning the previous one.
    fn set_data(&mut self, data: Self::Data) -> Self::Data {
        std::mem::replace(self.data_mut(), data)
    }
}
