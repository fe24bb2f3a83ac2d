use crate::core::graph::{EdgeKey, FaceKey, VertexKey};
use slotmap::SecondaryMap;

// =============================================================================
// SLOTMAP SECONDARY MAPS FOR AUXILIARY DATA
// =============================================================================

/// Secondary map associating auxiliary data with vertices.
///
/// This is the idiomatic way to associate temporary data with `SlotMap` keys
/// during algorithms without storing it on the records themselves. The copy
/// and dual-copy algorithms use it as their old→new replica table.
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
/// use planar_topology::core::collections::VertexSecondaryMap;
///
/// let mut graph: Graph = Graph::new();
/// let seed = graph.make_vertex_face().unwrap();
///
/// let mut visited: VertexSecondaryMap<bool> = VertexSecondaryMap::new();
/// for vertex in graph.vertices() {
///     visited.insert(vertex, true);
/// }
/// assert_eq!(visited.get(seed.vertex.unwrap()), Some(&true));
/// ```
pub type VertexSecondaryMap<V> = SecondaryMap<VertexKey, V>;

/// Secondary map associating auxiliary data with faces.
pub type FaceSecondaryMap<V> = SecondaryMap<FaceKey, V>;

/// Secondary map associating auxiliary data with edge pairs.
///
/// Data keyed here is shared by both halves of an edge, mirroring how edge
/// payloads are stored.
pub type EdgeSecondaryMap<V> = SecondaryMap<EdgeKey, V>;
