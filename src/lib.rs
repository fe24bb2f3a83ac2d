//! # planar-topology
//!
//! This is a library for building and editing embedded planar graphs stored as
//! a half-edge (doubly connected edge list) structure. The embedding is purely
//! combinatorial: around every vertex the outgoing half-edges have a cyclic
//! order, and around every face the boundary half-edges have a cyclic order.
//! No coordinates are stored.
//!
//! # Features
//!
//! - Arena storage of vertices, edges and faces with stable `Copy` keys
//! - Eight Euler operators as the only structural mutations, each preserving
//!   `|V| - |E| + |F| = 2` for every non-empty graph
//! - Lazy vertex and face traversals (edge cycles and incidence cycles)
//! - Copy and dual copy with fresh keys
//! - Generic vertex, edge and face payloads created by a pluggable
//!   [`RecordFactory`](core::traits::RecordFactory)
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! Every graph starts empty. The first operator must be
//! [`make_vertex_face`](core::graph::Graph::make_vertex_face), which creates a
//! single vertex on a single face; everything else is grown from there:
//!
//! ```rust
//! use planar_topology::prelude::*;
//!
//! let mut graph: Graph = Graph::new();
//! let seed = graph.make_vertex_face().unwrap();
//! let (v0, outer) = (seed.vertex.unwrap(), seed.face.unwrap());
//!
//! // Grow a path v0 - v1 - v2 - v3, then close it into a square.
//! let v1 = graph.make_edge_vertex(outer, v0).unwrap().vertex.unwrap();
//! let v2 = graph.make_edge_vertex(outer, v1).unwrap().vertex.unwrap();
//! let v3 = graph.make_edge_vertex(outer, v2).unwrap().vertex.unwrap();
//! let inner = graph.make_edge_face(outer, v3, v0).unwrap().face.unwrap();
//!
//! assert_eq!(graph.number_of_vertices(), 4);
//! assert_eq!(graph.number_of_edges(), 4);
//! assert_eq!(graph.number_of_faces(), 2);
//! assert_eq!(graph.face_degree(inner), 4);
//! assert!(graph.is_valid().is_ok());
//! ```
//!
//! # Graph Invariants
//!
//! The graph maintains a set of **structural** invariants that are checked by
//! [`Graph::is_valid`](core::graph::Graph::is_valid) and
//! [`Graph::validation_report`](core::graph::Graph::validation_report):
//!
//! - **References** – every key stored in a record names a live record.
//! - **Links** – `next` and `prev` are inverse, consecutive half-edges on a
//!   face join head to tail, and both halves of a boundary share its face.
//! - **Vertex cycles** – walking `mate(prev(h))` from a vertex's first
//!   half-edge visits exactly the half-edges leaving it.
//! - **Face cycles** – walking `next` from a face's first half-edge visits
//!   exactly the half-edges on its boundary.
//! - **Euler characteristic** – `|V| - |E| + |F|` is 0 for the empty graph
//!   and 2 otherwise.
//!
//! ## Validation helpers
//!
//! | Invariant | Helper method |
//! |---|---|
//! | References | [`validate_references`](core::graph::Graph::validate_references) |
//! | Links | [`validate_links`](core::graph::Graph::validate_links) |
//! | Vertex cycles | [`validate_vertex_cycles`](core::graph::Graph::validate_vertex_cycles) |
//! | Face cycles | [`validate_face_cycles`](core::graph::Graph::validate_face_cycles) |
//! | Euler characteristic | [`validate_euler_characteristic`](core::graph::Graph::validate_euler_characteristic) |
//!
//! # Error Handling
//!
//! Every fallible operation returns a [`GraphError`](core::graph::GraphError).
//! Errors of kind `InvalidArgument` leave the graph untouched. Errors of kind
//! `FatalInvariant` mean the graph was already inconsistent; they are logged at
//! `error` level through [`tracing`] and the graph should be discarded.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: `debug` for every applied operator and
//! copy, `error` for fatal invariant failures. Install any subscriber to see
//! them.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

/// The `core` module contains the graph storage, its records and traversals,
/// and the algorithms that edit and copy graphs.
pub mod core {
    /// Graph algorithms built on top of the storage layer.
    pub mod algorithms {
        /// The eight Euler operators.
        pub mod euler_operators;
        /// Copy and dual copy.
        pub mod replication;
    }
    /// Collection types used by the storage and the algorithms.
    pub mod collections;
    pub mod face;
    pub mod graph;
    pub mod half_edge;
    /// Traits for graph records and their payload factories.
    pub mod traits {
        pub mod graph_record;
        pub mod record_factory;
        pub use graph_record::*;
        pub use record_factory::*;
    }
    pub mod vertex;

    // Re-export the `core` modules.
    pub use algorithms::euler_operators::{EulerOpResult, Removed};
    pub use face::*;
    pub use graph::*;
    pub use half_edge::*;
    pub use traits::*;
    pub use vertex::*;
}

/// Topological characteristics of graphs.
pub mod topology {
    /// Euler characteristic computation and topological checks.
    pub mod characteristics {
        pub mod euler;
        pub mod validation;
    }
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::euler_operators::{EulerOpResult, Removed},
        face::{Face, FaceEdgeCycle, FaceVertexCycle},
        graph::{
            EdgeKey, EntityKind, ErrorKind, FaceKey, Graph, GraphError, GraphKey,
            GraphValidationError, GraphValidationReport, InvariantKind, InvariantViolation,
            VertexKey,
        },
        half_edge::{EdgePair, HalfEdge, HalfEdgeHandle, Orientation},
        traits::{DefaultFactory, GraphRecord, RecordFactory},
        vertex::{Vertex, VertexEdgeCycle, VertexFaceCycle},
    };

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };

    // Re-export topology checks
    pub use crate::topology::characteristics::{
        euler::{ElementCounts, TopologyClassification},
        validation::{TopologyCheckResult, validate_graph_euler},
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{is_normal, prelude::*};
    use std::sync::{Arc, RwLock};
    use std::thread;

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<Graph>());
        assert!(is_normal::<Graph<String, f64, Vec<u8>>>());
        assert!(is_normal::<Vertex<u32>>());
        assert!(is_normal::<Face<u32>>());
        assert!(is_normal::<EdgePair<u32>>());
        assert!(is_normal::<HalfEdgeHandle>());
        assert!(is_normal::<GraphError>());
    }

    #[test]
    fn test_prelude_collections_exports() {
        let mut map: FastHashMap<VertexKey, usize> = fast_hash_map_with_capacity(4);
        let mut graph: Graph = Graph::new();
        let seed = graph.make_vertex_face().unwrap();
        map.insert(seed.vertex.unwrap(), 1);
        assert_eq!(map.get(&seed.vertex.unwrap()), Some(&1));

        let mut set: FastHashSet<FaceKey> = fast_hash_set_with_capacity(4);
        set.insert(seed.face.unwrap());
        assert!(set.contains(&seed.face.unwrap()));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_shared_graph_behind_rwlock() {
        let graph = Arc::new(RwLock::new(Graph::<u32, (), ()>::new()));
        {
            let mut guard = graph.write().unwrap();
            let seed = guard.make_vertex_face().unwrap();
            let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
            let v1 = guard.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
            guard.make_edge_vertex(f0, v1).unwrap();
        }

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let graph = Arc::clone(&graph);
                thread::spawn(move || {
                    let guard = graph.read().unwrap();
                    guard
                        .vertices()
                        .map(|v| guard.vertex_degree(v))
                        .sum::<usize>()
                })
            })
            .collect();
        for reader in readers {
            assert_eq!(reader.join().unwrap(), 4);
        }

        let mut guard = graph.write().unwrap();
        let tip = guard
            .vertices()
            .find(|&v| guard.vertex_degree(v) == 1)
            .unwrap();
        let spur = guard.vertex_edge_cycle(tip).next().unwrap();
        guard.kill_edge_vertex(spur).unwrap();
        assert_eq!(guard.number_of_vertices(), 2);
        assert!(guard.is_valid().is_ok());
    }
}
