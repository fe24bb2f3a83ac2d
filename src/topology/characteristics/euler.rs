//! Euler characteristic computation for embedded planar graphs.
//!
//! This module implements the planar Euler characteristic
//! χ = |V| - |E| + |F|, which is 2 for every non-empty connected graph
//! embedded on the sphere and 0 for the empty graph.
//!
//! # Examples
//!
//! ```rust
//! use planar_topology::prelude::*;
//! use planar_topology::topology::characteristics::euler;
//!
//! let mut graph: Graph = Graph::new();
//! let seed = graph.make_vertex_face().unwrap();
//! graph
//!     .make_edge_vertex(seed.face.unwrap(), seed.vertex.unwrap())
//!     .unwrap();
//!
//! let counts = euler::count_elements(&graph);
//! let chi = euler::euler_characteristic(&counts);
//! assert_eq!(chi, 2); // V=2, E=1, F=1
//! ```

use crate::core::graph::Graph;

/// Counts of the vertices, edges and faces of a graph.
///
/// Edges are counted as edge pairs, not half-edges.
///
/// # Examples
///
/// ```rust
/// use planar_topology::topology::characteristics::euler::ElementCounts;
///
/// // Tetrahedron: 4 vertices, 6 edges, 4 faces
/// let counts = ElementCounts {
///     vertices: 4,
///     edges: 6,
///     faces: 4,
/// };
/// assert_eq!(counts.total(), 14);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementCounts {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of edge pairs.
    pub edges: usize,
    /// Number of faces.
    pub faces: usize,
}

impl ElementCounts {
    /// Total number of records.
    #[must_use]
    #[inline]
    pub const fn total(&self) -> usize {
        self.vertices + self.edges + self.faces
    }
}

/// Topological classification of an embedded graph.
///
/// Classifies the global structure to determine the expected Euler
/// characteristic.
///
/// # Variants
///
/// - `Empty`: no records (χ = 0)
/// - `Seed`: one vertex and one face, no edges (χ = 2)
/// - `Sphere`: a connected graph with edges embedded on the sphere (χ = 2)
/// - `Unknown`: counts that no sequence of Euler operators can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyClassification {
    /// Empty graph.
    Empty,

    /// The single vertex and face created by `make_vertex_face`.
    Seed,

    /// Connected graph with at least one edge.
    Sphere,

    /// Cannot determine or doesn't fit known categories.
    Unknown,
}

/// Count the vertices, edges and faces of a graph.
///
/// All three counts are O(1) reads of the underlying storages.
#[must_use]
pub fn count_elements<V, E, F, M>(graph: &Graph<V, E, F, M>) -> ElementCounts {
    ElementCounts {
        vertices: graph.number_of_vertices(),
        edges: graph.number_of_edges(),
        faces: graph.number_of_faces(),
    }
}

/// Compute the Euler characteristic χ = V - E + F.
///
/// # Examples
///
/// ```rust
/// use planar_topology::topology::characteristics::euler::{ElementCounts, euler_characteristic};
///
/// // Cube: V=8, E=12, F=6 → χ = 2
/// let cube = ElementCounts { vertices: 8, edges: 12, faces: 6 };
/// assert_eq!(euler_characteristic(&cube), 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Record counts won't exceed isize::MAX in practice
pub fn euler_characteristic(counts: &ElementCounts) -> isize {
    counts.vertices as isize - counts.edges as isize + counts.faces as isize
}

/// Classify a set of element counts.
///
/// # Classification Logic
///
/// - `(0, 0, 0)` → `Empty`
/// - `(1, 0, 1)` → `Seed`
/// - at least one of each → `Sphere`
/// - anything else → `Unknown`
#[must_use]
pub const fn classify_counts(counts: &ElementCounts) -> TopologyClassification {
    match (counts.vertices, counts.edges, counts.faces) {
        (0, 0, 0) => TopologyClassification::Empty,
        (1, 0, 1) => TopologyClassification::Seed,
        (v, e, f) if v > 0 && e > 0 && f > 0 => TopologyClassification::Sphere,
        _ => TopologyClassification::Unknown,
    }
}

/// Classify a graph topologically.
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
/// use planar_topology::topology::characteristics::euler::{TopologyClassification, classify_graph};
///
/// let mut graph: Graph = Graph::new();
/// assert_eq!(classify_graph(&graph), TopologyClassification::Empty);
///
/// graph.make_vertex_face().unwrap();
/// assert_eq!(classify_graph(&graph), TopologyClassification::Seed);
/// ```
#[must_use]
pub fn classify_graph<V, E, F, M>(graph: &Graph<V, E, F, M>) -> TopologyClassification {
    classify_counts(&count_elements(graph))
}

/// Get expected χ for a topological classification.
///
/// # Expected Values
///
/// - `Empty`: χ = 0
/// - `Seed`: χ = 2
/// - `Sphere`: χ = 2
/// - `Unknown`: None
///
/// # Examples
///
/// ```rust
/// use planar_topology::topology::characteristics::euler::{TopologyClassification, expected_chi_for};
///
/// assert_eq!(expected_chi_for(&TopologyClassification::Empty), Some(0));
/// assert_eq!(expected_chi_for(&TopologyClassification::Sphere), Some(2));
/// assert_eq!(expected_chi_for(&TopologyClassification::Unknown), None);
/// ```
#[must_use]
pub const fn expected_chi_for(classification: &TopologyClassification) -> Option<isize> {
    match classification {
        TopologyClassification::Empty => Some(0),
        TopologyClassification::Seed | TopologyClassification::Sphere => Some(2),
        TopologyClassification::Unknown => None,
    }
}
