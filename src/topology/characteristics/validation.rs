//! Topology validation functions for embedded graphs.
//!
//! This module provides a high-level check that combines element counting,
//! classification, and Euler characteristic checking into one report.

use crate::core::graph::Graph;
use crate::topology::characteristics::euler::{
    ElementCounts, TopologyClassification, classify_counts, count_elements, euler_characteristic,
    expected_chi_for,
};

/// Result of Euler characteristic validation.
///
/// Contains the computed Euler characteristic, expected value based on
/// topological classification, and diagnostic information.
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
/// use planar_topology::topology::characteristics::validation;
///
/// let mut graph: Graph = Graph::new();
/// graph.make_vertex_face().unwrap();
///
/// let result = validation::validate_graph_euler(&graph);
/// assert_eq!(result.chi, 2);
/// assert!(result.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyCheckResult {
    /// Computed Euler characteristic.
    pub chi: isize,

    /// Expected χ based on classification (None if unknown).
    pub expected: Option<isize>,

    /// Topological classification.
    pub classification: TopologyClassification,

    /// Vertex, edge and face counts.
    pub counts: ElementCounts,

    /// Diagnostic notes or warnings.
    pub notes: Vec<String>,
}

impl TopologyCheckResult {
    /// Returns `true` if χ matches expectation.
    ///
    /// Unlike [`Graph::validate_euler_characteristic`], an `Unknown`
    /// classification is reported through `notes` rather than treated as a
    /// mismatch, since no expected value exists for it.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.expected.is_none_or(|exp| self.chi == exp)
    }
}

/// Validate the Euler characteristic of a graph.
///
/// Combines element counting, classification, and validation into a single
/// topology check.
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
/// use planar_topology::topology::characteristics::{euler::TopologyClassification, validation};
///
/// let mut graph: Graph = Graph::new();
/// let seed = graph.make_vertex_face().unwrap();
/// let (v0, f0) = (seed.vertex.unwrap(), seed.face.unwrap());
/// let v1 = graph.make_edge_vertex(f0, v0).unwrap().vertex.unwrap();
/// let v2 = graph.make_edge_vertex(f0, v1).unwrap().vertex.unwrap();
/// graph.make_edge_face(f0, v2, v0).unwrap();
///
/// let result = validation::validate_graph_euler(&graph);
/// assert_eq!(result.chi, 2);
/// assert_eq!(result.counts.vertices, 3);
/// assert_eq!(result.counts.edges, 3);
/// assert_eq!(result.counts.faces, 2);
/// assert_eq!(result.classification, TopologyClassification::Sphere);
/// assert!(result.is_valid());
/// ```
#[must_use]
pub fn validate_graph_euler<V, E, F, M>(graph: &Graph<V, E, F, M>) -> TopologyCheckResult {
    let counts = count_elements(graph);
    let chi = euler_characteristic(&counts);
    let classification = classify_counts(&counts);
    let expected = expected_chi_for(&classification);

    let mut notes = Vec::new();

    // Add diagnostic notes
    if let Some(exp) = expected.filter(|&exp| chi != exp) {
        notes.push(format!(
            "Euler characteristic mismatch: computed {chi}, expected {exp}"
        ));
    }
    if classification == TopologyClassification::Unknown {
        notes.push(format!(
            "Counts V={}, E={}, F={} fit no known classification",
            counts.vertices, counts.edges, counts.faces
        ));
    }

    TopologyCheckResult {
        chi,
        expected,
        classification,
        counts,
        notes,
    }
}
