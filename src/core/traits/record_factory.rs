//! Pluggable creation of record payloads.
//!
//! Every Euler operator that introduces a vertex, edge or face asks the graph's
//! factory for the payload to attach to it. Callers who need richer records
//! (labels, bindings to curves and surfaces, bookkeeping) supply their own
//! factory instead of subclassing the topological records.

/// Creates the payloads attached to newly allocated records.
///
/// # Examples
///
/// ```rust
/// use planar_topology::prelude::*;
///
/// /// Labels vertices in creation order.
/// #[derive(Default)]
/// struct Labeller {
///     next_vertex: usize,
/// }
///
/// impl RecordFactory<usize, (), ()> for Labeller {
///     fn new_vertex(&mut self) -> usize {
///         self.next_vertex += 1;
///         self.next_vertex
///     }
///     fn new_edge(&mut self) {}
///     fn new_face(&mut self) {}
/// }
///
/// let mut graph: Graph<usize, (), (), Labeller> = Graph::with_factory(Labeller::default());
/// let seed = graph.make_vertex_face().unwrap();
/// assert_eq!(graph.vertex_data(seed.vertex.unwrap()), Some(&1));
/// ```
pub trait RecordFactory<V, E, F> {
    /// Payload for a new vertex.
    fn new_vertex(&mut self) -> V;

    /// Payload for a new edge pair, shared by both of its half-edges.
    fn new_edge(&mut self) -> E;

    /// Payload for a new face.
    fn new_face(&mut self) -> F;
}

/// Factory producing `Default` payloads.
///
/// This is the factory used by [`Graph::new`](crate::core::graph::Graph::new).
///
/// # Examples
///
/// ```rust
/// use planar_topology::core::traits::{DefaultFactory, RecordFactory};
///
/// let mut factory = DefaultFactory;
/// let vertex: u32 = RecordFactory::<u32, (), ()>::new_vertex(&mut factory);
/// assert_eq!(vertex, 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultFactory;

impl<V, E, F> RecordFactory<V, E, F> for DefaultFactory
where
    V: Default,
    E: Default,
    F: Default,
{
    #[inline]
    fn new_vertex(&mut self) -> V {
        V::default()
    }

    #[inline]
    fn new_edge(&mut self) -> E {
        E::default()
    }

    #[inline]
    fn new_face(&mut self) -> F {
        F::default()
    }
}
